use crate::error::Error;
use crate::transport::RawResponse;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Uniform result of every API call.
///
/// Expected failures never panic or propagate past the client: they are
/// reported through `error`, in which case `data` is always `None`. A
/// successful call without a body (204) has neither.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<Error>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            data: None,
            error: None,
        }
    }

    pub fn failure(error: Error) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    /// Error message, if the call failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_ref().map(Error::message)
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<Option<T>, Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.data),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiResponse<U> {
        ApiResponse {
            data: self.data.map(f),
            error: self.error,
        }
    }
}

impl ApiResponse<Value> {
    /// Converts a raw JSON envelope into a typed one
    pub fn decode<T: DeserializeOwned>(self) -> ApiResponse<T> {
        match self {
            ApiResponse {
                error: Some(err), ..
            } => ApiResponse::failure(err),
            ApiResponse {
                data: Some(value), ..
            } => match serde_json::from_value(value) {
                Ok(data) => ApiResponse::success(data),
                Err(err) => ApiResponse::failure(Error::decode(format!(
                    "Unexpected response shape: {}",
                    err
                ))),
            },
            _ => ApiResponse::empty(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// Turns the outcome of a transport call into an envelope.
pub fn normalize(result: Result<RawResponse, Error>) -> ApiResponse<Value> {
    let raw = match result {
        Ok(raw) => raw,
        Err(err) => return ApiResponse::failure(err),
    };

    if !raw.is_success() {
        return ApiResponse::failure(Error::http(raw.status, error_detail(&raw)));
    }

    // 204 carries no body by definition; never try to parse it
    if raw.status == 204 || raw.body.iter().all(u8::is_ascii_whitespace) {
        return ApiResponse::empty();
    }

    match serde_json::from_slice(&raw.body) {
        Ok(value) => ApiResponse::success(value),
        Err(err) => ApiResponse::failure(Error::decode(format!("Invalid JSON response: {}", err))),
    }
}

fn error_detail(raw: &RawResponse) -> String {
    match serde_json::from_slice::<ErrorBody>(&raw.body) {
        Ok(ErrorBody {
            detail: Some(Value::String(detail)),
        }) => detail,
        Ok(ErrorBody {
            detail: Some(detail),
        }) => detail.to_string(),
        _ => format!("Request failed with status {}", raw.status),
    }
}
