use multimap::MultiMap;
use url::Url;

/// Query string parameters, allowing repeated keys.
///
/// Parameters are always emitted in a canonical (sorted) order so that two
/// logically identical requests produce the same URL and the same digest.
#[derive(Clone, Debug, Default)]
pub struct QueryParams {
    params: MultiMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    /// Adds the parameter only when a value is present
    pub fn with_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.params.get(key)
    }

    /// Sorted `(key, value)` pairs
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .params
            .iter_all()
            .flat_map(|(key, values)| {
                values
                    .iter()
                    .map(move |value| (key.as_str(), value.as_str()))
            })
            .collect();
        pairs.sort();
        pairs
    }

    /// Canonical `k=v&k=v` rendering, unescaped. Intended for hashing, not for URLs.
    pub fn canonical(&self) -> String {
        self.pairs()
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn apply(&self, url: &mut Url) {
        if self.is_empty() {
            return;
        }
        let mut query = url.query_pairs_mut();
        for (key, value) in self.pairs() {
            query.append_pair(key, value);
        }
    }
}

/// Joins an API base (which may carry a path prefix such as `/api/v1`) with
/// an endpoint path. `Url::join` would drop the prefix for absolute paths.
pub fn join_url(base: &str, path: &str, query: &QueryParams) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    ))?;
    query.apply(&mut url);
    Ok(url)
}
