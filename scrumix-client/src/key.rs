use crate::transport::Method;
use getset::Getters;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use utils::QueryParams;

/// Backend resource families, used to group request keys for invalidation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Resource {
    Notifications,
    Backlogs,
    Sprints,
    Users,
    Documentation,
}

/// Logical name of a read, e.g. `notifications:unreadCount`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    resource: Resource,
    name: &'static str,
}

impl Operation {
    pub const fn new(resource: Resource, name: &'static str) -> Self {
        Self { resource, name }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.name)
    }
}

/// Key for coalescing in-flight reads.
///
/// Two reads share a key only if they have the same logical operation and the
/// same method, path, query and body. The digest covers the full request so
/// that differently filtered calls to one endpoint never share a result.
#[derive(Hash, Eq, PartialEq, Clone, Debug, Getters)]
#[get = "pub"]
pub struct RequestKey {
    operation: Operation,
    digest: String,
}

impl RequestKey {
    pub fn from_request(
        operation: Operation,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<&Value>,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(method.as_ref().as_bytes());
        hasher.update(b"\n");
        hasher.update(path.as_bytes());
        hasher.update(b"\n");
        hasher.update(query.canonical().as_bytes());
        hasher.update(b"\n");
        // serde_json maps are ordered, so this rendering is canonical
        if let Some(body) = body {
            hasher.update(body.to_string().as_bytes());
        }

        let digest = hex::encode(hasher.finalize());
        RequestKey { operation, digest }
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.operation, &self.digest[..12])
    }
}

/// Selects a group of request keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPattern {
    resource: Option<Resource>,
    name: Option<&'static str>,
}

impl KeyPattern {
    /// Every key
    pub const fn all() -> Self {
        Self {
            resource: None,
            name: None,
        }
    }

    /// Every key of one resource
    pub const fn resource(resource: Resource) -> Self {
        Self {
            resource: Some(resource),
            name: None,
        }
    }

    /// Every key of one operation, whatever its parameters
    pub const fn operation(operation: Operation) -> Self {
        Self {
            resource: Some(operation.resource),
            name: Some(operation.name),
        }
    }

    pub fn matches(&self, key: &RequestKey) -> bool {
        self.resource
            .map_or(true, |resource| resource == key.operation.resource)
            && self.name.map_or(true, |name| name == key.operation.name)
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.resource, self.name) {
            (None, _) => f.write_str("*"),
            (Some(resource), None) => write!(f, "{}:*", resource),
            (Some(resource), Some(name)) => write!(f, "{}:{}", resource, name),
        }
    }
}
