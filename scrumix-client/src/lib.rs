pub mod api;
pub mod badge;
mod client;
pub mod config;
pub mod deduplication;
pub mod envelope;
mod error;
pub mod invalidation;
pub mod key;
pub mod models;
pub mod transport;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

pub use badge::{BadgeStore, FileBadgeStore, MemoryBadgeStore, UnreadBadge};
pub use client::{with_deadline, ApiClient, Session};
pub use config::ClientConfig;
pub use envelope::ApiResponse;
pub use error::Error;
pub use error::ErrorKind;
pub use invalidation::{InvalidationPolicy, Mutation};
pub use key::{KeyPattern, Operation, RequestKey, Resource};
pub use transport::{ApiRequest, Method, RawResponse, SurfTransport, Transport};

// Re-export deduplication types
pub use deduplication::{DeduplicationConfig, DeduplicationStats};
