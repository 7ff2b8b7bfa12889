pub mod query;
pub mod surf_logging;

pub use query::{join_url, QueryParams};
