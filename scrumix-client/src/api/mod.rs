//! Typed facades over the backend endpoints. Each operation constant names
//! the reads that invalidation rules can refer to.

pub mod backlogs;
pub mod documentation;
pub mod notifications;
pub mod sprints;
pub mod users;

pub use backlogs::BacklogsApi;
pub use documentation::DocumentationApi;
pub use notifications::NotificationsApi;
pub use sprints::SprintsApi;
pub use users::UsersApi;
