use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::envelope::ApiResponse;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Key under which the badge count is persisted
pub const BADGE_KEY: &str = "scrumix_unread_count";

/// Best-effort persistence for the unread badge. Never authoritative: the
/// next successful fetch overwrites whatever is stored.
pub trait BadgeStore: Send + Sync {
    fn load(&self) -> Option<u64>;
    fn save(&self, count: u64);
}

#[derive(Debug, Default)]
pub struct MemoryBadgeStore {
    count: Mutex<Option<u64>>,
}

impl BadgeStore for MemoryBadgeStore {
    fn load(&self) -> Option<u64> {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn save(&self, count: u64) {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner) = Some(count);
    }
}

/// Stores the count in a small JSON object file, alongside any other keys
#[derive(Debug, Clone)]
pub struct FileBadgeStore {
    path: PathBuf,
}

impl FileBadgeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> HashMap<String, u64> {
        fs::read(&self.path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }
}

impl BadgeStore for FileBadgeStore {
    fn load(&self) -> Option<u64> {
        self.read_entries().get(BADGE_KEY).copied()
    }

    fn save(&self, count: u64) {
        let mut entries = self.read_entries();
        entries.insert(BADGE_KEY.to_string(), count);

        let written = serde_json::to_vec(&entries)
            .map_err(|err| err.to_string())
            .and_then(|bytes| fs::write(&self.path, bytes).map_err(|err| err.to_string()));
        if let Err(err) = written {
            log::warn!("Could not persist unread count to {}: {}", self.path.display(), err);
        }
    }
}

/// Notification badge count.
///
/// A failed refresh never overwrites a count from an earlier successful one;
/// until the first success the persisted value, or zero, is shown.
pub struct UnreadBadge {
    store: Arc<dyn BadgeStore>,
    last_known: Mutex<Option<u64>>,
}

impl UnreadBadge {
    pub fn new(store: Arc<dyn BadgeStore>) -> Self {
        let last_known = store.load();
        Self {
            store,
            last_known: Mutex::new(last_known),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        match config.badge_path() {
            Some(path) => Self::new(Arc::new(FileBadgeStore::new(path.clone()))),
            None => Self::new(Arc::new(MemoryBadgeStore::default())),
        }
    }

    pub fn count(&self) -> u64 {
        self.last_known
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unwrap_or(0)
    }

    pub async fn refresh(&self, client: &ApiClient) -> u64 {
        let response = client.notifications().unread_count().await;
        self.record(response)
    }

    /// Marks one notification read, then refetches the count
    pub async fn mark_read(&self, client: &ApiClient, id: i64) -> ApiResponse<()> {
        let response = client.notifications().mark_as_read(id).await;
        if response.is_ok() {
            self.refresh(client).await;
        }
        response
    }

    /// Applies the outcome of an unread-count fetch and returns the count to show
    pub fn record(&self, response: ApiResponse<u64>) -> u64 {
        match (response.data, response.error) {
            (_, Some(err)) if err.is_authentication() => {
                log::debug!("Unread count unavailable without a session: {}", err);
            }
            (_, Some(err)) => {
                log::warn!("Keeping last known unread count: {}", err);
            }
            (Some(count), None) => {
                *self.last_known.lock().unwrap_or_else(PoisonError::into_inner) = Some(count);
                self.store.save(count);
            }
            (None, None) => {}
        }
        self.count()
    }
}
