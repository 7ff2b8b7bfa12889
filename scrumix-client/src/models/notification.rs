use chrono::{DateTime, Utc};
use getset::Getters;
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[get = "pub"]
pub struct Notification {
    id: i64,
    title: String,
    #[serde(default)]
    message: String,
    #[serde(default, alias = "notificationType", alias = "type")]
    notification_type: Option<String>,
    #[serde(default)]
    priority: Option<NotificationPriority>,
    #[serde(default, alias = "isRead")]
    is_read: bool,
    #[serde(default, alias = "actionUrl")]
    action_url: Option<String>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[get = "pub"]
pub struct NotificationFeed {
    #[serde(default)]
    notifications: Vec<Notification>,
    #[serde(default, alias = "totalCount", alias = "total")]
    total_count: u64,
    #[serde(default, alias = "unreadCount")]
    unread_count: u64,
    #[serde(default, alias = "hasMore")]
    has_more: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    #[serde(alias = "unreadCount", alias = "count")]
    pub unread_count: u64,
}
