use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::invalidation::Mutation;
use crate::key::{Operation, Resource};
use crate::models::notification::{NotificationFeed, UnreadCount};
use crate::transport::Method;
use serde_json::Value;
use utils::QueryParams;

pub const UNREAD_COUNT: Operation = Operation::new(Resource::Notifications, "unreadCount");
pub const FEED: Operation = Operation::new(Resource::Notifications, "feed");

#[derive(Clone, Copy)]
pub struct NotificationsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> NotificationsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn unread_count(self) -> ApiResponse<u64> {
        self.client
            .read::<UnreadCount>(UNREAD_COUNT, "/notifications/unread-count", QueryParams::new())
            .await
            .map(|count| count.unread_count)
    }

    pub async fn feed(self, skip: u32, limit: u32) -> ApiResponse<NotificationFeed> {
        let query = QueryParams::new().with("skip", skip).with("limit", limit);
        self.client.read(FEED, "/notifications/feed", query).await
    }

    pub async fn mark_as_read(self, id: i64) -> ApiResponse<()> {
        self.client
            .mutate::<Value>(
                Mutation::MarkNotificationRead,
                Method::Post,
                &format!("/notifications/{}/read", id),
                None,
            )
            .await
            .map(|_| ())
    }

    pub async fn mark_all_as_read(self) -> ApiResponse<()> {
        self.client
            .mutate::<Value>(
                Mutation::MarkAllNotificationsRead,
                Method::Post,
                "/notifications/read-all",
                None,
            )
            .await
            .map(|_| ())
    }

    pub async fn delete(self, id: i64) -> ApiResponse<()> {
        self.client
            .mutate::<Value>(
                Mutation::DeleteNotification,
                Method::Delete,
                &format!("/notifications/{}", id),
                None,
            )
            .await
            .map(|_| ())
    }
}
