use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::invalidation::Mutation;
use crate::key::{Operation, Resource};
use crate::models::backlog::{Backlog, BacklogCreate, BacklogFilter, BacklogUpdate};
use crate::transport::Method;
use serde_json::Value;
use utils::QueryParams;

pub const LIST: Operation = Operation::new(Resource::Backlogs, "list");
pub const DETAIL: Operation = Operation::new(Resource::Backlogs, "detail");

#[derive(Clone, Copy)]
pub struct BacklogsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> BacklogsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(self, filter: &BacklogFilter) -> ApiResponse<Vec<Backlog>> {
        let query = filter.to_query(*self.client.session().project_id());
        self.client.read(LIST, "/backlogs/", query).await
    }

    pub async fn get(self, id: i64) -> ApiResponse<Backlog> {
        self.client
            .read(DETAIL, &format!("/backlogs/{}", id), QueryParams::new())
            .await
    }

    pub async fn create(self, mut item: BacklogCreate) -> ApiResponse<Backlog> {
        item.project_id = item.project_id.or(*self.client.session().project_id());
        self.client
            .mutate_with(Mutation::CreateBacklogItem, Method::Post, "/backlogs/", &item)
            .await
    }

    pub async fn update(self, id: i64, patch: &BacklogUpdate) -> ApiResponse<Backlog> {
        self.client
            .mutate_with(
                Mutation::UpdateBacklogItem,
                Method::Put,
                &format!("/backlogs/{}", id),
                patch,
            )
            .await
    }

    pub async fn delete(self, id: i64) -> ApiResponse<()> {
        self.client
            .mutate::<Value>(
                Mutation::DeleteBacklogItem,
                Method::Delete,
                &format!("/backlogs/{}", id),
                None,
            )
            .await
            .map(|_| ())
    }
}
