use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::invalidation::Mutation;
use crate::key::{Operation, Resource};
use crate::models::backlog::Backlog;
use crate::models::sprint::{Sprint, SprintCreate, SprintFilter, SprintUpdate};
use crate::transport::Method;
use serde_json::Value;
use utils::QueryParams;

pub const LIST: Operation = Operation::new(Resource::Sprints, "list");
pub const DETAIL: Operation = Operation::new(Resource::Sprints, "detail");
pub const SPRINT_BACKLOG: Operation = Operation::new(Resource::Sprints, "backlog");

#[derive(Clone, Copy)]
pub struct SprintsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SprintsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(self, filter: &SprintFilter) -> ApiResponse<Vec<Sprint>> {
        let query = filter.to_query(*self.client.session().project_id());
        self.client.read(LIST, "/sprints/", query).await
    }

    pub async fn get(self, id: i64) -> ApiResponse<Sprint> {
        self.client
            .read(DETAIL, &format!("/sprints/{}", id), QueryParams::new())
            .await
    }

    /// Items assigned to the sprint
    pub async fn backlog(self, id: i64) -> ApiResponse<Vec<Backlog>> {
        self.client
            .read(SPRINT_BACKLOG, &format!("/sprints/{}/backlog", id), QueryParams::new())
            .await
    }

    pub async fn create(self, mut sprint: SprintCreate) -> ApiResponse<Sprint> {
        sprint.project_id = sprint.project_id.or(*self.client.session().project_id());
        self.client
            .mutate_with(Mutation::CreateSprint, Method::Post, "/sprints/", &sprint)
            .await
    }

    pub async fn update(self, id: i64, patch: &SprintUpdate) -> ApiResponse<Sprint> {
        self.client
            .mutate_with(
                Mutation::UpdateSprint,
                Method::Put,
                &format!("/sprints/{}", id),
                patch,
            )
            .await
    }

    pub async fn delete(self, id: i64) -> ApiResponse<()> {
        self.client
            .mutate::<Value>(
                Mutation::DeleteSprint,
                Method::Delete,
                &format!("/sprints/{}", id),
                None,
            )
            .await
            .map(|_| ())
    }
}
