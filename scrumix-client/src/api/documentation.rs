use crate::client::{with_deadline, ApiClient};
use crate::envelope::ApiResponse;
use crate::key::{Operation, Resource};
use crate::models::documentation::{SearchRequest, SearchResults};

pub const SEARCH: Operation = Operation::new(Resource::Documentation, "search");

#[derive(Clone, Copy)]
pub struct DocumentationApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DocumentationApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Semantic, keyword or hybrid search over project documentation.
    /// Bounded by the configured search deadline.
    pub async fn search(self, mut request: SearchRequest) -> ApiResponse<SearchResults> {
        request.project_id = request.project_id.or(*self.client.session().project_id());
        with_deadline(
            self.client.config().search_timeout(),
            self.client.query(SEARCH, "/semantic-search/search", &request),
        )
        .await
    }
}
