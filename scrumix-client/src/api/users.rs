use crate::client::ApiClient;
use crate::envelope::ApiResponse;
use crate::invalidation::Mutation;
use crate::key::{Operation, Resource};
use crate::models::user::{ProfileUpdate, User};
use crate::transport::Method;
use serde_json::Value;
use utils::QueryParams;

pub const CURRENT: Operation = Operation::new(Resource::Users, "current");

#[derive(Clone, Copy)]
pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn current(self) -> ApiResponse<User> {
        self.client
            .read(CURRENT, "/users/me", QueryParams::new())
            .await
    }

    pub async fn update_profile(self, update: &ProfileUpdate) -> ApiResponse<User> {
        self.client
            .mutate_with(Mutation::UpdateProfile, Method::Put, "/users/me", update)
            .await
    }

    pub async fn delete_account(self) -> ApiResponse<()> {
        self.client
            .mutate::<Value>(Mutation::DeleteAccount, Method::Delete, "/users/me", None)
            .await
            .map(|_| ())
    }
}
