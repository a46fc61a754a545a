use async_trait::async_trait;

use crate::error::TeammateResult;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, TeamRequest, University};

/// CRUD over the remote collection of team requests.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn list_requests(&self) -> TeammateResult<Vec<TeamRequest>>;

    /// Post a draft; returns the record as created by the server.
    async fn create_request(&self, draft: &TeamRequest) -> TeammateResult<TeamRequest>;

    /// Replace the request `id`; returns the record as stored by the server.
    async fn update_request(&self, id: &str, request: &TeamRequest) -> TeammateResult<TeamRequest>;

    async fn delete_request(&self, id: &str) -> TeammateResult<()>;
}

/// Credential endpoints. Business failures are reported in the response body, not as errors.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, body: &LoginRequest) -> TeammateResult<LoginResponse>;
    async fn register(&self, body: &RegisterRequest) -> TeammateResult<RegisterResponse>;
}

#[async_trait]
pub trait UniversityDirectory: Send + Sync {
    async fn list_universities(&self) -> TeammateResult<Vec<University>>;
}
