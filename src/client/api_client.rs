use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::traits::{AuthApi, RequestRepository, UniversityDirectory};
use crate::constants::{LOGIN_PATH, REGISTER_PATH, TEAM_REQUESTS_PATH, UNIVERSITIES_PATH};
use crate::error::{TeammateError, TeammateResult};
use crate::logging::{log_debug, log_error};
use crate::models::*;

/// HTTP client for the team-mate finder REST backend.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<&str>) -> TeammateResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| TeammateError::InvalidInput("Invalid auth token format".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request_url(&self, id: &str) -> String {
        format!("{}{}/{}", self.base_url, TEAM_REQUESTS_PATH, id)
    }

    /// Send and decode the body, insisting on one exact success status.
    async fn expect_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> TeammateResult<T> {
        let response = request.send().await?;
        let response = Self::check_status(response, expected).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send and decode the body whatever the status: the auth endpoints put
    /// `success: false` and a message in 4xx bodies.
    async fn lenient_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> TeammateResult<T> {
        Self::decode_lenient(request.send().await?).await
    }

    async fn decode_lenient<T: DeserializeOwned>(response: Response) -> TeammateResult<T> {
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<T>(&body) {
            Ok(value) => Ok(value),
            Err(e) if status.is_success() => Err(e.into()),
            Err(_) => Err(TeammateError::ApiError {
                status: status.as_u16(),
                message: extract_message(&body),
            }),
        }
    }

    async fn check_status(response: Response, expected: StatusCode) -> TeammateResult<Response> {
        let status = response.status();
        if status == expected {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        log_error(&format!("Expected HTTP {} but got {}: {}", expected.as_u16(), status, body));
        Err(TeammateError::ApiError {
            status: status.as_u16(),
            message: extract_message(&body),
        })
    }
}

/// The `uid` / `username` cookies the backend sets on a successful login.
#[derive(Debug, Default)]
struct CookieIdentity {
    user_id: Option<String>,
    user_name: Option<String>,
}

impl CookieIdentity {
    fn from_response(response: &Response) -> Self {
        let mut identity = Self::default();
        for cookie in response.cookies() {
            let value = decode_cookie_value(cookie.value());
            if value.is_empty() {
                continue;
            }
            match cookie.name() {
                "uid" => identity.user_id = Some(value),
                "username" => identity.user_name = Some(value),
                _ => {}
            }
        }
        identity
    }
}

/// Undo the `%XX` escaping web frameworks apply to cookie values.
fn decode_cookie_value(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let escaped = if bytes[i] == b'%' {
            raw.get(i + 1..i + 3).and_then(|hex| u8::from_str_radix(hex, 16).ok())
        } else {
            None
        };
        match escaped {
            Some(byte) => {
                decoded.push(byte);
                i += 3;
            }
            None => {
                decoded.push(bytes[i]);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

/// The `message` of a JSON error body, or the raw body.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "empty response body".to_string()
            } else {
                body.trim().to_string()
            }
        })
}

#[async_trait]
impl RequestRepository for ApiClient {
    async fn list_requests(&self) -> TeammateResult<Vec<TeamRequest>> {
        log_debug("GET team requests");
        self.expect_json(self.client.get(self.url(TEAM_REQUESTS_PATH)), StatusCode::OK)
            .await
    }

    async fn create_request(&self, draft: &TeamRequest) -> TeammateResult<TeamRequest> {
        log_debug(&format!("POST team request '{}'", draft.project_name));
        self.expect_json(
            self.client.post(self.url(TEAM_REQUESTS_PATH)).json(draft),
            StatusCode::CREATED,
        )
        .await
    }

    async fn update_request(&self, id: &str, request: &TeamRequest) -> TeammateResult<TeamRequest> {
        log_debug(&format!("PUT team request {}", id));
        self.expect_json(self.client.put(self.request_url(id)).json(request), StatusCode::OK)
            .await
    }

    async fn delete_request(&self, id: &str) -> TeammateResult<()> {
        log_debug(&format!("DELETE team request {}", id));
        let response = self.client.delete(self.request_url(id)).send().await?;
        Self::check_status(response, StatusCode::OK).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, body: &LoginRequest) -> TeammateResult<LoginResponse> {
        log_debug(&format!("POST login for {}", body.email));
        let response = self.client.post(self.url(LOGIN_PATH)).json(body).send().await?;
        let identity = CookieIdentity::from_response(&response);
        let mut login: LoginResponse = Self::decode_lenient(response).await?;

        if login.user_id.as_deref().map_or(true, str::is_empty) {
            login.user_id = identity.user_id;
        }
        if login.user_name.as_deref().map_or(true, str::is_empty) {
            login.user_name = identity.user_name;
        }
        Ok(login)
    }

    async fn register(&self, body: &RegisterRequest) -> TeammateResult<RegisterResponse> {
        log_debug(&format!("POST register for {}", body.email));
        self.lenient_json(self.client.post(self.url(REGISTER_PATH)).json(body)).await
    }
}

#[async_trait]
impl UniversityDirectory for ApiClient {
    async fn list_universities(&self) -> TeammateResult<Vec<University>> {
        self.expect_json(self.client.get(self.url(UNIVERSITIES_PATH)), StatusCode::OK)
            .await
    }
}
