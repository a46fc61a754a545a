use teammate_finder::auth::AuthField;
use teammate_finder::{
    ApiClient, AuthApi, AuthGateway, LoginRequest, RequestRepository, SessionStore, TeamRequest, TeammateError,
    UniversityDirectory,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the one-shot server saw.
struct Captured {
    request_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Captured {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| pos + 4)
}

/// Serve exactly one HTTP request with the given status line and JSON body.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    serve_once_with_headers(status, &[], body).await
}

async fn serve_once_with_headers(
    status: &'static str,
    extra_headers: &'static [&'static str],
    body: &'static str,
) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed the connection before sending headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = find_header_end(&buf) {
                break end;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap_or_default().to_string();
        let headers: Vec<(String, String)> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
            .collect();

        let length = headers
            .iter()
            .find(|(key, _)| key == "content-length")
            .and_then(|(_, value)| value.parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < header_end + length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let end = (header_end + length).min(buf.len());
        let request_body = String::from_utf8_lossy(&buf[header_end..end]).to_string();

        let extra: String = extra_headers.iter().map(|h| format!("{}\r\n", h)).collect();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            extra,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        Captured {
            request_line,
            headers,
            body: request_body,
        }
    });

    (format!("http://{}/api", addr), handle)
}

const TWO_REQUESTS: &str = r#"[
    {"_id": "1", "userId": "u1", "userName": "Ada", "projectName": "Alpha", "courseName": "CS101",
     "semester": "Fall 2024", "description": "Need a backend dev", "endTime": "2024-12-01", "__v": 0},
    {"_id": "2", "userId": "u2", "userName": "Grace", "projectName": "Beta", "courseName": "CS202",
     "semester": "Fall 2024", "description": "", "endTime": "2024-12-15"}
]"#;

#[tokio::test]
async fn list_sends_bearer_token_and_json_content_type() {
    let (url, server) = serve_once("200 OK", TWO_REQUESTS).await;
    let client = ApiClient::new(url, Some("tok-123")).unwrap();

    let requests = client.list_requests().await.unwrap();
    let captured = server.await.unwrap();

    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].id.as_deref(), Some("1"));
    assert_eq!(requests[1].user_name, "Grace");
    assert_eq!(captured.request_line, "GET /api/team/requests HTTP/1.1");
    assert_eq!(captured.header("authorization"), Some("Bearer tok-123"));
    assert_eq!(captured.header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn create_posts_draft_without_id_and_expects_201() {
    let created = r#"{"_id": "new-1", "userId": "u1", "userName": "Ada", "projectName": "Gamma",
        "courseName": "", "semester": "", "description": "", "endTime": ""}"#;
    let (url, server) = serve_once("201 Created", created).await;
    let client = ApiClient::new(url, None).unwrap();

    let mut draft = TeamRequest::draft("u1", "Ada");
    draft.project_name = "Gamma".to_string();
    let result = client.create_request(&draft).await.unwrap();
    let captured = server.await.unwrap();

    assert_eq!(result.id.as_deref(), Some("new-1"));
    assert_eq!(captured.request_line, "POST /api/team/requests HTTP/1.1");
    assert!(captured.header("authorization").is_none());
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert!(sent.get("_id").is_none());
    assert_eq!(sent["userId"], "u1");
    assert_eq!(sent["projectName"], "Gamma");
}

#[tokio::test]
async fn create_with_wrong_success_status_is_an_error() {
    let (url, server) = serve_once("200 OK", r#"{"_id": "x"}"#).await;
    let client = ApiClient::new(url, None).unwrap();

    let result = client.create_request(&TeamRequest::draft("u1", "Ada")).await;
    server.await.unwrap();

    assert!(matches!(result, Err(TeammateError::ApiError { status: 200, .. })));
}

#[tokio::test]
async fn update_failure_carries_status_and_message() {
    let (url, server) = serve_once("404 Not Found", r#"{"message": "Request not found"}"#).await;
    let client = ApiClient::new(url, Some("tok")).unwrap();

    let request = TeamRequest {
        id: Some("abc".to_string()),
        ..TeamRequest::draft("u1", "Ada")
    };
    let result = client.update_request("abc", &request).await;
    let captured = server.await.unwrap();

    assert_eq!(captured.request_line, "PUT /api/team/requests/abc HTTP/1.1");
    match result {
        Err(TeammateError::ApiError { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Request not found");
        }
        other => panic!("expected ApiError, got {:?}", other.map(|r| r.id)),
    }
}

#[tokio::test]
async fn delete_hits_the_request_path() {
    let (url, server) = serve_once("200 OK", r#"{"message": "deleted"}"#).await;
    let client = ApiClient::new(url, Some("tok")).unwrap();

    client.delete_request("abc").await.unwrap();
    let captured = server.await.unwrap();

    assert_eq!(captured.request_line, "DELETE /api/team/requests/abc HTTP/1.1");
}

#[tokio::test]
async fn login_reads_business_failure_from_error_status() {
    let (url, server) = serve_once("401 Unauthorized", r#"{"success": false, "message": "Invalid credentials"}"#).await;
    let client = ApiClient::new(url, None).unwrap();

    let response = client
        .login(&LoginRequest {
            email: "ada@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap();
    let captured = server.await.unwrap();

    assert!(!response.success);
    assert_eq!(response.message.as_deref(), Some("Invalid credentials"));
    assert_eq!(captured.request_line, "POST /api/login HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent, serde_json::json!({"email": "ada@example.com", "password": "wrong"}));
}

#[tokio::test]
async fn login_identity_comes_from_cookies() {
    let (url, server) = serve_once_with_headers(
        "200 OK",
        &[
            "Set-Cookie: uid=665f00aa; Path=/",
            "Set-Cookie: username=Ada%20Lovelace; Path=/",
        ],
        r#"{"success": true, "token": "tok", "message": "Login successful"}"#,
    )
    .await;
    let client = ApiClient::new(url, None).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));

    let mut gateway = AuthGateway::new();
    gateway.set_field(AuthField::Email, "ada@uni.edu");
    gateway.set_field(AuthField::Password, "secret");
    let session = gateway.login(&client, &store).await.unwrap();
    server.await.unwrap();

    assert_eq!(session.user_id, "665f00aa");
    assert_eq!(session.user_name, "Ada Lovelace");
    assert_eq!(session.token.as_deref(), Some("tok"));
    assert_eq!(store.load().unwrap(), Some(session));
}

#[tokio::test]
async fn login_body_identity_wins_over_cookies() {
    let (url, server) = serve_once_with_headers(
        "200 OK",
        &["Set-Cookie: uid=from-cookie"],
        r#"{"success": true, "token": "tok", "uid": 7, "username": "Ada"}"#,
    )
    .await;
    let client = ApiClient::new(url, None).unwrap();

    let response = client
        .login(&LoginRequest {
            email: "ada@uni.edu".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    server.await.unwrap();

    assert_eq!(response.user_id.as_deref(), Some("7"));
    assert_eq!(response.user_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn universities_are_listed() {
    let (url, server) = serve_once("200 OK", r#"[{"name": "MIT"}, {"name": "ETH Zurich"}]"#).await;
    let client = ApiClient::new(url, None).unwrap();

    let universities = client.list_universities().await.unwrap();
    let captured = server.await.unwrap();

    assert_eq!(captured.request_line, "GET /api/unilist HTTP/1.1");
    let names: Vec<&str> = universities.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["MIT", "ETH Zurich"]);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(format!("http://{}/api", addr), None).unwrap();
    let error = client.list_universities().await.unwrap_err();
    assert!(error.is_network());
}
