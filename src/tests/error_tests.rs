use crate::error::{ErrorContext, TeammateError};
use crate::teammate_error;

#[test]
fn test_error_context_on_result() {
    let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "file not found"
    ));

    let teammate_result = result.context("Failed to read session file");
    match teammate_result {
        Err(TeammateError::Unknown(msg)) => {
            assert!(msg.contains("Failed to read session file"));
            assert!(msg.contains("file not found"));
        }
        _ => panic!("Expected TeammateError::Unknown"),
    }
}

#[test]
fn test_error_context_on_option() {
    let option: Option<String> = None;
    match option.context("No request selected") {
        Err(TeammateError::Unknown(msg)) => assert_eq!(msg, "No request selected"),
        _ => panic!("Expected TeammateError::Unknown"),
    }
}

#[test]
fn test_error_context_with_closure() {
    let result: Result<i32, std::io::Error> = Err(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "access denied"
    ));

    let teammate_result = result.with_context(|| format!("Failed to write {}", "/tmp/session.json"));
    match teammate_result {
        Err(TeammateError::Unknown(msg)) => {
            assert!(msg.contains("Failed to write /tmp/session.json"));
            assert!(msg.contains("access denied"));
        }
        _ => panic!("Expected TeammateError::Unknown"),
    }
}

#[test]
fn test_teammate_error_macro() {
    match teammate_error!(Forbidden, "Request belongs to someone else") {
        TeammateError::Forbidden(msg) => assert_eq!(msg, "Request belongs to someone else"),
        _ => panic!("Expected TeammateError::Forbidden"),
    }

    match teammate_error!(InvalidInput, "Unknown field: {}", "owner") {
        TeammateError::InvalidInput(msg) => assert_eq!(msg, "Unknown field: owner"),
        _ => panic!("Expected TeammateError::InvalidInput"),
    }
}

#[test]
fn test_network_classification() {
    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(TeammateError::from(json).is_network());
    assert!(!TeammateError::Rejected("nope".into()).is_network());
    assert!(!TeammateError::ApiError { status: 500, message: "boom".into() }.is_network());
}

#[test]
fn test_api_error_message() {
    let error = TeammateError::ApiError { status: 404, message: "Request not found".into() };
    assert_eq!(error.to_string(), "API request failed (404): Request not found");
}
