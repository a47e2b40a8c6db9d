use std::fs;
use reqwest::StatusCode;
use serde_json::json;
use crate::app_name::AppName;
use crate::config::ServiceConfig;
use crate::icon_service::IconService;
use crate::openai_service::OpenAIService;
use crate::remote_error::RemoteError;
use crate::screenshot::Screenshot;
use crate::theme::Theme;
use crate::tests::init;

const OPENAI_API_KEY: &str = "[redacted]";
const SCREENSHOT_ENV: &str = "MMICONS_TEST_SCREENSHOT";

#[test]
fn test_parse_names_response_splits_content() {
    init();

    let json = json!({
        "choices": [ { "message": { "role": "assistant", "content": "Mail, Maps , Notes" } } ]
    });

    let names = OpenAIService::parse_names_response(StatusCode::OK, &json).unwrap();

    assert_eq!(names, vec![AppName::from("Mail"), AppName::from("Maps"), AppName::from("Notes")]);
}

#[test]
fn test_parse_names_response_with_error_payload_is_network_error() {
    init();

    let json = json!({ "error": { "message": "invalid image", "type": "invalid_request_error" } });

    let result = OpenAIService::parse_names_response(StatusCode::OK, &json);

    assert!(matches!(result, Err(RemoteError::Network(_))));
}

#[test]
fn test_parse_names_response_with_bad_status_is_network_error() {
    init();

    let json = json!({ "choices": [] });

    let result = OpenAIService::parse_names_response(StatusCode::INTERNAL_SERVER_ERROR, &json);

    assert!(matches!(result, Err(RemoteError::Network(_))));
}

#[test]
fn test_parse_names_response_without_content_is_network_error() {
    init();

    let json = json!({ "choices": [ { "message": { "role": "assistant" } } ] });

    let result = OpenAIService::parse_names_response(StatusCode::OK, &json);

    assert!(matches!(result, Err(RemoteError::Network(_))));
}

#[test]
fn test_parse_names_response_ignores_null_error() {
    init();

    let json = json!({
        "error": null,
        "choices": [ { "message": { "content": "Photos" } } ]
    });

    let names = OpenAIService::parse_names_response(StatusCode::OK, &json).unwrap();

    assert_eq!(names, vec![AppName::from("Photos")]);
}

#[test]
fn test_parse_generation_response_returns_url() {
    init();

    let body = r#"{"created": 1, "data": [{"url": "https://images.example.com/icon.png"}]}"#;

    let url = OpenAIService::parse_generation_response(StatusCode::OK, body).unwrap();

    assert_eq!(url, "https://images.example.com/icon.png");
}

#[test]
fn test_parse_generation_response_429_is_rate_limit() {
    init();

    let result = OpenAIService::parse_generation_response(StatusCode::TOO_MANY_REQUESTS, "");

    assert_eq!(result, Err(RemoteError::RateLimitExceeded));
}

#[test]
fn test_parse_generation_response_rate_limit_code_is_rate_limit() {
    init();

    let body = r#"{"error": {"message": "Rate limit reached", "type": "requests", "code": "rate_limit_exceeded"}}"#;

    let result = OpenAIService::parse_generation_response(StatusCode::BAD_REQUEST, body);

    assert_eq!(result, Err(RemoteError::RateLimitExceeded));
}

#[test]
fn test_parse_generation_response_error_payload_is_api_error() {
    init();

    let body = r#"{"error": {"message": "Your request was rejected", "type": "invalid_request_error", "code": null}}"#;

    let result = OpenAIService::parse_generation_response(StatusCode::BAD_REQUEST, body);

    assert_eq!(result, Err(RemoteError::Api("Your request was rejected".to_string())));
}

#[test]
fn test_parse_generation_response_not_json_is_decoding_error() {
    init();

    let result = OpenAIService::parse_generation_response(StatusCode::OK, "<html>oops</html>");

    assert!(matches!(result, Err(RemoteError::Decoding(_))));
}

#[test]
fn test_parse_generation_response_not_json_with_bad_status_is_api_error() {
    init();

    let result = OpenAIService::parse_generation_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");

    assert!(matches!(result, Err(RemoteError::Api(_))));
}

#[test]
fn test_parse_generation_response_without_url_is_no_data() {
    init();

    let result = OpenAIService::parse_generation_response(StatusCode::OK, r#"{"data": []}"#);

    assert_eq!(result, Err(RemoteError::NoData));
}

#[ignore]
#[test]
fn test_openai_extract_and_generate() -> Result<(), RemoteError> {
    init();

    let service = OpenAIService::new(ServiceConfig::new(OPENAI_API_KEY))?;
    let bytes = fs::read(std::env::var(SCREENSHOT_ENV).unwrap()).unwrap();
    let screenshot = Screenshot::from_bytes(&bytes).unwrap();

    let names = service.extract_names(&screenshot)?;
    println!("names: {:?}", names);

    if let Some(name) = names.first() {
        let icon = service.generate_icon(name, &Theme::new("flat").unwrap())?;
        println!("icon: {} bytes", icon.len());
    }

    Ok(())
}
