// Integration tests for the report provider chain

use licensure_algo::models::{
    BusinessProfile, BusinessSize, GeneratorMode, MatchedRequirement, Priority, ProviderKind,
};
use licensure_algo::services::{GeminiClient, OpenAiClient, ReportService};

fn business() -> BusinessProfile {
    BusinessProfile {
        business_name: "מסעדת הנמל".to_string(),
        size: BusinessSize::Medium,
        seats: 60,
        area_sqm: 150,
        staff_count: 7,
        features: ["gas", "meat"].iter().map(|f| f.to_string()).collect(),
    }
}

fn matches() -> Vec<MatchedRequirement> {
    vec![
        MatchedRequirement {
            id: "gas_safety".to_string(),
            title: "בטיחות גז".to_string(),
            category: "בטיחות".to_string(),
            priority: Priority::High,
            description: "דרישות בטיחות למערכות גז".to_string(),
            reasons: vec!["feature 'gas' present ⇒ features_any".to_string()],
        },
        MatchedRequirement {
            id: "meat_handling".to_string(),
            title: "טיפול בבשר".to_string(),
            category: "היגיינה".to_string(),
            priority: Priority::High,
            description: "דרישות היגיינה לטיפול בבשר".to_string(),
            reasons: vec!["feature 'meat' present ⇒ features_any".to_string()],
        },
    ]
}

fn service_with_gemini(base_url: String, api_key: Option<String>) -> ReportService {
    ReportService::with_clients(
        ProviderKind::Gemini,
        GeminiClient::with_base_url(base_url, api_key, 5),
        OpenAiClient::new(None, "gpt-4o-mini".to_string(), 5),
    )
}

#[tokio::test]
async fn test_gemini_success_returns_live_metadata() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", mockito::Matcher::Regex(r"^/v1beta/models/.*:generateContent(\?.*)?$".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"דוח חי"}]}}]}"#)
        .create_async()
        .await;

    let service = service_with_gemini(server.url(), Some("test-key".to_string()));
    let outcome = service.generate(&business(), &matches()).await;

    mock.assert_async().await;
    assert_eq!(outcome.report, "דוח חי");
    assert_eq!(outcome.metadata.mode, GeneratorMode::Live);
    assert_eq!(outcome.metadata.provider, ProviderKind::Gemini);
    assert!(outcome.metadata.model.is_some());
    assert!(outcome.metadata.fallback_reason.is_none());
}

#[tokio::test]
async fn test_gemini_http_error_falls_back_to_offline() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", mockito::Matcher::Regex(r"^/v1beta/models/.*:generateContent(\?.*)?$".to_string()))
        .with_status(502)
        .with_body("bad gateway")
        .expect(1)
        .create_async()
        .await;

    let service = service_with_gemini(server.url(), Some("test-key".to_string()));
    let outcome = service.generate(&business(), &matches()).await;

    // Exactly one attempt, no retry, then the offline report
    mock.assert_async().await;
    assert_eq!(outcome.metadata.mode, GeneratorMode::Mock);
    assert_eq!(outcome.metadata.fallback_reason.as_deref(), Some("http_502"));
    assert!(!outcome.report.is_empty());
    // Offline report is grouped by category
    assert!(outcome.report.contains("בטיחות"));
    assert!(outcome.report.contains("היגיינה"));
}

#[tokio::test]
async fn test_gemini_empty_body_falls_back_to_offline() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", mockito::Matcher::Regex(r"^/v1beta/models/.*:generateContent(\?.*)?$".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[]}"#)
        .create_async()
        .await;

    let service = service_with_gemini(server.url(), Some("test-key".to_string()));
    let outcome = service.generate(&business(), &matches()).await;

    assert_eq!(outcome.metadata.mode, GeneratorMode::Mock);
    assert_eq!(outcome.metadata.fallback_reason.as_deref(), Some("empty_response"));
}

#[tokio::test]
async fn test_missing_credential_falls_back_without_calling_out() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let service = service_with_gemini(server.url(), None);
    let outcome = service.generate(&business(), &matches()).await;

    mock.assert_async().await;
    assert_eq!(outcome.metadata.mode, GeneratorMode::Mock);
    assert_eq!(outcome.metadata.provider, ProviderKind::Gemini);
    assert_eq!(outcome.metadata.fallback_reason.as_deref(), Some("missing_key"));
}

#[tokio::test]
async fn test_gemini_unreachable_endpoint_falls_back_to_offline() {
    // Port 9 (discard) has no listener; the connection is refused
    let service = service_with_gemini("http://127.0.0.1:9".to_string(), Some("test-key".to_string()));
    let outcome = service.generate(&business(), &matches()).await;

    assert_eq!(outcome.metadata.mode, GeneratorMode::Mock);
    assert_eq!(outcome.metadata.provider, ProviderKind::Gemini);
    assert_eq!(outcome.metadata.fallback_reason.as_deref(), Some("transport"));
    assert!(!outcome.report.is_empty());
    assert!(outcome.report.contains("בטיחות"));
}

#[tokio::test]
async fn test_gemini_timeout_falls_back_with_timeout_reason() {
    // A bound socket that never answers makes the client timeout fire
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let service = ReportService::with_clients(
        ProviderKind::Gemini,
        GeminiClient::with_base_url(base_url, Some("test-key".to_string()), 1),
        OpenAiClient::new(None, "gpt-4o-mini".to_string(), 1),
    );
    let outcome = service.generate(&business(), &matches()).await;
    drop(listener);

    assert_eq!(outcome.metadata.mode, GeneratorMode::Mock);
    assert_eq!(outcome.metadata.provider, ProviderKind::Gemini);
    assert_eq!(outcome.metadata.fallback_reason.as_deref(), Some("timeout"));
    assert!(!outcome.report.is_empty());
}

#[tokio::test]
async fn test_openai_success_reports_configured_model() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"דוח OpenAI"}}]}"#)
        .create_async()
        .await;

    let service = ReportService::with_clients(
        ProviderKind::OpenAi,
        GeminiClient::new(None, 5),
        OpenAiClient::with_base_url(server.url(), Some("sk-test".to_string()), "gpt-4o-mini".to_string(), 5),
    );
    let outcome = service.generate(&business(), &matches()).await;

    mock.assert_async().await;
    assert_eq!(outcome.report, "דוח OpenAI");
    assert_eq!(outcome.metadata.mode, GeneratorMode::Live);
    assert_eq!(outcome.metadata.provider, ProviderKind::OpenAi);
    assert_eq!(outcome.metadata.model.as_deref(), Some("gpt-4o-mini"));
}

#[tokio::test]
async fn test_offline_only_configuration_is_idempotent() {
    let service = ReportService::with_clients(
        ProviderKind::Mock,
        GeminiClient::new(None, 5),
        OpenAiClient::new(None, "gpt-4o-mini".to_string(), 5),
    );

    let b = business();
    let m = matches();
    let first = service.generate(&b, &m).await;
    let second = service.generate(&b, &m).await;

    assert_eq!(first.report, second.report);
    assert_eq!(first.metadata, second.metadata);
    assert_eq!(first.metadata.mode, GeneratorMode::Mock);
    assert_eq!(first.metadata.provider, ProviderKind::Mock);
    assert!(first.metadata.fallback_reason.is_none());
}
