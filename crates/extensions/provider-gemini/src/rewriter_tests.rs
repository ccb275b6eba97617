use super::*;
use promptassist_settings_store::MemoryCredentialStore;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

fn rewriter(base_url: &str, store: MemoryCredentialStore) -> GeminiRewriter {
    let config = ProviderConfig {
        base_url: base_url.to_string(),
        ..ProviderConfig::default()
    };
    GeminiRewriter::from_config(&config, Arc::new(store)).unwrap()
}

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    }))
}

#[test]
fn test_rewriter_identity() {
    let rewriter = rewriter("http://localhost", MemoryCredentialStore::new());
    assert_eq!(rewriter.id(), "gemini");
    assert_eq!(rewriter.model(), "gemini-2.0-flash");
}

#[tokio::test]
async fn test_improve_success() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/models/gemini-2.0-flash:generateContent"))
        .and(matchers::query_param("key", "secret"))
        .and(matchers::body_string_contains("User Prompt: \\\"say hi\\\""))
        .respond_with(reply(
            "<EnhancedPrompt>\nSay hi clearly.\n</EnhancedPrompt>\n<AnalysisSummary>Clearer task.</AnalysisSummary>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let rewriter = rewriter(&server.uri(), MemoryCredentialStore::with_credential("secret"));
    let result = rewriter.improve("  say hi  ").await.unwrap();
    assert_eq!(result, RewriteResult::new("Say hi clearly.", "Clearer task."));
}

#[tokio::test]
async fn test_reply_without_sections_is_empty_result() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(reply("I cannot help with that."))
        .mount(&server)
        .await;

    let rewriter = rewriter(&server.uri(), MemoryCredentialStore::with_credential("k"));
    let result = rewriter.improve("x").await.unwrap();
    assert!(!result.is_valid());
}

#[tokio::test]
async fn test_blank_prompt_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(matchers::any())
        .respond_with(reply(""))
        .expect(0)
        .mount(&server)
        .await;

    let rewriter = rewriter(&server.uri(), MemoryCredentialStore::with_credential("k"));
    let err = rewriter.improve(" \n ").await.unwrap_err();
    assert_eq!(err.to_string(), "Please provide a non-empty prompt");
}

#[tokio::test]
async fn test_missing_credential_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(matchers::any())
        .respond_with(reply(""))
        .expect(0)
        .mount(&server)
        .await;

    let rewriter = rewriter(&server.uri(), MemoryCredentialStore::new());
    let err = rewriter.improve("hello").await.unwrap_err();
    assert_eq!(err, RewriteError::MissingCredential);
    assert_eq!(
        err.to_string(),
        "Gemini API key not found. Please set it in the extension settings."
    );
}

#[tokio::test]
async fn test_api_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": {"code": 500, "message": "500", "status": "INTERNAL"}
        })))
        .mount(&server)
        .await;

    let rewriter = rewriter(&server.uri(), MemoryCredentialStore::with_credential("k"));
    let err = rewriter.improve("hello").await.unwrap_err();
    assert_eq!(err.to_string(), "API error: 500");
}
