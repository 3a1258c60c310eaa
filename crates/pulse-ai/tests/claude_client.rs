use chrono::Utc;
use pulse_ai::{score_content, AiError, ClaudeClient};
use pulse_db::content_feed::ContentFeedRow;
use pulse_db::profile::AdvisorProfileRow;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> ClaudeClient {
    ClaudeClient::new("sk-ant-test", 5)
        .expect("client builds")
        .with_base_url(&server.uri())
}

fn unscored_row() -> ContentFeedRow {
    ContentFeedRow {
        id: 7,
        external_id: "urn:li:activity:1".into(),
        platform: "linkedin".into(),
        creator_name: "Jane Creator".into(),
        creator_handle: String::new(),
        post_text: "RSU vesting schedules and quarterly estimated taxes.".into(),
        url: "https://example.com/p/7".into(),
        likes: 210,
        comments: 12,
        shares: 4,
        scraped_at: Utc::now(),
        expertise_signal: None,
        icp_relevance: None,
        suggested_angle: None,
        scored_at: None,
        draft_text: None,
        draft_topic_tags: None,
        draft_hook_type: None,
        draft_image_hint: None,
        draft_hashtags: None,
        draft_source_urls: None,
        draft_continuity_ref: None,
        draft_status: "pending".into(),
    }
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn"
    }))
}

#[tokio::test]
async fn score_content_parses_bare_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({"model": "scoring-model"})))
        .respond_with(text_response(
            "{\"expertise_signal\": 55, \"icp_relevance\": 80, \"suggested_angle\": \"Riff on vesting timing.\"}",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let score = score_content(
        &client,
        "scoring-model",
        &unscored_row(),
        &AdvisorProfileRow::default(),
    )
    .await
    .expect("score");
    assert_eq!(score.expertise_signal, 55);
    assert_eq!(score.icp_relevance, 80);
    assert_eq!(score.suggested_angle, "Riff on vesting timing.");
}

#[tokio::test]
async fn score_content_strips_markdown_fences_and_clamps() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response(
            "```json\n{\"expertise_signal\": 140, \"icp_relevance\": -3, \"suggested_angle\": \"x\"}\n```",
        ))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let score = score_content(
        &client,
        "scoring-model",
        &unscored_row(),
        &AdvisorProfileRow::default(),
    )
    .await
    .expect("score");
    assert_eq!(score.expertise_signal, 100);
    assert_eq!(score.icp_relevance, 0);
}

#[tokio::test]
async fn api_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .complete("scoring-model", 200, "hello")
        .await
        .expect_err("529 is an error");
    assert!(matches!(err, AiError::Api { status: 529, message } if message == "overloaded"));
}

#[tokio::test]
async fn missing_text_block_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .complete("scoring-model", 200, "hello")
        .await
        .expect_err("no text block");
    assert!(matches!(err, AiError::EmptyResponse));
}

#[tokio::test]
async fn non_json_score_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(text_response("I would rate this post quite highly."))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = score_content(
        &client,
        "scoring-model",
        &unscored_row(),
        &AdvisorProfileRow::default(),
    )
    .await
    .expect_err("prose is not a score");
    assert!(matches!(err, AiError::Parse { .. }));
}
