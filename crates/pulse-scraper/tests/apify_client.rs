use pulse_scraper::{ApifyClient, ScraperError};
use serde_json::json;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> ApifyClient {
    ApifyClient::new("apify_api_testtoken", 5, 2, 0)
        .expect("client builds")
        .with_base_url(&server.uri())
}

#[tokio::test]
async fn run_actor_sync_returns_dataset_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(
            "/v2/acts/harvestapi~linkedin-post-search/run-sync-get-dataset-items",
        ))
        .and(bearer_token("apify_api_testtoken"))
        .and(body_partial_json(json!({"searchQueries": ["rsu taxes"]})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([{"id": "a"}, {"id": "b"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let items = client
        .run_actor_sync(
            "harvestapi~linkedin-post-search",
            &json!({"searchQueries": ["rsu taxes"], "maxPosts": 20}),
            20,
        )
        .await
        .expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "a");
}

#[tokio::test]
async fn rate_limit_is_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "late"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let items = client
        .run_actor_sync("apidojo~tweet-scraper", &json!({}), 15)
        .await
        .expect("retry should recover");
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn rate_limit_surfaces_after_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .run_actor_sync("apidojo~tweet-scraper", &json!({}), 15)
        .await
        .expect_err("budget exhausted");
    assert!(matches!(err, ScraperError::RateLimited { .. }));
}

#[tokio::test]
async fn missing_actor_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .run_actor_sync("nobody~gone-actor", &json!({}), 10)
        .await
        .expect_err("404 is terminal");
    assert!(matches!(err, ScraperError::ActorNotFound { actor } if actor == "nobody~gone-actor"));
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .run_actor_sync("clockworks~tiktok-scraper", &json!({}), 10)
        .await
        .expect_err("500 is terminal");
    assert!(matches!(err, ScraperError::UnexpectedStatus { status: 500, .. }));
}

#[tokio::test]
async fn non_array_body_is_a_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "oops"})))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .run_actor_sync("harvestapi~linkedin-post-search", &json!({}), 10)
        .await
        .expect_err("object body is invalid");
    assert!(matches!(err, ScraperError::Deserialize { .. }));
}
