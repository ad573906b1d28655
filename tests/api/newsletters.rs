use serde_json::{json, Value};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::TestApp;

#[tokio::test]
async fn preview_returns_title_image_and_html() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_newsletter_preview(json!({
            "content": "<p>A short intro</p><img src='https://cdn.test/a.png'>",
            "subtitle": "Weekly"
        }))
        .await;

    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["title"], "A short intro");
    assert_eq!(body["imageUrl"], "https://cdn.test/a.png");
    assert!(body["html"].as_str().unwrap().contains("Weekly"));
}

#[tokio::test]
async fn preview_returns_400_for_blank_content() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_newsletter_preview(json!({"content": "   "}))
        .await;

    assert_eq!(400, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Newsletter content is required");
}

#[tokio::test]
async fn newsletters_are_delivered_to_active_subscribers_only() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .insert_subscriber("Alice", "alice@test.com", "active")
        .await;
    test_app
        .insert_subscriber("Bob", "bob@test.com", "inactive")
        .await;
    test_app
        .insert_subscriber("Carol", "carol@test.com", "unsubscribed")
        .await;

    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_newsletter(json!({
            "subject": "Monthly news",
            "content": "<h2>Hello</h2><p>Body</p>"
        }))
        .await;

    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["recipientsCount"], 1);

    let requests = test_app.email_server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["personalizations"][0]["to"][0]["email"], "alice@test.com");
    assert_eq!(sent["personalizations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn newsletters_are_not_delivered_without_active_subscribers() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .insert_subscriber("Bob", "bob@test.com", "inactive")
        .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_newsletter(json!({"subject": "Monthly news", "content": "<p>Body</p>"}))
        .await;

    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["recipientsCount"], 0);
}

#[tokio::test]
async fn newsletters_returns_400_for_invalid_data() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (json!({"content": "<p>Body</p>"}), "missing subject"),
        (json!({"subject": "Monthly news"}), "missing content"),
        (json!({"subject": " ", "content": " "}), "blank subject and content"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_newsletter(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn newsletters_returns_500_when_the_email_api_fails() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .insert_subscriber("Alice", "alice@test.com", "active")
        .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app
        .post_newsletter(json!({"subject": "Monthly news", "content": "<p>Body</p>"}))
        .await;

    assert_eq!(500, response.status().as_u16());
}
