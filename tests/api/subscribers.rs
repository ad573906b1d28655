use claim::assert_matches;
use serde_json::{json, Value};

use newsletter_dashboard::domain::new_subscriber::NewSubscriber;
use newsletter_dashboard::domain::subscriber_email::SubscriberEmail;
use newsletter_dashboard::domain::subscriber_name::SubscriberName;
use newsletter_dashboard::routes::{insert_subscriber, AddSubscriberError};

use crate::helpers::TestApp;

fn names(body: &Value) -> Vec<String> {
    body["subscribers"]
        .as_array()
        .expect("Missing subscribers list.")
        .iter()
        .map(|subscriber| subscriber["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn add_subscriber_returns_201_and_persists_it() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_add_subscriber(json!({"name": "Ada Lovelace", "email": "ada@test.com"}))
        .await;

    assert_eq!(201, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Subscriber added successfully");
    assert_eq!(body["subscriber"]["email"], "ada@test.com");
    assert_eq!(body["subscriber"]["status"], "active");

    let saved: (String, String, String) =
        sqlx::query_as("SELECT name, email, status FROM subscribers")
            .fetch_one(&test_app.db_pool)
            .await
            .expect("Failed to fetch saved subscriber.");

    assert_eq!(
        saved,
        (
            String::from("Ada Lovelace"),
            String::from("ada@test.com"),
            String::from("active")
        )
    );
}

#[tokio::test]
async fn add_subscriber_accepts_the_nombre_field() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_add_subscriber(json!({"nombre": "Ana López", "email": "ana@test.com"}))
        .await;

    assert_eq!(201, response.status().as_u16());

    let saved: (String,) = sqlx::query_as("SELECT name FROM subscribers WHERE email = $1")
        .bind("ana@test.com")
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Failed to fetch saved subscriber.");

    assert_eq!(saved.0, "Ana López");
}

#[tokio::test]
async fn add_subscriber_returns_400_when_data_is_invalid() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (json!({"email": "ada@test.com"}), "Name and email are required"),
        (json!({"name": "Ada"}), "Name and email are required"),
        (json!({"name": "  ", "email": "ada@test.com"}), "Name and email are required"),
        (json!({"name": "Ada", "email": "not-an-email"}), "Invalid email format"),
    ];

    for (invalid_body, expected_error) in test_cases {
        let response = test_app.post_add_subscriber(invalid_body.clone()).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 when the payload was {}.",
            invalid_body
        );

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], expected_error);
    }
}

#[tokio::test]
async fn add_subscriber_returns_409_when_email_is_taken() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .insert_subscriber("Ada Lovelace", "ada@test.com", "active")
        .await;

    for email in ["ada@test.com", "ADA@Test.com"] {
        let response = test_app
            .post_add_subscriber(json!({"name": "Someone Else", "email": email}))
            .await;

        assert_eq!(409, response.status().as_u16());

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Email is already registered");
    }
}

#[tokio::test]
async fn insert_reports_a_unique_violation_as_duplicate() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .insert_subscriber("Ada Lovelace", "ada@test.com", "active")
        .await;

    // Skips the lookup done by the handler, so only the database constraint can catch it.
    let new_subscriber = NewSubscriber {
        email: SubscriberEmail::parse(String::from("ADA@test.com")).unwrap(),
        name: SubscriberName::parse(String::from("Someone Else")).unwrap(),
    };

    let result = insert_subscriber(&test_app.db_pool, &new_subscriber).await;

    assert_matches!(result, Err(AddSubscriberError::DuplicateEmail));
}

#[tokio::test]
async fn list_subscribers_skips_rows_that_fail_validation() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .insert_subscriber("Alice", "alice@test.com", "active")
        .await;
    test_app
        .insert_subscriber("<Mallory>", "mallory@test.com", "active")
        .await;
    test_app
        .insert_subscriber("Bob", "not-an-email", "active")
        .await;

    let response = test_app.get_subscribers(&[]).await;

    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(names(&body), vec!["Alice"]);
}

#[tokio::test]
async fn list_subscribers_is_ordered_by_name() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .insert_subscriber("Charlie", "charlie@test.com", "active")
        .await;
    test_app
        .insert_subscriber("Alice", "alice@test.com", "inactive")
        .await;
    test_app
        .insert_subscriber("Bob", "bob@test.com", "unsubscribed")
        .await;

    let response = test_app.get_subscribers(&[]).await;

    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(names(&body), vec!["Alice", "Bob", "Charlie"]);
}

#[tokio::test]
async fn list_subscribers_filters_by_status_and_search() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .insert_subscriber("Alice", "alice@test.com", "active")
        .await;
    test_app
        .insert_subscriber("Alina", "alina@test.com", "inactive")
        .await;
    test_app
        .insert_subscriber("Bob", "bob@mail.test", "active")
        .await;

    let active: Value = test_app
        .get_subscribers(&[("status", "active")])
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(names(&active), vec!["Alice", "Bob"]);

    let by_name: Value = test_app
        .get_subscribers(&[("search", "ALI")])
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(names(&by_name), vec!["Alice", "Alina"]);

    let by_email_and_status: Value = test_app
        .get_subscribers(&[("status", "active"), ("search", "mail.test")])
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(names(&by_email_and_status), vec!["Bob"]);
}

#[tokio::test]
async fn list_subscribers_search_treats_wildcards_literally() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .insert_subscriber("Alice", "alice@test.com", "active")
        .await;

    let body: Value = test_app
        .get_subscribers(&[("search", "%")])
        .await
        .json()
        .await
        .unwrap();

    assert!(names(&body).is_empty());
}

#[tokio::test]
async fn list_subscribers_rejects_unknown_status() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get_subscribers(&[("status", "banned")]).await;

    assert_eq!(400, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid query parameters");
}

#[tokio::test]
async fn filter_subscribers_defaults_to_active_only() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .insert_subscriber("Alice", "alice@test.com", "active")
        .await;
    test_app
        .insert_subscriber("Bob", "bob@test.com", "unsubscribed")
        .await;

    let active: Value = test_app
        .post_filter_subscribers(json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(names(&active), vec!["Alice"]);

    let everyone: Value = test_app
        .post_filter_subscribers(json!({"activeOnly": false}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(names(&everyone), vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn stats_count_subscribers_by_status() {
    let test_app = TestApp::spawn_app().await;
    test_app
        .insert_subscriber("Alice", "alice@test.com", "active")
        .await;
    test_app
        .insert_subscriber("Bob", "bob@test.com", "active")
        .await;
    test_app
        .insert_subscriber("Carol", "carol@test.com", "inactive")
        .await;
    test_app
        .insert_subscriber("Dan", "dan@test.com", "unsubscribed")
        .await;

    let response = test_app.get_subscriber_stats().await;

    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.unwrap();
    let stats = &body["stats"];
    assert_eq!(stats["total"], 4);
    assert_eq!(stats["active"], 2);
    assert_eq!(stats["inactive"], 1);
    assert_eq!(stats["unsubscribed"], 1);
    assert_eq!(stats["newLast30Days"], 4);
    assert_eq!(stats["retentionRate"], 50.0);
}

#[tokio::test]
async fn stats_are_zero_without_subscribers() {
    let test_app = TestApp::spawn_app().await;

    let body: Value = test_app.get_subscriber_stats().await.json().await.unwrap();

    assert_eq!(body["stats"]["total"], 0);
    assert_eq!(body["stats"]["retentionRate"], 0.0);
}
