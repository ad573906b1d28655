use once_cell::sync::Lazy;
use reqwest::Response;
use sqlx::{migrate, Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;
use wiremock::MockServer;

use newsletter_dashboard::{
    config::{get_configuration, DatabaseSettings, Settings},
    startup::{get_connection_db_pool, Application},
    telemetry::{get_subscriber, init_subscriber},
};

// The subscriber can only be installed once per test binary.
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = String::from("info");
    let subscriber_name = String::from("test");

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub config: Settings,
    pub address: String,
    pub db_pool: PgPool,
    pub email_server: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Missing configuration file.");
        let db_test_name = format!("db_{}", Uuid::new_v4().to_string().replace('-', "_"));
        let email_server = MockServer::start().await;

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);
        config.set_email_client_base_url(email_server.uri());

        let db_pool = configure_db(&mut config.database, db_test_name).await;

        let application = Application::build(config.clone())
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            config,
            db_pool,
            email_server,
            client: reqwest::Client::new(),
        }
    }

    pub async fn get_subscribers(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(format!("{}/subscribers", self.address))
            .query(query)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_filter_subscribers(&self, body: serde_json::Value) -> Response {
        self.post_json("/subscribers", body).await
    }

    pub async fn post_add_subscriber(&self, body: serde_json::Value) -> Response {
        self.post_json("/subscribers/add", body).await
    }

    pub async fn get_subscriber_stats(&self) -> Response {
        self.client
            .get(format!("{}/subscribers/stats", self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_send_email(&self, body: serde_json::Value) -> Response {
        self.post_json("/send-email", body).await
    }

    pub async fn post_newsletter(&self, body: serde_json::Value) -> Response {
        self.post_json("/newsletters", body).await
    }

    pub async fn post_newsletter_preview(&self, body: serde_json::Value) -> Response {
        self.post_json("/newsletters/preview", body).await
    }

    /// Inserts a subscriber directly, bypassing the API so any status can be used.
    pub async fn insert_subscriber(&self, name: &str, email: &str, status: &str) {
        sqlx::query(
            r#"
            INSERT INTO subscribers (id, name, email, signed_up_at, status)
            VALUES ($1, $2, $3, now(), $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(status)
        .execute(&self.db_pool)
        .await
        .expect("Failed to insert test subscriber.");
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

async fn configure_db(db_config: &mut DatabaseSettings, db_test_name: String) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect_with(&db_config.get_server_options())
        .await
        .expect("Failed to connect to Postgres.");

    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, db_test_name))
        .await
        .expect("Failed to create database.");

    connection
        .close()
        .await
        .expect("Failed to close connection.");

    // Execute migrations
    db_config.set_name(db_test_name);

    let db_pool = get_connection_db_pool(db_config);

    migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run migrations.");

    db_pool
}
