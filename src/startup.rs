use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::config::{DatabaseSettings, Settings};
use crate::email_client::EmailClient;
use crate::html::template::NewsletterTemplate;
use crate::routes::{
    add_subscriber, filter_subscribers, health_check, json_error_handler, list_subscribers,
    preview_newsletter, publish_newsletter, query_error_handler, send_email, subscriber_stats,
};

/// Designer exports embed images and styles, so bodies can be large.
const MAX_JSON_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let db_pool = get_connection_db_pool(&config.database);
        let sender = config
            .get_email_client_sender()
            .map_err(anyhow::Error::msg)
            .context("Sender email is not valid")?;
        let email_client = EmailClient::new(
            config.get_email_client_base_url(),
            sender,
            config.get_email_client_api(),
            Some(config.get_email_client_timeout()),
        )
        .context("Failed to build the email client")?;
        let template = NewsletterTemplate::new(
            config.newsletter.brand_name.clone(),
            config.newsletter.unsubscribe_url.clone(),
            config.newsletter.default_title.clone(),
        );

        let listener = TcpListener::bind(config.get_address())
            .with_context(|| format!("Failed to bind {}", config.get_address()))?;
        let port = listener.local_addr()?.port();
        let server = run(listener, db_pool, email_client, template)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    db_pool: PgPool,
    email_client: EmailClient,
    template: NewsletterTemplate,
) -> Result<Server, std::io::Error> {
    let db_pool = web::Data::new(db_pool);
    let email_client = web::Data::new(email_client);
    let template = web::Data::new(template);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .app_data(
                web::JsonConfig::default()
                    .limit(MAX_JSON_PAYLOAD_BYTES)
                    .error_handler(json_error_handler),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .route("/health_check", web::get().to(health_check))
            .route("/subscribers", web::get().to(list_subscribers))
            .route("/subscribers", web::post().to(filter_subscribers))
            .route("/subscribers/add", web::post().to(add_subscriber))
            .route("/subscribers/stats", web::get().to(subscriber_stats))
            .route("/send-email", web::post().to(send_email))
            .route("/newsletters", web::post().to(publish_newsletter))
            .route("/newsletters/preview", web::post().to(preview_newsletter))
            .app_data(db_pool.clone())
            .app_data(email_client.clone())
            .app_data(template.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}
