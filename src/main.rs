use newsletter_dashboard::config::get_configuration;
use newsletter_dashboard::startup::Application;
use newsletter_dashboard::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        String::from("newsletter_dashboard"),
        String::from("info"),
        std::io::stdout,
    );

    init_subscriber(subscriber);

    let config = get_configuration()?;
    let application = Application::build(config).await?;

    tracing::info!("Server listening on port {}", application.get_port());

    application.run_until_stop().await?;

    Ok(())
}
