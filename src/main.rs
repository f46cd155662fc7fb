use medicine_notifier::configuration::get_configuration;
use medicine_notifier::startup::build;
use medicine_notifier::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("medicine-notifier".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let config = get_configuration()?;
    let app = build(config).await?;
    app.run().await?;

    Ok(())
}
