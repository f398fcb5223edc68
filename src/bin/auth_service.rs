//! Auth service entry point.

use anyhow::Result;
use tracing::info;

use chat_auth::config::Settings;
use chat_auth::presentation::http::handlers::health::AUTH_SERVICE_NAME;
use chat_auth::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    chat_auth::telemetry::init_tracing();

    let settings = Settings::load(AUTH_SERVICE_NAME)?;
    info!(
        service = AUTH_SERVICE_NAME,
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build_auth(settings).await?;
    application.run_until_stopped().await?;

    Ok(())
}
