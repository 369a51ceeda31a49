use roomdesk::{router, AppState, PortalConfig};
use roomdesk_core::AppConfig;
use roomdesk_security::{RestUserDirectory, SessionResolver};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    roomdesk_core::init_tracing();

    if let Err(e) = run().await {
        error!(error = %e, "Portal terminated");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load("dev")?.with_typed::<PortalConfig>()?;
    info!(profile = config.profile(), directory = %config.directory.url, "Starting portal");

    let directory = RestUserDirectory::new(config.directory.clone())?;
    let resolver = SessionResolver::new(directory).with_probe(config.directory.probe_on_resolve);
    let state = AppState::new(resolver, &config);

    roomdesk_core::serve(router(state), &config.bind).await?;
    Ok(())
}
