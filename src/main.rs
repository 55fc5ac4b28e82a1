use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use parrot_relay::application::ports::SpaceClient;
use parrot_relay::infrastructure::observability::{TracingConfig, init_tracing};
use parrot_relay::infrastructure::space::{MockSpaceClient, create_gradio_space_client};
use parrot_relay::presentation::{AppState, Environment, ScaffoldConfig, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    let tracing_config = TracingConfig::from_settings(&settings.logging, environment.as_str());
    init_tracing(&tracing_config, settings.server.port);

    let scaffold = ScaffoldConfig::default();
    let state = if scaffold.enabled {
        tracing::warn!(
            pending_polls = scaffold.mock_pending_polls,
            "Scaffold mode: conversions are echoed by an in-process space"
        );
        let space: Arc<dyn SpaceClient> = Arc::new(
            MockSpaceClient::new()
                .with_pending_polls(scaffold.mock_pending_polls)
                .with_response_delay(Duration::from_millis(scaffold.mock_response_delay_ms)),
        );
        AppState::with_space(settings.clone(), space)
    } else if settings.is_space_configured() {
        let client =
            create_gradio_space_client(&settings.space).context("Invalid space configuration")?;
        tracing::info!(
            base_url = %client.base_url(),
            authenticated = settings.space.token.is_some(),
            candidates = ?settings
                .endpoint_candidates()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            "Space client ready"
        );
        AppState::with_space(settings.clone(), Arc::new(client))
    } else {
        tracing::error!("HF_SPACE is not set; conversion routes will answer 500");
        AppState::unconfigured(settings.clone())
    };

    let router = create_router(state);

    let ip = settings
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server host: {}", settings.server.host))?;
    let addr = SocketAddr::new(ip, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
