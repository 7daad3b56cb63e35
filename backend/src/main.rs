use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use despacho_backend::{
    config::Config, gate::ServiceGate, notify::Notifier, store::SessionStore, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (dev convenience)
    let _ = dotenvy::dotenv();

    // Tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::from_env()?;

    let gate = ServiceGate::new(cfg.timezone, cfg.closing_hour);
    let store = SessionStore::new(Duration::from_secs(cfg.session_ttl_minutes * 60));
    let notifier = Notifier::new(cfg.forward_url.clone())?;

    // Background clock sampling and idle-session eviction
    gate.spawn_sampler();
    store.spawn_sweeper();

    tracing::info!(
        timezone = cfg.timezone.name(),
        closing_hour = cfg.closing_hour,
        "service gate armed"
    );

    let state = AppState {
        store,
        gate,
        notifier,
        supervisor_phone: cfg.supervisor_phone.clone(),
    };

    // CORS
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(
            cfg.cors_origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        );

    let app = despacho_backend::api::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("Listening on {}", cfg.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
