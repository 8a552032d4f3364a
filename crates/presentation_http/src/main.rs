//! AirWatch HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::{AirQualityService, HealthAdvisoryService};
use axum::http::{HeaderValue, Method};
use infrastructure::{
    AppConfig, ConfigValidator, OpenWeatherPollutionAdapter, SqliteAirQualityStore,
    SqliteDatabaseHealth, SqliteRecommendationStore, create_pool, init_tracing,
};
use presentation_http::{AppState, create_router, set_expose_internal_errors};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.telemetry.log_filter, &config.server.log_format)?;

    info!("AirWatch v{} starting...", env!("CARGO_PKG_VERSION"));

    let warnings = ConfigValidator::validate(&config);
    ConfigValidator::log_warnings(&warnings);
    if ConfigValidator::should_block_startup(&config, &warnings) {
        anyhow::bail!("Refusing to start with critical configuration warnings");
    }

    info!(
        host = %config.server.host,
        port = %config.server.port,
        environment = %config.environment,
        database = %config.database.path,
        "Configuration loaded"
    );

    set_expose_internal_errors(config.server.expose_internal_errors);

    // Storage
    let pool = Arc::new(create_pool(&config.database).context("Failed to open database")?);
    let air_quality_store = Arc::new(SqliteAirQualityStore::new(Arc::clone(&pool)));
    let recommendation_store = SqliteRecommendationStore::new(Arc::clone(&pool));
    let database_health = Arc::new(SqliteDatabaseHealth::new(Arc::clone(&pool)));

    // Upstream pollution source
    if !config.openweather.has_api_key() {
        warn!("OpenWeather API key not configured, refresh requests will fail");
    }
    let pollution = Arc::new(
        OpenWeatherPollutionAdapter::new(config.openweather.to_client_config())
            .context("Failed to initialize OpenWeather client")?,
    );

    // Services
    let advisory = HealthAdvisoryService::load(
        &recommendation_store,
        config.alerts,
        config.recommendations.strict_tiling,
    )
    .await
    .context("Failed to load recommendation table")?;

    let air_quality = AirQualityService::new(air_quality_store).with_pollution_source(pollution);

    let state = AppState {
        air_quality: Arc::new(air_quality),
        advisory: Arc::new(advisory),
        database: database_health,
    };

    let app = create_router(state)
        .layer(RequestBodyLimitLayer::new(
            config.server.max_body_size_json_bytes,
        ))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http());

    let app = if config.server.cors_enabled {
        app.layer(cors_layer(&config.server.allowed_origins))
    } else {
        app
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server listening on http://{}", addr);
    info!("OpenAPI document: http://{}/api-docs/openapi.json", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Allow any origin when none are listed, otherwise only the listed ones
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
}
