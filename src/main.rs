use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use motorpool::clock::SystemClock;
use motorpool::engine::{Engine, ReservationPolicy, ReservationStore, ResourceStore};
use motorpool::http;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("MOTORPOOL_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    motorpool::observability::init(metrics_port);

    let port = std::env::var("MOTORPOOL_PORT").unwrap_or_else(|_| "8080".into());
    let bind = std::env::var("MOTORPOOL_BIND").unwrap_or_else(|_| "0.0.0.0".into());

    let policy = policy_from_env();

    let engine = Arc::new(Engine::new(
        Arc::new(ResourceStore::new()),
        Arc::new(ReservationStore::new()),
        policy.clone(),
        Arc::new(SystemClock),
    ));

    let addr = format!("{bind}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!("motorpool listening on {addr}");
    info!("  lead_time: {}m", policy.lead_time / MINUTE_MS);
    info!(
        "  max_duration: {}",
        policy
            .max_duration
            .map_or("unlimited".to_string(), |d| format!("{}m", d / MINUTE_MS))
    );
    info!(
        "  booking_horizon: {}",
        policy
            .booking_horizon
            .map_or("unlimited".to_string(), |h| format!("{}h", h / HOUR_MS))
    );
    info!(
        "  metrics: {}",
        metrics_port.map_or("disabled".to_string(), |p| format!(
            "http://0.0.0.0:{p}/metrics"
        ))
    );

    axum::serve(listener, http::router(engine))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("motorpool stopped");
    Ok(())
}

fn policy_from_env() -> ReservationPolicy {
    let mut policy = ReservationPolicy::default();
    if let Some(minutes) = env_i64("MOTORPOOL_LEAD_TIME_MINUTES") {
        policy.lead_time = minutes * MINUTE_MS;
    }
    // Zero disables the bound
    if let Some(minutes) = env_i64("MOTORPOOL_MAX_DURATION_MINUTES") {
        policy.max_duration = (minutes > 0).then(|| minutes * MINUTE_MS);
    }
    if let Some(hours) = env_i64("MOTORPOOL_BOOKING_HORIZON_HOURS") {
        policy.booking_horizon = (hours > 0).then(|| hours * HOUR_MS);
    }
    policy
}

fn env_i64(key: &str) -> Option<i64> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

/// Resolve on SIGTERM/ctrl-c so in-flight requests can drain.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
    info!("shutdown signal received");
}
