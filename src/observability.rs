use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: reservation attempts. Labels: outcome (confirmed | rejected).
pub const RESERVATIONS_TOTAL: &str = "motorpool_reservations_total";

/// Histogram: reserve call latency in seconds.
pub const RESERVE_DURATION_SECONDS: &str = "motorpool_reserve_duration_seconds";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: resources currently in the pool.
pub const RESOURCES_ACTIVE: &str = "motorpool_resources_active";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
