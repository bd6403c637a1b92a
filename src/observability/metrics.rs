//! # Metrics Collection
//!
//! Session and store counters recorded through the `metrics` facade, with an
//! optional Prometheus exporter. Without an installed recorder every call is a
//! cheap no-op, so library users and tests need no setup.

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};
use ::tracing::{info, warn};
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Outcome of resolving a token to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Live,
    Missing,
    Expired,
    Malformed,
}

impl LookupOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupOutcome::Live => "live",
            LookupOutcome::Missing => "missing",
            LookupOutcome::Expired => "expired",
            LookupOutcome::Malformed => "malformed",
        }
    }
}

/// Record a newly issued session
pub fn record_session_created() {
    counter!("sessions_created_total").increment(1);
}

/// Record a successful rotation
pub fn record_session_refreshed() {
    counter!("sessions_refreshed_total").increment(1);
}

/// Record an explicit revocation (logout)
pub fn record_session_revoked() {
    counter!("sessions_revoked_total").increment(1);
}

/// Record how a token lookup resolved
pub fn record_session_lookup(outcome: LookupOutcome) {
    counter!("session_lookups_total", "outcome" => outcome.as_str()).increment(1);
}

/// Record the middleware verdict for a request
pub fn record_authentication(status: &'static str) {
    counter!("auth_requests_total", "status" => status).increment(1);
}

/// Record a key-value store round-trip
pub fn record_store_operation(operation: &'static str, success: bool) {
    let status = if success { "success" } else { "error" };
    counter!("store_operations_total", "operation" => operation, "status" => status).increment(1);
}

fn describe_session_metrics() {
    describe_counter!("sessions_created_total", "Sessions issued by login or refresh");
    describe_counter!("sessions_refreshed_total", "Sessions rotated to a new token");
    describe_counter!("sessions_revoked_total", "Sessions deleted by logout");
    describe_counter!("session_lookups_total", "Token lookups by outcome");
    describe_counter!("auth_requests_total", "Requests seen by the auth middleware by status");
    describe_counter!("store_operations_total", "Key-value store round-trips by operation");
}

/// Initialize metrics collection and the Prometheus exporter
pub fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    if !config.enable_metrics {
        return Ok(());
    }

    let metrics_addr = match config.metrics_bind_address() {
        Some(addr) => addr,
        None => {
            warn!("Metrics disabled: no bind address configured");
            return Ok(());
        }
    };

    let socket_addr: SocketAddr = metrics_addr.parse().map_err(|e| {
        Error::config(format!("Invalid metrics bind address '{}': {}", metrics_addr, e))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .add_global_label("service", &config.service_name)
        .install()
        .map_err(|e| Error::config(format!("Failed to initialize metrics exporter: {}", e)))?;

    describe_session_metrics();

    info!(
        metrics_addr = %metrics_addr,
        service_name = %config.service_name,
        "Metrics collection initialized"
    );

    Ok(())
}
