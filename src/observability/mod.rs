//! # Observability Infrastructure
//!
//! Structured logging and metrics for the Tasklane session service.

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, log_config_info, token_hint};
pub use metrics::{init_metrics, LookupOutcome};

use crate::config::ObservabilityConfig;
use crate::errors::Result;
use ::tracing::info;

/// Initialize all observability components
pub fn init_observability(config: &ObservabilityConfig) -> Result<()> {
    init_logging(config);
    init_metrics(config)?;

    info!(
        service_name = %config.service_name,
        log_level = %config.log_level,
        json_logging = %config.json_logging,
        metrics_enabled = %config.enable_metrics,
        "Observability initialized successfully"
    );

    Ok(())
}
