use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "vetrina_store_cache_hit_total",
            Unit::Count,
            "Total number of store cache hits."
        );
        describe_counter!(
            "vetrina_store_cache_miss_total",
            Unit::Count,
            "Total number of store cache misses."
        );
        describe_counter!(
            "vetrina_store_cache_error_total",
            Unit::Count,
            "Total number of store cache operations degraded to misses by backend failures."
        );
        describe_counter!(
            "vetrina_store_cache_partial_write_total",
            Unit::Count,
            "Total number of store cache writes or invalidations that did not fully apply."
        );
        describe_counter!(
            "vetrina_commission_override_total",
            Unit::Count,
            "Total number of commission resolutions served by an affiliate override."
        );
        describe_counter!(
            "vetrina_commission_default_total",
            Unit::Count,
            "Total number of commission resolutions served by the product default."
        );
    });
}
