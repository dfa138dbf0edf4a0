//! Prometheus metrics for healthheaven-service.
//!
//! HTTP request metrics come from `service_core`'s middleware through the
//! `metrics` recorder; marketplace counters live in a separate registry and
//! are appended to the same exposition.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static CART_ADDITIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static PAYMENT_INTENTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static AD_TOGGLES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize metrics collection. Call once from `main`.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    if METRICS_HANDLE.set(handle).is_err() {
        anyhow::bail!("metrics already initialized");
    }

    let registry = Registry::new();

    let cart_additions = IntCounterVec::new(
        Opts::new(
            "healthheaven_cart_additions_total",
            "Cart adds by outcome (inserted or incremented)",
        ),
        &["outcome"],
    )?;

    let payment_intents = IntCounterVec::new(
        Opts::new(
            "healthheaven_payment_intents_total",
            "Stripe payment intent creations by result",
        ),
        &["result"],
    )?;

    let ad_toggles = IntCounterVec::new(
        Opts::new(
            "healthheaven_ad_toggles_total",
            "Advertisement toggles by resulting status",
        ),
        &["status"],
    )?;

    registry.register(Box::new(cart_additions.clone()))?;
    registry.register(Box::new(payment_intents.clone()))?;
    registry.register(Box::new(ad_toggles.clone()))?;

    PROMETHEUS_REGISTRY.set(registry).ok();
    CART_ADDITIONS_TOTAL.set(cart_additions).ok();
    PAYMENT_INTENTS_TOTAL.set(payment_intents).ok();
    AD_TOGGLES_TOTAL.set(ad_toggles).ok();

    Ok(())
}

pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

pub fn record_cart_addition(outcome: &str) {
    if let Some(counter) = CART_ADDITIONS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn record_payment_intent(result: &str) {
    if let Some(counter) = PAYMENT_INTENTS_TOTAL.get() {
        counter.with_label_values(&[result]).inc();
    }
}

pub fn record_ad_toggle(status: &str) {
    if let Some(counter) = AD_TOGGLES_TOTAL.get() {
        counter.with_label_values(&[status]).inc();
    }
}
