use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

pub(crate) fn record_grading_pass(kind: &'static str, outcome: &'static str) {
    metrics::counter!("grading_passes_total", "kind" => kind, "outcome" => outcome).increment(1);
}

pub(crate) fn record_score_ratio(kind: &'static str, score: i32, max_score: i32) {
    if max_score <= 0 {
        return;
    }
    metrics::histogram!("grading_score_ratio", "kind" => kind)
        .record(f64::from(score) / f64::from(max_score));
}
