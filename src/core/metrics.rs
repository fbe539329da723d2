use std::sync::OnceLock;

use anyhow::Context;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

const COUNTERS: [(&str, &str); 6] = [
    ("api_requests_total", "Spreadsheet API calls issued, by operation"),
    ("api_failures_total", "Spreadsheet API calls that failed or were declined"),
    ("api_skipped_rows_total", "List rows dropped because they could not be read"),
    ("chart_instances_created_total", "Chart instances built, by chart"),
    ("score_extractions_total", "Answer sheet uploads, by final intake state"),
    ("scores_submitted_total", "Score form submissions, by outcome"),
];

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;
    for (name, help) in COUNTERS {
        metrics::describe_counter!(name, help);
    }
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

/// Text exposition of everything recorded so far, when the recorder is on.
pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}
