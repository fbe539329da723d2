pub mod api;
pub mod app;
pub mod charts;
pub mod core;
pub mod dashboard;
pub mod intake;
pub mod navigation;
pub mod schemas;
pub mod scores;
pub mod screen;
pub mod session;
pub mod student_view;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::SheetApiClient;
use crate::app::AdminApp;
use crate::charts::{TracingBackend, RESIZE_DEBOUNCE};
use crate::core::{config::Settings, signals, telemetry};
use crate::session::{FileStore, SessionStore};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;
    core::metrics::init(&settings)?;

    let api = Arc::new(SheetApiClient::from_settings(&settings)?);
    let session = SessionStore::new(Box::new(FileStore::open(&settings.session().file)));
    let analysis = intake::analysis::provider_from_settings(&settings)?;
    let mut app =
        AdminApp::from_settings(&settings, api, session, Box::new(TracingBackend::new()), analysis);

    tracing::info!(
        api = %settings.api().base_url,
        initial_page = %settings.ui().initial_page,
        environment = %settings.runtime().environment.as_str(),
        "Tutor dashboard starting"
    );
    app.startup().await;

    let (resize_tx, resize_rx) = mpsc::unbounded_channel();
    let (settled_tx, mut settled_rx) = mpsc::unbounded_channel();
    tokio::spawn(signals::forward_viewport_resizes(resize_tx));
    tokio::spawn(charts::debounce(resize_rx, RESIZE_DEBOUNCE, move || {
        let settled_tx = settled_tx.clone();
        async move {
            let _ = settled_tx.send(());
        }
    }));

    let shutdown = signals::shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            Some(()) = settled_rx.recv() => {
                let resized = app.resize_charts();
                tracing::debug!(charts = resized, "Charts resized");
            }
        }
    }

    if let Some(rendered) = core::metrics::render() {
        tracing::debug!(metrics = %rendered, "Final metrics snapshot");
    }

    Ok(())
}
