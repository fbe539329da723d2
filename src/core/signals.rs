use tokio::signal;
use tokio::sync::mpsc;

pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

/// Forwards terminal size changes (SIGWINCH) as viewport resize events until
/// the receiving side goes away.
#[cfg(unix)]
pub(crate) async fn forward_viewport_resizes(events: mpsc::UnboundedSender<()>) {
    let mut stream = match signal::unix::signal(signal::unix::SignalKind::window_change()) {
        Ok(stream) => stream,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to install SIGWINCH handler");
            return;
        }
    };

    while stream.recv().await.is_some() {
        if events.send(()).is_err() {
            break;
        }
    }
}

#[cfg(not(unix))]
pub(crate) async fn forward_viewport_resizes(events: mpsc::UnboundedSender<()>) {
    events.closed().await;
}
