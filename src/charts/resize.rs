use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;

pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Trailing-edge debounce: each burst of events separated by less than
/// `delay` produces one `on_settled` call, `delay` after the last event.
/// Returns once the sender side is dropped, flushing a pending burst first.
pub async fn debounce<F, Fut>(
    mut events: mpsc::UnboundedReceiver<()>,
    delay: Duration,
    mut on_settled: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    while events.recv().await.is_some() {
        let mut closed = false;
        loop {
            tokio::select! {
                received = events.recv() => {
                    if received.is_none() {
                        closed = true;
                        break;
                    }
                }
                _ = tokio::time::sleep(delay) => break,
            }
        }

        on_settled().await;
        if closed {
            return;
        }
    }
}
