use std::collections::BTreeSet;

use thiserror::Error;

use crate::charts::spec::{ChartData, ChartSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChartHandle(pub u64);

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart {0:?} is not live")]
    UnknownHandle(ChartHandle),
}

/// The third-party chart library. Instances cannot change type in place, so
/// callers destroy and recreate rather than reconfigure.
pub trait ChartBackend: Send {
    /// Whether the named drawing surface exists in the current view.
    fn has_canvas(&self, canvas: &str) -> bool;

    fn create(&mut self, canvas: &str, spec: &ChartSpec) -> Result<ChartHandle, ChartError>;

    /// Replaces the instance's labels and series and redraws it.
    fn update(&mut self, handle: ChartHandle, data: &ChartData) -> Result<(), ChartError>;

    fn destroy(&mut self, handle: ChartHandle);

    fn resize(&mut self, handle: ChartHandle);
}

/// Headless backend that only logs the calls it receives.
#[derive(Debug, Default)]
pub struct TracingBackend {
    next_handle: u64,
    live: BTreeSet<ChartHandle>,
}

impl TracingBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChartBackend for TracingBackend {
    fn has_canvas(&self, _canvas: &str) -> bool {
        true
    }

    fn create(&mut self, canvas: &str, spec: &ChartSpec) -> Result<ChartHandle, ChartError> {
        self.next_handle += 1;
        let handle = ChartHandle(self.next_handle);
        self.live.insert(handle);
        tracing::debug!(
            canvas,
            handle = handle.0,
            kind = ?spec.kind,
            labels = ?spec.data.labels,
            "Chart created"
        );
        Ok(handle)
    }

    fn update(&mut self, handle: ChartHandle, data: &ChartData) -> Result<(), ChartError> {
        if !self.live.contains(&handle) {
            return Err(ChartError::UnknownHandle(handle));
        }
        let series: Vec<&[f64]> = data.datasets.iter().map(|set| set.data.as_slice()).collect();
        tracing::debug!(handle = handle.0, labels = ?data.labels, ?series, "Chart redrawn");
        Ok(())
    }

    fn destroy(&mut self, handle: ChartHandle) {
        if self.live.remove(&handle) {
            tracing::debug!(handle = handle.0, "Chart destroyed");
        }
    }

    fn resize(&mut self, handle: ChartHandle) {
        tracing::trace!(handle = handle.0, "Chart resized");
    }
}
