use std::collections::BTreeMap;

use crate::charts::backend::{ChartBackend, ChartHandle};
use crate::charts::spec::{ChartData, ChartSpec};
use crate::charts::ChartId;

struct LiveChart {
    handle: ChartHandle,
    spec: ChartSpec,
}

/// Owns the rendering backend and at most one live instance per [`ChartId`].
pub struct ChartRegistry {
    backend: Box<dyn ChartBackend>,
    live: BTreeMap<ChartId, LiveChart>,
}

impl ChartRegistry {
    pub fn new(backend: Box<dyn ChartBackend>) -> Self {
        Self { backend, live: BTreeMap::new() }
    }

    /// Builds a fresh instance, destroying the previous one first. Does
    /// nothing when the chart's canvas is absent.
    pub fn recreate(&mut self, id: ChartId, spec: ChartSpec) -> Option<ChartHandle> {
        if !self.backend.has_canvas(id.canvas()) {
            tracing::debug!(chart = id.name(), "Canvas missing; chart skipped");
            return None;
        }

        self.destroy(id);
        self.create(id, spec)
    }

    pub fn get_or_create(
        &mut self,
        id: ChartId,
        spec: impl FnOnce() -> ChartSpec,
    ) -> Option<ChartHandle> {
        if let Some(live) = self.live.get(&id) {
            return Some(live.handle);
        }
        if !self.backend.has_canvas(id.canvas()) {
            return None;
        }
        self.create(id, spec())
    }

    fn create(&mut self, id: ChartId, spec: ChartSpec) -> Option<ChartHandle> {
        match self.backend.create(id.canvas(), &spec) {
            Ok(handle) => {
                metrics::counter!("chart_instances_created_total", "chart" => id.name())
                    .increment(1);
                self.live.insert(id, LiveChart { handle, spec });
                Some(handle)
            }
            Err(err) => {
                tracing::warn!(chart = id.name(), error = %err, "Failed to create chart");
                None
            }
        }
    }

    /// Edits the live instance's data in place and redraws it without
    /// recreating. Returns `false` when the chart is not live.
    pub fn update(&mut self, id: ChartId, edit: impl FnOnce(&mut ChartData)) -> bool {
        let Some(live) = self.live.get_mut(&id) else {
            return false;
        };

        edit(&mut live.spec.data);
        if let Err(err) = self.backend.update(live.handle, &live.spec.data) {
            tracing::warn!(chart = id.name(), error = %err, "Failed to redraw chart");
        }
        true
    }

    pub fn destroy(&mut self, id: ChartId) -> bool {
        match self.live.remove(&id) {
            Some(live) => {
                self.backend.destroy(live.handle);
                true
            }
            None => false,
        }
    }

    pub fn destroy_all(&mut self) {
        let ids: Vec<ChartId> = self.live.keys().copied().collect();
        for id in ids {
            self.destroy(id);
        }
    }

    pub fn resize_all(&mut self) -> usize {
        for live in self.live.values() {
            self.backend.resize(live.handle);
        }
        self.live.len()
    }

    pub fn handle(&self, id: ChartId) -> Option<ChartHandle> {
        self.live.get(&id).map(|live| live.handle)
    }

    pub fn spec(&self, id: ChartId) -> Option<&ChartSpec> {
        self.live.get(&id).map(|live| &live.spec)
    }

    pub fn is_live(&self, id: ChartId) -> bool {
        self.live.contains_key(&id)
    }
}
