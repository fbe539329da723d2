pub mod backend;
pub mod presets;
pub mod registry;
pub mod resize;
pub mod spec;

pub use backend::{ChartBackend, ChartError, ChartHandle, TracingBackend};
pub use registry::ChartRegistry;
pub use resize::{debounce, RESIZE_DEBOUNCE};
pub use spec::{ChartData, ChartKind, ChartSpec, Dataset};

use crate::schemas::{ClassAverage, SubScores};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartId {
    ClassAverages,
    Radar,
    Trend,
    StudentTrend,
}

impl ChartId {
    pub const ALL: [ChartId; 4] =
        [ChartId::ClassAverages, ChartId::Radar, ChartId::Trend, ChartId::StudentTrend];

    pub fn canvas(self) -> &'static str {
        match self {
            ChartId::ClassAverages => "classChart",
            ChartId::Radar => "radarChart",
            ChartId::Trend => "trendChart",
            ChartId::StudentTrend => "studentTrendChart",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChartId::ClassAverages => "class_averages",
            ChartId::Radar => "radar",
            ChartId::Trend => "trend",
            ChartId::StudentTrend => "student_trend",
        }
    }

    pub fn preset(self) -> ChartSpec {
        match self {
            ChartId::ClassAverages => presets::class_averages(),
            ChartId::Radar => presets::rubric_radar(),
            ChartId::Trend => presets::score_trend(),
            ChartId::StudentTrend => presets::student_trend(),
        }
    }
}

fn recreate_preset(registry: &mut ChartRegistry, id: ChartId) {
    registry.recreate(id, id.preset());
}

pub fn init_dashboard_charts(registry: &mut ChartRegistry) {
    recreate_preset(registry, ChartId::ClassAverages);
}

pub fn init_score_charts(registry: &mut ChartRegistry) {
    recreate_preset(registry, ChartId::Radar);
    recreate_preset(registry, ChartId::Trend);
}

pub fn init_student_charts(registry: &mut ChartRegistry) {
    recreate_preset(registry, ChartId::StudentTrend);
}

/// Replaces the class bar chart's categories and averages in place.
pub fn update_class_chart(registry: &mut ChartRegistry, averages: &[ClassAverage]) -> bool {
    registry.update(ChartId::ClassAverages, |data| {
        data.labels = averages.iter().map(|entry| entry.class_name.clone()).collect();
        if let Some(series) = data.datasets.first_mut() {
            series.data = averages.iter().map(|entry| entry.average).collect();
        }
    })
}

/// Feeds the normalised sub-scores into the radar's live series.
pub fn update_radar_chart(registry: &mut ChartRegistry, scores: &SubScores) -> bool {
    let normalized = scores.normalized();
    registry.update(ChartId::Radar, |data| {
        if let Some(series) = data.datasets.first_mut() {
            series.data = normalized.to_vec();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingBackend;

    #[test]
    fn radar_update_normalizes_against_each_maximum() {
        let backend = RecordingBackend::new();
        let mut registry = ChartRegistry::new(Box::new(backend.clone()));
        init_score_charts(&mut registry);

        let scores = SubScores::from_array([10.0, 15.0, 10.0, 10.0, 5.0]);
        assert!(update_radar_chart(&mut registry, &scores));

        let radar = registry.spec(ChartId::Radar).expect("radar");
        assert_eq!(radar.data.datasets[0].data, vec![50.0; 5]);
        assert_eq!(radar.data.datasets[1].data, vec![85.0, 82.0, 83.0, 84.0, 83.0]);
        assert_eq!(backend.creations(), 2);
    }

    #[test]
    fn class_update_replaces_labels_and_series() {
        let mut registry = ChartRegistry::new(Box::new(RecordingBackend::new()));
        init_dashboard_charts(&mut registry);

        let averages = vec![
            ClassAverage { class_name: "고려대반".to_string(), average: 86.5 },
            ClassAverage { class_name: "한양대반".to_string(), average: 79.0 },
        ];
        assert!(update_class_chart(&mut registry, &averages));

        let chart = registry.spec(ChartId::ClassAverages).expect("class chart");
        assert_eq!(chart.data.labels, vec!["고려대반", "한양대반"]);
        assert_eq!(chart.data.datasets[0].data, vec![86.5, 79.0]);
    }

    #[test]
    fn updates_without_a_live_chart_do_nothing() {
        let mut registry = ChartRegistry::new(Box::new(RecordingBackend::new()));
        let scores = SubScores::from_array([20.0, 30.0, 20.0, 20.0, 10.0]);
        assert!(!update_radar_chart(&mut registry, &scores));
        assert!(!update_class_chart(&mut registry, &[]));
    }

    #[test]
    fn reinitialising_a_page_recreates_its_charts() {
        let backend = RecordingBackend::new();
        let mut registry = ChartRegistry::new(Box::new(backend.clone()));

        init_score_charts(&mut registry);
        init_score_charts(&mut registry);

        assert_eq!(backend.creations(), 4);
        assert_eq!(backend.live_count(), 2);
    }

    #[test]
    fn canvases_match_presets() {
        for id in ChartId::ALL {
            assert!(!id.canvas().is_empty());
            assert!(!id.preset().data.datasets.is_empty());
        }
    }
}
