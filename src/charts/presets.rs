//! Fixed chart configurations. Labels and series are illustrative until real
//! data replaces them.

use crate::charts::spec::{
    ChartData, ChartKind, ChartOptions, ChartSpec, Dataset, DatasetStyle, Legend, ScaleAxis,
    ScoreScale, Tooltip, TooltipLabel,
};
use crate::schemas::SUB_SCORE_LABELS;

pub const POINTS_SUFFIX: &str = "점";

const PRIMARY: &str = "rgba(102, 126, 234, 1)";
const PRIMARY_FILL: &str = "rgba(102, 126, 234, 0.1)";
const PRIMARY_AREA: &str = "rgba(102, 126, 234, 0.2)";
const ACCENT: &str = "rgba(240, 147, 251, 1)";
const ACCENT_FILL: &str = "rgba(240, 147, 251, 0.1)";
const ACCENT_AREA: &str = "rgba(240, 147, 251, 0.2)";

const CLASS_BAR_COLORS: [&str; 5] = [
    "rgba(102, 126, 234, 0.8)",
    "rgba(240, 147, 251, 0.8)",
    "rgba(79, 172, 254, 0.8)",
    "rgba(67, 233, 123, 0.8)",
    "rgba(250, 112, 154, 0.8)",
];

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn round_labels(count: usize) -> Vec<String> {
    (1..=count).map(|round| format!("{round}회차")).collect()
}

fn score_axis() -> ScoreScale {
    ScoreScale {
        axis: ScaleAxis::Y,
        min: 0.0,
        max: 100.0,
        step_size: None,
        tick_suffix: Some(POINTS_SUFFIX.to_string()),
    }
}

fn options(legend: Legend, tooltip: TooltipLabel, scale: ScoreScale) -> ChartOptions {
    ChartOptions {
        responsive: true,
        maintain_aspect_ratio: false,
        legend,
        tooltip: Tooltip { label: tooltip, suffix: POINTS_SUFFIX.to_string() },
        scale,
        index_interaction: false,
    }
}

fn trend_line(label: &str, data: Vec<f64>, point_radius: u8) -> Dataset {
    Dataset {
        label: label.to_string(),
        data,
        style: DatasetStyle {
            background_color: vec![PRIMARY_FILL.to_string()],
            border_color: Some(PRIMARY.to_string()),
            border_width: Some(3),
            fill: true,
            tension: Some(0.4),
            point_radius: Some(point_radius),
            point_hover_radius: Some(point_radius + 2),
            point_background_color: Some(PRIMARY.to_string()),
            ..DatasetStyle::default()
        },
    }
}

/// Average score per class, one coloured bar each.
pub fn class_averages() -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: labels(&["고려대반", "연세대반", "서강대반", "성균관대반", "한양대반"]),
            datasets: vec![Dataset {
                label: "평균 점수".to_string(),
                data: vec![84.2, 82.7, 81.5, 80.8, 83.1],
                style: DatasetStyle {
                    background_color: labels(&CLASS_BAR_COLORS),
                    border_radius: Some(8),
                    ..DatasetStyle::default()
                },
            }],
        },
        options: options(
            Legend::hidden(),
            TooltipLabel::Fixed("평균 점수".to_string()),
            score_axis(),
        ),
    }
}

/// Current rubric profile against the class average. Dataset 0 is the live
/// series fed by the score form.
pub fn rubric_radar() -> ChartSpec {
    let area = |label: &str, data: Vec<f64>, fill: &str, line: &str, point_radius: u8| Dataset {
        label: label.to_string(),
        data,
        style: DatasetStyle {
            background_color: vec![fill.to_string()],
            border_color: Some(line.to_string()),
            border_width: Some(2),
            fill: true,
            point_radius: Some(point_radius),
            point_hover_radius: Some(point_radius + 2),
            point_background_color: Some(line.to_string()),
            ..DatasetStyle::default()
        },
    };

    ChartSpec {
        kind: ChartKind::Radar,
        data: ChartData {
            labels: labels(&SUB_SCORE_LABELS),
            datasets: vec![
                area("현재 점수", vec![90.0, 87.0, 85.0, 85.0, 90.0], PRIMARY_AREA, PRIMARY, 5),
                area("반 평균", vec![85.0, 82.0, 83.0, 84.0, 83.0], ACCENT_AREA, ACCENT, 4),
            ],
        },
        options: options(
            Legend::top(),
            TooltipLabel::Dataset,
            ScoreScale {
                axis: ScaleAxis::R,
                min: 0.0,
                max: 100.0,
                step_size: Some(20.0),
                tick_suffix: None,
            },
        ),
    }
}

/// Total score across the last five rounds.
pub fn score_trend() -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        data: ChartData {
            labels: round_labels(5),
            datasets: vec![trend_line("총점", vec![78.0, 81.0, 85.0, 87.0, 92.0], 5)],
        },
        options: options(Legend::hidden(), TooltipLabel::Fixed("점수".to_string()), score_axis()),
    }
}

/// One student's totals with the class average as a dashed reference line.
pub fn student_trend() -> ChartSpec {
    let class_average = Dataset {
        label: "반 평균".to_string(),
        data: vec![80.0, 83.0, 85.0],
        style: DatasetStyle {
            background_color: vec![ACCENT_FILL.to_string()],
            border_color: Some(ACCENT.to_string()),
            border_width: Some(2),
            border_dash: Some([5, 5]),
            fill: false,
            tension: Some(0.4),
            point_radius: Some(4),
            point_hover_radius: Some(6),
            point_background_color: Some(ACCENT.to_string()),
            ..DatasetStyle::default()
        },
    };

    let mut options = options(
        Legend { display: true, use_point_style: true },
        TooltipLabel::Dataset,
        score_axis(),
    );
    options.index_interaction = true;

    ChartSpec {
        kind: ChartKind::Line,
        data: ChartData {
            labels: round_labels(3),
            datasets: vec![trend_line("총점", vec![81.0, 92.0, 87.0], 6), class_average],
        },
        options,
    }
}
