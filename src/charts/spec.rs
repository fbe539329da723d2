use serde::Serialize;

use crate::schemas::format_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Radar,
    Line,
}

/// Everything the rendering library needs to draw one chart instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(flatten)]
    pub style: DatasetStyle,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStyle {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub background_color: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_dash: Option<[u8; 2]>,
    pub fill: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_radius: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_hover_radius: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_background_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub legend: Legend,
    pub tooltip: Tooltip,
    pub scale: ScoreScale,
    /// Hovering one x position shows every dataset at that index.
    pub index_interaction: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub display: bool,
    pub use_point_style: bool,
}

impl Legend {
    pub fn hidden() -> Self {
        Self { display: false, use_point_style: false }
    }

    pub fn top() -> Self {
        Self { display: true, use_point_style: false }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "source", content = "text")]
pub enum TooltipLabel {
    /// The same caption for every dataset.
    Fixed(String),
    /// The hovered dataset's own label.
    Dataset,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub label: TooltipLabel,
    pub suffix: String,
}

impl Tooltip {
    pub fn format(&self, dataset_label: &str, value: f64) -> String {
        let caption = match &self.label {
            TooltipLabel::Fixed(text) => text.as_str(),
            TooltipLabel::Dataset => dataset_label,
        };
        format!("{caption}: {}{}", format_number(value), self.suffix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleAxis {
    /// Vertical value axis of bar and line charts.
    Y,
    /// Radial axis of radar charts.
    R,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreScale {
    pub axis: ScaleAxis,
    pub min: f64,
    pub max: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_suffix: Option<String>,
}

impl ScoreScale {
    pub fn tick_label(&self, value: f64) -> String {
        let suffix = self.tick_suffix.as_deref().unwrap_or_default();
        format!("{}{suffix}", format_number(value))
    }
}
