use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::core::config::Settings;
use crate::schemas::SubScores;

pub const PLACEHOLDER_FEEDBACK: &str = "• 제시문 각각에 대한 이해는 준수함\n\
• 출제의도에 부합하는 구성은 내용과 형식 면 모두 고려해야\n\
• 논증 답안을 작성할 때는 세부근거가 제시문과 잘 연결됨을 명시적으로 드러내야 할 것";

/// Per-field extraction result in form order; absent fields were not found.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractedScores {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score3: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score4: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score5: Option<f64>,
}

impl ExtractedScores {
    pub fn as_array(&self) -> [Option<f64>; 5] {
        [self.score1, self.score2, self.score3, self.score4, self.score5]
    }

    /// The values, provided none exceeds its rubric range.
    pub fn validated(&self) -> Option<[Option<f64>; 5]> {
        let values = self.as_array();
        if values.iter().all(Option::is_none) {
            return None;
        }
        let probe = SubScores::from_array(values.map(|value| value.unwrap_or(0.0)));
        probe.validate().ok().map(|_| values)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<ExtractedScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reads rubric scores off a marked-up answer sheet.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// `file_url` is a `data:` URL for images or a `blob:` reference for PDFs.
    async fn analyze(&self, file_url: &str, mime: &str) -> Result<AnalysisReport>;
}

/// Stand-in provider: waits, then reports plausible high scores. The file is
/// never looked at.
#[derive(Debug, Clone)]
pub struct SimulatedAnalysis {
    latency: Duration,
}

impl SimulatedAnalysis {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Duration::from_millis(settings.analysis().latency_ms))
    }
}

#[async_trait]
impl AnalysisProvider for SimulatedAnalysis {
    async fn analyze(&self, _file_url: &str, mime: &str) -> Result<AnalysisReport> {
        tokio::time::sleep(self.latency).await;
        let scores = draw_scores();
        tracing::debug!(mime, ?scores, "Simulated analysis finished");

        Ok(AnalysisReport {
            success: true,
            scores: Some(scores),
            feedback: Some(PLACEHOLDER_FEEDBACK.to_string()),
            error: None,
        })
    }
}

fn draw_scores() -> ExtractedScores {
    let mut rng = rand::thread_rng();
    let mut draw = |low: u8, high: u8| Some(f64::from(rng.gen_range(low..=high)));
    ExtractedScores {
        score1: draw(18, 20),
        score2: draw(26, 30),
        score3: draw(17, 19),
        score4: draw(17, 19),
        score5: draw(9, 10),
    }
}

/// Posts the encoded file to an external analysis service that answers in
/// the same report shape.
#[derive(Debug, Clone)]
pub struct RemoteAnalysis {
    client: Client,
    endpoint: Url,
}

impl RemoteAnalysis {
    pub fn new(endpoint: Url) -> Result<Self> {
        let client = Client::builder().build().context("Failed to build analysis HTTP client")?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl AnalysisProvider for RemoteAnalysis {
    async fn analyze(&self, file_url: &str, mime: &str) -> Result<AnalysisReport> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "image": file_url, "type": mime }))
            .send()
            .await
            .context("Failed to call analysis service")?;

        let status = response.status();
        let raw_body = response.text().await.context("Failed to read analysis response")?;
        let report = serde_json::from_str::<AnalysisReport>(&raw_body).map_err(|err| {
            anyhow::anyhow!("Analysis service returned an unexpected body (status {status}): {err}")
        })?;

        tracing::info!(
            success = report.success,
            status = status.as_u16(),
            "Remote analysis finished"
        );
        Ok(report)
    }
}

/// The remote service when one is configured, the simulation otherwise.
pub fn provider_from_settings(settings: &Settings) -> Result<Arc<dyn AnalysisProvider>> {
    match &settings.analysis().endpoint {
        Some(endpoint) => Ok(Arc::new(RemoteAnalysis::new(endpoint.clone())?)),
        None => Ok(Arc::new(SimulatedAnalysis::from_settings(settings))),
    }
}
