use std::sync::Arc;

use crate::charts::ChartRegistry;
use crate::intake::analysis::{AnalysisProvider, AnalysisReport};
use crate::intake::encoding::{encode, EncodedFile, ObjectUrls};
use crate::intake::validation::validate_upload;
use crate::intake::UploadFile;
use crate::scores::{calculate_total, ScoreForm};
use crate::screen::{BannerKind, Screen, SUCCESS_BANNER_TTL};

pub const ANALYZING: &str = "AI가 첨삭지를 분석하고 있습니다...";
pub const EXTRACTED: &str = "점수가 성공적으로 추출되었습니다!";
pub const EXTRACTION_FAILED: &str = "점수를 추출할 수 없습니다. 파일을 확인해주세요.";
pub const PROCESSING_FAILED: &str = "파일 처리 중 오류가 발생했습니다: ";

/// Progress of the most recent upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntakeState {
    #[default]
    Idle,
    Validating,
    Rejected,
    Encoding,
    Analyzing,
    Filled,
    Failed,
}

impl IntakeState {
    pub fn as_str(self) -> &'static str {
        match self {
            IntakeState::Idle => "idle",
            IntakeState::Validating => "validating",
            IntakeState::Rejected => "rejected",
            IntakeState::Encoding => "encoding",
            IntakeState::Analyzing => "analyzing",
            IntakeState::Filled => "filled",
            IntakeState::Failed => "failed",
        }
    }
}

/// Turns an uploaded answer sheet into pre-filled score fields.
pub struct IntakePipeline {
    provider: Arc<dyn AnalysisProvider>,
    urls: ObjectUrls,
    max_upload_size_mb: u64,
    state: IntakeState,
}

impl IntakePipeline {
    pub fn new(provider: Arc<dyn AnalysisProvider>, max_upload_size_mb: u64) -> Self {
        Self { provider, urls: ObjectUrls::new(), max_upload_size_mb, state: IntakeState::Idle }
    }

    pub fn state(&self) -> IntakeState {
        self.state
    }

    pub fn object_urls(&self) -> &ObjectUrls {
        &self.urls
    }

    fn transition(&mut self, next: IntakeState) {
        tracing::debug!(from = self.state.as_str(), to = next.as_str(), "Intake transition");
        self.state = next;
    }

    pub async fn process(
        &mut self,
        file: &UploadFile,
        form: &mut ScoreForm,
        charts: &mut ChartRegistry,
        screen: &mut Screen,
    ) -> IntakeState {
        self.transition(IntakeState::Validating);
        if let Err(err) = validate_upload(&file.mime, file.size(), self.max_upload_size_mb) {
            tracing::info!(
                name = %file.name,
                mime = %file.mime,
                size = file.size(),
                error = ?err,
                "Upload rejected"
            );
            screen.show_upload_status(BannerKind::Error, err.to_string(), None);
            return self.finish(IntakeState::Rejected);
        }

        screen.show_upload_status(BannerKind::Loading, ANALYZING, None);
        self.transition(IntakeState::Encoding);
        let encoded = encode(file, &mut self.urls);

        self.transition(IntakeState::Analyzing);
        let result = self.provider.analyze(encoded.url(), &file.mime).await;
        if let EncodedFile::Object(url) = &encoded {
            self.urls.revoke(url);
        }

        let next = match result {
            Ok(report) => apply_report(report, form, charts, screen),
            Err(err) => {
                tracing::error!(name = %file.name, error = %err, "Score file processing failed");
                screen.show_upload_status(
                    BannerKind::Error,
                    format!("{PROCESSING_FAILED}{err}"),
                    None,
                );
                IntakeState::Failed
            }
        };
        self.finish(next)
    }

    fn finish(&mut self, terminal: IntakeState) -> IntakeState {
        metrics::counter!("score_extractions_total", "outcome" => terminal.as_str()).increment(1);
        self.transition(terminal);
        terminal
    }
}

fn apply_report(
    report: AnalysisReport,
    form: &mut ScoreForm,
    charts: &mut ChartRegistry,
    screen: &mut Screen,
) -> IntakeState {
    let values = match report.scores.as_ref().and_then(|scores| scores.validated()) {
        Some(values) if report.success => values,
        _ => {
            tracing::warn!(
                success = report.success,
                error = report.error.as_deref().unwrap_or_default(),
                "Analysis produced no usable scores"
            );
            screen.show_upload_status(BannerKind::Error, EXTRACTION_FAILED, None);
            return IntakeState::Failed;
        }
    };

    form.fill(values);
    if let Some(feedback) = report.feedback.filter(|feedback| !feedback.is_empty()) {
        form.feedback = feedback;
    }
    calculate_total(form, charts);
    screen.show_upload_status(BannerKind::Success, EXTRACTED, Some(SUCCESS_BANNER_TTL));
    IntakeState::Filled
}
