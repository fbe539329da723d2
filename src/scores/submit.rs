use crate::api::{ApiError, ScoreApi, ScoreWrite};
use crate::charts::ChartRegistry;
use crate::core::time;
use crate::scores::form::{calculate_total, ScoreForm};
use crate::screen::Screen;

pub const SELECT_CLASS_AND_STUDENT: &str = "반과 학생을 선택하세요";
pub const SCORE_SAVED: &str = "점수가 성공적으로 저장되었습니다!";
pub const SAVE_REJECTED: &str = "저장 실패";
pub const SAVE_FAILED: &str = "점수 저장 중 오류가 발생했습니다";

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Class or student not chosen; nothing was sent.
    MissingSelection,
    Saved(ScoreWrite),
    Rejected(Option<String>),
    Failed(ApiError),
}

impl SubmitOutcome {
    fn label(&self) -> &'static str {
        match self {
            SubmitOutcome::MissingSelection => "missing_selection",
            SubmitOutcome::Saved(_) => "saved",
            SubmitOutcome::Rejected(_) => "rejected",
            SubmitOutcome::Failed(_) => "failed",
        }
    }
}

/// Sends the form as a new score record. On success the form is cleared and
/// recomputed; on any failure it is left as entered so the user can retry.
pub async fn handle_score_submit(
    form: &mut ScoreForm,
    charts: &mut ChartRegistry,
    api: &dyn ScoreApi,
    screen: &mut Screen,
) -> SubmitOutcome {
    if !form.has_selection() {
        screen.alert(SELECT_CLASS_AND_STUDENT);
        return SubmitOutcome::MissingSelection;
    }

    let record = form.to_record(time::format_offset(time::now_utc()));

    screen.set_loading(true);
    let result = api.create_score(&record).await;
    screen.set_loading(false);

    let outcome = match result {
        Ok(write) => {
            tracing::info!(
                student_id = %record.student_id,
                class_id = %record.class_id,
                round = record.round,
                total = record.total_score,
                score_id = write.score_id.as_deref().unwrap_or_default(),
                "Score saved"
            );
            screen.alert_success(SCORE_SAVED);
            form.reset();
            calculate_total(form, charts);
            SubmitOutcome::Saved(write)
        }
        Err(err) if err.is_rejection() => {
            let message = err.rejection_message().map(str::to_string);
            screen.alert(message.clone().unwrap_or_else(|| SAVE_REJECTED.to_string()));
            SubmitOutcome::Rejected(message)
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to save score");
            screen.alert(SAVE_FAILED);
            SubmitOutcome::Failed(err)
        }
    };

    metrics::counter!("scores_submitted_total", "outcome" => outcome.label()).increment(1);
    outcome
}
