pub mod form;
pub mod grade;
pub mod selection;
pub mod submit;

pub use form::{calculate_total, ScoreForm, ScoreSummary, SubScoreField};
pub use grade::Grade;
pub use submit::{handle_score_submit, SubmitOutcome};
