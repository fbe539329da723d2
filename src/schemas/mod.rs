pub mod auth;
pub mod dashboard;
pub mod number;
pub mod roster;
pub mod score;

pub use auth::{LoginForm, Role, SessionUser};
pub use dashboard::{ClassAverage, DashboardStats};
pub use number::format_number;
pub use roster::{ClassInfo, Student};
pub use score::{ScoreRecord, SubScores, SUB_SCORE_LABELS, SUB_SCORE_MAXIMA};
