pub mod client;
mod envelope;
pub mod errors;
pub mod query;

use async_trait::async_trait;
use serde::Deserialize;

pub use client::SheetApiClient;
pub use errors::ApiError;
pub use query::Operation;

use crate::schemas::{ClassInfo, DashboardStats, ScoreRecord, SessionUser, Student};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginGrant {
    pub token: String,
    pub user: SessionUser,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWrite {
    #[serde(default)]
    pub score_id: Option<String>,
}

/// The remote spreadsheet service, one method per logical operation. Each
/// method yields the operation's typed payload or an [`ApiError`]; nothing is
/// retried and concurrent calls may complete in any order.
#[async_trait]
pub trait ScoreApi: Send + Sync {
    async fn login(&self, user_id: &str, password: &str) -> Result<LoginGrant, ApiError>;

    async fn classes(&self) -> Result<Vec<ClassInfo>, ApiError>;

    async fn class(&self, class_id: &str) -> Result<ClassInfo, ApiError>;

    async fn students(&self, class_id: Option<&str>) -> Result<Vec<Student>, ApiError>;

    async fn student(&self, student_id: &str) -> Result<Student, ApiError>;

    async fn scores(&self, student_id: Option<&str>) -> Result<Vec<ScoreRecord>, ApiError>;

    async fn score(&self, score_id: &str) -> Result<ScoreRecord, ApiError>;

    /// Not idempotent: every call creates a new record.
    async fn create_score(&self, record: &ScoreRecord) -> Result<ScoreWrite, ApiError>;

    async fn update_score(
        &self,
        score_id: &str,
        record: &ScoreRecord,
    ) -> Result<ScoreWrite, ApiError>;

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError>;
}
