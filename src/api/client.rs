use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::api::envelope::{require_success, take_key, take_object, take_rows};
use crate::api::errors::ApiError;
use crate::api::query::{read_url, write_body, write_url, Operation};
use crate::api::{LoginGrant, ScoreApi, ScoreWrite};
use crate::core::config::Settings;
use crate::schemas::{ClassInfo, DashboardStats, ScoreRecord, Student};

/// HTTP client for the spreadsheet web app. Requests carry no timeout and are
/// never retried; the body is parsed as JSON whatever the status code.
#[derive(Debug, Clone)]
pub struct SheetApiClient {
    client: Client,
    base_url: Url,
}

impl SheetApiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.api().base_url.clone())
    }

    pub fn new(base_url: Url) -> Result<Self> {
        let client = Client::builder().build().context("Failed to build spreadsheet API client")?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn read(&self, operation: Operation, params: &[(&str, &str)]) -> Result<Value, ApiError> {
        let url = read_url(&self.base_url, operation, params);
        record_request(operation);
        tracing::debug!(operation = operation.name(), "Calling spreadsheet API");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| transport_error(operation, source))?;

        read_json(operation, response).await
    }

    async fn write(&self, operation: Operation, body: Value) -> Result<Value, ApiError> {
        let url = write_url(&self.base_url, operation);
        record_request(operation);
        tracing::debug!(operation = operation.name(), "Calling spreadsheet API");

        // Sent as plain text, the way the browser posts to the web app.
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain;charset=utf-8"))
            .body(body.to_string())
            .send()
            .await
            .map_err(|source| transport_error(operation, source))?;

        read_json(operation, response).await
    }
}

#[async_trait]
impl ScoreApi for SheetApiClient {
    async fn login(&self, user_id: &str, password: &str) -> Result<LoginGrant, ApiError> {
        let body =
            self.read(Operation::Login, &[("userId", user_id), ("password", password)]).await?;
        let body = observe(Operation::Login, require_success(Operation::Login, body))?;
        observe(Operation::Login, take_object(Operation::Login, body))
    }

    async fn classes(&self) -> Result<Vec<ClassInfo>, ApiError> {
        let body = self.read(Operation::ListClasses, &[]).await?;
        observe(Operation::ListClasses, take_rows(Operation::ListClasses, body, "classes"))
    }

    async fn class(&self, class_id: &str) -> Result<ClassInfo, ApiError> {
        let body = self.read(Operation::GetClass, &[("classId", class_id)]).await?;
        observe(Operation::GetClass, take_key(Operation::GetClass, body, "class"))
    }

    async fn students(&self, class_id: Option<&str>) -> Result<Vec<Student>, ApiError> {
        let class_id = class_id.unwrap_or_default();
        let body = self.read(Operation::ListStudents, &[("classId", class_id)]).await?;
        observe(Operation::ListStudents, take_rows(Operation::ListStudents, body, "students"))
    }

    async fn student(&self, student_id: &str) -> Result<Student, ApiError> {
        let body = self.read(Operation::GetStudent, &[("studentId", student_id)]).await?;
        observe(Operation::GetStudent, take_key(Operation::GetStudent, body, "student"))
    }

    async fn scores(&self, student_id: Option<&str>) -> Result<Vec<ScoreRecord>, ApiError> {
        let student_id = student_id.unwrap_or_default();
        let body = self.read(Operation::ListScores, &[("studentId", student_id)]).await?;
        observe(Operation::ListScores, take_rows(Operation::ListScores, body, "scores"))
    }

    async fn score(&self, score_id: &str) -> Result<ScoreRecord, ApiError> {
        let body = self.read(Operation::GetScore, &[("scoreId", score_id)]).await?;
        observe(Operation::GetScore, take_key(Operation::GetScore, body, "score"))
    }

    async fn create_score(&self, record: &ScoreRecord) -> Result<ScoreWrite, ApiError> {
        let payload = write_body(Operation::CreateScore, None, record)?;
        let body = self.write(Operation::CreateScore, payload).await?;
        let body = observe(Operation::CreateScore, require_success(Operation::CreateScore, body))?;
        observe(Operation::CreateScore, take_object(Operation::CreateScore, body))
    }

    async fn update_score(
        &self,
        score_id: &str,
        record: &ScoreRecord,
    ) -> Result<ScoreWrite, ApiError> {
        let payload = write_body(Operation::UpdateScore, Some(score_id), record)?;
        let body = self.write(Operation::UpdateScore, payload).await?;
        let body = observe(Operation::UpdateScore, require_success(Operation::UpdateScore, body))?;
        observe(Operation::UpdateScore, take_object(Operation::UpdateScore, body))
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let body = self.read(Operation::DashboardStats, &[]).await?;
        observe(Operation::DashboardStats, take_object(Operation::DashboardStats, body))
    }
}

async fn read_json(operation: Operation, response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let raw_body = response.text().await.map_err(|source| transport_error(operation, source))?;

    serde_json::from_str::<Value>(&raw_body).map_err(|err| {
        metrics::counter!("api_failures_total", "operation" => operation.name()).increment(1);
        tracing::warn!(
            operation = operation.name(),
            status = status.as_u16(),
            error = %err,
            "Spreadsheet API returned a non-JSON body"
        );
        ApiError::Decode { operation: operation.name(), detail: format!("status {status}: {err}") }
    })
}

fn transport_error(operation: Operation, source: reqwest::Error) -> ApiError {
    metrics::counter!("api_failures_total", "operation" => operation.name()).increment(1);
    tracing::warn!(operation = operation.name(), error = %source, "Spreadsheet API unreachable");
    ApiError::Transport { operation: operation.name(), source }
}

fn record_request(operation: Operation) {
    metrics::counter!("api_requests_total", "operation" => operation.name()).increment(1);
}

fn observe<T>(operation: Operation, result: Result<T, ApiError>) -> Result<T, ApiError> {
    if let Err(err) = &result {
        metrics::counter!("api_failures_total", "operation" => operation.name()).increment(1);
        tracing::info!(operation = operation.name(), error = %err, "Spreadsheet API declined");
    }
    result
}
