use reqwest::Url;
use serde_json::{Map, Value};

use crate::api::errors::ApiError;
use crate::schemas::ScoreRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    ListClasses,
    GetClass,
    ListStudents,
    GetStudent,
    ListScores,
    GetScore,
    CreateScore,
    UpdateScore,
    DashboardStats,
}

impl Operation {
    /// Resource collection selected by the `path` query parameter.
    pub fn path(self) -> &'static str {
        match self {
            Operation::Login => "auth",
            Operation::ListClasses | Operation::GetClass => "classes",
            Operation::ListStudents | Operation::GetStudent => "students",
            Operation::ListScores
            | Operation::GetScore
            | Operation::CreateScore
            | Operation::UpdateScore => "scores",
            Operation::DashboardStats => "dashboard",
        }
    }

    /// Value of the `action` parameter; the dashboard collection has a single
    /// implicit operation.
    pub fn action(self) -> Option<&'static str> {
        match self {
            Operation::Login => Some("login"),
            Operation::ListClasses | Operation::ListStudents | Operation::ListScores => {
                Some("list")
            }
            Operation::GetClass | Operation::GetStudent | Operation::GetScore => Some("get"),
            Operation::CreateScore => Some("create"),
            Operation::UpdateScore => Some("update"),
            Operation::DashboardStats => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::ListClasses => "list_classes",
            Operation::GetClass => "get_class",
            Operation::ListStudents => "list_students",
            Operation::GetStudent => "get_student",
            Operation::ListScores => "list_scores",
            Operation::GetScore => "get_score",
            Operation::CreateScore => "create_score",
            Operation::UpdateScore => "update_score",
            Operation::DashboardStats => "dashboard_stats",
        }
    }
}

/// GET url: `?path=<collection>[&action=<op>]` followed by the caller's
/// parameters, all percent-encoded.
pub fn read_url(base: &Url, operation: Operation, params: &[(&str, &str)]) -> Url {
    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("path", operation.path());
        if let Some(action) = operation.action() {
            pairs.append_pair("action", action);
        }
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    url
}

/// POST url for mutations: only the collection travels in the query string.
pub fn write_url(base: &Url, operation: Operation) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut().append_pair("path", operation.path());
    url
}

/// POST body: `action`, the target `scoreId` for updates, then the record's
/// own fields.
pub fn write_body(
    operation: Operation,
    score_id: Option<&str>,
    record: &ScoreRecord,
) -> Result<Value, ApiError> {
    let mut body = Map::new();
    if let Some(action) = operation.action() {
        body.insert("action".to_string(), Value::String(action.to_string()));
    }
    if let Some(score_id) = score_id {
        body.insert("scoreId".to_string(), Value::String(score_id.to_string()));
    }

    let fields = serde_json::to_value(record).map_err(|err| ApiError::Decode {
        operation: operation.name(),
        detail: format!("score record is not serializable: {err}"),
    })?;
    if let Value::Object(fields) = fields {
        for (key, value) in fields {
            body.entry(key).or_insert(value);
        }
    }

    Ok(Value::Object(body))
}
