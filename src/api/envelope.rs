//! Per-operation interpretation of the service's response bodies.
//!
//! Writes and login answer with a `success` flag; reads answer with the
//! requested data under a fixed key; dashboard stats are the bare object.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::errors::ApiError;
use crate::api::query::Operation;

pub(crate) fn require_success(operation: Operation, body: Value) -> Result<Value, ApiError> {
    if body.get("success").and_then(Value::as_bool).unwrap_or(false) {
        Ok(body)
    } else {
        Err(rejected(operation, &body))
    }
}

pub(crate) fn take_key<T: DeserializeOwned>(
    operation: Operation,
    mut body: Value,
    key: &str,
) -> Result<T, ApiError> {
    match body.get_mut(key).map(Value::take) {
        Some(value) if !value.is_null() => decode(operation, value),
        _ => Err(rejected(operation, &body)),
    }
}

/// A list under `key`. Rows that still cannot be read are dropped with a
/// warning so one broken sheet row does not hide the others.
pub(crate) fn take_rows<T: DeserializeOwned>(
    operation: Operation,
    mut body: Value,
    key: &str,
) -> Result<Vec<T>, ApiError> {
    let rows = match body.get_mut(key).map(Value::take) {
        Some(Value::Array(rows)) => rows,
        Some(value) if !value.is_null() => {
            return Err(ApiError::Decode {
                operation: operation.name(),
                detail: format!("expected a list under {key:?}, got {value}"),
            });
        }
        _ => return Err(rejected(operation, &body)),
    };

    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(
                    operation = operation.name(),
                    index,
                    error = %err,
                    "Skipping unreadable row"
                );
                None
            }
        })
        .collect();
    if decoded.len() < total {
        metrics::counter!("api_skipped_rows_total", "operation" => operation.name())
            .increment((total - decoded.len()) as u64);
    }
    Ok(decoded)
}

pub(crate) fn take_object<T: DeserializeOwned>(
    operation: Operation,
    body: Value,
) -> Result<T, ApiError> {
    if !body.is_object() || body.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(rejected(operation, &body));
    }
    decode(operation, body)
}

pub(crate) fn decode<T: DeserializeOwned>(
    operation: Operation,
    value: Value,
) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|err| ApiError::Decode { operation: operation.name(), detail: err.to_string() })
}

fn rejected(operation: Operation, body: &Value) -> ApiError {
    ApiError::Rejected { operation: operation.name(), message: rejection_message(body) }
}

pub(crate) fn rejection_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{DashboardStats, Student};
    use serde_json::json;

    #[test]
    fn success_flag_false_carries_error_text() {
        let body = json!({ "success": false, "error": "비밀번호 오류" });
        let err = require_success(Operation::Login, body).unwrap_err();
        assert_eq!(err.rejection_message(), Some("비밀번호 오류"));
        assert_eq!(err.operation(), "login");
    }

    #[test]
    fn missing_success_flag_is_a_rejection() {
        let err = require_success(Operation::CreateScore, json!({ "scoreId": "x" })).unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(err.rejection_message(), None);
    }

    #[test]
    fn data_key_presence_signals_success() {
        let student: Student = take_key(
            Operation::GetStudent,
            json!({ "student": { "userId": "s0007", "name": "김하늘", "classId": "korea-1" } }),
            "student",
        )
        .unwrap();
        assert_eq!(student.name, "김하늘");

        let err = take_key::<Student>(
            Operation::GetStudent,
            json!({ "message": "not found" }),
            "student",
        )
        .unwrap_err();
        assert_eq!(err.rejection_message(), Some("not found"));
    }

    #[test]
    fn wrong_shape_under_data_key_is_a_decode_error() {
        let body = json!({ "students": 3 });
        let err = take_key::<Vec<Student>>(Operation::ListStudents, body, "students").unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn unreadable_rows_are_skipped() {
        let body = json!({ "students": [
            { "userId": "s0007", "name": "김하늘", "classId": "korea-1" },
            { "userId": ["broken"] },
            { "userId": "s0008", "name": "이서준", "classId": "korea-1" }
        ] });
        let students: Vec<Student> = take_rows(Operation::ListStudents, body, "students").unwrap();
        let ids: Vec<&str> = students.iter().map(|student| student.user_id.as_str()).collect();
        assert_eq!(ids, ["s0007", "s0008"]);
    }

    #[test]
    fn rows_require_a_list() {
        let body = json!({ "students": 3 });
        let err = take_rows::<Student>(Operation::ListStudents, body, "students").unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));

        let body = json!({ "error": "권한 없음" });
        let err = take_rows::<Student>(Operation::ListStudents, body, "students").unwrap_err();
        assert_eq!(err.rejection_message(), Some("권한 없음"));
    }

    #[test]
    fn dashboard_object_is_taken_verbatim() {
        let stats: DashboardStats =
            take_object(Operation::DashboardStats, json!({ "totalStudents": 3 })).unwrap();
        assert_eq!(stats.total_students, 3.0);

        let err =
            take_object::<DashboardStats>(Operation::DashboardStats, json!(null)).unwrap_err();
        assert!(err.is_rejection());
    }
}
