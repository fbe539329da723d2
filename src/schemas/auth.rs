use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    /// Teachers and administrators; the service uses several role names for
    /// non-student accounts.
    #[serde(other)]
    Staff,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
}

impl SessionUser {
    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "user_id must not be empty"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}
