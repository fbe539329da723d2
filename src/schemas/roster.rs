use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub class_id: String,
    #[serde(default, alias = "name")]
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(alias = "studentId")]
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub class_id: String,
}
