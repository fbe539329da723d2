use serde::{Deserialize, Serialize};

use crate::schemas::number::lenient_f64;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_students: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub weekly_scores: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub average_score: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub top_students: f64,
    #[serde(default)]
    pub class_averages: Vec<ClassAverage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAverage {
    pub class_name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub average: f64,
}
