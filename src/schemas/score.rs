use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::schemas::number::{lenient_f64, lenient_opt_f64, lenient_opt_u32};
use crate::scores::grade::Grade;

/// Maximum of each rubric component, in field order.
pub const SUB_SCORE_MAXIMA: [f64; 5] = [20.0, 30.0, 20.0, 20.0, 10.0];

/// Korean rubric labels, in field order.
pub const SUB_SCORE_LABELS: [&str; 5] = ["독해력", "내용 이해력", "문제 이해력", "구성력", "형식"];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct SubScores {
    #[serde(deserialize_with = "lenient_f64")]
    #[validate(range(min = 0.0, max = 20.0, message = "reading must be within 0..=20"))]
    pub reading: f64,
    #[serde(deserialize_with = "lenient_f64")]
    #[validate(range(min = 0.0, max = 30.0, message = "content must be within 0..=30"))]
    pub content_understanding: f64,
    #[serde(deserialize_with = "lenient_f64")]
    #[validate(range(min = 0.0, max = 20.0, message = "problem must be within 0..=20"))]
    pub problem_understanding: f64,
    #[serde(deserialize_with = "lenient_f64")]
    #[validate(range(min = 0.0, max = 20.0, message = "composition must be within 0..=20"))]
    pub composition: f64,
    #[serde(deserialize_with = "lenient_f64")]
    #[validate(range(min = 0.0, max = 10.0, message = "format must be within 0..=10"))]
    pub format: f64,
}

impl SubScores {
    pub fn from_array(values: [f64; 5]) -> Self {
        let [reading, content_understanding, problem_understanding, composition, format] = values;
        Self { reading, content_understanding, problem_understanding, composition, format }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [
            self.reading,
            self.content_understanding,
            self.problem_understanding,
            self.composition,
            self.format,
        ]
    }

    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Each component rescaled to a 0–100 axis against its own maximum.
    pub fn normalized(&self) -> [f64; 5] {
        let values = self.as_array();
        std::array::from_fn(|index| values[index] / SUB_SCORE_MAXIMA[index] * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ScoreRow")]
pub struct ScoreRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_id: Option<String>,
    pub student_id: String,
    pub class_id: String,
    pub assignment_name: String,
    pub round: u32,
    pub written_date: String,
    pub scores: SubScores,
    pub total_score: f64,
    pub grade: Grade,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

/// A score row as the sheet returns it. Hand-edited rows may have blank
/// cells or a grade label the dashboard does not know; those are filled in
/// from the rest of the row.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScoreRow {
    score_id: Option<String>,
    student_id: String,
    class_id: String,
    assignment_name: String,
    #[serde(deserialize_with = "lenient_opt_u32")]
    round: Option<u32>,
    written_date: String,
    scores: SubScores,
    #[serde(deserialize_with = "lenient_opt_f64")]
    total_score: Option<f64>,
    #[serde(deserialize_with = "lenient_grade")]
    grade: Option<Grade>,
    feedback: Option<String>,
    attachment_url: Option<String>,
}

impl From<ScoreRow> for ScoreRecord {
    fn from(row: ScoreRow) -> Self {
        let total_score = row.total_score.unwrap_or_else(|| row.scores.total());
        Self {
            score_id: row.score_id,
            student_id: row.student_id,
            class_id: row.class_id,
            assignment_name: row.assignment_name,
            round: row.round.filter(|round| *round > 0).unwrap_or(1),
            written_date: row.written_date,
            scores: row.scores,
            total_score,
            grade: row.grade.unwrap_or_else(|| Grade::from_total(total_score)),
            feedback: row.feedback.unwrap_or_default(),
            attachment_url: row.attachment_url.filter(|url| !url.trim().is_empty()),
        }
    }
}

fn lenient_grade<'de, D>(deserializer: D) -> Result<Option<Grade>, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(Grade::from_label))
}
