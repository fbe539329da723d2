use std::time::Duration;

use tokio::time::Instant;

use crate::charts::{self, ChartRegistry};
use crate::schemas::{format_number, ClassInfo, ScoreRecord, Student, SubScores, SUB_SCORE_MAXIMA};
use crate::scores::grade::Grade;

pub const DEFAULT_ASSIGNMENT_NAME: &str = "논술 과제";

/// How long an autofilled field stays flagged as updated.
pub const FIELD_HIGHLIGHT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubScoreField {
    Reading,
    ContentUnderstanding,
    ProblemUnderstanding,
    Composition,
    Format,
}

impl SubScoreField {
    pub const ALL: [SubScoreField; 5] = [
        SubScoreField::Reading,
        SubScoreField::ContentUnderstanding,
        SubScoreField::ProblemUnderstanding,
        SubScoreField::Composition,
        SubScoreField::Format,
    ];

    pub fn index(self) -> usize {
        match self {
            SubScoreField::Reading => 0,
            SubScoreField::ContentUnderstanding => 1,
            SubScoreField::ProblemUnderstanding => 2,
            SubScoreField::Composition => 3,
            SubScoreField::Format => 4,
        }
    }

    pub fn input_id(self) -> &'static str {
        match self {
            SubScoreField::Reading => "score1",
            SubScoreField::ContentUnderstanding => "score2",
            SubScoreField::ProblemUnderstanding => "score3",
            SubScoreField::Composition => "score4",
            SubScoreField::Format => "score5",
        }
    }

    pub fn max(self) -> f64 {
        SUB_SCORE_MAXIMA[self.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSummary {
    pub total: f64,
    pub grade: Grade,
}

impl Default for ScoreSummary {
    fn default() -> Self {
        Self { total: 0.0, grade: Grade::from_total(0.0) }
    }
}

impl ScoreSummary {
    pub fn total_text(&self) -> String {
        format_number(self.total)
    }

    pub fn badge_class(&self) -> String {
        format!("grade-badge {}", self.grade.badge_class())
    }
}

/// Raw state of the score entry form. Inputs are kept as typed so that
/// partially entered or invalid values survive a failed submission.
#[derive(Debug, Clone, Default)]
pub struct ScoreForm {
    pub class_id: String,
    pub student_id: String,
    pub class_options: Vec<ClassInfo>,
    pub student_options: Vec<Student>,
    pub assignment_name: String,
    pub round: String,
    pub feedback: String,
    inputs: [String; 5],
    updated_until: [Option<Instant>; 5],
    summary: ScoreSummary,
}

impl ScoreForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self, field: SubScoreField) -> &str {
        &self.inputs[field.index()]
    }

    pub fn set_input(&mut self, field: SubScoreField, value: impl Into<String>) {
        self.inputs[field.index()] = value.into();
    }

    /// The five inputs read the way the browser's `parseFloat` does; blanks
    /// and garbage count as zero.
    pub fn sub_scores(&self) -> SubScores {
        SubScores::from_array(std::array::from_fn(|index| {
            parse_float_prefix(&self.inputs[index]).unwrap_or(0.0)
        }))
    }

    /// Writes each provided value into its field and flags it as freshly
    /// updated. `None` leaves that field untouched.
    pub fn fill(&mut self, values: [Option<f64>; 5]) {
        let until = Instant::now() + FIELD_HIGHLIGHT;
        for (index, value) in values.into_iter().enumerate() {
            if let Some(value) = value {
                self.inputs[index] = format_number(value);
                self.updated_until[index] = Some(until);
            }
        }
    }

    pub fn is_highlighted(&self, field: SubScoreField) -> bool {
        self.updated_until[field.index()].is_some_and(|until| Instant::now() < until)
    }

    pub fn summary(&self) -> ScoreSummary {
        self.summary
    }

    pub fn has_selection(&self) -> bool {
        !self.class_id.is_empty() && !self.student_id.is_empty()
    }

    /// Clears every control back to its blank state. Loaded select options
    /// stay; the computed summary is left for the next recomputation.
    pub fn reset(&mut self) {
        self.class_id.clear();
        self.student_id.clear();
        self.assignment_name.clear();
        self.round.clear();
        self.feedback.clear();
        self.inputs = Default::default();
        self.updated_until = [None; 5];
    }

    /// Builds the record to submit. Sub-scores are truncated to whole points
    /// and the round falls back to 1.
    pub fn to_record(&self, written_date: String) -> ScoreRecord {
        let scores = SubScores::from_array(std::array::from_fn(|index| {
            parse_int_prefix(&self.inputs[index]).map_or(0.0, |value| value as f64)
        }));
        let total_score = scores.total();
        let assignment_name = if self.assignment_name.is_empty() {
            DEFAULT_ASSIGNMENT_NAME.to_string()
        } else {
            self.assignment_name.clone()
        };
        let round = parse_int_prefix(&self.round)
            .and_then(|round| u32::try_from(round).ok())
            .filter(|round| *round > 0)
            .unwrap_or(1);

        ScoreRecord {
            score_id: None,
            student_id: self.student_id.clone(),
            class_id: self.class_id.clone(),
            assignment_name,
            round,
            written_date,
            scores,
            total_score,
            grade: Grade::from_total(total_score),
            feedback: self.feedback.clone(),
            attachment_url: None,
        }
    }
}

/// Recomputes total and grade from the current inputs and pushes the
/// normalised values into the radar chart. Run after every edit.
pub fn calculate_total(form: &mut ScoreForm, charts: &mut ChartRegistry) -> ScoreSummary {
    let scores = form.sub_scores();
    let total = scores.total();
    form.summary = ScoreSummary { total, grade: Grade::from_total(total) };
    charts::update_radar_chart(charts, &scores);
    form.summary
}

/// Longest leading decimal literal, ignoring leading whitespace.
fn parse_float_prefix(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let candidate_len = trimmed
        .char_indices()
        .find(|(_, ch)| !(ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.' | 'e' | 'E')))
        .map_or(trimmed.len(), |(index, _)| index);

    (1..=candidate_len)
        .rev()
        .find_map(|end| trimmed[..end].parse::<f64>().ok())
        .filter(|value| !value.is_nan())
}

fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits.find(|ch: char| !ch.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}
