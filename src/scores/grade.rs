use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
}

impl Grade {
    pub fn from_total(total: f64) -> Self {
        match total {
            t if t >= 95.0 => Grade::APlus,
            t if t >= 90.0 => Grade::A,
            t if t >= 85.0 => Grade::BPlus,
            t if t >= 80.0 => Grade::B,
            t if t >= 75.0 => Grade::CPlus,
            t if t >= 70.0 => Grade::C,
            _ => Grade::D,
        }
    }

    /// Reads a grade label as the service writes it; anything else is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "A+" => Some(Grade::APlus),
            "A" => Some(Grade::A),
            "B+" => Some(Grade::BPlus),
            "B" => Some(Grade::B),
            "C+" => Some(Grade::CPlus),
            "C" => Some(Grade::C),
            "D" => Some(Grade::D),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::D => "D",
        }
    }

    /// Badge style on the score entry form: A grades, B grades, everything else.
    pub fn badge_class(self) -> &'static str {
        match self {
            Grade::APlus | Grade::A => "grade-a",
            Grade::BPlus | Grade::B => "grade-b",
            _ => "grade-c",
        }
    }

    /// Badge style on the student score list, keyed by the grade letter.
    pub fn letter_class(self) -> &'static str {
        match self {
            Grade::APlus | Grade::A => "grade-a",
            Grade::BPlus | Grade::B => "grade-b",
            Grade::CPlus | Grade::C => "grade-c",
            Grade::D => "grade-d",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
