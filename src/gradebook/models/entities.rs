//! # Domain Entities
//!
//! Value records delivered by the grade-book service. Field names follow the
//! domain; serde attributes map them onto the snake_case wire format.

use serde::{Deserialize, Serialize};

/// A student as stored by the server. Ids are always server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
}

impl Student {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A subject as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}

impl Subject {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A single grade record.
///
/// `student_name` and `subject_name` are optional hints the server may
/// denormalize into the record. When they are missing the display name is
/// resolved against the local snapshot, see [`UiState::student_label`].
///
/// [`UiState::student_label`]: super::UiState::student_label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    #[serde(rename = "student", default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    pub subject_id: i64,
    #[serde(rename = "subject", default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
    pub score: f64,
}

impl Grade {
    pub fn new(id: i64, student_id: i64, subject_id: i64, score: f64) -> Self {
        Self {
            id,
            student_id,
            student_name: None,
            subject_id,
            subject_name: None,
            score,
        }
    }

    pub fn with_names(mut self, student: impl Into<String>, subject: impl Into<String>) -> Self {
        self.student_name = Some(student.into());
        self.subject_name = Some(subject.into());
        self
    }
}

/// Aggregate score for one subject. Fetched on demand, never kept in state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageResponse {
    pub subject_id: i64,
    #[serde(rename = "subject")]
    pub subject_name: String,
    #[serde(default)]
    pub average: Option<f64>,
    #[serde(default)]
    pub count: i64,
}

/// Error body convention of the service: `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
