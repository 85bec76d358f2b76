//! Request bodies sent to the grade-book service.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewStudentRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSubjectRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGradeRequest {
    pub student_id: i64,
    pub subject_id: i64,
    pub score: f64,
}

/// Partial update of a grade. Absent fields are left untouched server-side
/// and are omitted from the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl GradePatch {
    pub fn score(score: f64) -> Self {
        Self {
            score: Some(score),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.student_id.is_none() && self.subject_id.is_none() && self.score.is_none()
    }
}
