//! # Input Validation
//!
//! Local checks the controller runs before touching the network. A failure
//! here is posted to the error slot directly and no request is made.

use crate::gradebook::models::{GradePatch, UiState};
use thiserror::Error;

/// Pre-network validation failure. The display text is what the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a student name")]
    MissingStudentName,

    #[error("Enter a subject name")]
    MissingSubjectName,

    #[error("Select a student")]
    MissingStudent,

    #[error("Select a subject")]
    MissingSubject,

    #[error("Enter a numeric score")]
    InvalidScore,

    #[error("Nothing to update")]
    EmptyPatch,
}

/// Fields of a grade that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewGradeInput {
    pub student_id: i64,
    pub subject_id: i64,
    pub score: f64,
}

/// Trim a name buffer, rejecting blank input with `missing`.
pub fn required_name(input: &str, missing: ValidationError) -> Result<String, ValidationError> {
    let name = input.trim();
    if name.is_empty() {
        Err(missing)
    } else {
        Ok(name.to_string())
    }
}

/// Parse a score buffer. Surrounding whitespace is ignored; NaN and
/// infinities are rejected.
pub fn parse_score(text: &str) -> Result<f64, ValidationError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
        .ok_or(ValidationError::InvalidScore)
}

/// Check the add-grade sub-form. Student, then subject, then score: the
/// first missing piece is the one reported.
pub fn validate_new_grade(state: &UiState) -> Result<NewGradeInput, ValidationError> {
    let student_id = state
        .add_grade_student
        .ok_or(ValidationError::MissingStudent)?;
    let subject_id = state
        .add_grade_subject
        .ok_or(ValidationError::MissingSubject)?;
    let score = parse_score(&state.add_grade_score)?;

    Ok(NewGradeInput {
        student_id,
        subject_id,
        score,
    })
}

pub fn validate_patch(patch: &GradePatch) -> Result<(), ValidationError> {
    if patch.is_empty() {
        return Err(ValidationError::EmptyPatch);
    }
    match patch.score {
        Some(score) if !score.is_finite() => Err(ValidationError::InvalidScore),
        _ => Ok(()),
    }
}
