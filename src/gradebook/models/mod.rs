//! # Models Module
//!
//! Domain entities, request bodies and the UI state aggregate.

pub mod entities;
pub mod requests;
pub mod ui_state;

pub use entities::{AverageResponse, ErrorBody, Grade, Student, Subject};
pub use requests::{GradePatch, NewGradeRequest, NewStudentRequest, NewSubjectRequest};
pub use ui_state::UiState;
