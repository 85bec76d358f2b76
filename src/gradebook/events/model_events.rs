//! # Model Events
//!
//! Emitted after every mutation of the UI state so subscribers know what
//! changed without diffing snapshots.

/// Which slice of the UI state a mutation touched.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    StudentsChanged,
    SubjectsChanged,
    GradesChanged,

    /// Student or subject filter changed
    FiltersChanged {
        student_filter: Option<i64>,
        subject_filter: Option<i64>,
    },

    /// A free-text input buffer changed
    InputChanged,

    /// Add-grade sub-form visibility or fields changed
    AddGradeFormChanged,

    /// Loading depth moved up or down
    LoadingChanged {
        depth: u32,
    },

    /// An error was posted to the error slot
    ErrorPosted {
        message: String,
    },

    ErrorCleared,
}
