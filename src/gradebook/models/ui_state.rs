//! # UI State Model
//!
//! The aggregate the controller owns and the presentation layer renders.
//! Every field is plain data; the controller is the only writer.

use super::entities::{Grade, Student, Subject};

/// Snapshot of everything the interface displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Students, server order after a fetch, name order after an insertion
    pub students: Vec<Student>,
    /// Subjects, same ordering rules as students
    pub subjects: Vec<Subject>,
    /// Grades exactly as delivered by the last applied fetch
    pub grades: Vec<Grade>,

    /// Filter pair scoping the grades fetch
    pub student_filter: Option<i64>,
    pub subject_filter: Option<i64>,

    /// Free-text input buffers
    pub student_name_input: String,
    pub subject_name_input: String,

    /// "Add grade" sub-form
    pub add_grade_form_visible: bool,
    pub add_grade_student: Option<i64>,
    pub add_grade_subject: Option<i64>,
    pub add_grade_score: String,

    /// Number of started-but-unfinished async operations
    pub loading_depth: u32,

    /// Single pending error; a new one replaces it
    pub error_message: Option<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading_depth > 0
    }

    // === Loading depth ===

    pub(crate) fn begin_loading(&mut self) {
        self.loading_depth = self.loading_depth.saturating_add(1);
    }

    pub(crate) fn finish_loading(&mut self) {
        self.loading_depth = self.loading_depth.saturating_sub(1);
    }

    // === Local insertions ===

    /// Insert a newly created student keeping the list ordered by
    /// lower-cased name. Equal names keep their relative order.
    pub(crate) fn insert_student(&mut self, student: Student) {
        self.students.push(student);
        self.students.sort_by_key(|s| s.name.to_lowercase());
    }

    pub(crate) fn insert_subject(&mut self, subject: Subject) {
        self.subjects.push(subject);
        self.subjects.sort_by_key(|s| s.name.to_lowercase());
    }

    pub(crate) fn reset_add_grade_form(&mut self) {
        self.add_grade_form_visible = false;
        self.add_grade_student = None;
        self.add_grade_subject = None;
        self.add_grade_score.clear();
    }

    // === Name resolution ===

    pub fn find_student(&self, id: i64) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn find_subject(&self, id: i64) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Display name of the grade's student: the server hint, then the local
    /// student list, then `"ID {id}"`.
    pub fn student_label(&self, grade: &Grade) -> String {
        grade
            .student_name
            .clone()
            .or_else(|| self.find_student(grade.student_id).map(|s| s.name.clone()))
            .unwrap_or_else(|| placeholder_label(grade.student_id))
    }

    /// Display name of the grade's subject, resolved like [`Self::student_label`].
    pub fn subject_label(&self, grade: &Grade) -> String {
        grade
            .subject_name
            .clone()
            .or_else(|| self.find_subject(grade.subject_id).map(|s| s.name.clone()))
            .unwrap_or_else(|| placeholder_label(grade.subject_id))
    }
}

fn placeholder_label(id: i64) -> String {
    format!("ID {id}")
}
