//! # Text Renderer
//!
//! Plain-text rendering of a [`UiState`] snapshot. The renderer is a pure
//! function of the snapshot; it never talks to the controller.

use super::labels::{selection_label, Labeled};
use crate::gradebook::models::{AverageResponse, UiState};
use anyhow::Result;
use std::io::Write;

/// Trait for rendering UI state snapshots
pub trait ViewRenderer {
    /// Render the whole snapshot
    fn render_full(&mut self, state: &UiState) -> Result<()>;

    /// Render a transient error message
    fn render_error(&mut self, message: &str) -> Result<()>;

    /// Render an on-demand subject average
    fn render_average(&mut self, average: &AverageResponse) -> Result<()>;

    /// Render free text such as help output
    fn render_message(&mut self, message: &str) -> Result<()>;
}

/// Renderer writing plain text lines to any writer.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_list<T: Labeled>(&mut self, title: &str, items: &[T]) -> Result<()> {
        writeln!(self.out, "{title} ({})", items.len())?;
        for item in items {
            writeln!(self.out, "  #{} {}", item.item_id(), item.label())?;
        }
        Ok(())
    }
}

impl<W: Write> ViewRenderer for TextRenderer<W> {
    fn render_full(&mut self, state: &UiState) -> Result<()> {
        self.render_list("Students", &state.students)?;
        self.render_list("Subjects", &state.subjects)?;

        writeln!(
            self.out,
            "Grades [student: {}, subject: {}] ({})",
            filter_label(&state.students, state.student_filter),
            filter_label(&state.subjects, state.subject_filter),
            state.grades.len()
        )?;
        for grade in &state.grades {
            writeln!(
                self.out,
                "  #{} {} / {}: {}",
                grade.id,
                state.student_label(grade),
                state.subject_label(grade),
                grade.score
            )?;
        }

        if state.add_grade_form_visible {
            writeln!(
                self.out,
                "New grade: student={}, subject={}, score=\"{}\"",
                selection_label(&state.students, state.add_grade_student),
                selection_label(&state.subjects, state.add_grade_subject),
                state.add_grade_score
            )?;
        }

        if state.is_loading() {
            writeln!(self.out, "Loading...")?;
        }

        self.out.flush()?;
        Ok(())
    }

    fn render_error(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "! {message}")?;
        self.out.flush()?;
        Ok(())
    }

    fn render_average(&mut self, average: &AverageResponse) -> Result<()> {
        match average.average {
            Some(value) => writeln!(
                self.out,
                "Average for {}: {value:.2} ({} grades)",
                average.subject_name, average.count
            )?,
            None => writeln!(
                self.out,
                "Average for {}: no grades yet",
                average.subject_name
            )?,
        }
        self.out.flush()?;
        Ok(())
    }

    fn render_message(&mut self, message: &str) -> Result<()> {
        writeln!(self.out, "{message}")?;
        self.out.flush()?;
        Ok(())
    }
}

fn filter_label<T: Labeled>(items: &[T], filter: Option<i64>) -> String {
    match filter {
        None => "all".to_string(),
        some => selection_label(items, some),
    }
}
