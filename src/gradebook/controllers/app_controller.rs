//! # Application Controller
//!
//! Line-oriented front end: reads commands, turns them into controller
//! operations, waits for the controller to settle and renders the result.
//! Input and output are injected so the loop runs the same against a
//! terminal or an in-memory script.

use super::grades_controller::GradesController;
use crate::gradebook::commands::{parse_intent, UserIntent, HELP_TEXT};
use crate::gradebook::views::{TextRenderer, ViewRenderer};
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub struct AppController<R, W: Write> {
    controller: GradesController,
    input: R,
    renderer: TextRenderer<W>,
}

impl<R: AsyncBufRead + Unpin, W: Write> AppController<R, W> {
    pub fn new(controller: GradesController, input: R, output: W) -> Self {
        Self {
            controller,
            input,
            renderer: TextRenderer::new(output),
        }
    }

    /// Consume the app, handing back the output writer.
    pub fn into_output(self) -> W {
        self.renderer.into_inner()
    }

    /// Run until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        self.settle_and_render().await?;

        loop {
            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .await
                .context("Failed to read command")?;
            if read == 0 {
                tracing::debug!("Input closed");
                break;
            }

            match parse_intent(&line) {
                Ok(None) => continue,
                Ok(Some(UserIntent::Quit)) => break,
                Ok(Some(intent)) => {
                    tracing::debug!("Applying intent: {intent:?}");
                    self.apply_intent(intent).await?;
                }
                Err(e) => self.renderer.render_error(&e.to_string())?,
            }
        }

        Ok(())
    }

    /// Apply one intent. Returns once every operation it started is finished.
    async fn apply_intent(&mut self, intent: UserIntent) -> Result<()> {
        let controller = &self.controller;
        let render = match intent {
            UserIntent::Refresh => {
                controller.refresh_all();
                true
            }
            UserIntent::StudentNameInput(text) => {
                controller.update_student_name_input(text);
                false
            }
            UserIntent::SubmitStudent => controller.submit_new_student().is_some(),
            UserIntent::SubjectNameInput(text) => {
                controller.update_subject_name_input(text);
                false
            }
            UserIntent::SubmitSubject => controller.submit_new_subject().is_some(),
            UserIntent::StudentFilter(id) => {
                controller.update_student_filter(id);
                true
            }
            UserIntent::SubjectFilter(id) => {
                controller.update_subject_filter(id);
                true
            }
            UserIntent::ToggleAddGradeForm => {
                controller.toggle_add_grade_form();
                true
            }
            UserIntent::AddGradeStudent(id) => {
                controller.set_add_grade_student(id);
                false
            }
            UserIntent::AddGradeSubject(id) => {
                controller.set_add_grade_subject(id);
                false
            }
            UserIntent::AddGradeScore(text) => {
                controller.update_add_grade_score(text);
                false
            }
            UserIntent::SubmitGrade => controller.submit_new_grade().is_some(),
            UserIntent::UpdateGradeScore { grade_id, score } => {
                controller.update_grade_score(grade_id, &score).is_some()
            }
            UserIntent::SubjectAverage(subject_id) => {
                if let Some(average) = controller.subject_average(subject_id).await {
                    self.renderer.render_average(&average)?;
                }
                false
            }
            UserIntent::Show => true,
            UserIntent::Help => {
                self.renderer.render_message(HELP_TEXT)?;
                false
            }
            UserIntent::Quit => false,
        };

        if render {
            self.settle_and_render().await
        } else {
            self.flush_error()
        }
    }

    async fn settle_and_render(&mut self) -> Result<()> {
        self.controller.wait_until_idle().await;
        self.renderer.render_full(&self.controller.state())?;
        self.flush_error()
    }

    /// Show the pending error once, then clear it.
    fn flush_error(&mut self) -> Result<()> {
        if let Some(message) = self.controller.state().error_message {
            self.renderer.render_error(&message)?;
            self.controller.clear_error();
        }
        Ok(())
    }
}
