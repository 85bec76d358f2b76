//! # Grades Controller
//!
//! Owns the [`UiState`] and is its only writer. Network operations run on
//! tokio tasks that suspend only on the repository call. A state change is
//! applied under one mutex and, before that mutex is released, pushed to
//! the `watch` channel and published on the event bus.
//!
//! Every network operation follows the same path:
//!
//! ```text
//!  caller ──▶ loading +1 ──▶ spawn ──▶ repository call ──▶ apply / post error ──▶ loading -1
//!             (synchronous)            (panics caught)                          (drop guard)
//! ```
//!
//! Tokio tasks are used, so every operation that talks to the repository
//! must be called from inside a runtime.

use super::validation::{self, ValidationError};
use crate::gradebook::events::{EventBus, ModelEvent, SimpleEventBus, StateEventHandler};
use crate::gradebook::models::{AverageResponse, GradePatch, UiState};
use crate::gradebook::services::{ApiError, GradesRepository, Outcome, UNKNOWN_ERROR_MESSAGE};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// What happens when a grades fetch completes after a newer one was started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GradesFetchPolicy {
    /// Whichever fetch completes last overwrites the list, even if its
    /// filter pair is no longer the current one.
    #[default]
    LastResponseWins,
    /// Responses of superseded fetches are dropped.
    LatestRequestWins,
}

impl FromStr for GradesFetchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last-response-wins" => Ok(Self::LastResponseWins),
            "latest-request-wins" => Ok(Self::LatestRequestWins),
            other => Err(format!("Unknown grades fetch policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerOptions {
    pub grades_fetch_policy: GradesFetchPolicy,
}

struct ControllerCore {
    repository: Arc<dyn GradesRepository>,
    state: Mutex<UiState>,
    event_bus: Mutex<SimpleEventBus>,
    snapshots: watch::Sender<UiState>,
    options: ControllerOptions,
    grades_generation: AtomicU64,
}

/// State controller for the grade book. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct GradesController {
    core: Arc<ControllerCore>,
}

impl GradesController {
    /// Create the controller and kick off the initial full refresh.
    pub fn start(repository: Arc<dyn GradesRepository>) -> Self {
        Self::start_with_options(repository, ControllerOptions::default())
    }

    pub fn start_with_options(
        repository: Arc<dyn GradesRepository>,
        options: ControllerOptions,
    ) -> Self {
        let (snapshots, _) = watch::channel(UiState::new());
        let controller = Self {
            core: Arc::new(ControllerCore {
                repository,
                state: Mutex::new(UiState::new()),
                event_bus: Mutex::new(SimpleEventBus::new()),
                snapshots,
                options,
                grades_generation: AtomicU64::new(0),
            }),
        };

        tracing::info!(
            "Grades controller started ({:?})",
            options.grades_fetch_policy
        );
        controller.refresh_all();
        controller
    }

    // === Observation ===

    /// Current snapshot.
    pub fn state(&self) -> UiState {
        self.lock_state().clone()
    }

    /// Register an observer called after every mutation.
    ///
    /// Handlers run on whichever task applied the mutation, while the state
    /// lock is held. They get the new state as an argument and must not call
    /// back into the controller, not even [`GradesController::state`].
    pub fn subscribe(&self, handler: StateEventHandler) {
        self.core
            .event_bus
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribe(handler);
    }

    /// Channel that always holds the latest snapshot.
    pub fn watch(&self) -> watch::Receiver<UiState> {
        self.core.snapshots.subscribe()
    }

    /// Resolve once no async operation is outstanding.
    pub async fn wait_until_idle(&self) {
        let mut receiver = self.watch();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = receiver.wait_for(|state| state.loading_depth == 0).await;
    }

    // === Refreshing ===

    /// Fire all three list refreshes independently.
    pub fn refresh_all(&self) -> Vec<JoinHandle<()>> {
        vec![
            self.refresh_students(),
            self.refresh_subjects(),
            self.refresh_grades(),
        ]
    }

    pub fn refresh_students(&self) -> JoinHandle<()> {
        let repository = self.core.repository.clone();
        self.spawn_tracked(
            async move { repository.list_students().await },
            |controller, students| {
                controller.mutate(|state| {
                    state.students = students;
                    vec![ModelEvent::StudentsChanged]
                })
            },
        )
    }

    pub fn refresh_subjects(&self) -> JoinHandle<()> {
        let repository = self.core.repository.clone();
        self.spawn_tracked(
            async move { repository.list_subjects().await },
            |controller, subjects| {
                controller.mutate(|state| {
                    state.subjects = subjects;
                    vec![ModelEvent::SubjectsChanged]
                })
            },
        )
    }

    /// Fetch grades for the filter pair current at the time of the call.
    pub fn refresh_grades(&self) -> JoinHandle<()> {
        let (student_filter, subject_filter) = {
            let state = self.lock_state();
            (state.student_filter, state.subject_filter)
        };
        let generation = self.core.grades_generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            "Fetching grades #{generation} (student={student_filter:?}, subject={subject_filter:?})"
        );

        let repository = self.core.repository.clone();
        self.spawn_tracked(
            async move { repository.list_grades(student_filter, subject_filter).await },
            move |controller, grades| {
                let policy = controller.core.options.grades_fetch_policy;
                controller.mutate(|state| {
                    let latest = controller.core.grades_generation.load(Ordering::SeqCst);
                    if policy == GradesFetchPolicy::LatestRequestWins && latest != generation {
                        tracing::debug!("Dropping superseded grades fetch #{generation}");
                        return Vec::new();
                    }
                    state.grades = grades;
                    vec![ModelEvent::GradesChanged]
                })
            },
        )
    }

    // === Filters ===

    pub fn update_student_filter(&self, student_id: Option<i64>) -> JoinHandle<()> {
        self.mutate(|state| {
            state.student_filter = student_id;
            vec![filters_changed(state)]
        });
        self.refresh_grades()
    }

    pub fn update_subject_filter(&self, subject_id: Option<i64>) -> JoinHandle<()> {
        self.mutate(|state| {
            state.subject_filter = subject_id;
            vec![filters_changed(state)]
        });
        self.refresh_grades()
    }

    // === Input buffers ===

    pub fn update_student_name_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.mutate(|state| {
            state.student_name_input = text;
            vec![ModelEvent::InputChanged]
        });
    }

    pub fn update_subject_name_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.mutate(|state| {
            state.subject_name_input = text;
            vec![ModelEvent::InputChanged]
        });
    }

    pub fn update_add_grade_score(&self, text: impl Into<String>) {
        let text = text.into();
        self.mutate(|state| {
            state.add_grade_score = text;
            vec![ModelEvent::AddGradeFormChanged]
        });
    }

    // === Add-grade sub-form ===

    pub fn toggle_add_grade_form(&self) {
        self.mutate(|state| {
            state.add_grade_form_visible = !state.add_grade_form_visible;
            vec![ModelEvent::AddGradeFormChanged]
        });
    }

    pub fn set_add_grade_student(&self, student_id: Option<i64>) {
        self.mutate(|state| {
            state.add_grade_student = student_id;
            vec![ModelEvent::AddGradeFormChanged]
        });
    }

    pub fn set_add_grade_subject(&self, subject_id: Option<i64>) {
        self.mutate(|state| {
            state.add_grade_subject = subject_id;
            vec![ModelEvent::AddGradeFormChanged]
        });
    }

    // === Submissions ===

    /// Create a student from the name buffer. Returns `None` when the buffer
    /// is blank; the validation error has been posted in that case.
    pub fn submit_new_student(&self) -> Option<JoinHandle<()>> {
        let input = self.lock_state().student_name_input.clone();
        let name = self.validated(validation::required_name(
            &input,
            ValidationError::MissingStudentName,
        ))?;

        let repository = self.core.repository.clone();
        Some(self.spawn_tracked(
            async move { repository.create_student(&name).await },
            |controller, student| {
                tracing::info!("Student {} created", student.id);
                controller.mutate(|state| {
                    state.insert_student(student);
                    state.student_name_input.clear();
                    vec![ModelEvent::StudentsChanged, ModelEvent::InputChanged]
                })
            },
        ))
    }

    pub fn submit_new_subject(&self) -> Option<JoinHandle<()>> {
        let input = self.lock_state().subject_name_input.clone();
        let name = self.validated(validation::required_name(
            &input,
            ValidationError::MissingSubjectName,
        ))?;

        let repository = self.core.repository.clone();
        Some(self.spawn_tracked(
            async move { repository.create_subject(&name).await },
            |controller, subject| {
                tracing::info!("Subject {} created", subject.id);
                controller.mutate(|state| {
                    state.insert_subject(subject);
                    state.subject_name_input.clear();
                    vec![ModelEvent::SubjectsChanged, ModelEvent::InputChanged]
                })
            },
        ))
    }

    /// Create a grade from the add-grade sub-form. On success the grades list
    /// is refetched and the sub-form reset; on failure the form is kept.
    pub fn submit_new_grade(&self) -> Option<JoinHandle<()>> {
        let checked = validation::validate_new_grade(&self.lock_state());
        let input = self.validated(checked)?;

        let repository = self.core.repository.clone();
        Some(self.spawn_tracked(
            async move {
                repository
                    .create_grade(input.student_id, input.subject_id, input.score)
                    .await
            },
            |controller, grade| {
                tracing::info!("Grade {} created", grade.id);
                controller.refresh_grades();
                controller.mutate(|state| {
                    state.reset_add_grade_form();
                    vec![ModelEvent::AddGradeFormChanged]
                })
            },
        ))
    }

    /// Patch an existing grade and refetch the list on success.
    pub fn update_grade(&self, grade_id: i64, patch: GradePatch) -> Option<JoinHandle<()>> {
        self.validated(validation::validate_patch(&patch))?;

        let repository = self.core.repository.clone();
        Some(self.spawn_tracked(
            async move { repository.update_grade(grade_id, patch).await },
            |controller, grade| {
                tracing::info!("Grade {} updated", grade.id);
                controller.refresh_grades();
            },
        ))
    }

    /// Patch only the score of a grade, parsing it from text first.
    pub fn update_grade_score(&self, grade_id: i64, score_text: &str) -> Option<JoinHandle<()>> {
        let score = self.validated(validation::parse_score(score_text))?;
        self.update_grade(grade_id, GradePatch::score(score))
    }

    /// Fetch the average for one subject. Not stored in the UI state; a
    /// failure is posted and yields `None`.
    pub async fn subject_average(&self, subject_id: i64) -> Option<AverageResponse> {
        let _loading = LoadingGuard::begin(self.clone());
        let repository = self.core.repository.clone();
        match contained(async move { repository.get_subject_average(subject_id).await }).await {
            Ok(average) => Some(average),
            Err(error) => {
                self.post_error(error.message());
                None
            }
        }
    }

    // === Errors ===

    /// Clear the pending error. Does nothing when the slot is already empty.
    pub fn clear_error(&self) {
        self.mutate(|state| match state.error_message.take() {
            Some(_) => vec![ModelEvent::ErrorCleared],
            None => Vec::new(),
        });
    }

    fn post_error(&self, message: String) {
        tracing::debug!("Posting error: {message}");
        self.mutate(|state| {
            state.error_message = Some(message.clone());
            vec![ModelEvent::ErrorPosted { message }]
        });
    }

    /// Post a validation failure and turn it into `None`.
    fn validated<T>(&self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.post_error(error.to_string());
                None
            }
        }
    }

    // === Plumbing ===

    fn lock_state(&self) -> MutexGuard<'_, UiState> {
        self.core
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one mutation, then notify watchers and subscribers. A mutation
    /// returning no events is treated as a no-op for notification.
    ///
    /// Lock order is always state, then event bus. Both stay held until every
    /// subscriber has seen the events, so observers see mutations in the order
    /// they were applied.
    fn mutate(&self, apply: impl FnOnce(&mut UiState) -> Vec<ModelEvent>) {
        let mut state = self.lock_state();
        let events = apply(&mut state);
        if events.is_empty() {
            return;
        }
        self.core.snapshots.send_replace(state.clone());

        let mut bus = self
            .core
            .event_bus
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for event in events {
            bus.publish(event, &state);
        }
    }

    /// Run `request` on a task with loading tracking. The loading depth is
    /// raised before this returns and lowered when the task ends, however it
    /// ends.
    fn spawn_tracked<T, Fut, F>(&self, request: Fut, on_success: F) -> JoinHandle<()>
    where
        T: Send + 'static,
        Fut: Future<Output = Outcome<T>> + Send + 'static,
        F: FnOnce(&GradesController, T) + Send + 'static,
    {
        let loading = LoadingGuard::begin(self.clone());
        tokio::spawn(async move {
            match contained(request).await {
                Ok(value) => on_success(&loading.controller, value),
                Err(error) => loading.controller.post_error(error.message()),
            }
            drop(loading);
        })
    }
}

fn filters_changed(state: &UiState) -> ModelEvent {
    ModelEvent::FiltersChanged {
        student_filter: state.student_filter,
        subject_filter: state.subject_filter,
    }
}

/// Await a repository call, turning a panic into an `Unknown` failure.
async fn contained<T>(request: impl Future<Output = Outcome<T>>) -> Outcome<T> {
    match AssertUnwindSafe(request).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!("Repository call panicked: {message}");
            Err(ApiError::unknown(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string())
}

/// Holds one unit of loading depth for as long as it lives.
struct LoadingGuard {
    controller: GradesController,
}

impl LoadingGuard {
    fn begin(controller: GradesController) -> Self {
        controller.mutate(|state| {
            state.begin_loading();
            vec![ModelEvent::LoadingChanged {
                depth: state.loading_depth,
            }]
        });
        Self { controller }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.controller.mutate(|state| {
            state.finish_loading();
            vec![ModelEvent::LoadingChanged {
                depth: state.loading_depth,
            }]
        });
    }
}
