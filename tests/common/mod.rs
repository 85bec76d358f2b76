//! Shared helpers for the controller integration tests.

#![allow(dead_code)]

pub mod fake_repository;

pub use fake_repository::{Call, FakeRepository, Gate, Step};

use gradeline::{GradesController, GradesRepository};
use std::sync::Arc;

/// Start a controller over the fake and let the initial refresh finish.
pub async fn started(repository: &Arc<FakeRepository>) -> GradesController {
    let controller = GradesController::start(repository.clone() as Arc<dyn GradesRepository>);
    controller.wait_until_idle().await;
    controller
}
