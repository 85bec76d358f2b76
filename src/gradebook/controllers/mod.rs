//! # Controllers
//!
//! The grades controller, the validation it applies before any request,
//! and the line-oriented application loop that drives it.

pub mod app_controller;
pub mod grades_controller;
pub mod validation;

pub use app_controller::AppController;
pub use grades_controller::{ControllerOptions, GradesController, GradesFetchPolicy};
pub use validation::{NewGradeInput, ValidationError};
