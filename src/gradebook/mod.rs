//! # Grade Book Client
//!
//! State controller for a grade-book REST service:
//!
//! - **Models**: domain entities and the `UiState` aggregate
//! - **Services**: remote client, repository and error taxonomy
//! - **Events**: state change notifications for observers
//! - **Controllers**: the grades controller and the command loop
//! - **Views**: plain-text rendering of state snapshots
//!
//! ```text
//! ┌──────────────┐  intents  ┌──────────────────┐  Outcome<T>  ┌──────────────┐  JSON  ┌──────────────┐
//! │ AppController│──────────▶│ GradesController │◀────────────▶│  Repository  │◀──────▶│ RemoteClient │
//! │ + Renderer   │◀──────────│   (UiState)      │              │ (ApiError)   │        │  (reqwest)   │
//! └──────────────┘ snapshots └──────────────────┘              └──────────────┘        └──────────────┘
//! ```

pub mod commands;
pub mod controllers;
pub mod events;
pub mod models;
pub mod services;
pub mod views;

pub use commands::{parse_intent, UserIntent};
pub use controllers::{
    AppController, ControllerOptions, GradesController, GradesFetchPolicy, ValidationError,
};
pub use events::{ModelEvent, StateEventHandler};
pub use models::{AverageResponse, Grade, GradePatch, Student, Subject, UiState};
pub use services::{
    ApiError, DefaultGradesRepository, GradesRepository, HttpRemoteClient, Outcome, RemoteClient,
    RemoteError, RemoteRequest,
};
pub use views::{TextRenderer, ViewRenderer};
