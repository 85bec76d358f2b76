//! # Gradeline - Grade-Book Client
//!
//! A line-oriented client for a remote grade-book API: students, subjects
//! and the grades linking them, with filtering, validation and subject
//! averages.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  Intents  ┌──────────────────┐  Calls   ┌────────────────┐
//! │ App         │──────────►│ GradesController │─────────►│ Repository     │
//! │ Controller  │           │                  │          │                │
//! │ - Commands  │◄──────────│ - UiState        │◄─────────│ - HTTP + JSON  │
//! │ - Rendering │ Snapshots │ - Validation     │ Outcomes │ - Error        │
//! └─────────────┘           │ - Loading depth  │          │   translation  │
//!                           └──────────────────┘          └────────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod gradebook;

// Re-export main types for easy access
pub use gradebook::*;
