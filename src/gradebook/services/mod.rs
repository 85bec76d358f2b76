//! # Services Layer
//!
//! Everything between the controller and the network: the remote client
//! capability, its `reqwest` implementation, the repository and the error
//! taxonomy that normalizes failures.

pub mod error;
pub mod http;
pub mod remote;
pub mod repository;

pub use error::{ApiError, RemoteError, CONNECTIVITY_MESSAGE, UNKNOWN_ERROR_MESSAGE};
pub use http::HttpRemoteClient;
pub use remote::{RemoteClient, RemoteRequest};
pub use repository::{DefaultGradesRepository, GradesRepository, Outcome};
