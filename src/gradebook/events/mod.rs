//! # Events Module
//!
//! State change events and the bus that carries them to observers.

pub mod event_bus;
pub mod model_events;

pub use event_bus::{EventBus, SimpleEventBus, StateEventHandler};
pub use model_events::ModelEvent;
