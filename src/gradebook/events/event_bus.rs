//! # Event Bus
//!
//! Observer registry the controller publishes state changes through.
//! Handlers receive the event and the snapshot taken right after the
//! mutation; they never see the lock guarding the live state.

use super::model_events::ModelEvent;
use crate::gradebook::models::UiState;

/// Type alias for state change handlers
pub type StateEventHandler = Box<dyn Fn(&ModelEvent, &UiState) + Send + Sync>;

/// Event bus for decoupled communication between controller and presentation
pub trait EventBus: Send + Sync {
    /// Publish a state change
    fn publish(&mut self, event: ModelEvent, snapshot: &UiState);

    /// Subscribe to state changes
    fn subscribe(&mut self, handler: StateEventHandler);

    fn subscriber_count(&self) -> usize;
}

/// Simple in-memory event bus implementation
pub struct SimpleEventBus {
    handlers: Vec<StateEventHandler>,
}

impl SimpleEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl Default for SimpleEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for SimpleEventBus {
    fn publish(&mut self, event: ModelEvent, snapshot: &UiState) {
        for handler in &self.handlers {
            handler(&event, snapshot);
        }
    }

    fn subscribe(&mut self, handler: StateEventHandler) {
        self.handlers.push(handler);
    }

    fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}
