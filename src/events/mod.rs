//! Event system: delegated input routing, lifecycle event emission, and
//! the crossterm host adapter.

mod delegate;
pub mod emitter;
pub mod input;

pub use emitter::{namespaced, EmittedEvent, Emitter, EventListener, EVENT_NAMESPACE};
pub use input::key_input_from_crossterm;
