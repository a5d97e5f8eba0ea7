//! Runtime state owned by the toolkit context.
//!
//! - [`focus`] - focus navigation, traps, and restoration history
//! - [`timers`] - deferred transitions with explicit cancellation

pub mod focus;
pub mod timers;

pub use focus::FocusState;
pub use timers::{TimerAction, TimerQueue};
