//! # ferzui
//!
//! A headless UI component runtime: modals, dropdowns, toasts, tooltips,
//! accordions, tabs, carousels, and offcanvas panels over a retained
//! element tree, with delegated input routing, focus management, and
//! cancellable animation timers.
//!
//! Everything hangs off one explicit [`Toolkit`]; there is no global
//! state. The host owns rendering and the clock:
//!
//! ```ignore
//! use ferzui::{Toolkit, Size, UiEvent, ATTR_COMPONENT};
//!
//! let mut ui = Toolkit::new(Size::new(800, 600));
//!
//! // Build markup (or load it from the host).
//! let modal = ui.dom_mut().create_element("div");
//! let root = ui.dom().root();
//! ui.dom_mut().append_child(root, modal);
//! ui.dom_mut().set_attr(modal, ATTR_COMPONENT, "modal");
//! ui.init_all();
//!
//! // Drive it.
//! ui.dispatch(UiEvent::Click { target: some_button });
//! ui.tick(now_ms);
//! ```
//!
//! Widgets communicate outward through namespaced `fz:` events
//! ([`Toolkit::on`]); transitions (`fz:show`, `fz:hide`) are cancelable by
//! returning `true` from a listener.

pub mod dom;
pub mod engine;
pub mod error;
pub mod events;
pub mod layout;
pub mod search;
pub mod state;
pub mod toolkit;
pub mod types;
pub mod widgets;

pub use dom::Document;
pub use engine::{Registry, WidgetCtor};
pub use error::{Error, Result};
pub use events::{EmittedEvent, EventListener};
pub use state::{FocusState, TimerAction, TimerQueue};
pub use toolkit::{Context, Toolkit};
pub use types::{
    Caps, ElementFlags, ElementId, InstanceId, KeyInput, ListenerId, Modifiers, Point, Rect, Size,
    TimerId, UiEvent, ATTR_COMPONENT, ATTR_DISMISS, ATTR_INSTANCE, ATTR_TARGET, ATTR_TOGGLE,
    CLASS_BACKDROP, CLASS_SCROLL_LOCK, CLASS_SHOW,
};
pub use widgets::{Config, ConfigValue, InstanceRef, Lifecycle, Widget};
