//! The widget set - a closed enum of variants over one lifecycle contract.
//!
//! ```text
//!  constructed -> init (bind triggers, resolve children, render) -> ready
//!  ready -> [state-changing calls] -> ready
//!  ready -> destroy -> destroyed (terminal)
//! ```
//!
//! Each variant opts into capabilities ([`crate::types::Caps`]) at
//! construction; the delegator gates dispatch on that bitset instead of
//! probing for handlers. Shared behavior lives in
//! [`core::InstanceCore`], composed into every variant.

pub mod accordion;
pub mod carousel;
pub mod core;
pub mod dropdown;
pub mod modal;
pub mod offcanvas;
pub mod tabs;
pub mod toast;
pub mod tooltip;

pub use accordion::Accordion;
pub use carousel::Carousel;
pub use self::core::{Config, ConfigValue, InstanceCore, StateChange, StateMap, StateValue};
pub use dropdown::Dropdown;
pub use modal::Modal;
pub use offcanvas::Offcanvas;
pub use tabs::Tabs;
pub use toast::Toast;
pub use tooltip::Tooltip;

use crate::state::timers::TimerAction;
use crate::toolkit::Context;
use crate::types::{Caps, ElementId, InstanceId, KeyInput};

/// The identity a widget method needs: its instance id and root element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstanceRef {
    pub id: InstanceId,
    pub element: ElementId,
}

/// The shared lifecycle contract every widget variant implements.
///
/// Handler defaults are no-ops; a widget that does not declare the matching
/// capability never has the handler invoked, so the two must be kept in
/// sync within each widget.
pub trait Lifecycle {
    /// Canonical component name (`"modal"`, `"dropdown"`, ...).
    fn component(&self) -> &'static str;

    /// Capabilities resolved once at construction.
    fn caps(&self) -> Caps;

    /// Bind triggers, resolve required children, render initial attributes.
    fn init(&mut self, ctx: &mut Context, inst: InstanceRef);

    /// Release everything the instance owns. Must be idempotent.
    fn destroy(&mut self, ctx: &mut Context, inst: InstanceRef);

    fn show(&mut self, _ctx: &mut Context, _inst: InstanceRef) {}

    fn hide(&mut self, _ctx: &mut Context, _inst: InstanceRef) {}

    fn toggle(&mut self, _ctx: &mut Context, _inst: InstanceRef) {}

    /// Click targeted inside the widget's element. Return `true` to consume.
    fn on_click(&mut self, _ctx: &mut Context, _inst: InstanceRef, _target: ElementId) -> bool {
        false
    }

    /// Any click anywhere in the document (requires [`Caps::DOC_CLICK`]).
    fn on_doc_click(&mut self, _ctx: &mut Context, _inst: InstanceRef, _target: ElementId) {}

    /// Key event while the widget owns the active element. Return `true`
    /// to consume.
    fn on_key(&mut self, _ctx: &mut Context, _inst: InstanceRef, _key: &KeyInput) -> bool {
        false
    }

    fn on_focus_in(&mut self, _ctx: &mut Context, _inst: InstanceRef, _target: ElementId) {}

    fn on_focus_out(&mut self, _ctx: &mut Context, _inst: InstanceRef, _target: ElementId) {}

    /// Page-wide Escape broadcast (requires [`Caps::ESCAPE`]). Each widget
    /// decides independently whether to close.
    fn on_escape(&mut self, _ctx: &mut Context, _inst: InstanceRef) {}

    /// A timer this instance scheduled has fired.
    fn on_timer(&mut self, _ctx: &mut Context, _inst: InstanceRef, _action: TimerAction) {}

    /// Whether the instance has run its course and should be destroyed by
    /// the toolkit. Checked after each timer delivery; permanent widgets
    /// keep the default `false`.
    fn finished(&self) -> bool {
        false
    }
}

/// The closed set of widget variants.
#[derive(Debug)]
pub enum Widget {
    Modal(Modal),
    Dropdown(Dropdown),
    Toast(Toast),
    Tooltip(Tooltip),
    Accordion(Accordion),
    Tabs(Tabs),
    Carousel(Carousel),
    Offcanvas(Offcanvas),
}

impl Widget {
    pub fn lifecycle(&mut self) -> &mut dyn Lifecycle {
        match self {
            Widget::Modal(w) => w,
            Widget::Dropdown(w) => w,
            Widget::Toast(w) => w,
            Widget::Tooltip(w) => w,
            Widget::Accordion(w) => w,
            Widget::Tabs(w) => w,
            Widget::Carousel(w) => w,
            Widget::Offcanvas(w) => w,
        }
    }

    pub fn lifecycle_ref(&self) -> &dyn Lifecycle {
        match self {
            Widget::Modal(w) => w,
            Widget::Dropdown(w) => w,
            Widget::Toast(w) => w,
            Widget::Tooltip(w) => w,
            Widget::Accordion(w) => w,
            Widget::Tabs(w) => w,
            Widget::Carousel(w) => w,
            Widget::Offcanvas(w) => w,
        }
    }

    pub fn caps(&self) -> Caps {
        self.lifecycle_ref().caps()
    }
}
