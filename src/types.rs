//! Core types shared across the runtime.
//!
//! - Id handles ([`ElementId`], [`InstanceId`], [`ListenerId`], [`TimerId`])
//! - Geometry ([`Point`], [`Size`], [`Rect`])
//! - Input ([`KeyInput`], [`Modifiers`], [`UiEvent`])
//! - Bitsets ([`ElementFlags`], [`Caps`])
//! - The `data-fz-*` attribute protocol and shared class names

use std::fmt;

// =============================================================================
// Id Handles
// =============================================================================

/// Handle to a node in the element tree.
///
/// Indices are recycled after removal; code that stores an `ElementId`
/// across mutations should validate it with [`crate::dom::Document::serial`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Page-unique identifier for a live widget instance.
///
/// Allocated from a monotonically increasing counter; never reused for the
/// life of the toolkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fz-{}", self.0)
    }
}

impl InstanceId {
    /// Parse the value of a `data-fz-instance` attribute.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.strip_prefix("fz-")?.parse().ok().map(InstanceId)
    }
}

/// Handle to a registered event listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Handle to a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub(crate) u64);

// =============================================================================
// Geometry
// =============================================================================

/// A point in viewport coordinates. Signed so that an unclamped preferred
/// position may fall outside the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height of a box or of the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle (host-measured element bounds).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

// =============================================================================
// Input
// =============================================================================

bitflags::bitflags! {
    /// Keyboard modifier state as a bitfield.
    ///
    /// Combine with bitwise OR: `Modifiers::SHIFT | Modifiers::CTRL`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const NONE = 0;
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

/// A keyboard event as delivered to the delegator.
///
/// Keys use their DOM names (`"Escape"`, `"Tab"`, `"ArrowDown"`, `"a"`, ...)
/// so host adapters and tests read the same way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyInput {
    /// A plain key press with no modifiers.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    pub fn is(&self, key: &str) -> bool {
        self.key == key
    }
}

/// An input event delivered by the host to [`crate::Toolkit::dispatch`].
///
/// Key events carry no explicit target; they are routed through the
/// document's active element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Click { target: ElementId },
    Key(KeyInput),
    FocusIn { target: ElementId },
    FocusOut { target: ElementId },
}

// =============================================================================
// Bitsets
// =============================================================================

bitflags::bitflags! {
    /// Per-element behavior flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ElementFlags: u8 {
        const NONE = 0;
        /// Element participates in focus navigation.
        const FOCUSABLE = 1 << 0;
        /// Focusable but explicitly excluded from the tab sequence.
        const TAB_EXCLUDED = 1 << 1;
        /// Interactive element currently disabled.
        const DISABLED = 1 << 2;
    }
}

bitflags::bitflags! {
    /// Capabilities a widget opts into at construction.
    ///
    /// The delegator consults this bitset instead of probing for handler
    /// methods at dispatch time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Caps: u8 {
        const NONE = 0;
        /// Receives clicks targeted inside its element.
        const CLICK = 1 << 0;
        /// Receives key events while it owns the active element.
        const KEY = 1 << 1;
        /// Receives focus-in/focus-out for its subtree.
        const FOCUS = 1 << 2;
        /// Participates in the page-wide Escape broadcast.
        const ESCAPE = 1 << 3;
        /// Observes every click, wherever it lands (outside-click close,
        /// backdrop dismissal).
        const DOC_CLICK = 1 << 4;
    }
}

// =============================================================================
// Attribute Protocol & Class Names
// =============================================================================

/// Marks an element as the root of a widget; the value is the component name.
pub const ATTR_COMPONENT: &str = "data-fz-component";
/// Holds the generated instance id while an instance is live.
pub const ATTR_INSTANCE: &str = "data-fz-instance";
/// On a trigger element: the component the trigger toggles.
pub const ATTR_TOGGLE: &str = "data-fz-toggle";
/// On a trigger element: selector (`#id`) of the element to act on.
pub const ATTR_TARGET: &str = "data-fz-target";
/// On a trigger element: the component kind the trigger dismisses.
pub const ATTR_DISMISS: &str = "data-fz-dismiss";
/// Computed position, written by positioning widgets for the host to apply.
pub const ATTR_TOP: &str = "data-fz-top";
/// Computed position, written by positioning widgets for the host to apply.
pub const ATTR_LEFT: &str = "data-fz-left";

/// Class toggled on a widget root while it is visible.
pub const CLASS_SHOW: &str = "show";
/// Class on the generated modal/offcanvas backdrop element.
pub const CLASS_BACKDROP: &str = "modal-backdrop";
/// Body-level marker while an overlay locks page scrolling.
pub const CLASS_SCROLL_LOCK: &str = "fz-scroll-lock";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_id_round_trip() {
        let id = InstanceId(42);
        assert_eq!(id.to_string(), "fz-42");
        assert_eq!(InstanceId::parse("fz-42"), Some(id));
        assert_eq!(InstanceId::parse("42"), None);
        assert_eq!(InstanceId::parse("fz-x"), None);
    }

    #[test]
    fn test_modifier_bits() {
        let mods = Modifiers::SHIFT | Modifiers::CTRL;
        assert!(mods.contains(Modifiers::SHIFT));
        assert!(!mods.contains(Modifiers::ALT));
    }

    #[test]
    fn test_caps_combination() {
        let caps = Caps::CLICK | Caps::ESCAPE;
        assert!(caps.contains(Caps::ESCAPE));
        assert!(!caps.contains(Caps::KEY));
    }
}
