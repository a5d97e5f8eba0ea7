//! Shared widget machinery.
//!
//! Widgets are a closed set of variants sharing one lifecycle interface;
//! what a class hierarchy would inherit from a base is composed here
//! instead:
//! - [`Config`] - option resolution (defaults ← `data-fz-*` attributes ←
//!   caller overrides)
//! - [`InstanceCore`] - owned-node bookkeeping, state merge, event
//!   emission

use std::collections::BTreeMap;

use tracing::warn;

use crate::dom::Document;
use crate::toolkit::Context;
use crate::types::ElementId;
use crate::widgets::InstanceRef;

// =============================================================================
// Config
// =============================================================================

/// A resolved option value.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Resolved widget configuration.
///
/// Built by [`Config::resolve`] from a widget's defaults, the element's
/// `data-fz-*` attributes, and caller-supplied overrides, in that order of
/// increasing precedence.
#[derive(Clone, Debug, Default)]
pub struct Config {
    values: BTreeMap<String, ConfigValue>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for override bags in calls and tests.
    pub fn with(mut self, key: &str, value: ConfigValue) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.values.insert(key.to_string(), value);
    }

    pub fn bool(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(ConfigValue::Bool(v)) => *v,
            _ => default,
        }
    }

    pub fn int(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(ConfigValue::Int(v)) => *v,
            _ => default,
        }
    }

    pub fn str(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(ConfigValue::Str(v)) => v.clone(),
            _ => default.to_string(),
        }
    }

    /// Non-negative millisecond view of an integer option.
    pub fn millis(&self, key: &str, default: i64) -> u64 {
        self.int(key, default).max(0) as u64
    }

    /// Resolve a widget's configuration.
    ///
    /// For each default, a `data-fz-<key>` attribute on the element is
    /// parsed with the default's type; unparseable values are reported and
    /// the default kept (configuration errors never escalate). Override
    /// entries win unconditionally, including keys with no default.
    pub fn resolve(
        component: &'static str,
        defaults: &[(&str, ConfigValue)],
        dom: &Document,
        element: ElementId,
        overrides: &Config,
    ) -> Config {
        let mut config = Config::new();
        for (key, default) in defaults {
            let mut value = default.clone();
            let attr_name = format!("data-fz-{key}");
            if let Some(raw) = dom.attr(element, &attr_name) {
                match parse_as(default, raw) {
                    Some(parsed) => value = parsed,
                    None => warn!(
                        component,
                        option = *key,
                        raw,
                        "ignoring unparseable option attribute"
                    ),
                }
            }
            config.values.insert((*key).to_string(), value);
        }
        for (key, value) in &overrides.values {
            config.values.insert(key.clone(), value.clone());
        }
        config
    }
}

fn parse_as(shape: &ConfigValue, raw: &str) -> Option<ConfigValue> {
    match shape {
        ConfigValue::Bool(_) => match raw {
            "true" | "1" => Some(ConfigValue::Bool(true)),
            "false" | "0" => Some(ConfigValue::Bool(false)),
            _ => None,
        },
        ConfigValue::Int(_) => raw.parse().ok().map(ConfigValue::Int),
        ConfigValue::Str(_) => Some(ConfigValue::Str(raw.to_string())),
    }
}

// =============================================================================
// Instance State
// =============================================================================

/// A named state entry: a boolean phase flag or an open index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateValue {
    Flag(bool),
    Index(usize),
}

/// The small named-flag mapping each instance carries.
pub type StateMap = BTreeMap<&'static str, StateValue>;

/// Result of a state merge, handed to the widget so it can decide whether
/// to re-render or emit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateChange {
    pub previous: StateMap,
    pub next: StateMap,
}

impl StateChange {
    pub fn changed(&self, key: &str) -> bool {
        self.previous.get(key) != self.next.get(key)
    }
}

// =============================================================================
// InstanceCore
// =============================================================================

/// Per-instance bookkeeping composed into every widget variant.
///
/// Owns the DOM nodes the instance created (backdrops, tooltip bubbles);
/// [`InstanceCore::teardown`] releases them exactly once, making widget
/// destroy idempotent. Listener registrations are owned at the engine
/// level, see [`crate::Toolkit::on_instance`].
#[derive(Debug)]
pub struct InstanceCore {
    component: &'static str,
    owned_nodes: Vec<ElementId>,
    state: StateMap,
    torn_down: bool,
}

impl InstanceCore {
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            owned_nodes: Vec::new(),
            state: StateMap::new(),
            torn_down: false,
        }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.state.get(key), Some(StateValue::Flag(true)))
    }

    pub fn index(&self, key: &str) -> Option<usize> {
        match self.state.get(key) {
            Some(StateValue::Index(i)) => Some(*i),
            _ => None,
        }
    }

    /// Merge `partial` into the instance state, returning the
    /// (previous, next) pair.
    pub fn update_state(&mut self, partial: &[(&'static str, StateValue)]) -> StateChange {
        let previous = self.state.clone();
        for (key, value) in partial {
            self.state.insert(key, *value);
        }
        StateChange {
            previous,
            next: self.state.clone(),
        }
    }

    /// Record a DOM node this instance created and must remove on destroy.
    pub fn own_node(&mut self, el: ElementId) {
        self.owned_nodes.push(el);
    }

    /// Forget an owned node the widget already removed itself.
    pub fn release_node(&mut self, el: ElementId) {
        self.owned_nodes.retain(|&n| n != el);
    }

    /// Emit a lifecycle event on the instance's element.
    ///
    /// Returns `false` when a listener prevented the default.
    pub fn emit(&self, ctx: &mut Context, inst: InstanceRef, name: &str) -> bool {
        ctx.emit(inst.element, name, Some(inst.id), Some(self.component))
    }

    /// Emit a lifecycle event on a related element (panel, menu, slide).
    pub fn emit_on(&self, ctx: &mut Context, target: ElementId, inst: InstanceRef, name: &str) -> bool {
        ctx.emit(target, name, Some(inst.id), Some(self.component))
    }

    /// Release owned nodes. Safe to call more than once; only the first
    /// call does work.
    pub fn teardown(&mut self, ctx: &mut Context) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        for el in self.owned_nodes.drain(..) {
            ctx.dom.remove(el);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_precedence() {
        let mut dom = Document::new();
        let el = dom.create_element("div");
        dom.append_child(dom.root(), el);
        dom.set_attr(el, "data-fz-backdrop", "false");
        dom.set_attr(el, "data-fz-animation", "200");

        let overrides = Config::new().with("animation", ConfigValue::Int(50));
        let config = Config::resolve(
            "modal",
            &[
                ("backdrop", ConfigValue::Bool(true)),
                ("keyboard", ConfigValue::Bool(true)),
                ("animation", ConfigValue::Int(150)),
            ],
            &dom,
            el,
            &overrides,
        );

        // Attribute beats default; override beats attribute.
        assert!(!config.bool("backdrop", true));
        assert!(config.bool("keyboard", false));
        assert_eq!(config.int("animation", 0), 50);
    }

    #[test]
    fn test_config_unparseable_attribute_keeps_default() {
        let mut dom = Document::new();
        let el = dom.create_element("div");
        dom.append_child(dom.root(), el);
        dom.set_attr(el, "data-fz-animation", "fast");

        let config = Config::resolve(
            "modal",
            &[("animation", ConfigValue::Int(150))],
            &dom,
            el,
            &Config::new(),
        );
        assert_eq!(config.int("animation", 0), 150);
    }

    #[test]
    fn test_state_merge_reports_change() {
        let mut core = InstanceCore::new("modal");
        let change = core.update_state(&[("showing", StateValue::Flag(true))]);
        assert!(change.changed("showing"));
        assert!(core.flag("showing"));

        let change = core.update_state(&[("showing", StateValue::Flag(true))]);
        assert!(!change.changed("showing"));
    }

    #[test]
    fn test_index_state() {
        let mut core = InstanceCore::new("tabs");
        assert_eq!(core.index("open"), None);
        core.update_state(&[("open", StateValue::Index(2))]);
        assert_eq!(core.index("open"), Some(2));
    }
}
