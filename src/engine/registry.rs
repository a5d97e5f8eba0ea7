//! Component registry - name to constructor mapping.
//!
//! The widget set itself is closed (the [`crate::widgets::Widget`] enum),
//! but names are an open mapping: a host may re-register a name to wrap a
//! builtin, or alias one under a second name. Later registrations silently
//! replace earlier ones; resolution of an unknown name is `None`, not an
//! error, so markup scanning can skip foreign `data-fz-component` values.

use std::collections::HashMap;

use tracing::debug;

use crate::dom::Document;
use crate::types::ElementId;
use crate::widgets::{self, Config, Widget};

/// Constructor resolved from a component name.
pub type WidgetCtor = fn(&Document, ElementId, &Config) -> Widget;

#[derive(Debug, Default)]
pub struct Registry {
    ctors: HashMap<String, WidgetCtor>,
}

impl Registry {
    /// An empty registry. Most callers want [`Registry::with_builtins`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with every builtin component.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("modal", widgets::Modal::create);
        registry.register("dropdown", widgets::Dropdown::create);
        registry.register("toast", widgets::Toast::create);
        registry.register("tooltip", widgets::Tooltip::create);
        registry.register("accordion", widgets::Accordion::create);
        registry.register("tabs", widgets::Tabs::create);
        registry.register("carousel", widgets::Carousel::create);
        registry.register("offcanvas", widgets::Offcanvas::create);
        registry
    }

    /// Register `ctor` under `name`, replacing any previous registration.
    pub fn register(&mut self, name: &str, ctor: WidgetCtor) {
        if self.ctors.insert(name.to_string(), ctor).is_some() {
            debug!(name, "component registration replaced");
        }
    }

    /// Look up the constructor for `name`.
    pub fn resolve(&self, name: &str) -> Option<WidgetCtor> {
        self.ctors.get(name).copied()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.ctors.contains_key(name)
    }

    /// Registered component names, sorted for stable iteration.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.ctors.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_present() {
        let registry = Registry::with_builtins();
        for name in [
            "modal",
            "dropdown",
            "toast",
            "tooltip",
            "accordion",
            "tabs",
            "carousel",
            "offcanvas",
        ] {
            assert!(registry.is_registered(name), "missing builtin {name}");
        }
        assert!(registry.resolve("blink").is_none());
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = Registry::with_builtins();
        registry.register("drawer", widgets::Offcanvas::create);
        registry.register("drawer", widgets::Modal::create);

        let mut dom = Document::new();
        let el = dom.create_element("div");
        dom.append_child(dom.root(), el);
        let widget = registry.resolve("drawer").unwrap()(&dom, el, &Config::new());
        assert!(matches!(widget, Widget::Modal(_)));
    }
}
