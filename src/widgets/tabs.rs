//! Tab strip with keyboard navigation.
//!
//! Tabs are the descendants carrying class `tab`; each may name its panel
//! through `data-fz-target` (an id selector resolved at activation time;
//! a missing panel is reported and skipped, the tab still activates).
//! Arrow keys move the selection with wrap-around, Home/End jump to the
//! edges. Exactly one tab is active at a time.

use tracing::warn;

use crate::toolkit::Context;
use crate::types::{Caps, ElementId, KeyInput, ATTR_TARGET, CLASS_SHOW};
use crate::widgets::core::{Config, InstanceCore, StateValue};
use crate::widgets::{InstanceRef, Lifecycle, Widget};

const COMPONENT: &str = "tabs";
const CLASS_TAB: &str = "tab";
const CLASS_ACTIVE: &str = "active";

#[derive(Debug)]
pub struct Tabs {
    core: InstanceCore,
}

impl Tabs {
    pub fn create(_dom: &crate::dom::Document, _element: ElementId, _overrides: &Config) -> Widget {
        Widget::Tabs(Self {
            core: InstanceCore::new(COMPONENT),
        })
    }

    fn tabs(&self, ctx: &Context, element: ElementId) -> Vec<ElementId> {
        ctx.dom
            .descendants(element)
            .into_iter()
            .filter(|&el| ctx.dom.has_class(el, CLASS_TAB))
            .collect()
    }

    fn panel_for(&self, ctx: &Context, tab: ElementId) -> Option<ElementId> {
        let selector = ctx.dom.attr(tab, ATTR_TARGET)?.to_string();
        let panel = ctx.dom.element_by_id(&selector);
        if panel.is_none() {
            warn!(component = COMPONENT, %selector, "tab panel not found");
        }
        panel
    }

    fn select(&mut self, ctx: &mut Context, inst: InstanceRef, index: usize) {
        let tabs = self.tabs(ctx, inst.element);
        let Some(&tab) = tabs.get(index) else { return };
        let previous = self.core.index("selected");
        if previous == Some(index) {
            return;
        }

        if let Some(prev) = previous.and_then(|i| tabs.get(i).copied()) {
            if !self.core.emit_on(ctx, prev, inst, "hide") {
                return;
            }
            ctx.dom.remove_class(prev, CLASS_ACTIVE);
            ctx.dom.set_attr(prev, "aria-selected", "false");
            if let Some(panel) = self.panel_for(ctx, prev) {
                ctx.dom.remove_class(panel, CLASS_SHOW);
            }
        }

        ctx.dom.add_class(tab, CLASS_ACTIVE);
        ctx.dom.set_attr(tab, "aria-selected", "true");
        if let Some(panel) = self.panel_for(ctx, tab) {
            ctx.dom.add_class(panel, CLASS_SHOW);
        }
        self.core.update_state(&[("selected", StateValue::Index(index))]);
        self.core.emit_on(ctx, tab, inst, "show");
    }

    fn move_selection(&mut self, ctx: &mut Context, inst: InstanceRef, direction: i32) {
        let tabs = self.tabs(ctx, inst.element);
        if tabs.is_empty() {
            return;
        }
        let len = tabs.len() as i32;
        let current = self.core.index("selected").unwrap_or(0) as i32;
        let next = (((current + direction) % len + len) % len) as usize;
        self.select(ctx, inst, next);
    }
}

impl Lifecycle for Tabs {
    fn component(&self) -> &'static str {
        COMPONENT
    }

    fn caps(&self) -> Caps {
        Caps::CLICK | Caps::KEY
    }

    fn init(&mut self, ctx: &mut Context, inst: InstanceRef) {
        let tabs = self.tabs(ctx, inst.element);
        let initial = tabs
            .iter()
            .position(|&el| ctx.dom.has_class(el, CLASS_ACTIVE))
            .unwrap_or(0);
        for (i, &tab) in tabs.iter().enumerate() {
            ctx.dom.set_attr(tab, "role", "tab");
            ctx.dom.set_attr(
                tab,
                "aria-selected",
                if i == initial { "true" } else { "false" },
            );
            if i == initial {
                ctx.dom.add_class(tab, CLASS_ACTIVE);
                if let Some(panel) = self.panel_for(ctx, tab) {
                    ctx.dom.add_class(panel, CLASS_SHOW);
                }
            }
        }
        if !tabs.is_empty() {
            self.core.update_state(&[("selected", StateValue::Index(initial))]);
        }
    }

    fn on_click(&mut self, ctx: &mut Context, inst: InstanceRef, target: ElementId) -> bool {
        let tabs = self.tabs(ctx, inst.element);
        let Some(index) = tabs.iter().position(|&t| ctx.dom.contains(t, target)) else {
            return false;
        };
        self.select(ctx, inst, index);
        true
    }

    fn on_key(&mut self, ctx: &mut Context, inst: InstanceRef, key: &KeyInput) -> bool {
        if key.is("ArrowRight") {
            self.move_selection(ctx, inst, 1);
            return true;
        }
        if key.is("ArrowLeft") {
            self.move_selection(ctx, inst, -1);
            return true;
        }
        if key.is("Home") {
            self.select(ctx, inst, 0);
            return true;
        }
        if key.is("End") {
            let last = self.tabs(ctx, inst.element).len().saturating_sub(1);
            self.select(ctx, inst, last);
            return true;
        }
        false
    }

    fn destroy(&mut self, ctx: &mut Context, _inst: InstanceRef) {
        self.core.teardown(ctx);
    }
}
