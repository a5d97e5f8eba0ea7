//! Dropdown menu anchored to a toggle trigger.
//!
//! The widget element wraps a toggle trigger (`data-fz-toggle="dropdown"`)
//! and a `.dropdown-menu` child. Opening positions the menu below the
//! toggle and clamped to the viewport; any click outside the widget closes
//! it, as does Escape (which also returns focus to the toggle). Arrow keys
//! move an `active` highlight through the `.dropdown-item` entries.

use tracing::warn;

use crate::layout::position::{place, Placement};
use crate::state::timers::TimerAction;
use crate::toolkit::Context;
use crate::types::{
    Caps, ElementId, KeyInput, ATTR_LEFT, ATTR_TOGGLE, ATTR_TOP, CLASS_SHOW,
};
use crate::widgets::core::{Config, ConfigValue, InstanceCore, StateValue};
use crate::widgets::{InstanceRef, Lifecycle, Widget};

const COMPONENT: &str = "dropdown";
const CLASS_MENU: &str = "dropdown-menu";
const CLASS_ITEM: &str = "dropdown-item";
const CLASS_ACTIVE: &str = "active";

const DEFAULTS: &[(&str, ConfigValue)] = &[("animation", ConfigValue::Int(0))];

#[derive(Debug)]
pub struct Dropdown {
    core: InstanceCore,
    config: Config,
    menu: Option<ElementId>,
    toggle_el: Option<ElementId>,
}

impl Dropdown {
    pub fn create(dom: &crate::dom::Document, element: ElementId, overrides: &Config) -> Widget {
        let config = Config::resolve(COMPONENT, DEFAULTS, dom, element, overrides);
        Widget::Dropdown(Self {
            core: InstanceCore::new(COMPONENT),
            config,
            menu: None,
            toggle_el: None,
        })
    }

    fn open(&self) -> bool {
        self.core.flag("open")
    }

    fn items(&self, ctx: &Context) -> Vec<ElementId> {
        match self.menu {
            Some(menu) => ctx
                .dom
                .descendants(menu)
                .into_iter()
                .filter(|&el| ctx.dom.has_class(el, CLASS_ITEM))
                .collect(),
            None => Vec::new(),
        }
    }

    fn position_menu(&self, ctx: &mut Context) {
        let Some(menu) = self.menu else { return };
        let anchor = self.toggle_el.and_then(|el| ctx.dom.bounds(el));
        let size = ctx.dom.bounds(menu).map(|b| b.size());
        // Without host-measured bounds there is nothing to position against.
        let (Some(anchor), Some(size)) = (anchor, size) else {
            return;
        };
        let point = place(anchor, size, Placement::Bottom, ctx.viewport);
        ctx.dom.set_attr(menu, ATTR_TOP, point.y.to_string());
        ctx.dom.set_attr(menu, ATTR_LEFT, point.x.to_string());
    }

    fn move_active(&mut self, ctx: &mut Context, direction: i32) {
        let items = self.items(ctx);
        if items.is_empty() {
            return;
        }
        let current = items.iter().position(|&el| ctx.dom.has_class(el, CLASS_ACTIVE));
        let next = match current {
            None => {
                if direction > 0 {
                    0
                } else {
                    items.len() - 1
                }
            }
            Some(pos) => {
                let len = items.len() as i32;
                (((pos as i32 + direction) % len + len) % len) as usize
            }
        };
        if let Some(pos) = current {
            ctx.dom.remove_class(items[pos], CLASS_ACTIVE);
        }
        ctx.dom.add_class(items[next], CLASS_ACTIVE);
        ctx.focus.focus(&mut ctx.dom, items[next]);
    }

    fn clear_active(&self, ctx: &mut Context) {
        for item in self.items(ctx) {
            ctx.dom.remove_class(item, CLASS_ACTIVE);
        }
    }
}

impl Lifecycle for Dropdown {
    fn component(&self) -> &'static str {
        COMPONENT
    }

    fn caps(&self) -> Caps {
        Caps::CLICK | Caps::KEY | Caps::ESCAPE | Caps::DOC_CLICK
    }

    fn init(&mut self, ctx: &mut Context, inst: InstanceRef) {
        self.menu = ctx.dom.descendant_with_class(inst.element, CLASS_MENU);
        if self.menu.is_none() {
            let err = crate::error::Error::MissingChild {
                component: COMPONENT,
                expected: ".dropdown-menu",
            };
            warn!(error = %err, "instance is inert");
        }
        self.toggle_el = ctx
            .dom
            .descendants(inst.element)
            .into_iter()
            .find(|&el| ctx.dom.attr(el, ATTR_TOGGLE) == Some(COMPONENT));
        if let Some(toggle) = self.toggle_el {
            ctx.dom.set_attr(toggle, "aria-haspopup", "true");
            ctx.dom.set_attr(toggle, "aria-expanded", "false");
        }
    }

    fn show(&mut self, ctx: &mut Context, inst: InstanceRef) {
        let Some(menu) = self.menu else { return };
        if self.open() {
            return;
        }
        ctx.timers.cancel_matching(inst.id, TimerAction::EmitHidden);
        if !self.core.emit(ctx, inst, "show") {
            return;
        }
        ctx.dom.add_class(menu, CLASS_SHOW);
        if let Some(toggle) = self.toggle_el {
            ctx.dom.set_attr(toggle, "aria-expanded", "true");
        }
        self.position_menu(ctx);
        self.core.update_state(&[("open", StateValue::Flag(true))]);
        ctx.timers
            .schedule(inst.id, TimerAction::EmitShown, self.config.millis("animation", 0));
    }

    fn hide(&mut self, ctx: &mut Context, inst: InstanceRef) {
        let Some(menu) = self.menu else { return };
        if !self.open() {
            return;
        }
        ctx.timers.cancel_matching(inst.id, TimerAction::EmitShown);
        if !self.core.emit(ctx, inst, "hide") {
            return;
        }
        ctx.dom.remove_class(menu, CLASS_SHOW);
        self.clear_active(ctx);
        if let Some(toggle) = self.toggle_el {
            ctx.dom.set_attr(toggle, "aria-expanded", "false");
        }
        self.core.update_state(&[("open", StateValue::Flag(false))]);
        ctx.timers
            .schedule(inst.id, TimerAction::EmitHidden, self.config.millis("animation", 0));
    }

    fn toggle(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if self.open() {
            self.hide(ctx, inst);
        } else {
            self.show(ctx, inst);
        }
    }

    fn on_click(&mut self, ctx: &mut Context, inst: InstanceRef, target: ElementId) -> bool {
        // Only the toggle reacts; clicks inside the open menu leave it open
        // so hosts can wire item selection without the menu vanishing.
        if let Some(toggle) = self.toggle_el {
            if ctx.dom.contains(toggle, target) {
                self.toggle(ctx, inst);
                return true;
            }
        }
        false
    }

    fn on_doc_click(&mut self, ctx: &mut Context, inst: InstanceRef, target: ElementId) {
        if self.open() && !ctx.dom.contains(inst.element, target) {
            self.hide(ctx, inst);
        }
    }

    fn on_key(&mut self, ctx: &mut Context, _inst: InstanceRef, key: &KeyInput) -> bool {
        if !self.open() {
            return false;
        }
        if key.is("ArrowDown") {
            self.move_active(ctx, 1);
            return true;
        }
        if key.is("ArrowUp") {
            self.move_active(ctx, -1);
            return true;
        }
        false
    }

    fn on_escape(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if !self.open() {
            return;
        }
        self.hide(ctx, inst);
        if let Some(toggle) = self.toggle_el {
            ctx.focus.focus(&mut ctx.dom, toggle);
        }
    }

    fn on_timer(&mut self, ctx: &mut Context, inst: InstanceRef, action: TimerAction) {
        match action {
            TimerAction::EmitShown => {
                self.core.emit(ctx, inst, "shown");
            }
            TimerAction::EmitHidden => {
                self.core.emit(ctx, inst, "hidden");
            }
            _ => {}
        }
    }

    fn destroy(&mut self, ctx: &mut Context, _inst: InstanceRef) {
        if let Some(menu) = self.menu {
            ctx.dom.remove_class(menu, CLASS_SHOW);
        }
        self.clear_active(ctx);
        self.core.teardown(ctx);
    }
}
