//! Modal dialog - the overlay state machine over {hidden, showing}.
//!
//! `show()` captures the active element for later restoration, raises an
//! optional backdrop, locks body scrolling, and traps Tab cycling inside
//! the dialog. `hide()` mirrors all of it. Both transitions are idempotent
//! and cancelable via their `fz:show` / `fz:hide` events; completion events
//! (`fz:shown` / `fz:hidden`) fire after the configured animation delay
//! through the timer queue, and an interrupting transition cancels the
//! pending completion first.

use crate::state::timers::TimerAction;
use crate::toolkit::Context;
use crate::types::{Caps, ElementId, CLASS_BACKDROP, CLASS_SHOW, KeyInput};
use crate::widgets::core::{Config, ConfigValue, InstanceCore, StateValue};
use crate::widgets::{InstanceRef, Lifecycle, Widget};

const COMPONENT: &str = "modal";

/// Modal configuration defaults. `animation` is in milliseconds.
const DEFAULTS: &[(&str, ConfigValue)] = &[
    ("backdrop", ConfigValue::Bool(true)),
    ("keyboard", ConfigValue::Bool(true)),
    ("focus", ConfigValue::Bool(true)),
    ("animation", ConfigValue::Int(150)),
];

#[derive(Debug)]
pub struct Modal {
    core: InstanceCore,
    config: Config,
    backdrop: Option<ElementId>,
    /// Element focused before `show()`, with its serial so a recycled slot
    /// is never refocused.
    captured_focus: Option<(ElementId, u64)>,
}

impl Modal {
    pub fn create(dom: &crate::dom::Document, element: ElementId, overrides: &Config) -> Widget {
        let config = Config::resolve(COMPONENT, DEFAULTS, dom, element, overrides);
        Widget::Modal(Self {
            core: InstanceCore::new(COMPONENT),
            config,
            backdrop: None,
            captured_focus: None,
        })
    }

    fn showing(&self) -> bool {
        self.core.flag("showing")
    }

    fn animation(&self) -> u64 {
        self.config.millis("animation", 150)
    }

    fn remove_backdrop(&mut self, ctx: &mut Context) {
        if let Some(backdrop) = self.backdrop.take() {
            ctx.dom.remove(backdrop);
            self.core.release_node(backdrop);
        }
    }
}

impl Lifecycle for Modal {
    fn component(&self) -> &'static str {
        COMPONENT
    }

    fn caps(&self) -> Caps {
        Caps::KEY | Caps::ESCAPE | Caps::DOC_CLICK
    }

    fn init(&mut self, ctx: &mut Context, inst: InstanceRef) {
        ctx.dom.set_attr(inst.element, "role", "dialog");
        ctx.dom.set_attr(inst.element, "aria-hidden", "true");
    }

    fn show(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if self.showing() {
            return;
        }
        // An interrupted hide must not fire its stale completion later.
        ctx.timers.cancel_matching(inst.id, TimerAction::EmitHidden);
        if !self.core.emit(ctx, inst, "show") {
            return;
        }

        self.captured_focus = ctx
            .dom
            .active_element()
            .and_then(|el| ctx.dom.serial(el).map(|serial| (el, serial)));

        if self.config.bool("backdrop", true) {
            let backdrop = ctx.dom.create_element("div");
            ctx.dom.add_class(backdrop, CLASS_BACKDROP);
            ctx.dom.add_class(backdrop, CLASS_SHOW);
            let root = ctx.dom.root();
            ctx.dom.append_child(root, backdrop);
            self.core.own_node(backdrop);
            self.backdrop = Some(backdrop);
        }

        ctx.dom.add_class(inst.element, CLASS_SHOW);
        ctx.dom.set_attr(inst.element, "aria-hidden", "false");
        ctx.dom.set_attr(inst.element, "aria-modal", "true");
        ctx.lock_scroll();

        if self.config.bool("focus", true) {
            ctx.focus.push_trap(inst.element);
            ctx.focus.focus_first(&mut ctx.dom);
        }

        self.core.update_state(&[("showing", StateValue::Flag(true))]);
        ctx.timers.schedule(inst.id, TimerAction::EmitShown, self.animation());
    }

    fn hide(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if !self.showing() {
            return;
        }
        ctx.timers.cancel_matching(inst.id, TimerAction::EmitShown);
        if !self.core.emit(ctx, inst, "hide") {
            return;
        }

        ctx.dom.remove_class(inst.element, CLASS_SHOW);
        ctx.dom.set_attr(inst.element, "aria-hidden", "true");
        ctx.dom.remove_attr(inst.element, "aria-modal");
        self.remove_backdrop(ctx);
        ctx.unlock_scroll();
        ctx.focus.remove_trap(inst.element);

        if let Some((el, serial)) = self.captured_focus.take() {
            if ctx.dom.serial(el) == Some(serial) && ctx.dom.is_attached(el) {
                ctx.focus.focus(&mut ctx.dom, el);
            }
        }

        self.core.update_state(&[("showing", StateValue::Flag(false))]);
        ctx.timers.schedule(inst.id, TimerAction::EmitHidden, self.animation());
    }

    fn toggle(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if self.showing() {
            self.hide(ctx, inst);
        } else {
            self.show(ctx, inst);
        }
    }

    fn on_doc_click(&mut self, ctx: &mut Context, inst: InstanceRef, target: ElementId) {
        if self.showing() && self.backdrop == Some(target) {
            self.hide(ctx, inst);
        }
    }

    fn on_key(&mut self, ctx: &mut Context, inst: InstanceRef, key: &KeyInput) -> bool {
        if !self.showing() || !self.config.bool("focus", true) || !key.is("Tab") {
            return false;
        }
        // Wrap-around Tab cycling inside the dialog; the host's default tab
        // order never escapes while the modal is up.
        if key.modifiers.contains(crate::types::Modifiers::SHIFT) {
            ctx.focus.focus_previous(&mut ctx.dom);
        } else {
            ctx.focus.focus_next(&mut ctx.dom);
        }
        true
    }

    fn on_escape(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if self.showing() && self.config.bool("keyboard", true) {
            self.hide(ctx, inst);
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

    fn destroy(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if self.showing() {
            ctx.dom.remove_class(inst.element, CLASS_SHOW);
            ctx.unlock_scroll();
        }
        ctx.focus.remove_trap(inst.element);
        self.remove_backdrop(ctx);
        self.core.teardown(ctx);
    }
}
