//! Toast notification with auto-dismiss.
//!
//! Toasts live in a shared `.toast-stack` container appended to the root;
//! `init` creates the container on first use and moves the toast into it.
//! `show` arms an auto-dismiss timer when `timeout` is positive; `hide`
//! disarms it. Transient toasts (those built by
//! [`crate::Toolkit::show_toast`]) remove their own element once hidden
//! and report themselves finished, so the toolkit reclaims the instance.

use crate::state::timers::TimerAction;
use crate::toolkit::Context;
use crate::types::{Caps, CLASS_SHOW};
use crate::widgets::core::{Config, ConfigValue, InstanceCore, StateValue};
use crate::widgets::{InstanceRef, Lifecycle, Widget};

const COMPONENT: &str = "toast";
pub const CLASS_STACK: &str = "toast-stack";

const DEFAULTS: &[(&str, ConfigValue)] = &[
    ("timeout", ConfigValue::Int(3000)),
    ("animation", ConfigValue::Int(150)),
    ("transient", ConfigValue::Bool(false)),
];

#[derive(Debug)]
pub struct Toast {
    core: InstanceCore,
    config: Config,
}

impl Toast {
    pub fn create(dom: &crate::dom::Document, element: crate::types::ElementId, overrides: &Config) -> Widget {
        let config = Config::resolve(COMPONENT, DEFAULTS, dom, element, overrides);
        Widget::Toast(Self {
            core: InstanceCore::new(COMPONENT),
            config,
        })
    }

    fn showing(&self) -> bool {
        self.core.flag("showing")
    }
}

impl Lifecycle for Toast {
    fn component(&self) -> &'static str {
        COMPONENT
    }

    fn caps(&self) -> Caps {
        Caps::NONE
    }

    fn init(&mut self, ctx: &mut Context, inst: InstanceRef) {
        ctx.dom.set_attr(inst.element, "role", "status");
        ctx.dom.set_attr(inst.element, "aria-live", "polite");

        let root = ctx.dom.root();
        let stack = match ctx.dom.descendant_with_class(root, CLASS_STACK) {
            Some(stack) => stack,
            None => {
                let stack = ctx.dom.create_element("div");
                ctx.dom.add_class(stack, CLASS_STACK);
                ctx.dom.append_child(root, stack);
                stack
            }
        };
        ctx.dom.append_child(stack, inst.element);
    }

    fn show(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if self.showing() {
            return;
        }
        ctx.timers.cancel_matching(inst.id, TimerAction::EmitHidden);
        if !self.core.emit(ctx, inst, "show") {
            return;
        }
        ctx.dom.add_class(inst.element, CLASS_SHOW);
        self.core.update_state(&[("showing", StateValue::Flag(true))]);
        ctx.timers
            .schedule(inst.id, TimerAction::EmitShown, self.config.millis("animation", 150));
        let timeout = self.config.millis("timeout", 3000);
        if timeout > 0 {
            ctx.timers.schedule(inst.id, TimerAction::AutoDismiss, timeout);
        }
    }

    fn hide(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if !self.showing() {
            return;
        }
        ctx.timers.cancel_matching(inst.id, TimerAction::EmitShown);
        ctx.timers.cancel_matching(inst.id, TimerAction::AutoDismiss);
        if !self.core.emit(ctx, inst, "hide") {
            return;
        }
        ctx.dom.remove_class(inst.element, CLASS_SHOW);
        self.core.update_state(&[("showing", StateValue::Flag(false))]);
        ctx.timers
            .schedule(inst.id, TimerAction::EmitHidden, self.config.millis("animation", 150));
    }

    fn toggle(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if self.showing() {
            self.hide(ctx, inst);
        } else {
            self.show(ctx, inst);
        }
    }

    fn on_timer(&mut self, ctx: &mut Context, inst: InstanceRef, action: TimerAction) {
        match action {
            TimerAction::AutoDismiss => self.hide(ctx, inst),
            TimerAction::EmitShown => {
                self.core.emit(ctx, inst, "shown");
            }
            TimerAction::EmitHidden => {
                self.core.emit(ctx, inst, "hidden");
                if self.config.bool("transient", false) {
                    ctx.dom.remove(inst.element);
                    self.core.update_state(&[("spent", StateValue::Flag(true))]);
                }
            }
            _ => {}
        }
    }

    /// A transient toast is done once its element is gone; the toolkit
    /// destroys the instance on the next tick boundary.
    fn finished(&self) -> bool {
        self.core.flag("spent")
    }

    fn destroy(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if self.config.bool("transient", false) {
            ctx.dom.remove(inst.element);
        }
        self.core.teardown(ctx);
    }
}
