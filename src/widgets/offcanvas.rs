//! Offcanvas panel - an edge drawer with backdrop and Escape dismissal.
//!
//! Behaves like a lighter modal: optional backdrop, optional scroll lock,
//! focus capture and restore, but no Tab trapping (the drawer coexists
//! with the page instead of owning it).

use crate::state::timers::TimerAction;
use crate::toolkit::Context;
use crate::types::{Caps, ElementId, CLASS_SHOW};
use crate::widgets::core::{Config, ConfigValue, InstanceCore, StateValue};
use crate::widgets::{InstanceRef, Lifecycle, Widget};

const COMPONENT: &str = "offcanvas";
const CLASS_BACKDROP: &str = "offcanvas-backdrop";

const DEFAULTS: &[(&str, ConfigValue)] = &[
    ("backdrop", ConfigValue::Bool(true)),
    ("keyboard", ConfigValue::Bool(true)),
    ("scroll", ConfigValue::Bool(false)),
    ("animation", ConfigValue::Int(300)),
];

#[derive(Debug)]
pub struct Offcanvas {
    core: InstanceCore,
    config: Config,
    backdrop: Option<ElementId>,
    captured_focus: Option<(ElementId, u64)>,
}

impl Offcanvas {
    pub fn create(dom: &crate::dom::Document, element: ElementId, overrides: &Config) -> Widget {
        let config = Config::resolve(COMPONENT, DEFAULTS, dom, element, overrides);
        Widget::Offcanvas(Self {
            core: InstanceCore::new(COMPONENT),
            config,
            backdrop: None,
            captured_focus: None,
        })
    }

    fn showing(&self) -> bool {
        self.core.flag("showing")
    }

    fn remove_backdrop(&mut self, ctx: &mut Context) {
        if let Some(backdrop) = self.backdrop.take() {
            ctx.dom.remove(backdrop);
            self.core.release_node(backdrop);
        }
    }
}

impl Lifecycle for Offcanvas {
    fn component(&self) -> &'static str {
        COMPONENT
    }

    fn caps(&self) -> Caps {
        Caps::ESCAPE | Caps::DOC_CLICK
    }

    fn init(&mut self, ctx: &mut Context, inst: InstanceRef) {
        ctx.dom.set_attr(inst.element, "role", "dialog");
        ctx.dom.set_attr(inst.element, "aria-hidden", "true");
    }

    fn show(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if self.showing() {
            return;
        }
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
        if !self.config.bool("scroll", false) {
            ctx.lock_scroll();
        }

        self.core.update_state(&[("showing", StateValue::Flag(true))]);
        ctx.timers
            .schedule(inst.id, TimerAction::EmitShown, self.config.millis("animation", 300));
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
        self.remove_backdrop(ctx);
        if !self.config.bool("scroll", false) {
            ctx.unlock_scroll();
        }

        if let Some((el, serial)) = self.captured_focus.take() {
            if ctx.dom.serial(el) == Some(serial) && ctx.dom.is_attached(el) {
                ctx.focus.focus(&mut ctx.dom, el);
            }
        }

        self.core.update_state(&[("showing", StateValue::Flag(false))]);
        ctx.timers
            .schedule(inst.id, TimerAction::EmitHidden, self.config.millis("animation", 300));
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
            if !self.config.bool("scroll", false) {
                ctx.unlock_scroll();
            }
        }
        self.remove_backdrop(ctx);
        self.core.teardown(ctx);
    }
}
