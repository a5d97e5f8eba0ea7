//! Tooltip bubble shown while its anchor holds focus.
//!
//! The bubble element is created on show and removed on hide; its text
//! comes from the anchor's `data-fz-title` (falling back to `title`). The
//! bubble is placed on the configured side of the anchor, then clamped so
//! it never overflows the viewport.

use crate::layout::position::{place, Placement};
use crate::state::timers::TimerAction;
use crate::toolkit::Context;
use crate::types::{Caps, ElementId, Size, ATTR_LEFT, ATTR_TOP, CLASS_SHOW};
use crate::widgets::core::{Config, ConfigValue, InstanceCore, StateValue};
use crate::widgets::{InstanceRef, Lifecycle, Widget};

const COMPONENT: &str = "tooltip";

const DEFAULTS: &[(&str, ConfigValue)] = &[
    ("placement", ConfigValue::Str(String::new())),
    ("animation", ConfigValue::Int(150)),
];

#[derive(Debug)]
pub struct Tooltip {
    core: InstanceCore,
    config: Config,
    bubble: Option<ElementId>,
}

impl Tooltip {
    pub fn create(dom: &crate::dom::Document, element: ElementId, overrides: &Config) -> Widget {
        let config = Config::resolve(COMPONENT, DEFAULTS, dom, element, overrides);
        Widget::Tooltip(Self {
            core: InstanceCore::new(COMPONENT),
            config,
            bubble: None,
        })
    }

    fn showing(&self) -> bool {
        self.core.flag("showing")
    }

    fn placement(&self) -> Placement {
        Placement::parse(&self.config.str("placement", "top")).unwrap_or(Placement::Top)
    }

    fn remove_bubble(&mut self, ctx: &mut Context) {
        if let Some(bubble) = self.bubble.take() {
            ctx.dom.remove(bubble);
            self.core.release_node(bubble);
        }
    }
}

impl Lifecycle for Tooltip {
    fn component(&self) -> &'static str {
        COMPONENT
    }

    fn caps(&self) -> Caps {
        Caps::FOCUS
    }

    fn init(&mut self, ctx: &mut Context, inst: InstanceRef) {
        // Move a plain `title` into the data attribute so the host never
        // renders a native tooltip alongside ours.
        if ctx.dom.attr(inst.element, "data-fz-title").is_none() {
            if let Some(title) = ctx.dom.attr(inst.element, "title").map(String::from) {
                ctx.dom.set_attr(inst.element, "data-fz-title", title);
                ctx.dom.remove_attr(inst.element, "title");
            }
        }
    }

    fn show(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if self.showing() {
            return;
        }
        ctx.timers.cancel_matching(inst.id, TimerAction::EmitHidden);
        if !self.core.emit(ctx, inst, "show") {
            return;
        }

        let text = ctx
            .dom
            .attr(inst.element, "data-fz-title")
            .or_else(|| ctx.dom.attr(inst.element, "title"))
            .unwrap_or("")
            .to_string();

        let bubble = ctx.dom.create_element("div");
        ctx.dom.add_class(bubble, COMPONENT);
        ctx.dom.add_class(bubble, CLASS_SHOW);
        ctx.dom.set_attr(bubble, "role", "tooltip");
        ctx.dom.set_text(bubble, text);
        let root = ctx.dom.root();
        ctx.dom.append_child(root, bubble);
        self.core.own_node(bubble);
        self.bubble = Some(bubble);

        if let Some(anchor) = ctx.dom.bounds(inst.element) {
            let size = ctx.dom.bounds(bubble).map(|b| b.size()).unwrap_or(Size {
                width: 0,
                height: 0,
            });
            let point = place(anchor, size, self.placement(), ctx.viewport);
            ctx.dom.set_attr(bubble, ATTR_TOP, point.y.to_string());
            ctx.dom.set_attr(bubble, ATTR_LEFT, point.x.to_string());
        }

        self.core.update_state(&[("showing", StateValue::Flag(true))]);
        ctx.timers
            .schedule(inst.id, TimerAction::EmitShown, self.config.millis("animation", 150));
    }

    fn hide(&mut self, ctx: &mut Context, inst: InstanceRef) {
        if !self.showing() {
            return;
        }
        ctx.timers.cancel_matching(inst.id, TimerAction::EmitShown);
        if !self.core.emit(ctx, inst, "hide") {
            return;
        }
        self.remove_bubble(ctx);
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

    fn on_focus_in(&mut self, ctx: &mut Context, inst: InstanceRef, target: ElementId) {
        if ctx.dom.contains(inst.element, target) {
            self.show(ctx, inst);
        }
    }

    fn on_focus_out(&mut self, ctx: &mut Context, inst: InstanceRef, target: ElementId) {
        if ctx.dom.contains(inst.element, target) {
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

    fn destroy(&mut self, ctx: &mut Context, _inst: InstanceRef) {
        self.remove_bubble(ctx);
        self.core.teardown(ctx);
    }
}
