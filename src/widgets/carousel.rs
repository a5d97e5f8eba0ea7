//! Carousel - cycling slide deck with optional auto-advance.
//!
//! Slides are the descendants carrying class `carousel-item`; exactly one
//! is `active`. Controls inside the widget advance it through
//! `data-fz-slide="next"` / `"prev"`. A slide change emits a cancelable
//! `fz:slide` before the swap and `fz:slid` after the animation delay.
//! With `ride` enabled the carousel advances itself every `interval`
//! milliseconds until destroyed.

use crate::state::timers::TimerAction;
use crate::toolkit::Context;
use crate::types::{Caps, ElementId};
use crate::widgets::core::{Config, ConfigValue, InstanceCore, StateValue};
use crate::widgets::{InstanceRef, Lifecycle, Widget};

const COMPONENT: &str = "carousel";
const CLASS_ITEM: &str = "carousel-item";
const CLASS_ACTIVE: &str = "active";
const ATTR_SLIDE: &str = "data-fz-slide";

const DEFAULTS: &[(&str, ConfigValue)] = &[
    ("interval", ConfigValue::Int(5000)),
    ("animation", ConfigValue::Int(300)),
    ("wrap", ConfigValue::Bool(true)),
    ("ride", ConfigValue::Bool(false)),
];

#[derive(Debug)]
pub struct Carousel {
    core: InstanceCore,
    config: Config,
}

impl Carousel {
    pub fn create(dom: &crate::dom::Document, element: ElementId, overrides: &Config) -> Widget {
        let config = Config::resolve(COMPONENT, DEFAULTS, dom, element, overrides);
        Widget::Carousel(Self {
            core: InstanceCore::new(COMPONENT),
            config,
        })
    }

    fn slides(&self, ctx: &Context, element: ElementId) -> Vec<ElementId> {
        ctx.dom
            .descendants(element)
            .into_iter()
            .filter(|&el| ctx.dom.has_class(el, CLASS_ITEM))
            .collect()
    }

    fn current(&self) -> usize {
        self.core.index("current").unwrap_or(0)
    }

    pub(crate) fn go_to(&mut self, ctx: &mut Context, inst: InstanceRef, index: usize) {
        let slides = self.slides(ctx, inst.element);
        let Some(&next) = slides.get(index) else { return };
        if index == self.current() {
            return;
        }
        if !self.core.emit(ctx, inst, "slide") {
            return;
        }
        if let Some(&prev) = slides.get(self.current()) {
            ctx.dom.remove_class(prev, CLASS_ACTIVE);
        }
        ctx.dom.add_class(next, CLASS_ACTIVE);
        self.core.update_state(&[("current", StateValue::Index(index))]);
        // EmitShown doubles as the `slid` completion marker.
        ctx.timers.cancel_matching(inst.id, TimerAction::EmitShown);
        ctx.timers
            .schedule(inst.id, TimerAction::EmitShown, self.config.millis("animation", 300));
    }

    fn step(&mut self, ctx: &mut Context, inst: InstanceRef, direction: i32) {
        let len = self.slides(ctx, inst.element).len();
        if len == 0 {
            return;
        }
        let current = self.current() as i32;
        let stepped = current + direction;
        let index = if self.config.bool("wrap", true) {
            let len = len as i32;
            ((stepped % len + len) % len) as usize
        } else if stepped < 0 || stepped >= len as i32 {
            return;
        } else {
            stepped as usize
        };
        self.go_to(ctx, inst, index);
    }

    fn arm_cycle(&self, ctx: &mut Context, inst: InstanceRef) {
        let interval = self.config.millis("interval", 5000);
        if interval > 0 {
            ctx.timers.schedule(inst.id, TimerAction::Cycle, interval);
        }
    }
}

impl Lifecycle for Carousel {
    fn component(&self) -> &'static str {
        COMPONENT
    }

    fn caps(&self) -> Caps {
        Caps::CLICK
    }

    fn init(&mut self, ctx: &mut Context, inst: InstanceRef) {
        let slides = self.slides(ctx, inst.element);
        let initial = slides
            .iter()
            .position(|&el| ctx.dom.has_class(el, CLASS_ACTIVE))
            .unwrap_or(0);
        if let Some(&slide) = slides.get(initial) {
            ctx.dom.add_class(slide, CLASS_ACTIVE);
            self.core.update_state(&[("current", StateValue::Index(initial))]);
        }
        if self.config.bool("ride", false) {
            self.arm_cycle(ctx, inst);
        }
    }

    fn on_click(&mut self, ctx: &mut Context, inst: InstanceRef, target: ElementId) -> bool {
        let Some(control) = ctx.dom.closest(target, ATTR_SLIDE) else {
            return false;
        };
        if !ctx.dom.contains(inst.element, control) {
            return false;
        }
        let direction = match ctx.dom.attr(control, ATTR_SLIDE) {
            Some("next") => 1,
            Some("prev") => -1,
            _ => return false,
        };
        self.step(ctx, inst, direction);
        true
    }

    fn on_timer(&mut self, ctx: &mut Context, inst: InstanceRef, action: TimerAction) {
        match action {
            TimerAction::Cycle => {
                self.step(ctx, inst, 1);
                self.arm_cycle(ctx, inst);
            }
            TimerAction::EmitShown => {
                self.core.emit(ctx, inst, "slid");
            }
            _ => {}
        }
    }

    fn destroy(&mut self, ctx: &mut Context, _inst: InstanceRef) {
        self.core.teardown(ctx);
    }
}
