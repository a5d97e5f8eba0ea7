//! Delegated input dispatch.
//!
//! The host feeds raw [`UiEvent`]s to [`Toolkit::dispatch`]; nothing is
//! ever bound to individual elements. Routing walks ancestors from the
//! event target:
//!
//! 1. Dismiss triggers (`data-fz-dismiss`) hide their enclosing component.
//! 2. Toggle triggers (`data-fz-toggle` + `data-fz-target`) toggle the
//!    targeted element, creating its instance on first use.
//! 3. The nearest `data-fz-component` ancestor receives the event when its
//!    widget declares the matching capability.
//! 4. Clicks are additionally broadcast to every [`Caps::DOC_CLICK`]
//!    instance (outside-click close, backdrop dismissal), and an unconsumed
//!    Escape to every [`Caps::ESCAPE`] instance.
//!
//! Instances are created lazily at the first event that reaches their
//! markup, so a page full of components costs nothing until used.

use crate::toolkit::Toolkit;
use crate::types::{
    Caps, ElementId, InstanceId, KeyInput, UiEvent, ATTR_COMPONENT, ATTR_DISMISS, ATTR_TARGET,
    ATTR_TOGGLE,
};

impl Toolkit {
    /// Route one host input event.
    pub fn dispatch(&mut self, event: UiEvent) {
        match event {
            UiEvent::Click { target } => self.dispatch_click(target),
            UiEvent::Key(key) => {
                self.dispatch_key(&key);
            }
            UiEvent::FocusIn { target } => self.dispatch_focus_in(target),
            UiEvent::FocusOut { target } => self.dispatch_focus_out(target),
        }
    }

    fn dispatch_click(&mut self, target: ElementId) {
        if !self.ctx.dom.is_alive(target) {
            return;
        }

        if let Some(trigger) = self.ctx.dom.closest(target, ATTR_DISMISS) {
            self.handle_dismiss(trigger);
        } else if self.handle_toggle_trigger(target).is_none() {
            if let Some(root) = self.ctx.dom.closest(target, ATTR_COMPONENT) {
                if let Some(id) = self.ensure_instance(root) {
                    if self.caps_of(id).contains(Caps::CLICK) {
                        self.with_instance(id, |widget, ctx, inst| {
                            widget.lifecycle().on_click(ctx, inst, target);
                        });
                    }
                }
            }
        }

        // Broadcast after targeted routing so a widget opened by this click
        // sees the click as inside itself.
        for id in self.instances.ids() {
            if self.caps_of(id).contains(Caps::DOC_CLICK) {
                self.with_instance(id, |widget, ctx, inst| {
                    widget.lifecycle().on_doc_click(ctx, inst, target);
                });
            }
        }
    }

    /// A `data-fz-dismiss="<component>"` trigger hides the nearest
    /// enclosing instance of that component.
    fn handle_dismiss(&mut self, trigger: ElementId) {
        let Some(kind) = self.ctx.dom.attr(trigger, ATTR_DISMISS).map(String::from) else {
            return;
        };
        let mut current = Some(trigger);
        while let Some(el) = current {
            if self.ctx.dom.attr(el, ATTR_COMPONENT) == Some(kind.as_str()) {
                if let Some(id) = self.ensure_instance(el) {
                    self.hide(id);
                }
                return;
            }
            current = self.ctx.dom.parent(el);
        }
    }

    /// A `data-fz-toggle` trigger with a resolvable `data-fz-target`
    /// toggles the targeted component, creating the instance on first use.
    ///
    /// `None` means the click was not a toggle trigger and should fall
    /// through to component routing.
    fn handle_toggle_trigger(&mut self, target: ElementId) -> Option<()> {
        let trigger = self.ctx.dom.closest(target, ATTR_TOGGLE)?;
        let selector = self.ctx.dom.attr(trigger, ATTR_TARGET)?.to_string();
        let name = self.ctx.dom.attr(trigger, ATTR_TOGGLE)?.to_string();
        let element = self.ctx.dom.element_by_id(&selector)?;
        let id = self.create_instance(element, &name, &crate::widgets::Config::new())?;
        self.toggle(id);
        Some(())
    }

    /// Route a key press: first to the widget owning the active element,
    /// then (if unconsumed) Escape broadcasts to every closable overlay.
    /// Returns whether any widget consumed the key.
    pub fn dispatch_key(&mut self, key: &KeyInput) -> bool {
        let mut consumed = false;
        let root = self
            .ctx
            .dom
            .active_element()
            .and_then(|active| self.ctx.dom.closest(active, ATTR_COMPONENT));
        // Lazy creation applies to keys too: focus can land inside fresh
        // component markup before any click reaches it.
        let targeted = root.and_then(|root| self.ensure_instance(root));
        if let Some(id) = targeted {
            if self.caps_of(id).contains(Caps::KEY) {
                let mut hit = false;
                self.with_instance(id, |widget, ctx, inst| {
                    hit = widget.lifecycle().on_key(ctx, inst, key);
                });
                consumed = hit;
            }
        }

        if !consumed && key.is("Escape") {
            for id in self.instances.ids() {
                if self.caps_of(id).contains(Caps::ESCAPE) {
                    self.with_instance(id, |widget, ctx, inst| {
                        widget.lifecycle().on_escape(ctx, inst);
                    });
                }
            }
        }
        consumed
    }

    fn dispatch_focus_in(&mut self, target: ElementId) {
        if !self.ctx.dom.is_alive(target) {
            return;
        }
        self.ctx.focus.focus(&mut self.ctx.dom, target);
        if let Some(id) = self.focus_route(target) {
            self.with_instance(id, |widget, ctx, inst| {
                widget.lifecycle().on_focus_in(ctx, inst, target);
            });
        }
    }

    fn dispatch_focus_out(&mut self, target: ElementId) {
        if !self.ctx.dom.is_alive(target) {
            return;
        }
        if let Some(id) = self.focus_route(target) {
            self.with_instance(id, |widget, ctx, inst| {
                widget.lifecycle().on_focus_out(ctx, inst, target);
            });
        }
    }

    fn focus_route(&mut self, target: ElementId) -> Option<InstanceId> {
        let root = self.ctx.dom.closest(target, ATTR_COMPONENT)?;
        let id = self.ensure_instance(root)?;
        self.caps_of(id).contains(Caps::FOCUS).then_some(id)
    }

    fn caps_of(&self, id: InstanceId) -> Caps {
        self.instances
            .get(id)
            .map(|i| i.widget.caps())
            .unwrap_or(Caps::NONE)
    }
}
