//! Toolkit - the explicit runtime context and its public surface.
//!
//! One [`Toolkit`] owns everything: the element tree, focus state, timer
//! queue, event emitter, component registry, and live instances. Nothing
//! is global; two toolkits in one process never observe each other.
//!
//! The host drives it with three inputs:
//! - [`Toolkit::dispatch`] for user input events
//! - [`Toolkit::tick`] with a monotonic millisecond clock
//! - element-tree edits through [`Toolkit::dom_mut`]
//!
//! # Example
//!
//! ```ignore
//! let mut ui = Toolkit::new(Size::new(800, 600));
//! let modal = ui.dom_mut().create_element("div");
//! let root = ui.dom().root();
//! ui.dom_mut().append_child(root, modal);
//! ui.dom_mut().set_attr(modal, ATTR_COMPONENT, "modal");
//!
//! let id = ui.create_instance(modal, "modal", &Config::new()).unwrap();
//! ui.show(id);
//! ui.tick(now_ms);
//! ```

use tracing::{debug, warn};

use crate::dom::Document;
use crate::engine::{Instance, Instances, Registry, WidgetCtor};
use crate::error::{Error, Result};
use crate::events::emitter::{namespaced, EmittedEvent, Emitter, EventListener};
use crate::state::{FocusState, TimerQueue};
use crate::types::{
    ElementId, InstanceId, ListenerId, Size, ATTR_COMPONENT, ATTR_INSTANCE, CLASS_SCROLL_LOCK,
};
use crate::widgets::toast::CLASS_STACK;
use crate::widgets::{Config, ConfigValue, InstanceRef, Widget};

// =============================================================================
// Context
// =============================================================================

/// Shared state handed to every widget method.
///
/// Fields are public and disjoint so a widget can, say, move focus while
/// holding the document mutably: `ctx.focus.focus_first(&mut ctx.dom)`.
pub struct Context {
    pub dom: Document,
    pub focus: FocusState,
    pub timers: TimerQueue,
    pub emitter: Emitter,
    pub viewport: Size,
    scroll_locks: u32,
}

impl Context {
    pub fn new(viewport: Size) -> Self {
        Self {
            dom: Document::new(),
            focus: FocusState::new(),
            timers: TimerQueue::new(),
            emitter: Emitter::new(),
            viewport,
            scroll_locks: 0,
        }
    }

    /// Take one hold on page scrolling. Overlays may overlap, so the lock
    /// is counted; the root carries [`CLASS_SCROLL_LOCK`] while any hold
    /// is outstanding.
    pub fn lock_scroll(&mut self) {
        self.scroll_locks += 1;
        let root = self.dom.root();
        self.dom.add_class(root, CLASS_SCROLL_LOCK);
    }

    /// Release one hold on page scrolling; the class comes off the root
    /// only when the last hold is gone.
    pub fn unlock_scroll(&mut self) {
        self.scroll_locks = self.scroll_locks.saturating_sub(1);
        if self.scroll_locks == 0 {
            let root = self.dom.root();
            self.dom.remove_class(root, CLASS_SCROLL_LOCK);
        }
    }

    /// Emit a namespaced event on `target`, bubbling to the root.
    ///
    /// `name` is the bare lifecycle name (`"show"`, `"hidden"`, ...).
    /// Returns `false` when a listener prevented the default.
    pub fn emit(
        &mut self,
        target: ElementId,
        name: &str,
        instance: Option<InstanceId>,
        component: Option<&'static str>,
    ) -> bool {
        let event = EmittedEvent {
            name: namespaced(name),
            target,
            instance,
            component,
        };
        self.emitter.emit(&self.dom, &event)
    }
}

// =============================================================================
// Toolkit
// =============================================================================

/// The component runtime. See the module docs for the host contract.
pub struct Toolkit {
    pub(crate) ctx: Context,
    pub(crate) registry: Registry,
    pub(crate) instances: Instances,
}

impl Toolkit {
    /// A toolkit with every builtin component registered.
    pub fn new(viewport: Size) -> Self {
        Self {
            ctx: Context::new(viewport),
            registry: Registry::with_builtins(),
            instances: Instances::new(),
        }
    }

    pub fn dom(&self) -> &Document {
        &self.ctx.dom
    }

    pub fn dom_mut(&mut self) -> &mut Document {
        &mut self.ctx.dom
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    /// Update the viewport the positioning code clamps against.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.ctx.viewport = viewport;
    }

    /// Register (or replace) a component constructor.
    pub fn register(&mut self, name: &str, ctor: WidgetCtor) {
        self.registry.register(name, ctor);
    }

    // =========================================================================
    // Instance Lifecycle
    // =========================================================================

    /// Create an instance of component `name` on `element`.
    ///
    /// Returns the existing id when the element already carries a live
    /// instance. Fails if the name is unregistered or the element is not
    /// attached to the document.
    pub fn try_create_instance(
        &mut self,
        element: ElementId,
        name: &str,
        overrides: &Config,
    ) -> Result<InstanceId> {
        if let Some(existing) = self.instances.lookup(&self.ctx.dom, element) {
            return Ok(existing);
        }
        let Some(ctor) = self.registry.resolve(name) else {
            return Err(Error::UnknownComponent {
                name: name.to_string(),
            });
        };
        if !self.ctx.dom.is_attached(element) {
            return Err(Error::DetachedElement { element });
        }

        let id = self.instances.alloc_id();
        self.ctx.dom.set_attr(element, ATTR_INSTANCE, id.to_string());
        let widget = ctor(&self.ctx.dom, element, overrides);
        debug!(component = name, instance = %id, "instance created");
        self.instances.insert(Instance {
            id,
            name: name.to_string(),
            element,
            widget,
            listeners: Vec::new(),
        });
        self.with_instance(id, |widget, ctx, inst| {
            widget.lifecycle().init(ctx, inst);
        });
        Ok(id)
    }

    /// Soft-failing form of [`Toolkit::try_create_instance`]: markup errors
    /// degrade to a warning and `None` instead of surfacing to the caller.
    pub fn create_instance(
        &mut self,
        element: ElementId,
        name: &str,
        overrides: &Config,
    ) -> Option<InstanceId> {
        match self.try_create_instance(element, name, overrides) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(error = %err, "instance creation skipped");
                None
            }
        }
    }

    /// Destroy an instance: emit `fz:destroy`, run the widget's teardown,
    /// release its owned listeners, drop its timers, and strip its
    /// instance attribute.
    ///
    /// Destroying an unknown or already-destroyed id is a no-op.
    pub fn destroy_instance(&mut self, id: InstanceId) {
        let Some(mut instance) = self.instances.take(id) else {
            return;
        };
        let inst = InstanceRef {
            id,
            element: instance.element,
        };
        let component = instance.widget.lifecycle_ref().component();
        self.ctx.emit(inst.element, "destroy", Some(id), Some(component));
        instance.widget.lifecycle().destroy(&mut self.ctx, inst);
        for listener in instance.listeners.drain(..) {
            self.ctx.emitter.off(listener);
        }
        self.ctx.timers.cancel_for(id);
        self.ctx.dom.remove_attr(inst.element, ATTR_INSTANCE);
        debug!(component, instance = %id, "instance destroyed");
    }

    /// Scan the document for `data-fz-component` markup and create every
    /// instance not yet live. Returns how many were created.
    pub fn init_all(&mut self) -> usize {
        let root = self.ctx.dom.root();
        let mut created = 0;
        for el in self.ctx.dom.descendants(root) {
            if self.instances.lookup(&self.ctx.dom, el).is_some() {
                continue;
            }
            let Some(name) = self.ctx.dom.attr(el, ATTR_COMPONENT).map(String::from) else {
                continue;
            };
            if self.create_instance(el, &name, &Config::new()).is_some() {
                created += 1;
            }
        }
        created
    }

    /// The instance bound to `element`, if one is live.
    pub fn instance_at(&self, element: ElementId) -> Option<InstanceId> {
        self.instances.lookup(&self.ctx.dom, element)
    }

    /// Component name an instance was created under.
    pub fn component_of(&self, id: InstanceId) -> Option<&str> {
        self.instances.get(id).map(|i| i.name.as_str())
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Resolve-or-create for delegation: an element carrying component
    /// markup always has an instance by the time a handler runs.
    pub(crate) fn ensure_instance(&mut self, element: ElementId) -> Option<InstanceId> {
        if let Some(id) = self.instances.lookup(&self.ctx.dom, element) {
            return Some(id);
        }
        let name = self.ctx.dom.attr(element, ATTR_COMPONENT)?.to_string();
        self.create_instance(element, &name, &Config::new())
    }

    /// Run `f` against an instance's widget with the full context available.
    ///
    /// The instance is taken out of the store for the duration so widget
    /// code can never alias itself through the toolkit. Returns `false`
    /// for unknown ids.
    pub(crate) fn with_instance<F>(&mut self, id: InstanceId, f: F) -> bool
    where
        F: FnOnce(&mut Widget, &mut Context, InstanceRef),
    {
        let Some(mut instance) = self.instances.take(id) else {
            return false;
        };
        let inst = InstanceRef {
            id,
            element: instance.element,
        };
        f(&mut instance.widget, &mut self.ctx, inst);
        self.instances.insert(instance);
        true
    }

    // =========================================================================
    // Widget Operations
    // =========================================================================

    pub fn show(&mut self, id: InstanceId) {
        self.with_instance(id, |widget, ctx, inst| widget.lifecycle().show(ctx, inst));
    }

    pub fn hide(&mut self, id: InstanceId) {
        self.with_instance(id, |widget, ctx, inst| widget.lifecycle().hide(ctx, inst));
    }

    pub fn toggle(&mut self, id: InstanceId) {
        self.with_instance(id, |widget, ctx, inst| widget.lifecycle().toggle(ctx, inst));
    }

    /// Destroy the instance bound to `element`, if any.
    pub fn destroy_at(&mut self, element: ElementId) {
        if let Some(id) = self.instances.lookup(&self.ctx.dom, element) {
            self.destroy_instance(id);
        }
    }

    /// Jump a carousel to the slide at `index`. No-op for other widgets.
    pub fn slide_to(&mut self, id: InstanceId, index: usize) {
        self.with_instance(id, |widget, ctx, inst| {
            if let Widget::Carousel(carousel) = widget {
                carousel.go_to(ctx, inst, index);
            }
        });
    }

    /// Build and show a transient toast carrying `message`.
    ///
    /// The element is created by the toolkit, joins the shared toast stack,
    /// auto-dismisses after its timeout, and removes itself once hidden.
    pub fn show_toast(&mut self, message: &str) -> Option<InstanceId> {
        self.show_toast_with(message, Config::new())
    }

    /// [`Toolkit::show_toast`] with option overrides (e.g. `timeout`).
    pub fn show_toast_with(&mut self, message: &str, overrides: Config) -> Option<InstanceId> {
        let el = self.ctx.dom.create_element("div");
        self.ctx.dom.add_class(el, "toast");
        self.ctx.dom.set_text(el, message);
        self.ctx.dom.set_attr(el, ATTR_COMPONENT, "toast");
        let root = self.ctx.dom.root();
        self.ctx.dom.append_child(root, el);

        let overrides = overrides.with("transient", ConfigValue::Bool(true));
        let id = self.create_instance(el, "toast", &overrides)?;
        self.show(id);
        Some(id)
    }

    /// Number of toasts currently in the stack (shown or animating out).
    pub fn toast_stack_len(&self) -> usize {
        let root = self.ctx.dom.root();
        match self.ctx.dom.descendant_with_class(root, CLASS_STACK) {
            Some(stack) => self.ctx.dom.children(stack).len(),
            None => 0,
        }
    }

    // =========================================================================
    // Clock
    // =========================================================================

    /// Advance the runtime clock and run due timers.
    ///
    /// `now_ms` must come from a monotonic clock; a value in the past is
    /// ignored. Timers whose instance has been destroyed are dropped.
    pub fn tick(&mut self, now_ms: u64) {
        for (id, action) in self.ctx.timers.tick(now_ms) {
            self.with_instance(id, |widget, ctx, inst| {
                widget.lifecycle().on_timer(ctx, inst, action);
            });
            // Transient instances (auto-dismissed toasts) report themselves
            // finished; reclaim them so the store never accumulates them.
            let finished = self
                .instances
                .get(id)
                .is_some_and(|i| i.widget.lifecycle_ref().finished());
            if finished {
                self.destroy_instance(id);
            }
        }
    }

    // =========================================================================
    // Event Listeners
    // =========================================================================

    /// Subscribe to a lifecycle event anywhere in the document.
    ///
    /// `name` may be bare (`"shown"`) or namespaced (`"fz:shown"`).
    pub fn on(&mut self, name: &str, callback: EventListener) -> ListenerId {
        self.ctx.emitter.on(&Self::full_name(name), callback)
    }

    /// Subscribe to a lifecycle event on `scope` or bubbling through it.
    pub fn on_element(&mut self, scope: ElementId, name: &str, callback: EventListener) -> ListenerId {
        self.ctx.emitter.on_element(scope, &Self::full_name(name), callback)
    }

    /// Subscribe to a lifecycle event on an instance's element, tying the
    /// registration to the instance: destroying it releases the listener.
    ///
    /// Returns `None` for an unknown id.
    pub fn on_instance(
        &mut self,
        id: InstanceId,
        name: &str,
        callback: EventListener,
    ) -> Option<ListenerId> {
        let element = self.instances.get(id)?.element;
        let listener = self.ctx.emitter.on_element(element, &Self::full_name(name), callback);
        if let Some(instance) = self.instances.get_mut(id) {
            instance.listeners.push(listener);
        }
        Some(listener)
    }

    /// Remove a listener; `false` if it was already gone.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.ctx.emitter.off(id)
    }

    pub fn listener_count(&self) -> usize {
        self.ctx.emitter.listener_count()
    }

    fn full_name(name: &str) -> String {
        if name.contains(':') {
            name.to_string()
        } else {
            namespaced(name)
        }
    }
}
