//! Custom event emission - the outbound half of the event system.
//!
//! Every lifecycle transition emits a namespaced (`fz:`-prefixed) event on
//! the widget's element. Events bubble from the target to the root and are
//! cancelable: a listener returning `true` prevents the default, which
//! aborts cancelable transitions (`fz:show`, `fz:hide`).
//!
//! Listener registrations are id-keyed; `off` releases exactly once, so an
//! instance tearing down its listeners can never double-remove.

use crate::dom::Document;
use crate::types::{ElementId, InstanceId, ListenerId};

/// Prefix applied to every event name.
pub const EVENT_NAMESPACE: &str = "fz";

/// Build the namespaced form of a lifecycle event name.
pub fn namespaced(name: &str) -> String {
    format!("{EVENT_NAMESPACE}:{name}")
}

/// A dispatched lifecycle event, as seen by listeners.
#[derive(Clone, Debug)]
pub struct EmittedEvent {
    /// Full namespaced name, e.g. `fz:shown`.
    pub name: String,
    /// Element the event was dispatched on.
    pub target: ElementId,
    /// Instance that emitted, when one is involved.
    pub instance: Option<InstanceId>,
    /// Component name of the emitting instance.
    pub component: Option<&'static str>,
}

/// Listener callback. Return `true` to prevent the default.
pub type EventListener = Box<dyn FnMut(&EmittedEvent) -> bool>;

struct ListenerEntry {
    id: ListenerId,
    name: String,
    scope: Option<ElementId>,
    callback: EventListener,
}

/// Listener registry plus dispatch, owned by the toolkit context.
#[derive(Default)]
pub struct Emitter {
    listeners: Vec<ListenerEntry>,
    next_id: u64,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&mut self, name: &str, scope: Option<ElementId>, callback: EventListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(ListenerEntry {
            id,
            name: name.to_string(),
            scope,
            callback,
        });
        id
    }

    /// Subscribe to `name` (full namespaced form) anywhere in the document.
    pub fn on(&mut self, name: &str, callback: EventListener) -> ListenerId {
        self.register(name, None, callback)
    }

    /// Subscribe to `name` dispatched on `scope` or bubbling through it.
    pub fn on_element(&mut self, scope: ElementId, name: &str, callback: EventListener) -> ListenerId {
        self.register(name, Some(scope), callback)
    }

    /// Remove a listener. Returns whether it was still registered; a second
    /// call for the same id is a no-op returning `false`.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|entry| entry.id != id);
        self.listeners.len() != before
    }

    /// Number of live registrations (leak checks in tests).
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Dispatch `event`, bubbling from its target to the root.
    ///
    /// Element-scoped listeners fire along the bubble chain in registration
    /// order, then unscoped listeners. All listeners run even after one
    /// prevents the default. Returns `false` when the default was prevented.
    pub fn emit(&mut self, dom: &Document, event: &EmittedEvent) -> bool {
        let mut chain = Vec::new();
        let mut current = Some(event.target);
        while let Some(el) = current {
            chain.push(el);
            current = dom.parent(el);
        }

        let mut prevented = false;
        for scope_el in &chain {
            for entry in &mut self.listeners {
                if entry.scope == Some(*scope_el) && entry.name == event.name {
                    prevented |= (entry.callback)(event);
                }
            }
        }
        for entry in &mut self.listeners {
            if entry.scope.is_none() && entry.name == event.name {
                prevented |= (entry.callback)(event);
            }
        }
        !prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() -> (Document, Emitter) {
        (Document::new(), Emitter::new())
    }

    fn event(target: ElementId, name: &str) -> EmittedEvent {
        EmittedEvent {
            name: namespaced(name),
            target,
            instance: None,
            component: None,
        }
    }

    #[test]
    fn test_namespacing() {
        assert_eq!(namespaced("show"), "fz:show");
    }

    #[test]
    fn test_bubbles_to_ancestor_scope() {
        let (mut dom, mut emitter) = setup();
        let outer = dom.create_element("div");
        let inner = dom.create_element("div");
        dom.append_child(dom.root(), outer);
        dom.append_child(outer, inner);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_outer = seen.clone();
        emitter.on_element(
            outer,
            "fz:show",
            Box::new(move |e| {
                seen_outer.borrow_mut().push(e.target);
                false
            }),
        );

        assert!(emitter.emit(&dom, &event(inner, "show")));
        assert_eq!(*seen.borrow(), vec![inner]);

        // Sibling scope does not hear it.
        let sibling = dom.create_element("div");
        dom.append_child(dom.root(), sibling);
        assert!(emitter.emit(&dom, &event(sibling, "show")));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_prevent_default() {
        let (dom, mut emitter) = setup();
        emitter.on("fz:show", Box::new(|_| true));
        let count = Rc::new(RefCell::new(0));
        let count2 = count.clone();
        emitter.on(
            "fz:show",
            Box::new(move |_| {
                *count2.borrow_mut() += 1;
                false
            }),
        );

        // Prevented, but later listeners still observe the event.
        assert!(!emitter.emit(&dom, &event(dom.root(), "show")));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_off_releases_exactly_once() {
        let (dom, mut emitter) = setup();
        let count = Rc::new(RefCell::new(0));
        let count2 = count.clone();
        let id = emitter.on(
            "fz:hide",
            Box::new(move |_| {
                *count2.borrow_mut() += 1;
                false
            }),
        );

        assert!(emitter.off(id));
        assert!(!emitter.off(id));
        emitter.emit(&dom, &event(dom.root(), "hide"));
        assert_eq!(*count.borrow(), 0);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_name_filtering() {
        let (dom, mut emitter) = setup();
        let hits = Rc::new(RefCell::new(0));
        let hits2 = hits.clone();
        emitter.on(
            "fz:shown",
            Box::new(move |_| {
                *hits2.borrow_mut() += 1;
                false
            }),
        );

        emitter.emit(&dom, &event(dom.root(), "show"));
        emitter.emit(&dom, &event(dom.root(), "shown"));
        assert_eq!(*hits.borrow(), 1);
    }
}
