//! Live-instance store.
//!
//! Each instance binds an element to a constructed widget under a
//! page-unique [`InstanceId`]. The id is also written to the element as
//! `data-fz-instance`, which is how the delegator maps an event target
//! back to its instance. Ids come from a monotonic counter and are never
//! reused, so a stale attribute left on a removed subtree can never alias
//! a newer instance.
//!
//! This is storage only; creation and destruction are orchestrated by
//! [`crate::Toolkit`], which owns the surrounding context.

use std::collections::HashMap;

use crate::dom::Document;
use crate::types::{ElementId, InstanceId, ListenerId, ATTR_INSTANCE};
use crate::widgets::Widget;

/// A live widget instance.
#[derive(Debug)]
pub struct Instance {
    pub id: InstanceId,
    /// Name the instance was created under (may be an alias).
    pub name: String,
    pub element: ElementId,
    pub widget: Widget,
    /// Listener registrations tied to this instance's lifetime, released
    /// on destroy. See [`crate::Toolkit::on_instance`].
    pub listeners: Vec<ListenerId>,
}

#[derive(Debug, Default)]
pub struct Instances {
    map: HashMap<InstanceId, Instance>,
    next_id: u64,
}

impl Instances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next instance id.
    pub fn alloc_id(&mut self) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, instance: Instance) {
        self.map.insert(instance.id, instance);
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.map.contains_key(&id)
    }

    pub fn get(&self, id: InstanceId) -> Option<&Instance> {
        self.map.get(&id)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut Instance> {
        self.map.get_mut(&id)
    }

    /// Remove and return an instance, e.g. to run a widget method without
    /// aliasing the store. Pair with [`Instances::insert`] to put it back.
    pub fn take(&mut self, id: InstanceId) -> Option<Instance> {
        self.map.remove(&id)
    }

    /// The instance bound to `element`, resolved through its
    /// `data-fz-instance` attribute.
    ///
    /// An attribute naming a destroyed instance resolves to `None`.
    pub fn lookup(&self, dom: &Document, element: ElementId) -> Option<InstanceId> {
        let id = InstanceId::parse(dom.attr(element, ATTR_INSTANCE)?)?;
        self.contains(id).then_some(id)
    }

    /// Live instance ids in creation order.
    pub fn ids(&self) -> Vec<InstanceId> {
        let mut ids: Vec<InstanceId> = self.map.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Config, Modal};

    fn setup() -> (Document, Instances) {
        (Document::new(), Instances::new())
    }

    #[test]
    fn test_ids_are_never_reused() {
        let (_, mut instances) = setup();
        let a = instances.alloc_id();
        let b = instances.alloc_id();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "fz-0");
        assert_eq!(b.to_string(), "fz-1");
    }

    #[test]
    fn test_lookup_through_attribute() {
        let (mut dom, mut instances) = setup();
        let el = dom.create_element("div");
        dom.append_child(dom.root(), el);

        let id = instances.alloc_id();
        dom.set_attr(el, ATTR_INSTANCE, id.to_string());
        instances.insert(Instance {
            id,
            name: "modal".to_string(),
            element: el,
            widget: Modal::create(&dom, el, &Config::new()),
            listeners: Vec::new(),
        });

        assert_eq!(instances.lookup(&dom, el), Some(id));

        // A stale attribute naming a destroyed instance resolves to nothing.
        instances.take(id);
        assert_eq!(instances.lookup(&dom, el), None);
    }
}
