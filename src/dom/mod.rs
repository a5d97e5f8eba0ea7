//! Element tree - the retained document widgets operate on.
//!
//! An arena-backed tree of elements carrying a tag, a class list, an
//! attribute map, a behavior flag bitset, and optional host-measured bounds.
//! Widgets never touch nodes directly; everything goes through [`Document`]
//! methods keyed by [`ElementId`].
//!
//! Conventions:
//! - Slots are recycled through a free pool; every occupant gets a fresh
//!   serial so stale handles can be detected with [`Document::serial`].
//! - Mutations on dead or recycled handles are silent no-ops (the runtime
//!   treats DOM absence as skippable, not fatal).
//! - Class and attribute writes are last-write-wins.

use std::collections::BTreeMap;

use crate::types::{ElementFlags, ElementId, Rect};

// =============================================================================
// Element
// =============================================================================

#[derive(Debug)]
struct Element {
    serial: u64,
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    flags: ElementFlags,
    text: String,
    bounds: Option<Rect>,
}

impl Element {
    fn new(serial: u64, tag: &str) -> Self {
        Self {
            serial,
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            flags: ElementFlags::NONE,
            text: String::new(),
            bounds: None,
        }
    }
}

// =============================================================================
// Document
// =============================================================================

/// The element tree plus the active-element (focus) slot.
///
/// One `Document` belongs to one [`crate::Toolkit`]; tests may also use it
/// standalone.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Option<Element>>,
    free: Vec<usize>,
    next_serial: u64,
    root: ElementId,
    active: Option<ElementId>,
}

impl Document {
    /// Create a document with a single root element (tag `body`).
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            next_serial: 0,
            root: ElementId(0),
            active: None,
        };
        doc.root = doc.create_element("body");
        doc
    }

    /// The root element. Always attached.
    pub fn root(&self) -> ElementId {
        self.root
    }

    fn get(&self, el: ElementId) -> Option<&Element> {
        self.nodes.get(el.index()).and_then(|slot| slot.as_ref())
    }

    fn get_mut(&mut self, el: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(el.index()).and_then(|slot| slot.as_mut())
    }

    /// Whether the handle refers to a live slot (attached or not).
    pub fn is_alive(&self, el: ElementId) -> bool {
        self.get(el).is_some()
    }

    /// Creation serial of the current occupant of the slot, if any.
    ///
    /// Store `(ElementId, serial)` pairs to detect slot recycling later.
    pub fn serial(&self, el: ElementId) -> Option<u64> {
        self.get(el).map(|e| e.serial)
    }

    // =========================================================================
    // Tree Construction
    // =========================================================================

    /// Allocate a detached element. Reuses a freed slot when available.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let serial = self.next_serial;
        self.next_serial += 1;
        let element = Element::new(serial, tag);
        match self.free.pop() {
            Some(index) => {
                self.nodes[index] = Some(element);
                ElementId(index)
            }
            None => {
                self.nodes.push(Some(element));
                ElementId(self.nodes.len() - 1)
            }
        }
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Re-appending moves the child (it is detached from its old parent
    /// first). Appending an element to itself, into its own subtree, or to
    /// a dead parent is a no-op; the tree stays acyclic.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        if self.contains(child, parent) {
            return;
        }
        self.unlink(child);
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn unlink(&mut self, el: ElementId) {
        let parent = self.get(el).and_then(|e| e.parent);
        if let Some(parent) = parent {
            if let Some(node) = self.get_mut(parent) {
                node.children.retain(|&c| c != el);
            }
        }
        if let Some(node) = self.get_mut(el) {
            node.parent = None;
        }
    }

    /// Remove an element and its whole subtree, returning slots to the pool.
    ///
    /// Clears the active element if it was inside the removed subtree.
    /// Removing the root or a dead handle is a no-op.
    pub fn remove(&mut self, el: ElementId) {
        if el == self.root || self.get(el).is_none() {
            return;
        }
        if let Some(active) = self.active {
            if self.contains(el, active) {
                self.active = None;
            }
        }
        self.unlink(el);
        self.release(el);
    }

    fn release(&mut self, el: ElementId) {
        let children = match self.get(el) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            self.release(child);
        }
        self.nodes[el.index()] = None;
        self.free.push(el.index());
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn tag(&self, el: ElementId) -> Option<&str> {
        self.get(el).map(|e| e.tag.as_str())
    }

    pub fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.get(el).and_then(|e| e.parent)
    }

    pub fn children(&self, el: ElementId) -> &[ElementId] {
        self.get(el).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    /// Whether `el` is reachable from the root.
    pub fn is_attached(&self, el: ElementId) -> bool {
        let mut current = el;
        loop {
            if current == self.root {
                return self.get(el).is_some();
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Whether `el` is `ancestor` or inside its subtree.
    pub fn contains(&self, ancestor: ElementId, el: ElementId) -> bool {
        let mut current = Some(el);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Nearest ancestor (including `el` itself) carrying `attr`.
    pub fn closest(&self, el: ElementId, attr: &str) -> Option<ElementId> {
        let mut current = Some(el);
        while let Some(node) = current {
            if self.attr(node, attr).is_some() {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Subtree of `root` (excluding `root`) in stable depth-first order.
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect_descendants(root, &mut out);
        out
    }

    fn collect_descendants(&self, el: ElementId, out: &mut Vec<ElementId>) {
        for &child in self.children(el) {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Focusable descendants of `root` in DOM order.
    ///
    /// "Focusable" = carries [`ElementFlags::FOCUSABLE`] and is neither
    /// tab-excluded nor disabled.
    pub fn focusables_within(&self, root: ElementId) -> Vec<ElementId> {
        self.descendants(root)
            .into_iter()
            .filter(|&el| {
                let flags = self.flags(el);
                flags.contains(ElementFlags::FOCUSABLE)
                    && !flags.contains(ElementFlags::TAB_EXCLUDED)
                    && !flags.contains(ElementFlags::DISABLED)
            })
            .collect()
    }

    /// First attached element whose `id` attribute matches.
    ///
    /// Accepts a bare id or a `#id` selector.
    pub fn element_by_id(&self, selector: &str) -> Option<ElementId> {
        let wanted = selector.strip_prefix('#').unwrap_or(selector);
        self.descendants(self.root)
            .into_iter()
            .find(|&el| self.attr(el, "id") == Some(wanted))
    }

    /// First descendant of `root` carrying `class`, in DOM order.
    pub fn descendant_with_class(&self, root: ElementId, class: &str) -> Option<ElementId> {
        self.descendants(root)
            .into_iter()
            .find(|&el| self.has_class(el, class))
    }

    /// Direct children of `parent` carrying `class`.
    pub fn children_with_class(&self, parent: ElementId, class: &str) -> Vec<ElementId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|&el| self.has_class(el, class))
            .collect()
    }

    // =========================================================================
    // Classes
    // =========================================================================

    pub fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.get(el)
            .map(|e| e.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, el: ElementId, class: &str) {
        if self.has_class(el, class) {
            return;
        }
        if let Some(node) = self.get_mut(el) {
            node.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(node) = self.get_mut(el) {
            node.classes.retain(|c| c != class);
        }
    }

    /// Toggle `class`; returns whether it is present afterwards.
    pub fn toggle_class(&mut self, el: ElementId, class: &str) -> bool {
        if self.has_class(el, class) {
            self.remove_class(el, class);
            false
        } else {
            self.add_class(el, class);
            self.has_class(el, class)
        }
    }

    pub fn classes(&self, el: ElementId) -> Vec<String> {
        self.get(el).map(|e| e.classes.clone()).unwrap_or_default()
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn attr(&self, el: ElementId, name: &str) -> Option<&str> {
        self.get(el).and_then(|e| e.attributes.get(name)).map(String::as_str)
    }

    pub fn set_attr(&mut self, el: ElementId, name: &str, value: impl Into<String>) {
        if let Some(node) = self.get_mut(el) {
            node.attributes.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attr(&mut self, el: ElementId, name: &str) {
        if let Some(node) = self.get_mut(el) {
            node.attributes.remove(name);
        }
    }

    // =========================================================================
    // Flags, Text, Bounds
    // =========================================================================

    pub fn flags(&self, el: ElementId) -> ElementFlags {
        self.get(el).map(|e| e.flags).unwrap_or(ElementFlags::NONE)
    }

    pub fn set_flags(&mut self, el: ElementId, flags: ElementFlags) {
        if let Some(node) = self.get_mut(el) {
            node.flags = flags;
        }
    }

    pub fn insert_flags(&mut self, el: ElementId, flags: ElementFlags) {
        if let Some(node) = self.get_mut(el) {
            node.flags |= flags;
        }
    }

    pub fn text(&self, el: ElementId) -> &str {
        self.get(el).map(|e| e.text.as_str()).unwrap_or("")
    }

    pub fn set_text(&mut self, el: ElementId, text: impl Into<String>) {
        if let Some(node) = self.get_mut(el) {
            node.text = text.into();
        }
    }

    /// Host-measured bounds, when the host has provided them.
    pub fn bounds(&self, el: ElementId) -> Option<Rect> {
        self.get(el).and_then(|e| e.bounds)
    }

    pub fn set_bounds(&mut self, el: ElementId, bounds: Rect) {
        if let Some(node) = self.get_mut(el) {
            node.bounds = Some(bounds);
        }
    }

    // =========================================================================
    // Active Element
    // =========================================================================

    /// The element currently holding focus.
    pub fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    /// Low-level focus write. [`crate::state::focus::FocusState`] is the
    /// validated path; this only checks liveness and attachment.
    pub fn set_active(&mut self, el: Option<ElementId>) -> bool {
        match el {
            Some(el) => {
                if self.is_attached(el) {
                    self.active = Some(el);
                    true
                } else {
                    false
                }
            }
            None => {
                self.active = None;
                true
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Document {
        Document::new()
    }

    #[test]
    fn test_tree_construction() {
        let mut dom = setup();
        let div = dom.create_element("div");
        let button = dom.create_element("button");
        assert!(!dom.is_attached(div));

        dom.append_child(dom.root(), div);
        dom.append_child(div, button);

        assert!(dom.is_attached(button));
        assert_eq!(dom.parent(button), Some(div));
        assert_eq!(dom.children(div), &[button]);
        assert_eq!(dom.tag(button), Some("button"));
    }

    #[test]
    fn test_closest_includes_self() {
        let mut dom = setup();
        let outer = dom.create_element("div");
        let inner = dom.create_element("span");
        dom.append_child(dom.root(), outer);
        dom.append_child(outer, inner);
        dom.set_attr(outer, "data-fz-component", "modal");

        assert_eq!(dom.closest(inner, "data-fz-component"), Some(outer));
        assert_eq!(dom.closest(outer, "data-fz-component"), Some(outer));
        assert_eq!(dom.closest(inner, "data-missing"), None);
    }

    #[test]
    fn test_append_into_own_subtree_is_rejected() {
        let mut dom = setup();
        let outer = dom.create_element("div");
        let inner = dom.create_element("div");
        dom.append_child(dom.root(), outer);
        dom.append_child(outer, inner);

        // An ancestor cannot become a descendant of its own subtree.
        dom.append_child(inner, outer);
        assert_eq!(dom.parent(outer), Some(dom.root()));
        assert_eq!(dom.children(inner), &[]);
        // Ancestor walks still terminate.
        assert!(dom.is_attached(inner));
        assert!(dom.contains(outer, inner));
        assert!(!dom.contains(inner, outer));
    }

    #[test]
    fn test_remove_recycles_and_bumps_serial() {
        let mut dom = setup();
        let el = dom.create_element("div");
        dom.append_child(dom.root(), el);
        let old_serial = dom.serial(el).unwrap();

        dom.remove(el);
        assert!(!dom.is_alive(el));

        // The freed slot is reused with a fresh serial.
        let replacement = dom.create_element("div");
        assert_eq!(replacement, el);
        assert_ne!(dom.serial(replacement), Some(old_serial));
    }

    #[test]
    fn test_remove_subtree_clears_active() {
        let mut dom = setup();
        let wrap = dom.create_element("div");
        let button = dom.create_element("button");
        dom.append_child(dom.root(), wrap);
        dom.append_child(wrap, button);
        dom.insert_flags(button, ElementFlags::FOCUSABLE);
        assert!(dom.set_active(Some(button)));

        dom.remove(wrap);
        assert_eq!(dom.active_element(), None);
        assert!(!dom.is_alive(button));
    }

    #[test]
    fn test_focusables_dom_order_and_exclusions() {
        let mut dom = setup();
        let modal = dom.create_element("div");
        dom.append_child(dom.root(), modal);

        let a = dom.create_element("button");
        let group = dom.create_element("div");
        let b = dom.create_element("input");
        let skipped = dom.create_element("button");
        let disabled = dom.create_element("button");
        let c = dom.create_element("a");

        dom.append_child(modal, a);
        dom.append_child(modal, group);
        dom.append_child(group, b);
        dom.append_child(group, skipped);
        dom.append_child(modal, disabled);
        dom.append_child(modal, c);

        for el in [a, b, skipped, disabled, c] {
            dom.insert_flags(el, ElementFlags::FOCUSABLE);
        }
        dom.insert_flags(skipped, ElementFlags::TAB_EXCLUDED);
        dom.insert_flags(disabled, ElementFlags::DISABLED);

        assert_eq!(dom.focusables_within(modal), vec![a, b, c]);
    }

    #[test]
    fn test_classes_last_write_wins() {
        let mut dom = setup();
        let el = dom.create_element("div");
        dom.append_child(dom.root(), el);

        dom.add_class(el, "show");
        dom.add_class(el, "show");
        assert_eq!(dom.classes(el), vec!["show"]);

        assert!(!dom.toggle_class(el, "show"));
        assert!(dom.toggle_class(el, "show"));

        dom.set_attr(el, "aria-hidden", "true");
        dom.set_attr(el, "aria-hidden", "false");
        assert_eq!(dom.attr(el, "aria-hidden"), Some("false"));
    }

    #[test]
    fn test_element_by_id_selector_forms() {
        let mut dom = setup();
        let el = dom.create_element("div");
        dom.append_child(dom.root(), el);
        dom.set_attr(el, "id", "login-modal");

        assert_eq!(dom.element_by_id("login-modal"), Some(el));
        assert_eq!(dom.element_by_id("#login-modal"), Some(el));
        assert_eq!(dom.element_by_id("#other"), None);

        // Detached elements are not query results.
        let orphan = dom.create_element("div");
        dom.set_attr(orphan, "id", "orphan");
        assert_eq!(dom.element_by_id("orphan"), None);
    }

    #[test]
    fn test_dead_handle_mutations_are_noops() {
        let mut dom = setup();
        let el = dom.create_element("div");
        dom.append_child(dom.root(), el);
        dom.remove(el);

        dom.add_class(el, "show");
        dom.set_attr(el, "id", "x");
        assert!(!dom.has_class(el, "show"));
        assert_eq!(dom.attr(el, "id"), None);
        assert!(!dom.set_active(Some(el)));
    }
}
