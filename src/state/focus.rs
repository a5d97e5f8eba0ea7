//! Focus engine - keyboard navigation and focus state.
//!
//! Validated focus moves over the document's active-element slot:
//! - Focus cycling (first/last/next/previous with wrap-around)
//! - Focus trapping for overlay widgets (stack of containers)
//! - Focus history for restoration, with stale-entry skipping
//!
//! Cycling scope is the innermost trap container when a trap is active,
//! the root otherwise.

use crate::dom::Document;
use crate::types::{ElementFlags, ElementId};

const MAX_HISTORY: usize = 10;

#[derive(Clone, Copy, Debug)]
struct HistoryEntry {
    element: ElementId,
    serial: u64,
}

/// Focus state owned by the toolkit context.
#[derive(Debug, Default)]
pub struct FocusState {
    history: Vec<HistoryEntry>,
    traps: Vec<ElementId>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Focus / Blur
    // =========================================================================

    /// Move focus to `el` if it is attached and focusable.
    ///
    /// Programmatic focus ignores tab exclusion (like `tabindex="-1"`), but
    /// never lands on disabled elements. Saves the previous active element
    /// to history when focus actually moves.
    pub fn focus(&mut self, dom: &mut Document, el: ElementId) -> bool {
        let flags = dom.flags(el);
        if !flags.contains(ElementFlags::FOCUSABLE) || flags.contains(ElementFlags::DISABLED) {
            return false;
        }
        if !dom.is_attached(el) {
            return false;
        }
        if dom.active_element() == Some(el) {
            return true;
        }
        self.save_to_history(dom);
        dom.set_active(Some(el))
    }

    /// Clear focus, saving the previous active element to history.
    pub fn blur(&mut self, dom: &mut Document) {
        if dom.active_element().is_some() {
            self.save_to_history(dom);
            dom.set_active(None);
        }
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Save the current active element to the bounded history stack.
    pub fn save_to_history(&mut self, dom: &Document) {
        let Some(active) = dom.active_element() else {
            return;
        };
        let Some(serial) = dom.serial(active) else {
            return;
        };
        self.history.push(HistoryEntry { element: active, serial });
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
    }

    /// Restore the most recent still-valid history entry.
    ///
    /// Entries whose slot was recycled, or whose element is no longer
    /// attached and focusable, are skipped silently.
    pub fn restore_from_history(&mut self, dom: &mut Document) -> bool {
        while let Some(entry) = self.history.pop() {
            if dom.serial(entry.element) != Some(entry.serial) {
                continue;
            }
            let flags = dom.flags(entry.element);
            if !flags.contains(ElementFlags::FOCUSABLE) || flags.contains(ElementFlags::DISABLED) {
                continue;
            }
            if !dom.is_attached(entry.element) {
                continue;
            }
            dom.set_active(Some(entry.element));
            return true;
        }
        false
    }

    // =========================================================================
    // Focus Trap
    // =========================================================================

    /// Constrain focus cycling to `container`'s subtree.
    pub fn push_trap(&mut self, container: ElementId) {
        self.traps.push(container);
    }

    pub fn pop_trap(&mut self) -> Option<ElementId> {
        self.traps.pop()
    }

    /// Remove a specific container from the trap stack, wherever it sits.
    pub fn remove_trap(&mut self, container: ElementId) {
        self.traps.retain(|&c| c != container);
    }

    pub fn is_trapped(&self) -> bool {
        !self.traps.is_empty()
    }

    pub fn current_trap(&self) -> Option<ElementId> {
        self.traps.last().copied()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    fn scope(&self, dom: &Document) -> ElementId {
        self.current_trap().unwrap_or_else(|| dom.root())
    }

    fn find_adjacent(&self, dom: &Document, direction: i32) -> Option<ElementId> {
        let focusables = dom.focusables_within(self.scope(dom));
        if focusables.is_empty() {
            return None;
        }
        let current = dom
            .active_element()
            .and_then(|active| focusables.iter().position(|&el| el == active));
        let next = match current {
            None => {
                if direction > 0 {
                    0
                } else {
                    focusables.len() - 1
                }
            }
            Some(pos) => {
                let len = focusables.len() as i32;
                (((pos as i32 + direction) % len + len) % len) as usize
            }
        };
        Some(focusables[next])
    }

    /// Focus the next tab-order element in scope, wrapping at the end.
    pub fn focus_next(&mut self, dom: &mut Document) -> bool {
        match self.find_adjacent(dom, 1) {
            Some(el) => self.focus(dom, el),
            None => false,
        }
    }

    /// Focus the previous tab-order element in scope, wrapping at the start.
    pub fn focus_previous(&mut self, dom: &mut Document) -> bool {
        match self.find_adjacent(dom, -1) {
            Some(el) => self.focus(dom, el),
            None => false,
        }
    }

    /// Focus the first tab-order element in scope.
    pub fn focus_first(&mut self, dom: &mut Document) -> bool {
        let first = dom.focusables_within(self.scope(dom)).first().copied();
        match first {
            Some(el) => self.focus(dom, el),
            None => false,
        }
    }

    /// Focus the last tab-order element in scope.
    pub fn focus_last(&mut self, dom: &mut Document) -> bool {
        let last = dom.focusables_within(self.scope(dom)).last().copied();
        match last {
            Some(el) => self.focus(dom, el),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Document, FocusState) {
        (Document::new(), FocusState::new())
    }

    fn focusable(dom: &mut Document, parent: ElementId) -> ElementId {
        let el = dom.create_element("button");
        dom.append_child(parent, el);
        dom.insert_flags(el, ElementFlags::FOCUSABLE);
        el
    }

    #[test]
    fn test_focus_requires_focusable() {
        let (mut dom, mut focus) = setup();
        let plain = dom.create_element("div");
        dom.append_child(dom.root(), plain);

        assert!(!focus.focus(&mut dom, plain));
        assert_eq!(dom.active_element(), None);

        let root = dom.root();
        let button = focusable(&mut dom, root);
        assert!(focus.focus(&mut dom, button));
        assert_eq!(dom.active_element(), Some(button));
    }

    #[test]
    fn test_disabled_rejected_tab_excluded_allowed() {
        let (mut dom, mut focus) = setup();
        let root = dom.root();
        let a = focusable(&mut dom, root);
        dom.insert_flags(a, ElementFlags::DISABLED);
        assert!(!focus.focus(&mut dom, a));

        let b = focusable(&mut dom, root);
        dom.insert_flags(b, ElementFlags::TAB_EXCLUDED);
        assert!(focus.focus(&mut dom, b));
    }

    #[test]
    fn test_cycle_with_wrap() {
        let (mut dom, mut focus) = setup();
        let root = dom.root();
        let a = focusable(&mut dom, root);
        let b = focusable(&mut dom, root);
        let c = focusable(&mut dom, root);

        assert!(focus.focus_first(&mut dom));
        assert_eq!(dom.active_element(), Some(a));

        focus.focus_next(&mut dom);
        assert_eq!(dom.active_element(), Some(b));
        focus.focus_next(&mut dom);
        assert_eq!(dom.active_element(), Some(c));
        focus.focus_next(&mut dom);
        assert_eq!(dom.active_element(), Some(a));

        focus.focus_previous(&mut dom);
        assert_eq!(dom.active_element(), Some(c));
    }

    #[test]
    fn test_trap_scopes_cycling() {
        let (mut dom, mut focus) = setup();
        let root = dom.root();
        let outside = focusable(&mut dom, root);
        let dialog = dom.create_element("div");
        dom.append_child(root, dialog);
        let inner_a = focusable(&mut dom, dialog);
        let inner_b = focusable(&mut dom, dialog);

        focus.push_trap(dialog);
        assert!(focus.focus_first(&mut dom));
        assert_eq!(dom.active_element(), Some(inner_a));

        focus.focus_next(&mut dom);
        assert_eq!(dom.active_element(), Some(inner_b));
        // Wraps inside the trap; never reaches `outside`.
        focus.focus_next(&mut dom);
        assert_eq!(dom.active_element(), Some(inner_a));

        focus.pop_trap();
        focus.focus_first(&mut dom);
        assert_eq!(dom.active_element(), Some(outside));
    }

    #[test]
    fn test_history_restore_skips_stale_entries() {
        let (mut dom, mut focus) = setup();
        let root = dom.root();
        let a = focusable(&mut dom, root);
        let b = focusable(&mut dom, root);

        focus.focus(&mut dom, a);
        focus.focus(&mut dom, b); // history: [a]
        focus.blur(&mut dom); // history: [a, b]

        // Remove b; restoring should fall through to a.
        dom.remove(b);
        assert!(focus.restore_from_history(&mut dom));
        assert_eq!(dom.active_element(), Some(a));
    }

    #[test]
    fn test_history_rejects_recycled_slot() {
        let (mut dom, mut focus) = setup();
        let root = dom.root();
        let a = focusable(&mut dom, root);
        focus.focus(&mut dom, a);
        focus.blur(&mut dom); // history: [a]

        dom.remove(a);
        // Slot is recycled by a different (focusable) element.
        let imposter = focusable(&mut dom, root);
        assert_eq!(imposter, a);

        // Serial mismatch: the entry is skipped, nothing is restored.
        assert!(!focus.restore_from_history(&mut dom));
        assert_eq!(dom.active_element(), None);
    }
}
