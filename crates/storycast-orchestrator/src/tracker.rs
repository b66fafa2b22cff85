//! Known-item tracking.

use std::collections::HashSet;

use storycast_core::types::{Item, ItemId};

/// Set of item ids already handed to the sink (or suppressed as backlog).
///
/// Lives for the whole process and is never persisted, so a restart forgets
/// everything it has seen.
#[derive(Debug, Default)]
pub struct Tracker {
    known: HashSet<ItemId>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every unknown item as new and remember it.
    ///
    /// Output order matches input order. A duplicate id inside the same batch
    /// is new only on its first occurrence.
    pub fn observe(&mut self, mut items: Vec<Item>) -> Vec<Item> {
        for item in &mut items {
            item.is_new = self.known.insert(item.id.clone());
            tracing::debug!(id = %item.id, new = item.is_new, "classified item");
        }
        items
    }

    /// Forget an id so the next observation classifies it as new again.
    pub fn rollback(&mut self, id: &ItemId) {
        if self.known.remove(id) {
            tracing::debug!(%id, "rolled back item");
        }
    }

    pub fn is_known(&self, id: &ItemId) -> bool {
        self.known.contains(id)
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(ids: &[&str]) -> Vec<Item> {
        ids.iter()
            .map(|id| Item::image(*id, format!("https://cdn.example/{id}.jpg")))
            .collect()
    }

    fn new_ids(items: &[Item]) -> Vec<&str> {
        items.iter().filter(|i| i.is_new).map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_observe_marks_unknown_as_new() {
        let mut tracker = Tracker::new();
        let out = tracker.observe(batch(&["a", "b"]));
        assert_eq!(new_ids(&out), vec!["a", "b"]);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_second_observe_marks_nothing_new() {
        let mut tracker = Tracker::new();
        tracker.observe(batch(&["a", "b", "c"]));
        let out = tracker.observe(batch(&["a", "b", "c"]));
        assert!(new_ids(&out).is_empty());
        assert_eq!(tracker.len(), 3);
    }

    #[test]
    fn test_observe_preserves_order() {
        let mut tracker = Tracker::new();
        tracker.observe(batch(&["b"]));
        let out = tracker.observe(batch(&["c", "b", "a"]));
        let ids: Vec<_> = out.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
        assert_eq!(new_ids(&out), vec!["c", "a"]);
    }

    #[test]
    fn test_duplicate_in_batch_new_once() {
        let mut tracker = Tracker::new();
        let out = tracker.observe(batch(&["a", "a"]));
        assert!(out[0].is_new);
        assert!(!out[1].is_new);
    }

    #[test]
    fn test_rollback_makes_item_new_again() {
        let mut tracker = Tracker::new();
        tracker.observe(batch(&["a"]));
        tracker.rollback(&ItemId::from("a"));
        assert!(!tracker.is_known(&ItemId::from("a")));

        let out = tracker.observe(batch(&["a"]));
        assert_eq!(new_ids(&out), vec!["a"]);
    }

    #[test]
    fn test_rollback_unknown_is_noop() {
        let mut tracker = Tracker::new();
        tracker.observe(batch(&["a"]));
        tracker.rollback(&ItemId::from("zzz"));
        tracker.rollback(&ItemId::from("zzz"));
        assert_eq!(tracker.len(), 1);
        assert!(tracker.is_known(&ItemId::from("a")));
    }

    #[test]
    fn test_incoming_is_new_flag_ignored() {
        let mut tracker = Tracker::new();
        tracker.observe(batch(&["a"]));
        let mut stale = batch(&["a"]);
        stale[0].is_new = true;
        let out = tracker.observe(stale);
        assert!(!out[0].is_new);
    }
}
