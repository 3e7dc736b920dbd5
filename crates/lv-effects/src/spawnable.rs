//! Lifecycle of side effects that own overlay elements
//!
//! Every overlay is tracked under a key in an [`OverlayArena`]. An overlay is
//! spawned the first time its key is requested, applied once positioned with
//! content, hidden when suppressed, and removed (and evicted) once it has
//! nothing left to show.

use std::hash::Hash;

use ahash::AHashSet;
use indexmap::IndexMap;
use lv_core::{diff, Diff};

/// Lifecycle phase of a single overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecyclePhase {
    #[default]
    Uninitialized,
    /// Created, not yet mounted
    Spawned,
    /// Mounted with current content
    Applied,
    /// Retained but visually suppressed
    Hidden,
    /// Detached; the key may be spawned again
    Removed,
}

/// Content holder managed by an arena
pub trait Overlay {
    /// Drop the content shown for one action
    fn clear_content(&mut self, action: &str);

    fn has_content(&self) -> bool;
}

struct Slot<O> {
    phase: LifecyclePhase,
    overlay: O,
}

/// Keyed overlays of one side effect, in spawn order
pub struct OverlayArena<K, O> {
    slots: IndexMap<K, Slot<O>>,
    /// Keys evicted since they were last spawned
    removed: AHashSet<K>,
}

impl<K, O> Default for OverlayArena<K, O> {
    fn default() -> Self {
        Self {
            slots: IndexMap::new(),
            removed: AHashSet::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, O: Overlay> OverlayArena<K, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    pub fn keys(&self) -> Vec<K> {
        self.slots.keys().cloned().collect()
    }

    pub fn get(&self, key: &K) -> Option<&O> {
        self.slots.get(key).map(|slot| &slot.overlay)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut O> {
        self.slots.get_mut(key).map(|slot| &mut slot.overlay)
    }

    /// Phase of the overlay under `key`
    pub fn phase(&self, key: &K) -> LifecyclePhase {
        match self.slots.get(key) {
            Some(slot) => slot.phase,
            None if self.removed.contains(key) => LifecyclePhase::Removed,
            None => LifecyclePhase::Uninitialized,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, LifecyclePhase, &O)> {
        self.slots.iter().map(|(key, slot)| (key, slot.phase, &slot.overlay))
    }

    /// Keys currently in the given phase
    pub fn keys_in(&self, phase: LifecyclePhase) -> Vec<K> {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.phase == phase)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Existing overlay for `key`, or a freshly spawned one
    pub fn spawn_or_get(&mut self, key: K, spawn: impl FnOnce() -> O) -> &mut O {
        self.removed.remove(&key);
        let slot = self.slots.entry(key).or_insert_with(|| Slot {
            phase: LifecyclePhase::Spawned,
            overlay: spawn(),
        });
        &mut slot.overlay
    }

    /// Compare the keys wanted now against the tracked ones: `enter` keys
    /// are to be created, `update` kept, `exit` retired
    pub fn reconcile(&self, current: &[K]) -> Diff<K> {
        diff(current, &self.keys())
    }

    pub fn mark_applied(&mut self, key: &K) {
        self.set_phase(key, LifecyclePhase::Applied);
    }

    pub fn hide(&mut self, key: &K) {
        self.set_phase(key, LifecyclePhase::Hidden);
    }

    fn set_phase(&mut self, key: &K, phase: LifecyclePhase) {
        if let Some(slot) = self.slots.get_mut(key) {
            slot.phase = phase;
        }
    }

    /// Clear `action` content of every overlay and hide them all
    pub fn hide_all(&mut self, action: &str) {
        for slot in self.slots.values_mut() {
            slot.overlay.clear_content(action);
            slot.phase = LifecyclePhase::Hidden;
        }
    }

    /// Clear `action` content of the given overlays and evict those left
    /// without content. Returns the evicted keys.
    pub fn retire(&mut self, keys: &[K], action: &str) -> Vec<K> {
        let mut evicted = Vec::new();
        for key in keys {
            let Some(slot) = self.slots.get_mut(key) else {
                continue;
            };
            slot.overlay.clear_content(action);
            if !slot.overlay.has_content() {
                self.slots.shift_remove(key);
                self.removed.insert(key.clone());
                evicted.push(key.clone());
            }
        }
        evicted
    }

    /// Detach every overlay
    pub fn remove_all(&mut self) {
        self.removed.extend(self.slots.drain(..).map(|(key, _)| key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Label {
        actions: AHashSet<String>,
    }

    impl Overlay for Label {
        fn clear_content(&mut self, action: &str) {
            self.actions.remove(action);
        }

        fn has_content(&self) -> bool {
            !self.actions.is_empty()
        }
    }

    fn label(actions: &[&str]) -> Label {
        Label { actions: actions.iter().map(|a| a.to_string()).collect() }
    }

    #[test]
    fn test_spawn_then_reuse() {
        let mut arena: OverlayArena<u32, Label> = OverlayArena::new();
        assert_eq!(arena.phase(&1), LifecyclePhase::Uninitialized);

        arena.spawn_or_get(1, || label(&["highlight"]));
        assert_eq!(arena.phase(&1), LifecyclePhase::Spawned);

        arena.mark_applied(&1);
        arena.spawn_or_get(1, || label(&[])).actions.insert("brush".into());

        assert_eq!(arena.phase(&1), LifecyclePhase::Applied);
        assert_eq!(arena.get(&1).unwrap().actions.len(), 2);
    }

    #[test]
    fn test_reconcile_splits_keys() {
        let mut arena: OverlayArena<u32, Label> = OverlayArena::new();
        arena.spawn_or_get(1, Label::default);
        arena.spawn_or_get(2, Label::default);

        let changes = arena.reconcile(&[2, 3]);
        assert_eq!(changes.enter, vec![3]);
        assert_eq!(changes.update, vec![2]);
        assert_eq!(changes.exit, vec![1]);
    }

    #[test]
    fn test_retire_evicts_only_empty_overlays() {
        let mut arena: OverlayArena<u32, Label> = OverlayArena::new();
        arena.spawn_or_get(1, || label(&["highlight"]));
        arena.spawn_or_get(2, || label(&["highlight", "brush"]));

        let evicted = arena.retire(&[1, 2], "highlight");

        assert_eq!(evicted, vec![1]);
        assert!(!arena.contains(&1));
        assert_eq!(arena.phase(&1), LifecyclePhase::Removed);
        assert!(arena.contains(&2));
    }

    #[test]
    fn test_removed_key_can_respawn() {
        let mut arena: OverlayArena<u32, Label> = OverlayArena::new();
        arena.spawn_or_get(1, || label(&["highlight"]));
        arena.remove_all();
        assert_eq!(arena.phase(&1), LifecyclePhase::Removed);

        arena.spawn_or_get(1, Label::default);
        assert_eq!(arena.phase(&1), LifecyclePhase::Spawned);
    }

    #[test]
    fn test_hide_all_keeps_overlays() {
        let mut arena: OverlayArena<u32, Label> = OverlayArena::new();
        arena.spawn_or_get(1, || label(&["highlight"]));
        arena.mark_applied(&1);

        arena.hide_all("highlight");

        assert_eq!(arena.len(), 1);
        assert_eq!(arena.keys_in(LifecyclePhase::Hidden), vec![1]);
        assert!(!arena.get(&1).unwrap().has_content());
    }
}
