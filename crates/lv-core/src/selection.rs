//! Enter / update / exit partitioning of targeted rows

use std::hash::Hash;
use std::sync::Arc;

use ahash::AHashSet;

use crate::data::{DataModel, RowId};

/// Result of comparing a current key list against a previous one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff<K> {
    /// Keys present now but not before
    pub enter: Vec<K>,
    /// Keys present both now and before
    pub update: Vec<K>,
    /// Keys present before but not now
    pub exit: Vec<K>,
}

impl<K> Default for Diff<K> {
    fn default() -> Self {
        Self { enter: Vec::new(), update: Vec::new(), exit: Vec::new() }
    }
}

/// Compare two key lists. Order follows `current` for enter/update and
/// `previous` for exit; duplicates are dropped.
pub fn diff<K: Hash + Eq + Clone>(current: &[K], previous: &[K]) -> Diff<K> {
    let before: AHashSet<&K> = previous.iter().collect();
    let now: AHashSet<&K> = current.iter().collect();
    let mut seen = AHashSet::new();
    let mut out = Diff::default();

    for key in current {
        if !seen.insert(key) {
            continue;
        }
        if before.contains(key) {
            out.update.push(key.clone());
        } else {
            out.enter.push(key.clone());
        }
    }

    let mut seen = AHashSet::new();
    for key in previous {
        if !now.contains(key) && seen.insert(key) {
            out.exit.push(key.clone());
        }
    }

    out
}

/// Rows of one selection group and the data model restricted to them
#[derive(Debug, Clone, Default)]
pub struct SelectionGroup {
    pub uids: Vec<RowId>,
    pub model: Option<Arc<dyn DataModel>>,
}

impl SelectionGroup {
    fn from_rows(model: &Arc<dyn DataModel>, uids: Vec<RowId>) -> Self {
        let wanted: AHashSet<RowId> = uids.iter().copied().collect();
        let model = model.select(&|row| wanted.contains(&row));
        Self { uids, model: Some(model) }
    }

    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }

    pub fn contains(&self, row: RowId) -> bool {
        self.uids.contains(&row)
    }
}

impl PartialEq for SelectionGroup {
    fn eq(&self, other: &Self) -> bool {
        self.uids == other.uids
    }
}

/// Three disjoint row groups covering every row of a unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    /// Rows targeted now, whether newly or still
    pub merged_enter: SelectionGroup,
    /// Rows the behaviour leaves untouched
    pub update: SelectionGroup,
    /// Rows targeted before but not any more, to be visually cleared
    pub exit: SelectionGroup,
}

/// Builds selection sets against one unit's data model
pub struct SelectionSetBuilder {
    model: Arc<dyn DataModel>,
}

impl SelectionSetBuilder {
    pub fn new(model: Arc<dyn DataModel>) -> Self {
        Self { model }
    }

    /// Partition the unit's rows given the current and previous targets.
    ///
    /// Targets that no longer exist in the model are ignored.
    pub fn build(&self, current: &[RowId], previous: &[RowId]) -> SelectionSet {
        let universe = self.model.uids();
        let valid: AHashSet<RowId> = universe.iter().copied().collect();
        let current: Vec<RowId> = current.iter().copied().filter(|row| valid.contains(row)).collect();
        let previous: Vec<RowId> = previous.iter().copied().filter(|row| valid.contains(row)).collect();

        let changes = diff(&current, &previous);
        let mut seen = AHashSet::new();
        let merged: Vec<RowId> = current.iter().copied().filter(|row| seen.insert(*row)).collect();

        let touched: AHashSet<RowId> = merged.iter().chain(changes.exit.iter()).copied().collect();
        let untouched: Vec<RowId> = universe.into_iter().filter(|row| !touched.contains(row)).collect();

        SelectionSet {
            merged_enter: SelectionGroup::from_rows(&self.model, merged),
            update: SelectionGroup::from_rows(&self.model, untouched),
            exit: SelectionGroup::from_rows(&self.model, changes.exit),
        }
    }
}
