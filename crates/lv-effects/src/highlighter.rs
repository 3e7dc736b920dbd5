//! Emphasis of targeted rows

use std::any::Any;

use ahash::AHashSet;
use indexmap::IndexMap;
use lv_core::{ApplyContext, Payload, RowId, SelectionSet, SideEffect, SideEffectKind};

/// Tracks which rows each behaviour emphasizes; every other row of the
/// unit is faded while anything is emphasized
#[derive(Debug, Default)]
pub struct HighlighterEffect {
    highlighted: IndexMap<String, Vec<RowId>>,
    rows: Vec<RowId>,
}

impl HighlighterEffect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows emphasized by one behaviour
    pub fn highlighted_by(&self, action: &str) -> &[RowId] {
        self.highlighted.get(action).map(Vec::as_slice).unwrap_or_default()
    }

    /// Rows emphasized by any behaviour
    pub fn highlighted(&self) -> Vec<RowId> {
        let mut seen = AHashSet::new();
        self.highlighted
            .values()
            .flatten()
            .copied()
            .filter(|row| seen.insert(*row))
            .collect()
    }

    pub fn faded(&self) -> Vec<RowId> {
        let highlighted: AHashSet<RowId> = self.highlighted().into_iter().collect();
        if highlighted.is_empty() {
            return Vec::new();
        }
        self.rows.iter().copied().filter(|row| !highlighted.contains(row)).collect()
    }
}

impl SideEffect for HighlighterEffect {
    fn kind(&self) -> SideEffectKind {
        SideEffectKind::Highlighter
    }

    fn apply(&mut self, selection: &SelectionSet, payload: &Payload, _ctx: &ApplyContext<'_>) {
        if !payload.criteria.is_clear() && selection.merged_enter.is_empty() {
            return;
        }
        self.rows = selection
            .merged_enter
            .uids
            .iter()
            .chain(&selection.update.uids)
            .chain(&selection.exit.uids)
            .copied()
            .collect();
        self.rows.sort_unstable();

        if payload.criteria.is_clear() {
            self.highlighted.shift_remove(&payload.action);
        } else {
            self.highlighted.insert(payload.action.clone(), selection.merged_enter.uids.clone());
        }
    }

    fn hide(&mut self, payload: &Payload) {
        self.highlighted.shift_remove(&payload.action);
    }

    fn remove(&mut self) {
        self.highlighted.clear();
        self.rows.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::unit;
    use lv_core::{Criteria, EffectOptions, PropagationInfo, SelectionSetBuilder, UnitContext};

    fn apply(effect: &mut HighlighterEffect, unit: &UnitContext, action: &str, criteria: Criteria) {
        let rows = criteria.rows_in(&*unit.data);
        let previous = effect.highlighted_by(action).to_vec();
        let selection = SelectionSetBuilder::new(unit.data.clone()).build(&rows, &previous);
        let payload = Payload::new(action, criteria);
        let propagation = PropagationInfo::new(payload.clone(), unit.id);
        let options = EffectOptions::default();
        let ctx = ApplyContext { unit, propagation: &propagation, options: &options };
        effect.apply(&selection, &payload, &ctx);
    }

    #[test]
    fn test_highlight_fades_other_rows() {
        let unit = unit("a");
        let mut effect = HighlighterEffect::new();
        apply(&mut effect, &unit, "highlight", Criteria::Rows(vec![2]));

        assert_eq!(effect.highlighted(), vec![2]);
        assert_eq!(effect.faded(), vec![0, 1, 3]);
    }

    #[test]
    fn test_behaviours_are_tracked_separately() {
        let unit = unit("a");
        let mut effect = HighlighterEffect::new();
        apply(&mut effect, &unit, "select", Criteria::Rows(vec![0]));
        apply(&mut effect, &unit, "highlight", Criteria::Rows(vec![1]));
        apply(&mut effect, &unit, "highlight", Criteria::Clear);

        assert_eq!(effect.highlighted(), vec![0]);
        assert!(effect.highlighted_by("highlight").is_empty());
    }

    #[test]
    fn test_empty_match_keeps_highlight() {
        let unit = unit("a");
        let mut effect = HighlighterEffect::new();
        apply(&mut effect, &unit, "highlight", Criteria::Rows(vec![1]));
        apply(&mut effect, &unit, "highlight", Criteria::Rows(vec![42]));

        assert_eq!(effect.highlighted(), vec![1]);
    }

    #[test]
    fn test_nothing_faded_without_highlight() {
        let unit = unit("a");
        let mut effect = HighlighterEffect::new();
        apply(&mut effect, &unit, "highlight", Criteria::Rows(vec![3]));
        apply(&mut effect, &unit, "highlight", Criteria::Clear);

        assert!(effect.faded().is_empty());
    }
}
