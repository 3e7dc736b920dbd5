//! Narrowing of the rows a unit shows

use std::any::Any;
use std::sync::Arc;

use lv_core::{ApplyContext, DataModel, Payload, RowId, SelectionSet, SideEffect, SideEffectKind};

/// Keeps only the targeted rows visible until the filter is cleared.
///
/// This is the one built-in effect that mutates: the narrowed rows persist
/// beyond the event that produced them.
#[derive(Debug, Default)]
pub struct FilterEffect {
    visible: Option<Vec<RowId>>,
}

impl FilterEffect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible rows, or `None` when nothing is filtered
    pub fn visible_rows(&self) -> Option<&[RowId]> {
        self.visible.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.visible.is_some()
    }

    /// `data` restricted to the visible rows
    pub fn visible_model(&self, data: &Arc<dyn DataModel>) -> Arc<dyn DataModel> {
        match &self.visible {
            Some(rows) => data.select(&|row| rows.contains(&row)),
            None => data.clone(),
        }
    }
}

impl SideEffect for FilterEffect {
    fn kind(&self) -> SideEffectKind {
        SideEffectKind::Filter
    }

    fn apply(&mut self, selection: &SelectionSet, payload: &Payload, _ctx: &ApplyContext<'_>) {
        if payload.criteria.is_clear() || selection.merged_enter.model.is_none() {
            self.visible = None;
            return;
        }
        if selection.merged_enter.is_empty() {
            // Nothing related matched; keep the current filter
            return;
        }
        tracing::debug!("Filtering to {} rows", selection.merged_enter.uids.len());
        self.visible = Some(selection.merged_enter.uids.clone());
    }

    fn hide(&mut self, _payload: &Payload) {
        self.visible = None;
    }

    fn remove(&mut self) {
        self.visible = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
