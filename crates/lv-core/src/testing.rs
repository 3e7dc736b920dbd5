//! Fixtures shared by the unit tests of this crate

use std::any::Any;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::json;

use crate::data::{CellValue, DataModel, FieldDef, FieldsConfig, RowId};
use crate::payload::{Criteria, Payload};
use crate::selection::SelectionSet;
use crate::side_effect::{ApplyContext, SideEffect, SideEffectKind};

#[derive(Debug, Clone)]
pub struct MemoryModel {
    fields: Vec<FieldDef>,
    rows: Vec<(RowId, Vec<CellValue>)>,
}

impl MemoryModel {
    pub fn new(fields: Vec<FieldDef>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            fields,
            rows: rows.into_iter().enumerate().collect(),
        }
    }
}

impl DataModel for MemoryModel {
    fn uids(&self) -> Vec<RowId> {
        self.rows.iter().map(|(id, _)| *id).collect()
    }

    fn fields_config(&self) -> FieldsConfig {
        self.fields.iter().map(|def| (def.name.clone(), def.clone())).collect::<IndexMap<_, _>>()
    }

    fn value(&self, row: RowId, field: &str) -> Option<CellValue> {
        let col = self.fields.iter().position(|def| def.name == field)?;
        self.rows
            .iter()
            .find(|(id, _)| *id == row)
            .and_then(|(_, values)| values.get(col).cloned())
    }

    fn select(&self, predicate: &dyn Fn(RowId) -> bool) -> Arc<dyn DataModel> {
        Arc::new(Self {
            fields: self.fields.clone(),
            rows: self.rows.iter().filter(|(id, _)| predicate(*id)).cloned().collect(),
        })
    }
}

pub fn cars() -> Arc<dyn DataModel> {
    Arc::new(MemoryModel::new(
        vec![
            FieldDef::dimension("Origin"),
            FieldDef::dimension("Year"),
            FieldDef::measure("Horsepower"),
        ],
        vec![
            vec![json!("USA"), json!("1970"), json!(130)],
            vec![json!("USA"), json!("1971"), json!(165)],
            vec![json!("Japan"), json!("1970"), json!(95)],
            vec![json!("Europe"), json!("1972"), json!(90)],
        ],
    ))
}

/// Side effect that records what it was asked to do
#[derive(Debug)]
pub struct RecordingEffect {
    pub name: String,
    pub kind: SideEffectKind,
    pub applied: Vec<Vec<RowId>>,
    pub hidden: usize,
    pub removed: bool,
}

impl RecordingEffect {
    pub fn new(name: &str, kind: SideEffectKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            applied: Vec::new(),
            hidden: 0,
            removed: false,
        }
    }
}

impl SideEffect for RecordingEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SideEffectKind {
        self.kind
    }

    fn apply(&mut self, selection: &SelectionSet, payload: &Payload, _ctx: &ApplyContext<'_>) {
        if payload.criteria == Criteria::Clear {
            self.hidden += 1;
        }
        self.applied.push(selection.merged_enter.uids.clone());
    }

    fn hide(&mut self, _payload: &Payload) {
        self.hidden += 1;
    }

    fn remove(&mut self) {
        self.removed = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
