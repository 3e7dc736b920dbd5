//! Behaviour payloads and the table of payload constructors

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::behaviours;
use crate::data::{as_number, DataModel, IdentifierTable, RowId};
use crate::geometry::Point;
use crate::propagation::PropagationValue;
use crate::side_effect::SideEffectEntry;
use crate::unit::{UnitContext, UnitId};

/// Which rows a behaviour currently targets
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Criteria {
    /// Leave the current targets as they are
    #[default]
    Unchanged,
    /// Release every target of the behaviour
    Clear,
    /// Rows of the dispatching unit's own data
    Rows(Vec<RowId>),
    /// Identifier tuples, matched on shared fields
    Identifiers(IdentifierTable),
    /// Inclusive numeric range per field
    Range(IndexMap<String, (f64, f64)>),
}

impl Criteria {
    pub fn is_clear(&self) -> bool {
        matches!(self, Criteria::Clear)
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Criteria::Unchanged)
    }

    /// Whether the criteria names targets, as opposed to clearing or
    /// leaving them alone
    pub fn has_targets(&self) -> bool {
        !matches!(self, Criteria::Clear | Criteria::Unchanged)
    }

    /// Rows of `model` selected by these criteria
    pub fn rows_in(&self, model: &dyn DataModel) -> Vec<RowId> {
        match self {
            Criteria::Unchanged | Criteria::Clear => Vec::new(),
            Criteria::Rows(rows) => {
                let uids = model.uids();
                rows.iter().copied().filter(|row| uids.contains(row)).collect()
            }
            Criteria::Identifiers(table) => table.matching_rows(model),
            Criteria::Range(ranges) => {
                let config = model.fields_config();
                if !ranges.keys().any(|field| config.contains_key(field)) {
                    return Vec::new();
                }
                model
                    .uids()
                    .into_iter()
                    .filter(|&row| {
                        ranges.iter().filter(|(field, _)| config.contains_key(*field)).all(
                            |(field, (min, max))| {
                                model
                                    .value(row, field)
                                    .as_ref()
                                    .and_then(as_number)
                                    .map(|v| v >= *min && v <= *max)
                                    .unwrap_or(false)
                            },
                        )
                    })
                    .collect()
            }
        }
    }
}

/// Payload of one behaviour dispatch
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Payload {
    /// Behaviour name
    pub action: String,
    pub criteria: Criteria,
    /// Rows whose marks anchor the side effects, when known
    pub target: Option<Vec<RowId>>,
    pub source_unit: Option<UnitId>,
    pub source_canvas: Option<String>,
    /// Pointer position on the originating unit
    pub position: Option<Point>,
    /// Show overlays at `position` instead of anchoring them to marks
    pub show_in_position: bool,
    /// One-shot override of the configured side effects
    pub side_effects: Option<Vec<SideEffectEntry>>,
}

impl Payload {
    pub fn new(action: impl Into<String>, criteria: Criteria) -> Self {
        Self {
            action: action.into(),
            criteria,
            ..Default::default()
        }
    }
}

/// Builds the payload a unit dispatches from a propagated value.
///
/// Receives the unit, the rows of the unit matched by the propagation and
/// the propagated value itself.
pub type PayloadFn = fn(&UnitContext, &[RowId], &PropagationValue) -> Payload;

/// Behaviour name to payload constructor, with a default fallback
#[derive(Clone)]
pub struct PayloadGenerators {
    table: AHashMap<String, PayloadFn>,
}

impl PayloadGenerators {
    /// A table holding only the default constructor
    pub fn empty() -> Self {
        Self { table: AHashMap::new() }
    }

    pub fn register(&mut self, behaviour: impl Into<String>, generator: PayloadFn) {
        self.table.insert(behaviour.into(), generator);
    }

    /// Constructor for `behaviour`, falling back to the default one
    pub fn get(&self, behaviour: &str) -> PayloadFn {
        match self.table.get(behaviour) {
            Some(generator) => *generator,
            None => {
                tracing::debug!("No payload generator for '{}', using default", behaviour);
                default_payload
            }
        }
    }
}

impl Default for PayloadGenerators {
    fn default() -> Self {
        let mut generators = Self::empty();
        generators.register(behaviours::HIGHLIGHT, highlight_payload);
        generators.register(behaviours::BRUSH, brush_payload);
        generators
    }
}

/// Copy the propagated payload and anchor it on the matched rows
pub fn default_payload(_ctx: &UnitContext, data: &[RowId], value: &PropagationValue) -> Payload {
    let mut payload = value.payload.clone();
    if payload.criteria.has_targets() {
        payload.target = Some(data.to_vec());
    }
    payload
}

/// Like the default, but overlays follow the pointer on the unit the
/// pointer is over
pub fn highlight_payload(ctx: &UnitContext, data: &[RowId], value: &PropagationValue) -> Payload {
    let mut payload = default_payload(ctx, data, value);
    let on_source = payload.source_unit.map_or(true, |source| source == ctx.id);
    payload.show_in_position = on_source && payload.position.is_some() && payload.show_in_position;
    payload
}

/// Brushed rows are always anchored to their marks
pub fn brush_payload(ctx: &UnitContext, data: &[RowId], value: &PropagationValue) -> Payload {
    let mut payload = default_payload(ctx, data, value);
    payload.position = None;
    payload.show_in_position = false;
    payload
}
