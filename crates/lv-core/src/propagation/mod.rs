//! Propagation of behaviours between visual units
//!
//! A behaviour dispatched on one unit is applied there first and then, when
//! the call site asks for it, forwarded to every other unit of the unit's
//! [`PropagationGroup`]. Each receiving unit rebuilds the payload against its
//! own data before applying its side effects.

mod engine;
mod group;

pub use engine::{BehaviourEvent, DispatchOutcome, PropagationEngine};
pub use group::PropagationGroup;

use crate::data::{FieldsConfig, IdentifierTable, RowId};
use crate::payload::Payload;
use crate::unit::UnitId;

/// What travels from the originating unit to its siblings
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationValue {
    /// Payload as dispatched on the originating unit
    pub payload: Payload,
    pub source_id: UnitId,
    /// Identifier tuples of the originally targeted rows
    pub source_identifiers: Option<IdentifierTable>,
}

impl PropagationValue {
    pub fn new(payload: Payload, source_id: UnitId) -> Self {
        Self {
            payload,
            source_id,
            source_identifiers: None,
        }
    }

    pub fn with_source_identifiers(mut self, identifiers: IdentifierTable) -> Self {
        self.source_identifiers = Some(identifiers);
        self
    }
}

/// How a behaviour reached a unit
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationInfo {
    /// Whether the receiving unit should propagate further; always false for
    /// received behaviours
    pub propagate: bool,
    pub persistent: bool,
    pub source_id: UnitId,
    pub source_identifiers: Option<IdentifierTable>,
    /// Whether the source identifiers relate to this unit's schema
    pub is_source_field_present: bool,
    /// Payload as dispatched on the originating unit
    pub prop_payload: Payload,
    /// Rows of this unit matched by the propagation
    pub data: Vec<RowId>,
}

impl PropagationInfo {
    pub fn new(prop_payload: Payload, source_id: UnitId) -> Self {
        Self {
            propagate: false,
            persistent: false,
            source_id,
            source_identifiers: None,
            is_source_field_present: true,
            prop_payload,
            data: Vec::new(),
        }
    }
}

/// Source identifiers relate to a unit unless they consist only of
/// dimensions the unit does not have. Measure identifiers always relate.
pub fn source_field_present(identifiers: Option<&IdentifierTable>, fields: &FieldsConfig) -> bool {
    match identifiers {
        None => true,
        Some(table) => table.has_measure() || table.shares_fields_with(fields),
    }
}
