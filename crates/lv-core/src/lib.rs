//! Core interaction engine for linked visual units
//!
//! This crate turns behaviours (highlight, select, brush...) dispatched on one
//! visual unit into selection sets and side effects, and fans them out to every
//! sibling unit that shares related data.

pub mod config;
pub mod data;
pub mod error;
pub mod geometry;
pub mod history;
pub mod payload;
pub mod propagation;
pub mod resolve;
pub mod selection;
pub mod side_effect;
pub mod unit;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{InteractionConfig, PhysicalAction};
pub use data::{
    as_number, display_value, CellValue, DataModel, FieldDef, FieldType, FieldsConfig,
    IdentifierTable, RowId,
};
pub use error::InteractionError;
pub use geometry::{BoundingBox, PlotGeometry, Point, Size, StaticGeometry};
pub use history::{ActionHistory, ActionHistoryEntry};
pub use payload::{Criteria, Payload, PayloadFn, PayloadGenerators};
pub use propagation::{
    BehaviourEvent, DispatchOutcome, PropagationEngine, PropagationGroup, PropagationInfo,
    PropagationValue,
};
pub use selection::{diff, Diff, SelectionGroup, SelectionSet, SelectionSetBuilder};
pub use side_effect::{
    ApplyContext, Capabilities, EffectBinding, EffectOptions, SideEffect, SideEffectEntry,
    SideEffectKind, SideEffectRegistry, SourcePredicate,
};
pub use unit::{AxisFields, DrawingContext, Encoding, LayerInfo, UnitContext, UnitId};

/// Behaviour names wired by the default configuration
pub mod behaviours {
    pub const HIGHLIGHT: &str = "highlight";
    pub const SELECT: &str = "select";
    pub const BRUSH: &str = "brush";
    pub const FILTER: &str = "filter";
}
