//! Per-unit decisions taken before side effects run

mod applicability;
mod mutability;

pub use applicability::ApplicabilityResolver;
pub use mutability::MutabilityResolver;

use crate::unit::UnitId;

/// Whether a behaviour is being handled on the unit it started on.
///
/// Payloads without a source unit are local dispatches.
pub(crate) fn action_on_source(source_unit: Option<UnitId>, unit_id: UnitId) -> bool {
    source_unit.map_or(true, |source| source == unit_id)
}
