//! Fan-out list of units that propagate behaviours to each other

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::{PropagationEngine, PropagationValue};
use crate::unit::UnitId;

/// A set of units sharing related data.
///
/// The group holds weak references only; units hold the group.
pub struct PropagationGroup {
    name: String,
    members: RwLock<Vec<Weak<PropagationEngine>>>,
}

impl PropagationGroup {
    /// Create a new propagation group
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            members: RwLock::new(Vec::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn subscribe(&self, engine: &Arc<PropagationEngine>) {
        let mut members = self.members.write();
        members.retain(|weak| weak.strong_count() > 0);
        if !members.iter().any(|weak| weak.upgrade().map_or(false, |m| m.id() == engine.id())) {
            members.push(Arc::downgrade(engine));
        }
    }

    pub(crate) fn unsubscribe(&self, unit: UnitId) {
        self.members
            .write()
            .retain(|weak| weak.upgrade().map_or(false, |member| member.id() != unit));
    }

    /// Live members in subscription order
    pub fn members(&self) -> Vec<Arc<PropagationEngine>> {
        let mut members = self.members.write();

        // Remove any dead weak references
        members.retain(|weak| weak.strong_count() > 0);
        members.iter().filter_map(Weak::upgrade).collect()
    }

    pub fn len(&self) -> usize {
        self.members().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forward a value to every member except its source, in subscription
    /// order. Returns the units that applied it.
    pub(crate) fn propagate(&self, value: &PropagationValue) -> Vec<UnitId> {
        let mut reached = Vec::new();
        for member in self.members() {
            if member.id() == value.source_id {
                continue;
            }
            match member.receive(value) {
                Ok(_) => reached.push(member.id()),
                Err(e) => tracing::warn!(
                    "Propagation of '{}' to unit {} failed: {}",
                    value.payload.action,
                    member.id(),
                    e
                ),
            }
        }
        reached
    }
}
