//! Side effect instances owned by one unit

use ahash::AHashMap;
use indexmap::IndexMap;

use super::{Capabilities, SideEffect, SideEffectEntry, SourcePredicate};
use crate::error::InteractionError;

/// Configured side effect instances of a unit, in registration order,
/// together with the cross-unit predicates registered by name
#[derive(Default)]
pub struct SideEffectRegistry {
    effects: IndexMap<String, Box<dyn SideEffect>>,
    predicates: AHashMap<String, SourcePredicate>,
}

impl SideEffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance under its name, collecting its source predicate
    pub fn register(&mut self, effect: Box<dyn SideEffect>) -> Result<(), InteractionError> {
        let name = effect.name().to_string();
        if self.effects.contains_key(&name) {
            return Err(InteractionError::DuplicateSideEffect(name));
        }
        if let Some(predicate) = effect.source_predicate() {
            self.predicates.insert(name.clone(), predicate);
        }
        tracing::debug!("Registered side effect '{}'", name);
        self.effects.insert(name, effect);
        Ok(())
    }

    /// Register (or replace) the cross-unit predicate for a side effect name
    pub fn register_predicate(&mut self, name: impl Into<String>, predicate: SourcePredicate) {
        self.predicates.insert(name.into(), predicate);
    }

    pub fn predicate(&self, name: &str) -> Option<&SourcePredicate> {
        self.predicates.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    pub fn capabilities(&self, name: &str) -> Option<Capabilities> {
        self.effects.get(name).map(|effect| effect.capabilities())
    }

    pub fn get(&self, name: &str) -> Option<&dyn SideEffect> {
        self.effects.get(name).map(|effect| effect.as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Box<dyn SideEffect>> {
        self.effects.get_mut(name)
    }

    /// Names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.effects.keys().map(String::as_str)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Box<dyn SideEffect>)> {
        self.effects.iter_mut().map(|(name, effect)| (name.as_str(), effect))
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Check that every side effect referenced by a behaviour map exists
    pub fn validate(
        &self,
        behaviours: &IndexMap<String, Vec<SideEffectEntry>>,
    ) -> Result<(), InteractionError> {
        for (behaviour, entries) in behaviours {
            if let Some(missing) = entries.iter().find(|entry| !self.contains(&entry.name)) {
                return Err(InteractionError::UnknownSideEffect {
                    behaviour: behaviour.clone(),
                    name: missing.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Remove every instance's visual output
    pub fn remove_all(&mut self) {
        for effect in self.effects.values_mut() {
            effect.remove();
        }
    }
}
