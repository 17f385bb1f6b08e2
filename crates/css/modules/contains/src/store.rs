//! Document-scoped list of every live condition, in registration order.

use crate::condition::Condition;

/// Handle to a condition inside a [`ConditionStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConditionId(usize);

/// Matching source of truth. Registries only hold [`ConditionId`]s into it.
#[derive(Clone, Debug, Default)]
pub struct ConditionStore {
    conditions: Vec<Condition>,
}

impl ConditionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fresh condition, returning its id.
    pub fn push(&mut self, condition: Condition) -> ConditionId {
        let id = ConditionId(self.conditions.len());
        self.conditions.push(condition);
        id
    }

    pub fn get(&self, id: ConditionId) -> Option<&Condition> {
        self.conditions.get(id.0)
    }

    pub fn get_mut(&mut self, id: ConditionId) -> Option<&mut Condition> {
        self.conditions.get_mut(id.0)
    }

    /// Conditions in the order their keys were first registered.
    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn clear(&mut self) {
        self.conditions.clear();
    }
}
