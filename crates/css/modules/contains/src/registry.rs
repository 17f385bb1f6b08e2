//! Keyed registries enforcing at most one live condition per key.
//!
//! `Single` conditions are keyed by property alone, `Pair` conditions by `(property, value)`, so
//! two pairs on the same property with different values coexist.

use core::fmt::Debug;
use core::hash::Hash;
use std::collections::HashMap;

use log::debug;

use crate::condition::Condition;
use crate::options::Duplication;
use crate::store::{ConditionId, ConditionStore};

/// Outcome of [`Registry::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// A fresh key; the condition was appended to the store.
    Inserted(ConditionId),
    /// A duplicate key; the candidate was reconciled into the existing condition.
    Merged(ConditionId),
}

impl Registration {
    pub const fn id(self) -> ConditionId {
        match self {
            Self::Inserted(id) | Self::Merged(id) => id,
        }
    }
}

/// Maps registry keys to the store slot of their live condition.
#[derive(Clone, Debug)]
pub struct Registry<K> {
    policy: Duplication,
    slots: HashMap<K, ConditionId>,
}

/// Registry for `(property)` conditions.
pub type SingleRegistry = Registry<String>;
/// Registry for `(property: value)` conditions.
pub type PairRegistry = Registry<(String, String)>;

impl<K: Eq + Hash + Debug> Registry<K> {
    pub fn new(policy: Duplication) -> Self {
        Self {
            policy,
            slots: HashMap::new(),
        }
    }

    /// Register `candidate` under `key`, reconciling with a live duplicate per the policy.
    pub fn register(
        &mut self,
        key: K,
        candidate: Condition,
        store: &mut ConditionStore,
    ) -> Registration {
        if let Some(id) = self.slots.get(&key).copied()
            && let Some(existing) = store.get_mut(id)
        {
            existing.reconcile(candidate, self.policy);
            return Registration::Merged(id);
        }
        let id = store.push(candidate);
        debug!(target: "css_contains", "registered @contains {key:?} as {id:?}");
        self.slots.insert(key, id);
        Registration::Inserted(id)
    }

    pub fn get(&self, key: &K) -> Option<ConditionId> {
        self.slots.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
