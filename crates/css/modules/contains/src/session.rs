//! Two-phase document lifecycle: register every condition block, then rewrite containers.

use css_syntax::{StyleRule, Stylesheet};
use log::{debug, trace};

use crate::condition::{Condition, Query};
use crate::error::{ContainsError, ContainsWarning};
use crate::injector;
use crate::matcher;
use crate::options::Options;
use crate::registry::{PairRegistry, Registration, SingleRegistry};
use crate::store::ConditionStore;

/// At-keyword of condition blocks.
pub const AT_RULE_NAME: &str = "contains";

/// Where a session is in its per-document lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No document registered; containers are left alone.
    #[default]
    Idle,
    /// Conditions registered; containers may be processed.
    Registered,
}

/// All state scoped to one document compile.
#[derive(Clone, Debug)]
pub struct Session {
    singles: SingleRegistry,
    pairs: PairRegistry,
    store: ConditionStore,
    phase: Phase,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Session {
    pub fn new(options: Options) -> Self {
        Self {
            singles: SingleRegistry::new(options.duplication),
            pairs: PairRegistry::new(options.duplication),
            store: ConditionStore::new(),
            phase: Phase::Idle,
        }
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Live conditions in registration order.
    pub fn conditions(&self) -> impl Iterator<Item = &Condition> {
        self.store.iter()
    }

    /// Number of live conditions.
    pub fn registered(&self) -> usize {
        self.store.len()
    }

    /// Route a condition to the registry owning its key.
    pub fn register(&mut self, condition: Condition) -> Registration {
        match condition.query.clone() {
            Query::Single { property } => self.singles.register(property, condition, &mut self.store),
            Query::Pair { property, value } => {
                self.pairs.register((property, value), condition, &mut self.store)
            }
        }
    }

    /// Detach every `@contains` block from `sheet`, validate it and register its condition.
    ///
    /// # Errors
    /// The first invalid block aborts registration; the document must not be used further.
    pub fn register_all(
        &mut self,
        sheet: &mut Stylesheet,
    ) -> Result<Vec<ContainsWarning>, ContainsError> {
        let blocks = sheet.take_at_rules(AT_RULE_NAME);
        debug!(target: "css_contains", "found {} @contains blocks", blocks.len());
        let mut warnings = Vec::new();
        for block in &blocks {
            let (condition, raised) = Condition::from_at_rule(block)?;
            warnings.extend(raised);
            self.register(condition);
        }
        self.phase = Phase::Registered;
        Ok(warnings)
    }

    /// Match `rule` against the registered conditions and rewrite it. Returns whether anything
    /// matched; an unmatched rule is left untouched.
    pub fn process_container(&mut self, rule: &mut StyleRule) -> bool {
        if self.phase != Phase::Registered {
            trace!(target: "css_contains", "no conditions registered; skipping `{}`", rule.prelude);
            return false;
        }
        let evaluation = matcher::evaluate(&self.store, rule);
        if evaluation.matched {
            injector::apply(rule, evaluation.resolution);
        }
        evaluation.matched
    }

    /// Drop every condition so the session can serve another document.
    pub fn reset_session(&mut self) {
        debug!(target: "css_contains", "resetting session ({} conditions)", self.store.len());
        self.store.clear();
        self.singles.clear();
        self.pairs.clear();
        self.phase = Phase::Idle;
    }
}
