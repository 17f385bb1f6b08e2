//! A registered condition block: the query it waits for and the declarations it injects.

use css_syntax::{AtRule, Declaration, Node};
use indexmap::IndexMap;
use log::debug;

use crate::error::{ContainsError, ContainsWarning, StructureIssue};
use crate::options::Duplication;
use crate::params::parse_params;

/// One injected declaration's value, with its `!important` flag kept apart from the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayloadValue {
    pub value: String,
    pub important: bool,
}

impl PayloadValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            important: false,
        }
    }
}

impl From<&Declaration> for PayloadValue {
    fn from(decl: &Declaration) -> Self {
        Self {
            value: decl.value.clone(),
            important: decl.important,
        }
    }
}

/// Declarations a condition injects, keyed by property in first-declared order.
pub type Payload = IndexMap<String, PayloadValue>;

/// Which kind of query produced a value. `Pair` takes precedence over `Single`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
    Single,
    Pair,
}

/// What a container has to declare for a condition to apply.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Query {
    /// `(property)`: any value matches.
    Single { property: String },
    /// `(property: value)`: the value has to match exactly.
    Pair { property: String, value: String },
}

impl Query {
    pub fn property(&self) -> &str {
        match self {
            Self::Single { property } | Self::Pair { property, .. } => property,
        }
    }

    pub const fn variant(&self) -> Variant {
        match self {
            Self::Single { .. } => Variant::Single,
            Self::Pair { .. } => Variant::Pair,
        }
    }

    /// Whether `decl` satisfies this query.
    pub fn matches(&self, decl: &Declaration) -> bool {
        match self {
            Self::Single { property } => decl.name == *property,
            Self::Pair { property, value } => decl.name == *property && decl.value == *value,
        }
    }
}

/// One live condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Condition {
    pub query: Query,
    /// Injected values replace the container's own conflicting declarations.
    pub overrides: bool,
    pub payload: Payload,
}

impl Condition {
    pub const fn new(query: Query, overrides: bool, payload: Payload) -> Self {
        Self {
            query,
            overrides,
            payload,
        }
    }

    /// Validate a detached `@contains` block and build the condition it declares.
    ///
    /// # Errors
    /// Returns [`ContainsError::Syntax`] for malformed parameters and
    /// [`ContainsError::Structure`] for a missing body or nested rules.
    pub fn from_at_rule(at_rule: &AtRule) -> Result<(Self, Vec<ContainsWarning>), ContainsError> {
        let params = parse_params(&at_rule.params)?;
        let mut warnings = params.warnings;
        let structure = |reason: StructureIssue| ContainsError::Structure {
            params: at_rule.params.trim().to_owned(),
            reason,
        };

        let Some(nodes) = &at_rule.nodes else {
            return Err(structure(StructureIssue::MissingBody));
        };
        if nodes.is_empty() {
            warnings.push(ContainsWarning::EmptyBody);
        }

        let mut payload = Payload::new();
        for node in nodes {
            match node {
                Node::Declaration(decl) => {
                    payload.insert(decl.name.clone(), PayloadValue::from(decl));
                }
                Node::Rule(_) => return Err(structure(StructureIssue::NestedRule)),
                Node::AtRule(_) => return Err(structure(StructureIssue::NestedAtRule)),
                Node::Comment(_) => {}
            }
        }

        Ok((Self::new(params.query, params.overrides, payload), warnings))
    }

    pub fn variant(&self) -> Variant {
        self.query.variant()
    }

    /// Reconcile a duplicate registration of the same key into `self`.
    pub fn reconcile(&mut self, newer: Self, policy: Duplication) {
        debug!(
            target: "css_contains",
            "{policy} duplicate @contains on {:?}",
            self.query
        );
        match policy {
            Duplication::Merge => {
                // Existing keys keep their position and take the newer value.
                self.payload.extend(newer.payload);
                self.overrides |= newer.overrides;
            }
            Duplication::Replace => {
                self.payload = newer.payload;
                self.overrides = newer.overrides;
            }
        }
    }
}
