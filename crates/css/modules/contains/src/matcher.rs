//! Matches a style container against every live condition and folds the payloads together.

use css_syntax::StyleRule;
use indexmap::IndexMap;
use log::trace;

use crate::condition::{Condition, Variant};
use crate::store::ConditionStore;

/// The value a property resolves to, and where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub important: bool,
    pub overrides: bool,
    pub source: Variant,
}

/// Property → resolved value for one container, in first-fold order.
pub type Resolution = IndexMap<String, Resolved>;

/// Result of [`evaluate`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Whether at least one condition matched.
    pub matched: bool,
    pub resolution: Resolution,
}

/// Fold one matched condition's payload into `resolution`.
///
/// A value that came from a `Pair` query is never demoted by a `Single` one; otherwise the
/// later fold wins. Overwriting keeps the property's original position.
pub fn fold(resolution: &mut Resolution, condition: &Condition) {
    let source = condition.variant();
    for (property, payload) in &condition.payload {
        if source == Variant::Single
            && resolution
                .get(property)
                .is_some_and(|existing| existing.source == Variant::Pair)
        {
            trace!(target: "css_contains", "keeping pair-sourced {property}");
            continue;
        }
        resolution.insert(
            property.clone(),
            Resolved {
                value: payload.value.clone(),
                important: payload.important,
                overrides: condition.overrides,
                source,
            },
        );
    }
}

/// Match every direct declaration of `rule` against the store, in declaration order then
/// registration order. Read-only with respect to `rule`.
pub fn evaluate(store: &ConditionStore, rule: &StyleRule) -> Evaluation {
    let mut evaluation = Evaluation::default();
    if store.is_empty() {
        return evaluation;
    }
    for decl in rule.declarations() {
        for condition in store.iter().filter(|condition| condition.query.matches(decl)) {
            trace!(
                target: "css_contains",
                "`{}` matched {:?} on `{}`",
                rule.prelude,
                condition.query,
                decl
            );
            fold(&mut evaluation.resolution, condition);
            evaluation.matched = true;
        }
    }
    evaluation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Payload, PayloadValue, Query};

    fn condition(query: Query, overrides: bool, entries: &[(&str, &str)]) -> Condition {
        let payload: Payload = entries
            .iter()
            .map(|&(name, value)| (name.to_owned(), PayloadValue::new(value)))
            .collect();
        Condition::new(query, overrides, payload)
    }

    fn single(property: &str) -> Query {
        Query::Single {
            property: property.to_owned(),
        }
    }

    fn pair(property: &str, value: &str) -> Query {
        Query::Pair {
            property: property.to_owned(),
            value: value.to_owned(),
        }
    }

    fn values(resolution: &Resolution) -> Vec<(&str, &str)> {
        resolution
            .iter()
            .map(|(name, resolved)| (name.as_str(), resolved.value.as_str()))
            .collect()
    }

    #[test]
    fn pair_beats_single_regardless_of_order() {
        let mut store = ConditionStore::new();
        store.push(condition(pair("display", "block"), false, &[("color", "blue")]));
        store.push(condition(single("display"), false, &[("color", "red")]));
        let rule = StyleRule::new("span").with_declaration("display", "block");
        let evaluation = evaluate(&store, &rule);
        assert!(evaluation.matched);
        assert_eq!(values(&evaluation.resolution), [("color", "blue")]);
    }

    #[test]
    fn later_condition_wins_among_equals() {
        let mut store = ConditionStore::new();
        store.push(condition(single("position"), false, &[("align-items", "center")]));
        store.push(condition(single("display"), true, &[("align-items", "stretch")]));
        let rule = StyleRule::new("div")
            .with_declaration("position", "relative")
            .with_declaration("display", "flex");
        let evaluation = evaluate(&store, &rule);
        assert_eq!(values(&evaluation.resolution), [("align-items", "stretch")]);
        assert_eq!(
            evaluation.resolution.get("align-items").map(|resolved| resolved.overrides),
            Some(true)
        );
    }

    #[test]
    fn pair_requires_exact_value() {
        let mut store = ConditionStore::new();
        store.push(condition(pair("display", "flex"), false, &[("gap", "1px")]));
        let rule = StyleRule::new("div").with_declaration("display", "inline-flex");
        let evaluation = evaluate(&store, &rule);
        assert!(!evaluation.matched);
        assert!(evaluation.resolution.is_empty());
    }

    #[test]
    fn matching_condition_with_empty_payload_still_counts() {
        let mut store = ConditionStore::new();
        store.push(condition(single("gap"), false, &[]));
        let rule = StyleRule::new("div").with_declaration("gap", "0");
        assert!(evaluate(&store, &rule).matched);
    }
}
