//! Rewrites a container with a resolution produced by the matcher.

use css_syntax::{Declaration, Node, StyleRule};
use log::debug;

use crate::matcher::Resolution;

/// Index of the last declaration among `nodes`, skipping trailing rules, at-rules and comments.
pub fn last_declaration_index(nodes: &[Node]) -> Option<usize> {
    nodes.iter().rposition(Node::is_declaration)
}

/// Reconcile `resolution` with the container's own declarations and append what remains.
///
/// Conflicting own declarations are removed when the resolved value overrides, otherwise the
/// resolved value is dropped. Remaining values are inserted right after the last declaration,
/// in resolution order; a container without declarations gets them appended.
pub fn apply(rule: &mut StyleRule, mut resolution: Resolution) {
    // Back to front so removals keep the remaining indices valid.
    for index in (0..rule.nodes.len()).rev() {
        let Some(decl) = rule.nodes.get(index).and_then(Node::as_declaration) else {
            continue;
        };
        match resolution.get(&decl.name).map(|resolved| resolved.overrides) {
            Some(true) => {
                debug!(target: "css_contains", "`{}`: overriding `{decl}`", rule.prelude);
                rule.remove(index);
            }
            Some(false) => {
                resolution.shift_remove(&decl.name);
            }
            None => {}
        }
    }

    let mut at = last_declaration_index(&rule.nodes).map_or(rule.nodes.len(), |index| index + 1);
    for (property, resolved) in resolution {
        let decl = Declaration {
            name: property,
            value: resolved.value,
            important: resolved.important,
        };
        debug!(target: "css_contains", "`{}`: injecting `{decl}`", rule.prelude);
        rule.insert_before(at, decl);
        at += 1;
    }
}
