//! Conditional declaration injection: `@contains` blocks.
//!
//! ```css
//! @contains overrides (display: inline-block) {
//!   padding: 1rem;
//! }
//! ```
//!
//! Every style rule that declares `display: inline-block` receives `padding: 1rem`. A
//! `(property)` query matches whatever the value is; `overrides` makes injected values replace
//! the rule's own conflicting declarations instead of yielding to them. The blocks themselves
//! are removed from the output.

#![forbid(unsafe_code)]

mod condition;
mod error;
mod injector;
mod matcher;
mod options;
mod params;
mod plugin;
mod registry;
mod session;
mod store;

use anyhow::Result;
use css_syntax::{Plugin, ProcessResult, Processor};

pub use condition::{Condition, Payload, PayloadValue, Query, Variant};
pub use error::{ContainsError, ContainsWarning, StructureIssue, SyntaxIssue};
pub use injector::{apply, last_declaration_index};
pub use matcher::{Evaluation, Resolution, Resolved, evaluate, fold};
pub use options::{Duplication, Options};
pub use params::{Params, parse_params};
pub use plugin::{ContainsPlugin, PLUGIN_NAME};
pub use registry::{PairRegistry, Registration, Registry, SingleRegistry};
pub use session::{AT_RULE_NAME, Phase, Session};
pub use store::{ConditionId, ConditionStore};

/// Parse `css`, expand its `@contains` blocks and return the rewritten document.
///
/// # Errors
/// Fails when `css` has an unclosed block. Returns an error wrapping a [`ContainsError`] when a
/// condition block is malformed.
pub fn process(css: &str, options: Options) -> Result<ProcessResult> {
    let mut plugin = ContainsPlugin::new(options);
    let plugins: Vec<&mut dyn Plugin> = vec![&mut plugin];
    Processor::new(plugins).process(css)
}
