//! CSS Syntax Module Level 3 — Parsing and tokenization.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>
//!
//! Besides parsing, this crate hosts the small plugin framework stylesheet transforms run in:
//! a mutable document tree, traversal hooks and diagnostics.

#![forbid(unsafe_code)]

mod parser;
mod processor;
mod tree;

pub use parser::parse_stylesheet;
pub use processor::{Plugin, ProcessResult, Processor, Warning};
pub use tree::{AtRule, Declaration, Node, StyleRule, Stylesheet, normalize_property_name};
