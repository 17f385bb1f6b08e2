//! Mutable stylesheet tree produced by the parser and rewritten by plugins.

use core::fmt;

/// A single CSS declaration (property: value [!important]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Normalized property name (see [`normalize_property_name`]).
    pub name: String,
    /// Raw value text (without trailing !important).
    pub value: String,
    /// Whether the declaration was marked as `!important`.
    pub important: bool,
}

impl Declaration {
    /// Build a plain (non-important) declaration.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            important: false,
        }
    }
}

/// A style rule: a raw prelude (the selector list) and its ordered children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleRule {
    /// Raw prelude text (typically the selector list).
    pub prelude: String,
    /// Child nodes in source order.
    pub nodes: Vec<Node>,
}

/// An at-rule such as `@media screen { ... }`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtRule {
    /// Lowercased at-keyword without the `@`.
    pub name: String,
    /// Raw prelude text, verbatim apart from surrounding whitespace.
    pub params: String,
    /// Block children; `None` when the at-rule has no `{}` block at all.
    pub nodes: Option<Vec<Node>>,
}

/// Any child of a stylesheet, rule or at-rule block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Declaration(Declaration),
    Rule(StyleRule),
    AtRule(AtRule),
    /// Comment text without the `/*` `*/` delimiters.
    Comment(String),
}

impl Node {
    #[inline]
    pub const fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            Self::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_declaration(&self) -> bool {
        matches!(self, Self::Declaration(_))
    }
}

/// A parsed stylesheet: the document root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Top-level nodes in source order.
    pub nodes: Vec<Node>,
}

/// Lowercase a property name the way the parser does. Custom properties keep their case.
pub fn normalize_property_name(name: &str) -> String {
    if name.starts_with("--") {
        name.to_owned()
    } else {
        name.to_ascii_lowercase()
    }
}

impl StyleRule {
    pub fn new(prelude: impl Into<String>) -> Self {
        Self {
            prelude: prelude.into(),
            nodes: Vec::new(),
        }
    }

    /// Builder-style helper that appends a declaration.
    #[must_use]
    pub fn with_declaration(mut self, name: &str, value: &str) -> Self {
        self.nodes.push(Node::Declaration(Declaration::new(name, value)));
        self
    }

    /// Direct child declarations in order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.nodes.iter().filter_map(Node::as_declaration)
    }

    /// Remove and return the child at `index`.
    pub fn remove(&mut self, index: usize) -> Node {
        self.nodes.remove(index)
    }

    /// Insert a declaration immediately before the child at `index`.
    /// An index equal to the child count appends.
    pub fn insert_before(&mut self, index: usize, decl: Declaration) {
        let at = index.min(self.nodes.len());
        self.nodes.insert(at, Node::Declaration(decl));
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }
}

/// Pre-order traversal over rules, descending into at-rule blocks and nested rules.
fn walk_nodes_mut<F>(nodes: &mut [Node], visitor: &mut F) -> anyhow::Result<()>
where
    F: FnMut(&mut StyleRule) -> anyhow::Result<()>,
{
    for node in nodes {
        match node {
            Node::Rule(rule) => {
                visitor(rule)?;
                walk_nodes_mut(&mut rule.nodes, visitor)?;
            }
            Node::AtRule(AtRule {
                nodes: Some(children),
                ..
            }) => walk_nodes_mut(children, visitor)?,
            Node::AtRule(_) | Node::Declaration(_) | Node::Comment(_) => {}
        }
    }
    Ok(())
}

/// Detach every at-rule named `name` (at any depth) and append it to `out` in document order.
fn take_at_rules_from(nodes: &mut Vec<Node>, name: &str, out: &mut Vec<AtRule>) {
    let mut index = 0;
    while index < nodes.len() {
        let matches_name =
            matches!(&nodes[index], Node::AtRule(at_rule) if at_rule.name.eq_ignore_ascii_case(name));
        if matches_name {
            if let Node::AtRule(at_rule) = nodes.remove(index) {
                out.push(at_rule);
            }
            continue;
        }
        match &mut nodes[index] {
            Node::Rule(rule) => take_at_rules_from(&mut rule.nodes, name, out),
            Node::AtRule(AtRule {
                nodes: Some(children),
                ..
            }) => take_at_rules_from(children, name, out),
            Node::AtRule(_) | Node::Declaration(_) | Node::Comment(_) => {}
        }
        index += 1;
    }
}

impl Stylesheet {
    /// Visit every style rule in document order.
    ///
    /// # Errors
    /// Stops at, and returns, the first error produced by `visitor`.
    pub fn walk_rules_mut<F>(&mut self, mut visitor: F) -> anyhow::Result<()>
    where
        F: FnMut(&mut StyleRule) -> anyhow::Result<()>,
    {
        walk_nodes_mut(&mut self.nodes, &mut visitor)
    }

    /// Remove every at-rule with the given name from the tree and return them in document order.
    pub fn take_at_rules(&mut self, name: &str) -> Vec<AtRule> {
        let mut out = Vec::new();
        take_at_rules_from(&mut self.nodes, name, &mut out);
        out
    }
}

const INDENT: &str = "  ";

fn write_indent(out: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        out.write_str(INDENT)?;
    }
    Ok(())
}

fn write_block(out: &mut fmt::Formatter<'_>, nodes: &[Node], depth: usize) -> fmt::Result {
    out.write_str("{\n")?;
    for node in nodes {
        write_node(out, node, depth + 1)?;
    }
    write_indent(out, depth)?;
    out.write_str("}\n")
}

fn write_node(out: &mut fmt::Formatter<'_>, node: &Node, depth: usize) -> fmt::Result {
    write_indent(out, depth)?;
    match node {
        Node::Declaration(decl) => writeln!(out, "{decl}"),
        Node::Comment(text) => writeln!(out, "/*{text}*/"),
        Node::Rule(rule) => {
            write!(out, "{} ", rule.prelude)?;
            write_block(out, &rule.nodes, depth)
        }
        Node::AtRule(at_rule) => {
            out.write_str("@")?;
            out.write_str(&at_rule.name)?;
            if !at_rule.params.is_empty() {
                write!(out, " {}", at_rule.params)?;
            }
            match &at_rule.nodes {
                Some(children) => {
                    out.write_str(" ")?;
                    write_block(out, children, depth)
                }
                None => out.write_str(";\n"),
            }
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(out, "{}: {}", self.name, self.value)?;
        if self.important {
            out.write_str(" !important")?;
        }
        out.write_str(";")
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(out, "{} ", self.prelude)?;
        write_block(out, &self.nodes, 0)
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write_node(out, node, 0)?;
        }
        Ok(())
    }
}
