//! `cssparser` front-end that builds the mutable [`Stylesheet`] tree.
//!
//! Every produced item carries the byte offset where it started so that comments, which the
//! rule-list parsers skip, can be merged back into their source position.

use cssparser::AtRuleParser as CssAtRuleParser;
use cssparser::CowRcStr;
use cssparser::DeclarationParser as CssDeclarationParser;
use cssparser::ParseError;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ParserState;
use cssparser::QualifiedRuleParser as CssQualifiedRuleParser;
use cssparser::RuleBodyItemParser as CssRuleBodyItemParser;
use cssparser::RuleBodyParser as CssRuleBodyParser;
use cssparser::StyleSheetParser;
use cssparser::Token;
use anyhow::bail;
use log::trace;

use crate::tree::{AtRule, Declaration, Node, StyleRule, Stylesheet, normalize_property_name};

/// A node tagged with the byte offset where it started.
type Positioned = (usize, Node);

/// Parse `!important` at the end of a value, returning (`value_without_important`, `important_flag`).
fn split_important_tail(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    if let Some(pos) = trimmed.rfind("!important")
        && let Some(prefix) = trimmed.get(..pos)
        && trimmed.get(pos..).is_some_and(|tail| tail == "!important")
    {
        let head = prefix.trim_end();
        return (head.to_owned(), true);
    }
    (trimmed.to_owned(), false)
}

/// Collect comments standing between items of the current block, then rewind.
///
/// A comment counts as an item only when it is not part of a declaration or prelude, i.e. it
/// follows the block start, a `;` or a nested `{}` block.
fn scan_standalone_comments(input: &mut Parser<'_, '_>) -> Vec<Positioned> {
    let state = input.state();
    let mut out = Vec::new();
    let mut at_item_start = true;
    loop {
        let offset = input.position().byte_index();
        let Ok(token) = input.next_including_whitespace_and_comments() else {
            break;
        };
        match token {
            Token::Comment(text) => {
                if at_item_start {
                    out.push((offset, Node::Comment((*text).to_owned())));
                }
            }
            Token::WhiteSpace(_) => {}
            Token::Semicolon | Token::CurlyBracketBlock => at_item_start = true,
            _ => at_item_start = false,
        }
    }
    input.reset(&state);
    out
}

/// Merge items and standalone comments by source offset.
fn merge_in_source_order(mut items: Vec<Positioned>, comments: Vec<Positioned>) -> Vec<Node> {
    items.extend(comments);
    items.sort_by_key(|(offset, _)| *offset);
    items.into_iter().map(|(_, node)| node).collect()
}

/// Consume the remainder of the current input and return its trimmed raw text.
fn consume_raw<'i>(input: &mut Parser<'i, '_>) -> &'i str {
    let start = input.position();
    while input.next_including_whitespace_and_comments().is_ok() {}
    input.slice_from(start).trim()
}

/// Parse the contents of a `{}` block: declarations, nested rules, nested at-rules and comments.
fn parse_block_contents(block: &mut Parser<'_, '_>, body: &mut BodyParser) -> Vec<Node> {
    let comments = scan_standalone_comments(block);
    let mut items: Vec<Positioned> = Vec::new();
    for result in CssRuleBodyParser::new(block, body) {
        match result {
            Ok(item) => items.push(item),
            Err((_, raw)) => trace!(target: "css_syntax", "skipping invalid body item: {raw:?}"),
        }
    }
    merge_in_source_order(items, comments)
}

/// Prelude of an at-rule: its lowercased name and raw parameter text.
type AtRulePrelude = (String, String);

fn parse_at_rule_prelude<'i>(name: &CowRcStr<'i>, input: &mut Parser<'i, '_>) -> AtRulePrelude {
    let params = consume_raw(input).to_owned();
    (name.to_ascii_lowercase(), params)
}

/// Parser for everything that may appear inside a block.
struct BodyParser {
    /// Byte length of the whole input; a block whose contents run up to it was never closed.
    source_len: usize,
    /// Line and column of the first block left open at end of input.
    unclosed: Option<(u32, u32)>,
}

impl BodyParser {
    const fn new(source_len: usize) -> Self {
        Self {
            source_len,
            unclosed: None,
        }
    }

    /// Parse a block body and note it when the input ends before its closing `}`.
    fn parse_block_body(&mut self, start: &ParserState, input: &mut Parser<'_, '_>) -> Vec<Node> {
        let nodes = parse_block_contents(input, self);
        // A closed block stops right before its `}`, so only an open one reaches the end.
        if input.position().byte_index() >= self.source_len && self.unclosed.is_none() {
            let location = start.source_location();
            self.unclosed = Some((location.line + 1, location.column));
        }
        nodes
    }
}

impl<'i> CssDeclarationParser<'i> for BodyParser {
    type Declaration = Positioned;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        decl_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        let mut has_block = false;
        while let Ok(token) = input.next_including_whitespace_and_comments() {
            has_block |= matches!(token, Token::CurlyBracketBlock);
        }
        // `a:hover { ... }` looks like a declaration up to the block; hand it back so it is
        // reparsed as a nested rule. Custom properties may legitimately hold blocks.
        if has_block && !name.starts_with("--") {
            return Err(input.new_custom_error(()));
        }
        let raw = input.slice_from(start);
        let (value, important) = split_important_tail(raw);
        let decl = Declaration {
            name: normalize_property_name(&name),
            value,
            important,
        };
        Ok((decl_start.position().byte_index(), Node::Declaration(decl)))
    }
}

impl<'i> CssAtRuleParser<'i> for BodyParser {
    type Prelude = AtRulePrelude;
    type AtRule = Positioned;
    type Error = ();

    #[inline]
    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok(parse_at_rule_prelude(&name, input))
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
    ) -> Result<Self::AtRule, ()> {
        let (name, params) = prelude;
        let at_rule = AtRule {
            name,
            params,
            nodes: None,
        };
        Ok((start.position().byte_index(), Node::AtRule(at_rule)))
    }

    #[inline]
    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let (name, params) = prelude;
        let at_rule = AtRule {
            name,
            params,
            nodes: Some(self.parse_block_body(start, input)),
        };
        Ok((start.position().byte_index(), Node::AtRule(at_rule)))
    }
}

impl<'i> CssQualifiedRuleParser<'i> for BodyParser {
    type Prelude = String; // raw selector/prelude
    type QualifiedRule = Positioned;
    type Error = ();

    #[inline]
    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Ok(consume_raw(input).to_owned())
    }

    #[inline]
    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let rule = StyleRule {
            prelude,
            nodes: self.parse_block_body(start, input),
        };
        Ok((start.position().byte_index(), Node::Rule(rule)))
    }
}

impl<'i> CssRuleBodyItemParser<'i, Positioned, ()> for BodyParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        true
    }
}

/// Parse a full stylesheet into a mutable [`Stylesheet`] tree using cssparser.
///
/// Invalid items are skipped the way CSS error recovery prescribes; structural validation of
/// at-rule bodies is left to the plugins that own those at-rules.
///
/// # Errors
/// Returns an error when a `{}` block is still open at the end of the input.
pub fn parse_stylesheet(css: &str) -> anyhow::Result<Stylesheet> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let comments = scan_standalone_comments(&mut parser);
    let mut top = BodyParser::new(css.len());
    let mut items: Vec<Positioned> = Vec::new();
    for result in StyleSheetParser::new(&mut parser, &mut top) {
        match result {
            Ok(item) => items.push(item),
            Err((_, raw)) => trace!(target: "css_syntax", "skipping invalid top-level item: {raw:?}"),
        }
    }
    if let Some((line, column)) = top.unclosed {
        bail!("unclosed block starting at {line}:{column}");
    }
    Ok(Stylesheet {
        nodes: merge_in_source_order(items, comments),
    })
}
