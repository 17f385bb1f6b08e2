//! Parsing of `@contains` parameters: `[overrides] (property)` or `[overrides] (property: value)`.

use css_syntax::normalize_property_name;

use crate::condition::Query;
use crate::error::{ContainsError, ContainsWarning, SyntaxIssue};

/// Literal that switches a registration to override mode.
const OVERRIDES_KEYWORD: &str = "overrides";

/// Validated parameters of one condition block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Params {
    pub query: Query,
    pub overrides: bool,
    pub warnings: Vec<ContainsWarning>,
}

/// Property names are plain identifiers: ASCII alphanumerics, `-` and `_`.
fn is_valid_property(property: &str) -> bool {
    !property.is_empty()
        && property
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || matches!(character, '-' | '_'))
}

/// Strip a leading `overrides` keyword. It must be followed by whitespace or the parentheses.
fn strip_overrides(params: &str) -> (bool, &str) {
    match params.strip_prefix(OVERRIDES_KEYWORD) {
        Some(rest) if rest.starts_with(|character: char| character.is_whitespace() || character == '(') => {
            (true, rest.trim_start())
        }
        _ => (false, params),
    }
}

/// Parse raw at-rule parameters.
///
/// # Errors
/// Returns [`ContainsError::Syntax`] for empty parentheses, semicolons, a missing value after
/// `:`, a malformed property name or stray text around the parentheses.
pub fn parse_params(raw: &str) -> Result<Params, ContainsError> {
    let params = raw.trim();
    let fail = |reason: SyntaxIssue| ContainsError::Syntax {
        params: params.to_owned(),
        reason,
    };

    if params.contains(';') {
        return Err(fail(SyntaxIssue::Semicolon));
    }
    let mut warnings = Vec::new();
    if params.contains('\n') {
        warnings.push(ContainsWarning::NewlineInParams);
    }

    let (overrides, rest) = strip_overrides(params);
    let (Some(open), Some(close)) = (rest.find('('), rest.rfind(')')) else {
        return Err(fail(SyntaxIssue::MissingParentheses));
    };
    if close < open {
        return Err(fail(SyntaxIssue::MissingParentheses));
    }
    for outside in [rest.get(..open), rest.get(close + 1..)] {
        let text = outside.unwrap_or_default().trim();
        if !text.is_empty() {
            return Err(fail(SyntaxIssue::UnexpectedText {
                text: text.to_owned(),
            }));
        }
    }
    let inner = rest.get(open + 1..close).unwrap_or_default().trim();
    if inner.is_empty() {
        return Err(fail(SyntaxIssue::Empty));
    }

    let (property, value) = match inner.split_once(':') {
        Some((property, value)) => (property.trim(), Some(value.trim())),
        None => (inner, None),
    };
    if !is_valid_property(property) {
        return Err(fail(SyntaxIssue::InvalidProperty {
            property: property.to_owned(),
        }));
    }
    let property = normalize_property_name(property);
    let query = match value {
        Some("") => return Err(fail(SyntaxIssue::MissingValue { property })),
        Some(value) => Query::Pair {
            property,
            value: value.to_owned(),
        },
        None => Query::Single { property },
    };

    Ok(Params {
        query,
        overrides,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(raw: &str) -> Option<SyntaxIssue> {
        match parse_params(raw) {
            Err(ContainsError::Syntax { reason, .. }) => Some(reason),
            _ => None,
        }
    }

    #[test]
    fn single_and_pair_forms() -> Result<(), ContainsError> {
        let single = parse_params("(position)")?;
        assert_eq!(
            single.query,
            Query::Single {
                property: "position".to_owned()
            }
        );
        assert!(!single.overrides);

        let pair = parse_params("overrides (display:  inline-block )")?;
        assert_eq!(
            pair.query,
            Query::Pair {
                property: "display".to_owned(),
                value: "inline-block".to_owned()
            }
        );
        assert!(pair.overrides);
        assert!(pair.warnings.is_empty());
        Ok(())
    }

    #[test]
    fn overrides_may_touch_the_parentheses() -> Result<(), ContainsError> {
        assert!(parse_params("overrides(gap)")?.overrides);
        Ok(())
    }

    #[test]
    fn value_keeps_inner_parentheses() -> Result<(), ContainsError> {
        let params = parse_params("(width: calc(1px + 2px))")?;
        assert_eq!(
            params.query,
            Query::Pair {
                property: "width".to_owned(),
                value: "calc(1px + 2px)".to_owned()
            }
        );
        Ok(())
    }

    #[test]
    fn newline_is_only_a_warning() -> Result<(), ContainsError> {
        let params = parse_params("(\n  display: flex)")?;
        assert_eq!(params.warnings, [ContainsWarning::NewlineInParams]);
        Ok(())
    }

    #[test]
    fn rejects_malformed_parameters() {
        assert_eq!(issue("()"), Some(SyntaxIssue::Empty));
        assert_eq!(issue("(  )"), Some(SyntaxIssue::Empty));
        assert_eq!(issue("(padding;)"), Some(SyntaxIssue::Semicolon));
        assert_eq!(
            issue("(gap:)"),
            Some(SyntaxIssue::MissingValue {
                property: "gap".to_owned()
            })
        );
        assert_eq!(
            issue("(mar gin: 1rem)"),
            Some(SyntaxIssue::InvalidProperty {
                property: "mar gin".to_owned()
            })
        );
        assert_eq!(
            issue("(mar gin)"),
            Some(SyntaxIssue::InvalidProperty {
                property: "mar gin".to_owned()
            })
        );
        assert_eq!(issue("display"), Some(SyntaxIssue::MissingParentheses));
        assert_eq!(
            issue("always (display)"),
            Some(SyntaxIssue::UnexpectedText {
                text: "always".to_owned()
            })
        );
    }
}
