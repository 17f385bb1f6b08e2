//! Registration-time diagnostics.

use thiserror::Error;

/// Fatal problems found while registering `@contains` blocks.
///
/// Both variants abort the compile of the current document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContainsError {
    /// Malformed condition parameters.
    #[error("invalid @contains {params}: {reason}")]
    Syntax {
        /// Raw parameter text of the offending block.
        params: String,
        reason: SyntaxIssue,
    },

    /// A condition block whose body cannot hold a payload.
    #[error("invalid @contains {params}: {reason}")]
    Structure {
        /// Raw parameter text of the offending block.
        params: String,
        reason: StructureIssue,
    },
}

/// What exactly is wrong with a condition's parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxIssue {
    #[error("parameters must be wrapped in parentheses")]
    MissingParentheses,
    #[error("empty parentheses; expected `(property)` or `(property: value)`")]
    Empty,
    #[error("semicolons are not allowed inside the parameters")]
    Semicolon,
    #[error("missing value after `{property}:`")]
    MissingValue { property: String },
    #[error("`{property}` is not a valid property name")]
    InvalidProperty { property: String },
    #[error("unexpected `{text}` outside the parentheses")]
    UnexpectedText { text: String },
}

/// What exactly is wrong with a condition's body.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StructureIssue {
    #[error("missing `{{}}` block with declarations")]
    MissingBody,
    #[error("nested rules are not allowed inside @contains")]
    NestedRule,
    #[error("nested at-rules are not allowed inside @contains")]
    NestedAtRule,
}

/// Non-fatal findings surfaced to the caller while registration continues.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContainsWarning {
    #[error("The @contains was empty; it provides no styles.")]
    EmptyBody,
    #[error("It's better to not use new lines inside @contains params.")]
    NewlineInParams,
}
