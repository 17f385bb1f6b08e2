//! Plugin configuration.

use core::fmt;
use core::str::FromStr;

use anyhow::{Context as _, Result, bail};
use serde::Deserialize;

/// How two registrations under an identical key are reconciled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Duplication {
    /// Union of both payloads, newer values win; `overrides` accumulates.
    #[default]
    Merge,
    /// The newer registration wins wholesale.
    Replace,
}

impl FromStr for Duplication {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> Result<Self> {
        match text.trim() {
            "merge" => Ok(Self::Merge),
            "replace" => Ok(Self::Replace),
            other => bail!("unknown duplication policy {other:?}; expected \"merge\" or \"replace\""),
        }
    }
}

impl fmt::Display for Duplication {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        out.write_str(match self {
            Self::Merge => "merge",
            Self::Replace => "replace",
        })
    }
}

/// Options accepted by the `@contains` plugin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub duplication: Duplication,
}

impl Options {
    pub const fn new(duplication: Duplication) -> Self {
        Self { duplication }
    }

    /// Load options from a JSON object such as `{"duplication": "replace"}`.
    ///
    /// # Errors
    /// Returns an error for malformed JSON, unknown keys or an unknown policy.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid @contains plugin options")
    }
}
