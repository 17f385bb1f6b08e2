//! Plugin host: parses a stylesheet and drives plugins through their traversal hooks.

use anyhow::{Context as _, Result};
use log::{debug, warn};

use crate::parser::parse_stylesheet;
use crate::tree::{StyleRule, Stylesheet};

/// A non-fatal diagnostic raised by a plugin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    /// Name of the plugin that raised the warning.
    pub plugin: &'static str,
    /// Human readable message.
    pub text: String,
}

/// Output of a processing run.
#[derive(Clone, Debug, Default)]
pub struct ProcessResult {
    /// The rewritten document.
    pub stylesheet: Stylesheet,
    /// Warnings in the order they were raised.
    pub warnings: Vec<Warning>,
}

impl ProcessResult {
    /// Serialized output CSS.
    pub fn css(&self) -> String {
        self.stylesheet.to_string()
    }
}

/// Traversal hooks a plugin can subscribe to.
///
/// Returning an error from any hook aborts the whole compile.
pub trait Plugin {
    /// Plugin name used to attribute diagnostics.
    fn name(&self) -> &'static str;

    /// Called once per document, before any rule is visited. Non-fatal diagnostics are pushed
    /// onto `warnings`.
    ///
    /// # Errors
    /// A fatal diagnostic for the document.
    fn once(&mut self, _sheet: &mut Stylesheet, _warnings: &mut Vec<Warning>) -> Result<()> {
        Ok(())
    }

    /// Called for every style rule in document order.
    ///
    /// # Errors
    /// A fatal diagnostic for the document.
    fn rule(&mut self, _rule: &mut StyleRule) -> Result<()> {
        Ok(())
    }

    /// Called once per document after every rule was visited.
    ///
    /// # Errors
    /// A fatal diagnostic for the document.
    fn once_exit(&mut self, _sheet: &mut Stylesheet) -> Result<()> {
        Ok(())
    }
}

/// Runs a fixed list of plugins over documents.
pub struct Processor<'plugins> {
    plugins: Vec<&'plugins mut dyn Plugin>,
}

impl<'plugins> Processor<'plugins> {
    pub fn new(plugins: Vec<&'plugins mut dyn Plugin>) -> Self {
        Self { plugins }
    }

    /// Parse `css` and run every plugin over it, one plugin at a time.
    ///
    /// # Errors
    /// Fails when `css` has an unclosed block. Otherwise returns the first fatal diagnostic raised
    /// by a plugin, with the plugin name as context.
    pub fn process(&mut self, css: &str) -> Result<ProcessResult> {
        let mut stylesheet = parse_stylesheet(css).context("stylesheet could not be parsed")?;
        let warnings = self.process_stylesheet(&mut stylesheet)?;
        Ok(ProcessResult {
            stylesheet,
            warnings,
        })
    }

    /// Run every plugin over an already parsed document, returning the warnings raised.
    ///
    /// # Errors
    /// Returns the first fatal diagnostic raised by a plugin.
    pub fn process_stylesheet(&mut self, stylesheet: &mut Stylesheet) -> Result<Vec<Warning>> {
        let mut warnings = Vec::new();
        for plugin in &mut self.plugins {
            let name = plugin.name();
            debug!(target: "css_syntax", "running plugin {name}");
            let mut raised = Vec::new();
            plugin
                .once(stylesheet, &mut raised)
                .with_context(|| format!("{name}: document rejected"))?;
            for warning in raised {
                warn!(target: "css_syntax", "[{}] {}", warning.plugin, warning.text);
                warnings.push(warning);
            }
            stylesheet
                .walk_rules_mut(|rule| plugin.rule(rule))
                .with_context(|| format!("{name}: rule processing failed"))?;
            plugin
                .once_exit(stylesheet)
                .with_context(|| format!("{name}: document finalization failed"))?;
        }
        Ok(warnings)
    }
}
