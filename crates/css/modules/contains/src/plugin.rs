//! Binds a [`Session`] to the stylesheet processor's traversal hooks.

use anyhow::Result;
use css_syntax::{Plugin, StyleRule, Stylesheet, Warning};

use crate::options::Options;
use crate::session::Session;

pub const PLUGIN_NAME: &str = "css-contains";

/// The `@contains` stylesheet plugin.
#[derive(Clone, Debug, Default)]
pub struct ContainsPlugin {
    session: Session,
}

impl ContainsPlugin {
    pub fn new(options: Options) -> Self {
        Self {
            session: Session::new(options),
        }
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }
}

impl Plugin for ContainsPlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn once(&mut self, sheet: &mut Stylesheet, warnings: &mut Vec<Warning>) -> Result<()> {
        match self.session.register_all(sheet) {
            Ok(raised) => {
                warnings.extend(raised.into_iter().map(|warning| Warning {
                    plugin: PLUGIN_NAME,
                    text: warning.to_string(),
                }));
                Ok(())
            }
            Err(error) => {
                // The document is abandoned, so `once_exit` will not run for it.
                self.session.reset_session();
                Err(error.into())
            }
        }
    }

    fn rule(&mut self, rule: &mut StyleRule) -> Result<()> {
        self.session.process_container(rule);
        Ok(())
    }

    fn once_exit(&mut self, _sheet: &mut Stylesheet) -> Result<()> {
        self.session.reset_session();
        Ok(())
    }
}
