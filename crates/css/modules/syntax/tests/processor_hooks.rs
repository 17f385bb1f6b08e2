#![cfg(test)]

use core::error::Error;

use anyhow::{Result, bail};
use css_syntax::{Declaration, Node, Plugin, Processor, StyleRule, Stylesheet, Warning};
use pretty_assertions::assert_eq;

/// Records hook order, drops `@strip` at-rules and tags every rule with its visit index.
#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
    fail_on: Option<&'static str>,
}

impl Plugin for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn once(&mut self, sheet: &mut Stylesheet, warnings: &mut Vec<Warning>) -> Result<()> {
        let stripped = sheet.take_at_rules("strip");
        self.calls.push(format!("once:{}", stripped.len()));
        warnings.push(Warning {
            plugin: self.name(),
            text: "stripped".to_owned(),
        });
        Ok(())
    }

    fn rule(&mut self, rule: &mut StyleRule) -> Result<()> {
        if self.fail_on == Some(rule.prelude.as_str()) {
            bail!("refusing {}", rule.prelude);
        }
        self.calls.push(format!("rule:{}", rule.prelude));
        let index = self.calls.len().to_string();
        rule.insert_before(0, Declaration::new("--visit", index));
        Ok(())
    }

    fn once_exit(&mut self, _sheet: &mut Stylesheet) -> Result<()> {
        self.calls.push("exit".to_owned());
        Ok(())
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn hooks_run_in_document_order() -> Result<(), Box<dyn Error>> {
    init_logger();
    let mut recorder = Recorder::default();
    let result = {
        let plugins: Vec<&mut dyn Plugin> = vec![&mut recorder];
        Processor::new(plugins).process(
            "@strip x { a: b; } a { color: red; } @media print { @strip; b { color: blue; } }",
        )?
    };
    assert_eq!(recorder.calls, ["once:2", "rule:a", "rule:b", "exit"]);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(
        result.css(),
        "a {\n  --visit: 2;\n  color: red;\n}\n@media print {\n  b {\n    --visit: 3;\n    color: blue;\n  }\n}\n"
    );
    Ok(())
}

#[test]
fn hook_error_aborts_and_names_plugin() {
    init_logger();
    let mut recorder = Recorder {
        fail_on: Some("b"),
        ..Recorder::default()
    };
    let outcome = {
        let plugins: Vec<&mut dyn Plugin> = vec![&mut recorder];
        Processor::new(plugins).process("a {} b {} c {}")
    };
    let message = outcome.err().map(|error| format!("{error:#}"));
    assert_eq!(
        message.as_deref(),
        Some("recorder: rule processing failed: refusing b")
    );
    assert_eq!(recorder.calls, ["once:0", "rule:a"]);
}

#[test]
fn stylesheet_round_trips_through_display() -> Result<(), Box<dyn Error>> {
    let sheet = css_syntax::parse_stylesheet(
        "/* head */ @import url(x.css); div { margin: 0 auto !important; } @font-face { font-family: X; }",
    )?;
    assert!(matches!(&sheet.nodes[0], Node::Comment(text) if text == " head "));
    assert_eq!(
        sheet.to_string(),
        "/* head */\n@import url(x.css);\ndiv {\n  margin: 0 auto !important;\n}\n@font-face {\n  font-family: X;\n}\n"
    );
    Ok(())
}

#[test]
fn unclosed_block_fails_before_any_hook() {
    init_logger();
    let mut recorder = Recorder::default();
    let outcome = {
        let plugins: Vec<&mut dyn Plugin> = vec![&mut recorder];
        Processor::new(plugins).process("a { color: red; }\nb {")
    };
    let message = outcome.err().map(|error| format!("{error:#}"));
    assert_eq!(
        message.as_deref(),
        Some("stylesheet could not be parsed: unclosed block starting at 2:1")
    );
    assert!(recorder.calls.is_empty());
}
