#![cfg(test)]
//! How two blocks registered under the same key are reconciled.

use core::error::Error;
use css_contains::{Duplication, Options, process};
use pretty_assertions::assert_eq;

/// # Errors
/// Returns an error if the input is rejected.
fn run(css: &str, duplication: Duplication) -> Result<String, Box<dyn Error>> {
    let _ = env_logger::builder().is_test(true).try_init();
    Ok(process(css, Options::new(duplication))?.css())
}

const SINGLE_DUPLICATES: &str = "
    @contains (padding) { margin: 1rem; color: pink; }
    @contains (padding) { color: red; border: 0; }
    div { padding: 0.5rem 1rem; }
";

const PAIR_DUPLICATES_WITH_OVERRIDES: &str = "
    @contains overrides (display: grid) { padding: 1rem; color: red; margin: 0; }
    @contains (display: grid) { margin: 1rem; color: blue; }
    div { margin: 8px; display: grid; }
";

#[test]
fn merge_unions_single_payloads() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        run(SINGLE_DUPLICATES, Duplication::Merge)?,
        "div {\n  padding: 0.5rem 1rem;\n  margin: 1rem;\n  color: red;\n  border: 0;\n}\n"
    );
    Ok(())
}

#[test]
fn replace_keeps_last_single_payload() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        run(SINGLE_DUPLICATES, Duplication::Replace)?,
        "div {\n  padding: 0.5rem 1rem;\n  color: red;\n  border: 0;\n}\n"
    );
    Ok(())
}

#[test]
fn merge_accumulates_overrides() -> Result<(), Box<dyn Error>> {
    let output = run(
        "
        @contains overrides (display: grid) { padding: 1rem; margin: 0; }
        @contains (display: grid) { color: green; }
        div { margin: 8px; display: grid; color: blue; }
        ",
        Duplication::Merge,
    )?;
    assert_eq!(
        output,
        "div {\n  display: grid;\n  padding: 1rem;\n  margin: 0;\n  color: green;\n}\n"
    );
    Ok(())
}

#[test]
fn merge_keeps_first_positions_with_newer_values() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        run(PAIR_DUPLICATES_WITH_OVERRIDES, Duplication::Merge)?,
        "div {\n  display: grid;\n  padding: 1rem;\n  color: blue;\n  margin: 1rem;\n}\n"
    );
    Ok(())
}

#[test]
fn replace_drops_overrides_of_earlier_block() -> Result<(), Box<dyn Error>> {
    assert_eq!(
        run(PAIR_DUPLICATES_WITH_OVERRIDES, Duplication::Replace)?,
        "div {\n  margin: 8px;\n  display: grid;\n  color: blue;\n}\n"
    );
    Ok(())
}

#[test]
fn replace_keeps_last_pair_payload() -> Result<(), Box<dyn Error>> {
    let output = run(
        "
        @contains (display: flex) { margin: 1rem; color: pink; }
        @contains (display: flex) { color: red; border: 0; }
        div { display: flex; }
        ",
        Duplication::Replace,
    )?;
    assert_eq!(output, "div {\n  display: flex;\n  color: red;\n  border: 0;\n}\n");
    Ok(())
}

#[test]
fn pairs_on_different_values_are_not_duplicates() -> Result<(), Box<dyn Error>> {
    let output = run(
        "
        @contains (display: flex) { gap: 1px; }
        @contains (display: grid) { gap: 2px; }
        a { display: flex; }
        b { display: grid; }
        ",
        Duplication::Replace,
    )?;
    assert_eq!(
        output,
        "a {\n  display: flex;\n  gap: 1px;\n}\nb {\n  display: grid;\n  gap: 2px;\n}\n"
    );
    Ok(())
}
