//! Check command - validate configurations and glyphs

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, bail};
use iconsmith_core::Config;
use iconsmith_generator::{Preprocessor, Templates, preprocess::list_inputs};

use super::load_templates;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Parses and restyles every glyph in memory; nothing is written.
pub fn run(config_paths: &[PathBuf], templates_dir: Option<&Path>, strict: bool) -> Result<()> {
    tracing::info!(?config_paths, strict, "Checking configurations and glyphs");

    let mut result = ValidationResult::default();

    println!("Checking templates...");
    let templates = match load_templates(templates_dir) {
        Ok(t) => {
            println!("  ✓ Templates loaded");
            Some(t)
        }
        Err(e) => {
            result.add_error(format!("Template error: {e:#}"));
            println!("  ✗ Templates invalid: {e:#}");
            None
        }
    };

    for config_path in config_paths {
        println!("\nChecking {}...", config_path.display());
        let config = match Config::load(config_path) {
            Ok(c) => {
                println!("  ✓ Configuration valid");
                c
            }
            Err(e) => {
                result.add_error(format!("{}: {e}", config_path.display()));
                println!("  ✗ Configuration invalid: {e}");
                continue;
            }
        };

        if let Some(ref templates) = templates {
            validate_glyphs(&config, templates, &mut result);
        }
    }

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Resolve every glyph of one theme. Skipped glyphs are warnings, unreadable ones errors.
fn validate_glyphs(config: &Config, templates: &Templates, result: &mut ValidationResult) {
    let inputs = match list_inputs(&config.input_directory, config.sort_input) {
        Ok(inputs) => inputs,
        Err(e) => {
            result.add_error(e.to_string());
            println!("  ✗ {e}");
            return;
        }
    };

    if inputs.is_empty() {
        result.add_warning(format!(
            "No SVG files in {}",
            config.input_directory.display()
        ));
        println!("  ⚠ No glyphs found");
        return;
    }

    let preprocessor = Preprocessor::new(config, templates.clone());
    let mut failed = 0;
    for glyph in &inputs {
        match preprocessor.prepare(glyph) {
            Ok(Ok(_)) => {}
            Ok(Err(reason)) => {
                result.add_warning(format!("{}: {reason}", glyph.path.display()));
                failed += 1;
            }
            Err(e) => {
                result.add_error(e.to_string());
                failed += 1;
            }
        }
    }

    let checked = inputs.len();
    if failed == 0 {
        println!("  ✓ All {checked} glyphs resolve");
    } else {
        println!("  ⚠ {failed}/{checked} glyphs would be skipped");
    }
}
