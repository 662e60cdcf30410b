//! CLI command implementations.

pub mod build;
pub mod check;

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use iconsmith_generator::Templates;

/// Template directory used when `--templates` is not given.
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Load templates from `dir`, else `./templates` if present, else the built-in set.
pub fn load_templates(dir: Option<&Path>) -> Result<Templates> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_TEMPLATES_DIR);
            if !default.is_dir() {
                tracing::info!("No templates directory, using built-in templates");
                return Ok(Templates::builtin());
            }
            default
        }
    };

    tracing::info!(dir = %dir.display(), "Loading templates");
    Templates::load(&dir)
        .wrap_err_with(|| format!("Failed to load templates from {}", dir.display()))
}
