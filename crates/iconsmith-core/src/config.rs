//! Per-theme build configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    codepoint::Codepoint,
    error::{CoreError, Result},
    theme::Theme,
};

/// Configuration for one theme build.
///
/// Loaded from JSON (or TOML when the file ends in `.toml`) and validated
/// eagerly, so every missing or malformed key fails before any output is
/// touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the themed source SVGs.
    pub input_directory: PathBuf,

    /// Directory receiving the restyled, codepoint-named SVGs.
    pub output_directory: PathBuf,

    /// Directory receiving the stylesheet, preview page and fonts.
    pub dist_directory: PathBuf,

    /// Font family name.
    pub family: String,

    /// First codepoint to assign, as `U+XXXX`.
    pub codepoint: Codepoint,

    /// Class styles and per-icon overrides.
    pub theme: Theme,

    /// Extra color formats compiled in addition to `color_format`.
    #[serde(default)]
    pub additional_color_formats: Vec<String>,

    #[serde(default = "default_version_major")]
    pub version_major: u32,

    #[serde(default)]
    pub version_minor: u32,

    /// Primary color format handed to the font compiler.
    #[serde(default = "default_color_format")]
    pub color_format: String,

    /// Where font compiler configs are written.
    #[serde(default = "default_tomlcfg_directory")]
    pub tomlcfg_directory: PathBuf,

    /// File name prefix for font compiler configs.
    #[serde(default)]
    pub tomlcfg_prefix: String,

    /// CSS class prefix; also names the stylesheet (`<prefix>.css`).
    #[serde(default = "default_css_prefix")]
    pub css_prefix: String,

    /// Font compiler executable.
    #[serde(default = "default_compiler")]
    pub compiler: String,

    /// Sort input file names before assigning codepoints.
    #[serde(default)]
    pub sort_input: bool,
}

fn default_version_major() -> u32 {
    1
}

fn default_color_format() -> String {
    "glyf_colr_1".to_string()
}

fn default_tomlcfg_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_css_prefix() -> String {
    "vsicon".to_string()
}

fn default_compiler() -> String {
    "nanoemoji".to_string()
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        let config = if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
        .map_err(|e| match e {
            CoreError::Config { message, .. } => CoreError::config_file(path, message),
            other => other,
        })?;

        tracing::debug!(path = %path.display(), family = %config.family, "loaded configuration");
        Ok(config)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CoreError::config_with_source(e.to_string(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| CoreError::config_with_source(e.message().to_string(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.family.trim().is_empty() {
            return Err(CoreError::config("family cannot be empty"));
        }

        for (key, dir) in [
            ("input_directory", &self.input_directory),
            ("output_directory", &self.output_directory),
            ("dist_directory", &self.dist_directory),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(CoreError::config(format!("{key} cannot be empty")));
            }
        }

        // Both directories are wiped before a run, so neither may hold the sources.
        let input = std::path::absolute(&self.input_directory)?;
        for (key, dir) in [
            ("output_directory", &self.output_directory),
            ("dist_directory", &self.dist_directory),
        ] {
            if input.starts_with(std::path::absolute(dir)?) {
                return Err(CoreError::config(format!(
                    "{key} {} must not be or contain input_directory {} (it is wiped on every run)",
                    dir.display(),
                    self.input_directory.display()
                )));
            }
        }

        self.theme.validate()?;

        if self.color_format.trim().is_empty() {
            return Err(CoreError::config("color_format cannot be empty"));
        }

        if self.additional_color_formats.iter().any(|f| f.trim().is_empty()) {
            return Err(CoreError::config(
                "additional_color_formats cannot contain empty entries",
            ));
        }

        if self.css_prefix.trim().is_empty() {
            return Err(CoreError::config("css_prefix cannot be empty"));
        }

        if self.additional_color_formats.contains(&self.color_format) {
            tracing::warn!(
                format = %self.color_format,
                "additional_color_formats repeats the primary color_format"
            );
        }

        Ok(())
    }

    /// Font file name referenced by the stylesheet, e.g. `codicon.ttf`.
    #[must_use]
    pub fn font_file_name(&self) -> String {
        format!("{}.ttf", self.family)
    }

    /// Stylesheet file name in the dist directory, e.g. `vsicon.css`.
    #[must_use]
    pub fn stylesheet_name(&self) -> String {
        format!("{}.css", self.css_prefix)
    }

    /// Path of the font compiler config for a color format.
    #[must_use]
    pub fn tomlcfg_path(&self, color_format: &str) -> PathBuf {
        self.tomlcfg_directory
            .join(format!("{}{color_format}.toml", self.tomlcfg_prefix))
    }
}
