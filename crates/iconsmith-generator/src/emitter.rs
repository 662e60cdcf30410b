//! Per-icon output: the codepoint-named SVG plus its CSS and HTML fragments.

use std::path::{Path, PathBuf};

use iconsmith_core::Codepoint;
use thiserror::Error;
use tracing::debug;

use crate::{
    naming::display_name,
    svg::{SvgDocument, SvgError},
};

/// Emission errors.
#[derive(Debug, Error)]
pub enum EmitError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("failed to write {path}: {source}")]
    Svg {
        path: PathBuf,
        #[source]
        source: SvgError,
    },
}

/// Result type for emission.
pub type Result<T> = std::result::Result<T, EmitError>;

/// Everything produced for one icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRecord {
    /// Icon name, e.g. `Foo_Bar`.
    pub name: String,

    /// Label for the preview page, e.g. `Foo Bar`.
    pub display_name: String,

    /// Assigned codepoint.
    pub codepoint: Codepoint,

    /// Absolute path of the restyled SVG.
    pub output: PathBuf,

    /// Stylesheet rule mapping the class to the glyph.
    pub css_rule: String,

    /// Preview page block.
    pub html_fragment: String,

    /// Record for the preview page's search script.
    pub description_entry: String,
}

/// Writes restyled glyphs and accumulates their fragments in processing order.
#[derive(Debug)]
pub struct AssetEmitter {
    output_dir: PathBuf,
    css_prefix: String,
    icons: Vec<IconRecord>,
}

impl AssetEmitter {
    /// Create an emitter writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, css_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            css_prefix: css_prefix.into(),
            icons: Vec::new(),
        }
    }

    /// Write `<output_dir>/<hex>.svg` and record the icon's fragments.
    ///
    /// Returns the absolute path of the written file.
    pub fn emit(
        &mut self,
        document: &SvgDocument,
        name: &str,
        codepoint: Codepoint,
    ) -> Result<PathBuf> {
        let path = self.output_dir.join(codepoint.file_name());
        document.write(&path).map_err(|source| EmitError::Svg {
            path: path.clone(),
            source,
        })?;
        let output = std::path::absolute(&path)?;

        let display = display_name(name);
        let record = IconRecord {
            css_rule: css_rule(&self.css_prefix, name, codepoint),
            html_fragment: html_fragment(&self.css_prefix, name, &display),
            description_entry: description_entry(name, &display),
            name: name.to_string(),
            display_name: display,
            codepoint,
            output: output.clone(),
        };

        debug!(icon = name, codepoint = %codepoint, path = %path.display(), "emitted glyph");

        self.icons.push(record);
        Ok(output)
    }

    /// The output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Emitted icons in processing order.
    #[must_use]
    pub fn icons(&self) -> &[IconRecord] {
        &self.icons
    }

    /// Consume the emitter, returning the emitted icons.
    #[must_use]
    pub fn into_icons(self) -> Vec<IconRecord> {
        self.icons
    }
}

/// `.vsicon-Send:before { content: "\f000" }`
#[must_use]
pub fn css_rule(prefix: &str, name: &str, codepoint: Codepoint) -> String {
    format!(
        ".{prefix}-{}:before {{ content: \"{}\" }}",
        escape_css_ident(name),
        codepoint.css_escape()
    )
}

/// Escape a name for use after the `prefix-` part of a class selector.
///
/// ASCII punctuation and spaces get a backslash, control characters a hex
/// escape. Letters, digits, `_`, `-` and non-ASCII characters pass through.
#[must_use]
pub fn escape_css_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' => out.push(c),
            c if c.is_ascii_control() => out.push_str(&format!("\\{:x} ", c as u32)),
            c if c.is_ascii() => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

/// Whether `name` changes under [`escape_css_ident`].
#[must_use]
pub fn needs_css_escape(name: &str) -> bool {
    name.chars()
        .any(|c| c.is_ascii() && !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
}

/// Preview block referencing the icon's class.
#[must_use]
pub fn html_fragment(prefix: &str, name: &str, display: &str) -> String {
    let name = escape_html(name);
    let display = escape_html(display);
    format!(
        r#"
        <div class="icon" data-name="{name}" title="{name}">
            <span class="inner">
                <i class="{prefix} {prefix}-{name}" aria-hidden="true"></i>
            </span>
            <br>
            <span class='label'>{display}</span>
            <span class='description'></span>
        </div>"#
    )
}

/// Object literal consumed by the preview page's filter script.
#[must_use]
pub fn description_entry(name: &str, display: &str) -> String {
    let name = serde_json::Value::String(name.to_string());
    let display = serde_json::Value::String(display.to_string());
    format!(
        "\t{{
            name: {name},
            description: {display}
        }},"
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
