//! Final stylesheet and preview page.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use iconsmith_core::Config;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    emitter::IconRecord,
    template::{Template, TemplateContext, Templates},
};

/// Report writing errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing an output file failed.
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for report writing.
pub type Result<T> = std::result::Result<T, ReportError>;

pub const FONT_FAMILY: &str = "FONT_FAMILY";
pub const FONT_FILE: &str = "FONT_FILE";
pub const HTML_ICONS_DIV: &str = "HTML_ICONS_DIV";
pub const JS_ICON_DESCRIPTION: &str = "JS_ICON_DESCRIPTION";
pub const CSS_PREFIX: &str = "CSS_PREFIX";
pub const STYLESHEET: &str = "STYLESHEET";

/// Preview page file name.
pub const PREVIEW_FILE: &str = "index.html";

/// Paths of the written report files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub stylesheet: PathBuf,
    pub preview: PathBuf,
}

/// Substitutes accumulated icon fragments into the templates.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    templates: Templates,
    family: String,
    font_file: String,
    css_prefix: String,
    stylesheet_name: String,
}

impl ReportWriter {
    /// Create a writer for one theme.
    #[must_use]
    pub fn new(templates: Templates, config: &Config) -> Self {
        warn_missing(&templates.css, &[FONT_FAMILY, FONT_FILE]);
        warn_missing(&templates.html, &[HTML_ICONS_DIV, JS_ICON_DESCRIPTION]);

        Self {
            templates,
            family: config.family.clone(),
            font_file: config.font_file_name(),
            css_prefix: config.css_prefix.clone(),
            stylesheet_name: config.stylesheet_name(),
        }
    }

    fn base_context(&self) -> TemplateContext {
        TemplateContext::new()
            .with_var(FONT_FAMILY, &self.family)
            .with_var(FONT_FILE, &self.font_file)
            .with_var(CSS_PREFIX, &self.css_prefix)
            .with_var(STYLESHEET, &self.stylesheet_name)
    }

    /// CSS template followed by one rule per icon.
    #[must_use]
    pub fn render_css(&self, icons: &[IconRecord]) -> String {
        let rules = icons
            .iter()
            .map(|icon| icon.css_rule.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.templates
            .css
            .render_with_suffix(&rules, &self.base_context())
    }

    /// HTML template with the icon blocks and description records.
    #[must_use]
    pub fn render_html(&self, icons: &[IconRecord]) -> String {
        let blocks = icons
            .iter()
            .map(|icon| icon.html_fragment.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let descriptions = icons
            .iter()
            .map(|icon| icon.description_entry.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let context = self
            .base_context()
            .with_var(HTML_ICONS_DIV, blocks)
            .with_var(JS_ICON_DESCRIPTION, descriptions);
        self.templates.html.render(&context)
    }

    /// Write the stylesheet and preview page into `dist_dir`.
    pub fn write(&self, icons: &[IconRecord], dist_dir: &Path) -> Result<Report> {
        let stylesheet = dist_dir.join(&self.stylesheet_name);
        let preview = dist_dir.join(PREVIEW_FILE);

        write_whole(&stylesheet, &self.render_css(icons))?;
        write_whole(&preview, &self.render_html(icons))?;

        info!(
            icons = icons.len(),
            stylesheet = %stylesheet.display(),
            preview = %preview.display(),
            "wrote report"
        );

        Ok(Report {
            stylesheet,
            preview,
        })
    }
}

fn warn_missing(template: &Template, required: &[&str]) {
    let present = template.placeholders();
    for name in required {
        if !present.contains(name) {
            warn!(template = template.name(), placeholder = name, "template lacks placeholder");
        }
    }
}

/// Write to a sibling temp file, then rename over the target.
fn write_whole(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    let mut file = fs::File::create(&tmp).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);

    fs::rename(&tmp, path).map_err(write_err)
}
