//! Text templates with `{PLACEHOLDER}` tokens.
//!
//! Templates are plain CSS and HTML files, so braces appear everywhere. Only
//! tokens made of uppercase letters, digits and underscores whose name is in
//! the context are replaced; every other `{...}` is left as written.

use std::{
    collections::{BTreeSet, HashMap},
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Template loading errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template file could not be read.
    #[error("cannot read template {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// File name of the stylesheet template inside a template directory.
pub const CSS_TEMPLATE_FILE: &str = "vsicon.css";

/// File name of the preview page template inside a template directory.
pub const HTML_TEMPLATE_FILE: &str = "index.html";

/// Placeholder values for one render.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Create context with initial variables.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A named template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    content: String,
}

impl Template {
    /// Create a new template with the given name and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a template from disk; the file name becomes the template name.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| TemplateError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self::new(name, content))
    }

    /// Get the template name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw template text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Placeholder names present in the template.
    #[must_use]
    pub fn placeholders(&self) -> BTreeSet<&str> {
        let mut found = BTreeSet::new();
        let mut rest = self.content.as_str();
        while let Some(open) = rest.find('{') {
            rest = &rest[open + 1..];
            if let Some(name) = token_at(rest) {
                found.insert(name);
            }
        }
        found
    }

    /// Render with `suffix` appended to the template text before substitution.
    #[must_use]
    pub fn render_with_suffix(&self, suffix: &str, context: &TemplateContext) -> String {
        substitute(&format!("{}{suffix}", self.content), context)
    }

    /// Replace every known placeholder in a single pass.
    #[must_use]
    pub fn render(&self, context: &TemplateContext) -> String {
        substitute(&self.content, context)
    }
}

/// The stylesheet and preview page templates, loaded once before any build.
#[derive(Debug, Clone)]
pub struct Templates {
    pub css: Template,
    pub html: Template,
}

impl Templates {
    /// Load `vsicon.css` and `index.html` from a directory.
    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Self {
            css: Template::load(&dir.join(CSS_TEMPLATE_FILE))?,
            html: Template::load(&dir.join(HTML_TEMPLATE_FILE))?,
        })
    }

    /// The templates compiled into the binary.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            css: Template::new(CSS_TEMPLATE_FILE, DEFAULT_CSS_TEMPLATE),
            html: Template::new(HTML_TEMPLATE_FILE, DEFAULT_HTML_TEMPLATE),
        }
    }
}

fn substitute(text: &str, context: &TemplateContext) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match token_at(after).and_then(|name| context.get(name).map(|v| (name, v))) {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// `NAME` if `s` starts with `NAME}` where NAME is `[A-Z0-9_]+`.
fn token_at(s: &str) -> Option<&str> {
    let end = s.find('}')?;
    let name = &s[..end];
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_');
    valid.then_some(name)
}

/// Default stylesheet template.
pub const DEFAULT_CSS_TEMPLATE: &str = r#"@font-face {
    font-family: "{FONT_FAMILY}";
    font-display: block;
    src: url("./{FONT_FILE}") format("truetype");
}

.{CSS_PREFIX}[class*='{CSS_PREFIX}-'] {
    font: normal normal normal 16px/1 "{FONT_FAMILY}";
    display: inline-block;
    text-decoration: none;
    text-rendering: auto;
    text-align: center;
    -webkit-font-smoothing: antialiased;
    -moz-osx-font-smoothing: grayscale;
    user-select: none;
}

"#;

/// Default preview page template.
pub const DEFAULT_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Icon preview</title>
    <link rel="stylesheet" href="{STYLESHEET}">
    <style>
        body { font-family: system-ui, sans-serif; margin: 2rem; }
        #search { width: 100%; padding: .5rem; margin-bottom: 1rem; }
        .icons { display: flex; flex-wrap: wrap; gap: 8px; }
        .icon { width: 120px; text-align: center; padding: 8px; }
        .icon .inner { font-size: 32px; }
        .icon .label { font-size: 12px; word-break: break-word; }
        .icon.hidden { display: none; }
    </style>
</head>
<body>
    <input id="search" type="search" placeholder="Filter icons">
    <div class="icons">
{HTML_ICONS_DIV}
    </div>
    <script>
        const icons = [
{JS_ICON_DESCRIPTION}
        ];
        const search = document.getElementById("search");
        search.addEventListener("input", () => {
            const query = search.value.toLowerCase();
            const visible = new Set(
                icons
                    .filter(i => i.name.toLowerCase().includes(query)
                        || i.description.toLowerCase().includes(query))
                    .map(i => i.name)
            );
            document.querySelectorAll(".icon").forEach(el => {
                el.classList.toggle("hidden", !visible.has(el.dataset.name));
            });
        });
    </script>
</body>
</html>
"#;
