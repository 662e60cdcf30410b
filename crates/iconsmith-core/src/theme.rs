//! Theme definitions: global class styles plus per-icon overrides.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A color theme.
///
/// In configuration files the global class entries and the `overrides` object
/// share one table:
///
/// ```json
/// {
///     "overrides": { "Send": { "cls-1": "fill:#f00" } },
///     "cls-1": "fill:#fff"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Icon name → class name → style declarations.
    #[serde(default)]
    pub overrides: HashMap<String, HashMap<String, String>>,

    /// Class name → style declarations, applied to every icon.
    #[serde(flatten)]
    pub styles: HashMap<String, String>,
}

/// Which theme tier supplied a style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleSource {
    /// Icon-specific override.
    Override,
    /// Theme-wide class style.
    Theme,
}

impl Theme {
    /// Create an empty theme.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a global class style.
    #[must_use]
    pub fn with_style(mut self, class: impl Into<String>, style: impl Into<String>) -> Self {
        self.styles.insert(class.into(), style.into());
        self
    }

    /// Add an icon-specific override.
    #[must_use]
    pub fn with_override(
        mut self,
        icon: impl Into<String>,
        class: impl Into<String>,
        style: impl Into<String>,
    ) -> Self {
        self.overrides
            .entry(icon.into())
            .or_default()
            .insert(class.into(), style.into());
        self
    }

    /// Whether the theme lists overrides for this icon.
    #[must_use]
    pub fn has_overrides(&self, icon: &str) -> bool {
        self.overrides.contains_key(icon)
    }

    /// Reject blank style declarations, naming the class and icon.
    pub fn validate(&self) -> Result<()> {
        if let Some(class) = blank_style(&self.styles) {
            return Err(CoreError::config(format!(
                "theme style for class {class:?} cannot be empty"
            )));
        }
        for (icon, styles) in &self.overrides {
            if let Some(class) = blank_style(styles) {
                return Err(CoreError::config(format!(
                    "theme override for icon {icon:?} class {class:?} cannot be empty"
                )));
            }
        }
        Ok(())
    }

    /// Look up a class for an icon: override first, then the global table.
    #[must_use]
    pub fn lookup(&self, icon: &str, class: &str) -> Option<(&str, StyleSource)> {
        if let Some(style) = self.overrides.get(icon).and_then(|o| o.get(class)) {
            return Some((style.as_str(), StyleSource::Override));
        }
        self.styles
            .get(class)
            .map(|style| (style.as_str(), StyleSource::Theme))
    }
}

fn blank_style(styles: &HashMap<String, String>) -> Option<&str> {
    styles
        .iter()
        .find(|(_, style)| style.trim().is_empty())
        .map(|(class, _)| class.as_str())
}
