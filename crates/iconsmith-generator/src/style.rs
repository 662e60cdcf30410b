//! Class-to-inline-style resolution.
//!
//! Every `class` attribute in a glyph is replaced by a `style` attribute. The
//! declarations come from the first tier that knows the class:
//!
//! 1. the theme's overrides for this icon,
//! 2. the theme's global class table,
//! 3. the glyph's own `<defs><style>` rules.

use std::{collections::HashMap, sync::LazyLock};

use iconsmith_core::{StyleSource, Theme};
use regex::Regex;
use thiserror::Error;
use tracing::trace;

use crate::svg::{Element, SvgDocument};

static CSS_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid comment regex"));

static CSS_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<selectors>[^{}]+)\{(?P<declarations>[^{}]*)\}").expect("valid rule regex")
});

static CLASS_SELECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\.[-\w]+)+$").expect("valid selector regex"));

/// Style resolution errors.
#[derive(Debug, Error)]
pub enum StyleError {
    /// No tier has declarations for a class used by the icon.
    #[error("icon {icon}: class {class:?} has no override, theme or embedded style")]
    Unresolved { icon: String, class: String },
}

/// Result type for style resolution.
pub type Result<T> = std::result::Result<T, StyleError>;

/// Which tier a resolved style came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Override,
    Theme,
    Embedded,
}

impl From<StyleSource> for Tier {
    fn from(source: StyleSource) -> Self {
        match source {
            StyleSource::Override => Self::Override,
            StyleSource::Theme => Self::Theme,
        }
    }
}

/// Class rules embedded in a glyph's `<defs><style>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddedStyles {
    rules: HashMap<String, String>,
}

impl EmbeddedStyles {
    /// Collect rules from `<style>` children of the root's `<defs>` elements.
    #[must_use]
    pub fn extract(document: &SvgDocument) -> Self {
        let mut styles = Self::default();
        let style_blocks = document
            .root()
            .child_elements()
            .filter(|el| el.local_name() == "defs")
            .flat_map(Element::child_elements)
            .filter(|el| el.local_name() == "style");

        for block in style_blocks {
            styles.add_css(&block.text());
        }
        styles
    }

    /// Parse a stylesheet fragment.
    #[must_use]
    pub fn parse(css: &str) -> Self {
        let mut styles = Self::default();
        styles.add_css(css);
        styles
    }

    /// Add the class rules of a stylesheet fragment.
    ///
    /// `.a, .b.c { fill: red }` applies the declarations to `a`, `b` and `c`.
    /// A class named by several rules accumulates their declarations in order.
    pub fn add_css(&mut self, css: &str) {
        let css = CSS_COMMENT.replace_all(css, "");

        for rule in CSS_RULE.captures_iter(&css) {
            let declarations = rule["declarations"].trim();
            if declarations.is_empty() {
                continue;
            }

            for selector in rule["selectors"].split(',').map(str::trim) {
                if !CLASS_SELECTOR.is_match(selector) {
                    trace!(selector, "ignoring non-class selector");
                    continue;
                }
                for class in selector.split('.').filter(|c| !c.is_empty()) {
                    self.insert(class, declarations);
                }
            }
        }
    }

    fn insert(&mut self, class: &str, declarations: &str) {
        match self.rules.get_mut(class) {
            Some(existing) => {
                if !existing.ends_with(';') {
                    existing.push(';');
                }
                existing.push_str(declarations);
            }
            None => {
                self.rules.insert(class.to_string(), declarations.to_string());
            }
        }
    }

    /// Declarations for a class.
    #[must_use]
    pub fn get(&self, class: &str) -> Option<&str> {
        self.rules.get(class).map(String::as_str)
    }

    /// Number of classes with declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no class rules were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Per-run summary of where resolved styles came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub overrides: usize,
    pub theme: usize,
    pub embedded: usize,
}

impl ResolveStats {
    fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Override => self.overrides += 1,
            Tier::Theme => self.theme += 1,
            Tier::Embedded => self.embedded += 1,
        }
    }

    /// Total number of elements restyled.
    #[must_use]
    pub fn total(&self) -> usize {
        self.overrides + self.theme + self.embedded
    }
}

/// Rewrites class attributes into inline styles for one theme.
#[derive(Debug, Clone, Copy)]
pub struct StyleResolver<'a> {
    theme: &'a Theme,
}

impl<'a> StyleResolver<'a> {
    /// Create a resolver for a theme.
    #[must_use]
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    /// Resolve every classed element of `document` for the icon `icon`.
    ///
    /// On error the partially rewritten document is dropped.
    pub fn resolve(&self, mut document: SvgDocument, icon: &str) -> Result<SvgDocument> {
        self.resolve_in_place(&mut document, icon)?;
        Ok(document)
    }

    /// Resolve in place and report which tiers were used.
    pub fn resolve_in_place(&self, document: &mut SvgDocument, icon: &str) -> Result<ResolveStats> {
        let embedded = EmbeddedStyles::extract(document);
        let mut stats = ResolveStats::default();
        self.visit(document.root_mut(), icon, &embedded, &mut stats)?;

        trace!(
            icon,
            overrides = stats.overrides,
            theme = stats.theme,
            embedded = stats.embedded,
            "resolved styles"
        );
        Ok(stats)
    }

    /// Look up a class without touching any document.
    #[must_use]
    pub fn lookup<'s>(
        &'s self,
        icon: &str,
        class: &str,
        embedded: &'s EmbeddedStyles,
    ) -> Option<(&'s str, Tier)> {
        self.theme
            .lookup(icon, class)
            .map(|(style, source)| (style, Tier::from(source)))
            .or_else(|| embedded.get(class).map(|style| (style, Tier::Embedded)))
    }

    fn visit(
        &self,
        element: &mut Element,
        icon: &str,
        embedded: &EmbeddedStyles,
        stats: &mut ResolveStats,
    ) -> Result<()> {
        if let Some(class) = element.remove_attribute("class") {
            let class = class.trim();
            let (style, tier) =
                self.lookup(icon, class, embedded)
                    .ok_or_else(|| StyleError::Unresolved {
                        icon: icon.to_string(),
                        class: class.to_string(),
                    })?;
            element.set_attribute("style", style);
            stats.record(tier);
        }

        for child in element.child_elements_mut() {
            self.visit(child, icon, embedded, stats)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(body: &str) -> SvgDocument {
        SvgDocument::parse(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16">{body}</svg>"#
        ))
        .unwrap()
    }

    fn classes_left(document: &SvgDocument) -> usize {
        let mut count = 0;
        document.root().walk(&mut |el: &Element| {
            if el.attribute("class").is_some() {
                count += 1;
            }
        });
        count
    }

    #[test]
    fn test_parse_embedded_rules() {
        let styles = EmbeddedStyles::parse(
            ".canvas{fill:none;opacity:0;}\n.cls-1 { fill: #212121 }\n.cls-2,.cls-3{opacity:0.75;}",
        );

        assert_eq!(styles.len(), 4);
        assert_eq!(styles.get("canvas"), Some("fill:none;opacity:0;"));
        assert_eq!(styles.get("cls-1"), Some("fill: #212121"));
        assert_eq!(styles.get("cls-2"), Some("opacity:0.75;"));
        assert_eq!(styles.get("cls-3"), Some("opacity:0.75;"));
    }

    #[test]
    fn test_compound_selector_applies_to_each_class() {
        let styles = EmbeddedStyles::parse(".light-blue.cls-9{fill:#005dba}");
        assert_eq!(styles.get("light-blue"), Some("fill:#005dba"));
        assert_eq!(styles.get("cls-9"), Some("fill:#005dba"));
        assert_eq!(styles.get("light-blue.cls-9"), None);
    }

    #[test]
    fn test_repeated_class_accumulates() {
        let styles = EmbeddedStyles::parse(".a,.b{fill:red}.a{opacity:.5}");
        assert_eq!(styles.get("a"), Some("fill:red;opacity:.5"));
        assert_eq!(styles.get("b"), Some("fill:red"));
    }

    #[test]
    fn test_ignores_comments_empty_rules_and_other_selectors() {
        let styles = EmbeddedStyles::parse(
            "/* .x{fill:red} */ path{fill:blue} .y{} #id{fill:green} .z > .w{fill:black} .ok{fill:#fff}",
        );
        assert_eq!(styles.len(), 1);
        assert_eq!(styles.get("ok"), Some("fill:#fff"));
    }

    #[test]
    fn test_extract_only_reads_defs_style() {
        let doc = glyph(
            "<defs><style>.a{fill:red}</style></defs><g><style>.b{fill:blue}</style></g>",
        );
        let styles = EmbeddedStyles::extract(&doc);
        assert_eq!(styles.get("a"), Some("fill:red"));
        assert_eq!(styles.get("b"), None);
    }

    #[test]
    fn test_extract_without_defs_is_empty() {
        let doc = glyph(r#"<path d="M0 0"/>"#);
        assert!(EmbeddedStyles::extract(&doc).is_empty());
    }

    #[test]
    fn test_theme_beats_embedded_default() {
        let theme = Theme::new().with_style("cls-1", "fill:#fff");
        let doc = glyph(r#"<defs><style>.cls-1{fill:#000}</style></defs><path class="cls-1"/>"#);

        let doc = StyleResolver::new(&theme).resolve(doc, "Send").unwrap();
        let path = doc.root().child_elements().nth(1).unwrap();

        assert_eq!(path.attribute("style"), Some("fill:#fff"));
        assert_eq!(path.attribute("class"), None);
    }

    #[test]
    fn test_override_wins_only_for_its_icon() {
        let theme = Theme::new()
            .with_style("cls-1", "fill:#fff")
            .with_override("Send", "cls-1", "fill:#f00");
        let resolver = StyleResolver::new(&theme);
        let body = r#"<path class="cls-1"/>"#;

        let send = resolver.resolve(glyph(body), "Send").unwrap();
        let copy = resolver.resolve(glyph(body), "Copy").unwrap();

        let style = |doc: &SvgDocument| {
            doc.root()
                .child_elements()
                .next()
                .and_then(|el| el.attribute("style"))
                .map(str::to_string)
        };
        assert_eq!(style(&send).as_deref(), Some("fill:#f00"));
        assert_eq!(style(&copy).as_deref(), Some("fill:#fff"));
    }

    #[test]
    fn test_falls_back_to_embedded_default() {
        let theme = Theme::new();
        let mut doc = glyph(
            r#"<defs><style>.canvas{fill:none;opacity:0;}</style></defs><rect class="canvas"/>"#,
        );

        let stats = StyleResolver::new(&theme)
            .resolve_in_place(&mut doc, "Add")
            .unwrap();
        let rect = doc.root().child_elements().nth(1).unwrap();

        assert_eq!(rect.attribute("style"), Some("fill:none;opacity:0;"));
        assert_eq!(stats.embedded, 1);
        assert_eq!(stats.total(), 1);
    }

    #[test]
    fn test_unresolved_class_is_an_error() {
        let theme = Theme::new().with_style("cls-1", "fill:#fff");
        let doc = glyph(r#"<path class="cls-2"/>"#);

        let err = StyleResolver::new(&theme).resolve(doc, "Copy").unwrap_err();
        let StyleError::Unresolved { icon, class } = err;
        assert_eq!(icon, "Copy");
        assert_eq!(class, "cls-2");
    }

    #[test]
    fn test_nested_elements_and_root_are_resolved() {
        let theme = Theme::new()
            .with_style("root", "fill:none")
            .with_style("cls-1", "fill:#fff")
            .with_style("cls-2", "opacity:.5");
        let mut doc = SvgDocument::parse(
            r#"<svg class="root"><g class="cls-1"><g><path class="cls-2" d="M0 0"/></g></g><circle r="1"/></svg>"#,
        )
        .unwrap();

        let stats = StyleResolver::new(&theme)
            .resolve_in_place(&mut doc, "Nested")
            .unwrap();

        assert_eq!(stats.theme, 3);
        assert_eq!(classes_left(&doc), 0);
        assert_eq!(doc.root().attribute("style"), Some("fill:none"));

        let circle = doc.root().child_elements().nth(1).unwrap();
        assert_eq!(circle.attributes(), &[("r".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_existing_style_is_replaced() {
        let theme = Theme::new().with_style("cls-1", "fill:#fff");
        let doc = glyph(r#"<path class="cls-1" style="fill:#123"/>"#);

        let doc = StyleResolver::new(&theme).resolve(doc, "X").unwrap();
        let path = doc.root().child_elements().next().unwrap();
        assert_eq!(path.attribute("style"), Some("fill:#fff"));
        assert_eq!(path.attributes().len(), 1);
    }
}
