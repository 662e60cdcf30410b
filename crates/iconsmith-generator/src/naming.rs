//! Icon names derived from glyph file names.

use std::sync::LazyLock;

use regex::Regex;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^A-Z]+|[A-Z][^A-Z]*").expect("valid word regex"));

/// Extension a glyph file must carry.
pub const SVG_EXTENSION: &str = ".svg";

/// Derive the icon name from a glyph file name.
///
/// The `.svg` suffix is stripped and every remaining `.` becomes `_`, so
/// `Foo.Bar.svg` is `Foo_Bar`. The result is the CSS class suffix and the key
/// for theme overrides. Returns `None` for non-SVG or empty names.
#[must_use]
pub fn icon_name(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(SVG_EXTENSION)?;
    if stem.is_empty() {
        return None;
    }
    Some(stem.replace('.', "_"))
}

/// Human-readable label: the name split at capital letters.
///
/// `ArrowSmallUp` → `Arrow Small Up`, `Debug_Alt` → `Debug Alt`.
#[must_use]
pub fn display_name(icon_name: &str) -> String {
    WORD.find_iter(icon_name)
        .map(|word| word.as_str().trim_matches(|c| c == '_' || c == '-'))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
