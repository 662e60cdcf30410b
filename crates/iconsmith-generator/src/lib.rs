//! iconsmith Generator Library
//!
//! Turns a directory of themed SVG glyphs into codepoint-named SVGs, a
//! stylesheet, a preview page and font compiler configs.
//!
//! # Modules
//!
//! - [`svg`] - Owned SVG document tree
//! - [`style`] - Class to inline-style resolution
//! - [`naming`] - Icon names from file names
//! - [`emitter`] - Per-icon SVG output and fragments
//! - [`template`] - `{PLACEHOLDER}` templates
//! - [`report`] - Stylesheet and preview page
//! - [`preprocess`] - One theme run
//! - [`fontcfg`] - Font compiler configs
//! - [`build`] - Build orchestration

pub mod build;
pub mod emitter;
pub mod fontcfg;
pub mod naming;
pub mod preprocess;
pub mod report;
pub mod style;
pub mod svg;
pub mod template;

pub use build::{BuildError, BuildOutput, BuildStats, Builder};
pub use emitter::{AssetEmitter, IconRecord};
pub use fontcfg::{FontConfig, FontConfigFile};
pub use preprocess::{InputGlyph, PreprocessOutput, Preprocessor, SkipReason, SkippedIcon};
pub use report::{Report, ReportWriter};
pub use style::{EmbeddedStyles, StyleError, StyleResolver};
pub use svg::{Element, SvgDocument, SvgError};
pub use template::{Template, TemplateContext, Templates};
