//! One theme run: restyle every glyph, assign codepoints, write the report.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use iconsmith_core::{CodepointAllocator, Config, CoreError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    emitter::{AssetEmitter, EmitError, IconRecord, needs_css_escape},
    naming::icon_name,
    report::{Report, ReportError, ReportWriter},
    style::{StyleError, StyleResolver},
    svg::{SvgDocument, SvgError},
    template::Templates,
};

/// Fatal preprocessing errors. Per-icon problems are reported as [`SkippedIcon`].
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// Configuration error, including codepoint exhaustion.
    #[error(transparent)]
    Config(#[from] CoreError),

    /// A glyph file could not be read.
    #[error("cannot read glyph {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be read, removed or created.
    #[error("cannot prepare directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a glyph failed.
    #[error("emit error: {0}")]
    Emit(#[from] EmitError),

    /// Writing the stylesheet or preview page failed.
    #[error("report error: {0}")]
    Report(#[from] ReportError),
}

/// Result type for preprocessing.
pub type Result<T> = std::result::Result<T, PreprocessError>;

/// Why an icon was left out of the run.
#[derive(Debug, Error)]
pub enum SkipReason {
    /// Not well-formed SVG.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// A class had no style in any tier.
    #[error("{0}")]
    Unresolved(#[from] StyleError),
}

/// A glyph that was skipped, with its diagnostic.
#[derive(Debug)]
pub struct SkippedIcon {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// A candidate glyph file in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputGlyph {
    /// Derived icon name, e.g. `Foo_Bar` for `Foo.Bar.svg`.
    pub name: String,
    pub path: PathBuf,
}

/// Everything a run produced.
#[derive(Debug)]
pub struct PreprocessOutput {
    /// Emitted icons in codepoint order.
    pub icons: Vec<IconRecord>,

    /// Absolute SVG paths in processing order, for the font compiler.
    pub outputs: Vec<PathBuf>,

    pub skipped: Vec<SkippedIcon>,

    pub report: Report,

    pub duration_ms: u64,
}

/// List `.svg` files in `dir`.
///
/// Entries come in `read_dir` order unless `sort` is set, in which case they
/// are ordered by file name.
pub fn list_inputs(dir: &Path, sort: bool) -> Result<Vec<InputGlyph>> {
    let dir_err = |source| PreprocessError::Directory {
        path: dir.to_path_buf(),
        source,
    };

    let mut glyphs = Vec::new();
    for entry in fs::read_dir(dir).map_err(dir_err)? {
        let entry = entry.map_err(dir_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            warn!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };
        if let Some(name) = icon_name(&file_name) {
            if needs_css_escape(&name) {
                warn!(icon = %name, path = %path.display(), "icon name is escaped in the stylesheet; the preview class may not match");
            }
            glyphs.push(InputGlyph { name, path });
        }
    }

    if sort {
        glyphs.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    }
    Ok(glyphs)
}

/// Runs the style resolver, allocator, emitter and report writer for one theme.
#[derive(Debug)]
pub struct Preprocessor<'a> {
    config: &'a Config,
    writer: ReportWriter,
}

impl<'a> Preprocessor<'a> {
    /// Create a preprocessor. Templates are read-only for the whole run.
    #[must_use]
    pub fn new(config: &'a Config, templates: Templates) -> Self {
        Self {
            writer: ReportWriter::new(templates, config),
            config,
        }
    }

    /// Read, parse and restyle one glyph without writing anything.
    ///
    /// The outer error is fatal; the inner one means the glyph is skipped.
    pub fn prepare(
        &self,
        glyph: &InputGlyph,
    ) -> Result<std::result::Result<SvgDocument, SkipReason>> {
        let bytes = fs::read(&glyph.path).map_err(|source| PreprocessError::Read {
            path: glyph.path.clone(),
            source,
        })?;
        let restyled = match String::from_utf8(bytes) {
            Ok(source) => self.restyle(&source, &glyph.name),
            Err(e) => Err(SkipReason::Malformed(format!("not UTF-8: {e}"))),
        };
        Ok(restyled)
    }

    /// Parse and restyle glyph source text for the icon `name`.
    pub fn restyle(&self, source: &str, name: &str) -> std::result::Result<SvgDocument, SkipReason> {
        let document = SvgDocument::parse(source).map_err(|e| match e {
            SvgError::Malformed(message) => SkipReason::Malformed(message),
            SvgError::Io(e) => SkipReason::Malformed(e.to_string()),
        })?;
        Ok(StyleResolver::new(&self.config.theme).resolve(document, name)?)
    }

    /// Execute the run.
    ///
    /// The output and dist directories are wiped first; nothing from an
    /// earlier run survives.
    pub fn run(&self) -> Result<PreprocessOutput> {
        let start = Instant::now();
        let config = self.config;

        info!(
            input = %config.input_directory.display(),
            output = %config.output_directory.display(),
            dist = %config.dist_directory.display(),
            base = %config.codepoint,
            "starting preprocess"
        );

        let inputs = list_inputs(&config.input_directory, config.sort_input)?;
        debug!(count = inputs.len(), sorted = config.sort_input, "found glyphs");

        reset_dir(&config.output_directory)?;
        reset_dir(&config.dist_directory)?;

        let mut allocator = CodepointAllocator::new(config.codepoint);
        let mut emitter = AssetEmitter::new(&config.output_directory, &config.css_prefix);
        let mut outputs = Vec::with_capacity(inputs.len());
        let mut skipped = Vec::new();

        for glyph in &inputs {
            let document = match self.prepare(glyph)? {
                Ok(document) => document,
                Err(reason) => {
                    warn!(file = %glyph.path.display(), error = %reason, "skipping icon");
                    skipped.push(SkippedIcon {
                        path: glyph.path.clone(),
                        reason,
                    });
                    continue;
                }
            };

            let codepoint = allocator.next()?;
            outputs.push(emitter.emit(&document, &glyph.name, codepoint)?);
        }

        let icons = emitter.into_icons();
        let report = self.writer.write(&icons, &config.dist_directory)?;
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            icons = icons.len(),
            skipped = skipped.len(),
            duration_ms,
            "preprocess complete"
        );

        Ok(PreprocessOutput {
            icons,
            outputs,
            skipped,
            report,
            duration_ms,
        })
    }
}

fn reset_dir(path: &Path) -> Result<()> {
    let dir_err = |source| PreprocessError::Directory {
        path: path.to_path_buf(),
        source,
    };

    if path.exists() {
        debug!(dir = %path.display(), "cleaning directory");
        fs::remove_dir_all(path).map_err(dir_err)?;
    }
    fs::create_dir_all(path).map_err(dir_err)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_list_inputs_filters_and_derives_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Foo.Bar.svg"), "<svg/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("Upper.SVG"), "<svg/>").unwrap();
        fs::create_dir(dir.path().join("nested.svg")).unwrap();

        let inputs = list_inputs(dir.path(), false).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].name, "Foo_Bar");
    }

    #[test]
    fn test_list_inputs_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["c.svg", "a.svg", "b.svg"] {
            fs::write(dir.path().join(name), "<svg/>").unwrap();
        }

        let names: Vec<_> = list_inputs(dir.path(), true)
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_list_inputs_missing_dir() {
        let err = list_inputs(Path::new("/nonexistent/icons"), false).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/icons"));
    }

    #[test]
    fn test_reset_dir_removes_stale_files() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out");
        fs::create_dir_all(target.join("sub")).unwrap();
        fs::write(target.join("stale.svg"), "old").unwrap();

        reset_dir(&target).unwrap();

        assert!(target.is_dir());
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    fn config(root: &Path) -> Config {
        Config::from_json_str(&format!(
            r#"{{
                "input_directory": "{0}/in",
                "output_directory": "{0}/out",
                "dist_directory": "{0}/dist",
                "family": "codicon",
                "codepoint": "U+f000",
                "theme": {{ "cls-1": "fill:#fff" }}
            }}"#,
            root.display()
        ))
        .unwrap()
    }

    #[test]
    fn test_prepare_vanished_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        let preprocessor = Preprocessor::new(&cfg, Templates::builtin());
        let glyph = InputGlyph {
            name: "Send".into(),
            path: dir.path().join("in/Send.svg"),
        };

        let err = preprocessor.prepare(&glyph).unwrap_err();
        assert!(matches!(err, PreprocessError::Read { .. }));
        assert!(err.to_string().contains("Send.svg"));
    }

    #[test]
    fn test_prepare_skips_bad_content() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("in")).unwrap();
        fs::write(dir.path().join("in/Bad.svg"), "<svg><g></svg>").unwrap();
        fs::write(dir.path().join("in/Binary.svg"), [0xff, 0xfe, 0x00]).unwrap();
        let cfg = config(dir.path());
        let preprocessor = Preprocessor::new(&cfg, Templates::builtin());

        for name in ["Bad", "Binary"] {
            let glyph = InputGlyph {
                name: name.into(),
                path: dir.path().join(format!("in/{name}.svg")),
            };
            let reason = preprocessor.prepare(&glyph).unwrap().unwrap_err();
            assert!(matches!(reason, SkipReason::Malformed(_)), "{name}: {reason}");
        }
    }

    #[test]
    fn test_restyle_in_memory() {
        let dir = TempDir::new().unwrap();
        let cfg = config(dir.path());
        let preprocessor = Preprocessor::new(&cfg, Templates::builtin());

        let doc = preprocessor
            .restyle(r#"<svg><path class="cls-1"/></svg>"#, "Send")
            .unwrap();
        let path = doc.root().child_elements().next().unwrap();
        assert_eq!(path.attribute("style"), Some("fill:#fff"));
    }

    #[test]
    fn test_skip_reason_messages() {
        let malformed = SkipReason::Malformed("unclosed element <svg>".into());
        assert!(malformed.to_string().contains("malformed input"));

        let unresolved = SkipReason::from(StyleError::Unresolved {
            icon: "Copy".into(),
            class: "cls-2".into(),
        });
        assert!(unresolved.to_string().contains("cls-2"));
    }
}
