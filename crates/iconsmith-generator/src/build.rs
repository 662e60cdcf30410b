//! Build orchestration.
//!
//! Runs the preprocessor for one theme, writes the font compiler configs and
//! invokes the compiler once per color format.

use std::{
    path::PathBuf,
    process::{Command, ExitStatus},
    time::Instant,
};

use iconsmith_core::Config;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    fontcfg::{self, FontConfigError, FontConfigFile},
    preprocess::{PreprocessError, PreprocessOutput, Preprocessor},
    template::Templates,
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Preprocessing error.
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    /// Font config generation error.
    #[error("font config error: {0}")]
    FontConfig(#[from] FontConfigError),

    /// The font compiler could not be started.
    #[error("cannot run {tool} for {}: {source}", .config.display())]
    Spawn {
        tool: String,
        config: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The font compiler exited unsuccessfully.
    #[error("{tool} failed for {} ({status})", .config.display())]
    ExternalTool {
        tool: String,
        config: PathBuf,
        status: ExitStatus,
    },
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of glyphs emitted.
    pub icons: usize,

    /// Number of glyphs skipped with a diagnostic.
    pub skipped: usize,

    /// Number of font compiler configs written.
    pub font_configs: usize,

    /// Number of fonts compiled.
    pub fonts: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Everything a build produced.
#[derive(Debug)]
pub struct BuildOutput {
    pub stats: BuildStats,
    pub preprocess: PreprocessOutput,
    pub font_configs: Vec<FontConfigFile>,
}

/// Theme builder.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    templates: Templates,
    compile: bool,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(config: Config, templates: Templates) -> Self {
        Self {
            config,
            templates,
            compile: true,
        }
    }

    /// Skip the font compiler; configs are still written.
    #[must_use]
    pub fn with_compile(mut self, compile: bool) -> Self {
        self.compile = compile;
        self
    }

    /// The configuration this builder runs.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute the full build.
    pub fn build(&self) -> Result<BuildOutput> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(family = %self.config.family, compile = self.compile, "starting build");

        let preprocess = Preprocessor::new(&self.config, self.templates.clone()).run()?;
        stats.icons = preprocess.icons.len();
        stats.skipped = preprocess.skipped.len();

        let font_configs = fontcfg::write_all(&self.config, &preprocess.outputs)?;
        stats.font_configs = font_configs.len();

        if self.compile {
            for font_config in &font_configs {
                self.compile_font(font_config)?;
                stats.fonts += 1;
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            icons = stats.icons,
            skipped = stats.skipped,
            font_configs = stats.font_configs,
            fonts = stats.fonts,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(BuildOutput {
            stats,
            preprocess,
            font_configs,
        })
    }

    fn compile_font(&self, font_config: &FontConfigFile) -> Result<()> {
        let tool = &self.config.compiler;
        debug!(tool = %tool, config = %font_config.path.display(), "running font compiler");

        let status = Command::new(tool)
            .arg(&font_config.path)
            .status()
            .map_err(|source| BuildError::Spawn {
                tool: tool.clone(),
                config: font_config.path.clone(),
                source,
            })?;

        if !status.success() {
            return Err(BuildError::ExternalTool {
                tool: tool.clone(),
                config: font_config.path.clone(),
                status,
            });
        }

        info!(
            format = %font_config.color_format,
            font = %font_config.font.display(),
            "compiled font"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use tempfile::TempDir;

    use super::*;

    fn config(root: &Path, compiler: &str) -> Config {
        let json = format!(
            r#"{{
                "input_directory": "{0}/in",
                "output_directory": "{0}/out",
                "dist_directory": "{0}/dist",
                "tomlcfg_directory": "{0}/cfg",
                "family": "codicon",
                "codepoint": "U+f000",
                "compiler": "{compiler}",
                "theme": {{ "cls-1": "fill:#fff" }}
            }}"#,
            root.display()
        );
        Config::from_json_str(&json).unwrap()
    }

    fn seed(root: &Path) {
        fs::create_dir_all(root.join("in")).unwrap();
        fs::write(
            root.join("in/Send.svg"),
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path class="cls-1"/></svg>"#,
        )
        .unwrap();
    }

    #[test]
    fn test_build_without_compile() {
        let dir = TempDir::new().unwrap();
        seed(dir.path());

        let output = Builder::new(config(dir.path(), "nanoemoji"), Templates::builtin())
            .with_compile(false)
            .build()
            .unwrap();

        assert_eq!(output.stats.icons, 1);
        assert_eq!(output.stats.font_configs, 1);
        assert_eq!(output.stats.fonts, 0);
        assert!(dir.path().join("cfg/glyf_colr_1.toml").exists());
        assert!(dir.path().join("dist/vsicon.css").exists());
    }

    #[test]
    fn test_missing_compiler_is_reported() {
        let dir = TempDir::new().unwrap();
        seed(dir.path());

        let err = Builder::new(
            config(dir.path(), "iconsmith-no-such-compiler"),
            Templates::builtin(),
        )
        .build()
        .unwrap_err();

        assert!(matches!(err, BuildError::Spawn { .. }));
        assert!(err.to_string().contains("iconsmith-no-such-compiler"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_compiler_is_reported() {
        let dir = TempDir::new().unwrap();
        seed(dir.path());

        let err = Builder::new(config(dir.path(), "false"), Templates::builtin())
            .build()
            .unwrap_err();

        assert!(matches!(err, BuildError::ExternalTool { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_compiler_counts_fonts() {
        let dir = TempDir::new().unwrap();
        seed(dir.path());

        let output = Builder::new(config(dir.path(), "true"), Templates::builtin())
            .build()
            .unwrap();

        assert_eq!(output.stats.fonts, 1);
    }
}
