//! Font compiler configuration files.
//!
//! One TOML file per color format, in the layout `nanoemoji` reads.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use iconsmith_core::Config;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Font config errors.
#[derive(Debug, Error)]
pub enum FontConfigError {
    /// IO error.
    #[error("cannot write font config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML serialization error.
    #[error("cannot serialize font config: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Result type for font config generation.
pub type Result<T> = std::result::Result<T, FontConfigError>;

const CLIPBOX_QUANTIZATION: u32 = 32;
const DEFAULT_WEIGHT: u32 = 400;

/// Compiler configuration for one color format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontConfig {
    pub family: String,
    pub output_file: PathBuf,
    pub version_major: u32,
    pub version_minor: u32,
    pub color_format: String,
    pub clipbox_quantization: u32,
    pub axis: BTreeMap<String, Axis>,
    pub master: BTreeMap<String, Master>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub name: String,
    pub default: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Master {
    pub style_name: String,
    pub srcs: Vec<PathBuf>,
    pub position: BTreeMap<String, u32>,
}

/// A written compiler config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontConfigFile {
    pub color_format: String,
    /// Absolute path of the TOML file.
    pub path: PathBuf,
    /// Absolute path of the font the compiler will produce.
    pub font: PathBuf,
}

impl FontConfig {
    /// Build the config for `format`, or for the primary `color_format` when `None`.
    ///
    /// Additional formats get their own font file, `<family>-<format>.ttf`.
    pub fn new(config: &Config, srcs: &[PathBuf], format: Option<&str>) -> std::io::Result<Self> {
        let (color_format, file_name) = match format {
            Some(format) => (format.to_string(), format!("{}-{format}.ttf", config.family)),
            None => (config.color_format.clone(), config.font_file_name()),
        };
        let output_file = std::path::absolute(config.dist_directory.join(file_name))?;

        let axis = BTreeMap::from([(
            "wght".to_string(),
            Axis {
                name: "Weight".to_string(),
                default: DEFAULT_WEIGHT,
            },
        )]);
        let master = BTreeMap::from([(
            "regular".to_string(),
            Master {
                style_name: "Regular".to_string(),
                srcs: srcs.to_vec(),
                position: BTreeMap::from([("wght".to_string(), DEFAULT_WEIGHT)]),
            },
        )]);

        Ok(Self {
            family: config.family.clone(),
            output_file,
            version_major: config.version_major,
            version_minor: config.version_minor,
            color_format,
            clipbox_quantization: CLIPBOX_QUANTIZATION,
            axis,
            master,
        })
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Write to `path`, creating the parent directory.
    pub fn write(&self, path: &Path) -> Result<()> {
        let io_err = |source| FontConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_toml()?).map_err(io_err)
    }
}

/// Write the primary config plus one per additional color format.
pub fn write_all(config: &Config, srcs: &[PathBuf]) -> Result<Vec<FontConfigFile>> {
    let formats = std::iter::once(None).chain(
        config
            .additional_color_formats
            .iter()
            .map(|f| Some(f.as_str())),
    );

    let mut written = Vec::new();
    for format in formats {
        let font_config = FontConfig::new(config, srcs, format).map_err(|source| {
            FontConfigError::Io {
                path: config.dist_directory.clone(),
                source,
            }
        })?;
        let relative = config.tomlcfg_path(&font_config.color_format);
        let path = std::path::absolute(&relative).map_err(|source| FontConfigError::Io {
            path: relative.clone(),
            source,
        })?;

        font_config.write(&path)?;
        debug!(format = %font_config.color_format, path = %path.display(), "wrote font config");

        written.push(FontConfigFile {
            color_format: font_config.color_format.clone(),
            font: font_config.output_file.clone(),
            path,
        });
    }
    Ok(written)
}
