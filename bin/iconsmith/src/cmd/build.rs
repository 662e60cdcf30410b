//! Build command - restyles glyphs and compiles one font per theme

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr};
use iconsmith_core::Config;
use iconsmith_generator::{BuildOutput, Builder};

use super::load_templates;

/// Run the build command.
///
/// Each configuration is a complete theme; they are built one after another
/// and the first failure stops the remaining ones.
pub fn run(
    config_paths: &[PathBuf],
    templates_dir: Option<&Path>,
    compile: bool,
    sort: bool,
) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_paths, ?templates_dir, compile, sort, "Starting build");

    let templates = load_templates(templates_dir)?;

    for config_path in config_paths {
        let mut config = Config::load(config_path).wrap_err_with(|| {
            format!("Failed to load configuration {}", config_path.display())
        })?;

        if sort {
            config.sort_input = true;
        }

        tracing::debug!(?config, "Loaded configuration");

        let output = Builder::new(config, templates.clone())
            .with_compile(compile)
            .build()
            .wrap_err_with(|| format!("Build failed for {}", config_path.display()))?;

        print_summary(config_path, &output);
    }

    let duration = start.elapsed();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!();

    tracing::info!(themes = config_paths.len(), ?duration, "Build completed successfully");

    Ok(())
}

fn print_summary(config_path: &Path, output: &BuildOutput) {
    let stats = &output.stats;

    println!();
    println!("  Built {}", config_path.display());
    println!();
    println!("  Icons:        {}", stats.icons);
    println!("  Skipped:      {}", stats.skipped);
    println!("  Font configs: {}", stats.font_configs);
    println!("  Fonts:        {}", stats.fonts);
    println!("  Stylesheet:   {}", output.preprocess.report.stylesheet.display());
    println!("  Preview:      {}", output.preprocess.report.preview.display());

    if !output.preprocess.skipped.is_empty() {
        println!();
        println!("  Skipped icons:");
        for skipped in &output.preprocess.skipped {
            println!("  ⚠ {}: {}", skipped.path.display(), skipped.reason);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write_config(root: &Path, name: &str, family: &str) -> PathBuf {
        let path = root.join(name);
        fs::write(
            &path,
            format!(
                r#"{{
                    "input_directory": "{0}/in",
                    "output_directory": "{0}/out-{family}",
                    "dist_directory": "{0}/dist-{family}",
                    "tomlcfg_directory": "{0}/cfg",
                    "tomlcfg_prefix": "{family}-",
                    "family": "{family}",
                    "codepoint": "U+e000",
                    "theme": {{ "cls-1": "fill:#fff" }}
                }}"#,
                root.display()
            ),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_build_several_themes_without_compiler() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("in")).unwrap();
        fs::write(
            dir.path().join("in/Send.svg"),
            r#"<svg><path class="cls-1"/></svg>"#,
        )
        .unwrap();
        let dark = write_config(dir.path(), "dark.json", "dark");
        let light = write_config(dir.path(), "light.json", "light");

        run(&[dark, light], None, false, true).unwrap();

        for family in ["dark", "light"] {
            assert!(dir.path().join(format!("out-{family}/e000.svg")).exists());
            assert!(dir.path().join(format!("dist-{family}/vsicon.css")).exists());
            assert!(
                dir.path()
                    .join(format!("cfg/{family}-glyf_colr_1.toml"))
                    .exists()
            );
        }
    }

    #[test]
    fn test_build_reports_bad_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = run(&[path], None, false, false).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
