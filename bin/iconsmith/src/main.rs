//! iconsmith CLI
//!
//! Builds an icon font, stylesheet and preview page from themed SVG glyphs.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for iconsmith.
#[derive(Parser)]
#[command(
    name = "iconsmith",
    version,
    about = "Build icon fonts from themed SVG glyphs"
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Restyle glyphs, write the report and compile one font per theme
    Build {
        /// Theme configuration files, built in order
        #[arg(required = true)]
        configs: Vec<PathBuf>,
        /// Directory holding vsicon.css and index.html
        #[arg(short, long)]
        templates: Option<PathBuf>,
        /// Write compiler configs but do not run the compiler
        #[arg(long)]
        no_compile: bool,
        /// Process input files in file name order
        #[arg(long)]
        sort: bool,
    },
    /// Validate configurations and glyphs without writing anything
    Check {
        /// Theme configuration files
        #[arg(required = true)]
        configs: Vec<PathBuf>,
        /// Directory holding vsicon.css and index.html
        #[arg(short, long)]
        templates: Option<PathBuf>,
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    iconsmith::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            configs,
            templates,
            no_compile,
            sort,
        } => {
            iconsmith::cmd::build::run(&configs, templates.as_deref(), !no_compile, sort)?;
        }
        Commands::Check {
            configs,
            templates,
            strict,
        } => {
            iconsmith::cmd::check::run(&configs, templates.as_deref(), strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_build_command_parsing() {
        let args = ["iconsmith", "build", "config_dark.json"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Build {
                configs,
                templates,
                no_compile,
                sort,
            } => {
                assert_eq!(configs, vec![PathBuf::from("config_dark.json")]);
                assert!(templates.is_none());
                assert!(!no_compile);
                assert!(!sort);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_multiple_configs() {
        let args = [
            "iconsmith",
            "build",
            "config_dark.json",
            "config_light.json",
            "--no-compile",
            "--sort",
        ];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build {
                configs,
                no_compile,
                sort,
                ..
            } => {
                assert_eq!(configs.len(), 2);
                assert_eq!(configs[1], PathBuf::from("config_light.json"));
                assert!(no_compile);
                assert!(sort);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_build_requires_config() {
        assert!(Cli::try_parse_from(["iconsmith", "build"]).is_err());
    }

    #[test]
    fn test_cli_templates_dir() {
        let args = ["iconsmith", "build", "-t", "assets/tpl", "config.json"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Build { templates, .. } => {
                assert_eq!(templates, Some(PathBuf::from("assets/tpl")));
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["iconsmith", "check", "config.toml", "--strict"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Check {
                configs, strict, ..
            } => {
                assert_eq!(configs, vec![PathBuf::from("config.toml")]);
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["iconsmith", "-vvv", "build", "config.json"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_verbosity_after_subcommand() {
        let args = ["iconsmith", "check", "config.json", "-v"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 1);
    }
}
