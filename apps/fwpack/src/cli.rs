//! Command line interface definition

use clap::{Parser, Subcommand};
use fwpack_types::{BoardOption, ColorChoice};
use std::path::PathBuf;

/// fwpack - firmware artifact packager
#[derive(Parser)]
#[command(name = "fwpack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Package prebuilt firmware artifacts from declarative recipes")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Materialize a package directory from a recipe and print its references
    #[command(alias = "pkg")]
    Package {
        /// Path to the recipe file (.toml)
        recipe: PathBuf,

        /// Board variant (default: the recipe's default board)
        #[arg(long, value_enum)]
        board: Option<BoardOption>,

        /// Build tree root copy-rule sources resolve against
        #[arg(long, value_name = "DIR")]
        build_root: Option<PathBuf>,

        /// Directory to materialize the package under
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Parse a recipe and show its identity and copy rules
    Show {
        /// Path to the recipe file (.toml)
        recipe: PathBuf,
    },
}
