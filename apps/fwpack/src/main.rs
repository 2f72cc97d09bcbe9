//! fwpack - firmware artifact packager
//!
//! CLI that evaluates declarative package recipes: prebuilt firmware
//! binaries are copied into a versioned package directory and the resulting
//! filesystem references are published for downstream build steps.

mod cli;
mod display;
mod error;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::display::{CommandOutcome, OutputRenderer};
use crate::error::CliError;
use clap::Parser;
use fwpack_config::Config;
use fwpack_recipe::{load_recipe, package, publish, EvalContext};
use fwpack_types::ColorChoice;
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting fwpack v{}", env!("CARGO_PKG_VERSION"));

    // Configuration precedence: file, then environment, then CLI flags.
    let mut config = Config::load_or_default(&cli.global.config).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.global);

    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stdout().features().colors_supported(),
    };
    let renderer = OutputRenderer::new(cli.global.json, colors_enabled);

    let outcome = execute_command(cli.command, &config).await?;
    renderer.render(&outcome)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute the specified command
async fn execute_command(command: Commands, config: &Config) -> Result<CommandOutcome, CliError> {
    match command {
        Commands::Package {
            recipe,
            board,
            build_root,
            output_dir,
        } => {
            let recipe = load_recipe(&recipe).await?;
            let ctx = EvalContext {
                build_root: build_root.unwrap_or_else(|| config.build_root()),
                output_root: output_dir.unwrap_or_else(|| config.output_dir()),
                board,
            };
            tokio::fs::create_dir_all(&ctx.output_root).await?;

            let identity = recipe.identity(ctx.board).map_err(fwpack_errors::Error::from)?;
            let dir = package(&ctx, &recipe).await?;
            let refs = publish(&identity, &dir).await?;
            Ok(CommandOutcome::Packaged { refs, dir })
        }

        Commands::Show { recipe } => {
            let recipe = load_recipe(&recipe).await?;
            Ok(CommandOutcome::Show { recipe })
        }
    }
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &GlobalArgs) {
    if let Some(color) = &global.color {
        config.general.color = *color;
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if json_mode {
        // Suppress all console logging so it cannot contaminate JSON output.
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,fwpack=debug")),
            )
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
}
