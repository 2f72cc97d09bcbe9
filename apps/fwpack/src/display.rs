//! Result rendering for tty and JSON output

use crate::error::CliError;
use console::style;
use fwpack_types::{PackageDirectory, Recipe, ReferenceSet};
use serde::Serialize;

/// Outcome of one executed command
pub enum CommandOutcome {
    Packaged {
        refs: ReferenceSet,
        dir: PackageDirectory,
    },
    Show {
        recipe: Recipe,
    },
}

/// JSON shape for a completed packaging run
#[derive(Serialize)]
struct PackagedJson<'a> {
    #[serde(flatten)]
    refs: &'a ReferenceSet,
    files: usize,
}

/// Renders command results to stdout
pub struct OutputRenderer {
    json: bool,
    colors: bool,
}

impl OutputRenderer {
    pub fn new(json: bool, colors: bool) -> Self {
        Self { json, colors }
    }

    /// Render the outcome of a command
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, outcome: &CommandOutcome) -> Result<(), CliError> {
        match outcome {
            CommandOutcome::Packaged { refs, dir } => self.render_packaged(refs, dir),
            CommandOutcome::Show { recipe } => self.render_recipe(recipe),
        }
    }

    fn render_packaged(
        &self,
        refs: &ReferenceSet,
        dir: &PackageDirectory,
    ) -> Result<(), CliError> {
        if self.json {
            let json = serde_json::to_string_pretty(&PackagedJson {
                refs,
                files: dir.files,
            })
            .map_err(fwpack_errors::Error::from)?;
            println!("{json}");
            return Ok(());
        }

        println!(
            "{} {} ({} files)",
            self.ok("packaged"),
            refs.reference,
            dir.files
        );
        for (key, value) in refs.env_pairs() {
            println!("  {}={value}", self.key(&key));
        }
        if refs.libs.is_empty() {
            println!("  libs: (none)");
        } else {
            println!("  libs: {}", refs.libs.join(", "));
        }
        Ok(())
    }

    fn render_recipe(&self, recipe: &Recipe) -> Result<(), CliError> {
        if self.json {
            let json =
                serde_json::to_string_pretty(recipe).map_err(fwpack_errors::Error::from)?;
            println!("{json}");
            return Ok(());
        }

        let identity = recipe.identity(None).map_err(fwpack_errors::Error::from)?;
        println!("{}", self.key(&identity.to_string()));
        if let Some(description) = &recipe.package.description {
            println!("  {description}");
        }
        println!(
            "  boards: {} (default {})",
            recipe
                .options
                .board
                .iter()
                .map(|b| b.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            recipe.options.default_board
        );
        for rule in &recipe.copy {
            println!(
                "  copy {:?} from {} to {}{}",
                rule.pattern,
                rule.src.display(),
                if rule.dst.as_os_str().is_empty() {
                    "<package root>".to_string()
                } else {
                    rule.dst.display().to_string()
                },
                if rule.keep_path { "" } else { " (flattened)" }
            );
        }
        Ok(())
    }

    fn ok(&self, text: &str) -> String {
        if self.colors {
            style(text).green().to_string()
        } else {
            text.to_string()
        }
    }

    fn key(&self, text: &str) -> String {
        if self.colors {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }
}
