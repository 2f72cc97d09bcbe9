//! Recipe data structures
//!
//! A recipe is a static TOML document: a `[package]` identity block, an
//! `[options]` block declaring the selectable boards, and an ordered list of
//! `[[copy]]` rules. Rules are declared once at authoring time and never
//! computed at runtime.

use crate::{BoardOption, PackageIdentity, Version};
use fwpack_errors::RecipeError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identity block of a recipe (`[package]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub name: String,
    pub version: Version,
    pub user: String,
    pub channel: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Board options block of a recipe (`[options]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BoardOptions {
    /// Boards this recipe may be packaged for
    pub board: Vec<BoardOption>,
    /// Board used when none is requested
    #[serde(default)]
    pub default_board: BoardOption,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            board: vec![
                BoardOption::ASample,
                BoardOption::B0Sample,
                BoardOption::B1Sample,
            ],
            default_board: BoardOption::default(),
        }
    }
}

/// A single copy rule (`[[copy]]`)
///
/// `src` is resolved against the build root (a fixed ancestor of the whole
/// source tree), never against the recipe file's own location, so recipes
/// stay portable as long as the build-tree layout is stable. `dst` is always
/// relative to the package's output root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyRule {
    /// Glob over file names ("*" matches every file under `src`)
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// Source directory, relative to the build root
    pub src: PathBuf,
    /// Destination subfolder, relative to the package root
    #[serde(default)]
    pub dst: PathBuf,
    /// Preserve the matched files' directory structure under `dst`;
    /// when false all matches are flattened into `dst` directly
    #[serde(default)]
    pub keep_path: bool,
    /// Follow symlinks and copy their targets
    #[serde(default = "default_true")]
    pub symlinks: bool,
    /// Glob patterns excluded from the match set
    #[serde(default)]
    pub excludes: Vec<String>,
    /// Case-insensitive pattern matching
    #[serde(default)]
    pub ignore_case: bool,
}

fn default_pattern() -> String {
    "*".to_string()
}

fn default_true() -> bool {
    true
}

/// A complete package recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub package: PackageMetadata,
    #[serde(default)]
    pub options: BoardOptions,
    #[serde(default)]
    pub copy: Vec<CopyRule>,
}

impl Recipe {
    /// Resolve the identity for a board selection
    ///
    /// # Errors
    ///
    /// Returns `RecipeError::UnknownBoard` if the requested board is not in
    /// the recipe's declared board list.
    pub fn identity(&self, board: Option<BoardOption>) -> Result<PackageIdentity, RecipeError> {
        let board = board.unwrap_or(self.options.default_board);
        if !self.options.board.contains(&board) {
            return Err(RecipeError::UnknownBoard {
                board: board.to_string(),
                allowed: self
                    .options
                    .board
                    .iter()
                    .map(BoardOption::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        Ok(PackageIdentity {
            name: self.package.name.clone(),
            version: self.package.version.clone(),
            user: self.package.user.clone(),
            channel: self.package.channel.clone(),
            board,
        })
    }
}
