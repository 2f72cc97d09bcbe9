//! Recipe definition error types

use std::borrow::Cow;
use std::path::PathBuf;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum RecipeError {
    #[error("cannot read recipe {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    #[error("cannot parse recipe {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("unknown board {board:?}: allowed boards are {allowed}")]
    UnknownBoard { board: String, allowed: String },

    #[error("invalid glob pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("source path must be relative to the build root: {path}")]
    AbsoluteSource { path: PathBuf },

    #[error("destination {path} escapes the package root")]
    DestinationEscape { path: PathBuf },
}

impl UserFacingError for RecipeError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ParseError { .. } | Self::InvalidPattern { .. } => {
                Some("Correct the recipe definition before retrying.")
            }
            Self::UnknownBoard { .. } => {
                Some("Pick one of the boards declared in the recipe's [options] section.")
            }
            Self::AbsoluteSource { .. } | Self::DestinationEscape { .. } => {
                Some("Copy rule paths must stay relative so recipes remain portable.")
            }
            Self::ReadFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ReadFailed { .. } => "recipe.read_failed",
            Self::ParseError { .. } => "recipe.parse_error",
            Self::UnknownBoard { .. } => "recipe.unknown_board",
            Self::InvalidPattern { .. } => "recipe.invalid_pattern",
            Self::AbsoluteSource { .. } => "recipe.absolute_source",
            Self::DestinationEscape { .. } => "recipe.destination_escape",
        };
        Some(code)
    }
}
