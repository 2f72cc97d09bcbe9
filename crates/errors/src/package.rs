//! Packaging error types

use std::borrow::Cow;
use std::path::PathBuf;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum PackageError {
    #[error("source path not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error(
        "destination conflict: {src_a} and {src_b} both flatten to {dest} in the package tree"
    )]
    DestinationConflict {
        dest: PathBuf,
        src_a: PathBuf,
        src_b: PathBuf,
    },

    #[error("cannot scan package directory {path}: {message}")]
    ReferenceScan { path: PathBuf, message: String },

    #[error("staging failed for {path}: {message}")]
    StagingFailed { path: PathBuf, message: String },
}

impl UserFacingError for PackageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::SourceNotFound { .. } => {
                Some("Run the upstream firmware build so the source tree is populated.")
            }
            Self::DestinationConflict { .. } => {
                Some("Give the conflicting rules distinct destination subfolders.")
            }
            Self::ReferenceScan { .. } => {
                Some("Check filesystem permissions on the package directory.")
            }
            Self::StagingFailed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::SourceNotFound { .. } => "package.source_not_found",
            Self::DestinationConflict { .. } => "package.destination_conflict",
            Self::ReferenceScan { .. } => "package.reference_scan",
            Self::StagingFailed { .. } => "package.staging_failed",
        };
        Some(code)
    }
}
