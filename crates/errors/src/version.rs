//! Version tag error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum VersionError {
    #[error("empty version tag")]
    Empty,

    #[error("invalid version component {component:?} in {input:?}")]
    InvalidComponent { input: String, component: String },
}

impl UserFacingError for VersionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        Some("Version tags are dotted numbers, e.g. 5.1.0.0.")
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Empty => "version.empty",
            Self::InvalidComponent { .. } => "version.invalid_component",
        };
        Some(code)
    }
}
