//! Package identity and board selection

use crate::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Build-target board variant
///
/// Declared by every recipe; selecting a board has no effect on copy behavior,
/// it only becomes part of the package identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum BoardOption {
    ASample,
    B0Sample,
    #[default]
    B1Sample,
}

impl BoardOption {
    /// Canonical kebab-case name as it appears in recipes
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ASample => "a-sample",
            Self::B0Sample => "b0-sample",
            Self::B1Sample => "b1-sample",
        }
    }
}

impl fmt::Display for BoardOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a-sample" => Ok(Self::ASample),
            "b0-sample" => Ok(Self::B0Sample),
            "b1-sample" => Ok(Self::B1Sample),
            other => Err(format!("unknown board: {other}")),
        }
    }
}

/// Unique identifier for one package instance
///
/// name + version + user + channel uniquely identify a package; the board is
/// the selected build-target variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageIdentity {
    pub name: String,
    pub version: Version,
    pub user: String,
    pub channel: String,
    pub board: BoardOption,
}

impl PackageIdentity {
    /// Long environment key: uppercased, underscore-joined
    /// name + version + user + channel (e.g.
    /// `PROVENCORE_GW_5_1_0_0_SDV_VALEO_SWEET500_RELEASE`)
    #[must_use]
    pub fn env_key(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.name.to_uppercase(),
            self.version.underscored(),
            self.user.to_uppercase(),
            self.channel.to_uppercase()
        )
    }

    /// Short environment key: just the uppercased name (e.g. `PROVENCORE_GW`)
    #[must_use]
    pub fn short_env_key(&self) -> String {
        self.name.to_uppercase()
    }

    /// Directory name for the materialized package (`name-version`)
    #[must_use]
    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }
}

impl fmt::Display for PackageIdentity {
    // name/version@user/channel, the reference syntax used upstream
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{}/{}",
            self.name, self.version, self.user, self.channel
        )
    }
}
