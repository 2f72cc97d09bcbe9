//! Dotted version tags for firmware packages
//!
//! Firmware drops are tagged with dotted numeric versions like `5.1.0.0`.
//! These are literal tags, not semver: any number of numeric components is
//! accepted and no ordering-based compatibility policy applies.

use fwpack_errors::VersionError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A dotted numeric version tag (e.g. "5.1.0.0")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    components: Vec<u32>,
}

impl Version {
    /// Parse a version from a dotted string
    ///
    /// # Errors
    ///
    /// Returns `VersionError` if the string is empty or any component is not
    /// an unsigned integer.
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VersionError::Empty);
        }

        let mut components = Vec::new();
        for part in s.split('.') {
            let value = part
                .parse::<u32>()
                .map_err(|_| VersionError::InvalidComponent {
                    input: s.to_string(),
                    component: part.to_string(),
                })?;
            components.push(value);
        }

        Ok(Self { components })
    }

    /// Version components in order
    #[must_use]
    pub fn components(&self) -> &[u32] {
        &self.components
    }

    /// Underscore-joined form used in environment variable keys ("5_1_0_0")
    #[must_use]
    pub fn underscored(&self) -> String {
        self.components
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dotted = self
            .components
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{dotted}")
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_four_component_tag() {
        let v = Version::parse("5.1.0.0").unwrap();
        assert_eq!(v.components(), &[5, 1, 0, 0]);
        assert_eq!(v.to_string(), "5.1.0.0");
        assert_eq!(v.underscored(), "5_1_0_0");
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(matches!(
            Version::parse("5.1.x"),
            Err(VersionError::InvalidComponent { .. })
        ));
        assert!(matches!(Version::parse("  "), Err(VersionError::Empty)));
    }

    #[test]
    fn test_serde_round_trip_as_string() {
        let v = Version::parse("5.1.1.0").unwrap();
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#""5.1.1.0""#);
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
