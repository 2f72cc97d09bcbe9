//! Published package references

use crate::PackageIdentity;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A materialized package directory, result of a `package` invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDirectory {
    /// Absolute path of the package root
    pub root: PathBuf,
    /// Number of files copied into the tree
    pub files: usize,
}

/// References published for one packaged identity
///
/// Both path-valued keys point at the same, already-materialized package
/// directory. `libs` holds the logical names of any library-shaped artifacts
/// found in the tree; for firmware recipes it is normally empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceSet {
    pub reference: String,
    pub long_key: String,
    pub short_key: String,
    pub package_dir: PathBuf,
    pub libs: Vec<String>,
}

impl ReferenceSet {
    /// Create the reference set for an identity and its package directory
    #[must_use]
    pub fn new(identity: &PackageIdentity, package_dir: PathBuf, libs: Vec<String>) -> Self {
        Self {
            reference: identity.to_string(),
            long_key: identity.env_key(),
            short_key: identity.short_env_key(),
            package_dir,
            libs,
        }
    }

    /// Environment-style key/value pairs, long key first
    #[must_use]
    pub fn env_pairs(&self) -> Vec<(String, String)> {
        let path = self.package_dir.display().to_string();
        vec![
            (self.long_key.clone(), path.clone()),
            (self.short_key.clone(), path),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoardOption, Version};

    #[test]
    fn test_env_pairs_share_one_path() {
        let identity = PackageIdentity {
            name: "provencore_main".to_string(),
            version: Version::parse("5.1.1.0").unwrap(),
            user: "sdv_valeo_sweet500".to_string(),
            channel: "release".to_string(),
            board: BoardOption::B1Sample,
        };
        let refs = ReferenceSet::new(&identity, PathBuf::from("/out/provencore_main-5.1.1.0"), vec![]);

        let pairs = refs.env_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(
            pairs[0].0,
            "PROVENCORE_MAIN_5_1_1_0_SDV_VALEO_SWEET500_RELEASE"
        );
        assert_eq!(pairs[1].0, "PROVENCORE_MAIN");
        assert_eq!(pairs[0].1, pairs[1].1);
    }
}
