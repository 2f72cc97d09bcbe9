//! Copy plan resolution
//!
//! Every rule is resolved against the filesystem before a single byte is
//! written, so missing sources and destination conflicts abort the
//! invocation while the output tree is still untouched.

use fwpack_errors::{Error, PackageError};
use fwpack_types::{CopyRule, Recipe};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// One planned file copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyEntry {
    /// Absolute source file
    pub src: PathBuf,
    /// Destination path relative to the package root
    pub dest: PathBuf,
}

/// The resolved set of copies for one recipe evaluation
#[derive(Debug, Clone, Default)]
pub struct CopyPlan {
    entries: Vec<CopyEntry>,
}

impl CopyPlan {
    /// Resolve all of a recipe's rules against `build_root`
    ///
    /// # Errors
    ///
    /// - `PackageError::SourceNotFound` if a rule's source directory does not
    ///   exist under `build_root`
    /// - `PackageError::DestinationConflict` if two matched files map onto
    ///   the same destination path
    pub async fn resolve(build_root: &Path, recipe: &Recipe) -> Result<Self, Error> {
        let mut dests: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();
        let mut entries = Vec::new();

        for rule in &recipe.copy {
            let base = build_root.join(&rule.src);
            if fs::metadata(&base).await.is_err() {
                return Err(PackageError::SourceNotFound { path: base }.into());
            }

            let matcher = rule_matcher(rule)?;
            let excludes = excludes_matcher(rule)?;
            let matched = walk_matches(&base, rule, &matcher, excludes.as_ref()).await?;
            debug!(
                src = %base.display(),
                pattern = %rule.pattern,
                matched = matched.len(),
                "resolved copy rule"
            );

            for (src, rel) in matched {
                let dest = if rule.keep_path {
                    rule.dst.join(&rel)
                } else {
                    // Flattening discards the matched file's directory
                    // structure entirely.
                    rule.dst.join(rel.file_name().unwrap_or(rel.as_os_str()))
                };

                if let Some(existing) = dests.get(&dest) {
                    return Err(PackageError::DestinationConflict {
                        dest,
                        src_a: existing.clone(),
                        src_b: src,
                    }
                    .into());
                }
                dests.insert(dest.clone(), src.clone());
                entries.push(CopyEntry { src, dest });
            }
        }

        Ok(Self { entries })
    }

    /// Planned copies in rule order
    #[must_use]
    pub fn entries(&self) -> &[CopyEntry] {
        &self.entries
    }

    /// Number of files the plan will copy
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn rule_matcher(rule: &CopyRule) -> Result<GlobSet, Error> {
    let mut builder = GlobSetBuilder::new();
    builder.add(compile_glob(&rule.pattern, rule.ignore_case)?);
    builder
        .build()
        .map_err(|e| invalid_pattern(&rule.pattern, &e))
}

fn excludes_matcher(rule: &CopyRule) -> Result<Option<GlobSet>, Error> {
    if rule.excludes.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for exclude in &rule.excludes {
        builder.add(compile_glob(exclude, rule.ignore_case)?);
    }
    Ok(Some(
        builder.build().map_err(|e| invalid_pattern("excludes", &e))?,
    ))
}

fn compile_glob(pattern: &str, ignore_case: bool) -> Result<globset::Glob, Error> {
    GlobBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|e| invalid_pattern(pattern, &e))
}

fn invalid_pattern(pattern: &str, err: &globset::Error) -> Error {
    fwpack_errors::RecipeError::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    }
    .into()
}

/// Walk `base` and collect (absolute path, path relative to `base`) pairs for
/// every regular file whose relative path matches the rule's pattern.
///
/// Symlinks are followed when the rule says so and skipped otherwise.
async fn walk_matches(
    base: &Path,
    rule: &CopyRule,
    matcher: &GlobSet,
    excludes: Option<&GlobSet>,
) -> Result<Vec<(PathBuf, PathBuf)>, Error> {
    let mut matched = Vec::new();
    let mut pending = vec![base.to_path_buf()];
    let mut visited = HashSet::new();
    visited.insert(
        fs::canonicalize(base)
            .await
            .map_err(|e| Error::io_with_path(&e, base))?,
    );

    while let Some(dir) = pending.pop() {
        let mut read_dir = fs::read_dir(&dir)
            .await
            .map_err(|e| Error::io_with_path(&e, &dir))?;

        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| Error::io_with_path(&e, &dir))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| Error::io_with_path(&e, &path))?;

            let is_dir = if file_type.is_symlink() {
                if !rule.symlinks {
                    continue;
                }
                // Classify by target; dangling links are skipped.
                match fs::metadata(&path).await {
                    Ok(meta) => meta.is_dir(),
                    Err(_) => continue,
                }
            } else {
                file_type.is_dir()
            };

            if is_dir {
                // A symlinked directory can point back at an ancestor;
                // only directories not seen yet keep the walk finite.
                let canonical = fs::canonicalize(&path)
                    .await
                    .map_err(|e| Error::io_with_path(&e, &path))?;
                if visited.insert(canonical) {
                    pending.push(path);
                }
                continue;
            }

            let rel = path
                .strip_prefix(base)
                .map_err(|e| Error::internal(format!("walk escaped {}: {e}", base.display())))?
                .to_path_buf();

            if !matcher.is_match(&rel) {
                continue;
            }
            if excludes.is_some_and(|ex| ex.is_match(&rel)) {
                continue;
            }

            matched.push((path, rel));
        }
    }

    // Deterministic plan order regardless of directory iteration order.
    matched.sort();
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fwpack_types::{PackageMetadata, Version};

    fn recipe_with(rules: Vec<CopyRule>) -> Recipe {
        Recipe {
            package: PackageMetadata {
                name: "provencore_gw".to_string(),
                version: Version::parse("5.1.0.0").unwrap(),
                user: "sdv_valeo_sweet500".to_string(),
                channel: "release".to_string(),
                description: None,
            },
            options: fwpack_types::BoardOptions::default(),
            copy: rules,
        }
    }

    fn flatten_rule(pattern: &str, src: &str, dst: &str) -> CopyRule {
        CopyRule {
            pattern: pattern.to_string(),
            src: PathBuf::from(src),
            dst: PathBuf::from(dst),
            keep_path: false,
            symlinks: true,
            excludes: vec![],
            ignore_case: false,
        }
    }

    #[tokio::test]
    async fn test_missing_source_fails_before_any_write() {
        let root = tempfile::tempdir().unwrap();
        let recipe = recipe_with(vec![flatten_rule("*", "gsoc/patches/atf", "files")]);

        let err = CopyPlan::resolve(root.path(), &recipe).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Package(PackageError::SourceNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_flatten_discards_nested_structure() {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("gsoc/patches/atf");
        std::fs::create_dir_all(src.join("nested")).unwrap();
        std::fs::write(src.join("bl2.bin"), b"bl2").unwrap();
        std::fs::write(src.join("nested/fip.bin"), b"fip").unwrap();

        let recipe = recipe_with(vec![flatten_rule("*", "gsoc/patches/atf", "files")]);
        let plan = CopyPlan::resolve(root.path(), &recipe).await.unwrap();

        let dests: Vec<_> = plan.entries().iter().map(|e| e.dest.clone()).collect();
        assert_eq!(plan.len(), 2);
        assert!(dests.contains(&PathBuf::from("files/bl2.bin")));
        assert!(dests.contains(&PathBuf::from("files/fip.bin")));
    }

    #[tokio::test]
    async fn test_keep_path_preserves_structure() {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("gsoc/patches/atf");
        std::fs::create_dir_all(src.join("nested")).unwrap();
        std::fs::write(src.join("nested/fip.bin"), b"fip").unwrap();

        let mut rule = flatten_rule("*", "gsoc/patches/atf", "files");
        rule.keep_path = true;
        let plan = CopyPlan::resolve(root.path(), &recipe_with(vec![rule]))
            .await
            .unwrap();

        assert_eq!(plan.entries()[0].dest, PathBuf::from("files/nested/fip.bin"));
    }

    #[tokio::test]
    async fn test_flatten_collision_is_a_conflict() {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("gsoc/patches/atf");
        std::fs::create_dir_all(src.join("a")).unwrap();
        std::fs::create_dir_all(src.join("b")).unwrap();
        std::fs::write(src.join("a/same.bin"), b"a").unwrap();
        std::fs::write(src.join("b/same.bin"), b"b").unwrap();

        let recipe = recipe_with(vec![flatten_rule("*", "gsoc/patches/atf", "files")]);
        let err = CopyPlan::resolve(root.path(), &recipe).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Package(PackageError::DestinationConflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_exact_pattern_and_excludes() {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("gsoc/provencore/build");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("provencore.bin"), b"pnc").unwrap();
        std::fs::write(src.join("provencore.elf"), b"elf").unwrap();

        let recipe = recipe_with(vec![flatten_rule(
            "provencore.bin",
            "gsoc/provencore/build",
            "",
        )]);
        let plan = CopyPlan::resolve(root.path(), &recipe).await.unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.entries()[0].dest, PathBuf::from("provencore.bin"));

        let mut rule = flatten_rule("*", "gsoc/provencore/build", "");
        rule.excludes = vec!["*.elf".to_string()];
        let plan = CopyPlan::resolve(root.path(), &recipe_with(vec![rule]))
            .await
            .unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_to_ancestor_does_not_loop_the_walk() {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("gsoc/patches/atf");
        std::fs::create_dir_all(src.join("nested")).unwrap();
        std::fs::write(src.join("bl2.bin"), b"bl2").unwrap();
        std::os::unix::fs::symlink(&src, src.join("nested/loop")).unwrap();

        let recipe = recipe_with(vec![flatten_rule("*.bin", "gsoc/patches/atf", "files")]);
        let plan = CopyPlan::resolve(root.path(), &recipe).await.unwrap();

        // The cycle is walked once; bl2.bin is matched exactly once.
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.entries()[0].dest, PathBuf::from("files/bl2.bin"));
    }

    #[tokio::test]
    async fn test_zero_matches_with_existing_source_is_ok() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join("gsoc/patches/atf")).unwrap();

        let recipe = recipe_with(vec![flatten_rule("*.bin", "gsoc/patches/atf", "files")]);
        let plan = CopyPlan::resolve(root.path(), &recipe).await.unwrap();
        assert!(plan.is_empty());
    }
}
