//! Recipe loading and validation

use fwpack_errors::{Error, RecipeError};
use fwpack_types::{CopyRule, Recipe};
use globset::Glob;
use std::path::{Component, Path};
use tracing::debug;

/// Load a recipe from a TOML file and validate its copy rules
///
/// # Errors
///
/// Returns `RecipeError::ReadFailed` or `RecipeError::ParseError` when the
/// file cannot be read or parsed, and the rule-level validation errors
/// described on [`validate_rule`].
pub async fn load_recipe(path: &Path) -> Result<Recipe, Error> {
    let contents =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RecipeError::ReadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

    let recipe: Recipe = toml::from_str(&contents).map_err(|e| RecipeError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    for rule in &recipe.copy {
        validate_rule(rule)?;
    }

    debug!(
        recipe = %recipe.package.name,
        rules = recipe.copy.len(),
        "loaded recipe"
    );
    Ok(recipe)
}

/// Validate a single copy rule
///
/// # Errors
///
/// - `RecipeError::InvalidPattern` if the pattern or an exclude is not a
///   valid glob
/// - `RecipeError::AbsoluteSource` if `src` is not relative to the build root
/// - `RecipeError::DestinationEscape` if `dst` is absolute or steps outside
///   the package root via `..`
pub fn validate_rule(rule: &CopyRule) -> Result<(), RecipeError> {
    Glob::new(&rule.pattern).map_err(|e| RecipeError::InvalidPattern {
        pattern: rule.pattern.clone(),
        message: e.to_string(),
    })?;
    for exclude in &rule.excludes {
        Glob::new(exclude).map_err(|e| RecipeError::InvalidPattern {
            pattern: exclude.clone(),
            message: e.to_string(),
        })?;
    }

    if rule.src.is_absolute() {
        return Err(RecipeError::AbsoluteSource {
            path: rule.src.clone(),
        });
    }

    if rule.dst.is_absolute()
        || rule
            .dst
            .components()
            .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(RecipeError::DestinationEscape {
            path: rule.dst.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn rule() -> CopyRule {
        CopyRule {
            pattern: "*".to_string(),
            src: PathBuf::from("gsoc/patches/atf"),
            dst: PathBuf::from("files"),
            keep_path: false,
            symlinks: true,
            excludes: vec![],
            ignore_case: false,
        }
    }

    #[test]
    fn test_valid_rule_passes() {
        assert!(validate_rule(&rule()).is_ok());
    }

    #[test]
    fn test_absolute_source_rejected() {
        let mut r = rule();
        r.src = PathBuf::from("/abs/patches");
        assert!(matches!(
            validate_rule(&r),
            Err(RecipeError::AbsoluteSource { .. })
        ));
    }

    #[test]
    fn test_destination_escape_rejected() {
        let mut r = rule();
        r.dst = PathBuf::from("../outside");
        assert!(matches!(
            validate_rule(&r),
            Err(RecipeError::DestinationEscape { .. })
        ));
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let mut r = rule();
        r.pattern = "[".to_string();
        assert!(matches!(
            validate_rule(&r),
            Err(RecipeError::InvalidPattern { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[package\nname = \"provencore_gw\"").unwrap();

        let err = load_recipe(&path).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Recipe(RecipeError::ParseError { .. })
        ));
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typed.toml");
        // version must be a dotted numeric string
        std::fs::write(
            &path,
            r#"
[package]
name = "provencore_gw"
version = "not-a-version"
user = "sdv_valeo_sweet500"
channel = "release"
"#,
        )
        .unwrap();

        let err = load_recipe(&path).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Recipe(RecipeError::ParseError { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_recipe_file_is_a_read_error() {
        let err = load_recipe(Path::new("/nonexistent/recipe.toml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Recipe(RecipeError::ReadFailed { .. })
        ));
    }
}
