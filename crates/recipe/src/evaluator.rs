//! Package materialization and reference publishing

use crate::plan::CopyPlan;
use crate::libs::collect_libs;
use fwpack_errors::{Error, PackageError};
use fwpack_types::{BoardOption, PackageDirectory, PackageIdentity, Recipe, ReferenceSet};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Evaluation context for one invocation
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Root of the firmware build tree copy-rule sources resolve against
    pub build_root: PathBuf,
    /// Directory package directories are materialized under
    pub output_root: PathBuf,
    /// Requested board, or `None` for the recipe's default
    pub board: Option<BoardOption>,
}

/// Materialize the package directory for a recipe
///
/// The copy plan is resolved first, executed into a staging directory, and
/// the staging directory is then swapped over any previous package
/// directory. Re-invocation with unchanged sources yields an identical tree;
/// files from earlier runs never survive the swap.
///
/// # Errors
///
/// Propagates plan resolution errors (`SourceNotFound`,
/// `DestinationConflict`, invalid board) and I/O errors from the copy. On
/// failure the staging directory is removed and any previously materialized
/// package directory is left untouched.
pub async fn package(ctx: &EvalContext, recipe: &Recipe) -> Result<PackageDirectory, Error> {
    let identity = recipe.identity(ctx.board)?;
    let plan = CopyPlan::resolve(&ctx.build_root, recipe).await?;

    let final_dir = ctx.output_root.join(identity.dir_name());
    let staging = ctx.output_root.join(format!(".{}.staging", identity.dir_name()));

    if let Err(err) = execute_plan(&plan, &staging).await {
        let _ = fs::remove_dir_all(&staging).await;
        return Err(err);
    }

    if fs::metadata(&final_dir).await.is_ok() {
        fs::remove_dir_all(&final_dir)
            .await
            .map_err(|e| Error::io_with_path(&e, &final_dir))?;
    }
    fs::rename(&staging, &final_dir)
        .await
        .map_err(|e| Error::io_with_path(&e, &final_dir))?;

    let root = fs::canonicalize(&final_dir)
        .await
        .map_err(|e| Error::io_with_path(&e, &final_dir))?;

    info!(
        reference = %identity,
        board = %identity.board,
        files = plan.len(),
        path = %root.display(),
        "package materialized"
    );

    Ok(PackageDirectory {
        root,
        files: plan.len(),
    })
}

/// Publish references for a materialized package directory
///
/// # Errors
///
/// Returns `PackageError::ReferenceScan` when the package tree cannot be
/// enumerated for library collection.
pub async fn publish(
    identity: &PackageIdentity,
    dir: &PackageDirectory,
) -> Result<ReferenceSet, Error> {
    let libs = collect_libs(&dir.root)
        .await
        .map_err(|e| PackageError::ReferenceScan {
            path: dir.root.clone(),
            message: e.to_string(),
        })?;

    debug!(reference = %identity, libs = libs.len(), "published references");
    Ok(ReferenceSet::new(identity, dir.root.clone(), libs))
}

async fn execute_plan(plan: &CopyPlan, staging: &Path) -> Result<(), Error> {
    // A stale staging directory from an interrupted run is discarded.
    if fs::metadata(staging).await.is_ok() {
        fs::remove_dir_all(staging)
            .await
            .map_err(|e| Error::io_with_path(&e, staging))?;
    }
    fs::create_dir_all(staging)
        .await
        .map_err(|e| Error::io_with_path(&e, staging))?;

    for entry in plan.entries() {
        let dest = staging.join(&entry.dest);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io_with_path(&e, parent))?;
        }
        // fs::copy follows symlinks, so linked sources are copied as their
        // target contents.
        fs::copy(&entry.src, &dest)
            .await
            .map_err(|e| Error::io_with_path(&e, &entry.src))?;
    }

    Ok(())
}
