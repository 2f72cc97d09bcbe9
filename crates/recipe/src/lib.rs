#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Package recipe evaluation for the fwpack firmware packaging tool
//!
//! A recipe declares a package identity and an ordered list of copy rules.
//! Evaluation is a two-step interface:
//!
//! 1. [`package`] materializes the package directory from the rules. All
//!    rules are resolved into a [`CopyPlan`] before anything is written, the
//!    plan executes into a staging directory, and the staging directory is
//!    swapped into place. A failed run therefore never leaves a partial
//!    package directory, and re-running with unchanged sources yields an
//!    identical tree with no stale files from earlier runs.
//! 2. [`publish`] derives the environment-style references and the collected
//!    library list from the materialized directory.

mod evaluator;
mod libs;
mod loader;
mod plan;

pub use evaluator::{package, publish, EvalContext};
pub use libs::collect_libs;
pub use loader::load_recipe;
pub use plan::{CopyEntry, CopyPlan};
