#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the fwpack firmware packaging tool

pub mod format;
pub mod identity;
pub mod recipe;
pub mod references;
pub mod version;

pub use format::ColorChoice;
pub use identity::{BoardOption, PackageIdentity};
pub use recipe::{BoardOptions, CopyRule, PackageMetadata, Recipe};
pub use references::{PackageDirectory, ReferenceSet};
pub use version::Version;
