//! Devfeat Collection - merges feature manifests into one collection document.
//!
//! Features appear in the order their directories are given; [`aggregate_root`]
//! enumerates a features root lexicographically by directory name. Ids are
//! not de-duplicated, see [`CollectionDocument::duplicate_ids`].

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod aggregate;
mod error;

pub use aggregate::{aggregate, aggregate_root, write_collection};
pub use devfeat_manifest::{CollectionDocument, SourceInformation};
pub use error::{CollectionError, CollectionResult};
