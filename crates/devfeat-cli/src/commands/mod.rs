//! Subcommand implementations.

pub(crate) mod collect;
pub(crate) mod config;
pub(crate) mod list;
pub(crate) mod package;
pub(crate) mod validate;
