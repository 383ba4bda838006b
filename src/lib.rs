//! Hierarchical registry of plays discovered from a directory tree.
//!
//! Folders become categories and play files become toggleable entries.
//! [`domain::PlayRegistry`] holds the tree, [`application::PlayRegistryModel`]
//! adapts it to tree-view widgets and [`application::PlayLoader`] feeds it
//! from disk.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use application::{PlayLoader, PlayRegistryModel, TreeModel};
pub use domain::{DomainError, Play, PlayClass, PlayRegistry};
