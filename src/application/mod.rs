//! Application layer: play loading and the tree-view model adapter
//!
//! This layer drives the domain registry from the filesystem and exposes it to views.

pub mod error;
pub mod error_ext;
pub mod loader;
pub mod model;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use loader::PlayLoader;
pub use model::{
    ItemData, ItemFlags, ItemRole, Listener, ListenerId, ModelEvent, ModelIndex, Orientation,
    PlayRegistryModel, TreeModel, PLAY_HEADER,
};
