//! Domain layer: the play registry and its nodes
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod display;
pub mod entities;
pub mod error;
pub mod node;
pub mod registry;

pub use display::TreeNodeConvert;
pub use entities::{class_name, display_path, Play, PlayClass};
pub use error::{DomainError, DomainResult};
pub use node::{Category, Node, NodeId, PlayNode};
pub use registry::{Entries, PlayRegistry, Plays};
