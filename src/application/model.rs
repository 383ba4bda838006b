//! Tree-view model adapter over a [`PlayRegistry`].
//!
//! Views address items with [`ModelIndex`] values and query them by
//! [`ItemRole`]. The invalid index stands for the registry root, so top-level
//! categories and plays report an invalid parent. Checking or unchecking a
//! play flips its enabled flag and notifies listeners synchronously, before
//! the editing call returns.
//!
//! ```text
//! ┌───────────────────┐  ModelEvent  ┌──────────┐
//! │ PlayRegistryModel │─────────────>│   View   │
//! │   (TreeModel)     │<─────────────│          │
//! └───────────────────┘  ModelIndex  └──────────┘
//!          │                ItemRole
//!          v
//!   PlayRegistry<P>
//! ```

use std::rc::Rc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{DomainError, Node, NodeId, Play, PlayRegistry};

/// Header text of the only column.
pub const PLAY_HEADER: &str = "Play";

/// Position of an item: row and column within its parent, plus the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModelIndex {
    row: usize,
    column: usize,
    node: Option<NodeId>,
}

impl ModelIndex {
    /// The index that addresses nothing; used as the parent of top-level items.
    pub fn invalid() -> Self {
        Self::default()
    }

    fn new(row: usize, column: usize, node: NodeId) -> Self {
        Self {
            row,
            column,
            node: Some(node),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.node.is_some()
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }
}

/// Kind of data a view asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRole {
    Display,
    CheckState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemData {
    Text(String),
    Checked(bool),
}

impl ItemData {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ItemData::Text(text) => Some(text),
            ItemData::Checked(_) => None,
        }
    }

    pub fn as_checked(&self) -> Option<bool> {
        match self {
            ItemData::Checked(checked) => Some(*checked),
            ItemData::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// What a view may do with an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemFlags {
    pub enabled: bool,
    pub checkable: bool,
    pub editable: bool,
}

impl ItemFlags {
    pub const fn all() -> Self {
        Self {
            enabled: true,
            checkable: true,
            editable: true,
        }
    }
}

/// Change notification delivered to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    /// Data of the items between the two indices changed; structure did not.
    DataChanged {
        top_left: ModelIndex,
        bottom_right: ModelIndex,
    },
    /// Rows were added or removed; cached indices are stale.
    LayoutChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Listeners cannot reach back into the model while it notifies them; they
/// record what changed and re-query afterwards.
pub type Listener = Box<dyn FnMut(&ModelEvent)>;

/// Data source contract for a generic tree-view widget.
pub trait TreeModel {
    fn column_count(&self, parent: &ModelIndex) -> usize;

    /// Number of children under `parent`; the invalid index means the root.
    fn row_count(&self, parent: &ModelIndex) -> usize;

    /// Index of the `row`-th child of `parent`, or the invalid index.
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;

    /// Index of the owning category; invalid for top-level items.
    fn parent(&self, index: &ModelIndex) -> ModelIndex;

    fn data(&self, index: &ModelIndex, role: ItemRole) -> Option<ItemData>;

    fn flags(&self, index: &ModelIndex) -> ItemFlags;

    fn header_data(&self, section: usize, orientation: Orientation, role: ItemRole)
        -> Option<ItemData>;

    /// Apply a user edit of `role` to the item at `index`.
    ///
    /// Returns `Ok(false)` when the edit does not apply (invalid index or an
    /// uneditable role).
    fn set_data(&mut self, index: &ModelIndex, role: ItemRole) -> ApplicationResult<bool>;

    fn subscribe(&mut self, listener: Listener) -> ListenerId;

    fn unsubscribe(&mut self, id: ListenerId) -> bool;
}

/// [`TreeModel`] backed by a single [`PlayRegistry`].
pub struct PlayRegistryModel<P> {
    registry: PlayRegistry<P>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: usize,
}

impl<P: Play> Default for PlayRegistryModel<P> {
    fn default() -> Self {
        Self::new(PlayRegistry::new())
    }
}

impl<P: Play> PlayRegistryModel<P> {
    pub fn new(registry: PlayRegistry<P>) -> Self {
        Self {
            registry,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn registry(&self) -> &PlayRegistry<P> {
        &self.registry
    }

    pub fn into_inner(self) -> PlayRegistry<P> {
        self.registry
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Run a structural change on the registry and announce it.
    ///
    /// Listeners get [`ModelEvent::LayoutChanged`] only when `f` succeeds.
    pub fn mutate<T, E, F>(&mut self, f: F) -> ApplicationResult<T>
    where
        F: FnOnce(&mut PlayRegistry<P>) -> Result<T, E>,
        E: Into<ApplicationError>,
    {
        let out = f(&mut self.registry).map_err(Into::<ApplicationError>::into)?;
        self.notify(ModelEvent::LayoutChanged);
        Ok(out)
    }

    pub fn insert<S: AsRef<str>>(&mut self, path: &[S], play: Rc<P>) -> ApplicationResult<ModelIndex> {
        let id = self.mutate(|registry| registry.insert(path, play))?;
        Ok(self.index_of(id))
    }

    pub fn delete<S: AsRef<str>>(&mut self, path: &[S], key: &str) -> ApplicationResult<()> {
        self.mutate(|registry| registry.delete(path, key))
    }

    /// Index addressing `id`; invalid for the root and for stale ids.
    pub fn index_of(&self, id: NodeId) -> ModelIndex {
        if id == self.registry.root() || self.registry.node(id).is_none() {
            return ModelIndex::invalid();
        }
        ModelIndex::new(self.registry.row_of(id), 0, id)
    }

    /// Node addressed by a valid index.
    pub fn node_at(&self, index: &ModelIndex) -> Option<&Node<P>> {
        index.node.and_then(|id| self.registry.node(id))
    }

    /// Category that `parent` addresses, the root for the invalid index.
    fn resolve_parent(&self, parent: &ModelIndex) -> Option<NodeId> {
        match parent.node {
            None => Some(self.registry.root()),
            Some(id) => self.registry.node(id).map(|_| id),
        }
    }

    /// The `row`-th child of a category.
    pub fn child_at(&self, parent: &ModelIndex, row: usize) -> ApplicationResult<ModelIndex> {
        let id = self
            .resolve_parent(parent)
            .ok_or_else(|| DomainError::InvalidIndex(format!("stale parent {parent:?}")))?;
        match self.registry.node(id) {
            Some(Node::Category(category)) => category
                .children()
                .get(row)
                .map(|&child| ModelIndex::new(row, 0, child))
                .ok_or_else(|| {
                    DomainError::InvalidIndex(format!(
                        "row {row} out of bounds for '{}' ({} rows)",
                        category.name(),
                        category.children().len()
                    ))
                    .into()
                }),
            Some(Node::Play(play)) => Err(DomainError::InvalidIndex(format!(
                "play '{}' has no children",
                play.name()
            ))
            .into()),
            None => Err(DomainError::InvalidIndex(format!("stale parent {parent:?}")).into()),
        }
    }

    /// Category name or play display name.
    pub fn display_value(&self, index: &ModelIndex) -> Option<String> {
        self.node_at(index).map(|node| node.name().to_string())
    }

    /// Enabled flag of a play; categories have no check state.
    pub fn check_state(&self, index: &ModelIndex) -> Option<bool> {
        self.node_at(index)
            .and_then(Node::as_play)
            .map(|play| play.enabled())
    }

    pub fn header_label(column: usize) -> Option<&'static str> {
        (column == 0).then_some(PLAY_HEADER)
    }

    /// Flip the play at `index` and announce the change for that row only.
    ///
    /// Fails with [`DomainError::InvalidOperation`] on a category.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle(&mut self, index: &ModelIndex) -> ApplicationResult<bool> {
        let Some(id) = index.node else {
            return Ok(false);
        };
        let enabled = self.registry.toggle(id)?;
        debug!(enabled, "play toggled");
        self.notify(ModelEvent::DataChanged {
            top_left: *index,
            bottom_right: *index,
        });
        Ok(true)
    }

    fn notify(&mut self, event: ModelEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl<P: Play> TreeModel for PlayRegistryModel<P> {
    fn column_count(&self, _parent: &ModelIndex) -> usize {
        1
    }

    fn row_count(&self, parent: &ModelIndex) -> usize {
        self.resolve_parent(parent)
            .map(|id| self.registry.children(id).len())
            .unwrap_or(0)
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column != 0 {
            return ModelIndex::invalid();
        }
        self.child_at(parent, row).unwrap_or_default()
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        index
            .node
            .and_then(|id| self.registry.parent(id))
            .map(|parent| self.index_of(parent))
            .unwrap_or_default()
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> Option<ItemData> {
        match role {
            ItemRole::Display if index.column == 0 => self.display_value(index).map(ItemData::Text),
            ItemRole::Display => None,
            ItemRole::CheckState => self.check_state(index).map(ItemData::Checked),
        }
    }

    fn flags(&self, _index: &ModelIndex) -> ItemFlags {
        ItemFlags::all()
    }

    fn header_data(
        &self,
        section: usize,
        orientation: Orientation,
        role: ItemRole,
    ) -> Option<ItemData> {
        match (orientation, role) {
            (Orientation::Horizontal, ItemRole::Display) => {
                Self::header_label(section).map(|label| ItemData::Text(label.to_string()))
            }
            _ => None,
        }
    }

    fn set_data(&mut self, index: &ModelIndex, role: ItemRole) -> ApplicationResult<bool> {
        match role {
            ItemRole::CheckState if index.is_valid() => self.toggle(index),
            _ => Ok(false),
        }
    }

    fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Drill(&'static str);

    impl Play for Drill {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn given_invalid_index_then_default() {
        let index = ModelIndex::invalid();
        assert!(!index.is_valid());
        assert_eq!(index, ModelIndex::default());
    }

    #[test]
    fn given_header_column_then_only_first_is_labelled() {
        assert_eq!(PlayRegistryModel::<Drill>::header_label(0), Some("Play"));
        assert_eq!(PlayRegistryModel::<Drill>::header_label(1), None);
    }

    #[test]
    fn given_root_id_when_index_of_then_invalid() {
        let model: PlayRegistryModel<Drill> = PlayRegistryModel::default();
        let root = model.registry().root();
        assert!(!model.index_of(root).is_valid());
        assert_eq!(model.row_count(&ModelIndex::invalid()), 0);
    }
}
