use std::rc::Rc;

use generational_arena::Arena;
use tracing::{debug, instrument, trace};

use crate::domain::entities::{display_path, Play};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{Category, Node, NodeId, PlayNode};

/// Arena-based registry of plays, organized by module path.
///
/// The root category has an empty name and lives for the lifetime of the
/// registry. Categories are created on demand by [`PlayRegistry::insert`] and
/// pruned by [`PlayRegistry::delete`] once they no longer hold anything.
/// Parent links are arena indices and never own their target.
#[derive(Debug)]
pub struct PlayRegistry<P> {
    pub(crate) arena: Arena<Node<P>>,
    pub(crate) root: NodeId,
}

impl<P: Play> Default for PlayRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Play> PlayRegistry<P> {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Node::Category(Category::new("", None)));
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<P>> {
        self.arena.get(id)
    }

    pub fn play(&self, id: NodeId) -> Option<&PlayNode<P>> {
        self.arena.get(id).and_then(Node::as_play)
    }

    /// Children of a category; empty for plays and stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.arena.get(id).map(Node::children).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(Node::parent)
    }

    /// Position of a node among its parent's children, 0 when parentless.
    pub fn row_of(&self, id: NodeId) -> usize {
        self.parent(id)
            .and_then(|parent| self.children(parent).iter().position(|&c| c == id))
            .unwrap_or(0)
    }

    /// Number of registered plays.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    fn child_named(&self, category: NodeId, name: &str) -> Option<NodeId> {
        self.children(category)
            .iter()
            .copied()
            .find(|&child| self.arena.get(child).is_some_and(|n| n.name() == name))
    }

    fn append(&mut self, parent: NodeId, node: Node<P>) -> NodeId {
        let id = self.arena.insert(node);
        if let Some(Node::Category(category)) = self.arena.get_mut(parent) {
            category.children.push(id);
        }
        id
    }

    /// Insert a play at `path`.
    ///
    /// All segments but the last name categories below the root, created when
    /// missing. The last segment is the play's module name. Fails with
    /// [`DomainError::Duplicate`] if a sibling already uses the play's name or
    /// a play occupies one of the category names; the registry is unchanged
    /// in that case.
    #[instrument(level = "debug", skip_all, fields(path = %display_path(path), play = play.name()))]
    pub fn insert<S: AsRef<str>>(&mut self, path: &[S], play: Rc<P>) -> DomainResult<NodeId> {
        self.check_insert(path, play.name())?;
        let (module_name, categories) = path.split_last().ok_or(DomainError::EmptyPath)?;

        let mut category = self.root;
        for segment in categories {
            category = match self.child_named(category, segment.as_ref()) {
                Some(id) => id,
                None => {
                    trace!(segment = segment.as_ref(), "creating category");
                    let node = Node::Category(Category::new(segment.as_ref(), Some(category)));
                    self.append(category, node)
                }
            };
        }

        let node = Node::Play(PlayNode::new(module_name.as_ref(), play, category));
        let id = self.append(category, node);
        debug!("play registered");
        Ok(id)
    }

    /// Check that a play named `name` could be inserted at `path`.
    ///
    /// Runs the same validation as [`PlayRegistry::insert`] without touching
    /// the registry.
    pub fn check_insert<S: AsRef<str>>(&self, path: &[S], name: &str) -> DomainResult<()> {
        let (_, categories) = path.split_last().ok_or(DomainError::EmptyPath)?;

        let mut existing = Some(self.root);
        for (depth, segment) in categories.iter().enumerate() {
            let Some(category) = existing else { break };
            existing = match self.child_named(category, segment.as_ref()) {
                Some(id) if self.arena.get(id).is_some_and(Node::is_play) => {
                    return Err(DomainError::Duplicate {
                        path: display_path(&categories[..depth]),
                        name: segment.as_ref().to_string(),
                    });
                }
                found => found,
            };
        }
        match existing {
            Some(category) if self.child_named(category, name).is_some() => {
                Err(DomainError::Duplicate {
                    path: display_path(categories),
                    name: name.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Walk `path` minus its last segment and find the play named `key`.
    ///
    /// Returns the visited categories (root first) and the play's id.
    fn find_with_stack<S: AsRef<str>>(
        &self,
        path: &[S],
        key: &str,
    ) -> DomainResult<(Vec<NodeId>, NodeId)> {
        let (_, categories) = path.split_last().ok_or(DomainError::EmptyPath)?;

        let mut stack = vec![self.root];
        for (depth, segment) in categories.iter().enumerate() {
            let current = stack[stack.len() - 1];
            let next = self
                .child_named(current, segment.as_ref())
                .filter(|&id| self.arena.get(id).is_some_and(|n| !n.is_play()))
                .ok_or_else(|| DomainError::NotFound {
                    path: display_path(&categories[..depth]),
                    key: segment.as_ref().to_string(),
                })?;
            stack.push(next);
        }

        let parent = stack[stack.len() - 1];
        let play = self
            .child_named(parent, key)
            .filter(|&id| self.arena.get(id).is_some_and(Node::is_play))
            .ok_or_else(|| DomainError::NotFound {
                path: display_path(categories),
                key: key.to_string(),
            })?;
        Ok((stack, play))
    }

    /// Locate the play named `key` along `path`.
    pub fn locate<S: AsRef<str>>(&self, path: &[S], key: &str) -> DomainResult<NodeId> {
        self.find_with_stack(path, key).map(|(_, id)| id)
    }

    /// Remove the play named `key` along `path` and prune emptied categories.
    ///
    /// Lookup completes before anything is removed, so a
    /// [`DomainError::NotFound`] leaves the registry untouched. The root is
    /// never pruned.
    #[instrument(level = "debug", skip_all, fields(path = %display_path(path), key = %key))]
    pub fn delete<S: AsRef<str>>(&mut self, path: &[S], key: &str) -> DomainResult<()> {
        let (stack, play) = self.find_with_stack(path, key)?;
        self.detach(play);
        debug!("play removed");

        for &category in stack.iter().rev() {
            if category == self.root || !self.children(category).is_empty() {
                break;
            }
            if let Some(node) = self.detach(category) {
                trace!(category = node.name(), "pruned empty category");
            }
        }
        Ok(())
    }

    /// Remove `play` along `path`, keyed by its name.
    pub fn delete_play<S: AsRef<str>>(&mut self, path: &[S], play: &P) -> DomainResult<()> {
        self.delete(path, play.name())
    }

    fn detach(&mut self, id: NodeId) -> Option<Node<P>> {
        let node = self.arena.remove(id)?;
        if let Some(parent) = node.parent() {
            if let Some(Node::Category(category)) = self.arena.get_mut(parent) {
                category.children.retain(|&child| child != id);
            }
        }
        Some(node)
    }

    /// Depth-first iteration over plays, in insertion order.
    pub fn iter(&self) -> Plays<'_, P> {
        Plays {
            entries: self.entries(),
        }
    }

    /// Like [`PlayRegistry::iter`], with each play's node id.
    pub fn entries(&self) -> Entries<'_, P> {
        Entries::new(self)
    }

    /// Payloads of all enabled plays, in traversal order.
    pub fn enabled_plays(&self) -> Vec<Rc<P>> {
        self.iter()
            .filter(|node| node.enabled)
            .map(|node| Rc::clone(&node.play))
            .collect()
    }

    /// True if this exact play instance is registered.
    pub fn contains(&self, play: &Rc<P>) -> bool {
        self.iter().any(|node| Rc::ptr_eq(&node.play, play))
    }

    /// First play in traversal order with the given display name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.entries()
            .find(|(_, node)| node.name() == name)
            .map(|(id, _)| id)
    }

    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> DomainResult<()> {
        match self.arena.get_mut(id) {
            Some(Node::Play(play)) => {
                play.enabled = enabled;
                Ok(())
            }
            Some(Node::Category(category)) => Err(DomainError::InvalidOperation(format!(
                "category '{}' has no enabled state",
                category.name
            ))),
            None => Err(DomainError::InvalidIndex(format!("{id:?}"))),
        }
    }

    /// Flip a play between enabled and disabled, returning the new state.
    #[instrument(level = "debug", skip(self))]
    pub fn toggle(&mut self, id: NodeId) -> DomainResult<bool> {
        let enabled = match self.arena.get(id) {
            Some(Node::Play(play)) => !play.enabled,
            Some(Node::Category(category)) => {
                return Err(DomainError::InvalidOperation(format!(
                    "only plays are checkable, '{}' is a category",
                    category.name
                )))
            }
            None => return Err(DomainError::InvalidIndex(format!("{id:?}"))),
        };
        self.set_enabled(id, enabled)?;
        Ok(enabled)
    }
}

/// Depth-first iterator over `(id, play)` pairs.
pub struct Entries<'a, P> {
    registry: &'a PlayRegistry<P>,
    stack: Vec<NodeId>,
}

impl<'a, P: Play> Entries<'a, P> {
    fn new(registry: &'a PlayRegistry<P>) -> Self {
        // Push children in reverse order for left-to-right traversal
        let stack = registry.children(registry.root).iter().rev().copied().collect();
        Self { registry, stack }
    }
}

impl<'a, P: Play> Iterator for Entries<'a, P> {
    type Item = (NodeId, &'a PlayNode<P>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            match self.registry.arena.get(current) {
                Some(Node::Category(category)) => {
                    self.stack.extend(category.children.iter().rev());
                }
                Some(Node::Play(play)) => return Some((current, play)),
                None => {}
            }
        }
        None
    }
}

/// Depth-first iterator over plays.
pub struct Plays<'a, P> {
    entries: Entries<'a, P>,
}

impl<'a, P: Play> Iterator for Plays<'a, P> {
    type Item = &'a PlayNode<P>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|(_, play)| play)
    }
}

impl<'a, P: Play> IntoIterator for &'a PlayRegistry<P> {
    type Item = &'a PlayNode<P>;
    type IntoIter = Plays<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
