//! Registry nodes stored in the arena.

use std::fmt;
use std::rc::Rc;

use generational_arena::Index;

use crate::domain::entities::Play;

/// Arena handle of a registry node.
pub type NodeId = Index;

/// Folder grouping plays.
#[derive(Debug)]
pub struct Category {
    /// Single path component, empty for the root
    pub(crate) name: String,
    /// Index of the owning category, None for the root
    pub(crate) parent: Option<NodeId>,
    /// Child indices in insertion order
    pub(crate) children: Vec<NodeId>,
}

impl Category {
    pub(crate) fn new(name: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Leaf wrapping one registered play.
#[derive(Debug)]
pub struct PlayNode<P> {
    pub(crate) module_name: String,
    pub(crate) play: Rc<P>,
    pub(crate) enabled: bool,
    pub(crate) parent: Option<NodeId>,
}

impl<P: Play> PlayNode<P> {
    pub(crate) fn new(module_name: impl Into<String>, play: Rc<P>, parent: NodeId) -> Self {
        Self {
            module_name: module_name.into(),
            play,
            enabled: true,
            parent: Some(parent),
        }
    }

    /// Display name of the play; also its key among siblings.
    pub fn name(&self) -> &str {
        self.play.name()
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn play(&self) -> &Rc<P> {
        &self.play
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

impl<P: Play> fmt::Display for PlayNode<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.enabled { "[ENABLED]" } else { "[DISABLED]" };
        write!(f, "{} {}", self.name(), state)
    }
}

/// A registry node: either a category or a play.
#[derive(Debug)]
pub enum Node<P> {
    Category(Category),
    Play(PlayNode<P>),
}

impl<P: Play> Node<P> {
    /// Category name or play display name.
    pub fn name(&self) -> &str {
        match self {
            Node::Category(category) => category.name(),
            Node::Play(play) => play.name(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Category(category) => category.parent,
            Node::Play(play) => play.parent,
        }
    }

    /// Children of a category, empty for a play.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Category(category) => &category.children,
            Node::Play(_) => &[],
        }
    }

    pub fn as_category(&self) -> Option<&Category> {
        match self {
            Node::Category(category) => Some(category),
            Node::Play(_) => None,
        }
    }

    pub fn as_play(&self) -> Option<&PlayNode<P>> {
        match self {
            Node::Category(_) => None,
            Node::Play(play) => Some(play),
        }
    }

    pub fn is_play(&self) -> bool {
        matches!(self, Node::Play(_))
    }
}
