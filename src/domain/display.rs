/*
Human-readable renderings of the registry, for logs and the CLI.
The indented dump is the diagnostic format; the termtree rendering is only for terminals.
 */
use std::fmt;

use termtree::Tree;

use crate::domain::entities::Play;
use crate::domain::node::{Node, NodeId};
use crate::domain::registry::PlayRegistry;

const INDENT: &str = "    ";

impl<P: Play> PlayRegistry<P> {
    /// Indented dump: one line per node, four spaces per level.
    ///
    /// Categories print as `name:`, plays as `Name [ENABLED]` or
    /// `Name [DISABLED]`. No trailing newline.
    pub fn to_display_string(&self) -> String {
        let mut lines = Vec::new();
        self.collect_lines(self.root, 0, &mut lines);
        lines.join("\n")
    }

    fn collect_lines(&self, category: NodeId, depth: usize, lines: &mut Vec<String>) {
        for &child in self.children(category) {
            match self.node(child) {
                Some(Node::Category(sub)) => {
                    lines.push(format!("{}{}:", INDENT.repeat(depth), sub.name()));
                    self.collect_lines(child, depth + 1, lines);
                }
                Some(Node::Play(play)) => {
                    lines.push(format!("{}{}", INDENT.repeat(depth), play));
                }
                None => {}
            }
        }
    }
}

impl<P: Play> fmt::Display for PlayRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PlayRegistry:")?;
        writeln!(f, "-------------")?;
        write!(f, "{}", self.to_display_string())
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<P: Play> TreeNodeConvert for PlayRegistry<P> {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree<P: Play>(registry: &PlayRegistry<P>, node_idx: NodeId, parent_tree: &mut Tree<String>) {
            for &child_idx in registry.children(node_idx) {
                match registry.node(child_idx) {
                    Some(Node::Category(category)) => {
                        let mut child_tree = Tree::new(category.name().to_string());
                        build_tree(registry, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                    Some(Node::Play(play)) => {
                        parent_tree.push(Tree::new(play.to_string()));
                    }
                    None => {}
                }
            }
        }

        let mut tree = Tree::new("plays".to_string());
        build_tree(self, self.root(), &mut tree);
        tree
    }
}
