use crate::arena::Entry;

/// A node of a splay tree.
///
/// `left` and `right` name the subtrees this node holds. `parent` only names the node holding
/// this one and is used to walk upward while splaying; it never keeps anything alive.
pub struct Node<T> {
    pub key: T,
    pub left: Option<Entry>,
    pub right: Option<Entry>,
    pub parent: Option<Entry>,
}

impl<T> Node<T> {
    pub fn new(key: T) -> Self {
        Node {
            key,
            left: None,
            right: None,
            parent: None,
        }
    }

    pub fn with_parent(key: T, parent: Entry) -> Self {
        Node {
            parent: Some(parent),
            ..Node::new(key)
        }
    }

    /// Returns `true` if `entry` is this node's left child.
    pub fn is_left_child(&self, entry: Entry) -> bool {
        self.left == Some(entry)
    }

    /// Clears all links so the node refers to nothing left in the tree.
    pub fn detach(&mut self) -> (Option<Entry>, Option<Entry>) {
        self.parent = None;
        (self.left.take(), self.right.take())
    }
}
