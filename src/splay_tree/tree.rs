use crate::arena::{Entry, TypedArena};
use crate::splay_tree::config::{MissPolicy, SplayConfig};
use crate::splay_tree::node::Node;
use crate::splay_tree::{Error, Result};
use log::{debug, trace};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::ops::Index;

/// Bottom-up splay tree whose nodes live in a `TypedArena`. Child links are the ownership edges of
/// the tree and parent links are plain lookups.
pub struct Tree<T> {
    arena: TypedArena<Node<T>>,
    root: Option<Entry>,
    len: usize,
    miss_policy: MissPolicy,
}

impl<T> Tree<T> {
    pub fn new(config: SplayConfig) -> Self {
        Tree {
            arena: TypedArena::new(config.chunk_size),
            root: None,
            len: 0,
            miss_policy: config.miss_policy,
        }
    }

    pub fn root(&self) -> Option<Entry> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn clear(&mut self) {
        debug!("clearing splay tree with {} nodes", self.len);
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    /// Removes a node from storage without relinking the tree. Only used by the owning iterator,
    /// which has already read the links it still needs.
    pub fn take_node(&mut self, entry: Entry) -> Node<T> {
        self.len -= 1;
        self.arena.free(entry)
    }

    // Redirects whichever slot held `old` (the parent's child slot, or the root) to `new`.
    fn replace_child(&mut self, parent: Option<Entry>, old: Entry, new: Entry) {
        match parent {
            None => self.root = Some(new),
            Some(parent) => {
                let parent_node = &mut self.arena[parent];
                if parent_node.is_left_child(old) {
                    parent_node.left = Some(new);
                } else {
                    parent_node.right = Some(new);
                }
            }
        }
    }

    /// Promotes the right child of `x` into the position of `x`. Does nothing if `x` has no
    /// right child.
    fn rotate_left(&mut self, x: Entry) {
        let y = match self.arena[x].right {
            Some(y) => y,
            None => return,
        };

        let inner = self.arena[y].left;
        self.arena[x].right = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(x);
        }

        let parent = self.arena[x].parent;
        self.arena[y].parent = parent;
        self.replace_child(parent, x, y);

        self.arena[y].left = Some(x);
        self.arena[x].parent = Some(y);
    }

    /// Promotes the left child of `x` into the position of `x`. Does nothing if `x` has no left
    /// child.
    fn rotate_right(&mut self, x: Entry) {
        let y = match self.arena[x].left {
            Some(y) => y,
            None => return,
        };

        let inner = self.arena[y].right;
        self.arena[x].left = inner;
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(x);
        }

        let parent = self.arena[x].parent;
        self.arena[y].parent = parent;
        self.replace_child(parent, x, y);

        self.arena[y].right = Some(x);
        self.arena[x].parent = Some(y);
    }

    /// Rotates `x` up until it has no parent, then makes it the root.
    fn splay(&mut self, x: Entry) {
        let mut steps = 0;
        while let Some(parent) = self.arena[x].parent {
            let x_is_left = self.arena[parent].is_left_child(x);
            match self.arena[parent].parent {
                // zig
                None => {
                    if x_is_left {
                        self.rotate_right(parent);
                    } else {
                        self.rotate_left(parent);
                    }
                }
                Some(grandparent) => {
                    let parent_is_left = self.arena[grandparent].is_left_child(parent);
                    match (x_is_left, parent_is_left) {
                        // zig-zig
                        (true, true) => {
                            self.rotate_right(grandparent);
                            self.rotate_right(parent);
                        }
                        (false, false) => {
                            self.rotate_left(grandparent);
                            self.rotate_left(parent);
                        }
                        // zig-zag
                        (true, false) => {
                            self.rotate_right(parent);
                            self.rotate_left(grandparent);
                        }
                        (false, true) => {
                            self.rotate_left(parent);
                            self.rotate_right(grandparent);
                        }
                    }
                }
            }
            steps += 1;
        }
        trace!("splayed node to root in {} steps", steps);
        self.root = Some(x);
    }

    /// Descends from the root toward `key` and returns the node holding it, or the last node
    /// visited together with the side on which `key` would hang.
    fn locate<V>(&self, key: &V) -> Option<(Entry, Ordering)>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root?;
        loop {
            let node = &self.arena[curr];
            let ordering = key.cmp(node.key.borrow());
            let next = match ordering {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some((curr, ordering)),
            };
            match next {
                Some(child) => curr = child,
                None => return Some((curr, ordering)),
            }
        }
    }

    fn subtree_max(&self, mut curr: Entry) -> Entry {
        while let Some(right) = self.arena[curr].right {
            curr = right;
        }
        curr
    }

    fn subtree_min(&self, mut curr: Entry) -> Entry {
        while let Some(left) = self.arena[curr].left {
            curr = left;
        }
        curr
    }

    /// Looks up `key` and splays the node holding it to the root. On a miss, the last visited
    /// node is splayed instead unless the tree was configured to leave its shape alone.
    pub fn search<V>(&mut self, key: &V) -> Option<Entry>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let (entry, ordering) = match self.locate(key) {
            Some(found) => found,
            None => {
                trace!("search on empty tree");
                return None;
            }
        };

        if ordering == Ordering::Equal {
            trace!("search hit");
            self.splay(entry);
            return Some(entry);
        }

        trace!("search miss");
        if self.miss_policy == MissPolicy::SplayLastVisited {
            self.splay(entry);
        }
        None
    }

    /// Inserts `key` and splays its node to the root. Returns `false` if the key was already
    /// present, in which case the stored key is kept.
    pub fn insert(&mut self, key: T) -> bool
    where
        T: Ord,
    {
        let (parent, ordering) = match self.locate(&key) {
            Some(found) => found,
            None => {
                self.root = Some(self.arena.allocate(Node::new(key)));
                self.len = 1;
                trace!("inserted root of empty tree");
                return true;
            }
        };

        if ordering == Ordering::Equal {
            trace!("insert of existing key");
            self.splay(parent);
            return false;
        }

        let entry = self.arena.allocate(Node::with_parent(key, parent));
        if ordering == Ordering::Less {
            self.arena[parent].left = Some(entry);
        } else {
            self.arena[parent].right = Some(entry);
        }
        self.len += 1;
        trace!("inserted new key; tree has {} nodes", self.len);
        self.splay(entry);
        true
    }

    /// Removes `key` from the tree and returns it. The lookup splays the target, or the nearest
    /// node on a miss, before any node is unlinked.
    pub fn remove<V>(&mut self, key: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let target = self.search(key)?;
        let (left, right) = self.arena[target].detach();

        self.root = match left {
            None => {
                if let Some(right) = right {
                    self.arena[right].parent = None;
                }
                right
            }
            Some(left) => {
                // Splay the maximum of the left subtree as if it were a tree of its own. The
                // maximum then has no right child, which is where the right subtree goes.
                self.arena[left].parent = None;
                self.root = Some(left);
                let max = self.subtree_max(left);
                self.splay(max);
                self.arena[max].right = right;
                if let Some(right) = right {
                    self.arena[right].parent = Some(max);
                }
                Some(max)
            }
        };

        self.len -= 1;
        if self.root.is_none() {
            debug!("removed last node of splay tree");
        }
        Some(self.arena.free(target).key)
    }

    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        match self.locate(key) {
            Some((_, ordering)) => ordering == Ordering::Equal,
            None => false,
        }
    }

    pub fn min(&self) -> Option<&T> {
        self.root
            .map(|root| &self.arena[self.subtree_min(root)].key)
    }

    pub fn max(&self) -> Option<&T> {
        self.root
            .map(|root| &self.arena[self.subtree_max(root)].key)
    }

    /// Returns the greatest key less than or equal to `key`.
    pub fn floor<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        let mut best = None;
        while let Some(entry) = curr {
            let node = &self.arena[entry];
            match key.cmp(node.key.borrow()) {
                Ordering::Less => curr = node.left,
                Ordering::Greater => {
                    best = Some(&node.key);
                    curr = node.right;
                }
                Ordering::Equal => return Some(&node.key),
            }
        }
        best
    }

    /// Returns the least key greater than or equal to `key`.
    pub fn ceil<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let mut curr = self.root;
        let mut best = None;
        while let Some(entry) = curr {
            let node = &self.arena[entry];
            match key.cmp(node.key.borrow()) {
                Ordering::Greater => curr = node.right,
                Ordering::Less => {
                    best = Some(&node.key);
                    curr = node.left;
                }
                Ordering::Equal => return Some(&node.key),
            }
        }
        best
    }

    /// Walks every node reachable from the root and checks key order, parent links and the
    /// element count.
    pub fn validate(&self) -> Result<()>
    where
        T: Ord,
    {
        let root = match self.root {
            Some(root) => root,
            None if self.len == 0 => return Ok(()),
            None => {
                return Err(Error::LengthMismatch {
                    expected: self.len,
                    actual: 0,
                })
            }
        };
        if self.arena[root].parent.is_some() {
            return Err(Error::RootHasParent);
        }

        let mut count = 0;
        let mut stack: Vec<(Entry, Option<&T>, Option<&T>)> = vec![(root, None, None)];
        while let Some((entry, lower, upper)) = stack.pop() {
            count += 1;
            // More visits than live nodes means some node is reachable twice.
            if count > self.arena.len() {
                return Err(Error::LengthMismatch {
                    expected: self.len,
                    actual: count,
                });
            }

            let node = &self.arena[entry];
            if lower.map_or(false, |lower| *lower >= node.key)
                || upper.map_or(false, |upper| *upper <= node.key)
            {
                return Err(Error::OrderViolation);
            }
            if let Some(left) = node.left {
                if self.arena[left].parent != Some(entry) {
                    return Err(Error::ParentMismatch);
                }
                stack.push((left, lower, Some(&node.key)));
            }
            if let Some(right) = node.right {
                if self.arena[right].parent != Some(entry) {
                    return Err(Error::ParentMismatch);
                }
                stack.push((right, Some(&node.key), upper));
            }
        }

        if count != self.len {
            return Err(Error::LengthMismatch {
                expected: self.len,
                actual: count,
            });
        }
        Ok(())
    }
}

impl<T> Index<Entry> for Tree<T> {
    type Output = Node<T>;

    fn index(&self, entry: Entry) -> &Self::Output {
        &self.arena[entry]
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::arena::Entry;
    use crate::splay_tree::{Error, MissPolicy, SplayConfig};

    fn new_tree() -> Tree<u32> {
        Tree::new(SplayConfig::default())
    }

    fn tree_from(keys: &[u32]) -> Tree<u32> {
        let mut tree = new_tree();
        for key in keys {
            tree.insert(*key);
        }
        tree
    }

    fn subtree_shape(tree: &Tree<u32>, entry: Option<Entry>) -> String {
        match entry {
            None => String::from("."),
            Some(entry) => {
                let node = &tree[entry];
                format!(
                    "({} {} {})",
                    node.key,
                    subtree_shape(tree, node.left),
                    subtree_shape(tree, node.right),
                )
            }
        }
    }

    fn shape(tree: &Tree<u32>) -> String {
        subtree_shape(tree, tree.root())
    }

    fn root_key(tree: &Tree<u32>) -> Option<u32> {
        tree.root().map(|root| tree[root].key)
    }

    #[test]
    fn test_rotate_without_child_is_noop() {
        let mut tree = tree_from(&[1]);
        let root = tree.root().unwrap();
        tree.rotate_left(root);
        tree.rotate_right(root);
        assert_eq!(shape(&tree), "(1 . .)");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_rotate_left_and_right() {
        // 2 becomes the root with 1 on its left.
        let mut tree = tree_from(&[1, 2]);
        assert_eq!(shape(&tree), "(2 (1 . .) .)");

        let root = tree.root().unwrap();
        tree.rotate_right(root);
        assert_eq!(shape(&tree), "(1 . (2 . .))");
        assert_eq!(tree.validate(), Ok(()));

        let root = tree.root().unwrap();
        tree.rotate_left(root);
        assert_eq!(shape(&tree), "(2 (1 . .) .)");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_rotate_moves_inner_subtree() {
        let mut tree = tree_from(&[1, 3, 2]);
        assert_eq!(shape(&tree), "(2 (1 . .) (3 . .))");

        let root = tree.root().unwrap();
        tree.rotate_left(root);
        assert_eq!(shape(&tree), "(3 (2 (1 . .) .) .)");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_splay_zig() {
        let mut tree = tree_from(&[1, 2]);
        assert!(tree.search(&1).is_some());
        assert_eq!(shape(&tree), "(1 . (2 . .))");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_splay_zig_zig() {
        let mut tree = tree_from(&[1, 2, 3]);
        assert_eq!(shape(&tree), "(3 (2 (1 . .) .) .)");

        assert!(tree.search(&1).is_some());
        assert_eq!(shape(&tree), "(1 . (2 . (3 . .)))");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_splay_zig_zag() {
        let mut tree = tree_from(&[1, 3]);
        assert_eq!(shape(&tree), "(3 (1 . .) .)");

        // 2 hangs to the right of 1, which is the left child of 3.
        tree.insert(2);
        assert_eq!(shape(&tree), "(2 (1 . .) (3 . .))");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_insert_existing_key_splays() {
        let mut tree = tree_from(&[10, 20, 5]);
        assert_eq!(shape(&tree), "(5 . (10 . (20 . .)))");

        assert!(!tree.insert(20));
        assert_eq!(tree.len(), 3);
        assert_eq!(shape(&tree), "(20 (10 (5 . .) .) .)");
    }

    #[test]
    fn test_search_empty() {
        let mut tree = new_tree();
        assert_eq!(tree.search(&1), None);
        assert_eq!(tree.root(), None);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_search_miss_splays_last_visited() {
        let mut tree = tree_from(&[10, 20, 5]);
        assert_eq!(tree.search(&15), None);
        assert_eq!(root_key(&tree), Some(20));
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_search_miss_leave_unchanged() {
        let mut tree = Tree::new(SplayConfig::new(16, MissPolicy::LeaveUnchanged));
        for key in &[10, 20, 5] {
            tree.insert(*key);
        }
        assert_eq!(tree.search(&15), None);
        assert_eq!(shape(&tree), "(5 . (10 . (20 . .)))");

        assert!(tree.search(&20).is_some());
        assert_eq!(root_key(&tree), Some(20));
    }

    #[test]
    fn test_remove_shapes() {
        let mut tree = tree_from(&[10, 20, 5]);
        assert!(tree.search(&20).is_some());

        assert_eq!(tree.remove(&5), Some(5));
        assert_eq!(shape(&tree), "(10 . (20 . .))");

        assert_eq!(tree.remove(&20), Some(20));
        assert_eq!(shape(&tree), "(10 . .)");

        assert_eq!(tree.remove(&10), Some(10));
        assert_eq!(tree.root(), None);
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_remove_joins_with_left_maximum() {
        let mut tree = tree_from(&[1, 3, 2]);
        assert_eq!(tree.remove(&2), Some(2));
        assert_eq!(shape(&tree), "(1 . (3 . .))");
        assert_eq!(tree.validate(), Ok(()));

        let mut tree = tree_from(&[4, 2, 1, 3, 6, 5, 7]);
        assert!(tree.search(&4).is_some());
        assert_eq!(tree.remove(&4), Some(4));
        assert_eq!(root_key(&tree), Some(3));
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_remove_missing_key() {
        let mut tree = tree_from(&[10, 20, 5]);
        assert_eq!(tree.remove(&15), None);
        assert_eq!(tree.len(), 3);
        assert_eq!(root_key(&tree), Some(20));
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_removed_slot_is_reused() {
        let mut tree = tree_from(&[1, 2]);
        tree.remove(&1);
        tree.insert(3);
        assert_eq!(tree.arena.len(), 2);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_floor_ceil_do_not_splay() {
        let tree = tree_from(&[1, 3, 5]);
        assert_eq!(tree.floor(&4), Some(&3));
        assert_eq!(tree.ceil(&4), Some(&5));
        assert_eq!(root_key(&tree), Some(5));
    }

    #[test]
    fn test_validate_order_violation() {
        let mut tree = tree_from(&[1, 2]);
        let root = tree.root().unwrap();
        tree.arena[root].key = 0;
        assert_eq!(tree.validate(), Err(Error::OrderViolation));
    }

    #[test]
    fn test_validate_parent_mismatch() {
        let mut tree = tree_from(&[1, 2]);
        let root = tree.root().unwrap();
        let child = tree[root].left.unwrap();
        tree.arena[child].parent = None;
        assert_eq!(tree.validate(), Err(Error::ParentMismatch));
    }

    #[test]
    fn test_validate_root_has_parent() {
        let mut tree = tree_from(&[1, 2]);
        let root = tree.root().unwrap();
        let child = tree[root].left.unwrap();
        tree.arena[root].parent = Some(child);
        assert_eq!(tree.validate(), Err(Error::RootHasParent));
    }

    #[test]
    fn test_validate_length_mismatch() {
        let mut tree = tree_from(&[1, 2]);
        tree.len = 3;
        assert_eq!(
            tree.validate(),
            Err(Error::LengthMismatch {
                expected: 3,
                actual: 2,
            }),
        );
    }
}
