use crate::arena::Entry;
use crate::splay_tree::config::SplayConfig;
use crate::splay_tree::tree::Tree;
use crate::splay_tree::Result;
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;

/// An ordered set implemented using a splay tree.
///
/// A splay tree is a self-adjusting binary search tree with the additional property that
/// recently accessed keys are quick to access again. After `insert`, `remove` and `search`, the
/// accessed key (or, for a key that is absent, the last key compared against) is "splayed" to
/// the root of the tree. The ordered queries (`contains`, `min`, `max`, `floor`, `ceil`) and
/// iteration take `&self` and leave the tree as it is.
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::SplaySet;
///
/// let mut set = SplaySet::new();
/// set.insert(10);
/// set.insert(20);
/// set.insert(5);
///
/// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&5, &10, &20]);
///
/// assert_eq!(set.search(&20), Some(&20));
/// assert_eq!(set.root(), Some(&20));
///
/// assert_eq!(set.remove(&5), Some(5));
/// assert_eq!(set.search(&5), None);
/// assert_eq!(set.len(), 2);
/// ```
pub struct SplaySet<T> {
    tree: Tree<T>,
}

impl<T> SplaySet<T> {
    /// Constructs a new, empty `SplaySet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let set: SplaySet<u32> = SplaySet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(SplayConfig::default())
    }

    /// Constructs a new, empty `SplaySet<T>` using the given configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::{MissPolicy, SplayConfig, SplaySet};
    ///
    /// let set: SplaySet<u32> = SplaySet::with_config(SplayConfig::new(64, MissPolicy::default()));
    /// ```
    pub fn with_config(config: SplayConfig) -> Self {
        SplaySet {
            tree: Tree::new(config),
        }
    }

    /// Inserts a key into the set and splays it to the root. Returns `true` if the key was not
    /// already present. If it was, the set is unchanged and the stored key is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> bool
    where
        T: Ord,
    {
        self.tree.insert(key)
    }

    /// Removes a key from the set. If the key exists in the set, it will return it. Otherwise
    /// it will return `None`. Either way, the lookup splays the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.remove(key)
    }

    /// Looks up a key, splays it to the root and returns a reference to it. If the key does not
    /// exist, the last key compared against is splayed instead (depending on the configured
    /// `MissPolicy`) and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.search(&1), Some(&1));
    /// assert_eq!(set.root(), Some(&1));
    ///
    /// assert_eq!(set.search(&4), None);
    /// assert_eq!(set.root(), Some(&3));
    /// ```
    pub fn search<V>(&mut self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let entry = self.tree.search(key)?;
        Some(&self.tree[entry].key)
    }

    /// Checks if a key exists in the set. Note that `contains` does not splay the tree in order
    /// to use a non-mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.contains(key)
    }

    /// Returns the key at the root of the tree, which is the most recently splayed key.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// assert_eq!(set.root(), None);
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.root(), Some(&1));
    /// ```
    pub fn root(&self) -> Option<&T> {
        self.tree.root().map(|root| &self.tree[root].key)
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let set: SplaySet<u32> = SplaySet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns a key in the set that is less than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// assert_eq!(set.floor(&0), None);
    /// assert_eq!(set.floor(&2), Some(&1));
    /// ```
    pub fn floor<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.floor(key)
    }

    /// Returns a key in the set that is greater than or equal to a particular key. Returns
    /// `None` if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// assert_eq!(set.ceil(&0), Some(&1));
    /// assert_eq!(set.ceil(&2), None);
    /// ```
    pub fn ceil<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        self.tree.ceil(key)
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.tree.min()
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.tree.max()
    }

    /// Checks the structural invariants of the underlying tree: every key lies strictly between
    /// the keys bounding its subtree, every child links back to its parent, the root has no
    /// parent, and the number of reachable nodes equals `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let set: SplaySet<u32> = (0..100).collect();
    /// assert!(set.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()>
    where
        T: Ord,
    {
        self.tree.validate()
    }

    /// Returns an iterator over the set. The iterator will yield keys using in-order traversal
    /// and does not splay the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> SplaySetIter<T> {
        SplaySetIter {
            tree: &self.tree,
            current: self.tree.root(),
            stack: Vec::new(),
        }
    }
}

impl<T> IntoIterator for SplaySet<T> {
    type Item = T;
    type IntoIter = SplaySetIntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let current = self.tree.root();
        SplaySetIntoIter {
            tree: self.tree,
            current,
            stack: Vec::new(),
        }
    }
}

impl<'a, T> IntoIterator for &'a SplaySet<T>
where
    T: 'a,
{
    type Item = &'a T;
    type IntoIter = SplaySetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `SplaySet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned keys.
pub struct SplaySetIntoIter<T> {
    tree: Tree<T>,
    current: Option<Entry>,
    stack: Vec<Entry>,
}

impl<T> Iterator for SplaySetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.current {
            self.current = self.tree[entry].left;
            self.stack.push(entry);
        }
        self.stack.pop().map(|entry| {
            let node = self.tree.take_node(entry);
            self.current = node.right;
            node.key
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

/// An iterator for `SplaySet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct SplaySetIter<'a, T>
where
    T: 'a,
{
    tree: &'a Tree<T>,
    current: Option<Entry>,
    stack: Vec<Entry>,
}

impl<'a, T> Iterator for SplaySetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        while let Some(entry) = self.current {
            self.current = tree[entry].left;
            self.stack.push(entry);
        }
        self.stack.pop().map(|entry| {
            let node = &tree[entry];
            self.current = node.right;
            &node.key
        })
    }
}

impl<T> Default for SplaySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for SplaySet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = SplaySet::new();
        set.extend(iter);
        set
    }
}

impl<T> Extend<T> for SplaySet<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T> fmt::Debug for SplaySet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
