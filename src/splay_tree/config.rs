/// What a lookup that does not find its key does to the shape of the tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MissPolicy {
    /// Splay the last node visited during the descent. This keeps the amortized `O(log n)`
    /// bound for every access, hit or miss.
    SplayLastVisited,
    /// Leave the tree untouched when the key is absent.
    LeaveUnchanged,
}

impl Default for MissPolicy {
    fn default() -> Self {
        MissPolicy::SplayLastVisited
    }
}

/// Tuning parameters for a `SplaySet<T>`.
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::{MissPolicy, SplayConfig, SplaySet};
///
/// let config = SplayConfig::new(256, MissPolicy::LeaveUnchanged);
/// let mut set = SplaySet::with_config(config);
/// set.insert(1);
/// set.insert(2);
///
/// assert_eq!(set.search(&0), None);
/// assert_eq!(set.root(), Some(&2));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SplayConfig {
    /// The number of nodes allocated per arena chunk.
    pub chunk_size: usize,
    pub miss_policy: MissPolicy,
}

impl SplayConfig {
    pub const DEFAULT_CHUNK_SIZE: usize = 1024;

    /// Constructs a configuration with `chunk_size` nodes per arena chunk and the given miss
    /// policy.
    pub fn new(chunk_size: usize, miss_policy: MissPolicy) -> Self {
        SplayConfig {
            chunk_size,
            miss_policy,
        }
    }
}

impl Default for SplayConfig {
    fn default() -> Self {
        SplayConfig::new(Self::DEFAULT_CHUNK_SIZE, MissPolicy::default())
    }
}
