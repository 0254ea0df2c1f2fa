//! Self-adjusting ordered collections.
//!
//! The `splay_tree` module provides `SplaySet<T>`, an ordered set backed by a bottom-up splay
//! tree. Nodes are stored in a typed arena and linked by arena handles, so parent links never
//! form ownership cycles.

mod arena;
pub mod splay_tree;
