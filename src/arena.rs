//! Chunked slot allocator backing the node storage of the trees in this crate.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object stored in a `TypedArena<T>`.
///
/// Handles are plain indices: copying one never extends the lifetime of the object it names, so
/// they double as non-owning back-references between nodes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Entry {
    chunk_index: usize,
    block_index: usize,
}

enum Block<T> {
    Occupied(T),
    Vacant(Option<Entry>),
}

/// An allocator for a single type of object.
///
/// Objects are stored in fixed-size chunks of `Vec`s, so a full arena grows by pushing a new
/// chunk instead of reallocating. Freed slots are threaded onto a free list and reused by the
/// next allocation. Every object is dropped when the arena is dropped or cleared.
pub struct TypedArena<T> {
    head: Option<Entry>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    size: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn is_valid_entry(&self, entry: Entry) -> bool {
        entry.chunk_index < self.chunks.len()
            && entry.block_index < self.chunks[entry.chunk_index].len()
    }

    /// Constructs a new, empty `TypedArena<T>` holding at most `chunk_size` objects per chunk. A
    /// `chunk_size` of zero is treated as one.
    pub fn new(chunk_size: usize) -> Self {
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size: chunk_size.max(1),
            size: 0,
            capacity: 0,
        }
    }

    /// Stores `value` and returns the handle naming it.
    pub fn allocate(&mut self, value: T) -> Entry {
        if self.size == self.capacity {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
        }
        self.size += 1;

        match self.head.take() {
            None => {
                let chunk_index = self.chunks.len() - 1;
                let chunk = &mut self.chunks[chunk_index];
                chunk.push(Block::Occupied(value));
                Entry {
                    chunk_index,
                    block_index: chunk.len() - 1,
                }
            }
            Some(entry) => {
                let vacant_block = mem::replace(
                    &mut self.chunks[entry.chunk_index][entry.block_index],
                    Block::Occupied(value),
                );

                match vacant_block {
                    Block::Vacant(next_entry) => {
                        self.head = next_entry;
                        entry
                    }
                    Block::Occupied(_) => panic!("Expected a vacant block."),
                }
            }
        }
    }

    /// Removes the object named by `entry` from the arena and returns it. The slot is reused by
    /// a later allocation.
    ///
    /// # Panics
    ///
    /// Panics if `entry` names an invalid or vacant slot.
    pub fn free(&mut self, entry: Entry) -> T {
        if !self.is_valid_entry(entry) {
            panic!("Error: attempting to free invalid block.");
        }
        let old_block = mem::replace(
            &mut self.chunks[entry.chunk_index][entry.block_index],
            Block::Vacant(self.head),
        );
        match old_block {
            Block::Vacant(next_entry) => {
                self.chunks[entry.chunk_index][entry.block_index] = Block::Vacant(next_entry);
                panic!("Error: attempting to free vacant block.");
            }
            Block::Occupied(value) => {
                self.size -= 1;
                self.head = Some(entry);
                value
            }
        }
    }

    /// Returns a reference to the object named by `entry`, or `None` if the slot is invalid or
    /// vacant.
    pub fn get(&self, entry: Entry) -> Option<&T> {
        if !self.is_valid_entry(entry) {
            return None;
        }
        match self.chunks[entry.chunk_index][entry.block_index] {
            Block::Occupied(ref value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns a mutable reference to the object named by `entry`, or `None` if the slot is
    /// invalid or vacant.
    pub fn get_mut(&mut self, entry: Entry) -> Option<&mut T> {
        if !self.is_valid_entry(entry) {
            return None;
        }
        match self.chunks[entry.chunk_index][entry.block_index] {
            Block::Occupied(ref mut value) => Some(value),
            Block::Vacant(_) => None,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Drops every object in the arena and releases its chunks. Outstanding handles become
    /// invalid.
    pub fn clear(&mut self) {
        self.head = None;
        self.chunks.clear();
        self.size = 0;
        self.capacity = 0;
    }
}

impl<T> Index<Entry> for TypedArena<T> {
    type Output = T;

    fn index(&self, entry: Entry) -> &Self::Output {
        self.get(entry).expect("Error: entry out of bounds.")
    }
}

impl<T> IndexMut<Entry> for TypedArena<T> {
    fn index_mut(&mut self, entry: Entry) -> &mut Self::Output {
        self.get_mut(entry).expect("Error: entry out of bounds.")
    }
}
