//! Arena node store
//!
//! Holds every node of one graph behind generational handles. A handle stays
//! valid while its node is alive, and a handle of a removed node never
//! resolves to a different node later.

use slotmap::SlotMap;

use crate::error::{Result, ScriptEngineError};
use crate::index::NodeIndex;

/// Dense generational store addressed by [`NodeIndex`]
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: SlotMap<NodeIndex, T>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
        }
    }

    /// Store a value and return its handle
    pub fn insert(&mut self, value: T) -> NodeIndex {
        self.slots.insert(value)
    }

    /// Look up a value, failing if the handle is not part of this arena
    pub fn get(&self, index: NodeIndex) -> Result<&T> {
        self.slots
            .get(index)
            .ok_or(ScriptEngineError::NodeNotFound(index))
    }

    pub fn get_mut(&mut self, index: NodeIndex) -> Result<&mut T> {
        self.slots
            .get_mut(index)
            .ok_or(ScriptEngineError::NodeNotFound(index))
    }

    pub fn remove(&mut self, index: NodeIndex) -> Result<T> {
        self.slots
            .remove(index)
            .ok_or(ScriptEngineError::NodeNotFound(index))
    }

    pub fn contains(&self, index: NodeIndex) -> bool {
        self.slots.contains_key(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over handles and values in storage order
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &T)> {
        self.slots.iter()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");

        assert_eq!(*arena.get(a).unwrap(), "a");
        assert_eq!(*arena.get(b).unwrap(), "b");
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_foreign_handle_is_rejected() {
        let mut other = Arena::new();
        let foreign = other.insert(1);
        let _ = other.insert(2);

        let arena: Arena<i32> = Arena::new();
        assert!(matches!(
            arena.get(foreign),
            Err(ScriptEngineError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_removed_handle_is_not_reused() {
        let mut arena = Arena::new();
        let first = arena.insert(1);
        arena.remove(first).unwrap();
        let second = arena.insert(2);

        assert!(arena.get(first).is_err());
        assert_eq!(*arena.get(second).unwrap(), 2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        *arena.get_mut(a).unwrap() += 41;
        assert_eq!(*arena.get(a).unwrap(), 42);
    }
}
