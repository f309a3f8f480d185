// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational slot storage shared by nodes and emitters.

use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::types::{EmitterId, NodeId};

/// Handle types that address an [`Arena`] slot.
pub(crate) trait ArenaKey: Copy {
    fn from_parts(idx: u32, generation: u32) -> Self;
    fn slot(self) -> usize;
    fn generation_of(self) -> u32;
}

impl ArenaKey for NodeId {
    fn from_parts(idx: u32, generation: u32) -> Self {
        Self::new(idx, generation)
    }

    fn slot(self) -> usize {
        self.idx()
    }

    fn generation_of(self) -> u32 {
        self.generation()
    }
}

impl ArenaKey for EmitterId {
    fn from_parts(idx: u32, generation: u32) -> Self {
        Self::new(idx, generation)
    }

    fn slot(self) -> usize {
        self.idx()
    }

    fn generation_of(self) -> u32 {
        self.generation()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Arena<K, T> {
    /// slots
    entries: Vec<Option<T>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    _key: PhantomData<K>,
}

impl<K, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            _key: PhantomData,
        }
    }
}

impl<K: ArenaKey, T> Arena<K, T> {
    pub(crate) fn insert(&mut self, value: T) -> K {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.entries[idx] = Some(value);
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.entries.push(Some(value));
            self.generations.push(generation);
            (self.entries.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Handles use 32-bit indices by design."
        )]
        K::from_parts(idx as u32, generation)
    }

    pub(crate) fn remove(&mut self, key: K) -> Option<T> {
        if !self.contains(key) {
            return None;
        }
        self.free_list.push(key.slot());
        self.entries[key.slot()].take()
    }

    pub(crate) fn contains(&self, key: K) -> bool {
        self.generations.get(key.slot()) == Some(&key.generation_of())
            && self.entries[key.slot()].is_some()
    }

    pub(crate) fn get(&self, key: K) -> Option<&T> {
        if !self.contains(key) {
            return None;
        }
        self.entries[key.slot()].as_ref()
    }

    pub(crate) fn get_mut(&mut self, key: K) -> Option<&mut T> {
        if !self.contains(key) {
            return None;
        }
        self.entries[key.slot()].as_mut()
    }

    /// Live handles in slot order.
    pub(crate) fn keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k).collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.entries.iter().enumerate().filter_map(|(i, slot)| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Handles use 32-bit indices by design."
            )]
            slot.as_ref()
                .map(|v| (K::from_parts(i as u32, self.generations[i]), v))
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len() - self.free_list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reused_slot_gets_new_generation() {
        let mut arena: Arena<NodeId, &str> = Arena::default();
        let a = arena.insert("a");
        assert_eq!(arena.remove(a), Some("a"));
        let b = arena.insert("b");
        assert_eq!(a.idx(), b.idx());
        assert_ne!(a, b);
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(b), Some(&"b"));
    }

    #[test]
    fn double_remove_is_noop() {
        let mut arena: Arena<EmitterId, u8> = Arena::default();
        let a = arena.insert(1);
        let _b = arena.insert(2);
        assert!(arena.remove(a).is_some());
        assert!(arena.remove(a).is_none());
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.keys().len(), 1);
    }
}
