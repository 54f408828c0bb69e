//! Pending level resets, one per character, drained in insertion order.

use crate::host::{CharacterId, Faction};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// A bot waiting to be moved into another bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReset {
    pub character_id: CharacterId,

    /// Index into the bracket table of `faction`
    pub target_bracket: usize,

    pub faction: Faction,
}

/// Insertion-ordered queue with an identity index
#[derive(Debug, Clone, Default)]
pub struct PendingResetQueue {
    entries: VecDeque<PendingReset>,
    index: HashSet<CharacterId>,
}

impl PendingResetQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry unless the character is already queued.
    ///
    /// # Returns
    ///
    /// `true` if the entry was added
    pub fn enqueue(&mut self, entry: PendingReset) -> bool {
        if !self.index.insert(entry.character_id) {
            return false;
        }
        self.entries.push_back(entry);
        true
    }

    pub fn contains(&self, character_id: CharacterId) -> bool {
        self.index.contains(&character_id)
    }

    pub fn get(&self, character_id: CharacterId) -> Option<&PendingReset> {
        if !self.contains(character_id) {
            return None;
        }
        self.entries.iter().find(|e| e.character_id == character_id)
    }

    /// Remove the entry for a character, if any
    pub fn remove(&mut self, character_id: CharacterId) -> Option<PendingReset> {
        if !self.index.remove(&character_id) {
            return None;
        }
        let position = self
            .entries
            .iter()
            .position(|e| e.character_id == character_id)?;
        self.entries.remove(position)
    }

    /// Keep entries for which `keep` returns true, visiting them in order.
    /// Relative order of kept entries is preserved.
    pub fn retain_in_order(&mut self, mut keep: impl FnMut(&PendingReset) -> bool) {
        let index = &mut self.index;
        self.entries.retain(|entry| {
            let kept = keep(entry);
            if !kept {
                index.remove(&entry.character_id);
            }
            kept
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingReset> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}
