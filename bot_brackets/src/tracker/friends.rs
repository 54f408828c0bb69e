//! Friend list snapshot.

use crate::host::CharacterId;
use std::collections::HashSet;

/// Characters that appear on somebody's friend list
#[derive(Debug, Clone, Default)]
pub struct FriendSet {
    friends: HashSet<CharacterId>,
}

impl FriendSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(owner, friend)` pairs as read from the store
    pub fn from_pairs(pairs: impl IntoIterator<Item = (CharacterId, CharacterId)>) -> Self {
        Self {
            friends: pairs.into_iter().map(|(_, friend)| friend).collect(),
        }
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.friends.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.friends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.friends.is_empty()
    }
}
