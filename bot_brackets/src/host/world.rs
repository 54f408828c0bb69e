//! Host world contract.

use super::models::{CharacterId, CharacterState, LevelReassignment};
use std::collections::BTreeMap;

/// Capabilities the balancer needs from the game world.
///
/// Implementations return fresh snapshots on every call; the balancer keeps
/// only identities between ticks and resolves them again through
/// [`World::find_character`].
pub trait World {
    /// Every character currently connected, bots and real players alike
    fn online_characters(&self) -> Vec<CharacterState>;

    /// Resolve a character by identity, `None` once it is gone
    fn find_character(&self, id: CharacterId) -> Option<CharacterState>;

    /// Set the character's level and regenerate gear, talents and stats for it
    fn apply_level_and_regenerate(&mut self, reassignment: &LevelReassignment);
}

/// A world held entirely in memory. Characters in the map are online;
/// removing one logs it out.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorld {
    characters: BTreeMap<CharacterId, CharacterState>,
    applied: Vec<LevelReassignment>,
}

impl InMemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_characters(characters: impl IntoIterator<Item = CharacterState>) -> Self {
        Self {
            characters: characters.into_iter().map(|c| (c.id, c)).collect(),
            applied: Vec::new(),
        }
    }

    /// Add or replace a character
    pub fn insert(&mut self, character: CharacterState) {
        self.characters.insert(character.id, character);
    }

    /// Log a character out
    pub fn remove(&mut self, id: CharacterId) -> Option<CharacterState> {
        self.characters.remove(&id)
    }

    pub fn get(&self, id: CharacterId) -> Option<&CharacterState> {
        self.characters.get(&id)
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut CharacterState> {
        self.characters.get_mut(&id)
    }

    pub fn characters(&self) -> impl Iterator<Item = &CharacterState> {
        self.characters.values()
    }

    pub fn characters_mut(&mut self) -> impl Iterator<Item = &mut CharacterState> {
        self.characters.values_mut()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Every reassignment applied so far, oldest first
    pub fn applied(&self) -> &[LevelReassignment] {
        &self.applied
    }
}

impl World for InMemoryWorld {
    fn online_characters(&self) -> Vec<CharacterState> {
        self.characters.values().cloned().collect()
    }

    fn find_character(&self, id: CharacterId) -> Option<CharacterState> {
        self.characters.get(&id).cloned()
    }

    fn apply_level_and_regenerate(&mut self, reassignment: &LevelReassignment) {
        let Some(character) = self.characters.get_mut(&reassignment.character_id) else {
            return;
        };
        character.level = reassignment.new_level;
        self.applied.push(reassignment.clone());
    }
}
