//! Whether a bot can have its level changed right now.

use crate::host::CharacterState;
use std::fmt;

/// Why a reset has to wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsafeReason {
    NoSession,
    NotInWorld,
    Dead,
    InCombat,
    InBattleground,
    InArena,
    InRandomDungeon,
    InBattlegroundQueue,
    InFlight,
    GroupedWithRealPlayer,
}

impl fmt::Display for UnsafeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            UnsafeReason::NoSession => "no valid session",
            UnsafeReason::NotInWorld => "not in world",
            UnsafeReason::Dead => "dead",
            UnsafeReason::InCombat => "in combat",
            UnsafeReason::InBattleground => "in battleground",
            UnsafeReason::InArena => "in arena",
            UnsafeReason::InRandomDungeon => "in random dungeon",
            UnsafeReason::InBattlegroundQueue => "queued for battleground",
            UnsafeReason::InFlight => "in flight",
            UnsafeReason::GroupedWithRealPlayer => "grouped with a real player",
        };
        write!(f, "{}", reason)
    }
}

/// First reason the character is unsafe, `None` when a reset may proceed
pub fn safety_verdict(character: &CharacterState) -> Option<UnsafeReason> {
    let checks = [
        (!character.session_active, UnsafeReason::NoSession),
        (!character.in_world, UnsafeReason::NotInWorld),
        (!character.alive, UnsafeReason::Dead),
        (character.in_combat, UnsafeReason::InCombat),
        (character.in_battleground, UnsafeReason::InBattleground),
        (character.in_arena, UnsafeReason::InArena),
        (character.in_random_dungeon, UnsafeReason::InRandomDungeon),
        (character.in_battleground_queue, UnsafeReason::InBattlegroundQueue),
        (character.in_flight, UnsafeReason::InFlight),
    ];
    if let Some(&(_, reason)) = checks.iter().find(|(failed, _)| *failed) {
        return Some(reason);
    }

    // Offline members don't count; every online one has to be a bot
    character
        .grouped_with_real_player()
        .then_some(UnsafeReason::GroupedWithRealPlayer)
}

/// True only when nothing in the character's situation blocks a reset
pub fn is_safe_for_reset(character: &CharacterState) -> bool {
    safety_verdict(character).is_none()
}
