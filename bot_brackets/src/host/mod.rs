//! Host contract: character snapshots and the world capabilities the
//! balancer consumes.
//!
//! The host owns every character. The balancer reads snapshots, remembers
//! identities, and asks the host to reassign levels; it never holds on to a
//! live character between ticks.

pub mod models;
pub mod world;

pub use models::{
    CharacterClass, CharacterId, CharacterKind, CharacterState, DEATH_KNIGHT_MIN_LEVEL, Faction,
    GroupMember, GuildId, Level, LevelReassignment,
};
pub use world::{InMemoryWorld, World};
