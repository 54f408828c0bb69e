//! Character snapshots handed to the balancer by the host world.

use serde::{Deserialize, Serialize};

/// Stable character identity
pub type CharacterId = u64;

/// Guild identifier (0 is never a guild)
pub type GuildId = u32;

/// Character level
pub type Level = u8;

/// Minimum level a death knight may ever be assigned to
pub const DEATH_KNIGHT_MIN_LEVEL: Level = 55;

/// Playable factions. Each faction keeps its own bracket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Alliance,
    Horde,
}

impl Faction {
    /// Both factions in table order
    pub const ALL: [Faction; 2] = [Faction::Alliance, Faction::Horde];
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Faction::Alliance => write!(f, "Alliance"),
            Faction::Horde => write!(f, "Horde"),
        }
    }
}

/// Character classes the balancer has to tell apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Warrior,
    Paladin,
    Hunter,
    Rogue,
    Priest,
    DeathKnight,
    Shaman,
    Mage,
    Warlock,
    Druid,
}

impl CharacterClass {
    /// Hard level floor for the class, if any
    pub fn level_floor(self) -> Option<Level> {
        match self {
            CharacterClass::DeathKnight => Some(DEATH_KNIGHT_MIN_LEVEL),
            _ => None,
        }
    }
}

/// Who is controlling a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    /// A real user
    RealPlayer,
    /// A bot driven by a script or an owner (alt bots, companions)
    ScriptedBot,
    /// A bot owned by the random-bot manager; the only kind ever rebalanced
    RandomBot,
}

/// Snapshot of one member of a character's group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: CharacterId,
    pub in_world: bool,
    pub kind: CharacterKind,
}

impl GroupMember {
    /// An in-world, non-bot member
    pub fn is_online_real_player(&self) -> bool {
        self.in_world && self.kind == CharacterKind::RealPlayer
    }
}

/// Point-in-time view of a character, filled in by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    /// Stable identity
    pub id: CharacterId,

    /// Character name (matched against the exclusion list)
    pub name: String,

    pub level: Level,
    pub faction: Faction,
    pub class: CharacterClass,
    pub kind: CharacterKind,

    /// Added to the world and not being removed from it
    pub in_world: bool,

    /// Has a session that is not logging out
    pub session_active: bool,

    pub alive: bool,
    pub in_combat: bool,
    pub in_battleground: bool,
    pub in_arena: bool,
    pub in_random_dungeon: bool,
    pub in_battleground_queue: bool,

    /// On a flight path
    pub in_flight: bool,

    /// Guild the character belongs to
    pub guild_id: Option<GuildId>,

    /// Member of at least one existing arena team
    pub in_arena_team: bool,

    /// Other members of the character's group, empty when ungrouped
    pub group_members: Vec<GroupMember>,
}

impl CharacterState {
    /// Create an idle, in-world character with no affiliations
    pub fn new(
        id: CharacterId,
        name: impl Into<String>,
        level: Level,
        faction: Faction,
        kind: CharacterKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            level,
            faction,
            class: CharacterClass::Warrior,
            kind,
            in_world: true,
            session_active: true,
            alive: true,
            in_combat: false,
            in_battleground: false,
            in_arena: false,
            in_random_dungeon: false,
            in_battleground_queue: false,
            in_flight: false,
            guild_id: None,
            in_arena_team: false,
            group_members: Vec::new(),
        }
    }

    /// Controlled by any bot AI
    pub fn is_bot(&self) -> bool {
        matches!(self.kind, CharacterKind::ScriptedBot | CharacterKind::RandomBot)
    }

    /// Owned by the random-bot manager
    pub fn is_managed_random_bot(&self) -> bool {
        self.kind == CharacterKind::RandomBot
    }

    /// In world with a session that is not going away
    pub fn session_valid(&self) -> bool {
        self.in_world && self.session_active
    }

    /// Grouped with at least one in-world real player
    pub fn grouped_with_real_player(&self) -> bool {
        self.group_members
            .iter()
            .any(GroupMember::is_online_real_player)
    }

    /// Guild id, treating 0 as "no guild"
    pub fn guild(&self) -> Option<GuildId> {
        self.guild_id.filter(|&id| id != 0)
    }
}

/// A level change the host must perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelReassignment {
    pub character_id: CharacterId,
    pub from_level: Level,
    pub new_level: Level,

    /// The new level is the configured maximum; hosts that persist equipment
    /// need to re-initialize the talent tree in that case
    pub reached_max_level: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_kinds() {
        let real = CharacterState::new(1, "Real", 10, Faction::Horde, CharacterKind::RealPlayer);
        let scripted =
            CharacterState::new(2, "Alt", 10, Faction::Horde, CharacterKind::ScriptedBot);
        let random = CharacterState::new(3, "Rnd", 10, Faction::Horde, CharacterKind::RandomBot);

        assert!(!real.is_bot());
        assert!(scripted.is_bot());
        assert!(!scripted.is_managed_random_bot());
        assert!(random.is_bot());
        assert!(random.is_managed_random_bot());
    }

    #[test]
    fn test_grouped_with_real_player_ignores_offline_members() {
        let mut bot = CharacterState::new(1, "Bot", 10, Faction::Alliance, CharacterKind::RandomBot);
        bot.group_members.push(GroupMember {
            id: 2,
            in_world: false,
            kind: CharacterKind::RealPlayer,
        });
        assert!(!bot.grouped_with_real_player());

        bot.group_members.push(GroupMember {
            id: 3,
            in_world: true,
            kind: CharacterKind::RealPlayer,
        });
        assert!(bot.grouped_with_real_player());
    }

    #[test]
    fn test_zero_guild_is_no_guild() {
        let mut bot = CharacterState::new(1, "Bot", 10, Faction::Alliance, CharacterKind::RandomBot);
        bot.guild_id = Some(0);
        assert_eq!(bot.guild(), None);
        bot.guild_id = Some(7);
        assert_eq!(bot.guild(), Some(7));
    }

    #[test]
    fn test_death_knight_floor() {
        assert_eq!(CharacterClass::DeathKnight.level_floor(), Some(55));
        assert_eq!(CharacterClass::Mage.level_floor(), None);
    }
}
