//! Protection checks that take a bot out of rebalancing entirely.

use crate::{
    brackets::BracketsConfig,
    host::CharacterState,
    tracker::{FriendSet, GuildTracker},
};
use std::fmt;

/// Outcome of the eligibility checks, in check order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Processable,
    ExcludedByName,
    ExcludedGuild,
    ExcludedArena,
    ExcludedGrouped,
    ExcludedFriend,
}

impl Eligibility {
    pub fn is_processable(self) -> bool {
        self == Eligibility::Processable
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Eligibility::Processable => "processable",
            Eligibility::ExcludedByName => "excluded by name",
            Eligibility::ExcludedGuild => "guild has real players",
            Eligibility::ExcludedArena => "member of an arena team",
            Eligibility::ExcludedGrouped => "grouped with a real player",
            Eligibility::ExcludedFriend => "on a real player's friend list",
        };
        write!(f, "{}", reason)
    }
}

/// Everything the eligibility checks read besides the character itself
#[derive(Debug, Clone, Copy)]
pub struct EligibilityContext<'a> {
    pub exclude_names: &'a [String],
    pub guilds: &'a GuildTracker,
    pub friends: &'a FriendSet,
    pub ignore_guild_bots_with_real_players: bool,
    pub ignore_arena_team_bots: bool,
    pub ignore_friend_listed: bool,
}

impl<'a> EligibilityContext<'a> {
    pub fn new(config: &'a BracketsConfig, guilds: &'a GuildTracker, friends: &'a FriendSet) -> Self {
        Self {
            exclude_names: &config.exclude_names,
            guilds,
            friends,
            ignore_guild_bots_with_real_players: config.ignore_guild_bots_with_real_players,
            ignore_arena_team_bots: config.ignore_arena_team_bots,
            ignore_friend_listed: config.ignore_friend_listed,
        }
    }
}

/// Classify a bot. The first failing check wins.
///
/// Order: name, guild (live or persistent), arena team, grouped with an
/// online real player, friend list. Name and group checks always run; the
/// others follow their config switches.
pub fn classify(character: &CharacterState, ctx: &EligibilityContext<'_>) -> Eligibility {
    if ctx.exclude_names.iter().any(|name| *name == character.name) {
        return Eligibility::ExcludedByName;
    }

    if ctx.ignore_guild_bots_with_real_players
        && character.guild().is_some_and(|guild_id| ctx.guilds.contains(guild_id))
    {
        return Eligibility::ExcludedGuild;
    }

    if ctx.ignore_arena_team_bots && character.in_arena_team {
        return Eligibility::ExcludedArena;
    }

    if character.grouped_with_real_player() {
        return Eligibility::ExcludedGrouped;
    }

    if ctx.ignore_friend_listed && ctx.friends.contains(character.id) {
        return Eligibility::ExcludedFriend;
    }

    Eligibility::Processable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{CharacterKind, Faction, GroupMember};

    fn bot() -> CharacterState {
        CharacterState::new(7, "Bot", 20, Faction::Alliance, CharacterKind::RandomBot)
    }

    #[test]
    fn test_idle_bot_is_processable() {
        let config = BracketsConfig::default();
        let (guilds, friends) = (GuildTracker::new(), FriendSet::new());
        let ctx = EligibilityContext::new(&config, &guilds, &friends);
        assert!(classify(&bot(), &ctx).is_processable());
    }

    #[test]
    fn test_name_check_wins_over_everything() {
        let config = BracketsConfig {
            exclude_names: vec!["Bot".to_string()],
            ..BracketsConfig::default()
        };
        let mut guilds = GuildTracker::new();
        guilds.load_persistent([3]);
        let friends = FriendSet::from_pairs([(1, 7)]);
        let ctx = EligibilityContext::new(&config, &guilds, &friends);

        let mut character = bot();
        character.guild_id = Some(3);
        character.in_arena_team = true;

        assert_eq!(classify(&character, &ctx), Eligibility::ExcludedByName);
    }

    #[test]
    fn test_persistent_guild_excludes() {
        let config = BracketsConfig::default();
        let mut guilds = GuildTracker::new();
        guilds.load_persistent([3]);
        let friends = FriendSet::new();
        let ctx = EligibilityContext::new(&config, &guilds, &friends);

        let mut character = bot();
        character.guild_id = Some(3);
        assert_eq!(classify(&character, &ctx), Eligibility::ExcludedGuild);
    }

    #[test]
    fn test_switches_disable_checks() {
        let config = BracketsConfig {
            ignore_guild_bots_with_real_players: false,
            ignore_arena_team_bots: false,
            ignore_friend_listed: false,
            ..BracketsConfig::default()
        };
        let mut guilds = GuildTracker::new();
        guilds.load_persistent([3]);
        let friends = FriendSet::from_pairs([(1, 7)]);
        let ctx = EligibilityContext::new(&config, &guilds, &friends);

        let mut character = bot();
        character.guild_id = Some(3);
        character.in_arena_team = true;

        assert!(classify(&character, &ctx).is_processable());
    }

    #[test]
    fn test_group_check_is_always_on() {
        let config = BracketsConfig {
            ignore_guild_bots_with_real_players: false,
            ignore_arena_team_bots: false,
            ignore_friend_listed: false,
            ..BracketsConfig::default()
        };
        let (guilds, friends) = (GuildTracker::new(), FriendSet::new());
        let ctx = EligibilityContext::new(&config, &guilds, &friends);

        let mut character = bot();
        character.group_members.push(GroupMember {
            id: 99,
            in_world: true,
            kind: CharacterKind::RealPlayer,
        });
        assert_eq!(classify(&character, &ctx), Eligibility::ExcludedGrouped);
    }

    #[test]
    fn test_friend_listed() {
        let config = BracketsConfig::default();
        let guilds = GuildTracker::new();
        let friends = FriendSet::from_pairs([(1, 7)]);
        let ctx = EligibilityContext::new(&config, &guilds, &friends);
        assert_eq!(classify(&bot(), &ctx), Eligibility::ExcludedFriend);
    }
}
