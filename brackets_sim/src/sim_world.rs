//! Simulated population for exercising the balancer.
//!
//! Bots start piled into the top levels so the balancer has work to do.
//! Every churn step flips activity flags, moves bots in and out of groups
//! with real players, levels real players up, and replaces characters that
//! log out with fresh ones.

use crate::config::PopulationConfig;
use bot_brackets::host::{
    CharacterClass, CharacterId, CharacterKind, CharacterState, Faction, GroupMember,
    InMemoryWorld, Level,
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

const CLASSES: [CharacterClass; 10] = [
    CharacterClass::Warrior,
    CharacterClass::Paladin,
    CharacterClass::Hunter,
    CharacterClass::Rogue,
    CharacterClass::Priest,
    CharacterClass::DeathKnight,
    CharacterClass::Shaman,
    CharacterClass::Mage,
    CharacterClass::Warlock,
    CharacterClass::Druid,
];

/// Share of bots created at the maximum level
const MAX_LEVEL_SHARE: f64 = 0.6;

/// What a churn step changed
#[derive(Debug, Default)]
pub struct ChurnReport {
    /// Characters that left the world
    pub logged_out: Vec<CharacterId>,
    /// Replacements that joined
    pub logged_in: usize,
    /// Characters whose activity changed
    pub activity_changes: usize,
}

/// Generates and mutates the simulated world
pub struct Simulation {
    config: PopulationConfig,
    rng: StdRng,
    next_id: CharacterId,
    min_level: Level,
    max_level: Level,
}

impl Simulation {
    pub fn new(config: PopulationConfig, min_level: Level, max_level: Level) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            config,
            rng,
            next_id: 1,
            min_level,
            max_level,
        }
    }

    /// Fill the world with bots and real players for both factions.
    ///
    /// # Returns
    ///
    /// `(owner, friend)` pairs: every real player befriends a couple of bots
    pub fn populate(&mut self, world: &mut InMemoryWorld) -> Vec<(CharacterId, CharacterId)> {
        let mut friends = Vec::new();

        for faction in Faction::ALL {
            let bots: Vec<CharacterId> = (0..self.config.bots_per_faction)
                .map(|_| {
                    let bot = self.spawn(faction, CharacterKind::RandomBot);
                    let id = bot.id;
                    world.insert(bot);
                    id
                })
                .collect();

            for _ in 0..self.config.players_per_faction {
                let player = self.spawn(faction, CharacterKind::RealPlayer);
                for friend in bots.choose_multiple(&mut self.rng, 2) {
                    friends.push((player.id, *friend));
                }
                world.insert(player);
            }
        }

        tracing::info!(
            characters = world.len(),
            friend_pairs = friends.len(),
            "Simulated population created"
        );
        friends
    }

    /// Advance the world by one step
    pub fn churn(&mut self, world: &mut InMemoryWorld) -> ChurnReport {
        let mut report = ChurnReport::default();

        let players: Vec<(CharacterId, Faction)> = world
            .characters()
            .filter(|c| c.kind == CharacterKind::RealPlayer)
            .map(|c| (c.id, c.faction))
            .collect();

        for character in world.characters_mut() {
            if self.rng.random_bool(self.config.logout_chance) {
                report.logged_out.push(character.id);
                continue;
            }
            if !self.rng.random_bool(self.config.activity_chance) {
                continue;
            }
            report.activity_changes += 1;

            match character.kind {
                CharacterKind::RealPlayer => {
                    if character.level < self.max_level {
                        character.level += 1;
                    }
                }
                _ => self.change_activity(character, &players),
            }
        }

        for id in &report.logged_out {
            if let Some(gone) = world.remove(*id) {
                let replacement = self.spawn(gone.faction, gone.kind);
                world.insert(replacement);
                report.logged_in += 1;
            }
        }

        report
    }

    fn change_activity(&mut self, bot: &mut CharacterState, players: &[(CharacterId, Faction)]) {
        match self.rng.random_range(0..8) {
            0 => bot.in_combat = !bot.in_combat,
            1 => bot.in_flight = !bot.in_flight,
            2 => bot.in_battleground = !bot.in_battleground,
            3 => bot.in_random_dungeon = !bot.in_random_dungeon,
            4 => bot.in_battleground_queue = !bot.in_battleground_queue,
            5 => bot.alive = !bot.alive,
            6 => {
                let same_faction: Vec<CharacterId> = players
                    .iter()
                    .filter(|(_, faction)| *faction == bot.faction)
                    .map(|(id, _)| *id)
                    .collect();
                if let Some(&leader) = same_faction.choose(&mut self.rng) {
                    bot.group_members = vec![GroupMember {
                        id: leader,
                        in_world: true,
                        kind: CharacterKind::RealPlayer,
                    }];
                }
            }
            _ => bot.group_members.clear(),
        }
    }

    fn spawn(&mut self, faction: Faction, kind: CharacterKind) -> CharacterState {
        let id = self.next_id;
        self.next_id += 1;

        let class = *CLASSES.choose(&mut self.rng).unwrap_or(&CharacterClass::Warrior);
        let level = self.initial_level(class, kind);
        let name = match kind {
            CharacterKind::RealPlayer => format!("Player{id}"),
            _ => format!("Bot{id}"),
        };

        let mut character = CharacterState::new(id, name, level, faction, kind);
        character.class = class;

        let guild_chance = if kind == CharacterKind::RealPlayer { 0.5 } else { 0.1 };
        if self.config.guilds > 0 && self.rng.random_bool(guild_chance) {
            character.guild_id = Some(self.rng.random_range(1..=self.config.guilds));
        }
        character.in_arena_team = kind == CharacterKind::RandomBot && self.rng.random_bool(0.05);
        character
    }

    fn initial_level(&mut self, class: CharacterClass, kind: CharacterKind) -> Level {
        let lower = match class.level_floor() {
            Some(floor) => floor.min(self.max_level).max(self.min_level),
            None => self.min_level,
        };

        if kind == CharacterKind::RandomBot && self.rng.random_bool(MAX_LEVEL_SHARE) {
            self.max_level
        } else {
            self.rng.random_range(lower..=self.max_level)
        }
    }
}
