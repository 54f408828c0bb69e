//! Population scan: occupancy per bracket for both factions.

use super::{
    eligibility::{EligibilityContext, classify},
    safety::is_safe_for_reset,
};
use crate::{
    brackets::Brackets,
    host::{CharacterId, CharacterState, Faction, Level},
};
use std::collections::BTreeMap;

/// Bots counted in one bracket, split by whether they can be reset now
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketMembers {
    pub safe: Vec<CharacterId>,
    pub unsafe_bots: Vec<CharacterId>,

    /// Class level floor of members that have one
    pub floors: BTreeMap<CharacterId, Level>,
}

impl BracketMembers {
    /// Whether the member may be placed in a bracket ending at `upper`
    pub fn can_reach(&self, id: CharacterId, upper: Level) -> bool {
        self.floors.get(&id).is_none_or(|&floor| upper >= floor)
    }

    pub fn len(&self) -> usize {
        self.safe.len() + self.unsafe_bots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A counted bot whose level falls in no bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBracketBot {
    pub id: CharacterId,
    pub level: Level,

    /// Class level floor, if the class has one
    pub floor: Option<Level>,
}

/// Scan results for one faction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactionScan {
    pub faction: Faction,

    /// Eligible bots, including those outside every bracket
    pub total: u32,

    /// Eligible bots per bracket
    pub actual: Vec<u32>,

    /// Eligible bots per bracket, in scan order
    pub members: Vec<BracketMembers>,

    /// Eligible bots that need the nearest-bracket fallback
    pub out_of_bracket: Vec<OutOfBracketBot>,

    /// Online real players per bracket
    pub real_players: Vec<u32>,

    /// Online real players inside some bracket
    pub total_real: u32,
}

impl FactionScan {
    pub fn new(faction: Faction, num_ranges: usize) -> Self {
        Self {
            faction,
            total: 0,
            actual: vec![0; num_ranges],
            members: vec![BracketMembers::default(); num_ranges],
            out_of_bracket: Vec::new(),
            real_players: vec![0; num_ranges],
            total_real: 0,
        }
    }
}

/// Scan results for both factions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationScan {
    pub alliance: FactionScan,
    pub horde: FactionScan,

    /// Random bots skipped by the eligibility checks
    pub excluded: u32,
}

impl PopulationScan {
    pub fn faction(&self, faction: Faction) -> &FactionScan {
        match faction {
            Faction::Alliance => &self.alliance,
            Faction::Horde => &self.horde,
        }
    }

    fn faction_mut(&mut self, faction: Faction) -> &mut FactionScan {
        match faction {
            Faction::Alliance => &mut self.alliance,
            Faction::Horde => &mut self.horde,
        }
    }
}

/// Walk the online population once.
///
/// Only in-world managed random bots that pass the eligibility checks are
/// counted. Real players are tallied per bracket for dynamic weighting and
/// never end up in a member list.
///
/// # Arguments
///
/// * `characters` - Online characters
/// * `brackets` - Bracket tables to resolve levels against
/// * `ctx` - Eligibility inputs
pub fn scan_population(
    characters: &[CharacterState],
    brackets: &Brackets,
    ctx: &EligibilityContext<'_>,
) -> PopulationScan {
    let n = brackets.num_ranges();
    let mut scan = PopulationScan {
        alliance: FactionScan::new(Faction::Alliance, n),
        horde: FactionScan::new(Faction::Horde, n),
        excluded: 0,
    };

    for character in characters {
        if !character.in_world {
            continue;
        }

        if !character.is_bot() {
            if let Some(index) = brackets.index_of(character.level, character.faction) {
                let faction_scan = scan.faction_mut(character.faction);
                faction_scan.real_players[index] += 1;
                faction_scan.total_real += 1;
            }
            continue;
        }

        if !character.is_managed_random_bot() {
            continue;
        }

        let eligibility = classify(character, ctx);
        if !eligibility.is_processable() {
            log::debug!(
                "Skipping bot '{}' (level {}): {}",
                character.name,
                character.level,
                eligibility
            );
            scan.excluded += 1;
            continue;
        }

        let faction_scan = scan.faction_mut(character.faction);
        faction_scan.total += 1;

        match brackets.index_of(character.level, character.faction) {
            Some(index) => {
                faction_scan.actual[index] += 1;
                let members = &mut faction_scan.members[index];
                if is_safe_for_reset(character) {
                    members.safe.push(character.id);
                } else {
                    members.unsafe_bots.push(character.id);
                }
                if let Some(floor) = character.class.level_floor() {
                    members.floors.insert(character.id, floor);
                }
                log::debug!(
                    "{} bot '{}' with level {} added to range {}",
                    character.faction,
                    character.name,
                    character.level,
                    index + 1
                );
            }
            None => {
                log::debug!(
                    "{} bot '{}' with level {} does not fall into any defined range",
                    character.faction,
                    character.name,
                    character.level
                );
                faction_scan.out_of_bracket.push(OutOfBracketBot {
                    id: character.id,
                    level: character.level,
                    floor: character.class.level_floor(),
                });
            }
        }
    }

    log::info!("Total Alliance Bots: {}", scan.alliance.total);
    log::info!("Total Horde Bots: {}", scan.horde.total);
    scan
}
