//! Rate-limited application of pending resets.

use super::pending::{PendingReset, PendingResetQueue};
use crate::{
    balance::{
        eligibility::{Eligibility, EligibilityContext, classify},
        safety::{UnsafeReason, safety_verdict},
    },
    brackets::Brackets,
    host::{CharacterState, LevelReassignment, World},
};
use rand::Rng;

/// Why an entry left the queue without a reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The character no longer exists or is offline
    NotFound,
    /// Not in world, or the session is going away
    NoSession,
    /// Became protected after it was queued
    Excluded(Eligibility),
}

/// Why a safe entry could not be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The target index no longer names an active bracket
    InvalidBracket,
    /// The target bracket ends below the class level floor
    BelowClassFloor,
}

/// What happened to one entry during a drain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    Applied(LevelReassignment),
    Aborted(AbortReason),
    Dropped(DropReason),
    Deferred(UnsafeReason),
}

/// Counters for one drain pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub applied: u32,
    pub aborted: u32,
    pub dropped: u32,
    pub deferred: u32,

    /// Entries still queued after the pass
    pub remaining: usize,

    pub reassignments: Vec<LevelReassignment>,
}

impl DrainReport {
    fn record(&mut self, outcome: &DrainOutcome) {
        match outcome {
            DrainOutcome::Applied(reassignment) => {
                self.applied += 1;
                self.reassignments.push(reassignment.clone());
            }
            DrainOutcome::Aborted(_) => self.aborted += 1,
            DrainOutcome::Dropped(_) => self.dropped += 1,
            DrainOutcome::Deferred(_) => self.deferred += 1,
        }
    }
}

/// Pick a level for `character` inside the target bracket.
///
/// The bracket's lower bound is raised to the class floor. The level is
/// uniform over what is left.
pub fn choose_target_level<R: Rng + ?Sized>(
    character: &CharacterState,
    entry: &PendingReset,
    brackets: &Brackets,
    rng: &mut R,
) -> Result<LevelReassignment, AbortReason> {
    let range = brackets
        .table(entry.faction)
        .get(entry.target_bracket)
        .filter(|r| r.is_active())
        .ok_or(AbortReason::InvalidBracket)?;

    let mut lower = range.lower;
    if let Some(floor) = character.class.level_floor() {
        if range.upper < floor {
            return Err(AbortReason::BelowClassFloor);
        }
        lower = lower.max(floor);
    }

    let new_level = rng.random_range(lower..=range.upper);
    Ok(LevelReassignment {
        character_id: character.id,
        from_level: character.level,
        new_level,
        reached_max_level: new_level == brackets.max_level(),
    })
}

/// Decide and, if safe, apply one entry
fn process_entry<W: World + ?Sized, R: Rng + ?Sized>(
    entry: &PendingReset,
    world: &mut W,
    brackets: &Brackets,
    ctx: &EligibilityContext<'_>,
    rng: &mut R,
) -> DrainOutcome {
    let Some(character) = world.find_character(entry.character_id) else {
        return DrainOutcome::Dropped(DropReason::NotFound);
    };

    if !character.session_valid() {
        return DrainOutcome::Dropped(DropReason::NoSession);
    }

    let eligibility = classify(&character, ctx);
    if !eligibility.is_processable() {
        return DrainOutcome::Dropped(DropReason::Excluded(eligibility));
    }

    if let Some(reason) = safety_verdict(&character) {
        log::debug!("Bot '{}' is still unsafe ({}), deferring reset", character.name, reason);
        return DrainOutcome::Deferred(reason);
    }

    match choose_target_level(&character, entry, brackets, rng) {
        Ok(reassignment) => {
            world.apply_level_and_regenerate(&reassignment);
            log::debug!(
                "Bot '{}' reset from level {} to {} (range {})",
                character.name,
                reassignment.from_level,
                reassignment.new_level,
                entry.target_bracket + 1
            );
            DrainOutcome::Applied(reassignment)
        }
        Err(reason) => {
            log::debug!(
                "Reset of bot '{}' to range {} aborted: {:?}",
                character.name,
                entry.target_bracket + 1,
                reason
            );
            DrainOutcome::Aborted(reason)
        }
    }
}

/// Drain the queue once.
///
/// Entries are visited in insertion order. Dropped, aborted and applied
/// entries leave the queue; deferred ones keep their position. Once `limit`
/// entries have been applied or aborted the rest are left untouched
/// (`limit == 0` means no limit).
///
/// # Arguments
///
/// * `queue` - Pending resets
/// * `world` - Host world, re-queried for every entry
/// * `brackets` - Current bracket tables
/// * `ctx` - Eligibility inputs, re-checked at drain time
/// * `limit` - Per-pass cap on processed entries
/// * `rng` - Source for the target level
pub fn drain_pending<W: World + ?Sized, R: Rng + ?Sized>(
    queue: &mut PendingResetQueue,
    world: &mut W,
    brackets: &Brackets,
    ctx: &EligibilityContext<'_>,
    limit: u32,
    rng: &mut R,
) -> DrainReport {
    let mut report = DrainReport::default();
    let mut processed = 0u32;

    queue.retain_in_order(|entry| {
        if limit > 0 && processed >= limit {
            return true;
        }

        let outcome = process_entry(entry, world, brackets, ctx, rng);
        report.record(&outcome);
        match outcome {
            DrainOutcome::Deferred(_) => true,
            DrainOutcome::Dropped(_) => false,
            DrainOutcome::Applied(_) | DrainOutcome::Aborted(_) => {
                processed += 1;
                false
            }
        }
    });

    report.remaining = queue.len();
    if report.applied + report.aborted + report.dropped + report.deferred > 0 {
        log::info!(
            "Pending resets: {} applied, {} aborted, {} dropped, {} deferred, {} remaining",
            report.applied,
            report.aborted,
            report.dropped,
            report.deferred,
            report.remaining
        );
    }
    report
}
