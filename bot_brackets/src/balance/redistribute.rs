//! Move surplus bots from overfull brackets into underfull ones.

use super::scanner::FactionScan;
use crate::{
    brackets::BracketTable,
    queue::{PendingReset, PendingResetQueue},
};

/// What a redistribution pass queued
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedistributionReport {
    /// New entries from surplus brackets
    pub enqueued: u32,

    /// Surplus bots that were already queued
    pub already_queued: u32,

    /// New entries for bots outside every bracket
    pub fallback_enqueued: u32,
}

impl RedistributionReport {
    pub fn merge(&mut self, other: RedistributionReport) {
        self.enqueued += other.enqueued;
        self.already_queued += other.already_queued;
        self.fallback_enqueued += other.fallback_enqueued;
    }
}

/// `round(desired_percent / 100 * total)` per bracket
pub fn desired_counts(table: &BracketTable, total: u32) -> Vec<u32> {
    table
        .ranges()
        .iter()
        .map(|r| (f64::from(r.desired_percent) / 100.0 * f64::from(total)).round() as u32)
        .collect()
}

/// Queue every out-of-bracket bot for the bracket nearest its level.
/// Bots with nowhere to go (no active bracket at or above their class floor)
/// are left alone.
pub fn enqueue_out_of_bracket(
    scan: &FactionScan,
    table: &BracketTable,
    queue: &mut PendingResetQueue,
) -> u32 {
    let mut enqueued = 0;
    for bot in &scan.out_of_bracket {
        let Some(target) = table.nearest_index(bot.level, bot.floor) else {
            log::debug!("No bracket available for out-of-range bot {} (level {})", bot.id, bot.level);
            continue;
        };
        let added = queue.enqueue(PendingReset {
            character_id: bot.id,
            target_bracket: target,
            faction: scan.faction,
        });
        if added {
            log::debug!(
                "Out-of-range bot {} (level {}) flagged for range {}",
                bot.id,
                bot.level,
                target + 1
            );
            enqueued += 1;
        }
    }
    enqueued
}

/// Redistribute one faction's surplus.
///
/// Brackets are visited in index order. For each overfull bracket the
/// underfull targets are collected once, then bots are taken from the back of
/// the safe list first and the unsafe list second, each assigned to the
/// current target until it is full. A bot whose class floor lies above a
/// target's upper bound is passed over for that target. Counters move as soon as a bot is
/// assigned, queued or not, so later brackets see the updated occupancy.
///
/// # Arguments
///
/// * `scan` - The faction's scan results
/// * `table` - The faction's bracket table
/// * `queue` - Pending resets to add to
pub fn redistribute(
    scan: &FactionScan,
    table: &BracketTable,
    queue: &mut PendingResetQueue,
) -> RedistributionReport {
    let mut report = RedistributionReport {
        fallback_enqueued: enqueue_out_of_bracket(scan, table, queue),
        ..RedistributionReport::default()
    };

    if scan.total == 0 {
        return report;
    }

    let desired = desired_counts(table, scan.total);
    let mut actual = scan.actual.clone();

    for (i, range) in table.ranges().iter().enumerate() {
        log::info!(
            "{} Range {} ({}): Desired = {}, Actual = {}",
            scan.faction,
            i + 1,
            range,
            desired[i],
            actual[i]
        );
    }

    for i in 0..actual.len() {
        if actual[i] <= desired[i] {
            continue;
        }

        let targets: Vec<usize> = (0..actual.len()).filter(|&j| actual[j] < desired[j]).collect();
        if targets.is_empty() {
            continue;
        }

        let members = &scan.members[i];
        for pool in [&members.safe, &members.unsafe_bots] {
            let mut candidates = pool.clone();
            let mut target_idx = 0;

            while actual[i] > desired[i] && target_idx < targets.len() {
                let target = targets[target_idx];
                if actual[target] >= desired[target] {
                    target_idx += 1;
                    continue;
                }
                if candidates.is_empty() {
                    break;
                }
                let upper = table.ranges()[target].upper;
                let Some(pos) = candidates.iter().rposition(|&id| members.can_reach(id, upper)) else {
                    target_idx += 1;
                    continue;
                };
                let bot_id = candidates.remove(pos);

                let added = queue.enqueue(PendingReset {
                    character_id: bot_id,
                    target_bracket: target,
                    faction: scan.faction,
                });
                if added {
                    report.enqueued += 1;
                    log::debug!(
                        "{} bot {} flagged to move from range {} to range {}",
                        scan.faction,
                        bot_id,
                        i + 1,
                        target + 1
                    );
                } else {
                    report.already_queued += 1;
                }

                actual[i] -= 1;
                actual[target] += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::scanner::{BracketMembers, OutOfBracketBot};
    use crate::brackets::LevelRange;
    use crate::host::{CharacterId, Faction};

    fn table(pcts: &[u8]) -> BracketTable {
        let ranges = pcts
            .iter()
            .enumerate()
            .map(|(i, &pct)| {
                let lower = (i as u8) * 10 + 1;
                LevelRange::new(lower, lower + 9, pct)
            })
            .collect();
        BracketTable::new(ranges)
    }

    fn scan(members: Vec<(Vec<CharacterId>, Vec<CharacterId>)>) -> FactionScan {
        let mut scan = FactionScan::new(Faction::Horde, members.len());
        for (i, (safe, unsafe_bots)) in members.into_iter().enumerate() {
            scan.actual[i] = (safe.len() + unsafe_bots.len()) as u32;
            scan.total += scan.actual[i];
            scan.members[i] = BracketMembers {
                safe,
                unsafe_bots,
                ..BracketMembers::default()
            };
        }
        scan
    }

    #[test]
    fn test_desired_counts_round() {
        assert_eq!(desired_counts(&table(&[33, 33, 34]), 10), vec![3, 3, 3]);
        assert_eq!(desired_counts(&table(&[50, 50]), 5), vec![3, 3]);
    }

    #[test]
    fn test_surplus_moves_to_empty_bracket() {
        let scan = scan(vec![((1..=10).collect(), vec![]), (vec![], vec![])]);
        let mut queue = PendingResetQueue::new();

        let report = redistribute(&scan, &table(&[50, 50]), &mut queue);

        assert_eq!(report.enqueued, 5);
        assert_eq!(queue.len(), 5);
        assert!(queue.iter().all(|e| e.target_bracket == 1 && e.faction == Faction::Horde));
        // Popped from the back
        assert!(queue.contains(10));
        assert!(!queue.contains(1));
    }

    #[test]
    fn test_safe_bots_go_first() {
        let scan = scan(vec![(vec![1, 2], vec![3, 4, 5, 6]), (vec![], vec![])]);
        let mut queue = PendingResetQueue::new();

        redistribute(&scan, &table(&[50, 50]), &mut queue);

        let ids: Vec<_> = queue.iter().map(|e| e.character_id).collect();
        assert_eq!(ids, vec![2, 1, 6]);
    }

    #[test]
    fn test_targets_fill_in_order() {
        let scan = scan(vec![((1..=9).collect(), vec![]), (vec![], vec![]), (vec![], vec![])]);
        let mut queue = PendingResetQueue::new();

        redistribute(&scan, &table(&[34, 33, 33]), &mut queue);

        let to_second = queue.iter().filter(|e| e.target_bracket == 1).count();
        let to_third = queue.iter().filter(|e| e.target_bracket == 2).count();
        assert_eq!((to_second, to_third), (3, 3));
    }

    #[test]
    fn test_death_knight_skips_targets_below_floor() {
        // 1-10 | 11-20 | 51-60, all surplus sits in the top bracket
        let table = BracketTable::new(vec![
            LevelRange::new(1, 10, 25),
            LevelRange::new(11, 20, 25),
            LevelRange::new(51, 60, 50),
        ]);
        let mut scan = scan(vec![(vec![], vec![]), (vec![], vec![]), ((1..=8).collect(), vec![])]);
        scan.members[2].floors = [(7, 55), (8, 55)].into_iter().collect();
        let mut queue = PendingResetQueue::new();

        let report = redistribute(&scan, &table, &mut queue);

        assert_eq!(report.enqueued, 4);
        assert!(!queue.contains(7));
        assert!(!queue.contains(8));
        let ids: Vec<_> = queue.iter().map(|e| e.character_id).collect();
        assert_eq!(ids, vec![6, 5, 4, 3]);
    }

    #[test]
    fn test_death_knight_still_moves_to_reachable_target() {
        let table = BracketTable::new(vec![
            LevelRange::new(1, 10, 50),
            LevelRange::new(55, 60, 25),
            LevelRange::new(61, 70, 25),
        ]);
        let mut scan = scan(vec![(vec![], vec![]), (vec![], vec![]), ((1..=4).collect(), vec![])]);
        scan.members[2].floors = [(3, 55), (4, 55)].into_iter().collect();
        let mut queue = PendingResetQueue::new();

        redistribute(&scan, &table, &mut queue);

        // The plain bots fill 1-10, a knight takes the open slot in 55-60
        assert_eq!(queue.get(2).map(|e| e.target_bracket), Some(0));
        assert_eq!(queue.get(1).map(|e| e.target_bracket), Some(0));
        assert_eq!(queue.get(4).map(|e| e.target_bracket), Some(1));
        assert!(!queue.contains(3));
    }

    #[test]
    fn test_already_queued_still_moves_counters() {
        let scan = scan(vec![((1..=4).collect(), vec![]), (vec![], vec![])]);
        let mut queue = PendingResetQueue::new();
        queue.enqueue(PendingReset {
            character_id: 4,
            target_bracket: 1,
            faction: Faction::Horde,
        });

        let report = redistribute(&scan, &table(&[50, 50]), &mut queue);

        assert_eq!(report.already_queued, 1);
        assert_eq!(report.enqueued, 1);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_balanced_population_queues_nothing() {
        let scan = scan(vec![(vec![1, 2], vec![]), (vec![3, 4], vec![])]);
        let mut queue = PendingResetQueue::new();
        let report = redistribute(&scan, &table(&[50, 50]), &mut queue);
        assert_eq!(report, RedistributionReport::default());
    }

    #[test]
    fn test_fallback_goes_to_nearest_bracket() {
        let mut scan = scan(vec![(vec![], vec![]), (vec![], vec![])]);
        scan.total = 2;
        scan.out_of_bracket = vec![
            OutOfBracketBot { id: 1, level: 60, floor: None },
            OutOfBracketBot { id: 2, level: 60, floor: Some(55) },
        ];
        let mut queue = PendingResetQueue::new();

        let report = redistribute(&scan, &table(&[50, 50]), &mut queue);

        // 1-10 and 11-20: the plain bot goes to 11-20, the death knight has nowhere to go
        assert_eq!(report.fallback_enqueued, 1);
        assert_eq!(queue.get(1).map(|e| e.target_bracket), Some(1));
        assert!(!queue.contains(2));
    }
}
