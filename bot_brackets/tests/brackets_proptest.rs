/// Property-based tests for bracket normalization and redistribution
///
/// These tests check that normalized tables always sum to 100 and that a
/// scan never queues more bots than a faction has in surplus.
use bot_brackets::balance::{RedistributionReport, desired_counts};
use bot_brackets::brackets::{BracketTable, LevelRange};
use bot_brackets::host::{CharacterId, CharacterKind, CharacterState, Faction, InMemoryWorld};
use bot_brackets::{BracketScheduler, BracketsConfig};
use proptest::prelude::*;

// Contiguous ranges of ten levels each with arbitrary shares
fn table_strategy() -> impl Strategy<Value = Vec<LevelRange>> {
    prop::collection::vec(0u8..=100, 1..=8).prop_map(|pcts| {
        pcts.into_iter()
            .enumerate()
            .map(|(i, pct)| {
                let lower = (i as u8) * 10 + 1;
                LevelRange::new(lower, lower + 9, pct)
            })
            .collect()
    })
}

// Bots spread over levels 1-80
fn levels_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=80, 0..60)
}

fn population(levels: &[u8]) -> InMemoryWorld {
    InMemoryWorld::with_characters(levels.iter().enumerate().map(|(i, &level)| {
        CharacterState::new(
            i as CharacterId + 1,
            format!("Bot{i}"),
            level,
            Faction::Horde,
            CharacterKind::RandomBot,
        )
    }))
}

proptest! {
    #[test]
    fn test_normalized_sum_is_100_or_all_zero(ranges in table_strategy()) {
        let mut table = BracketTable::new(ranges);
        let before = table.clamp_and_normalize(1, 80);

        if before == 0 {
            prop_assert_eq!(table.active_percent_sum(), 0);
        } else {
            prop_assert_eq!(table.active_percent_sum(), 100);
        }
    }

    #[test]
    fn test_zero_share_ranges_stay_empty(ranges in table_strategy()) {
        let zero: Vec<usize> = ranges
            .iter()
            .enumerate()
            .filter(|(_, r)| r.desired_percent == 0)
            .map(|(i, _)| i)
            .collect();

        let mut table = BracketTable::new(ranges);
        table.clamp_and_normalize(1, 80);

        for i in zero {
            prop_assert_eq!(table.get(i).unwrap().desired_percent, 0);
        }
    }

    #[test]
    fn test_weights_keep_sum_at_100(
        ranges in table_strategy(),
        weights in prop::collection::vec(0.0f64..10.0, 8),
    ) {
        let mut table = BracketTable::new(ranges);
        table.apply_weights(&weights);

        let sum = table.active_percent_sum();
        prop_assert!(sum == 0 || sum == 100, "sum was {}", sum);
    }

    #[test]
    fn test_scan_never_queues_more_than_surplus(levels in levels_strategy()) {
        let ranges = vec![
            LevelRange::new(1, 19, 25),
            LevelRange::new(20, 39, 25),
            LevelRange::new(40, 59, 25),
            LevelRange::new(60, 80, 25),
        ];
        let config = BracketsConfig {
            alliance_ranges: ranges.clone(),
            horde_ranges: ranges,
            ..BracketsConfig::default()
        };
        let world = population(&levels);
        let mut scheduler = BracketScheduler::with_seed(config, 1).unwrap();

        let scan = scheduler.scan(&world);
        let horde = &scan.population.horde;
        let table = scheduler.brackets().table(Faction::Horde);
        let desired = desired_counts(table, horde.total);

        let surplus: u32 = horde
            .actual
            .iter()
            .zip(&desired)
            .map(|(actual, desired)| actual.saturating_sub(*desired))
            .sum();

        let RedistributionReport { enqueued, already_queued, .. } = scan.redistribution;
        prop_assert_eq!(already_queued, 0);
        prop_assert!(enqueued <= surplus);
        prop_assert_eq!(scheduler.queue().len() as u32, enqueued);
        prop_assert_eq!(horde.total as usize, levels.len());
    }
}
