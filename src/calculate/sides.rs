//! Attack/defense round win rates and post-plant success per map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calculate::{band, mean};
use crate::models::{
    BandThresholds, MatchRoundRecord, OutcomeCounts, PostPlantSummary, Report, Side, SideSummary,
};

fn group_by_map(rows: &[MatchRoundRecord]) -> BTreeMap<&str, Vec<&MatchRoundRecord>> {
    let mut groups: BTreeMap<&str, Vec<&MatchRoundRecord>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.map.as_str()).or_default().push(row);
    }
    groups
}

/// Per-map side breakdown, sorted by map name.
///
/// The round win rate is the plain mean of the attack and defense means,
/// not weighted by the number of rounds in each half.
pub fn side_summary(
    rows: &[MatchRoundRecord],
    thresholds: &BandThresholds,
) -> Report<Vec<SideSummary>> {
    let summaries = group_by_map(rows)
        .into_iter()
        .map(|(map, group)| {
            let counts: OutcomeCounts = group.iter().map(|r| r.outcome).collect();
            let attack = mean(group.iter().map(|r| r.side_win_rate(Side::Attack)));
            let defense = mean(group.iter().map(|r| r.side_win_rate(Side::Defense)));
            let round = match (attack, defense) {
                (Some(a), Some(d)) => Some((a + d) / 2.0),
                _ => None,
            };

            SideSummary {
                map: map.to_string(),
                counts,
                attack_win_rate: attack,
                defense_win_rate: defense,
                round_win_rate: round,
                attack_post_plant: mean(group.iter().map(|r| r.atk_post_plant)),
                defense_post_plant: mean(group.iter().map(|r| r.def_post_plant)),
                attack_band: band(attack, thresholds),
                defense_band: band(defense, thresholds),
                round_band: band(round, thresholds),
            }
        })
        .collect();

    Report::from_rows(summaries)
}

/// Chart order: maps by the mean of their attack and defense rates, best
/// first. Maps with neither rate go last.
pub fn rank_by_side_average(mut summaries: Vec<SideSummary>) -> Vec<SideSummary> {
    let key = |s: &SideSummary| mean([s.attack_win_rate, s.defense_win_rate]).unwrap_or(f64::MIN);
    summaries.sort_by(|a, b| key(b).total_cmp(&key(a)).then_with(|| a.map.cmp(&b.map)));
    summaries
}

/// Column to order the post-plant table by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostPlantSort {
    #[default]
    Attack,
    Defense,
}

/// Mean post-plant (attack) and retake (defense) success per map.
pub fn post_plant_summary(
    rows: &[MatchRoundRecord],
    sort: PostPlantSort,
    ascending: bool,
) -> Report<Vec<PostPlantSummary>> {
    let mut summaries: Vec<PostPlantSummary> = group_by_map(rows)
        .into_iter()
        .map(|(map, group)| PostPlantSummary {
            map: map.to_string(),
            attack: mean(group.iter().map(|r| r.atk_post_plant)),
            defense: mean(group.iter().map(|r| r.def_post_plant)),
        })
        .collect();

    let value = |s: &PostPlantSummary| match sort {
        PostPlantSort::Attack => s.attack,
        PostPlantSort::Defense => s.defense,
    };
    // Missing values sort last in both directions.
    summaries.sort_by(|a, b| match (value(a), value(b)) {
        (Some(x), Some(y)) if ascending => x.total_cmp(&y),
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    Report::from_rows(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Outcome, WinRateBand};

    fn row(map: &str, start: Side, first: f64, second: f64) -> MatchRoundRecord {
        MatchRoundRecord::new(map, Outcome::Win, None).with_halves(start, first, second)
    }

    #[test]
    fn test_attack_rate_follows_starting_side() {
        let rows = vec![
            row("Ascent", Side::Attack, 0.6, 0.4),
            row("Ascent", Side::Defense, 0.5, 0.8),
        ];

        let summary = side_summary(&rows, &BandThresholds::default())
            .into_option()
            .unwrap();
        let ascent = &summary[0];

        // attack: 0.6 (first half) and 0.8 (second half)
        assert!((ascent.attack_win_rate.unwrap() - 0.7).abs() < 1e-9);
        // defense: 0.4 (second half) and 0.5 (first half)
        assert!((ascent.defense_win_rate.unwrap() - 0.45).abs() < 1e-9);
        assert!((ascent.round_win_rate.unwrap() - 0.575).abs() < 1e-9);
        assert_eq!(ascent.attack_band, Some(WinRateBand::High));
        assert_eq!(ascent.round_band, Some(WinRateBand::Mid));
    }

    #[test]
    fn test_round_rate_is_unweighted_mean() {
        let rows = vec![
            row("Bind", Side::Attack, 1.0, 0.0),
            row("Bind", Side::Attack, 0.5, 0.0),
            row("Bind", Side::Attack, 0.0, 0.3),
        ];

        let summary = side_summary(&rows, &BandThresholds::default())
            .into_option()
            .unwrap();
        let bind = &summary[0];

        assert!((bind.attack_win_rate.unwrap() - 0.5).abs() < 1e-9);
        assert!((bind.defense_win_rate.unwrap() - 0.1).abs() < 1e-9);
        assert!((bind.round_win_rate.unwrap() - 0.3).abs() < 1e-9);
        assert_eq!(bind.defense_band, Some(WinRateBand::Low));
    }

    #[test]
    fn test_missing_half_rates_are_excluded() {
        let mut partial = MatchRoundRecord::new("Haven", Outcome::Loss, None);
        partial.start = Some(Side::Attack);
        partial.second_half_wr = Some(0.9);
        let rows = vec![row("Haven", Side::Attack, 0.5, 0.5), partial];

        let summary = side_summary(&rows, &BandThresholds::default())
            .into_option()
            .unwrap();
        let haven = &summary[0];

        assert_eq!(haven.counts.games, 2);
        assert_eq!(haven.counts.losses, 1);
        assert_eq!(haven.attack_win_rate, Some(0.5));
        assert_eq!(haven.defense_win_rate, Some(0.5));
    }

    #[test]
    fn test_no_side_data_leaves_rates_undefined() {
        let rows = vec![MatchRoundRecord::new("Lotus", Outcome::Win, None)];

        let summary = side_summary(&rows, &BandThresholds::default())
            .into_option()
            .unwrap();

        assert_eq!(summary[0].attack_win_rate, None);
        assert_eq!(summary[0].round_win_rate, None);
        assert_eq!(summary[0].round_band, None);
    }

    #[test]
    fn test_side_summary_empty_is_no_data() {
        assert!(side_summary(&[], &BandThresholds::default()).is_no_data());
    }

    #[test]
    fn test_rank_by_side_average() {
        let rows = vec![
            row("Ascent", Side::Attack, 0.2, 0.2),
            row("Bind", Side::Attack, 0.9, 0.7),
            MatchRoundRecord::new("Lotus", Outcome::Win, None),
        ];
        let summary = side_summary(&rows, &BandThresholds::default())
            .into_option()
            .unwrap();

        let ranked: Vec<String> = rank_by_side_average(summary)
            .into_iter()
            .map(|s| s.map)
            .collect();
        assert_eq!(ranked, vec!["Bind", "Ascent", "Lotus"]);
    }

    #[test]
    fn test_post_plant_summary_sorting() {
        let pp = |map: &str, a: Option<f64>, d: Option<f64>| {
            MatchRoundRecord::new(map, Outcome::Win, None).with_post_plant(a, d)
        };
        let rows = vec![
            pp("Ascent", Some(0.5), Some(0.2)),
            pp("Ascent", Some(0.7), None),
            pp("Bind", Some(0.9), Some(0.4)),
            pp("Split", None, Some(0.3)),
        ];

        let by_attack: Vec<_> = post_plant_summary(&rows, PostPlantSort::Attack, false)
            .into_option()
            .unwrap();
        assert_eq!(by_attack[0].map, "Bind");
        assert!((by_attack[1].attack.unwrap() - 0.6).abs() < 1e-9);
        assert_eq!(by_attack[2].map, "Split");

        let by_defense: Vec<_> = post_plant_summary(&rows, PostPlantSort::Defense, true)
            .into_option()
            .unwrap();
        let maps: Vec<_> = by_defense.iter().map(|s| s.map.as_str()).collect();
        assert_eq!(maps, vec!["Ascent", "Split", "Bind"]);
        assert_eq!(by_defense[0].defense, Some(0.2));
    }
}
