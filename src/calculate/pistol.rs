//! Pistol rounds and the second round that follows them.

use std::collections::BTreeMap;

use crate::models::{
    CodeShare, ConversionBreakdown, MatchRoundRecord, PistolSummary, Report, SecondRoundCode,
};

/// Pistol rounds per map instance (one per half).
pub const PISTOLS_PER_MAP: u32 = 2;

/// Pistol win rate per map, best first.
///
/// Each map instance is two pistol opportunities. Rows where either pistol
/// result is missing, or is anything but 0 or 1, are left out of both sums;
/// maps with no usable rows do not appear.
pub fn pistol_summary(rows: &[MatchRoundRecord]) -> Report<Vec<PistolSummary>> {
    let mut groups: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    for row in rows {
        let (Some(first @ 0..=1), Some(second @ 0..=1)) = (row.first_pistol, row.second_pistol)
        else {
            continue;
        };
        let (won, played) = groups.entry(row.map.as_str()).or_default();
        *won += first + second;
        *played += PISTOLS_PER_MAP;
    }

    let mut summaries: Vec<PistolSummary> = groups
        .into_iter()
        .map(|(map, (won, played))| PistolSummary {
            map: map.to_string(),
            pistols_won: won,
            pistols_played: played,
            win_rate: won as f64 / played as f64,
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then_with(|| a.map.cmp(&b.map))
    });
    Report::from_rows(summaries)
}

/// Share of each code within one pistol outcome.
fn shares(codes: &[SecondRoundCode], wanted: [SecondRoundCode; 2]) -> Report<Vec<CodeShare>> {
    let counts = wanted.map(|code| codes.iter().filter(|c| **c == code).count() as u32);
    let total: u32 = counts.iter().sum();
    if total == 0 {
        return Report::NoData;
    }

    Report::Ready(
        wanted
            .into_iter()
            .zip(counts)
            .map(|(code, count)| CodeShare {
                code,
                count,
                share: count as f64 / total as f64,
            })
            .collect(),
    )
}

/// Second-round outcomes per map, attack and defense codes pooled.
pub fn conversion_breakdown(rows: &[MatchRoundRecord]) -> Report<Vec<ConversionBreakdown>> {
    let mut groups: BTreeMap<&str, Vec<SecondRoundCode>> = BTreeMap::new();
    for row in rows {
        let codes = groups.entry(row.map.as_str()).or_default();
        codes.extend(row.atk_second_round);
        codes.extend(row.def_second_round);
    }

    let breakdowns = groups
        .into_iter()
        .map(|(map, codes)| ConversionBreakdown {
            map: map.to_string(),
            after_pistol_win: shares(&codes, [SecondRoundCode::WW, SecondRoundCode::WL]),
            after_pistol_loss: shares(&codes, [SecondRoundCode::LL, SecondRoundCode::LW]),
        })
        .collect();

    Report::from_rows(breakdowns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Outcome;
    use SecondRoundCode::*;

    fn pistols(map: &str, first: u32, second: u32) -> MatchRoundRecord {
        MatchRoundRecord::new(map, Outcome::Win, None).with_pistols(first, second)
    }

    fn codes(
        map: &str,
        atk: Option<SecondRoundCode>,
        def: Option<SecondRoundCode>,
    ) -> MatchRoundRecord {
        MatchRoundRecord::new(map, Outcome::Loss, None).with_second_rounds(atk, def)
    }

    #[test]
    fn test_two_pistols_per_map_instance() {
        let rows = vec![
            pistols("Ascent", 1, 1),
            pistols("Ascent", 0, 1),
            pistols("Ascent", 0, 0),
        ];

        let summary = pistol_summary(&rows).into_option().unwrap();

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].pistols_won, 3);
        assert_eq!(summary[0].pistols_played, 6);
        assert_eq!(summary[0].win_rate, 0.5);
    }

    #[test]
    fn test_pistol_rows_missing_a_result_are_skipped() {
        let mut partial = MatchRoundRecord::new("Bind", Outcome::Win, None);
        partial.first_pistol = Some(1);
        let rows = vec![pistols("Bind", 1, 0), partial];

        let summary = pistol_summary(&rows).into_option().unwrap();

        assert_eq!(summary[0].pistols_played, 2);
        assert_eq!(summary[0].win_rate, 0.5);
    }

    #[test]
    fn test_pistol_results_above_one_are_skipped() {
        let rows = vec![
            pistols("Icebox", 3, 2),
            pistols("Icebox", u32::MAX, u32::MAX),
            pistols("Icebox", 1, 0),
        ];

        let summary = pistol_summary(&rows).into_option().unwrap();

        assert_eq!(summary[0].pistols_won, 1);
        assert_eq!(summary[0].pistols_played, 2);
        assert!(summary.iter().all(|s| (0.0..=1.0).contains(&s.win_rate)));
    }

    #[test]
    fn test_pistol_summary_sorted_best_first() {
        let rows = vec![
            pistols("Split", 0, 1),
            pistols("Lotus", 1, 1),
            pistols("Haven", 0, 0),
        ];

        let maps: Vec<String> = pistol_summary(&rows)
            .into_option()
            .unwrap()
            .into_iter()
            .map(|s| s.map)
            .collect();
        assert_eq!(maps, vec!["Lotus", "Split", "Haven"]);
    }

    #[test]
    fn test_pistol_summary_no_usable_rows() {
        let rows = vec![MatchRoundRecord::new("Bind", Outcome::Win, None)];
        assert!(pistol_summary(&rows).is_no_data());
        assert!(pistol_summary(&[]).is_no_data());
    }

    #[test]
    fn test_conversion_pools_both_sides() {
        let rows = vec![
            codes("Ascent", Some(WW), Some(WL)),
            codes("Ascent", Some(WW), Some(LL)),
            codes("Ascent", None, Some(LW)),
        ];

        let breakdown = conversion_breakdown(&rows).into_option().unwrap();
        let ascent = &breakdown[0];

        let won = ascent.after_pistol_win.as_ref().into_option().unwrap();
        assert_eq!(won[0].code, WW);
        assert_eq!(won[0].count, 2);
        assert!((won[0].share - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(won[1].code, WL);
        assert_eq!(won[1].count, 1);

        let lost = ascent.after_pistol_loss.as_ref().into_option().unwrap();
        assert_eq!(lost[0].share, 0.5);
        assert_eq!(lost[1].share, 0.5);
    }

    #[test]
    fn test_conversion_sides_report_no_data_independently() {
        let rows = vec![codes("Pearl", Some(WW), Some(WL))];

        let breakdown = conversion_breakdown(&rows).into_option().unwrap();

        assert!(!breakdown[0].after_pistol_win.is_no_data());
        assert!(breakdown[0].after_pistol_loss.is_no_data());
    }

    #[test]
    fn test_conversion_empty_is_no_data() {
        assert!(conversion_breakdown(&[]).is_no_data());
    }
}
