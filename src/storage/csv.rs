//! CSV input.
//!
//! Each sheet is read into a raw all-string row first, then parsed and
//! validated into its typed record. A row that cannot become a record is
//! skipped with a diagnostic; a cell that cannot be parsed becomes `None`.

use std::fs::File;
use std::io::Read;
use std::marker::PhantomData;
use std::path::PathBuf;

use ::csv::{ReaderBuilder, Trim};
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Diagnostic, StorageError, Table};
use crate::models::{
    AgentResultRecord, MatchRoundRecord, Outcome, PlayerAgentRecord, SecondRoundCode, Side,
};

/// A record type that can be read from a CSV sheet.
pub trait CsvRecord: Sized {
    /// Row as it appears in the sheet, keyed by header name.
    type Raw: DeserializeOwned;

    /// Headers that must be present for the sheet to be usable.
    const REQUIRED_COLUMNS: &'static [&'static str];

    /// Validate a raw row. `Err` carries the reason the row was dropped.
    fn from_raw(raw: Self::Raw) -> Result<Self, String>;
}

/// CSV file reader.
pub struct CsvReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: CsvRecord> CsvReader<T> {
    /// Create a new CSV reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every row. Never fails; problems end up in the diagnostics.
    pub fn read_all(&self) -> Table<T> {
        if !self.exists() {
            warn!("Input {:?} not found", self.path);
            return Table::empty(Diagnostic::MissingInput {
                path: self.path.clone(),
            });
        }

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Failed to open {:?}: {}", self.path, e);
                return Table::empty(Diagnostic::Unreadable {
                    path: self.path.clone(),
                    message: e.to_string(),
                });
            }
        };

        match self.read_from(file) {
            Ok(table) => table,
            Err(StorageError::MissingColumns(columns)) => {
                warn!("{:?} is missing columns {:?}", self.path, columns);
                Table::empty(Diagnostic::MissingColumns {
                    path: self.path.clone(),
                    columns,
                })
            }
            Err(e) => {
                warn!("Failed to read {:?}: {}", self.path, e);
                Table::empty(Diagnostic::Unreadable {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// Read rows from any source. Fails only when the header row is unusable.
    pub fn read_from<R: Read>(&self, input: R) -> Result<Table<T>, StorageError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        if headers.iter().all(str::is_empty) {
            return Ok(Table::empty(Diagnostic::EmptyInput {
                path: self.path.clone(),
            }));
        }

        let missing: Vec<String> = T::REQUIRED_COLUMNS
            .iter()
            .filter(|column| !headers.iter().any(|h| h == **column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(StorageError::MissingColumns(missing));
        }

        let mut table = Table::default();

        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    table.diagnostics.push(self.malformed(line, e.to_string()));
                    continue;
                }
            };

            // Spacer rows between blocks
            if record.iter().all(str::is_empty) {
                continue;
            }

            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let parsed = record
                .deserialize::<T::Raw>(Some(&headers))
                .map_err(|e| e.to_string())
                .and_then(T::from_raw);

            match parsed {
                Ok(row) => table.rows.push(row),
                Err(reason) => table.diagnostics.push(self.malformed(line, reason)),
            }
        }

        if table.rows.is_empty() && table.diagnostics.is_empty() {
            table.diagnostics.push(Diagnostic::EmptyInput {
                path: self.path.clone(),
            });
        }

        debug!(
            "Read {} rows from {:?} ({} skipped)",
            table.rows.len(),
            self.path,
            table.diagnostics.len()
        );
        Ok(table)
    }

    fn malformed(&self, line: u64, reason: String) -> Diagnostic {
        warn!("Skipping line {} in {:?}: {}", line, self.path, reason);
        Diagnostic::MalformedRow {
            path: self.path.clone(),
            line,
            reason,
        }
    }
}

// ── Field parsers ───────────────────────────────────────────────

/// Trimmed, non-empty cell.
pub fn non_empty(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Plain number. A trailing `%` is stripped without rescaling.
pub fn parse_number(cell: &str) -> Option<f64> {
    let value: f64 = cell.trim().trim_end_matches('%').trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Rate as a fraction in `[0, 1]`.
///
/// `55%` and `55` both read as 0.55; `0.55` is already a fraction. Anything
/// above 100% is not a rate.
pub fn parse_rate(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    let value = parse_number(trimmed)?;
    if value < 0.0 {
        return None;
    }
    let rate = if trimmed.ends_with('%') || value > 1.0 {
        value / 100.0
    } else {
        value
    };
    (rate <= 1.0).then_some(rate)
}

/// Non-negative whole number.
pub fn parse_count(cell: &str) -> Option<u32> {
    let value = parse_number(cell)?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return None;
    }
    Some(value as u32)
}

/// Pistol round result: 1 for a win, 0 for a loss.
pub fn parse_pistol(cell: &str) -> Option<u32> {
    parse_count(cell).filter(|won| *won <= 1)
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Calendar date. Any time of day is dropped.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn opt<T>(cell: &Option<String>, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    cell.as_deref().and_then(parse)
}

// ── Round-score sheet ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RawMatchRound {
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Map", default)]
    map: Option<String>,
    #[serde(rename = "Outcome", default)]
    outcome: Option<String>,
    #[serde(rename = "Start", default)]
    start: Option<String>,
    #[serde(rename = "First Half WR", default)]
    first_half_wr: Option<String>,
    #[serde(rename = "Second Half WR", default)]
    second_half_wr: Option<String>,
    #[serde(rename = "First Pistol", default)]
    first_pistol: Option<String>,
    #[serde(rename = "Second Pistol", default)]
    second_pistol: Option<String>,
    #[serde(rename = "Atk PP %", alias = "Atk_PP_Success", default)]
    atk_post_plant: Option<String>,
    #[serde(rename = "Def PP %", alias = "Def_PP_Success", default)]
    def_post_plant: Option<String>,
    #[serde(rename = "Atk 2nd", default)]
    atk_second: Option<String>,
    #[serde(rename = "Def 2nd", default)]
    def_second: Option<String>,
}

impl CsvRecord for MatchRoundRecord {
    type Raw = RawMatchRound;
    const REQUIRED_COLUMNS: &'static [&'static str] = &["Map", "Outcome"];

    fn from_raw(raw: RawMatchRound) -> Result<Self, String> {
        let map = non_empty(raw.map).ok_or("missing map")?;
        let outcome_cell = non_empty(raw.outcome).ok_or("missing outcome")?;
        let outcome = Outcome::parse(&outcome_cell)
            .ok_or_else(|| format!("unrecognised outcome {:?}", outcome_cell))?;

        Ok(MatchRoundRecord {
            date: opt(&raw.date, parse_date),
            map,
            outcome,
            start: opt(&raw.start, Side::parse),
            first_half_wr: opt(&raw.first_half_wr, parse_rate),
            second_half_wr: opt(&raw.second_half_wr, parse_rate),
            first_pistol: opt(&raw.first_pistol, parse_pistol),
            second_pistol: opt(&raw.second_pistol, parse_pistol),
            atk_post_plant: opt(&raw.atk_post_plant, parse_rate),
            def_post_plant: opt(&raw.def_post_plant, parse_rate),
            atk_second_round: opt(&raw.atk_second, SecondRoundCode::parse),
            def_second_round: opt(&raw.def_second, SecondRoundCode::parse),
        })
    }
}

// ── Match-form sheet ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RawPlayerAgent {
    #[serde(rename = "Column 1", default)]
    map: Option<String>,
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Player", default)]
    player: Option<String>,
    #[serde(rename = "Agent", default)]
    agent: Option<String>,
    #[serde(rename = "Result", default)]
    result: Option<String>,
    #[serde(rename = "Rounds", default)]
    rounds: Option<String>,
    #[serde(rename = "Kills", default)]
    kills: Option<String>,
    #[serde(rename = "Deaths", default)]
    deaths: Option<String>,
    #[serde(rename = "Assists", default)]
    assists: Option<String>,
    #[serde(rename = "ACS", default)]
    acs: Option<String>,
    #[serde(rename = "FK", default)]
    first_kills: Option<String>,
    #[serde(rename = "FD", default)]
    first_deaths: Option<String>,
    #[serde(rename = "FD Def", default)]
    first_deaths_defense: Option<String>,
    #[serde(rename = "Plants", default)]
    plants: Option<String>,
    #[serde(rename = "Multi_Kills", alias = "Multi-Kills", default)]
    multi_kills: Option<String>,
    #[serde(rename = "FBSR", default)]
    fbsr: Option<String>,
    #[serde(rename = "FKPR", default)]
    fkpr: Option<String>,
    #[serde(rename = "KPR", default)]
    kpr: Option<String>,
    #[serde(rename = "Atk_Entry", alias = "Atk Entry", default)]
    atk_entry: Option<String>,
    #[serde(rename = "Anchor_Time", default)]
    anchor_time: Option<String>,
}

impl CsvRecord for PlayerAgentRecord {
    type Raw = RawPlayerAgent;
    const REQUIRED_COLUMNS: &'static [&'static str] = &["Column 1", "Agent"];

    fn from_raw(raw: RawPlayerAgent) -> Result<Self, String> {
        let map = non_empty(raw.map).ok_or("missing map")?;
        let agent = non_empty(raw.agent).ok_or("missing agent")?;

        Ok(PlayerAgentRecord {
            date: opt(&raw.date, parse_date),
            map,
            player: non_empty(raw.player),
            agent,
            result: opt(&raw.result, Outcome::parse),
            rounds: opt(&raw.rounds, parse_number),
            kills: opt(&raw.kills, parse_number),
            deaths: opt(&raw.deaths, parse_number),
            assists: opt(&raw.assists, parse_number),
            acs: opt(&raw.acs, parse_number),
            first_kills: opt(&raw.first_kills, parse_number),
            first_deaths: opt(&raw.first_deaths, parse_number),
            first_deaths_defense: opt(&raw.first_deaths_defense, parse_number),
            plants: opt(&raw.plants, parse_number),
            multi_kills: opt(&raw.multi_kills, parse_number),
            fbsr: opt(&raw.fbsr, parse_rate),
            fkpr: opt(&raw.fkpr, parse_rate),
            kpr: opt(&raw.kpr, parse_number),
            atk_entry: opt(&raw.atk_entry, parse_rate),
            anchor_time: opt(&raw.anchor_time, parse_number),
        })
    }
}

// ── ACS sheet ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RawAgentResult {
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Player", default)]
    player: Option<String>,
    #[serde(rename = "Agent", default)]
    agent: Option<String>,
    #[serde(rename = "Map", default)]
    map: Option<String>,
    #[serde(rename = "Result", default)]
    result: Option<String>,
    #[serde(rename = "ACS", default)]
    acs: Option<String>,
}

impl CsvRecord for AgentResultRecord {
    type Raw = RawAgentResult;
    const REQUIRED_COLUMNS: &'static [&'static str] = &["Player", "Agent"];

    fn from_raw(raw: RawAgentResult) -> Result<Self, String> {
        let player = non_empty(raw.player).ok_or("missing player")?;
        let agent = non_empty(raw.agent).ok_or("missing agent")?;

        Ok(AgentResultRecord {
            date: opt(&raw.date, parse_date),
            player,
            agent,
            map: non_empty(raw.map),
            result: opt(&raw.result, Outcome::parse),
            acs: opt(&raw.acs, parse_number),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 12.5 "), Some(12.5));
        assert_eq!(parse_number("40%"), Some(40.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("55%"), Some(0.55));
        assert_eq!(parse_rate("55"), Some(0.55));
        assert_eq!(parse_rate("0.55"), Some(0.55));
        assert_eq!(parse_rate("1"), Some(1.0));
        assert_eq!(parse_rate("0%"), Some(0.0));
        assert_eq!(parse_rate("-5"), None);
        assert_eq!(parse_rate("abc%"), None);
        assert_eq!(parse_rate("100%"), Some(1.0));
        assert_eq!(parse_rate("150%"), None);
        assert_eq!(parse_rate("150"), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1"), Some(1));
        assert_eq!(parse_count("2.0"), Some(2));
        assert_eq!(parse_count("0.5"), None);
        assert_eq!(parse_count("-1"), None);
    }

    #[test]
    fn test_parse_pistol() {
        assert_eq!(parse_pistol("0"), Some(0));
        assert_eq!(parse_pistol("1"), Some(1));
        assert_eq!(parse_pistol("2"), None);
        assert_eq!(parse_pistol("4000000000"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14);
        assert_eq!(parse_date("2025-03-14"), expected);
        assert_eq!(parse_date("2025/03/14"), expected);
        assert_eq!(parse_date("03/14/2025"), expected);
        assert_eq!(parse_date("2025-03-14 21:30:00"), expected);
        assert_eq!(parse_date("2025-03-14T21:30:00"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_read_scores() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "scores.csv",
            "Date,Map,Outcome,Start,First Half WR,Second Half WR,First Pistol,Second Pistol,Atk PP %,Def PP %,Atk 2nd,Def 2nd\n\
             2025-03-01,Ascent,WIN,Attack,0.58,0.5,1,0,75%,40%,WW,LL\n\
             2025-03-02,Bind,loss,Defence,,0.3,0,0,,,,\n",
        );

        let table = CsvReader::<MatchRoundRecord>::new(path).read_all();

        assert!(table.diagnostics.is_empty());
        assert_eq!(table.rows.len(), 2);

        let ascent = &table.rows[0];
        assert_eq!(ascent.outcome, Outcome::Win);
        assert_eq!(ascent.start, Some(Side::Attack));
        assert_eq!(ascent.first_half_wr, Some(0.58));
        assert_eq!(ascent.first_pistol, Some(1));
        assert_eq!(ascent.atk_post_plant, Some(0.75));
        assert_eq!(ascent.atk_second_round, Some(SecondRoundCode::WW));

        let bind = &table.rows[1];
        assert_eq!(bind.outcome, Outcome::Loss);
        assert_eq!(bind.start, Some(Side::Defense));
        assert_eq!(bind.first_half_wr, None);
        assert_eq!(bind.atk_post_plant, None);
    }

    #[test]
    fn test_read_scores_alias_columns() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "scores.csv",
            "Map,Outcome,Atk_PP_Success,Def_PP_Success\nLotus,Draw,0.6,0.2\n",
        );

        let table = CsvReader::<MatchRoundRecord>::new(path).read_all();

        assert_eq!(table.rows[0].atk_post_plant, Some(0.6));
        assert_eq!(table.rows[0].def_post_plant, Some(0.2));
    }

    #[test]
    fn test_out_of_range_cells_read_as_missing() {
        let reader = CsvReader::<MatchRoundRecord>::new(PathBuf::from("scores.csv"));
        let table = reader
            .read_from(
                "Map,Outcome,Start,First Half WR,Second Half WR,First Pistol,Second Pistol\n\
                 Ascent,Win,Attack,150%,50%,3,2\n\
                 Bind,Loss,Attack,40%,150,4000000000,4000000000\n"
                    .as_bytes(),
            )
            .unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].first_half_wr, None);
        assert_eq!(table.rows[0].first_pistol, None);
        assert_eq!(table.rows[1].second_half_wr, None);
        assert_eq!(table.rows[1].second_pistol, None);
        assert!(crate::calculate::pistol_summary(&table.rows).is_no_data());
    }

    #[test]
    fn test_bad_outcome_row_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "scores.csv",
            "Map,Outcome\nAscent,Win\nBind,forfeit\nSplit,Loss\n",
        );

        let table = CsvReader::<MatchRoundRecord>::new(path).read_all();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.diagnostics.len(), 1);
        match &table.diagnostics[0] {
            Diagnostic::MalformedRow { line, reason, .. } => {
                assert_eq!(*line, 3);
                assert!(reason.contains("forfeit"));
            }
            other => panic!("unexpected diagnostic {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let table = CsvReader::<MatchRoundRecord>::new(tmp.path().join("absent.csv")).read_all();

        assert!(table.is_empty());
        assert!(matches!(
            table.diagnostics.as_slice(),
            [Diagnostic::MissingInput { .. }]
        ));
    }

    #[test]
    fn test_missing_required_columns() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "scores.csv", "Date,Map\n2025-03-01,Ascent\n");

        let table = CsvReader::<MatchRoundRecord>::new(path).read_all();

        assert!(table.is_empty());
        match &table.diagnostics[0] {
            Diagnostic::MissingColumns { columns, .. } => {
                assert_eq!(columns, &vec!["Outcome".to_string()])
            }
            other => panic!("unexpected diagnostic {:?}", other),
        }
    }

    #[test]
    fn test_empty_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "form.csv", "");

        let table = CsvReader::<PlayerAgentRecord>::new(path).read_all();

        assert!(table.is_empty());
        assert!(matches!(
            table.diagnostics.as_slice(),
            [Diagnostic::EmptyInput { .. }]
        ));
    }

    #[test]
    fn test_read_form_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "form.csv",
            "Column 1,Date,Player,Agent,Result,Rounds,Kills,Deaths,Assists,ACS,FK,FD,FD Def,Plants,Multi-Kills,FBSR,FKPR,KPR,Atk Entry,Anchor_Time\n\
             Ascent,2025-03-01,alpha,Jett,Win,24,20,15,4,250,5,3,1,2,3,60%,0.2,0.83,0.5,\n\
             ,,,,,,,,,,,,,,,,,,,\n\
             Ascent,2025-03-01,beta,Omen,Win,24,12,14,9,180,1,2,2,0,1,,,,,45\n",
        );

        let table = CsvReader::<PlayerAgentRecord>::new(path).read_all();

        assert!(table.diagnostics.is_empty());
        assert_eq!(table.rows.len(), 2);

        let jett = &table.rows[0];
        assert_eq!(jett.player.as_deref(), Some("alpha"));
        assert_eq!(jett.result, Some(Outcome::Win));
        assert_eq!(jett.kills, Some(20.0));
        assert_eq!(jett.multi_kills, Some(3.0));
        assert_eq!(jett.fbsr, Some(0.6));
        assert_eq!(jett.atk_entry, Some(0.5));
        assert_eq!(jett.anchor_time, None);

        assert_eq!(table.rows[1].anchor_time, Some(45.0));
    }

    #[test]
    fn test_read_form_without_result_keeps_row() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "form.csv", "Column 1,Agent,Result\nBind,Sova,??\n");

        let table = CsvReader::<PlayerAgentRecord>::new(path).read_all();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].result, None);
    }

    #[test]
    fn test_read_acs_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(
            tmp.path(),
            "foracs.csv",
            "Date,Player,Agent,Map,Result,ACS\n03/02/2025,alpha,Raze,Split, win ,301\n,beta,,Split,Loss,150\n",
        );

        let table = CsvReader::<AgentResultRecord>::new(path).read_all();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.diagnostics.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2025, 3, 2));
        assert_eq!(row.result, Some(Outcome::Win));
        assert_eq!(row.acs, Some(301.0));
        assert_eq!(row.map.as_deref(), Some("Split"));
    }
}
