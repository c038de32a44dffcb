//! Team-summary CSV loader.
//!
//! Reads a KenPom-style season summary (one row per team) into per-team stat
//! lines. Column names drift between exports, so each stat lists the aliases
//! it may appear under; the first present, non-empty, numeric one wins.
//!
//! Percentage columns are normalized to fractions: a trailing `%` always
//! means percent, and a bare number above 1.5 is assumed to be a percent
//! (52.3 → 0.523). Values between 1.0 and 1.5 are ambiguous under this rule
//! and are kept as-is. This policy lives here, never in the model.

use csv::StringRecord;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{StatsError, TeamTable};
use crate::model::{StatKey, TeamStats};

const TEAM_COLUMNS: [&str; 4] = ["Team", "School", "TeamName", "team"];
const PERCENT_CUTOFF: f64 = 1.5;

struct StatColumn {
    key: StatKey,
    aliases: &'static [&'static str],
    percent: bool,
}

const fn raw(key: StatKey, aliases: &'static [&'static str]) -> StatColumn {
    StatColumn {
        key,
        aliases,
        percent: false,
    }
}

const fn pct(key: StatKey, aliases: &'static [&'static str]) -> StatColumn {
    StatColumn {
        key,
        aliases,
        percent: true,
    }
}

const STAT_COLUMNS: &[StatColumn] = &[
    raw(StatKey::AdjO, &["AdjO", "AdjOE", "Adj. Off"]),
    raw(StatKey::AdjD, &["AdjD", "AdjDE", "Adj. Def"]),
    raw(StatKey::Tempo, &["AdjT", "Tempo", "Adj. Tempo"]),
    pct(StatKey::EfgOff, &["eFG_O", "eFG%_O", "eFG Off"]),
    pct(StatKey::EfgDef, &["eFG_D", "eFG%_D", "eFG Def"]),
    pct(StatKey::ThreePOff, &["3P_O", "3P%_O", "3P Off"]),
    pct(StatKey::ThreePDef, &["3P_D", "3P%_D", "3P Def"]),
    pct(StatKey::TwoPOff, &["2P_O", "2P%_O", "2P Off"]),
    pct(StatKey::TwoPDef, &["2P_D", "2P%_D", "2P Def"]),
    pct(StatKey::FtOff, &["FT%_O", "FT_O", "FT Off"]),
    pct(StatKey::FtDef, &["FT%_D", "FT_D", "FT Def"]),
    pct(StatKey::OrOff, &["ORB", "OR%_O", "OR Off"]),
    pct(StatKey::DrDef, &["DRB", "DR%_D", "DR Def"]),
    pct(StatKey::TovOff, &["TOV_O", "TOV%_O", "TO%_O"]),
    pct(StatKey::TovDef, &["TOV_D", "TOV%_D", "TO%_D"]),
    pct(StatKey::FtrOff, &["FTR_O", "FTR Off"]),
    pct(StatKey::ThreePaOff, &["3PA_O", "3PA%_O", "3PA Off"]),
    pct(StatKey::ThreePaDef, &["3PA_D", "3PA%_D", "3PA Def"]),
    pct(StatKey::AstOff, &["A%_O", "AST_O", "Ast Off"]),
    pct(StatKey::BlkDef, &["Blk%_D", "BLK_D", "Blk Def"]),
    pct(StatKey::StlDef, &["Stl%_D", "STL_D", "Stl Def"]),
    raw(StatKey::Experience, &["Exp", "Experience"]),
    raw(StatKey::Seed, &["Seed"]),
];

/// Free-throw-rate columns that stand in for FT% when an export lacks it.
const FT_FALLBACKS: [(StatKey, &[&str]); 2] = [
    (StatKey::FtOff, &["FTR_O", "FTR Off"]),
    (StatKey::FtDef, &["FTR_D", "FTR Def"]),
];

/// Load the team table from a CSV file on disk.
pub fn load_team_stats(path: &Path) -> Result<TeamTable, StatsError> {
    let file = File::open(path).map_err(|source| StatsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let table = parse_team_stats(file, &path.display().to_string())?;
    info!("Loaded {} teams from {}", table.len(), path.display());
    Ok(table)
}

/// Parse a team-summary CSV from any reader. `origin` names the source in
/// errors and logs.
pub fn parse_team_stats<R: Read>(reader: R, origin: &str) -> Result<TeamTable, StatsError> {
    let csv_err = |source: csv::Error| StatsError::Csv {
        path: origin.to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();

    let team_idx = TEAM_COLUMNS
        .iter()
        .find_map(|c| headers.iter().position(|h| h == *c))
        .ok_or_else(|| StatsError::MissingTeamColumn {
            path: origin.to_string(),
        })?;

    let claimed: HashSet<&str> = STAT_COLUMNS
        .iter()
        .flat_map(|c| c.aliases.iter().copied())
        .chain(FT_FALLBACKS.iter().flat_map(|(_, a)| a.iter().copied()))
        .collect();

    let mut table = TeamTable::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let name = record.get(team_idx).unwrap_or("").trim();
        if name.is_empty() {
            warn!("{}: row {} has no team name, skipped", origin, row + 2);
            continue;
        }

        let mut stats = TeamStats::new();
        for col in STAT_COLUMNS {
            if let Some(v) = pick(&headers, &record, col.aliases, col.percent) {
                stats.set(col.key, v);
            }
        }
        for (key, aliases) in FT_FALLBACKS {
            if !stats.contains(key) {
                if let Some(v) = pick(&headers, &record, aliases, true) {
                    debug!("{}: using free-throw rate for {} ({})", name, key, v);
                    stats.set(key, v);
                }
            }
        }

        // Unrecognized numeric columns ride along for newer artifacts.
        // Typed stats only come through their aliases above.
        for (i, (header, value)) in headers.iter().zip(record.iter()).enumerate() {
            let typed = header.parse::<StatKey>().is_ok();
            if i == team_idx || claimed.contains(header) || typed {
                continue;
            }
            if let Some(v) = parse_finite(value) {
                stats.insert_named(header, v);
            }
        }

        table.insert(name, stats);
    }
    Ok(table)
}

fn cell<'r>(headers: &StringRecord, record: &'r StringRecord, column: &str) -> Option<&'r str> {
    headers
        .iter()
        .position(|h| h == column)
        .and_then(|i| record.get(i))
        .filter(|v| !v.is_empty())
}

fn pick(
    headers: &StringRecord,
    record: &StringRecord,
    aliases: &[&str],
    percent: bool,
) -> Option<f64> {
    aliases.iter().find_map(|alias| {
        let value = cell(headers, record, alias)?;
        let parsed = if percent {
            percent_to_fraction(value)
        } else {
            parse_finite(value)
        };
        if parsed.is_none() {
            debug!("Ignoring non-numeric value '{}' in column {}", value, alias);
        }
        parsed
    })
}

/// "52.3%" → 0.523, "52.3" → 0.523, "0.523" → 0.523.
pub fn percent_to_fraction(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if let Some(stripped) = cell.strip_suffix('%') {
        return parse_finite(stripped.trim()).map(|v| v / 100.0);
    }
    let v = parse_finite(cell)?;
    Some(if v > PERCENT_CUTOFF { v / 100.0 } else { v })
}

/// `NaN` and `inf` parse as floats but count as missing here.
fn parse_finite(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}
