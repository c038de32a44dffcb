pub mod loader;

pub use loader::{load_team_stats, parse_team_stats};

use std::collections::HashMap;
use thiserror::Error;

use crate::model::TeamStats;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Cannot read team stats {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed team stats CSV {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("No team name column in {path} (expected one of Team, School, TeamName, team)")]
    MissingTeamColumn { path: String },

    #[error("Team '{name}' not found in team stats")]
    UnknownTeam { name: String },

    #[error("Team '{name}' is ambiguous, matches {}", .matches.join(", "))]
    AmbiguousTeam { name: String, matches: Vec<String> },
}

/// Stat lines for every team in one season summary, keyed by team name.
#[derive(Debug, Clone, Default)]
pub struct TeamTable {
    teams: HashMap<String, TeamStats>,
}

impl TeamTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, stats: TeamStats) {
        self.teams.insert(name.into(), stats);
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Exact name match first, then a case-insensitive scan that must hit
    /// exactly one team.
    pub fn find(&self, name: &str) -> Result<&TeamStats, StatsError> {
        let name = name.trim();
        if let Some(stats) = self.teams.get(name) {
            return Ok(stats);
        }
        let mut hits: Vec<(&String, &TeamStats)> = self
            .teams
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .collect();
        match hits.len() {
            0 => Err(StatsError::UnknownTeam {
                name: name.to_string(),
            }),
            1 => Ok(hits[0].1),
            _ => {
                hits.sort_by(|x, y| x.0.cmp(y.0));
                Err(StatsError::AmbiguousTeam {
                    name: name.to_string(),
                    matches: hits.into_iter().map(|(k, _)| k.clone()).collect(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatKey;

    fn table() -> TeamTable {
        let mut t = TeamTable::new();
        t.insert("Saint Mary's", TeamStats::new().with(StatKey::AdjO, 112.0));
        t.insert("Houston", TeamStats::new().with(StatKey::AdjO, 119.0));
        t
    }

    #[test]
    fn find_exact_and_case_insensitive() {
        let t = table();
        assert_eq!(t.len(), 2);
        assert_eq!(t.find("Houston").unwrap().get(StatKey::AdjO), 119.0);
        assert_eq!(t.find(" saint mary's ").unwrap().get(StatKey::AdjO), 112.0);
    }

    #[test]
    fn unknown_team_is_an_error() {
        match table().find("Gonzaga") {
            Err(StatsError::UnknownTeam { name }) => assert_eq!(name, "Gonzaga"),
            other => panic!("Expected UnknownTeam, got {:?}", other),
        }
    }

    #[test]
    fn names_differing_only_by_case_are_ambiguous() {
        let mut t = table();
        t.insert("SAINT MARY'S", TeamStats::new().with(StatKey::AdjO, 99.0));
        assert_eq!(t.find("Saint Mary's").unwrap().get(StatKey::AdjO), 112.0);
        assert_eq!(t.find("SAINT MARY'S").unwrap().get(StatKey::AdjO), 99.0);
        match t.find("saint mary's") {
            Err(StatsError::AmbiguousTeam { name, matches }) => {
                assert_eq!(name, "saint mary's");
                assert_eq!(matches, vec!["SAINT MARY'S", "Saint Mary's"]);
            }
            other => panic!("Expected AmbiguousTeam, got {:?}", other),
        }
    }
}
