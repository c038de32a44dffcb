//! Seed-based upset priors for tournament games.
//!
//! Some first-weekend seed pairings upset far more often than efficiency
//! margins suggest. When a matchup has a historical underdog win rate, the
//! underdog's probability is raised to at least that rate.

use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::ProbPair;
use crate::model::{StatKey, TeamStats};

/// (underdog seed, favourite seed) → historical underdog win rate.
const HISTORICAL_UPSETS: [((u32, u32), f64); 3] = [
    ((12, 5), 0.35),
    ((11, 6), 0.40),
    ((10, 7), 0.39),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentRound {
    Round1,
    Round2,
    Sweet16,
    Elite8,
    Final4,
    Championship,
}

impl TournamentRound {
    pub fn as_str(self) -> &'static str {
        match self {
            TournamentRound::Round1 => "round1",
            TournamentRound::Round2 => "round2",
            TournamentRound::Sweet16 => "sweet16",
            TournamentRound::Elite8 => "elite8",
            TournamentRound::Final4 => "final4",
            TournamentRound::Championship => "championship",
        }
    }
}

impl FromStr for TournamentRound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "round1" => Ok(TournamentRound::Round1),
            "round2" => Ok(TournamentRound::Round2),
            "sweet16" => Ok(TournamentRound::Sweet16),
            "elite8" => Ok(TournamentRound::Elite8),
            "final4" => Ok(TournamentRound::Final4),
            "championship" => Ok(TournamentRound::Championship),
            other => Err(format!("not a tournament round: '{}'", other)),
        }
    }
}

impl fmt::Display for TournamentRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn seed(team: &TeamStats) -> u32 {
    let s = team.get(StatKey::Seed);
    if s.is_finite() && s > 0.0 {
        s.round() as u32
    } else {
        0
    }
}

fn upset_rate(underdog: u32, favourite: u32) -> Option<f64> {
    HISTORICAL_UPSETS
        .iter()
        .find(|(m, _)| *m == (underdog, favourite))
        .map(|(_, rate)| *rate)
}

/// Apply the historical upset floor for tournament games.
///
/// Outside a tournament round, or when either seed is unknown (0), the pair
/// is returned unchanged. The higher seed number is the underdog.
pub fn adjust_for_upset_trends(
    team_a: &TeamStats,
    team_b: &TeamStats,
    probs: ProbPair,
    round: Option<TournamentRound>,
) -> ProbPair {
    let Some(round) = round else {
        return probs;
    };
    let (seed_a, seed_b) = (seed(team_a), seed(team_b));
    if seed_a == 0 || seed_b == 0 {
        return probs;
    }

    let a_is_underdog = seed_a > seed_b;
    let (underdog, favourite) = if a_is_underdog {
        (seed_a, seed_b)
    } else {
        (seed_b, seed_a)
    };
    let Some(rate) = upset_rate(underdog, favourite) else {
        return probs;
    };

    let current = if a_is_underdog { probs.a } else { probs.b };
    let underdog_p = current.max(rate);
    debug!(
        "{}: {}-seed over {}-seed floor {:.2}, underdog {:.3} -> {:.3}",
        round, underdog, favourite, rate, current, underdog_p
    );
    if a_is_underdog {
        ProbPair::new(underdog_p, 1.0 - underdog_p)
    } else {
        ProbPair::new(1.0 - underdog_p, underdog_p)
    }
}
