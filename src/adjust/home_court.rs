use tracing::debug;

use crate::model::{Location, StatKey, TeamStats};

/// Efficiency swing for the home side, about 1.4%.
pub const HOME_COURT_ADV: f64 = 0.014;

/// Scale both teams' offensive and defensive efficiencies for venue.
///
/// The home side scores a little more and allows a little less; the road
/// side the reverse. Neutral sites (all tournament games) are untouched.
/// Returns adjusted copies and leaves the inputs alone.
pub fn apply_home_court(
    team_a: &TeamStats,
    team_b: &TeamStats,
    location: Location,
) -> (TeamStats, TeamStats) {
    let (a_boost, b_boost) = match location {
        Location::Home => (HOME_COURT_ADV, -HOME_COURT_ADV),
        Location::Away => (-HOME_COURT_ADV, HOME_COURT_ADV),
        Location::Neutral => return (team_a.clone(), team_b.clone()),
    };
    debug!("Home-court efficiency nudge for location={}", location);
    (nudge(team_a, a_boost), nudge(team_b, b_boost))
}

fn nudge(team: &TeamStats, boost: f64) -> TeamStats {
    let mut out = team.clone();
    out.set(StatKey::AdjO, team.get(StatKey::AdjO) * (1.0 + boost));
    out.set(StatKey::AdjD, team.get(StatKey::AdjD) * (1.0 - boost));
    out
}
