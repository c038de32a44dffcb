use tracing::debug;

use super::ProbPair;
use crate::model::{StatKey, TeamStats};

/// Roster experience gap (years) that earns a bonus.
pub const EXPERIENCE_THRESHOLD: f64 = 1.0;
/// Probability added to the more experienced side before renormalizing.
pub const EXPERIENCE_BONUS: f64 = 0.02;

/// Favour the clearly more experienced roster.
///
/// A gap below the threshold returns the pair untouched; otherwise the
/// bonus goes to the older team and the pair is renormalized.
pub fn apply_experience_bonus(
    team_a: &TeamStats,
    team_b: &TeamStats,
    probs: ProbPair,
) -> ProbPair {
    let exp_a = team_a.get(StatKey::Experience);
    let exp_b = team_b.get(StatKey::Experience);
    if (exp_a - exp_b).abs() < EXPERIENCE_THRESHOLD {
        return probs;
    }

    debug!(
        "Experience bonus: {:.2} vs {:.2} years, +{} to team {}",
        exp_a,
        exp_b,
        EXPERIENCE_BONUS,
        if exp_a > exp_b { "A" } else { "B" }
    );
    let bumped = if exp_a > exp_b {
        ProbPair::new(probs.a + EXPERIENCE_BONUS, probs.b)
    } else {
        ProbPair::new(probs.a, probs.b + EXPERIENCE_BONUS)
    };
    bumped.normalized()
}
