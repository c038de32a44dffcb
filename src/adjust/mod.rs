//! Post-hoc nudges applied around the model.
//!
//! None of these touch the feature builder or the scorer. `home_court`
//! adjusts team efficiencies before prediction; the others take the model's
//! probability pair and return a new one that still sums to 1.

pub mod experience;
pub mod home_court;
pub mod upset;

pub use experience::apply_experience_bonus;
pub use home_court::apply_home_court;
pub use upset::{adjust_for_upset_trends, TournamentRound};

use serde::Serialize;

/// Win probabilities for team A and team B.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbPair {
    pub a: f64,
    pub b: f64,
}

impl ProbPair {
    pub fn new(a: f64, b: f64) -> Self {
        ProbPair { a, b }
    }

    /// Rescale so `a + b == 1`. A degenerate pair becomes a coin flip.
    pub fn normalized(self) -> Self {
        let total = self.a + self.b;
        if total <= 0.0 || !total.is_finite() {
            return ProbPair::new(0.5, 0.5);
        }
        ProbPair::new(self.a / total, self.b / total)
    }
}
