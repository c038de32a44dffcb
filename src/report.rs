use serde::Serialize;
use std::fmt;

use crate::adjust::ProbPair;
use crate::model::features::FeatureKey;
use crate::model::Prediction;

/// Diffs worth showing next to the headline probability.
const KEY_DIFFS: [FeatureKey; 5] = [
    FeatureKey::OffRatingDiff,
    FeatureKey::DefRatingDiff,
    FeatureKey::HomeAdvantage,
    FeatureKey::OffOrDiff,
    FeatureKey::OffEfgDiff,
];

/// Everything one matchup run produced, ready for printing or JSON.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub team_a: String,
    pub team_b: String,
    pub model: Prediction,
    /// Probabilities after the enabled adjustors; equal to the model's when
    /// none fired.
    pub adjusted: ProbPair,
    pub adjustments: Vec<&'static str>,
}

impl Report {
    pub fn new(team_a: &str, team_b: &str, model: Prediction) -> Self {
        let adjusted = ProbPair::new(model.prob_a, model.prob_b);
        Report {
            team_a: team_a.to_string(),
            team_b: team_b.to_string(),
            model,
            adjusted,
            adjustments: Vec::new(),
        }
    }

    /// Record an adjustor's output, noting its name if it moved anything.
    pub fn apply(&mut self, name: &'static str, probs: ProbPair) {
        if probs != self.adjusted {
            self.adjustments.push(name);
        }
        self.adjusted = probs;
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Logistic model probability ({}): {} {:.3}  |  {} {:.3}",
            self.model.location, self.team_a, self.model.prob_a, self.team_b, self.model.prob_b
        )?;
        if !self.adjustments.is_empty() {
            writeln!(
                f,
                "Adjusted ({}): {} {:.3}  |  {} {:.3}",
                self.adjustments.join(", "),
                self.team_a,
                self.adjusted.a,
                self.team_b,
                self.adjusted.b
            )?;
        }
        writeln!(f, "Key diffs:")?;
        for key in KEY_DIFFS {
            writeln!(f, "  {}: {:.4}", key.as_str(), self.model.features.get(key))?;
        }
        if !self.model.unmatched.is_empty() {
            writeln!(f, "Zero-filled model features: {}", self.model.unmatched.join(", "))?;
        }
        Ok(())
    }
}
