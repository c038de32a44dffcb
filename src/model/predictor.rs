use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use super::artifacts::{load_artifacts, ArtifactBundle};
use super::error::ModelError;
use super::features::{build_features, DerivedFeatures, Location, TeamStats};
use super::scorer::{linear_score, sigmoid};

/// Result of one matchup prediction.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Probability that team A (first argument) wins.
    pub prob_a: f64,
    /// Always exactly `1.0 - prob_a`.
    pub prob_b: f64,
    /// Linear score before the logistic link.
    pub logit: f64,
    pub location: &'static str,
    pub features: DerivedFeatures,
    /// Model features the builder could not derive (filled with 0.0).
    pub unmatched: Vec<String>,
    pub predicted_at: DateTime<Utc>,
}

/// Logistic win-probability model backed by a loaded artifact bundle.
///
/// Holds no mutable state, so one instance can serve any number of
/// predictions, including from several threads at once.
#[derive(Debug, Clone)]
pub struct Predictor {
    bundle: ArtifactBundle,
}

impl Predictor {
    pub fn new(bundle: ArtifactBundle) -> Self {
        Predictor { bundle }
    }

    /// Load the artifact bundle from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, ModelError> {
        load_artifacts(dir).map(Predictor::new)
    }

    pub fn bundle(&self) -> &ArtifactBundle {
        &self.bundle
    }

    /// Estimate P(A beats B) with A playing at `location`.
    pub fn predict(
        &self,
        team_a: &TeamStats,
        team_b: &TeamStats,
        location: Location,
    ) -> Result<Prediction, ModelError> {
        let b = &self.bundle;
        let projection = build_features(team_a, team_b, location, &b.feature_names);
        if !projection.unmatched.is_empty() {
            debug!(
                "{} model feature(s) zero-filled: {:?}",
                projection.unmatched.len(),
                projection.unmatched
            );
        }

        let logit = linear_score(
            &projection.vector,
            &b.mean_vec,
            &b.scale_vec,
            &b.coef_vec,
            b.intercept,
        )?;
        let prob_a = sigmoid(logit);

        Ok(Prediction {
            prob_a,
            prob_b: 1.0 - prob_a,
            logit,
            location: location.as_str(),
            features: projection.named,
            unmatched: projection.unmatched,
            predicted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::artifacts::ParamTable;
    use crate::model::features::{FeatureKey, StatKey};
    use approx::assert_relative_eq;

    fn table(entries: &[(&str, f64)]) -> ParamTable {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn predictor(
        names: &[&str],
        intercept: f64,
        coefs: &[(&str, f64)],
        means: &[(&str, f64)],
        scales: &[(&str, f64)],
    ) -> Predictor {
        Predictor::new(ArtifactBundle::from_tables(
            names.iter().map(|s| s.to_string()).collect(),
            intercept,
            &table(coefs),
            &table(means),
            &table(scales),
        ))
    }

    /// A realistic-looking model touching most of the catalogue.
    fn full_model() -> Predictor {
        model_with_coefs(|i, _| 0.15 * ((i % 5) as f64 - 2.0) + 0.05)
    }

    /// Same weights as `full_model`, minus the home × diff interactions.
    fn no_interaction_model() -> Predictor {
        model_with_coefs(|i, key| match key {
            FeatureKey::HomeXOffRat | FeatureKey::HomeXDefRat => 0.0,
            _ => 0.15 * ((i % 5) as f64 - 2.0) + 0.05,
        })
    }

    fn model_with_coefs(coef: impl Fn(usize, FeatureKey) -> f64) -> Predictor {
        let names: Vec<&str> = FeatureKey::ALL.iter().map(|k| k.as_str()).collect();
        let coefs: Vec<(&str, f64)> = FeatureKey::ALL
            .iter()
            .enumerate()
            .map(|(i, k)| (k.as_str(), coef(i, *k)))
            .collect();
        let scales: Vec<(&str, f64)> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (*n, 1.0 + i as f64 * 0.3))
            .collect();
        // Mean-centred at zero so the antisymmetry of the diffs carries
        // straight through standardization.
        predictor(&names, 0.0, &coefs, &[], &scales)
    }

    fn duke() -> TeamStats {
        TeamStats::new()
            .with(StatKey::AdjO, 121.3)
            .with(StatKey::AdjD, 89.9)
            .with(StatKey::Tempo, 66.2)
            .with(StatKey::EfgOff, 0.571)
            .with(StatKey::EfgDef, 0.452)
            .with(StatKey::TovOff, 0.148)
            .with(StatKey::TovDef, 0.187)
            .with(StatKey::OrOff, 0.351)
    }

    fn mercer() -> TeamStats {
        TeamStats::new()
            .with(StatKey::AdjO, 103.8)
            .with(StatKey::AdjD, 107.5)
            .with(StatKey::Tempo, 69.0)
            .with(StatKey::EfgOff, 0.498)
            .with(StatKey::EfgDef, 0.521)
            .with(StatKey::TovOff, 0.191)
    }

    #[test]
    fn worked_example() {
        let p = predictor(
            &["home_advantage", "OffRating_diff"],
            0.0,
            &[("home_advantage", 1.0), ("OffRating_diff", 0.0)],
            &[("home_advantage", 0.0), ("OffRating_diff", 0.0)],
            &[("home_advantage", 1.0), ("OffRating_diff", 1.0)],
        );
        let a = TeamStats::new().with(StatKey::AdjO, 110.0);
        let b = TeamStats::new().with(StatKey::AdjO, 100.0);

        let pred = p.predict(&a, &b, Location::parse("home")).unwrap();
        assert_eq!(pred.features.get(FeatureKey::HomeAdvantage), 1.0);
        assert_relative_eq!(pred.features.get(FeatureKey::OffRatingDiff), 10.0, epsilon = 1e-12);
        assert_relative_eq!(pred.logit, 1.0, epsilon = 1e-12);
        assert_relative_eq!(pred.prob_a, 0.731_058_578_6, epsilon = 1e-9);
        assert_eq!(pred.location, "home");
    }

    #[test]
    fn probabilities_sum_to_one() {
        let p = full_model();
        for loc in [Location::Home, Location::Away, Location::Neutral] {
            let pred = p.predict(&duke(), &mercer(), loc).unwrap();
            assert_relative_eq!(pred.prob_a + pred.prob_b, 1.0, epsilon = 1e-15);
            assert!(pred.prob_a > 0.0 && pred.prob_a < 1.0);
        }
    }

    #[test]
    fn swapping_teams_at_a_neutral_site_mirrors_probabilities() {
        let p = full_model();
        let fwd = p.predict(&duke(), &mercer(), Location::Neutral).unwrap();
        let rev = p.predict(&mercer(), &duke(), Location::Neutral).unwrap();
        assert_relative_eq!(rev.prob_a, fwd.prob_b, epsilon = 1e-9);
        assert_relative_eq!(rev.prob_b, fwd.prob_a, epsilon = 1e-9);
    }

    #[test]
    fn swapping_teams_and_venue_mirrors_probabilities_without_interactions() {
        let p = no_interaction_model();
        for loc in [Location::Home, Location::Away, Location::Neutral] {
            let fwd = p.predict(&duke(), &mercer(), loc).unwrap();
            let rev = p.predict(&mercer(), &duke(), loc.flipped()).unwrap();
            assert_relative_eq!(rev.prob_a, fwd.prob_b, epsilon = 1e-9);
            assert_relative_eq!(rev.prob_b, fwd.prob_a, epsilon = 1e-9);
        }
    }

    #[test]
    fn interaction_terms_break_the_home_mirror() {
        let p = full_model();
        let fwd = p.predict(&duke(), &mercer(), Location::Home).unwrap();
        let rev = p.predict(&mercer(), &duke(), Location::Away).unwrap();
        assert!((rev.prob_a - fwd.prob_b).abs() > 1e-6);
    }

    #[test]
    fn location_spelling_does_not_matter() {
        let p = full_model();
        let base = p.predict(&duke(), &mercer(), Location::parse("home")).unwrap();
        for s in ["HOME", "Home", " home"] {
            let pred = p.predict(&duke(), &mercer(), Location::parse(s)).unwrap();
            assert_eq!(pred.prob_a, base.prob_a);
        }
    }

    #[test]
    fn unrecognized_location_matches_neutral() {
        let p = full_model();
        let neutral = p.predict(&duke(), &mercer(), Location::parse("neutral")).unwrap();
        let blank = p.predict(&duke(), &mercer(), Location::parse("")).unwrap();
        assert_eq!(blank.prob_a, neutral.prob_a);
        assert_eq!(blank.features, neutral.features);
    }

    #[test]
    fn unmatched_feature_uses_raw_zero_before_standardization() {
        // "Luck_diff" is not derivable: raw 0.0 standardizes to (0 - 2) / 4.
        let p = predictor(
            &["Luck_diff"],
            0.0,
            &[("Luck_diff", 1.0)],
            &[("Luck_diff", 2.0)],
            &[("Luck_diff", 4.0)],
        );
        let pred = p.predict(&duke(), &mercer(), Location::Neutral).unwrap();
        assert_eq!(pred.unmatched, vec!["Luck_diff".to_string()]);
        assert_relative_eq!(pred.logit, -0.5, epsilon = 1e-12);
        assert_relative_eq!(pred.prob_a, sigmoid(-0.5), epsilon = 1e-12);
    }

    #[test]
    fn zero_scale_feature_is_ignored_end_to_end() {
        let p = predictor(
            &["OffRating_diff", "Poss_diff"],
            0.1,
            &[("OffRating_diff", 0.05), ("Poss_diff", 3.0)],
            &[("Poss_diff", 1.0)],
            &[("OffRating_diff", 10.0), ("Poss_diff", 0.0)],
        );
        let base = p.predict(&duke(), &mercer(), Location::Neutral).unwrap();
        for tempo in [40.0, 66.2, 90.0] {
            let a = duke().with(StatKey::Tempo, tempo);
            let pred = p.predict(&a, &mercer(), Location::Neutral).unwrap();
            assert_eq!(pred.prob_a, base.prob_a);
        }
    }

    #[test]
    fn better_team_is_favoured() {
        let p = predictor(
            &["OffRating_diff", "DefRating_diff"],
            0.0,
            &[("OffRating_diff", 0.9), ("DefRating_diff", -0.9)],
            &[],
            &[("OffRating_diff", 8.0), ("DefRating_diff", 8.0)],
        );
        let pred = p.predict(&duke(), &mercer(), Location::Neutral).unwrap();
        assert!(pred.prob_a > 0.9, "got {:.4}", pred.prob_a);
    }

    #[test]
    fn predictor_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Predictor>();
    }
}
