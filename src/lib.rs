//! Matchup win probabilities from team efficiency stats and an offline-fit
//! logistic model.
//!
//! - [`model`]: artifact loading, feature construction, standardized scoring
//! - [`stats`]: team summary CSV loading
//! - [`adjust`]: optional post-hoc nudges (home court, experience, upsets)
//! - [`report`]: text/JSON rendering of one matchup run

pub mod adjust;
pub mod model;
pub mod report;
pub mod stats;
