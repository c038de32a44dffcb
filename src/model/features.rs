//! Matchup feature construction.
//!
//! Two team stat lines plus a game location become a named set of derived
//! features (all differences are team A minus team B, so positive favours A),
//! which is then projected onto the artifact's canonical feature order.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

// ── Team stat vocabulary ─────────────────────────────────────────────────────

/// Known per-team stat keys, named as the stat loader emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatKey {
    AdjO,
    AdjD,
    Tempo,
    EfgOff,
    EfgDef,
    ThreePOff,
    ThreePDef,
    TwoPOff,
    TwoPDef,
    FtOff,
    FtDef,
    ThreePaOff,
    ThreePaDef,
    TovOff,
    TovDef,
    FtrOff,
    AstOff,
    OrOff,
    DrDef,
    BlkDef,
    StlDef,
    Experience,
    Seed,
}

impl StatKey {
    pub const ALL: [StatKey; 23] = [
        StatKey::AdjO,
        StatKey::AdjD,
        StatKey::Tempo,
        StatKey::EfgOff,
        StatKey::EfgDef,
        StatKey::ThreePOff,
        StatKey::ThreePDef,
        StatKey::TwoPOff,
        StatKey::TwoPDef,
        StatKey::FtOff,
        StatKey::FtDef,
        StatKey::ThreePaOff,
        StatKey::ThreePaDef,
        StatKey::TovOff,
        StatKey::TovDef,
        StatKey::FtrOff,
        StatKey::AstOff,
        StatKey::OrOff,
        StatKey::DrDef,
        StatKey::BlkDef,
        StatKey::StlDef,
        StatKey::Experience,
        StatKey::Seed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatKey::AdjO => "AdjO",
            StatKey::AdjD => "AdjD",
            StatKey::Tempo => "Tempo",
            StatKey::EfgOff => "eFG_off",
            StatKey::EfgDef => "eFG_def",
            StatKey::ThreePOff => "ThreeP_off",
            StatKey::ThreePDef => "ThreeP_def",
            StatKey::TwoPOff => "TwoP_off",
            StatKey::TwoPDef => "TwoP_def",
            StatKey::FtOff => "FT_off",
            StatKey::FtDef => "FT_def",
            StatKey::ThreePaOff => "ThreePA_off",
            StatKey::ThreePaDef => "ThreePA_def",
            StatKey::TovOff => "TOV_off",
            StatKey::TovDef => "TOV_def",
            StatKey::FtrOff => "FTR_off",
            StatKey::AstOff => "AST_off",
            StatKey::OrOff => "OR_off",
            StatKey::DrDef => "DR_def",
            StatKey::BlkDef => "BLK_def",
            StatKey::StlDef => "STL_def",
            StatKey::Experience => "Experience",
            StatKey::Seed => "Seed",
        }
    }
}

impl FromStr for StatKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One team's stat line.
///
/// Known keys are typed; anything else the loader produced is kept in
/// `extra` so newer artifact versions can still find it by name. Reading a
/// stat that was never set yields 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStats {
    known: HashMap<StatKey, f64>,
    extra: HashMap<String, f64>,
}

impl TeamStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: StatKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: StatKey, value: f64) {
        self.known.insert(key, value);
    }

    /// Insert by name, routing known names to their typed slot.
    pub fn insert_named(&mut self, name: &str, value: f64) {
        match name.parse::<StatKey>() {
            Ok(key) => self.set(key, value),
            Err(()) => {
                self.extra.insert(name.to_string(), value);
            }
        }
    }

    pub fn get(&self, key: StatKey) -> f64 {
        self.known.get(&key).copied().unwrap_or(0.0)
    }

    pub fn get_named(&self, name: &str) -> f64 {
        match name.parse::<StatKey>() {
            Ok(key) => self.get(key),
            Err(()) => self.extra.get(name).copied().unwrap_or(0.0),
        }
    }

    pub fn contains(&self, key: StatKey) -> bool {
        self.known.contains_key(&key)
    }
}

// ── Location ─────────────────────────────────────────────────────────────────

/// Where the game is played, from team A's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Home,
    Away,
    Neutral,
}

impl Location {
    /// Case-insensitive; anything other than "home" or "away" is neutral.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "home" => Location::Home,
            "away" => Location::Away,
            _ => Location::Neutral,
        }
    }

    pub fn home_advantage(self) -> f64 {
        match self {
            Location::Home => 1.0,
            Location::Away => -1.0,
            Location::Neutral => 0.0,
        }
    }

    /// The same venue seen from the other team's bench.
    pub fn flipped(self) -> Self {
        match self {
            Location::Home => Location::Away,
            Location::Away => Location::Home,
            Location::Neutral => Location::Neutral,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Location::Home => "home",
            Location::Away => "away",
            Location::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Derived features ─────────────────────────────────────────────────────────

/// Matchup features the builder knows how to derive, named as the model
/// exporter names its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    HomeAdvantage,
    OffRatingDiff,
    DefRatingDiff,
    OffEfgDiff,
    Off3PDiff,
    Off2PDiff,
    OffFtDiff,
    Off3PaDiff,
    OffTovDiff,
    OffFtrDiff,
    OffAstDiff,
    OffOrDiff,
    DefEfgAllowedDiff,
    Def3PAllowedDiff,
    Def2PAllowedDiff,
    DefFtAllowedDiff,
    Def3PaAllowedDiff,
    DefTovDiff,
    DefDrDiff,
    DefBlkDiff,
    DefStlDiff,
    PossDiff,
    HomeXOffRat,
    HomeXDefRat,
}

/// Number of features the builder derives.
pub const FEATURE_COUNT: usize = 24;

impl FeatureKey {
    pub const ALL: [FeatureKey; FEATURE_COUNT] = [
        FeatureKey::HomeAdvantage,
        FeatureKey::OffRatingDiff,
        FeatureKey::DefRatingDiff,
        FeatureKey::OffEfgDiff,
        FeatureKey::Off3PDiff,
        FeatureKey::Off2PDiff,
        FeatureKey::OffFtDiff,
        FeatureKey::Off3PaDiff,
        FeatureKey::OffTovDiff,
        FeatureKey::OffFtrDiff,
        FeatureKey::OffAstDiff,
        FeatureKey::OffOrDiff,
        FeatureKey::DefEfgAllowedDiff,
        FeatureKey::Def3PAllowedDiff,
        FeatureKey::Def2PAllowedDiff,
        FeatureKey::DefFtAllowedDiff,
        FeatureKey::Def3PaAllowedDiff,
        FeatureKey::DefTovDiff,
        FeatureKey::DefDrDiff,
        FeatureKey::DefBlkDiff,
        FeatureKey::DefStlDiff,
        FeatureKey::PossDiff,
        FeatureKey::HomeXOffRat,
        FeatureKey::HomeXDefRat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKey::HomeAdvantage => "home_advantage",
            FeatureKey::OffRatingDiff => "OffRating_diff",
            FeatureKey::DefRatingDiff => "DefRating_diff",
            FeatureKey::OffEfgDiff => "Off_eFG_diff",
            FeatureKey::Off3PDiff => "Off_3P%_diff",
            FeatureKey::Off2PDiff => "Off_2P%_diff",
            FeatureKey::OffFtDiff => "Off_FT%_diff",
            FeatureKey::Off3PaDiff => "Off_3PA%_diff",
            FeatureKey::OffTovDiff => "Off_TOV%_diff",
            FeatureKey::OffFtrDiff => "Off_FTR_diff",
            FeatureKey::OffAstDiff => "Off_A%_diff",
            FeatureKey::OffOrDiff => "Off_OR%_diff",
            FeatureKey::DefEfgAllowedDiff => "Def_eFG_allowed_diff",
            FeatureKey::Def3PAllowedDiff => "Def_3P%_allowed_diff",
            FeatureKey::Def2PAllowedDiff => "Def_2P%_allowed_diff",
            FeatureKey::DefFtAllowedDiff => "Def_FT%_allowed_diff",
            FeatureKey::Def3PaAllowedDiff => "Def_3PA%_allowed_diff",
            FeatureKey::DefTovDiff => "Def_TOV%_diff",
            FeatureKey::DefDrDiff => "Def_DR%_diff",
            FeatureKey::DefBlkDiff => "Def_BLK%_diff",
            FeatureKey::DefStlDiff => "Def_STL%_diff",
            FeatureKey::PossDiff => "Poss_diff",
            FeatureKey::HomeXOffRat => "home_x_offrat",
            FeatureKey::HomeXDefRat => "home_x_defrat",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        FeatureKey::ALL.iter().copied().find(|k| k.as_str() == name)
    }
}

/// Plain A − B stat differences. Ratings come first, tempo last.
const STAT_DIFFS: [(FeatureKey, StatKey); 21] = [
    (FeatureKey::OffRatingDiff, StatKey::AdjO),
    (FeatureKey::DefRatingDiff, StatKey::AdjD),
    (FeatureKey::OffEfgDiff, StatKey::EfgOff),
    (FeatureKey::Off3PDiff, StatKey::ThreePOff),
    (FeatureKey::Off2PDiff, StatKey::TwoPOff),
    (FeatureKey::OffFtDiff, StatKey::FtOff),
    (FeatureKey::Off3PaDiff, StatKey::ThreePaOff),
    (FeatureKey::OffTovDiff, StatKey::TovOff),
    (FeatureKey::OffFtrDiff, StatKey::FtrOff),
    (FeatureKey::OffAstDiff, StatKey::AstOff),
    (FeatureKey::OffOrDiff, StatKey::OrOff),
    (FeatureKey::DefEfgAllowedDiff, StatKey::EfgDef),
    (FeatureKey::Def3PAllowedDiff, StatKey::ThreePDef),
    (FeatureKey::Def2PAllowedDiff, StatKey::TwoPDef),
    (FeatureKey::DefFtAllowedDiff, StatKey::FtDef),
    (FeatureKey::Def3PaAllowedDiff, StatKey::ThreePaDef),
    (FeatureKey::DefTovDiff, StatKey::TovDef),
    (FeatureKey::DefDrDiff, StatKey::DrDef),
    (FeatureKey::DefBlkDiff, StatKey::BlkDef),
    (FeatureKey::DefStlDiff, StatKey::StlDef),
    (FeatureKey::PossDiff, StatKey::Tempo),
];

/// Every derived feature for one matchup, in `FeatureKey::ALL` order.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedFeatures {
    values: [f64; FEATURE_COUNT],
}

impl DerivedFeatures {
    pub fn get(&self, key: FeatureKey) -> f64 {
        self.values[index_of(key)]
    }

    /// Lookup by exported column name.
    pub fn get_named(&self, name: &str) -> Option<f64> {
        FeatureKey::from_name(name).map(|k| self.get(k))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, f64)> + '_ {
        FeatureKey::ALL.iter().copied().zip(self.values.iter().copied())
    }

    fn set(&mut self, key: FeatureKey, value: f64) {
        self.values[index_of(key)] = value;
    }
}

fn index_of(key: FeatureKey) -> usize {
    // Discriminants follow declaration order, which is also `ALL` order.
    key as usize
}

impl Serialize for DerivedFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.as_str(), &value)?;
        }
        map.end()
    }
}

/// Compute the full derived feature set for A vs B at `location`.
pub fn derive_features(a: &TeamStats, b: &TeamStats, location: Location) -> DerivedFeatures {
    let mut f = DerivedFeatures {
        values: [0.0; FEATURE_COUNT],
    };

    let home = location.home_advantage();
    f.set(FeatureKey::HomeAdvantage, home);

    for (feature, stat) in STAT_DIFFS {
        f.set(feature, a.get(stat) - b.get(stat));
    }

    f.set(FeatureKey::HomeXOffRat, home * f.get(FeatureKey::OffRatingDiff));
    f.set(FeatureKey::HomeXDefRat, home * f.get(FeatureKey::DefRatingDiff));
    f
}

/// A derived feature set laid out in the model's canonical order.
#[derive(Debug, Clone)]
pub struct FeatureProjection {
    /// Raw (unstandardized) values, index-aligned with `feature_names`.
    pub vector: Vec<f64>,
    pub named: DerivedFeatures,
    /// Canonical names the builder cannot derive; filled with 0.0.
    pub unmatched: Vec<String>,
}

/// Build the raw feature vector for A vs B in `feature_names` order.
///
/// Names the builder does not know are zero-filled and reported in
/// `unmatched`; derived features the model does not use are dropped.
pub fn build_features(
    a: &TeamStats,
    b: &TeamStats,
    location: Location,
    feature_names: &[String],
) -> FeatureProjection {
    let named = derive_features(a, b, location);
    let mut unmatched = Vec::new();

    let vector = feature_names
        .iter()
        .map(|name| match named.get_named(name) {
            Some(v) => v,
            None => {
                debug!("Feature '{}' not derivable from team stats, filled 0.0", name);
                unmatched.push(name.clone());
                0.0
            }
        })
        .collect();

    FeatureProjection {
        vector,
        named,
        unmatched,
    }
}
