//! Reader for the offline-exported logistic model artifacts.
//!
//! The exporter writes four JSON documents into one directory:
//!
//! - `logistic_model_meta.json`: `{"feature_names": [...], "intercept": f}`
//! - `logistic_signed_coefficients.json`: feature → signed coefficient
//! - `scaler_mean.json`: feature → standardization mean
//! - `scaler_scale.json`: feature → standardization scale
//!
//! `feature_names` in the metadata is the only authority on vector layout.
//! The three tables are aligned to it; a name missing from a table gets a
//! neutral default (coefficient 0.0, mean 0.0, scale 1.0) so it can never
//! move the score.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;
use tracing::{debug, info};

use super::error::ModelError;

pub const META_FILE: &str = "logistic_model_meta.json";
pub const COEF_FILE: &str = "logistic_signed_coefficients.json";
pub const MEAN_FILE: &str = "scaler_mean.json";
pub const SCALE_FILE: &str = "scaler_scale.json";

const DEFAULT_COEF: f64 = 0.0;
const DEFAULT_MEAN: f64 = 0.0;
const DEFAULT_SCALE: f64 = 1.0;

/// Flat feature-name → number table as written by the exporter.
pub type ParamTable = HashMap<String, f64>;

#[derive(Debug, Deserialize)]
struct ModelMeta {
    feature_names: Vec<String>,
    #[serde(default)]
    intercept: f64,
}

/// Model parameters aligned into parallel vectors in `feature_names` order.
///
/// Immutable once built; share it by reference across predictions.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactBundle {
    pub feature_names: Vec<String>,
    pub coef_vec: Vec<f64>,
    pub intercept: f64,
    pub mean_vec: Vec<f64>,
    pub scale_vec: Vec<f64>,
}

impl ArtifactBundle {
    /// Align keyed parameter tables to the given feature order.
    pub fn from_tables(
        feature_names: Vec<String>,
        intercept: f64,
        coefs: &ParamTable,
        means: &ParamTable,
        scales: &ParamTable,
    ) -> Self {
        let coef_vec = align(&feature_names, coefs, DEFAULT_COEF, "coefficient");
        let mean_vec = align(&feature_names, means, DEFAULT_MEAN, "mean");
        let scale_vec = align(&feature_names, scales, DEFAULT_SCALE, "scale");
        ArtifactBundle {
            feature_names,
            coef_vec,
            intercept,
            mean_vec,
            scale_vec,
        }
    }

    /// Number of features the model was fit on.
    pub fn len(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_names.is_empty()
    }
}

fn align(names: &[String], table: &ParamTable, default: f64, what: &str) -> Vec<f64> {
    names
        .iter()
        .map(|name| match table.get(name) {
            Some(v) => *v,
            None => {
                debug!("No {} for feature '{}', using {}", what, name, default);
                default
            }
        })
        .collect()
}

/// Load and align the artifact bundle stored in `dir`.
///
/// Metadata is read first so the feature order is fixed before any table is
/// consulted. Every file is required; a missing or malformed one aborts the
/// whole load.
pub fn load_artifacts(dir: &Path) -> Result<ArtifactBundle, ModelError> {
    let meta: ModelMeta = read_json(&dir.join(META_FILE))?;
    let coefs: ParamTable = read_json(&dir.join(COEF_FILE))?;
    let means: ParamTable = read_json(&dir.join(MEAN_FILE))?;
    let scales: ParamTable = read_json(&dir.join(SCALE_FILE))?;

    let bundle =
        ArtifactBundle::from_tables(meta.feature_names, meta.intercept, &coefs, &means, &scales);
    info!(
        "Loaded logistic artifacts from {} ({} features, intercept {:.4})",
        dir.display(),
        bundle.len(),
        bundle.intercept
    );
    Ok(bundle)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ModelError::ArtifactNotFound {
                path: path.display().to_string(),
            });
        }
        Err(e) => {
            return Err(ModelError::ArtifactParse {
                path: path.display().to_string(),
                source: serde_json::Error::io(e),
            });
        }
    };
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelError::ArtifactParse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write_bundle(dir: &Path, meta: &str, coef: &str, mean: &str, scale: &str) {
        fs::write(dir.join(META_FILE), meta).unwrap();
        fs::write(dir.join(COEF_FILE), coef).unwrap();
        fs::write(dir.join(MEAN_FILE), mean).unwrap();
        fs::write(dir.join(SCALE_FILE), scale).unwrap();
    }

    #[test]
    fn loads_and_aligns_to_meta_order() {
        let tmp = TempDir::new().unwrap();
        write_bundle(
            tmp.path(),
            r#"{"feature_names": ["b", "a"], "intercept": -0.25}"#,
            r#"{"a": 1.5, "b": -2.0}"#,
            r#"{"a": 10.0, "b": 20.0}"#,
            r#"{"a": 2.0, "b": 4.0}"#,
        );

        let bundle = load_artifacts(tmp.path()).unwrap();
        assert_eq!(bundle.feature_names, vec!["b", "a"]);
        assert_eq!(bundle.coef_vec, vec![-2.0, 1.5]);
        assert_eq!(bundle.mean_vec, vec![20.0, 10.0]);
        assert_eq!(bundle.scale_vec, vec![4.0, 2.0]);
        assert_relative_eq!(bundle.intercept, -0.25, epsilon = 1e-12);
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn missing_table_entries_get_neutral_defaults() {
        let tmp = TempDir::new().unwrap();
        write_bundle(
            tmp.path(),
            r#"{"feature_names": ["known", "orphan"]}"#,
            r#"{"known": 0.7, "unused": 9.0}"#,
            r#"{"known": 1.0}"#,
            r#"{"known": 3.0}"#,
        );

        let bundle = load_artifacts(tmp.path()).unwrap();
        assert_eq!(bundle.coef_vec, vec![0.7, 0.0]);
        assert_eq!(bundle.mean_vec, vec![1.0, 0.0]);
        assert_eq!(bundle.scale_vec, vec![3.0, 1.0]);
        // Intercept is optional in the metadata.
        assert_eq!(bundle.intercept, 0.0);
    }

    #[test]
    fn missing_file_is_artifact_not_found() {
        let tmp = TempDir::new().unwrap();
        write_bundle(
            tmp.path(),
            r#"{"feature_names": ["a"], "intercept": 0.0}"#,
            r#"{"a": 1.0}"#,
            r#"{"a": 0.0}"#,
            r#"{"a": 1.0}"#,
        );
        fs::remove_file(tmp.path().join(SCALE_FILE)).unwrap();

        match load_artifacts(tmp.path()) {
            Err(ModelError::ArtifactNotFound { path }) => assert!(path.ends_with(SCALE_FILE)),
            other => panic!("Expected ArtifactNotFound, got {:?}", other),
        }
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        write_bundle(
            tmp.path(),
            r#"{"feature_names": ["a"], "intercept": 0.0}"#,
            r#"{"a": "not a number"}"#,
            r#"{"a": 0.0}"#,
            r#"{"a": 1.0}"#,
        );

        let err = load_artifacts(tmp.path()).unwrap_err();
        assert!(err.is_artifact_error());
        match err {
            ModelError::ArtifactParse { path, .. } => assert!(path.ends_with(COEF_FILE)),
            other => panic!("Expected ArtifactParse, got {:?}", other),
        }
    }

    #[test]
    fn meta_without_feature_names_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        write_bundle(
            tmp.path(),
            r#"{"intercept": 0.0}"#,
            r#"{}"#,
            r#"{}"#,
            r#"{}"#,
        );
        assert!(matches!(
            load_artifacts(tmp.path()),
            Err(ModelError::ArtifactParse { .. })
        ));
    }
}
