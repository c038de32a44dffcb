use thiserror::Error;

/// Failures of the artifact → feature → score pipeline.
///
/// Artifact errors are fatal: no prediction is attempted without a complete
/// bundle. `FeatureMismatch` is a contract violation between the feature
/// builder and the scorer and should never surface in a correct build.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model artifact not found: {path}")]
    ArtifactNotFound { path: String },

    #[error("Failed to parse model artifact {path}: {source}")]
    ArtifactParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Feature vector length mismatch: expected {expected}, found {found}")]
    FeatureMismatch { expected: usize, found: usize },
}

impl ModelError {
    pub fn is_artifact_error(&self) -> bool {
        matches!(
            self,
            ModelError::ArtifactNotFound { .. } | ModelError::ArtifactParse { .. }
        )
    }
}
