pub mod artifacts;
pub mod error;
pub mod features;
pub mod predictor;
pub mod scorer;

pub use artifacts::{load_artifacts, ArtifactBundle};
pub use error::ModelError;
pub use features::{build_features, Location, StatKey, TeamStats};
pub use predictor::{Prediction, Predictor};
