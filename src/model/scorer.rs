//! Standardized linear scoring and the logistic link.
//!
//! The model is `p = sigmoid(intercept + Σ coef[i] · (x[i] − mean[i]) / scale[i])`,
//! with the training-time scaler statistics reapplied unchanged.

use super::error::ModelError;

/// Z-score one raw feature value. A zero scale means the feature was
/// constant in training, so it contributes nothing.
pub fn standardize(value: f64, mean: f64, scale: f64) -> f64 {
    if scale == 0.0 {
        0.0
    } else {
        (value - mean) / scale
    }
}

/// Logistic function in the two-branch form that never exponentiates a
/// large positive number.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        let e = (-z).exp();
        1.0 / (1.0 + e)
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `intercept + Σ coef · standardize(x)`.
pub fn linear_score(
    vector: &[f64],
    mean_vec: &[f64],
    scale_vec: &[f64],
    coef_vec: &[f64],
    intercept: f64,
) -> Result<f64, ModelError> {
    let expected = vector.len();
    for found in [mean_vec.len(), scale_vec.len(), coef_vec.len()] {
        if found != expected {
            return Err(ModelError::FeatureMismatch { expected, found });
        }
    }

    let z = vector
        .iter()
        .zip(mean_vec)
        .zip(scale_vec)
        .zip(coef_vec)
        .map(|(((x, m), s), c)| c * standardize(*x, *m, *s))
        .sum::<f64>();
    Ok(intercept + z)
}

/// Probability that team A wins given its raw feature vector.
pub fn score(
    vector: &[f64],
    mean_vec: &[f64],
    scale_vec: &[f64],
    coef_vec: &[f64],
    intercept: f64,
) -> Result<f64, ModelError> {
    linear_score(vector, mean_vec, scale_vec, coef_vec, intercept).map(sigmoid)
}
