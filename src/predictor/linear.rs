//! Linear point-predictor backed by a JSON model artifact

use crate::error::{ForecastError, Result};
use crate::features::{feature_index, FEATURE_ORDER, FEATURE_SCHEMA_VERSION};
use crate::predictor::DemandPredictor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serialized form of a fitted linear model.
///
/// `schema_version` and `weights.len()` are checked against the current
/// [`FEATURE_ORDER`] when the artifact is loaded, so a stale artifact fails
/// loudly at startup instead of producing plausible-looking wrong numbers at
/// prediction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Model name, e.g. "CatBoost Regression" for an exported surrogate
    pub name: String,
    /// [`FEATURE_SCHEMA_VERSION`] the model was fit against
    pub schema_version: u32,
    /// Intercept term
    pub intercept: f64,
    /// One weight per entry of [`FEATURE_ORDER`], in that order
    pub weights: Vec<f64>,
    /// Coefficient of determination on the validation split, if recorded
    #[serde(default)]
    pub r_squared: Option<f64>,
    /// Root mean squared error on the validation split, if recorded
    #[serde(default)]
    pub rmse: Option<f64>,
}

/// Linear model over the ordered feature vector
#[derive(Debug, Clone)]
pub struct LinearPredictor {
    artifact: ModelArtifact,
}

impl LinearPredictor {
    /// Validate an artifact against the current feature schema
    pub fn new(artifact: ModelArtifact) -> Result<Self> {
        if artifact.schema_version != FEATURE_SCHEMA_VERSION {
            return Err(ForecastError::SchemaMismatch(format!(
                "model '{}' was fit against feature schema v{}, current is v{}",
                artifact.name, artifact.schema_version, FEATURE_SCHEMA_VERSION
            )));
        }
        if artifact.weights.len() != FEATURE_ORDER.len() {
            return Err(ForecastError::SchemaMismatch(format!(
                "model '{}' carries {} weights, feature schema has {} fields",
                artifact.name,
                artifact.weights.len(),
                FEATURE_ORDER.len()
            )));
        }
        Ok(Self { artifact })
    }

    /// Deserialize and validate an artifact from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        Self::new(artifact)
    }

    /// Load and validate an artifact from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Build a predictor from named weights, every other weight zero.
    ///
    /// Names are resolved through [`FEATURE_ORDER`]; an unknown name is
    /// rejected rather than ignored.
    pub fn from_named_weights(name: &str, intercept: f64, weights: &[(&str, f64)]) -> Result<Self> {
        let mut dense = vec![0.0; FEATURE_ORDER.len()];
        for (feature, weight) in weights {
            let idx = feature_index(feature).ok_or_else(|| {
                ForecastError::InvalidParameter(format!("unknown feature '{}'", feature))
            })?;
            dense[idx] = *weight;
        }
        Self::new(ModelArtifact {
            name: name.to_string(),
            schema_version: FEATURE_SCHEMA_VERSION,
            intercept,
            weights: dense,
            r_squared: None,
            rmse: None,
        })
    }

}

impl DemandPredictor for LinearPredictor {
    fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.artifact.weights.len() {
            return Err(ForecastError::SchemaMismatch(format!(
                "feature vector has {} entries, model '{}' expects {}",
                features.len(),
                self.artifact.name,
                self.artifact.weights.len()
            )));
        }
        let dot: f64 = features
            .iter()
            .zip(self.artifact.weights.iter())
            .map(|(x, w)| x * w)
            .sum();
        Ok(self.artifact.intercept + dot)
    }

    fn name(&self) -> &str {
        &self.artifact.name
    }

    fn r_squared(&self) -> Option<f64> {
        self.artifact.r_squared
    }

    fn rmse(&self) -> Option<f64> {
        self.artifact.rmse
    }
}
