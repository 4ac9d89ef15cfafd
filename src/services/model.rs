use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::passenger::PassengerFeatures;
use crate::models::prediction::Prediction;
use crate::services::predictor::{PredictionError, Predictor};
use crate::services::preprocessing::{Preprocessor, FEATURE_NAMES};

/// File name of the artifact inside `MODEL_DIR`.
pub const ARTIFACT_FILE: &str = "model.json";

/// Probability at or above which a passenger is labelled as a survivor.
const DECISION_THRESHOLD: f64 = 0.5;

const EMBEDDED_ARTIFACT: &str = include_str!("default_model.json");

/// Serialized form of a trained classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: String,
    pub preprocessing: Preprocessor,
    pub intercept: f64,
    /// One weight per entry of [`FEATURE_NAMES`], in the same order.
    pub weights: Vec<f64>,
}

/// Logistic-regression survival classifier.
#[derive(Debug, Clone)]
pub struct SurvivalModel {
    version: String,
    preprocessor: Preprocessor,
    intercept: f64,
    weights: [f64; FEATURE_NAMES.len()],
}

impl SurvivalModel {
    /// Load `model.json` from an artifact directory.
    pub fn load(model_dir: &Path) -> Result<Self, ModelError> {
        let path = model_dir.join(ARTIFACT_FILE);
        tracing::info!(path = %path.display(), "Loading model artifact");
        let raw = std::fs::read_to_string(&path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// The artifact compiled into the binary, used when no `MODEL_DIR` is set.
    pub fn embedded() -> Result<Self, ModelError> {
        Self::from_json(EMBEDDED_ARTIFACT)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(raw)?;
        Self::try_from(artifact)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn score(&self, features: &PassengerFeatures) -> f64 {
        let row = self.preprocessor.transform(features);
        self.intercept
            + row
                .iter()
                .zip(self.weights.iter())
                .map(|(x, w)| x * w)
                .sum::<f64>()
    }
}

impl TryFrom<ModelArtifact> for SurvivalModel {
    type Error = ModelError;

    fn try_from(artifact: ModelArtifact) -> Result<Self, Self::Error> {
        let weights: [f64; FEATURE_NAMES.len()] =
            artifact
                .weights
                .as_slice()
                .try_into()
                .map_err(|_| ModelError::Shape {
                    expected: FEATURE_NAMES.len(),
                    actual: artifact.weights.len(),
                })?;

        if !artifact.intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::NonFinite);
        }

        Ok(Self {
            version: artifact.version,
            preprocessor: artifact.preprocessing,
            intercept: artifact.intercept,
            weights,
        })
    }
}

impl Predictor for SurvivalModel {
    fn predict(&self, features: &PassengerFeatures) -> Result<Prediction, PredictionError> {
        let score = self.score(features);
        if !score.is_finite() {
            return Err(PredictionError::NonFiniteOutput);
        }

        let probability = 1.0 / (1.0 + (-score).exp());
        Ok(Prediction {
            label: u8::from(probability >= DECISION_THRESHOLD),
            probability,
        })
    }

    fn name(&self) -> &str {
        &self.version
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read model artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model artifact has {actual} weights, expected {expected}")]
    Shape { expected: usize, actual: usize },

    #[error("Model artifact contains non-finite parameters")]
    NonFinite,
}
