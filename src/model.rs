use crate::features;

/// Capability that turns model inputs into price predictions.
///
/// Implementations return one output per input vector, in input order.
/// The trait is the boundary to whatever model backs the dashboard: the
/// bundled linear regression, a stub in tests, or a remote inference call.
pub trait Predictor: Send + Sync {
    fn predict(&self, batch: &[features::FeatureVector]) -> anyhow::Result<Vec<f64>>;
}

/// Serialized form of a fitted linear regression.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinearModel {
    /// Input column names, checked against [`features::FEATURE_NAMES`] on load.
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearModel {
    /// Loads a model artifact, choosing the decoder from the file extension.
    ///
    /// `.json` files are read with `serde_json`, `.bin` files with `bincode`.
    ///
    /// # Arguments
    /// * `path` - Path to the artifact.
    ///
    /// # Returns
    /// * `anyhow::Result<LinearModel>` - The validated model or an error.
    ///
    /// # Errors
    /// * If the extension is not recognised.
    /// * If the file cannot be read or decoded.
    /// * If the artifact does not describe the seven expected inputs in order.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("Failed to read model {}: {}", path.display(), e))?;

        let model = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&data)?,
            Some("bin") => Self::from_bincode(&data)?,
            _ => anyhow::bail!(
                "Unsupported model format for {} (expected .json or .bin)",
                path.display()
            ),
        };
        tracing::info!(path = %path.display(), intercept = model.intercept, "Loaded linear model");
        anyhow::Ok(model)
    }

    pub fn from_json(data: &[u8]) -> anyhow::Result<Self> {
        let model: LinearModel = serde_json::from_slice(data)
            .map_err(|e| anyhow::anyhow!("Failed to decode JSON model: {}", e))?;
        model.validate()?;
        anyhow::Ok(model)
    }

    pub fn from_bincode(data: &[u8]) -> anyhow::Result<Self> {
        let model: LinearModel = bincode::deserialize(data)
            .map_err(|e| anyhow::anyhow!("Failed to decode bincode model: {}", e))?;
        model.validate()?;
        anyhow::Ok(model)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.coefficients.len() != features::FEATURE_COUNT {
            anyhow::bail!(
                "Model has {} coefficients, expected {}",
                self.coefficients.len(),
                features::FEATURE_COUNT
            );
        }
        if self.feature_names.iter().map(String::as_str).ne(features::FEATURE_NAMES) {
            anyhow::bail!(
                "Model inputs {:?} do not match expected order {:?}",
                self.feature_names,
                features::FEATURE_NAMES
            );
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            anyhow::bail!("Model parameters must be finite");
        }
        anyhow::Ok(())
    }
}

impl Predictor for LinearModel {
    fn predict(&self, batch: &[features::FeatureVector]) -> anyhow::Result<Vec<f64>> {
        let outputs = batch
            .iter()
            .map(|row| {
                self.intercept
                    + row
                        .as_slice()
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(x, w)| x * w)
                        .sum::<f64>()
            })
            .collect();
        anyhow::Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> LinearModel {
        LinearModel {
            feature_names: features::FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coefficients: vec![0.5, 0.2, 0.1, 0.05, 0.05, 0.1, 0.0],
            intercept: 1.0,
        }
    }

    #[test]
    fn test_predict_is_intercept_plus_dot_product() {
        let model = sample_model();
        let v = features::FeatureVector::from_fields([10.0, 10.0, 10.0, 10.0, 10.0], 10.0, 4);
        let out = model.predict(&[v]).unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0] - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_one_output_per_row() {
        let model = sample_model();
        let a = features::FeatureVector::from_fields([1.0; 5], 1.0, 0);
        let b = features::FeatureVector::from_fields([2.0; 5], 2.0, 0);
        assert_eq!(model.predict(&[a, b]).unwrap().len(), 2);
        assert!(model.predict(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_json_artifact() {
        let json = r#"{
            "feature_names": ["preco_lag_1", "preco_lag_2", "preco_lag_3", "preco_lag_4",
                              "preco_lag_5", "media_movel_7d", "dia_da_semana"],
            "coefficients": [0.5, 0.2, 0.1, 0.05, 0.05, 0.1, 0.0],
            "intercept": 1.0
        }"#;
        assert_eq!(LinearModel::from_json(json.as_bytes()).unwrap(), sample_model());
    }

    #[test]
    fn test_bincode_artifact() {
        let bytes = bincode::serialize(&sample_model()).unwrap();
        assert_eq!(LinearModel::from_bincode(&bytes).unwrap(), sample_model());
    }

    #[test]
    fn test_rejects_wrong_shape_or_order() {
        let mut short = sample_model();
        short.coefficients.pop();
        let json = serde_json::to_vec(&short).unwrap();
        assert!(LinearModel::from_json(&json).is_err());

        let mut swapped = sample_model();
        swapped.feature_names.swap(0, 1);
        let json = serde_json::to_vec(&swapped).unwrap();
        assert!(LinearModel::from_json(&json).is_err());
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let path = std::env::temp_dir().join("brent_dashboard_model_test.joblib");
        std::fs::write(&path, b"not a model").unwrap();
        let err = LinearModel::load(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported model format"));
        std::fs::remove_file(&path).ok();
    }
}
