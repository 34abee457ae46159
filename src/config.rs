use crate::cli;

pub const DATA_PATH_ENV: &str = "BRENT_DATA_PATH";
pub const MODEL_PATH_ENV: &str = "BRENT_MODEL_PATH";
pub const DEFAULT_DATA_PATH: &str = "df_limpo.csv";
pub const DEFAULT_MODEL_PATH: &str = "modelo/linear_regression.json";

/// Settings for one dashboard session.
///
/// Paths come from the command line first, then the environment, then the
/// defaults above. Range bounds left unset fall back to the series' first
/// and last dates once the data is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: std::path::PathBuf,
    pub model_path: std::path::PathBuf,
    pub start: Option<chrono::NaiveDate>,
    pub end: Option<chrono::NaiveDate>,
    pub predict_date: Option<chrono::NaiveDate>,
    pub bins: usize,
    pub derive_features: bool,
}

impl DashboardConfig {
    pub fn from_args(args: cli::Args) -> anyhow::Result<Self> {
        Self::from_args_with_env(args, |key| std::env::var(key).ok())
    }

    /// Builds the configuration using `env` to look up environment fallbacks.
    ///
    /// # Errors
    /// * If both range bounds are given and `start` is after `end`.
    pub fn from_args_with_env<F>(args: cli::Args, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let (Some(start), Some(end)) = (args.start, args.end) {
            if start > end {
                anyhow::bail!("Start date {} is after end date {}", start, end);
            }
        }

        let data_path = args
            .data
            .or_else(|| env(DATA_PATH_ENV).map(std::path::PathBuf::from))
            .unwrap_or_else(|| std::path::PathBuf::from(DEFAULT_DATA_PATH));
        let model_path = args
            .model
            .or_else(|| env(MODEL_PATH_ENV).map(std::path::PathBuf::from))
            .unwrap_or_else(|| std::path::PathBuf::from(DEFAULT_MODEL_PATH));

        anyhow::Ok(DashboardConfig {
            data_path,
            model_path,
            start: args.start,
            end: args.end,
            predict_date: args.predict,
            bins: args.bins,
            derive_features: args.derive_features,
        })
    }
}
