use crate::config;
use crate::gate;
use crate::model;
use crate::series;
use crate::stats;

/// Data and model loaded once and reused by every request of a run.
///
/// Both are immutable after load, so a session can be shared across threads
/// behind a reference.
pub struct DashboardSession {
    series: series::HistoricalSeries,
    predictor: Box<dyn model::Predictor>,
}

impl DashboardSession {
    pub fn new(series: series::HistoricalSeries, predictor: Box<dyn model::Predictor>) -> Self {
        DashboardSession { series, predictor }
    }

    /// Loads the series and model named by `config`.
    ///
    /// # Errors
    /// * If either file fails to load.
    /// * If the data file holds no records.
    pub fn load(config: &config::DashboardConfig) -> anyhow::Result<Self> {
        let mut series = series::HistoricalSeries::load(&config.data_path)?;
        if series.is_empty() {
            anyhow::bail!("Data file {} contains no records", config.data_path.display());
        }
        if config.derive_features {
            series = series.with_derived_features();
        }

        let model = model::LinearModel::load(&config.model_path)?;
        anyhow::Ok(Self::new(series, Box::new(model)))
    }

    pub fn predict(&self, date: chrono::NaiveDate) -> gate::PredictionResult {
        gate::predict_for_date(&self.series, self.predictor.as_ref(), date)
    }

    /// Fills unset bounds with the series' first and last dates.
    ///
    /// Returns `None` only for an empty series.
    pub fn resolve_range(
        &self,
        start: Option<chrono::NaiveDate>,
        end: Option<chrono::NaiveDate>,
    ) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
        let start = start.or_else(|| self.series.first_date())?;
        let end = end.or_else(|| self.series.last_date())?;
        Some((start, end))
    }

    pub fn summarize(
        &self,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    ) -> Option<stats::RangeSummary> {
        stats::summarize(&self.series, start, end)
    }

    /// Volatility over the whole series, independent of the report range.
    pub fn volatility(&self) -> Option<stats::Volatility> {
        let prices: Vec<f64> = self.series.iter().map(|r| r.price).collect();
        stats::volatility(&prices)
    }

    pub fn histogram(
        &self,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
        bins: usize,
    ) -> Option<stats::Histogram> {
        let prices: Vec<f64> = self.series.range(start, end).map(|r| r.price).collect();
        stats::histogram(&prices, bins)
    }

    pub fn yearly_means(&self, start: chrono::NaiveDate, end: chrono::NaiveDate) -> Vec<(i32, f64)> {
        stats::yearly_means(self.series.range(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_session() -> DashboardSession {
        let mut records = Vec::new();
        let mut d = date(2021, 5, 3);
        for i in 0..12 {
            records.push(series::HistoricalRecord::new(d, 60.0 + i as f64));
            d = d.succ_opt().unwrap();
        }
        let series = series::HistoricalSeries::from_records(records)
            .unwrap()
            .with_derived_features();
        let model = model::LinearModel {
            feature_names: crate::features::FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coefficients: vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            intercept: 0.5,
        };
        DashboardSession::new(series, Box::new(model))
    }

    #[test]
    fn test_predict_through_session() {
        let session = sample_session();
        // Seventh record (2021-05-09) has a full window; lag_1 is 65.0.
        assert_eq!(session.predict(date(2021, 5, 9)), Ok(65.5));
        assert_eq!(
            session.predict(date(2021, 5, 3)),
            Err(gate::PredictionError::InsufficientHistory(date(2021, 5, 3)))
        );
        assert_eq!(
            session.predict(date(2021, 4, 30)),
            Err(gate::PredictionError::DateNotFound(date(2021, 4, 30)))
        );
    }

    #[test]
    fn test_resolve_range_defaults() {
        let session = sample_session();
        assert_eq!(
            session.resolve_range(None, None),
            Some((date(2021, 5, 3), date(2021, 5, 14)))
        );
        assert_eq!(
            session.resolve_range(Some(date(2021, 5, 5)), None),
            Some((date(2021, 5, 5), date(2021, 5, 14)))
        );
    }

    #[test]
    fn test_volatility_ignores_report_range() {
        let session = sample_session();
        let full = session.volatility().unwrap();
        assert!(full.daily > 0.0);
        assert_eq!(session.summarize(date(2021, 5, 3), date(2021, 5, 4)).unwrap().count, 2);
        assert_eq!(session.volatility(), Some(full));
    }

    #[test]
    fn test_load_demo_files() {
        let demos = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
        let config = config::DashboardConfig {
            data_path: demos.join("brent_sample.csv"),
            model_path: demos.join("linear_regression.json"),
            start: None,
            end: None,
            predict_date: None,
            bins: 30,
            derive_features: false,
        };
        let session = DashboardSession::load(&config).unwrap();
        assert_eq!(
            session.resolve_range(None, None),
            Some((date(2021, 5, 24), date(2021, 6, 18)))
        );
        assert!(session.predict(date(2021, 6, 1)).is_ok());
        assert_eq!(
            session.predict(date(2021, 5, 31)),
            Err(gate::PredictionError::InsufficientHistory(date(2021, 5, 31)))
        );
        assert_eq!(
            session.predict(date(2021, 5, 29)),
            Err(gate::PredictionError::DateNotFound(date(2021, 5, 29)))
        );

        let derived = DashboardSession::load(&config::DashboardConfig {
            derive_features: true,
            ..config
        })
        .unwrap();
        // The CSV stores the rolling mean rounded to four decimals.
        let loaded = session.predict(date(2021, 6, 1)).unwrap();
        let recomputed = derived.predict(date(2021, 6, 1)).unwrap();
        assert!((loaded - recomputed).abs() < 1e-3);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let config = config::DashboardConfig {
            data_path: std::path::PathBuf::from("does/not/exist.csv"),
            model_path: std::path::PathBuf::from("does/not/exist.json"),
            start: None,
            end: None,
            predict_date: None,
            bins: 30,
            derive_features: false,
        };
        assert!(DashboardSession::load(&config).is_err());
    }

    #[test]
    fn test_session_is_shareable() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<DashboardSession>();
    }
}
