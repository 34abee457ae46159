//! Date-based prediction requests.
//!
//! A request succeeds only when the date is a record of the series and that
//! record carries every model input. The predictor is never called otherwise.

use crate::model;
use crate::series;

/// Why a prediction could not be produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("The selected date ({0}) is not in the historical data. Please choose another date.")]
    DateNotFound(chrono::NaiveDate),
    #[error("Insufficient historical data to make a prediction for {0}. Try another date.")]
    InsufficientHistory(chrono::NaiveDate),
    #[error("Model failed to produce a prediction: {0}")]
    Model(String),
}

pub type PredictionResult = Result<f64, PredictionError>;

/// Predicts the next-day price for `requested_date`.
///
/// # Arguments
/// * `series` - Historical records with derived columns.
/// * `predictor` - Loaded model.
/// * `requested_date` - Date whose record supplies the model inputs.
///
/// # Returns
/// * `Ok(price)` - The first output of a single-row prediction, unchanged.
/// * `Err(DateNotFound)` - The date is not a key of the series.
/// * `Err(InsufficientHistory)` - The record lacks a lag, the rolling mean or the weekday.
pub fn predict_for_date(
    series: &series::HistoricalSeries,
    predictor: &dyn model::Predictor,
    requested_date: chrono::NaiveDate,
) -> PredictionResult {
    let record = series
        .get(requested_date)
        .ok_or(PredictionError::DateNotFound(requested_date))?;

    let features = record
        .feature_vector()
        .ok_or(PredictionError::InsufficientHistory(requested_date))?;

    let outputs = predictor
        .predict(&[features])
        .map_err(|e| PredictionError::Model(e.to_string()))?;
    let price = outputs
        .first()
        .copied()
        .ok_or_else(|| PredictionError::Model("empty output".to_string()))?;

    tracing::debug!(date = %requested_date, price, "Prediction produced");
    Ok(price)
}
