use crate::series;

/// Number of inputs the price model takes.
pub const FEATURE_COUNT: usize = 7;

/// Trailing window of the rolling mean, in records.
pub const ROLLING_WINDOW: usize = 7;

/// Column names of the model inputs, in the order the model expects them.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "preco_lag_1",
    "preco_lag_2",
    "preco_lag_3",
    "preco_lag_4",
    "preco_lag_5",
    "media_movel_7d",
    "dia_da_semana",
];

/// Fixed-order model input:
/// `[lag_1, lag_2, lag_3, lag_4, lag_5, rolling_mean_7d, weekday]`.
///
/// The model binds inputs by position, not by name, so the order is part of
/// the type's contract. A vector can only be built with every field present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_fields(lags: [f64; series::LAG_COUNT], rolling_mean_7d: f64, weekday: u8) -> Self {
        FeatureVector([
            lags[0],
            lags[1],
            lags[2],
            lags[3],
            lags[4],
            rolling_mean_7d,
            weekday as f64,
        ])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Derives lag, rolling-mean and weekday columns from raw prices.
///
/// `records` must be in date order. Lags and the rolling window count
/// records, not calendar days, so weekends and holidays are skipped. The
/// rolling mean includes the current record and stays empty until a full
/// window of [`ROLLING_WINDOW`] records is available.
pub fn derive_features(records: &mut [series::HistoricalRecord]) {
    use chrono::Datelike;

    let prices: Vec<f64> = records.iter().map(|r| r.price).collect();

    for (i, record) in records.iter_mut().enumerate() {
        for (k, lag) in record.price_lags.iter_mut().enumerate() {
            *lag = i.checked_sub(k + 1).map(|j| prices[j]);
        }

        record.rolling_mean_7d = if i + 1 >= ROLLING_WINDOW {
            let window = &prices[i + 1 - ROLLING_WINDOW..=i];
            Some(window.iter().sum::<f64>() / ROLLING_WINDOW as f64)
        } else {
            None
        };

        record.weekday = Some(record.date.weekday().num_days_from_monday() as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_series(prices: &[f64]) -> Vec<series::HistoricalRecord> {
        // 2021-05-31 is a Monday; business days only.
        let mut date = chrono::NaiveDate::from_ymd_opt(2021, 5, 31).unwrap();
        let mut records = Vec::new();
        for &price in prices {
            records.push(series::HistoricalRecord::new(date, price));
            date = date.succ_opt().unwrap();
            while matches!(
                chrono::Datelike::weekday(&date),
                chrono::Weekday::Sat | chrono::Weekday::Sun
            ) {
                date = date.succ_opt().unwrap();
            }
        }
        records
    }

    #[test]
    fn test_lags_follow_record_order() {
        let mut records = raw_series(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0]);
        derive_features(&mut records);

        assert_eq!(records[0].price_lags, [None; 5]);
        assert_eq!(records[2].price_lags, [Some(11.0), Some(10.0), None, None, None]);
        // Record 5 is the Monday after a weekend; its first lag is Friday's price.
        assert_eq!(
            records[5].price_lags,
            [Some(14.0), Some(13.0), Some(12.0), Some(11.0), Some(10.0)]
        );
    }

    #[test]
    fn test_rolling_mean_needs_full_window() {
        let mut records = raw_series(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0]);
        derive_features(&mut records);

        assert_eq!(records[5].rolling_mean_7d, None);
        assert_eq!(records[6].rolling_mean_7d, Some(13.0));
        assert_eq!(records[7].rolling_mean_7d, Some(14.0));
        assert!(records[5].feature_vector().is_none());
        assert!(records[6].feature_vector().is_some());
    }

    #[test]
    fn test_weekday_monday_is_zero() {
        let mut records = raw_series(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        derive_features(&mut records);
        let weekdays: Vec<_> = records.iter().map(|r| r.weekday).collect();
        assert_eq!(
            weekdays,
            vec![Some(0), Some(1), Some(2), Some(3), Some(4), Some(0)]
        );
    }

    #[test]
    fn test_feature_vector_order() {
        let v = FeatureVector::from_fields([1.0, 2.0, 3.0, 4.0, 5.0], 6.0, 3);
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 3.0]);
        assert_eq!(v.as_slice().len(), FEATURE_NAMES.len());
    }
}
