use crate::features;
use crate::utils;

/// Number of lagged price columns carried by every record.
pub const LAG_COUNT: usize = 5;

/// Represents a single row of the input CSV.
///
/// Derived columns are optional: empty cells (and the `NaN` text some
/// exporters write) become `None`, and a column that is missing from the
/// header altogether deserializes as `None` on every row.
#[derive(Debug, serde::Deserialize)]
struct CsvRecord {
    #[serde(rename = "data")]
    date: String,
    #[serde(rename = "preco")]
    price: f64,
    #[serde(rename = "ano", default)]
    year: Option<i32>,
    #[serde(rename = "preco_lag_1", default)]
    price_lag_1: Option<f64>,
    #[serde(rename = "preco_lag_2", default)]
    price_lag_2: Option<f64>,
    #[serde(rename = "preco_lag_3", default)]
    price_lag_3: Option<f64>,
    #[serde(rename = "preco_lag_4", default)]
    price_lag_4: Option<f64>,
    #[serde(rename = "preco_lag_5", default)]
    price_lag_5: Option<f64>,
    #[serde(rename = "media_movel_7d", default)]
    rolling_mean_7d: Option<f64>,
    #[serde(rename = "dia_da_semana", default)]
    weekday: Option<f64>,
}

/// One trading day of the Brent series.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRecord {
    pub date: chrono::NaiveDate,
    /// Closing price in US dollars per barrel.
    pub price: f64,
    pub year: i32,
    /// `price_lags[0]` is the price of the previous record, `price_lags[4]` five records back.
    pub price_lags: [Option<f64>; LAG_COUNT],
    pub rolling_mean_7d: Option<f64>,
    /// Day of week, Monday = 0.
    pub weekday: Option<u8>,
}

impl HistoricalRecord {
    /// Creates a record with only the raw price; derived fields are left empty.
    pub fn new(date: chrono::NaiveDate, price: f64) -> Self {
        use chrono::Datelike;

        HistoricalRecord {
            date,
            price,
            year: date.year(),
            price_lags: [None; LAG_COUNT],
            rolling_mean_7d: None,
            weekday: None,
        }
    }

    /// Builds the model input for this record.
    ///
    /// Returns `None` when any of the seven required fields is missing.
    pub fn feature_vector(&self) -> Option<features::FeatureVector> {
        let [l1, l2, l3, l4, l5] = self.price_lags;
        Some(features::FeatureVector::from_fields(
            [l1?, l2?, l3?, l4?, l5?],
            self.rolling_mean_7d?,
            self.weekday?,
        ))
    }

    fn from_csv(row: CsvRecord) -> anyhow::Result<Self> {
        use chrono::Datelike;

        let date = utils::parse_date(&row.date)?;
        if !row.price.is_finite() || row.price <= 0.0 {
            anyhow::bail!("Invalid price {} on {}", row.price, date);
        }
        let weekday = match present(row.weekday) {
            Some(w) if w.fract() == 0.0 && (0.0..=6.0).contains(&w) => Some(w as u8),
            Some(w) => anyhow::bail!("Invalid weekday {} on {}", w, date),
            None => None,
        };

        anyhow::Ok(HistoricalRecord {
            date,
            price: row.price,
            year: row.year.unwrap_or_else(|| date.year()),
            price_lags: [
                present(row.price_lag_1),
                present(row.price_lag_2),
                present(row.price_lag_3),
                present(row.price_lag_4),
                present(row.price_lag_5),
            ],
            rolling_mean_7d: present(row.rolling_mean_7d),
            weekday,
        })
    }
}

/// Treats non-finite values as missing cells.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Date-indexed, read-only collection of historical records.
///
/// Records are kept in date order; each date appears once.
#[derive(Debug, Clone, Default)]
pub struct HistoricalSeries {
    records: std::collections::BTreeMap<chrono::NaiveDate, HistoricalRecord>,
}

impl HistoricalSeries {
    /// Indexes records by date.
    ///
    /// # Errors
    /// * If two records share a date.
    pub fn from_records(records: Vec<HistoricalRecord>) -> anyhow::Result<Self> {
        let mut indexed = std::collections::BTreeMap::new();
        for record in records {
            let date = record.date;
            if indexed.insert(date, record).is_some() {
                anyhow::bail!("Duplicate record for date {}", date);
            }
        }
        anyhow::Ok(HistoricalSeries { records: indexed })
    }

    /// Loads the series from a CSV file.
    ///
    /// # Arguments
    /// * `path` - Path to the CSV file (header row required).
    ///
    /// # Returns
    /// * `anyhow::Result<HistoricalSeries>` - The indexed series or an error.
    ///
    /// # Errors
    /// * If the file cannot be opened.
    /// * If a row fails to deserialize or validate.
    /// * If a date appears twice.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path.as_ref()).map_err(|e| {
            anyhow::anyhow!("Failed to open data file {}: {}", path.as_ref().display(), e)
        })?;
        let series = Self::from_reader(file)?;
        tracing::info!(
            records = series.len(),
            path = %path.as_ref().display(),
            "Loaded historical series"
        );
        anyhow::Ok(series)
    }

    /// Reads and indexes records from any CSV source.
    pub fn from_reader<R: std::io::Read>(source: R) -> anyhow::Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(source);

        let mut records = Vec::new();
        for (line, result) in reader.deserialize::<CsvRecord>().enumerate() {
            let row = result.map_err(|e| anyhow::anyhow!("Failed to read CSV row {}: {}", line + 1, e))?;
            records.push(HistoricalRecord::from_csv(row)?);
        }
        Self::from_records(records)
    }

    /// Recomputes lags, rolling mean and weekday from the raw prices.
    ///
    /// Used when the source only carries dates and prices.
    pub fn with_derived_features(self) -> Self {
        let mut records: Vec<HistoricalRecord> = self.records.into_values().collect();
        features::derive_features(&mut records);
        let missing = records.iter().filter(|r| r.feature_vector().is_none()).count();
        tracing::debug!(missing, "Derived feature columns");

        HistoricalSeries {
            records: records.into_iter().map(|r| (r.date, r)).collect(),
        }
    }

    pub fn get(&self, date: chrono::NaiveDate) -> Option<&HistoricalRecord> {
        self.records.get(&date)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<chrono::NaiveDate> {
        self.records.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<chrono::NaiveDate> {
        self.records.keys().next_back().copied()
    }

    /// Iterates over all records in date order.
    pub fn iter(&self) -> impl Iterator<Item = &HistoricalRecord> {
        self.records.values()
    }

    /// Iterates over the records between `start` and `end`, both inclusive.
    ///
    /// An inverted range yields nothing.
    pub fn range(
        &self,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    ) -> impl Iterator<Item = &HistoricalRecord> {
        let bounds = if start <= end { Some(start..=end) } else { None };
        bounds
            .into_iter()
            .flat_map(move |b| self.records.range(b).map(|(_, r)| r))
    }
}
