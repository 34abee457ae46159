use crate::series;

/// Trading days used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Headline numbers for a filtered date range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSummary {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Change from the `start` price to the `end` price, in percent.
    /// `None` unless both dates are records of the series.
    pub percent_change: Option<f64>,
}

/// Standard deviation of daily log returns and its annualized value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volatility {
    pub daily: f64,
    pub annual: f64,
}

/// Equal-width price histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub lower: f64,
    pub width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Returns `(lower, upper)` edges of bin `i`.
    pub fn bin_edges(&self, i: usize) -> (f64, f64) {
        let lower = self.lower + self.width * i as f64;
        (lower, lower + self.width)
    }
}

/// Summarizes the records between `start` and `end`, both inclusive.
///
/// # Returns
/// * `Option<RangeSummary>` - `None` when the range holds no records.
pub fn summarize(
    series: &series::HistoricalSeries,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> Option<RangeSummary> {
    let prices: Vec<f64> = series.range(start, end).map(|r| r.price).collect();
    if prices.is_empty() {
        return None;
    }

    let count = prices.len();
    let mean = prices.iter().sum::<f64>() / count as f64;
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let percent_change = match (series.get(start), series.get(end)) {
        (Some(first), Some(last)) if start <= end => {
            Some((last.price - first.price) / first.price * 100.0)
        }
        _ => None,
    };

    Some(RangeSummary {
        start,
        end,
        count,
        mean,
        min,
        max,
        percent_change,
    })
}

/// Computes volatility from consecutive prices.
///
/// Daily volatility is the sample standard deviation (n - 1) of
/// `ln(p[i] / p[i-1])`; annual volatility scales it by `sqrt(252)`.
///
/// # Returns
/// * `Option<Volatility>` - `None` with fewer than two returns (three prices).
pub fn volatility(prices: &[f64]) -> Option<Volatility> {
    let returns: Vec<f64> = prices
        .windows(2)
        .map(|w| (w[1] / w[0]).ln())
        .filter(|r| r.is_finite())
        .collect();
    if returns.len() < 2 {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let daily = variance.sqrt();

    Some(Volatility {
        daily,
        annual: daily * TRADING_DAYS_PER_YEAR.sqrt(),
    })
}

/// Buckets prices into `bins` equal-width bins spanning `[min, max]`.
///
/// The last bin is closed on the right, so the maximum lands in it. When all
/// prices are equal every price falls in the first bin.
pub fn histogram(prices: &[f64], bins: usize) -> Option<Histogram> {
    if prices.is_empty() || bins == 0 {
        return None;
    }

    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut counts = vec![0usize; bins];

    if max == min {
        counts[0] = prices.len();
        return Some(Histogram {
            lower: min,
            width: 0.0,
            counts,
        });
    }

    let width = (max - min) / bins as f64;
    for &price in prices {
        let bin = (((price - min) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }

    Some(Histogram {
        lower: min,
        width,
        counts,
    })
}

/// Mean price per calendar year, in year order.
pub fn yearly_means<'a, I>(records: I) -> Vec<(i32, f64)>
where
    I: IntoIterator<Item = &'a series::HistoricalRecord>,
{
    let mut totals: std::collections::BTreeMap<i32, (f64, usize)> = std::collections::BTreeMap::new();
    for record in records {
        let entry = totals.entry(record.year).or_insert((0.0, 0));
        entry.0 += record.price;
        entry.1 += 1;
    }
    totals
        .into_iter()
        .map(|(year, (sum, n))| (year, sum / n as f64))
        .collect()
}
