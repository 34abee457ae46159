use crate::gate;
use crate::stats;
use crate::utils;

/// Width of the longest histogram or yearly bar, in characters.
const BAR_WIDTH: usize = 40;

/// Renders the headline numbers of a range.
///
/// # Example Output
/// ```text
/// Period: 2020-01-02 to 2021-12-31 (510 records)
///  - Average price:        US$ 55.81
///  - Minimum price:        US$ 9.12
///  - Maximum price:        US$ 86.40
///  - Daily volatility:     0.0281
///  - Annual volatility:    0.4461
///  - Price change:         17.50%
/// ```
pub fn render_summary(
    summary: &stats::RangeSummary,
    volatility: Option<stats::Volatility>,
) -> String {
    let mut lines = vec![
        format!(
            "Period: {} to {} ({} records)",
            summary.start, summary.end, summary.count
        ),
        format!(" - Average price:        {}", utils::format_usd(summary.mean)),
        format!(" - Minimum price:        {}", utils::format_usd(summary.min)),
        format!(" - Maximum price:        {}", utils::format_usd(summary.max)),
    ];

    match volatility {
        Some(v) => {
            lines.push(format!(" - Daily volatility:     {:.4}", v.daily));
            lines.push(format!(" - Annual volatility:    {:.4}", v.annual));
        }
        None => lines.push(" - Volatility:           n/a (not enough prices)".to_string()),
    }

    match summary.percent_change {
        Some(change) => lines.push(format!(" - Price change:         {:.2}%", change)),
        None => lines.push(" - Price change:         n/a (start or end date has no record)".to_string()),
    }

    lines.join("\n")
}

/// Renders a histogram as one line per bin, scaled to the fullest bin.
pub fn render_histogram(histogram: &stats::Histogram) -> String {
    let peak = histogram.counts.iter().copied().max().unwrap_or(0).max(1);
    histogram
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let (lower, upper) = histogram.bin_edges(i);
            format!(
                "{:>8.2} - {:>8.2} | {:<width$} {}",
                lower,
                upper,
                "#".repeat(count * BAR_WIDTH / peak),
                count,
                width = BAR_WIDTH
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders yearly mean prices as horizontal bars.
pub fn render_yearly_means(means: &[(i32, f64)]) -> String {
    let peak = means.iter().map(|(_, m)| *m).fold(0.0, f64::max);
    means
        .iter()
        .map(|(year, mean)| {
            let len = if peak > 0.0 {
                (mean / peak * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            format!("{} | {:<width$} {}", year, "#".repeat(len), utils::format_usd(*mean), width = BAR_WIDTH)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the outcome of a prediction request.
pub fn render_prediction(date: chrono::NaiveDate, result: &gate::PredictionResult) -> String {
    match result {
        Ok(price) => format!(
            "The predicted price for {} is: {}",
            date,
            utils::format_usd(*price)
        ),
        Err(e) => format!("⚠️ {}", e),
    }
}

pub fn prediction_hint() -> &'static str {
    "Choose a date with --predict to get the next-day price prediction."
}
