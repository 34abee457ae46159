mod cli;
mod config;
mod features;
mod gate;
mod logging;
mod model;
mod report;
mod series;
mod session;
mod stats;
mod utils;

/// Main entry point of the application.
///
/// This function orchestrates the entire workflow:
/// 1. Parses command-line arguments and initializes logging.
/// 2. Loads the historical series and the model once for the session.
/// 3. Prints the summary, histogram and yearly averages for the selected range.
/// 4. Runs the prediction for the selected date, if any.
///
/// A prediction that cannot be produced is reported as a message; the run
/// still succeeds.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Success or an error if loading fails.
fn main() -> anyhow::Result<()> {
    let total_start = std::time::Instant::now();
    let args = cli::Args::parse();
    logging::init_logging(logging::LoggingConfig::from_env())?;

    let config = config::DashboardConfig::from_args(args)?;
    tracing::debug!(?config, "Configuration resolved");

    let session = session::DashboardSession::load(&config)?;
    tracing::info!(
        elapsed_secs = total_start.elapsed().as_secs_f64(),
        "Session ready"
    );

    println!("Brent crude oil price dashboard");
    println!();

    match session.resolve_range(config.start, config.end) {
        Some((start, end)) => print_range_report(&session, start, end, config.bins),
        None => println!("⚠️ No records to report"),
    }

    println!("Prediction");
    match config.predict_date {
        Some(date) => {
            let result = session.predict(date);
            if let Err(e) = &result {
                tracing::warn!(date = %date, error = %e, "Prediction unavailable");
            }
            println!("{}", report::render_prediction(date, &result));
        }
        None => println!("{}", report::prediction_hint()),
    }

    Ok(())
}

fn print_range_report(
    session: &session::DashboardSession,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
    bins: usize,
) {
    let Some(summary) = session.summarize(start, end) else {
        println!("⚠️ No records between {} and {}", start, end);
        println!();
        return;
    };

    println!("📈 Big numbers");
    println!("{}", report::render_summary(&summary, session.volatility()));
    println!();

    if let Some(histogram) = session.histogram(start, end, bins) {
        println!("📊 Price frequency ({} bins)", bins);
        println!("{}", report::render_histogram(&histogram));
        println!();
    }

    println!("📅 Average price per year");
    println!("{}", report::render_yearly_means(&session.yearly_means(start, end)));
    println!();
}
