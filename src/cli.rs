use crate::utils;

/// Structure representing command-line arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub data: Option<std::path::PathBuf>,
    pub model: Option<std::path::PathBuf>,
    pub start: Option<chrono::NaiveDate>,
    pub end: Option<chrono::NaiveDate>,
    pub predict: Option<chrono::NaiveDate>,
    pub bins: usize,
    pub derive_features: bool,
}

/// Default number of histogram bins.
pub const DEFAULT_BINS: usize = 30;

/// Command-line arguments parser using Clap.
///
/// Supports data/model paths, the date filter, the prediction date and
/// histogram resolution, with validation of dates and bin counts.
impl Args {
    /// Parses command-line arguments using `clap`.
    ///
    /// # Returns
    /// * `Args` - Struct containing parsed arguments.
    ///
    /// # Errors
    /// * Exits with a usage message if an argument is invalid.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    /// Parses arguments from an explicit iterator; the first item is the binary name.
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = command().try_get_matches_from(itr)?;
        Ok(Self::from_matches(&matches))
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        Args {
            data: matches.get_one::<String>("data").map(std::path::PathBuf::from),
            model: matches.get_one::<String>("model").map(std::path::PathBuf::from),
            start: matches.get_one::<chrono::NaiveDate>("start").copied(),
            end: matches.get_one::<chrono::NaiveDate>("end").copied(),
            predict: matches.get_one::<chrono::NaiveDate>("predict").copied(),
            bins: matches
                .get_one::<usize>("bins")
                .copied()
                .unwrap_or(DEFAULT_BINS),
            derive_features: matches.get_flag("derive-features"),
        }
    }
}

fn command() -> clap::Command {
    clap::Command::new("brent_dashboard")
        .version("0.1.0")
        .about("Brent crude oil price dashboard with next-day price prediction")
        .arg(
            clap::Arg::new("data")
                .short('d')
                .long("data")
                .help("Path to the historical prices CSV (default: $BRENT_DATA_PATH or df_limpo.csv)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
            .short('m')
            .long("model")
            .help("Path to the model artifact, .json or .bin (default: $BRENT_MODEL_PATH)")
            .num_args(1),
        )
        .arg(
            clap::Arg::new("start")
            .short('s')
            .long("start")
            .help("First date of the report range, YYYY-MM-DD (default: first date in the data)")
            .num_args(1)
            .value_parser(clap::builder::ValueParser::new(parse_date_arg)),
        )
        .arg(
            clap::Arg::new("end")
            .short('e')
            .long("end")
            .help("Last date of the report range, YYYY-MM-DD (default: last date in the data)")
            .num_args(1)
            .value_parser(clap::builder::ValueParser::new(parse_date_arg)),
        )
        .arg(
            clap::Arg::new("predict")
            .short('p')
            .long("predict")
            .help("Predict the next-day price from the record of this date, YYYY-MM-DD")
            .num_args(1)
            .value_parser(clap::builder::ValueParser::new(parse_date_arg)),
        )
        .arg(
            clap::Arg::new("bins")
            .short('b')
            .long("bins")
            .help("Number of histogram bins (default: 30)")
            .num_args(1)
            .value_parser(clap::builder::ValueParser::new(parse_usize_positive)),
        )
        .arg(
            clap::Arg::new("derive-features")
            .long("derive-features")
            .help("Recompute lag, rolling mean and weekday columns from prices")
            .required(false)
            .action(clap::ArgAction::SetTrue),
        )
}

/// Validates that a count is a positive integer.
///
/// # Arguments
/// * `s` - String representation of the number.
///
/// # Returns
/// * `Result<usize>` - Validated number.
fn parse_usize_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Must be a positive integer".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("Not a valid number: {}", e)),
    }
}

fn parse_date_arg(s: &str) -> Result<chrono::NaiveDate, String> {
    utils::parse_date(s).map_err(|e| e.to_string())
}
