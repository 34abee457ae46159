/// Parses a calendar date in the format `%Y-%m-%d`.
///
/// The source dataset is exported with a midnight time part on some rows
/// (e.g. "2021-06-01 00:00:00"), so a trailing `%H:%M:%S` is accepted and
/// discarded.
///
/// # Arguments
///
/// * `date_str` - A string slice such as "2021-06-01".
///
/// # Returns
///
/// * `anyhow::Result<chrono::NaiveDate>` - The parsed date, or an error if parsing fails.
///
/// # Examples
///
/// ```ignore
/// let date = parse_date("2021-06-01").unwrap();
/// assert_eq!(date.to_string(), "2021-06-01");
/// ```
pub fn parse_date(date_str: &str) -> anyhow::Result<chrono::NaiveDate> {
    let trimmed = date_str.trim();
    if let Ok(date) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return anyhow::Ok(date);
    }
    let dt = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| anyhow::anyhow!("Failed to parse date '{}': {}", trimmed, e))?;
    anyhow::Ok(dt.date())
}

/// Formats a price in US dollars with two decimals: "US$ 72.35".
pub fn format_usd(value: f64) -> String {
    format!("US$ {:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_plain_and_with_time() {
        let expected = chrono::NaiveDate::from_ymd_opt(2021, 6, 1).unwrap();
        assert_eq!(parse_date("2021-06-01").unwrap(), expected);
        assert_eq!(parse_date("2021-06-01 00:00:00").unwrap(), expected);
        assert_eq!(parse_date(" 2021-06-01 ").unwrap(), expected);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("01/06/2021").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(72.345678), "US$ 72.35");
        assert_eq!(format_usd(9.0), "US$ 9.00");
    }
}
