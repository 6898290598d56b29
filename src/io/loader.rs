//! Series loader for timestamped delimited files.

use crate::core::Series;
use crate::error::{ForecastError, Result};
use crate::io::CsvFormat;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Parse `text` with `format` into a UTC timestamp.
///
/// Formats without an offset are taken as UTC. Date-only formats map to
/// midnight. Formats carrying `%z` are converted to UTC.
pub fn parse_timestamp(text: &str, format: &str) -> Option<DateTime<Utc>> {
    if let Ok(with_offset) = DateTime::parse_from_str(text, format) {
        return Some(with_offset.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Load the `value_column` of the file at `path` as a series.
pub fn load_series(
    path: &Path,
    format: &CsvFormat,
    value_column: &str,
    period: usize,
) -> Result<Series> {
    let file = File::open(path)?;
    let series = read_series(file, format, value_column, period)?;
    info!(
        path = %path.display(),
        observations = series.len(),
        "loaded series"
    );
    Ok(series)
}

/// Read a series from any delimited source.
///
/// Any unparsable timestamp or non-numeric value fails the whole load with
/// [`ForecastError::Parse`] carrying the 1-based line number.
pub fn read_series<R: Read>(
    reader: R,
    format: &CsvFormat,
    value_column: &str,
    period: usize,
) -> Result<Series> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter_byte()?)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ForecastError::Parse {
                line: 1,
                message: format!("missing column '{}'", name),
            })
    };
    let ts_index = column(&format.timestamp_column)?;
    let value_index = column(value_column)?;

    let mut timestamps = Vec::new();
    let mut values = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let line = idx + 2;
        let record = record?;

        let ts_text = record.get(ts_index).unwrap_or_default();
        let timestamp =
            parse_timestamp(ts_text, &format.timestamp_format).ok_or_else(|| ForecastError::Parse {
                line,
                message: format!(
                    "timestamp '{}' does not match format '{}'",
                    ts_text, format.timestamp_format
                ),
            })?;

        let value_text = record.get(value_index).unwrap_or_default();
        let value = value_text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ForecastError::Parse {
                line,
                message: format!("value '{}' in column '{}' is not numeric", value_text, value_column),
            })?;

        timestamps.push(timestamp);
        values.push(value);
    }

    if values.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    Series::new(timestamps, values, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, TimeZone, Timelike};

    const SAMPLE: &str = "start_date,Imbalance,other\n\
        2020-01-01 00:00:00,12.5,x\n\
        2020-01-01 00:30:00,-3.25,y\n\
        2020-01-01 01:00:00,7,z\n";

    #[test]
    fn reads_half_hourly_series() {
        let series = read_series(SAMPLE.as_bytes(), &CsvFormat::default(), "Imbalance", 48).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), &[12.5, -3.25, 7.0]);
        assert_eq!(series.interval(), Duration::minutes(30));
        assert_eq!(
            series.timestamps()[1],
            Utc.with_ymd_and_hms(2020, 1, 1, 0, 30, 0).unwrap()
        );

        let start = series.start().unwrap();
        assert_eq!(start.year, 2020);
        assert_eq!(start.day_of_year, 1);
        assert_eq!(start.slot, 0);
    }

    #[test]
    fn bad_timestamp_reports_line() {
        let text = "start_date,Imbalance\n2020-01-01 00:00:00,1\n2020-13-01 00:30:00,2\n";
        let err = read_series(text.as_bytes(), &CsvFormat::default(), "Imbalance", 48).unwrap_err();
        assert!(matches!(err, ForecastError::Parse { line: 3, .. }));
    }

    #[test]
    fn non_numeric_value_fails() {
        let text = "start_date,Imbalance\n2020-01-01 00:00:00,abc\n";
        let err = read_series(text.as_bytes(), &CsvFormat::default(), "Imbalance", 48).unwrap_err();
        assert!(matches!(err, ForecastError::Parse { line: 2, .. }));

        let empty = "start_date,Imbalance\n2020-01-01 00:00:00,\n";
        assert!(read_series(empty.as_bytes(), &CsvFormat::default(), "Imbalance", 48).is_err());
    }

    #[test]
    fn missing_column_fails() {
        let err = read_series(SAMPLE.as_bytes(), &CsvFormat::default(), "Load", 48).unwrap_err();
        assert!(matches!(err, ForecastError::Parse { line: 1, .. }));
    }

    #[test]
    fn custom_delimiter_and_format() {
        let format = CsvFormat {
            timestamp_column: "ts".to_string(),
            timestamp_format: "%d/%m/%Y %H:%M".to_string(),
            delimiter: ';',
        };
        let text = "ts;v\n31/12/2019 23:30;1.5\n01/01/2020 00:00;2.5\n";
        let series = read_series(text.as_bytes(), &format, "v", 48).unwrap();
        assert_eq!(series.timestamps()[0].year(), 2019);
        assert_eq!(series.timestamps()[0].minute(), 30);
        assert_eq!(series.values(), &[1.5, 2.5]);
    }

    #[test]
    fn offsets_are_normalised_to_utc() {
        let ts = parse_timestamp("2020-06-01 02:00:00 +0200", "%Y-%m-%d %H:%M:%S %z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap());
        let day = parse_timestamp("2020-06-01", "%Y-%m-%d").unwrap();
        assert_eq!(day.hour(), 0);
    }

    #[test]
    fn unordered_timestamps_are_rejected() {
        let text = "start_date,Imbalance\n2020-01-01 01:00:00,1\n2020-01-01 00:30:00,2\n";
        let err = read_series(text.as_bytes(), &CsvFormat::default(), "Imbalance", 48).unwrap_err();
        assert!(matches!(err, ForecastError::TimestampError(_)));
    }

    #[test]
    fn header_only_is_empty() {
        let err = read_series("start_date,Imbalance\n".as_bytes(), &CsvFormat::default(), "Imbalance", 48)
            .unwrap_err();
        assert!(matches!(err, ForecastError::EmptyData));
    }
}
