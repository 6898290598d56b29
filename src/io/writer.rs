//! Forecast and search-table writers.
//!
//! Output goes to a temporary sibling file that is renamed over the target
//! once complete, so a target path is either fully written or untouched.

use crate::core::ForecastSeries;
use crate::error::{ForecastError, Result};
use crate::io::loader::parse_timestamp;
use crate::io::CsvFormat;
use crate::search::SearchTable;
use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Header of the search diagnostics table; the first column is the grid index.
pub const SEARCH_TABLE_HEADER: [&str; 9] = ["", "p", "d", "q", "P", "D", "Q", "MAE", "RMSE"];

const MISSING: &str = "NA";

fn format_value(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        MISSING.to_string()
    }
}

fn write_atomically<F>(path: &Path, delimiter: u8, fill: F) -> Result<()>
where
    F: FnOnce(&mut csv::Writer<&mut File>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(tmp.as_file_mut());
        fill(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Write `forecast` as `<timestamp column>,<label>` rows.
pub fn write_forecast(forecast: &ForecastSeries, path: &Path, format: &CsvFormat) -> Result<()> {
    write_atomically(path, format.delimiter_byte()?, |writer| {
        writer.write_record([format.timestamp_column.as_str(), forecast.label()])?;
        for (timestamp, value) in forecast.iter() {
            writer.write_record([
                timestamp.format(&format.timestamp_format).to_string(),
                format_value(value),
            ])?;
        }
        Ok(())
    })?;
    info!(path = %path.display(), rows = forecast.len(), "wrote forecast");
    Ok(())
}

/// Read a forecast file written by [`write_forecast`].
///
/// The value column header becomes the label; `NA` cells read as NaN.
pub fn read_forecast(path: &Path, format: &CsvFormat) -> Result<ForecastSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter_byte()?)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    if headers.len() != 2 || &headers[0] != format.timestamp_column.as_str() {
        return Err(ForecastError::Parse {
            line: 1,
            message: format!(
                "expected header '{},<label>', got {} columns",
                format.timestamp_column,
                headers.len()
            ),
        });
    }
    let label = headers[1].to_string();

    let mut timestamps = Vec::new();
    let mut values = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let line = idx + 2;
        let record = record?;
        let timestamp = parse_timestamp(&record[0], &format.timestamp_format).ok_or_else(|| {
            ForecastError::Parse {
                line,
                message: format!("timestamp '{}' does not match format", &record[0]),
            }
        })?;
        let value = if &record[1] == MISSING {
            f64::NAN
        } else {
            record[1].parse::<f64>().map_err(|_| ForecastError::Parse {
                line,
                message: format!("value '{}' is not numeric", &record[1]),
            })?
        };
        timestamps.push(timestamp);
        values.push(value);
    }

    ForecastSeries::new(label, timestamps, values)
}

/// Write the ranked search table with `NA` for undefined scores.
pub fn write_search_table(table: &SearchTable, path: &Path) -> Result<()> {
    write_atomically(path, b',', |writer| {
        writer.write_record(SEARCH_TABLE_HEADER)?;
        for row in table.iter() {
            let o = row.order;
            writer.write_record([
                row.index.to_string(),
                o.p.to_string(),
                o.d.to_string(),
                o.q.to_string(),
                o.cap_p.to_string(),
                o.cap_d.to_string(),
                o.cap_q.to_string(),
                format_value(row.outcome.mae().unwrap_or(f64::NAN)),
                format_value(row.outcome.rmse().unwrap_or(f64::NAN)),
            ])?;
        }
        Ok(())
    })?;
    info!(path = %path.display(), rows = table.len(), "wrote search table");
    Ok(())
}
