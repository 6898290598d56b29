//! Delimited-file input and output.

mod loader;
mod writer;

pub use loader::{load_series, parse_timestamp, read_series};
pub use writer::{read_forecast, write_forecast, write_search_table, SEARCH_TABLE_HEADER};

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Layout shared by the input series file and the forecast output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvFormat {
    pub timestamp_column: String,
    /// `chrono` format string; timestamps without an offset are read as UTC.
    pub timestamp_format: String,
    pub delimiter: char,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            timestamp_column: "start_date".to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S".to_string(),
            delimiter: ',',
        }
    }
}

impl CsvFormat {
    pub(crate) fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ForecastError::Config(format!(
                "delimiter '{}' is not a single ASCII character",
                self.delimiter
            )))
        }
    }
}
