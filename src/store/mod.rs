//! Durable per-fund history storage
//!
//! One plain-text file per fund code, one `date,price,amount` line per
//! observation, lines in series order (oldest first). Saves replace the
//! whole file atomically so a reader never sees a half-written record.

use crate::core::series::{Observation, Series};
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformed record in {path} line {line}: {reason}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("failed to read history for {code}")]
    Read {
        code: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write history for {code}")]
    Write {
        code: String,
        #[source]
        source: std::io::Error,
    },
}

pub struct SeriesStore {
    dir: PathBuf,
}

impl SeriesStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SeriesStore { dir: dir.into() }
    }

    pub fn record_path(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{code}.txt"))
    }

    /// Reads a fund's full history. A missing file is an empty series; a
    /// line that does not parse fails the whole load rather than silently
    /// dropping data.
    pub fn load(&self, code: &str) -> Result<Series, StoreError> {
        let path = self.record_path(code);
        if !path.exists() {
            debug!("No history file for {}, starting empty", code);
            return Ok(Series::new());
        }

        let contents = fs::read_to_string(&path).map_err(|source| StoreError::Read {
            code: code.to_string(),
            source,
        })?;

        let mut observations = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let observation =
                parse_record(line).map_err(|reason| StoreError::MalformedRecord {
                    path: path.clone(),
                    line: index + 1,
                    reason,
                })?;
            observations.push(observation);
        }

        debug!("Loaded {} observations for {}", observations.len(), code);
        Ok(Series::from_observations(observations))
    }

    /// Writes a fund's full history, atomically replacing any prior file.
    /// On failure the prior file is left intact.
    pub fn save(&self, code: &str, series: &Series) -> Result<(), StoreError> {
        let to_write_err = |source| StoreError::Write {
            code: code.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(to_write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(to_write_err)?;
        for obs in series.observations() {
            writeln!(
                tmp,
                "{},{},{}",
                obs.date.format("%Y-%m-%d"),
                obs.price,
                obs.amount
            )
            .map_err(to_write_err)?;
        }

        tmp.persist(self.record_path(code))
            .map_err(|e| to_write_err(e.error))?;

        debug!("Saved {} observations for {}", series.len(), code);
        Ok(())
    }
}

fn parse_record(line: &str) -> Result<Observation, String> {
    let fields: Vec<&str> = line.split(',').collect();
    let [date, price, amount] = fields.as_slice() else {
        return Err(format!("expected 3 fields, found {}", fields.len()));
    };

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{date}': {e}"))?;
    let price: f64 = price
        .parse()
        .map_err(|e| format!("invalid price '{price}': {e}"))?;
    let amount: f64 = amount
        .parse()
        .map_err(|e| format!("invalid amount '{amount}': {e}"))?;

    Ok(Observation::new(date, price, amount))
}
