//! Ingestion of position files. A position file is a CSV export with one row per player per
//! season: a player identifier column, an integer cohort-key column and numeric statistic
//! columns. Schema problems are surfaced before any computation starts; missing statistic
//! values are preserved as distinct from zero.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::config::Profile;
use crate::csv::CsvReader;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("no header row")]
    MissingHeader,

    #[error("missing column {column}")]
    MissingColumn { column: String },

    #[error("row {row}: expected {expected} fields, got {got}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("row {row}: blank player identifier")]
    BlankPlayerId { row: usize },

    #[error("row {row}: unparseable cohort key {value:?}")]
    InvalidCohortKey { row: usize, value: String },

    #[error("row {row}, column {column}: unparseable numeric value {value:?}")]
    InvalidNumeric {
        row: usize,
        column: String,
        value: String,
    },
}

/// One year of one player's on-field record. `values` is aligned with the owning
/// [Frame]'s tracked-statistic list; [None] marks a missing observation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSeason {
    pub player: String,
    pub cohort: u32,
    pub values: Vec<Option<f64>>,
}

/// The complete input dataset for one position group, immutable once loaded.
#[derive(Debug, Clone)]
pub struct Frame {
    pub stats: Vec<String>,
    pub seasons: Vec<PlayerSeason>,
}
impl Frame {
    pub fn load(path: impl AsRef<Path>, profile: &Profile) -> Result<Frame, SchemaError> {
        let mut reader = CsvReader::open(path.as_ref())?;
        let header = match reader.next() {
            None => return Err(SchemaError::MissingHeader),
            Some(header) => header?,
        };
        let mut records = Vec::new();
        for record in reader {
            records.push(record?);
        }
        debug!(
            "read {} rows from {}",
            records.len(),
            path.as_ref().display()
        );
        Self::from_records(&header, &records, profile)
    }

    /// Assembles a frame from an already-split header and data rows. Split out from [Frame::load]
    /// so schema handling can be exercised without touching the filesystem.
    pub fn from_records(
        header: &[String],
        records: &[Vec<String>],
        profile: &Profile,
    ) -> Result<Frame, SchemaError> {
        let column_of = |column: &str| -> Result<usize, SchemaError> {
            header
                .iter()
                .position(|name| name == column)
                .ok_or_else(|| SchemaError::MissingColumn {
                    column: String::from(column),
                })
        };
        let player_col = column_of(&profile.player_column)?;
        let cohort_col = column_of(profile.cohort_key.column())?;
        let mut tracked_cols = Vec::with_capacity(profile.tracked.len());
        for stat in &profile.tracked {
            tracked_cols.push(column_of(stat)?);
        }
        // zero-fill columns must exist even when they are not tracked
        for column in &profile.zero_fill {
            column_of(column)?;
        }

        let mut seasons = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let row = index + 2; // 1-based, after the header
            if record.len() != header.len() {
                return Err(SchemaError::RaggedRow {
                    row,
                    expected: header.len(),
                    got: record.len(),
                });
            }
            let player = record[player_col].trim();
            if player.is_empty() {
                return Err(SchemaError::BlankPlayerId { row });
            }
            let cohort = parse_cohort(&record[cohort_col]).ok_or_else(|| {
                SchemaError::InvalidCohortKey {
                    row,
                    value: record[cohort_col].clone(),
                }
            })?;
            let mut values = Vec::with_capacity(tracked_cols.len());
            for (stat, &col) in profile.tracked.iter().zip(&tracked_cols) {
                let value = match parse_cell(&record[col]) {
                    Ok(value) => value,
                    Err(_) => {
                        return Err(SchemaError::InvalidNumeric {
                            row,
                            column: stat.clone(),
                            value: record[col].clone(),
                        })
                    }
                };
                let value = match value {
                    None if profile.zero_fills(stat) => Some(0.0),
                    other => other,
                };
                values.push(value);
            }
            seasons.push(PlayerSeason {
                player: String::from(player),
                cohort,
                values,
            });
        }
        Ok(Frame {
            stats: profile.tracked.clone(),
            seasons,
        })
    }
}

/// Parses a cohort key: a non-negative integer, tolerating the `3.0` float spelling that pandas
/// exports leave behind.
pub fn parse_cohort(value: &str) -> Option<u32> {
    let value = value.trim();
    if let Ok(int) = value.parse::<u32>() {
        return Some(int);
    }
    match value.parse::<f64>() {
        Ok(float) if float.is_finite() && float >= 0.0 && float.fract() == 0.0 => {
            Some(float as u32)
        }
        _ => None,
    }
}

/// Parses a statistic cell. Blank and `nan`-spelled cells are missing observations, never zero.
pub fn parse_cell(value: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    match value.parse::<f64>()? {
        float if float.is_nan() => Ok(None),
        float => Ok(Some(float)),
    }
}
