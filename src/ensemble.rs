//! Cell-wise averaging of similarity grids produced by separate runs. Inputs must agree
//! exactly on shape and player ordering; anything else is rejected rather than silently
//! misaligned.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::csv::{CsvReader, CsvWriter, Record};
use crate::data::parse_cell;
use crate::linear::Matrix;
use crate::lookup::{DuplicateId, PlayerIndex};

#[derive(Debug, Error)]
pub enum EnsembleError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("no grids to combine")]
    NoGrids,

    #[error("no header row")]
    MissingHeader,

    #[error("{0}")]
    DuplicateId(#[from] DuplicateId),

    #[error("row {row}: expected {expected} fields, got {got}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("row {row}: label {label:?} does not match header entry {header:?}")]
    LabelMismatch {
        row: usize,
        label: String,
        header: String,
    },

    #[error("expected {expected} rows, got {got}")]
    NotSquare { expected: usize, got: usize },

    #[error("row {row}, column {column}: unparseable score {value:?}")]
    InvalidScore {
        row: usize,
        column: String,
        value: String,
    },

    #[error("grid shapes differ: {expected} players vs {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("player index differs at ordinal {ordinal}: {expected:?} vs {got:?}")]
    IndexMismatch {
        ordinal: usize,
        expected: String,
        got: String,
    },
}

/// One square similarity grid with its player index, as read back from a matrix CSV.
#[derive(Debug)]
pub struct ScoreGrid {
    pub players: PlayerIndex,
    pub cells: Matrix<Option<f64>>,
}
impl ScoreGrid {
    pub fn read_csv(path: impl AsRef<Path>) -> Result<ScoreGrid, EnsembleError> {
        let mut reader = CsvReader::open(path.as_ref())?;
        let header = match reader.next() {
            None => return Err(EnsembleError::MissingHeader),
            Some(header) => header?,
        };
        let mut rows = Vec::new();
        for row in reader {
            rows.push(row?);
        }
        debug!(
            "read {}x{} grid from {}",
            rows.len(),
            header.len().saturating_sub(1),
            path.as_ref().display()
        );
        Self::from_records(&header, &rows)
    }

    /// Parses a grid from an already-split header (leading cell blank, then player ids) and data
    /// rows (leading cell the row's player id). Row labels must repeat the header ids in order.
    pub fn from_records(
        header: &[String],
        rows: &[Vec<String>],
    ) -> Result<ScoreGrid, EnsembleError> {
        if header.is_empty() {
            return Err(EnsembleError::MissingHeader);
        }
        let ids = &header[1..];
        let players = PlayerIndex::from_unique(ids)?;
        if rows.len() != players.len() {
            return Err(EnsembleError::NotSquare {
                expected: players.len(),
                got: rows.len(),
            });
        }
        let mut cells = Matrix::filled(players.len(), players.len(), None);
        for (index, row) in rows.iter().enumerate() {
            let row_number = index + 2;
            if row.len() != header.len() {
                return Err(EnsembleError::RaggedRow {
                    row: row_number,
                    expected: header.len(),
                    got: row.len(),
                });
            }
            if row[0] != ids[index] {
                return Err(EnsembleError::LabelMismatch {
                    row: row_number,
                    label: row[0].clone(),
                    header: ids[index].clone(),
                });
            }
            for (col, value) in row[1..].iter().enumerate() {
                let score = parse_cell(value).map_err(|_| EnsembleError::InvalidScore {
                    row: row_number,
                    column: ids[col].clone(),
                    value: value.clone(),
                })?;
                cells[(index, col)] = score;
            }
        }
        Ok(ScoreGrid { players, cells })
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), io::Error> {
        let mut writer = CsvWriter::create(path)?;
        let len = self.players.len();
        let mut header = Record::with_capacity(len + 1);
        for (ordinal, id) in self.players.ids().iter().enumerate() {
            header.set(ordinal + 1, id);
        }
        writer.append(header)?;
        for row in 0..len {
            let mut record = Record::with_capacity(len + 1);
            record.set(0usize, &self.players[row]);
            for (col, cell) in self.cells.row_slice(row).iter().enumerate() {
                if let Some(score) = cell {
                    record.set(col + 1, score);
                }
            }
            writer.append(record)?;
        }
        writer.flush()
    }
}

/// Averages identically-indexed grids cell by cell. A cell undefined in every input stays
/// undefined; otherwise it becomes the mean of the defined values.
pub fn average(grids: &[ScoreGrid]) -> Result<ScoreGrid, EnsembleError> {
    let first = grids.first().ok_or(EnsembleError::NoGrids)?;
    for grid in &grids[1..] {
        if grid.players.len() != first.players.len() {
            return Err(EnsembleError::ShapeMismatch {
                expected: first.players.len(),
                got: grid.players.len(),
            });
        }
        for (ordinal, id) in first.players.ids().iter().enumerate() {
            let other = &grid.players[ordinal];
            if other != id.as_str() {
                return Err(EnsembleError::IndexMismatch {
                    ordinal,
                    expected: id.clone(),
                    got: String::from(other),
                });
            }
        }
    }

    let len = first.players.len();
    let mut cells = Matrix::filled(len, len, None);
    for row in 0..len {
        for col in 0..len {
            let mut sum = 0.0;
            let mut count = 0usize;
            for grid in grids {
                if let Some(score) = grid.cells[(row, col)] {
                    sum += score;
                    count += 1;
                }
            }
            if count > 0 {
                cells[(row, col)] = Some(sum / count as f64);
            }
        }
    }
    Ok(ScoreGrid {
        players: first.players.clone(),
        cells,
    })
}
