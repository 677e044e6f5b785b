//! Pairwise similarity scoring and aggregation. Within each cohort, every pair of deviance
//! vectors is scored as `100 - Σ (dev_a - dev_b)²` over the statistics defined for both; each
//! unordered pair of distinct players then has its per-cohort scores reduced to a mean and a
//! median across every cohort the two players share.
//!
//! The `100 - Σd²` transform is inherited from the legacy scoring runs and preserved verbatim
//! for output compatibility. It is not a metric: it falls as dissimilarity grows, is unbounded
//! below, and is not normalised by the number of compared statistics.

use std::io;
use std::path::Path;

use rustc_hash::FxHashMap;
use strum_macros::{Display, EnumIter};
use thiserror::Error;
use tracing::debug;

use crate::csv::{CsvWriter, Record};
use crate::deviance::DevianceVector;
use crate::linear::Matrix;
use crate::lookup::PlayerIndex;
use crate::stats::SliceExt;


#[derive(Debug, Error, PartialEq)]
pub enum SimilarityError {
    /// A pair bucket with no scores reached the reducer. Buckets are only created when a score
    /// exists, so this indicates corruption, not bad input.
    #[error("no scores collected for pair {a} and {b}")]
    EmptyScores { a: String, b: String },
}

/// Which reduction populated a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Aggregate {
    Mean,
    Median,
}

/// Symmetric player-by-player similarity grids for one position group. Cells are [None] on the
/// diagonal and for pairs that never shared a cohort.
#[derive(Debug)]
pub struct SimilarityMatrix {
    pub players: PlayerIndex,
    mean: Matrix<Option<f64>>,
    median: Matrix<Option<f64>>,
}
impl SimilarityMatrix {
    /// Aggregates deviance vectors into the final similarity grids.
    pub fn aggregate(vectors: &[DevianceVector]) -> Result<Self, SimilarityError> {
        let mut players = PlayerIndex::with_capacity(vectors.len());
        let mut ordinals = Vec::with_capacity(vectors.len());
        let mut cohort_members: FxHashMap<u32, Vec<usize>> = FxHashMap::default();
        for (index, vector) in vectors.iter().enumerate() {
            ordinals.push(players.intern(&vector.player));
            cohort_members
                .entry(vector.cohort)
                .or_default()
                .push(index);
        }
        let mut cohorts: Vec<u32> = cohort_members.keys().copied().collect();
        cohorts.sort_unstable();

        // unordered pair of player ordinals (low, high) -> scores from shared cohorts
        let mut buckets: FxHashMap<(usize, usize), Vec<f64>> = FxHashMap::default();
        for cohort in cohorts {
            let members = &cohort_members[&cohort];
            for (offset, &a) in members.iter().enumerate() {
                for &b in &members[offset + 1..] {
                    let player_a = ordinals[a];
                    let player_b = ordinals[b];
                    if player_a == player_b {
                        // self-pairs carry no information
                        continue;
                    }
                    if let Some(score) = pair_score(&vectors[a].devs, &vectors[b].devs) {
                        let key = (player_a.min(player_b), player_a.max(player_b));
                        buckets.entry(key).or_default().push(score);
                    }
                }
            }
            debug!(
                "scored cohort {cohort} ({} seasons, {} pair buckets so far)",
                members.len(),
                buckets.len()
            );
        }

        let mut mean = Matrix::filled(players.len(), players.len(), None);
        let mut median = Matrix::filled(players.len(), players.len(), None);
        for ((a, b), scores) in buckets {
            let empty_scores = || SimilarityError::EmptyScores {
                a: String::from(&players[a]),
                b: String::from(&players[b]),
            };
            let score_mean = scores.mean().ok_or_else(empty_scores)?;
            let score_median = scores.median().ok_or_else(empty_scores)?;
            mean[(a, b)] = Some(score_mean);
            mean[(b, a)] = Some(score_mean);
            median[(a, b)] = Some(score_median);
            median[(b, a)] = Some(score_median);
        }
        Ok(Self {
            players,
            mean,
            median,
        })
    }

    pub fn grid(&self, aggregate: Aggregate) -> &Matrix<Option<f64>> {
        match aggregate {
            Aggregate::Mean => &self.mean,
            Aggregate::Median => &self.median,
        }
    }

    pub fn entry(&self, a: &str, b: &str, aggregate: Aggregate) -> Option<f64> {
        let a = self.players.ordinal_of(a)?;
        let b = self.players.ordinal_of(b)?;
        self.grid(aggregate)[(a, b)]
    }

    /// Renders one grid as CSV records: a header of player ids, then one row per player with
    /// its id in the leading cell and blanks for undefined entries.
    pub fn to_records(&self, aggregate: Aggregate) -> Vec<Record> {
        let grid = self.grid(aggregate);
        let mut records = Vec::with_capacity(self.players.len() + 1);
        let mut header = Record::with_capacity(self.players.len() + 1);
        for (ordinal, id) in self.players.ids().iter().enumerate() {
            header.set(ordinal + 1, id);
        }
        records.push(header);
        for row in 0..grid.rows() {
            let mut record = Record::with_capacity(self.players.len() + 1);
            record.set(0usize, &self.players[row]);
            for (col, cell) in grid.row_slice(row).iter().enumerate() {
                if let Some(score) = cell {
                    record.set(col + 1, score);
                }
            }
            records.push(record);
        }
        records
    }

    pub fn write_csv(&self, aggregate: Aggregate, path: impl AsRef<Path>) -> Result<(), io::Error> {
        let mut writer = CsvWriter::create(path)?;
        for record in self.to_records(aggregate) {
            writer.append(record)?;
        }
        writer.flush()
    }
}

/// Scores one pair of deviance vectors: `100 - Σ (a - b)²` over statistics defined for both,
/// or [None] when no statistic is comparable.
pub fn pair_score(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    debug_assert_eq!(
        a.len(),
        b.len(),
        "deviance vectors of unequal length: {} ≠ {}",
        a.len(),
        b.len()
    );
    let mut sum_sq = 0.0;
    let mut compared = 0;
    for (a, b) in a.iter().zip(b) {
        if let (Some(a), Some(b)) = (a, b) {
            sum_sq += (a - b).powi(2);
            compared += 1;
        }
    }
    match compared {
        0 => None,
        _ => Some(100.0 - sum_sq),
    }
}
