//! Converts raw player-seasons into deviance vectors: each tracked statistic expressed as the
//! number of sample standard deviations separating the season from its cohort baseline.

use thiserror::Error;
use tracing::debug;

use crate::cohort::CohortStatsSet;
use crate::data::Frame;

const PROGRESS_INTERVAL: usize = 100;

#[derive(Debug, Error, PartialEq)]
pub enum DevianceError {
    /// A season's cohort key has no baseline. [CohortStatsSet::build] guarantees one entry per
    /// observed key, so hitting this means the stats were built from a different frame.
    #[error("no cohort statistics for cohort {cohort} (player {player})")]
    UnmatchedCohort { player: String, cohort: u32 },
}

/// Normalised deviations for one player-season, aligned with the originating frame's statistic
/// list. [None] marks a deviance that could not be defined: either the raw observation or the
/// cohort's standard deviation was missing.
#[derive(Debug, Clone, PartialEq)]
pub struct DevianceVector {
    pub player: String,
    pub cohort: u32,
    pub devs: Vec<Option<f64>>,
}

/// Produces exactly one [DevianceVector] per season in `frame`. For each tracked statistic:
/// undefined if the raw value or the cohort std is undefined; exactly `0.0` when the raw value
/// equals the cohort mean (sidestepping `0/0` when the std is also zero); otherwise
/// `(raw - mean) / std`.
pub fn transform(
    frame: &Frame,
    stats: &CohortStatsSet,
) -> Result<Vec<DevianceVector>, DevianceError> {
    let mut vectors = Vec::with_capacity(frame.seasons.len());
    for (index, season) in frame.seasons.iter().enumerate() {
        let cohort = stats
            .find(season.cohort)
            .ok_or_else(|| DevianceError::UnmatchedCohort {
                player: season.player.clone(),
                cohort: season.cohort,
            })?;
        let devs = season
            .values
            .iter()
            .enumerate()
            .map(|(stat, &raw)| {
                let raw = raw?;
                let std = cohort.std[stat]?;
                let mean = cohort.mean[stat]?;
                let diff = raw - mean;
                if diff == 0.0 {
                    Some(0.0)
                } else {
                    Some(diff / std)
                }
            })
            .collect();
        vectors.push(DevianceVector {
            player: season.player.clone(),
            cohort: season.cohort,
            devs,
        });
        if index % PROGRESS_INTERVAL == 0 {
            debug!("transformed {index} of {} seasons", frame.seasons.len());
        }
    }
    Ok(vectors)
}
