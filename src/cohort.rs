//! Builds per-cohort statistic baselines. For every distinct cohort key observed in a [Frame],
//! computes the sample mean and sample standard deviation of each tracked statistic over the
//! seasons in that cohort. Missing observations are excluded from the sample rather than
//! treated as zero, so a statistic never reported in a cohort has an undefined mean, and a
//! statistic reported exactly once has an undefined standard deviation.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::data::Frame;
use crate::stats::SliceExt;

/// Mean/std baselines for one cohort, aligned with the originating frame's statistic list.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortStats {
    pub cohort: u32,
    pub mean: Vec<Option<f64>>,
    pub std: Vec<Option<f64>>,
}

/// All cohort baselines for one run, ordered by ascending cohort key.
#[derive(Debug, Clone)]
pub struct CohortStatsSet {
    cohorts: Vec<CohortStats>,
    by_key: FxHashMap<u32, usize>,
}
impl CohortStatsSet {
    /// Computes baselines for every cohort key present in `frame`. Exactly one entry per
    /// observed key; adjacent cohorts are never blended.
    pub fn build(frame: &Frame) -> Self {
        let mut season_indexes: FxHashMap<u32, Vec<usize>> = FxHashMap::default();
        for (index, season) in frame.seasons.iter().enumerate() {
            season_indexes.entry(season.cohort).or_default().push(index);
        }
        let mut keys: Vec<u32> = season_indexes.keys().copied().collect();
        keys.sort_unstable();

        let num_stats = frame.stats.len();
        let mut cohorts = Vec::with_capacity(keys.len());
        let mut by_key =
            FxHashMap::with_capacity_and_hasher(keys.len(), Default::default());
        let mut sample = Vec::new();
        for key in keys {
            let indexes = &season_indexes[&key];
            let mut mean = Vec::with_capacity(num_stats);
            let mut std = Vec::with_capacity(num_stats);
            for stat in 0..num_stats {
                sample.clear();
                sample.extend(
                    indexes
                        .iter()
                        .filter_map(|&index| frame.seasons[index].values[stat]),
                );
                mean.push(sample.mean());
                std.push(sample.sample_std());
            }
            debug!(
                "computed mean/std for cohort {key} over {} seasons",
                indexes.len()
            );
            by_key.insert(key, cohorts.len());
            cohorts.push(CohortStats {
                cohort: key,
                mean,
                std,
            });
        }
        Self { cohorts, by_key }
    }

    pub fn find(&self, cohort: u32) -> Option<&CohortStats> {
        self.by_key.get(&cohort).map(|&index| &self.cohorts[index])
    }

    pub fn cohorts(&self) -> &[CohortStats] {
        &self.cohorts
    }

    pub fn len(&self) -> usize {
        self.cohorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PlayerSeason;
    use crate::testing::{assert_opt_f64_relative, assert_slice_opt_f64_relative};

    fn season(player: &str, cohort: u32, values: Vec<Option<f64>>) -> PlayerSeason {
        PlayerSeason {
            player: String::from(player),
            cohort,
            values,
        }
    }

    fn frame(seasons: Vec<PlayerSeason>) -> Frame {
        Frame {
            stats: vec![String::from("yds")],
            seasons,
        }
    }

    #[test]
    fn one_entry_per_observed_cohort() {
        let frame = frame(vec![
            season("a", 0, vec![Some(100.0)]),
            season("b", 0, vec![Some(100.0)]),
            season("c", 3, vec![Some(300.0)]),
            season("a", 3, vec![Some(200.0)]),
        ]);
        let set = CohortStatsSet::build(&frame);
        assert_eq!(2, set.len());
        assert!(!set.is_empty());
        assert_eq!(vec![0, 3], set.cohorts().iter().map(|c| c.cohort).collect::<Vec<_>>());
        assert!(set.find(0).is_some());
        assert!(set.find(3).is_some());
        assert!(set.find(1).is_none());
    }

    #[test]
    fn mean_and_std_per_cohort() {
        let frame = frame(vec![
            season("a", 0, vec![Some(100.0)]),
            season("b", 0, vec![Some(100.0)]),
            season("c", 0, vec![Some(300.0)]),
        ]);
        let set = CohortStatsSet::build(&frame);
        let stats = set.find(0).unwrap();
        assert_slice_opt_f64_relative(&[Some(166.666_666_7)], &stats.mean, 1e-6);
        assert_slice_opt_f64_relative(&[Some(115.470_053_8)], &stats.std, 1e-6);
    }

    #[test]
    fn single_member_cohort_has_undefined_std() {
        let frame = frame(vec![season("a", 5, vec![Some(42.0)])]);
        let stats = CohortStatsSet::build(&frame);
        let cohort = stats.find(5).unwrap();
        assert_eq!(Some(42.0), cohort.mean[0]);
        assert_eq!(None, cohort.std[0]);
    }

    #[test]
    fn missing_observations_excluded_from_sample() {
        let frame = frame(vec![
            season("a", 0, vec![Some(100.0)]),
            season("b", 0, vec![None]),
            season("c", 0, vec![Some(300.0)]),
        ]);
        let stats = CohortStatsSet::build(&frame);
        let cohort = stats.find(0).unwrap();
        // the sample is {100, 300}, not {100, 0, 300}
        assert_opt_f64_relative(Some(200.0), cohort.mean[0], 1e-9);
        assert_opt_f64_relative(Some(141.421_356_2), cohort.std[0], 1e-6);
    }

    #[test]
    fn never_reported_statistic_is_undefined() {
        let frame = frame(vec![
            season("a", 0, vec![None]),
            season("b", 0, vec![None]),
        ]);
        let stats = CohortStatsSet::build(&frame);
        let cohort = stats.find(0).unwrap();
        assert_eq!(None, cohort.mean[0]);
        assert_eq!(None, cohort.std[0]);
    }

    #[test]
    fn determinism() {
        let frame = frame(vec![
            season("a", 2, vec![Some(10.0)]),
            season("b", 0, vec![Some(20.0)]),
            season("c", 2, vec![Some(30.0)]),
            season("d", 1, vec![Some(40.0)]),
        ]);
        let first = CohortStatsSet::build(&frame);
        let second = CohortStatsSet::build(&frame);
        assert_eq!(first.cohorts(), second.cohorts());
    }
}
