//! Cohort-normalised similarity scoring over player-season statistics. Partitions player-seasons
//! into cohorts (years of experience or age), converts raw statistics into per-cohort z-score
//! ("deviance") vectors, and reduces pairwise squared-difference scores across shared cohorts
//! into symmetric mean- and median-aggregated similarity matrices.

pub mod cohort;
pub mod config;
pub mod csv;
pub mod data;
pub mod deviance;
pub mod ensemble;
pub mod file;
pub mod linear;
pub mod lookup;
pub mod similarity;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;
