//! Run configuration. A [Profile] declares, per position group, exactly which columns feed the
//! pipeline: the player identifier, the cohort key and the tracked statistics. It replaces the
//! prefix-sniffing and working-directory juggling of the legacy scripts with declarative,
//! path-explicit state that is validated against the input schema before any computation runs.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::similarity::Aggregate;

/// The attribute used to partition player-seasons into comparable groups. Rookies are compared
/// with rookies (or 23-year-olds with 23-year-olds) regardless of calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
pub enum CohortKey {
    #[strum(serialize = "years_exp")]
    YearsExp,

    #[strum(serialize = "age")]
    Age,
}
impl CohortKey {
    /// Name of the input column holding the key.
    pub fn column(&self) -> &'static str {
        match self {
            CohortKey::YearsExp => "years_exp",
            CohortKey::Age => "age",
        }
    }

    /// Short tag embedded in output filenames.
    pub fn file_tag(&self) -> &'static str {
        match self {
            CohortKey::YearsExp => "exp",
            CohortKey::Age => "age",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
}
impl Position {
    /// Conventional name of the position's player-season file.
    pub fn data_filename(&self) -> String {
        format!("{self}.csv")
    }

    /// Conventional name of a similarity-matrix output file, e.g.
    /// `WIDE_RECEIVER_exp_similarity_scores_mean.csv`.
    pub fn similarity_filename(&self, key: CohortKey, aggregate: Aggregate) -> String {
        format!(
            "{self}_{}_similarity_scores_{aggregate}.csv",
            key.file_tag()
        )
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("no tracked statistics declared")]
    EmptyTracked,

    #[error("statistic {0} declared more than once")]
    DuplicateTracked(String),
}

fn default_player_column() -> String {
    String::from("url")
}

/// Declarative description of one computational run over a position file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Column holding the stable player identifier.
    #[serde(default = "default_player_column")]
    pub player_column: String,

    pub cohort_key: CohortKey,

    /// Exact names of the statistic columns fed into the deviance computation.
    pub tracked: Vec<String>,

    /// Columns whose missing values are replaced with `0.0` before selection. Everything else
    /// keeps its missing marker.
    #[serde(default)]
    pub zero_fill: Vec<String>,
}
impl Profile {
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.tracked.is_empty() {
            return Err(ProfileError::EmptyTracked);
        }
        for (index, stat) in self.tracked.iter().enumerate() {
            if self.tracked[..index].contains(stat) {
                return Err(ProfileError::DuplicateTracked(stat.clone()));
            }
        }
        Ok(())
    }

    /// Whether missing values of `stat` are zero-filled rather than propagated as undefined.
    pub fn zero_fills(&self, stat: &str) -> bool {
        self.zero_fill.iter().any(|column| column == stat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn profile(tracked: &[&str]) -> Profile {
        Profile {
            player_column: default_player_column(),
            cohort_key: CohortKey::YearsExp,
            tracked: tracked.iter().map(ToString::to_string).collect(),
            zero_fill: vec![],
        }
    }

    #[test]
    fn cohort_key_columns() {
        assert_eq!("years_exp", CohortKey::YearsExp.column());
        assert_eq!("age", CohortKey::Age.column());
        assert_eq!("exp", CohortKey::YearsExp.file_tag());
    }

    #[test]
    fn position_display_and_parse() {
        assert_eq!("WIDE_RECEIVER", Position::WideReceiver.to_string());
        assert_eq!(
            Position::TightEnd,
            Position::from_str("TIGHT_END").unwrap()
        );
        assert_eq!("QUARTERBACK.csv", Position::Quarterback.data_filename());
    }

    #[test]
    fn similarity_filenames() {
        assert_eq!(
            "WIDE_RECEIVER_exp_similarity_scores_mean.csv",
            Position::WideReceiver.similarity_filename(CohortKey::YearsExp, Aggregate::Mean)
        );
        assert_eq!(
            "RUNNING_BACK_age_similarity_scores_median.csv",
            Position::RunningBack.similarity_filename(CohortKey::Age, Aggregate::Median)
        );
    }

    #[test]
    fn validate_rejects_empty_tracked() {
        assert_eq!(Err(ProfileError::EmptyTracked), profile(&[]).validate());
    }

    #[test]
    fn validate_rejects_duplicate_tracked() {
        assert_eq!(
            Err(ProfileError::DuplicateTracked(String::from(
                "receiving_yds"
            ))),
            profile(&["receiving_yds", "receiving_td", "receiving_yds"]).validate()
        );
    }

    #[test]
    fn deserialise_profile() {
        let json = r#"{
            "cohort_key": "years_exp",
            "tracked": ["receiving_rec", "receiving_yds"],
            "zero_fill": ["receiving_yds"]
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!("url", profile.player_column);
        assert_eq!(CohortKey::YearsExp, profile.cohort_key);
        assert_eq!(vec!["receiving_rec", "receiving_yds"], profile.tracked);
        assert!(profile.zero_fills("receiving_yds"));
        assert!(!profile.zero_fills("receiving_rec"));
        profile.validate().unwrap();
    }
}
