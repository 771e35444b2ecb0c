use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, protocol::iso_timestamp};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(RoundId);

pub const SCORE_RANGE: RangeInclusive<i32> = 1..=200;
pub const COURSE_RATING_RANGE: RangeInclusive<f64> = 50.0..=80.0;
pub const SLOPE_RATING_RANGE: RangeInclusive<i32> = 55..=155;

/// A round as the user enters it. The backend assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRound {
    pub score: i32,
    pub course_rating: f64,
    pub slope_rating: i32,
    #[serde(with = "iso_timestamp")]
    pub played_at: DateTime<Utc>,
}

impl NewRound {
    /// Checks the score and rating bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !SCORE_RANGE.contains(&self.score) {
            return Err(ValidationError::out_of_range("Score", &SCORE_RANGE));
        }
        if !COURSE_RATING_RANGE.contains(&self.course_rating) {
            return Err(ValidationError::out_of_range(
                "Course rating",
                &COURSE_RATING_RANGE,
            ));
        }
        if !SLOPE_RATING_RANGE.contains(&self.slope_rating) {
            return Err(ValidationError::out_of_range(
                "Slope rating",
                &SLOPE_RATING_RANGE,
            ));
        }
        Ok(())
    }
}

/// A round after the backend has stored it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: RoundId,
    pub score: i32,
    pub course_rating: f64,
    pub slope_rating: i32,
    #[serde(with = "iso_timestamp")]
    pub played_at: DateTime<Utc>,
}

impl Round {
    pub fn without_id(&self) -> NewRound {
        NewRound {
            score: self.score,
            course_rating: self.course_rating,
            slope_rating: self.slope_rating,
            played_at: self.played_at,
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
