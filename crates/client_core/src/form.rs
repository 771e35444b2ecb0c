use std::fmt;

use chrono::NaiveDateTime;
use shared::{domain::NewRound, error::ValidationError};

use crate::clock::Clock;

/// Layout of the played-at input, a local wall-clock reading.
pub const PLAYED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M";
const PLAYED_AT_FORMAT_WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundField {
    Score,
    CourseRating,
    SlopeRating,
    PlayedAt,
    AccessCode,
}

impl RoundField {
    pub const ALL: [RoundField; 5] = [
        RoundField::Score,
        RoundField::CourseRating,
        RoundField::SlopeRating,
        RoundField::PlayedAt,
        RoundField::AccessCode,
    ];

    /// Input name as the form submits it.
    pub fn name(self) -> &'static str {
        match self {
            RoundField::Score => "score",
            RoundField::CourseRating => "courseRating",
            RoundField::SlopeRating => "slopeRating",
            RoundField::PlayedAt => "playedAt",
            RoundField::AccessCode => "accessCode",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RoundField::Score => "Score",
            RoundField::CourseRating => "Course rating",
            RoundField::SlopeRating => "Slope rating",
            RoundField::PlayedAt => "Date played",
            RoundField::AccessCode => "Security PIN",
        }
    }
}

impl fmt::Display for RoundField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw text of the add-round form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingRoundForm {
    pub score: String,
    pub course_rating: String,
    pub slope_rating: String,
    pub played_at: String,
    pub access_code: String,
    /// Inline message shown under the inputs, e.g. a refused PIN.
    pub validation_message: Option<String>,
}

impl PendingRoundForm {
    pub fn new(played_at: String) -> Self {
        Self {
            played_at,
            ..Self::default()
        }
    }

    pub fn get(&self, field: RoundField) -> &str {
        match field {
            RoundField::Score => &self.score,
            RoundField::CourseRating => &self.course_rating,
            RoundField::SlopeRating => &self.slope_rating,
            RoundField::PlayedAt => &self.played_at,
            RoundField::AccessCode => &self.access_code,
        }
    }

    pub fn set(&mut self, field: RoundField, raw: impl Into<String>) {
        let slot = match field {
            RoundField::Score => &mut self.score,
            RoundField::CourseRating => &mut self.course_rating,
            RoundField::SlopeRating => &mut self.slope_rating,
            RoundField::PlayedAt => &mut self.played_at,
            RoundField::AccessCode => &mut self.access_code,
        };
        *slot = raw.into();
    }

    /// Labels of required fields left blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        RoundField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_empty())
            .map(RoundField::label)
            .collect()
    }

    /// Back to a blank form dated `played_at`.
    pub fn reset(&mut self, played_at: String) {
        *self = Self::new(played_at);
    }

    pub fn clear_access_code(&mut self) {
        self.access_code.clear();
    }

    /// Parses the numeric fields and the played-at reading into a round
    /// and checks the bounds. Assumes no field is blank.
    pub fn parse_round(&self, clock: &dyn Clock) -> Result<NewRound, ValidationError> {
        let round = NewRound {
            score: parse_integer(&self.score, RoundField::Score)?,
            course_rating: parse_decimal(&self.course_rating, RoundField::CourseRating)?,
            slope_rating: parse_integer(&self.slope_rating, RoundField::SlopeRating)?,
            played_at: parse_local_timestamp(&self.played_at)
                .and_then(|local| clock.local_to_utc(local))
                .ok_or(ValidationError::InvalidPlayedAt)?,
        };
        round.validate()?;
        Ok(round)
    }
}

/// Formats a wall-clock reading for the played-at input.
pub fn format_played_at(local: NaiveDateTime) -> String {
    local.format(PLAYED_AT_FORMAT).to_string()
}

fn parse_integer(raw: &str, field: RoundField) -> Result<i32, ValidationError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ValidationError::NotAnInteger {
            field: field.label(),
        })
}

fn parse_decimal(raw: &str, field: RoundField) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ValidationError::NotANumber {
            field: field.label(),
        })
}

fn parse_local_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, PLAYED_AT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, PLAYED_AT_FORMAT_WITH_SECONDS))
        .ok()
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
