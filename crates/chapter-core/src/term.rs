//! Academic term codes
//!
//! Terms are stored as integer codes. The Fall code of calendar year `Y` is
//! `1210 + 50 * (Y - 1998)`, and the other seasons sit at fixed offsets below
//! it. Decoding reverses the arithmetic:
//!
//! ```text
//! shift = (code - 1200) / 10
//! season = [Summer, Fall, Winter, Spring, Spring/Summer][shift % 5]
//! year = 1998 + (shift + 3) / 5
//! ```
//!
//! Only codes that decode to a year in `MIN_YEAR..=MAX_YEAR` and lie on the
//! ten-step grid are accepted.

use crate::error::TermError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const BASE_CODE: i32 = 1200;
const FALL_BASE_CODE: i32 = 1210;
const BASE_YEAR: i32 = 1998;
const CODES_PER_YEAR: i32 = 50;
const CODE_STEP: i32 = 10;

/// Smallest year accepted by the parser and decoder
pub const MIN_YEAR: i32 = 2000;
/// Largest year accepted by the parser and decoder
pub const MAX_YEAR: i32 = 9999;
/// Value returned by [`words_to_term_code`] for input it cannot encode
pub const INVALID_TERM_CODE: i32 = -1;

/// Academic season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// Fall
    Fall,
    /// Winter
    Winter,
    /// Spring
    Spring,
    /// Spring/Summer
    SpringSummer,
    /// Summer
    Summer,
}

impl Season {
    /// Offset from the Fall code of the same calendar year
    #[inline]
    #[must_use]
    pub fn offset(self) -> i32 {
        match self {
            Season::Fall => 0,
            Season::Winter => -40,
            Season::Spring => -30,
            Season::SpringSummer => -20,
            Season::Summer => -10,
        }
    }

    /// Display spelling
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Season::Fall => "Fall",
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::SpringSummer => "Spring/Summer",
            Season::Summer => "Summer",
        }
    }

    fn from_shift(shift: i32) -> Self {
        match shift.rem_euclid(5) {
            1 => Season::Fall,
            2 => Season::Winter,
            3 => Season::Spring,
            4 => Season::SpringSummer,
            _ => Season::Summer,
        }
    }
}

impl FromStr for Season {
    type Err = TermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fall" => Ok(Season::Fall),
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "spring/summer" => Ok(Season::SpringSummer),
            "summer" => Ok(Season::Summer),
            _ => Err(TermError::UnknownSeason(s.to_string())),
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A season of a calendar year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Season
    pub season: Season,
    /// Calendar year
    pub year: i32,
}

impl Term {
    /// Create term, validating the year range
    ///
    /// # Errors
    /// `TermError::YearOutOfRange` outside `MIN_YEAR..=MAX_YEAR`.
    pub fn new(season: Season, year: i32) -> Result<Self, TermError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(TermError::YearOutOfRange {
                year,
                min: MIN_YEAR,
                max: MAX_YEAR,
            });
        }
        Ok(Self { season, year })
    }

    /// Integer code of this term
    #[inline]
    #[must_use]
    pub fn code(&self) -> i32 {
        FALL_BASE_CODE + CODES_PER_YEAR * (self.year - BASE_YEAR) + self.season.offset()
    }

    /// Decode an integer code
    ///
    /// # Errors
    /// `TermError::InvalidCode` for codes off the ten-step grid or below the
    /// scheme's origin; `TermError::YearOutOfRange` for codes outside the
    /// supported years.
    pub fn from_code(code: i32) -> Result<Self, TermError> {
        if code < BASE_CODE || (code - BASE_CODE) % CODE_STEP != 0 {
            return Err(TermError::InvalidCode(code));
        }
        let shift = (code - BASE_CODE) / CODE_STEP;
        let year = BASE_YEAR + (shift + 3) / 5;
        Term::new(Season::from_shift(shift), year)
    }
}

impl FromStr for Term {
    type Err = TermError;

    /// Parse "<season> <year>", case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(season), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(TermError::Malformed(s.to_string()));
        };
        let season: Season = season.parse()?;
        let year: i32 = year
            .parse()
            .map_err(|_| TermError::Malformed(s.to_string()))?;
        Term::new(season, year)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.season, self.year)
    }
}

/// Encode "<season> <year>", returning [`INVALID_TERM_CODE`] on any failure
///
/// Callers that need the reason should parse a [`Term`] instead.
#[must_use]
pub fn words_to_term_code(words: &str) -> i32 {
    match words.parse::<Term>() {
        Ok(term) => term.code(),
        Err(err) => {
            tracing::debug!("Rejected term {:?}: {}", words, err);
            INVALID_TERM_CODE
        }
    }
}

/// Decode an integer code into "<Season> <year>"
///
/// # Errors
/// See [`Term::from_code`].
pub fn term_code_to_words(code: i32) -> Result<String, TermError> {
    Term::from_code(code).map(|term| term.to_string())
}
