//! Player record, position codes, and request-body validation.

use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a player (assigned by the store on insert).
pub type PlayerId = Uuid;

/// Longest accepted player name after trimming, counted in UTF-16 code units
/// (an emoji outside the BMP counts as two).
pub const MAX_NAME_LEN: usize = 50;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 100;

const REQUIRED_FIELDS: &str = "Name, rating, and position are required";

/// Role code on the pitch. Serialized as its two-letter code.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "DF")]
    Defender,
    #[serde(rename = "MF")]
    Midfielder,
    #[serde(rename = "FW")]
    Forward,
}

impl Position {
    pub fn code(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MF",
            Position::Forward => "FW",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Case-insensitive: "fw", "Fw" and "FW" all parse.
impl FromStr for Position {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GK" => Ok(Position::Goalkeeper),
            "DF" => Ok(Position::Defender),
            "MF" => Ok(Position::Midfielder),
            "FW" => Ok(Position::Forward),
            _ => Err(AppError::Validation(
                "Position must be GK, DF, MF, or FW".to_string(),
            )),
        }
    }
}

/// Validated, user-editable fields of a player. Only constructible through validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlayerFields {
    name: String,
    rating: u8,
    position: Position,
}

impl PlayerFields {
    /// Trim the name and check every field constraint.
    pub fn new(name: &str, rating: i64, position: Position) -> Result<Self, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Player name cannot be empty".to_string()));
        }
        if name.encode_utf16().count() > MAX_NAME_LEN {
            return Err(AppError::Validation(format!(
                "Name cannot be more than {MAX_NAME_LEN} characters"
            )));
        }
        let rating = u8::try_from(rating)
            .ok()
            .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Rating must be between {MIN_RATING} and {MAX_RATING}"
                ))
            })?;
        Ok(Self {
            name: name.to_string(),
            rating,
            position,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

/// A stored player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub rating: u8,
    pub position: Position,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Create a new player with a fresh id; both timestamps are set to now.
    pub fn new(fields: PlayerFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            rating: fields.rating,
            position: fields.position,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace all editable fields and bump `updated_at`.
    pub fn apply(&mut self, fields: PlayerFields) {
        self.name = fields.name;
        self.rating = fields.rating;
        self.position = fields.position;
        self.updated_at = Utc::now();
    }

    /// Reduced view used by search-as-you-type.
    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            id: self.id,
            name: self.name.clone(),
            rating: self.rating,
            position: self.position,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub rating: u8,
    pub position: Position,
}

/// Rating as sent by a client: a JSON number or a numeric string.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RatingInput {
    Number(f64),
    Text(String),
}

impl RatingInput {
    /// Coerce to an integer: numbers are truncated, strings use their leading digits
    /// (`"42abc"` is 42). `None` when there is no number at all.
    pub fn coerce(&self) -> Option<i64> {
        match self {
            RatingInput::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            RatingInput::Number(_) => None,
            RatingInput::Text(s) => parse_leading_int(s),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            RatingInput::Number(n) => *n == 0.0,
            RatingInput::Text(s) => s.is_empty(),
        }
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    // Too many digits to fit still means "a very large number", which fails range checks.
    let value = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Raw create/update body. Every field is optional here so that missing
/// fields are reported as a validation error rather than a parse failure.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlayerInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rating: Option<RatingInput>,
    #[serde(default)]
    pub position: Option<String>,
}

impl PlayerInput {
    /// Check presence, coerce the rating, upper-case the position, and validate ranges.
    pub fn validate(&self) -> Result<PlayerFields, AppError> {
        let required = || AppError::Validation(REQUIRED_FIELDS.to_string());
        let name = self.name.as_deref().filter(|n| !n.is_empty()).ok_or_else(required)?;
        let rating = self.rating.as_ref().filter(|r| !r.is_blank()).ok_or_else(required)?;
        let position = self
            .position
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(required)?;

        let rating = rating.coerce().ok_or_else(|| {
            AppError::Validation(format!(
                "Rating must be a whole number between {MIN_RATING} and {MAX_RATING}"
            ))
        })?;
        PlayerFields::new(name, rating, position.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, rating: serde_json::Value, position: &str) -> PlayerInput {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "rating": rating,
            "position": position,
        }))
        .unwrap()
    }

    #[test]
    fn rating_string_uses_leading_digits() {
        let fields = input("Ana", serde_json::json!("42abc"), "mf").validate().unwrap();
        assert_eq!(fields.rating(), 42);
        assert_eq!(fields.position(), Position::Midfielder);
    }

    #[test]
    fn rating_number_is_truncated() {
        let fields = input("Ana", serde_json::json!(77.9), "FW").validate().unwrap();
        assert_eq!(fields.rating(), 77);
    }

    #[test]
    fn rating_out_of_range_rejected() {
        assert!(matches!(
            input("Ana", serde_json::json!(101), "FW").validate(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            input("Ana", serde_json::json!("-3"), "FW").validate(),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            input("Ana", serde_json::json!("99999999999999999999999"), "FW").validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn zero_rating_counts_as_missing() {
        let err = input("Ana", serde_json::json!(0), "FW").validate().unwrap_err();
        assert_eq!(err.to_string(), REQUIRED_FIELDS);
    }

    #[test]
    fn missing_fields_rejected() {
        let err = PlayerInput::default().validate().unwrap_err();
        assert_eq!(err.to_string(), REQUIRED_FIELDS);
    }

    #[test]
    fn name_is_trimmed_and_bounded() {
        let fields = input("  Bo  ", serde_json::json!(50), "gk").validate().unwrap();
        assert_eq!(fields.name(), "Bo");

        assert!(input("   ", serde_json::json!(50), "GK").validate().is_err());

        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(input(&long, serde_json::json!(50), "GK").validate().is_err());
        let max = "é".repeat(MAX_NAME_LEN);
        assert!(input(&max, serde_json::json!(50), "GK").validate().is_ok());
    }

    #[test]
    fn name_limit_counts_utf16_units() {
        let fits = "⚽".repeat(MAX_NAME_LEN);
        assert!(input(&fits, serde_json::json!(50), "GK").validate().is_ok());

        let emoji_max = "🥅".repeat(MAX_NAME_LEN / 2);
        assert!(input(&emoji_max, serde_json::json!(50), "GK").validate().is_ok());
        let emoji_over = "🥅".repeat(MAX_NAME_LEN / 2 + 1);
        assert!(input(&emoji_over, serde_json::json!(50), "GK").validate().is_err());
    }

    #[test]
    fn unknown_position_rejected() {
        assert!(input("Ana", serde_json::json!(50), "ST").validate().is_err());
    }

    #[test]
    fn position_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Position::Defender).unwrap(), "\"DF\"");
    }
}
