use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const NONE_MARKERS: [&str; 2] = ["ninguna", "none"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[cfg(test)]
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Accepts the English labels and the Spanish ones stored by the clinic
    /// configuration screens. Input must already be lower-cased and trimmed.
    pub fn from_normalized(label: &str) -> Option<Direction> {
        match label {
            "up" | "arriba" => Some(Direction::Up),
            "down" | "abajo" => Some(Direction::Down),
            "left" | "izquierda" => Some(Direction::Left),
            "right" | "derecha" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Lenient parse used for stored configuration values.
    pub fn parse_label(label: &str) -> Option<Direction> {
        Direction::from_normalized(label.trim().to_lowercase().as_str())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single answer given by the patient for the stimulus on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Response {
    Seen(Direction),
    /// No perceivable stimulus. Never correct.
    None,
}

impl Response {
    #[cfg(test)]
    pub const ALL: [Response; 5] = [
        Response::Seen(Direction::Up),
        Response::Seen(Direction::Down),
        Response::Seen(Direction::Left),
        Response::Seen(Direction::Right),
        Response::None,
    ];

    /// Exact match against the configured direction. An unconfigured step
    /// can never be satisfied.
    pub fn is_correct(self, expected: Option<Direction>) -> bool {
        match (self, expected) {
            (Response::Seen(given), Some(expected)) => given == expected,
            _ => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Response::Seen(d) => d.label(),
            Response::None => "none",
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown response label {0:?} (use up|down|left|right|none)")]
pub struct ResponseParseError(pub String);

impl FromStr for Response {
    type Err = ResponseParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lower = raw.trim().to_lowercase();
        if NONE_MARKERS.contains(&lower.as_str()) {
            return Ok(Response::None);
        }
        let mut stripped = lower.clone();
        for marker in NONE_MARKERS {
            stripped = stripped.replace(marker, "");
        }
        Direction::from_normalized(stripped.trim())
            .map(Response::Seen)
            .ok_or_else(|| ResponseParseError(raw.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/response.rs"]
mod tests;
