//! Search domain types with enforced invariants.
//!
//! - Value: totally ordered real number, never NaN, with infinite win/loss
//!   sentinels
//! - Position/Direction: integer grid geometry with Manhattan distance

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{MultiAgentError, Result};

/// A search value.
///
/// Invariant: never NaN. Forced wins and forced losses are represented by
/// positive and negative infinity, so `max`, `min` and comparisons stay well
/// defined across sentinels and ordinary scores.
///
/// # Example
/// ```
/// use multiagent_core::Value;
///
/// let value = Value::new(12.5).unwrap();
/// assert!(value < Value::WIN);
/// assert!(value > Value::LOSS);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Value(f64);

impl Value {
    /// Value of a forced win.
    pub const WIN: Self = Self(f64::INFINITY);

    /// Value of a forced loss.
    pub const LOSS: Self = Self(f64::NEG_INFINITY);

    /// Neutral value.
    pub const ZERO: Self = Self(0.0);

    /// Create a new value.
    ///
    /// # Errors
    /// Returns `MultiAgentError::InvalidValue` if `value` is NaN.
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() {
            return Err(MultiAgentError::InvalidValue(
                "value cannot be NaN".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Create a value from a raw score, collapsing NaN to [`Value::LOSS`].
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Self::LOSS
        } else {
            Self(value)
        }
    }

    /// Get the underlying number.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Check if this is the win sentinel.
    pub fn is_win(self) -> bool {
        self.0 == f64::INFINITY
    }

    /// Check if this is the loss sentinel.
    pub fn is_loss(self) -> bool {
        self.0 == f64::NEG_INFINITY
    }

    /// Arithmetic mean of `values`, or `None` if there are none.
    ///
    /// A mix of win and loss sentinels has no defined mean; it resolves to
    /// [`Value::LOSS`].
    pub fn mean<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0.0f64, 0usize), |(sum, count), v| (sum + v.0, count + 1));
        if count == 0 {
            return None;
        }
        Some(Self::from_f64(sum / count as f64))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        // NaN is never stored, so the partial order is total.
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_win() {
            write!(f, "+inf")
        } else if self.is_loss() {
            write!(f, "-inf")
        } else {
            write!(f, "{:.3}", self.0)
        }
    }
}

impl From<Value> for f64 {
    fn from(v: Value) -> f64 {
        v.0
    }
}

/// A grid coordinate. `y` grows northwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Sum of absolute coordinate differences.
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The neighbouring position in `direction`.
    pub fn step(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    /// Distance to the closest of `targets`, or `None` if there are none.
    pub fn nearest<'a, I>(self, targets: I) -> Option<u32>
    where
        I: IntoIterator<Item = &'a Position>,
    {
        targets.into_iter().map(|t| self.manhattan(*t)).min()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A grid move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Stop,
}

impl Direction {
    /// Every direction in move-generation order.
    pub const ALL: [Direction; 5] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Stop,
    ];

    /// Coordinate offset of one step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Stop => (0, 0),
        }
    }

    /// The opposite direction (`Stop` is its own reverse).
    pub fn reverse(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Stop => Direction::Stop,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
            Direction::Stop => "Stop",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Direction {
    type Err = MultiAgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "south" | "s" => Ok(Direction::South),
            "east" | "e" => Ok(Direction::East),
            "west" | "w" => Ok(Direction::West),
            "stop" => Ok(Direction::Stop),
            other => Err(MultiAgentError::InvalidValue(format!(
                "unknown direction '{}'",
                other
            ))),
        }
    }
}

/// What evaluation can observe about an adversary.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct GhostView {
    pub position: Position,

    /// Moves left before the ghost becomes dangerous again.
    pub scared_timer: u32,
}

impl GhostView {
    pub fn is_scared(&self) -> bool {
        self.scared_timer > 0
    }
}
