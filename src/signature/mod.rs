pub mod alignment;
pub mod bundle;

use std::fmt;
use std::str::FromStr;

pub use alignment::{Alignment, MirrorMode, circular_shift, orientation_merit};
pub use bundle::SignatureBundle;

use crate::error::LipError;

/// One of the three orthogonal projection axes of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    M,
    S,
    T,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::M, Direction::S, Direction::T];

    pub fn suffix(self) -> &'static str {
        match self {
            Direction::M => "m",
            Direction::S => "s",
            Direction::T => "t",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Direction::M => 0,
            Direction::S => 1,
            Direction::T => 2,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for Direction {
    type Err = LipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(Direction::M),
            "s" => Ok(Direction::S),
            "t" => Ok(Direction::T),
            other => Err(LipError::InvalidConfig(format!("unknown direction '{other}'"))),
        }
    }
}

/// Aligned signatures of one direction together with its orientation merit.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionSignatures {
    pub direction: Direction,
    pub bundle: SignatureBundle,
    pub alignment: Alignment,
}

impl DirectionSignatures {
    pub fn orientation_merit(&self) -> f64 {
        self.alignment.orientation_merit
    }
}

/// The m, s and t signatures of one object, always in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSignatures {
    directions: [DirectionSignatures; 3],
}

impl ObjectSignatures {
    /// Fails when the records are not given in m, s, t order.
    pub fn new(directions: [DirectionSignatures; 3]) -> Result<Self, LipError> {
        for (expected, record) in Direction::ALL.iter().zip(directions.iter()) {
            if record.direction != *expected {
                return Err(LipError::InvalidConfig(format!(
                    "direction '{}' found where '{}' was expected",
                    record.direction, expected
                )));
            }
        }
        Ok(Self { directions })
    }

    pub fn get(&self, direction: Direction) -> &DirectionSignatures {
        &self.directions[direction.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &DirectionSignatures> {
        self.directions.iter()
    }

    pub fn orientation_merits(&self) -> [f64; 3] {
        [
            self.directions[0].orientation_merit(),
            self.directions[1].orientation_merit(),
            self.directions[2].orientation_merit(),
        ]
    }
}
