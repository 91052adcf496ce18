use std::fmt;

use thiserror::Error;

/// Which input collection a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// A record lacks the field it is being joined on. `position` is 0-based.
    #[error("{side} record #{position} has no field '{field}'")]
    MissingField {
        side: Side,
        position: usize,
        field: String,
    },
}

impl JoinError {
    pub(crate) fn missing_field(side: Side, position: usize, field: &str) -> Self {
        JoinError::MissingField {
            side,
            position,
            field: field.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown join kind '{0}' (expected inner, left, right or full)")]
pub struct UnknownJoinKind(pub String);
