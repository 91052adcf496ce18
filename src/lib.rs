//! In-memory joins over arrays of JSON records.
//!
//! The left collection is grouped by its key field, every right record probes
//! that index in order, and matches are merged with left fields taking
//! precedence. Outer kinds additionally surface the records that matched
//! nothing.

pub mod engine;
pub mod error;
pub mod group;
pub mod record;

pub use engine::{
    JoinKind, JoinStats, Joined, full_outer_join, inner_join, join, left_join, right_join,
};
pub use error::{JoinError, Side, UnknownJoinKind};
pub use group::{GroupIndex, group_by_key};
pub use record::{Key, Record, merge};
