use std::fmt;
use std::str::FromStr;

use crate::error::{JoinError, Side, UnknownJoinKind};
use crate::group::group_by_key;
use crate::record::{Record, key_of, merge};

/// Which unmatched records a join keeps besides the merged matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    /// Matches only.
    #[default]
    Inner,
    /// Matches plus left records whose key no right record carries.
    Left,
    /// Matches plus right records with no left partner.
    Right,
    /// Matches plus unmatched records from both sides.
    Full,
}

impl JoinKind {
    fn keeps_left(self) -> bool {
        matches!(self, JoinKind::Left | JoinKind::Full)
    }

    fn keeps_right(self) -> bool {
        matches!(self, JoinKind::Right | JoinKind::Full)
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::Full => "full",
        };
        f.write_str(name)
    }
}

impl FromStr for JoinKind {
    type Err = UnknownJoinKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(JoinKind::Inner),
            "left" => Ok(JoinKind::Left),
            "right" => Ok(JoinKind::Right),
            "full" | "outer" => Ok(JoinKind::Full),
            _ => Err(UnknownJoinKind(s.to_string())),
        }
    }
}

/// Counts of the records a join produced, split by origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoinStats {
    pub merged: usize,
    pub right_only: usize,
    pub left_only: usize,
    /// Distinct keys found on the left side.
    pub left_keys: usize,
}

impl JoinStats {
    pub fn total(&self) -> usize {
        self.merged + self.right_only + self.left_only
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Joined {
    pub records: Vec<Record>,
    pub stats: JoinStats,
}

/// Joins `left` and `right` on `left[left_key] == right[right_key]`.
///
/// The left side is grouped by key, then each right record is looked up in
/// that index in input order. Every left record of a matching group is merged
/// with the right record (left fields win on collision). Depending on `kind`,
/// right records without a partner are emitted unchanged in place, and left
/// groups that nothing matched are appended afterwards in the order their key
/// first appeared.
///
/// A record missing its key field aborts the join and nothing is returned.
pub fn join<'a>(
    kind: JoinKind,
    left: &'a [Record],
    right: &'a [Record],
    left_key: &str,
    right_key: &str,
) -> Result<Joined, JoinError> {
    let index = group_by_key(left, left_key)?;
    let mut consumed = vec![false; index.len()];
    let mut records = Vec::new();
    let mut stats = JoinStats {
        left_keys: index.len(),
        ..JoinStats::default()
    };

    for (idx, right_record) in right.iter().enumerate() {
        let key = key_of(right_record, right_key, Side::Right, idx)?;
        match index.slot(key.value()) {
            Some(slot) => {
                consumed[slot] = true;
                for left_record in index.records_in(slot) {
                    records.push(merge(left_record, right_record));
                    stats.merged += 1;
                }
            }
            None if kind.keeps_right() => {
                records.push(right_record.clone());
                stats.right_only += 1;
            }
            None => {}
        }
    }

    if kind.keeps_left() {
        for (slot, _) in consumed.iter().enumerate().filter(|(_, used)| !**used) {
            for left_record in index.records_in(slot) {
                records.push(left_record.clone());
                stats.left_only += 1;
            }
        }
    }

    Ok(Joined { records, stats })
}

/// Merged matches only, in right-input order.
pub fn inner_join(
    left: &[Record],
    right: &[Record],
    left_key: &str,
    right_key: &str,
) -> Result<Vec<Record>, JoinError> {
    join(JoinKind::Inner, left, right, left_key, right_key).map(|joined| joined.records)
}

/// Matches and unmatched right records in right-input order, then the
/// unmatched left records.
pub fn full_outer_join(
    left: &[Record],
    right: &[Record],
    left_key: &str,
    right_key: &str,
) -> Result<Vec<Record>, JoinError> {
    join(JoinKind::Full, left, right, left_key, right_key).map(|joined| joined.records)
}

pub fn left_join(
    left: &[Record],
    right: &[Record],
    left_key: &str,
    right_key: &str,
) -> Result<Vec<Record>, JoinError> {
    join(JoinKind::Left, left, right, left_key, right_key).map(|joined| joined.records)
}

pub fn right_join(
    left: &[Record],
    right: &[Record],
    left_key: &str,
    right_key: &str,
) -> Result<Vec<Record>, JoinError> {
    join(JoinKind::Right, left, right, left_key, right_key).map(|joined| joined.records)
}
