use std::hash::{Hash, Hasher};

use indexmap::map::Entry;
use indexmap::{Equivalent, IndexMap};
use serde_json::Value;

use crate::error::{JoinError, Side};
use crate::record::{Key, Record, hash_value, key_of, keys_equal};

/// Records of one collection grouped by the value of a key field.
///
/// Groups are kept in the order their key was first seen and each group lists
/// its records in input order. The index borrows the collection it was built
/// from and stores positions into it.
#[derive(Debug, Clone)]
pub struct GroupIndex<'a> {
    records: &'a [Record],
    groups: IndexMap<Key<'a>, Vec<usize>>,
}

/// Groups `records` by `key_field`.
///
/// A record without the field aborts grouping with
/// [`JoinError::MissingField`], reported against the left side since this is
/// the side a join indexes.
pub fn group_by_key<'a>(
    records: &'a [Record],
    key_field: &str,
) -> Result<GroupIndex<'a>, JoinError> {
    let mut groups: IndexMap<Key<'a>, Vec<usize>> = IndexMap::new();

    for (idx, record) in records.iter().enumerate() {
        let key = key_of(record, key_field, Side::Left, idx)?;
        match groups.entry(key) {
            Entry::Vacant(v) => {
                v.insert(vec![idx]);
            }
            Entry::Occupied(mut o) => {
                o.get_mut().push(idx);
            }
        }
    }

    Ok(GroupIndex { records, groups })
}

/// Lookup form of [`Key`] whose lifetime is independent of the indexed
/// collection.
struct Probe<'v>(&'v Value);

impl Hash for Probe<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(self.0, state);
    }
}

impl Equivalent<Key<'_>> for Probe<'_> {
    fn equivalent(&self, key: &Key<'_>) -> bool {
        keys_equal(self.0, key.value())
    }
}

impl<'a> GroupIndex<'a> {
    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn contains(&self, key: &Value) -> bool {
        self.groups.contains_key(&Probe(key))
    }

    /// Records sharing `key`, in input order.
    pub fn get<'s>(
        &'s self,
        key: &Value,
    ) -> Option<impl Iterator<Item = &'a Record> + use<'a, 's>> {
        self.slot(key).map(|slot| self.records_in(slot))
    }

    /// Distinct keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &'a Value> + '_ {
        self.groups.keys().map(|key| key.value())
    }

    /// Every group with its key, in first-seen key order.
    pub fn groups(&self) -> impl Iterator<Item = (&'a Value, Vec<&'a Record>)> + '_ {
        (0..self.groups.len()).filter_map(move |slot| {
            let (key, _) = self.groups.get_index(slot)?;
            Some((key.value(), self.records_in(slot).collect()))
        })
    }

    pub(crate) fn slot(&self, key: &Value) -> Option<usize> {
        self.groups.get_index_of(&Probe(key))
    }

    pub(crate) fn records_in(&self, slot: usize) -> impl Iterator<Item = &'a Record> + '_ {
        let records = self.records;
        self.groups
            .get_index(slot)
            .into_iter()
            .flat_map(move |(_, positions)| positions.iter().map(move |&idx| &records[idx]))
    }
}
