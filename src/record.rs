use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde_json::{Map, Number, Value};

use crate::error::{JoinError, Side};

/// A JSON object with fields kept in insertion order.
pub type Record = Map<String, Value>;

/// A borrowed join key.
///
/// Numbers compare by value across integer and float representations, so `1`
/// equals `1.0` and `-0.0` equals `0`. Everything else follows JSON structure:
/// strings by content, `null` equals `null`, arrays element-wise and objects by
/// field set regardless of order. `"1"` and `true` never equal `1`.
#[derive(Debug, Clone, Copy)]
pub struct Key<'a>(pub &'a Value);

impl<'a> Key<'a> {
    pub fn value(&self) -> &'a Value {
        self.0
    }
}

impl PartialEq for Key<'_> {
    fn eq(&self, other: &Self) -> bool {
        keys_equal(self.0, other.0)
    }
}

impl Eq for Key<'_> {}

impl Hash for Key<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(self.0, state);
    }
}

/// Canonical form of a JSON number. Floats with no fractional part collapse
/// onto the integer they represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NumberKey {
    Integer(i128),
    Float(u64),
}

// 2^127; integral floats at or beyond it cannot be held by an i128
const I128_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

fn number_key(number: &Number) -> NumberKey {
    if let Some(unsigned) = number.as_u64() {
        return NumberKey::Integer(unsigned as i128);
    }
    if let Some(signed) = number.as_i64() {
        return NumberKey::Integer(signed as i128);
    }
    let float = number.as_f64().unwrap_or(f64::NAN);
    if float.is_finite() && float.fract() == 0.0 && float.abs() < I128_LIMIT {
        NumberKey::Integer(float as i128)
    } else {
        NumberKey::Float(float.to_bits())
    }
}

pub(crate) fn keys_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => number_key(a) == number_key(b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| keys_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(field, x)| b.get(field).is_some_and(|y| keys_equal(x, y)))
        }
        _ => left == right,
    }
}

pub(crate) fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Bool(flag) => {
            1u8.hash(state);
            flag.hash(state);
        }
        Value::Number(number) => {
            2u8.hash(state);
            number_key(number).hash(state);
        }
        Value::String(text) => {
            3u8.hash(state);
            text.hash(state);
        }
        Value::Array(items) => {
            4u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        // per-field hashes are summed so field order drops out
        Value::Object(fields) => {
            5u8.hash(state);
            fields.len().hash(state);
            let combined = fields.iter().fold(0u64, |acc, (field, item)| {
                let mut hasher = DefaultHasher::new();
                field.hash(&mut hasher);
                hash_value(item, &mut hasher);
                acc.wrapping_add(hasher.finish())
            });
            combined.hash(state);
        }
    }
}

/// Reads the join key of `record`, failing when the field is absent.
pub(crate) fn key_of<'a>(
    record: &'a Record,
    field: &str,
    side: Side,
    position: usize,
) -> Result<Key<'a>, JoinError> {
    record
        .get(field)
        .map(Key)
        .ok_or_else(|| JoinError::missing_field(side, position, field))
}

/// Combines a left and a right record into a new one.
///
/// Every field of both inputs is present; when both define a field the left
/// value is kept and the right one dropped. Left fields come first, followed
/// by the right-only fields in their input order. This differs from copying the
/// right record and overwriting it with the left one, which would keep the
/// right record's field order and append the left-only fields. The field set
/// is identical either way. Values are deep-copied.
pub fn merge(left: &Record, right: &Record) -> Record {
    let mut merged = Record::with_capacity(left.len() + right.len());
    for (field, value) in left {
        merged.insert(field.clone(), value.clone());
    }
    for (field, value) in right {
        if !merged.contains_key(field) {
            merged.insert(field.clone(), value.clone());
        }
    }
    merged
}
