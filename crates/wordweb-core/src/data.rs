//! Serialized level format.
//!
//! These types mirror the JSON schema used for built-in levels, editor
//! output and persisted custom levels:
//!
//! ```json
//! {
//!   "id": 1,
//!   "name": "First Steps",
//!   "slots": [{ "id": "slot1", "x": 300, "y": 200, "wordLength": 3 }],
//!   "connections": [{ "fromSlot": "slot1", "fromIndex": 2, "toSlot": "slot2", "toIndex": 0 }],
//!   "words": ["CAT", "TOY"],
//!   "solution": { "slot1": "CAT", "slot2": "TOY" },
//!   "isCustom": false
//! }
//! ```
//!
//! Deserializing only checks the shape of the data. Use
//! [`validate`](crate::validate) or [`LevelData::validate`] before trusting
//! it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{LevelId, SlotId};

/// Raw level definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    /// Level id; absent for editor output that has not been saved yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LevelId>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Slots in display order.
    pub slots: Vec<SlotData>,
    /// Letter connections between slots.
    pub connections: Vec<ConnectionData>,
    /// Word pool offered to the player.
    pub words: Vec<String>,
    /// Optional authoritative answer, slot id to word.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<BTreeMap<SlotId, String>>,
    /// Whether the level was authored by the player.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_custom: bool,
}

/// Raw slot definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotData {
    /// Slot id, unique within the level.
    pub id: SlotId,
    /// Horizontal editor coordinate.
    pub x: f64,
    /// Vertical editor coordinate.
    pub y: f64,
    /// Number of letters.
    #[serde(deserialize_with = "count::deserialize")]
    pub word_length: usize,
}

/// Raw connection definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionData {
    /// Slot on the first side.
    pub from_slot: SlotId,
    /// Letter index on the first side.
    #[serde(deserialize_with = "count::deserialize")]
    pub from_index: usize,
    /// Slot on the second side.
    pub to_slot: SlotId,
    /// Letter index on the second side.
    #[serde(deserialize_with = "count::deserialize")]
    pub to_index: usize,
}

impl LevelData {
    /// Parses level data from a JSON string without validating it.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the text does not match the schema shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes this level data to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Lengths and indices may be written as integral floats such as `3.0`.
pub(crate) mod count {
    use serde::{Deserialize as _, Deserializer, de::Error as _};
    use serde_json::{Number, Value};

    // 2^53, the first integer past which `f64` skips values.
    const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_number(n: &Number) -> Option<usize> {
        if let Some(n) = n.as_u64() {
            return usize::try_from(n).ok();
        }
        let f = n.as_f64()?;
        (f.fract() == 0.0 && (0.0..MAX_EXACT_FLOAT).contains(&f)).then(|| f as usize)
    }

    /// Returns `value` as a non-negative integer, if it is one.
    pub(crate) fn from_value(value: &Value) -> Option<usize> {
        match value {
            Value::Number(n) => from_number(n),
            _ => None,
        }
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<usize, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = Number::deserialize(deserializer)?;
        from_number(&n)
            .ok_or_else(|| D::Error::custom(format!("expected a non-negative integer, found {n}")))
    }
}
