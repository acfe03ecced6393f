//! Level well-formedness checks.
//!
//! Validation runs in two stages. [`check`] first inspects raw JSON the way it
//! arrives from storage or the editor, reporting missing sequences and
//! wrongly typed fields by position. The data is then deserialized into
//! [`LevelData`] and [`LevelData::validate`] checks identifiers, word pool,
//! connection references and bounds.
//!
//! Validation never tries to find an assignment of pool words that satisfies
//! every connection.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::{Endpoint, LevelData, SlotId, Word, data::count, is_valid_pool_word};

/// The first check a level failed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ValidationError {
    /// The level is not a JSON object.
    #[display("level data is not an object")]
    NotAnObject,
    /// `slots`, `connections` or `words` is missing or not an array.
    #[display("`{field}` is missing or not a sequence")]
    MissingSequence {
        /// The field name.
        field: &'static str,
    },
    /// A slot entry is not an object.
    #[display("slot #{slot} is not an object")]
    MalformedSlot {
        /// Position of the slot in `slots`.
        slot: usize,
    },
    /// A slot has no usable identifier.
    #[display("slot #{slot} has no identifier")]
    MissingSlotId {
        /// Position of the slot in `slots`.
        slot: usize,
    },
    /// A slot's `x` or `y` is not a number.
    #[display("slot #{slot} has a non-numeric coordinate")]
    NonNumericCoordinate {
        /// Position of the slot in `slots`.
        slot: usize,
    },
    /// A slot's `wordLength` is not a positive integer.
    #[display("slot #{slot} has an invalid word length")]
    InvalidWordLength {
        /// Position of the slot in `slots`.
        slot: usize,
    },
    /// Two slots share an identifier.
    #[display("slot id {id} is used more than once")]
    DuplicateSlotId {
        /// The repeated id.
        id: SlotId,
    },
    /// A pool word is not a string of 2-10 letters.
    #[display("word #{index} ({word}) is not a valid pool word")]
    InvalidWord {
        /// Position of the word in `words`.
        index: usize,
        /// The offending entry, as JSON text.
        word: String,
    },
    /// A connection entry is not an object.
    #[display("connection #{connection} is not an object")]
    MalformedConnection {
        /// Position of the connection in `connections`.
        connection: usize,
    },
    /// A connection's `fromIndex` or `toIndex` is not a non-negative integer.
    #[display("connection #{connection} has a non-integer index")]
    NonIntegerIndex {
        /// Position of the connection in `connections`.
        connection: usize,
    },
    /// A connection refers to a slot that does not exist.
    #[display("connection #{connection} refers to unknown slot {slot}")]
    UnknownSlot {
        /// Position of the connection in `connections`.
        connection: usize,
        /// The missing slot id.
        slot: SlotId,
    },
    /// A connection index lies outside its slot.
    #[display(
        "connection #{connection} uses index {index} of slot {slot}, which has {word_length} letters"
    )]
    IndexOutOfRange {
        /// Position of the connection in `connections`.
        connection: usize,
        /// The slot addressed.
        slot: SlotId,
        /// The requested index.
        index: usize,
        /// The slot's length.
        word_length: usize,
    },
    /// A letter takes part in more than one connection.
    #[display("connection #{connection} reuses letter {index} of slot {slot}")]
    DuplicateEndpoint {
        /// Position of the connection in `connections`.
        connection: usize,
        /// The slot addressed.
        slot: SlotId,
        /// The reused index.
        index: usize,
    },
    /// The stored solution names an unknown slot or a word that cannot fill it.
    #[display("solution entry for slot {slot} is invalid")]
    InvalidSolution {
        /// The slot addressed.
        slot: SlotId,
    },
    /// The data passed the field checks but does not match the schema.
    #[display("malformed level data: {message}")]
    Malformed {
        /// Deserializer message.
        message: String,
    },
}

/// Returns `true` if `value` is a well-formed level.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use wordweb_core::validate;
///
/// let level = json!({
///     "slots": [
///         { "id": "a", "x": 0, "y": 0, "wordLength": 3 },
///         { "id": "b", "x": 0, "y": 0, "wordLength": 3 },
///     ],
///     "connections": [{ "fromSlot": "a", "fromIndex": 2, "toSlot": "b", "toIndex": 0 }],
///     "words": ["CAT", "TOY"],
/// });
/// assert!(validate(&level));
/// ```
#[must_use]
pub fn validate(value: &Value) -> bool {
    check(value).is_ok()
}

/// Checks raw level data and reports the first failure.
///
/// # Errors
///
/// Returns the [`ValidationError`] describing the first failed check.
pub fn check(value: &Value) -> Result<(), ValidationError> {
    parse(value).map(|_| ())
}

/// Checks raw level data and returns it in typed form.
///
/// # Errors
///
/// Returns the [`ValidationError`] describing the first failed check.
pub fn parse(value: &Value) -> Result<LevelData, ValidationError> {
    check_shape(value)?;
    let data = LevelData::deserialize_value(value)?;
    data.validate()?;
    Ok(data)
}

fn sequence<'a>(
    object: &'a serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<&'a [Value], ValidationError> {
    object
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or(ValidationError::MissingSequence { field })
}

fn is_present_id(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    }
}

fn check_shape(value: &Value) -> Result<(), ValidationError> {
    let object = value.as_object().ok_or(ValidationError::NotAnObject)?;
    let slots = sequence(object, "slots")?;
    let connections = sequence(object, "connections")?;
    let words = sequence(object, "words")?;

    for (i, slot) in slots.iter().enumerate() {
        let slot_obj = slot
            .as_object()
            .ok_or(ValidationError::MalformedSlot { slot: i })?;
        if !is_present_id(slot_obj.get("id")) {
            return Err(ValidationError::MissingSlotId { slot: i });
        }
        let numeric = |key: &str| slot_obj.get(key).is_some_and(Value::is_number);
        if !numeric("x") || !numeric("y") {
            return Err(ValidationError::NonNumericCoordinate { slot: i });
        }
        if !slot_obj
            .get("wordLength")
            .and_then(count::from_value)
            .is_some_and(|len| len > 0)
        {
            return Err(ValidationError::InvalidWordLength { slot: i });
        }
    }

    for (i, word) in words.iter().enumerate() {
        if !word.as_str().is_some_and(is_valid_pool_word) {
            return Err(ValidationError::InvalidWord {
                index: i,
                word: word.to_string(),
            });
        }
    }

    for (i, connection) in connections.iter().enumerate() {
        let conn_obj = connection
            .as_object()
            .ok_or(ValidationError::MalformedConnection { connection: i })?;
        if !is_present_id(conn_obj.get("fromSlot")) || !is_present_id(conn_obj.get("toSlot")) {
            return Err(ValidationError::MalformedConnection { connection: i });
        }
        let integer = |key: &str| conn_obj.get(key).and_then(count::from_value).is_some();
        if !integer("fromIndex") || !integer("toIndex") {
            return Err(ValidationError::NonIntegerIndex { connection: i });
        }
    }

    Ok(())
}

impl LevelData {
    fn deserialize_value(value: &Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value.clone()).map_err(|e| ValidationError::Malformed {
            message: e.to_string(),
        })
    }

    /// Checks typed level data for structural consistency.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] describing the first failed check.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut lengths = HashMap::with_capacity(self.slots.len());
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.id.as_str().is_empty() {
                return Err(ValidationError::MissingSlotId { slot: i });
            }
            if !slot.x.is_finite() || !slot.y.is_finite() {
                return Err(ValidationError::NonNumericCoordinate { slot: i });
            }
            if slot.word_length == 0 {
                return Err(ValidationError::InvalidWordLength { slot: i });
            }
            if lengths.insert(&slot.id, slot.word_length).is_some() {
                return Err(ValidationError::DuplicateSlotId {
                    id: slot.id.clone(),
                });
            }
        }

        for (i, word) in self.words.iter().enumerate() {
            if !is_valid_pool_word(word) {
                return Err(ValidationError::InvalidWord {
                    index: i,
                    word: word.clone(),
                });
            }
        }

        let mut used = HashSet::new();
        for (i, conn) in self.connections.iter().enumerate() {
            for (slot, index) in [(&conn.from_slot, conn.from_index), (&conn.to_slot, conn.to_index)]
            {
                let Some(&word_length) = lengths.get(slot) else {
                    return Err(ValidationError::UnknownSlot {
                        connection: i,
                        slot: slot.clone(),
                    });
                };
                if index >= word_length {
                    return Err(ValidationError::IndexOutOfRange {
                        connection: i,
                        slot: slot.clone(),
                        index,
                        word_length,
                    });
                }
                if !used.insert(Endpoint::new(slot.clone(), index)) {
                    return Err(ValidationError::DuplicateEndpoint {
                        connection: i,
                        slot: slot.clone(),
                        index,
                    });
                }
            }
        }

        if let Some(solution) = &self.solution {
            for (slot, word) in solution {
                let fits = lengths.get(slot).is_some_and(|&len| {
                    Word::new(word).is_ok_and(|word| word.len() == len)
                });
                if !fits {
                    return Err(ValidationError::InvalidSolution { slot: slot.clone() });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn first_steps() -> Value {
        json!({
            "id": 1,
            "name": "First Steps",
            "slots": [
                { "x": 300, "y": 200, "wordLength": 3, "id": "slot1" },
                { "x": 500, "y": 200, "wordLength": 3, "id": "slot2" }
            ],
            "connections": [
                { "fromSlot": "slot1", "fromIndex": 2, "toSlot": "slot2", "toIndex": 0 }
            ],
            "words": ["CAT", "TOY"],
            "solution": { "slot1": "CAT", "slot2": "TOY" }
        })
    }

    fn with(mut value: Value, pointer: &str, replacement: Value) -> Value {
        *value.pointer_mut(pointer).unwrap() = replacement;
        value
    }

    #[test]
    fn test_accepts_well_formed_level() {
        assert_eq!(check(&first_steps()), Ok(()));
        let data = parse(&first_steps()).unwrap();
        assert_eq!(data.name, "First Steps");
    }

    #[test]
    fn test_rejects_missing_sequences() {
        assert_eq!(check(&json!([])), Err(ValidationError::NotAnObject));
        for field in ["slots", "connections", "words"] {
            let mut level = first_steps();
            level.as_object_mut().unwrap().remove(field);
            assert_eq!(check(&level), Err(ValidationError::MissingSequence { field }));

            let level = with(first_steps(), &format!("/{field}"), json!("nope"));
            assert_eq!(check(&level), Err(ValidationError::MissingSequence { field }));
        }
    }

    #[test]
    fn test_rejects_bad_slots() {
        let level = with(first_steps(), "/slots/0/id", json!(""));
        assert_eq!(check(&level), Err(ValidationError::MissingSlotId { slot: 0 }));

        let level = with(first_steps(), "/slots/1/x", json!("300"));
        assert_eq!(
            check(&level),
            Err(ValidationError::NonNumericCoordinate { slot: 1 })
        );

        let level = with(first_steps(), "/slots/1/wordLength", json!(0));
        assert_eq!(check(&level), Err(ValidationError::InvalidWordLength { slot: 1 }));

        let level = with(first_steps(), "/slots/1/id", json!("slot1"));
        assert_eq!(
            check(&level),
            Err(ValidationError::DuplicateSlotId {
                id: SlotId::from("slot1")
            })
        );
    }

    #[test]
    fn test_accepts_integral_floats() {
        let level = with(first_steps(), "/slots/0/wordLength", json!(3.0));
        let level = with(level, "/connections/0/fromIndex", json!(2.0));
        let data = parse(&level).unwrap();
        assert_eq!(data.slots[0].word_length, 3);
        assert_eq!(data.connections[0].from_index, 2);

        let level = with(first_steps(), "/slots/0/wordLength", json!(2.5));
        assert_eq!(check(&level), Err(ValidationError::InvalidWordLength { slot: 0 }));
        let level = with(first_steps(), "/connections/0/toIndex", json!(-1.0));
        assert_eq!(
            check(&level),
            Err(ValidationError::NonIntegerIndex { connection: 0 })
        );
    }

    #[test]
    fn test_accepts_numeric_slot_ids() {
        let level = with(first_steps(), "/slots/0/id", json!(7));
        let level = with(level, "/connections/0/fromSlot", json!(7));
        let level = with(level, "/solution", json!({ "7": "CAT", "slot2": "TOY" }));
        assert_eq!(check(&level), Ok(()));
    }

    #[test]
    fn test_rejects_non_alphabetic_word() {
        let level = with(first_steps(), "/words/0", json!("C4T"));
        assert!(!validate(&level));
        assert!(matches!(
            check(&level),
            Err(ValidationError::InvalidWord { index: 0, .. })
        ));

        let level = with(first_steps(), "/words/1", json!("X"));
        assert!(!validate(&level));
        let level = with(first_steps(), "/words/1", json!("ABCDEFGHIJK"));
        assert!(!validate(&level));
        let level = with(first_steps(), "/words/1", json!(42));
        assert!(!validate(&level));
    }

    #[test]
    fn test_rejects_unknown_slot_reference() {
        let level = with(first_steps(), "/connections/0/toSlot", json!("ghost"));
        assert!(!validate(&level));
        assert_eq!(
            check(&level),
            Err(ValidationError::UnknownSlot {
                connection: 0,
                slot: SlotId::from("ghost"),
            })
        );
    }

    #[test]
    fn test_rejects_bad_connection_indices() {
        let level = with(first_steps(), "/connections/0/fromIndex", json!("2"));
        assert_eq!(
            check(&level),
            Err(ValidationError::NonIntegerIndex { connection: 0 })
        );

        let level = with(first_steps(), "/connections/0/fromIndex", json!(-1));
        assert_eq!(
            check(&level),
            Err(ValidationError::NonIntegerIndex { connection: 0 })
        );

        let level = with(first_steps(), "/connections/0/toIndex", json!(3));
        assert!(matches!(
            check(&level),
            Err(ValidationError::IndexOutOfRange {
                index: 3,
                word_length: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_reused_endpoint() {
        let mut level = first_steps();
        level["connections"].as_array_mut().unwrap().push(json!({
            "fromSlot": "slot2", "fromIndex": 0, "toSlot": "slot1", "toIndex": 0
        }));
        assert_eq!(
            check(&level),
            Err(ValidationError::DuplicateEndpoint {
                connection: 1,
                slot: SlotId::from("slot2"),
                index: 0,
            })
        );
    }

    #[test]
    fn test_rejects_bad_solution() {
        let level = with(first_steps(), "/solution/slot2", json!("TOYS"));
        assert_eq!(
            check(&level),
            Err(ValidationError::InvalidSolution {
                slot: SlotId::from("slot2")
            })
        );
    }

    #[test]
    fn test_does_not_require_solvable_pool() {
        // Letters disagree at the connection and the pool lacks a fitting
        // word, yet the structure is fine.
        let level = with(first_steps(), "/words", json!(["DOG", "CAT", "HORSE"]));
        let level = with(level, "/solution", json!(null));
        assert_eq!(check(&level), Ok(()));
    }
}
