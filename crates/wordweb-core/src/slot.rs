//! Slots and the endpoints that connect them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{GraphError, SlotId, Word};

/// Editor/rendering coordinates of a slot.
///
/// Core logic never reads these; they are carried so that level data
/// round-trips unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One side of a connection: a letter index within a slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Endpoint {
    /// The slot owning the letter.
    pub slot: SlotId,
    /// Zero-based letter index within the slot.
    pub index: usize,
}

impl Endpoint {
    /// Creates an endpoint.
    #[must_use]
    pub fn new(slot: impl Into<SlotId>, index: usize) -> Self {
        Self {
            slot: slot.into(),
            index,
        }
    }
}

/// A fixed-length letter container.
///
/// A slot may hold one placed word of exactly [`Slot::word_length`] letters,
/// and keeps a back-reference for each of its connected letter indices.
/// Connections are created through [`SlotGraph`](crate::SlotGraph), which
/// keeps both sides in sync.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    id: SlotId,
    position: Position,
    word_length: usize,
    word: Option<Word>,
    links: BTreeMap<usize, Endpoint>,
}

impl Slot {
    /// Creates an empty, unconnected slot.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ZeroLength`] if `word_length` is zero.
    pub fn new(id: SlotId, position: Position, word_length: usize) -> Result<Self, GraphError> {
        if word_length == 0 {
            return Err(GraphError::ZeroLength { slot: id });
        }
        Ok(Self {
            id,
            position,
            word_length,
            word: None,
            links: BTreeMap::new(),
        })
    }

    /// Returns the slot identifier.
    #[must_use]
    pub fn id(&self) -> &SlotId {
        &self.id
    }

    /// Returns the editor position.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the number of letters this slot accepts.
    #[must_use]
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Returns the placed word, if any.
    #[must_use]
    pub fn word(&self) -> Option<&Word> {
        self.word.as_ref()
    }

    /// Returns `true` if a word is placed.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.word.is_some()
    }

    /// Returns the placed letter at `index`, if the slot is filled.
    #[must_use]
    pub fn letter(&self, index: usize) -> Option<char> {
        self.word.as_ref().and_then(|word| word.letter(index))
    }

    /// Places a word, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::LengthMismatch`] if the word does not have exactly
    /// [`Slot::word_length`] letters. The slot is left unchanged.
    pub fn place(&mut self, word: Word) -> Result<(), GraphError> {
        if word.len() != self.word_length {
            return Err(GraphError::LengthMismatch {
                slot: self.id.clone(),
                expected: self.word_length,
                actual: word.len(),
            });
        }
        self.word = Some(word);
        Ok(())
    }

    /// Removes the placed word and returns it.
    pub fn clear(&mut self) -> Option<Word> {
        self.word.take()
    }

    /// Returns the counterpart of the connection at `index`, if any.
    #[must_use]
    pub fn link(&self, index: usize) -> Option<&Endpoint> {
        self.links.get(&index)
    }

    /// Iterates over connected letter indices and their counterparts, by index.
    pub fn links(&self) -> impl Iterator<Item = (usize, &Endpoint)> {
        self.links.iter().map(|(index, endpoint)| (*index, endpoint))
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<(), GraphError> {
        if index < self.word_length {
            Ok(())
        } else {
            Err(GraphError::IndexOutOfRange {
                slot: self.id.clone(),
                index,
                word_length: self.word_length,
            })
        }
    }

    pub(crate) fn set_link(&mut self, index: usize, other: Endpoint) {
        self.links.insert(index, other);
    }

    pub(crate) fn remove_link(&mut self, index: usize) -> Option<Endpoint> {
        self.links.remove(&index)
    }

    pub(crate) fn endpoint(&self, index: usize) -> Endpoint {
        Endpoint::new(self.id.clone(), index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(len: usize) -> Slot {
        Slot::new(SlotId::from("a"), Position::default(), len).unwrap()
    }

    #[test]
    fn test_place_requires_matching_length() {
        let mut slot = slot(3);
        assert!(matches!(
            slot.place(Word::new("BEAR").unwrap()),
            Err(GraphError::LengthMismatch {
                expected: 3,
                actual: 4,
                ..
            })
        ));
        assert!(!slot.is_filled());

        slot.place(Word::new("cat").unwrap()).unwrap();
        assert_eq!(slot.word().map(Word::as_str), Some("CAT"));
        assert_eq!(slot.letter(1), Some('A'));
    }

    #[test]
    fn test_clear_is_unconditional() {
        let mut slot = slot(3);
        assert_eq!(slot.clear(), None);
        slot.place(Word::new("CAT").unwrap()).unwrap();
        assert_eq!(slot.clear(), Some(Word::new("CAT").unwrap()));
        assert_eq!(slot.clear(), None);
    }

    #[test]
    fn test_zero_length_is_rejected() {
        assert!(matches!(
            Slot::new(SlotId::from("z"), Position::default(), 0),
            Err(GraphError::ZeroLength { .. })
        ));
    }
}
