use std::collections::HashMap;

use wordweb_core::{ConnectionStatus, Level, Slot, SlotGraph, SlotId, Word};

use crate::{ConnectionUpdate, PuzzleError, PuzzleStatus, SlotChange, SlotOperation};

/// A play session over a [`Level`].
///
/// The session owns a copy of the level's slot graph and places words on the
/// copy; the level itself is never modified, so [`reset`](Self::reset)
/// restores the starting position exactly.
///
/// Each slot moves between two states: empty and filled. Filling goes through
/// [`try_place`](Self::try_place), emptying through
/// [`clear_slot`](Self::clear_slot) or [`reset`](Self::reset). Placing over a
/// filled slot is rejected; callers clear it first.
#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleState {
    level: Level,
    graph: SlotGraph,
}

impl PuzzleState {
    /// Starts a new session with every slot empty.
    #[must_use]
    pub fn new(level: Level) -> Self {
        let mut graph = level.graph().clone();
        graph.clear_all();
        Self { level, graph }
    }

    /// Restores a session from saved placements.
    ///
    /// Placements are applied in order with [`try_place`](Self::try_place).
    ///
    /// # Errors
    ///
    /// Returns the first placement error.
    pub fn from_placements<I, W>(level: Level, placements: I) -> Result<Self, PuzzleError>
    where
        I: IntoIterator<Item = (SlotId, W)>,
        W: AsRef<str>,
    {
        let mut this = Self::new(level);
        for (slot, word) in placements {
            this.try_place(&slot, word.as_ref())?;
        }
        Ok(this)
    }

    /// Returns the level being played.
    #[must_use]
    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Returns the slot graph with the current placements.
    #[must_use]
    pub fn graph(&self) -> &SlotGraph {
        &self.graph
    }

    /// Returns the slot with the given id.
    #[must_use]
    pub fn slot(&self, slot: &SlotId) -> Option<&Slot> {
        self.graph.slot(slot)
    }

    /// Returns the current placements in slot order.
    pub fn placements(&self) -> impl Iterator<Item = (&SlotId, &Word)> {
        self.graph
            .slots()
            .iter()
            .filter_map(|slot| slot.word().map(|word| (slot.id(), word)))
    }

    /// Returns the pool words not currently placed, in pool order.
    ///
    /// The pool is a multiset: placing a word removes one copy, clearing the
    /// slot returns it.
    #[must_use]
    pub fn remaining_words(&self) -> Vec<&Word> {
        let mut placed = HashMap::<&Word, usize>::new();
        for (_, word) in self.placements() {
            *placed.entry(word).or_default() += 1;
        }
        self.level
            .words()
            .iter()
            .filter(|word| match placed.get_mut(word) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    false
                }
                _ => true,
            })
            .collect()
    }

    fn placeable_word(&self, slot: &SlotId, word: &str) -> Result<Word, PuzzleError> {
        let target = self
            .graph
            .slot(slot)
            .ok_or_else(|| PuzzleError::UnknownSlot { slot: slot.clone() })?;
        let word = Word::new(word)?;
        if let Some(current) = target.word() {
            return Err(PuzzleError::SlotOccupied {
                slot: slot.clone(),
                word: current.clone(),
            });
        }
        if word.len() != target.word_length() {
            return Err(PuzzleError::LengthMismatch {
                slot: slot.clone(),
                expected: target.word_length(),
                actual: word.len(),
            });
        }
        Ok(word)
    }

    /// Returns whether [`try_place`](Self::try_place) would succeed, without
    /// changing anything.
    ///
    /// # Errors
    ///
    /// Returns the error `try_place` would return.
    pub fn place_capability(&self, slot: &SlotId, word: &str) -> Result<(), PuzzleError> {
        self.placeable_word(slot, word).map(|_| ())
    }

    /// Places `word` in an empty slot.
    ///
    /// The word is normalized to uppercase. On success every connection
    /// touching the slot is recomputed and reported in the returned change.
    /// Pool membership is not checked.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    ///
    /// - [`PuzzleError::UnknownSlot`] if the slot does not exist.
    /// - [`PuzzleError::InvalidWord`] if `word` is not made of letters.
    /// - [`PuzzleError::SlotOccupied`] if the slot already holds a word.
    /// - [`PuzzleError::LengthMismatch`] if the lengths differ.
    ///
    /// The state is unchanged on error.
    pub fn try_place(&mut self, slot: &SlotId, word: &str) -> Result<SlotChange, PuzzleError> {
        let word = self.placeable_word(slot, word)?;
        self.graph.place(slot, word.clone())?;
        log::debug!("placed {word} in slot {slot}");
        Ok(self.change(slot, SlotOperation::Placed(word)))
    }

    /// Empties a slot.
    ///
    /// Clearing an empty slot is a no-op and reports no connections.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::UnknownSlot`] if the slot does not exist.
    pub fn clear_slot(&mut self, slot: &SlotId) -> Result<SlotChange, PuzzleError> {
        let Some(word) = self.graph.clear(slot)? else {
            return Ok(SlotChange {
                slot: slot.clone(),
                operation: SlotOperation::NoOp,
                connections: vec![],
            });
        };
        log::debug!("cleared {word} from slot {slot}");
        Ok(self.change(slot, SlotOperation::Cleared(word)))
    }

    /// Empties every slot.
    pub fn reset(&mut self) {
        self.graph.clear_all();
        log::debug!("reset level {}", self.level.id());
    }

    fn change(&self, slot: &SlotId, operation: SlotOperation) -> SlotChange {
        let connections = self
            .graph
            .connections_of(slot)
            .map(|connection| ConnectionUpdate {
                connection: connection.clone(),
                status: self.graph.status_of(connection),
            })
            .collect();
        SlotChange {
            slot: slot.clone(),
            operation,
            connections,
        }
    }

    /// Returns the status of the connection at letter `index` of `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::UnknownSlot`], or [`PuzzleError::Graph`] if the
    /// index is out of range.
    pub fn connection_status(
        &self,
        slot: &SlotId,
        index: usize,
    ) -> Result<ConnectionStatus, PuzzleError> {
        Ok(self.graph.connection_status(slot, index)?)
    }

    /// Returns `true` if `slot` is filled and all of its connections are valid.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleError::UnknownSlot`] if the slot does not exist.
    pub fn is_slot_complete(&self, slot: &SlotId) -> Result<bool, PuzzleError> {
        Ok(self.graph.is_slot_complete(slot)?)
    }

    /// Returns `true` if every slot is filled and every connection is valid.
    #[must_use]
    pub fn is_level_complete(&self) -> bool {
        self.graph.is_complete()
    }

    /// Returns the whole-puzzle status.
    #[must_use]
    pub fn status(&self) -> PuzzleStatus {
        if self.is_level_complete() {
            PuzzleStatus::Complete
        } else {
            PuzzleStatus::Incomplete
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use wordweb_core::{GraphError, LevelData, WordError};

    use super::*;

    const FIRST_STEPS: &str = r#"{
        "id": 1,
        "name": "First Steps",
        "slots": [
            { "id": "a", "x": 300, "y": 200, "wordLength": 3 },
            { "id": "b", "x": 500, "y": 200, "wordLength": 3 }
        ],
        "connections": [{ "fromSlot": "a", "fromIndex": 2, "toSlot": "b", "toIndex": 0 }],
        "words": ["CAT", "TOY", "DOG", "CAT"]
    }"#;

    fn level(json: &str) -> Level {
        Level::from_data(LevelData::from_json(json).unwrap()).unwrap()
    }

    fn id(s: &str) -> SlotId {
        SlotId::from(s)
    }

    fn word(s: &str) -> Word {
        Word::new(s).unwrap()
    }

    #[test]
    fn test_validity_follows_placements() {
        let mut puzzle = PuzzleState::new(level(FIRST_STEPS));
        let (a, b) = (id("a"), id("b"));

        let change = puzzle.try_place(&a, "cat").unwrap();
        assert_eq!(change.operation, SlotOperation::Placed(word("CAT")));
        assert_eq!(change.connections.len(), 1);
        assert_eq!(change.connections[0].status, ConnectionStatus::Pending);

        let change = puzzle.try_place(&b, "TOY").unwrap();
        assert_eq!(change.connections[0].status, ConnectionStatus::Valid);
        assert!(!change.has_conflict());

        puzzle.clear_slot(&b).unwrap();
        let change = puzzle.try_place(&b, "DOG").unwrap();
        assert_eq!(change.connections[0].status, ConnectionStatus::Invalid);
        assert!(change.has_conflict());
        assert_eq!(puzzle.connection_status(&a, 2), Ok(ConnectionStatus::Invalid));

        let change = puzzle.clear_slot(&b).unwrap();
        assert_eq!(change.operation, SlotOperation::Cleared(word("DOG")));
        assert_eq!(change.connections[0].status, ConnectionStatus::Pending);
    }

    #[test]
    fn test_completion() {
        let mut puzzle = PuzzleState::new(level(FIRST_STEPS));
        let (a, b) = (id("a"), id("b"));
        assert_eq!(puzzle.status(), PuzzleStatus::Incomplete);

        puzzle.try_place(&a, "CAT").unwrap();
        puzzle.try_place(&b, "TOY").unwrap();
        assert!(puzzle.is_level_complete());
        assert!(puzzle.status().is_complete());
        assert_eq!(puzzle.is_slot_complete(&a), Ok(true));

        puzzle.clear_slot(&a).unwrap();
        assert!(!puzzle.is_level_complete());
        assert_eq!(puzzle.is_slot_complete(&b), Ok(false));

        puzzle.try_place(&a, "CAT").unwrap();
        puzzle.clear_slot(&b).unwrap();
        assert!(!puzzle.is_level_complete());
    }

    #[test]
    fn test_level_without_connections_completes_when_filled() {
        let mut puzzle = PuzzleState::new(level(
            r#"{
                "id": "solo",
                "slots": [{ "id": "only", "x": 0, "y": 0, "wordLength": 2 }],
                "connections": [],
                "words": ["GO"]
            }"#,
        ));
        assert!(!puzzle.is_level_complete());
        let change = puzzle.try_place(&id("only"), "go").unwrap();
        assert!(change.connections.is_empty());
        assert!(puzzle.is_level_complete());
    }

    #[test]
    fn test_idempotence() {
        let mut puzzle = PuzzleState::new(level(FIRST_STEPS));
        let first = puzzle.clear_slot(&id("a")).unwrap();
        let second = puzzle.clear_slot(&id("a")).unwrap();
        assert_eq!(first, second);
        assert!(first.operation.is_no_op());
        assert!(first.connections.is_empty());

        puzzle.try_place(&id("a"), "CAT").unwrap();
        let before = puzzle.clone();
        assert_eq!(puzzle.is_level_complete(), puzzle.is_level_complete());
        assert_eq!(puzzle, before);
    }

    #[test]
    fn test_place_errors_leave_state_unchanged() {
        let mut puzzle = PuzzleState::new(level(FIRST_STEPS));
        let a = id("a");
        puzzle.try_place(&a, "CAT").unwrap();
        let before = puzzle.clone();

        assert_eq!(
            puzzle.try_place(&id("zz"), "CAT"),
            Err(PuzzleError::UnknownSlot { slot: id("zz") })
        );
        assert_eq!(
            puzzle.try_place(&id("b"), "T0Y"),
            Err(PuzzleError::InvalidWord(WordError::NonAlphabetic {
                ch: '0',
                position: 1
            }))
        );
        assert_eq!(
            puzzle.try_place(&a, "DOG"),
            Err(PuzzleError::SlotOccupied {
                slot: a.clone(),
                word: word("CAT")
            })
        );
        assert_eq!(
            puzzle.try_place(&id("b"), "TOYS"),
            Err(PuzzleError::LengthMismatch {
                slot: id("b"),
                expected: 3,
                actual: 4
            })
        );
        assert_eq!(puzzle, before);
    }

    #[test]
    fn test_place_capability_matches_try_place() {
        let mut puzzle = PuzzleState::new(level(FIRST_STEPS));
        assert_eq!(puzzle.place_capability(&id("a"), "CAT"), Ok(()));
        assert!(puzzle.slot(&id("a")).is_some_and(|s| !s.is_filled()));

        puzzle.try_place(&id("a"), "CAT").unwrap();
        assert!(matches!(
            puzzle.place_capability(&id("a"), "DOG"),
            Err(PuzzleError::SlotOccupied { .. })
        ));
    }

    #[test]
    fn test_connection_status_errors() {
        let puzzle = PuzzleState::new(level(FIRST_STEPS));
        assert_eq!(
            puzzle.connection_status(&id("a"), 0),
            Ok(ConnectionStatus::Unconnected)
        );
        assert!(matches!(
            puzzle.connection_status(&id("a"), 3),
            Err(PuzzleError::Graph(GraphError::IndexOutOfRange { .. }))
        ));
        assert!(matches!(
            puzzle.connection_status(&id("x"), 0),
            Err(PuzzleError::UnknownSlot { .. })
        ));
    }

    #[test]
    fn test_reset_restores_start() {
        let fresh = PuzzleState::new(level(FIRST_STEPS));
        let mut puzzle = fresh.clone();
        puzzle.try_place(&id("a"), "CAT").unwrap();
        puzzle.try_place(&id("b"), "DOG").unwrap();
        puzzle.reset();
        assert_eq!(puzzle, fresh);
        assert_eq!(puzzle.placements().count(), 0);
    }

    #[test]
    fn test_remaining_words_is_multiset_difference() {
        let mut puzzle = PuzzleState::new(level(FIRST_STEPS));
        puzzle.try_place(&id("a"), "CAT").unwrap();
        let remaining = puzzle.remaining_words();
        assert_eq!(
            remaining,
            vec![&word("TOY"), &word("DOG"), &word("CAT")]
        );

        puzzle.try_place(&id("b"), "CAT").unwrap();
        assert_eq!(puzzle.remaining_words(), vec![&word("TOY"), &word("DOG")]);

        puzzle.clear_slot(&id("a")).unwrap();
        assert_eq!(
            puzzle.remaining_words(),
            vec![&word("TOY"), &word("DOG"), &word("CAT")]
        );
    }

    #[test]
    fn test_from_placements() {
        let puzzle =
            PuzzleState::from_placements(level(FIRST_STEPS), [(id("a"), "CAT"), (id("b"), "TOY")])
                .unwrap();
        assert!(puzzle.is_level_complete());
        let placements = puzzle
            .placements()
            .map(|(slot, word)| (slot.as_str(), word.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(placements, vec![("a", "CAT"), ("b", "TOY")]);

        assert!(matches!(
            PuzzleState::from_placements(level(FIRST_STEPS), [(id("a"), "CAT"), (id("a"), "DOG")]),
            Err(PuzzleError::SlotOccupied { .. })
        ));
    }

    fn single_slot_level(word_length: usize) -> Level {
        level(&format!(
            r#"{{
                "id": 1,
                "slots": [{{ "id": "s", "x": 0, "y": 0, "wordLength": {word_length} }}],
                "connections": [],
                "words": []
            }}"#
        ))
    }

    proptest! {
        #[test]
        fn prop_place_succeeds_iff_lengths_match(
            word_length in 1_usize..=8,
            candidate in "[A-Za-z]{1,12}",
        ) {
            let mut puzzle = PuzzleState::new(single_slot_level(word_length));
            let result = puzzle.try_place(&id("s"), &candidate);
            prop_assert_eq!(result.is_ok(), candidate.len() == word_length);
            prop_assert_eq!(
                puzzle.slot(&id("s")).is_some_and(Slot::is_filled),
                candidate.len() == word_length
            );
        }
    }
}
