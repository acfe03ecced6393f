use wordweb_core::{GraphError, SlotId, Word, WordError};

/// Errors returned by [`PuzzleState`](crate::PuzzleState) operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PuzzleError {
    /// The level has no slot with this id.
    #[display("unknown slot {slot}")]
    UnknownSlot {
        /// The missing id.
        slot: SlotId,
    },
    /// The slot already holds a word; clear it first.
    #[display("slot {slot} already holds {word}")]
    SlotOccupied {
        /// The occupied slot.
        slot: SlotId,
        /// The word currently placed.
        word: Word,
    },
    /// The word does not fit the slot.
    #[display("slot {slot} needs {expected} letters, got {actual}")]
    LengthMismatch {
        /// The slot addressed.
        slot: SlotId,
        /// The slot's length.
        expected: usize,
        /// The word's length.
        actual: usize,
    },
    /// The input is not a word.
    #[display("invalid word: {_0}")]
    InvalidWord(WordError),
    /// Any other slot graph failure, such as a letter index out of range.
    #[display("{_0}")]
    Graph(GraphError),
}

impl From<WordError> for PuzzleError {
    fn from(err: WordError) -> Self {
        Self::InvalidWord(err)
    }
}

impl From<GraphError> for PuzzleError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::UnknownSlot { slot } => Self::UnknownSlot { slot },
            GraphError::LengthMismatch {
                slot,
                expected,
                actual,
            } => Self::LengthMismatch {
                slot,
                expected,
                actual,
            },
            err => Self::Graph(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_errors_map_to_puzzle_errors() {
        let slot = SlotId::from("a");
        assert_eq!(
            PuzzleError::from(GraphError::UnknownSlot { slot: slot.clone() }),
            PuzzleError::UnknownSlot { slot: slot.clone() }
        );
        assert!(matches!(
            PuzzleError::from(GraphError::IndexOutOfRange {
                slot,
                index: 5,
                word_length: 3
            }),
            PuzzleError::Graph(GraphError::IndexOutOfRange { index: 5, .. })
        ));
    }
}
