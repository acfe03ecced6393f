//! Validated, immutable level definitions.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    ConnectionData, GraphError, LevelData, LevelId, Position, SlotData, SlotGraph, SlotId,
    ValidationError, Word, WordError,
};

/// Errors returned when building a [`Level`] from raw data.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum LevelError {
    /// The data failed validation.
    #[display("level validation failed: {_0}")]
    #[from]
    ValidationFailed(ValidationError),
    /// The data has no id.
    #[display("level has no id")]
    MissingId,
    /// Building the slot graph failed.
    #[display("cannot build level: {_0}")]
    #[from]
    Graph(GraphError),
    /// A pool or solution word could not be parsed.
    #[display("cannot build level: {_0}")]
    #[from]
    InvalidWord(WordError),
}

/// Outcome of replaying a level's stored solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SolutionCheck {
    /// The level carries no solution.
    Absent,
    /// The solution fills every slot and satisfies every connection.
    Solves,
    /// The solution leaves a slot empty or breaks a connection.
    Fails,
}

/// A well-formed puzzle definition.
///
/// A level owns an empty [`SlotGraph`] describing its slots and connections,
/// along with the word pool. Play sessions copy the graph and place words on
/// the copy, so a level can be replayed or reset any number of times.
///
/// # Example
///
/// ```
/// use wordweb_core::{Level, LevelData};
///
/// let data = LevelData::from_json(r#"{
///     "id": 1,
///     "name": "First Steps",
///     "slots": [
///         { "id": "slot1", "x": 300, "y": 200, "wordLength": 3 },
///         { "id": "slot2", "x": 500, "y": 200, "wordLength": 3 }
///     ],
///     "connections": [{ "fromSlot": "slot1", "fromIndex": 2, "toSlot": "slot2", "toIndex": 0 }],
///     "words": ["cat", "toy"],
///     "solution": { "slot1": "CAT", "slot2": "TOY" }
/// }"#)?;
/// let level = Level::from_data(data)?;
///
/// assert_eq!(level.name(), "First Steps");
/// assert_eq!(level.words()[0].as_str(), "CAT");
/// assert!(level.check_solution().is_solves());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    id: LevelId,
    name: String,
    graph: SlotGraph,
    words: Vec<Word>,
    solution: Option<BTreeMap<SlotId, Word>>,
    is_custom: bool,
}

impl Level {
    /// Validates `data` and builds a level from it.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::ValidationFailed`] if the data is not well-formed,
    /// or [`LevelError::MissingId`] if it carries no id.
    pub fn from_data(data: LevelData) -> Result<Self, LevelError> {
        data.validate()?;
        let LevelData {
            id,
            name,
            slots,
            connections,
            words,
            solution,
            is_custom,
        } = data;
        let id = id.ok_or(LevelError::MissingId)?;

        let mut graph = SlotGraph::new();
        for slot in slots {
            graph.add_slot(slot.id, Position::new(slot.x, slot.y), slot.word_length)?;
        }
        for conn in &connections {
            graph.connect(&conn.from_slot, conn.from_index, &conn.to_slot, conn.to_index)?;
        }

        let words = words
            .iter()
            .map(|w| Word::new(w))
            .collect::<Result<Vec<_>, _>>()?;
        let solution = solution
            .map(|solution| {
                solution
                    .into_iter()
                    .map(|(slot, word)| Word::new(&word).map(|word| (slot, word)))
                    .collect::<Result<BTreeMap<_, _>, _>>()
            })
            .transpose()?;

        Ok(Self {
            id,
            name,
            graph,
            words,
            solution,
            is_custom,
        })
    }

    /// Converts the level back into its serialized form.
    #[must_use]
    pub fn to_data(&self) -> LevelData {
        LevelData {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            slots: self
                .graph
                .slots()
                .iter()
                .map(|slot| SlotData {
                    id: slot.id().clone(),
                    x: slot.position().x,
                    y: slot.position().y,
                    word_length: slot.word_length(),
                })
                .collect(),
            connections: self
                .graph
                .connections()
                .map(|conn| ConnectionData {
                    from_slot: conn.from.slot.clone(),
                    from_index: conn.from.index,
                    to_slot: conn.to.slot.clone(),
                    to_index: conn.to.index,
                })
                .collect(),
            words: self.words.iter().map(|w| w.as_str().to_owned()).collect(),
            solution: self.solution.as_ref().map(|solution| {
                solution
                    .iter()
                    .map(|(slot, word)| (slot.clone(), word.as_str().to_owned()))
                    .collect()
            }),
            is_custom: self.is_custom,
        }
    }

    /// Returns the level id.
    #[must_use]
    pub fn id(&self) -> &LevelId {
        &self.id
    }

    /// Returns this level under a different id.
    #[must_use]
    pub fn with_id(self, id: LevelId) -> Self {
        Self { id, ..self }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the empty slot graph.
    #[must_use]
    pub fn graph(&self) -> &SlotGraph {
        &self.graph
    }

    /// Returns the word pool.
    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Returns the stored solution, if any.
    #[must_use]
    pub fn solution(&self) -> Option<&BTreeMap<SlotId, Word>> {
        self.solution.as_ref()
    }

    /// Returns `true` for player-authored levels.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.is_custom
    }

    /// Returns the distinct slot lengths, shortest first.
    #[must_use]
    pub fn required_word_lengths(&self) -> Vec<usize> {
        self.graph
            .slots()
            .iter()
            .map(crate::Slot::word_length)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Returns the slots that no word in the pool can fill.
    #[must_use]
    pub fn unsatisfiable_slots(&self) -> Vec<&SlotId> {
        self.graph
            .slots()
            .iter()
            .filter(|slot| !self.words.iter().any(|w| w.len() == slot.word_length()))
            .map(crate::Slot::id)
            .collect()
    }

    /// Replays the stored solution on a scratch copy of the graph.
    #[must_use]
    pub fn check_solution(&self) -> SolutionCheck {
        let Some(solution) = &self.solution else {
            return SolutionCheck::Absent;
        };
        let mut graph = self.graph.clone();
        for (slot, word) in solution {
            if graph.place(slot, word.clone()).is_err() {
                return SolutionCheck::Fails;
            }
        }
        if graph.is_complete() {
            SolutionCheck::Solves
        } else {
            SolutionCheck::Fails
        }
    }
}
