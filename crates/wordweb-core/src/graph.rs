//! The slot graph: slots plus the letter connections between them.

use std::collections::HashMap;

use crate::{Endpoint, Position, Slot, SlotId, Word};

/// A letter-equality constraint between two slot endpoints.
///
/// The pair is unordered for every purpose except display; `from`/`to` keep
/// the orientation the connection was authored with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Endpoint the connection was drawn from.
    pub from: Endpoint,
    /// Endpoint the connection was drawn to.
    pub to: Endpoint,
}

impl Connection {
    /// Returns `true` if either endpoint lies on `slot`.
    #[must_use]
    pub fn touches(&self, slot: &SlotId) -> bool {
        self.from.slot == *slot || self.to.slot == *slot
    }

    /// Returns `true` if `endpoint` is one of the two sides.
    #[must_use]
    pub fn has_endpoint(&self, endpoint: &Endpoint) -> bool {
        self.from == *endpoint || self.to == *endpoint
    }
}

/// Derived state of a letter connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum ConnectionStatus {
    /// The letter index has no connection.
    #[display("unconnected")]
    Unconnected,
    /// At least one side is unfilled.
    #[display("pending")]
    Pending,
    /// Both sides are filled with the same letter.
    #[display("valid")]
    Valid,
    /// Both sides are filled with different letters.
    #[display("invalid")]
    Invalid,
}

impl ConnectionStatus {
    fn from_letters(a: Option<char>, b: Option<char>) -> Self {
        match (a, b) {
            (Some(a), Some(b)) if a == b => Self::Valid,
            (Some(_), Some(_)) => Self::Invalid,
            _ => Self::Pending,
        }
    }
}

/// Errors produced by slot and graph operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GraphError {
    /// No slot with this id exists.
    #[display("unknown slot {slot}")]
    UnknownSlot {
        /// The missing id.
        slot: SlotId,
    },
    /// A slot with this id already exists.
    #[display("duplicate slot {slot}")]
    DuplicateSlot {
        /// The repeated id.
        slot: SlotId,
    },
    /// A slot was declared with zero letters.
    #[display("slot {slot} has zero length")]
    ZeroLength {
        /// The offending slot.
        slot: SlotId,
    },
    /// A letter index lies outside its slot.
    #[display("index {index} is out of range for slot {slot} of length {word_length}")]
    IndexOutOfRange {
        /// The slot addressed.
        slot: SlotId,
        /// The requested index.
        index: usize,
        /// The slot's length.
        word_length: usize,
    },
    /// The endpoint already takes part in a connection.
    #[display("letter {index} of slot {slot} is already connected")]
    DuplicateConnection {
        /// The slot addressed.
        slot: SlotId,
        /// The already connected index.
        index: usize,
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
}

/// Slots and the symmetric connections between their letters.
///
/// The graph owns every slot; callers address slots by [`SlotId`]. Each
/// connection is recorded once in authoring order, and as a back-reference on
/// both slots so that either side can look up its counterpart.
///
/// # Example
///
/// ```
/// use wordweb_core::{ConnectionStatus, Position, SlotGraph, SlotId, Word};
///
/// let a = SlotId::from("a");
/// let b = SlotId::from("b");
/// let mut graph = SlotGraph::new();
/// graph.add_slot(a.clone(), Position::default(), 3)?;
/// graph.add_slot(b.clone(), Position::default(), 3)?;
/// graph.connect(&a, 2, &b, 0)?;
///
/// graph.place(&a, Word::new("CAT")?)?;
/// assert_eq!(graph.connection_status(&a, 2)?, ConnectionStatus::Pending);
/// graph.place(&b, Word::new("TOY")?)?;
/// assert_eq!(graph.connection_status(&b, 0)?, ConnectionStatus::Valid);
/// assert!(graph.is_complete());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotGraph {
    slots: Vec<Slot>,
    lookup: HashMap<SlotId, usize>,
    connections: Vec<Connection>,
}

impl SlotGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty, unconnected slot.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateSlot`] if the id is taken, or
    /// [`GraphError::ZeroLength`] if `word_length` is zero.
    pub fn add_slot(
        &mut self,
        id: SlotId,
        position: Position,
        word_length: usize,
    ) -> Result<&Slot, GraphError> {
        if self.lookup.contains_key(&id) {
            return Err(GraphError::DuplicateSlot { slot: id });
        }
        let slot = Slot::new(id.clone(), position, word_length)?;
        let index = self.slots.len();
        self.slots.push(slot);
        self.lookup.insert(id, index);
        Ok(&self.slots[index])
    }

    /// Returns the slot with the given id.
    #[must_use]
    pub fn slot(&self, id: &SlotId) -> Option<&Slot> {
        self.lookup.get(id).map(|&i| &self.slots[i])
    }

    /// Returns all slots in insertion order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the graph has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns every connection once, in the order it was made.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// Returns the connections with at least one endpoint on `slot`.
    pub fn connections_of<'a>(&'a self, slot: &'a SlotId) -> impl Iterator<Item = &'a Connection> {
        self.connections.iter().filter(move |conn| conn.touches(slot))
    }

    fn get(&self, id: &SlotId) -> Result<&Slot, GraphError> {
        self.slot(id)
            .ok_or_else(|| GraphError::UnknownSlot { slot: id.clone() })
    }

    fn get_mut(&mut self, id: &SlotId) -> Result<&mut Slot, GraphError> {
        match self.lookup.get(id) {
            Some(&i) => Ok(&mut self.slots[i]),
            None => Err(GraphError::UnknownSlot { slot: id.clone() }),
        }
    }

    /// Connects letter `index` of `slot` with letter `other_index` of `other`.
    ///
    /// Both slots receive a back-reference to each other. An endpoint takes
    /// part in at most one connection; disconnect it first to re-link.
    ///
    /// # Errors
    ///
    /// - [`GraphError::UnknownSlot`] if either slot does not exist.
    /// - [`GraphError::IndexOutOfRange`] if either index is out of bounds.
    /// - [`GraphError::DuplicateConnection`] if either endpoint is already
    ///   connected, or both sides name the same endpoint.
    pub fn connect(
        &mut self,
        slot: &SlotId,
        index: usize,
        other: &SlotId,
        other_index: usize,
    ) -> Result<&Connection, GraphError> {
        let this_slot = self.get(slot)?;
        let other_slot = self.get(other)?;
        this_slot.check_index(index)?;
        other_slot.check_index(other_index)?;

        if this_slot.link(index).is_some() || (slot == other && index == other_index) {
            return Err(GraphError::DuplicateConnection {
                slot: slot.clone(),
                index,
            });
        }
        if other_slot.link(other_index).is_some() {
            return Err(GraphError::DuplicateConnection {
                slot: other.clone(),
                index: other_index,
            });
        }

        let from = this_slot.endpoint(index);
        let to = other_slot.endpoint(other_index);
        self.get_mut(slot)?.set_link(index, to.clone());
        self.get_mut(other)?.set_link(other_index, from.clone());
        self.connections.push(Connection { from, to });
        Ok(&self.connections[self.connections.len() - 1])
    }

    /// Removes the connection at letter `index` of `slot`, on both sides.
    ///
    /// Returns the removed connection, or `None` if the index was not
    /// connected.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownSlot`] if the slot does not exist.
    pub fn disconnect(
        &mut self,
        slot: &SlotId,
        index: usize,
    ) -> Result<Option<Connection>, GraphError> {
        let Some(other) = self.get_mut(slot)?.remove_link(index) else {
            return Ok(None);
        };
        self.get_mut(&other.slot)?.remove_link(other.index);

        let endpoint = Endpoint::new(slot.clone(), index);
        let position = self
            .connections
            .iter()
            .position(|conn| conn.has_endpoint(&endpoint));
        Ok(position.map(|i| self.connections.remove(i)))
    }

    /// Places `word` in `slot`, replacing any previous word.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownSlot`] or [`GraphError::LengthMismatch`].
    pub fn place(&mut self, slot: &SlotId, word: Word) -> Result<(), GraphError> {
        self.get_mut(slot)?.place(word)
    }

    /// Clears `slot` and returns the word it held.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownSlot`] if the slot does not exist.
    pub fn clear(&mut self, slot: &SlotId) -> Result<Option<Word>, GraphError> {
        Ok(self.get_mut(slot)?.clear())
    }

    /// Clears every slot. Connections are kept.
    pub fn clear_all(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    /// Returns the derived status of a connection.
    #[must_use]
    pub fn status_of(&self, connection: &Connection) -> ConnectionStatus {
        let letter = |endpoint: &Endpoint| {
            self.slot(&endpoint.slot)
                .and_then(|slot| slot.letter(endpoint.index))
        };
        ConnectionStatus::from_letters(letter(&connection.from), letter(&connection.to))
    }

    /// Returns the status of the connection at letter `index` of `slot`.
    ///
    /// The result is the same whichever endpoint of a connection is asked.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownSlot`] or [`GraphError::IndexOutOfRange`].
    pub fn connection_status(
        &self,
        slot: &SlotId,
        index: usize,
    ) -> Result<ConnectionStatus, GraphError> {
        let this = self.get(slot)?;
        this.check_index(index)?;
        let Some(other) = this.link(index) else {
            return Ok(ConnectionStatus::Unconnected);
        };
        let other_letter = self
            .slot(&other.slot)
            .and_then(|slot| slot.letter(other.index));
        Ok(ConnectionStatus::from_letters(
            this.letter(index),
            other_letter,
        ))
    }

    /// Returns `true` if `slot` is filled and all of its connections are valid.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownSlot`] if the slot does not exist.
    pub fn is_slot_complete(&self, slot: &SlotId) -> Result<bool, GraphError> {
        let this = self.get(slot)?;
        if !this.is_filled() {
            return Ok(false);
        }
        for (index, _) in this.links() {
            if !self.connection_status(slot, index)?.is_valid() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Returns `true` if every slot holds a word.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.slots.iter().all(Slot::is_filled)
    }

    /// Returns `true` if every slot is filled and every connection is valid.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_filled()
            && self
                .connections
                .iter()
                .all(|conn| self.status_of(conn).is_valid())
    }
}
