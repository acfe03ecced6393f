use wordweb_core::{Connection, ConnectionStatus, SlotId, Word};

/// What a slot mutation did to the slot itself.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum SlotOperation {
    /// Nothing changed.
    NoOp,
    /// The word was placed.
    Placed(Word),
    /// The word was removed.
    Cleared(Word),
}

/// A connection touched by a slot mutation, with its recomputed status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUpdate {
    /// The touched connection.
    pub connection: Connection,
    /// Its status after the mutation.
    pub status: ConnectionStatus,
}

/// Result of a successful slot mutation.
///
/// `connections` lists every connection touching the slot, whether or not
/// its status changed, in the order the connections were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotChange {
    /// The mutated slot.
    pub slot: SlotId,
    /// What happened to the slot.
    pub operation: SlotOperation,
    /// Recomputed statuses of the touching connections.
    pub connections: Vec<ConnectionUpdate>,
}

impl SlotChange {
    /// Returns `true` if any touched connection is now invalid.
    #[must_use]
    pub fn has_conflict(&self) -> bool {
        self.connections.iter().any(|u| u.status.is_invalid())
    }
}

/// Whole-puzzle status, derived from slot and connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum PuzzleStatus {
    /// Some slot is empty or some connection is not valid.
    #[display("incomplete")]
    Incomplete,
    /// Every slot is filled and every connection is valid.
    #[display("complete")]
    Complete,
}
