//! Play-session state for Word Web puzzles.
//!
//! [`PuzzleState`] layers word placements onto an immutable
//! [`Level`](wordweb_core::Level). Every mutation reports which connections
//! it touched and their recomputed [`ConnectionStatus`](wordweb_core::ConnectionStatus),
//! so a front end can recolor exactly what changed.
//!
//! # Examples
//!
//! ```
//! use wordweb_core::{ConnectionStatus, Level, LevelData, SlotId};
//! use wordweb_game::{PuzzleState, PuzzleStatus};
//!
//! let data = LevelData::from_json(r#"{
//!     "id": 1,
//!     "name": "First Steps",
//!     "slots": [
//!         { "id": "slot1", "x": 300, "y": 200, "wordLength": 3 },
//!         { "id": "slot2", "x": 500, "y": 200, "wordLength": 3 }
//!     ],
//!     "connections": [{ "fromSlot": "slot1", "fromIndex": 2, "toSlot": "slot2", "toIndex": 0 }],
//!     "words": ["CAT", "TOY"]
//! }"#)?;
//! let mut puzzle = PuzzleState::new(Level::from_data(data)?);
//!
//! puzzle.try_place(&SlotId::from("slot1"), "cat")?;
//! let change = puzzle.try_place(&SlotId::from("slot2"), "toy")?;
//! assert_eq!(change.connections[0].status, ConnectionStatus::Valid);
//! assert_eq!(puzzle.status(), PuzzleStatus::Complete);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use self::{change::*, error::*, puzzle::*};

mod change;
mod error;
mod puzzle;
