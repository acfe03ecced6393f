//! Core data model for Word Web puzzles.
//!
//! A Word Web puzzle is a set of fixed-length slots whose letters are linked
//! by connections. A connection is satisfied when the two connected letters
//! are equal, and a puzzle is complete when every slot holds a word and every
//! connection is satisfied.
//!
//! # Overview
//!
//! - [`word`]: [`Word`], the canonical uppercase word type, and the pool
//!   length policy.
//! - [`id`]: [`SlotId`] and [`LevelId`].
//! - [`slot`]: [`Slot`], a single letter container, and its [`Endpoint`]s.
//! - [`graph`]: [`SlotGraph`], which owns slots and keeps connections
//!   symmetric, and the derived [`ConnectionStatus`].
//! - [`data`]: the serialized level format ([`LevelData`]).
//! - [`validate`](mod@validate): level well-formedness checks.
//! - [`level`]: [`Level`], a validated immutable level.
//!
//! # Examples
//!
//! ```
//! use wordweb_core::{ConnectionStatus, Position, SlotGraph, SlotId, Word};
//!
//! let (a, b) = (SlotId::from("a"), SlotId::from("b"));
//! let mut graph = SlotGraph::new();
//! graph.add_slot(a.clone(), Position::default(), 3)?;
//! graph.add_slot(b.clone(), Position::default(), 3)?;
//! graph.connect(&a, 2, &b, 0)?;
//!
//! graph.place(&a, Word::new("CAT")?)?;
//! graph.place(&b, Word::new("DOG")?)?;
//! assert_eq!(graph.connection_status(&a, 2)?, ConnectionStatus::Invalid);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod data;
pub mod graph;
pub mod id;
pub mod level;
pub mod slot;
pub mod validate;
pub mod word;

pub use self::{
    data::{ConnectionData, LevelData, SlotData},
    graph::{Connection, ConnectionStatus, GraphError, SlotGraph},
    id::{LevelId, SlotId},
    level::{Level, LevelError, SolutionCheck},
    slot::{Endpoint, Position, Slot},
    validate::{ValidationError, check, parse, validate},
    word::{MAX_WORD_LENGTH, MIN_WORD_LENGTH, Word, WordError, is_valid_pool_word},
};
