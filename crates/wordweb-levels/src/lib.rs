//! Level catalogue and persistence for Word Web.
//!
//! - [`builtin_levels`]: the levels shipped with the game.
//! - [`LevelManager`]: navigation over built-in and custom levels, and
//!   persistence of custom levels.
//! - [`Progress`]: the player record (completed levels, best times,
//!   settings).
//! - [`Storage`]: the key-value store both of them persist through, with
//!   [`MemoryStorage`] and [`FileStorage`] implementations.
//!
//! Storage failures never abort a session. Loads degrade to defaults and
//! writes are logged and skipped.

pub use self::{builtin::*, manager::*, progress::*, storage::*};

mod builtin;
mod manager;
mod progress;
pub mod storage;
