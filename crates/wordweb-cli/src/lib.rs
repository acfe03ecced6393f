//! Command-line front end for Word Web.
//!
//! The binary stands in for the game's UI and level editor: it lists levels,
//! validates and imports level files, and plays placements against a level.
//! Custom levels and progress are kept in a [`FileStorage`](wordweb_levels::FileStorage)
//! directory.

pub use self::{args::*, commands::*};

mod args;
mod commands;
