//! Command-line arguments.

use std::{path::PathBuf, str::FromStr};

use clap::{Parser, Subcommand};
use wordweb_core::SlotId;

/// Word Web puzzle tools.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Directory holding custom levels and progress.
    #[arg(
        long,
        value_name = "DIR",
        env = "WORDWEB_DATA_DIR",
        default_value = ".wordweb",
        global = true
    )]
    pub data_dir: PathBuf,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List built-in and custom levels with completion state.
    Levels,
    /// Check that a level file is well-formed.
    Validate {
        /// Level definition in JSON.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Validate a level file and save it as a custom level.
    Import {
        /// Level definition in JSON.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Place words on a level and show the resulting state.
    Play {
        /// Level number, starting at 1. Defaults to the last built-in level
        /// played.
        #[arg(value_name = "LEVEL")]
        level: Option<usize>,

        /// Word to place, applied in order. Repeatable.
        #[arg(long = "place", value_name = "SLOT=WORD")]
        placements: Vec<Placement>,

        /// Solve time recorded when the level is completed.
        #[arg(long, value_name = "MS")]
        time_ms: Option<u64>,
    },
    /// Replay a level's stored solution.
    CheckSolution {
        /// Level number, starting at 1.
        #[arg(value_name = "LEVEL")]
        level: usize,
    },
}

/// A `SLOT=WORD` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Target slot.
    pub slot: SlotId,
    /// Word to place.
    pub word: String,
}

/// Errors returned when parsing a [`Placement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParsePlacementError {
    /// The input has no `=`.
    #[display("expected SLOT=WORD")]
    MissingSeparator,
    /// The slot part is empty.
    #[display("slot id is empty")]
    EmptySlot,
}

impl FromStr for Placement {
    type Err = ParsePlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (slot, word) = s
            .split_once('=')
            .ok_or(ParsePlacementError::MissingSeparator)?;
        let slot = slot.trim();
        if slot.is_empty() {
            return Err(ParsePlacementError::EmptySlot);
        }
        Ok(Self {
            slot: SlotId::from(slot),
            word: word.trim().to_owned(),
        })
    }
}
