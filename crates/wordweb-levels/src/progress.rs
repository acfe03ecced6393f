//! The persisted player record.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use wordweb_core::LevelId;

use crate::storage::{self, SAVE_KEY, Storage};

/// Player preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Play sound effects.
    pub sound_enabled: bool,
    /// Play background music.
    pub music_enabled: bool,
    /// Difficulty label.
    pub difficulty: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_enabled: true,
            difficulty: "normal".to_owned(),
        }
    }
}

/// Player progress, stored under [`SAVE_KEY`].
///
/// Every field defaults on its own, so records written by older versions load
/// with whatever they carry.
///
/// # Examples
///
/// ```
/// use wordweb_core::LevelId;
/// use wordweb_levels::Progress;
///
/// let mut progress = Progress::default();
/// let id = LevelId::from_number(1);
/// assert!(progress.complete_level(id.clone(), 42_000));
/// assert!(!progress.complete_level(id.clone(), 50_000));
/// assert_eq!(progress.best_time(&id), Some(42_000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Progress {
    /// Index of the built-in level to resume.
    pub current_level: usize,
    /// Ids of completed levels.
    pub completed_levels: BTreeSet<LevelId>,
    /// Best completion time per level, in milliseconds.
    pub best_times: BTreeMap<LevelId, u64>,
    /// Player preferences.
    pub settings: Settings,
}

impl Progress {
    /// Loads the record from `storage`.
    ///
    /// Missing or unreadable data yields the default record.
    pub fn load<S>(storage: &S) -> Self
    where
        S: Storage + ?Sized,
    {
        match storage::load_json(storage, SAVE_KEY) {
            Ok(Some(progress)) => progress,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("failed to load progress: {e}");
                Self::default()
            }
        }
    }

    /// Writes the record to `storage`.
    ///
    /// Returns `false` if the write failed; the failure is logged.
    pub fn save<S>(&self, storage: &mut S) -> bool
    where
        S: Storage + ?Sized,
    {
        match storage::save_json(storage, SAVE_KEY, self) {
            Ok(()) => {
                log::info!("saved progress");
                true
            }
            Err(e) => {
                log::warn!("failed to save progress: {e}");
                false
            }
        }
    }

    /// Records a completion of `id` in `time_ms` milliseconds.
    ///
    /// Returns `true` if the time is a new best for the level.
    pub fn complete_level(&mut self, id: LevelId, time_ms: u64) -> bool {
        self.completed_levels.insert(id.clone());
        match self.best_times.get_mut(&id) {
            Some(best) if *best <= time_ms => false,
            Some(best) => {
                *best = time_ms;
                true
            }
            None => {
                self.best_times.insert(id, time_ms);
                true
            }
        }
    }

    /// Returns `true` if `id` has been completed.
    #[must_use]
    pub fn is_level_completed(&self, id: &LevelId) -> bool {
        self.completed_levels.contains(id)
    }

    /// Returns the best time for `id`, in milliseconds.
    #[must_use]
    pub fn best_time(&self, id: &LevelId) -> Option<u64> {
        self.best_times.get(id).copied()
    }

    /// Forgets all progress. Settings are kept.
    pub fn reset(&mut self) {
        *self = Self {
            settings: self.settings.clone(),
            ..Self::default()
        };
    }
}
