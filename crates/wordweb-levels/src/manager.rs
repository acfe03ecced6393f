use std::collections::BTreeSet;

use wordweb_core::{Level, LevelData, LevelError, LevelId, ValidationError};

use crate::{
    builtin_levels,
    storage::{self, CUSTOM_LEVELS_KEY, Storage},
};

/// Errors returned by [`LevelManager::add_custom`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AddLevelError {
    /// The level data is not well-formed.
    #[display("custom level rejected: {_0}")]
    #[from]
    ValidationFailed(ValidationError),
    /// The level could not be built from validated data.
    #[display("custom level rejected: {_0}")]
    #[from]
    Level(LevelError),
}

/// Ordered level list with a navigation cursor.
///
/// Built-in levels come first, followed by custom levels in the order they
/// were added. The cursor walks the built-in levels only and never wraps
/// around; custom levels are reached through [`get`](Self::get) and
/// [`find`](Self::find). Custom levels are persisted to the storage provider
/// after each addition.
///
/// # Examples
///
/// ```
/// use wordweb_levels::{LevelManager, MemoryStorage};
///
/// let mut manager = LevelManager::new(MemoryStorage::new());
/// assert_eq!(manager.current().map(|l| l.name()), Some("First Steps"));
/// assert!(manager.retreat().is_none());
/// assert_eq!(manager.advance().map(|l| l.name()), Some("Triangle"));
/// assert_eq!(manager.current_index(), 1);
/// ```
#[derive(Debug)]
pub struct LevelManager<S> {
    built_in: Vec<Level>,
    custom: Vec<Level>,
    current_index: usize,
    storage: S,
}

impl<S> LevelManager<S>
where
    S: Storage,
{
    /// Creates a manager with the built-in levels and the custom levels
    /// found in `storage`.
    pub fn new(storage: S) -> Self {
        Self::with_levels(builtin_levels(), storage)
    }

    /// Creates a manager with the given built-in levels and the custom levels
    /// found in `storage`.
    ///
    /// A stored level whose id is already taken gets a fresh id, and the
    /// renumbered list is written back.
    pub fn with_levels(built_in: Vec<Level>, storage: S) -> Self {
        let stored = load_custom_levels(&storage);
        let mut manager = Self {
            built_in,
            custom: Vec::with_capacity(stored.len()),
            current_index: 0,
            storage,
        };

        let mut renumbered = false;
        for level in stored {
            let level = if manager.find(level.id()).is_some() {
                let id = manager.next_custom_id();
                log::warn!("stored custom level {} reuses a taken id; renumbered to {id}", level.id());
                renumbered = true;
                level.with_id(id)
            } else {
                level
            };
            manager.custom.push(level);
        }
        if renumbered {
            manager.save_custom_levels();
        }
        manager
    }

    /// Returns the number of levels, built-in and custom.
    #[must_use]
    pub fn len(&self) -> usize {
        self.built_in.len() + self.custom.len()
    }

    /// Returns `true` if there are no levels at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of built-in levels.
    #[must_use]
    pub fn built_in_len(&self) -> usize {
        self.built_in.len()
    }

    /// Returns the custom levels in the order they were added.
    #[must_use]
    pub fn custom_levels(&self) -> &[Level] {
        &self.custom
    }

    /// Returns every level: built-in first, then custom.
    pub fn all_levels(&self) -> impl Iterator<Item = &Level> {
        self.built_in.iter().chain(&self.custom)
    }

    /// Returns the level at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Level> {
        self.built_in
            .get(index)
            .or_else(|| self.custom.get(index.checked_sub(self.built_in.len())?))
    }

    /// Returns the level with the given id.
    #[must_use]
    pub fn find(&self, id: &LevelId) -> Option<&Level> {
        self.all_levels().find(|level| level.id() == id)
    }

    /// Returns the position of the level with the given id.
    #[must_use]
    pub fn index_of(&self, id: &LevelId) -> Option<usize> {
        self.all_levels().position(|level| level.id() == id)
    }

    /// Returns the cursor position.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Returns the built-in level under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&Level> {
        self.built_in.get(self.current_index)
    }

    /// Moves to the next built-in level.
    ///
    /// Returns `None` and stays put at the last built-in level.
    pub fn advance(&mut self) -> Option<&Level> {
        if self.current_index + 1 >= self.built_in.len() {
            return None;
        }
        self.current_index += 1;
        self.current()
    }

    /// Moves to the previous built-in level.
    ///
    /// Returns `None` and stays put at the first level.
    pub fn retreat(&mut self) -> Option<&Level> {
        if self.current_index == 0 {
            return None;
        }
        self.current_index -= 1;
        self.current()
    }

    /// Moves to the built-in level at `index`.
    ///
    /// Returns `None` and stays put if `index` is not a built-in level.
    pub fn set_index(&mut self, index: usize) -> Option<&Level> {
        if index >= self.built_in.len() {
            return None;
        }
        self.current_index = index;
        self.current()
    }

    fn next_custom_id(&self) -> LevelId {
        let used = self
            .all_levels()
            .filter_map(|level| level.id().as_number())
            .collect::<BTreeSet<_>>();
        let next = match used.last() {
            Some(&max) => max.checked_add(1).unwrap_or_else(|| smallest_unused(&used)),
            None => 1,
        };
        LevelId::from_number(next)
    }

    /// Validates `data` and appends it as a custom level.
    ///
    /// The level gets a fresh numeric id, one above the largest numeric id in
    /// use (or the smallest free one once that reaches `u64::MAX`), and is
    /// marked as custom; any id in `data` is replaced. The whole
    /// custom list is then written to storage. A failed write is logged and
    /// the level stays available for this session.
    ///
    /// # Errors
    ///
    /// Returns [`AddLevelError::ValidationFailed`] if `data` is not
    /// well-formed. Nothing is added in that case.
    pub fn add_custom(&mut self, mut data: LevelData) -> Result<&Level, AddLevelError> {
        data.validate()?;
        data.id = Some(self.next_custom_id());
        data.is_custom = true;
        let level = Level::from_data(data)?;
        log::info!("added custom level {} ({})", level.id(), level.name());

        self.custom.push(level);
        self.save_custom_levels();
        Ok(&self.custom[self.custom.len() - 1])
    }

    fn save_custom_levels(&mut self) {
        let data = self.custom.iter().map(Level::to_data).collect::<Vec<_>>();
        match storage::save_json(&mut self.storage, CUSTOM_LEVELS_KEY, &data) {
            Ok(()) => log::info!("saved {} custom levels", data.len()),
            Err(e) => log::warn!("failed to save custom levels: {e}"),
        }
    }

    /// Returns the storage provider.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the storage provider mutably.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

// `used` ends at `u64::MAX` when this is called, so a gap exists.
fn smallest_unused(used: &BTreeSet<u64>) -> u64 {
    (1..)
        .zip(used.range(1..))
        .find(|&(n, &id)| n != id)
        .map_or(1, |(n, _)| n)
}

fn load_custom_levels<S>(storage: &S) -> Vec<Level>
where
    S: Storage + ?Sized,
{
    let values: Vec<serde_json::Value> = match storage::load_json(storage, CUSTOM_LEVELS_KEY) {
        Ok(values) => values.unwrap_or_default(),
        Err(e) => {
            log::warn!("failed to load custom levels: {e}");
            return vec![];
        }
    };

    values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let level = wordweb_core::parse(value)
                .map_err(LevelError::from)
                .and_then(|mut data| {
                    data.is_custom = true;
                    Level::from_data(data)
                });
            match level {
                Ok(level) => Some(level),
                Err(e) => {
                    log::warn!("skipping stored custom level #{i}: {e}");
                    None
                }
            }
        })
        .collect()
}
