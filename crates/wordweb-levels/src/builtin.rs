//! The levels shipped with the game.

use wordweb_core::{Level, LevelData};

const BUILTIN_LEVELS: &str = include_str!("../levels/builtin.json");

/// Returns the built-in levels in play order.
///
/// # Panics
///
/// Panics if the embedded level data is malformed. The data is fixed at
/// compile time and covered by tests.
#[must_use]
pub fn builtin_levels() -> Vec<Level> {
    let data: Vec<LevelData> =
        serde_json::from_str(BUILTIN_LEVELS).expect("embedded level data is valid JSON");
    data.into_iter()
        .map(|data| Level::from_data(data).expect("embedded levels are well-formed"))
        .collect()
}
