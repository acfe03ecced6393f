//! Subcommand implementations.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use wordweb_core::{Level, LevelId, SolutionCheck, ValidationError};
use wordweb_game::{PuzzleError, PuzzleState};
use wordweb_levels::{AddLevelError, LevelManager, Progress, Storage};

use crate::{Command, Placement};

/// Errors that end a command with a failure exit code.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CliError {
    /// Level numbers start at 1 and end at the level count.
    #[display("no level {number}; there are {count} levels")]
    UnknownLevel {
        /// Requested 1-based number.
        number: usize,
        /// Number of levels available.
        count: usize,
    },
    /// A level file could not be read.
    #[display("cannot read {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A level file is not JSON.
    #[display("invalid JSON: {_0}")]
    #[from]
    Json(serde_json::Error),
    /// A level file is not a well-formed level.
    #[display("invalid level: {_0}")]
    #[from]
    Invalid(ValidationError),
    /// Importing a level failed.
    #[display("{_0}")]
    #[from]
    AddLevel(AddLevelError),
    /// A placement was rejected.
    #[display("{_0}")]
    #[from]
    Puzzle(PuzzleError),
    /// The stored solution does not solve its level.
    #[display("the stored solution of level {number} does not solve it")]
    SolutionFails {
        /// 1-based level number.
        number: usize,
    },
    /// Writing output failed.
    #[display("cannot write output: {_0}")]
    #[from]
    Output(io::Error),
}

/// Runs `command` against the levels and progress in `storage`.
///
/// # Errors
///
/// Returns [`CliError`] if the command fails.
pub fn run<S, W>(command: Command, storage: S, out: &mut W) -> Result<(), CliError>
where
    S: Storage,
    W: Write + ?Sized,
{
    let mut manager = LevelManager::new(storage);
    match command {
        Command::Levels => list_levels(&manager, out),
        Command::Validate { file } => validate_file(&file, out),
        Command::Import { file } => import_file(&mut manager, &file, out),
        Command::Play {
            level,
            placements,
            time_ms,
        } => play(&mut manager, level, &placements, time_ms, out),
        Command::CheckSolution { level } => check_solution(&manager, level, out),
    }
}

/// Picks level `number`, or the saved position when it is `None`.
///
/// Only built-in levels move the cursor.
fn select<S>(
    manager: &mut LevelManager<S>,
    number: Option<usize>,
    progress: &Progress,
) -> Result<(usize, Level), CliError>
where
    S: Storage,
{
    let count = manager.len();
    let index = match number {
        Some(number) => {
            let index = number
                .checked_sub(1)
                .filter(|&index| index < count)
                .ok_or(CliError::UnknownLevel { number, count })?;
            manager.set_index(index);
            index
        }
        None => {
            manager.set_index(progress.current_level);
            manager.current_index()
        }
    };
    let level = manager.get(index).ok_or(CliError::UnknownLevel {
        number: index + 1,
        count,
    })?;
    Ok((index + 1, level.clone()))
}

fn read_level(path: &Path) -> Result<serde_json::Value, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

fn format_time(ms: u64) -> String {
    format!("{}.{:02}s", ms / 1000, ms % 1000 / 10)
}

fn list_levels<S, W>(manager: &LevelManager<S>, out: &mut W) -> Result<(), CliError>
where
    S: Storage,
    W: Write + ?Sized,
{
    let progress = Progress::load(manager.storage());
    for (number, level) in (1..).zip(manager.all_levels()) {
        let mut notes = vec![];
        if level.is_custom() {
            notes.push("custom".to_owned());
        }
        if progress.is_level_completed(level.id()) {
            notes.push("completed".to_owned());
        }
        if let Some(ms) = progress.best_time(level.id()) {
            notes.push(format!("best {}", format_time(ms)));
        }
        write!(out, "{number:>3}  {}", level.name())?;
        if !notes.is_empty() {
            write!(out, "  ({})", notes.join(", "))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn describe_level<W>(level: &Level, out: &mut W) -> io::Result<()>
where
    W: Write + ?Sized,
{
    let lengths = level
        .required_word_lengths()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    writeln!(
        out,
        "{} slots, {} connections, {} words",
        level.graph().len(),
        level.graph().connections().count(),
        level.words().len()
    )?;
    writeln!(out, "word lengths needed: {}", lengths.join(", "))?;
    for slot in level.unsatisfiable_slots() {
        writeln!(out, "warning: no word fits slot {slot}")?;
    }
    Ok(())
}

fn validate_file<W>(path: &Path, out: &mut W) -> Result<(), CliError>
where
    W: Write + ?Sized,
{
    let value = read_level(path)?;
    let mut data = wordweb_core::parse(&value)?;
    writeln!(out, "{}: valid", path.display())?;
    // Editor output has no id until it is imported.
    data.id.get_or_insert_with(|| LevelId::from_number(0));
    if let Ok(level) = Level::from_data(data) {
        describe_level(&level, out)?;
    }
    Ok(())
}

fn import_file<S, W>(
    manager: &mut LevelManager<S>,
    path: &Path,
    out: &mut W,
) -> Result<(), CliError>
where
    S: Storage,
    W: Write + ?Sized,
{
    let value = read_level(path)?;
    let data = wordweb_core::parse(&value)?;
    let name = manager.add_custom(data)?.name().to_owned();
    let number = manager.len();
    writeln!(out, "imported level {number}: {name}")?;
    if let Some(level) = manager.get(number - 1) {
        describe_level(level, out)?;
    }
    Ok(())
}

fn play<S, W>(
    manager: &mut LevelManager<S>,
    number: Option<usize>,
    placements: &[Placement],
    time_ms: Option<u64>,
    out: &mut W,
) -> Result<(), CliError>
where
    S: Storage,
    W: Write + ?Sized,
{
    let mut progress = Progress::load(manager.storage());
    let saved = progress.clone();
    let (number, level) = select(manager, number, &progress)?;
    writeln!(out, "level {number}: {}", level.name())?;

    let mut puzzle = PuzzleState::new(level);
    for placement in placements {
        let change = puzzle.try_place(&placement.slot, &placement.word)?;
        if change.has_conflict() {
            log::debug!("placement in {} conflicts", change.slot);
        }
    }

    for slot in puzzle.graph().slots() {
        let word = slot.word().map_or("_".repeat(slot.word_length()), |w| w.to_string());
        writeln!(out, "  {:<8} {word}", slot.id().as_str())?;
    }
    for connection in puzzle.graph().connections() {
        writeln!(
            out,
            "  {}[{}] - {}[{}]: {}",
            connection.from.slot,
            connection.from.index,
            connection.to.slot,
            connection.to.index,
            puzzle.graph().status_of(connection)
        )?;
    }
    let remaining = puzzle
        .remaining_words()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    if !remaining.is_empty() {
        writeln!(out, "words left: {}", remaining.join(", "))?;
    }
    writeln!(out, "{}", puzzle.status())?;

    if !puzzle.level().is_custom() {
        progress.current_level = manager.current_index();
    }
    if puzzle.is_level_complete() {
        let id = puzzle.level().id().clone();
        match time_ms {
            Some(ms) => {
                if progress.complete_level(id, ms) {
                    writeln!(out, "new best time: {}", format_time(ms))?;
                }
            }
            None => {
                progress.completed_levels.insert(id);
            }
        }
    }
    if progress != saved {
        progress.save(manager.storage_mut());
    }
    Ok(())
}

fn check_solution<S, W>(
    manager: &LevelManager<S>,
    number: usize,
    out: &mut W,
) -> Result<(), CliError>
where
    S: Storage,
    W: Write + ?Sized,
{
    let level = number
        .checked_sub(1)
        .and_then(|index| manager.get(index))
        .ok_or(CliError::UnknownLevel {
            number,
            count: manager.len(),
        })?;
    match level.check_solution() {
        SolutionCheck::Absent => writeln!(out, "level {number} has no stored solution")?,
        SolutionCheck::Solves => writeln!(out, "level {number}: solution solves the level")?,
        SolutionCheck::Fails => return Err(CliError::SolutionFails { number }),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use wordweb_core::SlotId;
    use wordweb_levels::MemoryStorage;

    use super::*;

    fn run_to_string(command: Command, storage: &mut MemoryStorage) -> Result<String, CliError> {
        let mut out = vec![];
        run(command, storage, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn place(slot: &str, word: &str) -> Placement {
        Placement {
            slot: SlotId::from(slot),
            word: word.to_owned(),
        }
    }

    const CUSTOM: &str = r#"{
        "name": "Pair",
        "slots": [
            { "id": "a", "x": 100, "y": 100, "wordLength": 3 },
            { "id": "b", "x": 200, "y": 100, "wordLength": 5 }
        ],
        "connections": [{ "fromSlot": "a", "fromIndex": 0, "toSlot": "b", "toIndex": 0 }],
        "words": ["SUN", "SOLAR"]
    }"#;

    #[test]
    fn test_levels_lists_builtin() {
        let mut storage = MemoryStorage::new();
        let out = run_to_string(Command::Levels, &mut storage).unwrap();
        assert_eq!(out.lines().count(), 5);
        assert!(out.starts_with("  1  First Steps\n"));
        assert!(out.contains("  5  Spider Web"));
    }

    #[test]
    fn test_play_complete_records_progress() {
        let mut storage = MemoryStorage::new();
        let out = run_to_string(
            Command::Play {
                level: Some(1),
                placements: vec![place("slot1", "cat"), place("slot2", "toy")],
                time_ms: Some(4250),
            },
            &mut storage,
        )
        .unwrap();
        assert!(out.contains("slot1[2] - slot2[0]: valid"));
        assert!(out.contains("\ncomplete\n"));
        assert!(out.contains("new best time: 4.25s"));

        let progress = Progress::load(&storage);
        assert_eq!(progress.best_time(&LevelId::from_number(1)), Some(4250));

        let out = run_to_string(Command::Levels, &mut storage).unwrap();
        assert!(out.starts_with("  1  First Steps  (completed, best 4.25s)\n"));
    }

    #[test]
    fn test_play_reports_conflicts_without_recording() {
        let mut storage = MemoryStorage::new();
        let out = run_to_string(
            Command::Play {
                level: Some(1),
                placements: vec![place("slot1", "TOY"), place("slot2", "CAT")],
                time_ms: None,
            },
            &mut storage,
        )
        .unwrap();
        assert!(out.contains("slot1[2] - slot2[0]: invalid"));
        assert!(out.contains("\nincomplete\n"));
        assert_eq!(Progress::load(&storage), Progress::default());
    }

    #[test]
    fn test_play_rejects_bad_input() {
        let mut storage = MemoryStorage::new();
        assert!(matches!(
            run_to_string(
                Command::Play {
                    level: Some(0),
                    placements: vec![],
                    time_ms: None
                },
                &mut storage
            ),
            Err(CliError::UnknownLevel { number: 0, count: 5 })
        ));
        assert!(matches!(
            run_to_string(
                Command::Play {
                    level: Some(1),
                    placements: vec![place("slot1", "BOAT")],
                    time_ms: None
                },
                &mut storage
            ),
            Err(CliError::Puzzle(PuzzleError::LengthMismatch { .. }))
        ));
    }

    #[test]
    fn test_validate_and_import() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("pair.json");
        fs::write(&good, CUSTOM).unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, CUSTOM.replace("SOLAR", "S0LAR")).unwrap();

        let mut storage = MemoryStorage::new();
        let out = run_to_string(Command::Validate { file: good.clone() }, &mut storage).unwrap();
        assert!(out.contains(": valid\n"));
        assert!(out.contains("word lengths needed: 3, 5"));
        assert!(matches!(
            run_to_string(Command::Validate { file: bad.clone() }, &mut storage),
            Err(CliError::Invalid(ValidationError::InvalidWord { index: 1, .. }))
        ));
        assert!(matches!(
            run_to_string(Command::Import { file: bad }, &mut storage),
            Err(CliError::Invalid(_))
        ));

        let out = run_to_string(Command::Import { file: good }, &mut storage).unwrap();
        assert!(out.starts_with("imported level 6: Pair\n"));
        assert!(out.contains("word lengths needed: 3, 5"));

        let out = run_to_string(Command::Levels, &mut storage).unwrap();
        assert!(out.contains("  6  Pair  (custom)"));

        let out = run_to_string(
            Command::Play {
                level: Some(6),
                placements: vec![place("a", "sun"), place("b", "solar")],
                time_ms: None,
            },
            &mut storage,
        )
        .unwrap();
        assert!(out.contains("\ncomplete\n"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let mut storage = MemoryStorage::new();
        assert!(matches!(
            run_to_string(
                Command::Validate {
                    file: dir.path().join("missing.json")
                },
                &mut storage
            ),
            Err(CliError::Read { .. })
        ));
    }

    #[test]
    fn test_check_solution() {
        let mut storage = MemoryStorage::new();
        for level in 1..=5 {
            let out = run_to_string(Command::CheckSolution { level }, &mut storage).unwrap();
            assert!(out.contains("solution solves the level"), "{out}");
        }
        assert!(matches!(
            run_to_string(Command::CheckSolution { level: 6 }, &mut storage),
            Err(CliError::UnknownLevel { number: 6, count: 5 })
        ));
    }

    #[test]
    fn test_play_resumes_saved_level() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("pair.json");
        fs::write(&file, CUSTOM).unwrap();

        let mut storage = MemoryStorage::new();
        let play = |level| Command::Play {
            level,
            placements: vec![],
            time_ms: None,
        };

        let out = run_to_string(play(None), &mut storage).unwrap();
        assert!(out.starts_with("level 1: First Steps\n"));

        run_to_string(play(Some(3)), &mut storage).unwrap();
        assert_eq!(Progress::load(&storage).current_level, 2);

        run_to_string(Command::Import { file }, &mut storage).unwrap();
        let out = run_to_string(play(Some(6)), &mut storage).unwrap();
        assert!(out.starts_with("level 6: Pair\n"));

        let out = run_to_string(play(None), &mut storage).unwrap();
        assert!(out.starts_with("level 3: Cross Roads\n"));
    }
}
