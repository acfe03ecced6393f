//! Canonical word representation.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// Shortest word a level's pool may offer.
pub const MIN_WORD_LENGTH: usize = 2;

/// Longest word a level's pool may offer.
pub const MAX_WORD_LENGTH: usize = 10;

/// A word made of ASCII letters, stored in canonical uppercase.
///
/// Letter comparisons between connected slots are case-insensitive, so every
/// word is normalized once on construction and compared byte-wise afterwards.
///
/// # Examples
///
/// ```
/// use wordweb_core::Word;
///
/// let word = Word::new("cat")?;
/// assert_eq!(word.as_str(), "CAT");
/// assert_eq!(word.letter(2), Some('T'));
/// assert!(Word::new("C4T").is_err());
/// # Ok::<(), wordweb_core::WordError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(String);

#[expect(clippy::len_without_is_empty)]
impl Word {
    /// Parses and normalizes a word.
    ///
    /// # Errors
    ///
    /// Returns [`WordError::Empty`] for an empty string and
    /// [`WordError::NonAlphabetic`] if any character is not an ASCII letter.
    pub fn new(s: &str) -> Result<Self, WordError> {
        if s.is_empty() {
            return Err(WordError::Empty);
        }
        if let Some((position, ch)) = s.chars().enumerate().find(|(_, c)| !c.is_ascii_alphabetic())
        {
            return Err(WordError::NonAlphabetic { ch, position });
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns the word as an uppercase string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number of letters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the uppercase letter at `index`, if any.
    #[must_use]
    pub fn letter(&self, index: usize) -> Option<char> {
        self.0.as_bytes().get(index).map(|&b| char::from(b))
    }

    /// Returns `true` if the word may be offered in a level's pool.
    ///
    /// Pool words must be between [`MIN_WORD_LENGTH`] and [`MAX_WORD_LENGTH`]
    /// letters long.
    #[must_use]
    pub fn is_pool_word(&self) -> bool {
        (MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&self.len())
    }
}

/// Returns `true` if `s` is an acceptable pool word.
///
/// The string must be alphabetic only, with a length between
/// [`MIN_WORD_LENGTH`] and [`MAX_WORD_LENGTH`].
#[must_use]
pub fn is_valid_pool_word(s: &str) -> bool {
    Word::new(s).is_ok_and(|word| word.is_pool_word())
}

impl Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for Word {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Word {
    type Error = WordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors returned when parsing a [`Word`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum WordError {
    /// The input was empty.
    #[display("word is empty")]
    Empty,
    /// The input contained a character that is not an ASCII letter.
    #[display("word contains non-alphabetic character {ch:?} at position {position}")]
    NonAlphabetic {
        /// The offending character.
        ch: char,
        /// Zero-based character position.
        position: usize,
    },
}
