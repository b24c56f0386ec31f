//! Word list management module
//!
//! Provides the vocabulary used by memorable passwords. A word list is
//! bundled with the crate; an external list can replace it at startup.

use rand::Rng;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, PoisonError, RwLock};
use thiserror::Error;

/// Environment variable naming an external word list file.
pub const WORDLIST_PATH_ENV: &str = "PWD_WORDLIST_PATH";

const BUNDLED_WORDS_RAW: &str = include_str!("../assets/wordlist.txt");

static BUNDLED_WORDS: OnceLock<Box<[&'static str]>> = OnceLock::new();
static CUSTOM_WORDS: RwLock<Option<Vec<String>>> = RwLock::new(None);

#[derive(Error, Debug)]
pub enum WordlistError {
    #[error("Word list file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read word list file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Word list file contains no usable words")]
    EmptyFile,
}

/// Keeps a word only if it is purely alphabetic, so a memorable password
/// always has a non-digit segment in front of its digit run.
fn parse_words<'a>(content: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    content
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty() && w.chars().all(char::is_alphabetic))
}

/// Returns the word list embedded in the crate.
pub fn bundled_words() -> &'static [&'static str] {
    BUNDLED_WORDS.get_or_init(|| parse_words(BUNDLED_WORDS_RAW).collect::<Vec<_>>().into_boxed_slice())
}

/// Returns the external word list path, if `PWD_WORDLIST_PATH` is set.
pub fn get_wordlist_path() -> Option<PathBuf> {
    std::env::var_os(WORDLIST_PATH_ENV).map(PathBuf::from)
}

/// Loads the external word list named by `PWD_WORDLIST_PATH`.
///
/// Without the variable the bundled list stays in use and its size is returned.
///
/// # Errors
///
/// See [`init_wordlist_from_path`].
pub fn init_wordlist() -> Result<usize, WordlistError> {
    match get_wordlist_path() {
        Some(path) => init_wordlist_from_path(path),
        None => Ok(bundled_words().len()),
    }
}

/// Replaces the bundled word list with the words in `path`, one per line.
///
/// Idempotent: once an external list is loaded, later calls return its size
/// without reading the file again.
///
/// # Errors
///
/// Returns error if:
/// - File does not exist
/// - File cannot be read
/// - File has no purely alphabetic entries
pub fn init_wordlist_from_path<P: AsRef<Path>>(path: P) -> Result<usize, WordlistError> {
    {
        let guard = CUSTOM_WORDS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(words) = guard.as_ref() {
            return Ok(words.len());
        }
    }

    let path = path.as_ref();

    if !path.exists() {
        #[cfg(feature = "tracing")]
        tracing::error!("Word list initialization FAILED: FileNotFound {:?}", path);
        return Err(WordlistError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let words: Vec<String> = parse_words(&content).map(str::to_lowercase).collect();

    if words.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::error!("Word list initialization FAILED: no usable words in {:?}", path);
        return Err(WordlistError::EmptyFile);
    }

    let count = words.len();
    *CUSTOM_WORDS.write().unwrap_or_else(PoisonError::into_inner) = Some(words);

    #[cfg(feature = "tracing")]
    tracing::info!("Word list initialized: {} words from {:?}", count, path);

    Ok(count)
}

/// Picks one word uniformly from the active word list.
pub fn choose_word<R: Rng + ?Sized>(rng: &mut R) -> String {
    let guard = CUSTOM_WORDS.read().unwrap_or_else(PoisonError::into_inner);
    match guard.as_deref() {
        Some(words) if !words.is_empty() => words.choose(rng).cloned().unwrap_or_default(),
        _ => bundled_words()
            .choose(rng)
            .map(|w| (*w).to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
pub fn reset_wordlist_for_testing() {
    *CUSTOM_WORDS.write().unwrap_or_else(PoisonError::into_inner) = None;
}
