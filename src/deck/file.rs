//! Plain-text deck files.
//!
//! ```text
//! Awesome Deck
//! sv3pt5-1
//! sv3pt5-1
//! sve-2
//! ```
//!
//! The first line is the title; every following line is one card
//! identifier (one line per copy). Blank identifier lines are skipped and
//! `\r\n` line endings are accepted. Files carry identifiers only, so
//! turning a `DeckFile` back into a `Deck` needs a catalog lookup per line
//! (see `DeckSession::load_deck`).

use std::fmt;

use super::model::Deck;
use crate::cards::CardId;
use crate::core::NonEmpty;

/// A decoded deck file, before identifiers are resolved to cards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckFile {
    pub title: String,
    /// Card identifiers with their 1-based line numbers.
    pub entries: Vec<(usize, CardId)>,
}

impl DeckFile {
    /// Identifiers in file order.
    pub fn ids(&self) -> impl Iterator<Item = &CardId> {
        self.entries.iter().map(|(_, id)| id)
    }
}

/// A file line whose identifier could not be turned into a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedLine {
    /// 1-based line number.
    pub line: usize,
    pub identifier: CardId,
    pub reason: String,
}

impl fmt::Display for UnresolvedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.identifier, self.reason)
    }
}

/// Why a deck file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum FileFormatError {
    #[error("empty file")]
    Empty,

    #[error("deck file is not valid UTF-8")]
    NotUtf8,

    #[error("{} card(s) could not be loaded: {}", .0.len(), join_lines(.0))]
    Unresolved(NonEmpty<UnresolvedLine>),

    #[error("deck file I/O: {0}")]
    Io(#[from] std::io::Error),
}

fn join_lines(lines: &NonEmpty<UnresolvedLine>) -> String {
    lines
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Serialize a deck: title line, then one identifier per card.
///
/// Line breaks inside the title are written as single spaces so the
/// title always stays on line 1.
#[must_use]
pub fn encode(deck: &Deck) -> Vec<u8> {
    let mut text = title_line(&deck.title);
    for card in deck.iter() {
        text.push('\n');
        text.push_str(card.id().as_str());
    }
    text.into_bytes()
}

fn title_line(title: &str) -> String {
    title
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
}

/// Parse a deck file.
///
/// Fails with `Empty` for zero bytes and `NotUtf8` for undecodable input.
/// Identifiers are not checked against any catalog here.
pub fn decode(bytes: &[u8]) -> Result<DeckFile, FileFormatError> {
    if bytes.is_empty() {
        return Err(FileFormatError::Empty);
    }
    let text = std::str::from_utf8(bytes).map_err(|_| FileFormatError::NotUtf8)?;

    let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));
    let title = lines.next().unwrap_or_default().to_string();

    let entries = lines
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            // Title is line 1.
            (!line.is_empty()).then(|| (index + 2, CardId::new(line)))
        })
        .collect();

    Ok(DeckFile { title, entries })
}
