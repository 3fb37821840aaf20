//! File parsing and serialization.
//!
//! An ra file is an ordered collection of named stanzas separated by runs
//! of one or more blank lines (trailing horizontal whitespace on a blank
//! line is tolerated). Every stanza in a file must open with the same key,
//! the file's `name_key`, and no two stanzas may share a name. A block
//! made up entirely of comment lines is kept in order as standalone
//! decoration rather than becoming a stanza.
//!
//! Serialization renders stanzas and comment blocks in insertion order,
//! separated by single blank lines.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::ra::error::RaError;
use crate::ra::stanza::{split_lines, RaStanza, StanzaOptions};

/// One or more blank lines, each optionally carrying trailing horizontal
/// whitespace.
static STANZA_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[ \t]*\r?\n){2,}").expect("stanza separator regex is valid"));

/// Splits end-trimmed ra text into stanza blocks on blank-line runs.
pub(crate) fn split_blocks(text: &str) -> impl Iterator<Item = &str> {
    STANZA_SEPARATOR.split(text.trim_end())
}

/// Options controlling file parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOptions {
    /// Track and enforce consistent indentation within each stanza.
    /// Defaults to true.
    pub check_indent: bool,
    /// Skip the record-kind validation hook after construction. Used by
    /// composed formats that assemble a file from sub-sections and
    /// validate once fully built. Defaults to false.
    pub skip_validation: bool,
}

impl Default for FileOptions {
    fn default() -> Self {
        FileOptions {
            check_indent: true,
            skip_validation: false,
        }
    }
}

/// One ordered entry of a file: a stanza (by name) or a standalone comment
/// block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FileEntry {
    /// The name of a stanza held by the file.
    Stanza(String),
    /// A block of comment-only lines, stored trimmed and joined with LF.
    Comment(String),
}

/// An ra file: named stanzas plus interleaved standalone comment blocks,
/// with insertion order preserved for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaFile {
    stanzas: HashMap<String, RaStanza>,
    order: Vec<FileEntry>,
    name_key: Option<String>,
    #[serde(skip)]
    check_indent: bool,
}

impl Default for RaFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RaFile {
    /// Creates an empty file with default options.
    pub fn new() -> Self {
        Self::with_options(FileOptions::default())
    }

    /// Creates an empty file.
    pub fn with_options(options: FileOptions) -> Self {
        RaFile {
            stanzas: HashMap::new(),
            order: Vec::new(),
            name_key: None,
            check_indent: options.check_indent,
        }
    }

    /// Parses an ra file from text with default options. Supports both LF
    /// and CRLF line terminators.
    pub fn parse(text: &str) -> Result<Self, RaError> {
        Self::parse_with_options(text, FileOptions::default())
    }

    /// Parses an ra file from text.
    pub fn parse_with_options(text: &str, options: FileOptions) -> Result<Self, RaError> {
        let mut file = Self::with_options(options);
        for block in split_blocks(text) {
            file.add(block)?;
        }
        Ok(file)
    }

    /// Builds a file from pre-split stanza blocks.
    pub fn from_blocks<'a, I>(blocks: I, options: FileOptions) -> Result<Self, RaError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut file = Self::with_options(options);
        for block in blocks {
            file.add(block)?;
        }
        Ok(file)
    }

    /// Adds a single stanza block to the file. A block of only comment
    /// lines is retained as ordered decoration instead of a stanza.
    pub fn add(&mut self, block: &str) -> Result<(), RaError> {
        if block.is_empty() {
            return Err(RaError::EmptyStanza);
        }
        if block.trim_start().starts_with('#') {
            let lines: Vec<&str> = split_lines(block.trim_end()).map(str::trim).collect();
            if lines.iter().all(|line| line.starts_with('#')) {
                self.order.push(FileEntry::Comment(lines.join("\n")));
                return Ok(());
            }
        }
        let stanza = RaStanza::parse_with_options(
            block,
            StanzaOptions {
                check_indent: self.check_indent,
            },
        )?;
        match (self.name_key.as_deref(), stanza.name_key()) {
            (None, Some(key)) => self.name_key = Some(key.to_string()),
            (Some(expected), Some(found)) if expected != found => {
                return Err(RaError::NameKeyMismatch {
                    expected: expected.to_string(),
                    found: found.to_string(),
                });
            }
            _ => {}
        }
        let name = match stanza.name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(RaError::UnnamedStanza),
        };
        if self.stanzas.contains_key(&name) {
            return Err(RaError::DuplicateStanzaName(name));
        }
        self.order.push(FileEntry::Stanza(name.clone()));
        self.stanzas.insert(name, stanza);
        Ok(())
    }

    /// Replaces a stanza without the checks `add` performs (no comment,
    /// empty-stanza, or duplicate handling). A stanza stored under a name
    /// not already in the entry order is not serialized. Prefer `add` when
    /// possible.
    pub fn update(&mut self, name: impl Into<String>, stanza: RaStanza) {
        self.stanzas.insert(name.into(), stanza);
    }

    /// Deletes a stanza by name. Returns whether it existed.
    pub fn delete(&mut self, name: &str) -> bool {
        self.order
            .retain(|entry| !matches!(entry, FileEntry::Stanza(n) if n == name));
        self.stanzas.remove(name).is_some()
    }

    /// Clears all stanzas and comments.
    pub fn clear(&mut self) {
        self.stanzas.clear();
        self.order.clear();
        self.name_key = None;
    }

    /// The stanza with this name, if any.
    pub fn get(&self, name: &str) -> Option<&RaStanza> {
        self.stanzas.get(name)
    }

    /// Mutable access to the stanza with this name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut RaStanza> {
        self.stanzas.get_mut(name)
    }

    /// Whether a stanza with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.stanzas.contains_key(name)
    }

    /// Named stanzas in insertion order.
    pub fn stanzas(&self) -> impl Iterator<Item = (&str, &RaStanza)> {
        self.order.iter().filter_map(|entry| match entry {
            FileEntry::Stanza(name) => {
                self.stanzas.get(name).map(|stanza| (name.as_str(), stanza))
            }
            FileEntry::Comment(_) => None,
        })
    }

    /// All ordered entries, stanza names and comment blocks.
    pub fn entries(&self) -> &[FileEntry] {
        &self.order
    }

    /// The number of stanzas in the file (comment blocks not counted).
    pub fn len(&self) -> usize {
        self.stanzas.len()
    }

    /// Whether the file has no stanzas.
    pub fn is_empty(&self) -> bool {
        self.stanzas.is_empty()
    }

    /// The first-line key shared by every stanza in the file, `None` for
    /// an empty file.
    pub fn name_key(&self) -> Option<&str> {
        self.name_key.as_deref()
    }
}

impl fmt::Display for RaFile {
    /// Renders the file as text fit for writing, stanzas and comment
    /// blocks in their original order separated by blank lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stanzas.is_empty() {
            return Ok(());
        }
        let mut pieces = Vec::with_capacity(self.order.len());
        for entry in &self.order {
            match entry {
                FileEntry::Comment(text) => pieces.push(format!("{text}\n")),
                FileEntry::Stanza(name) => {
                    if let Some(stanza) = self.stanzas.get(name) {
                        pieces.push(stanza.to_string());
                    }
                }
            }
        }
        write!(f, "{}", pieces.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file() {
        let file = RaFile::new();
        assert!(file.name_key().is_none());
        assert!(file.is_empty());
        assert_eq!(file.to_string(), "");
    }

    #[test]
    fn test_two_stanza_file_round_trips() {
        let input = "key1 valueA\nkey2 valueB\n\nkey1 valueC\nkey2 valueD\n";
        let file = RaFile::parse(input).unwrap();
        assert_eq!(file.name_key(), Some("key1"));
        assert_eq!(file.len(), 2);
        assert_eq!(file.get("valueA").unwrap().get("key2"), Some("valueB"));
        assert_eq!(file.get("valueC").unwrap().get("key2"), Some("valueD"));
        assert_eq!(file.to_string(), input);
    }

    #[test]
    fn test_multiple_blank_line_separators_collapse() {
        let input = "key1 valueA\n\n\n\nkey1 valueB\n";
        let file = RaFile::parse(input).unwrap();
        assert_eq!(file.len(), 2);
        assert_eq!(file.to_string(), "key1 valueA\n\nkey1 valueB\n");
    }

    #[test]
    fn test_blank_lines_with_trailing_whitespace_separate() {
        let input = "key1 valueA\n  \t\nkey1 valueB\n";
        let file = RaFile::parse(input).unwrap();
        assert_eq!(file.len(), 2);
    }

    #[test]
    fn test_standalone_comment_blocks() {
        let input = "key1 valueA\nkey2 valueB\n\n# A comment\n\nkey1 valueC\nkey2 valueD\n";
        let file = RaFile::parse(input).unwrap();
        assert_eq!(file.len(), 2);
        assert_eq!(
            file.entries()[1],
            FileEntry::Comment("# A comment".to_string())
        );
        assert_eq!(file.to_string(), input);
    }

    #[test]
    fn test_crlf_input_normalizes_to_lf() {
        let input = "key1 valueA\r\nkey2 valueB\r\n\r\n# A comment\r\n\r\nkey1 valueC\r\nkey2 valueD\r\n";
        let file = RaFile::parse(input).unwrap();
        assert_eq!(file.name_key(), Some("key1"));
        assert_eq!(
            file.to_string(),
            "key1 valueA\nkey2 valueB\n\n# A comment\n\nkey1 valueC\nkey2 valueD\n"
        );
    }

    #[test]
    fn test_from_blocks() {
        let blocks = [
            "key1 valueA\nkey2 valueB\n",
            "# A comment\n",
            "key1 valueC\nkey2 valueD\n",
        ];
        let file = RaFile::from_blocks(blocks, FileOptions::default()).unwrap();
        assert_eq!(file.name_key(), Some("key1"));
        assert_eq!(file.len(), 2);
    }

    #[test]
    fn test_empty_input_is_an_empty_stanza() {
        assert_eq!(RaFile::parse("").unwrap_err(), RaError::EmptyStanza);
    }

    #[test]
    fn test_mismatched_name_keys() {
        let err = RaFile::parse("key1 valueA\n\nother valueB\n").unwrap_err();
        assert_eq!(
            err,
            RaError::NameKeyMismatch {
                expected: "key1".to_string(),
                found: "other".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_stanza_names() {
        let err = RaFile::parse("key1 valueA\n\nkey1 valueA\nkey2 valueB\n").unwrap_err();
        assert_eq!(err, RaError::DuplicateStanzaName("valueA".to_string()));
    }

    #[test]
    fn test_unnamed_stanza() {
        // A dangling continuation never completes a field line, so the
        // stanza ends up with no identity at all
        let err = RaFile::from_blocks(["key1 valueA \\"], FileOptions::default()).unwrap_err();
        assert_eq!(err, RaError::UnnamedStanza);
    }

    #[test]
    fn test_delete_removes_from_serialization() {
        let mut file = RaFile::parse("key1 valueA\n\nkey1 valueB\n").unwrap();
        assert!(file.delete("valueA"));
        assert!(!file.delete("valueA"));
        assert_eq!(file.to_string(), "key1 valueB\n");
    }

    #[test]
    fn test_clear() {
        let mut file = RaFile::parse("key1 valueA\n").unwrap();
        file.clear();
        assert!(file.is_empty());
        assert!(file.name_key().is_none());
        assert_eq!(file.to_string(), "");
    }

    #[test]
    fn test_indented_stanzas_round_trip() {
        let input = "key1 valueA\nkey2 valueB\n\n    key1 valueC\n    key2 valueD\n";
        let file = RaFile::parse(input).unwrap();
        assert_eq!(file.get("valueC").unwrap().indent(), Some("    "));
        assert_eq!(file.to_string(), input);
    }
}
