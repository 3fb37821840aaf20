//! Stanza parsing and serialization.
//!
//! A stanza is one ra record: a contiguous run of non-blank lines in which
//! each line is either a `key value` field or a `#` comment. The first
//! field line fixes the stanza's identity, its key becoming the `name_key`
//! (what kind of record this is, e.g. `track` or `genome`) and its value
//! the `name` (the record's unique identity within a file).
//!
//! Line handling:
//!     A line whose end-trimmed content finishes with `\` logically
//! continues onto the next physical line, whose leading whitespace is
//! stripped before joining; this can chain. Comments are recorded at their
//! current position, so a comment encountered mid-continuation ends up
//! immediately before the field line it interrupted. All field lines of a
//! stanza must share one leading indent when indent checking is on; when it
//! is off, indentation is stripped and not validated.
//!
//! Duplicate keys are accepted only when the value is identical, a no-op.
//! A bare key (no value) is stored with an empty value if new and ignored
//! if already present.
//!
//! Serialization emits entries in their recorded order, re-indents
//! comments to the stanza indent, and renders continuation-joined lines as
//! a single line.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::ra::error::RaError;

/// Options controlling stanza parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StanzaOptions {
    /// Track the stanza's leading indent and require every field line to
    /// match it exactly. Defaults to true.
    pub check_indent: bool,
}

impl Default for StanzaOptions {
    fn default() -> Self {
        StanzaOptions { check_indent: true }
    }
}

/// One recorded line of a stanza, in original order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StanzaEntry {
    /// A `key value` line. The value may be empty (a bare key).
    Field { key: String, value: String },
    /// A `#` comment line, stored trimmed.
    Comment(String),
}

/// An ra stanza: an ordered collection of fields and comments with a
/// key-based lookup index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RaStanza {
    entries: Vec<StanzaEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    name_key: Option<String>,
    name: Option<String>,
    indent: Option<String>,
    #[serde(skip)]
    check_indent: bool,
    /// Buffer for a pending `\`-continued logical line.
    #[serde(skip)]
    continued: Option<String>,
}

impl Default for RaStanza {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits text into lines on LF or CRLF.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line))
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

impl RaStanza {
    /// Creates an empty stanza with default options.
    pub fn new() -> Self {
        Self::with_options(StanzaOptions::default())
    }

    /// Creates an empty stanza.
    pub fn with_options(options: StanzaOptions) -> Self {
        RaStanza {
            entries: Vec::new(),
            index: HashMap::new(),
            name_key: None,
            name: None,
            indent: None,
            check_indent: options.check_indent,
            continued: None,
        }
    }

    /// Parses a stanza from text with default options. Supports both LF
    /// and CRLF line terminators.
    pub fn parse(text: &str) -> Result<Self, RaError> {
        Self::parse_with_options(text, StanzaOptions::default())
    }

    /// Parses a stanza from text.
    pub fn parse_with_options(text: &str, options: StanzaOptions) -> Result<Self, RaError> {
        let mut stanza = Self::with_options(options);
        for line in split_lines(text.trim_end()) {
            stanza.add_line(line)?;
        }
        Ok(stanza)
    }

    /// Builds a stanza from pre-split lines.
    pub fn from_lines<'a, I>(lines: I, options: StanzaOptions) -> Result<Self, RaError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut stanza = Self::with_options(options);
        for line in lines {
            stanza.add_line(line)?;
        }
        Ok(stanza)
    }

    /// Adds a single raw line to the stanza, updating the entry order and
    /// the key index together. Re-adding an existing line is a no-op.
    pub fn add_line(&mut self, line: &str) -> Result<(), RaError> {
        if line.is_empty() {
            return Err(RaError::BlankLine);
        }
        if line.trim().starts_with('#') {
            self.entries
                .push(StanzaEntry::Comment(line.trim().to_string()));
            return Ok(());
        }
        if let Some(stripped) = line.trim_end().strip_suffix('\\') {
            match &mut self.continued {
                Some(buffer) => buffer.push_str(stripped.trim_start()),
                None => self.continued = Some(stripped.to_string()),
            }
            return Ok(());
        }
        let combined = match self.continued.take() {
            Some(buffer) => buffer + line.trim_start(),
            None => line.to_string(),
        };

        if self.check_indent || self.indent.as_deref().is_some_and(|i| !i.is_empty()) {
            let indent = leading_whitespace(&combined);
            match &self.indent {
                None => self.indent = Some(indent.to_string()),
                Some(current) => {
                    if current != indent {
                        return Err(RaError::InconsistentIndent);
                    }
                }
            }
        } else {
            self.indent = Some(String::new());
        }

        let trimmed = combined.trim();
        let Some((key, value)) = trimmed.split_once(' ') else {
            if self.name_key.is_none() {
                return Err(RaError::MissingValue);
            }
            // A bare key that already exists is a no-op
            if self.index.contains_key(trimmed) {
                return Ok(());
            }
            self.insert_field(trimmed.to_string(), String::new());
            return Ok(());
        };
        if let Some(existing) = self.get(key) {
            if existing != value {
                return Err(RaError::DuplicateKey {
                    key: key.to_string(),
                    existing: existing.to_string(),
                    conflicting: value.to_string(),
                });
            }
            return Ok(());
        }
        if self.name_key.is_none() {
            self.name_key = Some(key.to_string());
            self.name = Some(value.to_string());
        }
        self.insert_field(key.to_string(), value.to_string());
        Ok(())
    }

    fn insert_field(&mut self, key: String, value: String) {
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(StanzaEntry::Field { key, value });
    }

    /// Sets a field without the checks `add_line` performs (no comment,
    /// indentation, or duplicate handling). Prefer `add_line` when adding
    /// raw stanza text. Does not update the stanza's identity.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&position) => {
                self.entries[position] = StanzaEntry::Field { key, value };
            }
            None => self.insert_field(key, value),
        }
    }

    /// Deletes a field line. Returns whether the key existed. The
    /// identifying first line cannot be deleted, only overwritten with
    /// `set`.
    pub fn delete(&mut self, key: &str) -> Result<bool, RaError> {
        if self.name_key.as_deref() == Some(key) {
            return Err(RaError::FirstLineDelete);
        }
        match self.index.remove(key) {
            Some(position) => {
                self.entries.remove(position);
                for entry_position in self.index.values_mut() {
                    if *entry_position > position {
                        *entry_position -= 1;
                    }
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Clears all fields and comments, resetting the stanza's identity and
    /// indent.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.name_key = None;
        self.name = None;
        self.indent = None;
        self.continued = None;
    }

    /// The value stored for a key, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        let position = *self.index.get(key)?;
        match &self.entries[position] {
            StanzaEntry::Field { value, .. } => Some(value),
            StanzaEntry::Comment(_) => None,
        }
    }

    /// Whether a field with this key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Field keys in their recorded order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            StanzaEntry::Field { key, .. } => Some(key.as_str()),
            StanzaEntry::Comment(_) => None,
        })
    }

    /// Field key/value pairs in their recorded order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|entry| match entry {
            StanzaEntry::Field { key, value } => Some((key.as_str(), value.as_str())),
            StanzaEntry::Comment(_) => None,
        })
    }

    /// All recorded entries, fields and comments, in order.
    pub fn entries(&self) -> &[StanzaEntry] {
        &self.entries
    }

    /// The number of fields in the stanza (comments not counted).
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the stanza has no fields.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The key of the stanza's first field, `None` for an empty stanza.
    pub fn name_key(&self) -> Option<&str> {
        self.name_key.as_deref()
    }

    /// The value of the stanza's first field, the stanza's identity within
    /// a file.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The leading indent shared by the stanza's field lines, `None` if no
    /// field line has been seen yet.
    pub fn indent(&self) -> Option<&str> {
        self.indent.as_deref()
    }

    /// Overrides the stanza's leading indent used for serialization.
    pub fn set_indent(&mut self, indent: impl Into<String>) {
        self.indent = Some(indent.into());
    }
}

impl fmt::Display for RaStanza {
    /// Renders the stanza as text fit for writing to an ra file. Lines
    /// that were joined with `\` come out as a single line, and comments
    /// get the same indentation as the rest of the stanza.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let indent = self.indent.as_deref().unwrap_or("");
        for entry in &self.entries {
            match entry {
                StanzaEntry::Comment(text) => writeln!(f, "{indent}{text}")?,
                StanzaEntry::Field { key, value } => {
                    if value.is_empty() {
                        writeln!(f, "{indent}{key}")?;
                    } else {
                        writeln!(f, "{indent}{key} {value}")?;
                    }
                }
            }
        }
        Ok(())
    }
}
