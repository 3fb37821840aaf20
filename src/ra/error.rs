//! Errors reported by the ra format engine.
//!
//! Every failure is fatal and synchronous: a parse or validation error
//! aborts construction of the offending stanza or file entirely, so no
//! partially-valid structure ever escapes. Variants are grouped by where
//! they arise: stanza parsing, file assembly, required-field validation,
//! and settings resolution.

use std::fmt;

/// Errors that can occur while parsing, validating, or resolving ra data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaError {
    /// A blank line appeared inside a stanza. Blank lines only ever
    /// separate stanzas.
    BlankLine,
    /// The first line of a stanza had a key but no value.
    MissingValue,
    /// A key was repeated within one stanza with a conflicting value.
    DuplicateKey {
        key: String,
        existing: String,
        conflicting: String,
    },
    /// A field line's indentation disagreed with the stanza's established
    /// indent.
    InconsistentIndent,
    /// An empty stanza block was added to a file.
    EmptyStanza,
    /// A stanza's first-line key differed from the file's.
    NameKeyMismatch { expected: String, found: String },
    /// A stanza had no name (empty first field value).
    UnnamedStanza,
    /// Two stanzas in one file shared a name.
    DuplicateStanzaName(String),
    /// Attempted to delete the identifying first line of a stanza.
    FirstLineDelete,
    /// One or more required keys were absent, aggregated into one error.
    MissingRequiredFields {
        description: String,
        fields: Vec<String>,
    },
    /// Keys outside the allowed set for a record kind, aggregated.
    InvalidEntries {
        description: String,
        fields: Vec<String>,
    },
    /// A record kind's identifying first line was wrong. Carries the full
    /// message since the expected shape differs per kind.
    InvalidNameKey(String),
    /// A track was missing `type` both directly and on its parent chain.
    MissingTypeSetting(String),
    /// A requested record name does not exist in the file.
    RecordNotFound(String),
    /// A `parent` reference chain looped back on itself.
    CircularParentChain(String),
}

fn entry_suffix(fields: &[String]) -> &'static str {
    if fields.len() == 1 {
        "y"
    } else {
        "ies"
    }
}

impl fmt::Display for RaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaError::BlankLine => write!(f, "Invalid stanza, contained blank lines"),
            RaError::MissingValue => {
                write!(f, "First line in a stanza must have both a key and a value")
            }
            RaError::DuplicateKey {
                key,
                existing,
                conflicting,
            } => write!(
                f,
                "Got duplicate key with a different value in stanza: \
                 \"{key}\" key has both {existing} and {conflicting}"
            ),
            RaError::InconsistentIndent => write!(f, "Inconsistent indentation of stanza"),
            RaError::EmptyStanza => write!(f, "Invalid stanza, was empty"),
            RaError::NameKeyMismatch { expected, found } => write!(
                f,
                "The first line in each stanza must have the same key. \
                 Saw both {expected} and {found}"
            ),
            RaError::UnnamedStanza => write!(f, "No stanza name"),
            RaError::DuplicateStanzaName(name) => {
                write!(f, "Got duplicate stanza name: {name}")
            }
            RaError::FirstLineDelete => write!(
                f,
                "Cannot delete the first line in a stanza (you can still overwrite it with set())"
            ),
            RaError::MissingRequiredFields {
                description,
                fields,
            } => write!(
                f,
                "{description} is missing required entr{}: {}",
                entry_suffix(fields),
                fields.join(", ")
            ),
            RaError::InvalidEntries {
                description,
                fields,
            } => write!(
                f,
                "{description} has invalid entr{}: {}",
                entry_suffix(fields),
                fields.join(", ")
            ),
            RaError::InvalidNameKey(message) => write!(f, "{message}"),
            RaError::MissingTypeSetting(track) => write!(
                f,
                "Neither track {track} nor any of its parent tracks have the required key \"type\""
            ),
            RaError::RecordNotFound(name) => write!(f, "Record {name} does not exist"),
            RaError::CircularParentChain(name) => {
                write!(f, "Circular parent reference involving {name}")
            }
        }
    }
}

impl std::error::Error for RaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_pluralization() {
        let one = RaError::MissingRequiredFields {
            description: "Hub file".to_string(),
            fields: vec!["email".to_string()],
        };
        assert_eq!(
            one.to_string(),
            "Hub file is missing required entry: email"
        );

        let two = RaError::MissingRequiredFields {
            description: "Hub file".to_string(),
            fields: vec!["email".to_string(), "hub".to_string()],
        };
        assert_eq!(
            two.to_string(),
            "Hub file is missing required entries: email, hub"
        );
    }

    #[test]
    fn test_duplicate_key_message_names_both_values() {
        let err = RaError::DuplicateKey {
            key: "key1".to_string(),
            existing: "value1".to_string(),
            conflicting: "value2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Got duplicate key with a different value in stanza: \
             \"key1\" key has both value1 and value2"
        );
    }
}
