//! The trackDb.txt record kind: track definitions with parent/child
//! inheritance.
//!
//! trackDb files are parsed with indent checking off, since real-world
//! files indent child tracks freely. After validation each track's indent
//! is rewritten to four spaces per ancestor, so re-serialization shows the
//! nesting depth.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::ra::error::RaError;
use crate::ra::file::{FileOptions, RaFile};
use crate::ra::settings::{parent_chain, resolved_settings};
use crate::ra::stanza::RaStanza;
use crate::ra::validate::require_fields;

/// Fields every track must carry.
pub const TRACK_REQUIRED_FIELDS: [&str; 2] = ["track", "shortLabel"];

/// Keys marking a track as a container for other tracks. Container tracks
/// have no data of their own, so `bigDataUrl` and `type` are not required
/// of them.
pub const CONTAINER_TRACK_KEYS: [&str; 4] = ["superTrack", "compositeTrack", "container", "view"];

const INDENT_PER_LEVEL: &str = "    ";

/// A parsed trackDb.txt file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackDbFile {
    file: RaFile,
}

impl TrackDbFile {
    /// Parses and validates a trackDb.txt file.
    pub fn parse(text: &str) -> Result<Self, RaError> {
        Self::parse_with_options(text, FileOptions::default())
    }

    /// Parses a trackDb.txt file, honoring `skip_validation`. Indent
    /// checking is always off for trackDb files.
    pub fn parse_with_options(text: &str, options: FileOptions) -> Result<Self, RaError> {
        let file = RaFile::parse_with_options(
            text,
            FileOptions {
                check_indent: false,
                ..options
            },
        )?;
        let mut track_db = TrackDbFile { file };
        if !options.skip_validation {
            track_db.validate()?;
        }
        Ok(track_db)
    }

    fn validate(&mut self) -> Result<(), RaError> {
        if self.file.name_key() != Some("track") {
            return Err(RaError::InvalidNameKey(format!(
                "trackDb has \"{}\" instead of \"track\" as the first line in each track",
                self.file.name_key().unwrap_or("")
            )));
        }
        let names: Vec<String> = self
            .file
            .stanzas()
            .map(|(name, _)| name.to_string())
            .collect();
        for name in &names {
            let chain = parent_chain(&self.file, name)?;
            if let Some(track) = self.file.get(name) {
                require_fields(track, &TRACK_REQUIRED_FIELDS, &format!("Track {name}"))?;
                let is_container = CONTAINER_TRACK_KEYS
                    .iter()
                    .any(|key| track.contains_key(key));
                if !is_container {
                    if !track.contains_key("bigDataUrl") {
                        return Err(RaError::MissingRequiredFields {
                            description: format!("Track {name}"),
                            fields: vec!["bigDataUrl".to_string()],
                        });
                    }
                    if !track.contains_key("type")
                        && !resolved_settings(&self.file, name)?.contains_key("type")
                    {
                        return Err(RaError::MissingTypeSetting(name.clone()));
                    }
                }
            }
            let indent = INDENT_PER_LEVEL.repeat(chain.len() - 1);
            if let Some(track) = self.file.get_mut(name) {
                track.set_indent(indent);
            }
        }
        Ok(())
    }

    /// The underlying ra file.
    pub fn file(&self) -> &RaFile {
        &self.file
    }

    /// The stanza for a track, if any.
    pub fn get(&self, track: &str) -> Option<&RaStanza> {
        self.file.get(track)
    }

    /// Track stanzas in file order.
    pub fn tracks(&self) -> impl Iterator<Item = (&str, &RaStanza)> {
        self.file.stanzas()
    }

    /// All settings of a track including those inherited from parent
    /// tracks, closer entries overriding more distant ones.
    pub fn settings(&self, track: &str) -> Result<HashMap<String, String>, RaError> {
        resolved_settings(&self.file, track)
    }
}

impl fmt::Display for TrackDbFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.file, f)
    }
}
