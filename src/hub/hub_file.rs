//! The hub.txt record kind: a single stanza describing a track hub.

use std::fmt;

use serde::Serialize;

use crate::ra::error::RaError;
use crate::ra::stanza::RaStanza;
use crate::ra::validate::require_fields;

/// Every field a hub.txt file may carry.
pub const HUB_TXT_FIELDS: [&str; 6] = [
    "hub",
    "shortLabel",
    "longLabel",
    "genomesFile",
    "email",
    "descriptionUrl",
];

pub(crate) const HUB_FIRST_LINE: &str =
    "Hub file must begin with a line like \"hub <hub_name>\"";

/// A parsed hub.txt file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubFile {
    stanza: RaStanza,
}

impl HubFile {
    /// Parses and validates a hub.txt file.
    pub fn parse(text: &str) -> Result<Self, RaError> {
        let hub = Self::parse_unvalidated(text)?;
        hub.validate()?;
        Ok(hub)
    }

    /// Parses without the kind-specific validation, for composed formats
    /// that validate once fully assembled.
    pub(crate) fn parse_unvalidated(text: &str) -> Result<Self, RaError> {
        Ok(HubFile {
            stanza: RaStanza::parse(text)?,
        })
    }

    fn validate(&self) -> Result<(), RaError> {
        self.check_first_line()?;
        let extra: Vec<String> = self
            .stanza
            .keys()
            .filter(|key| !HUB_TXT_FIELDS.contains(key))
            .map(str::to_string)
            .collect();
        if !extra.is_empty() {
            return Err(RaError::InvalidEntries {
                description: "Hub file".to_string(),
                fields: extra,
            });
        }
        let required: Vec<&str> = HUB_TXT_FIELDS
            .iter()
            .copied()
            .filter(|field| *field != "descriptionUrl")
            .collect();
        require_fields(&self.stanza, &required, "Hub file")
    }

    pub(crate) fn check_first_line(&self) -> Result<(), RaError> {
        if self.stanza.name_key() != Some("hub") {
            return Err(RaError::InvalidNameKey(HUB_FIRST_LINE.to_string()));
        }
        Ok(())
    }

    /// The underlying stanza.
    pub fn stanza(&self) -> &RaStanza {
        &self.stanza
    }

    /// The value stored for a hub field, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.stanza.get(key)
    }

    /// The hub's name, the value of its `hub` line.
    pub fn name(&self) -> Option<&str> {
        self.stanza.name()
    }
}

impl fmt::Display for HubFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.stanza, f)
    }
}
