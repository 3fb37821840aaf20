//! The ra format engine.
//!
//! Structure:
//!     Parsing happens in two layers. [stanza] turns the lines of a single
//! stanza into an ordered collection of fields and comments, handling
//! indentation tracking and `\` line continuations. [file] splits raw text
//! on blank-line runs and folds each block into an ordered, name-keyed
//! collection of stanzas, keeping standalone comment blocks as decoration.
//!
//!     Serialization is the inverse of parsing and lives on the same types
//! as `Display` impls. It is byte-stable except for the normalization the
//! format allows: continuation-joined lines come back out as one line, CRLF
//! becomes LF, and comments are re-indented to match their stanza.
//!
//!     [settings] walks `parent` references between stanzas of one file and
//! computes the effective, inherited key/value view of a record. [validate]
//! is the generic required-fields check the record kinds in [crate::hub]
//! are built from.

pub mod error;
pub mod file;
pub mod settings;
pub mod stanza;
pub mod validate;

pub use error::RaError;
pub use file::{FileEntry, FileOptions, RaFile};
pub use settings::{parent_chain, resolved_settings};
pub use stanza::{RaStanza, StanzaEntry, StanzaOptions};
pub use validate::require_fields;
