//! # ra
//!
//! A parser for the UCSC ra format.
//!
//! The ra ("record array") format is a line-oriented text format used to
//! describe hierarchical metadata records, most prominently the track hub
//! files of the UCSC genome browser (hub.txt, genomes.txt, trackDb.txt).
//! A file is a sequence of stanzas separated by blank lines; each stanza is
//! a run of `key value` lines, optionally indented, optionally continued
//! across physical lines with a trailing `\`, and optionally interleaved
//! with `#` comments.
//!
//! The [ra] module holds the format engine: stanza and file parsing,
//! order-preserving serialization, and parent-chain settings resolution.
//! The [hub] module layers the track-hub record kinds (hub, genomes,
//! trackDb, single-file hub) on top of it.

pub mod hub;
pub mod ra;

pub use crate::hub::{GenomesFile, HubFile, SingleFileHub, TrackDbFile};
pub use crate::ra::{
    FileEntry, FileOptions, RaError, RaFile, RaStanza, StanzaEntry, StanzaOptions,
};
