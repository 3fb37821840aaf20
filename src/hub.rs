//! Track-hub record kinds built on the ra engine.
//!
//! Each type here is a thin composition over [crate::ra]'s parsers: it
//! parses with the generic stanza/file machinery and then applies its
//! kind-specific validation rules (required fields, allowed fields, the
//! identifying first-line key). None of them add parsing logic of their
//! own.

pub mod genomes_file;
pub mod hub_file;
pub mod single_file;
pub mod track_db;

pub use genomes_file::GenomesFile;
pub use hub_file::HubFile;
pub use single_file::SingleFileHub;
pub use track_db::TrackDbFile;
