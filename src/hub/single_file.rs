//! The single-file hub: hub, genomes, and trackDb sections in one
//! hub.txt, separated by blank lines.

use std::fmt;

use serde::Serialize;

use crate::hub::genomes_file::{GenomesFile, GENOME_FIRST_LINE};
use crate::hub::hub_file::HubFile;
use crate::hub::track_db::TrackDbFile;
use crate::ra::error::RaError;
use crate::ra::file::{split_blocks, FileOptions};
use crate::ra::validate::require_fields;

/// Fields the hub section of a single-file hub must carry. Unlike a
/// standalone hub.txt there is no `genomesFile`, and `descriptionUrl` is
/// required.
pub const SINGLE_FILE_HUB_FIELDS: [&str; 5] =
    ["hub", "shortLabel", "longLabel", "email", "descriptionUrl"];

/// A parsed single-file hub: the hub stanza, its genome section, and the
/// trackDb sections that follow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleFileHub {
    hub: HubFile,
    genome: GenomesFile,
    track_dbs: Vec<TrackDbFile>,
}

impl SingleFileHub {
    /// Parses and validates a single-file hub.
    pub fn parse(text: &str) -> Result<Self, RaError> {
        let mut sections = split_blocks(text);
        let hub_section = sections.next().ok_or(RaError::EmptyStanza)?;
        let hub = HubFile::parse_unvalidated(hub_section)?;
        hub.check_first_line()?;
        require_fields(hub.stanza(), &SINGLE_FILE_HUB_FIELDS, "Hub file")?;

        let genome_section = sections
            .next()
            .ok_or_else(|| RaError::InvalidNameKey(GENOME_FIRST_LINE.to_string()))?;
        let skip = FileOptions {
            skip_validation: true,
            ..FileOptions::default()
        };
        let genome = GenomesFile::parse_with_options(genome_section, skip)?;
        genome.check_first_line()?;

        let track_dbs = sections
            .map(TrackDbFile::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SingleFileHub {
            hub,
            genome,
            track_dbs,
        })
    }

    /// The hub section.
    pub fn hub(&self) -> &HubFile {
        &self.hub
    }

    /// The genome section.
    pub fn genome(&self) -> &GenomesFile {
        &self.genome
    }

    /// The trackDb sections, in file order.
    pub fn track_dbs(&self) -> &[TrackDbFile] {
        &self.track_dbs
    }
}

impl fmt::Display for SingleFileHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pieces = vec![self.hub.to_string(), self.genome.to_string()];
        pieces.extend(self.track_dbs.iter().map(TrackDbFile::to_string));
        write!(f, "{}", pieces.join("\n"))
    }
}
