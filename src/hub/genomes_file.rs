//! The genomes.txt record kind: one stanza per genome assembly.

use std::fmt;

use serde::Serialize;

use crate::ra::error::RaError;
use crate::ra::file::{FileOptions, RaFile};
use crate::ra::stanza::RaStanza;
use crate::ra::validate::require_fields;

/// Fields every genome stanza must carry.
pub const GENOME_REQUIRED_FIELDS: [&str; 2] = ["genome", "trackDb"];

pub(crate) const GENOME_FIRST_LINE: &str =
    "Genomes file must begin with a line like \"genome <genome_name>\"";

/// A parsed genomes.txt file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenomesFile {
    file: RaFile,
}

impl GenomesFile {
    /// Parses and validates a genomes.txt file.
    pub fn parse(text: &str) -> Result<Self, RaError> {
        Self::parse_with_options(text, FileOptions::default())
    }

    /// Parses a genomes.txt file, honoring `skip_validation`.
    pub fn parse_with_options(text: &str, options: FileOptions) -> Result<Self, RaError> {
        let genomes = GenomesFile {
            file: RaFile::parse_with_options(text, options)?,
        };
        if !options.skip_validation {
            genomes.validate()?;
        }
        Ok(genomes)
    }

    fn validate(&self) -> Result<(), RaError> {
        self.check_first_line()?;
        for (name, genome) in self.file.stanzas() {
            require_fields(
                genome,
                &GENOME_REQUIRED_FIELDS,
                &format!("Genomes file entry {name}"),
            )?;
        }
        Ok(())
    }

    pub(crate) fn check_first_line(&self) -> Result<(), RaError> {
        if self.file.name_key() != Some("genome") {
            return Err(RaError::InvalidNameKey(GENOME_FIRST_LINE.to_string()));
        }
        Ok(())
    }

    /// The underlying ra file.
    pub fn file(&self) -> &RaFile {
        &self.file
    }

    /// The stanza for a genome, if any.
    pub fn get(&self, genome: &str) -> Option<&RaStanza> {
        self.file.get(genome)
    }

    /// Genome stanzas in file order.
    pub fn genomes(&self) -> impl Iterator<Item = (&str, &RaStanza)> {
        self.file.stanzas()
    }
}

impl fmt::Display for GenomesFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.file, f)
    }
}
