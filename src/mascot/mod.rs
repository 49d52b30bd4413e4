//! # Mascot Module
//!
//! Parsing of Mascot XML search results (`mascot_search_results_2` schema)
//! into a lookup from spectrum title to annotated peptide sequences.
//!
//! ## Document Structure
//!
//! ```text
//! mascot_search_results
//! ├── variable_mods
//! │   └── modification[@identifier]* (name)
//! └── hits
//!     └── hit*
//!         └── protein*
//!             └── peptide[@rank]* (pep_seq, pep_var_mod_pos, pep_scan_title)
//! ```
//!
//! Only rank-1 peptides are kept. Modified residues are written as
//! `residue(ModificationName)`, for example `AC(Carbamidomethyl)DK`.

use std::collections::HashMap;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use log::warn;

mod error;
mod parser;
mod sequence;


pub use error::MascotError;
pub use parser::MascotParser;
pub use sequence::{annotate_sequence, residue_positions};

/// XML namespace of Mascot search result documents
pub const MASCOT_NAMESPACE: &str =
    "http://www.matrixscience.com/xmlns/schema/mascot_search_results_2";

/// Variable modification identifiers declared by one Mascot document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModificationTable {
    names: HashMap<char, String>,
}

impl ModificationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a modification.
    ///
    /// Mascot names look like `Carbamidomethyl (C)`; only the text before the
    /// first space is kept. Returns the stored short name.
    pub fn insert(&mut self, identifier: char, full_name: &str) -> &str {
        let name = full_name
            .trim()
            .split(' ')
            .next()
            .unwrap_or_default()
            .to_string();
        if let Some(previous) = self.names.get(&identifier) {
            warn!(
                "Modification identifier {} declared twice ({} and {}), keeping the last",
                identifier, previous, name
            );
        }
        self.names.insert(identifier, name);
        &self.names[&identifier]
    }

    /// Resolve an identifier to its short name
    pub fn get(&self, identifier: char) -> Option<&str> {
        self.names.get(&identifier).map(String::as_str)
    }

    /// Number of declared modifications
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no modifications were declared
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A rank-1 peptide match for one spectrum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeptideIdentification {
    /// Spectrum title, whitespace-trimmed
    pub spectrum_title: String,
    /// Annotated sequence
    pub sequence: String,
    /// Peptide rank (always 1 once parsed)
    pub rank: u32,
}

/// Parsed Mascot results: spectrum title to annotated sequences
#[derive(Debug, Clone, Default)]
pub struct MascotResults {
    modifications: ModificationTable,
    identifications: Vec<PeptideIdentification>,
    by_title: IndexMap<String, IndexSet<String>>,
}

impl MascotResults {
    /// Build the title lookup from parsed identifications
    pub fn new(
        modifications: ModificationTable,
        identifications: Vec<PeptideIdentification>,
    ) -> Self {
        let mut by_title: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for identification in &identifications {
            by_title
                .entry(identification.spectrum_title.clone())
                .or_default()
                .insert(identification.sequence.clone());
        }
        Self {
            modifications,
            identifications,
            by_title,
        }
    }

    /// Parse a Mascot XML file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, MascotError> {
        MascotParser::open(path)?.parse()
    }

    /// Distinct sequences identified for a spectrum title, in document order
    pub fn sequences_for(&self, title: &str) -> impl Iterator<Item = &str> {
        self.by_title
            .get(title.trim())
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Whether any sequence was identified for this title
    pub fn contains_title(&self, title: &str) -> bool {
        self.by_title.contains_key(title.trim())
    }

    /// The document's modification table
    pub fn modifications(&self) -> &ModificationTable {
        &self.modifications
    }

    /// Every rank-1 identification in document order, duplicates included
    pub fn identifications(&self) -> &[PeptideIdentification] {
        &self.identifications
    }

    /// Number of distinct identified titles
    pub fn title_count(&self) -> usize {
        self.by_title.len()
    }

    /// Title to sequence-set mapping
    pub fn by_title(&self) -> &IndexMap<String, IndexSet<String>> {
        &self.by_title
    }
}

/// Parse a Mascot XML file into title to sequence mappings
pub fn parse_mascot_xml<P: AsRef<Path>>(path: P) -> Result<MascotResults, MascotError> {
    MascotResults::from_path(path)
}
