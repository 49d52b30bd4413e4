//! Streaming Mascot XML parser using quick-xml
//!
//! The document is pulled event by event; only the `variable_mods` table and
//! the rank-1 `peptide` records under `hits/hit/protein` are retained.
//! Sequences are annotated after the whole document has been read so that the
//! modification table is complete regardless of element order.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{
    annotate_sequence, MascotError, MascotResults, ModificationTable, PeptideIdentification,
};

const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

/// Text-bearing child elements we collect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    ModificationName,
    PepSeq,
    PepVarModPos,
    PepScanTitle,
}

#[derive(Debug, Default)]
struct ModificationBuilder {
    identifier: String,
    name: Option<String>,
}

/// A rank-1 peptide before sequence annotation
#[derive(Debug, Default)]
struct RawPeptide {
    query: Option<String>,
    sequence: Option<String>,
    mod_positions: Option<String>,
    scan_title: Option<String>,
}

impl RawPeptide {
    fn context(&self) -> String {
        match &self.query {
            Some(query) => format!("peptide for query {}", query),
            None => "peptide".to_string(),
        }
    }
}

/// Pull parser over a Mascot XML document
pub struct MascotParser<R: BufRead> {
    reader: Reader<R>,
}

impl MascotParser<BufReader<File>> {
    /// Open a Mascot XML file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MascotError> {
        let path = path.as_ref();
        info!("Reading Mascot results from {}", path.display());
        let file = File::open(path)?;
        Ok(Self::new(BufReader::with_capacity(
            DEFAULT_INPUT_BUFFER_SIZE,
            file,
        )))
    }
}

impl<R: BufRead> MascotParser<R> {
    /// Create a new parser from a BufRead source
    pub fn new(reader: R) -> Self {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);
        Self { reader: xml_reader }
    }

    /// Read the whole document
    pub fn parse(mut self) -> Result<MascotResults, MascotError> {
        let mut modifications = ModificationTable::new();
        let mut peptides: Vec<RawPeptide> = Vec::new();

        let mut path: Vec<Vec<u8>> = Vec::new();
        let mut current_modification: Option<ModificationBuilder> = None;
        let mut current_peptide: Option<RawPeptide> = None;
        let mut text_field: Option<TextField> = None;
        let mut peptides_seen = 0usize;

        let mut buf = Vec::new();
        loop {
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name = e.local_name().as_ref().to_vec();
                    path.push(name);
                    match classify(&path) {
                        Element::Modification => {
                            current_modification = Some(ModificationBuilder {
                                identifier: required_attribute(e, "identifier", "modification")?,
                                name: None,
                            });
                        }
                        Element::Peptide => {
                            peptides_seen += 1;
                            current_peptide = start_peptide(e)?;
                        }
                        Element::Child(field) => {
                            let active = match field {
                                TextField::ModificationName => current_modification.is_some(),
                                _ => current_peptide.is_some(),
                            };
                            if active {
                                text_field = Some(field);
                                // Present but possibly empty
                                set_text(
                                    field,
                                    String::new(),
                                    &mut current_modification,
                                    &mut current_peptide,
                                );
                            }
                        }
                        Element::Other => {}
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    path.push(e.local_name().as_ref().to_vec());
                    match classify(&path) {
                        Element::Modification => {
                            let builder = ModificationBuilder {
                                identifier: required_attribute(e, "identifier", "modification")?,
                                name: None,
                            };
                            finish_modification(builder, &mut modifications)?;
                        }
                        Element::Peptide => {
                            peptides_seen += 1;
                            if let Some(peptide) = start_peptide(e)? {
                                peptides.push(peptide);
                            }
                        }
                        Element::Child(field) => set_text(
                            field,
                            String::new(),
                            &mut current_modification,
                            &mut current_peptide,
                        ),
                        Element::Other => {}
                    }
                    path.pop();
                }
                Ok(Event::Text(ref t)) => {
                    if let Some(field) = text_field {
                        let text = t.unescape()?.into_owned();
                        append_text(field, &text, &mut current_modification, &mut current_peptide);
                    }
                }
                Ok(Event::CData(ref c)) => {
                    if let Some(field) = text_field {
                        let text = std::str::from_utf8(c)?.to_string();
                        append_text(field, &text, &mut current_modification, &mut current_peptide);
                    }
                }
                Ok(Event::End(_)) => {
                    match classify(&path) {
                        Element::Modification => {
                            if let Some(builder) = current_modification.take() {
                                finish_modification(builder, &mut modifications)?;
                            }
                        }
                        Element::Peptide => {
                            if let Some(peptide) = current_peptide.take() {
                                peptides.push(peptide);
                            }
                        }
                        Element::Child(_) => text_field = None,
                        Element::Other => {}
                    }
                    path.pop();
                }
                Ok(Event::Eof) => {
                    if let Some(open) = path.last() {
                        return Err(MascotError::MissingElement {
                            element: "closing tag",
                            context: String::from_utf8_lossy(open).into_owned(),
                        });
                    }
                    break;
                }
                Err(e) => return Err(MascotError::XmlError(e)),
                _ => {}
            }
            buf.clear();
        }

        debug!(
            "{} variable modifications, {} of {} peptides are rank 1",
            modifications.len(),
            peptides.len(),
            peptides_seen
        );

        let identifications = peptides
            .into_iter()
            .map(|peptide| resolve_peptide(peptide, &modifications))
            .collect::<Result<Vec<_>, _>>()?;

        let results = MascotResults::new(modifications, identifications);
        info!(
            "  {} rank-1 identifications across {} spectrum titles",
            results.identifications().len(),
            results.title_count()
        );
        Ok(results)
    }
}

/// Where an element sits in the document, by its path from the root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    Modification,
    Peptide,
    Child(TextField),
    Other,
}

fn classify(path: &[Vec<u8>]) -> Element {
    let names: Vec<&[u8]> = path.iter().map(Vec::as_slice).collect();
    match names.as_slice() {
        [_, b"variable_mods", b"modification"] => Element::Modification,
        [_, b"variable_mods", b"modification", b"name"] => {
            Element::Child(TextField::ModificationName)
        }
        [_, b"hits", b"hit", b"protein", b"peptide"] => Element::Peptide,
        [_, b"hits", b"hit", b"protein", b"peptide", child] => match *child {
            b"pep_seq" => Element::Child(TextField::PepSeq),
            b"pep_var_mod_pos" => Element::Child(TextField::PepVarModPos),
            b"pep_scan_title" => Element::Child(TextField::PepScanTitle),
            _ => Element::Other,
        },
        _ => Element::Other,
    }
}

/// Begin a peptide record; non rank-1 peptides are skipped
fn start_peptide(e: &BytesStart) -> Result<Option<RawPeptide>, MascotError> {
    let rank = get_attribute(e, "rank")?;
    let is_top_rank = rank
        .as_deref()
        .and_then(|r| r.trim().parse::<u32>().ok())
        .is_some_and(|r| r == 1);
    if !is_top_rank {
        return Ok(None);
    }
    Ok(Some(RawPeptide {
        query: get_attribute(e, "query")?,
        ..Default::default()
    }))
}

fn set_text(
    field: TextField,
    text: String,
    modification: &mut Option<ModificationBuilder>,
    peptide: &mut Option<RawPeptide>,
) {
    match field {
        TextField::ModificationName => {
            if let Some(m) = modification {
                m.name = Some(text);
            }
        }
        TextField::PepSeq => {
            if let Some(p) = peptide {
                p.sequence = Some(text);
            }
        }
        TextField::PepVarModPos => {
            if let Some(p) = peptide {
                p.mod_positions = Some(text);
            }
        }
        TextField::PepScanTitle => {
            if let Some(p) = peptide {
                p.scan_title = Some(text);
            }
        }
    }
}

fn append_text(
    field: TextField,
    text: &str,
    modification: &mut Option<ModificationBuilder>,
    peptide: &mut Option<RawPeptide>,
) {
    let target = match field {
        TextField::ModificationName => modification.as_mut().and_then(|m| m.name.as_mut()),
        TextField::PepSeq => peptide.as_mut().and_then(|p| p.sequence.as_mut()),
        TextField::PepVarModPos => peptide.as_mut().and_then(|p| p.mod_positions.as_mut()),
        TextField::PepScanTitle => peptide.as_mut().and_then(|p| p.scan_title.as_mut()),
    };
    if let Some(target) = target {
        target.push_str(text);
    }
}

fn finish_modification(
    builder: ModificationBuilder,
    modifications: &mut ModificationTable,
) -> Result<(), MascotError> {
    let context = format!("modification {:?}", builder.identifier);
    let mut chars = builder.identifier.trim().chars();
    let identifier = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(MascotError::MissingElement {
                element: "single-character identifier",
                context,
            })
        }
    };
    let name = builder.name.ok_or(MascotError::MissingElement {
        element: "name",
        context,
    })?;
    modifications.insert(identifier, &name);
    Ok(())
}

fn resolve_peptide(
    peptide: RawPeptide,
    modifications: &ModificationTable,
) -> Result<PeptideIdentification, MascotError> {
    let context = peptide.context();
    let title = peptide
        .scan_title
        .ok_or_else(|| MascotError::MissingElement {
            element: "pep_scan_title",
            context: context.clone(),
        })?;
    let sequence = peptide.sequence.ok_or(MascotError::MissingElement {
        element: "pep_seq",
        context,
    })?;
    let sequence = sequence.trim();
    let annotated = annotate_sequence(sequence, peptide.mod_positions.as_deref(), modifications)?;
    Ok(PeptideIdentification {
        spectrum_title: title.trim().to_string(),
        sequence: annotated,
        rank: 1,
    })
}

fn required_attribute(
    e: &BytesStart,
    name: &'static str,
    element: &str,
) -> Result<String, MascotError> {
    get_attribute(e, name)?.ok_or_else(|| MascotError::MissingElement {
        element: name,
        context: element.to_string(),
    })
}

/// Get an attribute value from an XML element
fn get_attribute(e: &BytesStart, name: &str) -> Result<Option<String>, MascotError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| MascotError::XmlError(quick_xml::Error::from(e)))?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let raw = std::str::from_utf8(&attr.value)?;
            let value = unescape(raw).map_err(quick_xml::Error::from)?.into_owned();
            return Ok(Some(value));
        }
    }
    Ok(None)
}
