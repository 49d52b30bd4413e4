//! Streaming MGF reader
//!
//! A line-oriented state machine over any [`BufRead`] source. Parameters that
//! appear before the first `BEGIN IONS` are file-level defaults and are copied
//! into every spectrum that does not override them.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;
use log::trace;

use super::{MgfError, MgfSpectrum, Peak};

const DEFAULT_INPUT_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    /// Outside any spectrum block
    Between,
    /// Inside a `BEGIN IONS` ... `END IONS` block
    Ions,
    /// Source exhausted or an error was returned
    Done,
}

/// Streaming parser yielding one [`MgfSpectrum`] at a time
pub struct MgfReader<R: BufRead> {
    handle: R,
    state: ParserState,
    line_number: usize,
    buffer: String,
    file_params: IndexMap<String, String>,
}

impl MgfReader<BufReader<File>> {
    /// Open an MGF file for streaming
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MgfError> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::with_capacity(
            DEFAULT_INPUT_BUFFER_SIZE,
            file,
        )))
    }
}

impl<R: BufRead> MgfReader<R> {
    /// Create a new reader from a BufRead source
    pub fn new(handle: R) -> Self {
        Self {
            handle,
            state: ParserState::Between,
            line_number: 0,
            buffer: String::new(),
            file_params: IndexMap::new(),
        }
    }

    /// File-level parameters seen so far
    pub fn file_params(&self) -> &IndexMap<String, String> {
        &self.file_params
    }

    /// Read the next spectrum from the stream
    pub fn next_spectrum(&mut self) -> Result<Option<MgfSpectrum>, MgfError> {
        let mut spectrum: Option<MgfSpectrum> = None;
        let mut opened_at = 0;

        loop {
            if self.state == ParserState::Done {
                return Ok(None);
            }

            self.buffer.clear();
            let read = match self.handle.read_line(&mut self.buffer) {
                Ok(read) => read,
                Err(e) => {
                    self.state = ParserState::Done;
                    return Err(e.into());
                }
            };
            if read == 0 {
                let state = self.state;
                self.state = ParserState::Done;
                if state == ParserState::Ions {
                    return Err(MgfError::UnterminatedSpectrum {
                        line_number: opened_at,
                    });
                }
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim();
            if line.is_empty() || is_comment(line) {
                continue;
            }

            match self.state {
                ParserState::Between => {
                    if line == "BEGIN IONS" {
                        self.state = ParserState::Ions;
                        opened_at = self.line_number;
                        spectrum = Some(MgfSpectrum {
                            params: self.file_params.clone(),
                            peaks: Vec::new(),
                        });
                    } else if let Some((key, value)) = line.split_once('=') {
                        self.file_params
                            .insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
                    } else {
                        trace!("Ignoring stray line {}: {:?}", self.line_number, line);
                    }
                }
                ParserState::Ions => {
                    let current = spectrum.get_or_insert_with(MgfSpectrum::new);
                    if line == "END IONS" {
                        self.state = ParserState::Between;
                        return Ok(spectrum);
                    }
                    if let Err(e) = parse_ions_line(line, self.line_number, current) {
                        self.state = ParserState::Done;
                        return Err(e);
                    }
                }
                ParserState::Done => return Ok(None),
            }
        }
    }
}

impl<R: BufRead> Iterator for MgfReader<R> {
    type Item = Result<MgfSpectrum, MgfError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_spectrum().transpose()
    }
}

fn is_comment(line: &str) -> bool {
    matches!(line.as_bytes()[0], b'#' | b';' | b'!' | b'/')
}

/// Handle one non-empty line inside a spectrum block
fn parse_ions_line(
    line: &str,
    line_number: usize,
    spectrum: &mut MgfSpectrum,
) -> Result<(), MgfError> {
    let starts_numeric = line
        .as_bytes()
        .first()
        .is_some_and(|b| b.is_ascii_digit() || *b == b'.' || *b == b'-');

    if starts_numeric && !line.contains('=') {
        let peak = parse_peak(line).ok_or_else(|| MgfError::MalformedPeakLine {
            line_number,
            line: line.to_string(),
        })?;
        spectrum.peaks.push(peak);
        return Ok(());
    }

    match line.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            spectrum
                .params
                .insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
            Ok(())
        }
        _ => Err(MgfError::MalformedHeaderLine {
            line_number,
            line: line.to_string(),
        }),
    }
}

/// Parse `m/z intensity [charge]`; a trailing fragment charge column is ignored
fn parse_peak(line: &str) -> Option<Peak> {
    let mut tokens = line.split_ascii_whitespace();
    let mz = tokens.next()?.parse().ok()?;
    let intensity = match tokens.next() {
        Some(token) => token.parse().ok()?,
        None => 0.0,
    };
    Some(Peak { mz, intensity })
}
