use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;

use super::MgfError;
use crate::scan::FileIndex;

const SCANS_KEY: &str = "SCANS=";
const SCANS_NAME: &str = "SCANS";

/// Statistics from merging MGF files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Number of input files concatenated
    pub files_merged: usize,
    /// Lines written to the output
    pub lines_written: usize,
    /// `SCANS=` lines rewritten with a file prefix
    pub scans_renumbered: usize,
}

/// Concatenate MGF files into `output_path`, renumbering scans.
///
/// The text of each input is copied verbatim except for `SCANS=<value>` lines,
/// which become `SCANS=F<index>:<value>` with `index` the position of the file
/// in `input_paths`.
pub fn merge_mgf<P: AsRef<Path>, Q: AsRef<Path>>(
    input_paths: &[P],
    output_path: Q,
) -> Result<MergeStats, MgfError> {
    let output_path = output_path.as_ref();
    let mut writer = BufWriter::new(File::create(output_path)?);
    let mut stats = MergeStats::default();

    for (index, input_path) in input_paths.iter().enumerate() {
        let input_path = input_path.as_ref();
        info!(
            "Merging {} as {} into {}",
            input_path.display(),
            FileIndex(index),
            output_path.display()
        );
        let reader = BufReader::new(File::open(input_path)?);
        merge_mgf_into(FileIndex(index), reader, &mut writer, &mut stats)?;
    }

    writer.flush()?;
    Ok(stats)
}

/// Copy one MGF source into `writer`, prefixing its scan identifiers
pub fn merge_mgf_into<R: BufRead, W: Write>(
    index: FileIndex,
    mut reader: R,
    writer: &mut W,
    stats: &mut MergeStats,
) -> Result<(), MgfError> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        match scan_value(&line) {
            Some(scan) => {
                let terminator = &line[line.trim_end_matches(['\r', '\n']).len()..];
                let terminator = if terminator.is_empty() { "\n" } else { terminator };
                write!(
                    writer,
                    "{}{}{}",
                    SCANS_KEY,
                    index.prefix_scan(scan),
                    terminator
                )?;
                stats.scans_renumbered += 1;
            }
            None => {
                writer.write_all(line.as_bytes())?;
                // Keep the next file's first line from joining an unterminated last line
                if !line.ends_with('\n') {
                    writer.write_all(b"\n")?;
                }
            }
        }
        stats.lines_written += 1;
    }
    stats.files_merged += 1;
    Ok(())
}

/// The scan value of a `SCANS=` line, matched the way [`super::MgfReader`]
/// reads parameters: surrounding whitespace ignored, key case-insensitive
fn scan_value(line: &str) -> Option<&str> {
    let (key, value) = line.trim().split_once('=')?;
    key.trim()
        .eq_ignore_ascii_case(SCANS_NAME)
        .then(|| value.trim())
}
