//! Reconstruction of modified peptide sequences from `pep_var_mod_pos`.
//!
//! Mascot reports variable modifications as a position string such as
//! `0.0102.0`: N-terminal digit, one digit per residue, C-terminal digit. A
//! residue digit of `0` means unmodified; any other digit is an identifier in
//! the document's `variable_mods` table.

use std::sync::OnceLock;

use regex::Regex;

use super::{MascotError, ModificationTable};

fn mod_position_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d\.(\d+)\.\d").expect("static pattern is valid"))
}

/// Extract the per-residue digit string from a full position string
pub fn residue_positions(positions: &str) -> Option<&str> {
    mod_position_pattern()
        .captures(positions)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Build the annotated sequence, e.g. `ACDK` + `0.0100.0` ->
/// `AC(Carbamidomethyl)DK`.
///
/// `positions` of `None` or blank leaves the sequence unchanged. The residue
/// digits must be exactly as long as the sequence.
pub fn annotate_sequence(
    sequence: &str,
    positions: Option<&str>,
    modifications: &ModificationTable,
) -> Result<String, MascotError> {
    let positions = match positions.map(str::trim) {
        Some(p) if !p.is_empty() => p,
        _ => return Ok(sequence.to_string()),
    };

    let malformed = |reason: String| MascotError::MalformedModificationPositions {
        positions: positions.to_string(),
        sequence: sequence.to_string(),
        reason,
    };

    let digits = residue_positions(positions)
        .ok_or_else(|| malformed("expected <N-term>.<residues>.<C-term>".to_string()))?;

    let residue_count = sequence.chars().count();
    let digit_count = digits.chars().count();
    if digit_count != residue_count {
        return Err(malformed(format!(
            "{} position digits for {} residues",
            digit_count, residue_count
        )));
    }

    let mut annotated = String::with_capacity(sequence.len() + 16);
    for (residue, digit) in sequence.chars().zip(digits.chars()) {
        annotated.push(residue);
        if digit == '0' {
            continue;
        }
        let name = modifications
            .get(digit)
            .ok_or_else(|| MascotError::UnknownModification {
                identifier: digit,
                sequence: sequence.to_string(),
            })?;
        annotated.push('(');
        annotated.push_str(name);
        annotated.push(')');
    }
    Ok(annotated)
}
