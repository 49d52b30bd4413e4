//! # MGF Module
//!
//! Streaming access to Mascot Generic Format files, the text format used for
//! tandem mass spectra.
//!
//! ## MGF Structure
//!
//! ```text
//! COM=optional file-level parameters
//! BEGIN IONS
//! TITLE=run1.1042.1042.2
//! PEPMASS=512.7731 18210.4
//! CHARGE=2+
//! SCANS=1042
//! RTINSECONDS=1290.44
//! 175.1190 1503.2
//! 262.1510 880.0
//! END IONS
//! ```
//!
//! Spectra are read one at a time by [`MgfReader`] and written one at a time by
//! [`MgfWriter`], so memory stays bounded by the largest single spectrum. The
//! two pipeline stages built on top are [`format_mgf`] (parameter filtering)
//! and [`merge_mgf`] (scan renumbering across runs).

use indexmap::IndexMap;

mod error;
mod formatter;
mod merger;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use error::MgfError;
pub use formatter::{format_mgf, format_spectra, FormatStats, DEEPNOVO_KEYS};
pub use merger::{merge_mgf, merge_mgf_into, MergeStats};
pub use reader::MgfReader;
pub use writer::MgfWriter;

/// A single centroided peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Mass-to-charge ratio
    pub mz: f64,
    /// Signal intensity
    pub intensity: f64,
}

impl Peak {
    /// Create a new peak
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

/// One MGF spectrum: an ordered parameter map and its peak list.
///
/// Parameter keys are stored lower-case; values are kept verbatim so that
/// writing a spectrum back out does not alter numeric formatting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MgfSpectrum {
    /// Spectrum parameters in file order
    pub params: IndexMap<String, String>,
    /// Peak list in file order
    pub peaks: Vec<Peak>,
}

impl MgfSpectrum {
    /// Create an empty spectrum
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a parameter by case-insensitive key
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Insert or replace a parameter, keeping its position if it already exists
    pub fn set_param(&mut self, key: &str, value: impl Into<String>) {
        self.params.insert(key.to_ascii_lowercase(), value.into());
    }

    /// Spectrum title, if present
    pub fn title(&self) -> Option<&str> {
        self.param("title")
    }

    /// Whether the peak list is empty
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Keep only the listed parameters, reordered to match `keys`.
    ///
    /// Returns the number of parameters that were dropped.
    pub fn retain_params(&mut self, keys: &[&str]) -> usize {
        let before = self.params.len();
        let mut kept = IndexMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.params.shift_remove(*key) {
                kept.insert((*key).to_string(), value);
            }
        }
        self.params = kept;
        before - self.params.len()
    }

    /// Scan identifier (`SCANS`)
    pub fn scans(&self) -> Result<&str, MgfError> {
        self.required("scans")
    }

    /// All whitespace separated values of `PEPMASS` (m/z, then optional
    /// intensity and charge)
    pub fn pepmass(&self) -> Result<Vec<f64>, MgfError> {
        let raw = self.required("pepmass")?;
        let values = raw
            .split_ascii_whitespace()
            .map(|token| {
                // The optional trailing charge may carry a sign suffix
                let token = token.trim_end_matches(['+', '-']);
                token.parse::<f64>()
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| self.invalid("pepmass", raw))?;
        if values.is_empty() {
            return Err(self.invalid("pepmass", raw));
        }
        Ok(values)
    }

    /// Precursor m/z.
    ///
    /// When `PEPMASS` carries several values (m/z, intensity, charge) only the
    /// first one is the m/z; a single value is the m/z itself.
    pub fn precursor_mz(&self) -> Result<f64, MgfError> {
        let values = self.pepmass()?;
        Ok(values[0])
    }

    /// All precursor charge states listed in `CHARGE` (e.g. `2+ and 3+`)
    pub fn charges(&self) -> Result<Vec<i32>, MgfError> {
        let raw = self.required("charge")?;
        let charges = raw
            .split(',')
            .flat_map(|part| part.split(" and "))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(parse_charge)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| self.invalid("charge", raw))?;
        if charges.is_empty() {
            return Err(self.invalid("charge", raw));
        }
        Ok(charges)
    }

    /// First precursor charge state
    pub fn charge(&self) -> Result<i32, MgfError> {
        Ok(self.charges()?[0])
    }

    /// Retention time in seconds (`RTINSECONDS`)
    pub fn retention_time(&self) -> Result<f64, MgfError> {
        let raw = self.required("rtinseconds")?;
        raw.trim()
            .parse()
            .map_err(|_| self.invalid("rtinseconds", raw))
    }

    /// A short label for error messages: the title, else the scan, else `?`
    pub fn label(&self) -> String {
        self.title()
            .or_else(|| self.param("scans"))
            .unwrap_or("?")
            .to_string()
    }

    fn required(&self, parameter: &'static str) -> Result<&str, MgfError> {
        self.param(parameter).ok_or_else(|| MgfError::MissingParameter {
            spectrum: self.label(),
            parameter,
        })
    }

    fn invalid(&self, parameter: &'static str, value: &str) -> MgfError {
        MgfError::InvalidParameter {
            spectrum: self.label(),
            parameter,
            value: value.to_string(),
        }
    }
}

/// Parse a single charge such as `2+`, `+2`, `3-` or `2`
fn parse_charge(token: &str) -> Option<i32> {
    let (sign, digits) = if let Some(d) = token.strip_suffix('+') {
        (1, d)
    } else if let Some(d) = token.strip_suffix('-') {
        (-1, d)
    } else if let Some(d) = token.strip_prefix('+') {
        (1, d)
    } else if let Some(d) = token.strip_prefix('-') {
        (-1, d)
    } else {
        (1, token)
    };
    digits.trim().parse::<i32>().ok().map(|z| sign * z)
}
