use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::{MgfError, MgfSpectrum};

/// Sequential MGF writer.
///
/// Each call to [`MgfWriter::write`] emits exactly one `BEGIN IONS` ...
/// `END IONS` record. Parameter keys are written upper-case in the order they
/// appear in the spectrum's parameter map.
pub struct MgfWriter<W: Write> {
    handle: BufWriter<W>,
    spectra_written: usize,
}

impl MgfWriter<File> {
    /// Create (or truncate) an MGF file for writing
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, MgfError> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(file))
    }
}

impl<W: Write> MgfWriter<W> {
    /// Wrap an output handle
    pub fn new(handle: W) -> Self {
        Self {
            handle: BufWriter::new(handle),
            spectra_written: 0,
        }
    }

    /// Number of spectra written so far
    pub fn spectra_written(&self) -> usize {
        self.spectra_written
    }

    /// Write a spectrum header `KEY=value`
    pub fn write_kv(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.handle.write_all(key.to_ascii_uppercase().as_bytes())?;
        self.handle.write_all(b"=")?;
        self.handle.write_all(value.as_bytes())?;
        self.handle.write_all(b"\n")?;
        Ok(())
    }

    /// Write one spectrum record
    pub fn write(&mut self, spectrum: &MgfSpectrum) -> Result<(), MgfError> {
        self.handle.write_all(b"BEGIN IONS\n")?;
        for (key, value) in &spectrum.params {
            self.write_kv(key, value)?;
        }
        for peak in &spectrum.peaks {
            writeln!(self.handle, "{} {}", peak.mz, peak.intensity)?;
        }
        self.handle.write_all(b"END IONS\n\n")?;
        self.spectra_written += 1;
        Ok(())
    }

    /// Flush buffered output and return the inner handle
    pub fn finish(mut self) -> Result<W, MgfError> {
        self.handle.flush()?;
        self.handle
            .into_inner()
            .map_err(|e| MgfError::IoError(e.into_error()))
    }
}
