#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use mznovo::mgf::{format_spectra, MgfReader, MgfWriter};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must produce spectra or an error, never a panic
    let mut reader = MgfReader::new(Cursor::new(data));
    for _ in 0..100 {
        match reader.next_spectrum() {
            Ok(Some(spectrum)) => {
                // Field accessors see whatever the header lines contained
                let _ = spectrum.precursor_mz();
                let _ = spectrum.charge();
                let _ = spectrum.retention_time();
            }
            Ok(None) | Err(_) => break,
        }
    }

    // Formatting the same input must not panic either
    let mut writer = MgfWriter::new(Vec::new());
    let _ = format_spectra(MgfReader::new(Cursor::new(data)), &mut writer);
});
