#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use mznovo::mascot::MascotParser;

fuzz_target!(|data: &[u8]| {
    // Malformed documents, position strings and identifiers must surface as errors
    if let Ok(results) = MascotParser::new(Cursor::new(data)).parse() {
        for identification in results.identifications() {
            let _ = results.sequences_for(&identification.spectrum_title).count();
        }
    }
});
