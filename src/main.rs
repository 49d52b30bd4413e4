//! # mznovo
//!
//! Command-line tool preparing MGF spectra and Mascot identifications as de
//! novo sequencing training input.
//!
//! ## Usage
//!
//! ```bash
//! # Whole batch: every *.dat.mgf in smbp_data with its *.dat.xml
//! mznovo -v run smbp_data --name smbp --seed 42
//!
//! # Individual stages
//! mznovo format run1.dat.mgf run1_formatted.mgf
//! mznovo extract run1_formatted.mgf --mascot run1.dat.xml
//! mznovo merge-mgf -o spectrum_smbp.mgf run1_formatted.mgf run2_formatted.mgf
//! mznovo merge-features -o features_smbp.csv run1_formatted_features.csv run2_formatted_features.csv
//! mznovo partition features_smbp.csv --by-spectrum
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
