//! Dataset loading at startup
//!
//! Runs once, synchronously, before the first request is served.

use hitboard_common::config::SourceEncoding;
use hitboard_common::Result;
use hitboard_core::ingest::{clean, read_raw_records};
use hitboard_core::Universe;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Read, clean and rank a catalog from any reader
pub fn load_universe_from_reader<R: Read>(
    reader: R,
    encoding: SourceEncoding,
    universe_size: usize,
) -> Result<Universe> {
    let records = read_raw_records(reader, encoding)?;
    let cleaned = clean(records);
    Ok(Universe::build(cleaned.items, universe_size))
}

/// Read, clean and rank the catalog CSV at `path`
pub fn load_universe(path: &Path, encoding: SourceEncoding, universe_size: usize) -> Result<Universe> {
    info!("Loading catalog from {}", path.display());
    let file = File::open(path)?;
    load_universe_from_reader(BufReader::new(file), encoding, universe_size)
}
