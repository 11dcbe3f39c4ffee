//! Zone-system CSV loader.
//!
//! ```csv
//! zone,planning_district,region
//! 1001,1,1
//! 1002,1,1
//! 2040,7,2
//! ```
//!
//! Rows may appear in any order; duplicate zone numbers are rejected.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;

use od_core::{Zone, ZoneSystem};

use crate::od_csv::line_of;
use crate::{MatrixIoError, MatrixIoResult};

#[derive(Deserialize)]
struct ZoneRow {
    zone:              u32,
    planning_district: u32,
    region:            u32,
}

/// Load a zone system from a CSV file.
pub fn load_zone_system_csv(path: &Path) -> MatrixIoResult<ZoneSystem> {
    let file = std::fs::File::open(path).map_err(MatrixIoError::Io)?;
    load_zone_system_reader(file)
}

/// Like [`load_zone_system_csv`] but accepts any `Read` source.
pub fn load_zone_system_reader<R: Read>(reader: R) -> MatrixIoResult<ZoneSystem> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut zones = Vec::new();
    let mut record = StringRecord::new();
    while csv_reader.read_record(&mut record)? {
        let line = line_of(&record);
        let row: ZoneRow = record
            .deserialize(Some(&headers))
            .map_err(|e| MatrixIoError::Parse { line, message: e.to_string() })?;
        zones.push(Zone::new(row.zone, row.planning_district, row.region));
    }

    let system = ZoneSystem::new(zones)?;
    log::debug!("loaded zone system with {} zone(s)", system.len());
    Ok(system)
}
