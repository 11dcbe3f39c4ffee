//! Mapping-file loader.
//!
//! # CSV format
//!
//! One row per non-zero correspondence between an original zone and a
//! converted zone.  The first line is a header and is skipped whatever it
//! contains; column names are not checked.
//!
//! ```csv
//! OriginalZone,ConvertedZone,Fraction
//! 101,1,1.0
//! 102,1,0.5
//! 102,2,0.5
//! ```
//!
//! Rows with fewer than three fields are ignored.  Extra fields after the
//! third are ignored.  Zone numbers are checked against the zone systems only
//! when the rows are turned into a [`CorrespondenceMap`](crate::CorrespondenceMap),
//! which reports the offending row's line number.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use od_core::ZoneNumber;

use crate::{RemapError, RemapResult};

/// One parsed correspondence row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MappingRow {
    pub original:  ZoneNumber,
    pub converted: ZoneNumber,
    pub fraction:  f32,
    /// 1-based line number in the source file.
    pub line:      usize,
}

impl MappingRow {
    pub fn new(original: u32, converted: u32, fraction: f32) -> Self {
        Self {
            original:  ZoneNumber(original),
            converted: ZoneNumber(converted),
            fraction,
            line:      0,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load mapping rows from a CSV file.
pub fn load_mapping_csv(path: &Path) -> RemapResult<Vec<MappingRow>> {
    let file = std::fs::File::open(path).map_err(RemapError::Io)?;
    load_mapping_reader(file)
}

/// Like [`load_mapping_csv`] but accepts any `Read` source.
pub fn load_mapping_reader<R: Read>(reader: R) -> RemapResult<Vec<MappingRow>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        if record.len() < 3 {
            continue;
        }
        let line = record.position().map_or(0, |p| p.line() as usize);
        let fields: StringRecord = record.iter().take(3).collect();
        let (original, converted, fraction) = fields
            .deserialize::<(u32, u32, f32)>(None)
            .map_err(|e| RemapError::Parse { line, message: e.to_string() })?;

        rows.push(MappingRow {
            original:  ZoneNumber(original),
            converted: ZoneNumber(converted),
            fraction,
            line,
        });
    }

    log::debug!("read {} mapping row(s)", rows.len());
    Ok(rows)
}
