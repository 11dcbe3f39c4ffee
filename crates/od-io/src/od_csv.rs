//! OD record CSV reader and writer.
//!
//! # CSV format
//!
//! ```csv
//! origin,destination,value
//! 1001,1001,12.5
//! 1001,2040,3.25
//! ```
//!
//! Pairs without a row are `0.0`.  A repeated pair overwrites the earlier
//! value.  A zone missing from the target index fails the whole read with
//! the line number of the offending row.

use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use serde::Deserialize;

use od_core::{Matrix, OdError, OdRecord, SparseZoneIndex, ZoneNumber};

use crate::{MatrixIoError, MatrixIoResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct OdRow {
    origin:      u32,
    destination: u32,
    value:       f32,
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// Read a sparse OD CSV file into a dense matrix over the given indexes.
pub fn read_od_csv(
    path:         &Path,
    origins:      &Arc<SparseZoneIndex>,
    destinations: &Arc<SparseZoneIndex>,
) -> MatrixIoResult<Matrix<f32>> {
    let file = std::fs::File::open(path).map_err(MatrixIoError::Io)?;
    read_od_reader(file, origins, destinations)
}

/// Like [`read_od_csv`] but accepts any `Read` source.
pub fn read_od_reader<R: Read>(
    reader:       R,
    origins:      &Arc<SparseZoneIndex>,
    destinations: &Arc<SparseZoneIndex>,
) -> MatrixIoResult<Matrix<f32>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let mut records: Vec<(OdRecord, usize)> = Vec::new();
    let mut record = StringRecord::new();
    while csv_reader.read_record(&mut record)? {
        let line = line_of(&record);
        let row: OdRow = record
            .deserialize(Some(&headers))
            .map_err(|e| MatrixIoError::Parse { line, message: e.to_string() })?;
        records.push((
            OdRecord {
                origin:      ZoneNumber(row.origin),
                destination: ZoneNumber(row.destination),
                value:       row.value,
            },
            line,
        ));
    }

    // `from_records` stops at the first bad record, so the last line handed
    // out is the one to report.
    let mut current_line = 0;
    let loaded = Matrix::from_records(
        origins.clone(),
        destinations.clone(),
        records.iter().map(|&(r, line)| {
            current_line = line;
            r
        }),
    );
    let matrix = loaded.map_err(|e| match e {
        OdError::InvalidZone(zone) => MatrixIoError::UnknownZone { zone, line: current_line },
        other => MatrixIoError::Core(other),
    })?;

    log::debug!(
        "read {} OD record(s) into a {}×{} matrix",
        records.len(),
        matrix.rows(),
        matrix.cols()
    );
    Ok(matrix)
}

// ── Writing ───────────────────────────────────────────────────────────────────

/// Write every cell of `matrix` as an `origin,destination,value` row.
pub fn write_od_csv(path: &Path, matrix: &Matrix<f32>) -> MatrixIoResult<()> {
    let file = std::fs::File::create(path)?;
    write_od_writer(file, matrix)
}

/// Like [`write_od_csv`] but accepts any `Write` sink.
pub fn write_od_writer<W: Write>(writer: W, matrix: &Matrix<f32>) -> MatrixIoResult<()> {
    let mut csv_writer = Writer::from_writer(writer);
    csv_writer.write_record(["origin", "destination", "value"])?;
    for o in 0..matrix.rows() {
        let origin = matrix.origins().key_at(o);
        for (d, value) in matrix.row(o).iter().enumerate() {
            csv_writer.write_record(&[
                origin.to_string(),
                matrix.destinations().key_at(d).to_string(),
                value.to_string(),
            ])?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 1-based source line of a record.
pub(crate) fn line_of(record: &StringRecord) -> usize {
    record.position().map_or(0, |p| p.line() as usize)
}
