//! Raw binary matrix format.
//!
//! # Layout
//!
//! ```text
//! [ f32 LE ; rows × cols ]     row-major, no header
//! ```
//!
//! The file carries no zone numbers or dimensions; the reader must be given
//! the same indexes the matrix was written with.  A file whose byte length
//! is not exactly `rows × cols × 4` is rejected.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use od_core::{Matrix, SparseZoneIndex};

use crate::{MatrixIoError, MatrixIoResult};

const CELL_BYTES: usize = std::mem::size_of::<f32>();

/// Write `matrix` to `path`, replacing any existing file.
pub fn write_matrix_binary(path: &Path, matrix: &Matrix<f32>) -> MatrixIoResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_matrix_to(&mut writer, matrix)?;
    writer.flush()?;
    Ok(())
}

/// Write the row-major cells of `matrix` to any sink.
pub fn write_matrix_to<W: Write>(writer: &mut W, matrix: &Matrix<f32>) -> MatrixIoResult<()> {
    for value in matrix.as_slice() {
        writer.write_all(&value.to_le_bytes())?;
    }
    Ok(())
}

/// Read a matrix over the given indexes from `path`.
pub fn read_matrix_binary(
    path:         &Path,
    origins:      &Arc<SparseZoneIndex>,
    destinations: &Arc<SparseZoneIndex>,
) -> MatrixIoResult<Matrix<f32>> {
    let file = File::open(path).map_err(MatrixIoError::Io)?;
    read_matrix_from(file, origins, destinations)
}

/// Like [`read_matrix_binary`] but accepts any `Read` source.
pub fn read_matrix_from<R: Read>(
    mut reader:   R,
    origins:      &Arc<SparseZoneIndex>,
    destinations: &Arc<SparseZoneIndex>,
) -> MatrixIoResult<Matrix<f32>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let expected = origins.len() * destinations.len() * CELL_BYTES;
    if bytes.len() != expected {
        return Err(MatrixIoError::Length { expected, got: bytes.len() });
    }

    let data: Vec<f32> = bytes
        .chunks_exact(CELL_BYTES)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok(Matrix::from_flat(origins.clone(), destinations.clone(), data)?)
}
