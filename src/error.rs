use core::fmt;
use std::io;

use thiserror::Error;

/// A specialized `Result` type for interval index operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur while building, merging or (de)serializing an
/// [`IntervalIndex`](crate::IntervalIndex).
#[derive(Debug, Error)]
pub enum Error {
    /// Points must be supplied to a cell in strictly increasing order.
    #[error("point index {point_index} does not follow the end {current_end} of the last interval")]
    NonIncreasing { point_index: u32, current_end: u32 },

    #[error("cell {0} does not exist")]
    MissingCell(i32),

    #[error("wrong signature {:?} instead of 'LASV'", String::from_utf8_lossy(.found))]
    WrongSignature { found: [u8; 4] },

    #[error("reading {field}")]
    Read {
        field: Field,
        #[source]
        source: io::Error,
    },

    #[error("writing {field}")]
    Write {
        field: Field,
        #[source]
        source: io::Error,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// The record of the `LASV` format that an I/O error occurred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Signature,
    Version,
    NumberOfCells,
    CellIndex,
    NumberOfIntervals { cell_index: i32 },
    NumberOfPoints { cell_index: i32 },
    IntervalStart { cell_index: i32 },
    IntervalEnd { cell_index: i32 },
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Signature => f.write_str("signature"),
            Field::Version => f.write_str("version"),
            Field::NumberOfCells => f.write_str("number of cells"),
            Field::CellIndex => f.write_str("cell index"),
            Field::NumberOfIntervals { cell_index } => {
                write!(f, "number of intervals in cell {cell_index}")
            }
            Field::NumberOfPoints { cell_index } => {
                write!(f, "number of points in cell {cell_index}")
            }
            Field::IntervalStart { cell_index } => {
                write!(f, "start of interval in cell {cell_index}")
            }
            Field::IntervalEnd { cell_index } => write!(f, "end of interval in cell {cell_index}"),
        }
    }
}

/// Wraps the I/O error of a read with the field it happened on.
pub(crate) trait ReadContext<T> {
    fn reading(self, field: Field) -> Result<T>;
}

impl<T> ReadContext<T> for io::Result<T> {
    fn reading(self, field: Field) -> Result<T> {
        self.map_err(|source| Error::Read { field, source })
    }
}

/// Wraps the I/O error of a write with the field it happened on.
pub(crate) trait WriteContext<T> {
    fn writing(self, field: Field) -> Result<T>;
}

impl<T> WriteContext<T> for io::Result<T> {
    fn writing(self, field: Field) -> Result<T> {
        self.map_err(|source| Error::Write { field, source })
    }
}
