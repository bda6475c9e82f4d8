use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::collections::BTreeMap;
use std::io;

use crate::error::{ReadContext, WriteContext};
use crate::index::IntervalIndex;
use crate::{Cell, Error, Field, Interval, Result};

const SIGNATURE: [u8; 4] = *b"LASV";
const VERSION: u32 = 0;

// Sizes of header structures
const SIGNATURE_BYTES: usize = 4;
const VERSION_BYTES: usize = 4;
const NUMBER_OF_CELLS_BYTES: usize = 4;

// Sizes of cell structures
const CELL_HEADER_BYTES: usize = 3 * 4;
const INTERVAL_BYTES: usize = 2 * 4;

impl IntervalIndex {
    /// Return the size in bytes of the serialized output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::IntervalIndex;
    ///
    /// let mut index = IntervalIndex::with_threshold(0);
    /// index.add(0, 1).unwrap();
    /// index.add(5, 1).unwrap();
    ///
    /// let mut bytes = Vec::with_capacity(index.serialized_size());
    /// index.serialize_into(&mut bytes).unwrap();
    /// assert_eq!(bytes.len(), index.serialized_size());
    /// ```
    pub fn serialized_size(&self) -> usize {
        let cells: usize = self
            .get_cells()
            .map(|cell| CELL_HEADER_BYTES + cell.len() * INTERVAL_BYTES)
            .sum();
        SIGNATURE_BYTES + VERSION_BYTES + NUMBER_OF_CELLS_BYTES + cells
    }

    /// Serialize this index into the little endian `LASV` format: a header
    /// with the signature, a version and the number of cells, then for each
    /// cell in ascending cell index order its index, number of intervals and
    /// number of points followed by the intervals.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::IntervalIndex;
    ///
    /// let mut index = IntervalIndex::with_threshold(2);
    /// index.add(1, 0).unwrap();
    /// index.add(3, 0).unwrap();
    ///
    /// let mut bytes = vec![];
    /// index.serialize_into(&mut bytes).unwrap();
    /// assert_eq!(&bytes[..4], b"LASV");
    ///
    /// let other = IntervalIndex::deserialize_from(&bytes[..]).unwrap();
    /// assert_eq!(index, other);
    /// ```
    pub fn serialize_into<W: io::Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&SIGNATURE).writing(Field::Signature)?;
        writer.write_u32::<LittleEndian>(VERSION).writing(Field::Version)?;
        writer.write_u32::<LittleEndian>(self.number_of_cells()).writing(Field::NumberOfCells)?;

        for cell in self.get_cells() {
            let cell_index = cell.index();
            writer.write_i32::<LittleEndian>(cell_index).writing(Field::CellIndex)?;
            writer
                .write_u32::<LittleEndian>(cell.len() as u32)
                .writing(Field::NumberOfIntervals { cell_index })?;
            writer
                .write_u32::<LittleEndian>(cell.full())
                .writing(Field::NumberOfPoints { cell_index })?;
            for interval in cell.intervals() {
                writer
                    .write_u32::<LittleEndian>(interval.start)
                    .writing(Field::IntervalStart { cell_index })?;
                writer
                    .write_u32::<LittleEndian>(interval.end)
                    .writing(Field::IntervalEnd { cell_index })?;
            }
        }

        Ok(())
    }

    /// Replaces the content of this index with the cells read from `reader`.
    /// The threshold is kept and the `total` of each cell is recomputed.
    ///
    /// On error the index is left empty.
    ///
    /// # Errors
    ///
    /// - [`Error::WrongSignature`] if the stream does not start with `LASV`.
    /// - [`Error::Read`] naming the field that could not be read.
    /// - [`Error::InvalidData`] if a cell has no intervals, its intervals
    ///   are not ascending and disjoint, or a cell index appears twice.
    pub fn read<R: io::Read>(&mut self, mut reader: R) -> Result<()> {
        self.clear();

        let mut signature = [0u8; 4];
        reader.read_exact(&mut signature).reading(Field::Signature)?;
        if signature != SIGNATURE {
            return Err(Error::WrongSignature { found: signature });
        }
        let _version = reader.read_u32::<LittleEndian>().reading(Field::Version)?;
        let number_of_cells = reader.read_u32::<LittleEndian>().reading(Field::NumberOfCells)?;

        let mut cells = BTreeMap::new();
        for _ in 0..number_of_cells {
            let (cell_index, cell) = read_cell(&mut reader)?;
            if cells.insert(cell_index, cell).is_some() {
                return Err(Error::InvalidData(format!("cell {cell_index} appears twice")));
            }
        }

        for (cell_index, cell) in cells {
            self.insert_cell(cell_index, cell);
        }

        Ok(())
    }

    /// Deserialize an index from the `LASV` format. The new index uses the
    /// [`DEFAULT_THRESHOLD`](crate::DEFAULT_THRESHOLD).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lasinterval::{Error, IntervalIndex};
    ///
    /// let bytes = b"LASX\0\0\0\0\0\0\0\0";
    /// let error = IntervalIndex::deserialize_from(&bytes[..]).unwrap_err();
    /// assert!(matches!(error, Error::WrongSignature { .. }));
    /// ```
    pub fn deserialize_from<R: io::Read>(reader: R) -> Result<IntervalIndex> {
        let mut index = IntervalIndex::new();
        index.read(reader)?;
        Ok(index)
    }
}

fn read_cell<R: io::Read>(reader: &mut R) -> Result<(i32, Cell)> {
    let cell_index = reader.read_i32::<LittleEndian>().reading(Field::CellIndex)?;
    let number_of_intervals = reader
        .read_u32::<LittleEndian>()
        .reading(Field::NumberOfIntervals { cell_index })?;
    let full = reader
        .read_u32::<LittleEndian>()
        .reading(Field::NumberOfPoints { cell_index })?;

    if number_of_intervals == 0 {
        return Err(Error::InvalidData(format!("cell {cell_index} has no intervals")));
    }

    // the count is untrusted
    let mut intervals: Vec<Interval> = Vec::with_capacity(number_of_intervals.min(1024) as usize);
    for _ in 0..number_of_intervals {
        let start = reader
            .read_u32::<LittleEndian>()
            .reading(Field::IntervalStart { cell_index })?;
        let end = reader
            .read_u32::<LittleEndian>()
            .reading(Field::IntervalEnd { cell_index })?;

        if end < start {
            return Err(Error::InvalidData(format!(
                "interval [{start}, {end}] of cell {cell_index} ends before it starts"
            )));
        }
        if let Some(previous) = intervals.last() {
            if start <= previous.end {
                return Err(Error::InvalidData(format!(
                    "interval [{start}, {end}] of cell {cell_index} does not follow [{}, {}]",
                    previous.start, previous.end
                )));
            }
        }
        intervals.push(Interval::new(start, end));
    }

    Ok((cell_index, Cell::from_intervals(intervals, full)))
}
