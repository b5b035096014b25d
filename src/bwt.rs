//! The BWT stored as an array of compressed node records.
//!
//! # Examples
//!
//! ```
//! use gbwt_core::bwt::RecordArray;
//! use gbwt_core::records::DynamicRecord;
//!
//! // Two sequences passing through nodes 1 and 2.
//! let records = vec![
//!     DynamicRecord::from_parts(vec![(1, 0)], vec![(0, 2)]),
//!     DynamicRecord::from_parts(vec![(2, 0)], vec![(0, 2)]),
//!     DynamicRecord::from_parts(vec![(0, 0)], vec![(0, 2)]),
//! ];
//! let array = RecordArray::from(records.as_slice());
//! assert_eq!(array.len(), 3);
//!
//! let record = array.record(1).unwrap();
//! assert_eq!(record.id(), 1);
//! assert_eq!(record.outdegree(), 1);
//! assert_eq!(record.len(), 2);
//! assert_eq!(record.lf(0), Some((2, 0)));
//!
//! // The sequences end at node 2.
//! assert_eq!(array.record(2).unwrap().lf(0), None);
//!
//! // Determine the total length of the BWT by iterating over the records.
//! let total: usize = array.iter().map(|record| record.len()).sum();
//! assert_eq!(total, 6);
//! ```

use crate::ENDMARKER;
use crate::records::{CompressedRecord, DynamicRecord};
use crate::support::RLE;

use simple_sds::ops::{BitVec, Select};
use simple_sds::serialize::Serialize;
use simple_sds::sparse_vector::{SparseBuilder, SparseVector};

use std::io::{Error, ErrorKind};
use std::iter::FusedIterator;
use std::io;

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// An array of node records, encoded as a single byte vector.
///
/// The encoding consists of `self.len()` concatenated node records, with a sparse
/// bit vector marking the start of each record.
/// Record identifiers are characters in the effective alphabet `0..self.len()`,
/// with the endmarker record at index [`ENDMARKER`].
/// There may be empty records that do not correspond to any node in the graph;
/// they are encoded as a single `0` byte.
/// See the [module-level documentation](crate::bwt) for an example.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordArray {
    records: usize,
    index: SparseVector,
    data: Vec<u8>,
}

impl RecordArray {
    /// Returns the number of records in the array, including the empty ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.records
    }

    /// Returns `true` if the array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the `i`th record, or [`None`] if the record is empty or does not exist.
    pub fn record(&self, i: usize) -> Option<CompressedRecord> {
        if i >= self.len() {
            return None;
        }
        let mut iter = self.index.select_iter(i);
        let (_, start) = iter.next().unwrap();
        let limit = if i + 1 < self.len() { iter.next().unwrap().1 } else { self.data.len() };
        CompressedRecord::new(i, &self.data[start..limit])
    }

    /// Returns the starting offset of the `i`th record in the encoding.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.len()`.
    pub fn start(&self, i: usize) -> usize {
        let mut iter = self.index.select_iter(i);
        iter.next().unwrap().1
    }

    /// Returns the first offset past the `i`th record in the encoding.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.len()`.
    pub fn limit(&self, i: usize) -> usize {
        if i + 1 < self.len() { self.start(i + 1) } else { self.data.len() }
    }

    /// Returns an iterator over the records in the array.
    ///
    /// Note that the iterator skips empty records.
    pub fn iter(&self) -> RecordIter {
        RecordIter {
            parent: self,
            next: 0,
        }
    }
}

//-----------------------------------------------------------------------------

/// Merging.
impl RecordArray {
    /// Merges the records from multiple arrays into a single array.
    ///
    /// Destination record `j >= 1` is a byte-exact copy of the corresponding
    /// record in its source, or an empty record if no source provides it.
    /// The destination endmarker concatenates the endmarker records of all
    /// sources: the run ranks of each source are shifted by the outdegree merged
    /// so far and its edge offsets by the number of sequences merged so far,
    /// after which the result is recoded into sorted order.
    ///
    /// # Arguments
    ///
    /// * `sources`: The source arrays.
    /// * `origins`: Source index for each destination record; values at least
    ///   `sources.len()` denote records no source provides. The entry for the
    ///   endmarker is ignored.
    /// * `record_offsets`: Difference between destination and source record
    ///   indexes for each source; record `j` of source `k` becomes destination
    ///   record `j + record_offsets[k]`.
    pub fn merge(sources: &[&RecordArray], origins: &[usize], record_offsets: &[usize]) -> Self {
        if origins.is_empty() {
            return RecordArray::from(&[] as &[DynamicRecord]);
        }

        let mut encoder = RLE::new();
        let mut offsets: Vec<usize> = Vec::with_capacity(origins.len());
        // First unvisited offset in the encoding of each source.
        let mut limits: Vec<usize> = vec![0; sources.len()];

        // Merge the endmarkers.
        let mut merged = DynamicRecord::new();
        for (i, source) in sources.iter().enumerate() {
            if source.is_empty() {
                continue;
            }
            if let Some(record) = source.record(ENDMARKER) {
                let sequences = merged.len();
                let outdegree = merged.outdegree();
                for (rank, len) in record.run_iter() {
                    merged.body.push((rank + outdegree, len));
                    merged.body_size += len;
                }
                for rank in 0..record.outdegree() {
                    merged.outgoing.push((record.successor(rank), record.offset(rank) + sequences));
                }
            }
            limits[i] = source.limit(ENDMARKER);
        }
        merged.recode();
        offsets.push(encoder.len());
        merged.write_bwt(&mut encoder);

        // Copy the remaining records from their sources.
        for comp in 1..origins.len() {
            offsets.push(encoder.len());
            let origin = origins[comp];
            if origin >= sources.len() {
                encoder.write_int(0);
                continue;
            }
            let start = limits[origin];
            let limit = sources[origin].limit(comp - record_offsets[origin]);
            limits[origin] = limit;
            for i in start..limit {
                encoder.write_byte(sources[origin].data[i]);
            }
        }

        let data = Vec::from(encoder);
        let index = build_index(&offsets, data.len());
        RecordArray {
            records: origins.len(),
            index,
            data,
        }
    }
}

//-----------------------------------------------------------------------------

impl From<&[DynamicRecord]> for RecordArray {
    fn from(bwt: &[DynamicRecord]) -> Self {
        let mut encoder = RLE::new();
        let mut offsets: Vec<usize> = Vec::with_capacity(bwt.len());
        for record in bwt.iter() {
            offsets.push(encoder.len());
            record.write_bwt(&mut encoder);
        }
        let data = Vec::from(encoder);
        let index = build_index(&offsets, data.len());
        RecordArray {
            records: bwt.len(),
            index,
            data,
        }
    }
}

impl From<Vec<DynamicRecord>> for RecordArray {
    fn from(bwt: Vec<DynamicRecord>) -> Self {
        RecordArray::from(bwt.as_slice())
    }
}

// Builds a sparse bit vector marking the given offsets in the encoding.
fn build_index(offsets: &[usize], data_len: usize) -> SparseVector {
    let mut builder = SparseBuilder::new(data_len, offsets.len()).unwrap();
    for offset in offsets.iter() {
        unsafe { builder.set_unchecked(*offset); }
    }
    SparseVector::try_from(builder).unwrap()
}

//-----------------------------------------------------------------------------

impl Serialize for RecordArray {
    fn serialize_header<T: io::Write>(&self, _: &mut T) -> io::Result<()> {
        Ok(())
    }

    fn serialize_body<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.records.serialize(writer)?;
        self.index.serialize(writer)?;
        self.data.serialize(writer)?;
        Ok(())
    }

    fn load<T: io::Read>(reader: &mut T) -> io::Result<Self> {
        let records = usize::load(reader)?;
        let index = SparseVector::load(reader)?;
        let data = Vec::<u8>::load(reader)?;
        if index.len() != data.len() {
            return Err(Error::new(ErrorKind::InvalidData, "RecordArray: Index / data length mismatch"));
        }
        if index.count_ones() != records {
            return Err(Error::new(ErrorKind::InvalidData, "RecordArray: Record count mismatch"));
        }
        Ok(RecordArray {
            records,
            index,
            data,
        })
    }

    fn size_in_elements(&self) -> usize {
        self.records.size_in_elements() + self.index.size_in_elements() + self.data.size_in_elements()
    }
}

//-----------------------------------------------------------------------------

/// An iterator over the records in a [`RecordArray`].
///
/// The type of `Item` is [`CompressedRecord`].
/// Note that the iterator skips empty records.
/// See the [module-level documentation](crate::bwt) for an example.
#[derive(Clone, Debug)]
pub struct RecordIter<'a> {
    parent: &'a RecordArray,
    // The first index we have not visited.
    next: usize,
}

impl<'a> Iterator for RecordIter<'a> {
    type Item = CompressedRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.parent.len() {
            let result = self.parent.record(self.next);
            self.next += 1;
            if result.is_some() {
                return result;
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.parent.len() - self.next))
    }
}

impl<'a> FusedIterator for RecordIter<'a> {}

//-----------------------------------------------------------------------------
