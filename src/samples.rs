//! Document array samples: sequence identifiers sampled along the BWT.
//!
//! Locate queries need to know which sequence occupies a given BWT position.
//! Storing an identifier for every position would be too expensive, so the
//! identifiers are sampled, and the caller follows the sequence with LF queries
//! until it reaches a sampled position.
//!
//! # Examples
//!
//! ```
//! use gbwt_core::records::DynamicRecord;
//! use gbwt_core::samples::DASamples;
//!
//! let mut records = vec![
//!     DynamicRecord::new(),
//!     DynamicRecord::from_parts(vec![(2, 0)], vec![(0, 10)]),
//! ];
//! records[1].set_samples(vec![(2, 7), (5, 99)]);
//!
//! let samples = DASamples::from(records.as_slice());
//! assert_eq!(samples.len(), 2);
//! assert_eq!(samples.try_locate(1, 2), Some(7));
//! assert_eq!(samples.try_locate(1, 3), None);
//! assert_eq!(samples.try_locate(1, 5), Some(99));
//! assert_eq!(samples.next_sample(1, 3), Some((5, 99)));
//! ```

use crate::ENDMARKER;
use crate::records::DynamicRecord;

use simple_sds::bit_vector::BitVector;
use simple_sds::int_vector::IntVector;
use simple_sds::ops::{Access, BitVec, PredSucc, Push, Rank, Select, Vector};
use simple_sds::raw_vector::{AccessRaw, RawVector};
use simple_sds::serialize::Serialize;
use simple_sds::sparse_vector::{OneIter, SparseBuilder, SparseVector};
use simple_sds::bits;

use std::io::{Error, ErrorKind};
use std::{cmp, io};


//-----------------------------------------------------------------------------

/// Sequence identifier samples along the BWT.
///
/// Samples are stored only for the records that have any.
/// The ranges of the sampled records are concatenated into a single index space,
/// with one sparse bit vector marking the start of each range and another
/// marking the sampled positions.
/// The identifiers themselves are stored in a packed integer vector in position
/// order.
///
/// See the [module-level documentation](crate::samples) for an example.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DASamples {
    sampled_records: BitVector,
    bwt_ranges: SparseVector,
    sampled_offsets: SparseVector,
    array: IntVector,
}

impl DASamples {
    /// Returns the number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Returns `true` if there are no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of records covered by the structure, including the
    /// records without samples.
    #[inline]
    pub fn records(&self) -> usize {
        self.sampled_records.len()
    }

    /// Returns `true` if the given record has any samples.
    pub fn is_sampled(&self, record: usize) -> bool {
        record < self.sampled_records.len() && self.sampled_records.get(record)
    }

    /// Returns the sequence identifier at the given position, or [`None`] if the
    /// position does not carry a sample.
    ///
    /// # Arguments
    ///
    /// * `record`: Record identifier.
    /// * `offset`: Offset in the record.
    pub fn try_locate(&self, record: usize, offset: usize) -> Option<usize> {
        if !self.is_sampled(record) {
            return None;
        }
        let pos = self.start(record) + offset;
        if pos >= self.sampled_offsets.len() || !self.sampled_offsets.get(pos) {
            return None;
        }
        Some(self.array.get(self.sampled_offsets.rank(pos)) as usize)
    }

    /// Returns the first sample (offset, sequence id) at or after the given
    /// position, or [`None`] if there are no more samples.
    ///
    /// The returned offset is relative to the start of the given record, but the
    /// sample may come from a later record.
    /// The caller is responsible for comparing the offset against the length of
    /// the record.
    ///
    /// # Arguments
    ///
    /// * `record`: Record identifier.
    /// * `offset`: Offset in the record.
    pub fn next_sample(&self, record: usize, offset: usize) -> Option<(usize, usize)> {
        if !self.is_sampled(record) {
            return None;
        }
        let record_start = self.start(record);
        let mut iter = self.sampled_offsets.successor(record_start + offset);
        iter.next().map(|(rank, pos)| (pos - record_start, self.array.get(rank) as usize))
    }

    /// Returns the first position past the range of the sampled record with the
    /// given rank in the concatenated index space.
    pub fn limit(&self, rank: usize) -> usize {
        if rank + 1 < self.bwt_ranges.count_ones() {
            self.range_start(rank + 1)
        } else {
            self.bwt_ranges.len()
        }
    }

    // Returns the starting position of the sampled record with the given rank.
    fn range_start(&self, rank: usize) -> usize {
        let mut iter = self.bwt_ranges.select_iter(rank);
        iter.next().unwrap().1
    }

    // Returns the starting position of the range of the given record.
    // Assumes that the record is sampled.
    fn start(&self, record: usize) -> usize {
        self.range_start(self.sampled_records.rank(record))
    }
}

//-----------------------------------------------------------------------------

impl From<&[DynamicRecord]> for DASamples {
    fn from(bwt: &[DynamicRecord]) -> Self {
        // Determine the statistics and mark the sampled records.
        let mut record_count = 0;
        let mut bwt_offsets = 0;
        let mut sample_count = 0;
        let mut max_sample = 0;
        let mut raw = RawVector::with_len(bwt.len(), false);
        for (i, record) in bwt.iter().enumerate() {
            if record.samples() > 0 {
                record_count += 1;
                bwt_offsets += record.len();
                sample_count += record.samples();
                for sample in record.ids.iter() {
                    max_sample = cmp::max(max_sample, sample.1);
                }
                raw.set_bit(i, true);
            }
        }
        let mut sampled_records = BitVector::from(raw);
        sampled_records.enable_rank();

        // Build the bit vectors over the concatenated ranges and store the samples.
        let mut range_builder = SparseBuilder::new(bwt_offsets, record_count).unwrap();
        let mut offset_builder = SparseBuilder::new(bwt_offsets, sample_count).unwrap();
        let mut array = IntVector::with_capacity(sample_count, bits::bit_len(max_sample as u64)).unwrap();
        let mut offset = 0;
        for record in bwt.iter() {
            if record.samples() > 0 {
                unsafe { range_builder.set_unchecked(offset); }
                for sample in record.ids.iter() {
                    unsafe { offset_builder.set_unchecked(offset + sample.0); }
                    array.push(sample.1 as u64);
                }
                offset += record.len();
            }
        }

        DASamples {
            sampled_records,
            bwt_ranges: SparseVector::try_from(range_builder).unwrap(),
            sampled_offsets: SparseVector::try_from(offset_builder).unwrap(),
            array,
        }
    }
}

impl From<Vec<DynamicRecord>> for DASamples {
    fn from(bwt: Vec<DynamicRecord>) -> Self {
        DASamples::from(bwt.as_slice())
    }
}

//-----------------------------------------------------------------------------

/// Merging.
impl DASamples {
    /// Merges the samples from multiple structures into a single structure.
    ///
    /// The destination follows the same record mapping as record array merging,
    /// with a special first range for the merged endmarker record covering the
    /// sequences of all sources.
    /// Sample offsets in the endmarker range and all sequence identifiers are
    /// shifted by the number of sequences in the preceding sources.
    ///
    /// # Arguments
    ///
    /// * `sources`: The source structures.
    /// * `origins`: Source index for each destination record; values at least
    ///   `sources.len()` denote records no source provides. The entry for the
    ///   endmarker is ignored.
    /// * `record_offsets`: Difference between destination and source record
    ///   indexes for each source.
    /// * `sequence_counts`: Number of sequences in each source.
    pub fn merge(sources: &[&DASamples], origins: &[usize], record_offsets: &[usize], sequence_counts: &[usize]) -> Self {
        // Statistics over the sources.
        let mut sample_count = 0;
        let mut total_sequences = 0;
        let mut sequence_offsets: Vec<usize> = Vec::with_capacity(sources.len());
        for (i, source) in sources.iter().enumerate() {
            sample_count += source.len();
            sequence_offsets.push(total_sequences);
            total_sequences += sequence_counts[i];
        }

        // Determine the sampled records and the total length of their ranges.
        // The endmarker requires special treatment, as all sources share it.
        let mut range_iters: Vec<RangeIter> = sources.iter().map(|source| RangeIter { parent: source, next: 0 }).collect();
        let mut raw = RawVector::with_len(origins.len(), false);
        let mut record_count = 0;
        let mut bwt_offsets = 0;
        let mut sample_endmarker = false;
        for (origin, source) in sources.iter().enumerate() {
            if source.is_sampled(ENDMARKER) {
                sample_endmarker = true;
                range_iters[origin].next();
            }
        }
        if sample_endmarker {
            record_count += 1;
            bwt_offsets += total_sequences;
            raw.set_bit(ENDMARKER, true);
        }
        for i in 1..origins.len() {
            let origin = origins[i];
            if origin >= sources.len() {
                continue;
            }
            if sources[origin].is_sampled(i - record_offsets[origin]) {
                record_count += 1;
                let (start, limit) = range_iters[origin].next().unwrap();
                bwt_offsets += limit - start;
                raw.set_bit(i, true);
            }
        }
        let mut sampled_records = BitVector::from(raw);
        sampled_records.enable_rank();

        // Concatenate the ranges and the samples in destination record order.
        // The endmarker requires special treatment again.
        let mut range_iters: Vec<RangeIter> = sources.iter().map(|source| RangeIter { parent: source, next: 0 }).collect();
        let mut sample_iters: Vec<_> = sources.iter().map(|source| SampleIter {
            parent: source,
            inner: source.sampled_offsets.one_iter(),
        }.peekable()).collect();
        let mut range_builder = SparseBuilder::new(bwt_offsets, record_count).unwrap();
        let mut offset_builder = SparseBuilder::new(bwt_offsets, sample_count).unwrap();
        let width = bits::bit_len(cmp::max(total_sequences, 1) as u64 - 1);
        let mut array = IntVector::with_capacity(sample_count, width).unwrap();
        let mut record_start = 0;
        if sample_endmarker {
            unsafe { range_builder.set_unchecked(record_start); }
            for (origin, source) in sources.iter().enumerate() {
                if !source.is_sampled(ENDMARKER) {
                    continue;
                }
                let (_, limit) = range_iters[origin].next().unwrap();
                while let Some((offset, id)) = sample_iters[origin].peek().copied() {
                    if offset >= limit {
                        break;
                    }
                    unsafe { offset_builder.set_unchecked(offset + sequence_offsets[origin]); }
                    array.push((id + sequence_offsets[origin]) as u64);
                    sample_iters[origin].next();
                }
            }
            record_start += total_sequences;
        }
        for i in 1..origins.len() {
            if !(i < sampled_records.len() && sampled_records.get(i)) {
                continue;
            }
            let origin = origins[i];
            unsafe { range_builder.set_unchecked(record_start); }
            let (start, limit) = range_iters[origin].next().unwrap();
            while let Some((offset, id)) = sample_iters[origin].peek().copied() {
                if offset >= limit {
                    break;
                }
                unsafe { offset_builder.set_unchecked(offset - start + record_start); }
                array.push((id + sequence_offsets[origin]) as u64);
                sample_iters[origin].next();
            }
            record_start += limit - start;
        }

        DASamples {
            sampled_records,
            bwt_ranges: SparseVector::try_from(range_builder).unwrap(),
            sampled_offsets: SparseVector::try_from(offset_builder).unwrap(),
            array,
        }
    }
}

//-----------------------------------------------------------------------------

// Iterates over the samples of a source as (position in the concatenated index
// space, sequence id) pairs.
#[derive(Clone, Debug)]
struct SampleIter<'a> {
    parent: &'a DASamples,
    inner: OneIter<'a>,
}

impl<'a> Iterator for SampleIter<'a> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(rank, pos)| (pos, self.parent.array.get(rank) as usize))
    }
}

// Iterates over the sampled record ranges of a source as (start, limit) pairs.
#[derive(Clone, Debug)]
struct RangeIter<'a> {
    parent: &'a DASamples,
    next: usize,
}

impl<'a> Iterator for RangeIter<'a> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.parent.bwt_ranges.count_ones() {
            return None;
        }
        let start = self.parent.range_start(self.next);
        let limit = self.parent.limit(self.next);
        self.next += 1;
        Some((start, limit))
    }
}

//-----------------------------------------------------------------------------

impl Serialize for DASamples {
    fn serialize_header<T: io::Write>(&self, _: &mut T) -> io::Result<()> {
        Ok(())
    }

    fn serialize_body<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.sampled_records.serialize(writer)?;
        self.bwt_ranges.serialize(writer)?;
        self.sampled_offsets.serialize(writer)?;
        self.array.serialize(writer)?;
        Ok(())
    }

    fn load<T: io::Read>(reader: &mut T) -> io::Result<Self> {
        let mut sampled_records = BitVector::load(reader)?;
        sampled_records.enable_rank();
        let bwt_ranges = SparseVector::load(reader)?;
        let sampled_offsets = SparseVector::load(reader)?;
        let array = IntVector::load(reader)?;
        if bwt_ranges.len() != sampled_offsets.len() {
            return Err(Error::new(ErrorKind::InvalidData, "DASamples: Range / offset length mismatch"));
        }
        if bwt_ranges.count_ones() != sampled_records.count_ones() {
            return Err(Error::new(ErrorKind::InvalidData, "DASamples: Sampled record / range count mismatch"));
        }
        if array.len() != sampled_offsets.count_ones() {
            return Err(Error::new(ErrorKind::InvalidData, "DASamples: Sample count mismatch"));
        }
        Ok(DASamples {
            sampled_records,
            bwt_ranges,
            sampled_offsets,
            array,
        })
    }

    fn size_in_elements(&self) -> usize {
        self.sampled_records.size_in_elements() + self.bwt_ranges.size_in_elements() + self.sampled_offsets.size_in_elements() + self.array.size_in_elements()
    }
}

//-----------------------------------------------------------------------------
