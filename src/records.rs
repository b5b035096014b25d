//! Per-node records of the BWT in three representations.
//!
//! A record stores the part of the BWT corresponding to a single node: a list of
//! outgoing edges and a run-length encoded body, where each run maps a range of
//! positions to an outgoing edge.
//! [`DynamicRecord`] is the mutable representation used during construction and
//! merging.
//! [`CompressedRecord`] is a read-only view over the byte encoding produced by
//! [`DynamicRecord::write_bwt`].
//! [`DecompressedRecord`] stores an explicit successor for every position, making
//! LF queries constant-time.
//!
//! # Examples
//!
//! ```
//! use gbwt_core::records::{DynamicRecord, CompressedRecord};
//! use gbwt_core::support::RLE;
//!
//! let record = DynamicRecord::from_parts(vec![(4, 0), (6, 3)], vec![(0, 2), (1, 3), (0, 1)]);
//! assert_eq!(record.len(), 6);
//! assert_eq!(record.runs(), 3);
//! assert_eq!(record.lf(0), Some((4, 0)));
//! assert_eq!(record.lf(2), Some((6, 3)));
//! assert_eq!(record.lf(5), Some((4, 2)));
//! assert_eq!(record.lf_to(4, 6), Some(5));
//!
//! let mut encoder = RLE::new();
//! record.write_bwt(&mut encoder);
//! let bytes = Vec::from(encoder);
//! let compressed = CompressedRecord::new(2, &bytes).unwrap();
//! assert_eq!(compressed.len(), record.len());
//! assert_eq!(compressed.lf(2), Some((6, 3)));
//! assert_eq!(compressed.follow(&(1..4), 6), Some(3..5));
//! ```

use crate::ENDMARKER;
use crate::support::{ByteCodeIter, RLE, RLEIter};
use crate::support;

use std::cmp::Ordering;
use std::ops::Range;


//-----------------------------------------------------------------------------

// Records with outdegree at most this use a stack-allocated edge buffer in LF queries.
const MAX_OUTDEGREE_FOR_ARRAY: usize = 4;

// Binary search for the rank of the edge to the given node.
fn rank_of(outgoing: &[(usize, usize)], to: usize) -> Option<usize> {
    let mut low = 0;
    let mut high = outgoing.len();
    while low < high {
        let mid = low + (high - low) / 2;
        match to.cmp(&outgoing[mid].0) {
            Ordering::Less => high = mid,
            Ordering::Equal => return Some(mid),
            Ordering::Greater => low = mid + 1,
        }
    }
    None
}

//-----------------------------------------------------------------------------

// A per-rank accumulator of (successor node, successor offset) pairs.
// Records with a small outdegree use a stack-allocated buffer.
#[derive(Clone, Debug)]
enum EdgeBuffer {
    Stack([(usize, usize); MAX_OUTDEGREE_FOR_ARRAY]),
    Heap(Vec<(usize, usize)>),
}

impl EdgeBuffer {
    fn new(outgoing: &[(usize, usize)]) -> Self {
        if outgoing.len() <= MAX_OUTDEGREE_FOR_ARRAY {
            let mut edges = [(0, 0); MAX_OUTDEGREE_FOR_ARRAY];
            edges[..outgoing.len()].copy_from_slice(outgoing);
            EdgeBuffer::Stack(edges)
        } else {
            EdgeBuffer::Heap(outgoing.to_vec())
        }
    }

    #[inline]
    fn add(&mut self, rank: usize, len: usize) {
        match self {
            EdgeBuffer::Stack(edges) => edges[rank].1 += len,
            EdgeBuffer::Heap(edges) => edges[rank].1 += len,
        }
    }

    #[inline]
    fn get(&self, rank: usize) -> (usize, usize) {
        match self {
            EdgeBuffer::Stack(edges) => edges[rank],
            EdgeBuffer::Heap(edges) => edges[rank],
        }
    }
}

//-----------------------------------------------------------------------------

/// A mutable node record used during construction and merging.
///
/// The record stores its incoming edges with occurrence counts, its outgoing
/// edges as (successor node, starting offset in the successor) pairs, the
/// run-length encoded body, and optional sequence identifier samples.
/// Ranks in the body refer to positions in the outgoing edge list.
///
/// Queries assume that the outgoing edges are sorted by successor node; use
/// [`DynamicRecord::recode`] to restore the order after out-of-order updates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DynamicRecord {
    pub(crate) body_size: usize,
    pub(crate) incoming: Vec<(usize, usize)>,
    pub(crate) outgoing: Vec<(usize, usize)>,
    pub(crate) body: Vec<(usize, usize)>,
    pub(crate) ids: Vec<(usize, usize)>,
}

/// Construction.
impl DynamicRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        DynamicRecord::default()
    }

    /// Creates a record from a list of outgoing edges and a list of body runs.
    ///
    /// Each edge is a pair (successor node, starting offset in the successor).
    /// Each run is a pair `(rank, len)` with `rank < outgoing.len()` and `len > 0`.
    pub fn from_parts(outgoing: Vec<(usize, usize)>, body: Vec<(usize, usize)>) -> Self {
        let body_size = body.iter().map(|run| run.1).sum();
        DynamicRecord {
            body_size,
            incoming: Vec::new(),
            outgoing,
            body,
            ids: Vec::new(),
        }
    }

    /// Replaces the sequence identifier samples in the record.
    ///
    /// Each sample is a pair (offset in the record, sequence identifier).
    /// The offsets must be strictly increasing and less than [`DynamicRecord::len`].
    pub fn set_samples(&mut self, samples: Vec<(usize, usize)>) {
        self.ids = samples;
    }
}

/// Statistics and basic access.
impl DynamicRecord {
    /// Returns the number of positions in the record.
    #[inline]
    pub fn len(&self) -> usize {
        self.body_size
    }

    /// Returns `true` if the record is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of runs in the body.
    #[inline]
    pub fn runs(&self) -> usize {
        self.body.len()
    }

    /// Returns the number of outgoing edges.
    #[inline]
    pub fn outdegree(&self) -> usize {
        self.outgoing.len()
    }

    /// Returns the number of incoming edges.
    #[inline]
    pub fn indegree(&self) -> usize {
        self.incoming.len()
    }

    /// Returns the number of sequence identifier samples.
    #[inline]
    pub fn samples(&self) -> usize {
        self.ids.len()
    }

    /// Returns the successor node of rank `i`.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.outdegree()`.
    #[inline]
    pub fn successor(&self, i: usize) -> usize {
        self.outgoing[i].0
    }

    /// Returns the BWT offset in the successor node of rank `i`.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.outdegree()`.
    #[inline]
    pub fn offset(&self, i: usize) -> usize {
        self.outgoing[i].1
    }

    /// Returns the predecessor node of rank `i`.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.indegree()`.
    #[inline]
    pub fn predecessor(&self, i: usize) -> usize {
        self.incoming[i].0
    }

    /// Returns the number of occurrences of the predecessor node of rank `i`.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.indegree()`.
    #[inline]
    pub fn count(&self, i: usize) -> usize {
        self.incoming[i].1
    }

    /// Returns the rank of the edge to the given node, or [`None`] if there is no such edge.
    ///
    /// Assumes that the outgoing edges are sorted by successor node.
    pub fn edge_to(&self, to: usize) -> Option<usize> {
        rank_of(&self.outgoing, to)
    }

    /// Returns the rank of the edge to the given node using a linear scan, or
    /// [`None`] if there is no such edge.
    ///
    /// This works even when the outgoing edges are not sorted yet.
    pub fn edge_to_linear(&self, to: usize) -> Option<usize> {
        self.outgoing.iter().position(|edge| edge.0 == to)
    }

    /// Returns `true` if the record has an edge to the given node.
    pub fn has_edge(&self, to: usize) -> bool {
        self.outgoing.iter().any(|edge| edge.0 == to)
    }

    /// Returns the successor node at offset `i`, or [`ENDMARKER`] if there is no such offset.
    pub fn node_at(&self, i: usize) -> usize {
        let mut offset = 0;
        for run in self.body.iter() {
            offset += run.1;
            if offset > i {
                return self.successor(run.0);
            }
        }
        ENDMARKER
    }
}

/// Updates.
impl DynamicRecord {
    /// Sorts the outgoing edges by successor node and rewrites the body ranks accordingly.
    ///
    /// Does nothing if the edges are already sorted.
    pub fn recode(&mut self) {
        if self.is_empty() {
            return;
        }

        let mut sorted = true;
        for outrank in 1..self.outdegree() {
            if self.outgoing[outrank].0 < self.outgoing[outrank - 1].0 {
                sorted = false;
                break;
            }
        }
        if sorted {
            return;
        }

        for run in self.body.iter_mut() {
            run.0 = self.outgoing[run.0].0;
        }
        self.outgoing.sort_unstable();
        for run in self.body.iter_mut() {
            run.0 = rank_of(&self.outgoing, run.0).unwrap();
        }
    }

    /// Removes the outgoing edges that do not occur in the body and rewrites the
    /// body ranks accordingly.
    pub fn remove_unused_edges(&mut self) {
        // Determine which edges are used and replace the ranks with node identifiers.
        let mut used = vec![false; self.outdegree()];
        for run in self.body.iter_mut() {
            used[run.0] = true;
            run.0 = self.outgoing[run.0].0;
        }

        // Compact the outgoing edges, preserving their order.
        let mut tail = 0;
        for i in 0..self.outgoing.len() {
            self.outgoing[tail] = self.outgoing[i];
            if used[i] {
                tail += 1;
            }
        }
        self.outgoing.truncate(tail);

        for run in self.body.iter_mut() {
            run.0 = rank_of(&self.outgoing, run.0).unwrap();
        }
    }

    /// Records one more occurrence of the given predecessor node.
    ///
    /// Inserts a new incoming edge if the node is not a predecessor yet.
    pub fn increment(&mut self, from: usize) {
        for inrank in 0..self.indegree() {
            if self.incoming[inrank].0 == from {
                self.incoming[inrank].1 += 1;
                return;
            }
        }
        self.add_incoming((from, 1));
    }

    /// Adds an incoming edge, keeping the edges sorted by predecessor node.
    pub fn add_incoming(&mut self, inedge: (usize, usize)) {
        self.incoming.push(inedge);
        self.incoming.sort_unstable();
    }

    /// Returns the total number of occurrences of predecessor nodes smaller than `from`.
    pub fn count_before(&self, from: usize) -> usize {
        let mut result = 0;
        for (node, count) in self.incoming.iter() {
            if *node >= from {
                break;
            }
            result += count;
        }
        result
    }

    /// Returns the total number of occurrences of predecessor nodes at most `from`.
    pub fn count_until(&self, from: usize) -> usize {
        let mut result = 0;
        for (node, count) in self.incoming.iter() {
            if *node > from {
                break;
            }
            result += count;
        }
        result
    }
}

/// LF mapping.
impl DynamicRecord {
    /// Follows the sequence at offset `i` and returns (successor node, offset in successor).
    ///
    /// Returns [`None`] if the sequence ends or offset `i` does not exist.
    pub fn lf(&self, i: usize) -> Option<(usize, usize)> {
        self.run_lf(i).map(|(pos, _)| pos)
    }

    /// As [`DynamicRecord::lf`], but also returns the last offset in the run containing offset `i`.
    pub fn run_lf(&self, i: usize) -> Option<((usize, usize), usize)> {
        if i >= self.len() {
            return None;
        }
        let mut edges = EdgeBuffer::new(&self.outgoing);
        let mut last = 0;
        let mut offset = 0;
        for run in self.body.iter() {
            last = run.0;
            edges.add(run.0, run.1);
            offset += run.1;
            if offset > i {
                break;
            }
        }
        let (node, succ_offset) = edges.get(last);
        if node == ENDMARKER {
            return None;
        }
        Some(((node, succ_offset - (offset - i)), offset - 1))
    }

    /// Returns the offset in the given successor node after mapping offset `i` to it,
    /// or [`None`] if there is no edge to the node.
    ///
    /// The result is the starting offset of the edge plus the number of occurrences
    /// of the node in the body before offset `i`.
    /// Offset `i` may be at most [`DynamicRecord::len`].
    pub fn lf_to(&self, i: usize, to: usize) -> Option<usize> {
        let outrank = self.edge_to(to)?;
        let mut iter = self.body.iter();
        let mut run = (0, 0);
        let mut offset = 0;
        let mut result = self.offset(outrank);
        Some(lf_loop(&mut iter, i, outrank, &mut run, &mut offset, &mut result))
    }

    /// Follows all sequences in the offset range to the given node.
    ///
    /// Returns a semiopen offset range in the destination node, or [`None`] if no
    /// such sequences exist.
    /// See also [`DynamicRecord::bd_follow`].
    ///
    /// # Arguments
    ///
    /// * `range`: Offset range in the record.
    /// * `node`: Destination node.
    pub fn follow(&self, range: &Range<usize>, node: usize) -> Option<Range<usize>> {
        if range.is_empty() || node == ENDMARKER {
            return None;
        }
        let outrank = self.edge_to(node)?;

        // Both endpoints share one pass over the body.
        let mut iter = self.body.iter();
        let mut run = (0, 0);
        let mut offset = 0;
        let mut result = self.offset(outrank);
        let start = lf_loop(&mut iter, range.start, outrank, &mut run, &mut offset, &mut result);
        let end = lf_loop(&mut iter, range.end, outrank, &mut run, &mut offset, &mut result);

        if start < end { Some(start..end) } else { None }
    }

    /// Follows all sequences in the offset range to the given node.
    ///
    /// This query assumes that the GBWT index is bidirectional.
    /// Returns a semiopen offset range in the destination node, or [`None`] if no
    /// such sequences exist.
    /// The second return value is the number of occurrences of nodes `v` in the
    /// query range such that [`support::flip_node`]`(v) < `[`support::flip_node`]`(node)`.
    /// This information can be used for updating the reverse range in bidirectional search.
    /// See also [`DynamicRecord::follow`].
    ///
    /// # Arguments
    ///
    /// * `range`: Offset range in the record.
    /// * `node`: Destination node.
    pub fn bd_follow(&self, range: &Range<usize>, node: usize) -> Option<(Range<usize>, usize)> {
        if range.is_empty() || node == ENDMARKER {
            return None;
        }
        let outrank = self.edge_to(node)?;

        let mut iter = self.body.iter();
        let mut run = (0, 0);
        let mut offset = 0;
        let mut result = self.offset(outrank);
        let start = lf_loop(&mut iter, range.start, outrank, &mut run, &mut offset, &mut result);

        // Occurrences below the threshold rank are exactly those that precede the
        // reverse orientation of `node` in the other direction. If the record has
        // an edge to the reverse orientation and `node` is a forward node, the
        // threshold includes the rank of the reverse orientation, and the
        // occurrences of `outrank` itself must be subtracted afterwards.
        let mut subtract_equal = false;
        let reverse_rank = match self.edge_to(support::flip_node(node)) {
            None => outrank,
            Some(rank) => {
                if support::node_is_reverse(node) {
                    rank
                } else {
                    subtract_equal = true;
                    rank + 1
                }
            }
        };

        // The run found above may extend past the start of the range.
        let mut equal = if run.0 == outrank { offset.saturating_sub(range.start) } else { 0 };
        let mut reverse_offset = if run.0 < reverse_rank { offset.saturating_sub(range.start) } else { 0 };

        while offset < range.end {
            match iter.next() {
                Some(r) => {
                    run = *r;
                    offset += r.1;
                    if r.0 == outrank {
                        equal += r.1;
                    }
                    if r.0 < reverse_rank {
                        reverse_offset += r.1;
                    }
                }
                None => break,
            }
        }

        // The last run may extend past the end of the range.
        if offset > range.end {
            if run.0 == outrank {
                equal -= offset - range.end;
            }
            if run.0 < reverse_rank {
                reverse_offset -= offset - range.end;
            }
        }

        if subtract_equal {
            reverse_offset -= equal;
        }
        if equal == 0 { None } else { Some((start..start + equal, reverse_offset)) }
    }
}

/// Samples.
impl DynamicRecord {
    /// Returns the first sample (offset, sequence id) with offset at least `i`,
    /// or [`None`] if there is no such sample.
    pub fn next_sample(&self, i: usize) -> Option<(usize, usize)> {
        self.ids.iter().find(|sample| sample.0 >= i).copied()
    }
}

/// Serialization.
impl DynamicRecord {
    /// Appends the encoding of the record to the encoder.
    ///
    /// The encoding is the outdegree, the outgoing edges as (delta-encoded
    /// successor, offset) pairs of integers, and the body runs with rank space
    /// equal to the outdegree. An empty record is encoded as a single `0` byte.
    pub fn write_bwt(&self, encoder: &mut RLE) {
        encoder.write_int(self.outdegree());
        let mut prev = 0;
        for (node, offset) in self.outgoing.iter() {
            encoder.write_int(node - prev);
            prev = *node;
            encoder.write_int(*offset);
        }
        if self.outdegree() > 0 {
            encoder.set_sigma(self.outdegree());
            for (rank, len) in self.body.iter() {
                encoder.write(*rank, *len);
            }
        }
    }
}

// The shared loop of the rank-counting LF queries. `run` is the last visited
// run; `offset` and `result` are the cumulative length and the accumulated rank
// at its end. The return value corrects for the overshoot of the last run, while
// the state keeps the uncorrected values so that the caller can continue the pass.
fn lf_loop<'a, I>(iter: &mut I, i: usize, outrank: usize, run: &mut (usize, usize), offset: &mut usize, result: &mut usize) -> usize
where
    I: Iterator<Item = &'a (usize, usize)>,
{
    while *offset < i {
        match iter.next() {
            Some(r) => {
                *run = *r;
                *offset += r.1;
                if r.0 == outrank {
                    *result += r.1;
                }
            }
            None => break,
        }
    }
    *result - if run.0 == outrank && *offset > i { *offset - i } else { 0 }
}

//-----------------------------------------------------------------------------

// A reader over the run-length encoded body of a compressed record.
// The accumulation policy determines the extra state maintained for each run.
struct RunReader<'a, A: Accumulate> {
    source: RLEIter<'a>,
    run: (usize, usize),
    offset: usize,
    acc: A,
}

trait Accumulate {
    fn observe(&mut self, run: (usize, usize));
}

impl Accumulate for EdgeBuffer {
    #[inline]
    fn observe(&mut self, run: (usize, usize)) {
        self.add(run.0, run.1);
    }
}

// Counts the occurrences of a single outgoing rank, starting from a base value.
struct RankCounter {
    outrank: usize,
    count: usize,
}

impl Accumulate for RankCounter {
    #[inline]
    fn observe(&mut self, run: (usize, usize)) {
        if run.0 == self.outrank {
            self.count += run.1;
        }
    }
}

impl<'a, A: Accumulate> RunReader<'a, A> {
    fn new(record: &CompressedRecord<'a>, acc: A) -> Self {
        RunReader {
            source: record.run_iter(),
            run: (0, 0),
            offset: 0,
            acc,
        }
    }

    // Moves to the next run and returns it.
    fn advance(&mut self) -> Option<(usize, usize)> {
        let run = self.source.next()?;
        self.run = run;
        self.offset += run.1;
        self.acc.observe(run);
        Some(run)
    }
}

impl<'a> RunReader<'a, RankCounter> {
    // Returns the accumulated count at offset `i`, advancing the reader if necessary.
    // The reader state may be past `i`; the overshoot is corrected in the result only,
    // so later calls with larger offsets can continue the same pass.
    fn rank_at(&mut self, i: usize) -> usize {
        while self.offset < i {
            if self.advance().is_none() {
                break;
            }
        }
        let mut result = self.acc.count;
        if self.run.0 == self.acc.outrank && self.offset > i {
            result -= self.offset - i;
        }
        result
    }
}

//-----------------------------------------------------------------------------

/// A read-only node record over a byte slice, decoded lazily.
///
/// The outgoing edges are decoded eagerly; the body is decoded run by run as the
/// queries progress.
/// The semantics of the queries match [`DynamicRecord`] exactly.
/// A record is never empty: [`CompressedRecord::new`] returns [`None`] for the
/// encoding of an empty record.
///
/// See the [module-level documentation](crate::records) for an example.
#[derive(Clone, Debug)]
pub struct CompressedRecord<'a> {
    id: usize,
    outgoing: Vec<(usize, usize)>,
    body: &'a [u8],
}

impl<'a> CompressedRecord<'a> {
    /// Returns a record with the given identifier over the byte slice, or [`None`]
    /// if the record would be empty or the slice is malformed.
    pub fn new(id: usize, bytes: &'a [u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }

        let mut iter = ByteCodeIter::new(bytes);
        let sigma = iter.next()?;
        if sigma == 0 {
            return None;
        }

        let mut outgoing: Vec<(usize, usize)> = Vec::with_capacity(sigma);
        let mut prev = 0;
        for _ in 0..sigma {
            let node = iter.next()? + prev;
            prev = node;
            let offset = iter.next()?;
            outgoing.push((node, offset));
        }

        Some(CompressedRecord {
            id,
            outgoing,
            body: &bytes[iter.offset()..],
        })
    }

    /// Returns `true` if the byte slice starts with the encoding of an empty record.
    pub fn empty_record(bytes: &[u8]) -> bool {
        ByteCodeIter::new(bytes).next().unwrap_or(0) == 0
    }

    /// Returns the identifier of the record.
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the number of outgoing edges.
    #[inline]
    pub fn outdegree(&self) -> usize {
        self.outgoing.len()
    }

    /// Returns the successor node of rank `i`.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.outdegree()`.
    #[inline]
    pub fn successor(&self, i: usize) -> usize {
        self.outgoing[i].0
    }

    /// Returns the BWT offset in the successor node of rank `i`.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.outdegree()`.
    #[inline]
    pub fn offset(&self, i: usize) -> usize {
        self.outgoing[i].1
    }

    /// Returns the rank of the edge to the given node, or [`None`] if there is no such edge.
    pub fn edge_to(&self, to: usize) -> Option<usize> {
        rank_of(&self.outgoing, to)
    }

    /// Returns `true` if the record has an edge to the given node.
    pub fn has_edge(&self, to: usize) -> bool {
        self.outgoing.iter().any(|edge| edge.0 == to)
    }

    /// Returns the number of positions in the record.
    ///
    /// This is somewhat slow, as it requires decoding the entire body.
    /// Note that the length is always non-zero.
    pub fn len(&self) -> usize {
        let mut result = 0;
        for (_, len) in self.run_iter() {
            result += len;
        }
        result
    }

    /// Returns the number of runs in the body.
    ///
    /// This is somewhat slow, as it requires decoding the entire body.
    pub fn runs(&self) -> usize {
        self.run_iter().count()
    }

    // Returns an iterator over the body runs.
    pub(crate) fn run_iter(&self) -> RLEIter<'a> {
        RLEIter::with_sigma(self.body, self.outgoing.len())
    }

    /// Decompresses the record as a vector of (successor node, offset in successor) pairs.
    pub fn decompress(&self) -> Vec<(usize, usize)> {
        let mut edges = self.outgoing.clone();
        let mut result: Vec<(usize, usize)> = Vec::new();
        for (rank, len) in self.run_iter() {
            for _ in 0..len {
                result.push(edges[rank]);
                edges[rank].1 += 1;
            }
        }
        result
    }

    /// Returns the successor node at offset `i`, or [`ENDMARKER`] if there is no such offset.
    pub fn node_at(&self, i: usize) -> usize {
        let mut offset = 0;
        for (rank, len) in self.run_iter() {
            offset += len;
            if offset > i {
                return self.successor(rank);
            }
        }
        ENDMARKER
    }

    /// Follows the sequence at offset `i` and returns (successor node, offset in successor).
    ///
    /// Returns [`None`] if the sequence ends or offset `i` does not exist.
    pub fn lf(&self, i: usize) -> Option<(usize, usize)> {
        self.run_lf(i).map(|(pos, _)| pos)
    }

    /// As [`CompressedRecord::lf`], but also returns the last offset in the run containing offset `i`.
    pub fn run_lf(&self, i: usize) -> Option<((usize, usize), usize)> {
        let mut reader = RunReader::new(self, EdgeBuffer::new(&self.outgoing));
        while reader.offset <= i {
            reader.advance()?;
        }
        let (rank, _) = reader.run;
        let (node, succ_offset) = reader.acc.get(rank);
        if node == ENDMARKER {
            return None;
        }
        Some(((node, succ_offset - (reader.offset - i)), reader.offset - 1))
    }

    /// Returns the offset in the given successor node after mapping offset `i` to it,
    /// or [`None`] if there is no edge to the node.
    ///
    /// The result is the starting offset of the edge plus the number of occurrences
    /// of the node in the body before offset `i`.
    /// Offset `i` may be at most [`CompressedRecord::len`].
    pub fn lf_to(&self, i: usize, to: usize) -> Option<usize> {
        let outrank = self.edge_to(to)?;
        let mut reader = RunReader::new(self, RankCounter { outrank, count: self.offset(outrank) });
        Some(reader.rank_at(i))
    }

    /// Follows all sequences in the offset range to the given node.
    ///
    /// Returns a semiopen offset range in the destination node, or [`None`] if no
    /// such sequences exist.
    /// See also [`CompressedRecord::bd_follow`].
    ///
    /// # Arguments
    ///
    /// * `range`: Offset range in the record.
    /// * `node`: Destination node.
    pub fn follow(&self, range: &Range<usize>, node: usize) -> Option<Range<usize>> {
        if range.is_empty() || node == ENDMARKER {
            return None;
        }
        let outrank = self.edge_to(node)?;
        let mut reader = RunReader::new(self, RankCounter { outrank, count: self.offset(outrank) });
        let start = reader.rank_at(range.start);
        let end = reader.rank_at(range.end);
        if start < end { Some(start..end) } else { None }
    }

    /// Follows all sequences in the offset range to the given node.
    ///
    /// This query assumes that the GBWT index is bidirectional.
    /// Returns a semiopen offset range in the destination node, or [`None`] if no
    /// such sequences exist.
    /// The second return value is the number of occurrences of nodes `v` in the
    /// query range such that [`support::flip_node`]`(v) < `[`support::flip_node`]`(node)`.
    /// This information can be used for updating the reverse range in bidirectional search.
    /// See also [`CompressedRecord::follow`].
    ///
    /// # Arguments
    ///
    /// * `range`: Offset range in the record.
    /// * `node`: Destination node.
    pub fn bd_follow(&self, range: &Range<usize>, node: usize) -> Option<(Range<usize>, usize)> {
        if range.is_empty() || node == ENDMARKER {
            return None;
        }
        let outrank = self.edge_to(node)?;
        let mut reader = RunReader::new(self, RankCounter { outrank, count: self.offset(outrank) });
        let start = reader.rank_at(range.start);

        // Occurrences of ranks below the threshold, excluding `outrank` itself, are
        // exactly those that precede the reverse orientation of `node` in the other
        // direction.
        let reverse_rank = match self.edge_to(support::flip_node(node)) {
            None => outrank,
            Some(rank) => {
                if support::node_is_reverse(node) { rank } else { rank + 1 }
            }
        };

        // The run found above may extend past the start of the range.
        let mut reverse_offset = if reader.run.0 < reverse_rank && reader.run.0 != outrank {
            reader.offset.saturating_sub(range.start)
        } else {
            0
        };

        while reader.offset < range.end {
            match reader.advance() {
                Some(run) => {
                    if run.0 < reverse_rank && run.0 != outrank {
                        reverse_offset += run.1;
                    }
                }
                None => break,
            }
        }

        // The last run may extend past the end of the range.
        if reader.run.0 < reverse_rank && reader.run.0 != outrank && reader.offset > range.end {
            reverse_offset -= reader.offset - range.end;
        }

        let end = reader.rank_at(range.end);
        if start < end { Some((start..end, reverse_offset)) } else { None }
    }
}

//-----------------------------------------------------------------------------

/// A fully decompressed node record with a successor for every position.
///
/// The record stores the result of [`DynamicRecord::lf`] for every offset, making
/// LF queries constant-time at the cost of memory.
/// This is useful when the query rate for a record is high enough.
///
/// # Examples
///
/// ```
/// use gbwt_core::records::{DynamicRecord, DecompressedRecord};
///
/// let record = DynamicRecord::from_parts(vec![(4, 0), (6, 3)], vec![(0, 2), (1, 3), (0, 1)]);
/// let decompressed = DecompressedRecord::from(&record);
/// assert_eq!(decompressed.len(), 6);
/// for i in 0..record.len() {
///     assert_eq!(decompressed.lf(i), record.lf(i));
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecompressedRecord {
    outgoing: Vec<(usize, usize)>,
    after: Vec<(usize, usize)>,
    body: Vec<(usize, usize)>,
}

impl DecompressedRecord {
    /// Returns the number of positions in the record.
    #[inline]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns `true` if the record is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of maximal runs of positions with the same successor.
    pub fn runs(&self) -> usize {
        let mut result = 0;
        let mut prev = None;
        for (node, _) in self.body.iter() {
            if Some(*node) != prev {
                result += 1;
                prev = Some(*node);
            }
        }
        result
    }

    /// Returns the number of outgoing edges.
    #[inline]
    pub fn outdegree(&self) -> usize {
        self.outgoing.len()
    }

    /// Returns the successor node of rank `i`.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.outdegree()`.
    #[inline]
    pub fn successor(&self, i: usize) -> usize {
        self.outgoing[i].0
    }

    /// Returns the BWT offset in the successor node of rank `i`.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.outdegree()`.
    #[inline]
    pub fn offset(&self, i: usize) -> usize {
        self.outgoing[i].1
    }

    /// Returns `true` if the record has an edge to the given node.
    pub fn has_edge(&self, to: usize) -> bool {
        self.outgoing.iter().any(|edge| edge.0 == to)
    }

    /// Returns the successor node at offset `i`, or [`ENDMARKER`] if there is no such offset.
    pub fn node_at(&self, i: usize) -> usize {
        if i >= self.len() {
            return ENDMARKER;
        }
        self.body[i].0
    }

    /// Follows the sequence at offset `i` and returns (successor node, offset in successor).
    ///
    /// Returns [`None`] if the sequence ends or offset `i` does not exist.
    /// This is a constant-time operation.
    pub fn lf(&self, i: usize) -> Option<(usize, usize)> {
        if i >= self.len() {
            return None;
        }
        if self.body[i].0 == ENDMARKER {
            return None;
        }
        Some(self.body[i])
    }

    /// As [`DecompressedRecord::lf`], but also returns the last offset in the run containing offset `i`.
    pub fn run_lf(&self, i: usize) -> Option<((usize, usize), usize)> {
        let pos = self.lf(i)?;
        let mut run_end = i;
        while run_end + 1 < self.len() && self.body[run_end + 1].0 == self.body[i].0 {
            run_end += 1;
        }
        Some((pos, run_end))
    }

    // Materializes the body, assigning each position the edge of its run advanced
    // by the number of earlier occurrences of the same rank.
    fn fill<Iter: Iterator<Item = (usize, usize)>>(outgoing: Vec<(usize, usize)>, len: usize, runs: Iter) -> Self {
        let mut after = outgoing.clone();
        let mut body = Vec::with_capacity(len);
        for (rank, run_len) in runs {
            for _ in 0..run_len {
                body.push(after[rank]);
                after[rank].1 += 1;
            }
        }
        DecompressedRecord {
            outgoing,
            after,
            body,
        }
    }
}

impl From<&DynamicRecord> for DecompressedRecord {
    fn from(source: &DynamicRecord) -> Self {
        Self::fill(source.outgoing.clone(), source.len(), source.body.iter().copied())
    }
}

impl<'a> From<&CompressedRecord<'a>> for DecompressedRecord {
    fn from(source: &CompressedRecord<'a>) -> Self {
        Self::fill(source.outgoing.clone(), source.len(), source.run_iter())
    }
}

//-----------------------------------------------------------------------------
