//! Support structures and functions: node encoding, byte-level codecs, string
//! dictionaries, and merge parameters.

use simple_sds::int_vector::IntVector;
use simple_sds::ops::{Access, Push, Vector};
use simple_sds::serialize::Serialize;
use simple_sds::bits;

use std::io::{Error, ErrorKind};
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::{cmp, io};

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// Packs an original node identifier and an orientation into a GBWT node identifier.
///
/// A bidirectional index stores every node in both orientations, with the
/// orientation in the lowest bit. The two orientations of a node are therefore
/// adjacent identifiers, and [`flip_node`] switches between them.
///
/// # Examples
///
/// ```
/// use gbwt_core::support;
///
/// let forward = support::encode_node(21, false);
/// let reverse = support::encode_node(21, true);
/// assert_eq!((forward, reverse), (42, 43));
/// assert_eq!(support::flip_node(forward), reverse);
/// assert_eq!(support::node_id(reverse), 21);
/// assert!(support::node_is_reverse(reverse));
/// ```
///
/// # Panics
///
/// May panic if `id > usize::MAX / 2`.
#[inline]
pub fn encode_node(id: usize, is_reverse: bool) -> usize {
    2 * id + (is_reverse as usize)
}

/// Extracts the original node identifier from a GBWT node identifier.
#[inline]
pub fn node_id(id: usize) -> usize {
    id / 2
}

/// Returns `true` if the GBWT node identifier refers to the reverse orientation.
#[inline]
pub fn node_is_reverse(id: usize) -> bool {
    id & 1 != 0
}

/// Returns the GBWT node identifier for the opposite orientation of the same node.
#[inline]
pub fn flip_node(id: usize) -> usize {
    id ^ 1
}

//-----------------------------------------------------------------------------

/// Reverses the path in place, flipping the orientation of each node.
///
/// # Examples
///
/// ```
/// use gbwt_core::support;
///
/// let mut path = vec![2, 4, 7];
/// support::reverse_path(&mut path);
/// assert_eq!(path, vec![6, 5, 3]);
/// ```
pub fn reverse_path(path: &mut [usize]) {
    path.reverse();
    for node in path.iter_mut() {
        *node = flip_node(*node);
    }
}

/// Appends the reverse of the path to the output, flipping the orientation of each node.
pub fn reverse_path_to(path: &[usize], output: &mut Vec<usize>) {
    for node in path.iter().rev() {
        output.push(flip_node(*node));
    }
}

/// Writes the reverse of the path into the buffer starting from offset `tail`,
/// flipping the orientation of each node and advancing `tail` past the written nodes.
///
/// # Panics
///
/// May panic if the buffer is too small.
pub fn reverse_path_into(path: &[usize], output: &mut [usize], tail: &mut usize) {
    for node in path.iter().rev() {
        output[*tail] = flip_node(*node);
        *tail += 1;
    }
}

//-----------------------------------------------------------------------------

/// Verbosity level of the diagnostic messages written to standard error.
///
/// The level is a process-wide atomic value.
/// Warnings about conditions that degrade quality but not correctness are always
/// written; purely informational messages are gated by the level.
///
/// # Examples
///
/// ```
/// use gbwt_core::support::Verbosity;
///
/// Verbosity::set(Verbosity::Extended);
/// assert!(Verbosity::get() >= Verbosity::Basic);
/// Verbosity::set(Verbosity::Basic);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// No messages.
    Silent = 0,
    /// Basic progress information.
    Basic = 1,
    /// Detailed progress information.
    Extended = 2,
    /// Everything, including debug information.
    Full = 3,
}

static VERBOSITY: AtomicUsize = AtomicUsize::new(Verbosity::Basic as usize);

impl Verbosity {
    /// Returns the current verbosity level.
    pub fn get() -> Verbosity {
        match VERBOSITY.load(Ordering::Relaxed) {
            0 => Verbosity::Silent,
            1 => Verbosity::Basic,
            2 => Verbosity::Extended,
            _ => Verbosity::Full,
        }
    }

    /// Sets the verbosity level for the entire process.
    pub fn set(level: Verbosity) {
        VERBOSITY.store(level as usize, Ordering::Relaxed);
    }
}

//-----------------------------------------------------------------------------

/// An append-only encoder for unsigned integers of variable length.
///
/// Each integer is split into groups of 7 bits, stored from the least
/// significant group up. The high bit of a byte tells whether another byte
/// follows. Node records use this encoding for their headers, so the encoder
/// output can be embedded directly into record data, and [`ByteCode::write_byte`]
/// can interleave raw bytes with the integers.
///
/// Decode the stream with [`ByteCodeIter`]. The bytes can be borrowed with
/// [`AsRef`] or taken out with [`From`].
///
/// # Examples
///
/// ```
/// use gbwt_core::support::ByteCode;
///
/// let mut encoder = ByteCode::new();
/// encoder.write(17);
/// encoder.write(290);
/// assert_eq!(*encoder.as_ref(), [17, 162, 2]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ByteCode {
    bytes: Vec<u8>,
}

impl ByteCode {
    // Data bits per byte; the remaining bit marks a continuation.
    const DATA_BITS: usize = 7;
    const DATA_MASK: u8 = 0x7F;
    const CONTINUE: u8 = 0x80;

    /// Creates an empty encoder.
    pub fn new() -> Self {
        ByteCode::default()
    }

    /// Appends the encoding of `value`.
    pub fn write(&mut self, value: usize) {
        let mut value = value;
        loop {
            if value <= (Self::DATA_MASK as usize) {
                self.bytes.push(value as u8);
                return;
            }
            self.bytes.push(((value as u8) & Self::DATA_MASK) | Self::CONTINUE);
            value >>= Self::DATA_BITS;
        }
    }

    /// Appends a raw byte.
    pub fn write_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Returns the length of the encoding in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AsRef<[u8]> for ByteCode {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<ByteCode> for Vec<u8> {
    fn from(source: ByteCode) -> Self {
        source.bytes
    }
}

//-----------------------------------------------------------------------------

/// A decoder for integers written by [`ByteCode`].
///
/// The iterator yields the integers in the order they were written and stops at
/// the end of the slice; a truncated final integer is dropped.
/// Raw bytes interleaved with the integers can be consumed with
/// [`ByteCodeIter::byte`], and [`ByteCodeIter::offset`] tells how far the
/// decoding has progressed.
///
/// The type of `Item` is [`usize`].
///
/// # Examples
///
/// ```
/// use gbwt_core::support::{ByteCode, ByteCodeIter};
///
/// let mut encoder = ByteCode::new();
/// encoder.write(17);
/// encoder.write(290);
///
/// let mut iter = ByteCodeIter::new(encoder.as_ref());
/// assert_eq!(iter.next(), Some(17));
/// assert_eq!(iter.next(), Some(290));
/// assert!(iter.next().is_none());
/// assert_eq!(iter.offset(), encoder.len());
/// ```
#[derive(Clone, Debug)]
pub struct ByteCodeIter<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteCodeIter<'a> {
    /// Creates a decoder over the byte slice.
    pub fn new(bytes: &'a [u8]) -> Self {
        ByteCodeIter {
            bytes,
            offset: 0,
        }
    }

    /// Consumes and returns a raw byte, or [`None`] at the end of the slice.
    pub fn byte(&mut self) -> Option<u8> {
        let result = self.bytes.get(self.offset).copied();
        if result.is_some() {
            self.offset += 1;
        }
        result
    }

    /// Returns the offset of the first byte not consumed yet.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for ByteCodeIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let mut value = 0;
        let mut shift = 0;
        loop {
            let byte = self.byte()?;
            value |= ((byte & ByteCode::DATA_MASK) as usize) << shift;
            if byte & ByteCode::CONTINUE == 0 {
                return Some(value);
            }
            shift += ByteCode::DATA_BITS;
        }
    }
}

impl<'a> FusedIterator for ByteCodeIter<'a> {}

//-----------------------------------------------------------------------------

/// A run-length encoder over a fixed alphabet.
///
/// A run is a value below the alphabet size `sigma`, repeated one or more
/// times. With a small alphabet, a run is packed into a single byte storing
/// `value + sigma * (len - 1)` whenever the length fits; the remaining length
/// of a longer run follows as a [`ByteCode`] integer. With 255 or more values
/// in the alphabet, or with an unknown alphabet (`sigma == 0`), each run is
/// written as a (value, length - 1) pair of [`ByteCode`] integers instead.
///
/// Decode the stream with [`RLEIter`]. Raw bytes and plain integers can be
/// interleaved with the runs using [`RLE::write_byte`] and [`RLE::write_int`];
/// node records use this for their headers.
///
/// # Examples
///
/// ```
/// use gbwt_core::support::RLE;
///
/// let mut encoder = RLE::with_sigma(3);
/// encoder.write(2, 5);
/// encoder.write(0, 90);
/// assert_eq!(*encoder.as_ref(), [2 + 3 * 4, 252, 5]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RLE {
    bytes: ByteCode,
    sigma: usize,
    short_limit: usize,
}

impl RLE {
    // Alphabets of at least this size store runs as integer pairs.
    const PAIR_CODED: usize = 255;
    // Number of distinct single-byte codes.
    const CODE_SPACE: usize = 256;

    /// Creates an encoder for an unknown alphabet.
    pub fn new() -> Self {
        RLE::default()
    }

    /// Creates an encoder for an alphabet of `sigma` values.
    pub fn with_sigma(sigma: usize) -> Self {
        let (sigma, short_limit) = Self::code_params(sigma);
        RLE {
            bytes: ByteCode::new(),
            sigma,
            short_limit,
        }
    }

    /// Appends a run of `len` copies of `value`.
    ///
    /// Does nothing if `len == 0`.
    ///
    /// # Panics
    ///
    /// Panics if `value >= self.sigma()`.
    pub fn write(&mut self, value: usize, len: usize) {
        if len == 0 {
            return;
        }
        assert!(value < self.sigma, "RLE: Value {} is too large for alphabet size {}", value, self.sigma);
        if self.short_limit == 0 {
            self.bytes.write(value);
            self.bytes.write(len - 1);
        } else if len < self.short_limit {
            self.write_short(value, len);
        } else {
            self.write_short(value, self.short_limit);
            self.bytes.write(len - self.short_limit);
        }
    }

    /// Appends a raw byte.
    pub fn write_byte(&mut self, byte: u8) {
        self.bytes.write_byte(byte);
    }

    /// Appends a plain [`ByteCode`] integer.
    pub fn write_int(&mut self, value: usize) {
        self.bytes.write(value);
    }

    /// Returns the length of the encoding in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the alphabet size.
    #[inline]
    pub fn sigma(&self) -> usize {
        self.sigma
    }

    /// Switches to an alphabet of `sigma` values.
    pub fn set_sigma(&mut self, sigma: usize) {
        let (sigma, short_limit) = Self::code_params(sigma);
        self.sigma = sigma;
        self.short_limit = short_limit;
    }

    // Packs a short run into one byte.
    fn write_short(&mut self, value: usize, len: usize) {
        self.bytes.write_byte((value + self.sigma * (len - 1)) as u8);
    }

    // Returns (effective alphabet size, shortest run length that does not fit
    // in a single byte). The limit is 0 when runs are stored as integer pairs.
    fn code_params(sigma: usize) -> (usize, usize) {
        let sigma = if sigma == 0 { usize::MAX } else { sigma };
        let short_limit = if sigma < Self::PAIR_CODED { Self::CODE_SPACE / sigma } else { 0 };
        (sigma, short_limit)
    }
}

impl Default for RLE {
    fn default() -> Self {
        let (sigma, short_limit) = Self::code_params(0);
        RLE {
            bytes: ByteCode::new(),
            sigma,
            short_limit,
        }
    }
}

impl AsRef<[u8]> for RLE {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.bytes.as_ref()
    }
}

impl From<RLE> for Vec<u8> {
    fn from(source: RLE) -> Self {
        Self::from(source.bytes)
    }
}

//-----------------------------------------------------------------------------

/// A decoder for runs written by [`RLE`].
///
/// The iterator yields `(value, length)` pairs in the order they were written.
/// The alphabet size must match the one used for encoding, with `sigma == 0`
/// again standing for an unknown alphabet. Raw bytes and plain integers
/// interleaved with the runs can be consumed with [`RLEIter::byte`] and
/// [`RLEIter::int`].
///
/// The type of `Item` is `(`[`usize`]`, `[`usize`]`)`.
///
/// # Examples
///
/// ```
/// use gbwt_core::support::{RLE, RLEIter};
///
/// let mut encoder = RLE::with_sigma(3);
/// encoder.write(2, 5);
/// encoder.write(0, 90);
///
/// let mut iter = RLEIter::with_sigma(encoder.as_ref(), 3);
/// assert_eq!(iter.next(), Some((2, 5)));
/// assert_eq!(iter.next(), Some((0, 90)));
/// assert!(iter.next().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct RLEIter<'a> {
    source: ByteCodeIter<'a>,
    sigma: usize,
    short_limit: usize,
}

impl<'a> RLEIter<'a> {
    /// Creates a decoder over the byte slice for an alphabet of `sigma` values.
    pub fn with_sigma(bytes: &'a [u8], sigma: usize) -> Self {
        let (sigma, short_limit) = RLE::code_params(sigma);
        RLEIter {
            source: ByteCodeIter::new(bytes),
            sigma,
            short_limit,
        }
    }

    /// Consumes and returns a raw byte, or [`None`] at the end of the slice.
    pub fn byte(&mut self) -> Option<u8> {
        self.source.byte()
    }

    /// Consumes and returns a plain [`ByteCode`] integer, or [`None`] if there is none left.
    pub fn int(&mut self) -> Option<usize> {
        self.source.next()
    }

    /// Returns the offset of the first byte not consumed yet.
    #[inline]
    pub fn offset(&self) -> usize {
        self.source.offset()
    }

    /// Returns the alphabet size.
    #[inline]
    pub fn sigma(&self) -> usize {
        self.sigma
    }
}

impl<'a> Iterator for RLEIter<'a> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.short_limit == 0 {
            let value = self.source.next()?;
            let len = self.source.next()? + 1;
            Some((value, len))
        } else {
            let code = self.byte()? as usize;
            let value = code % self.sigma;
            let mut len = code / self.sigma + 1;
            if len == self.short_limit {
                len += self.source.next()?;
            }
            Some((value, len))
        }
    }
}

impl<'a> FusedIterator for RLEIter<'a> {}

//-----------------------------------------------------------------------------

/// A set of strings with integer identifiers.
///
/// The strings are concatenated and stored in a single byte vector, with a packed
/// vector of starting offsets and a permutation that orders the identifiers
/// lexicographically.
/// Identifiers are indexes into the offset vector, in the original insertion order.
///
/// Duplicate strings are allowed, but they produce a warning, and only one of the
/// duplicates can then be found with [`Dictionary::id`].
///
/// # Examples
///
/// ```
/// use gbwt_core::support::Dictionary;
///
/// let source = vec!["GRCh38", "CHM13", "sample"];
/// let dict = Dictionary::from(source.as_slice());
/// assert_eq!(dict.len(), 3);
/// for (index, value) in source.iter().enumerate() {
///     assert_eq!(dict.id(value), Some(index));
///     assert_eq!(dict.bytes(index), value.as_bytes());
/// }
/// assert_eq!(dict.id("GRCh37"), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary {
    offsets: IntVector,
    sorted_ids: IntVector,
    data: Vec<u8>,
}

impl Dictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Dictionary::default()
    }

    /// Returns the number of strings in the dictionary.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns `true` if the dictionary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a byte slice corresponding to the string with identifier `i`.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.len()`.
    pub fn bytes(&self, i: usize) -> &[u8] {
        let start = self.offsets.get(i) as usize;
        let limit = self.offsets.get(i + 1) as usize;
        &self.data[start..limit]
    }

    /// Returns a string slice corresponding to the string with identifier `i` or an error if the bytes are not valid UTF-8.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.len()`.
    pub fn str(&self, i: usize) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(self.bytes(i))
    }

    /// Returns a copy of the string with identifier `i` or an error if the bytes are not valid UTF-8.
    ///
    /// # Panics
    ///
    /// May panic if `i >= self.len()`.
    pub fn string(&self, i: usize) -> Result<String, std::str::Utf8Error> {
        self.str(i).map(String::from)
    }

    /// Returns the identifier of the given string, or [`None`] if there is no such string.
    pub fn id<T: AsRef<[u8]>>(&self, string: T) -> Option<usize> {
        let mut low = 0;
        let mut high = self.len();
        while low < high {
            let mid = low + (high - low) / 2;
            let id = self.sorted_ids.get(mid) as usize;
            match string.as_ref().cmp(self.bytes(id)) {
                cmp::Ordering::Less => high = mid,
                cmp::Ordering::Equal => return Some(id),
                cmp::Ordering::Greater => low = mid + 1,
            }
        }
        None
    }

    /// Appends the strings from another dictionary, reassigning their identifiers
    /// to follow the existing ones.
    ///
    /// Warns if the concatenation contains duplicate strings.
    pub fn append(&mut self, source: &Dictionary) {
        if source.is_empty() {
            return;
        }
        let old_len = self.len();
        let old_data_len = self.data.len();
        self.data.extend_from_slice(&source.data);

        // Concatenate the starting offsets, rewriting each source offset relative
        // to the new data vector.
        let new_len = old_len + source.len();
        let mut new_offsets = IntVector::with_capacity(new_len + 1, bits::bit_len(self.data.len() as u64)).unwrap();
        new_offsets.extend(self.offsets.iter().take(old_len).map(|x| x as usize));
        new_offsets.extend(source.offsets.iter().map(|x| x as usize + old_data_len));
        self.offsets = new_offsets;

        self.rebuild_sorted_ids();
        self.warn_duplicates("Dictionary::append()");
    }

    // Rebuilds the lexicographic permutation of the identifiers.
    fn rebuild_sorted_ids(&mut self) {
        let width = if self.is_empty() { 1 } else { bits::bit_len((self.len() - 1) as u64) };
        let mut ids: Vec<usize> = (0..self.len()).collect();
        ids.sort_unstable_by(|a, b| self.bytes(*a).cmp(self.bytes(*b)));
        let mut sorted_ids = IntVector::with_capacity(ids.len(), width).unwrap();
        sorted_ids.extend(ids);
        self.sorted_ids = sorted_ids;
    }

    // Warns if two consecutive strings in sorted order are equal.
    fn warn_duplicates(&self, context: &str) {
        for i in 1..self.len() {
            let prev = self.sorted_ids.get(i - 1) as usize;
            let curr = self.sorted_ids.get(i) as usize;
            if self.bytes(prev) == self.bytes(curr) {
                eprintln!("{}: Warning: The dictionary contains duplicate strings", context);
                break;
            }
        }
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        let mut offsets = IntVector::with_capacity(1, 1).unwrap();
        offsets.push(0);
        Dictionary {
            offsets,
            sorted_ids: IntVector::new(1).unwrap(),
            data: Vec::new(),
        }
    }
}

impl<T: AsRef<str>> From<&[T]> for Dictionary {
    fn from(source: &[T]) -> Self {
        let total_len = source.iter().fold(0, |sum, item| sum + item.as_ref().len());
        let mut offsets = IntVector::with_capacity(source.len() + 1, bits::bit_len(total_len as u64)).unwrap();
        let mut data: Vec<u8> = Vec::with_capacity(total_len);
        offsets.push(0);
        for string in source.iter() {
            data.extend(string.as_ref().bytes());
            offsets.push(data.len() as u64);
        }
        let mut result = Dictionary {
            offsets,
            sorted_ids: IntVector::new(1).unwrap(),
            data,
        };
        result.rebuild_sorted_ids();
        result.warn_duplicates("Dictionary::from()");
        result
    }
}

impl<T: AsRef<str>> From<Vec<T>> for Dictionary {
    fn from(source: Vec<T>) -> Self {
        Dictionary::from(source.as_slice())
    }
}

impl Serialize for Dictionary {
    fn serialize_header<T: io::Write>(&self, _: &mut T) -> io::Result<()> {
        Ok(())
    }

    fn serialize_body<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.offsets.serialize(writer)?;
        self.sorted_ids.serialize(writer)?;
        self.data.serialize(writer)?;
        Ok(())
    }

    fn load<T: io::Read>(reader: &mut T) -> io::Result<Self> {
        let offsets = IntVector::load(reader)?;
        let sorted_ids = IntVector::load(reader)?;
        let data = Vec::<u8>::load(reader)?;
        if offsets.len() == 0 || offsets.get(0) != 0 {
            return Err(Error::new(ErrorKind::InvalidData, "Dictionary: First string does not start at offset 0"));
        }
        if offsets.get(offsets.len() - 1) as usize != data.len() {
            return Err(Error::new(ErrorKind::InvalidData, "Dictionary: Offsets do not match the data"));
        }
        if sorted_ids.len() + 1 != offsets.len() {
            return Err(Error::new(ErrorKind::InvalidData, "Dictionary: Offset / permutation length mismatch"));
        }
        Ok(Dictionary {
            offsets,
            sorted_ids,
            data,
        })
    }

    fn size_in_elements(&self) -> usize {
        self.offsets.size_in_elements() + self.sorted_ids.size_in_elements() + self.data.size_in_elements()
    }
}

//-----------------------------------------------------------------------------

/// Parameters for merging GBWT indexes.
///
/// The setters clamp the values to the valid ranges, so the parameters are always usable.
/// Buffer sizes are in megabytes.
///
/// # Examples
///
/// ```
/// use gbwt_core::support::MergeParameters;
///
/// let mut parameters = MergeParameters::new();
/// assert_eq!(parameters.pos_buffer_size(), MergeParameters::POS_BUFFER_SIZE);
/// parameters.set_merge_jobs(1000);
/// assert_eq!(parameters.merge_jobs(), MergeParameters::MAX_MERGE_JOBS);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeParameters {
    pos_buffer_size: usize,
    thread_buffer_size: usize,
    merge_buffers: usize,
    chunk_size: usize,
    merge_jobs: usize,
}

impl MergeParameters {
    /// Default size of the position buffers in megabytes.
    pub const POS_BUFFER_SIZE: usize = 64;

    /// Default size of the thread buffers in megabytes.
    pub const THREAD_BUFFER_SIZE: usize = 256;

    /// Default number of merge buffers.
    pub const MERGE_BUFFERS: usize = 6;

    /// Default number of sequences per merge chunk.
    pub const CHUNK_SIZE: usize = 1;

    /// Default number of parallel merge jobs.
    pub const MERGE_JOBS: usize = 4;

    /// Maximum buffer size in megabytes.
    pub const MAX_BUFFER_SIZE: usize = 16384;

    /// Maximum number of merge buffers.
    pub const MAX_MERGE_BUFFERS: usize = 16;

    /// Maximum number of parallel merge jobs.
    pub const MAX_MERGE_JOBS: usize = 16;

    /// Creates a parameter set with default values.
    pub fn new() -> Self {
        MergeParameters::default()
    }

    /// Returns the size of the position buffers in megabytes.
    #[inline]
    pub fn pos_buffer_size(&self) -> usize {
        self.pos_buffer_size
    }

    /// Returns the size of the thread buffers in megabytes.
    #[inline]
    pub fn thread_buffer_size(&self) -> usize {
        self.thread_buffer_size
    }

    /// Returns the number of merge buffers.
    #[inline]
    pub fn merge_buffers(&self) -> usize {
        self.merge_buffers
    }

    /// Returns the number of sequences per merge chunk.
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the number of parallel merge jobs.
    #[inline]
    pub fn merge_jobs(&self) -> usize {
        self.merge_jobs
    }

    /// Sets the size of the position buffers, clamped to `1..=MAX_BUFFER_SIZE` megabytes.
    pub fn set_pos_buffer_size(&mut self, megabytes: usize) {
        self.pos_buffer_size = megabytes.clamp(1, Self::MAX_BUFFER_SIZE);
    }

    /// Sets the size of the thread buffers, clamped to `1..=MAX_BUFFER_SIZE` megabytes.
    pub fn set_thread_buffer_size(&mut self, megabytes: usize) {
        self.thread_buffer_size = megabytes.clamp(1, Self::MAX_BUFFER_SIZE);
    }

    /// Sets the number of merge buffers, clamped to `1..=MAX_MERGE_BUFFERS`.
    pub fn set_merge_buffers(&mut self, n: usize) {
        self.merge_buffers = n.clamp(1, Self::MAX_MERGE_BUFFERS);
    }

    /// Sets the number of sequences per merge chunk (at least 1).
    pub fn set_chunk_size(&mut self, n: usize) {
        self.chunk_size = cmp::max(n, 1);
    }

    /// Sets the number of parallel merge jobs, clamped to `1..=MAX_MERGE_JOBS`.
    pub fn set_merge_jobs(&mut self, n: usize) {
        self.merge_jobs = n.clamp(1, Self::MAX_MERGE_JOBS);
    }
}

impl Default for MergeParameters {
    fn default() -> Self {
        MergeParameters {
            pos_buffer_size: Self::POS_BUFFER_SIZE,
            thread_buffer_size: Self::THREAD_BUFFER_SIZE,
            merge_buffers: Self::MERGE_BUFFERS,
            chunk_size: Self::CHUNK_SIZE,
            merge_jobs: Self::MERGE_JOBS,
        }
    }
}

//-----------------------------------------------------------------------------
