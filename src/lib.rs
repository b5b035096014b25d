//! # Core structures for the graph BWT
//!
//! This crate implements the record layer of the [GBWT](https://github.com/jltsiren/gbwt):
//! run-length compressed node records over a graph-structured alphabet, the LF-mapping
//! operations that drive pattern search over them, and the document array samples used
//! to map BWT positions back to sequence identifiers.
//! It is based on the [Simple-SDS](https://github.com/jltsiren/simple-sds) library.
//!
//! The GBWT was originally described in:
//!
//! > Jouni Sirén, Erik Garrison, Adam M. Novak, Benedict Paten, and Richard Durbin:
//! > **Haplotype-aware graph indexes**.\
//! > Bioinformatics 36(2):400-407, 2020.
//! > DOI: [10.1093/bioinformatics/btz575](https://doi.org/10.1093/bioinformatics/btz575)
//!
//! # Overview
//!
//! * [`DynamicRecord`] is the mutable record used during construction and merging.
//! * [`CompressedRecord`] is a read-only view over the byte encoding of a record.
//! * [`DecompressedRecord`] trades memory for constant-time LF queries.
//! * [`RecordArray`] stores the encoded records of an entire index in a single
//!   byte vector with a sparse index over record boundaries.
//! * [`DASamples`] stores sampled sequence identifiers along the BWT and answers
//!   locate queries.
//! * [`Metadata`] associates the sequences with samples, contigs, and path names.
//!
//! Queries never panic on missing objects; they return [`None`] instead.
//! See [`support`] for the node encoding used in bidirectional indexes and for the
//! byte-level codecs behind the record format.

pub mod bwt;
pub mod headers;
pub mod metadata;
pub mod records;
pub mod samples;
pub mod support;

//-----------------------------------------------------------------------------

pub use crate::bwt::RecordArray;
pub use crate::metadata::{Metadata, PathName};
pub use crate::records::{CompressedRecord, DecompressedRecord, DynamicRecord};
pub use crate::samples::DASamples;
pub use crate::support::{Dictionary, MergeParameters, Verbosity};

//-----------------------------------------------------------------------------

/// Node identifier `0` is used for technical purposes and does not exist in the graph.
pub const ENDMARKER: usize = 0;

//-----------------------------------------------------------------------------
