//! Metadata associating the sequences of an index with samples, contigs, and path names.
//!
//! # Examples
//!
//! ```
//! use gbwt_core::metadata::{Metadata, PathName};
//!
//! let mut metadata = Metadata::new();
//! metadata.set_haplotypes(2);
//! metadata.set_sample_names(&["sample"]);
//! metadata.set_contig_names(&["A", "B"]);
//! metadata.add_path(PathName::new(0, 1, 0, 0));
//!
//! assert_eq!(metadata.samples(), 1);
//! assert_eq!(metadata.haplotypes(), 2);
//! assert_eq!(metadata.contigs(), 2);
//! assert_eq!(metadata.sample(0), Some("sample"));
//! assert_eq!(metadata.contig_id("B"), Some(1));
//! assert_eq!(metadata.paths_for_contig(1), vec![0]);
//! ```

use crate::headers::{Header, MetadataPayload};
use crate::support::{Dictionary, Verbosity};

use simple_sds::serialize::{Serializable, Serialize};

use std::io::{Error, ErrorKind};
use std::io;

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// A structured name for a path in the index.
///
/// A path is identified by the sample and the contig it belongs to, the phase of
/// the sample, and a running count for fragments of the same haplotype.
/// Sample and contig identifiers refer to the name dictionaries in [`Metadata`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PathName {
    /// Sample identifier.
    pub sample: u32,
    /// Contig identifier.
    pub contig: u32,
    /// Phase / haplotype number.
    pub phase: u32,
    /// Fragment index or starting offset.
    pub count: u32,
}

impl PathName {
    /// Creates a path name from the given fields.
    pub fn new(sample: u32, contig: u32, phase: u32, count: u32) -> Self {
        PathName {
            sample,
            contig,
            phase,
            count,
        }
    }
}

impl Serializable for PathName {}

//-----------------------------------------------------------------------------

/// Metadata for the sequences in an index.
///
/// The metadata stores the numbers of samples, haplotypes, and contigs, and
/// optionally a structured name for each path and name dictionaries for samples
/// and contigs.
/// The optional parts are present when the corresponding flags are set in the
/// header.
///
/// See the [module-level documentation](crate::metadata) for an example.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    header: Header<MetadataPayload>,
    path_names: Vec<PathName>,
    sample_names: Dictionary,
    contig_names: Dictionary,
}

/// Counts.
impl Metadata {
    /// Creates an empty metadata object.
    pub fn new() -> Self {
        Metadata::default()
    }

    /// Returns the number of samples.
    #[inline]
    pub fn samples(&self) -> usize {
        self.header.payload().sample_count
    }

    /// Returns the number of haplotypes.
    #[inline]
    pub fn haplotypes(&self) -> usize {
        self.header.payload().haplotype_count
    }

    /// Returns the number of contigs.
    #[inline]
    pub fn contigs(&self) -> usize {
        self.header.payload().contig_count
    }

    /// Sets the number of samples.
    ///
    /// Warns if the metadata contains sample names, as the names are not updated.
    pub fn set_samples(&mut self, n: usize) {
        if self.has_sample_names() {
            eprintln!("Metadata::set_samples(): Warning: Changing sample count without changing sample names");
        }
        self.header.payload_mut().sample_count = n;
    }

    /// Sets the number of haplotypes.
    pub fn set_haplotypes(&mut self, n: usize) {
        self.header.payload_mut().haplotype_count = n;
    }

    /// Sets the number of contigs.
    ///
    /// Warns if the metadata contains contig names, as the names are not updated.
    pub fn set_contigs(&mut self, n: usize) {
        if self.has_contig_names() {
            eprintln!("Metadata::set_contigs(): Warning: Changing contig count without changing contig names");
        }
        self.header.payload_mut().contig_count = n;
    }

    /// Validates the header and returns an error message if it is invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.header.validate()
    }
}

/// Path names.
impl Metadata {
    /// Returns `true` if the metadata contains path names.
    #[inline]
    pub fn has_path_names(&self) -> bool {
        self.header.is_set(MetadataPayload::FLAG_PATH_NAMES)
    }

    /// Returns the number of paths with names.
    #[inline]
    pub fn paths(&self) -> usize {
        self.path_names.len()
    }

    /// Returns the name of the path with the given identifier, or [`None`] if
    /// there is no such path.
    pub fn path(&self, i: usize) -> Option<&PathName> {
        self.path_names.get(i)
    }

    /// Adds a name for the next path.
    pub fn add_path(&mut self, path: PathName) {
        self.header.set(MetadataPayload::FLAG_PATH_NAMES);
        self.path_names.push(path);
    }

    /// Removes all path names.
    pub fn clear_path_names(&mut self) {
        self.header.unset(MetadataPayload::FLAG_PATH_NAMES);
        self.path_names = Vec::new();
    }

    /// Returns the identifiers of the paths with the given sample and contig.
    pub fn find_paths(&self, sample_id: usize, contig_id: usize) -> Vec<usize> {
        let mut result = Vec::new();
        for (i, path) in self.path_names.iter().enumerate() {
            if path.sample as usize == sample_id && path.contig as usize == contig_id {
                result.push(i);
            }
        }
        result
    }

    /// Returns the identifiers of the paths with the given sample.
    pub fn paths_for_sample(&self, sample_id: usize) -> Vec<usize> {
        let mut result = Vec::new();
        for (i, path) in self.path_names.iter().enumerate() {
            if path.sample as usize == sample_id {
                result.push(i);
            }
        }
        result
    }

    /// Returns the identifiers of the paths with the given contig.
    pub fn paths_for_contig(&self, contig_id: usize) -> Vec<usize> {
        let mut result = Vec::new();
        for (i, path) in self.path_names.iter().enumerate() {
            if path.contig as usize == contig_id {
                result.push(i);
            }
        }
        result
    }
}

/// Sample and contig names.
impl Metadata {
    /// Returns `true` if the metadata contains sample names.
    #[inline]
    pub fn has_sample_names(&self) -> bool {
        self.header.is_set(MetadataPayload::FLAG_SAMPLE_NAMES)
    }

    /// Returns `true` if the metadata contains contig names.
    #[inline]
    pub fn has_contig_names(&self) -> bool {
        self.header.is_set(MetadataPayload::FLAG_CONTIG_NAMES)
    }

    /// Returns the name of the sample with the given identifier, or [`None`] if
    /// there is no such sample.
    pub fn sample(&self, i: usize) -> Option<&str> {
        if i < self.sample_names.len() {
            self.sample_names.str(i).ok()
        } else {
            None
        }
    }

    /// Returns the name of the contig with the given identifier, or [`None`] if
    /// there is no such contig.
    pub fn contig(&self, i: usize) -> Option<&str> {
        if i < self.contig_names.len() {
            self.contig_names.str(i).ok()
        } else {
            None
        }
    }

    /// Returns the identifier of the sample with the given name, or [`None`] if
    /// there is no such sample.
    pub fn sample_id<T: AsRef<[u8]>>(&self, name: T) -> Option<usize> {
        self.sample_names.id(name)
    }

    /// Returns the identifier of the contig with the given name, or [`None`] if
    /// there is no such contig.
    pub fn contig_id<T: AsRef<[u8]>>(&self, name: T) -> Option<usize> {
        self.contig_names.id(name)
    }

    /// Sets the sample names and the sample count.
    ///
    /// Clears the names if the list is empty.
    pub fn set_sample_names<T: AsRef<str>>(&mut self, names: &[T]) {
        if names.is_empty() {
            self.clear_sample_names();
            return;
        }
        self.set_samples(names.len());
        self.header.set(MetadataPayload::FLAG_SAMPLE_NAMES);
        self.sample_names = Dictionary::from(names);
    }

    /// Removes all sample names.
    pub fn clear_sample_names(&mut self) {
        self.header.unset(MetadataPayload::FLAG_SAMPLE_NAMES);
        self.sample_names = Dictionary::new();
    }

    /// Sets the contig names and the contig count.
    ///
    /// Clears the names if the list is empty.
    pub fn set_contig_names<T: AsRef<str>>(&mut self, names: &[T]) {
        if names.is_empty() {
            self.clear_contig_names();
            return;
        }
        self.set_contigs(names.len());
        self.header.set(MetadataPayload::FLAG_CONTIG_NAMES);
        self.contig_names = Dictionary::from(names);
    }

    /// Removes all contig names.
    pub fn clear_contig_names(&mut self) {
        self.header.unset(MetadataPayload::FLAG_CONTIG_NAMES);
        self.contig_names = Dictionary::new();
    }
}

//-----------------------------------------------------------------------------

/// Merging.
impl Metadata {
    /// Merges the metadata from another index into this one.
    ///
    /// When the sources are assumed to share their samples or contigs, the
    /// counts are kept (with a warning if they do not match), and names are
    /// inherited from the source if only the source has them.
    /// Otherwise the counts are added, name dictionaries are concatenated, and
    /// the sample and contig fields of the appended path names are shifted past
    /// the existing identifiers.
    /// Optional parts present here but missing in the source are cleared.
    ///
    /// # Arguments
    ///
    /// * `source`: Metadata of the other index.
    /// * `same_samples`: The indexes are assumed to contain the same samples and haplotypes.
    /// * `same_contigs`: The indexes are assumed to contain the same contigs.
    pub fn merge(&mut self, source: &Metadata, same_samples: bool, same_contigs: bool) {
        let mut sample_offset = 0;
        let mut contig_offset = 0;

        // Merge samples and haplotypes.
        if same_samples {
            if self.samples() != source.samples() || self.haplotypes() != source.haplotypes() {
                eprintln!("Metadata::merge(): Warning: Sample/haplotype counts do not match");
            }
            if !self.has_sample_names() && source.has_sample_names() {
                if Verbosity::get() >= Verbosity::Extended {
                    eprintln!("Metadata::merge(): Taking sample names from the source");
                }
                self.header.set(MetadataPayload::FLAG_SAMPLE_NAMES);
                self.sample_names = source.sample_names.clone();
            }
        } else {
            sample_offset = self.samples();
            self.header.payload_mut().sample_count += source.samples();
            self.header.payload_mut().haplotype_count += source.haplotypes();
            if self.has_sample_names() {
                if source.has_sample_names() {
                    self.sample_names.append(&source.sample_names);
                } else {
                    if Verbosity::get() >= Verbosity::Extended {
                        eprintln!("Metadata::merge(): Clearing sample names: the source has no sample names");
                    }
                    self.clear_sample_names();
                }
            }
        }

        // Merge contigs.
        if same_contigs {
            if self.contigs() != source.contigs() {
                eprintln!("Metadata::merge(): Warning: Contig counts do not match");
            }
            if !self.has_contig_names() && source.has_contig_names() {
                if Verbosity::get() >= Verbosity::Extended {
                    eprintln!("Metadata::merge(): Taking contig names from the source");
                }
                self.header.set(MetadataPayload::FLAG_CONTIG_NAMES);
                self.contig_names = source.contig_names.clone();
            }
        } else {
            contig_offset = self.contigs();
            self.header.payload_mut().contig_count += source.contigs();
            if self.has_contig_names() {
                if source.has_contig_names() {
                    self.contig_names.append(&source.contig_names);
                } else {
                    if Verbosity::get() >= Verbosity::Extended {
                        eprintln!("Metadata::merge(): Clearing contig names: the source has no contig names");
                    }
                    self.clear_contig_names();
                }
            }
        }

        // Merge paths.
        if self.has_path_names() {
            if source.has_path_names() {
                let path_offset = self.paths();
                self.path_names.extend_from_slice(&source.path_names);
                for path in self.path_names[path_offset..].iter_mut() {
                    path.sample += sample_offset as u32;
                    path.contig += contig_offset as u32;
                }
            } else {
                if Verbosity::get() >= Verbosity::Extended {
                    eprintln!("Metadata::merge(): Clearing path names: the source has no path names");
                }
                self.clear_path_names();
            }
        }
    }
}

//-----------------------------------------------------------------------------

impl Serialize for Metadata {
    fn serialize_header<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.header.serialize(writer)
    }

    fn serialize_body<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        if self.has_path_names() {
            self.path_names.serialize(writer)?;
        }
        if self.has_sample_names() {
            self.sample_names.serialize(writer)?;
        }
        if self.has_contig_names() {
            self.contig_names.serialize(writer)?;
        }
        Ok(())
    }

    fn load<T: io::Read>(reader: &mut T) -> io::Result<Self> {
        let mut header = Header::<MetadataPayload>::load(reader)?;
        if let Err(msg) = header.validate() {
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }

        let path_names = if header.is_set(MetadataPayload::FLAG_PATH_NAMES) {
            Vec::<PathName>::load(reader)?
        } else {
            Vec::new()
        };
        let sample_names = if header.is_set(MetadataPayload::FLAG_SAMPLE_NAMES) {
            Dictionary::load(reader)?
        } else {
            Dictionary::new()
        };
        let contig_names = if header.is_set(MetadataPayload::FLAG_CONTIG_NAMES) {
            Dictionary::load(reader)?
        } else {
            Dictionary::new()
        };

        if header.is_set(MetadataPayload::FLAG_SAMPLE_NAMES) && sample_names.len() != header.payload().sample_count {
            return Err(Error::new(ErrorKind::InvalidData, "Metadata: Sample / sample name count mismatch"));
        }
        if header.is_set(MetadataPayload::FLAG_CONTIG_NAMES) && contig_names.len() != header.payload().contig_count {
            return Err(Error::new(ErrorKind::InvalidData, "Metadata: Contig / contig name count mismatch"));
        }

        // Use the serialized version for loading and then bump to the latest.
        header.update();

        Ok(Metadata {
            header,
            path_names,
            sample_names,
            contig_names,
        })
    }

    fn size_in_elements(&self) -> usize {
        let mut result = self.header.size_in_elements();
        if self.has_path_names() {
            result += self.path_names.size_in_elements();
        }
        if self.has_sample_names() {
            result += self.sample_names.size_in_elements();
        }
        if self.has_contig_names() {
            result += self.contig_names.size_in_elements();
        }
        result
    }
}

//-----------------------------------------------------------------------------
