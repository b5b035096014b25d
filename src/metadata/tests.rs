use super::*;

use simple_sds::serialize;

//-----------------------------------------------------------------------------

fn create_metadata() -> Metadata {
    let mut metadata = Metadata::new();
    metadata.set_haplotypes(4);
    metadata.set_sample_names(&["sample-a", "sample-b"]);
    metadata.set_contig_names(&["chr1", "chr2"]);
    metadata.add_path(PathName::new(0, 0, 0, 0));
    metadata.add_path(PathName::new(0, 1, 0, 0));
    metadata.add_path(PathName::new(1, 0, 1, 0));
    metadata.add_path(PathName::new(1, 1, 1, 0));
    metadata
}

//-----------------------------------------------------------------------------

#[test]
fn empty_metadata() {
    let metadata = Metadata::new();
    assert_eq!(metadata.samples(), 0, "Invalid sample count");
    assert_eq!(metadata.haplotypes(), 0, "Invalid haplotype count");
    assert_eq!(metadata.contigs(), 0, "Invalid contig count");
    assert!(!metadata.has_path_names(), "Empty metadata contains path names");
    assert!(!metadata.has_sample_names(), "Empty metadata contains sample names");
    assert!(!metadata.has_contig_names(), "Empty metadata contains contig names");
    assert!(metadata.validate().is_ok(), "Empty metadata is invalid");
    serialize::test(&metadata, "empty-metadata", Some(5), true);
}

#[test]
fn counts() {
    let mut metadata = Metadata::new();
    metadata.set_samples(3);
    metadata.set_haplotypes(6);
    metadata.set_contigs(2);
    assert_eq!(metadata.samples(), 3, "Invalid sample count");
    assert_eq!(metadata.haplotypes(), 6, "Invalid haplotype count");
    assert_eq!(metadata.contigs(), 2, "Invalid contig count");
    serialize::test(&metadata, "metadata-counts", Some(5), true);
}

#[test]
fn path_names() {
    let metadata = create_metadata();
    assert!(metadata.has_path_names(), "Metadata does not contain path names");
    assert_eq!(metadata.paths(), 4, "Invalid path count");
    assert_eq!(metadata.path(1), Some(&PathName::new(0, 1, 0, 0)), "Invalid path name 1");
    assert_eq!(metadata.path(4), None, "Got a nonexistent path name");

    assert_eq!(metadata.find_paths(0, 1), vec![1], "Invalid paths for (sample 0, contig 1)");
    assert_eq!(metadata.paths_for_sample(1), vec![2, 3], "Invalid paths for sample 1");
    assert_eq!(metadata.paths_for_contig(0), vec![0, 2], "Invalid paths for contig 0");

    let mut metadata = metadata;
    metadata.clear_path_names();
    assert!(!metadata.has_path_names(), "Path names were not cleared");
    assert_eq!(metadata.paths(), 0, "Path names remain after clearing");
}

#[test]
fn sample_and_contig_names() {
    let metadata = create_metadata();
    assert!(metadata.has_sample_names(), "Metadata does not contain sample names");
    assert_eq!(metadata.samples(), 2, "Sample count does not match the names");
    assert_eq!(metadata.sample(0), Some("sample-a"), "Invalid sample name 0");
    assert_eq!(metadata.sample(2), None, "Got a nonexistent sample name");
    assert_eq!(metadata.sample_id("sample-b"), Some(1), "Invalid sample id");
    assert_eq!(metadata.sample_id("sample-c"), None, "Got an id for a nonexistent sample");

    assert!(metadata.has_contig_names(), "Metadata does not contain contig names");
    assert_eq!(metadata.contigs(), 2, "Contig count does not match the names");
    assert_eq!(metadata.contig(1), Some("chr2"), "Invalid contig name 1");
    assert_eq!(metadata.contig_id("chr1"), Some(0), "Invalid contig id");

    let mut metadata = metadata;
    metadata.clear_sample_names();
    assert!(!metadata.has_sample_names(), "Sample names were not cleared");
    assert_eq!(metadata.sample(0), None, "Sample names remain after clearing");
    assert_eq!(metadata.samples(), 2, "Clearing sample names changed the sample count");
}

#[test]
fn serialization() {
    let metadata = create_metadata();
    serialize::test(&metadata, "metadata", None, true);

    let mut buffer: Vec<u8> = Vec::new();
    metadata.serialize(&mut buffer).unwrap();
    let loaded = Metadata::load(&mut buffer.as_slice()).unwrap();
    assert_eq!(loaded, metadata, "The loaded metadata differs from the original");
}

//-----------------------------------------------------------------------------

#[test]
fn merge_same_samples_and_contigs() {
    let mut metadata = Metadata::new();
    metadata.set_samples(2);
    metadata.set_haplotypes(4);
    metadata.set_contigs(2);

    let source = create_metadata();
    metadata.merge(&source, true, true);

    assert_eq!(metadata.samples(), 2, "Sample count changed");
    assert_eq!(metadata.haplotypes(), 4, "Haplotype count changed");
    assert_eq!(metadata.contigs(), 2, "Contig count changed");
    assert!(metadata.has_sample_names(), "Sample names were not inherited from the source");
    assert_eq!(metadata.sample(1), Some("sample-b"), "Invalid inherited sample name");
    assert!(metadata.has_contig_names(), "Contig names were not inherited from the source");
    assert_eq!(metadata.contig(0), Some("chr1"), "Invalid inherited contig name");
    assert!(!metadata.has_path_names(), "Path names appeared out of nowhere");
}

#[test]
fn merge_different_samples_and_contigs() {
    let mut metadata = create_metadata();
    let mut source = Metadata::new();
    source.set_haplotypes(2);
    source.set_sample_names(&["sample-c"]);
    source.set_contig_names(&["chr3"]);
    source.add_path(PathName::new(0, 0, 0, 0));

    metadata.merge(&source, false, false);

    assert_eq!(metadata.samples(), 3, "Invalid merged sample count");
    assert_eq!(metadata.haplotypes(), 6, "Invalid merged haplotype count");
    assert_eq!(metadata.contigs(), 3, "Invalid merged contig count");
    assert_eq!(metadata.sample(2), Some("sample-c"), "Invalid appended sample name");
    assert_eq!(metadata.sample_id("sample-c"), Some(2), "Invalid id for an appended sample name");
    assert_eq!(metadata.contig(2), Some("chr3"), "Invalid appended contig name");

    // The path from the source refers to the appended sample and contig.
    assert_eq!(metadata.paths(), 5, "Invalid merged path count");
    assert_eq!(metadata.path(4), Some(&PathName::new(2, 2, 0, 0)), "Path name fields were not shifted");
}

#[test]
fn merge_clears_missing_names() {
    let mut metadata = create_metadata();
    let mut source = Metadata::new();
    source.set_samples(1);
    source.set_haplotypes(1);
    source.set_contigs(1);

    metadata.merge(&source, false, false);

    assert_eq!(metadata.samples(), 3, "Invalid merged sample count");
    assert!(!metadata.has_sample_names(), "Sample names were not cleared");
    assert!(!metadata.has_contig_names(), "Contig names were not cleared");
    assert!(!metadata.has_path_names(), "Path names were not cleared");
}

//-----------------------------------------------------------------------------
