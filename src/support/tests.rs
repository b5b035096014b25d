use super::*;

use simple_sds::serialize;

use rand::Rng;

//-----------------------------------------------------------------------------

#[test]
fn node_encoding() {
    assert_eq!(encode_node(17, false), 34, "Invalid forward encoding");
    assert_eq!(encode_node(17, true), 35, "Invalid reverse encoding");
    assert_eq!(node_id(34), 17, "Invalid node id for a forward node");
    assert_eq!(node_id(35), 17, "Invalid node id for a reverse node");
    assert!(!node_is_reverse(34), "Forward node is reverse");
    assert!(node_is_reverse(35), "Reverse node is not reverse");
    assert_eq!(flip_node(34), 35, "Invalid flip for a forward node");
    assert_eq!(flip_node(35), 34, "Invalid flip for a reverse node");
}

#[test]
fn path_reversal() {
    let original = vec![2, 4, 7, 8];
    let reversed = vec![9, 6, 5, 3];

    let mut path = original.clone();
    reverse_path(&mut path);
    assert_eq!(path, reversed, "Invalid in-place reversal");
    reverse_path(&mut path);
    assert_eq!(path, original, "Reversal is not an involution");

    let mut output = vec![123];
    reverse_path_to(&original, &mut output);
    assert_eq!(output[1..], reversed[..], "Invalid appending reversal");
    assert_eq!(output[0], 123, "Appending reversal overwrote the buffer");

    let mut buffer = vec![0; original.len() + 1];
    let mut tail = 1;
    reverse_path_into(&original, &mut buffer, &mut tail);
    assert_eq!(tail, buffer.len(), "Invalid tail after buffer reversal");
    assert_eq!(buffer[1..], reversed[..], "Invalid buffer reversal");
}

#[test]
fn verbosity_level() {
    let old = Verbosity::get();
    Verbosity::set(Verbosity::Full);
    assert_eq!(Verbosity::get(), Verbosity::Full, "Could not set the verbosity level");
    assert!(Verbosity::get() > Verbosity::Silent, "Verbosity levels are not ordered");
    Verbosity::set(old);
}

//-----------------------------------------------------------------------------

// Random values whose bit widths are roughly uniform in `1..=max_width`, so
// that all encoding lengths show up.
fn random_values(n: usize, max_width: usize) -> Vec<usize> {
    let mut rng = rand::thread_rng();
    let mut result = Vec::with_capacity(n);
    for _ in 0..n {
        let width = rng.gen_range(1..=max_width);
        result.push(rng.gen::<usize>() & (bits::low_set(width) as usize));
    }
    result
}

#[test]
fn byte_code_round_trip() {
    let values = random_values(500, 40);
    let mut encoder = ByteCode::new();
    assert!(encoder.is_empty(), "A new encoder is not empty");
    for value in values.iter() {
        encoder.write(*value);
    }
    assert!(encoder.len() >= values.len(), "The encoding cannot be shorter than the value count");

    let decoded: Vec<usize> = ByteCodeIter::new(encoder.as_ref()).collect();
    assert_eq!(decoded, values, "Decoded values differ from the encoded ones");

    let mut iter = ByteCodeIter::new(encoder.as_ref());
    while iter.next().is_some() {}
    assert_eq!(iter.offset(), encoder.len(), "The decoder left bytes behind");
}

#[test]
fn byte_code_boundaries() {
    // Each byte carries 7 bits of data.
    let values = vec![0, 127, 128, 16383, 16384, usize::MAX];
    let mut encoder = ByteCode::new();
    for value in values.iter() {
        encoder.write(*value);
    }
    assert_eq!(encoder.len(), 1 + 1 + 2 + 2 + 3 + 10, "Unexpected encoding sizes at the group boundaries");

    let decoded: Vec<usize> = ByteCodeIter::new(encoder.as_ref()).collect();
    assert_eq!(decoded, values, "Decoded values differ from the encoded ones");
}

//-----------------------------------------------------------------------------

// Random runs over an alphabet of `sigma` values, with `sigma == 0` standing
// for an unknown alphabet.
fn random_runs(n: usize, sigma: usize) -> Vec<(usize, usize)> {
    let space = if sigma == 0 { usize::MAX } else { sigma };
    let mut rng = rand::thread_rng();
    let mut result = Vec::with_capacity(n);
    for _ in 0..n {
        result.push((rng.gen_range(0..space), rng.gen_range(1..500)));
    }
    result
}

fn round_trip_runs(sigma: usize, runs: &[(usize, usize)], name: &str) {
    let mut encoder = RLE::with_sigma(sigma);
    for (value, len) in runs.iter() {
        encoder.write(*value, *len);
    }

    let decoded: Vec<(usize, usize)> = RLEIter::with_sigma(encoder.as_ref(), sigma).collect();
    assert_eq!(decoded, runs, "[{}]: Decoded runs differ from the encoded ones", name);

    let mut iter = RLEIter::with_sigma(encoder.as_ref(), sigma);
    while iter.next().is_some() {}
    assert_eq!(iter.offset(), encoder.len(), "[{}]: The decoder left bytes behind", name);
}

#[test]
fn runs_over_small_alphabets() {
    for sigma in [1, 2, 3, 7, 100, 254] {
        let runs = random_runs(200, sigma);
        round_trip_runs(sigma, &runs, &format!("sigma {}", sigma));
    }
}

#[test]
fn runs_over_large_alphabets() {
    for sigma in [255, 1000, 60000, 0] {
        let runs = random_runs(150, sigma);
        round_trip_runs(sigma, &runs, &format!("sigma {}", sigma));
    }
}

// Short runs pack into a single byte below the limit `256 / sigma`; the
// remaining length of a longer run follows as an integer.
fn check_short_run_boundary(sigma: usize) {
    let limit = 256 / sigma;
    let mut encoder = RLE::with_sigma(sigma);
    let mut truth: Vec<(usize, usize)> = Vec::new();
    for len in [limit.saturating_sub(1), limit, limit + 1, limit + 300] {
        if len == 0 {
            continue;
        }
        let before = encoder.len();
        encoder.write(sigma - 1, len);
        truth.push((sigma - 1, len));
        let expected = if len < limit {
            1
        } else if len - limit < 128 {
            2
        } else {
            3
        };
        assert_eq!(encoder.len() - before, expected, "Unexpected encoding size for a run of length {} with sigma {}", len, sigma);
    }

    let decoded: Vec<(usize, usize)> = RLEIter::with_sigma(encoder.as_ref(), sigma).collect();
    assert_eq!(decoded, truth, "Decoded runs differ from the encoded ones with sigma {}", sigma);
}

#[test]
fn short_run_boundaries() {
    for sigma in [2, 5, 64, 200] {
        check_short_run_boundary(sigma);
    }
}

#[test]
fn interleaved_stream() {
    // A record-style stream: two plain integers, then runs over a small alphabet.
    let mut encoder = RLE::with_sigma(4);
    encoder.write_int(9);
    encoder.write_int(1234);
    encoder.write(1, 3);
    encoder.write(3, 2);

    let mut iter = RLEIter::with_sigma(encoder.as_ref(), 4);
    assert_eq!(iter.int(), Some(9), "Unexpected first integer");
    assert_eq!(iter.int(), Some(1234), "Unexpected second integer");
    assert_eq!(iter.next(), Some((1, 3)), "Unexpected first run");
    assert_eq!(iter.next(), Some((3, 2)), "Unexpected second run");
    assert!(iter.next().is_none(), "Unexpected data at the end of the stream");
    assert_eq!(iter.offset(), encoder.len(), "The decoder left bytes behind");
}

//-----------------------------------------------------------------------------

fn verify_dictionary(dict: &Dictionary, strings: &[&str]) {
    assert_eq!(dict.len(), strings.len(), "Unexpected number of strings");
    assert_eq!(dict.is_empty(), strings.is_empty(), "Unexpected emptiness");
    for (id, name) in strings.iter().enumerate() {
        assert_eq!(dict.bytes(id), name.as_bytes(), "Unexpected bytes for {}", name);
        assert_eq!(dict.str(id), Ok(*name), "Unexpected string slice for {}", name);
        assert_eq!(dict.string(id), Ok(String::from(*name)), "Unexpected string for {}", name);
        assert_eq!(dict.id(name), Some(id), "Unexpected identifier for {}", name);
    }
}

#[test]
fn empty_dictionary() {
    let dict = Dictionary::new();
    verify_dictionary(&dict, &[]);
    assert_eq!(dict.id("GRCh38"), None, "Found a string in an empty dictionary");
    assert_eq!(Dictionary::from(Vec::<&str>::new()), dict, "An empty source and an empty dictionary differ");
    serialize::test(&dict, "empty-dictionary", None, true);
}

#[test]
fn dictionary_lookups() {
    let names = vec!["GRCh38", "CHM13", "HG002", "chrM"];
    let dict = Dictionary::from(names.as_slice());
    verify_dictionary(&dict, &names);
    for absent in ["hg19", "HG003", ""] {
        assert_eq!(dict.id(absent), None, "Found nonexistent string {:?}", absent);
    }
    serialize::test(&dict, "dictionary", None, true);
}

#[test]
fn dictionary_with_duplicates() {
    // Duplicates warn but do not fail, and a lookup resolves to one of them.
    let names = vec!["chr1", "chr2", "chr1", "chrX"];
    let dict = Dictionary::from(names.as_slice());
    assert_eq!(dict.len(), names.len(), "Duplicates changed the number of strings");
    let id = dict.id("chr1").unwrap();
    assert!(id == 0 || id == 2, "Lookup resolved to an unrelated identifier");
    assert_eq!(dict.bytes(id), "chr1".as_bytes(), "Lookup resolved to a wrong string");
    assert_eq!(dict.id("chr3"), None, "Found a nonexistent string");
}

#[test]
fn append_dictionaries() {
    let mut dict = Dictionary::from(vec!["GRCh38", "CHM13"]);
    dict.append(&Dictionary::from(vec!["HG002", "HG003", "HG004"]));
    verify_dictionary(&dict, &["GRCh38", "CHM13", "HG002", "HG003", "HG004"]);
    assert_eq!(dict.id("HG005"), None, "Found a string that was never inserted");
    serialize::test(&dict, "appended-dictionary", None, true);
}

#[test]
fn append_to_empty_dictionary() {
    let source = Dictionary::from(vec!["chr1", "chr2"]);
    let mut dict = Dictionary::new();
    dict.append(&source);
    verify_dictionary(&dict, &["chr1", "chr2"]);

    let copy = dict.clone();
    dict.append(&Dictionary::new());
    assert_eq!(dict, copy, "Appending an empty dictionary changed the contents");
}

//-----------------------------------------------------------------------------

#[test]
fn merge_parameter_defaults() {
    let parameters = MergeParameters::new();
    assert_eq!(parameters.pos_buffer_size(), MergeParameters::POS_BUFFER_SIZE, "Invalid default position buffer size");
    assert_eq!(parameters.thread_buffer_size(), MergeParameters::THREAD_BUFFER_SIZE, "Invalid default thread buffer size");
    assert_eq!(parameters.merge_buffers(), MergeParameters::MERGE_BUFFERS, "Invalid default merge buffer count");
    assert_eq!(parameters.chunk_size(), MergeParameters::CHUNK_SIZE, "Invalid default chunk size");
    assert_eq!(parameters.merge_jobs(), MergeParameters::MERGE_JOBS, "Invalid default merge job count");
}

#[test]
fn merge_parameter_bounds() {
    let mut parameters = MergeParameters::new();

    parameters.set_pos_buffer_size(0);
    assert_eq!(parameters.pos_buffer_size(), 1, "Position buffer size was not clamped from below");
    parameters.set_pos_buffer_size(usize::MAX);
    assert_eq!(parameters.pos_buffer_size(), MergeParameters::MAX_BUFFER_SIZE, "Position buffer size was not clamped from above");

    parameters.set_thread_buffer_size(0);
    assert_eq!(parameters.thread_buffer_size(), 1, "Thread buffer size was not clamped from below");
    parameters.set_thread_buffer_size(usize::MAX);
    assert_eq!(parameters.thread_buffer_size(), MergeParameters::MAX_BUFFER_SIZE, "Thread buffer size was not clamped from above");

    parameters.set_merge_buffers(0);
    assert_eq!(parameters.merge_buffers(), 1, "Merge buffer count was not clamped from below");
    parameters.set_merge_buffers(1000);
    assert_eq!(parameters.merge_buffers(), MergeParameters::MAX_MERGE_BUFFERS, "Merge buffer count was not clamped from above");

    parameters.set_chunk_size(0);
    assert_eq!(parameters.chunk_size(), 1, "Chunk size was not clamped from below");
    parameters.set_chunk_size(12345);
    assert_eq!(parameters.chunk_size(), 12345, "Chunk size has no upper bound");

    parameters.set_merge_jobs(0);
    assert_eq!(parameters.merge_jobs(), 1, "Merge job count was not clamped from below");
    parameters.set_merge_jobs(1000);
    assert_eq!(parameters.merge_jobs(), MergeParameters::MAX_MERGE_JOBS, "Merge job count was not clamped from above");
}

//-----------------------------------------------------------------------------
