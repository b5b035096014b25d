use super::*;

use simple_sds::serialize;

//-----------------------------------------------------------------------------

fn get_edges() -> Vec<Vec<(usize, usize)>> {
    vec![
        vec![(1, 0)],
        vec![(2, 0), (3, 0)],
        vec![(4, 0), (5, 0)],
        vec![(4, 1)],
        vec![(5, 1), (6, 0)],
        vec![(7, 0)],
        vec![(7, 2)],
        vec![(0, 0)],
    ]
}

fn get_runs() -> Vec<Vec<(usize, usize)>> {
    vec![
        vec![(0, 3)],
        vec![(0, 2), (1, 1)],
        vec![(0, 1), (1, 1)],
        vec![(0, 1)],
        vec![(1, 1), (0, 1)],
        vec![(0, 2)],
        vec![(0, 1)],
        vec![(0, 3)],
    ]
}

fn create_records(edges: &[Vec<(usize, usize)>], runs: &[Vec<(usize, usize)>]) -> Vec<DynamicRecord> {
    let mut result = Vec::with_capacity(edges.len());
    for i in 0..edges.len() {
        result.push(DynamicRecord::from_parts(edges[i].clone(), runs[i].clone()));
    }
    result
}

// Check all records in the array, using the dynamic records as the source of truth.
fn check_records(array: &RecordArray, records: &[DynamicRecord]) {
    assert_eq!(array.len(), records.len(), "Invalid number of records");
    assert_eq!(array.is_empty(), records.is_empty(), "Invalid emptiness");

    for i in 0..array.len() {
        let record = array.record(i);
        assert_eq!(record.is_none(), records[i].is_empty(), "Invalid record {} existence", i);
        if let Some(record) = record {
            assert_eq!(record.id(), i, "Invalid identifier for record {}", i);
            assert_eq!(record.outdegree(), records[i].outdegree(), "Invalid outdegree in record {}", i);
            for rank in 0..record.outdegree() {
                assert_eq!(record.successor(rank), records[i].successor(rank), "Invalid successor {} in record {}", rank, i);
                assert_eq!(record.offset(rank), records[i].offset(rank), "Invalid offset {} in record {}", rank, i);
            }
            assert_eq!(record.len(), records[i].len(), "Invalid length for record {}", i);
            for offset in 0..record.len() {
                assert_eq!(record.lf(offset), records[i].lf(offset), "Invalid lf({}) in record {}", offset, i);
            }
        }
    }

    // Offsets are consecutive and cover the encoding.
    if !array.is_empty() {
        assert_eq!(array.start(0), 0, "The first record does not start at offset 0");
        for i in 1..array.len() {
            assert_eq!(array.limit(i - 1), array.start(i), "Records {} and {} are not adjacent", i - 1, i);
        }
    }
}

//-----------------------------------------------------------------------------

#[test]
fn empty_record_array() {
    let records: Vec<DynamicRecord> = Vec::new();
    let array = RecordArray::from(records.as_slice());
    check_records(&array, &records);
    serialize::test(&array, "empty-record-array", None, true);
}

#[test]
fn non_empty_record_array() {
    let records = create_records(&get_edges(), &get_runs());
    let array = RecordArray::from(records.as_slice());
    check_records(&array, &records);

    // The iterator skips empty records.
    let visited: Vec<usize> = array.iter().map(|record| record.id()).collect();
    assert_eq!(visited, vec![0, 1, 2, 3, 4, 5, 6, 7], "Invalid iterator order");
    let total: usize = array.iter().map(|record| record.len()).sum();
    assert_eq!(total, 17, "Invalid total length");

    serialize::test(&array, "record-array", None, true);
}

#[test]
fn array_with_empty_records() {
    let mut edges = get_edges();
    edges[2] = Vec::new();
    edges[6] = Vec::new();
    let mut runs = get_runs();
    runs[2] = Vec::new();
    runs[6] = Vec::new();

    let records = create_records(&edges, &runs);
    let array = RecordArray::from(records.as_slice());
    check_records(&array, &records);
    assert!(array.record(2).is_none(), "Got a record for an empty slot");
    assert_eq!(array.limit(2) - array.start(2), 1, "Empty record is not encoded as a single byte");

    let visited: Vec<usize> = array.iter().map(|record| record.id()).collect();
    assert_eq!(visited, vec![0, 1, 3, 4, 5, 7], "The iterator did not skip empty records");

    serialize::test(&array, "record-array-with-empty", None, true);
}

//-----------------------------------------------------------------------------

// Sources for the merge tests: two indexes over disjoint record ranges.
fn merge_sources() -> (RecordArray, RecordArray) {
    // 3 sequences starting at node 1.
    let first = vec![
        DynamicRecord::from_parts(vec![(1, 0)], vec![(0, 3)]),
        DynamicRecord::from_parts(vec![(0, 0)], vec![(0, 3)]),
    ];
    // 2 sequences starting at node 2.
    let second = vec![
        DynamicRecord::from_parts(vec![(2, 0)], vec![(0, 2)]),
        DynamicRecord::from_parts(vec![(0, 0)], vec![(0, 2)]),
    ];
    (RecordArray::from(first.as_slice()), RecordArray::from(second.as_slice()))
}

#[test]
fn merge_endmarkers() {
    let (first, second) = merge_sources();
    let origins = vec![usize::MAX, 0, 1];
    let record_offsets = vec![0, 1];
    let merged = RecordArray::merge(&[&first, &second], &origins, &record_offsets);
    assert_eq!(merged.len(), 3, "Invalid number of merged records");

    // The endmarker concatenates the source endmarkers with shifted offsets.
    let endmarker = merged.record(ENDMARKER).unwrap();
    assert_eq!(endmarker.outdegree(), 2, "Invalid merged endmarker outdegree");
    assert_eq!((endmarker.successor(0), endmarker.offset(0)), (1, 0), "Invalid merged edge 0");
    assert_eq!((endmarker.successor(1), endmarker.offset(1)), (2, 3), "Invalid merged edge 1");
    assert_eq!(endmarker.len(), 5, "Invalid merged endmarker length");
    assert_eq!(endmarker.runs(), 2, "Invalid merged endmarker run count");
    assert_eq!(
        endmarker.decompress(),
        vec![(1, 0), (1, 1), (1, 2), (2, 3), (2, 4)],
        "Invalid merged endmarker body"
    );

    // The remaining records are byte-exact copies.
    let original = first.record(1).unwrap();
    let copied = merged.record(1).unwrap();
    assert_eq!(copied.outdegree(), original.outdegree(), "Invalid outdegree in a copied record");
    assert_eq!(copied.decompress(), original.decompress(), "Invalid body in a copied record");
    let original = second.record(1).unwrap();
    let copied = merged.record(2).unwrap();
    assert_eq!(copied.decompress(), original.decompress(), "Invalid body in a record copied from the second source");

    serialize::test(&merged, "merged-record-array", None, true);
}

#[test]
fn merge_with_missing_records() {
    let (first, second) = merge_sources();
    // Destination record 2 has no source.
    let origins = vec![usize::MAX, 0, usize::MAX, 1];
    let record_offsets = vec![0, 2];
    let merged = RecordArray::merge(&[&first, &second], &origins, &record_offsets);
    assert_eq!(merged.len(), 4, "Invalid number of merged records");
    assert!(merged.record(2).is_none(), "Got a record for a missing slot");
    assert_eq!(merged.limit(2) - merged.start(2), 1, "Missing record is not encoded as a single byte");
    assert_eq!(
        merged.record(3).unwrap().decompress(),
        second.record(1).unwrap().decompress(),
        "Invalid record after a missing slot"
    );
}

#[test]
fn merge_with_empty_source() {
    let (first, _) = merge_sources();
    let empty = RecordArray::from(&[] as &[DynamicRecord]);
    let origins = vec![usize::MAX, 0];
    let record_offsets = vec![0, 0];
    let merged = RecordArray::merge(&[&first, &empty], &origins, &record_offsets);
    assert_eq!(merged.len(), 2, "Invalid number of merged records");

    let endmarker = merged.record(ENDMARKER).unwrap();
    assert_eq!(endmarker.outdegree(), 1, "Invalid endmarker outdegree");
    assert_eq!((endmarker.successor(0), endmarker.offset(0)), (1, 0), "Invalid endmarker edge");
    assert_eq!(endmarker.len(), 3, "Invalid endmarker length");
}

#[test]
fn merge_unsorted_endmarker() {
    // The second source starts at a smaller node, so the merged endmarker
    // must be recoded into sorted order.
    let first = vec![
        DynamicRecord::from_parts(vec![(5, 0)], vec![(0, 2)]),
        DynamicRecord::new(),
        DynamicRecord::from_parts(vec![(0, 0)], vec![(0, 2)]),
    ];
    let second = vec![
        DynamicRecord::from_parts(vec![(3, 0)], vec![(0, 1)]),
        DynamicRecord::from_parts(vec![(0, 0)], vec![(0, 1)]),
    ];
    let first = RecordArray::from(first.as_slice());
    let second = RecordArray::from(second.as_slice());

    // Destination records: 1 and 2 from the first source, 3 from the second.
    let origins = vec![usize::MAX, 0, 0, 1];
    let record_offsets = vec![0, 2];
    let merged = RecordArray::merge(&[&first, &second], &origins, &record_offsets);

    let endmarker = merged.record(ENDMARKER).unwrap();
    assert_eq!(endmarker.outdegree(), 2, "Invalid merged endmarker outdegree");
    assert_eq!((endmarker.successor(0), endmarker.offset(0)), (3, 2), "Invalid merged edge 0");
    assert_eq!((endmarker.successor(1), endmarker.offset(1)), (5, 0), "Invalid merged edge 1");
    assert_eq!(
        endmarker.decompress(),
        vec![(5, 0), (5, 1), (3, 2)],
        "Invalid merged endmarker body"
    );
    assert!(merged.record(1).is_none(), "Empty record was not copied as empty");
    assert_eq!(
        merged.record(3).unwrap().decompress(),
        second.record(1).unwrap().decompress(),
        "Invalid record copied from the second source"
    );
}

//-----------------------------------------------------------------------------

#[test]
fn serialization_round_trip() {
    let records = create_records(&get_edges(), &get_runs());
    let array = RecordArray::from(records.as_slice());

    let mut buffer: Vec<u8> = Vec::new();
    array.serialize(&mut buffer).unwrap();
    let loaded = RecordArray::load(&mut buffer.as_slice()).unwrap();
    assert_eq!(loaded, array, "The loaded array differs from the original");
}

//-----------------------------------------------------------------------------
