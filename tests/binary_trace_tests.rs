// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Integration tests for the length-prefixed binary trace format.

mod common;

use std::io::Write;

use osi_tracefile::io::{BinaryTraceReader, BinaryTraceWriter};
use osi_tracefile::schema::osi3::{GroundTruth, SensorView, TrafficUpdate};
use osi_tracefile::{MessageKind, TraceError, TraceReader, TraceWriter};
use proptest::prelude::*;

use common::{ground_truth, sample_record, seconds_nanos, sensor_view, write_binary_trace};

#[test]
fn test_ground_truth_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test_gt_.osi");
    write_binary_trace(&path, &[ground_truth(123, 456)]);

    let mut reader = BinaryTraceReader::new();
    reader.open(&path).unwrap();
    assert_eq!(reader.message_kind(), MessageKind::GroundTruth);
    assert!(reader.has_next());

    let result = reader.read_message().unwrap().unwrap();
    assert_eq!(result.kind, MessageKind::GroundTruth);
    assert_eq!(result.channel, None);
    let gt = result.get::<GroundTruth>().unwrap();
    assert_eq!(seconds_nanos(gt.timestamp.as_ref()), Some((123, 456)));

    assert!(!reader.has_next());
    assert!(reader.read_message().unwrap().is_none());
}

#[test]
fn test_sensor_view_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test_sv_.osi");
    let original = sensor_view(789, 101);
    write_binary_trace(&path, &[original.clone()]);

    let mut reader = BinaryTraceReader::new();
    reader.open(&path).unwrap();
    assert!(reader.has_next());

    let result = reader.read_message().unwrap().unwrap();
    assert_eq!(result.kind, MessageKind::SensorView);
    assert_eq!(seconds_nanos(result.timestamp()), Some((789, 101)));
    assert_eq!(result.into_inner::<SensorView>(), Some(original));
    assert!(!reader.has_next());
}

#[test]
fn test_payload_is_byte_identical() {
    use prost::Message;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bytes_gt_.osi");
    let original = GroundTruth {
        country_code: 276,
        proj_string: "+proj=utm +zone=32".to_string(),
        ..ground_truth(5, 6)
    };
    write_binary_trace(&path, &[original.clone()]);

    let mut reader = BinaryTraceReader::new();
    reader.open(&path).unwrap();
    let result = reader.read_message().unwrap().unwrap();
    assert_eq!(result.message.encode_to_vec(), original.encode_to_vec());
}

#[test]
fn test_file_layout() {
    use prost::Message;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout_gt_.osi");
    let gt = ground_truth(1, 2);
    write_binary_trace(&path, &[gt.clone(), gt.clone()]);

    let payload = gt.encode_to_vec();
    let mut expected = Vec::new();
    for _ in 0..2 {
        expected.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        expected.extend_from_slice(&payload);
    }
    assert_eq!(std::fs::read(&path).unwrap(), expected);
}

#[test]
fn test_inference_failure_leaves_reader_closed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("random_name.osi");
    write_binary_trace(&path, &[ground_truth(1, 0)]);

    let mut reader = BinaryTraceReader::new();
    let err = reader.open(&path).unwrap_err();
    assert!(matches!(err, TraceError::UnknownMessageKind { .. }));
    assert!(err.is_open_error());
    assert_eq!(reader.message_kind(), MessageKind::Unknown);
    assert!(!reader.has_next());
    assert!(reader.read_message().unwrap().is_none());
}

#[test]
fn test_pinned_kind_overrides_inference() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("random_name.osi");
    write_binary_trace(&path, &[ground_truth(3, 4)]);

    let mut reader = BinaryTraceReader::new();
    reader.open_as(&path, MessageKind::GroundTruth).unwrap();
    let result = reader.read_message().unwrap().unwrap();
    assert_eq!(result.kind, MessageKind::GroundTruth);
    assert_eq!(seconds_nanos(result.timestamp()), Some((3, 4)));
}

#[test]
fn test_kind_inferred_from_directory_name() {
    let dir = tempfile::tempdir().unwrap();
    let run_dir = dir.path().join("drive_gt_");
    std::fs::create_dir(&run_dir).unwrap();
    let path = run_dir.join("trace.osi");
    write_binary_trace(&path, &[ground_truth(5, 6)]);

    let mut reader = BinaryTraceReader::new();
    reader.open(&path).unwrap();
    assert_eq!(reader.message_kind(), MessageKind::GroundTruth);
    let result = reader.read_message().unwrap().unwrap();
    assert_eq!(seconds_nanos(result.timestamp()), Some((5, 6)));
}

#[test]
fn test_every_kind_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    for (i, kind) in MessageKind::ALL.into_iter().enumerate() {
        let tag = kind.filename_tag().unwrap();
        let path = dir.path().join(format!("all{tag}.osi"));
        let original = sample_record(kind, i as i64 + 1);
        let mut writer = BinaryTraceWriter::new();
        writer.open(&path).unwrap();
        writer.write_message(&original, "").unwrap();
        writer.close().unwrap();

        let mut reader = BinaryTraceReader::new();
        reader.open(&path).unwrap();
        assert_eq!(reader.message_kind(), kind, "{kind}");
        let result = reader.read_message().unwrap().unwrap();
        assert_eq!(result.kind, kind);
        assert_eq!(result.message, original, "{kind}");
        assert!(reader.read_message().unwrap().is_none());
    }
}

#[test]
fn test_wrong_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace_gt_.bin");
    std::fs::write(&path, b"").unwrap();

    let mut reader = BinaryTraceReader::new();
    assert!(matches!(
        reader.open(&path),
        Err(TraceError::InvalidExtension { .. })
    ));

    let mut writer = BinaryTraceWriter::new();
    assert!(matches!(
        writer.open(&path),
        Err(TraceError::InvalidExtension { .. })
    ));
}

#[test]
fn test_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty_tu_.osi");
    std::fs::write(&path, b"").unwrap();

    let mut reader = BinaryTraceReader::new();
    reader.open(&path).unwrap();
    assert_eq!(reader.message_kind(), MessageKind::TrafficUpdate);
    assert!(!reader.has_next());
    assert!(reader.read_message().unwrap().is_none());
}

#[test]
fn test_zero_length_frame_is_default_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zero_tu_.osi");
    std::fs::write(&path, 0u32.to_le_bytes()).unwrap();

    let mut reader = BinaryTraceReader::new();
    reader.open(&path).unwrap();
    let result = reader.read_message().unwrap().unwrap();
    assert_eq!(
        result.into_inner::<TrafficUpdate>(),
        Some(TrafficUpdate::default())
    );
    assert!(!reader.has_next());
}

#[test]
fn test_short_payload_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short_gt_.osi");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(&10u32.to_le_bytes()).unwrap();
    file.write_all(&[0x0a, 0x00, 0x12]).unwrap();
    drop(file);

    let mut reader = BinaryTraceReader::new();
    reader.open(&path).unwrap();
    assert!(reader.has_next());
    assert!(matches!(
        reader.read_message(),
        Err(TraceError::Parse { .. })
    ));
}

#[test]
fn test_huge_declared_length_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge_gt_.osi");
    let mut bytes = 0xFFFF_FFFFu32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0u8; 16]);
    std::fs::write(&path, bytes).unwrap();

    let mut reader = BinaryTraceReader::new();
    reader.open(&path).unwrap();
    assert!(matches!(
        reader.read_message(),
        Err(TraceError::Parse { .. })
    ));
}

#[test]
fn test_truncated_length_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stray_gt_.osi");
    std::fs::write(&path, [0x01, 0x00]).unwrap();

    let mut reader = BinaryTraceReader::new();
    reader.open(&path).unwrap();
    assert!(reader.has_next());
    assert!(matches!(
        reader.read_message(),
        Err(TraceError::Parse { .. })
    ));
}

#[test]
fn test_corrupt_payload_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt_gt_.osi");
    let mut bytes = 2u32.to_le_bytes().to_vec();
    // Field 1, length-delimited, claims 5 bytes that are not there.
    bytes.extend_from_slice(&[0x0a, 0x05]);
    std::fs::write(&path, bytes).unwrap();

    let mut reader = BinaryTraceReader::new();
    reader.open(&path).unwrap();
    assert!(reader.read_message().is_err());
}

#[test]
fn test_write_before_open_fails() {
    let mut writer = BinaryTraceWriter::new();
    assert!(matches!(
        writer.write_message(&ground_truth(1, 1), ""),
        Err(TraceError::NotOpen { .. })
    ));
    assert_eq!(writer.messages_written(), 0);
}

#[test]
fn test_close_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("close_gt_.osi");

    let mut writer = BinaryTraceWriter::new();
    writer.open(&path).unwrap();
    writer.write_message(&ground_truth(1, 1), "").unwrap();
    writer.close().unwrap();
    writer.close().unwrap();
    assert!(!writer.is_open());
    assert_eq!(writer.messages_written(), 1);

    let mut reader = BinaryTraceReader::new();
    reader.open(&path).unwrap();
    reader.close();
    reader.close();
    assert!(!reader.has_next());
}

#[test]
fn test_drop_flushes_writer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drop_gt_.osi");
    {
        let mut writer = BinaryTraceWriter::new();
        writer.open(&path).unwrap();
        writer.write_message(&ground_truth(9, 9), "").unwrap();
    }

    let mut reader = BinaryTraceReader::new();
    reader.open(&path).unwrap();
    let result = reader.read_message().unwrap().unwrap();
    assert_eq!(seconds_nanos(result.timestamp()), Some((9, 9)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_records_keep_their_order(
        stamps in prop::collection::vec((0i64..1_000_000, 0u32..1_000_000_000), 0..20)
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prop_gt_.osi");
        let records: Vec<GroundTruth> = stamps
            .iter()
            .map(|&(s, n)| ground_truth(s, n))
            .collect();
        write_binary_trace(&path, &records);

        let mut reader = BinaryTraceReader::new();
        reader.open(&path).unwrap();
        let mut read = Vec::new();
        while reader.has_next() {
            let result = reader.read_message().unwrap().unwrap();
            read.push(result.into_inner::<GroundTruth>().unwrap());
        }
        prop_assert_eq!(read, records);
    }
}
