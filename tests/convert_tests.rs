// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Integration tests for trace conversion.

mod common;

use osi_tracefile::convert::{convert, convert_with_progress, ConvertOptions, DEFAULT_TOPIC};
use osi_tracefile::io::{BinaryTraceReader, McapTraceReader, TextTraceReader};
use osi_tracefile::schema::osi3::GroundTruth;
use osi_tracefile::{MessageKind, TraceError, TraceFormat, TraceReader};

use common::{ground_truth, seconds_nanos, sensor_view, write_binary_trace};

#[test]
fn test_binary_to_mcap() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input_gt_.osi");
    let output = dir.path().join("out.mcap");
    write_binary_trace(&input, &[ground_truth(123, 456)]);

    let stats = convert(&input, &output, &ConvertOptions::default()).unwrap();
    assert_eq!(stats.kind, MessageKind::GroundTruth);
    assert_eq!(stats.messages, 1);
    assert_eq!(stats.input_format, TraceFormat::Osi);
    assert_eq!(stats.output_format, TraceFormat::Mcap);

    let mut reader = McapTraceReader::new();
    reader.open(&output).unwrap();
    let result = reader.read_message().unwrap().unwrap();
    assert_eq!(result.kind, MessageKind::GroundTruth);
    assert_eq!(result.channel.as_deref(), Some(DEFAULT_TOPIC));
    assert_eq!(result.channel.as_deref(), Some("ConvertedTrace"));
    assert_eq!(seconds_nanos(result.timestamp()), Some((123, 456)));
    assert!(!reader.has_next());
}

#[test]
fn test_pinned_kind_and_topic() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("recording.osi");
    let output = dir.path().join("recording.mcap");
    write_binary_trace(&input, &[sensor_view(1, 0), sensor_view(2, 0)]);

    let options = ConvertOptions::new()
        .with_input_kind(MessageKind::SensorView)
        .with_topic("/sensor_view");
    let stats = convert(&input, &output, &options).unwrap();
    assert_eq!(stats.messages, 2);

    let mut reader = McapTraceReader::new();
    reader.open(&output).unwrap();
    let mut seconds = Vec::new();
    while let Some(result) = reader.read_message().unwrap() {
        assert_eq!(result.kind, MessageKind::SensorView);
        assert_eq!(result.channel.as_deref(), Some("/sensor_view"));
        seconds.push(result.timestamp().unwrap().seconds);
    }
    assert_eq!(seconds, vec![1, 2]);
}

#[test]
fn test_uninferable_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("recording.osi");
    let output = dir.path().join("recording.mcap");
    write_binary_trace(&input, &[ground_truth(1, 0)]);

    let err = convert(&input, &output, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, TraceError::UnknownMessageKind { .. }));
    assert!(!output.exists());
}

#[test]
fn test_mcap_to_text_and_back_to_binary() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source_gt_.osi");
    let mcap = dir.path().join("middle.mcap");
    let txth = dir.path().join("middle_gt_.txth");
    let osi = dir.path().join("final_gt_.osi");
    let records = vec![ground_truth(10, 1), ground_truth(11, 2), ground_truth(12, 3)];
    write_binary_trace(&source, &records);

    convert(&source, &mcap, &ConvertOptions::default()).unwrap();
    let stats = convert(&mcap, &txth, &ConvertOptions::default()).unwrap();
    assert_eq!(stats.kind, MessageKind::GroundTruth);
    assert_eq!(stats.output_format, TraceFormat::Txth);

    let mut text_reader = TextTraceReader::new();
    text_reader.open(&txth).unwrap();
    let mut count = 0;
    while text_reader.read_message().unwrap().is_some() {
        count += 1;
    }
    assert_eq!(count, 3);

    convert(&txth, &osi, &ConvertOptions::default()).unwrap();
    let mut reader = BinaryTraceReader::new();
    reader.open(&osi).unwrap();
    let mut read = Vec::new();
    while let Some(result) = reader.read_message().unwrap() {
        read.push(result.into_inner::<GroundTruth>().unwrap());
    }
    assert_eq!(read, records);
}

#[test]
fn test_output_format_override() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input_gt_.osi");
    let output = dir.path().join("converted.bin");
    write_binary_trace(&input, &[ground_truth(7, 8)]);

    let options = ConvertOptions::new().with_output_format(TraceFormat::Mcap);
    convert(&input, &output, &options).unwrap();
    assert_eq!(TraceFormat::detect(&output), Some(TraceFormat::Mcap));
}

#[test]
fn test_progress_callback_sees_every_record() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input_gt_.osi");
    let output = dir.path().join("out.mcap");
    write_binary_trace(&input, &[ground_truth(1, 0), ground_truth(2, 0), ground_truth(3, 0)]);

    let mut stamps = Vec::new();
    convert_with_progress(&input, &output, &ConvertOptions::default(), |result| {
        stamps.push(seconds_nanos(result.timestamp()));
    })
    .unwrap();
    assert_eq!(stamps, vec![Some((1, 0)), Some((2, 0)), Some((3, 0))]);
}
