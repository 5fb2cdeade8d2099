//! Fit file dumping
//!
//! Renders each stored message as one JSON object per line:
//!
//! ```text
//! {"topic":"SAMPLE","features":[{"name":"lp__","double_list":[-6.2]}]}
//! ```
//!
//! Byte strings are shown as UTF-8 text, lossily. Unnamed features have no
//! `name` key.

use crate::error::{CollectorError, CollectorResult};
use serde_json::{json, Map, Value};
use std::io::Write;
use std::path::Path;
use types::{Feature, FeatureKind, Topic, WriterMessage};

/// JSON rendering of one message
pub fn render_message(message: &WriterMessage) -> Value {
    let topic = match Topic::try_from(message.topic) {
        Ok(topic) => Value::from(topic.as_str_name()),
        Err(_) => Value::from(message.topic),
    };

    json!({
        "topic": topic,
        "features": message.features().iter().map(render_feature).collect::<Vec<_>>(),
    })
}

fn render_feature(feature: &Feature) -> Value {
    let mut object = Map::new();
    if let Some(name) = feature.name() {
        object.insert("name".into(), Value::from(name));
    }

    match &feature.kind {
        Some(FeatureKind::DoubleList(list)) => {
            object.insert("double_list".into(), json!(list.value));
        }
        Some(FeatureKind::BytesList(list)) => {
            let strings = list
                .value
                .iter()
                .map(|bytes| Value::from(String::from_utf8_lossy(bytes).into_owned()))
                .collect();
            object.insert("bytes_list".into(), Value::Array(strings));
        }
        None => {}
    }

    Value::Object(object)
}

/// Write every message of a frame stream as JSON lines; returns the count
pub fn dump_frames<W: Write>(data: &[u8], out: &mut W) -> CollectorResult<usize> {
    let messages = codec::decode_frames(data)?;
    for message in &messages {
        serde_json::to_writer(&mut *out, &render_message(message))?;
        out.write_all(b"\n")
            .map_err(|e| CollectorError::output("Failed to write dump", Path::new("<stdout>"), e))?;
    }
    Ok(messages.len())
}

/// Dump a fit file as JSON lines
pub fn dump_file<W: Write>(path: &Path, out: &mut W) -> CollectorResult<usize> {
    let data = std::fs::read(path).map_err(|e| CollectorError::output("Failed to read fit file", path, e))?;
    dump_frames(&data, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_sample_message() {
        let message = WriterMessage::new(
            Topic::Sample,
            vec![
                Feature::doubles("lp__", vec![-3.167e-06]),
                Feature::doubles("accept_stat__", vec![0.999965]),
            ],
        );

        assert_eq!(
            render_message(&message),
            json!({
                "topic": "SAMPLE",
                "features": [
                    {"name": "lp__", "double_list": [-3.167e-06]},
                    {"name": "accept_stat__", "double_list": [0.999965]},
                ]
            })
        );
    }

    #[test]
    fn test_render_unnamed_bytes() {
        let message = WriterMessage::new(
            Topic::Diagnostic,
            vec![Feature::unnamed_bytes(vec![b"Adaptation terminated".to_vec(), vec![0xFF]])],
        );

        assert_eq!(
            render_message(&message),
            json!({
                "topic": "DIAGNOSTIC",
                "features": [{"bytes_list": ["Adaptation terminated", "\u{FFFD}"]}]
            })
        );
    }

    #[test]
    fn test_render_unknown_topic() {
        let message = WriterMessage {
            topic: 9,
            feature: vec![],
        };
        assert_eq!(render_message(&message), json!({"topic": 9, "features": []}));
    }

    #[test]
    fn test_dump_frames_one_line_per_message() {
        let mut data = Vec::new();
        for message in [
            WriterMessage::new(Topic::Initialization, vec![Feature::unnamed_doubles(vec![0.5])]),
            WriterMessage::new(Topic::Sample, vec![Feature::doubles("mu", vec![1.25])]),
        ] {
            data.extend_from_slice(&codec::encode_frame(&message).unwrap());
        }

        let mut out = Vec::new();
        assert_eq!(dump_frames(&data, &mut out).unwrap(), 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(
            lines,
            vec![
                json!({"topic": "INITIALIZATION", "features": [{"double_list": [0.5]}]}),
                json!({"topic": "SAMPLE", "features": [{"name": "mu", "double_list": [1.25]}]}),
            ]
        );
    }

    #[test]
    fn test_dump_truncated_file_fails() {
        let frame = codec::encode_frame(&WriterMessage::new(Topic::Sample, vec![])).unwrap();
        let mut data = frame.to_vec();
        data.extend_from_slice(&[0x05, 0x01]);

        let err = dump_frames(&data, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CollectorError::Codec(_)));
    }
}
