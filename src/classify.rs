use crate::types::TraceEvent;

/// Classify one raw input line.
///
/// Pure: the same line always yields the same event, and no input shape is an
/// error. A line that does not decode as a `type`-tagged record — free text,
/// truncated JSON, an unrecognized discriminator, or a known discriminator
/// with an unusable payload — comes back as `TraceEvent::Unknown` carrying
/// the line verbatim.
pub fn classify(line: &str) -> TraceEvent {
    let line = line.trim_end_matches(['\r', '\n']);
    match serde_json::from_str::<TraceEvent>(line) {
        Ok(event) => event,
        Err(_) => TraceEvent::Unknown {
            raw: line.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_text_is_unknown() {
        match classify("checking out branch main") {
            TraceEvent::Unknown { raw } => assert_eq!(raw, "checking out branch main"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_trailing_newline_is_stripped_before_decoding() {
        let event = classify("{\"type\":\"ping\"}\n");
        assert!(matches!(event, TraceEvent::Ping));
    }

    #[test]
    fn test_unrecognized_discriminator_is_unknown() {
        let line = r#"{"type":"telemetry","value":1}"#;
        match classify(line) {
            TraceEvent::Unknown { raw } => assert_eq!(raw, line),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_missing_discriminator_is_unknown() {
        assert!(matches!(
            classify(r#"{"message":"no type field"}"#),
            TraceEvent::Unknown { .. }
        ));
    }
}
