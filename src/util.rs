/// Parse "true"/"false"/"1"/"0" style flags from a &str.
pub fn parse_bool_str(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// (chars, lines) for a text payload. Non-empty text counts at least one line.
pub fn content_stats(content: &str) -> (usize, usize) {
    (
        content.chars().count(),
        content
            .lines()
            .count()
            .max(usize::from(!content.is_empty())),
    )
}

/// Collapse a payload to a single line and truncate it to `max_chars`,
/// appending an ellipsis when anything was dropped. Truncation is by char,
/// never mid-codepoint.
pub fn single_line_snippet(text: &str, max_chars: usize) -> String {
    let flat: String = text
        .chars()
        .filter(|ch| *ch != '\r')
        .map(|ch| if ch == '\n' { '⏎' } else { ch })
        .collect();

    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut out: String = flat.chars().take(max_chars).collect();
    out.push('…');
    out
}

pub fn format_duration_ms(ms: u64) -> String {
    if ms < 1_000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", ms as f64 / 1_000.0)
    }
}

pub fn format_elapsed_seconds(secs: f64) -> String {
    if secs.fract().abs() < f64::EPSILON {
        format!("{secs:.0}s")
    } else {
        format!("{secs:.1}s")
    }
}
