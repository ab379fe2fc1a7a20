use std::fs::OpenOptions;
use std::io::{IsTerminal, Write};

use crate::util::parse_bool_str;

const DEFAULT_EVENT_LOG_PATH: &str = "/tmp/tracelens-events.log";
const DEBUG_EVENTS_ENV: &str = "TRACELENS_DEBUG_EVENTS";
const EVENT_LOG_PATH_ENV: &str = "TRACELENS_EVENT_LOG_PATH";

/// Diagnostics are opt-in and live entirely off the rendering path: nothing
/// here ever changes what the operator sees on stdout.
pub fn debug_events_enabled() -> bool {
    std::env::var(DEBUG_EVENTS_ENV)
        .ok()
        .and_then(|v| parse_bool_str(&v))
        .unwrap_or(false)
}

/// Record a line that classified as unknown, for protocol-drift triage.
pub fn emit_unrecognized_line(line: &str) {
    let message = format!(
        "TRACELENS DEBUG unrecognized_line chars={}\n{line}\n",
        line.chars().count()
    );
    emit_log_message(&message);
}

fn emit_log_message(message: &str) {
    if let Some(path) = resolve_log_path() {
        if append_log_file(&path, message).is_ok() {
            return;
        }
    }

    eprintln!("{message}");
}

fn resolve_log_path() -> Option<String> {
    std::env::var(EVENT_LOG_PATH_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            if std::io::stderr().is_terminal() {
                Some(DEFAULT_EVENT_LOG_PATH.to_string())
            } else {
                None
            }
        })
}

fn append_log_file(path: &str, message: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(message.as_bytes())
}
