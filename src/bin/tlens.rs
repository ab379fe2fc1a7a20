use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use tracelens::classify::classify;
use tracelens::config::Config;
use tracelens::logging;
use tracelens::render::theme::Theme;
use tracelens::render::Renderer;
use tracelens::types::TraceEvent;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let theme = Theme::from_mode(config.color);
    let mut renderer = Renderer::new(&config, theme);
    let debug_events = logging::debug_events_enabled();

    let mut reader = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).await?;
        if read == 0 {
            break;
        }

        // Invalid UTF-8 must never abort the pipeline.
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\r', '\n']);

        let event = classify(line);
        if debug_events && matches!(event, TraceEvent::Unknown { .. }) {
            logging::emit_unrecognized_line(line);
        }

        // Each line's output is fully written and flushed before the next
        // read, so output order is exactly input order.
        let rendered = renderer.render_event(&event);
        if !rendered.is_empty() {
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
