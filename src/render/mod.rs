pub mod state;
pub mod theme;
pub mod tool_view;

use unicode_width::UnicodeWidthStr;

use crate::classify::classify;
use crate::config::Config;
use crate::types::{
    AssistantRecord, BlockDeltaRecord, BlockStartRecord, ContentBlock, ErrorRecord,
    IterationEndRecord, IterationStartRecord, ResultRecord, SystemRecord, ToolResultContent,
    TraceEvent, UserContent, UserRecord,
};
use crate::util::{content_stats, format_duration_ms, format_elapsed_seconds};
use state::{ClosedBlock, RenderState};
use theme::Theme;
use tool_view::ToolViewLimits;

const FRAME_MAX_INNER_WIDTH: usize = 76;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Accent {
    Neutral,
    Warn,
    Alert,
}

/// One-pass stream renderer: classify a line, update the block state, emit
/// styled text. Output for a line is a pure function of that line and the
/// current state, so two runs over the same input are byte-identical.
pub struct Renderer {
    state: RenderState,
    limits: RenderLimits,
    theme: Theme,
}

#[derive(Debug, Clone, Copy)]
struct RenderLimits {
    unknown_event_cap: usize,
    task_list_max_items: usize,
    edit_preview_max_chars: usize,
}

impl Renderer {
    pub fn new(config: &Config, theme: Theme) -> Self {
        Self {
            state: RenderState::new(),
            limits: RenderLimits {
                unknown_event_cap: config.unknown_event_cap,
                task_list_max_items: config.task_list_max_items,
                edit_preview_max_chars: config.edit_preview_max_chars,
            },
            theme,
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Classify and render one input line. Empty return means the line
    /// carried nothing worth showing — correct for lifecycle chatter.
    pub fn render_line(&mut self, line: &str) -> String {
        let event = classify(line);
        self.render_event(&event)
    }

    pub fn render_event(&mut self, event: &TraceEvent) -> String {
        match event {
            TraceEvent::System(record) => self.render_system(record),
            TraceEvent::Assistant(record) => self.render_assistant(record),
            TraceEvent::User(record) => self.render_user(record),
            TraceEvent::Wrapped { event } => match event {
                Some(inner) => self.render_event(inner),
                None => String::new(),
            },
            TraceEvent::ContentBlockStart(record) => self.render_block_start(record),
            TraceEvent::ContentBlockDelta(record) => self.render_delta(record),
            TraceEvent::ContentBlockStop => self.render_block_stop(),
            TraceEvent::MessageStart
            | TraceEvent::MessageDelta
            | TraceEvent::MessageStop
            | TraceEvent::Ping => String::new(),
            TraceEvent::Result(record) => self.render_result(record),
            TraceEvent::Error(record) => self.render_error(record),
            TraceEvent::IterationStart(record) => self.render_iteration_start(record),
            TraceEvent::IterationEnd(record) => self.render_iteration_end(record),
            TraceEvent::Unknown { raw } => self.render_unknown(raw),
        }
    }

    fn render_system(&self, record: &SystemRecord) -> String {
        if record.is_init() {
            let mut body = String::new();
            if !record.session_id.is_empty() {
                body.push_str(&format!("id: {}\n", record.session_id));
            }
            if !record.model.is_empty() {
                body.push_str(&format!("model: {}\n", record.model));
            }
            if !record.version.is_empty() {
                body.push_str(&format!("version: {}\n", record.version));
            }
            body.push_str(&format!("tools: {}\n", record.tools.len()));
            body.push_str(&format!("integrations: {}", record.mcp_servers.len()));
            return frame("session", &body, Accent::Neutral, &self.theme);
        }

        if record.subtype.is_empty() {
            return String::new();
        }
        format!(
            "{}\n",
            self.theme.dim(&format!("· system: {}", record.subtype))
        )
    }

    fn render_assistant(&self, record: &AssistantRecord) -> String {
        let mut out = String::new();
        for block in &record.message.content {
            match block {
                ContentBlock::Text { text } => out.push_str(&self.render_assistant_text(text)),
                ContentBlock::Thinking { thinking } => {
                    out.push_str(&self.render_assistant_thinking(thinking));
                }
                ContentBlock::ToolUse { name, input, .. } => {
                    out.push_str(&tool_view::render_invocation(
                        name,
                        input,
                        self.tool_view_limits(),
                        &self.theme,
                    ));
                }
                ContentBlock::ToolResult { .. } | ContentBlock::Other => {}
            }
        }
        out
    }

    fn render_assistant_text(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for line in text.lines() {
            out.push_str(&self.theme.cyan("┃ "));
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    fn render_assistant_thinking(&self, thinking: &str) -> String {
        if thinking.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for line in thinking.lines() {
            out.push_str(&format!("{}\n", self.theme.dim(&format!("┃ {line}"))));
        }
        out
    }

    fn render_user(&self, record: &UserRecord) -> String {
        let UserContent::Blocks(blocks) = &record.message.content else {
            // A plain-text user record carries no tool result to show.
            return String::new();
        };

        let mut out = String::new();
        for block in blocks {
            if let ContentBlock::ToolResult { content, is_error } = block {
                out.push_str(&self.render_tool_result(content, *is_error, record));
            }
        }
        out
    }

    fn render_tool_result(
        &self,
        content: &ToolResultContent,
        is_error: bool,
        record: &UserRecord,
    ) -> String {
        let text = content.flatten();
        if is_error {
            let body = if text.is_empty() {
                "tool failed".to_string()
            } else {
                text
            };
            return frame("error", &body, Accent::Alert, &self.theme);
        }

        // Prefer the structured process output over the generic content field.
        let stdout_field = record.stdout();
        let primary = if stdout_field.is_empty() {
            text.as_str()
        } else {
            stdout_field
        };

        let mut out = String::new();
        if primary.is_empty() {
            out.push_str(&format!("  {}\n", self.theme.dim("⎿ (no output)")));
        } else {
            let (_, lines) = content_stats(primary);
            out.push_str(&format!(
                "  {}\n",
                self.theme.dim(&format!("⎿ {}", count_label(lines, "line")))
            ));
            for line in primary.lines() {
                out.push_str(&format!("  {}\n", self.theme.dim(line)));
            }
        }

        let stderr_field = record.stderr();
        if !stderr_field.is_empty() {
            out.push_str(&frame("stderr", stderr_field, Accent::Warn, &self.theme));
        }
        out
    }

    fn render_block_start(&mut self, record: &BlockStartRecord) -> String {
        let block = &record.content_block;
        match block.kind.as_str() {
            "thinking" => {
                self.state.enter_thinking();
                format!("{}\n", self.theme.dim("✻ thinking…"))
            }
            "tool_use" => {
                let name = if block.name.is_empty() {
                    "tool"
                } else {
                    block.name.as_str()
                };
                self.state.enter_tool(name);
                format!("{}\n", self.theme.cyan(&format!("▶ {name}")))
            }
            // Plain text blocks stream without a header.
            _ => String::new(),
        }
    }

    fn render_delta(&self, record: &BlockDeltaRecord) -> String {
        let delta = &record.delta;
        let (fragment, partial_input) = match delta.kind.as_str() {
            "text_delta" => (delta.text.as_str(), false),
            "thinking_delta" => (delta.thinking.as_str(), false),
            "input_json_delta" => (delta.partial_json.as_str(), true),
            // Absent or unrecognized delta type: take whichever payload is set.
            _ => {
                if !delta.text.is_empty() {
                    (delta.text.as_str(), false)
                } else if !delta.thinking.is_empty() {
                    (delta.thinking.as_str(), false)
                } else {
                    (delta.partial_json.as_str(), !delta.partial_json.is_empty())
                }
            }
        };

        if fragment.is_empty() {
            return String::new();
        }
        // Fragments are emitted verbatim, in receipt order, with no inserted
        // separators; partial tool input is opaque and never re-parsed.
        if partial_input || self.state.in_thinking() {
            self.theme.dim(fragment)
        } else {
            fragment.to_string()
        }
    }

    fn render_block_stop(&mut self) -> String {
        match self.state.exit_block() {
            ClosedBlock::Thinking => format!("\n{}\n", self.theme.dim("✻ thinking done")),
            // Terminate the partial-input line left open by streamed deltas.
            ClosedBlock::Tool => "\n".to_string(),
            ClosedBlock::None => String::new(),
        }
    }

    fn render_result(&self, record: &ResultRecord) -> String {
        let mut body = String::new();
        if !record.result.is_empty() {
            body.push_str(&record.result);
        }

        let mut stats: Vec<String> = Vec::new();
        if let Some(cost) = record.total_cost_usd {
            stats.push(format!("cost: ${cost:.4}"));
        }
        if record.usage.input_tokens.is_some() || record.usage.output_tokens.is_some() {
            stats.push(format!(
                "tokens: {} in / {} out",
                record.usage.input_tokens.unwrap_or(0),
                record.usage.output_tokens.unwrap_or(0)
            ));
        }
        if let Some(ms) = record.duration_ms {
            stats.push(format!("duration: {}", format_duration_ms(ms)));
        }
        if !stats.is_empty() {
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(&stats.join("\n"));
        }

        let accent = if record.is_error {
            Accent::Alert
        } else {
            Accent::Neutral
        };
        frame("result", &body, accent, &self.theme)
    }

    fn render_error(&self, record: &ErrorRecord) -> String {
        let message = if record.message.is_empty() {
            "unknown error"
        } else {
            record.message.as_str()
        };
        frame("error", message, Accent::Alert, &self.theme)
    }

    fn render_iteration_start(&self, record: &IterationStartRecord) -> String {
        let iteration = iteration_label(record.iteration);
        let line = if record.timestamp.is_empty() {
            format!("── iteration {iteration} ──")
        } else {
            format!("── iteration {iteration} · {} ──", record.timestamp)
        };
        format!("{}\n", self.theme.cyan(&line))
    }

    fn render_iteration_end(&self, record: &IterationEndRecord) -> String {
        let iteration = iteration_label(record.iteration);
        let line = match record.elapsed_seconds {
            Some(secs) => format!(
                "── iteration {iteration} done · {} ──",
                format_elapsed_seconds(secs)
            ),
            None => format!("── iteration {iteration} done ──"),
        };
        format!("{}\n", self.theme.cyan(&line))
    }

    /// Bounded fallback for unrecognized lines. At or above the cap the
    /// payload is suppressed entirely; below it a `type`-tagged record is
    /// compacted, and anything else is echoed unchanged.
    fn render_unknown(&self, raw: &str) -> String {
        if raw.chars().count() >= self.limits.unknown_event_cap {
            return String::new();
        }

        if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) {
            if let Some(tag) = value.get("type").and_then(serde_json::Value::as_str) {
                let compact =
                    serde_json::to_string(&value).unwrap_or_else(|_| raw.to_string());
                return format!("{}\n", self.theme.dim(&format!("[event:{tag}] {compact}")));
            }
        }
        format!("{raw}\n")
    }

    fn tool_view_limits(&self) -> ToolViewLimits {
        ToolViewLimits {
            task_list_max_items: self.limits.task_list_max_items,
            edit_preview_max_chars: self.limits.edit_preview_max_chars,
        }
    }
}

fn iteration_label(iteration: Option<u64>) -> String {
    match iteration {
        Some(n) => n.to_string(),
        None => "?".to_string(),
    }
}

fn count_label(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Box-drawing frame used by the session summary, generic tool dumps, error
/// blocks, and the final result. Width follows the widest body line, bounded
/// so a long payload cannot produce an absurd border.
pub(crate) fn frame(title: &str, body: &str, accent: Accent, theme: &Theme) -> String {
    let title_width = UnicodeWidthStr::width(title);
    let mut inner = title_width;
    for line in body.lines() {
        inner = inner.max(UnicodeWidthStr::width(line));
    }
    let inner = inner.min(FRAME_MAX_INNER_WIDTH).max(title_width);

    let paint = |text: &str| match accent {
        Accent::Neutral => theme.dim(text),
        Accent::Warn => theme.yellow(text),
        Accent::Alert => theme.red(text),
    };

    let mut out = String::new();
    out.push_str(&paint(&format!(
        "┌─ {title} {}",
        "─".repeat(inner - title_width + 1)
    )));
    out.push('\n');
    for line in body.lines() {
        out.push_str(&paint("│ "));
        match accent {
            Accent::Warn | Accent::Alert => out.push_str(&paint(line)),
            Accent::Neutral => out.push_str(line),
        }
        out.push('\n');
    }
    out.push_str(&paint(&format!("└{}", "─".repeat(inner + 4))));
    out.push('\n');
    out
}
