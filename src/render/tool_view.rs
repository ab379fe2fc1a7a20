use serde_json::Value;

use super::theme::Theme;
use super::{frame, Accent};
use crate::types::TaskStatus;
use crate::util::{content_stats, single_line_snippet};

/// Closed dispatch table over tool identifiers. Anything unrecognized takes
/// the generic arm, so no tool name can ever crash the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Shell,
    ReadFile,
    WriteFile,
    EditFile,
    GlobSearch,
    GrepSearch,
    TaskList,
    Generic,
}

impl ToolKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Bash" => Self::Shell,
            "Read" => Self::ReadFile,
            "Write" => Self::WriteFile,
            "Edit" => Self::EditFile,
            "Glob" => Self::GlobSearch,
            "Grep" => Self::GrepSearch,
            "TodoWrite" => Self::TaskList,
            _ => Self::Generic,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ToolViewLimits {
    pub task_list_max_items: usize,
    pub edit_preview_max_chars: usize,
}

/// Render one tool invocation header (and its tool-specific detail lines).
pub fn render_invocation(
    name: &str,
    input: &Value,
    limits: ToolViewLimits,
    theme: &Theme,
) -> String {
    match ToolKind::from_name(name) {
        ToolKind::Shell => shell_view(input, theme),
        ToolKind::ReadFile => read_view(input, theme),
        ToolKind::WriteFile => write_view(input, theme),
        ToolKind::EditFile => edit_view(input, limits.edit_preview_max_chars, theme),
        ToolKind::GlobSearch => search_view("glob", input, theme),
        ToolKind::GrepSearch => search_view("grep", input, theme),
        ToolKind::TaskList => task_list_view(input, limits.task_list_max_items, theme),
        ToolKind::Generic => generic_view(name, input, theme),
    }
}

fn string_field<'a>(input: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| input.get(*key).and_then(Value::as_str))
}

fn path_field(input: &Value) -> &str {
    string_field(input, &["file_path", "path"]).unwrap_or("<missing>")
}

fn shell_view(input: &Value, theme: &Theme) -> String {
    let command = string_field(input, &["command"]).unwrap_or("<missing>");
    let description = string_field(input, &["description"]).unwrap_or("");

    let mut out = format!("{}\n", theme.green(&format!("$ {command}")));
    if !description.is_empty() {
        out.push_str(&format!("  {}\n", theme.dim(&format!("⎿ {description}"))));
    }
    out
}

fn read_view(input: &Value, theme: &Theme) -> String {
    let path = path_field(input);
    format!("{}\n", theme.cyan(&format!("→ read {path}")))
}

fn write_view(input: &Value, theme: &Theme) -> String {
    let path = path_field(input);
    let content = string_field(input, &["content"]).unwrap_or("");
    let (chars, lines) = content_stats(content);
    format!(
        "{}\n",
        theme.cyan(&format!("→ write {path} ({chars} chars, {lines} lines)"))
    )
}

fn edit_view(input: &Value, preview_max_chars: usize, theme: &Theme) -> String {
    let path = path_field(input);
    let old_str = string_field(input, &["old_string", "old_str"]).unwrap_or("");

    let mut out = format!("{}\n", theme.cyan(&format!("→ edit {path}")));
    if !old_str.is_empty() {
        let snippet = single_line_snippet(old_str, preview_max_chars);
        out.push_str(&format!("  {}\n", theme.dim(&format!("- {snippet}"))));
    }
    out
}

fn search_view(verb: &str, input: &Value, theme: &Theme) -> String {
    let pattern = string_field(input, &["pattern", "query"]).unwrap_or("<missing>");
    let line = match string_field(input, &["path"]) {
        Some(path) => format!("→ {verb} {pattern} in {path}"),
        None => format!("→ {verb} {pattern}"),
    };
    format!("{}\n", theme.cyan(&line))
}

fn task_list_view(input: &Value, max_items: usize, theme: &Theme) -> String {
    let empty = Vec::new();
    let todos = input
        .get("todos")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let mut out = format!("{}\n", theme.cyan(&format!("→ tasks ({})", todos.len())));
    for item in todos.iter().take(max_items) {
        let content = string_field(item, &["content", "subject"]).unwrap_or("<untitled>");
        let status = TaskStatus::from_wire(string_field(item, &["status"]).unwrap_or(""));
        let line = format!("  {} {content}", status_glyph(status));
        match status {
            TaskStatus::Completed => out.push_str(&format!("{}\n", theme.dim(&line))),
            _ => {
                out.push_str(&line);
                out.push('\n');
            }
        }
    }
    if todos.len() > max_items {
        out.push_str(&format!(
            "  {}\n",
            theme.dim(&format!("… (+{} more)", todos.len() - max_items))
        ));
    }
    out
}

fn status_glyph(status: TaskStatus) -> char {
    match status {
        TaskStatus::Pending => '☐',
        TaskStatus::InProgress => '◐',
        TaskStatus::Completed => '☑',
    }
}

fn generic_view(name: &str, input: &Value, theme: &Theme) -> String {
    let body = if input.as_object().map(|obj| obj.is_empty()).unwrap_or(false) {
        "(no arguments)".to_string()
    } else {
        serde_json::to_string_pretty(input).unwrap_or_else(|_| input.to_string())
    };
    let title = if name.is_empty() { "tool" } else { name };
    frame(title, &body, Accent::Neutral, theme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LIMITS: ToolViewLimits = ToolViewLimits {
        task_list_max_items: 3,
        edit_preview_max_chars: 10,
    };

    #[test]
    fn test_tool_kind_dispatch_table() {
        assert_eq!(ToolKind::from_name("Bash"), ToolKind::Shell);
        assert_eq!(ToolKind::from_name("TodoWrite"), ToolKind::TaskList);
        assert_eq!(ToolKind::from_name("mcp__browser__open"), ToolKind::Generic);
    }

    #[test]
    fn test_shell_view_includes_command_and_description() {
        let input = json!({"command": "ls -la", "description": "list files"});
        let rendered = render_invocation("Bash", &input, LIMITS, &Theme::plain());
        assert_eq!(rendered, "$ ls -la\n  ⎿ list files\n");
    }

    #[test]
    fn test_shell_view_without_description_is_one_line() {
        let input = json!({"command": "pwd"});
        let rendered = render_invocation("Bash", &input, LIMITS, &Theme::plain());
        assert_eq!(rendered, "$ pwd\n");
    }

    #[test]
    fn test_edit_view_truncates_replaced_text() {
        let input = json!({
            "file_path": "src/main.rs",
            "old_string": "let value = compute_everything();",
            "new_string": "let value = 1;"
        });
        let rendered = render_invocation("Edit", &input, LIMITS, &Theme::plain());
        assert_eq!(rendered, "→ edit src/main.rs\n  - let value …\n");
    }

    #[test]
    fn test_search_view_with_and_without_scope() {
        let scoped = json!({"pattern": "*.rs", "path": "src"});
        assert_eq!(
            render_invocation("Glob", &scoped, LIMITS, &Theme::plain()),
            "→ glob *.rs in src\n"
        );

        let bare = json!({"pattern": "fn main"});
        assert_eq!(
            render_invocation("Grep", &bare, LIMITS, &Theme::plain()),
            "→ grep fn main\n"
        );
    }

    #[test]
    fn test_task_list_view_glyphs_and_overflow() {
        let input = json!({"todos": [
            {"content": "one", "status": "pending"},
            {"content": "two", "status": "in_progress"},
            {"content": "three", "status": "completed"},
            {"content": "four", "status": "pending"},
        ]});
        let rendered = render_invocation("TodoWrite", &input, LIMITS, &Theme::plain());
        assert_eq!(
            rendered,
            "→ tasks (4)\n  ☐ one\n  ◐ two\n  ☑ three\n  … (+1 more)\n"
        );
    }

    #[test]
    fn test_generic_view_dumps_pretty_input() {
        let input = json!({"foo": "bar"});
        let rendered = render_invocation("Banana", &input, LIMITS, &Theme::plain());
        assert!(rendered.contains("Banana"));
        assert!(rendered.contains("\"foo\": \"bar\""));
    }

    #[test]
    fn test_generic_view_with_empty_input() {
        let input = json!({});
        let rendered = render_invocation("NoArgs", &input, LIMITS, &Theme::plain());
        assert!(rendered.contains("(no arguments)"));
    }
}
