use serde::Deserialize;
use serde_json::Value;

/// One classified input line. The wire discriminator is the `type` field;
/// every payload field is optional and defaults to a neutral value so that a
/// sparse record never fails classification.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    System(SystemRecord),
    Assistant(AssistantRecord),
    User(UserRecord),
    /// Fine-grained streaming records arrive either bare or wrapped in a
    /// `stream_event` envelope depending on the producer version.
    #[serde(rename = "stream_event")]
    Wrapped {
        #[serde(default)]
        event: Option<Box<TraceEvent>>,
    },
    ContentBlockStart(BlockStartRecord),
    ContentBlockDelta(BlockDeltaRecord),
    ContentBlockStop,
    // Message lifecycle markers carry nothing worth showing an operator.
    MessageStart,
    MessageDelta,
    MessageStop,
    Ping,
    Result(ResultRecord),
    Error(ErrorRecord),
    IterationStart(IterationStartRecord),
    IterationEnd(IterationEndRecord),
    /// Anything that is not a recognized structured record. Carries the raw
    /// line so the renderer can apply its size-bounded fallback.
    #[serde(skip)]
    Unknown { raw: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemRecord {
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub tools: Vec<Value>,
    #[serde(default)]
    pub mcp_servers: Vec<Value>,
}

impl SystemRecord {
    pub fn is_init(&self) -> bool {
        self.subtype == "init"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantRecord {
    #[serde(default)]
    pub message: AssistantMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    Thinking {
        #[serde(default)]
        thinking: String,
    },
    ToolUse {
        #[serde(default)]
        id: String,
        #[serde(default)]
        name: String,
        #[serde(default = "default_json_object")]
        input: Value,
    },
    ToolResult {
        #[serde(default)]
        content: ToolResultContent,
        #[serde(default)]
        is_error: bool,
    },
    #[serde(other)]
    Other,
}

fn default_json_object() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Tool result content is either a plain string or a list of text parts;
/// anything else is kept opaque rather than rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ToolResultContent {
    Text(String),
    Parts(Vec<ResultPart>),
    Opaque(Value),
}

impl Default for ToolResultContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl ToolResultContent {
    pub fn flatten(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .map(|part| part.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Opaque(value) => serde_json::to_string(value).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultPart {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub message: UserMessage,
    /// Structured per-tool payload (e.g. process stdout/stderr). Kept as a
    /// raw value because its shape varies per tool.
    #[serde(default, rename = "toolUseResult")]
    pub tool_use_result: Value,
}

impl UserRecord {
    pub fn stdout(&self) -> &str {
        self.tool_use_result
            .get("stdout")
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn stderr(&self) -> &str {
        self.tool_use_result
            .get("stderr")
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMessage {
    #[serde(default)]
    pub content: UserContent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl Default for UserContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockStartRecord {
    #[serde(default)]
    pub content_block: BlockDescriptor,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockDescriptor {
    /// `text`, `thinking`, or `tool_use`.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockDeltaRecord {
    #[serde(default)]
    pub delta: DeltaPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeltaPayload {
    /// `text_delta`, `thinking_delta`, or `input_json_delta`.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub thinking: String,
    #[serde(default)]
    pub partial_json: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultRecord {
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub total_cost_usd: Option<f64>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub usage: Usage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: Option<u64>,
    #[serde(default)]
    pub output_tokens: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorRecord {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IterationStartRecord {
    #[serde(default)]
    pub iteration: Option<u64>,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IterationEndRecord {
    #[serde(default)]
    pub iteration: Option<u64>,
    #[serde(default)]
    pub elapsed_seconds: Option<f64>,
}

/// Task list item state as reported by the task tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Unknown status strings map to `Pending` so a new status value never
    /// breaks the task list view.
    pub fn from_wire(status: &str) -> Self {
        match status {
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            _ => Self::Pending,
        }
    }
}
