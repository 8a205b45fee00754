//! Messages exchanged with the model during one answer.

/// Who a message comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    /// Lower-case role name as chat APIs spell it.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One piece of a message body.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    ToolCall(AgentToolCall),
    ToolResult(AgentToolResult),
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// What a tool returned for one [`AgentToolCall`].
#[derive(Debug, Clone, PartialEq)]
pub struct AgentToolResult {
    pub tool_call_id: String,
    pub result: serde_json::Value,
    pub is_error: bool,
}

/// A role plus its content parts.
///
/// Persona, remembered turns and the new question are plain text; the tool
/// loop adds assistant tool calls and tool results while an answer is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl ModelMessage {
    pub fn new(role: Role, content: Vec<ContentPart>) -> Self {
        Self { role, content }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, vec![ContentPart::Text(text.into())])
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentPart::Text(text.into())])
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![ContentPart::Text(text.into())])
    }

    /// Assistant turn that asks for tools; empty `text` is omitted.
    pub fn assistant_tool_calls(text: &str, calls: &[AgentToolCall]) -> Self {
        let text = (!text.is_empty()).then(|| ContentPart::Text(text.to_string()));
        let content = text
            .into_iter()
            .chain(calls.iter().cloned().map(ContentPart::ToolCall))
            .collect();
        Self::new(Role::Assistant, content)
    }

    pub fn tool_result(result: AgentToolResult) -> Self {
        Self::new(Role::Tool, vec![ContentPart::ToolResult(result)])
    }

    /// All text parts joined together.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn tool_calls(&self) -> impl Iterator<Item = &AgentToolCall> {
        self.content.iter().filter_map(|part| match part {
            ContentPart::ToolCall(call) => Some(call),
            _ => None,
        })
    }

    pub fn tool_results(&self) -> impl Iterator<Item = &AgentToolResult> {
        self.content.iter().filter_map(|part| match part {
            ContentPart::ToolResult(result) => Some(result),
            _ => None,
        })
    }
}
