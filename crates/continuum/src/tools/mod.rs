//! Tool-call layer
//!
//! Describes the tools an assistant can call against a profile and dispatches
//! parsed calls to the profile. No transport is attached here: a caller that
//! speaks some RPC protocol hands in a tool name plus JSON arguments and sends
//! back the [`ToolOutput`].

pub mod handlers;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ContinuumError, Result};
use crate::memory::{Category, MemoryQuery};

pub use handlers::ToolHandler;

/// Name, description and JSON input schema of one tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

fn no_arguments() -> Value {
    json!({ "type": "object", "properties": {}, "required": [] })
}

/// All tools, in the order they should be advertised
pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: "get_context",
            description: "Get the user's full context including identity, voice, current context, and recent memories. Use this at the start of a conversation to understand who you're talking to.",
            input_schema: no_arguments(),
        },
        ToolDescriptor {
            name: "get_identity",
            description: "Get the user's identity information (name, role, background, values).",
            input_schema: no_arguments(),
        },
        ToolDescriptor {
            name: "get_voice",
            description: "Get the user's voice and communication style guide. Use this when writing content as or for the user.",
            input_schema: no_arguments(),
        },
        ToolDescriptor {
            name: "get_current_context",
            description: "Get the user's current working context (active projects, focus areas, this week's priorities).",
            input_schema: no_arguments(),
        },
        ToolDescriptor {
            name: "get_memories",
            description: "Get the user's memories (facts, decisions, lessons, preferences). Optionally filter by category or search term.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "description": "Filter by category: fact, decision, lesson, preference",
                        "enum": ["fact", "decision", "lesson", "preference"]
                    },
                    "search": {
                        "type": "string",
                        "description": "Search term to filter memories"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of memories to return (default: 20)",
                        "default": 20
                    }
                },
                "required": []
            }),
        },
        ToolDescriptor {
            name: "remember",
            description: "Save a new memory for the user. Use this to remember important facts, decisions, lessons learned, or preferences discovered during conversation.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "The memory to save"
                    },
                    "category": {
                        "type": "string",
                        "description": "Memory category",
                        "enum": ["fact", "decision", "lesson", "preference"],
                        "default": "fact"
                    },
                    "project": {
                        "type": "boolean",
                        "description": "Save to project memory instead of global (default: false)",
                        "default": false
                    }
                },
                "required": ["text"]
            }),
        },
        ToolDescriptor {
            name: "get_status",
            description: "Get Continuum status including file ages, memory count, and current focus.",
            input_schema: no_arguments(),
        },
    ]
}

fn default_category() -> Category {
    Category::Fact
}

/// Arguments of the `remember` tool
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RememberArgs {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_category")]
    pub category: Category,
    /// Falls back to global memory when there is no project
    #[serde(default)]
    pub project: bool,
}

/// A parsed tool invocation
#[derive(Debug, Clone)]
pub enum ToolCall {
    GetContext,
    GetIdentity,
    GetVoice,
    GetCurrentContext,
    GetMemories(MemoryQuery),
    Remember(RememberArgs),
    GetStatus,
}

impl ToolCall {
    /// Parse a tool name and its JSON arguments.
    ///
    /// `null` arguments are treated as an empty object. Tools without
    /// parameters ignore whatever they are given.
    pub fn parse(name: &str, arguments: Value) -> Result<Self> {
        let arguments = match arguments {
            Value::Null => json!({}),
            other => other,
        };
        let invalid =
            |e: serde_json::Error| ContinuumError::Tool(format!("Invalid arguments for {name}: {e}"));

        Ok(match name {
            "get_context" => ToolCall::GetContext,
            "get_identity" => ToolCall::GetIdentity,
            "get_voice" => ToolCall::GetVoice,
            "get_current_context" => ToolCall::GetCurrentContext,
            "get_memories" => ToolCall::GetMemories(serde_json::from_value(arguments).map_err(invalid)?),
            "remember" => ToolCall::Remember(serde_json::from_value(arguments).map_err(invalid)?),
            "get_status" => ToolCall::GetStatus,
            other => return Err(ContinuumError::UnknownTool(other.to_string())),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::GetContext => "get_context",
            ToolCall::GetIdentity => "get_identity",
            ToolCall::GetVoice => "get_voice",
            ToolCall::GetCurrentContext => "get_current_context",
            ToolCall::GetMemories(_) => "get_memories",
            ToolCall::Remember(_) => "remember",
            ToolCall::GetStatus => "get_status",
        }
    }
}

/// Text result of a tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    pub text: String,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}
