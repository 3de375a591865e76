//! Tools the model may invoke during a conversation.
//!
//! Every tool decodes its JSON arguments into a typed record that mirrors
//! its declared parameter schema, so the order in which the model lists
//! arguments never matters and unexpected fields are rejected.

mod language;
mod save_file;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;

use crate::artifact::{ArtifactWriter, PersistenceError};
use crate::language::{LanguageError, LanguageOracle};
use crate::llm::{FunctionSchema, ToolSchema};

pub use language::GetLanguageInfo;
pub use save_file::{SaveFileArgs, SaveFileToLocalDirectory};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Language(#[from] LanguageError),
}

/// A locally executed capability.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the single argument object.
    fn parameters_schema(&self) -> Value;

    /// Run the tool. `Ok(None)` means it succeeded without a value to
    /// report back to the model.
    async fn execute(&self, args: Value) -> Result<Option<Value>, ToolError>;
}

/// Name and description of a registered tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// Per-job table of tools, keyed by name.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with `saveFileToLocalDirectory` and `getLanguageInfo`.
    pub fn with_builtins(writer: ArtifactWriter, oracle: Arc<dyn LanguageOracle>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SaveFileToLocalDirectory::new(writer)));
        registry.register(Arc::new(GetLanguageInfo::new(oracle)));
        registry
    }

    /// Register a tool, replacing any tool previously registered under the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        tracing::debug!(tool = tool.name(), "Registered tool");
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.tools
            .values()
            .map(|t| ToolInfo {
                name: t.name().to_string(),
                description: t.description().to_string(),
            })
            .collect()
    }

    /// Declarations for the backend request, ordered by tool name.
    pub fn get_tool_schemas(&self) -> Vec<ToolSchema> {
        self.tools
            .values()
            .map(|t| ToolSchema {
                schema_type: "function".to_string(),
                function: FunctionSchema {
                    name: t.name().to_string(),
                    description: t.description().to_string(),
                    parameters: t.parameters_schema(),
                },
            })
            .collect()
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, args: Value) -> Result<Option<Value>, ToolError> {
        let tool = self
            .resolve(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.execute(args).await
    }

    /// Execute a tool whose arguments are still JSON-encoded, as they
    /// arrive from the backend. Blank argument strings count as `{}`.
    pub async fn execute_encoded(
        &self,
        name: &str,
        encoded_args: &str,
    ) -> Result<Option<Value>, ToolError> {
        let args = if encoded_args.trim().is_empty() {
            json!({})
        } else {
            serde_json::from_str(encoded_args).map_err(|e| ToolError::InvalidArguments {
                tool: name.to_string(),
                message: e.to_string(),
            })?
        };
        self.execute(name, args).await
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Decode a tool's argument object into its typed record.
pub(crate) fn decode_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}
