//! Bounded tool-calling conversation with the backend.

use std::sync::Arc;

use serde_json::Value;

use crate::llm::{ChatCompletionRequest, ChatMessage, LlmClient, LlmError, ToolCall};
use crate::tools::{ToolError, ToolRegistry};

/// When a conversation stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundLimit {
    /// Always exactly this many backend calls, even if the model still
    /// wants tools afterwards.
    Fixed(usize),
    /// Stop after the first round without tool calls, or after `max` rounds.
    UntilIdle { max: usize },
}

impl RoundLimit {
    pub fn max_rounds(&self) -> usize {
        match *self {
            Self::Fixed(n) => n,
            Self::UntilIdle { max } => max,
        }
    }
}

impl Default for RoundLimit {
    fn default() -> Self {
        Self::Fixed(crate::config::DEFAULT_ROUNDS)
    }
}

/// Request parameters shared by every round.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub round_limit: RoundLimit,
}

/// What a finished conversation did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationOutcome {
    pub rounds: usize,
    /// Tool calls that ran successfully.
    pub invocations: usize,
    /// Tool calls that were skipped because they failed.
    pub failed_invocations: usize,
    /// Messages in the conversation when it ended.
    pub transcript_len: usize,
}

/// Drives one task's conversation.
pub struct ConversationLoop<'a> {
    llm: &'a dyn LlmClient,
    tools: &'a ToolRegistry,
    settings: &'a GenerationSettings,
}

impl<'a> ConversationLoop<'a> {
    pub fn new(
        llm: &'a dyn LlmClient,
        tools: &'a ToolRegistry,
        settings: &'a GenerationSettings,
    ) -> Self {
        Self {
            llm,
            tools,
            settings,
        }
    }

    /// Run the conversation seeded with `prompt` until the round limit.
    ///
    /// Tool failures are logged and skipped; only a failed backend call
    /// ends the conversation early.
    pub async fn run(&self, prompt: String) -> Result<ConversationOutcome, LlmError> {
        let mut messages = vec![ChatMessage::user(prompt)];
        let tool_schemas = self.tools.get_tool_schemas();
        let mut outcome = ConversationOutcome::default();

        for round in 0..self.settings.round_limit.max_rounds() {
            tracing::debug!(round = round + 1, messages = messages.len(), "Conversation round");

            let request = ChatCompletionRequest {
                model: self.settings.model.clone(),
                temperature: self.settings.temperature,
                messages: messages.clone(),
                tools: tool_schemas.clone(),
            };
            let response = self.llm.chat_completion(&request).await?;
            outcome.rounds += 1;
            tracing::debug!(
                round = round + 1,
                completion_id = response.id.as_deref().unwrap_or("-"),
                choices = response.choices.len(),
                "Backend answered"
            );

            let mut requested = 0usize;
            for choice in &response.choices {
                let calls = choice.requested_tool_calls();
                if calls.is_empty() {
                    tracing::debug!(
                        index = choice.index,
                        finish_reason = ?choice.finish_reason,
                        "Candidate requested no tools"
                    );
                    continue;
                }

                // In listed order, so each side effect is attributable.
                for call in calls {
                    requested += 1;
                    match self.execute_tool_call(call).await {
                        Ok(result) => {
                            outcome.invocations += 1;
                            if let Some(value) = result {
                                messages.push(ChatMessage::function(
                                    call.function.name.clone(),
                                    value.to_string(),
                                ));
                            }
                        }
                        Err(e) => {
                            outcome.failed_invocations += 1;
                            tracing::warn!(
                                tool = %call.function.name,
                                call_id = %call.id,
                                error = %e,
                                "Tool call failed; skipping its result"
                            );
                        }
                    }
                }
            }

            if requested == 0 && matches!(self.settings.round_limit, RoundLimit::UntilIdle { .. }) {
                tracing::debug!(round = round + 1, "No tool calls requested; conversation idle");
                break;
            }
        }

        outcome.transcript_len = messages.len();
        Ok(outcome)
    }

    /// Execute a single tool call.
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> Result<Option<Value>, ToolError> {
        tracing::info!(
            tool = %tool_call.function.name,
            args = %truncate_for_log(&tool_call.function.arguments, 200),
            "Calling tool"
        );
        self.tools
            .execute_encoded(&tool_call.function.name, &tool_call.function.arguments)
            .await
    }
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &s[..end])
}
