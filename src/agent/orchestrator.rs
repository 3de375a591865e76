//! Runs every generation task of a job, one after another.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use super::conversation::{ConversationLoop, GenerationSettings};
use super::prompt::build_generation_prompt;
use crate::artifact::ArtifactWriter;
use crate::config::Config;
use crate::description::{walk, ApiDescription};
use crate::language::HttpLanguageOracle;
use crate::llm::{LlmClient, OpenAiClient};
use crate::tools::ToolRegistry;

/// Totals for a finished job. Only used for logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSummary {
    pub job_id: Uuid,
    pub tasks: usize,
    /// Tasks whose conversation ended on a backend error.
    pub failed_tasks: usize,
    pub invocations: usize,
    pub failed_invocations: usize,
}

/// Owns everything one job needs: the backend, its own tool registry, and
/// the request settings.
pub struct Orchestrator {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    settings: GenerationSettings,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn LlmClient>, tools: ToolRegistry, settings: GenerationSettings) -> Self {
        Self {
            llm,
            tools,
            settings,
        }
    }

    /// Build an orchestrator with a fresh registry wired to the configured
    /// output directory and language oracle.
    pub fn from_config(config: &Config) -> Self {
        let llm = Arc::new(OpenAiClient::with_base_url(
            config.api_key.clone(),
            config.llm_base_url.clone(),
        ));
        let tools = ToolRegistry::with_builtins(
            ArtifactWriter::new(config.output_dir.clone()),
            Arc::new(HttpLanguageOracle::new(config.language_oracle_url.clone())),
        );
        let settings = GenerationSettings {
            model: config.default_model.clone(),
            temperature: config.temperature,
            round_limit: config.round_limit,
        };
        Self::new(llm, tools, settings)
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Generate code for every operation in `description`.
    ///
    /// Tasks run strictly in sequence. A task whose backend call fails is
    /// logged and counted; the remaining tasks still run.
    pub async fn run(&self, description: &ApiDescription, instruction: &str) -> JobSummary {
        let mut summary = JobSummary {
            job_id: Uuid::new_v4(),
            ..JobSummary::default()
        };
        let span = tracing::info_span!("job", id = %summary.job_id);

        async {
            tracing::info!(
                operations = description.operation_count(),
                instruction = %instruction,
                "Starting generation job"
            );

            for task in walk(description) {
                let task = task.with_language_hint(instruction);
                summary.tasks += 1;

                let prompt = build_generation_prompt(&task, instruction);
                let conversation =
                    ConversationLoop::new(self.llm.as_ref(), &self.tools, &self.settings);

                match conversation
                    .run(prompt)
                    .instrument(tracing::info_span!("task", component = %task.component_name))
                    .await
                {
                    Ok(outcome) => {
                        tracing::info!(
                            component = %task.component_name,
                            rounds = outcome.rounds,
                            invocations = outcome.invocations,
                            failed_invocations = outcome.failed_invocations,
                            "Task finished"
                        );
                        summary.invocations += outcome.invocations;
                        summary.failed_invocations += outcome.failed_invocations;
                    }
                    Err(e) => {
                        summary.failed_tasks += 1;
                        tracing::error!(
                            component = %task.component_name,
                            error = %e,
                            "Backend call failed; moving on to the next task"
                        );
                    }
                }
            }

            tracing::info!(
                tasks = summary.tasks,
                failed_tasks = summary.failed_tasks,
                invocations = summary.invocations,
                "Generation job complete"
            );
        }
        .instrument(span)
        .await;

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::agent::conversation::tests::{text_answer, tool_calls, FixedLanguage, ScriptedLlm};
    use crate::agent::RoundLimit;
    use crate::llm::Role;

    fn orchestrator(llm: Arc<ScriptedLlm>, root: &std::path::Path) -> Orchestrator {
        Orchestrator::new(
            llm,
            ToolRegistry::with_builtins(ArtifactWriter::new(root), Arc::new(FixedLanguage)),
            GenerationSettings {
                model: "gpt-3.5-turbo".to_string(),
                temperature: 0.2,
                round_limit: RoundLimit::Fixed(2),
            },
        )
    }

    #[tokio::test]
    async fn users_get_runs_one_conversation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let description = ApiDescription::parse(
            r#"{"paths": {"/users": {"get": {"summary": "list users"}}}, "definitions": {"User": {"type": "object"}}}"#,
        )
        .expect("parse");
        let llm = Arc::new(ScriptedLlm::new(vec![
            tool_calls(&[(
                "saveFileToLocalDirectory",
                json!({"code": "def list_users(): return []", "fileName": "users/get.py"}),
            )]),
            text_answer("done"),
        ]));

        let summary = orchestrator(llm.clone(), dir.path())
            .run(&description, "python")
            .await;

        assert_eq!(summary.tasks, 1);
        assert_eq!(summary.failed_tasks, 0);
        assert_eq!(summary.invocations, 1);
        assert_eq!(llm.request_count(), 2);

        let requests = llm.requests.lock().unwrap();
        let prompt = requests[0].messages[0].content.as_deref().expect("prompt");
        assert_eq!(requests[0].messages[0].role, Role::User);
        assert!(prompt.contains("Generate python code for USERSGET to handle 'USERS' GET"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("users/get.py")).expect("artifact"),
            "def list_users(): return []"
        );
    }

    #[tokio::test]
    async fn backend_failure_is_isolated_to_its_task() {
        let dir = tempfile::tempdir().expect("tempdir");
        let description = ApiDescription::parse(
            "paths:\n  /users:\n    get: {}\n  /orders:\n    post: {}\n",
        )
        .expect("parse");
        let llm = Arc::new(ScriptedLlm::new(vec![
            json!({"error": "rate limited"}),
            text_answer("ok"),
        ]));

        let summary = orchestrator(llm.clone(), dir.path())
            .run(&description, "go")
            .await;

        assert_eq!(summary.tasks, 2);
        assert_eq!(summary.failed_tasks, 1);
        // One call for the failed task, two for the second.
        assert_eq!(llm.request_count(), 3);

        let requests = llm.requests.lock().unwrap();
        let second_prompt = requests[1].messages[0].content.as_deref().expect("prompt");
        assert!(second_prompt.contains("ORDERSPOST"));
    }

    #[tokio::test]
    async fn each_task_gets_a_fresh_conversation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let description =
            ApiDescription::parse("paths:\n  /a:\n    get: {}\n    put: {}\n").expect("parse");
        let llm = Arc::new(ScriptedLlm::new(vec![tool_calls(&[(
            "getLanguageInfo",
            json!({}),
        )])]));

        orchestrator(llm.clone(), dir.path())
            .run(&description, "rust")
            .await;

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[1].messages.len(), 2);
        assert_eq!(requests[2].messages.len(), 1);
        assert!(requests[2].messages[0]
            .content
            .as_deref()
            .expect("prompt")
            .contains("APUT"));
    }

    #[test]
    fn from_config_registers_builtins() {
        let config = Config::new("key".to_string(), std::path::PathBuf::from("/tmp/out"));
        let orchestrator = Orchestrator::from_config(&config);
        let names: Vec<_> = orchestrator
            .tools()
            .list_tools()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["getLanguageInfo", "saveFileToLocalDirectory"]);
    }
}
