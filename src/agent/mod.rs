//! Agent module - turns generation tasks into files.
//!
//! Each task follows a short "tools in a loop" pattern:
//! 1. Render the task into a generation prompt
//! 2. Call the LLM with the registered tools
//! 3. Execute every tool call it asks for and feed the results back
//! 4. Repeat until the round limit is reached

mod conversation;
mod orchestrator;
mod prompt;

pub use conversation::{ConversationLoop, ConversationOutcome, GenerationSettings, RoundLimit};
pub use orchestrator::{JobSummary, Orchestrator};
pub use prompt::build_generation_prompt;
