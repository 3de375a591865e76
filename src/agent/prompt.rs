//! Generation prompt template.

use serde_json::Value;

use crate::description::GenerationTask;

/// Render the request text for one generation task.
pub fn build_generation_prompt(task: &GenerationTask, user_instruction: &str) -> String {
    let fence = "```";

    format!(
        r#"Use getLanguageInfo and Generate {user_instruction} code for {component} to handle '{model}' {operation}. Description: {description}. Model definition: {definition}.

Please fix any errors in the code above.
You will output the content of each new or changed file.
Represent files like so:
FILENAME
{fence}
CODE
{fence}
Example representation of a file:
src/hello_world.ts
{fence}
print("Hello World")
{fence}
Use tools Get Response as Output as saveFileToLocalDirectory({{FILENAME}},{{CODE}})
Do not comment on what every file does. Please note that the code should be fully functional. No placeholders."#,
        user_instruction = user_instruction.trim(),
        component = task.component_name,
        model = task.model_name.as_deref().unwrap_or("undefined"),
        operation = task.operation,
        description = task.description,
        definition = render_definition(&task.definition),
        fence = fence,
    )
}

fn render_definition(definition: &Value) -> String {
    if definition.is_null() {
        return "No model definitions provided".to_string();
    }
    serde_json::to_string_pretty(definition).unwrap_or_else(|_| definition.to_string())
}
