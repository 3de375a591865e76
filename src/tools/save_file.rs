//! `saveFileToLocalDirectory`: persist a generated file.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode_args, Tool, ToolError};
use crate::artifact::{Artifact, ArtifactWriter};

pub const NAME: &str = "saveFileToLocalDirectory";

/// Arguments, field-for-field with the declared schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SaveFileArgs {
    pub code: String,
    pub file_name: String,
}

impl From<SaveFileArgs> for Artifact {
    fn from(args: SaveFileArgs) -> Self {
        Artifact {
            relative_path: args.file_name,
            content: args.code,
        }
    }
}

/// Writes the model's code to a file under the output root.
pub struct SaveFileToLocalDirectory {
    writer: ArtifactWriter,
}

impl SaveFileToLocalDirectory {
    pub fn new(writer: ArtifactWriter) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl Tool for SaveFileToLocalDirectory {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Get Response as Output and Save in File"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "code": { "type": "string" },
                "fileName": { "type": "string" }
            },
            "required": ["code", "fileName"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Option<Value>, ToolError> {
        let artifact: Artifact = decode_args::<SaveFileArgs>(NAME, args)?.into();
        tracing::info!(file = %artifact.relative_path, "Saving generated code");

        self.writer.write_artifact(&artifact).await?;
        Ok(None)
    }
}
