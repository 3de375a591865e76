//! `getLanguageInfo`: ask the oracle which language to generate.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode_args, Tool, ToolError};
use crate::language::LanguageOracle;

pub const NAME: &str = "getLanguageInfo";

/// Takes no arguments.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArgs {}

pub struct GetLanguageInfo {
    oracle: Arc<dyn LanguageOracle>,
}

impl GetLanguageInfo {
    pub fn new(oracle: Arc<dyn LanguageOracle>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl Tool for GetLanguageInfo {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "External call with response given language info"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, args: Value) -> Result<Option<Value>, ToolError> {
        let args = if args.is_null() { json!({}) } else { args };
        decode_args::<NoArgs>(NAME, args)?;

        let info = self.oracle.resolve().await?;
        Ok(Some(json!({ "lang": info.lang })))
    }
}
