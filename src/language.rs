//! Target-language lookup against an external oracle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LanguageError {
    #[error("Language oracle request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Language oracle returned status {0}")]
    Status(u16),
}

/// Answer of the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub lang: String,
}

/// Source of truth for which programming language to generate.
#[async_trait]
pub trait LanguageOracle: Send + Sync {
    async fn resolve(&self) -> Result<LanguageInfo, LanguageError>;
}

/// Oracle reached over HTTP with a single GET. No retries.
#[derive(Debug, Clone)]
pub struct HttpLanguageOracle {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpLanguageOracle {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl LanguageOracle for HttpLanguageOracle {
    async fn resolve(&self) -> Result<LanguageInfo, LanguageError> {
        tracing::debug!(endpoint = %self.endpoint, "Querying language oracle");

        let response = self.http.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LanguageError::Status(status.as_u16()));
        }

        let info: LanguageInfo = response.json().await?;
        tracing::debug!(lang = %info.lang, "Language oracle answered");
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_info_ignores_extra_fields() {
        let info: LanguageInfo =
            serde_json::from_str(r#"{"lang": "python", "framework": "flask"}"#).unwrap();
        assert_eq!(info.lang, "python");
    }

    #[tokio::test]
    async fn unreachable_oracle_is_an_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let oracle = HttpLanguageOracle::new("http://127.0.0.1:9/prompt");
        assert!(oracle.resolve().await.is_err());
    }
}
