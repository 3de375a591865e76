//! API request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to run a generation job.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyzeRequest {
    /// URL or local path of the API description
    #[serde(rename = "swaggerURI")]
    pub swagger_uri: String,

    /// Free-form instruction, e.g. the desired language and framework
    #[serde(default)]
    pub query: String,
}

/// Acknowledgement returned once the whole job has been processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub status: String,

    pub finished_at: DateTime<Utc>,
}

impl AnalyzeResponse {
    pub fn done() -> Self {
        Self {
            status: "done".to_string(),
            finished_at: Utc::now(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
