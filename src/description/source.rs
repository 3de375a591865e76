//! Retrieving an API description from a URL or a local file.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use super::ApiDescription;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to fetch description: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read description {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse description: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Malformed description: {0}")]
    Shape(String),
}

/// Where a description lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionSource {
    Url(Url),
    Path(PathBuf),
}

impl DescriptionSource {
    /// `http(s)://` references are URLs; anything else is a local path.
    pub fn from_reference(reference: &str) -> Self {
        let reference = reference.trim();
        match Url::parse(reference) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => Self::Path(path),
                Err(()) => Self::Path(PathBuf::from(reference)),
            },
            _ => Self::Path(PathBuf::from(reference)),
        }
    }

    async fn read(&self) -> Result<String, SourceError> {
        match self {
            Self::Url(url) => {
                let response = reqwest::get(url.clone()).await?.error_for_status()?;
                Ok(response.text().await?)
            }
            Self::Path(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| SourceError::Read {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

/// Fetch and parse the description behind `reference`.
pub async fn fetch_description(reference: &str) -> Result<ApiDescription, SourceError> {
    let source = DescriptionSource::from_reference(reference);
    tracing::info!(source = ?source, "Fetching API description");

    let text = source.read().await?;
    let description = ApiDescription::parse(&text)?;

    tracing::info!(
        routes = description.routes.len(),
        operations = description.operation_count(),
        "Parsed API description"
    );
    Ok(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_references() {
        assert!(matches!(
            DescriptionSource::from_reference("https://petstore.swagger.io/v2/swagger.yaml"),
            DescriptionSource::Url(_)
        ));
        assert_eq!(
            DescriptionSource::from_reference("./specs/api.yaml"),
            DescriptionSource::Path(PathBuf::from("./specs/api.yaml"))
        );
        assert_eq!(
            DescriptionSource::from_reference("/srv/api.yaml"),
            DescriptionSource::Path(PathBuf::from("/srv/api.yaml"))
        );
    }

    #[tokio::test]
    async fn fetch_reads_local_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("api.yaml");
        std::fs::write(&path, "paths:\n  /users:\n    get:\n      summary: list users\n")
            .expect("write description");

        let description = fetch_description(path.to_str().expect("utf-8 path"))
            .await
            .expect("fetch");
        assert_eq!(description.operation_count(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let err = fetch_description("/definitely/not/here.yaml").await.unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
    }
}
