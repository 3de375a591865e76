//! API descriptions: fetching, parsing, and deriving generation tasks.

mod source;
mod walker;

use serde::Deserialize;
use serde_json::Value;

pub use source::{fetch_description, DescriptionSource, SourceError};
pub use walker::{walk, GenerationTask, NO_DESCRIPTION};

/// A parsed API description. Routes and methods keep document order.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiDescription {
    pub routes: Vec<Route>,
    /// Shared schema mapping (`definitions`), `Null` when absent.
    pub definitions: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: String,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub method: String,
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDescription {
    paths: serde_yaml::Mapping,
    #[serde(default)]
    definitions: serde_yaml::Value,
}

impl ApiDescription {
    /// Parse a YAML (or JSON) document shaped `{paths: {route: {method: ...}}, definitions: {...}}`.
    pub fn parse(text: &str) -> Result<Self, SourceError> {
        let raw: RawDescription = serde_yaml::from_str(text)?;

        let mut routes = Vec::with_capacity(raw.paths.len());
        for (path, methods) in &raw.paths {
            let path = path
                .as_str()
                .ok_or_else(|| SourceError::Shape("route keys must be strings".to_string()))?;
            let methods = methods.as_mapping().ok_or_else(|| {
                SourceError::Shape(format!("route '{}' must map methods to operations", path))
            })?;

            let mut operations = Vec::with_capacity(methods.len());
            for (method, details) in methods {
                let method = method.as_str().ok_or_else(|| {
                    SourceError::Shape(format!("method keys of route '{}' must be strings", path))
                })?;
                let summary = details
                    .get("summary")
                    .and_then(|s| s.as_str())
                    .map(str::to_string);
                operations.push(Operation {
                    method: method.to_string(),
                    summary,
                });
            }

            routes.push(Route {
                path: path.to_string(),
                operations,
            });
        }

        let definitions = serde_json::to_value(&raw.definitions)
            .map_err(|e| SourceError::Shape(format!("definitions are not JSON-compatible: {}", e)))?;

        Ok(Self {
            routes,
            definitions,
        })
    }

    /// Number of (route, method) pairs.
    pub fn operation_count(&self) -> usize {
        self.routes.iter().map(|r| r.operations.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PETSTORE: &str = r#"
swagger: "2.0"
paths:
  /pets:
    get:
      summary: List all pets
    post:
      summary: Create a pet
  /pets/{petId}:
    get: {}
definitions:
  Pet:
    type: object
    properties:
      name:
        type: string
"#;

    #[test]
    fn parse_keeps_document_order() {
        let description = ApiDescription::parse(PETSTORE).expect("parse");
        let pairs: Vec<_> = description
            .routes
            .iter()
            .flat_map(|r| r.operations.iter().map(move |o| (r.path.as_str(), o.method.as_str())))
            .collect();
        assert_eq!(
            pairs,
            vec![("/pets", "get"), ("/pets", "post"), ("/pets/{petId}", "get")]
        );
        assert_eq!(description.operation_count(), 3);
        assert_eq!(description.routes[0].operations[0].summary.as_deref(), Some("List all pets"));
        assert_eq!(description.routes[1].operations[0].summary, None);
        assert_eq!(description.definitions["Pet"]["type"], "object");
    }

    #[test]
    fn parse_accepts_json() {
        let description = ApiDescription::parse(
            r#"{"paths": {"/users": {"get": {"summary": "list users"}}}, "definitions": {"User": {}}}"#,
        )
        .expect("parse");
        assert_eq!(description.operation_count(), 1);
    }

    #[test]
    fn missing_definitions_are_null() {
        let description = ApiDescription::parse("paths:\n  /a:\n    get: {}\n").expect("parse");
        assert!(description.definitions.is_null());
    }

    #[test]
    fn missing_paths_fail_fast() {
        let err = ApiDescription::parse("definitions: {}\n").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn non_mapping_route_fails_fast() {
        let err = ApiDescription::parse("paths:\n  /a: [get, post]\n").unwrap_err();
        assert!(matches!(err, SourceError::Shape(_)));
    }
}
