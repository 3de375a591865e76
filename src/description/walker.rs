//! Derivation of generation tasks from a description.

use serde_json::Value;

use super::{ApiDescription, Operation, Route};

/// Used when an operation has no summary.
pub const NO_DESCRIPTION: &str = "No detailed description available.";

/// What to generate for one (route, method) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationTask {
    /// `model_name` (or `undefined`) followed by `operation`, e.g. `USERSGET`.
    pub component_name: String,
    /// Last route segment, uppercased. `None` for the root route.
    pub model_name: Option<String>,
    /// HTTP method, uppercased.
    pub operation: String,
    pub description: String,
    /// The description's whole `definitions` mapping.
    pub definition: Value,
    pub target_language_hint: Option<String>,
}

impl GenerationTask {
    fn derive(route: &Route, operation: &Operation, definitions: &Value) -> Self {
        let model_name = last_path_segment(&route.path).map(str::to_uppercase);
        let operation_name = operation.method.to_uppercase();
        let component_name = format!(
            "{}{}",
            model_name.as_deref().unwrap_or("undefined"),
            operation_name
        );

        Self {
            component_name,
            model_name,
            operation: operation_name,
            description: operation
                .summary
                .clone()
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            definition: definitions.clone(),
            target_language_hint: None,
        }
    }

    pub fn with_language_hint(mut self, hint: impl Into<String>) -> Self {
        self.target_language_hint = Some(hint.into());
        self
    }
}

/// Last segment of a route, ignoring trailing slashes.
///
/// Unlike a plain split on `/`, `/shop/orders/` yields `orders` rather than
/// an empty segment; only `""` and `/` have no segment.
fn last_path_segment(route: &str) -> Option<&str> {
    route
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

/// Lazily yield one task per (route, method), in document order.
///
/// Walking the same description twice yields the same sequence.
pub fn walk(description: &ApiDescription) -> impl Iterator<Item = GenerationTask> + '_ {
    description.routes.iter().flat_map(move |route| {
        route
            .operations
            .iter()
            .map(move |operation| GenerationTask::derive(route, operation, &description.definitions))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn description() -> ApiDescription {
        ApiDescription::parse(
            r#"
paths:
  /users:
    get:
      summary: list users
    post: {}
  /shop/orders/:
    delete:
      summary: cancel order
  /:
    get: {}
definitions:
  User:
    type: object
"#,
        )
        .expect("parse")
    }

    #[test]
    fn one_task_per_route_method_pair() {
        let description = description();
        assert_eq!(walk(&description).count(), description.operation_count());
        assert_eq!(walk(&description).count(), 4);
    }

    #[test]
    fn task_fields_are_derived_from_route_and_method() {
        let description = description();
        let tasks: Vec<_> = walk(&description).collect();

        assert_eq!(tasks[0].model_name.as_deref(), Some("USERS"));
        assert_eq!(tasks[0].operation, "GET");
        assert_eq!(tasks[0].component_name, "USERSGET");
        assert_eq!(tasks[0].description, "list users");
        assert_eq!(tasks[0].definition, json!({"User": {"type": "object"}}));
        assert_eq!(tasks[0].target_language_hint, None);

        assert_eq!(tasks[1].component_name, "USERSPOST");
        assert_eq!(tasks[1].description, NO_DESCRIPTION);

        assert_eq!(tasks[2].model_name.as_deref(), Some("ORDERS"));
        assert_eq!(tasks[2].component_name, "ORDERSDELETE");
    }

    #[test]
    fn root_route_has_undefined_model() {
        let description = description();
        let root = walk(&description).last().expect("root task");
        assert_eq!(root.model_name, None);
        assert_eq!(root.component_name, "undefinedGET");
    }

    #[test]
    fn walking_is_repeatable() {
        let first: Vec<_> = walk(&description()).collect();
        let second: Vec<_> = walk(&description()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn last_segment_edge_cases() {
        assert_eq!(last_path_segment(""), None);
        assert_eq!(last_path_segment("/"), None);
        assert_eq!(last_path_segment("/shop/orders/"), Some("orders"));
        assert_eq!(last_path_segment("users"), Some("users"));
        assert_eq!(last_path_segment("/pets/{petId}"), Some("{petId}"));
    }
}
