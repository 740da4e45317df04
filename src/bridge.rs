//! Transport-agnostic action dispatch.
//!
//! The dev server owns HTTP framing; this module owns everything between a
//! raw request body and a response body: payload validation, registry
//! lookup, project-root containment, and status mapping.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde_json::{json, Value};

use crate::actions::{ActionRegistry, OperationContext};
use crate::contracts::{ErrorCode, SelectionRef, UpdateError};

pub struct BridgeOptions {
    pub project_root: PathBuf,
    pub registry: ActionRegistry,
}

/// Explicitly constructed and explicitly owned by the composition root;
/// there is no shared global instance. `reconfigure` replaces the options
/// wholesale.
pub struct ActionBridge {
    options: BridgeOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BridgeResponse {
    pub status: u32,
    pub body: Value,
}

struct ActionPayload {
    action_id: String,
    operation: String,
    selection: SelectionRef,
    input: Value,
}

impl ActionBridge {
    pub fn new(options: BridgeOptions) -> Self {
        Self { options }
    }

    pub fn reconfigure(&mut self, options: BridgeOptions) {
        self.options = options;
    }

    pub fn project_root(&self) -> &Path {
        &self.options.project_root
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.options.registry
    }

    /// Dispatch one raw JSON request body to its operation handler.
    pub fn dispatch(&self, raw_body: &str) -> BridgeResponse {
        let payload = match parse_payload(raw_body) {
            Ok(payload) => payload,
            Err(response) => return response,
        };

        let action = match self.options.registry.get(&payload.action_id) {
            Some(action) => action,
            None => {
                return failure(
                    ErrorCode::ActionNotFound,
                    format!("Unknown action '{}'.", payload.action_id),
                )
            }
        };

        let handler = match action.operations.get(&payload.operation) {
            Some(handler) => handler,
            None => {
                return failure(
                    ErrorCode::OperationNotFound,
                    format!(
                        "Unknown operation '{}' for action '{}'.",
                        payload.operation, payload.action_id
                    ),
                )
            }
        };

        let absolute_file_path = match self.resolve_selection_file(&payload.selection.file) {
            Some(path) => path,
            None => {
                return failure(
                    ErrorCode::ForbiddenPath,
                    "Requested file path is outside project root.",
                )
            }
        };

        let context = OperationContext {
            selection: &payload.selection,
            input: &payload.input,
            project_root: &self.options.project_root,
            absolute_file_path: &absolute_file_path,
        };

        match handler.run(&context) {
            Ok(Some(data)) => BridgeResponse {
                status: 200,
                body: json!({ "ok": true, "data": data }),
            },
            Ok(None) => BridgeResponse {
                status: 200,
                body: json!({ "ok": true }),
            },
            Err(error) => BridgeResponse {
                status: error.status(),
                body: error.body(),
            },
        }
    }

    /// Lexically resolve a browser-supplied selection path against the
    /// project root. A cleaned path that escapes the root is forbidden
    /// before any file I/O happens.
    fn resolve_selection_file(&self, selection_file: &str) -> Option<PathBuf> {
        let normalized = selection_file.replace('\\', "/");
        let relative = normalized.trim_start_matches('/');
        if relative.is_empty() {
            return None;
        }

        let root = self.options.project_root.clean();
        let candidate = root.join(relative).clean();
        if candidate.starts_with(&root) && candidate != root {
            Some(candidate)
        } else {
            None
        }
    }
}

fn failure(code: ErrorCode, message: impl Into<String>) -> BridgeResponse {
    let error = UpdateError::new(code, message);
    BridgeResponse {
        status: error.status(),
        body: error.body(),
    }
}

fn parse_payload(raw_body: &str) -> Result<ActionPayload, BridgeResponse> {
    let value: Value = match serde_json::from_str(raw_body) {
        Ok(value) => value,
        Err(_) => {
            return Err(failure(
                ErrorCode::InvalidPayload,
                "Expected a valid JSON object payload.",
            ))
        }
    };
    let object = match value.as_object() {
        Some(object) => object,
        None => {
            return Err(failure(
                ErrorCode::InvalidPayload,
                "Expected a valid JSON object payload.",
            ))
        }
    };

    let action_id = object.get("actionId").and_then(Value::as_str).unwrap_or("");
    let operation = object.get("operation").and_then(Value::as_str).unwrap_or("");
    let selection = object.get("selection").and_then(parse_selection);

    // The `input` key must be present, even if its value is null.
    match (selection, object.get("input")) {
        (Some(selection), Some(input)) if !action_id.is_empty() && !operation.is_empty() => {
            Ok(ActionPayload {
                action_id: action_id.to_string(),
                operation: operation.to_string(),
                selection,
                input: input.clone(),
            })
        }
        _ => Err(failure(
            ErrorCode::InvalidPayload,
            "Payload must include actionId, operation, selection, and input.",
        )),
    }
}

fn parse_selection(value: &Value) -> Option<SelectionRef> {
    let object = value.as_object()?;
    let file = object.get("file")?.as_str()?.to_string();
    let tag_name = object.get("tagName")?.as_str()?.to_string();
    let line = integer_coordinate(object.get("line")?)?;
    let column = match object.get("column") {
        Some(value) => Some(integer_coordinate(value)?),
        None => None,
    };
    Some(SelectionRef {
        file,
        line,
        column,
        tag_name,
    })
}

/// Coordinates are 1-based integers; anything else rejects the payload.
fn integer_coordinate(value: &Value) -> Option<u32> {
    let number = value.as_u64()?;
    if number < 1 {
        return None;
    }
    u32::try_from(number).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionKind, ActionRegistration, OperationHandler};
    use crate::contracts::OperationResult;
    use std::collections::HashMap;

    struct EchoOperation;

    impl OperationHandler for EchoOperation {
        fn run(&self, context: &OperationContext) -> OperationResult {
            Ok(Some(json!({
                "file": context.absolute_file_path.to_string_lossy(),
                "tag": context.selection.tag_name,
            })))
        }
    }

    struct FailingOperation;

    impl OperationHandler for FailingOperation {
        fn run(&self, _context: &OperationContext) -> OperationResult {
            Err(UpdateError::new(
                ErrorCode::ElementNotFound,
                "Could not find JSX element at line 3.",
            ))
        }
    }

    fn bridge() -> ActionBridge {
        let mut operations: HashMap<String, Box<dyn OperationHandler>> = HashMap::new();
        operations.insert("echo".to_string(), Box::new(EchoOperation));
        operations.insert("fail".to_string(), Box::new(FailingOperation));
        let registry = ActionRegistry::new(
            vec![ActionRegistration {
                id: "test-action".to_string(),
                kind: ActionKind::Command,
                runtime_module: "@jsx-editor/test/runtime".to_string(),
                runtime_export: "testAction".to_string(),
                operations,
            }],
            None,
        )
        .unwrap();
        ActionBridge::new(BridgeOptions {
            project_root: PathBuf::from("/app"),
            registry,
        })
    }

    fn payload(action_id: &str, operation: &str, file: &str) -> String {
        json!({
            "actionId": action_id,
            "operation": operation,
            "selection": { "file": file, "line": 3, "tagName": "div" },
            "input": { "nextClassName": "flex" },
        })
        .to_string()
    }

    #[test]
    fn test_rejects_malformed_json() {
        let response = bridge().dispatch("{not json");
        assert_eq!(response.status, 400);
        assert_eq!(response.body["code"], "INVALID_PAYLOAD");
    }

    #[test]
    fn test_rejects_non_object_payload() {
        let response = bridge().dispatch("[1, 2]");
        assert_eq!(response.status, 400);
        assert_eq!(response.body["code"], "INVALID_PAYLOAD");
    }

    #[test]
    fn test_rejects_missing_input_key() {
        let body = json!({
            "actionId": "test-action",
            "operation": "echo",
            "selection": { "file": "/src/App.tsx", "line": 3, "tagName": "div" },
        })
        .to_string();
        let response = bridge().dispatch(&body);
        assert_eq!(response.status, 400);
        assert_eq!(response.body["code"], "INVALID_PAYLOAD");
    }

    #[test]
    fn test_rejects_zero_line() {
        let body = json!({
            "actionId": "test-action",
            "operation": "echo",
            "selection": { "file": "/src/App.tsx", "line": 0, "tagName": "div" },
            "input": null,
        })
        .to_string();
        let response = bridge().dispatch(&body);
        assert_eq!(response.body["code"], "INVALID_PAYLOAD");
    }

    #[test]
    fn test_unknown_action() {
        let response = bridge().dispatch(&payload("nope", "echo", "/src/App.tsx"));
        assert_eq!(response.status, 404);
        assert_eq!(response.body["code"], "ACTION_NOT_FOUND");
    }

    #[test]
    fn test_unknown_operation() {
        let response = bridge().dispatch(&payload("test-action", "nope", "/src/App.tsx"));
        assert_eq!(response.status, 404);
        assert_eq!(response.body["code"], "OPERATION_NOT_FOUND");
    }

    #[test]
    fn test_rejects_path_traversal_before_any_io() {
        let response = bridge().dispatch(&payload("test-action", "echo", "/../outside.tsx"));
        assert_eq!(response.status, 403);
        assert_eq!(response.body["code"], "FORBIDDEN_PATH");

        let response = bridge().dispatch(&payload("test-action", "echo", "/src/../../etc/x.tsx"));
        assert_eq!(response.status, 403);
    }

    #[test]
    fn test_successful_dispatch_resolves_absolute_path() {
        let response = bridge().dispatch(&payload("test-action", "echo", "/src/App.tsx"));
        assert_eq!(response.status, 200);
        assert_eq!(response.body["ok"], true);
        assert_eq!(response.body["data"]["file"], "/app/src/App.tsx");
        assert_eq!(response.body["data"]["tag"], "div");
    }

    #[test]
    fn test_operation_failure_maps_declared_status() {
        let response = bridge().dispatch(&payload("test-action", "fail", "/src/App.tsx"));
        assert_eq!(response.status, 409);
        assert_eq!(response.body["code"], "ELEMENT_NOT_FOUND");
        assert_eq!(response.body["ok"], false);
    }

    #[test]
    fn test_reconfigure_replaces_options() {
        let mut bridge = bridge();
        bridge.reconfigure(BridgeOptions {
            project_root: PathBuf::from("/other"),
            registry: ActionRegistry::new(vec![], None).unwrap(),
        });
        assert_eq!(bridge.project_root(), Path::new("/other"));
        let response = bridge.dispatch(&payload("test-action", "echo", "/src/App.tsx"));
        assert_eq!(response.body["code"], "ACTION_NOT_FOUND");
    }
}
