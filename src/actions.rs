//! Action registry and the built-in className editor action.
//!
//! Actions are a closed set of registered structs keyed by id. The runtime
//! manifest is derived from the registry; nothing is resolved dynamically by
//! string path on the native side.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde_json::Value;

use crate::contracts::{
    ErrorCode, OperationResult, RuntimeActionRef, RuntimeBootstrapPayload, SelectionRef,
    UpdateError, UpdateRequest,
};
use crate::update::update_class_name;

/// How the browser runtime presents an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Fire-and-forget command invoked from the action menu.
    Command,
    /// Opens a panel the user interacts with.
    Panel,
}

/// Everything a server operation handler gets to see.
pub struct OperationContext<'a> {
    pub selection: &'a SelectionRef,
    pub input: &'a Value,
    pub project_root: &'a Path,
    pub absolute_file_path: &'a Path,
}

/// The extension seam for server-side action operations.
pub trait OperationHandler: Send + Sync {
    fn run(&self, context: &OperationContext) -> OperationResult;
}

pub struct ActionRegistration {
    pub id: String,
    pub kind: ActionKind,
    pub runtime_module: String,
    pub runtime_export: String,
    pub operations: HashMap<String, Box<dyn OperationHandler>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    EmptyActionId,
    DuplicateActionId(String),
    UnknownDefaultAction(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::EmptyActionId => write!(f, "Action ids must be non-empty."),
            RegistryError::DuplicateActionId(id) => {
                write!(f, "Action id '{}' is registered twice.", id)
            }
            RegistryError::UnknownDefaultAction(id) => {
                write!(f, "Default action '{}' is not registered.", id)
            }
        }
    }
}

/// Id-keyed registry of actions. Registration order is the manifest order.
pub struct ActionRegistry {
    actions: Vec<ActionRegistration>,
    default_action_id: Option<String>,
}

impl ActionRegistry {
    /// Duplicate and empty ids are rejected at construction; a default
    /// action id must name a registered action.
    pub fn new(
        actions: Vec<ActionRegistration>,
        default_action_id: Option<String>,
    ) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for action in &actions {
            if action.id.is_empty() {
                return Err(RegistryError::EmptyActionId);
            }
            if !seen.insert(action.id.clone()) {
                return Err(RegistryError::DuplicateActionId(action.id.clone()));
            }
        }
        if let Some(id) = &default_action_id {
            if !seen.contains(id) {
                return Err(RegistryError::UnknownDefaultAction(id.clone()));
            }
        }
        Ok(Self {
            actions,
            default_action_id,
        })
    }

    pub fn get(&self, id: &str) -> Option<&ActionRegistration> {
        self.actions.iter().find(|action| action.id == id)
    }

    /// Manifest handed to the injected bootstrap script.
    pub fn bootstrap_payload(&self) -> RuntimeBootstrapPayload {
        RuntimeBootstrapPayload {
            actions: self
                .actions
                .iter()
                .map(|action| RuntimeActionRef {
                    id: action.id.clone(),
                    runtime_module: action.runtime_module.clone(),
                    runtime_export: action.runtime_export.clone(),
                })
                .collect(),
            default_action_id: self.default_action_id.clone(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BUILT-IN CLASS NAME EDITOR
// ═══════════════════════════════════════════════════════════════════════════════

struct UpdateClassNameOperation;

impl OperationHandler for UpdateClassNameOperation {
    fn run(&self, context: &OperationContext) -> OperationResult {
        let extension = context
            .absolute_file_path
            .extension()
            .and_then(|extension| extension.to_str());
        if !matches!(extension, Some("tsx") | Some("jsx")) {
            return Err(UpdateError::new(
                ErrorCode::UnsupportedFile,
                "Only JSX/TSX files are supported.",
            ));
        }

        let next_class_name = match context.input.get("nextClassName").and_then(Value::as_str) {
            Some(value) => value.to_string(),
            None => {
                return Err(UpdateError::new(
                    ErrorCode::InvalidInput,
                    "Expected input.nextClassName to be a string.",
                ))
            }
        };

        update_class_name(&UpdateRequest {
            absolute_file_path: context.absolute_file_path.to_string_lossy().into_owned(),
            line: context.selection.line,
            column: context.selection.column,
            next_class_name,
        })?;

        Ok(None)
    }
}

/// The built-in Tailwind-style className editor panel.
pub fn class_name_editor_action() -> ActionRegistration {
    let mut operations: HashMap<String, Box<dyn OperationHandler>> = HashMap::new();
    operations.insert(
        "updateClassName".to_string(),
        Box::new(UpdateClassNameOperation),
    );
    ActionRegistration {
        id: "class-name-editor".to_string(),
        kind: ActionKind::Panel,
        runtime_module: "@jsx-editor/class-name-editor/runtime".to_string(),
        runtime_export: "classNameEditorAction".to_string(),
        operations,
    }
}
