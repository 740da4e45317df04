//! Shared wire contracts for the editor native core.
//!
//! Every payload that crosses the JS boundary lives here: selection
//! references, update requests, the error-code taxonomy with its HTTP
//! status mapping, and the runtime bootstrap manifest.

#[cfg(feature = "napi")]
use napi_derive::napi;
use serde::{Deserialize, Serialize};
use serde_json::json;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

/// Every failure the native core can report, with its HTTP status semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    FileReadError,
    ParseError,
    ElementNotFound,
    #[serde(rename = "UNSUPPORTED_DYNAMIC_CLASSNAME")]
    UnsupportedDynamicClassName,
    FileWriteError,
    UnsupportedFile,
    InvalidInput,
    InvalidPayload,
    ActionNotFound,
    OperationNotFound,
    ForbiddenPath,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::FileReadError => "FILE_READ_ERROR",
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::ElementNotFound => "ELEMENT_NOT_FOUND",
            ErrorCode::UnsupportedDynamicClassName => "UNSUPPORTED_DYNAMIC_CLASSNAME",
            ErrorCode::FileWriteError => "FILE_WRITE_ERROR",
            ErrorCode::UnsupportedFile => "UNSUPPORTED_FILE",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::InvalidPayload => "INVALID_PAYLOAD",
            ErrorCode::ActionNotFound => "ACTION_NOT_FOUND",
            ErrorCode::OperationNotFound => "OPERATION_NOT_FOUND",
            ErrorCode::ForbiddenPath => "FORBIDDEN_PATH",
        }
    }

    /// HTTP status the dev server responds with for this code.
    pub fn status(self) -> u32 {
        match self {
            ErrorCode::ParseError
            | ErrorCode::UnsupportedFile
            | ErrorCode::InvalidInput
            | ErrorCode::InvalidPayload => 400,
            ErrorCode::ForbiddenPath => 403,
            ErrorCode::FileReadError
            | ErrorCode::ActionNotFound
            | ErrorCode::OperationNotFound => 404,
            ErrorCode::ElementNotFound | ErrorCode::UnsupportedDynamicClassName => 409,
            ErrorCode::FileWriteError => 500,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// UPDATE PIPELINE CONTRACTS
// ═══════════════════════════════════════════════════════════════════════════════

/// A className update against one element, identified by source position.
///
/// `column` disambiguates when multiple elements share a line. The caller
/// has already validated `absolute_file_path` as being inside the project
/// root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "napi", napi(object))]
pub struct UpdateRequest {
    pub absolute_file_path: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub next_class_name: String,
}

/// Typed failure for any step of an operation. All-or-nothing: when one of
/// these is returned the target file is byte-identical to before the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateError {
    pub code: ErrorCode,
    pub message: String,
}

impl UpdateError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> u32 {
        self.code.status()
    }

    /// The `{ ok: false, code, message, status }` failure body.
    pub fn body(&self) -> serde_json::Value {
        json!({
            "ok": false,
            "code": self.code,
            "message": self.message,
            "status": self.status(),
        })
    }
}

/// Outcome of a server operation: optional data on success, typed error
/// otherwise.
pub type OperationResult = Result<Option<serde_json::Value>, UpdateError>;

// ═══════════════════════════════════════════════════════════════════════════════
// SELECTION
// ═══════════════════════════════════════════════════════════════════════════════

/// The browser overlay's reference to a selected element: the project-root
/// relative file plus the 1-based coordinates its instrumented attributes
/// carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRef {
    pub file: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub tag_name: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// RUNTIME MANIFEST
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeActionRef {
    pub id: String,
    pub runtime_module: String,
    pub runtime_export: String,
}

/// Manifest embedded in the injected bootstrap tag: which runtime modules
/// the browser should load and which action opens by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeBootstrapPayload {
    pub actions: Vec<RuntimeActionRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_action_id: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
