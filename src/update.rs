//! The className update pipeline.
//!
//! One sequential pass per request: read → parse → locate → patch → splice →
//! write. Every failure is mapped to a typed code with HTTP status
//! semantics, and nothing touches the file system until the patched text is
//! fully regenerated — a request either fully succeeds or leaves the file
//! byte-identical.

#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::contracts::{ErrorCode, UpdateError, UpdateRequest};
use crate::locate::{locate_opening_element, source_type_for_path, LineIndex};
use crate::patch::{apply_edits, set_string_attribute};

/// Apply one `UpdateRequest` against the file on disk.
///
/// The tree is built fresh from current disk content on every call; there is
/// no cross-request cache, so concurrent external edits are picked up
/// naturally.
pub fn update_class_name(request: &UpdateRequest) -> Result<(), UpdateError> {
    update_string_attribute(request, "className")
}

fn update_string_attribute(
    request: &UpdateRequest,
    attribute_name: &str,
) -> Result<(), UpdateError> {
    let source = fs::read_to_string(&request.absolute_file_path).map_err(|_| {
        UpdateError::new(
            ErrorCode::FileReadError,
            "Failed to read source file for className update.",
        )
    })?;

    let allocator = Allocator::default();
    let source_type = source_type_for_path(&request.absolute_file_path);
    let ret = Parser::new(&allocator, &source, source_type).parse();
    if !ret.errors.is_empty() {
        return Err(UpdateError::new(
            ErrorCode::ParseError,
            "Unable to parse source file for className update.",
        ));
    }

    let index = LineIndex::new(&source);
    let element = locate_opening_element(&ret.program, &index, request.line, request.column)
        .ok_or_else(|| {
            let position = match request.column {
                Some(column) => format!("line {}, column {}", request.line, column),
                None => format!("line {}", request.line),
            };
            UpdateError::new(
                ErrorCode::ElementNotFound,
                format!("Could not find JSX element at {}.", position),
            )
        })?;

    let edit = set_string_attribute(&element, &source, attribute_name, &request.next_class_name)
        .map_err(|_| {
            UpdateError::new(
                ErrorCode::UnsupportedDynamicClassName,
                "This element uses a dynamic className expression. v1 supports only static className strings.",
            )
        })?;

    let output = apply_edits(&source, vec![edit]);

    fs::write(&request.absolute_file_path, output).map_err(|_| {
        UpdateError::new(
            ErrorCode::FileWriteError,
            "Failed to write updated className to source file.",
        )
    })?;

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Flat result shape shared with JS: `{ ok }` or `{ ok, code, message, status }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "napi", napi(object))]
pub struct UpdateOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u32>,
}

#[cfg(feature = "napi")]
#[napi]
pub fn update_class_name_native(request: UpdateRequest) -> UpdateOutcome {
    match update_class_name(&request) {
        Ok(()) => UpdateOutcome {
            ok: true,
            code: None,
            message: None,
            status: None,
        },
        Err(error) => UpdateOutcome {
            ok: false,
            code: Some(error.code.as_str().to_string()),
            message: Some(error.message),
            status: Some(error.code.status()),
        },
    }
}
