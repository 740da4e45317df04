//! Build-time JSX instrumentation.
//!
//! Appends `data-tool-file` / `data-tool-line` / `data-tool-column`
//! provenance attributes to every JSX opening tag via span edits. Splices
//! never add or remove lines, so output line numbers equal input line
//! numbers and the transform needs no source map.

use lazy_static::lazy_static;
#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::locate::{collect_opening_elements, source_type_for_path, LineIndex};
use crate::patch::{apply_edits, attribute_insertion_offset, quote_attribute_value, SourceEdit};

lazy_static! {
    /// Module ids eligible for instrumentation.
    static ref JSX_LIKE_FILE_RE: Regex = Regex::new(r"\.(js|jsx|ts|tsx)$").unwrap();
}

/// Names of the provenance attributes. Explicitly constructed by the
/// composition root; reconfiguring means building a new value.
#[derive(Debug, Clone)]
pub struct InstrumentOptions {
    pub file_attribute: String,
    pub line_attribute: String,
    pub column_attribute: String,
}

impl Default for InstrumentOptions {
    fn default() -> Self {
        Self {
            file_attribute: "data-tool-file".to_string(),
            line_attribute: "data-tool-line".to_string(),
            column_attribute: "data-tool-column".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentedSource {
    pub code: String,
    /// Opening tags that received at least one provenance attribute.
    pub element_count: usize,
}

/// Strip the bundler query suffix from a module id
/// (`src/Foo.tsx?v=123` → `src/Foo.tsx`).
pub fn clean_bundler_id(id: &str) -> &str {
    match id.find('?') {
        Some(split) => &id[..split],
        None => id,
    }
}

fn is_instrumentable_id(clean_id: &str) -> bool {
    JSX_LIKE_FILE_RE.is_match(clean_id) && !clean_id.contains("/node_modules/")
}

/// Project-root-relative posix path with a leading `/`, or the full posix id
/// when the file sits outside the root.
fn posix_file_ref(clean_id: &str, project_root: &str) -> String {
    let normalized_id = clean_id.replace('\\', "/");
    let normalized_root = project_root.replace('\\', "/");
    let trimmed_root = normalized_root.trim_end_matches('/');
    if !trimmed_root.is_empty() {
        if let Some(relative) = normalized_id.strip_prefix(trimmed_root) {
            return format!("/{}", relative.trim_start_matches('/'));
        }
    }
    normalized_id
}

/// Instrument one module. Returns `None` when the id is not an
/// instrumentable source, when the source fails to parse (the bundler
/// surfaces its own error — instrumentation must never break the build), or
/// when there is nothing left to add.
pub fn instrument_source(
    code: &str,
    id: &str,
    project_root: &str,
    options: &InstrumentOptions,
) -> Option<InstrumentedSource> {
    let clean_id = clean_bundler_id(id);
    if !is_instrumentable_id(clean_id) {
        return None;
    }

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, code, source_type_for_path(clean_id)).parse();
    if !ret.errors.is_empty() {
        return None;
    }

    let index = LineIndex::new(code);
    let file_ref = posix_file_ref(clean_id, project_root);

    let mut edits: Vec<SourceEdit> = Vec::new();
    let mut element_count = 0usize;

    for element in collect_opening_elements(&ret.program) {
        let (line, column) = index.line_col(element.span.start);
        let already_has = |name: &str| {
            element
                .attributes
                .iter()
                .any(|attribute| attribute.name == name)
        };

        let mut text = String::new();
        if !already_has(&options.file_attribute) {
            text.push_str(&format!(
                " {}={}",
                options.file_attribute,
                quote_attribute_value(&file_ref)
            ));
        }
        if !already_has(&options.line_attribute) {
            text.push_str(&format!(" {}=\"{}\"", options.line_attribute, line));
        }
        if !already_has(&options.column_attribute) {
            text.push_str(&format!(" {}=\"{}\"", options.column_attribute, column));
        }
        if text.is_empty() {
            continue;
        }

        let offset = attribute_insertion_offset(&element, code);
        edits.push(SourceEdit {
            start: offset,
            end: offset,
            text,
        });
        element_count += 1;
    }

    if edits.is_empty() {
        return None;
    }

    Some(InstrumentedSource {
        code: apply_edits(code, edits),
        element_count,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi]
pub fn instrument_source_native(code: String, id: String, project_root: String) -> Option<String> {
    instrument_source(&code, &id, &project_root, &InstrumentOptions::default())
        .map(|output| output.code)
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
