//! Attribute patching via span edits.
//!
//! The patcher never reprints the tree: it produces byte-range edits against
//! the original source text and splices them in, so every byte outside an
//! edit survives exactly and line numbers of unmodified code never move.

use crate::locate::{AttributeValueKind, LocatedElement};

/// Replace `start..end` with `text`. A pure insertion has `start == end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEdit {
    pub start: u32,
    pub end: u32,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchError {
    /// The attribute value is an expression; overwriting it with a literal
    /// would silently destroy programmer-authored logic.
    DynamicValue,
}

/// Set or insert a static string attribute on a located opening tag.
///
/// An existing attribute keeps its list position; a missing one is appended
/// immediately before the tag's `>` or `/>`, never reordering the others. A
/// non-literal value is refused without producing an edit.
pub fn set_string_attribute(
    element: &LocatedElement,
    source: &str,
    attribute_name: &str,
    next_value: &str,
) -> Result<SourceEdit, PatchError> {
    if let Some(attribute) = element
        .attributes
        .iter()
        .find(|attribute| attribute.name == attribute_name)
    {
        return match &attribute.value {
            AttributeValueKind::StaticString { value_span } => Ok(SourceEdit {
                start: value_span.start,
                end: value_span.end,
                text: quote_attribute_value(next_value),
            }),
            AttributeValueKind::Absent => Ok(SourceEdit {
                start: attribute.span.end,
                end: attribute.span.end,
                text: format!("={}", quote_attribute_value(next_value)),
            }),
            AttributeValueKind::Dynamic => Err(PatchError::DynamicValue),
        };
    }

    let offset = attribute_insertion_offset(element, source);
    Ok(SourceEdit {
        start: offset,
        end: offset,
        text: format!(
            " {}={}",
            attribute_name,
            quote_attribute_value(next_value)
        ),
    })
}

/// Byte offset just past the last attribute, before the closing `>` / `/>`.
pub(crate) fn attribute_insertion_offset(element: &LocatedElement, source: &str) -> u32 {
    let start = element.span.start as usize;
    let end = element.span.end as usize;
    let bytes = source[start..end].as_bytes();
    let mut cut = bytes.len();
    if cut > 0 && bytes[cut - 1] == b'>' {
        cut -= 1;
    }
    if cut > 0 && bytes[cut - 1] == b'/' {
        cut -= 1;
    }
    while cut > 0 && bytes[cut - 1].is_ascii_whitespace() {
        cut -= 1;
    }
    (start + cut) as u32
}

/// JSX attribute strings have no escape sequences; quoting switches style
/// instead. A value containing both quote kinds encodes `"` as `&quot;`.
pub(crate) fn quote_attribute_value(value: &str) -> String {
    if !value.contains('"') {
        format!("\"{}\"", value)
    } else if !value.contains('\'') {
        format!("'{}'", value)
    } else {
        format!("\"{}\"", value.replace('"', "&quot;"))
    }
}

/// Splice edits into the source. Edits are applied in reverse offset order
/// so earlier offsets stay valid; they must not overlap.
pub fn apply_edits(source: &str, mut edits: Vec<SourceEdit>) -> String {
    edits.sort_by(|a, b| b.start.cmp(&a.start));
    let mut output = source.to_string();
    for edit in edits {
        output.replace_range(edit.start as usize..edit.end as usize, &edit.text);
    }
    output
}
