//! Source coordinates and the JSX opening-tag locator.
//!
//! The parser reports byte spans; the browser overlay reports 1-based line
//! and UTF-16 column coordinates. `LineIndex` converts between the two, and
//! the locator walks the tree in document order to find the opening tag at
//! a coordinate.

use oxc_ast::ast::{
    JSXAttributeItem, JSXAttributeName, JSXAttributeValue, JSXOpeningElement, Program,
};
use oxc_ast_visit::{walk, Visit};
use oxc_span::{SourceType, Span};

// ═══════════════════════════════════════════════════════════════════════════════
// LINE INDEX
// ═══════════════════════════════════════════════════════════════════════════════

/// Sorted line-start byte offsets for one source text.
pub struct LineIndex<'s> {
    source: &'s str,
    line_starts: Vec<u32>,
}

impl<'s> LineIndex<'s> {
    pub fn new(source: &'s str) -> Self {
        let mut line_starts = vec![0u32];
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// 1-based line and 1-based UTF-16 column for a byte offset.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_index = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line_index] as usize;
        let column = self.source[line_start..offset as usize]
            .encode_utf16()
            .count() as u32
            + 1;
        (line_index as u32 + 1, column)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GRAMMAR SELECTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Grammar superset for a file, decided by the extension alone. An
/// unrecognized extension falls back to permissive JSX rather than failing.
pub fn source_type_for_path(path: &str) -> SourceType {
    let base = SourceType::default().with_module(true);
    if path.ends_with(".tsx") {
        base.with_typescript(true).with_jsx(true)
    } else if path.ends_with(".ts") {
        base.with_typescript(true)
    } else {
        base.with_jsx(true)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPENING-TAG SNAPSHOTS
// ═══════════════════════════════════════════════════════════════════════════════

/// What an attribute's value is, as far as rewriting is concerned.
#[derive(Debug, Clone)]
pub enum AttributeValueKind {
    /// String literal. The span covers the literal including its quotes.
    StaticString { value_span: Span },
    /// Boolean-style attribute with no value.
    Absent,
    /// Expression container, element or fragment. Never rewritten.
    Dynamic,
}

#[derive(Debug, Clone)]
pub struct LocatedAttribute {
    pub name: String,
    pub span: Span,
    pub value: AttributeValueKind,
}

/// Plain-data snapshot of a JSX opening tag, detached from the arena.
#[derive(Debug, Clone)]
pub struct LocatedElement {
    pub span: Span,
    pub attributes: Vec<LocatedAttribute>,
}

fn snapshot_element(element: &JSXOpeningElement) -> LocatedElement {
    let mut attributes = Vec::new();
    for item in &element.attributes {
        // Spread attributes carry no name and can never match by name.
        if let JSXAttributeItem::Attribute(attribute) = item {
            let name = match &attribute.name {
                JSXAttributeName::Identifier(id) => id.name.to_string(),
                JSXAttributeName::NamespacedName(ns) => {
                    format!("{}:{}", ns.namespace.name, ns.name.name)
                }
            };
            let value = match &attribute.value {
                Some(JSXAttributeValue::StringLiteral(literal)) => {
                    AttributeValueKind::StaticString {
                        value_span: literal.span,
                    }
                }
                None => AttributeValueKind::Absent,
                Some(_) => AttributeValueKind::Dynamic,
            };
            attributes.push(LocatedAttribute {
                name,
                span: attribute.span,
                value,
            });
        }
    }
    LocatedElement {
        span: element.span,
        attributes,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOCATOR
// ═══════════════════════════════════════════════════════════════════════════════

struct OpeningElementLocator<'i, 's> {
    index: &'i LineIndex<'s>,
    target_line: u32,
    target_column: Option<u32>,
    found: Option<LocatedElement>,
}

impl<'a, 'i, 's> Visit<'a> for OpeningElementLocator<'i, 's> {
    fn visit_jsx_opening_element(&mut self, element: &JSXOpeningElement<'a>) {
        if self.found.is_none() {
            let (line, column) = self.index.line_col(element.span.start);
            let column_matches = self.target_column.map_or(true, |target| target == column);
            if line == self.target_line && column_matches {
                self.found = Some(snapshot_element(element));
            }
        }
        walk::walk_jsx_opening_element(self, element);
    }
}

/// First opening tag in document order whose start matches the target
/// coordinate. Absence is a normal outcome, not an error.
pub fn locate_opening_element(
    program: &Program<'_>,
    index: &LineIndex<'_>,
    target_line: u32,
    target_column: Option<u32>,
) -> Option<LocatedElement> {
    let mut locator = OpeningElementLocator {
        index,
        target_line,
        target_column,
        found: None,
    };
    locator.visit_program(program);
    locator.found
}

struct OpeningElementCollector {
    elements: Vec<LocatedElement>,
}

impl<'a> Visit<'a> for OpeningElementCollector {
    fn visit_jsx_opening_element(&mut self, element: &JSXOpeningElement<'a>) {
        self.elements.push(snapshot_element(element));
        walk::walk_jsx_opening_element(self, element);
    }
}

/// Every opening tag in the program, in document order.
pub fn collect_opening_elements(program: &Program<'_>) -> Vec<LocatedElement> {
    let mut collector = OpeningElementCollector {
        elements: Vec::new(),
    };
    collector.visit_program(program);
    collector.elements
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use oxc_allocator::Allocator;
    use oxc_parser::Parser;

    fn locate(
        source: &str,
        path: &str,
        line: u32,
        column: Option<u32>,
    ) -> Option<LocatedElement> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, source_type_for_path(path)).parse();
        assert!(ret.errors.is_empty(), "fixture must parse: {:?}", ret.errors);
        let index = LineIndex::new(source);
        locate_opening_element(&ret.program, &index, line, column)
    }

    #[test]
    fn test_line_col_basics() {
        let index = LineIndex::new("ab\ncd\n");
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(1), (1, 2));
        assert_eq!(index.line_col(3), (2, 1));
        assert_eq!(index.line_col(4), (2, 2));
    }

    #[test]
    fn test_line_col_counts_utf16_units() {
        // '🦀' is one 4-byte char but two UTF-16 code units.
        let source = "const a = \"🦀\"; x;\n";
        let index = LineIndex::new(source);
        let offset = source.find("x;").unwrap() as u32;
        let char_column = source[..offset as usize].chars().count() as u32 + 1;
        let (line, column) = index.line_col(offset);
        assert_eq!(line, 1);
        assert_eq!(column, char_column + 1);
    }

    #[test]
    fn test_locates_element_by_line() {
        let source = "export function X() {\n  return <div className=\"flex\" />;\n}\n";
        let element = locate(source, "X.tsx", 2, None).expect("should find element");
        assert_eq!(element.attributes.len(), 1);
        assert_eq!(element.attributes[0].name, "className");
    }

    #[test]
    fn test_line_without_element_is_none() {
        let source = "export function X() {\n  return <div />;\n}\n";
        assert!(locate(source, "X.tsx", 1, None).is_none());
        assert!(locate(source, "X.tsx", 40, None).is_none());
    }

    #[test]
    fn test_column_disambiguates_same_line() {
        let source = "const pair = [<i className=\"a\" />, <b className=\"b\" />];\n";
        let second_column = source.find("<b").unwrap() as u32 + 1;

        let first = locate(source, "pair.tsx", 1, None).expect("first in document order");
        assert!(matches!(
            first.attributes[0].value,
            AttributeValueKind::StaticString { .. }
        ));
        let first_start = first.span.start;

        let second =
            locate(source, "pair.tsx", 1, Some(second_column)).expect("column targets second");
        assert!(second.span.start > first_start);

        assert!(locate(source, "pair.tsx", 1, Some(999)).is_none());
    }

    #[test]
    fn test_document_order_is_outer_before_nested() {
        let source = "const x = <div icon={<svg />}>ok</div>;\n";
        let elements = {
            let allocator = Allocator::default();
            let ret = Parser::new(&allocator, source, source_type_for_path("x.tsx")).parse();
            assert!(ret.errors.is_empty());
            collect_opening_elements(&ret.program)
        };
        assert_eq!(elements.len(), 2);
        assert!(elements[0].span.start < elements[1].span.start);
    }

    #[test]
    fn test_attribute_value_classification() {
        let source = "const x = <div className={computed} hidden data-x=\"1\" />;\n";
        let element = locate(source, "x.tsx", 1, None).unwrap();
        assert!(matches!(
            element.attributes[0].value,
            AttributeValueKind::Dynamic
        ));
        assert!(matches!(
            element.attributes[1].value,
            AttributeValueKind::Absent
        ));
        assert!(matches!(
            element.attributes[2].value,
            AttributeValueKind::StaticString { .. }
        ));
    }

    #[test]
    fn test_source_type_for_path() {
        assert!(source_type_for_path("App.tsx").is_typescript());
        assert!(source_type_for_path("App.tsx").is_jsx());
        assert!(source_type_for_path("util.ts").is_typescript());
        assert!(!source_type_for_path("util.ts").is_jsx());
        assert!(!source_type_for_path("App.jsx").is_typescript());
        assert!(source_type_for_path("App.jsx").is_jsx());
        // Unrecognized extensions fall back to permissive JSX.
        assert!(source_type_for_path("weird.mdx").is_jsx());
    }

    #[test]
    fn test_tsx_grammar_accepts_type_annotations() {
        let source = "export function X({ n }: { n: number }) {\n  return <div className=\"a\" />;\n}\n";
        assert!(locate(source, "X.tsx", 2, None).is_some());
    }
}
