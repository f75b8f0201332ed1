//! The indented debug-text dump: `node NAME { attr NAME "value"; ... };`
//! one block per element, ported from `musvg_emit_text_begin`/`_end`.

use crate::svg::attr_text::{present_attrs, text_value};
use crate::svg::model::{Document, NodeRef};
use std::fmt::Write as _;

pub fn emit(doc: &Document) -> String {
    let mut out = String::new();
    if !doc.root.is_none() {
        emit_node(doc, doc.root, 0, &mut out);
    }
    out
}

fn emit_node(doc: &Document, node_ref: NodeRef, depth: usize, out: &mut String) {
    let node = doc.node(node_ref);
    let indent = "\t".repeat(depth);
    let _ = writeln!(out, "{indent}node {} {{", node.element.name());
    let inner = "\t".repeat(depth + 1);
    for attr in present_attrs(node) {
        if let Some(value) = text_value(doc, node, attr) {
            let _ = writeln!(out, "{inner}attr {} \"{}\";", attr.xml_name(), value);
        }
    }
    for child in doc.children(node_ref) {
        emit_node(doc, child, depth + 1, out);
    }
    let _ = writeln!(out, "{indent}}};");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::parse_xml;

    #[test]
    fn emits_node_attr_blocks() {
        let doc = parse_xml::parse(r#"<svg width="10"><rect x="1"/></svg>"#).unwrap();
        let text = emit(&doc);
        assert!(text.contains("node svg {"));
        assert!(text.contains("attr width \"10\";"));
        assert!(text.contains("node rect {"));
        assert!(text.trim_end().ends_with("};"));
    }
}
