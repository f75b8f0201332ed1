//! Renders a [`Document`] back to SVG XML text, tab-indented one
//! element per line — ported from `musvg_emit_xml_begin`/`_end`.

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
    let _ = write!(out, "{indent}<{}", node.element.name());
    for attr in present_attrs(node) {
        if let Some(value) = text_value(doc, node, attr) {
            let _ = write!(out, " {}=\"{}\"", attr.xml_name(), escape(&value));
        }
    }
    let children: Vec<_> = doc.children(node_ref).collect();
    if children.is_empty() {
        out.push_str("/>\n");
    } else {
        out.push_str(">\n");
        for child in children {
            emit_node(doc, child, depth + 1, out);
        }
        let _ = write!(out, "{indent}</{}>\n", node.element.name());
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::parse_xml;

    #[test]
    fn round_trips_element_structure() {
        let doc = parse_xml::parse(r#"<svg width="10" height="10"><rect x="1" y="2"/></svg>"#).unwrap();
        let text = emit(&doc);
        assert!(text.starts_with("<svg"));
        assert!(text.contains("<rect"));
        assert!(text.contains("x=\"1\""));
        assert!(text.contains("</svg>"));
    }

    #[test]
    fn self_closing_for_childless_elements() {
        let doc = parse_xml::parse(r#"<svg><rect/></svg>"#).unwrap();
        let text = emit(&doc);
        assert!(text.contains("<rect/>"));
    }
}
