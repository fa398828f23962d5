use ego_tree::{NodeId, NodeRef};

use crate::document::Document;
use crate::node::NodeData;

// Elements that never take a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

impl Document {
    /// Serializes the whole document back to HTML. Text and attribute values
    /// are re-escaped; entity forms from the source are not preserved (the
    /// parser already decoded them), but the decoded content round-trips.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.tree().root().children() {
            write_node(&child, &mut out);
        }
        out
    }

    /// Serializes one node (element tag included) and its subtree.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.tree().get(id) {
            write_node(&node, &mut out);
        }
        out
    }
}

fn write_node(node: &NodeRef<'_, NodeData>, out: &mut String) {
    match node.value() {
        NodeData::Document => {
            for child in node.children() {
                write_node(&child, out);
            }
        }
        NodeData::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeData::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
        NodeData::Text(t) => {
            out.push_str(&html_escape::encode_text(t));
        }
        NodeData::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            for (name, value) in el.attrs() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                return;
            }
            for child in node.children() {
                write_node(&child, out);
            }
            out.push_str("</");
            out.push_str(&el.tag);
            out.push('>');
        }
    }
}
