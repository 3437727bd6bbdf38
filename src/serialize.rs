//! SVG serialization back to XML text.
//!
//! Output is canonical: attributes in insertion order, empty elements
//! self-closed, text escaped minimally. Parsing the output and serializing
//! again yields the same bytes.

use crate::ast::*;

/// Serialize a Document to SVG text (no XML declaration or DOCTYPE).
pub fn serialize(doc: &Document) -> String {
    serialize_node(doc, doc.root())
}

/// Serialize the subtree rooted at `id`.
///
/// For elements this is the canonical form used for structural equality.
pub fn serialize_node(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(&mut out, doc, id);
    out
}

fn write_node(out: &mut String, doc: &Document, id: NodeId) {
    match &doc.node(id).kind {
        NodeKind::Element(elem) => write_element(out, doc, id, elem),
        NodeKind::Text(text) => push_escaped_text(out, text),
        NodeKind::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        NodeKind::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
    }
}

fn write_element(out: &mut String, doc: &Document, id: NodeId, elem: &Element) {
    let name = elem.name.full_name();
    out.push('<');
    out.push_str(&name);

    for attr in &elem.attributes {
        out.push(' ');
        out.push_str(&attr.name.full_name());
        out.push_str("=\"");
        push_escaped_attr(out, &attr.value);
        out.push('"');
    }

    let mut children = doc.children(id).peekable();
    if children.peek().is_none() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in children {
        write_node(out, doc, child);
    }
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

fn push_escaped_attr(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_text(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;

    #[test]
    fn test_serialize_simple() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 1 1"><rect/></svg>"#;
        let doc = parse_svg(svg).unwrap();
        assert_eq!(serialize(&doc), svg);
    }

    #[test]
    fn test_serialize_drops_prolog() {
        let svg = r#"<?xml version="1.0"?><!DOCTYPE svg><svg viewBox="0 0 1 1"/>"#;
        let doc = parse_svg(svg).unwrap();
        assert_eq!(serialize(&doc), r#"<svg viewBox="0 0 1 1"/>"#);
    }

    #[test]
    fn test_serialize_keeps_comments_and_cdata() {
        let svg = r#"<svg viewBox="0 0 1 1"><!-- note --><style><![CDATA[.a{fill:red}]]></style></svg>"#;
        let doc = parse_svg(svg).unwrap();
        assert_eq!(serialize(&doc), svg);
    }

    #[test]
    fn test_escaping_round_trips() {
        let svg = r#"<svg viewBox="0 0 1 1"><text font-family="&quot;A&amp;B&quot;">1 &lt; 2 &amp; 3</text></svg>"#;
        let doc = parse_svg(svg).unwrap();
        let once = serialize(&doc);
        let twice = serialize(&parse_svg(&once).unwrap());
        assert_eq!(once, twice);
        assert_eq!(once, svg);
    }

    #[test]
    fn test_serialize_node_subtree() {
        let svg = r#"<svg viewBox="0 0 1 1"><g fill="red"><circle r="5"/></g></svg>"#;
        let doc = parse_svg(svg).unwrap();
        let g = doc.children(doc.root()).next().unwrap();
        assert_eq!(serialize_node(&doc, g), r#"<g fill="red"><circle r="5"/></g>"#);
    }
}
