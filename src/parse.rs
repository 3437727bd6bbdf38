//! SVG parsing from XML.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::ast::*;
use crate::error::ConvertError;

/// Parse an SVG string into a Document.
///
/// The XML declaration, DOCTYPE, processing instructions and anything else
/// outside the root element are discarded. Inside the root, text is kept
/// verbatim (including whitespace-only runs) so that passes decide what to
/// normalize.
pub fn parse_svg(svg: &str) -> Result<Document, ConvertError> {
    let mut reader = Reader::from_str(svg);

    let mut doc: Option<Document> = None;
    // Open elements, innermost last.
    let mut stack: Vec<NodeId> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let element = parse_element_start(&start)?;
                let id = open_element(&mut doc, &stack, element)?;
                stack.push(id);
            }
            Event::Empty(start) => {
                let element = parse_element_start(&start)?;
                open_element(&mut doc, &stack, element)?;
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                match (doc.as_mut(), stack.last()) {
                    (Some(doc), Some(&parent)) => {
                        doc.append(parent, NodeKind::Text(text.into_owned()));
                    }
                    _ if text.trim().is_empty() => {}
                    _ => {
                        return Err(ConvertError::Malformed(
                            "Text content outside the root element".into(),
                        ));
                    }
                }
            }
            Event::CData(cdata) => {
                let content = String::from_utf8_lossy(&cdata).into_owned();
                match (doc.as_mut(), stack.last()) {
                    (Some(doc), Some(&parent)) => {
                        doc.append(parent, NodeKind::CData(content));
                    }
                    _ => {
                        return Err(ConvertError::Malformed(
                            "CDATA section outside the root element".into(),
                        ));
                    }
                }
            }
            Event::Comment(comment) => {
                // Comments around the root are dropped along with the prolog.
                if let (Some(doc), Some(&parent)) = (doc.as_mut(), stack.last()) {
                    let content = String::from_utf8_lossy(&comment).into_owned();
                    doc.append(parent, NodeKind::Comment(content));
                }
            }
            Event::Eof => break,
            // XML declaration, DOCTYPE and processing instructions
            _ => {}
        }
    }

    if let (Some(doc), Some(&open)) = (doc.as_ref(), stack.last()) {
        let name = doc
            .element(open)
            .map(|e| e.name.full_name())
            .unwrap_or_default();
        return Err(ConvertError::Malformed(format!(
            "Unexpected end of input: <{}> is never closed",
            name
        )));
    }

    let doc = doc.ok_or_else(|| ConvertError::Malformed("No root element found".into()))?;
    validate(&doc)?;

    tracing::debug!(
        "Parsed SVG document: {} bytes, {} elements",
        svg.len(),
        doc.element_ids().len()
    );
    Ok(doc)
}

/// Insert `element` under the innermost open element, or make it the root.
fn open_element(
    doc: &mut Option<Document>,
    stack: &[NodeId],
    element: Element,
) -> Result<NodeId, ConvertError> {
    match (doc.as_mut(), stack.last()) {
        (None, _) => {
            let new_doc = Document::new(element);
            let root = new_doc.root();
            *doc = Some(new_doc);
            Ok(root)
        }
        (Some(doc), Some(&parent)) => Ok(doc.append(parent, NodeKind::Element(element))),
        (Some(_), None) => Err(ConvertError::Malformed(format!(
            "Unexpected element <{}> after the root element",
            element.name.full_name()
        ))),
    }
}

/// Check the well-formed tree is something we can handle.
fn validate(doc: &Document) -> Result<(), ConvertError> {
    let root = doc
        .root_element()
        .ok_or_else(|| ConvertError::Structural("Document has no root element".into()))?;

    if !root.is("svg") {
        return Err(ConvertError::Structural(format!(
            "Root element is <{}>, expected <svg>",
            root.name.full_name()
        )));
    }

    let has_viewbox = root.get_attr("viewBox").is_some();
    let has_size = root.get_attr("width").is_some() && root.get_attr("height").is_some();
    if !has_viewbox && !has_size {
        return Err(ConvertError::Structural(
            "SVG is missing a viewBox or width/height attributes".into(),
        ));
    }

    Ok(())
}

fn parse_element_start(start: &BytesStart) -> Result<Element, ConvertError> {
    let name_bytes = start.name();
    let name = std::str::from_utf8(name_bytes.as_ref())?;

    let mut element = Element {
        name: QName::parse(name),
        attributes: Vec::new(),
    };

    for attr in start.attributes() {
        let attr =
            attr.map_err(|e| ConvertError::Malformed(format!("Invalid attribute: {}", e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        element.attributes.push(Attribute {
            name: QName::parse(key),
            value: value.into_owned(),
        });
    }

    Ok(element)
}
