//! Read-only queries over a document: metrics and reference reachability.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ast::*;
use crate::serialize::serialize;

/// Attributes whose values may point at another element by id.
pub const REFERENCE_ATTRIBUTES: &[&str] = &[
    "fill",
    "stroke",
    "filter",
    "clip-path",
    "mask",
    "marker-start",
    "marker-mid",
    "marker-end",
    "href",
    "xlink:href",
    "style",
];

/// Namespace prefixes written by design tools.
const VENDOR_PREFIXES: &[&str] = &["figma", "inkscape", "sodipodi", "sketch", "serif"];

/// Structural metrics of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub element_count: usize,
    pub path_count: usize,
    pub group_count: usize,
    pub defs_count: usize,
    pub style_count: usize,
    pub has_inline_styles: bool,
    pub has_vendor_attributes: bool,
    /// Length of the serialized document in bytes.
    pub file_size_bytes: usize,
}

/// Compute metrics for the current state of `doc`.
pub fn analyze(doc: &Document) -> Analysis {
    let mut analysis = Analysis {
        file_size_bytes: serialize(doc).len(),
        ..Analysis::default()
    };

    for id in doc.element_ids() {
        let Some(elem) = doc.element(id) else {
            continue;
        };
        analysis.element_count += 1;

        if elem.is("path") {
            analysis.path_count += 1;
        } else if elem.is("g") {
            analysis.group_count += 1;
        } else if elem.is("defs") {
            analysis.defs_count += 1;
        } else if elem.is("style") {
            analysis.style_count += 1;
        }

        if elem.get_attr("style").is_some() {
            analysis.has_inline_styles = true;
        }
        if is_vendor_element(elem) {
            analysis.has_vendor_attributes = true;
        }
    }

    analysis
}

/// Whether the element or any of its attributes comes from a design tool.
pub fn is_vendor_element(elem: &Element) -> bool {
    is_vendor_name(&elem.name)
        || elem
            .attributes
            .iter()
            .any(|a| is_vendor_name(&a.name) || is_data_attribute(&a.name))
}

pub(crate) fn is_data_attribute(name: &QName) -> bool {
    name.prefix.is_none() && name.local.starts_with("data-")
}

pub(crate) fn is_vendor_name(name: &QName) -> bool {
    name.prefix
        .as_deref()
        .is_some_and(|p| VENDOR_PREFIXES.contains(&p))
}

/// `xmlns:inkscape` and friends.
pub(crate) fn is_vendor_namespace_declaration(name: &QName) -> bool {
    name.is_xmlns() && name.prefix.is_some() && VENDOR_PREFIXES.contains(&name.local.as_str())
}

/// Every id referenced from a reference-bearing attribute or from a `url()`
/// inside a `style` element anywhere in the attached tree. Recomputed on each
/// call.
pub fn reachable_ids(doc: &Document) -> HashSet<String> {
    let mut ids = HashSet::new();

    for id in doc.element_ids() {
        let Some(elem) = doc.element(id) else {
            continue;
        };
        if elem.is("style") {
            ids.extend(url_references(&doc.text_content(id)).map(str::to_string));
        }
        for attr in &elem.attributes {
            let name = attr.name.full_name();
            if !REFERENCE_ATTRIBUTES.contains(&name.as_str()) {
                continue;
            }
            ids.extend(url_references(&attr.value).map(str::to_string));
            if attr.name.local == "href"
                && let Some(target) = attr.value.trim().strip_prefix('#')
                && !target.is_empty()
            {
                ids.insert(target.to_string());
            }
        }
    }

    ids
}

/// Ids named by `url(#id)` occurrences in a value, in order.
///
/// Quoted forms (`url('#id')`, `url("#id")`) are accepted; anything that is
/// not a local fragment reference is skipped.
pub fn url_references(value: &str) -> impl Iterator<Item = &str> {
    let mut rest = value;
    std::iter::from_fn(move || {
        loop {
            let start = rest.find("url(")?;
            let after = &rest[start + 4..];
            let Some(end) = after.find(')') else {
                rest = "";
                return None;
            };
            let inner = after[..end].trim().trim_matches(|c| c == '\'' || c == '"');
            rest = &after[end + 1..];
            if let Some(id) = inner.strip_prefix('#')
                && !id.is_empty()
            {
                return Some(id);
            }
        }
    })
}
