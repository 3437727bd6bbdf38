//! SVG cleaning passes.
//!
//! Each pass mutates the document in place and returns how many items it
//! changed. Passes share nothing but the tree. An attribute a pass cannot
//! interpret is left alone.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::CleaningOptions;
use crate::analyze::reachable_ids;
use crate::ast::*;
use crate::error::ConvertError;
use crate::parse::parse_svg;
use crate::path::simplify_path_data;
use crate::serialize::{serialize, serialize_node};

/// Outcome of [`clean`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningResult {
    pub cleaned_svg: String,
    pub removed_elements: usize,
    /// `(original - cleaned) / original * 100`; negative when output grew.
    pub size_reduction: f64,
    pub optimizations: Vec<String>,
}

/// What [`clean_document`] did to a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub removed_elements: usize,
    pub optimizations: Vec<String>,
}

impl CleanReport {
    fn record(&mut self, count: usize, describe: impl FnOnce(usize) -> String) {
        if count > 0 {
            self.optimizations.push(describe(count));
        }
    }
}

/// Parse, clean and re-serialize an SVG string.
pub fn clean(svg: &str, options: &CleaningOptions) -> Result<CleaningResult, ConvertError> {
    let mut doc = parse_svg(svg)?;
    let report = clean_document(&mut doc, options);
    let cleaned_svg = serialize(&doc);

    Ok(CleaningResult {
        size_reduction: size_reduction(svg.len(), cleaned_svg.len()),
        cleaned_svg,
        removed_elements: report.removed_elements,
        optimizations: report.optimizations,
    })
}

/// Percentage by which `cleaned` is smaller than `original`.
pub fn size_reduction(original: usize, cleaned: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - cleaned as f64) / original as f64 * 100.0
}

/// Apply all enabled passes to the document, in their fixed order.
pub fn clean_document(doc: &mut Document, options: &CleaningOptions) -> CleanReport {
    let mut report = CleanReport::default();

    if options.remove_duplicates {
        let removed = remove_duplicates(doc);
        tracing::debug!("remove_duplicates: {} elements", removed);
        report.removed_elements += removed;
        report.record(removed, |n| format!("Removed {} duplicate elements", n));
    }

    if options.cleanup_definitions {
        let removed = cleanup_definitions(doc);
        tracing::debug!("cleanup_definitions: {} elements", removed);
        report.removed_elements += removed;
        report.record(removed, |n| format!("Cleaned up {} unused definitions", n));
    }

    if options.optimize_precision {
        let changed = optimize_precision(doc, options.precision());
        tracing::debug!("optimize_precision: {} attributes", changed);
        report.record(changed, |n| format!("Optimized precision in {} attributes", n));
    }

    if options.simplify_paths {
        let changed = simplify_paths(doc);
        tracing::debug!("simplify_paths: {} paths", changed);
        report.record(changed, |n| format!("Simplified {} paths", n));
    }

    if options.optimize_colors {
        let changed = optimize_colors(doc);
        tracing::debug!("optimize_colors: {} values", changed);
        report.record(changed, |n| format!("Optimized {} color values", n));
    }

    if options.normalize_whitespace {
        let changed = normalize_whitespace(doc);
        tracing::debug!("normalize_whitespace: {} text nodes", changed);
        report.record(changed, |n| format!("Normalized whitespace in {} text nodes", n));
    }

    if options.remove_unused_styles {
        let removed = remove_unused_styles(doc);
        tracing::debug!("remove_unused_styles: {} elements", removed);
        report.removed_elements += removed;
        report.record(removed, |n| format!("Removed {} unused styles", n));
    }

    if options.merge_paths {
        let removed = merge_paths(doc);
        tracing::debug!("merge_paths: {} elements", removed);
        report.removed_elements += removed;
        report.record(removed, |n| format!("Merged {} compatible paths", n));
    }

    report
}

/// Detach every element whose canonical form already occurred earlier in
/// document order.
///
/// Sweeps repeat until one removes nothing, so a second run is a no-op.
/// Each sweep serializes every subtree, which is quadratic for deeply nested
/// documents.
pub fn remove_duplicates(doc: &mut Document) -> usize {
    let mut removed = 0;

    loop {
        let mut seen: HashSet<String> = HashSet::new();
        let mut sweep_removed = 0;

        for id in doc.element_ids() {
            // An earlier duplicate may have taken this one with it.
            if !doc.is_attached(id) {
                continue;
            }
            if !seen.insert(serialize_node(doc, id)) {
                doc.detach(id);
                sweep_removed += 1;
            }
        }

        if sweep_removed == 0 {
            return removed;
        }
        removed += sweep_removed;
    }
}

/// Detach identified elements under `<defs>` that nothing references.
///
/// Repeats until stable: a definition only referenced by a removed one goes
/// too. An element is kept while anything in its subtree is referenced.
pub fn cleanup_definitions(doc: &mut Document) -> usize {
    let mut removed = 0;

    loop {
        let reachable = reachable_ids(doc);
        let subtree_is_unreferenced = |doc: &Document, id: NodeId| {
            doc.descendants(id).all(|n| {
                doc.element(n)
                    .and_then(|e| e.get_attr("id"))
                    .is_none_or(|i| !reachable.contains(i))
            })
        };

        let unused: Vec<NodeId> = doc
            .element_ids()
            .into_iter()
            .filter(|&id| {
                doc.element(id).is_some_and(|e| e.get_attr("id").is_some())
                    && doc.has_ancestor(id, "defs")
                    && subtree_is_unreferenced(doc, id)
            })
            .collect();

        let mut sweep_removed = 0;
        for id in unused {
            if doc.is_attached(id) {
                doc.detach(id);
                sweep_removed += 1;
            }
        }

        if sweep_removed == 0 {
            return removed;
        }
        removed += sweep_removed;
    }
}

/// Round decimal attribute values to `precision` fractional digits.
pub fn optimize_precision(doc: &mut Document, precision: u8) -> usize {
    let mut changed = 0;

    for id in doc.element_ids() {
        let Some(elem) = doc.element_mut(id) else {
            continue;
        };
        for attr in &mut elem.attributes {
            if let Some(rounded) = round_decimal(&attr.value, precision) {
                attr.value = rounded;
                changed += 1;
            }
        }
    }

    changed
}

/// Round `value` if it is exactly a decimal literal (`-?digits.digits`) with
/// more than `precision` fractional digits.
fn round_decimal(value: &str, precision: u8) -> Option<String> {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let (int_part, frac_part) = unsigned.split_once('.')?;

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }
    if frac_part.len() <= usize::from(precision) {
        return None;
    }

    // Half away from zero, on the digits themselves.
    let keep = usize::from(precision);
    let mut digits: Vec<u8> = int_part.bytes().chain(frac_part[..keep].bytes()).collect();
    if frac_part.as_bytes()[keep] >= b'5' {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let (int_digits, frac_digits) = digits.split_at(digits.len() - keep);
    let int_digits: String = int_digits.iter().map(|&b| char::from(b)).collect();
    let int_digits = match int_digits.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };

    let mut rounded = String::new();
    if value.starts_with('-') && digits.iter().any(|&b| b != b'0') {
        rounded.push('-');
    }
    rounded.push_str(int_digits);
    if keep > 0 {
        rounded.push('.');
        rounded.extend(frac_digits.iter().map(|&b| char::from(b)));
    }
    Some(rounded)
}

/// Rewrite `d` attributes of paths without redundant separators or letters.
pub fn simplify_paths(doc: &mut Document) -> usize {
    let mut changed = 0;

    for id in doc.element_ids() {
        let Some(elem) = doc.element_mut(id) else {
            continue;
        };
        if !elem.is("path") {
            continue;
        }
        let Some(d) = elem.get_attr("d") else {
            continue;
        };
        match simplify_path_data(d) {
            Ok(simplified) if simplified != d => {
                elem.set_attr("d", simplified);
                changed += 1;
            }
            Ok(_) => {}
            Err(e) => tracing::debug!("simplify_paths: skipping path: {}", e),
        }
    }

    changed
}

/// Rewrite `rgb(r, g, b)` fills and strokes as `#rrggbb`.
pub fn optimize_colors(doc: &mut Document) -> usize {
    let mut changed = 0;

    for id in doc.element_ids() {
        let Some(elem) = doc.element_mut(id) else {
            continue;
        };
        for attr in &mut elem.attributes {
            if attr.name.prefix.is_some() || !matches!(attr.name.local.as_str(), "fill" | "stroke") {
                continue;
            }
            if let Some(hex) = rgb_to_hex(&attr.value) {
                attr.value = hex;
                changed += 1;
            }
        }
    }

    changed
}

/// `rgb(255, 0, 0)` -> `#ff0000`. Only integer channels in 0..=255.
fn rgb_to_hex(value: &str) -> Option<String> {
    let value = value.trim();
    let prefix = value.get(..4)?;
    if !prefix.eq_ignore_ascii_case("rgb(") {
        return None;
    }
    let inner = value[4..].strip_suffix(')')?;

    let mut channels = [0u8; 3];
    let mut parts = inner.split(',');
    for channel in &mut channels {
        let part = parts.next()?.trim();
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *channel = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }

    let [r, g, b] = channels;
    Some(format!("#{:02x}{:02x}{:02x}", r, g, b))
}

/// Trim every text node, detaching the ones left empty.
pub fn normalize_whitespace(doc: &mut Document) -> usize {
    let mut changed = 0;

    let texts: Vec<NodeId> = doc
        .descendants(doc.root())
        .filter(|&id| matches!(doc.node(id).kind, NodeKind::Text(_)))
        .collect();

    for id in texts {
        let trimmed = match &doc.node(id).kind {
            NodeKind::Text(text) if text.trim().len() != text.len() => text.trim().to_string(),
            _ => continue,
        };
        if trimmed.is_empty() {
            doc.detach(id);
        } else {
            doc.node_mut(id).kind = NodeKind::Text(trimmed);
        }
        changed += 1;
    }

    changed
}

/// Detach `<style>` elements with no content.
pub fn remove_unused_styles(doc: &mut Document) -> usize {
    let empty: Vec<NodeId> = doc
        .element_ids()
        .into_iter()
        .filter(|&id| {
            doc.element(id).is_some_and(|e| e.is("style"))
                && doc.text_content(id).trim().is_empty()
        })
        .collect();

    let removed = empty.len();
    for id in empty {
        doc.detach(id);
    }
    removed
}

/// Merge sibling paths that share fill, stroke and stroke width.
///
/// Lossy: overlapping paths with different winding lose their independent
/// fill-rule behaviour once they are one path.
pub fn merge_paths(doc: &mut Document) -> usize {
    type Key = (Option<String>, Option<String>, Option<String>);
    let mut removed = 0;

    for parent in doc.element_ids() {
        let mut groups: Vec<(Key, Vec<NodeId>)> = Vec::new();

        for child in doc.children(parent) {
            let Some(elem) = doc.element(child) else {
                continue;
            };
            if !elem.is("path") || elem.get_attr("d").is_none() {
                continue;
            }
            let key: Key = (
                elem.get_attr("fill").map(str::to_string),
                elem.get_attr("stroke").map(str::to_string),
                elem.get_attr("stroke-width").map(str::to_string),
            );
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(child),
                None => groups.push((key, vec![child])),
            }
        }

        for (_, members) in groups {
            let [first, rest @ ..] = members.as_slice() else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }

            let merged = members
                .iter()
                .filter_map(|&id| doc.element(id).and_then(|e| e.get_attr("d")))
                .collect::<Vec<_>>()
                .join(" ");
            if let Some(elem) = doc.element_mut(*first) {
                elem.set_attr("d", merged);
            }
            for &id in rest {
                doc.detach(id);
                removed += 1;
            }
        }
    }

    removed
}
