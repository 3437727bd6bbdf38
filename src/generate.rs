//! React component generation.
//!
//! The document is converted into a small JSX tree of its own, which is then
//! printed and wrapped in a component template. The input document is never
//! modified.

use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};

use crate::GenerationOptions;
use crate::analyze::{is_data_attribute, is_vendor_name, is_vendor_namespace_declaration};
use crate::ast::*;
use crate::error::ConvertError;
use crate::format::format_markup;

/// Name used when the caller's name has no usable characters.
pub const DEFAULT_COMPONENT_NAME: &str = "SvgIcon";

/// Generated source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    pub component: String,
    /// CSS module contents, when any styles were extracted.
    pub stylesheet: Option<String>,
}

const COMPONENT_TEMPLATE: &str = r#"{% if css_import %}
import styles from "./{{ name }}.module.css";

{% endif %}
import React{% if memo %}, { memo }{% endif %} from "react";

{% if typescript %}
interface {{ name }}Props extends React.SVGProps<SVGSVGElement> {
  className?: string;
  size?: number | string;
  color?: string;
}

const {{ name }}: React.FC<{{ name }}Props> = ({ className, size = 24, color, ...props }) => {
{% else %}
const {{ name }} = ({ className, size = 24, color, ...props }) => {
{% endif %}
  return (
{{ markup }}
  );
};

export default {% if memo %}memo({{ name }}){% else %}{{ name }}{% endif %};
"#;

/// SVG presentation attributes React spells in camelCase.
const HYPHENATED_ATTRIBUTES: &[&str] = &[
    "accent-height",
    "alignment-baseline",
    "arabic-form",
    "baseline-shift",
    "cap-height",
    "clip-path",
    "clip-rule",
    "color-interpolation",
    "color-interpolation-filters",
    "color-profile",
    "color-rendering",
    "dominant-baseline",
    "enable-background",
    "fill-opacity",
    "fill-rule",
    "flood-color",
    "flood-opacity",
    "font-family",
    "font-size",
    "font-size-adjust",
    "font-stretch",
    "font-style",
    "font-variant",
    "font-weight",
    "glyph-name",
    "glyph-orientation-horizontal",
    "glyph-orientation-vertical",
    "horiz-adv-x",
    "horiz-origin-x",
    "image-rendering",
    "letter-spacing",
    "lighting-color",
    "marker-end",
    "marker-mid",
    "marker-start",
    "overline-position",
    "overline-thickness",
    "paint-order",
    "panose-1",
    "pointer-events",
    "rendering-intent",
    "shape-rendering",
    "stop-color",
    "stop-opacity",
    "strikethrough-position",
    "strikethrough-thickness",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "text-anchor",
    "text-decoration",
    "text-rendering",
    "underline-position",
    "underline-thickness",
    "unicode-bidi",
    "unicode-range",
    "units-per-em",
    "v-alphabetic",
    "v-hanging",
    "v-ideographic",
    "v-mathematical",
    "vector-effect",
    "vert-adv-y",
    "vert-origin-x",
    "vert-origin-y",
    "word-spacing",
    "writing-mode",
    "x-height",
];

/// Generate a component from `doc`.
pub fn generate(
    doc: &Document,
    options: &GenerationOptions,
) -> Result<GeneratedArtifact, ConvertError> {
    if !doc.root_element().is_some_and(|e| e.is("svg")) {
        return Err(ConvertError::Generation(
            "Document root is not an <svg> element".into(),
        ));
    }

    let optimized;
    let doc = if options.pre_optimize {
        let mut copy = doc.clone();
        let removed = pre_optimize(&mut copy);
        tracing::debug!("pre_optimize: removed {} nodes and attributes", removed);
        optimized = copy;
        &optimized
    } else {
        doc
    };

    let mut builder = Builder::new(options);
    let root = builder
        .convert_element(doc, doc.root(), true)
        .ok_or_else(|| ConvertError::Generation("Root element could not be converted".into()))?;

    let stylesheet = builder.stylesheet();
    let printer = Printer {
        style_modules: stylesheet.is_some(),
        normalize_quoting: options.normalize_quoting,
    };

    let mut markup = String::new();
    printer.write_element(&mut markup, &root);
    if options.pretty_print {
        markup = format_markup(&markup);
    }

    let name = sanitize_component_name(&options.component_name);
    let component = render_component(&name, &indent(&markup, 4), stylesheet.is_some(), options)?;

    tracing::debug!(
        "Generated component {}: {} bytes, stylesheet {} bytes",
        name,
        component.len(),
        stylesheet.as_ref().map_or(0, String::len)
    );

    Ok(GeneratedArtifact {
        component,
        stylesheet,
    })
}

fn render_component(
    name: &str,
    markup: &str,
    css_import: bool,
    options: &GenerationOptions,
) -> Result<String, ConvertError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_template("component", COMPONENT_TEMPLATE)?;

    let tmpl = env.get_template("component")?;
    let rendered = tmpl.render(context! {
        name => name,
        markup => markup,
        css_import => css_import,
        memo => options.wrap_in_memoization,
        typescript => options.emit_type_annotations,
    })?;
    Ok(rendered)
}

/// Strip everything but ASCII letters and digits.
///
/// Falls back to [`DEFAULT_COMPONENT_NAME`] when nothing is left, and
/// prefixes `Svg` when the result would start with a digit.
pub fn sanitize_component_name(raw: &str) -> String {
    let name: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();
    match name.chars().next() {
        None => DEFAULT_COMPONENT_NAME.to_string(),
        Some(c) if c.is_ascii_digit() => format!("Svg{}", name),
        Some(_) => name,
    }
}

/// Remove editor leftovers from a document.
///
/// Drops comments, `data-*` attributes, design-tool elements, attributes and
/// namespace declarations, then empty `g` and `defs` elements (innermost
/// first, so nested empty groups all go). Returns how many nodes and
/// attributes were removed.
pub fn pre_optimize(doc: &mut Document) -> usize {
    let mut removed = 0;

    let ids: Vec<NodeId> = doc.descendants(doc.root()).collect();
    for &id in &ids {
        if !doc.is_attached(id) {
            continue;
        }
        let detach = match &doc.node(id).kind {
            NodeKind::Comment(_) => true,
            NodeKind::Element(elem) => is_vendor_name(&elem.name),
            NodeKind::Text(_) | NodeKind::CData(_) => false,
        };
        if detach {
            doc.detach(id);
            removed += 1;
        } else if let Some(elem) = doc.element_mut(id) {
            let before = elem.attributes.len();
            elem.attributes.retain(|a| {
                !is_data_attribute(&a.name)
                    && !is_vendor_name(&a.name)
                    && !is_vendor_namespace_declaration(&a.name)
            });
            removed += before - elem.attributes.len();
        }
    }

    // Reverse document order visits children before their parents.
    for &id in ids.iter().rev() {
        if id == doc.root() || !doc.is_attached(id) {
            continue;
        }
        let removable = doc
            .element(id)
            .is_some_and(|e| e.is("g") || e.is("defs"));
        if removable && is_blank(doc, id) {
            doc.detach(id);
            removed += 1;
        }
    }

    removed
}

/// No children other than whitespace text.
fn is_blank(doc: &Document, id: NodeId) -> bool {
    doc.children(id).all(|child| match &doc.node(child).kind {
        NodeKind::Text(t) => t.trim().is_empty(),
        _ => false,
    })
}

enum JsxNode {
    Element(JsxElement),
    Text(String),
    Comment(String),
    /// Already valid JSX, printed as is.
    Raw(String),
}

struct JsxElement {
    name: String,
    attributes: Vec<JsxAttr>,
    children: Vec<JsxNode>,
}

enum JsxAttr {
    Literal { name: String, value: String },
    Expr { name: String, expr: String },
    /// Class binding, resolved at print time once it is known whether a
    /// stylesheet exists.
    ClassName {
        classes: Vec<ClassToken>,
        forward_prop: bool,
    },
    Spread(String),
}

enum ClassToken {
    /// Written in the source `class` attribute.
    Literal(String),
    /// Allocated for an extracted `style` attribute.
    Extracted(String),
}

struct Builder<'a> {
    options: &'a GenerationOptions,
    style_blocks: Vec<String>,
    rules: Vec<String>,
}

impl<'a> Builder<'a> {
    fn new(options: &'a GenerationOptions) -> Self {
        Self {
            options,
            style_blocks: Vec::new(),
            rules: Vec::new(),
        }
    }

    fn convert_node(&mut self, doc: &Document, id: NodeId) -> Option<JsxNode> {
        match &doc.node(id).kind {
            NodeKind::Element(_) => self.convert_element(doc, id, false).map(JsxNode::Element),
            NodeKind::Text(text) | NodeKind::CData(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| JsxNode::Text(text.to_string()))
            }
            NodeKind::Comment(comment) => {
                (!self.options.strip_comments).then(|| JsxNode::Comment(comment.trim().to_string()))
            }
        }
    }

    fn convert_element(&mut self, doc: &Document, id: NodeId, is_root: bool) -> Option<JsxElement> {
        let elem = doc.element(id)?;
        // React has no way to express namespaced elements.
        if elem.name.prefix.is_some() {
            return None;
        }

        if elem.is("style") {
            return self.convert_style_element(doc, id);
        }

        let mut attributes = Vec::new();
        let mut classes = Vec::new();
        let mut class_slot = None;

        for attr in &elem.attributes {
            let full_name = attr.name.full_name();
            match full_name.as_str() {
                "id" if self.options.strip_identifiers => {}
                "class" => {
                    class_slot.get_or_insert(attributes.len());
                    classes.extend(
                        attr.value
                            .split_whitespace()
                            .map(|c| ClassToken::Literal(c.to_string())),
                    );
                }
                "style" => {
                    let declarations = parse_declarations(&attr.value);
                    if declarations.is_empty() {
                        continue;
                    }
                    if self.options.extract_stylesheet {
                        class_slot.get_or_insert(attributes.len());
                        classes.push(ClassToken::Extracted(self.extract_rule(&declarations)));
                    } else {
                        attributes.push(JsxAttr::Expr {
                            name: "style".into(),
                            expr: style_object(&declarations),
                        });
                    }
                }
                "width" | "height" if is_root => attributes.push(JsxAttr::Expr {
                    name: full_name,
                    expr: "size".into(),
                }),
                "fill" | "stroke" if is_root && attr.value == "currentColor" => {
                    attributes.push(JsxAttr::Expr {
                        name: full_name,
                        expr: r#"color || "currentColor""#.into(),
                    })
                }
                _ => {
                    if let Some(name) = react_attribute_name(&attr.name) {
                        attributes.push(JsxAttr::Literal {
                            name,
                            value: attr.value.clone(),
                        });
                    }
                }
            }
        }

        if !classes.is_empty() || is_root {
            let slot = class_slot.unwrap_or(attributes.len());
            attributes.insert(
                slot,
                JsxAttr::ClassName {
                    classes,
                    forward_prop: is_root,
                },
            );
        }
        if is_root {
            attributes.push(JsxAttr::Spread("props".into()));
        }

        let children = doc
            .children(id)
            .filter_map(|child| self.convert_node(doc, child))
            .collect();

        Some(JsxElement {
            name: elem.name.local.clone(),
            attributes,
            children,
        })
    }

    fn convert_style_element(&mut self, doc: &Document, id: NodeId) -> Option<JsxElement> {
        let css = doc.text_content(id).trim().to_string();

        if self.options.extract_stylesheet {
            if !css.is_empty() {
                self.style_blocks.push(css);
            }
            return None;
        }

        let children = if css.is_empty() {
            Vec::new()
        } else {
            vec![JsxNode::Raw(template_literal(&css))]
        };
        Some(JsxElement {
            name: "style".into(),
            attributes: Vec::new(),
            children,
        })
    }

    /// Record a rule for the declarations and return its class name.
    fn extract_rule(&mut self, declarations: &[(String, String)]) -> String {
        let class = format!("svg_element_{}", self.rules.len());
        let mut rule = format!(".{} {{\n", class);
        for (property, value) in declarations {
            rule.push_str(&format!("  {}: {};\n", property, value));
        }
        rule.push_str("}\n");
        self.rules.push(rule);
        class
    }

    fn stylesheet(&self) -> Option<String> {
        let mut css = String::new();
        for block in &self.style_blocks {
            css.push_str(block);
            css.push('\n');
        }
        if !self.rules.is_empty() {
            if !css.is_empty() {
                css.push('\n');
            }
            css.push_str("/* Extracted inline styles */\n");
            for rule in &self.rules {
                css.push_str(rule);
            }
        }
        (!css.is_empty()).then_some(css)
    }
}

/// React's name for an SVG attribute, or `None` if it cannot be expressed.
fn react_attribute_name(name: &QName) -> Option<String> {
    match name.prefix.as_deref() {
        None if HYPHENATED_ATTRIBUTES.contains(&name.local.as_str()) => {
            Some(camel_case(&name.local))
        }
        None => Some(name.local.clone()),
        Some("xlink") => matches!(
            name.local.as_str(),
            "actuate" | "arcrole" | "href" | "role" | "show" | "title" | "type"
        )
        .then(|| format!("xlink{}", capitalize(&name.local))),
        Some("xml") => matches!(name.local.as_str(), "base" | "lang" | "space")
            .then(|| format!("xml{}", capitalize(&name.local))),
        Some("xmlns") if name.local == "xlink" => Some("xmlnsXlink".into()),
        Some(_) => None,
    }
}

fn camel_case(name: &str) -> String {
    let mut parts = name.split('-');
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        out.push_str(&capitalize(part));
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Split a `style` attribute into `(property, value)` pairs.
fn parse_declarations(style: &str) -> Vec<(String, String)> {
    split_declarations(style)
        .into_iter()
        .filter_map(|decl| {
            let (property, value) = decl.split_once(':')?;
            let (property, value) = (property.trim(), value.trim());
            (!property.is_empty() && !value.is_empty())
                .then(|| (property.to_string(), value.to_string()))
        })
        .collect()
}

/// Split on `;` outside parentheses and quotes.
fn split_declarations(style: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut start = 0;

    for (i, c) in style.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                parts.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&style[start..]);
    parts
}

/// `{ strokeWidth: "2", "--accent": "red" }`
fn style_object(declarations: &[(String, String)]) -> String {
    let fields: Vec<String> = declarations
        .iter()
        .map(|(property, value)| format!("{}: {}", style_key(property), js_string(value)))
        .collect();
    format!("{{ {} }}", fields.join(", "))
}

fn style_key(property: &str) -> String {
    if property.starts_with("--") {
        return js_string(property);
    }
    match property.strip_prefix('-') {
        // -webkit-mask -> WebkitMask
        Some(vendor) => capitalize(&camel_case(vendor)),
        None => camel_case(property),
    }
}

/// Quote `s` as a JavaScript string literal.
fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// `{`...`}` holding `css` verbatim.
fn template_literal(css: &str) -> String {
    let escaped = css
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${");
    format!("{{`{}`}}", escaped)
}

fn indent(markup: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    markup
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

struct Printer {
    style_modules: bool,
    normalize_quoting: bool,
}

impl Printer {
    fn write_node(&self, out: &mut String, node: &JsxNode) {
        match node {
            JsxNode::Element(elem) => self.write_element(out, elem),
            JsxNode::Raw(code) => out.push_str(code),
            JsxNode::Text(text) => {
                if text.contains(['{', '}', '<', '>', '&']) {
                    out.push('{');
                    out.push_str(&js_string(text));
                    out.push('}');
                } else {
                    out.push_str(text);
                }
            }
            JsxNode::Comment(comment) => {
                out.push_str("{/* ");
                out.push_str(&comment.replace("*/", "* /"));
                out.push_str(" */}");
            }
        }
    }

    fn write_element(&self, out: &mut String, elem: &JsxElement) {
        out.push('<');
        out.push_str(&elem.name);
        for attr in &elem.attributes {
            self.write_attribute(out, attr);
        }

        if elem.children.is_empty() {
            out.push_str(" />");
            return;
        }

        out.push('>');
        for child in &elem.children {
            self.write_node(out, child);
        }
        out.push_str("</");
        out.push_str(&elem.name);
        out.push('>');
    }

    fn write_attribute(&self, out: &mut String, attr: &JsxAttr) {
        match attr {
            JsxAttr::Literal { name, value } => {
                out.push(' ');
                out.push_str(name);
                out.push('=');
                self.write_quoted(out, value);
            }
            JsxAttr::Expr { name, expr } => {
                out.push_str(&format!(" {}={{{}}}", name, expr));
            }
            JsxAttr::ClassName {
                classes,
                forward_prop,
            } => self.write_class_name(out, classes, *forward_prop),
            JsxAttr::Spread(expr) => {
                out.push_str(&format!(" {{...{}}}", expr));
            }
        }
    }

    fn write_class_name(&self, out: &mut String, classes: &[ClassToken], forward_prop: bool) {
        // Literal text or `${expr}` interpolations, in order.
        let mut parts: Vec<(bool, String)> = Vec::new();
        for class in classes {
            match class {
                ClassToken::Literal(name) if !self.style_modules => {
                    parts.push((false, name.clone()))
                }
                ClassToken::Literal(name) | ClassToken::Extracted(name) => {
                    parts.push((true, module_reference(name)))
                }
            }
        }

        if parts.is_empty() {
            if forward_prop {
                out.push_str(" className={className}");
            }
            return;
        }

        if !forward_prop && parts.iter().all(|(is_expr, _)| !is_expr) {
            let value = parts
                .iter()
                .map(|(_, text)| text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(" className=");
            self.write_quoted(out, &value);
            return;
        }

        if !forward_prop && parts.len() == 1 {
            out.push_str(&format!(" className={{{}}}", parts[0].1));
            return;
        }

        if forward_prop {
            parts.push((true, r#"className || """#.into()));
        }
        let template = parts
            .iter()
            .map(|(is_expr, text)| {
                if *is_expr {
                    format!("${{{}}}", text)
                } else {
                    text.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!(" className={{`{}`}}", template));
    }

    fn write_quoted(&self, out: &mut String, value: &str) {
        let escaped = value.replace('&', "&amp;");
        if !self.normalize_quoting && escaped.contains('"') && !escaped.contains('\'') {
            out.push('\'');
            out.push_str(&escaped);
            out.push('\'');
        } else {
            out.push('"');
            out.push_str(&escaped.replace('"', "&quot;"));
            out.push('"');
        }
    }
}

/// `styles.name`, or `styles["name"]` when `name` is not an identifier.
fn module_reference(name: &str) -> String {
    let is_identifier = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        format!("styles.{}", name)
    } else {
        format!("styles[{}]", js_string(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;
    use crate::serialize::serialize;

    fn options() -> GenerationOptions {
        GenerationOptions::default()
    }

    fn plain() -> GenerationOptions {
        GenerationOptions {
            wrap_in_memoization: false,
            emit_type_annotations: false,
            pretty_print: false,
            ..GenerationOptions::default()
        }
    }

    fn generate_str(svg: &str, options: &GenerationOptions) -> GeneratedArtifact {
        generate(&parse_svg(svg).unwrap(), options).unwrap()
    }

    #[test]
    fn test_sanitize_component_name() {
        assert_eq!(sanitize_component_name("My Icon!"), "MyIcon");
        assert_eq!(sanitize_component_name("arrow-left_2"), "arrowleft2");
        assert_eq!(sanitize_component_name("!!!"), "SvgIcon");
        assert_eq!(sanitize_component_name(""), "SvgIcon");
        assert_eq!(sanitize_component_name("24px icon"), "Svg24pxicon");
        assert_eq!(sanitize_component_name("Ícono"), "cono");
    }

    #[test]
    fn test_plain_component() {
        let artifact = generate_str(
            r#"<svg viewBox="0 0 1 1"><rect/></svg>"#,
            &GenerationOptions {
                component_name: "Dot".into(),
                ..plain()
            },
        );
        assert_eq!(
            artifact.component,
            r#"import React from "react";

const Dot = ({ className, size = 24, color, ...props }) => {
  return (
    <svg viewBox="0 0 1 1" className={className} {...props}><rect /></svg>
  );
};

export default Dot;
"#
        );
        assert_eq!(artifact.stylesheet, None);
    }

    #[test]
    fn test_typed_memo_component() {
        let artifact = generate_str(
            r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor"><path d="M0 0" stroke-width="2"/></svg>"#,
            &GenerationOptions {
                component_name: "Layers".into(),
                ..options()
            },
        );
        assert_eq!(
            artifact.component,
            r#"import React, { memo } from "react";

interface LayersProps extends React.SVGProps<SVGSVGElement> {
  className?: string;
  size?: number | string;
  color?: string;
}

const Layers: React.FC<LayersProps> = ({ className, size = 24, color, ...props }) => {
  return (
    <svg width={size} height={size} viewBox="0 0 24 24" fill="none" stroke={color || "currentColor"} className={className} {...props}>
      <path d="M0 0" strokeWidth="2" />
    </svg>
  );
};

export default memo(Layers);
"#
        );
    }

    #[test]
    fn test_attribute_names() {
        let artifact = generate_str(
            r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 1 1"><use xlink:href="#a" fill-rule="evenodd" stroke-linecap="round" class="x y" aria-label="icon" foo:bar="1"/><foo:thing/></svg>"##,
            &plain(),
        );
        let c = &artifact.component;
        assert!(c.contains(r#"xmlnsXlink="http://www.w3.org/1999/xlink""#));
        assert!(c.contains(r##"<use xlinkHref="#a" fillRule="evenodd" strokeLinecap="round" className="x y" aria-label="icon" />"##));
        assert!(!c.contains("foo"));
    }

    #[test]
    fn test_identifier_and_comment_stripping() {
        let svg = r#"<svg viewBox="0 0 1 1"><!-- keep me --><rect id="r"/></svg>"#;
        let stripped = generate_str(
            svg,
            &GenerationOptions {
                pre_optimize: false,
                ..plain()
            },
        );
        assert!(!stripped.component.contains("id="));
        assert!(!stripped.component.contains("keep me"));

        let kept = generate_str(
            svg,
            &GenerationOptions {
                pre_optimize: false,
                strip_identifiers: false,
                strip_comments: false,
                ..plain()
            },
        );
        assert!(kept.component.contains(r#"<rect id="r" />"#));
        assert!(kept.component.contains("{/* keep me */}"));
    }

    #[test]
    fn test_stylesheet_extraction() {
        let artifact = generate_str(
            r#"<svg viewBox="0 0 1 1"><style>.a { fill: red; }</style><rect class="a" style="fill: blue; stroke-width: 2"/><circle style="opacity:.5"/></svg>"#,
            &GenerationOptions {
                component_name: "Box".into(),
                ..plain()
            },
        );
        assert_eq!(
            artifact.stylesheet.as_deref(),
            Some(
                ".a { fill: red; }\n\n/* Extracted inline styles */\n.svg_element_0 {\n  fill: blue;\n  stroke-width: 2;\n}\n.svg_element_1 {\n  opacity: .5;\n}\n"
            )
        );
        let c = &artifact.component;
        assert!(c.starts_with("import styles from \"./Box.module.css\";\n\nimport React from \"react\";"));
        assert!(c.contains("<rect className={`${styles.a} ${styles.svg_element_0}`} />"));
        assert!(c.contains("<circle className={styles.svg_element_1} />"));
        assert!(!c.contains("<style"));
    }

    #[test]
    fn test_declarations_keep_semicolons_in_values() {
        assert_eq!(
            parse_declarations("background:url(data:image/png;base64,AAAA); fill: red;"),
            vec![
                ("background".to_string(), "url(data:image/png;base64,AAAA)".to_string()),
                ("fill".to_string(), "red".to_string()),
            ]
        );
        assert_eq!(
            parse_declarations(r#"font-family: "a;b", serif"#),
            vec![("font-family".to_string(), r#""a;b", serif"#.to_string())]
        );
    }

    #[test]
    fn test_root_classes_merge_with_prop() {
        let artifact = generate_str(r#"<svg viewBox="0 0 1 1" class="icon"/>"#, &plain());
        assert!(artifact
            .component
            .contains(r#"<svg viewBox="0 0 1 1" className={`icon ${className || ""}`} {...props} />"#));
    }

    #[test]
    fn test_inline_styles_without_extraction() {
        let artifact = generate_str(
            r#"<svg viewBox="0 0 1 1"><style>.a{}</style><rect style="stroke-width: 2; --accent: red; -webkit-mask: none"/></svg>"#,
            &GenerationOptions {
                extract_stylesheet: false,
                ..plain()
            },
        );
        let c = &artifact.component;
        assert!(c.contains(r#"<rect style={{ strokeWidth: "2", "--accent": "red", WebkitMask: "none" }} />"#));
        assert!(c.contains("<style>{`.a{}`}</style>"));
        assert_eq!(artifact.stylesheet, None);
    }

    #[test]
    fn test_quoting() {
        let svg = r#"<svg viewBox="0 0 1 1"><text font-family='"Fira Sans"'>a &amp; b</text></svg>"#;
        let strict = generate_str(svg, &plain());
        assert!(strict.component.contains(r#"<text fontFamily="&quot;Fira Sans&quot;">{"a & b"}</text>"#));

        let loose = generate_str(
            svg,
            &GenerationOptions {
                normalize_quoting: false,
                ..plain()
            },
        );
        assert!(loose.component.contains(r#"fontFamily='"Fira Sans"'"#));
    }

    #[test]
    fn test_pre_optimize() {
        let mut doc = parse_svg(
            r#"<svg viewBox="0 0 1 1" xmlns:inkscape="http://www.inkscape.org" data-name="x"><!-- c --><g><g> </g></g><defs/><inkscape:grid/><rect figma:id="1" data-x="2" fill="red"/></svg>"#,
        )
        .unwrap();
        let removed = pre_optimize(&mut doc);
        assert_eq!(serialize(&doc), r#"<svg viewBox="0 0 1 1"><rect fill="red"/></svg>"#);
        // comment, 2 g, defs, vendor element, 2 root attrs, 2 rect attrs
        assert_eq!(removed, 9);
    }

    #[test]
    fn test_generate_does_not_mutate_input() {
        let doc = parse_svg(r#"<svg viewBox="0 0 1 1"><!-- c --><g/><rect id="a" style="fill:red"/></svg>"#)
            .unwrap();
        let before = serialize(&doc);
        generate(&doc, &options()).unwrap();
        assert_eq!(serialize(&doc), before);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let doc = parse_svg(
            r#"<svg viewBox="0 0 1 1"><style>.b{}</style><g style="fill:red"><rect class="b" style="x:1"/></g></svg>"#,
        )
        .unwrap();
        let first = generate(&doc, &options()).unwrap();
        let second = generate(&doc, &options()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_svg_root_is_generation_error() {
        let doc = Document::new(Element::new("html"));
        let err = generate(&doc, &options()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Generation);
    }
}
