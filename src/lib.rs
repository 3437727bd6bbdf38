//! svgjsx - SVG to React component converter
//!
//! svgjsx cleans an SVG document with a configurable set of passes and turns
//! the result into the source of a React component, optionally with a CSS
//! module holding its styles.

mod analyze;
mod ast;
mod error;
mod format;
mod generate;
mod optimize;
mod parse;
mod path;
mod pipeline;
mod serialize;

use serde::{Deserialize, Serialize};

pub use analyze::*;
pub use ast::*;
pub use error::*;
pub use format::*;
pub use generate::*;
pub use optimize::*;
pub use parse::*;
pub use path::*;
pub use pipeline::*;
pub use serialize::*;

/// Largest supported number of fractional digits for precision rounding.
pub const MAX_PRECISION: u8 = 4;

/// Convert an SVG string with default settings.
pub fn convert(svg: &str) -> Result<Conversion, ConvertError> {
    convert_with_options(svg, &ConvertOptions::default())
}

/// Convert an SVG string with custom options, under the default [`Config`].
pub fn convert_with_options(svg: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    Converter::default().convert(svg, options)
}

/// Which cleaning passes run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CleaningOptions {
    /// Remove elements structurally identical to an earlier one
    pub remove_duplicates: bool,
    /// Remove unreferenced definitions under `<defs>`
    pub cleanup_definitions: bool,
    /// Round decimal attribute values to `precision` digits
    pub optimize_precision: bool,
    /// Drop redundant separators and command letters from path data
    pub simplify_paths: bool,
    /// Rewrite `rgb()` fills and strokes as hex
    pub optimize_colors: bool,
    /// Trim text nodes, dropping empty ones
    pub normalize_whitespace: bool,
    /// Remove empty `<style>` elements
    pub remove_unused_styles: bool,
    /// Merge sibling paths with identical paint (lossy)
    pub merge_paths: bool,
    /// Fractional digits kept by precision rounding (default: 2, at most 4)
    pub precision: u8,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            remove_duplicates: true,
            cleanup_definitions: true,
            optimize_precision: true,
            simplify_paths: true,
            optimize_colors: true,
            normalize_whitespace: true,
            remove_unused_styles: true,
            merge_paths: false, // can change how overlapping shapes fill
            precision: 2,
        }
    }
}

impl CleaningOptions {
    /// Every pass disabled.
    pub fn none() -> Self {
        Self {
            remove_duplicates: false,
            cleanup_definitions: false,
            optimize_precision: false,
            simplify_paths: false,
            optimize_colors: false,
            normalize_whitespace: false,
            remove_unused_styles: false,
            merge_paths: false,
            ..Self::default()
        }
    }

    /// Whether any pass would run.
    pub fn any_enabled(&self) -> bool {
        self.remove_duplicates
            || self.cleanup_definitions
            || self.optimize_precision
            || self.simplify_paths
            || self.optimize_colors
            || self.normalize_whitespace
            || self.remove_unused_styles
            || self.merge_paths
    }

    /// `precision`, clamped to [`MAX_PRECISION`].
    pub fn precision(&self) -> u8 {
        self.precision.min(MAX_PRECISION)
    }
}

/// How the component is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOptions {
    /// Remove `id` attributes
    pub strip_identifiers: bool,
    /// Always write attribute values in double quotes
    pub normalize_quoting: bool,
    /// Export the component wrapped in `memo(...)`
    pub wrap_in_memoization: bool,
    /// Emit a TypeScript props interface and `React.FC` annotation
    pub emit_type_annotations: bool,
    /// Drop comments instead of emitting them as JSX comments
    pub strip_comments: bool,
    /// Indent the markup one tag per line
    pub pretty_print: bool,
    /// Move inline and `<style>` styles into a CSS module
    pub extract_stylesheet: bool,
    /// Remove editor metadata and empty groups first
    pub pre_optimize: bool,
    /// Component name; sanitized before use
    pub component_name: String,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            strip_identifiers: true,
            normalize_quoting: true,
            wrap_in_memoization: true,
            emit_type_annotations: true,
            strip_comments: true,
            pretty_print: true,
            extract_stylesheet: true,
            pre_optimize: true,
            component_name: DEFAULT_COMPONENT_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_defaults() {
        let conversion = convert(r#"<svg viewBox="0 0 24 24"><path d="M1 1"/></svg>"#).unwrap();
        assert!(conversion.artifact.component.contains("const SvgIcon: React.FC<SvgIconProps>"));
        assert!(conversion.artifact.component.ends_with("export default memo(SvgIcon);\n"));
    }

    #[test]
    fn test_precision_is_clamped() {
        let options = CleaningOptions {
            precision: 9,
            ..CleaningOptions::default()
        };
        assert_eq!(options.precision(), MAX_PRECISION);
    }

    #[test]
    fn test_none_disables_everything() {
        assert!(!CleaningOptions::none().any_enabled());
        assert!(CleaningOptions::default().any_enabled());
    }
}
