//! Re-indentation of JSX markup.
//!
//! The formatter only moves whitespace between tokens: every tag, expression
//! container and (trimmed) text run ends up on its own line, indented two
//! spaces per nesting level. Formatting already formatted markup is a no-op.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Open,
    Close,
    SelfClosing,
    Other,
}

/// Put each tag on its own line, indented by nesting depth.
pub fn format_markup(markup: &str) -> String {
    let mut lines = Vec::new();
    let mut depth: usize = 0;

    for (kind, token) in tokenize(markup) {
        if kind == TokenKind::Close {
            depth = depth.saturating_sub(1);
        }
        lines.push(format!("{}{}", "  ".repeat(depth), token));
        if kind == TokenKind::Open {
            depth += 1;
        }
    }

    lines.join("\n")
}

fn tokenize(input: &str) -> Vec<(TokenKind, &str)> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        let end = match bytes[pos] {
            b'<' => scan_tag(bytes, pos),
            b'{' => scan_expression(bytes, pos),
            _ => bytes[pos..]
                .iter()
                .position(|&b| b == b'<' || b == b'{')
                .map_or(bytes.len(), |offset| pos + offset),
        };

        let token = input[pos..end].trim();
        pos = end;
        if token.is_empty() {
            continue;
        }
        tokens.push((classify(token), token));
    }

    tokens
}

fn classify(token: &str) -> TokenKind {
    if token.starts_with("</") {
        TokenKind::Close
    } else if token.starts_with("<!") || token.starts_with("<?") || !token.starts_with('<') {
        TokenKind::Other
    } else if token.ends_with("/>") {
        TokenKind::SelfClosing
    } else {
        TokenKind::Open
    }
}

/// End of the tag starting at `start`: one past its `>`, ignoring any `>`
/// inside quoted values or `{...}` expressions. Runs to the end of input if
/// the tag is never closed.
fn scan_tag(bytes: &[u8], start: usize) -> usize {
    let mut quote = None;
    let mut braces = 0usize;
    let mut pos = start + 1;

    while pos < bytes.len() {
        let b = bytes[pos];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' | b'`' => quote = Some(b),
                b'{' => braces += 1,
                b'}' => braces = braces.saturating_sub(1),
                b'>' if braces == 0 => return pos + 1,
                _ => {}
            },
        }
        pos += 1;
    }

    bytes.len()
}

/// End of the balanced `{...}` starting at `start`.
fn scan_expression(bytes: &[u8], start: usize) -> usize {
    let mut quote = None;
    let mut depth = 0usize;
    let mut pos = start;

    while pos < bytes.len() {
        let b = bytes[pos];
        match quote {
            Some(_) if b == b'\\' => pos += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' | b'`' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return pos + 1;
                    }
                }
                _ => {}
            },
        }
        pos += 1;
    }

    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_nesting() {
        let formatted = format_markup(r#"<svg a="1"><g><path d="M0 0" /></g><rect /></svg>"#);
        assert_eq!(
            formatted,
            "<svg a=\"1\">\n  <g>\n    <path d=\"M0 0\" />\n  </g>\n  <rect />\n</svg>"
        );
    }

    #[test]
    fn test_format_keeps_expressions_whole() {
        let formatted = format_markup(
            r#"<svg className={`${a} > b`} style={{ x: "}" }}><text>{"a < b"}</text>{/* c */}</svg>"#,
        );
        assert_eq!(
            formatted,
            "<svg className={`${a} > b`} style={{ x: \"}\" }}>\n  <text>\n    {\"a < b\"}\n  </text>\n  {/* c */}\n</svg>"
        );
    }

    #[test]
    fn test_format_quoted_angle_brackets() {
        let formatted = format_markup(r#"<a title="x > y">hi</a>"#);
        assert_eq!(formatted, "<a title=\"x > y\">\n  hi\n</a>");
    }

    #[test]
    fn test_format_is_idempotent() {
        let inputs = [
            r#"<svg><g><rect /></g></svg>"#,
            "  <a>\n\n text  more \n</a> trailing",
            "<a><b>",
            "</a></b>",
            "<unterminated attr='x",
            "{ open expression",
            "",
        ];
        for input in inputs {
            let once = format_markup(input);
            assert_eq!(format_markup(&once), once, "input: {:?}", input);
        }
    }
}
