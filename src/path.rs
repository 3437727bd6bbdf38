//! SVG path data tokenizing and textual simplification.
//!
//! SVG path syntax: https://www.w3.org/TR/SVG/paths.html
//!
//! Numbers are kept as written. Only separators and redundant command
//! letters change, so the rendered shape never does.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("Invalid path data: {0}")]
pub struct PathError(String);

/// One command letter and the arguments that follow it.
///
/// `args.len()` is always a multiple of the command's arity; extra groups
/// are implicit repetitions (after `M`/`m` they are implicit line-tos).
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    pub command: char,
    pub args: Vec<&'a str>,
}

/// Number of arguments one occurrence of `command` takes.
fn arity(command: char) -> Option<usize> {
    match command.to_ascii_lowercase() {
        'm' | 'l' | 't' => Some(2),
        'h' | 'v' => Some(1),
        'c' => Some(6),
        's' | 'q' => Some(4),
        'a' => Some(7),
        'z' => Some(0),
        _ => None,
    }
}

/// Split path data into segments.
pub fn tokenize(d: &str) -> Result<Vec<Segment<'_>>, PathError> {
    let mut parser = PathParser::new(d);
    parser.parse()
}

/// Rewrite path data without textual redundancy.
///
/// - separators become single spaces,
/// - consecutive `L`/`l` segments share one letter,
/// - an `L` right after `M` (`l` after `m`) drops its letter,
/// - an absolute `M` with one coordinate pair followed by another `M` is dropped,
/// - repeated close-path commands collapse into one.
pub fn simplify_path_data(d: &str) -> Result<String, PathError> {
    let segments = simplify(tokenize(d)?);
    Ok(write_segments(&segments))
}

fn simplify(segments: Vec<Segment<'_>>) -> Vec<Segment<'_>> {
    let mut out: Vec<Segment<'_>> = Vec::with_capacity(segments.len());

    for seg in segments {
        if let Some(last) = out.last_mut() {
            match (last.command, seg.command) {
                ('L', 'L') | ('l', 'l') | ('M', 'L') | ('m', 'l') => {
                    last.args.extend(seg.args);
                    continue;
                }
                ('M', 'M') if last.args.len() == 2 => {
                    *last = seg;
                    continue;
                }
                (a, b) if a.eq_ignore_ascii_case(&'z') && b.eq_ignore_ascii_case(&'z') => {
                    continue;
                }
                _ => {}
            }
        }
        out.push(seg);
    }

    out
}

fn write_segments(segments: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for seg in segments {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push(seg.command);
        for (i, arg) in seg.args.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(arg);
        }
    }
    out
}

struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn parse(&mut self) -> Result<Vec<Segment<'a>>, PathError> {
        let mut segments = Vec::new();

        self.skip_whitespace();

        while !self.is_eof() {
            let command = match self.next() {
                Some(c) if c.is_ascii_alphabetic() => c,
                Some(c) => return Err(PathError(format!("Expected command letter, got: {}", c))),
                None => break,
            };
            let arity =
                arity(command).ok_or_else(|| PathError(format!("Unknown command: {}", command)))?;

            let mut args = Vec::new();
            if arity > 0 {
                loop {
                    for i in 0..arity {
                        let is_flag = command.eq_ignore_ascii_case(&'a') && (i == 3 || i == 4);
                        let arg = if is_flag {
                            self.parse_flag()?
                        } else {
                            self.parse_number()?
                        };
                        args.push(arg);
                    }
                    self.skip_whitespace_and_comma();
                    if !self.at_number_start() {
                        break;
                    }
                }
            } else {
                self.skip_whitespace_and_comma();
            }

            segments.push(Segment { command, args });
        }

        Ok(segments)
    }

    fn parse_number(&mut self) -> Result<&'a str, PathError> {
        self.skip_whitespace_and_comma();

        let start = self.pos;

        // Optional sign
        if self.peek() == Some('-') || self.peek() == Some('+') {
            self.next();
        }

        // Integer part
        let mut digits = 0;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.next();
            digits += 1;
        }

        // Decimal part
        if self.peek() == Some('.') {
            self.next();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.next();
                digits += 1;
            }
        }

        if digits == 0 {
            return Err(PathError(format!(
                "Expected number at offset {}",
                start
            )));
        }

        // Exponent, only when digits follow
        if matches!(self.peek(), Some('e' | 'E')) {
            let rest = &self.input[self.pos + 1..];
            let rest = rest.strip_prefix(['-', '+']).unwrap_or(rest);
            if rest.starts_with(|c: char| c.is_ascii_digit()) {
                self.next();
                if self.peek() == Some('-') || self.peek() == Some('+') {
                    self.next();
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.next();
                }
            }
        }

        Ok(&self.input[start..self.pos])
    }

    fn parse_flag(&mut self) -> Result<&'a str, PathError> {
        self.skip_whitespace_and_comma();
        let start = self.pos;
        match self.next() {
            Some('0') | Some('1') => Ok(&self.input[start..self.pos]),
            Some(c) => Err(PathError(format!("Expected flag (0 or 1), got: {}", c))),
            None => Err(PathError("Expected flag".into())),
        }
    }

    fn at_number_start(&self) -> bool {
        self.peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.next();
        }
    }

    fn skip_whitespace_and_comma(&mut self) {
        self.skip_whitespace();
        if self.peek() == Some(',') {
            self.next();
        }
        self.skip_whitespace();
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_path() {
        let segs = tokenize("M10 20 L30 40").unwrap();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].args, vec!["10", "20"]);
    }

    #[test]
    fn test_tokenize_implicit_repeats() {
        let segs = tokenize("m10,20 30,40 z").unwrap();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].command, 'm');
        assert_eq!(segs[0].args, vec!["10", "20", "30", "40"]);
        assert_eq!(segs[1].command, 'z');
    }

    #[test]
    fn test_tokenize_compact_numbers() {
        let segs = tokenize("M.5.5-1-1e-2").unwrap();
        assert_eq!(segs[0].args, vec![".5", ".5", "-1", "-1e-2"]);
    }

    #[test]
    fn test_tokenize_arc_flags() {
        let segs = tokenize("M0 0a1 1 0 0110 10").unwrap();
        assert_eq!(segs[1].args, vec!["1", "1", "0", "0", "1", "10", "10"]);
    }

    #[test]
    fn test_tokenize_errors() {
        assert!(tokenize("10 20").is_err());
        assert!(tokenize("M10").is_err());
        assert!(tokenize("M 0 0 X 1 1").is_err());
        assert!(tokenize("M0 0 A 1 1 0 2 0 5 5").is_err());
    }

    #[test]
    fn test_simplify_whitespace() {
        assert_eq!(
            simplify_path_data("  M 10   20\n\tC 1,2 3,4 5,6  ").unwrap(),
            "M10 20 C1 2 3 4 5 6"
        );
    }

    #[test]
    fn test_simplify_repeated_line_letters() {
        assert_eq!(simplify_path_data("M0 0 L1 1 L2 2").unwrap(), "M0 0 1 1 2 2");
        assert_eq!(simplify_path_data("M0 0 H5 L1 1 L2 2").unwrap(), "M0 0 H5 L1 1 2 2");
        assert_eq!(simplify_path_data("m0 0 l1 1 l2 2").unwrap(), "m0 0 1 1 2 2");
        // Mixed case means different coordinate systems.
        assert_eq!(simplify_path_data("M0 0 H1 L1 1 l2 2").unwrap(), "M0 0 H1 L1 1 l2 2");
    }

    #[test]
    fn test_simplify_redundant_moves() {
        assert_eq!(simplify_path_data("M0 0 M5 5 L6 6").unwrap(), "M5 5 6 6");
        // A move with implicit line-tos draws something and must stay.
        assert_eq!(
            simplify_path_data("M0 0 1 1 M5 5 L6 6").unwrap(),
            "M0 0 1 1 M5 5 6 6"
        );
    }

    #[test]
    fn test_simplify_repeated_close() {
        assert_eq!(simplify_path_data("M0 0 L1 1 Z Z").unwrap(), "M0 0 1 1 Z");
        assert_eq!(simplify_path_data("M0 0 L1 1 zZz").unwrap(), "M0 0 1 1 z");
    }

    #[test]
    fn test_simplify_does_not_merge_unrelated_letters() {
        // "ZM" must not be collapsed into a single letter.
        assert_eq!(
            simplify_path_data("M0 0 L1 1 Z M2 2 L3 3 Z").unwrap(),
            "M0 0 1 1 Z M2 2 3 3 Z"
        );
    }

    #[test]
    fn test_simplify_is_stable() {
        let once = simplify_path_data("M 1 2 L 3 4 L 5 6 Z Z M 7 8 M 9 10").unwrap();
        let twice = simplify_path_data(&once).unwrap();
        assert_eq!(once, twice);
    }
}
