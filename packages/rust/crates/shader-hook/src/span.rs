//! Balanced-brace scanning.
//!
//! Locates the body of a zero-argument function in free-form text. The scan
//! is a single linear pass with a depth counter; braces inside string or
//! comment literals are counted like any other brace. Shader entry points in
//! the supported subset do not contain such literals, so this is a known
//! limitation rather than something to paper over with a lexer.

use regex::Regex;

use crate::types::{Span, StepOutcome};

/// Why a body could not be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMiss {
    /// No header matched.
    HeaderMissing,
    /// The opening brace is never closed.
    Unbalanced,
}

impl From<ScanMiss> for StepOutcome {
    fn from(miss: ScanMiss) -> Self {
        match miss {
            ScanMiss::HeaderMissing => StepOutcome::AnchorNotFound,
            ScanMiss::Unbalanced => StepOutcome::MalformedStructure,
        }
    }
}

/// Span from the `{` at `open` through its matching `}` (inclusive).
///
/// # Errors
/// `Unbalanced` when depth never returns to zero; `HeaderMissing` when
/// `open` is not a `{`.
pub fn match_braces(text: &str, open: usize) -> Result<Span, ScanMiss> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return Err(ScanMiss::HeaderMissing);
    }

    let mut depth = 0usize;
    for (idx, &byte) in bytes.iter().enumerate().skip(open) {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(Span::new(open, idx + 1));
                }
            }
            _ => {}
        }
    }
    Err(ScanMiss::Unbalanced)
}

/// Body (braces included) of the first block whose header matches `header`.
///
/// `header` must end with the opening brace.
///
/// # Errors
/// See [`ScanMiss`].
pub fn find_block(text: &str, header: &Regex) -> Result<Span, ScanMiss> {
    let found = header.find(text).ok_or(ScanMiss::HeaderMissing)?;
    let open = text[found.start()..found.end()]
        .rfind('{')
        .map(|rel| found.start() + rel)
        .ok_or(ScanMiss::HeaderMissing)?;
    match_braces(text, open)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::entry_point_header;

    fn main_header() -> Regex {
        entry_point_header("main").expect("compile")
    }

    #[test]
    fn test_single_line_body() {
        let text = "void main(){ gl_Position = ftransform(); }";
        let span = find_block(text, &main_header()).expect("body");
        assert_eq!(span.slice(text), "{ gl_Position = ftransform(); }");
    }

    #[test]
    fn test_nested_blocks() {
        let text = "void main() {\n  if (a) { b(); } else { for(;;) { c(); } }\n}\nvoid other() {}";
        let span = find_block(text, &main_header()).expect("body");
        assert!(span.slice(text).ends_with("}\n}"));
        assert!(!span.slice(text).contains("other"));
    }

    #[test]
    fn test_first_definition_wins() {
        let text = "void main() { a(); }\nvoid main() { b(); }";
        let span = find_block(text, &main_header()).expect("body");
        assert_eq!(span.slice(text), "{ a(); }");
    }

    #[test]
    fn test_missing_header() {
        let text = "void other() { }";
        assert_eq!(
            find_block(text, &main_header()),
            Err(ScanMiss::HeaderMissing)
        );
    }

    #[test]
    fn test_truncated_body() {
        let text = "void main() {\n  if (x) {\n    y();\n  }\n";
        assert_eq!(find_block(text, &main_header()), Err(ScanMiss::Unbalanced));
    }

    #[test]
    fn test_match_braces_requires_brace() {
        assert_eq!(match_braces("abc", 1), Err(ScanMiss::HeaderMissing));
        assert_eq!(match_braces("a{}", 1), Ok(Span::new(1, 3)));
    }
}
