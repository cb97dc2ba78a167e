//! Anchor location.
//!
//! Two anchor families: the header run at the top of the file (version
//! pragma followed by import pragmas) and single statements inside a body
//! region. Every search returns the first match in document order.

use regex::Regex;

use crate::patterns::{RHS_GROUP, TARGET_GROUP};
use crate::types::{AnchorMatch, Document, Span};

/// Shape of the pragma run at the top of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderBlock {
    /// First version pragma line.
    pub version_line: Option<usize>,
    /// First line after the version pragma that is neither a version nor an
    /// import pragma. `None` when the run reaches end-of-file or no version
    /// pragma exists.
    pub end_line: Option<usize>,
    /// Total number of lines.
    pub line_count: usize,
}

impl HeaderBlock {
    /// Scan the header of `doc`.
    #[must_use]
    pub fn scan(doc: &Document, version_pragma: &str, import_pragma: &str) -> Self {
        let lines = doc.line_spans();
        let mut version_line = None;
        let mut end_line = None;

        for (idx, span) in lines.iter().enumerate() {
            let line = span.slice(doc.text()).trim_start();
            if line.starts_with(version_pragma) {
                if version_line.is_none() {
                    version_line = Some(idx);
                }
                continue;
            }
            if version_line.is_some() {
                if line.starts_with(import_pragma) {
                    continue;
                }
                end_line = Some(idx);
                break;
            }
        }

        Self {
            version_line,
            end_line,
            line_count: lines.len(),
        }
    }

    /// Line index for a new import pragma.
    ///
    /// After the header run; without a version pragma, the second line of a
    /// non-empty file.
    #[must_use]
    pub fn import_line(&self) -> usize {
        match (self.end_line, self.version_line) {
            (Some(end), _) => end,
            (None, Some(_)) => self.line_count,
            (None, None) => usize::from(self.line_count > 0),
        }
    }

    /// Line index for the shared declaration block.
    ///
    /// After the header run; without a version pragma, the very top.
    #[must_use]
    pub fn declaration_line(&self) -> usize {
        match (self.end_line, self.version_line) {
            (Some(end), _) => end,
            (None, Some(_)) => self.line_count,
            (None, None) => 0,
        }
    }
}

/// Where to insert whole lines before line `line_idx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    /// Byte offset of the insertion.
    pub offset: usize,
    /// The previous line has no terminator; one must be emitted first.
    pub needs_leading_newline: bool,
}

/// Insertion point before line `line_idx` (or at end-of-file past the last).
#[must_use]
pub fn line_insertion_point(doc: &Document, line_idx: usize) -> InsertionPoint {
    let lines = doc.line_spans();
    match lines.get(line_idx) {
        Some(span) => InsertionPoint {
            offset: span.start,
            needs_leading_newline: false,
        },
        None => InsertionPoint {
            offset: doc.text().len(),
            needs_leading_newline: !doc.text().is_empty() && !doc.text().ends_with('\n'),
        },
    }
}

/// Leading whitespace of the line containing `pos`.
#[must_use]
pub fn line_indent(text: &str, pos: usize) -> &str {
    let line_start = text[..pos].rfind('\n').map_or(0, |idx| idx + 1);
    let line = &text[line_start..pos];
    let width = line
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &line[..width]
}

/// First statement matching `pattern` inside `region`.
///
/// The returned span runs from the target capture through the `;`; the
/// expression is the trimmed right-hand side.
#[must_use]
pub fn find_statement(text: &str, region: Span, pattern: &Regex) -> Option<AnchorMatch> {
    let scope = region.slice(text);
    let caps = pattern.captures(scope)?;
    let whole = caps.get(0)?;
    let target = caps.name(TARGET_GROUP)?;

    let span = Span::new(target.start(), whole.end()).shift(region.start);
    Some(AnchorMatch {
        span,
        indent: line_indent(text, span.start).to_string(),
        expression: caps
            .name(RHS_GROUP)
            .map(|rhs| rhs.as_str().trim().to_string()),
    })
}
