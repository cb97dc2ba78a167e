//! Core types for the injection pipeline.
//!
//! Defines the values that flow between the scanner, the anchor locator and
//! the pipeline. All of them are plain immutable data.

use std::fmt;

use serde::Serialize;

/// Line terminator convention of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NewlineStyle {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
}

impl NewlineStyle {
    /// Detect the style of `text`: CRLF as soon as one `\r\n` occurs.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::CrLf
        } else {
            Self::Lf
        }
    }

    /// The terminator itself.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Half-open byte interval `[start, end)` over a document.
///
/// Spans are only valid against the exact text they were computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    /// Create a span. `start` must not exceed `end`.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} after end {end}");
        Self { start, end }
    }

    /// Zero-length span at `offset`.
    #[must_use]
    pub fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for insertion points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Move the span right by `offset` bytes.
    #[must_use]
    pub fn shift(self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    /// Borrow the covered text.
    #[must_use]
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Full text of one shader file plus its newline style.
///
/// Edits never mutate a document; [`Document::splice`] returns a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    newline: NewlineStyle,
}

impl Document {
    /// Wrap `text`, detecting its newline style once.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let newline = NewlineStyle::detect(&text);
        Self { text, newline }
    }

    /// Raw text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Newline style detected when the document was first read.
    #[must_use]
    pub fn newline(&self) -> NewlineStyle {
        self.newline
    }

    /// Unwrap into the raw text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }

    /// Spans of every line, each including its terminator.
    ///
    /// An empty document has no lines; a trailing line without terminator
    /// is still a line.
    #[must_use]
    pub fn line_spans(&self) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut start = 0;
        for (idx, byte) in self.text.bytes().enumerate() {
            if byte == b'\n' {
                spans.push(Span::new(start, idx + 1));
                start = idx + 1;
            }
        }
        if start < self.text.len() {
            spans.push(Span::new(start, self.text.len()));
        }
        spans
    }

    /// New document with `span` replaced by `replacement`.
    ///
    /// The newline style carries over unchanged; inserted text is expected
    /// to already use it.
    #[must_use]
    pub fn splice(&self, span: Span, replacement: &str) -> Self {
        let mut text = String::with_capacity(self.text.len() - span.len() + replacement.len());
        text.push_str(&self.text[..span.start]);
        text.push_str(replacement);
        text.push_str(&self.text[span.end..]);
        Self {
            text,
            newline: self.newline,
        }
    }
}

/// Result of an anchor search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorMatch {
    /// Matched statement, from the target identifier through its `;`.
    pub span: Span,
    /// Leading whitespace of the line holding the statement.
    pub indent: String,
    /// Right-hand side, trimmed, when the anchor captures one.
    pub expression: Option<String>,
}

/// Shader stage of a file, decided from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ShaderKind {
    /// Vertex shader (`.vsh`).
    Vertex,
    /// Fragment shader (`.fsh`).
    Fragment,
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// One transformation of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Step {
    /// Add the stage's import pragma to the header.
    Import,
    /// Add the shared uniform declaration block.
    Globals,
    /// Rewrite or augment the entry-point body.
    EntryPoint,
}

impl Step {
    /// Fixed application order. Every step runs regardless of the others.
    pub const ORDER: [Step; 3] = [Step::Import, Step::Globals, Step::EntryPoint];

    /// Name used in verdicts.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Globals => "globals",
            Self::EntryPoint => "main",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a single transformation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepOutcome {
    /// The document was edited.
    Applied,
    /// The guard found the effect already present.
    AlreadyPatched,
    /// Entry point or target statement missing.
    AnchorNotFound,
    /// Entry point braces never balance; handled like a missing anchor.
    MalformedStructure,
}

impl StepOutcome {
    /// Human-readable reason.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::AlreadyPatched => "already injected",
            Self::AnchorNotFound | Self::MalformedStructure => "pattern not found",
        }
    }
}

/// Output of one transformation.
#[derive(Debug, Clone)]
pub struct TransformationResult {
    /// Document after the step (the input when nothing changed).
    pub document: Document,
    /// Whether `document` differs from the input.
    pub changed: bool,
    /// Detailed outcome.
    pub outcome: StepOutcome,
    /// Region of the *input* that was replaced, when `changed`.
    pub edit: Option<Span>,
}

impl TransformationResult {
    /// Step left the document untouched.
    #[must_use]
    pub fn unchanged(document: &Document, outcome: StepOutcome) -> Self {
        Self {
            document: document.clone(),
            changed: false,
            outcome,
            edit: None,
        }
    }

    /// Step replaced `edit` in `input` with `replacement`.
    #[must_use]
    pub fn spliced(input: &Document, edit: Span, replacement: &str) -> Self {
        Self {
            document: input.splice(edit, replacement),
            changed: true,
            outcome: StepOutcome::Applied,
            edit: Some(edit),
        }
    }
}

/// Terminal verdict for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FileVerdict {
    /// Not a recognized shader kind.
    Skip,
    /// Every step was a no-op.
    NoChanges,
    /// Steps that changed the document, in pipeline order.
    Applied(Vec<Step>),
}

impl FileVerdict {
    /// Reason text; `dry_run` switches "applied" to "would apply".
    #[must_use]
    pub fn reason(&self, dry_run: bool) -> String {
        match self {
            Self::Skip => "skip".to_string(),
            Self::NoChanges => "no changes (already injected or pattern not found)".to_string(),
            Self::Applied(steps) => {
                let names: Vec<&str> = steps.iter().map(|s| s.name()).collect();
                let verb = if dry_run { "would apply" } else { "applied" };
                format!("{verb}: {}", names.join(", "))
            }
        }
    }
}
