//! Idempotency checks run before each transformation.
//!
//! A guard answers one question: is this step's effect already in the
//! document? If so the step reports `AlreadyPatched` without further work,
//! which keeps re-runs no-ops and lets partially patched files receive only
//! the missing pieces.

use crate::patterns::AnchorPatterns;
use crate::profile::InjectionProfile;
use crate::span::find_block;
use crate::types::{Document, ShaderKind, Span};

/// Presence checks keyed by each step's effect signature.
#[derive(Debug, Clone, Copy)]
pub struct IdempotencyGuard<'a> {
    profile: &'a InjectionProfile,
    patterns: &'a AnchorPatterns,
}

impl<'a> IdempotencyGuard<'a> {
    /// Guard for one profile.
    #[must_use]
    pub fn new(profile: &'a InjectionProfile, patterns: &'a AnchorPatterns) -> Self {
        Self { profile, patterns }
    }

    /// The stage's import pragma appears anywhere in the file.
    #[must_use]
    pub fn import_present(&self, doc: &Document, kind: ShaderKind) -> bool {
        doc.text().contains(self.profile.import_line(kind))
    }

    /// A uniform block with the configured name exists and its braces
    /// enclose the marker field.
    ///
    /// An unterminated block is searched to end-of-file.
    #[must_use]
    pub fn globals_present(&self, doc: &Document) -> bool {
        let text = doc.text();
        let Some(header) = self.patterns.globals_header.find(text) else {
            return false;
        };
        let body = find_block(text, &self.patterns.globals_header)
            .unwrap_or_else(|_| Span::new(header.end(), text.len()));
        body.slice(text).contains(self.profile.globals.marker.as_str())
    }

    /// The stage's hook call already appears in the file.
    #[must_use]
    pub fn hook_present(&self, doc: &Document, kind: ShaderKind) -> bool {
        let hook = match kind {
            ShaderKind::Vertex => &self.profile.vertex.hook,
            ShaderKind::Fragment => &self.profile.fragment.hook,
        };
        doc.text().contains(hook.as_str())
    }

    /// The fragment screen coordinate is already declared inside `body`.
    #[must_use]
    pub fn screen_uv_present(&self, doc: &Document, body: Span) -> bool {
        self.patterns
            .screen_uv_declaration
            .is_match(body.slice(doc.text()))
    }
}
