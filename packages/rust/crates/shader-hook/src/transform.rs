//! The four transformations.
//!
//! Each one is a pure function from a [`Document`] to a
//! [`TransformationResult`]: guard first, then anchor lookup, then a single
//! splice. Nothing outside the spliced region changes.

use crate::anchor::{HeaderBlock, find_statement, line_insertion_point};
use crate::pipeline::TransformationPipeline;
use crate::snippet::{globals_block, pragma_line};
use crate::span::find_block;
use crate::types::{Document, ShaderKind, Span, StepOutcome, TransformationResult};

impl TransformationPipeline {
    /// Add the stage's import pragma after the header run.
    #[must_use]
    pub fn inject_import(&self, doc: &Document, kind: ShaderKind) -> TransformationResult {
        if self.guard().import_present(doc, kind) {
            return TransformationResult::unchanged(doc, StepOutcome::AlreadyPatched);
        }

        let profile = self.profile();
        let header = HeaderBlock::scan(doc, &profile.version_pragma, &profile.import_pragma);
        let point = line_insertion_point(doc, header.import_line());

        let mut insertion = String::new();
        if point.needs_leading_newline {
            insertion.push_str(doc.newline().as_str());
        }
        insertion.push_str(&pragma_line(profile.import_line(kind), doc.newline()));
        TransformationResult::spliced(doc, Span::point(point.offset), &insertion)
    }

    /// Add the shared uniform block after the header run.
    #[must_use]
    pub fn ensure_globals(&self, doc: &Document) -> TransformationResult {
        if self.guard().globals_present(doc) {
            return TransformationResult::unchanged(doc, StepOutcome::AlreadyPatched);
        }

        let profile = self.profile();
        let header = HeaderBlock::scan(doc, &profile.version_pragma, &profile.import_pragma);
        let point = line_insertion_point(doc, header.declaration_line());

        let mut insertion = String::new();
        if point.needs_leading_newline {
            insertion.push_str(doc.newline().as_str());
        }
        insertion.push_str(&globals_block(profile, doc.newline()));
        TransformationResult::spliced(doc, Span::point(point.offset), &insertion)
    }

    /// Replace the first clip-space assignment in the entry point with the
    /// three-statement hook sequence.
    #[must_use]
    pub fn rewrite_vertex_entry(&self, doc: &Document) -> TransformationResult {
        if self.guard().hook_present(doc, ShaderKind::Vertex) {
            return TransformationResult::unchanged(doc, StepOutcome::AlreadyPatched);
        }

        let patterns = self.patterns();
        let body = match find_block(doc.text(), &patterns.entry_header) {
            Ok(body) => body,
            Err(miss) => return TransformationResult::unchanged(doc, miss.into()),
        };
        let Some(anchor) = find_statement(doc.text(), body, &patterns.position_assignment) else {
            return TransformationResult::unchanged(doc, StepOutcome::AnchorNotFound);
        };

        let expr = anchor.expression.as_deref().unwrap_or_default();
        let replacement =
            self.vertex_snippet()
                .render_replacement(&anchor.indent, expr, doc.newline());
        TransformationResult::spliced(doc, anchor.span, &replacement)
    }

    /// Insert the screen coordinate and hook call right after the color
    /// declaration, or else after the first plain color assignment.
    #[must_use]
    pub fn augment_fragment_entry(&self, doc: &Document) -> TransformationResult {
        if self.guard().hook_present(doc, ShaderKind::Fragment) {
            return TransformationResult::unchanged(doc, StepOutcome::AlreadyPatched);
        }

        let patterns = self.patterns();
        let body = match find_block(doc.text(), &patterns.entry_header) {
            Ok(body) => body,
            Err(miss) => return TransformationResult::unchanged(doc, miss.into()),
        };
        if self.guard().screen_uv_present(doc, body) {
            return TransformationResult::unchanged(doc, StepOutcome::AlreadyPatched);
        }

        let anchor = find_statement(doc.text(), body, &patterns.color_declaration)
            .or_else(|| find_statement(doc.text(), body, &patterns.color_assignment));
        let Some(anchor) = anchor else {
            return TransformationResult::unchanged(doc, StepOutcome::AnchorNotFound);
        };

        let insertion = self
            .fragment_snippet()
            .render_insertion(&anchor.indent, doc.newline());
        TransformationResult::spliced(doc, Span::point(anchor.span.end), &insertion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::InjectionProfile;

    fn pipeline() -> TransformationPipeline {
        TransformationPipeline::new(InjectionProfile::default()).expect("default profile")
    }

    #[test]
    fn test_import_after_existing_imports() {
        let doc = Document::new("#version 150\n#moj_import <fog.glsl>\nin vec3 Position;\n");
        let result = pipeline().inject_import(&doc, ShaderKind::Vertex);
        assert!(result.changed);
        assert_eq!(
            result.document.text(),
            "#version 150\n#moj_import <fog.glsl>\n#moj_import <elytraglide:eg_effects_vertex.glsl>\nin vec3 Position;\n"
        );
    }

    #[test]
    fn test_import_into_unterminated_file() {
        let doc = Document::new("#version 150");
        let result = pipeline().inject_import(&doc, ShaderKind::Fragment);
        assert_eq!(
            result.document.text(),
            "#version 150\n#moj_import <elytraglide:eg_effects_fragment.glsl>\n"
        );
    }

    #[test]
    fn test_globals_skipped_when_block_complete() {
        let doc = Document::new(
            "#version 150\nlayout(std140) uniform Globals {\n    float GameTime;\n};\n",
        );
        let result = pipeline().ensure_globals(&doc);
        assert!(!result.changed);
        assert_eq!(result.outcome, StepOutcome::AlreadyPatched);
    }

    #[test]
    fn test_vertex_rewrite_keeps_indent() {
        let doc = Document::new(
            "void main() {\n    gl_Position = ProjMat * vec4(Position, 1.0);\n}\n",
        );
        let result = pipeline().rewrite_vertex_entry(&doc);
        assert_eq!(
            result.document.text(),
            "void main() {\n    vec4 eg_clip = ProjMat * vec4(Position, 1.0);\n    eg_clip = eg_apply_vertex_effects(eg_clip, GameTime);\n    gl_Position = eg_clip;\n}\n"
        );
    }

    #[test]
    fn test_vertex_rewrite_unbalanced() {
        let doc = Document::new("void main() {\n    gl_Position = x;\n");
        let result = pipeline().rewrite_vertex_entry(&doc);
        assert!(!result.changed);
        assert_eq!(result.outcome, StepOutcome::MalformedStructure);
    }

    #[test]
    fn test_fragment_prefers_declaration() {
        let doc = Document::new(
            "void main() {\n    color = vec4(0.0);\n    vec4 color = texture(Sampler0, uv);\n}\n",
        );
        let result = pipeline().augment_fragment_entry(&doc);
        let text = result.document.text();
        let decl = text.find("vec4 color =").expect("declaration kept");
        let uv = text.find("vec2 screenUV").expect("snippet inserted");
        assert!(uv > decl);
    }

    #[test]
    fn test_fragment_fallback_assignment() {
        let doc = Document::new("void main() {\n  color = vertexColor;\n  fragColor = color;\n}\n");
        let result = pipeline().augment_fragment_entry(&doc);
        assert_eq!(
            result.document.text(),
            "void main() {\n  color = vertexColor;\n  vec2 screenUV = gl_FragCoord.xy / ScreenSize;\n  color = eg_apply_fragment_effects(color, GameTime, screenUV, sphericalVertexDistance);\n  fragColor = color;\n}\n"
        );
    }

    #[test]
    fn test_fragment_existing_screen_uv() {
        let doc = Document::new(
            "void main() {\n  vec4 color = c;\n  vec2 screenUV = gl_FragCoord.xy / ScreenSize;\n}\n",
        );
        let result = pipeline().augment_fragment_entry(&doc);
        assert_eq!(result.outcome, StepOutcome::AlreadyPatched);
    }
}
