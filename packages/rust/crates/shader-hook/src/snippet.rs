//! Snippet composition.
//!
//! Templates are line lists with an `{expr}` placeholder; indentation and
//! line terminators are applied at render time so one fragment never mixes
//! newline styles.

use crate::profile::InjectionProfile;
use crate::types::NewlineStyle;

/// Placeholder replaced by the captured expression.
pub const EXPR_PLACEHOLDER: &str = "{expr}";

/// Indentation of fields inside the generated uniform block.
const FIELD_INDENT: &str = "    ";

/// Statement lines rendered into an anchor's surroundings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetTemplate {
    lines: Vec<String>,
}

impl SnippetTemplate {
    /// Template from raw lines.
    #[must_use]
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Replacement for the clip-space assignment:
    /// save the value, run it through the hook, assign it back.
    #[must_use]
    pub fn vertex_rewrite(profile: &InjectionProfile) -> Self {
        let v = &profile.vertex;
        let time = &profile.globals.time_uniform;
        Self::new(vec![
            format!("{} {} = {EXPR_PLACEHOLDER};", v.clip_type, v.clip_local),
            format!("{0} = {1}({0}, {time});", v.clip_local, v.hook),
            format!("{} = {};", v.position_target, v.clip_local),
        ])
    }

    /// Statements appended after the color anchor.
    #[must_use]
    pub fn fragment_augment(profile: &InjectionProfile) -> Self {
        let f = &profile.fragment;
        let g = &profile.globals;
        Self::new(vec![
            format!(
                "vec2 {} = gl_FragCoord.xy / {};",
                f.screen_uv_local, g.screen_size_uniform
            ),
            format!(
                "{0} = {1}({0}, {2}, {3}, {4});",
                f.color_variable, f.hook, g.time_uniform, f.screen_uv_local, f.distance_variable
            ),
        ])
    }

    /// Render as a replacement for a statement that starts mid-line: the
    /// first line takes the statement's place, later lines get `indent`.
    #[must_use]
    pub fn render_replacement(&self, indent: &str, expr: &str, newline: NewlineStyle) -> String {
        let separator = format!("{}{indent}", newline.as_str());
        self.lines
            .iter()
            .map(|line| line.replace(EXPR_PLACEHOLDER, expr))
            .collect::<Vec<_>>()
            .join(&separator)
    }

    /// Render as new lines inserted right after a statement's `;`.
    #[must_use]
    pub fn render_insertion(&self, indent: &str, newline: NewlineStyle) -> String {
        self.lines
            .iter()
            .map(|line| format!("{}{indent}{line}", newline.as_str()))
            .collect()
    }
}

/// One pragma line with terminator.
#[must_use]
pub fn pragma_line(line: &str, newline: NewlineStyle) -> String {
    format!("{line}{}", newline.as_str())
}

/// The shared uniform block followed by a blank line.
#[must_use]
pub fn globals_block(profile: &InjectionProfile, newline: NewlineStyle) -> String {
    let nl = newline.as_str();
    let g = &profile.globals;
    let mut out = format!("layout({}) uniform {} {{{nl}", g.layout, g.block_name);
    for field in &g.fields {
        out.push_str(FIELD_INDENT);
        out.push_str(field.trim());
        out.push(';');
        out.push_str(nl);
    }
    out.push_str("};");
    out.push_str(nl);
    out.push_str(nl);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_rewrite_render() {
        let template = SnippetTemplate::vertex_rewrite(&InjectionProfile::default());
        let out = template.render_replacement("    ", "ftransform()", NewlineStyle::Lf);
        assert_eq!(
            out,
            "vec4 eg_clip = ftransform();\n    eg_clip = eg_apply_vertex_effects(eg_clip, GameTime);\n    gl_Position = eg_clip;"
        );
    }

    #[test]
    fn test_fragment_insertion_crlf() {
        let template = SnippetTemplate::fragment_augment(&InjectionProfile::default());
        let out = template.render_insertion("\t", NewlineStyle::CrLf);
        assert_eq!(
            out,
            "\r\n\tvec2 screenUV = gl_FragCoord.xy / ScreenSize;\r\n\tcolor = eg_apply_fragment_effects(color, GameTime, screenUV, sphericalVertexDistance);"
        );
    }

    #[test]
    fn test_globals_block_layout() {
        let block = globals_block(&InjectionProfile::default(), NewlineStyle::Lf);
        assert_eq!(
            block,
            "layout(std140) uniform Globals {\n    vec2 ScreenSize;\n    float GlintAlpha;\n    float GameTime;\n    float MenuBlurRadius;\n};\n\n"
        );
    }
}
