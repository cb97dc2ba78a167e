//! Anchor patterns.
//!
//! Each anchor is a narrowly scoped regex with its own capture set. Names come
//! from the [`InjectionProfile`] and are escaped before interpolation.

use regex::{Regex, escape};

use crate::error::HookError;
use crate::profile::InjectionProfile;

/// Capture group holding the assignment target (start of the replaced span).
pub const TARGET_GROUP: &str = "target";
/// Capture group holding the right-hand side, without the `;`.
pub const RHS_GROUP: &str = "rhs";

/// Statement boundary: a line start, or just after `{`, `}` or `;`.
const STATEMENT_START: &str = r"(?m)(?:^|[{};])[ \t]*";
/// `=` (never `==`), the expression, and the terminating `;`.
const ASSIGNMENT_TAIL: &str = r"\s*=\s*(?P<rhs>[^=;][^;]*);";

/// `void <name>()` followed by its opening brace.
///
/// # Errors
/// Fails only if the escaped pattern cannot compile.
pub fn entry_point_header(name: &str) -> Result<Regex, HookError> {
    Ok(Regex::new(&format!(
        r"\bvoid\s+{}\s*\(\s*\)\s*\{{",
        escape(name)
    ))?)
}

/// `layout(<layout>) uniform <block> {`
///
/// # Errors
/// Fails only if the escaped pattern cannot compile.
pub fn uniform_block_header(layout: &str, block: &str) -> Result<Regex, HookError> {
    Ok(Regex::new(&format!(
        r"layout\s*\(\s*{}\s*\)\s*uniform\s+{}\s*\{{",
        escape(layout),
        escape(block)
    ))?)
}

/// `<target> = <rhs>;` at a statement start.
///
/// # Errors
/// Fails only if the escaped pattern cannot compile.
pub fn assignment(target: &str) -> Result<Regex, HookError> {
    Ok(Regex::new(&format!(
        r"{STATEMENT_START}(?P<target>\b{}){ASSIGNMENT_TAIL}",
        escape(target)
    ))?)
}

/// `<ty> <name> = <rhs>;` at a statement start.
///
/// # Errors
/// Fails only if the escaped pattern cannot compile.
pub fn declaration(ty: &str, name: &str) -> Result<Regex, HookError> {
    Ok(Regex::new(&format!(
        r"{STATEMENT_START}(?P<target>\b{}\s+{}\b){ASSIGNMENT_TAIL}",
        escape(ty),
        escape(name)
    ))?)
}

/// `vec2 <local> = gl_FragCoord.xy / <screen_size>;`
///
/// # Errors
/// Fails only if the escaped pattern cannot compile.
pub fn screen_uv_declaration(local: &str, screen_size: &str) -> Result<Regex, HookError> {
    Ok(Regex::new(&format!(
        r"\bvec2\s+{}\s*=\s*gl_FragCoord\.xy\s*/\s*{}\s*;",
        escape(local),
        escape(screen_size)
    ))?)
}

/// All patterns a pipeline needs, compiled once per profile.
#[derive(Debug, Clone)]
pub struct AnchorPatterns {
    /// Entry-point header.
    pub entry_header: Regex,
    /// Shared uniform block header.
    pub globals_header: Regex,
    /// Clip-space output assignment (vertex).
    pub position_assignment: Regex,
    /// Color declaration (fragment, preferred anchor).
    pub color_declaration: Regex,
    /// Plain color assignment (fragment, fallback anchor).
    pub color_assignment: Regex,
    /// Screen coordinate declaration emitted by the fragment snippet.
    pub screen_uv_declaration: Regex,
}

impl AnchorPatterns {
    /// Compile every pattern for `profile`.
    ///
    /// # Errors
    /// `Pattern` if any pattern fails to compile.
    pub fn compile(profile: &InjectionProfile) -> Result<Self, HookError> {
        Ok(Self {
            entry_header: entry_point_header(&profile.entry_point)?,
            globals_header: uniform_block_header(
                &profile.globals.layout,
                &profile.globals.block_name,
            )?,
            position_assignment: assignment(&profile.vertex.position_target)?,
            color_declaration: declaration(
                &profile.fragment.color_type,
                &profile.fragment.color_variable,
            )?,
            color_assignment: assignment(&profile.fragment.color_variable)?,
            screen_uv_declaration: screen_uv_declaration(
                &profile.fragment.screen_uv_local,
                &profile.globals.screen_size_uniform,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_header_spacing() {
        let re = entry_point_header("main").expect("compile");
        assert!(re.is_match("void main(){"));
        assert!(re.is_match("void   main ( )\n{"));
        assert!(!re.is_match("void main(int x) {"));
        assert!(!re.is_match("void domain() {"));
    }

    #[test]
    fn test_assignment_rejects_comparison() {
        let re = assignment("color").expect("compile");
        assert!(!re.is_match("    if (color == x);"));
        assert!(!re.is_match("    fragColor = x;"));
        let caps = re.captures("    color = a * b;").expect("match");
        assert_eq!(&caps[RHS_GROUP], "a * b");
    }

    #[test]
    fn test_declaration_requires_type() {
        let re = declaration("vec4", "color").expect("compile");
        assert!(re.is_match("  vec4 color = texture(Sampler0, uv);"));
        assert!(!re.is_match("  color = texture(Sampler0, uv);"));
        assert!(!re.is_match("  vec4 colorMod = x;"));
    }

    #[test]
    fn test_names_are_escaped() {
        let re = assignment("a.b").expect("compile");
        assert!(re.is_match("a.b = 1;"));
        assert!(!re.is_match("axb = 1;"));
    }
}
