//! Injection profile: every name and literal the transformations emit.
//!
//! The default profile injects the ElytraGlide effect hooks into vanilla
//! core shaders. A YAML file may override any subset of keys:
//!
//! ```yaml
//! vertex:
//!   hook: my_vertex_hook
//! globals:
//!   fields: ["vec2 ScreenSize", "float GameTime"]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::HookError;
use crate::types::ShaderKind;

/// Names used for the vertex entry-point rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VertexHook {
    /// Import pragma line added to the header.
    pub import: String,
    /// File extensions (no dot) classified as vertex shaders.
    pub extensions: Vec<String>,
    /// Clip-space output that is rewritten.
    pub position_target: String,
    /// Local holding the original clip-space value.
    pub clip_local: String,
    /// Type of `clip_local`.
    pub clip_type: String,
    /// Post-processing function; its presence marks the file as patched.
    pub hook: String,
}

impl Default for VertexHook {
    fn default() -> Self {
        Self {
            import: "#moj_import <elytraglide:eg_effects_vertex.glsl>".to_string(),
            extensions: vec!["vsh".to_string()],
            position_target: "gl_Position".to_string(),
            clip_local: "eg_clip".to_string(),
            clip_type: "vec4".to_string(),
            hook: "eg_apply_vertex_effects".to_string(),
        }
    }
}

/// Names used for the fragment entry-point augmentation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FragmentHook {
    /// Import pragma line added to the header.
    pub import: String,
    /// File extensions (no dot) classified as fragment shaders.
    pub extensions: Vec<String>,
    /// Color variable the inserted statements follow and reassign.
    pub color_variable: String,
    /// Declared type of `color_variable`.
    pub color_type: String,
    /// Local holding the normalized screen coordinate.
    pub screen_uv_local: String,
    /// Post-processing function; its presence marks the file as patched.
    pub hook: String,
    /// Distance value expected in scope at the insertion point.
    pub distance_variable: String,
}

impl Default for FragmentHook {
    fn default() -> Self {
        Self {
            import: "#moj_import <elytraglide:eg_effects_fragment.glsl>".to_string(),
            extensions: vec!["fsh".to_string()],
            color_variable: "color".to_string(),
            color_type: "vec4".to_string(),
            screen_uv_local: "screenUV".to_string(),
            hook: "eg_apply_fragment_effects".to_string(),
            distance_variable: "sphericalVertexDistance".to_string(),
        }
    }
}

/// Shared uniform block declared in both stages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GlobalsBlock {
    /// Layout qualifier argument.
    pub layout: String,
    /// Uniform block name.
    pub block_name: String,
    /// Field whose presence inside the block marks it as complete.
    pub marker: String,
    /// Field declarations, `<type> <name>` without the `;`.
    pub fields: Vec<String>,
    /// Time uniform passed to both hooks.
    pub time_uniform: String,
    /// Screen size uniform used for the fragment coordinate.
    pub screen_size_uniform: String,
}

impl Default for GlobalsBlock {
    fn default() -> Self {
        Self {
            layout: "std140".to_string(),
            block_name: "Globals".to_string(),
            marker: "GameTime".to_string(),
            fields: vec![
                "vec2 ScreenSize".to_string(),
                "float GlintAlpha".to_string(),
                "float GameTime".to_string(),
                "float MenuBlurRadius".to_string(),
            ],
            time_uniform: "GameTime".to_string(),
            screen_size_uniform: "ScreenSize".to_string(),
        }
    }
}

/// Complete injection profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InjectionProfile {
    /// Version pragma opening the header run.
    pub version_pragma: String,
    /// Import pragma allowed inside the header run.
    pub import_pragma: String,
    /// Zero-argument `void` entry point.
    pub entry_point: String,
    /// Vertex stage settings.
    pub vertex: VertexHook,
    /// Fragment stage settings.
    pub fragment: FragmentHook,
    /// Shared uniform block.
    pub globals: GlobalsBlock,
}

impl Default for InjectionProfile {
    fn default() -> Self {
        Self {
            version_pragma: "#version".to_string(),
            import_pragma: "#moj_import".to_string(),
            entry_point: "main".to_string(),
            vertex: VertexHook::default(),
            fragment: FragmentHook::default(),
            globals: GlobalsBlock::default(),
        }
    }
}

impl InjectionProfile {
    /// Parse a YAML profile; absent keys keep their defaults.
    ///
    /// # Errors
    /// `ProfileParse` for malformed YAML, `Config` when validation fails.
    pub fn from_yaml_str(raw: &str) -> Result<Self, HookError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let profile: Self = serde_yaml::from_str(raw)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load a YAML profile from disk.
    ///
    /// # Errors
    /// I/O errors plus everything [`Self::from_yaml_str`] reports.
    pub fn load(path: &Path) -> Result<Self, HookError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|_| HookError::NotFound(path.display().to_string()))?;
        Self::from_yaml_str(&raw)
    }

    /// Check the profile can produce well-formed patches.
    ///
    /// # Errors
    /// `Config` naming the first offending key.
    pub fn validate(&self) -> Result<(), HookError> {
        let required = [
            ("version_pragma", &self.version_pragma),
            ("import_pragma", &self.import_pragma),
            ("entry_point", &self.entry_point),
            ("vertex.import", &self.vertex.import),
            ("vertex.position_target", &self.vertex.position_target),
            ("vertex.clip_local", &self.vertex.clip_local),
            ("vertex.clip_type", &self.vertex.clip_type),
            ("vertex.hook", &self.vertex.hook),
            ("fragment.import", &self.fragment.import),
            ("fragment.color_variable", &self.fragment.color_variable),
            ("fragment.color_type", &self.fragment.color_type),
            ("fragment.screen_uv_local", &self.fragment.screen_uv_local),
            ("fragment.hook", &self.fragment.hook),
            ("fragment.distance_variable", &self.fragment.distance_variable),
            ("globals.layout", &self.globals.layout),
            ("globals.block_name", &self.globals.block_name),
            ("globals.marker", &self.globals.marker),
            ("globals.time_uniform", &self.globals.time_uniform),
            ("globals.screen_size_uniform", &self.globals.screen_size_uniform),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(HookError::Config(format!("`{key}` must not be empty")));
            }
        }

        if self.vertex.extensions.is_empty() || self.fragment.extensions.is_empty() {
            return Err(HookError::Config(
                "each stage needs at least one extension".to_string(),
            ));
        }
        let vertex: HashSet<&str> = self.vertex.extensions.iter().map(String::as_str).collect();
        if let Some(ext) = self
            .fragment
            .extensions
            .iter()
            .find(|ext| vertex.contains(ext.as_str()))
        {
            return Err(HookError::Config(format!(
                "extension `{ext}` is claimed by both stages"
            )));
        }

        let declares_marker = self
            .globals
            .fields
            .iter()
            .filter_map(|field| field.split_whitespace().last())
            .any(|name| name == self.globals.marker);
        if !declares_marker {
            return Err(HookError::Config(format!(
                "marker `{}` is not one of the globals fields",
                self.globals.marker
            )));
        }
        Ok(())
    }

    /// Classify a path by extension.
    #[must_use]
    pub fn classify(&self, path: &Path) -> Option<ShaderKind> {
        let ext = path.extension()?.to_str()?;
        if self.vertex.extensions.iter().any(|e| e == ext) {
            Some(ShaderKind::Vertex)
        } else if self.fragment.extensions.iter().any(|e| e == ext) {
            Some(ShaderKind::Fragment)
        } else {
            None
        }
    }

    /// Import pragma line for a stage.
    #[must_use]
    pub fn import_line(&self, kind: ShaderKind) -> &str {
        match kind {
            ShaderKind::Vertex => &self.vertex.import,
            ShaderKind::Fragment => &self.fragment.import,
        }
    }
}
