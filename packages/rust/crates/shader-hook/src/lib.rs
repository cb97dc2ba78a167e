#![allow(clippy::doc_markdown)]

//! shader-hook - Idempotent hook injection for shader sources
//!
//! Patches vertex (`.vsh`) and fragment (`.fsh`) shaders in place: an import
//! pragma in the header, a shared uniform block, and a call to a
//! post-processing hook inside `void main()`. Re-running on a patched file is
//! a no-op; files without the expected anchors are left untouched.
//!
//! # Architecture
//!
//! ```text
//! shader-hook/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── error.rs     # HookError enum (thiserror)
//! ├── types.rs     # Document, Span, AnchorMatch, Step, verdicts
//! ├── profile.rs   # InjectionProfile (YAML configurable names)
//! ├── patterns.rs  # Anchor regexes
//! ├── span.rs      # Balanced-brace body scanner
//! ├── anchor.rs    # Header run and statement anchors
//! ├── guard.rs     # Idempotency checks
//! ├── snippet.rs   # Snippet templates
//! ├── transform.rs # The four transformations
//! ├── pipeline.rs  # TransformationPipeline
//! ├── diff.rs      # Diff preview
//! ├── io.rs        # Safe read, backup + write
//! ├── batch.rs     # Parallel batch runner (rayon)
//! └── report.rs    # Console report lines
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use shader_hook::{Document, InjectionProfile, ShaderKind, TransformationPipeline};
//!
//! let pipeline = TransformationPipeline::new(InjectionProfile::default())?;
//! let outcome = pipeline.run(
//!     &Document::new("#version 150\nvoid main(){ gl_Position = ftransform(); }\n"),
//!     ShaderKind::Vertex,
//! );
//! assert!(outcome.changed());
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod anchor;
mod batch;
mod diff;
mod error;
mod guard;
mod io;
pub mod patterns;
mod pipeline;
mod profile;
mod report;
mod snippet;
mod span;
mod transform;
mod types;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use error::HookError;
pub use pipeline::{PipelineOutcome, StepRecord, TransformationPipeline};
pub use profile::{FragmentHook, GlobalsBlock, InjectionProfile, VertexHook};
pub use types::{
    AnchorMatch, Document, FileVerdict, NewlineStyle, ShaderKind, Span, Step, StepOutcome,
    TransformationResult,
};

// Scanner and anchor primitives
pub use anchor::{HeaderBlock, InsertionPoint, find_statement, line_indent, line_insertion_point};
pub use guard::IdempotencyGuard;
pub use patterns::AnchorPatterns;
pub use snippet::{SnippetTemplate, globals_block, pragma_line};
pub use span::{ScanMiss, find_block, match_braces};

// Collaborators
pub use batch::{BatchConfig, BatchStats, FileReport, collect_shader_files};
pub use diff::generate_unified_diff;
pub use io::{backup_path, is_binary, read_shader_source, write_patched};
pub use report::{format_error, format_report, format_summary, render};

