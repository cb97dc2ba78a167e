//! Transformation pipeline.
//!
//! Runs the import, globals and entry-point steps in [`Step::ORDER`] on one
//! document. Every step is attempted whatever the previous ones did; the
//! verdict lists the steps that changed the text.

use crate::error::HookError;
use crate::guard::IdempotencyGuard;
use crate::patterns::AnchorPatterns;
use crate::profile::InjectionProfile;
use crate::snippet::SnippetTemplate;
use crate::types::{Document, FileVerdict, ShaderKind, Step, StepOutcome, TransformationResult};

/// Outcome of one step inside a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRecord {
    /// Which step.
    pub step: Step,
    /// How it ended.
    pub outcome: StepOutcome,
}

/// Result of running every step on one document.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Final document.
    pub document: Document,
    /// One record per step, in order.
    pub steps: Vec<StepRecord>,
}

impl PipelineOutcome {
    /// Any step edited the document.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.steps.iter().any(|r| r.outcome == StepOutcome::Applied)
    }

    /// Applied steps, or `NoChanges`.
    #[must_use]
    pub fn verdict(&self) -> FileVerdict {
        let applied: Vec<Step> = self
            .steps
            .iter()
            .filter(|r| r.outcome == StepOutcome::Applied)
            .map(|r| r.step)
            .collect();
        if applied.is_empty() {
            FileVerdict::NoChanges
        } else {
            FileVerdict::Applied(applied)
        }
    }
}

/// Patching engine for one [`InjectionProfile`].
///
/// Patterns and snippet templates are built once; the pipeline is `Sync` and
/// shared across batch workers.
#[derive(Debug, Clone)]
pub struct TransformationPipeline {
    profile: InjectionProfile,
    patterns: AnchorPatterns,
    vertex_snippet: SnippetTemplate,
    fragment_snippet: SnippetTemplate,
}

impl TransformationPipeline {
    /// Validate `profile` and compile its patterns.
    ///
    /// # Errors
    /// `Config` for an invalid profile, `Pattern` if compilation fails.
    pub fn new(profile: InjectionProfile) -> Result<Self, HookError> {
        profile.validate()?;
        let patterns = AnchorPatterns::compile(&profile)?;
        Ok(Self {
            vertex_snippet: SnippetTemplate::vertex_rewrite(&profile),
            fragment_snippet: SnippetTemplate::fragment_augment(&profile),
            patterns,
            profile,
        })
    }

    /// Active profile.
    #[must_use]
    pub fn profile(&self) -> &InjectionProfile {
        &self.profile
    }

    pub(crate) fn patterns(&self) -> &AnchorPatterns {
        &self.patterns
    }

    pub(crate) fn vertex_snippet(&self) -> &SnippetTemplate {
        &self.vertex_snippet
    }

    pub(crate) fn fragment_snippet(&self) -> &SnippetTemplate {
        &self.fragment_snippet
    }

    /// Idempotency checks bound to this profile.
    #[must_use]
    pub fn guard(&self) -> IdempotencyGuard<'_> {
        IdempotencyGuard::new(&self.profile, &self.patterns)
    }

    /// Apply a single step.
    #[must_use]
    pub fn apply_step(&self, step: Step, doc: &Document, kind: ShaderKind) -> TransformationResult {
        match (step, kind) {
            (Step::Import, _) => self.inject_import(doc, kind),
            (Step::Globals, _) => self.ensure_globals(doc),
            (Step::EntryPoint, ShaderKind::Vertex) => self.rewrite_vertex_entry(doc),
            (Step::EntryPoint, ShaderKind::Fragment) => self.augment_fragment_entry(doc),
        }
    }

    /// Run every step in order on `doc`.
    #[must_use]
    pub fn run(&self, doc: &Document, kind: ShaderKind) -> PipelineOutcome {
        let mut document = doc.clone();
        let mut steps = Vec::with_capacity(Step::ORDER.len());

        for step in Step::ORDER {
            let result = self.apply_step(step, &document, kind);
            tracing::debug!(
                step = %step,
                kind = %kind,
                outcome = result.outcome.reason(),
                "transformation step"
            );
            steps.push(StepRecord {
                step,
                outcome: result.outcome,
            });
            document = result.document;
        }

        PipelineOutcome { document, steps }
    }
}
