//! Property checks over a corpus of representative shaders.
//!
//! Every document is pushed through each step individually and through the
//! whole pipeline twice.

use shader_hook::{Document, InjectionProfile, ShaderKind, Step, TransformationPipeline};

const VANILLA_VERTEX: &str = r#"#version 150

#moj_import <light.glsl>
#moj_import <fog.glsl>

in vec3 Position;
in vec4 Color;

uniform mat4 ModelViewMat;
uniform mat4 ProjMat;

out float sphericalVertexDistance;
out vec4 vertexColor;

void main() {
    gl_Position = ProjMat * ModelViewMat * vec4(Position, 1.0);

    sphericalVertexDistance = fog_spherical_distance(Position);
    if (Color.a > 0.0) {
        vertexColor = Color;
    }
}
"#;

const VANILLA_FRAGMENT: &str = r#"#version 150

#moj_import <fog.glsl>

uniform sampler2D Sampler0;
uniform vec4 ColorModulator;

in float sphericalVertexDistance;
in vec2 texCoord0;

out vec4 fragColor;

void main() {
    vec4 color = texture(Sampler0, texCoord0) * ColorModulator;
    if (color.a < 0.1) {
        discard;
    }
    fragColor = color;
}
"#;

const ASSIGNED_FRAGMENT: &str = "#version 150\nout vec4 fragColor;\nvec4 color;\nvoid main() {\n\tcolor = vec4(1.0);\n\tfragColor = color;\n}";

const INLINE_VERTEX: &str = "#version 150\nvoid main(){ gl_Position = ftransform(); }";

const NO_ENTRY: &str = "uniform float Threshold;\nfloat helper() { return Threshold; }\n";

const TRUNCATED: &str = "#version 150\nvoid main() {\n    gl_Position = vec4(0.0);\n    if (x) {\n";

const EMPTY: &str = "";

fn corpus() -> Vec<(Document, ShaderKind)> {
    let mut docs = Vec::new();
    for (text, kind) in [
        (VANILLA_VERTEX, ShaderKind::Vertex),
        (VANILLA_FRAGMENT, ShaderKind::Fragment),
        (ASSIGNED_FRAGMENT, ShaderKind::Fragment),
        (INLINE_VERTEX, ShaderKind::Vertex),
        (NO_ENTRY, ShaderKind::Vertex),
        (NO_ENTRY, ShaderKind::Fragment),
        (TRUNCATED, ShaderKind::Vertex),
        (EMPTY, ShaderKind::Fragment),
    ] {
        docs.push((Document::new(text), kind));
        docs.push((Document::new(text.replace('\n', "\r\n")), kind));
    }
    docs
}

fn pipeline() -> TransformationPipeline {
    TransformationPipeline::new(InjectionProfile::default()).expect("default profile")
}

fn brace_delta(text: &str) -> i64 {
    let open = i64::try_from(text.matches('{').count()).unwrap_or(i64::MAX);
    let close = i64::try_from(text.matches('}').count()).unwrap_or(i64::MAX);
    open - close
}

fn has_lone_lf(text: &str) -> bool {
    text.match_indices('\n')
        .any(|(idx, _)| idx == 0 || text.as_bytes()[idx - 1] != b'\r')
}

#[test]
fn test_pipeline_is_idempotent() {
    let pipeline = pipeline();
    for (doc, kind) in corpus() {
        let once = pipeline.run(&doc, kind);
        let twice = pipeline.run(&once.document, kind);
        assert!(!twice.changed(), "second pass changed {:?}", doc.text());
        assert_eq!(twice.document.text(), once.document.text());
    }
}

#[test]
fn test_each_step_is_idempotent() {
    let pipeline = pipeline();
    for (doc, kind) in corpus() {
        for step in Step::ORDER {
            let first = pipeline.apply_step(step, &doc, kind);
            let second = pipeline.apply_step(step, &first.document, kind);
            assert!(!second.changed, "{step} fired twice on {:?}", doc.text());
        }
    }
}

#[test]
fn test_edits_are_local() {
    let pipeline = pipeline();
    for (doc, kind) in corpus() {
        let mut current = doc;
        for step in Step::ORDER {
            let result = pipeline.apply_step(step, &current, kind);
            if let Some(edit) = result.edit {
                let before = current.text();
                let after = result.document.text();
                let tail = before.len() - edit.end;
                assert_eq!(&after[..edit.start], &before[..edit.start]);
                assert_eq!(&after[after.len() - tail..], &before[edit.end..]);
            } else {
                assert!(!result.changed);
                assert_eq!(result.document, current);
            }
            current = result.document;
        }
    }
}

#[test]
fn test_brace_balance_preserved() {
    let pipeline = pipeline();
    for (doc, kind) in corpus() {
        let outcome = pipeline.run(&doc, kind);
        assert_eq!(brace_delta(outcome.document.text()), brace_delta(doc.text()));
    }
}

#[test]
fn test_newline_style_consistent() {
    let pipeline = pipeline();
    for (doc, kind) in corpus() {
        let input = doc.text();
        let output = pipeline.run(&doc, kind).document.into_text();
        if input.contains("\r\n") {
            assert!(!has_lone_lf(&output), "mixed endings in {output:?}");
        } else {
            assert!(!output.contains('\r'), "stray CR in {output:?}");
        }
    }
}

#[test]
fn test_entry_outcomes_on_corpus() {
    let pipeline = pipeline();
    let vertex = pipeline.run(&Document::new(VANILLA_VERTEX), ShaderKind::Vertex);
    assert!(vertex.document.text().contains(
        "    vec4 eg_clip = ProjMat * ModelViewMat * vec4(Position, 1.0);\n"
    ));

    let truncated = pipeline.run(&Document::new(TRUNCATED), ShaderKind::Vertex);
    assert!(!truncated.document.text().contains("eg_clip"));

    let assigned = pipeline.run(&Document::new(ASSIGNED_FRAGMENT), ShaderKind::Fragment);
    assert!(assigned.document.text().contains(
        "\tcolor = vec4(1.0);\n\tvec2 screenUV = gl_FragCoord.xy / ScreenSize;\n"
    ));
}
