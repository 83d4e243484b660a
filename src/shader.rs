//! Shader sources, compilation and program linking.

use std::borrow::Cow;

use crate::backend::{GlBackend, ShaderStage};
use crate::error::DemoError;

pub const VERTEX_POSITION: &str = "vertexPosition";
pub const TIME_UNIFORM: &str = "time";

/// Supplies GLSL text per stage.
pub trait ShaderSources {
    fn source(&self, stage: ShaderStage) -> Cow<'_, str>;
}

/// The quad shaders shipped in `shaders/`, embedded at compile time.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledSources;

impl ShaderSources for BundledSources {
    fn source(&self, stage: ShaderStage) -> Cow<'_, str> {
        match stage {
            ShaderStage::Vertex => Cow::Borrowed(include_str!("../shaders/quad.vert")),
            ShaderStage::Fragment => Cow::Borrowed(include_str!("../shaders/quad.frag")),
        }
    }
}

/// Sources held in memory, e.g. fixtures or text fetched at runtime.
#[derive(Debug, Clone, Default)]
pub struct InlineSources {
    pub vertex: String,
    pub fragment: String,
}

impl InlineSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

impl ShaderSources for InlineSources {
    fn source(&self, stage: ShaderStage) -> Cow<'_, str> {
        match stage {
            ShaderStage::Vertex => Cow::Borrowed(&self.vertex),
            ShaderStage::Fragment => Cow::Borrowed(&self.fragment),
        }
    }
}

pub fn compile_shader<B: GlBackend>(
    gl: &B,
    stage: ShaderStage,
    source: &str,
) -> Result<B::Shader, DemoError> {
    let shader = gl
        .create_shader(stage)
        .ok_or(DemoError::ObjectCreation("shader"))?;
    if !gl.compile_shader(&shader, source) {
        let log = gl.shader_info_log(&shader).unwrap_or_default();
        return Err(DemoError::ShaderCompile { stage, log });
    }
    Ok(shader)
}

/// A linked program with its attribute and uniform locations resolved once.
pub struct ShaderProgram<B: GlBackend> {
    program: B::Program,
    vertex_position: u32,
    time: Option<B::UniformLocation>,
}

impl<B: GlBackend> ShaderProgram<B> {
    /// Compiles both stages from `sources` and links them.
    pub fn build<S: ShaderSources + ?Sized>(gl: &B, sources: &S) -> Result<Self, DemoError> {
        let vertex = compile_shader(gl, ShaderStage::Vertex, &sources.source(ShaderStage::Vertex))?;
        let fragment = compile_shader(
            gl,
            ShaderStage::Fragment,
            &sources.source(ShaderStage::Fragment),
        )?;
        link_program(gl, &vertex, &fragment)
    }

    pub fn program(&self) -> &B::Program {
        &self.program
    }

    pub fn vertex_position(&self) -> u32 {
        self.vertex_position
    }

    pub fn time(&self) -> Option<&B::UniformLocation> {
        self.time.as_ref()
    }
}

pub fn link_program<B: GlBackend>(
    gl: &B,
    vertex: &B::Shader,
    fragment: &B::Shader,
) -> Result<ShaderProgram<B>, DemoError> {
    let program = gl
        .create_program()
        .ok_or(DemoError::ObjectCreation("program"))?;
    gl.attach_shader(&program, vertex);
    gl.attach_shader(&program, fragment);
    if !gl.link_program(&program) {
        let log = gl.program_info_log(&program).unwrap_or_default();
        return Err(DemoError::ProgramLink { log });
    }

    let vertex_position = u32::try_from(gl.attrib_location(&program, VERTEX_POSITION))
        .map_err(|_| DemoError::MissingAttribute(VERTEX_POSITION))?;
    let time = gl.uniform_location(&program, TIME_UNIFORM);
    if time.is_none() {
        log::debug!("`{TIME_UNIFORM}` uniform is not active; updates will be ignored");
    }

    Ok(ShaderProgram {
        program,
        vertex_position,
        time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{GlCall, RecordingGl};

    #[test]
    fn bundled_sources_declare_the_expected_inputs() {
        let vertex = BundledSources.source(ShaderStage::Vertex);
        let fragment = BundledSources.source(ShaderStage::Fragment);
        assert!(vertex.contains("attribute vec3 vertexPosition"));
        assert!(vertex.contains("gl_Position = vec4(vertexPosition, 1.0)"));
        assert!(fragment.contains("uniform mediump float time"));
        assert!(fragment.contains("sin(time)"));
    }

    #[test]
    fn compile_failure_carries_the_compiler_log() {
        let gl = RecordingGl::default();
        gl.fail_compile(ShaderStage::Fragment, "0:3: syntax error");

        let err = compile_shader(&gl, ShaderStage::Fragment, "void main( {").err();
        assert_eq!(
            err,
            Some(DemoError::ShaderCompile {
                stage: ShaderStage::Fragment,
                log: "0:3: syntax error".to_string(),
            })
        );
    }

    #[test]
    fn vertex_failure_stops_before_fragment_stage() {
        let gl = RecordingGl::default();
        gl.fail_compile(ShaderStage::Vertex, "bad");

        assert!(ShaderProgram::build(&gl, &BundledSources).is_err());
        let stages: Vec<_> = gl
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GlCall::CreateShader(stage) => Some(stage),
                _ => None,
            })
            .collect();
        assert_eq!(stages, vec![ShaderStage::Vertex]);
    }

    #[test]
    fn link_failure_is_reported() {
        let gl = RecordingGl::default();
        gl.fail_link("missing main");

        let err = ShaderProgram::build(&gl, &BundledSources).err();
        assert_eq!(
            err,
            Some(DemoError::ProgramLink {
                log: "missing main".to_string()
            })
        );
        assert_eq!(
            err.map(|e| e.to_string()),
            Some("Unable to initialize the shader program.".to_string())
        );
    }

    #[test]
    fn locations_resolved_after_link() {
        let gl = RecordingGl::default();
        let program = ShaderProgram::build(&gl, &BundledSources).unwrap();

        assert_eq!(program.vertex_position(), RecordingGl::VERTEX_POSITION_LOCATION);
        assert!(program.time().is_some());
        assert_eq!(gl.count(|c| matches!(c, GlCall::AttribLocation(_))), 1);
        assert_eq!(gl.count(|c| matches!(c, GlCall::UniformLocation(_))), 1);
    }

    #[test]
    fn inactive_attribute_is_an_error() {
        let gl = RecordingGl::default();
        let sources = InlineSources::new("void main(void) {}", "void main(void) {}");

        let err = ShaderProgram::build(&gl, &sources).err();
        assert_eq!(err, Some(DemoError::MissingAttribute(VERTEX_POSITION)));
    }
}
