//! The slice of the WebGL API the sample needs, expressed as a trait so the
//! renderer can run against the browser or a headless recorder.

use std::fmt;

use crate::error::{Alert, DemoError};
use crate::sizing::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Layout of one float attribute inside the bound array buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttribLayout {
    pub components: i32,
    pub normalized: bool,
    /// Bytes between consecutive vertices; 0 means tightly packed.
    pub stride: i32,
    pub offset: i32,
}

impl AttribLayout {
    pub const fn packed(components: i32) -> Self {
        Self {
            components,
            normalized: false,
            stride: 0,
            offset: 0,
        }
    }
}

pub trait GlBackend {
    type Shader;
    type Program;
    type Buffer;
    type UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Option<Self::Shader>;
    /// Sets the source and compiles; returns the compile status.
    fn compile_shader(&self, shader: &Self::Shader, source: &str) -> bool;
    fn shader_info_log(&self, shader: &Self::Shader) -> Option<String>;

    fn create_program(&self) -> Option<Self::Program>;
    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    /// Links and returns the link status.
    fn link_program(&self, program: &Self::Program) -> bool;
    fn program_info_log(&self, program: &Self::Program) -> Option<String>;
    fn use_program(&self, program: &Self::Program);

    /// Negative when the attribute is not active in `program`.
    fn attrib_location(&self, program: &Self::Program, name: &str) -> i32;
    fn uniform_location(&self, program: &Self::Program, name: &str)
        -> Option<Self::UniformLocation>;

    fn create_buffer(&self) -> Option<Self::Buffer>;
    fn bind_array_buffer(&self, buffer: &Self::Buffer);
    /// Uploads into the bound array buffer with `STATIC_DRAW` usage.
    fn upload_static(&self, data: &[f32]);
    fn vertex_attrib_pointer(&self, index: u32, layout: AttribLayout);
    fn enable_vertex_attrib_array(&self, index: u32);

    fn clear_color(&self, rgba: [f32; 4]);
    fn clear_color_buffer(&self);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn uniform1f(&self, location: Option<&Self::UniformLocation>, value: f32);
    fn draw_triangle_strip(&self, first: i32, count: i32);
}

/// The page hosting the WebGL canvas.
pub trait GlHost: Alert {
    type Backend: GlBackend;
    type Surface: Surface;

    /// `canvas.getContext(id)`; `None` when the identifier is unsupported.
    fn context(&self, context_id: &str) -> Option<Self::Backend>;
    fn surface(&self) -> Self::Surface;
    /// Subscribes to window resize events for the page lifetime.
    fn on_resize(&self, listener: Box<dyn FnMut()>) -> Result<(), DemoError>;
}

/// Tries each identifier in order and returns the first context obtained.
pub fn acquire_context<H, I, S>(host: &H, context_ids: I) -> Result<H::Backend, DemoError>
where
    H: GlHost + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for id in context_ids {
        if let Some(gl) = host.context(id.as_ref()) {
            log::debug!("acquired `{}` context", id.as_ref());
            return Ok(gl);
        }
    }
    Err(DemoError::ContextUnavailable)
}
