//! The WebGL sample: one program, one static quad, one animated uniform.

use crate::backend::{AttribLayout, GlBackend};
use crate::config::DemoConfig;
use crate::error::DemoError;
use crate::shader::{ShaderProgram, ShaderSources};
use crate::sizing::{self, Size, Surface};

/// Unit quad in triangle-strip order.
pub const QUAD_VERTICES: [f32; 12] = [
    1.0, 1.0, 0.0, //
    -1.0, 1.0, 0.0, //
    1.0, -1.0, 0.0, //
    -1.0, -1.0, 0.0,
];
pub const QUAD_COMPONENTS: i32 = 3;
pub const QUAD_VERTEX_COUNT: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererState {
    Uninitialized,
    Ready,
    Running,
}

/// Elapsed time since the first frame, wrapped to keep the shader input small.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    first_frame_ms: Option<f64>,
    wrap_seconds: f64,
}

impl FrameClock {
    pub fn new(wrap_seconds: f64) -> Self {
        Self {
            first_frame_ms: None,
            wrap_seconds,
        }
    }

    /// Latches the first call's timestamp; later calls measure from it.
    pub fn elapsed_seconds(&mut self, now_ms: f64) -> f64 {
        let first = *self.first_frame_ms.get_or_insert(now_ms);
        let elapsed = ((now_ms - first) / 1000.0).max(0.0);
        elapsed % self.wrap_seconds
    }

    /// Elapsed seconds narrowed for a `float` uniform. Values that round up
    /// to the wrap point in f32 restart at 0.
    pub fn shader_seconds(&mut self, now_ms: f64) -> f32 {
        let narrowed = self.elapsed_seconds(now_ms) as f32;
        if f64::from(narrowed) >= self.wrap_seconds {
            0.0
        } else {
            narrowed
        }
    }

    pub fn first_frame_ms(&self) -> Option<f64> {
        self.first_frame_ms
    }
}

/// Owns the context, the canvas surface and every GL object the sample uses.
pub struct Renderer<B: GlBackend, S: Surface> {
    gl: B,
    surface: S,
    clear_color: [f32; 4],
    state: RendererState,
    program: Option<ShaderProgram<B>>,
    buffer: Option<B::Buffer>,
    clock: FrameClock,
    frames: u64,
}

impl<B: GlBackend, S: Surface> Renderer<B, S> {
    pub fn new(gl: B, surface: S, config: &DemoConfig) -> Self {
        Self {
            gl,
            surface,
            clear_color: config.clear_color,
            state: RendererState::Uninitialized,
            program: None,
            buffer: None,
            clock: FrameClock::new(config.time_wrap_seconds),
            frames: 0,
        }
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    pub fn gl(&self) -> &B {
        &self.gl
    }

    pub fn program(&self) -> Option<&ShaderProgram<B>> {
        self.program.as_ref()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Sizes the canvas, builds the program, uploads the quad and sets up
    /// render state. Moves `Uninitialized` to `Ready`.
    pub fn initialize<Src>(&mut self, sources: &Src) -> Result<(), DemoError>
    where
        Src: ShaderSources + ?Sized,
    {
        self.expect_state(RendererState::Uninitialized)?;
        self.adjust_canvas_size();

        let program = ShaderProgram::build(&self.gl, sources)?;
        let buffer = upload_quad(&self.gl)?;
        setup_state(&self.gl, &program, &buffer, self.clear_color);

        self.program = Some(program);
        self.buffer = Some(buffer);
        self.state = RendererState::Ready;
        log::debug!("renderer ready");
        Ok(())
    }

    pub fn adjust_canvas_size(&mut self) -> Option<Size> {
        sizing::adjust_canvas_size(&self.surface, &self.gl)
    }

    /// `Ready` to `Running`. The frame clock starts on the first frame.
    pub fn start(&mut self) -> Result<(), DemoError> {
        self.expect_state(RendererState::Ready)?;
        self.state = RendererState::Running;
        log::debug!("render loop started");
        Ok(())
    }

    /// Draws one frame and returns the time value pushed to the shader.
    pub fn render_frame(&mut self, now_ms: f64) -> Result<f32, DemoError> {
        self.expect_state(RendererState::Running)?;
        let program = self.program.as_ref().ok_or(DemoError::InvalidState {
            expected: RendererState::Ready,
            actual: self.state,
        })?;

        self.gl.clear_color_buffer();
        let time = self.clock.shader_seconds(now_ms);
        self.gl.uniform1f(program.time(), time);
        self.gl.draw_triangle_strip(0, QUAD_VERTEX_COUNT);

        self.frames += 1;
        Ok(time)
    }

    fn expect_state(&self, expected: RendererState) -> Result<(), DemoError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(DemoError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }
}

fn upload_quad<B: GlBackend>(gl: &B) -> Result<B::Buffer, DemoError> {
    let buffer = gl
        .create_buffer()
        .ok_or(DemoError::ObjectCreation("buffer"))?;
    gl.bind_array_buffer(&buffer);
    gl.upload_static(&QUAD_VERTICES);
    Ok(buffer)
}

fn setup_state<B: GlBackend>(
    gl: &B,
    program: &ShaderProgram<B>,
    buffer: &B::Buffer,
    clear_color: [f32; 4],
) {
    gl.use_program(program.program());
    // Upload already left it bound; bind again so setup stands on its own.
    gl.bind_array_buffer(buffer);
    gl.vertex_attrib_pointer(program.vertex_position(), AttribLayout::packed(QUAD_COMPONENTS));
    gl.enable_vertex_attrib_array(program.vertex_position());
    gl.clear_color(clear_color);
}
