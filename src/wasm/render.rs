use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGlBuffer, WebGlProgram, WebGlRenderingContext as GL, WebGlShader,
    WebGlUniformLocation, Window,
};

use crate::backend::{AttribLayout, GlBackend, GlHost, ShaderStage};
use crate::error::{Alert, DemoError};
use crate::sizing::{Size, Surface};

/// `GlBackend` over a WebGL 1 context (`webgl` / `experimental-webgl`).
pub struct WebGl(GL);

impl GlBackend for WebGl {
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type Buffer = WebGlBuffer;
    type UniformLocation = WebGlUniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Option<WebGlShader> {
        let kind = match stage {
            ShaderStage::Vertex => GL::VERTEX_SHADER,
            ShaderStage::Fragment => GL::FRAGMENT_SHADER,
        };
        self.0.create_shader(kind)
    }

    fn compile_shader(&self, shader: &WebGlShader, source: &str) -> bool {
        self.0.shader_source(shader, source);
        self.0.compile_shader(shader);
        self.0
            .get_shader_parameter(shader, GL::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> Option<String> {
        self.0.get_shader_info_log(shader)
    }

    fn create_program(&self) -> Option<WebGlProgram> {
        self.0.create_program()
    }

    fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        self.0.attach_shader(program, shader);
    }

    fn link_program(&self, program: &WebGlProgram) -> bool {
        self.0.link_program(program);
        self.0
            .get_program_parameter(program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: &WebGlProgram) -> Option<String> {
        self.0.get_program_info_log(program)
    }

    fn use_program(&self, program: &WebGlProgram) {
        self.0.use_program(Some(program));
    }

    fn attrib_location(&self, program: &WebGlProgram, name: &str) -> i32 {
        self.0.get_attrib_location(program, name)
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.0.get_uniform_location(program, name)
    }

    fn create_buffer(&self) -> Option<WebGlBuffer> {
        self.0.create_buffer()
    }

    fn bind_array_buffer(&self, buffer: &WebGlBuffer) {
        self.0.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
    }

    fn upload_static(&self, data: &[f32]) {
        // Copies into a JS-owned array, so no view into wasm memory outlives the call.
        let array = js_sys::Float32Array::from(data);
        self.0
            .buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, GL::STATIC_DRAW);
    }

    fn vertex_attrib_pointer(&self, index: u32, layout: AttribLayout) {
        self.0.vertex_attrib_pointer_with_i32(
            index,
            layout.components,
            GL::FLOAT,
            layout.normalized,
            layout.stride,
            layout.offset,
        );
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.0.enable_vertex_attrib_array(index);
    }

    fn clear_color(&self, [r, g, b, a]: [f32; 4]) {
        self.0.clear_color(r, g, b, a);
    }

    fn clear_color_buffer(&self) {
        self.0.clear(GL::COLOR_BUFFER_BIT);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.0.viewport(x, y, width, height);
    }

    fn uniform1f(&self, location: Option<&WebGlUniformLocation>, value: f32) {
        self.0.uniform1f(location, value);
    }

    fn draw_triangle_strip(&self, first: i32, count: i32) {
        self.0.draw_arrays(GL::TRIANGLE_STRIP, first, count);
    }
}

/// The canvas element plus the window it lives in (for `devicePixelRatio`).
#[derive(Clone)]
pub struct CanvasSurface {
    window: Window,
    canvas: HtmlCanvasElement,
}

impl Surface for CanvasSurface {
    fn display_size(&self) -> Size {
        let clamp = |v: i32| u32::try_from(v).unwrap_or(0);
        Size::new(clamp(self.canvas.offset_width()), clamp(self.canvas.offset_height()))
    }

    fn pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn backing_size(&self) -> Size {
        Size::new(self.canvas.width(), self.canvas.height())
    }

    fn set_backing_size(&self, size: Size) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }
}

pub struct WebGlPage {
    surface: CanvasSurface,
}

impl WebGlPage {
    pub fn new(window: Window, canvas_id: &str) -> Result<Self, JsValue> {
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;
        Ok(Self {
            surface: CanvasSurface { window, canvas },
        })
    }
}

impl Alert for WebGlPage {
    fn alert(&self, message: &str) {
        if self.surface.window.alert_with_message(message).is_err() {
            web_sys::console::error_1(&JsValue::from_str(message));
        }
    }
}

impl GlHost for WebGlPage {
    type Backend = WebGl;
    type Surface = CanvasSurface;

    fn context(&self, context_id: &str) -> Option<WebGl> {
        // Some browsers throw instead of returning null for unknown ids.
        let context = self.surface.canvas.get_context(context_id).ok()??;
        context.dyn_into::<GL>().ok().map(WebGl)
    }

    fn surface(&self) -> CanvasSurface {
        self.surface.clone()
    }

    fn on_resize(&self, listener: Box<dyn FnMut()>) -> Result<(), DemoError> {
        let closure = Closure::wrap(listener);
        self.surface
            .window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|err| DemoError::Host(format!("cannot listen for resize: {err:?}")))?;
        // Listens for the life of the page.
        closure.forget();
        Ok(())
    }
}
