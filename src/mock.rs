//! Headless stand-ins for the browser: a recording GL backend, canvas
//! surfaces, a page host and a manually driven scheduler.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::backend::{AttribLayout, GlBackend, GlHost, ShaderStage};
use crate::error::{Alert, DemoError};
use crate::line::{Canvas2dHost, LinePainter};
use crate::scheduler::{FrameCallback, Scheduler, TimerCallback, TimerId};
use crate::sizing::{Size, Surface};

/// One recorded GL call. Object handles are plain ids.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CreateShader(ShaderStage),
    CompileShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    LinkProgram(u32),
    UseProgram(u32),
    AttribLocation(String),
    UniformLocation(String),
    CreateBuffer(u32),
    BindArrayBuffer(u32),
    UploadStatic(Vec<f32>),
    VertexAttribPointer(u32, AttribLayout),
    EnableVertexAttribArray(u32),
    ClearColor([f32; 4]),
    ClearColorBuffer,
    Viewport(i32, i32, i32, i32),
    Uniform1f(Option<u32>, f32),
    DrawTriangleStrip(i32, i32),
}

#[derive(Default)]
struct GlState {
    calls: Vec<GlCall>,
    next_id: u32,
    shaders: HashMap<u32, (ShaderStage, String)>,
    attached: HashMap<u32, Vec<u32>>,
    compile_failures: HashMap<ShaderStage, String>,
    link_failure: Option<String>,
}

impl GlState {
    fn alloc(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// A name counts as active when any attached stage mentions it.
    fn program_mentions(&self, program: u32, name: &str) -> bool {
        self.attached
            .get(&program)
            .into_iter()
            .flatten()
            .filter_map(|id| self.shaders.get(id))
            .any(|(_, source)| source.contains(name))
    }
}

/// GL backend that records every call instead of drawing. Clones share the
/// same log.
#[derive(Clone, Default)]
pub struct RecordingGl {
    state: Rc<RefCell<GlState>>,
}

impl RecordingGl {
    pub const VERTEX_POSITION_LOCATION: u32 = 0;
    /// Location handed out for any active uniform.
    pub const TIME_LOCATION: u32 = 7;

    /// Compiling any shader of `stage` fails with `log`.
    pub fn fail_compile(&self, stage: ShaderStage, log: &str) {
        self.state
            .borrow_mut()
            .compile_failures
            .insert(stage, log.to_string());
    }

    pub fn fail_link(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    pub fn calls(&self) -> Vec<GlCall> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    fn record(&self, call: GlCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl GlBackend for RecordingGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type UniformLocation = u32;

    fn create_shader(&self, stage: ShaderStage) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let id = state.alloc();
        state.shaders.insert(id, (stage, String::new()));
        state.calls.push(GlCall::CreateShader(stage));
        Some(id)
    }

    fn compile_shader(&self, shader: &u32, source: &str) -> bool {
        let mut state = self.state.borrow_mut();
        state.calls.push(GlCall::CompileShader(*shader));
        let Some(entry) = state.shaders.get_mut(shader) else {
            return false;
        };
        entry.1 = source.to_string();
        let stage = entry.0;
        !state.compile_failures.contains_key(&stage)
    }

    fn shader_info_log(&self, shader: &u32) -> Option<String> {
        let state = self.state.borrow();
        let (stage, _) = state.shaders.get(shader)?;
        state.compile_failures.get(stage).cloned()
    }

    fn create_program(&self) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let id = state.alloc();
        state.attached.insert(id, Vec::new());
        state.calls.push(GlCall::CreateProgram(id));
        Some(id)
    }

    fn attach_shader(&self, program: &u32, shader: &u32) {
        let mut state = self.state.borrow_mut();
        state.attached.entry(*program).or_default().push(*shader);
        state.calls.push(GlCall::AttachShader(*program, *shader));
    }

    fn link_program(&self, program: &u32) -> bool {
        let mut state = self.state.borrow_mut();
        state.calls.push(GlCall::LinkProgram(*program));
        state.link_failure.is_none()
    }

    fn program_info_log(&self, _program: &u32) -> Option<String> {
        self.state.borrow().link_failure.clone()
    }

    fn use_program(&self, program: &u32) {
        self.record(GlCall::UseProgram(*program));
    }

    fn attrib_location(&self, program: &u32, name: &str) -> i32 {
        let mut state = self.state.borrow_mut();
        state.calls.push(GlCall::AttribLocation(name.to_string()));
        if state.program_mentions(*program, name) {
            Self::VERTEX_POSITION_LOCATION as i32
        } else {
            -1
        }
    }

    fn uniform_location(&self, program: &u32, name: &str) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        state.calls.push(GlCall::UniformLocation(name.to_string()));
        state
            .program_mentions(*program, name)
            .then_some(Self::TIME_LOCATION)
    }

    fn create_buffer(&self) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let id = state.alloc();
        state.calls.push(GlCall::CreateBuffer(id));
        Some(id)
    }

    fn bind_array_buffer(&self, buffer: &u32) {
        self.record(GlCall::BindArrayBuffer(*buffer));
    }

    fn upload_static(&self, data: &[f32]) {
        self.record(GlCall::UploadStatic(data.to_vec()));
    }

    fn vertex_attrib_pointer(&self, index: u32, layout: AttribLayout) {
        self.record(GlCall::VertexAttribPointer(index, layout));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(GlCall::EnableVertexAttribArray(index));
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.record(GlCall::ClearColor(rgba));
    }

    fn clear_color_buffer(&self) {
        self.record(GlCall::ClearColorBuffer);
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(GlCall::Viewport(x, y, width, height));
    }

    fn uniform1f(&self, location: Option<&u32>, value: f32) {
        self.record(GlCall::Uniform1f(location.copied(), value));
    }

    fn draw_triangle_strip(&self, first: i32, count: i32) {
        self.record(GlCall::DrawTriangleStrip(first, count));
    }
}

/// Canvas whose layout size and pixel ratio the test controls. The backing
/// store starts at the HTML default of 300x150.
#[derive(Clone)]
pub struct MockSurface {
    display: Rc<Cell<Size>>,
    pixel_ratio: Rc<Cell<f64>>,
    backing: Rc<Cell<Size>>,
}

impl MockSurface {
    pub fn new(display: Size, pixel_ratio: f64) -> Self {
        Self {
            display: Rc::new(Cell::new(display)),
            pixel_ratio: Rc::new(Cell::new(pixel_ratio)),
            backing: Rc::new(Cell::new(Size::new(300, 150))),
        }
    }

    pub fn set_display_size(&self, size: Size) {
        self.display.set(size);
    }

    pub fn set_pixel_ratio(&self, ratio: f64) {
        self.pixel_ratio.set(ratio);
    }
}

impl Surface for MockSurface {
    fn display_size(&self) -> Size {
        self.display.get()
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio.get()
    }

    fn backing_size(&self) -> Size {
        self.backing.get()
    }

    fn set_backing_size(&self, size: Size) {
        self.backing.set(size);
    }
}

/// A page with one canvas. Only the listed context identifiers succeed.
pub struct MockHost {
    gl: RecordingGl,
    surface: MockSurface,
    supported: Vec<String>,
    requested: RefCell<Vec<String>>,
    alerts: RefCell<Vec<String>>,
    resize_listeners: RefCell<Vec<Box<dyn FnMut()>>>,
}

impl MockHost {
    pub fn new(surface: MockSurface, supported: &[&str]) -> Self {
        Self {
            gl: RecordingGl::default(),
            surface,
            supported: supported.iter().map(|s| s.to_string()).collect(),
            requested: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
            resize_listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn gl(&self) -> &RecordingGl {
        &self.gl
    }

    pub fn mock_surface(&self) -> &MockSurface {
        &self.surface
    }

    pub fn context_requests(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn resize_listener_count(&self) -> usize {
        self.resize_listeners.borrow().len()
    }

    /// Delivers one window resize event to every listener.
    pub fn fire_resize(&self) {
        for listener in self.resize_listeners.borrow_mut().iter_mut() {
            listener();
        }
    }
}

impl Alert for MockHost {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

impl GlHost for MockHost {
    type Backend = RecordingGl;
    type Surface = MockSurface;

    fn context(&self, context_id: &str) -> Option<RecordingGl> {
        self.requested.borrow_mut().push(context_id.to_string());
        self.supported
            .iter()
            .any(|s| s == context_id)
            .then(|| self.gl.clone())
    }

    fn surface(&self) -> MockSurface {
        self.surface.clone()
    }

    fn on_resize(&self, listener: Box<dyn FnMut()>) -> Result<(), DemoError> {
        self.resize_listeners.borrow_mut().push(listener);
        Ok(())
    }
}

/// Scheduler on a virtual clock. Frames run only when `run_frame` is called;
/// timers fire as `advance` moves the clock past their deadline.
#[derive(Default)]
pub struct ManualScheduler {
    now_ms: Cell<f64>,
    next_timer: Cell<i32>,
    frames: RefCell<Vec<FrameCallback>>,
    timers: RefCell<BTreeMap<TimerId, (f64, TimerCallback)>>,
}

impl ManualScheduler {
    pub fn now(&self) -> f64 {
        self.now_ms.get()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Runs the frames requested so far with the current time. Frames they
    /// request in turn wait for the next call. Returns how many ran.
    pub fn run_frame(&self) -> usize {
        let due = std::mem::take(&mut *self.frames.borrow_mut());
        let ran = due.len();
        let now = self.now();
        for callback in due {
            callback(now);
        }
        ran
    }

    /// Moves the clock forward, firing due timers in deadline order.
    pub fn advance(&self, ms: u32) {
        let target = self.now() + f64::from(ms);
        while let Some(id) = self.next_due(target) {
            let entry = self.timers.borrow_mut().remove(&id);
            if let Some((deadline, callback)) = entry {
                self.now_ms.set(deadline);
                callback();
            }
        }
        self.now_ms.set(target);
    }

    fn next_due(&self, target: f64) -> Option<TimerId> {
        self.timers
            .borrow()
            .iter()
            .filter(|(_, (deadline, _))| *deadline <= target)
            .min_by(|a, b| {
                a.1 .0
                    .partial_cmp(&b.1 .0)
                    .unwrap_or(Ordering::Equal)
                    .then(a.0.cmp(b.0))
            })
            .map(|(id, _)| *id)
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Result<(), DemoError> {
        self.frames.borrow_mut().push(callback);
        Ok(())
    }

    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> Result<TimerId, DemoError> {
        let id = TimerId(self.next_timer.get() + 1);
        self.next_timer.set(id.0);
        let deadline = self.now() + f64::from(delay_ms);
        self.timers.borrow_mut().insert(id, (deadline, callback));
        Ok(id)
    }

    fn clear_timeout(&self, id: TimerId) {
        self.timers.borrow_mut().remove(&id);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathOp {
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
}

#[derive(Clone, Default)]
pub struct RecordingPainter {
    ops: Rc<RefCell<Vec<PathOp>>>,
}

impl RecordingPainter {
    pub fn ops(&self) -> Vec<PathOp> {
        self.ops.borrow().clone()
    }
}

impl LinePainter for RecordingPainter {
    fn begin_path(&self) {
        self.ops.borrow_mut().push(PathOp::BeginPath);
    }

    fn move_to(&self, x: f64, y: f64) {
        self.ops.borrow_mut().push(PathOp::MoveTo(x, y));
    }

    fn line_to(&self, x: f64, y: f64) {
        self.ops.borrow_mut().push(PathOp::LineTo(x, y));
    }

    fn stroke(&self) {
        self.ops.borrow_mut().push(PathOp::Stroke);
    }
}

/// A 2D canvas page; `context_error` makes `getContext("2d")` throw.
pub struct MockCanvas2d {
    display: Size,
    backing: Cell<Size>,
    context_error: Option<String>,
    painter: RecordingPainter,
    alerts: RefCell<Vec<String>>,
}

impl MockCanvas2d {
    pub fn new(display: Size) -> Self {
        Self {
            display,
            backing: Cell::new(Size::new(300, 150)),
            context_error: None,
            painter: RecordingPainter::default(),
            alerts: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(display: Size, message: &str) -> Self {
        Self {
            context_error: Some(message.to_string()),
            ..Self::new(display)
        }
    }

    pub fn backing_size(&self) -> Size {
        self.backing.get()
    }

    pub fn ops(&self) -> Vec<PathOp> {
        self.painter.ops()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Alert for MockCanvas2d {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

impl Canvas2dHost for MockCanvas2d {
    type Context = RecordingPainter;

    fn context_2d(&self) -> Result<RecordingPainter, String> {
        match &self.context_error {
            Some(message) => Err(message.clone()),
            None => Ok(self.painter.clone()),
        }
    }

    fn display_size(&self) -> Size {
        self.display
    }

    fn set_backing_size(&self, size: Size) {
        self.backing.set(size);
    }
}
