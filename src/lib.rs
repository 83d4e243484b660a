//! Getting-started graphics samples for the browser: an animated WebGL quad
//! and a Canvas2D line.
//!
//! The samples are written against small capability traits ([`GlBackend`],
//! [`GlHost`], [`Scheduler`], [`Canvas2dHost`]) so they run unchanged on
//! the headless implementations in `mock` (behind the `mock` feature). The
//! web-sys adapters and the JS entry points only exist on wasm32.

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod line;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod renderer;
pub mod scheduler;
pub mod shader;
pub mod sizing;

pub use app::{launch_webgl_sample, run_loop};
pub use backend::{GlBackend, GlHost, ShaderStage};
pub use config::DemoConfig;
pub use error::{Alert, DemoError};
pub use line::{run_line_demo, Canvas2dHost, Line, LinePainter};
pub use renderer::{Renderer, RendererState};
pub use scheduler::{Debouncer, Scheduler};
pub use shader::{BundledSources, InlineSources, ShaderSources};
pub use sizing::{Size, Surface};

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::{BundledSources, DemoConfig};

    pub mod canvas2d;
    pub mod render;
    pub mod scheduler;

    #[wasm_bindgen(start)]
    pub fn init() {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
        // A second init (e.g. both demos on one page) keeps the first logger.
        let _ = console_log::init_with_level(log::Level::Debug);
    }

    /// Starts the WebGL sample on the `glCanvas` element.
    #[wasm_bindgen(js_name = runWebGlSample)]
    pub fn run_webgl_sample() -> Result<(), JsValue> {
        let config = DemoConfig::default();
        let window = web_sys::window().ok_or("no window")?;
        let host = render::WebGlPage::new(window.clone(), &config.gl_canvas_id)?;
        let scheduler = std::rc::Rc::new(scheduler::BrowserScheduler::new(window));

        // The frame and resize callbacks keep the renderer alive.
        crate::launch_webgl_sample(&host, scheduler, &BundledSources, &config)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(())
    }

    /// Draws the Canvas2D line on the `canvas` element.
    #[wasm_bindgen(js_name = runCanvas2dSample)]
    pub fn run_canvas2d_sample() -> Result<(), JsValue> {
        let config = DemoConfig::default();
        let window = web_sys::window().ok_or("no window")?;
        let page = canvas2d::Canvas2dPage::new(window, &config.canvas_2d_id)?;
        crate::run_line_demo(&page).map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(())
    }
}
