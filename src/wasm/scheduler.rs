use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::Window;

use crate::error::DemoError;
use crate::scheduler::{FrameCallback, Scheduler, TimerCallback, TimerId};

/// `requestAnimationFrame` and `setTimeout` on the page's window.
pub struct BrowserScheduler {
    window: Window,
}

impl BrowserScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

fn host_error(what: &str, err: JsValue) -> DemoError {
    DemoError::Host(format!("{what} failed: {err:?}"))
}

impl Scheduler for BrowserScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Result<(), DemoError> {
        // One-shot closures free themselves once invoked.
        let callback = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
        self.window
            .request_animation_frame(callback.unchecked_ref())
            .map(|_| ())
            .map_err(|err| host_error("requestAnimationFrame", err))
    }

    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> Result<TimerId, DemoError> {
        let callback = Closure::once_into_js(move || callback());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
            .map(TimerId)
            .map_err(|err| host_error("setTimeout", err))
    }

    fn clear_timeout(&self, id: TimerId) {
        self.window.clear_timeout_with_handle(id.0);
    }
}
