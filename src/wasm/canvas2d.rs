use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::error::Alert;
use crate::line::{Canvas2dHost, LinePainter};
use crate::sizing::Size;

impl LinePainter for CanvasRenderingContext2d {
    fn begin_path(&self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn stroke(&self) {
        CanvasRenderingContext2d::stroke(self);
    }
}

pub struct Canvas2dPage {
    window: Window,
    canvas: HtmlCanvasElement,
}

impl Canvas2dPage {
    pub fn new(window: Window, canvas_id: &str) -> Result<Self, JsValue> {
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;
        Ok(Self { window, canvas })
    }
}

impl Alert for Canvas2dPage {
    fn alert(&self, message: &str) {
        if self.window.alert_with_message(message).is_err() {
            web_sys::console::error_1(&JsValue::from_str(message));
        }
    }
}

impl Canvas2dHost for Canvas2dPage {
    type Context = CanvasRenderingContext2d;

    fn context_2d(&self) -> Result<CanvasRenderingContext2d, String> {
        self.canvas
            .get_context("2d")
            .map_err(|err| format!("{err:?}"))?
            .ok_or_else(|| "getContext(\"2d\") returned null".to_string())?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "context is not a CanvasRenderingContext2d".to_string())
    }

    fn display_size(&self) -> Size {
        let clamp = |v: i32| u32::try_from(v).unwrap_or(0);
        Size::new(clamp(self.canvas.offset_width()), clamp(self.canvas.offset_height()))
    }

    fn set_backing_size(&self, size: Size) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }
}
