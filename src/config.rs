//! Tunables for both demos.

use std::f64::consts::PI;

/// Settings shared by the WebGL and Canvas2D samples.
///
/// `Default` reproduces the values the pages in `static/` expect.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Element id of the WebGL canvas.
    pub gl_canvas_id: String,
    /// Context identifiers, tried in order until one yields a context.
    pub context_ids: Vec<String>,
    /// Quiet period after the last resize event before the canvas is resized.
    pub resize_debounce_ms: u32,
    /// Elapsed seconds fed to the `time` uniform wrap at this value.
    pub time_wrap_seconds: f64,
    pub clear_color: [f32; 4],
    /// Element id of the Canvas2D canvas.
    pub canvas_2d_id: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            gl_canvas_id: "glCanvas".to_string(),
            context_ids: vec!["webgl".to_string(), "experimental-webgl".to_string()],
            resize_debounce_ms: 600,
            time_wrap_seconds: 1000.0 * PI,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            canvas_2d_id: "canvas".to_string(),
        }
    }
}
