//! The Canvas2D sample: one diagonal line, drawn once.

use crate::error::{self, Alert, DemoError};
use crate::sizing::Size;

/// Path operations of a 2D drawing context.
pub trait LinePainter {
    fn begin_path(&self);
    fn move_to(&self, x: f64, y: f64);
    fn line_to(&self, x: f64, y: f64);
    fn stroke(&self);
}

/// The page hosting the 2D canvas.
pub trait Canvas2dHost: Alert {
    type Context: LinePainter;

    /// `canvas.getContext("2d")`; the error carries the host's message.
    fn context_2d(&self) -> Result<Self::Context, String>;
    fn display_size(&self) -> Size;
    fn set_backing_size(&self, size: Size);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

impl Line {
    /// Top-left to bottom-right of a canvas of `size`.
    pub fn diagonal(size: Size) -> Self {
        Self {
            from: (0.0, 0.0),
            to: (f64::from(size.width), f64::from(size.height)),
        }
    }

    pub fn draw<P: LinePainter + ?Sized>(&self, painter: &P) {
        painter.begin_path();
        painter.move_to(self.from.0, self.from.1);
        painter.line_to(self.to.0, self.to.1);
        painter.stroke();
    }
}

/// Matches the backing store to the on-screen size (no pixel-ratio
/// correction) and strokes the diagonal. Alerts and returns on failure.
pub fn run_line_demo<H: Canvas2dHost + ?Sized>(host: &H) -> Result<Line, DemoError> {
    let context = host
        .context_2d()
        .map_err(|msg| error::report(host, DemoError::Canvas2dUnavailable(msg)))?;

    let size = host.display_size();
    host.set_backing_size(size);

    let line = Line::diagonal(size);
    line.draw(&context);
    log::debug!("line drawn to ({}, {})", line.to.0, line.to.1);
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_spans_the_canvas() {
        let line = Line::diagonal(Size::new(400, 300));
        assert_eq!(line.from, (0.0, 0.0));
        assert_eq!(line.to, (400.0, 300.0));
    }
}
