use crate::buffer::{PixelBuffer, Rect};
use crate::noise::NoiseField;
use crate::visual::{EchoState, FramePacing};

/// Slit-scan accumulator. Each frame stamps the source image into the echo
/// buffer at a noise-jittered vertical offset, then stretches the buffer's
/// top row two rows tall at the scan cursor. The buffer is never cleared
/// between frames except at wrap, so trails pile up.
pub fn draw(state: &mut EchoState, source: &PixelBuffer, noise: &NoiseField) -> FramePacing {
    let width = state.echo.width() as i32;
    let height = state.echo.height() as i32;

    let jitter = (noise.sample(state.yoff) * 10.0 - 5.0).round() as i32;
    state.canvas_y += jitter;

    state.echo.composite(source, 0, state.canvas_y, state.blend);
    state.echo.copy_region_within(
        Rect::new(0, 0, width, 1),
        Rect::new(0, state.scan_line as i32, width, 2),
    );

    state.scan_line += 1;
    state.yoff += 0.01;

    if state.canvas_y.abs() > height {
        state.canvas_y = 0;
    }
    if state.scan_line as i32 > height {
        state.scan_line = 0;
        state.echo.clear_black();
    }

    FramePacing::Continuous
}
