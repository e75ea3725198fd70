use crate::buffer::{copy_region, PixelBuffer, Rect};
use crate::noise::NoiseField;
use crate::rng::RandomSource;
use crate::visual::{DriftState, FramePacing};

const DX_MAX: f32 = 250.0;
const SCAN_LINE: i32 = 10;

/// One band of the sweep. `fresh` bands recompute their source rect from the
/// band index; stale bands reuse the previous band's source rect while the
/// destination keeps advancing, which smears one strip of the image down the
/// frame. That smear is the signature look of this preset and must survive
/// any refactor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandPlan {
    pub src: Rect,
    pub dest: Rect,
    pub fresh: bool,
}

/// Plan a full-frame sweep of horizontal bands, ten rows tall each. The
/// noise phase chains across bands so neighbouring offsets stay coherent.
pub fn band_sweep(
    width: u32,
    height: u32,
    image_width: i32,
    noise: &NoiseField,
    start: f32,
    rng: &mut dyn RandomSource,
) -> Vec<BandPlan> {
    let rows = (height as i32) / SCAN_LINE;
    let mut plans: Vec<BandPlan> = Vec::with_capacity(rows.max(0) as usize);
    let mut phase = noise.sample(start);

    for y in 1..=rows {
        let dx = (noise.sample(phase) * DX_MAX).round() as i32;
        let fresh = y == 1 || rng.unit() > 0.5;
        let src = if fresh {
            Rect::new(0, y * SCAN_LINE, image_width, y * SCAN_LINE)
        } else {
            // Reuse keeps only the source side; the previous plan always
            // exists because the first band is forced fresh.
            plans[plans.len() - 1].src
        };
        let dest = Rect::new(
            dx / 2,
            (y - 1) * SCAN_LINE,
            width as i32 - dx,
            y * SCAN_LINE,
        );
        plans.push(BandPlan { src, dest, fresh });
        phase += 0.1;
    }

    plans
}

pub fn draw(
    state: &mut DriftState,
    source: &PixelBuffer,
    noise: &NoiseField,
    rng: &mut dyn RandomSource,
    canvas: &mut PixelBuffer,
) -> FramePacing {
    let plans = band_sweep(
        canvas.width(),
        canvas.height(),
        source.width() as i32,
        noise,
        state.noise_start,
        rng,
    );
    for plan in &plans {
        copy_region(source, plan.src, canvas, plan.dest);
    }
    state.noise_start += 0.1;
    FramePacing::PauseAfterFrame
}
