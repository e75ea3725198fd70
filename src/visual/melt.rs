use crate::buffer::{copy_region, PixelBuffer, Rect};
use crate::heightmap::{self, SegmentKind};
use crate::noise::NoiseField;
use crate::rng::RandomSource;
use crate::visual::{FramePacing, MeltState};

const DX_MAX: f32 = 10.0;

/// Segment the image vertically and melt a random subset of the bands.
/// Kept bands copy through untouched; melted bands are re-blitted row by
/// row with small noise-driven horizontal offsets.
pub fn draw(
    state: &mut MeltState,
    source: &PixelBuffer,
    noise: &NoiseField,
    rng: &mut dyn RandomSource,
    canvas: &mut PixelBuffer,
) -> FramePacing {
    let image_width = source.width() as i32;
    let image_height = source.height();

    canvas.clear_black();
    canvas.composite(source, 0, 0, state.blend);

    let hint = rng.int_in(5, 15) as usize;
    for seg in heightmap::generate(hint, image_height, rng) {
        if seg.height == 0 {
            continue;
        }
        match seg.kind {
            SegmentKind::Original => {
                let r = Rect::new(0, seg.y as i32, image_width, seg.height as i32);
                copy_region(source, r, canvas, r);
            }
            SegmentKind::Melt => {
                let rows = rng.int_in(1, 10);
                let scan = (seg.height as f32 / rows as f32).round() as i32;
                let mut phase = noise.sample(state.noise_start);
                for y in 1..=rows {
                    let dx = (noise.sample(phase) * DX_MAX).round() as i32;
                    let src = Rect::new(0, seg.y as i32, image_width, scan);
                    let dest = Rect::new(
                        dx / 2,
                        seg.y as i32 + (y - 1) * scan,
                        image_width - dx,
                        scan,
                    );
                    copy_region(source, src, canvas, dest);
                    phase += 0.5;
                }
            }
        }
    }

    FramePacing::Continuous
}
