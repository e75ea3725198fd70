use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;

use crate::buffer::PixelBuffer;

const MAX_SOURCES: usize = 4;

pub struct SourceImage {
    pub name: String,
    pub pixels: PixelBuffer,
}

/// The pool of base images the distortions tear apart. Loaded from disk when
/// a usable directory exists, synthesized otherwise so the sketch always has
/// something to show.
pub struct SourceLibrary {
    images: Vec<SourceImage>,
}

impl SourceLibrary {
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let mut paths: Vec<PathBuf> = match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    matches!(
                        p.extension().and_then(|e| e.to_str()),
                        Some("png" | "jpg" | "jpeg")
                    )
                })
                .collect(),
            Err(_) => Vec::new(),
        };
        paths.sort();
        paths.truncate(MAX_SOURCES);

        if paths.is_empty() {
            return Ok(Self {
                images: synth_sources(),
            });
        }

        let mut images = Vec::with_capacity(paths.len());
        for path in paths {
            let decoded = image::open(&path)
                .with_context(|| format!("decoding {}", path.display()))?
                .to_rgba8();
            let (w, h) = decoded.dimensions();
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            images.push(SourceImage {
                name,
                pixels: PixelBuffer::from_rgba(w, h, decoded.into_raw()),
            });
        }
        Ok(Self { images })
    }

    pub fn from_buffers(buffers: Vec<PixelBuffer>) -> Self {
        let images = buffers
            .into_iter()
            .enumerate()
            .map(|(i, pixels)| SourceImage {
                name: format!("source-{i}"),
                pixels,
            })
            .collect();
        Self { images }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn get(&self, index: usize) -> &PixelBuffer {
        &self.images[index % self.images.len()].pixels
    }

    pub fn name(&self, index: usize) -> &str {
        &self.images[index % self.images.len()].name
    }
}

/// Procedural fallbacks used when no image directory is available. Flat
/// geometry with strong edges reads well through every distortion.
fn synth_sources() -> Vec<SourceImage> {
    const W: u32 = 320;
    const H: u32 = 240;

    let mut bands = PixelBuffer::new(W, H);
    for y in 0..H {
        let v = if (y / 24) % 2 == 0 { 230 } else { 40 };
        for x in 0..W {
            let r = (x * 255 / W) as u8;
            bands.put_pixel(x, y, [r, v, 255 - r, 255]);
        }
    }

    let mut rings = PixelBuffer::new(W, H);
    let (cx, cy) = (W as f32 / 2.0, H as f32 / 2.0);
    for y in 0..H {
        for x in 0..W {
            let d = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)).sqrt();
            let v = if (d as u32 / 16) % 2 == 0 { 245 } else { 25 };
            rings.put_pixel(x, y, [v, (d as u32 % 256) as u8, 200, 255]);
        }
    }

    let mut weave = PixelBuffer::new(W, H);
    for y in 0..H {
        for x in 0..W {
            let v = (((x / 12) + (y / 12)) % 2 * 210 + 30) as u8;
            weave.put_pixel(x, y, [v, 255 - v, (x ^ y) as u8, 255]);
        }
    }

    vec![
        SourceImage {
            name: "bands".to_string(),
            pixels: bands,
        },
        SourceImage {
            name: "rings".to_string(),
            pixels: rings,
        },
        SourceImage {
            name: "weave".to_string(),
            pixels: weave,
        },
    ]
}

/// Write the current canvas to `<preset>-<unix seconds>.png` in the working
/// directory and return the path.
pub fn save_screenshot(buf: &PixelBuffer, preset: &str) -> anyhow::Result<PathBuf> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let path = PathBuf::from(format!("{preset}-{stamp}.png"));
    let img = image::RgbaImage::from_raw(buf.width(), buf.height(), buf.pixels().to_vec())
        .context("canvas dimensions do not match pixel data")?;
    img.save(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
