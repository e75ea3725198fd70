pub mod drift;
pub mod echo;
pub mod melt;

use anyhow::bail;

use crate::assets::SourceLibrary;
use crate::blend::BlendMode;
use crate::buffer::{copy_region, PixelBuffer, Rect};
use crate::noise::NoiseField;
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresetKind {
    Drift,
    Melt,
    SlitScan,
}

/// Mutable per-preset state. Each variant carries exactly what its draw
/// routine needs; nothing leaks between presets and switching away leaves a
/// preset's progress intact.
pub enum PresetState {
    Drift(DriftState),
    Melt(MeltState),
    Echo(EchoState),
}

pub struct DriftState {
    pub image: usize,
    pub noise_start: f32,
    pub blend: BlendMode,
}

pub struct MeltState {
    pub image: usize,
    pub noise_start: f32,
    pub blend: BlendMode,
}

pub struct EchoState {
    pub image: usize,
    pub echo: PixelBuffer,
    pub canvas_y: i32,
    pub scan_line: u32,
    pub yoff: f32,
    pub blend: BlendMode,
}

/// What a draw routine wants from the frame loop once its frame is out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePacing {
    /// Keep drawing every tick.
    Continuous,
    /// Hold this frame until the user asks for another.
    PauseAfterFrame,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// Frame gate for the loop. Paused mode still honors explicit single-frame
/// requests, consuming one per tick.
pub struct Scheduler {
    state: RunState,
    pending: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            state: RunState::Running,
            pending: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn pause(&mut self) {
        self.state = RunState::Paused;
    }

    pub fn resume(&mut self) {
        self.state = RunState::Running;
        self.pending = 0;
    }

    pub fn request_frame(&mut self) {
        self.pending = self.pending.saturating_add(1);
    }

    pub fn should_draw(&mut self) -> bool {
        match self.state {
            RunState::Running => true,
            RunState::Paused => {
                if self.pending > 0 {
                    self.pending -= 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn apply(&mut self, pacing: FramePacing) {
        match pacing {
            FramePacing::Continuous => self.resume(),
            FramePacing::PauseAfterFrame => self.pause(),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Preset {
    pub name: &'static str,
    pub kind: PresetKind,
    state: Option<PresetState>,
}

pub const PRESET_ORDER: [&str; 3] = ["drift", "melt", "slit-scan"];

/// Registry of presets plus the image pool they all draw from. Exactly one
/// preset is active at a time; switching never resets the others.
pub struct PresetBank {
    presets: Vec<Preset>,
    active: usize,
    sources: SourceLibrary,
}

impl PresetBank {
    pub fn new(sources: SourceLibrary) -> anyhow::Result<Self> {
        let presets = vec![
            Preset {
                name: "drift",
                kind: PresetKind::Drift,
                state: None,
            },
            Preset {
                name: "melt",
                kind: PresetKind::Melt,
                state: None,
            },
            Preset {
                name: "slit-scan",
                kind: PresetKind::SlitScan,
                state: None,
            },
        ];
        Self::with_presets(presets, sources)
    }

    pub fn with_presets(presets: Vec<Preset>, sources: SourceLibrary) -> anyhow::Result<Self> {
        if presets.is_empty() {
            bail!("no presets registered");
        }
        if sources.is_empty() {
            bail!("no source images available");
        }
        Ok(Self {
            presets,
            active: 0,
            sources,
        })
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.presets.iter().map(|p| p.name)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_name(&self) -> &'static str {
        self.presets[self.active].name
    }

    pub fn active_state(&self) -> Option<&PresetState> {
        self.presets[self.active].state.as_ref()
    }

    /// Activate the preset with the given name. Unknown names leave the
    /// active preset unchanged.
    pub fn select(&mut self, name: &str) -> bool {
        match self.presets.iter().position(|p| p.name == name) {
            Some(i) => {
                self.active = i;
                true
            }
            None => false,
        }
    }

    pub fn select_next(&mut self) {
        self.active = (self.active + 1) % self.presets.len();
    }

    pub fn select_previous(&mut self) {
        self.active = (self.active + self.presets.len() - 1) % self.presets.len();
    }

    pub fn select_random(&mut self, rng: &mut dyn RandomSource) {
        self.active = rng.int_in(0, self.presets.len() as i32) as usize;
    }

    /// Advance the active preset to the next source image. The slit-scan
    /// accumulator restarts from black since its feedback trail belongs to
    /// the old image.
    pub fn cycle_source(&mut self, rng: &mut dyn RandomSource) {
        self.ensure_setup(rng);
        let sources = &self.sources;
        let n = sources.len();
        let Some(state) = self.presets[self.active].state.as_mut() else {
            return;
        };
        match state {
            PresetState::Drift(s) => s.image = (s.image + 1) % n,
            PresetState::Melt(s) => s.image = (s.image + 1) % n,
            PresetState::Echo(s) => {
                s.image = (s.image + 1) % n;
                let img = sources.get(s.image);
                s.echo = PixelBuffer::new(img.width(), img.height());
                s.canvas_y = 0;
                s.scan_line = 0;
                s.yoff = 0.1;
            }
        }
    }

    pub fn set_blend(&mut self, rng: &mut dyn RandomSource, blend: BlendMode) {
        self.ensure_setup(rng);
        if let Some(state) = self.presets[self.active].state.as_mut() {
            match state {
                PresetState::Drift(s) => s.blend = blend,
                PresetState::Melt(s) => s.blend = blend,
                PresetState::Echo(s) => s.blend = blend,
            }
        }
    }

    pub fn active_blend(&self) -> Option<BlendMode> {
        self.presets[self.active].state.as_ref().map(|s| match s {
            PresetState::Drift(d) => d.blend,
            PresetState::Melt(m) => m.blend,
            PresetState::Echo(e) => e.blend,
        })
    }

    /// Render one frame of the active preset into `canvas`, resizing it to
    /// the source image's dimensions first.
    pub fn draw(
        &mut self,
        canvas: &mut PixelBuffer,
        noise: &NoiseField,
        rng: &mut dyn RandomSource,
    ) -> FramePacing {
        self.ensure_setup(rng);
        let sources = &self.sources;
        let preset = &mut self.presets[self.active];
        let Some(state) = preset.state.as_mut() else {
            return FramePacing::Continuous;
        };

        let image = match state {
            PresetState::Drift(s) => s.image,
            PresetState::Melt(s) => s.image,
            PresetState::Echo(s) => s.image,
        };
        let source = sources.get(image);
        if canvas.width() != source.width() || canvas.height() != source.height() {
            *canvas = PixelBuffer::new(source.width(), source.height());
        }

        match state {
            PresetState::Drift(s) => drift::draw(s, source, noise, rng, canvas),
            PresetState::Melt(s) => melt::draw(s, source, noise, rng, canvas),
            PresetState::Echo(s) => {
                let pacing = echo::draw(s, source, noise);
                let full = Rect::new(0, 0, s.echo.width() as i32, s.echo.height() as i32);
                copy_region(&s.echo, full, canvas, full);
                pacing
            }
        }
    }

    /// Initialize the active preset's state on first use. Idempotent.
    fn ensure_setup(&mut self, rng: &mut dyn RandomSource) {
        let sources = &self.sources;
        let preset = &mut self.presets[self.active];
        if preset.state.is_some() {
            return;
        }
        preset.state = Some(match preset.kind {
            PresetKind::Drift => PresetState::Drift(DriftState {
                image: 0,
                noise_start: 0.0,
                blend: BlendMode::Normal,
            }),
            PresetKind::Melt => PresetState::Melt(MeltState {
                image: 0,
                noise_start: 0.0,
                blend: BlendMode::Normal,
            }),
            PresetKind::SlitScan => {
                let image = rng.int_in(0, sources.len() as i32) as usize;
                let img = sources.get(image);
                PresetState::Echo(EchoState {
                    image,
                    echo: PixelBuffer::new(img.width(), img.height()),
                    canvas_y: 0,
                    scan_line: 0,
                    yoff: 0.1,
                    blend: BlendMode::Normal,
                })
            }
        });
    }
}
