use crate::rng::RandomSource;

/// Per-channel compositing modes applied when one buffer is drawn onto
/// another. Darken, multiply, replace, burn, dodge and soft-light are
/// deliberately left out; they collapse the distortions into mud.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Normal,
    Lightest,
    Difference,
    Exclusion,
    Screen,
    HardLight,
    Add,
}

impl BlendMode {
    pub const ALL: [Self; 7] = [
        Self::Normal,
        Self::Lightest,
        Self::Difference,
        Self::Exclusion,
        Self::Screen,
        Self::HardLight,
        Self::Add,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Lightest => "lightest",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Screen => "screen",
            Self::HardLight => "hard-light",
            Self::Add => "add",
        }
    }

    pub fn pick(rng: &mut dyn RandomSource) -> Self {
        Self::ALL[rng.int_in(0, Self::ALL.len() as i32) as usize]
    }

    #[inline]
    pub fn mix(self, dst: u8, src: u8) -> u8 {
        let d = dst as i32;
        let s = src as i32;
        let v = match self {
            Self::Normal => s,
            Self::Lightest => d.max(s),
            Self::Difference => (d - s).abs(),
            Self::Exclusion => d + s - (2 * d * s) / 255,
            Self::Screen => 255 - ((255 - d) * (255 - s)) / 255,
            Self::HardLight => {
                if s < 128 {
                    (2 * d * s) / 255
                } else {
                    255 - (2 * (255 - d) * (255 - s)) / 255
                }
            }
            Self::Add => d + s,
        };
        v.clamp(0, 255) as u8
    }

    /// Blend one RGBA pixel over another. Output is opaque; the sketch
    /// works in flat RGB and alpha only exists for the encoder.
    #[inline]
    pub fn mix_px(self, dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
        [
            self.mix(dst[0], src[0]),
            self.mix(dst[1], src[1]),
            self.mix(dst[2], src[2]),
            255,
        ]
    }
}
