/// Uniform random draws behind a seam, so the segmentation and band loops
/// can be driven by scripted values in tests instead of a live generator.
pub trait RandomSource {
    /// Uniform integer in `[lo, hi)`. Callers must pass `lo < hi`.
    fn int_in(&mut self, lo: i32, hi: i32) -> i32;

    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f32;
}

pub struct FastrandSource(pub fastrand::Rng);

impl FastrandSource {
    pub fn seeded(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl RandomSource for FastrandSource {
    fn int_in(&mut self, lo: i32, hi: i32) -> i32 {
        self.0.i32(lo..hi)
    }

    fn unit(&mut self) -> f32 {
        self.0.f32()
    }
}
