/// Deterministic 1-D value noise over a scalar phase.
///
/// The same phase always yields the same sample for a given seed, so jitter
/// derived from a slowly advancing phase stays visually coherent across
/// frames. Samples lie in `[0, 1)`.
pub struct NoiseField {
    seed: u32,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    fn lattice(&self, i: i64) -> f32 {
        let mut n =
            (i as u32).wrapping_mul(374_761_393) ^ self.seed.wrapping_mul(0x9E37_79B9);
        n = (n ^ (n >> 13)).wrapping_mul(1_274_126_177);
        n ^= n >> 16;
        ((n & 0x00FF_FFFF) as f32) / 16_777_216.0
    }

    pub fn sample(&self, phase: f32) -> f32 {
        let x0 = phase.floor();
        let t = phase - x0;
        let i = x0 as i64;
        let a = self.lattice(i);
        let b = self.lattice(i + 1);
        let s = t * t * (3.0 - 2.0 * t);
        a + (b - a) * s
    }
}
