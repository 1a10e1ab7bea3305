use glam::IVec3;
use ::noise::{NoiseFn, OpenSimplex};

/// Seeded coherent noise at a fixed frequency.
///
/// Output is pure in (frequency, seed, coordinates) and lies roughly in
/// [-1, 1]. Coordinates are scaled by the frequency before sampling.
#[derive(Clone)]
pub struct NoiseSource {
    noise: OpenSimplex,
    frequency: f64,
    seed: u32,
}

impl NoiseSource {
    pub fn new(frequency: f64, seed: u32) -> Self {
        Self {
            noise: OpenSimplex::new(seed),
            frequency,
            seed,
        }
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn sample2(&self, x: f64, z: f64) -> f64 {
        self.noise.get([x * self.frequency, z * self.frequency])
    }

    pub fn sample3(&self, x: f64, y: f64, z: f64) -> f64 {
        self.noise
            .get([x * self.frequency, y * self.frequency, z * self.frequency])
    }

    /// 2D sample at an integer column.
    pub fn column(&self, x: i32, z: i32) -> f64 {
        self.sample2(x as f64, z as f64)
    }

    /// 3D sample at an integer block position.
    pub fn block(&self, pos: IVec3) -> f64 {
        self.sample3(pos.x as f64, pos.y as f64, pos.z as f64)
    }
}

impl std::fmt::Debug for NoiseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseSource")
            .field("frequency", &self.frequency)
            .field("seed", &self.seed)
            .finish()
    }
}

/// Noise source for a generation step whose seed is `world_seed + offset`.
pub fn create(frequency: f64, world_seed: u32, offset: u32) -> NoiseSource {
    NoiseSource::new(frequency, world_seed.wrapping_add(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_in_inputs() {
        let a = NoiseSource::new(0.1, 42);
        let b = NoiseSource::new(0.1, 42);
        for x in 0..20 {
            for z in 0..20 {
                assert_eq!(a.column(x, z), b.column(x, z));
                assert_eq!(a.block(IVec3::new(x, z, x + z)), b.block(IVec3::new(x, z, x + z)));
            }
        }
    }

    #[test]
    fn test_seed_changes_field() {
        let a = NoiseSource::new(0.13, 1);
        let b = NoiseSource::new(0.13, 2);
        let differs = (0..50).any(|i| a.column(i, i * 3) != b.column(i, i * 3));
        assert!(differs);
    }

    #[test]
    fn test_output_bounded() {
        let n = NoiseSource::new(0.37, 9);
        for x in -30..30 {
            for z in -30..30 {
                let v = n.sample3(x as f64, 3.0, z as f64);
                assert!((-1.5..=1.5).contains(&v), "{} out of range", v);
            }
        }
    }

    #[test]
    fn test_create_offsets_seed() {
        let n = create(0.2, u32::MAX, 3);
        assert_eq!(n.seed(), 2);
        assert_eq!(n.frequency(), 0.2);
    }
}
