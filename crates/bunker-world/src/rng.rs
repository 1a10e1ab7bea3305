//! Position hashing for deterministic per-feature randomness.

use glam::IVec3;

/// Hash a block position and seed into a well-mixed u64.
///
/// Used to seed a `fastrand::Rng` per feature so the result depends only on
/// (position, seed), never on the order features are visited.
pub fn position_hash(pos: IVec3, seed: u32) -> u64 {
    let mut state = (pos.x as u32 as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add((pos.y as u32 as u64).wrapping_mul(0x517C_C1B7_2722_0A95))
        .wrapping_add((pos.z as u32 as u64).wrapping_mul(0x6C62_272E_07BB_0142))
        .wrapping_add((seed as u64).wrapping_mul(0x2545_F491_4F6C_DD1D));

    state ^= state >> 33;
    state = state.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    state ^= state >> 33;
    state = state.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    state ^= state >> 33;
    state
}

/// RNG seeded from a position and seed.
pub fn rng_at(pos: IVec3, seed: u32) -> fastrand::Rng {
    fastrand::Rng::with_seed(position_hash(pos, seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let p = IVec3::new(5, 10, 3);
        assert_eq!(position_hash(p, 42), position_hash(p, 42));
        let mut a = rng_at(p, 42);
        let mut b = rng_at(p, 42);
        assert_eq!(a.u32(..), b.u32(..));
    }

    #[test]
    fn test_different_inputs_differ() {
        let base = position_hash(IVec3::ZERO, 0);
        assert_ne!(base, position_hash(IVec3::new(1, 0, 0), 0));
        assert_ne!(base, position_hash(IVec3::new(0, 1, 0), 0));
        assert_ne!(base, position_hash(IVec3::new(0, 0, 1), 0));
        assert_ne!(base, position_hash(IVec3::ZERO, 1));
    }

    #[test]
    fn test_negative_coordinates_hash() {
        let a = position_hash(IVec3::new(-1, -1, -1), 7);
        let b = position_hash(IVec3::new(1, 1, 1), 7);
        assert_ne!(a, b);
    }
}
