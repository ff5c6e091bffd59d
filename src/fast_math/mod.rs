//! Fast Math: deterministic noise and small numeric helpers
//!
//! Every "random" number in the backdrop comes from [`hash_noise`]: a pure
//! function of its seed. There is no generator state, so any shape or
//! particle can be regenerated from `(seed_offset, index)` alone.
//!
//! ## Division Exorcism
//! Hot paths multiply by pre-computed reciprocals instead of dividing:
//!   x / 255.0  →  x * RECIPROCALS.inv_255

use std::f32::consts::PI;

/// Pre-computed reciprocals for common divisors.
pub struct Reciprocals {
    pub inv_255: f32,
    pub inv_360: f32,
    pub inv_6: f32,
}

/// Global pre-computed reciprocals (const-evaluated at compile time).
pub const RECIPROCALS: Reciprocals = Reciprocals {
    inv_255: 1.0 / 255.0,
    inv_360: 1.0 / 360.0,
    inv_6: 1.0 / 6.0,
};

/// 1/φ, the golden ratio conjugate.
pub const GOLDEN_RATIO_CONJUGATE: f32 = 0.618_033_99;

/// 2π · (1/φ), the angle increment used for hue and particle spacing.
pub const GOLDEN_ANGLE: f32 = 2.0 * PI * GOLDEN_RATIO_CONJUGATE;

/// Sine hash: `fract(sin(seed) * 43758.5453)`, in `[0, 1)`.
///
/// Evaluated in f64 so large seeds (layer stride × index) keep enough
/// precision to stay decorrelated, then narrowed.
#[inline]
pub fn hash_noise(seed: f64) -> f32 {
    let x = seed.sin() * 43_758.545_3;
    let f = (x - x.floor()) as f32;
    // f64 → f32 narrowing can round 0.99999999 up to 1.0
    if f >= 1.0 {
        0.0
    } else {
        f
    }
}

/// Centred noise in `[-0.5, 0.5)`.
#[inline]
pub fn signed_noise(seed: f64) -> f32 {
    hash_noise(seed) - 0.5
}

/// Additive character-code hash of an id.
///
/// The contract is only "same id ⇒ same value"; it is not meant to spread
/// well, and anagrams collide.
#[inline]
pub fn id_hash(id: &str) -> u32 {
    id.chars().fold(0u32, |acc, c| acc.wrapping_add(c as u32))
}

#[inline(always)]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// `clamp` that tolerates NaN by mapping it to `min`.
#[inline(always)]
pub fn clamp_range(v: f32, min: f32, max: f32) -> f32 {
    if v.is_nan() {
        return min;
    }
    v.max(min).min(max)
}

/// Linear interpolation: a + (b - a) * t, as one FMA.
#[inline(always)]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (b - a).mul_add(t, a)
}

/// Positive fractional part (wraps negatives into `[0, 1)`).
#[inline(always)]
pub fn fract01(v: f32) -> f32 {
    let f = v - v.floor();
    if f >= 1.0 {
        0.0
    } else {
        f
    }
}

/// Format a fraction as a CSS percentage with two decimals (`0.5` → `"50.00%"`).
pub fn to_percent(v: f32) -> String {
    format!("{:.2}%", v * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_noise_range_and_determinism() {
        for i in 0..2000 {
            let seed = i as f64 * 5.91 + 13.57;
            let a = hash_noise(seed);
            assert!((0.0..1.0).contains(&a), "seed {} gave {}", seed, a);
            assert_eq!(a.to_bits(), hash_noise(seed).to_bits());
        }
    }

    #[test]
    fn test_id_hash_is_stable() {
        assert_eq!(id_hash("large-1"), id_hash("large-1"));
        assert_eq!(id_hash("ab"), 97 + 98);
        assert_eq!(id_hash(""), 0);
    }

    #[test]
    fn test_clamp_helpers() {
        assert_eq!(clamp01(-0.3), 0.0);
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp_range(f32::NAN, -0.2, 1.3), -0.2);
        assert_eq!(clamp_range(2.0, -0.2, 1.3), 1.3);
    }

    #[test]
    fn test_lerp_and_fract() {
        assert!((lerp(0.6, 0.9, 0.5) - 0.75).abs() < 1e-6);
        assert!((fract01(-0.25) - 0.75).abs() < 1e-6);
        assert!((fract01(1.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_to_percent() {
        assert_eq!(to_percent(0.5), "50.00%");
        assert_eq!(to_percent(-0.1234), "-12.34%");
    }

    #[test]
    fn test_golden_angle() {
        assert!((GOLDEN_ANGLE - 3.883_222).abs() < 1e-4);
        assert!((RECIPROCALS.inv_255 * 255.0 - 1.0).abs() < 1e-6);
    }
}
