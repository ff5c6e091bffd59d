//! Compile-time configuration: seed colors, layer presets, tuning constants.
//!
//! There is no runtime config file. Everything the backdrop needs lives
//! here, and [`crate::field::FieldConfig`] / [`crate::engine::EngineConfig`]
//! start from these values.

use crate::layout::scatter::{ScatterLayout, ScatterParams};
use crate::layout::{LayerDefinition, LayoutOptions, SpiralLayout, SpiralPreset};
use crate::shape::TierTemplate;

// ── Palette ──

pub const SEED_COLORS: &[&str] = &["#FFBE0B", "#FB5607", "#FF006E", "#8338EC", "#3A86FF"];

/// Palette slots beyond the largest preset field.
pub const PALETTE_EXTRA: usize = 8;

// ── Particles ──

pub const PARTICLE_COUNT: usize = 90;
pub const PARTICLE_SEED: u32 = 620;

// ── Field bounds ──

pub const DESKTOP_SEED_OFFSET: u32 = 0;
pub const MOBILE_SEED_OFFSET: u32 = 150;

/// Shape budget per viewport height of page, and hard caps.
pub const DESKTOP_SHAPES_PER_SCREEN: usize = 24;
pub const MOBILE_SHAPES_PER_SCREEN: usize = 24;
pub const DESKTOP_MAX_SHAPES: usize = 72;
pub const MOBILE_MAX_SHAPES: usize = 48;

// ── Engine ──

pub const RESIZE_DEBOUNCE_MS: u64 = 300;

/// Per-frame low-pass factors.
pub const SCROLL_EASE: f32 = 0.14;
pub const POINTER_EASE: f32 = 0.08;
pub const ORIENTATION_EASE: f32 = 0.06;

/// Max pointer/orientation displacement (px) of the nearest sphere.
pub const POINTER_RANGE_PX: f32 = 36.0;
/// Divisor growth with depth: offset / (1 + depth · k).
pub const DEPTH_ATTENUATION: f32 = 3.0;

/// Rack focus: focus plane = base + travel · scroll fraction.
pub const FOCUS_BASE: f32 = 0.15;
pub const FOCUS_TRAVEL: f32 = 0.7;
pub const FOCUS_BLUR_PX: f32 = 8.0;
pub const FOCUS_SCALE_LOSS: f32 = 0.06;
pub const FOCUS_BRIGHTNESS_LOSS: f32 = 0.25;

/// Orientation degrees mapped to a full ±1 signal.
pub const ORIENTATION_RANGE_DEG: f32 = 45.0;
/// Resting phone tilt (beta) treated as neutral.
pub const ORIENTATION_BETA_REST_DEG: f32 = 45.0;

// ── Spiral presets ──

const fn tier(
    prefix: &'static str,
    count: usize,
    size: f32,
    size_step: f32,
    blur: f32,
    opacity: f32,
    duration: f32,
    parallax: (f32, f32),
) -> TierTemplate {
    TierTemplate {
        prefix,
        count,
        size,
        size_step,
        blur,
        opacity,
        duration,
        parallax_speed: parallax.0,
        parallax_step: parallax.1,
    }
}

pub const DESKTOP_TIERS: &[TierTemplate] = &[
    tier("large", 4, 1080.0, 20.0, 22.0, 0.75, 35.0, (0.024, 0.0015)),
    tier("medium", 8, 620.0, 9.0, 10.0, 0.86, 23.0, (0.125, 0.008)),
    tier("small", 8, 250.0, 3.0, 2.0, 0.98, 14.0, (0.44, 0.02)),
    tier("tiny", 4, 140.0, 2.0, 1.0, 0.99, 11.0, (0.63, 0.01)),
];

pub const MOBILE_TIERS: &[TierTemplate] = &[
    tier("large-m", 4, 560.0, 10.0, 8.0, 0.95, 24.0, (0.09, 0.008)),
    tier("medium-m", 8, 380.0, 6.0, 5.0, 0.96, 20.0, (0.19, 0.01)),
    tier("small-m", 8, 248.0, 3.0, 2.0, 0.98, 14.0, (0.4, 0.015)),
    tier("tiny-m", 4, 150.0, 1.0, 1.0, 0.99, 12.0, (0.59, 0.01)),
];

const fn layer(
    count: usize,
    center_y: f32,
    radius: (f32, f32),
    spread: (f32, f32),
    arms: u32,
    twist: f32,
    arm_spread: f32,
    jitter: f32,
    angle_offset: f32,
) -> LayerDefinition {
    LayerDefinition {
        count,
        options: LayoutOptions {
            center_x: 0.5,
            center_y,
            radius_min: radius.0,
            radius_max: radius.1,
            spread_x: spread.0,
            spread_y: spread.1,
            angle_offset,
            arms,
            twist,
            arm_spread,
            jitter,
        },
    }
}

pub const DESKTOP_LAYERS: &[LayerDefinition] = &[
    layer(4, 0.5, (0.62, 0.95), (0.6, 0.82), 3, 7.0, 0.24, 0.05, 0.08),
    layer(8, 0.5, (0.34, 0.7), (0.48, 0.68), 4, 6.8, 0.2, 0.04, 0.58),
    layer(8, 0.5, (0.16, 0.44), (0.35, 0.46), 5, 6.1, 0.16, 0.032, 1.05),
    layer(4, 0.54, (0.08, 0.22), (0.27, 0.32), 6, 5.0, 0.14, 0.025, 1.76),
];

pub const MOBILE_LAYERS: &[LayerDefinition] = &[
    layer(4, 0.52, (0.6, 0.92), (0.44, 0.88), 3, 6.6, 0.24, 0.038, 0.05),
    layer(8, 0.52, (0.32, 0.66), (0.38, 0.72), 4, 7.0, 0.2, 0.034, 0.55),
    layer(8, 0.52, (0.14, 0.36), (0.3, 0.54), 5, 6.0, 0.16, 0.026, 1.02),
    layer(4, 0.52, (0.08, 0.16), (0.24, 0.36), 6, 4.6, 0.14, 0.022, 1.68),
];

/// Default galaxy layout for both breakpoints.
pub fn spiral_layout() -> SpiralLayout {
    SpiralLayout {
        desktop: SpiralPreset {
            tiers: DESKTOP_TIERS,
            layers: DESKTOP_LAYERS,
            seed_offset: DESKTOP_SEED_OFFSET,
        },
        mobile: SpiralPreset {
            tiers: MOBILE_TIERS,
            layers: MOBILE_LAYERS,
            seed_offset: MOBILE_SEED_OFFSET,
        },
    }
}

// ── Scatter presets ──

pub const DESKTOP_SCATTER: ScatterParams = ScatterParams {
    per_screen: 8.0,
    min_count: 12,
    max_count: 64,
    min_distance: 0.16,
    min_per_region: 3,
    max_attempts: 24,
};

pub const MOBILE_SCATTER: ScatterParams = ScatterParams {
    per_screen: 6.0,
    min_count: 9,
    max_count: 36,
    min_distance: 0.22,
    min_per_region: 3,
    max_attempts: 24,
};

pub fn scatter_layout() -> ScatterLayout {
    ScatterLayout {
        desktop: DESKTOP_SCATTER,
        mobile: MOBILE_SCATTER,
        seed_offset: 431,
    }
}

/// Largest preset field, used to size the shared palette.
pub fn palette_size() -> usize {
    let count = |tiers: &[TierTemplate]| tiers.iter().map(|t| t.count).sum::<usize>();
    count(DESKTOP_TIERS).max(count(MOBILE_TIERS)) + PALETTE_EXTRA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_match_layers() {
        let tiers = |t: &[TierTemplate]| t.iter().map(|t| t.count).sum::<usize>();
        let layers = |l: &[LayerDefinition]| l.iter().map(|l| l.count).sum::<usize>();
        assert_eq!(tiers(DESKTOP_TIERS), layers(DESKTOP_LAYERS));
        assert_eq!(tiers(MOBILE_TIERS), layers(MOBILE_LAYERS));
    }

    #[test]
    fn test_tiers_run_far_to_near() {
        for tiers in [DESKTOP_TIERS, MOBILE_TIERS] {
            for w in tiers.windows(2) {
                assert!(w[0].blur > w[1].blur);
                assert!(w[0].parallax_speed < w[1].parallax_speed);
                assert!(w[0].size > w[1].size);
            }
        }
    }

    #[test]
    fn test_scatter_minimums_are_satisfiable() {
        for p in [DESKTOP_SCATTER, MOBILE_SCATTER] {
            assert!(p.min_count >= p.min_per_region * crate::layout::scatter::REGION_COUNT);
        }
    }

    #[test]
    fn test_palette_size() {
        assert_eq!(palette_size(), 32);
    }
}
