//! Layout Generator: where the spheres go.
//!
//! Three interchangeable strategies sit behind [`LayoutStrategy`]:
//! - [`SpiralLayout`]: layered galaxy arms (default)
//! - [`scatter::ScatterLayout`]: freeform scatter with region coverage repair
//! - [`depth_field::DepthFieldLayout`]: uniform positions, random depth
//!
//! All of them are pure functions of their configuration and the
//! [`LayoutContext`]; no strategy keeps state between calls.

pub mod depth_field;
pub mod scatter;

use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt::Debug;

use crate::fast_math::{clamp01, hash_noise, lerp, signed_noise, GOLDEN_ANGLE};
use crate::shape::{expand_tiers, Position, ShapeSpec, TierTemplate};
use crate::viewport::{Breakpoint, Viewport};

/// Seed offset added per layer so layers do not correlate.
pub const LAYER_SEED_STRIDE: u32 = 97;

/// Fraction of the golden angle each index adds to the arm angle.
const GOLDEN_VARIATION: f32 = 0.18;
/// Peak-to-peak angular noise (radians).
const ANGLE_NOISE: f32 = 0.12;
/// Radial exponent: < 1 pushes more shapes toward the outer radius.
const RADIAL_EXPONENT: f32 = 0.6;

/// Spiral placement parameters of one layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub center_x: f32,
    pub center_y: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub spread_x: f32,
    pub spread_y: f32,
    /// Radians
    pub angle_offset: f32,
    pub arms: u32,
    /// Radians of rotation accumulated from center to rim
    pub twist: f32,
    /// Perpendicular scatter around an arm, relative to radius
    pub arm_spread: f32,
    /// Extra jitter, fading out toward the rim
    pub jitter: f32,
}

impl LayoutOptions {
    pub const DEFAULT: Self = Self {
        center_x: 0.5,
        center_y: 0.5,
        radius_min: 0.2,
        radius_max: 0.8,
        spread_x: 0.5,
        spread_y: 0.5,
        angle_offset: 0.0,
        arms: 1,
        twist: 4.0,
        arm_spread: 0.12,
        jitter: 0.0,
    };

    /// Defaults with the mandatory radius/spread fields set.
    pub const fn new(radius_min: f32, radius_max: f32, spread_x: f32, spread_y: f32) -> Self {
        Self {
            radius_min,
            radius_max,
            spread_x,
            spread_y,
            ..Self::DEFAULT
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A layer: how many shapes and where to put them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerDefinition {
    pub count: usize,
    pub options: LayoutOptions,
}

/// Spiral-arm positions for `count` shapes, clamped into [0, 1].
pub fn generate_positions(count: usize, options: &LayoutOptions, seed_offset: u32) -> Vec<Position> {
    let arms = options.arms.max(1);
    let seed = seed_offset as f64;
    let mut positions = Vec::with_capacity(count);

    for i in 0..count {
        let fi = i as f64;
        let arm = (i as u32) % arms;
        let t = ((i as f32 + 0.5) / count as f32).powf(RADIAL_EXPONENT);
        let radius = lerp(options.radius_min, options.radius_max, t);

        let base_arm_angle = options.angle_offset + (arm as f32 / arms as f32) * TAU;
        let golden = (seed_offset as f32 + i as f32 + 1.0) * GOLDEN_ANGLE * GOLDEN_VARIATION;
        let perturbation = signed_noise(seed * 17.23 + fi * 3.71) * ANGLE_NOISE;
        let angle = base_arm_angle + t * options.twist + golden + perturbation;

        let perp_magnitude = signed_noise(seed * 13.57 + fi * 5.91) * options.arm_spread * radius;
        let perp_angle = angle + FRAC_PI_2;

        let jitter_seed = seed * 23.41 + fi * 11.17;
        let jx = (hash_noise(jitter_seed) - 0.5) * options.jitter * (1.0 - t);
        let jy = (hash_noise(jitter_seed + 1.0) - 0.5) * options.jitter * (1.0 - t);

        let x = options.center_x
            + angle.cos() * radius * options.spread_x
            + perp_angle.cos() * perp_magnitude * options.spread_x;
        let y = options.center_y
            + angle.sin() * radius * options.spread_y
            + perp_angle.sin() * perp_magnitude * options.spread_y;

        positions.push(Position::new(clamp01(x + jx), clamp01(y + jy)));
    }

    positions
}

/// Lay out every layer independently and concatenate in declaration order.
pub fn compose_layers(layers: &[LayerDefinition], seed_offset: u32) -> Vec<Position> {
    layers
        .iter()
        .enumerate()
        .flat_map(|(layer_index, layer)| {
            let layer_seed = seed_offset.wrapping_add(layer_index as u32 * LAYER_SEED_STRIDE);
            generate_positions(layer.count, &layer.options, layer_seed)
        })
        .collect()
}

/// Inputs every strategy may look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    pub breakpoint: Breakpoint,
    pub viewport: Viewport,
    /// Full document height in px (> 0)
    pub page_height: f32,
    /// Upper bound on the number of shapes to return
    pub budget: usize,
}

impl LayoutContext {
    /// Page height in viewport heights (≥ 1 for any scrollable page).
    pub fn screens(&self) -> f32 {
        if self.viewport.height > 0.0 {
            self.page_height / self.viewport.height
        } else {
            1.0
        }
    }
}

/// A sphere placement strategy. Output is uncolored (the field assigns
/// palette colors) and ordered back-to-front.
pub trait LayoutStrategy: Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn generate(&self, ctx: &LayoutContext) -> Vec<ShapeSpec>;

    /// Region minimum the final, adapted field must still meet.
    fn coverage(&self, _breakpoint: Breakpoint) -> Option<scatter::Coverage> {
        None
    }
}

/// Tiers + spiral layers for one breakpoint.
#[derive(Debug, Clone, Copy)]
pub struct SpiralPreset {
    pub tiers: &'static [TierTemplate],
    pub layers: &'static [LayerDefinition],
    pub seed_offset: u32,
}

/// Layered galaxy-arm layout.
#[derive(Debug, Clone, Copy)]
pub struct SpiralLayout {
    pub desktop: SpiralPreset,
    pub mobile: SpiralPreset,
}

impl SpiralLayout {
    pub fn preset(&self, breakpoint: Breakpoint) -> &SpiralPreset {
        match breakpoint {
            Breakpoint::Desktop => &self.desktop,
            Breakpoint::Mobile => &self.mobile,
        }
    }
}

impl LayoutStrategy for SpiralLayout {
    fn name(&self) -> &'static str {
        "spiral"
    }

    fn generate(&self, ctx: &LayoutContext) -> Vec<ShapeSpec> {
        let preset = self.preset(ctx.breakpoint);
        let shapes = expand_tiers(preset.tiers);
        let positions = compose_layers(preset.layers, preset.seed_offset);
        if positions.len() != shapes.len() {
            log::warn!(
                "spiral: {} templates but layers place {}; extra entries dropped",
                shapes.len(),
                positions.len()
            );
        }

        shapes
            .into_iter()
            .zip(positions)
            .take(ctx.budget)
            .map(|(shape, position)| ShapeSpec { position, ..shape })
            .collect()
    }
}
