//! Particle Field: small twinkling dots behind the spheres.
//!
//! Independent of the sphere layout: no arms, no layers. Angles advance by
//! a golden-angle step, radius grows on a power curve, and the whole disc is
//! stretched vertically so it covers a tall page. Colors borrow the palette
//! hue but are pushed dark and faint.

use rayon::prelude::*;

use crate::color::palette::Palette;
use crate::color::{Hsl, Rgb};
use crate::fast_math::{clamp01, clamp_range, fract01, hash_noise, signed_noise, to_percent, GOLDEN_ANGLE};
use crate::render::motion::{twinkle_timeline, Timeline};
use crate::shape::Position;

const ANGLE_STEP: f32 = 0.92;
const STRETCH_X: f32 = 1.12;
const STRETCH_Y: f32 = 1.9;
const CENTER: (f32, f32) = (0.5, 0.52);
const X_RANGE: (f32, f32) = (-0.08, 1.08);
const Y_RANGE: (f32, f32) = (-0.12, 1.12);

/// One twinkling dot.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSpec {
    pub id: String,
    pub position: Position,
    /// Diameter in px
    pub size: f32,
    pub blur: f32,
    pub opacity: f32,
    pub color: Rgb,
    /// Seconds per twinkle
    pub duration: f32,
    /// Always ≤ 0, so particles start out of phase
    pub delay: f32,
}

impl ParticleSpec {
    /// CSS `left`/`top`, unclamped.
    pub fn css_position(&self) -> (String, String) {
        (to_percent(self.position.x), to_percent(self.position.y))
    }

    pub fn twinkle(&self) -> Timeline {
        twinkle_timeline(self.duration, self.delay)
    }
}

fn particle(i: usize, count: usize, palette: &Palette, seed_offset: u32) -> ParticleSpec {
    let seed = seed_offset as f64;
    let fi = i as f64;

    let base = palette.rgb(seed_offset as usize + i).to_hsl().enhance();
    let color = Hsl {
        h: fract01(base.h + signed_noise(seed * 29.73 + fi * 13.91) * 0.16),
        s: clamp01(0.65 + hash_noise(seed * 31.17 + fi * 9.63) * 0.3),
        l: clamp01(0.06 + hash_noise(seed * 33.57 + fi * 7.21) * 0.12),
    }
    .to_rgb();

    let angle = (i as f32 + 1.0) * GOLDEN_ANGLE * ANGLE_STEP;
    let t = ((i as f32 + 0.35) / count as f32).powf(0.88);
    let radius = 0.1 + t * 1.45;
    let x = clamp_range(CENTER.0 + angle.cos() * radius * STRETCH_X, X_RANGE.0, X_RANGE.1);
    let y = clamp_range(CENTER.1 + angle.sin() * radius * STRETCH_Y, Y_RANGE.0, Y_RANGE.1);

    let duration = 6.0 + hash_noise(seed * 47.19 + fi * 6.37) * 5.0;
    ParticleSpec {
        id: format!("particle-{}", i),
        position: Position::new(x, y),
        size: 0.45 + hash_noise(seed * 37.91 + fi * 5.11) * 1.2,
        blur: 0.6 + hash_noise(seed * 41.27 + fi * 3.53) * 1.4,
        opacity: 0.015 + hash_noise(seed * 43.61 + fi * 4.79) * 0.08,
        color,
        duration,
        delay: -hash_noise(seed * 53.77 + fi * 8.91) * duration,
    }
}

/// Generate `count` particles. Each index is independent, so the work is
/// spread over rayon's pool; `collect` keeps index order.
pub fn generate_particle_field(count: usize, palette: &Palette, seed_offset: u32) -> Vec<ParticleSpec> {
    if palette.is_empty() {
        log::warn!("particles: empty palette, no particles generated");
        return Vec::new();
    }
    let field: Vec<ParticleSpec> = (0..count)
        .into_par_iter()
        .map(|i| particle(i, count, palette, seed_offset))
        .collect();
    log::debug!("particles: {} generated (seed {})", field.len(), seed_offset);
    field
}
