//! Viewport Adapter: breakpoint-specific reshaping of a base layout.
//!
//! Depth is read off blur: within one field, the blurriest sphere is the
//! farthest. Farther spheres grow more with the size multiplier, blur
//! further, dim, and respond less to parallax, so the depth-of-field reads
//! the same on a phone as on a desktop.

use crate::fast_math::{clamp01, clamp_range, signed_noise};
use crate::shape::{Position, ShapeSpec};

/// Virtual range positions may occupy (spheres bleed past the edges).
pub const EXTENDED_MIN: f32 = -0.22;
pub const EXTENDED_MAX: f32 = 1.35;

/// Widths below this are laid out as mobile.
pub const MOBILE_MAX_WIDTH: f32 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn breakpoint(&self) -> Breakpoint {
        Breakpoint::from_width(self.width)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0
    }
}

/// Layout class of the current viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    Mobile,
    Desktop,
}

impl Default for Breakpoint {
    fn default() -> Self {
        Self::Desktop
    }
}

impl Breakpoint {
    pub fn from_width(width: f32) -> Self {
        if width < MOBILE_MAX_WIDTH {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Anisotropic scale + translation + size multiplier for one breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub scale_x: f32,
    pub scale_y: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub size_multiplier: f32,
}

impl ViewportTransform {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        size_multiplier: 1.0,
    };

    /// Wide screens: stretch horizontally, keep spheres at full size.
    pub const DESKTOP: Self = Self {
        scale_x: 1.18,
        scale_y: 1.06,
        translate_x: 0.0,
        translate_y: 0.02,
        size_multiplier: 1.0,
    };

    /// Narrow screens: squeeze horizontally, stretch the column, shrink spheres.
    pub const MOBILE: Self = Self {
        scale_x: 0.92,
        scale_y: 1.24,
        translate_x: 0.0,
        translate_y: 0.04,
        size_multiplier: 0.82,
    };

    pub fn for_breakpoint(breakpoint: Breakpoint) -> Self {
        match breakpoint {
            Breakpoint::Mobile => Self::MOBILE,
            Breakpoint::Desktop => Self::DESKTOP,
        }
    }

    /// Recentre on (0.5, 0.5), scale, translate, clamp to the extended range.
    pub fn apply(&self, p: Position) -> Position {
        Position {
            x: clamp_range(
                (p.x - 0.5) * self.scale_x + 0.5 + self.translate_x,
                EXTENDED_MIN,
                EXTENDED_MAX,
            ),
            y: clamp_range(
                (p.y - 0.5) * self.scale_y + 0.5 + self.translate_y,
                EXTENDED_MIN,
                EXTENDED_MAX,
            ),
        }
    }
}

/// Normalised depth of `blur` within `[min, max]`; 0 when the range is flat.
#[inline]
pub fn depth_from_blur(blur: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if span <= f32::EPSILON {
        return 0.0;
    }
    clamp01((blur - min) / span)
}

/// Observed (min, max) blur of a field.
pub fn blur_range(shapes: &[ShapeSpec]) -> (f32, f32) {
    shapes.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), s| {
        (lo.min(s.blur), hi.max(s.blur))
    })
}

/// Apply `transform` to every shape, with depth-dependent multipliers.
pub fn adapt(shapes: &[ShapeSpec], transform: &ViewportTransform) -> Vec<ShapeSpec> {
    if shapes.is_empty() {
        return Vec::new();
    }
    let (min_blur, max_blur) = blur_range(shapes);

    shapes
        .iter()
        .map(|shape| {
            let depth = depth_from_blur(shape.blur, min_blur, max_blur);
            let size_factor = 1.0 + (transform.size_multiplier - 1.0) * (0.5 + depth);
            ShapeSpec {
                position: transform.apply(shape.position),
                size: shape.size * size_factor,
                blur: shape.blur * (1.0 + 0.35 * depth),
                opacity: shape.opacity * (1.0 - 0.2 * depth),
                parallax_speed: shape.parallax_speed * (1.0 - 0.3 * depth),
                depth,
                ..shape.clone()
            }
            .sanitized()
        })
        .collect()
}

/// Parameters of [`redistribute_vertical`].
#[derive(Debug, Clone, PartialEq)]
pub struct RedistributeOptions {
    /// Fraction of the page above 0 the band starts at
    pub top_overshoot: f32,
    /// Fraction of the page below 1 the band ends at
    pub bottom_overshoot: f32,
    /// Peak-to-peak jitter added to both axes
    pub jitter: f32,
    /// Repeating horizontal slots
    pub columns: Vec<f32>,
    pub seed_offset: u32,
}

impl Default for RedistributeOptions {
    fn default() -> Self {
        Self {
            top_overshoot: 0.08,
            bottom_overshoot: 0.08,
            jitter: 0.04,
            columns: vec![0.18, 0.72, 0.42, 0.88, 0.08, 0.58],
            seed_offset: 0,
        }
    }
}

/// Remap shapes onto an evenly spaced vertical band, ranked by current y.
///
/// Horizontal placement comes from `options.columns`, not from the original
/// x. The returned list keeps the input order (back-to-front layering).
pub fn redistribute_vertical(shapes: &[ShapeSpec], options: &RedistributeOptions) -> Vec<ShapeSpec> {
    let n = shapes.len();
    if n == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<usize> = (0..n).collect();
    ranked.sort_by(|&a, &b| {
        shapes[a]
            .position
            .y
            .total_cmp(&shapes[b].position.y)
            .then(a.cmp(&b))
    });

    let span = 1.0 + options.top_overshoot + options.bottom_overshoot;
    let seed = options.seed_offset as f64;
    let mut out = shapes.to_vec();
    for (rank, &index) in ranked.iter().enumerate() {
        let band_y = -options.top_overshoot + (rank as f32 + 0.5) / n as f32 * span;
        let column = if options.columns.is_empty() {
            0.5
        } else {
            options.columns[rank % options.columns.len()]
        };
        let jx = signed_noise(seed * 7.31 + rank as f64 * 3.17) * options.jitter;
        let jy = signed_noise(seed * 5.77 + rank as f64 * 2.39) * options.jitter;
        out[index].position = Position {
            x: clamp_range(column + jx, EXTENDED_MIN, EXTENDED_MAX),
            y: clamp_range(band_y + jy, EXTENDED_MIN, EXTENDED_MAX),
        };
    }
    out
}
