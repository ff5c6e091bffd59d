//! Sphere field entities.
//!
//! A [`ShapeSpec`] is the immutable layout record of one decorative sphere.
//! Fields are replaced wholesale (new breakpoint, debounced resize); nothing
//! edits a spec in place once the field is built.

use crate::color::Rgb;
use crate::fast_math::{clamp01, to_percent};
use crate::render::motion::MotionPattern;

/// Fractional position (0..1 spans the page; values may overflow slightly).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// CSS `left`/`top` percentages.
    pub fn to_css(self) -> (String, String) {
        (to_percent(self.x), to_percent(self.y))
    }

    pub fn distance_squared(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Parse a `"12.34%"` string back to a fraction.
pub fn parse_percent(s: &str) -> Option<f32> {
    s.trim()
        .strip_suffix('%')?
        .trim()
        .parse::<f32>()
        .ok()
        .map(|v| v / 100.0)
}

/// How a sphere's background is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    /// Single radial falloff
    Radial,
    /// Radial falloff overlaid with a linear "godray" streak
    RadialGodray,
}

/// One decorative sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    /// Stable id, unique within a field
    pub id: String,
    /// Diameter in px
    pub size: f32,
    pub position: Position,
    /// Ellipse width/height ratio; `None` for a circle
    pub aspect: Option<f32>,
    /// Ellipse rotation in degrees
    pub rotation: Option<f32>,
    /// Blur radius in px
    pub blur: f32,
    pub opacity: f32,
    /// 0 = nearest, 1 = farthest
    pub depth: f32,
    /// Scroll delta → displacement multiplier
    pub parallax_speed: f32,
    pub color: Rgb,
    pub gradient: GradientKind,
    /// Motion loop length in seconds
    pub duration: f32,
    pub motion: MotionPattern,
}

impl ShapeSpec {
    /// Force the numeric invariants: opacity in [0,1], blur ≥ 0, size > 0.
    pub fn sanitized(mut self) -> Self {
        self.opacity = clamp01(if self.opacity.is_nan() { 0.0 } else { self.opacity });
        self.blur = if self.blur.is_finite() { self.blur.max(0.0) } else { 0.0 };
        self.size = if self.size.is_finite() { self.size.max(1.0) } else { 1.0 };
        self.depth = clamp01(if self.depth.is_nan() { 0.0 } else { self.depth });
        self.parallax_speed = if self.parallax_speed.is_finite() {
            self.parallax_speed.max(0.0)
        } else {
            0.0
        };
        self
    }

    pub fn satisfies_invariants(&self) -> bool {
        (0.0..=1.0).contains(&self.opacity) && self.blur >= 0.0 && self.size > 0.0
    }
}

/// A tier of similar spheres (e.g. "large", "tiny") expanded into specs.
///
/// Per-index variation walks the `*_step` fields so neighbouring spheres in a
/// tier differ slightly without any randomness.
#[derive(Debug, Clone, Copy)]
pub struct TierTemplate {
    pub prefix: &'static str,
    pub count: usize,
    pub size: f32,
    pub size_step: f32,
    pub blur: f32,
    pub opacity: f32,
    pub duration: f32,
    pub parallax_speed: f32,
    pub parallax_step: f32,
}

impl TierTemplate {
    /// Specs for this tier, ids `"{prefix}-1"` ... `"{prefix}-{count}"`.
    pub fn expand(&self) -> Vec<ShapeSpec> {
        (0..self.count)
            .map(|i| {
                let id = format!("{}-{}", self.prefix, i + 1);
                // zig-zag so sizes do not decrease monotonically along the tier
                let wobble = [0.0, 1.0, -1.0, 0.5][i % 4];
                ShapeSpec {
                    motion: MotionPattern::for_id(&id),
                    id,
                    size: self.size - self.size_step * i as f32,
                    position: Position::CENTER,
                    aspect: None,
                    rotation: None,
                    blur: self.blur,
                    opacity: self.opacity,
                    depth: 0.0,
                    parallax_speed: self.parallax_speed + self.parallax_step * wobble,
                    color: Rgb::WHITE,
                    gradient: GradientKind::RadialGodray,
                    duration: self.duration + (i % 3) as f32,
                }
                .sanitized()
            })
            .collect()
    }
}

/// Expand a list of tiers back-to-front.
pub fn expand_tiers(tiers: &[TierTemplate]) -> Vec<ShapeSpec> {
    tiers.iter().flat_map(TierTemplate::expand).collect()
}
