//! Random-depth field: uniform positions, every visual attribute derived
//! from one depth scalar per sphere.

use super::{LayoutContext, LayoutStrategy};
use crate::color::Rgb;
use crate::fast_math::{hash_noise, lerp};
use crate::render::motion::MotionPattern;
use crate::shape::{GradientKind, Position, ShapeSpec};
use crate::viewport::Breakpoint;

/// Near/far endpoints of the depth → attribute mapping.
const SIZE_NEAR: f32 = 140.0;
const SIZE_FAR: f32 = 1040.0;
const BLUR_NEAR: f32 = 1.0;
const BLUR_FAR: f32 = 22.0;
const OPACITY_NEAR: f32 = 0.99;
const OPACITY_FAR: f32 = 0.74;
const PARALLAX_NEAR: f32 = 0.62;
const PARALLAX_FAR: f32 = 0.022;
const DURATION_NEAR: f32 = 11.0;
const DURATION_FAR: f32 = 36.0;

/// Mobile spheres are drawn smaller.
const MOBILE_SIZE_SCALE: f32 = 0.55;

/// Build a sphere whose size, blur, opacity, parallax and loop length all
/// follow `depth` (0 = near, 1 = far).
pub(crate) fn shape_from_depth(
    id: String,
    depth: f32,
    position: Position,
    breakpoint: Breakpoint,
) -> ShapeSpec {
    let size_scale = match breakpoint {
        Breakpoint::Mobile => MOBILE_SIZE_SCALE,
        Breakpoint::Desktop => 1.0,
    };
    ShapeSpec {
        motion: MotionPattern::for_id(&id),
        id,
        size: lerp(SIZE_NEAR, SIZE_FAR, depth) * size_scale,
        position,
        aspect: None,
        rotation: None,
        blur: lerp(BLUR_NEAR, BLUR_FAR, depth),
        opacity: lerp(OPACITY_NEAR, OPACITY_FAR, depth),
        depth,
        parallax_speed: lerp(PARALLAX_NEAR, PARALLAX_FAR, depth),
        color: Rgb::WHITE,
        gradient: GradientKind::Radial,
        duration: lerp(DURATION_NEAR, DURATION_FAR, depth),
    }
    .sanitized()
}

/// Back-to-front: farthest first, ties keep generation order.
pub(crate) fn sort_back_to_front(shapes: &mut [ShapeSpec]) {
    shapes.sort_by(|a, b| b.depth.total_cmp(&a.depth));
}

/// Simple field: `count_per_screen` spheres per viewport height, anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthFieldLayout {
    pub count_per_screen: f32,
    pub seed_offset: u32,
    /// Ellipse aspect range; 1.0 keeps circles
    pub max_aspect: f32,
}

impl Default for DepthFieldLayout {
    fn default() -> Self {
        Self {
            count_per_screen: 6.0,
            seed_offset: 311,
            max_aspect: 1.0,
        }
    }
}

impl LayoutStrategy for DepthFieldLayout {
    fn name(&self) -> &'static str {
        "depth-field"
    }

    fn generate(&self, ctx: &LayoutContext) -> Vec<ShapeSpec> {
        let count = ((ctx.screens() * self.count_per_screen).round().max(0.0) as usize).min(ctx.budget);
        let seed = self.seed_offset as f64;

        let mut shapes: Vec<ShapeSpec> = (0..count)
            .map(|i| {
                let fi = i as f64;
                let depth = hash_noise(seed * 3.11 + fi * 7.77);
                let position = Position::new(
                    hash_noise(seed * 5.03 + fi * 12.9898),
                    hash_noise(seed * 9.41 + fi * 78.233),
                );
                let mut shape = shape_from_depth(format!("depth-{}", i + 1), depth, position, ctx.breakpoint);
                if self.max_aspect > 1.0 {
                    let aspect = lerp(1.0, self.max_aspect, hash_noise(seed * 4.4 + fi * 2.2));
                    shape.aspect = Some(aspect);
                    shape.rotation = Some(hash_noise(seed * 6.6 + fi * 1.3) * 180.0);
                }
                shape
            })
            .collect();

        sort_back_to_front(&mut shapes);
        log::debug!("depth-field: {} shapes", shapes.len());
        shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Viewport;

    fn ctx(page_height: f32, budget: usize) -> LayoutContext {
        LayoutContext {
            breakpoint: Breakpoint::Desktop,
            viewport: Viewport::new(1280.0, 800.0),
            page_height,
            budget,
        }
    }

    #[test]
    fn test_count_scales_with_page_and_budget() {
        let layout = DepthFieldLayout::default();
        assert_eq!(layout.generate(&ctx(800.0, 100)).len(), 6);
        assert_eq!(layout.generate(&ctx(3200.0, 100)).len(), 24);
        assert_eq!(layout.generate(&ctx(3200.0, 10)).len(), 10);
    }

    #[test]
    fn test_back_to_front_and_depth_cues() {
        let shapes = DepthFieldLayout::default().generate(&ctx(4000.0, 100));
        for w in shapes.windows(2) {
            assert!(w[0].depth >= w[1].depth);
            assert!(w[0].blur >= w[1].blur);
            assert!(w[0].parallax_speed <= w[1].parallax_speed);
        }
        assert!(shapes.iter().all(ShapeSpec::satisfies_invariants));
    }

    #[test]
    fn test_ellipses_when_aspect_enabled() {
        let layout = DepthFieldLayout {
            max_aspect: 1.6,
            ..DepthFieldLayout::default()
        };
        let shapes = layout.generate(&ctx(800.0, 100));
        assert!(shapes.iter().all(|s| matches!(s.aspect, Some(a) if (1.0..=1.6).contains(&a))));
    }
}
