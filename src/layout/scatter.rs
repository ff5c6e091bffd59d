//! Freeform scatter over the whole page, with two guarantees:
//!
//! 1. Spacing: candidates closer than `min_distance` to an already placed
//!    sphere are redrawn, at most `max_attempts` times; the last candidate
//!    is then accepted as-is, so placement always terminates.
//! 2. Coverage: the top (hero), middle and bottom (footer) thirds of the
//!    page each end up with at least `min_per_region` spheres. Deficits are
//!    filled by moving already placed spheres, never by adding new ones.

use super::depth_field::{shape_from_depth, sort_back_to_front};
use super::{LayoutContext, LayoutStrategy};
use crate::fast_math::{hash_noise, lerp};
use crate::shape::{Position, ShapeSpec};
use crate::viewport::Breakpoint;

pub const REGION_COUNT: usize = 3;

/// Per-breakpoint scatter tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterParams {
    pub per_screen: f32,
    pub min_count: usize,
    pub max_count: usize,
    /// In viewport widths
    pub min_distance: f32,
    pub min_per_region: usize,
    pub max_attempts: u32,
}

/// Freeform scatter strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterLayout {
    pub desktop: ScatterParams,
    pub mobile: ScatterParams,
    pub seed_offset: u32,
}

impl ScatterLayout {
    pub fn params(&self, breakpoint: Breakpoint) -> &ScatterParams {
        match breakpoint {
            Breakpoint::Desktop => &self.desktop,
            Breakpoint::Mobile => &self.mobile,
        }
    }

    /// Shape count for this page: proportional to its height, clamped.
    pub fn count_for(&self, ctx: &LayoutContext) -> usize {
        let p = self.params(ctx.breakpoint);
        let wanted = (ctx.screens() * p.per_screen).round().max(0.0) as usize;
        wanted.clamp(p.min_count, p.max_count.max(p.min_count)).min(ctx.budget)
    }
}

/// Region index (0 = top, 2 = bottom) of a fractional page y.
pub fn region_of(y: f32) -> usize {
    ((y * REGION_COUNT as f32).floor().max(0.0) as usize).min(REGION_COUNT - 1)
}

/// Shape count per region.
pub fn region_counts(positions: impl IntoIterator<Item = Position>) -> [usize; REGION_COUNT] {
    let mut counts = [0usize; REGION_COUNT];
    for p in positions {
        counts[region_of(p.y)] += 1;
    }
    counts
}

/// Aspect-corrected squared distance, in viewport widths.
#[inline]
fn page_distance_squared(a: Position, b: Position, y_scale: f32) -> f32 {
    let dx = a.x - b.x;
    let dy = (a.y - b.y) * y_scale;
    dx * dx + dy * dy
}

/// Rejection-sample `count` positions; see module docs.
pub fn place_with_spacing(
    count: usize,
    min_distance: f32,
    max_attempts: u32,
    y_scale: f32,
    seed_offset: u32,
) -> Vec<Position> {
    let seed = seed_offset as f64;
    let min_d2 = min_distance * min_distance;
    let mut placed: Vec<Position> = Vec::with_capacity(count);
    let mut exhausted = 0usize;

    for i in 0..count {
        let mut candidate = Position::CENTER;
        let attempts = max_attempts.max(1);
        for attempt in 0..attempts {
            let s = seed * 31.7 + i as f64 * 101.3 + attempt as f64 * 7.19;
            candidate = Position::new(hash_noise(s), hash_noise(s + 0.5));
            let clear = placed
                .iter()
                .all(|p| page_distance_squared(*p, candidate, y_scale) >= min_d2);
            if clear {
                break;
            }
            if attempt + 1 == attempts {
                exhausted += 1;
            }
        }
        placed.push(candidate);
    }

    if exhausted > 0 {
        log::debug!("scatter: {} of {} placements accepted after exhausting retries", exhausted, count);
    }
    placed
}

/// Move shapes from over-populated regions into regions below `min_per_region`.
///
/// The minimum is capped at `len / REGION_COUNT` so it is always satisfiable.
pub fn repair_coverage(positions: &mut [Position], min_per_region: usize, seed_offset: u32) -> usize {
    let min = min_per_region.min(positions.len() / REGION_COUNT);
    let seed = seed_offset as f64;
    let mut moves = 0usize;

    loop {
        let counts = region_counts(positions.iter().copied());
        let Some(needy) = (0..REGION_COUNT).find(|&r| counts[r] < min) else {
            break;
        };
        let Some(donor) = (0..REGION_COUNT)
            .filter(|&r| counts[r] > min)
            .max_by_key(|&r| (counts[r], std::cmp::Reverse(r)))
        else {
            break;
        };
        // take the donor's last shape so earlier placements stay put
        let Some(index) = positions.iter().rposition(|p| region_of(p.y) == donor) else {
            break;
        };

        let s = seed * 41.3 + moves as f64 * 9.73;
        let band = lerp(0.1, 0.9, hash_noise(s));
        positions[index].y = (needy as f32 + band) / REGION_COUNT as f32;
        positions[index].x = lerp(0.05, 0.95, hash_noise(s + 0.25));
        moves += 1;
    }

    moves
}

/// Region minimum re-applied after the viewport transform, which rescales
/// y and can push relocated shapes across a region edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub min_per_region: usize,
    pub seed_offset: u32,
}

impl Coverage {
    /// Relocate shapes in place until every region meets the minimum.
    /// Returns the number of moves.
    pub fn enforce(&self, shapes: &mut [ShapeSpec]) -> usize {
        let mut positions: Vec<Position> = shapes.iter().map(|s| s.position).collect();
        let moves = repair_coverage(&mut positions, self.min_per_region, self.seed_offset);
        for (shape, position) in shapes.iter_mut().zip(positions) {
            shape.position = position;
        }
        moves
    }
}

impl LayoutStrategy for ScatterLayout {
    fn name(&self) -> &'static str {
        "scatter"
    }

    fn coverage(&self, breakpoint: Breakpoint) -> Option<Coverage> {
        Some(Coverage {
            min_per_region: self.params(breakpoint).min_per_region,
            seed_offset: self.seed_offset.wrapping_add(1),
        })
    }

    fn generate(&self, ctx: &LayoutContext) -> Vec<ShapeSpec> {
        let params = self.params(ctx.breakpoint);
        let count = self.count_for(ctx);
        let y_scale = if ctx.viewport.width > 0.0 {
            ctx.page_height / ctx.viewport.width
        } else {
            1.0
        };

        let mut positions = place_with_spacing(
            count,
            params.min_distance,
            params.max_attempts,
            y_scale,
            self.seed_offset,
        );
        let moves = repair_coverage(&mut positions, params.min_per_region, self.seed_offset);
        log::debug!(
            "scatter: {} shapes, {} relocated, regions {:?}",
            count,
            moves,
            region_counts(positions.iter().copied())
        );

        let seed = self.seed_offset as f64;
        let mut shapes: Vec<ShapeSpec> = positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| {
                let depth = hash_noise(seed * 2.71 + i as f64 * 6.37);
                shape_from_depth(format!("scatter-{}", i + 1), depth, position, ctx.breakpoint)
            })
            .collect();
        sort_back_to_front(&mut shapes);
        shapes
    }
}
