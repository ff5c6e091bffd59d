//! Sphere field composition: palette → layout strategy → viewport adapter →
//! colored shapes.
//!
//! The palette and the particle field are built once per [`FieldGenerator`];
//! only the sphere list depends on viewport and page height and is rebuilt
//! wholesale on every (debounced) resize.

use std::sync::Arc;

use crate::color::palette::Palette;
use crate::config;
use crate::layout::{LayoutContext, LayoutStrategy};
use crate::particles::{generate_particle_field, ParticleSpec};
use crate::shape::ShapeSpec;
use crate::viewport::{adapt, redistribute_vertical, Breakpoint, RedistributeOptions, Viewport, ViewportTransform};

/// Shape count bounds for one breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeBudget {
    pub per_screen: usize,
    pub max: usize,
}

impl ShapeBudget {
    /// `per_screen` per started viewport height, capped at `max`.
    pub fn for_screens(&self, screens: f32) -> usize {
        let started = if screens.is_finite() { screens.ceil().max(1.0) } else { 1.0 };
        (self.per_screen.saturating_mul(started as usize)).min(self.max)
    }
}

/// Field generation settings.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub strategy: Arc<dyn LayoutStrategy>,
    /// Even out vertical spacing after adaptation
    pub redistribute: Option<RedistributeOptions>,
    pub seeds: Vec<String>,
    pub palette_size: usize,
    pub desktop_transform: ViewportTransform,
    pub mobile_transform: ViewportTransform,
    pub desktop_budget: ShapeBudget,
    pub mobile_budget: ShapeBudget,
    pub particle_count: usize,
    pub particle_seed: u32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            strategy: Arc::new(config::spiral_layout()),
            redistribute: None,
            seeds: config::SEED_COLORS.iter().map(|s| s.to_string()).collect(),
            palette_size: config::palette_size(),
            desktop_transform: ViewportTransform::DESKTOP,
            mobile_transform: ViewportTransform::MOBILE,
            desktop_budget: ShapeBudget {
                per_screen: config::DESKTOP_SHAPES_PER_SCREEN,
                max: config::DESKTOP_MAX_SHAPES,
            },
            mobile_budget: ShapeBudget {
                per_screen: config::MOBILE_SHAPES_PER_SCREEN,
                max: config::MOBILE_MAX_SHAPES,
            },
            particle_count: config::PARTICLE_COUNT,
            particle_seed: config::PARTICLE_SEED,
        }
    }
}

impl FieldConfig {
    pub fn with_strategy(mut self, strategy: impl LayoutStrategy + 'static) -> Self {
        self.strategy = Arc::new(strategy);
        self
    }

    pub fn with_redistribute(mut self, options: RedistributeOptions) -> Self {
        self.redistribute = Some(options);
        self
    }

    pub fn with_seeds(mut self, seeds: &[&str]) -> Self {
        self.seeds = seeds.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_palette_size(mut self, size: usize) -> Self {
        self.palette_size = size;
        self
    }

    pub fn with_particles(mut self, count: usize, seed: u32) -> Self {
        self.particle_count = count;
        self.particle_seed = seed;
        self
    }

    pub fn with_budget(mut self, breakpoint: Breakpoint, budget: ShapeBudget) -> Self {
        match breakpoint {
            Breakpoint::Desktop => self.desktop_budget = budget,
            Breakpoint::Mobile => self.mobile_budget = budget,
        }
        self
    }

    pub fn transform(&self, breakpoint: Breakpoint) -> &ViewportTransform {
        match breakpoint {
            Breakpoint::Desktop => &self.desktop_transform,
            Breakpoint::Mobile => &self.mobile_transform,
        }
    }

    pub fn budget(&self, breakpoint: Breakpoint) -> &ShapeBudget {
        match breakpoint {
            Breakpoint::Desktop => &self.desktop_budget,
            Breakpoint::Mobile => &self.mobile_budget,
        }
    }
}

/// Builds sphere fields for changing viewports from one fixed palette.
#[derive(Debug, Clone)]
pub struct FieldGenerator {
    config: FieldConfig,
    palette: Palette,
    particles: Vec<ParticleSpec>,
}

impl FieldGenerator {
    pub fn new(config: FieldConfig) -> Self {
        let seeds: Vec<&str> = config.seeds.iter().map(String::as_str).collect();
        let palette = Palette::generate(&seeds, config.palette_size);
        let particles = generate_particle_field(config.particle_count, &palette, config.particle_seed);
        log::debug!(
            "field: palette of {}, {} particles, strategy {}",
            palette.len(),
            particles.len(),
            config.strategy.name()
        );
        Self {
            config,
            palette,
            particles,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn particles(&self) -> &[ParticleSpec] {
        &self.particles
    }

    /// Colored, adapted spheres for this viewport and page.
    ///
    /// Empty when the page height is zero, negative or not finite, when the
    /// viewport is degenerate, or when the palette is empty.
    pub fn generate(&self, viewport: Viewport, page_height: f32) -> Vec<ShapeSpec> {
        if viewport.is_degenerate() || !page_height.is_finite() || page_height <= 0.0 {
            log::debug!("field: nothing to lay out ({:?}, page height {})", viewport, page_height);
            return Vec::new();
        }
        if self.palette.is_empty() {
            log::warn!("field: empty palette, no spheres generated");
            return Vec::new();
        }

        let breakpoint = viewport.breakpoint();
        let mut ctx = LayoutContext {
            breakpoint,
            viewport,
            page_height,
            budget: 0,
        };
        ctx.budget = self.config.budget(breakpoint).for_screens(ctx.screens());

        let base = self.config.strategy.generate(&ctx);
        let mut shapes = adapt(&base, self.config.transform(breakpoint));
        if let Some(options) = &self.config.redistribute {
            shapes = redistribute_vertical(&shapes, options);
        }
        if let Some(coverage) = self.config.strategy.coverage(breakpoint) {
            let moves = coverage.enforce(&mut shapes);
            if moves > 0 {
                log::debug!("field: {} spheres moved to keep region coverage after adapt", moves);
            }
        }

        let offset = match breakpoint {
            Breakpoint::Desktop => 0,
            Breakpoint::Mobile => self.palette.len() / 2,
        };
        for (i, shape) in shapes.iter_mut().enumerate() {
            shape.color = self.palette.rgb(offset + i);
        }

        log::debug!(
            "field: {} spheres for {:?} ({:.0}x{:.0}, page {:.0})",
            shapes.len(),
            breakpoint,
            viewport.width,
            viewport.height,
            page_height
        );
        shapes
    }
}

impl Default for FieldGenerator {
    fn default() -> Self {
        Self::new(FieldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::layout::depth_field::DepthFieldLayout;
    use crate::layout::scatter::{region_counts, REGION_COUNT};
    use crate::viewport::{EXTENDED_MAX, EXTENDED_MIN};

    const DESKTOP: Viewport = Viewport::new(1440.0, 900.0);
    const PHONE: Viewport = Viewport::new(390.0, 844.0);

    fn in_bounds(shapes: &[ShapeSpec]) -> bool {
        shapes.iter().all(|s| {
            (EXTENDED_MIN..=EXTENDED_MAX).contains(&s.position.x)
                && (EXTENDED_MIN..=EXTENDED_MAX).contains(&s.position.y)
                && s.satisfies_invariants()
        })
    }

    #[test]
    fn test_default_field_desktop_and_mobile() {
        let gen = FieldGenerator::default();
        let desktop = gen.generate(DESKTOP, 4000.0);
        let mobile = gen.generate(PHONE, 6000.0);
        assert_eq!(desktop.len(), 24);
        assert_eq!(mobile.len(), 24);
        assert_eq!(desktop[0].id, "large-1");
        assert_eq!(mobile[0].id, "large-m-1");
        assert!(in_bounds(&desktop));
        assert!(in_bounds(&mobile));
    }

    #[test]
    fn test_palette_offsets_per_breakpoint() {
        let gen = FieldGenerator::default();
        let desktop = gen.generate(DESKTOP, 900.0);
        let mobile = gen.generate(PHONE, 844.0);
        assert_eq!(desktop[0].color, gen.palette().rgb(0));
        assert_eq!(mobile[0].color, gen.palette().rgb(gen.palette().len() / 2));
        assert_eq!(desktop[0].color, Rgb::new(0xFF, 0xBE, 0x0B));
    }

    #[test]
    fn test_unmeasurable_page_gives_empty_field() {
        let gen = FieldGenerator::default();
        assert!(gen.generate(DESKTOP, 0.0).is_empty());
        assert!(gen.generate(DESKTOP, -10.0).is_empty());
        assert!(gen.generate(DESKTOP, f32::NAN).is_empty());
        assert!(gen.generate(Viewport::new(0.0, 900.0), 900.0).is_empty());
    }

    #[test]
    fn test_budget_bounds_count() {
        let budget = ShapeBudget { per_screen: 8, max: 20 };
        assert_eq!(budget.for_screens(0.4), 8);
        assert_eq!(budget.for_screens(1.1), 16);
        assert_eq!(budget.for_screens(50.0), 20);
        assert_eq!(budget.for_screens(f32::INFINITY), 8);

        let gen = FieldGenerator::new(
            FieldConfig::default()
                .with_strategy(DepthFieldLayout::default())
                .with_budget(Breakpoint::Desktop, ShapeBudget { per_screen: 6, max: 30 }),
        );
        assert_eq!(gen.generate(DESKTOP, 900.0 * 100.0).len(), 30);
    }

    #[test]
    fn test_scatter_field_covers_regions() {
        let layout = config::scatter_layout();
        let gen = FieldGenerator::new(FieldConfig::default().with_strategy(layout));
        let viewports = [DESKTOP, PHONE, Viewport::new(375.0, 667.0), Viewport::new(1024.0, 768.0)];
        for vp in viewports {
            let min_per_region = layout.params(vp.breakpoint()).min_per_region;
            for step in 0..60 {
                let screens = 1.0 + step as f32 * 0.25;
                let shapes = gen.generate(vp, vp.height * screens);
                assert!(in_bounds(&shapes));
                let counts = region_counts(shapes.iter().map(|s| s.position));
                let min = min_per_region.min(shapes.len() / REGION_COUNT);
                assert!(
                    counts.iter().all(|&c| c >= min),
                    "{}x{} screens={} counts={:?}",
                    vp.width,
                    vp.height,
                    screens,
                    counts
                );
            }
        }
    }

    #[test]
    fn test_redistribute_option() {
        let gen = FieldGenerator::new(FieldConfig::default().with_redistribute(RedistributeOptions::default()));
        let shapes = gen.generate(DESKTOP, 3000.0);
        assert!(in_bounds(&shapes));
        let top = shapes.iter().map(|s| s.position.y).fold(f32::INFINITY, f32::min);
        let bottom = shapes.iter().map(|s| s.position.y).fold(f32::NEG_INFINITY, f32::max);
        assert!(top < 0.1 && bottom > 0.9);
    }

    #[test]
    fn test_particles_built_once() {
        let gen = FieldGenerator::default();
        assert_eq!(gen.particles().len(), config::PARTICLE_COUNT);
        let none = FieldGenerator::new(FieldConfig::default().with_particles(0, 1));
        assert!(none.particles().is_empty());
    }
}
