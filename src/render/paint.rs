//! egui Painter-based backdrop rendering.
//!
//! Spheres are triangle fans with per-vertex colors: a radial falloff from
//! the center, a feather ring standing in for the blur filter, and for
//! godray spheres a second fan carrying the linear streak. Positions are
//! page fractions, so the painter needs the page height and scroll offset
//! to place them in the visible window.

use egui::epaint::Mesh;
use egui::{pos2, vec2, Color32, Pos2, Rect, Shape, Vec2};

use crate::color::Rgb;
use crate::fast_math::clamp01;
use crate::render::style::{GodrayGradient, ParticleStyle, ShapeStyle};

/// Radial gradients size to the farthest corner of the element box.
const FARTHEST_CORNER: f32 = std::f32::consts::SQRT_2;
/// Feather width as a multiple of the blur radius.
const FEATHER: f32 = 1.5;

/// Visible window into the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageView {
    pub rect: Rect,
    pub page_height: f32,
    pub scroll_y: f32,
    /// Timeline clock in seconds
    pub time: f32,
}

impl PageView {
    /// Screen position of a page-fraction point, before live offsets.
    fn anchor(&self, left: f32, top: f32) -> Pos2 {
        pos2(
            self.rect.left() + left * self.rect.width(),
            self.rect.top() + top * self.page_height - self.scroll_y,
        )
    }
}

pub struct BackdropPainter {
    pub page_bg: Color32,
    /// Rim vertices per fan
    pub segments: usize,
}

impl Default for BackdropPainter {
    fn default() -> Self {
        Self {
            page_bg: Color32::from_rgb(10, 10, 12),
            segments: 48,
        }
    }
}

impl BackdropPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw background, particles, then spheres in back-to-front order.
    pub fn paint(&self, painter: &egui::Painter, view: &PageView, shapes: &[ShapeStyle], particles: &[ParticleStyle]) {
        painter.rect_filled(view.rect, 0.0, self.page_bg);
        for particle in particles {
            self.paint_particle(painter, view, particle);
        }
        let mut drawn = 0usize;
        for shape in shapes {
            if self.paint_shape(painter, view, shape) {
                drawn += 1;
            }
        }
        log::trace!("paint: {} of {} spheres visible", drawn, shapes.len());
    }

    fn paint_particle(&self, painter: &egui::Painter, view: &PageView, particle: &ParticleStyle) {
        let center = view.anchor(particle.left, particle.top);
        let radius = particle.size * 0.5 + particle.blur;
        if !view.rect.expand(radius).contains(center) {
            return;
        }
        let alpha = particle.opacity * particle.twinkle_at(view.time);
        // gradient reaches transparent at 70%; the blur spreads it further
        let ellipse = Ellipse {
            center,
            radius: vec2(particle.size * 0.5, particle.size * 0.5),
            rotation: 0.0,
        };
        let core = rgba(particle.color, alpha, 1.0);
        let mesh = radial_fan(&ellipse, self.segments, core, 0.0, 0.7, particle.blur);
        painter.add(Shape::mesh(mesh));
    }

    /// Returns false when the sphere is off screen.
    fn paint_shape(&self, painter: &egui::Painter, view: &PageView, shape: &ShapeStyle) -> bool {
        let motion = shape.motion_at(view.time);
        let scale = shape.scale * motion.scale;
        let offset = vec2(
            shape.translate_x + motion.translate_x,
            shape.translate_y + motion.translate_y,
        );
        let ellipse = Ellipse {
            center: view.anchor(shape.left, shape.top) + offset,
            radius: vec2(shape.width, shape.height) * 0.5 * scale,
            rotation: (shape.rotation + motion.rotate).to_radians(),
        };
        let reach = ellipse.radius.max_elem() + shape.blur * FEATHER;
        if !view.rect.expand(reach).contains(ellipse.center) {
            return false;
        }

        let alpha = shape.opacity * motion.opacity;
        let radial = &shape.background.radial;
        let stop = radial.stop / 100.0 * FARTHEST_CORNER;
        let rim_alpha = clamp01(1.0 - 1.0 / stop);
        let core = rgba(radial.color, alpha, shape.brightness);
        painter.add(Shape::mesh(radial_fan(
            &ellipse,
            self.segments,
            core,
            rim_alpha,
            1.0,
            shape.blur,
        )));

        if let Some(ray) = &shape.background.godray {
            painter.add(Shape::mesh(godray_fan(&ellipse, self.segments, ray, alpha, shape.brightness)));
        }
        true
    }
}

#[derive(Debug, Clone, Copy)]
struct Ellipse {
    center: Pos2,
    radius: Vec2,
    /// Radians
    rotation: f32,
}

impl Ellipse {
    /// Point at `angle` on the ellipse scaled by `k`.
    fn point(&self, angle: f32, k: f32) -> Pos2 {
        let local = vec2(angle.cos() * self.radius.x, angle.sin() * self.radius.y) * k;
        let (sin, cos) = self.rotation.sin_cos();
        self.center + vec2(local.x * cos - local.y * sin, local.x * sin + local.y * cos)
    }
}

fn rgba(color: Rgb, alpha: f32, brightness: f32) -> Color32 {
    let channel = |c: u8| (c as f32 * brightness.max(0.0)).round().min(255.0) as u8;
    Color32::from_rgba_unmultiplied(
        channel(color.r),
        channel(color.g),
        channel(color.b),
        (clamp01(alpha) * 255.0).round() as u8,
    )
}

fn with_alpha_factor(color: Color32, factor: f32) -> Color32 {
    color.gamma_multiply(clamp01(factor))
}

/// Center → rim (at `rim_k` of the radius, `rim_alpha` of the core alpha) →
/// transparent feather `blur · FEATHER` px further out.
fn radial_fan(ellipse: &Ellipse, segments: usize, core: Color32, rim_alpha: f32, rim_k: f32, blur: f32) -> Mesh {
    let segments = segments.max(8);
    let mut mesh = Mesh::default();
    mesh.colored_vertex(ellipse.center, core);
    let rim = with_alpha_factor(core, rim_alpha);
    let feather_k = rim_k + blur * FEATHER / ellipse.radius.max_elem().max(1.0);

    for i in 0..segments {
        let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
        mesh.colored_vertex(ellipse.point(angle, rim_k), rim);
        mesh.colored_vertex(ellipse.point(angle, feather_k), Color32::TRANSPARENT);
    }
    for i in 0..segments as u32 {
        let next = (i + 1) % segments as u32;
        let (rim_a, feather_a) = (1 + 2 * i, 2 + 2 * i);
        let (rim_b, feather_b) = (1 + 2 * next, 2 + 2 * next);
        mesh.add_triangle(0, rim_a, rim_b);
        mesh.add_triangle(rim_a, feather_a, rim_b);
        mesh.add_triangle(rim_b, feather_a, feather_b);
    }
    mesh
}

/// Linear streak clipped to the ellipse: full intensity at the gradient
/// start, transparent by 60% along the CSS gradient line.
fn godray_fan(ellipse: &Ellipse, segments: usize, ray: &GodrayGradient, alpha: f32, brightness: f32) -> Mesh {
    let segments = segments.max(8);
    let angle = ray.angle.to_radians();
    let dir = vec2(angle.sin(), -angle.cos());
    let box_size = ellipse.radius * 2.0;
    let line = (box_size.x * dir.x).abs() + (box_size.y * dir.y).abs();
    let base = rgba(ray.color, ray.intensity * alpha, brightness);

    let color_at = |p: Pos2| {
        let t = 0.5 + (p - ellipse.center).dot(dir) / line.max(1.0);
        with_alpha_factor(base, 1.0 - t / 0.6)
    };

    let mut mesh = Mesh::default();
    mesh.colored_vertex(ellipse.center, color_at(ellipse.center));
    for i in 0..segments {
        let a = i as f32 / segments as f32 * std::f32::consts::TAU;
        let p = ellipse.point(a, 1.0);
        mesh.colored_vertex(p, color_at(p));
    }
    for i in 0..segments as u32 {
        mesh.add_triangle(0, 1 + i, 1 + (i + 1) % segments as u32);
    }
    mesh
}
