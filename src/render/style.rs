//! Visual attributes the rendering layer paints.
//!
//! [`ShapeStyle`] is the only thing the animation engine writes to. It
//! starts as a static projection of a [`ShapeSpec`] and then receives
//! per-frame offsets, blur, scale and brightness on top.

use crate::color::{parse_rgb_css, Hsl, Rgb};
use crate::fast_math::{clamp01, fract01, id_hash, RECIPROCALS};
use crate::particles::ParticleSpec;
use crate::render::motion::{motion_timeline, Timeline, TimelineSample};
use crate::shape::{GradientKind, ShapeSpec};

/// Blur (px) treated as "as far as it gets" for color and gradient shaping.
const FAR_BLUR: f32 = 24.0;

/// Radial falloff from `color` to transparent at `stop` percent.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub color: Rgb,
    pub stop: f32,
}

impl RadialGradient {
    pub fn to_css(&self) -> String {
        format!(
            "radial-gradient(circle at center, {} 0%, transparent {:.0}%)",
            self.color.to_css(),
            self.stop
        )
    }
}

/// Linear streak at `angle` degrees, fading out by 60%.
#[derive(Debug, Clone, PartialEq)]
pub struct GodrayGradient {
    pub angle: f32,
    pub color: Rgb,
    pub intensity: f32,
}

impl GodrayGradient {
    pub fn to_css(&self) -> String {
        format!(
            "linear-gradient({}deg, {} 0%, {} 60%)",
            self.angle,
            self.color.to_css_alpha(self.intensity),
            self.color.to_css_alpha(0.0)
        )
    }
}

/// Background layers of one sphere, topmost first.
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub godray: Option<GodrayGradient>,
    pub radial: RadialGradient,
}

impl Background {
    /// CSS `background-image` value.
    pub fn to_css(&self) -> String {
        match &self.godray {
            Some(ray) => format!("{}, {}", ray.to_css(), self.radial.to_css()),
            None => self.radial.to_css(),
        }
    }
}

/// Everything the renderer needs for one sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    pub id: String,
    /// Fractional left/top of the sphere center
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub blur: f32,
    pub opacity: f32,
    /// Live offsets in px (pointer/orientation on x and y, scroll on y)
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    pub brightness: f32,
    pub background: Background,
    /// Looping path; `None` under reduced motion
    pub animation: Option<Timeline>,
}

impl ShapeStyle {
    /// Static style of `spec`. With `reduced_motion` no timeline is attached.
    pub fn from_spec(spec: &ShapeSpec, reduced_motion: bool) -> Self {
        let aspect = spec.aspect.unwrap_or(1.0).max(0.1);
        Self {
            id: spec.id.clone(),
            left: spec.position.x,
            top: spec.position.y,
            width: spec.size * aspect,
            height: spec.size,
            rotation: spec.rotation.unwrap_or(0.0),
            blur: spec.blur,
            opacity: spec.opacity,
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            brightness: 1.0,
            background: background_for(spec),
            animation: (!reduced_motion)
                .then(|| motion_timeline(&spec.id, spec.motion, spec.blur, spec.duration)),
        }
    }

    /// Timeline values at `time`; neutral when there is no timeline.
    pub fn motion_at(&self, time: f32) -> TimelineSample {
        self.animation
            .as_ref()
            .map(|t| t.sample(time))
            .unwrap_or_default()
    }

    /// CSS `filter` value.
    pub fn filter_css(&self) -> String {
        if (self.brightness - 1.0).abs() < 1e-3 {
            format!("blur({:.1}px)", self.blur)
        } else {
            format!("blur({:.1}px) brightness({:.2})", self.blur, self.brightness)
        }
    }

    /// CSS `transform` value (centering plus live offsets).
    pub fn transform_css(&self) -> String {
        format!(
            "translate(calc(-50% + {:.1}px), calc(-50% + {:.1}px)) scale({:.3}) rotate({:.1}deg)",
            self.translate_x, self.translate_y, self.scale, self.rotation
        )
    }
}

/// Static style of a particle.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleStyle {
    pub id: String,
    pub left: f32,
    pub top: f32,
    pub size: f32,
    pub blur: f32,
    pub opacity: f32,
    pub color: Rgb,
    pub animation: Option<Timeline>,
}

impl ParticleStyle {
    pub fn from_spec(spec: &ParticleSpec, reduced_motion: bool) -> Self {
        Self {
            id: spec.id.clone(),
            left: spec.position.x,
            top: spec.position.y,
            size: spec.size,
            blur: spec.blur,
            opacity: spec.opacity,
            color: spec.color,
            animation: (!reduced_motion).then(|| spec.twinkle()),
        }
    }

    /// Twinkle multiplier at `time`; 1 when static.
    pub fn twinkle_at(&self, time: f32) -> f32 {
        self.animation.as_ref().map(|t| t.sample(time).opacity).unwrap_or(1.0)
    }

    pub fn background_css(&self) -> String {
        format!(
            "radial-gradient(circle, {} 0%, rgba(0, 0, 0, 0) 70%)",
            self.color.to_css()
        )
    }
}

/// Analogous, depth-shaped variant of a palette color: farther spheres get
/// darker, slightly shifted hues.
pub fn depth_enhanced_color(id: &str, color: Rgb, blur: f32) -> Rgb {
    let hash = id_hash(id);
    let depth = clamp01(blur / FAR_BLUR);
    let base = color.to_hsl().enhance();
    let hue_offset = ((hash % 15) as f32 - 7.0) * 0.02 + depth * 0.02;
    Hsl {
        h: fract01(base.h + hue_offset),
        s: clamp01(0.96 + (1.0 - depth) * 0.04),
        l: clamp01(0.36 + (1.0 - depth) * 0.26),
    }
    .to_rgb()
}

/// Radial stop: near spheres stay dense (78%), far ones diffuse out to 92%.
pub fn gradient_stop(blur: f32) -> f32 {
    (78.0 + (blur / FAR_BLUR) * 14.0).min(92.0)
}

/// Godray angle in degrees: 105 ± 20, from the id hash.
pub fn godray_angle(id: &str) -> f32 {
    (105 + (id_hash(id) % 40) as i32 - 20) as f32
}

/// Streak derived from the sphere's CSS color; sharper spheres shine harder.
pub fn godray(css_color: &str, angle: f32, blur: f32) -> GodrayGradient {
    let base = parse_rgb_css(css_color).to_hsl();
    let hue_shift = ((angle % 360.0) * RECIPROCALS.inv_360 - 0.5) * 0.1;
    let color = Hsl {
        h: fract01(base.h + hue_shift),
        s: clamp01(base.s * 0.85 + 0.1),
        l: clamp01(base.l + 0.08),
    }
    .to_rgb();
    GodrayGradient {
        angle,
        color,
        intensity: 0.18 + ((18.0 - blur) / 44.0).max(0.0),
    }
}

fn background_for(spec: &ShapeSpec) -> Background {
    let color = depth_enhanced_color(&spec.id, spec.color, spec.blur);
    let radial = RadialGradient {
        color,
        stop: gradient_stop(spec.blur),
    };
    let godray = match spec.gradient {
        GradientKind::RadialGodray => Some(godray(&color.to_css(), godray_angle(&spec.id), spec.blur)),
        GradientKind::Radial => None,
    };
    Background { godray, radial }
}
