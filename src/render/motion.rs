//! Declarative keyframe timelines.
//!
//! Instead of injecting stylesheet rules at runtime, every looping animation
//! is described as a [`Timeline`]: keyframe tracks + duration + easing +
//! repeat mode. A host with a native animation system can translate it
//! directly; hosts without one (the egui painter) call [`Timeline::sample`].
//!
//! - Motion paths: one of four closed 5-keyframe paths per sphere, picked by
//!   id hash, with a subtle scale pulse and rotation wobble
//! - Twinkle: particle opacity flicker, alternating direction

use crate::fast_math::{fract01, id_hash, lerp};

/// Closed path shapes a sphere can loop along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionPattern {
    /// Wave-like horizontal ellipse
    HorizontalEllipse,
    /// Floating vertical ellipse
    VerticalEllipse,
    /// Circular orbit
    Orbit,
    /// Infinity loop
    FigureEight,
}

impl MotionPattern {
    pub const ALL: [Self; 4] = [
        Self::HorizontalEllipse,
        Self::VerticalEllipse,
        Self::Orbit,
        Self::FigureEight,
    ];

    /// Same id ⇒ same pattern.
    pub fn for_id(id: &str) -> Self {
        Self::ALL[(id_hash(id) as usize) % Self::ALL.len()]
    }

    /// (x, y) keyframe multipliers of the amplitude.
    fn unit_path(self) -> ([f32; 5], [f32; 5]) {
        match self {
            Self::HorizontalEllipse => (
                [0.0, 0.85, 0.3, -0.7, 0.0],
                [0.0, -0.5, 0.65, 0.4, 0.0],
            ),
            Self::VerticalEllipse => (
                [0.0, 0.5, -0.4, 0.6, 0.0],
                [0.0, -0.8, -0.2, 0.75, 0.0],
            ),
            Self::Orbit => (
                [0.0, 0.7, 0.0, -0.7, 0.0],
                [0.0, -0.7, 0.0, 0.7, 0.0],
            ),
            Self::FigureEight => (
                [0.0, 0.65, -0.65, 0.65, 0.0],
                [0.0, 0.5, 0.0, -0.5, 0.0],
            ),
        }
    }
}

/// CSS-style cubic Bézier timing function through (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    /// Smooth sine-like ease-in-out used for sphere paths.
    pub const EASE_IN_OUT_SINE: Self = Self { x1: 0.37, y1: 0.0, x2: 0.63, y2: 1.0 };
    /// CSS `ease-in-out`.
    pub const EASE_IN_OUT: Self = Self { x1: 0.42, y1: 0.0, x2: 0.58, y2: 1.0 };
    pub const LINEAR: Self = Self { x1: 0.0, y1: 0.0, x2: 1.0, y2: 1.0 };

    #[inline]
    fn axis(a1: f32, a2: f32, u: f32) -> f32 {
        // B(u) = 3(1-u)²u·a1 + 3(1-u)u²·a2 + u³
        let inv = 1.0 - u;
        3.0 * inv * inv * u * a1 + 3.0 * inv * u * u * a2 + u * u * u
    }

    #[inline]
    fn axis_slope(a1: f32, a2: f32, u: f32) -> f32 {
        let inv = 1.0 - u;
        3.0 * inv * inv * a1 + 6.0 * inv * u * (a2 - a1) + 3.0 * u * u * (1.0 - a2)
    }

    /// Eased progress for linear progress `x` in [0, 1].
    pub fn ease(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        if x == 0.0 || x == 1.0 {
            return x;
        }

        // Newton first; bisection if the slope flattens out.
        let mut u = x;
        for _ in 0..8 {
            let err = Self::axis(self.x1, self.x2, u) - x;
            if err.abs() < 1e-6 {
                return Self::axis(self.y1, self.y2, u);
            }
            let slope = Self::axis_slope(self.x1, self.x2, u);
            if slope.abs() < 1e-6 {
                break;
            }
            u = (u - err / slope).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        u = x;
        for _ in 0..32 {
            let v = Self::axis(self.x1, self.x2, u);
            if (v - x).abs() < 1e-6 {
                break;
            }
            if v < x {
                lo = u;
            } else {
                hi = u;
            }
            u = (lo + hi) * 0.5;
        }
        Self::axis(self.y1, self.y2, u)
    }
}

/// What a track animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatedProperty {
    /// px
    TranslateX,
    /// px
    TranslateY,
    Scale,
    /// degrees
    Rotate,
    Opacity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// 0 → 1, 0 → 1, ...
    Loop,
    /// 0 → 1, 1 → 0, ...
    Alternate,
}

/// Keyframe values at normalized offsets (both ascending, same length).
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub property: AnimatedProperty,
    pub offsets: Vec<f32>,
    pub values: Vec<f32>,
}

impl Track {
    /// Evenly spaced keyframes.
    pub fn even(property: AnimatedProperty, values: &[f32]) -> Self {
        let last = values.len().saturating_sub(1).max(1) as f32;
        Self {
            property,
            offsets: (0..values.len()).map(|i| i as f32 / last).collect(),
            values: values.to_vec(),
        }
    }

    /// Value at cycle progress `p`, easing each segment independently.
    pub fn value_at(&self, p: f32, easing: &CubicBezier) -> f32 {
        let n = self.values.len().min(self.offsets.len());
        match n {
            0 => return 0.0,
            1 => return self.values[0],
            _ => {}
        }
        if p <= self.offsets[0] {
            return self.values[0];
        }
        for i in 0..n - 1 {
            let (o0, o1) = (self.offsets[i], self.offsets[i + 1]);
            if p <= o1 {
                let span = o1 - o0;
                let local = if span > 0.0 { (p - o0) / span } else { 1.0 };
                return lerp(self.values[i], self.values[i + 1], easing.ease(local));
            }
        }
        self.values[n - 1]
    }
}

/// Sampled values of a timeline at one instant. Properties without a track
/// keep their neutral value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineSample {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    pub rotate: f32,
    pub opacity: f32,
}

impl Default for TimelineSample {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            rotate: 0.0,
            opacity: 1.0,
        }
    }
}

/// A looping, infinitely repeating keyframe animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    /// Seconds per cycle
    pub duration: f32,
    /// Seconds; negative starts mid-cycle
    pub delay: f32,
    pub easing: CubicBezier,
    pub repeat: Repeat,
    pub tracks: Vec<Track>,
}

impl Timeline {
    /// Cycle progress in [0, 1] at `time` seconds since mount.
    pub fn progress(&self, time: f32) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        let elapsed = time - self.delay;
        if elapsed <= 0.0 {
            return 0.0;
        }
        let cycles = elapsed / self.duration;
        let p = fract01(cycles);
        match self.repeat {
            Repeat::Loop => p,
            Repeat::Alternate if (cycles.floor() as i64) % 2 == 1 => 1.0 - p,
            Repeat::Alternate => p,
        }
    }

    pub fn sample(&self, time: f32) -> TimelineSample {
        let p = self.progress(time);
        let mut out = TimelineSample::default();
        for track in &self.tracks {
            let v = track.value_at(p, &self.easing);
            match track.property {
                AnimatedProperty::TranslateX => out.translate_x = v,
                AnimatedProperty::TranslateY => out.translate_y = v,
                AnimatedProperty::Scale => out.scale = v,
                AnimatedProperty::Rotate => out.rotate = v,
                AnimatedProperty::Opacity => out.opacity = v,
            }
        }
        out
    }
}

/// Amplitude (px) of a sphere's path: farther (blurrier) swings wider.
pub fn motion_amplitude(id: &str, blur: f32) -> (f32, f32) {
    let hash = id_hash(id);
    let base = 50.0 + (blur / 24.0) * 65.0;
    let x_amp = base * (0.9 + (hash % 20) as f32 / 100.0);
    let y_amp = base * (0.85 + (hash % 25) as f32 / 100.0);
    (x_amp, y_amp)
}

/// Path loop for a sphere: translate along its pattern plus scale/rotate wobble.
pub fn motion_timeline(id: &str, pattern: MotionPattern, blur: f32, duration: f32) -> Timeline {
    let (x_amp, y_amp) = motion_amplitude(id, blur);
    let (ux, uy) = pattern.unit_path();
    let xs: Vec<f32> = ux.iter().map(|u| u * x_amp).collect();
    let ys: Vec<f32> = uy.iter().map(|u| u * y_amp).collect();

    Timeline {
        duration,
        delay: 0.0,
        easing: CubicBezier::EASE_IN_OUT_SINE,
        repeat: Repeat::Loop,
        tracks: vec![
            Track::even(AnimatedProperty::TranslateX, &xs),
            Track::even(AnimatedProperty::TranslateY, &ys),
            Track::even(AnimatedProperty::Scale, &[1.0, 1.08, 1.0, 0.95, 1.0]),
            Track::even(AnimatedProperty::Rotate, &[0.0, 2.5, 0.0, -1.8, 0.0]),
        ],
    }
}

/// Particle twinkle: dim → bright → mid → dim, alternating.
pub fn twinkle_timeline(duration: f32, delay: f32) -> Timeline {
    Timeline {
        duration,
        delay,
        easing: CubicBezier::EASE_IN_OUT,
        repeat: Repeat::Alternate,
        tracks: vec![Track {
            property: AnimatedProperty::Opacity,
            offsets: vec![0.0, 0.45, 0.6, 1.0],
            values: vec![0.4, 1.0, 0.6, 0.4],
        }],
    }
}
