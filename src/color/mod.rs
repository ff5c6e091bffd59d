//! Color Conversion: hex ↔ RGB ↔ HSL
//!
//! Hex digits are decoded without an if/else chain per character:
//!   is_digit = (b - '0') < 10
//!   is_lower = (b - 'a') < 6
//!   is_upper = (b - 'A') < 6
//!   value    = is_digit * (b - '0') + is_lower * (b - 'a' + 10) + is_upper * (b - 'A' + 10)
//! and the three flags OR-ed together tell us whether the byte was valid.
//!
//! HSL components are all normalized to `[0, 1]` (hue included).

pub mod palette;

use std::fmt;
use std::str::FromStr;

use crate::fast_math::{clamp01, fract01, RECIPROCALS};

/// RGB color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL color, each component in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

/// A hex or CSS color string that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError {
    pub input: String,
    pub reason: &'static str,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color {:?}: {}", self.input, self.reason)
    }
}

impl std::error::Error for ColorParseError {}

/// Hex character → (4-bit value, valid flag), branchless.
#[inline(always)]
fn hex_digit(b: u8) -> (u8, bool) {
    let is_digit = (b.wrapping_sub(b'0') < 10) as u8;
    let is_lower = (b.wrapping_sub(b'a') < 6) as u8;
    let is_upper = (b.wrapping_sub(b'A') < 6) as u8;

    let value = is_digit
        .wrapping_mul(b.wrapping_sub(b'0'))
        .wrapping_add(is_lower.wrapping_mul(b.wrapping_sub(b'a').wrapping_add(10)))
        .wrapping_add(is_upper.wrapping_mul(b.wrapping_sub(b'A').wrapping_add(10)));

    (value, (is_digit | is_lower | is_upper) == 1)
}

impl Rgb {
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed).as_bytes();

        let mut nibbles = [0u8; 6];
        let mut valid = true;
        for (slot, &b) in nibbles.iter_mut().zip(digits) {
            let (v, ok) = hex_digit(b);
            *slot = v;
            valid &= ok;
        }
        if !valid {
            return Err(ColorParseError {
                input: s.to_string(),
                reason: "non-hex digit",
            });
        }

        match digits.len() {
            3 => Ok(Self {
                r: nibbles[0] << 4 | nibbles[0],
                g: nibbles[1] << 4 | nibbles[1],
                b: nibbles[2] << 4 | nibbles[2],
            }),
            6 => Ok(Self {
                r: nibbles[0] << 4 | nibbles[1],
                g: nibbles[2] << 4 | nibbles[3],
                b: nibbles[4] << 4 | nibbles[5],
            }),
            _ => Err(ColorParseError {
                input: s.to_string(),
                reason: "expected 3 or 6 hex digits",
            }),
        }
    }

    /// Fail-soft hex parse: malformed input becomes white.
    pub fn from_hex_or_white(s: &str) -> Self {
        Self::from_hex(s).unwrap_or_else(|e| {
            log::warn!("{}; falling back to white", e);
            Self::WHITE
        })
    }

    /// Uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `rgb(r, g, b)`
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    /// `rgba(r, g, b, a)` with alpha to two decimals.
    pub fn to_css_alpha(self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {:.2})", self.r, self.g, self.b, clamp01(alpha))
    }

    /// Standard max/min channel formula. Grayscale → h = 0, s = 0.
    pub fn to_hsl(self) -> Hsl {
        let r = self.r as f32 * RECIPROCALS.inv_255;
        let g = self.g as f32 * RECIPROCALS.inv_255;
        let b = self.b as f32 * RECIPROCALS.inv_255;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) * 0.5;

        if self.r == self.g && self.g == self.b {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl {
            h: h * RECIPROCALS.inv_6,
            s,
            l,
        }
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Piecewise hue → channel.
#[inline]
fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

#[inline(always)]
fn unit_to_byte(v: f32) -> u8 {
    (clamp01(v) * 255.0).round() as u8
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    pub fn to_rgb(self) -> Rgb {
        if self.s == 0.0 {
            let v = unit_to_byte(self.l);
            return Rgb::new(v, v, v);
        }
        let (h, s, l) = (fract01(self.h), clamp01(self.s), clamp01(self.l));
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Rgb {
            r: unit_to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
            g: unit_to_byte(hue_to_channel(p, q, h)),
            b: unit_to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
        }
    }

    pub fn to_hex(self) -> String {
        self.to_rgb().to_hex()
    }

    /// Pull saturation and lightness into the "vibrant" band.
    pub fn enhance(self) -> Self {
        Self {
            h: self.h,
            s: clamp01(0.94 + self.s * 0.06),
            l: clamp01(0.58 + (self.l - 0.5) * 0.4),
        }
    }

    /// Rotate hue by `shift` turns, wrapping into `[0, 1)`.
    pub fn rotate(self, shift: f32) -> Self {
        Self {
            h: fract01(self.h + shift),
            ..self
        }
    }
}

/// Hex → HSL, fail-soft (white on malformed input).
pub fn hex_to_hsl(hex: &str) -> Hsl {
    Rgb::from_hex_or_white(hex).to_hsl()
}

/// HSL → uppercase hex.
pub fn hsl_to_hex(hsl: Hsl) -> String {
    hsl.to_hex()
}

/// Parse `rgb(r, g, b)` (alpha from `rgba(...)` is ignored).
///
/// Malformed input yields opaque white instead of an error.
pub fn parse_rgb_css(s: &str) -> Rgb {
    let trimmed = s.trim();
    let inner = match trimmed
        .strip_prefix("rgba(")
        .or_else(|| trimmed.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => inner,
        None => return Rgb::WHITE,
    };

    let mut channels = inner.split(',').map(|p| p.trim().parse::<u8>());
    match (channels.next(), channels.next(), channels.next()) {
        (Some(Ok(r)), Some(Ok(g)), Some(Ok(b))) => Rgb { r, g, b },
        _ => Rgb::WHITE,
    }
}
