//! Golden-angle palette generation.
//!
//! The seeds occupy the first slots verbatim. Every further slot takes the
//! next seed (cycling) as its hue base and rotates it by a cumulative shift
//! that advances by 1/φ each step, so hues never fall into a short cycle.

use super::{Hsl, Rgb};
use crate::fast_math::{clamp01, fract01, GOLDEN_RATIO_CONJUGATE};

/// Ordered, immutable list of uppercase `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Build a palette of exactly `count` colors from `seeds`.
    pub fn generate(seeds: &[&str], count: usize) -> Self {
        Self {
            colors: generate_palette(seeds, count),
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Color at `index`, wrapping around. `None` only for an empty palette.
    pub fn cyclic(&self, index: usize) -> Option<&str> {
        if self.colors.is_empty() {
            return None;
        }
        Some(&self.colors[index % self.colors.len()])
    }

    /// Parsed RGB at `index` (wrapping); white when the palette is empty.
    pub fn rgb(&self, index: usize) -> Rgb {
        self.cyclic(index).map(Rgb::from_hex_or_white).unwrap_or(Rgb::WHITE)
    }
}

/// Deterministic palette: no randomness, same input ⇒ same bytes.
pub fn generate_palette(seeds: &[&str], count: usize) -> Vec<String> {
    let mut palette: Vec<String> = seeds
        .iter()
        .take(count)
        .map(|s| Rgb::from_hex_or_white(s).to_hex())
        .collect();

    if seeds.is_empty() {
        return palette;
    }

    let bases: Vec<Hsl> = seeds
        .iter()
        .map(|s| Rgb::from_hex_or_white(s).to_hsl().enhance())
        .collect();

    let mut shift = GOLDEN_RATIO_CONJUGATE;
    let mut index = 0usize;
    while palette.len() < count {
        let base = bases[index % bases.len()].rotate(shift);
        let color = Hsl {
            h: base.h,
            s: clamp01(0.93 + base.s * 0.07),
            l: clamp01(0.6 + (base.l - 0.5) * 0.35),
        };
        palette.push(color.to_hex());
        shift = fract01(shift + GOLDEN_RATIO_CONJUGATE);
        index += 1;
    }

    log::debug!("palette: {} seeds → {} colors", seeds.len(), palette.len());
    palette
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEEDS: [&str; 5] = ["#FFBE0B", "#FB5607", "#FF006E", "#8338EC", "#3A86FF"];

    #[test]
    fn test_palette_scenario_nine() {
        let palette = generate_palette(&SEEDS, 9);
        assert_eq!(palette.len(), 9);
        assert_eq!(&palette[..5], &SEEDS);
        for (i, color) in palette.iter().enumerate().skip(5) {
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
            assert!(Rgb::from_hex(color).is_ok(), "{} is not hex", color);
            assert!(
                !palette[..i].contains(color),
                "{} repeats an earlier entry",
                color
            );
        }
    }

    #[test]
    fn test_palette_is_deterministic() {
        assert_eq!(generate_palette(&SEEDS, 32), generate_palette(&SEEDS, 32));
    }

    #[test]
    fn test_seeds_are_uppercased() {
        let palette = generate_palette(&["#ffbe0b", "3a86ff"], 4);
        assert_eq!(palette[0], "#FFBE0B");
        assert_eq!(palette[1], "#3A86FF");
        assert_eq!(palette.len(), 4);
    }

    #[test]
    fn test_count_below_seed_count_truncates() {
        assert_eq!(generate_palette(&SEEDS, 3), vec!["#FFBE0B", "#FB5607", "#FF006E"]);
        assert!(generate_palette(&SEEDS, 0).is_empty());
        assert!(generate_palette(&[], 5).is_empty());
    }

    #[test]
    fn test_generated_colors_are_vibrant() {
        for color in generate_palette(&SEEDS, 40).iter().skip(SEEDS.len()) {
            let hsl = Rgb::from_hex(color).unwrap().to_hsl();
            assert!(hsl.s > 0.85, "{} saturation {}", color, hsl.s);
            assert!(hsl.l > 0.35 && hsl.l < 0.85, "{} lightness {}", color, hsl.l);
        }
    }

    #[test]
    fn test_cyclic_lookup() {
        let palette = Palette::generate(&SEEDS, 6);
        assert_eq!(palette.cyclic(6), Some("#FFBE0B"));
        assert_eq!(palette.rgb(1), Rgb::new(0xFB, 0x56, 0x07));
        assert_eq!(Palette::generate(&[], 3).cyclic(0), None);
    }
}
