pub mod motion;
pub mod style;

#[cfg(feature = "paint")]
pub mod paint;

/// How much the backdrop moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    /// Looping timelines plus scroll/pointer/orientation parallax
    Full,
    /// Static styles: no timelines, no frame loop
    Reduced,
}

impl Default for MotionMode {
    fn default() -> Self {
        Self::Full
    }
}

impl MotionMode {
    pub fn from_reduced_flag(reduced: bool) -> Self {
        if reduced {
            Self::Reduced
        } else {
            Self::Full
        }
    }

    pub fn is_reduced(self) -> bool {
        self == Self::Reduced
    }
}
