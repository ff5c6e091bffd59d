//! Raw input signals and their normalisation.
//!
//! Listeners only record the latest value of each signal; the engine eases
//! toward it on the next frame. Pointer and orientation both end up in
//! [-1, 1] per axis, scroll stays in px.

pub mod touch;

use crate::config::{ORIENTATION_BETA_REST_DEG, ORIENTATION_RANGE_DEG};
use crate::fast_math::clamp_range;
use crate::viewport::Viewport;

/// Everything the host can report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Document scroll offset in px
    Scroll { y: f32 },
    /// Pointer position in viewport px
    PointerMove { x: f32, y: f32 },
    /// Pointer left the window
    PointerLeave,
    TouchStart { id: u64, x: f32, y: f32 },
    TouchMove { id: u64, x: f32, y: f32 },
    TouchEnd { id: u64 },
    /// Device tilt in degrees; either axis may be missing
    Orientation { beta: Option<f32>, gamma: Option<f32> },
    Resize { width: f32, height: f32 },
    /// A click/tap/key press: the earliest point a permission prompt may run
    UserInteraction,
    /// Asynchronous answer to an orientation permission request
    OrientationPermission { granted: bool },
}

/// Which listener an event arrives through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Scroll,
    Pointer,
    Touch,
    Orientation,
    Resize,
    Interaction,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 6] = [
        ListenerKind::Scroll,
        ListenerKind::Pointer,
        ListenerKind::Touch,
        ListenerKind::Orientation,
        ListenerKind::Resize,
        ListenerKind::Interaction,
    ];
}

impl InputEvent {
    pub fn kind(&self) -> ListenerKind {
        match self {
            InputEvent::Scroll { .. } => ListenerKind::Scroll,
            InputEvent::PointerMove { .. } | InputEvent::PointerLeave => ListenerKind::Pointer,
            InputEvent::TouchStart { .. } | InputEvent::TouchMove { .. } | InputEvent::TouchEnd { .. } => {
                ListenerKind::Touch
            }
            InputEvent::Orientation { .. } | InputEvent::OrientationPermission { .. } => {
                ListenerKind::Orientation
            }
            InputEvent::Resize { .. } => ListenerKind::Resize,
            InputEvent::UserInteraction => ListenerKind::Interaction,
        }
    }
}

/// Pointer position → [-1, 1]² around the viewport center.
/// Non-finite coordinates or a degenerate viewport give the neutral (0, 0).
pub fn pointer_target(x: f32, y: f32, viewport: Viewport) -> (f32, f32) {
    if viewport.is_degenerate() || !x.is_finite() || !y.is_finite() {
        return (0.0, 0.0);
    }
    (
        clamp_range(x / viewport.width * 2.0 - 1.0, -1.0, 1.0),
        clamp_range(y / viewport.height * 2.0 - 1.0, -1.0, 1.0),
    )
}

/// Tilt → [-1, 1]². Gamma (left/right) drives x, beta (front/back) drives y
/// relative to a phone held at rest. A missing axis reads as 0.
pub fn orientation_target(beta: Option<f32>, gamma: Option<f32>) -> (f32, f32) {
    let axis = |deg: Option<f32>, rest: f32| match deg {
        Some(d) if d.is_finite() => clamp_range((d - rest) / ORIENTATION_RANGE_DEG, -1.0, 1.0),
        _ => 0.0,
    };
    (axis(gamma, 0.0), axis(beta, ORIENTATION_BETA_REST_DEG))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_target() {
        let vp = Viewport::new(1000.0, 500.0);
        assert_eq!(pointer_target(500.0, 250.0, vp), (0.0, 0.0));
        assert_eq!(pointer_target(0.0, 500.0, vp), (-1.0, 1.0));
        assert_eq!(pointer_target(5000.0, -10.0, vp), (1.0, -1.0));
        assert_eq!(pointer_target(f32::NAN, 1.0, vp), (0.0, 0.0));
        assert_eq!(pointer_target(10.0, 10.0, Viewport::new(0.0, 0.0)), (0.0, 0.0));
    }

    #[test]
    fn test_orientation_target_missing_values() {
        assert_eq!(orientation_target(None, None), (0.0, 0.0));
        assert_eq!(orientation_target(Some(45.0), None), (0.0, 0.0));
        let (x, y) = orientation_target(Some(90.0), Some(-22.5));
        assert!((x + 0.5).abs() < 1e-6);
        assert!((y - 1.0).abs() < 1e-6);
        assert_eq!(orientation_target(Some(f32::NAN), Some(180.0)), (1.0, 0.0));
    }

    #[test]
    fn test_event_kinds() {
        assert_eq!(InputEvent::Scroll { y: 1.0 }.kind(), ListenerKind::Scroll);
        assert_eq!(InputEvent::TouchEnd { id: 1 }.kind(), ListenerKind::Touch);
        assert_eq!(
            InputEvent::OrientationPermission { granted: true }.kind(),
            ListenerKind::Orientation
        );
    }
}
