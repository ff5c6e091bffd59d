//! Touch tracking for parallax.
//!
//! Only the primary (oldest active) finger steers the backdrop; extra
//! fingers are tracked so that lifting the primary hands over to the next
//! one instead of snapping back to center.

/// Movement (px) below which a touch counts as a tap.
const TAP_SLOP: f32 = 12.0;

/// Active touch point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
    pub id: u64,
}

/// What lifting a finger amounted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchRelease {
    /// Short touch without significant movement
    Tap { x: f32, y: f32 },
    /// Finger dragged away from its start
    Drag,
    /// Unknown id
    Ignored,
}

#[derive(Debug, Default)]
pub struct TouchTracker {
    /// Active touches, oldest first
    touches: Vec<TouchPoint>,
    /// Accumulated drag distance per active touch, same order
    travel: Vec<f32>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self {
            touches: Vec::with_capacity(4),
            travel: Vec::with_capacity(4),
        }
    }

    /// Position that drives parallax, if any finger is down.
    pub fn primary(&self) -> Option<TouchPoint> {
        self.touches.first().copied()
    }

    pub fn active(&self) -> usize {
        self.touches.len()
    }

    /// Register a new finger. A reused id replaces the stale entry.
    pub fn touch_start(&mut self, x: f32, y: f32, id: u64) -> Option<TouchPoint> {
        if let Some(i) = self.index_of(id) {
            self.touches.remove(i);
            self.travel.remove(i);
        }
        self.touches.push(TouchPoint { x, y, id });
        self.travel.push(0.0);
        self.primary()
    }

    /// Update a finger. Returns the primary point after the move.
    pub fn touch_move(&mut self, x: f32, y: f32, id: u64) -> Option<TouchPoint> {
        if let Some(i) = self.index_of(id) {
            let touch = &mut self.touches[i];
            let dx = x - touch.x;
            let dy = y - touch.y;
            self.travel[i] += (dx * dx + dy * dy).sqrt();
            touch.x = x;
            touch.y = y;
        }
        self.primary()
    }

    pub fn touch_end(&mut self, id: u64) -> TouchRelease {
        let Some(i) = self.index_of(id) else {
            return TouchRelease::Ignored;
        };
        let touch = self.touches.remove(i);
        let travel = self.travel.remove(i);
        if travel < TAP_SLOP {
            TouchRelease::Tap { x: touch.x, y: touch.y }
        } else {
            TouchRelease::Drag
        }
    }

    pub fn clear(&mut self) {
        self.touches.clear();
        self.travel.clear();
    }

    fn index_of(&self, id: u64) -> Option<usize> {
        self.touches.iter().position(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap() {
        let mut tracker = TouchTracker::new();
        tracker.touch_start(200.0, 400.0, 1);
        tracker.touch_move(203.0, 401.0, 1);
        match tracker.touch_end(1) {
            TouchRelease::Tap { x, y } => {
                assert!((x - 203.0).abs() < 1e-6);
                assert!((y - 401.0).abs() < 1e-6);
            }
            other => panic!("Expected Tap, got {:?}", other),
        }
        assert!(tracker.primary().is_none());
    }

    #[test]
    fn test_drag() {
        let mut tracker = TouchTracker::new();
        tracker.touch_start(10.0, 400.0, 1);
        tracker.touch_move(100.0, 400.0, 1);
        assert_eq!(tracker.touch_end(1), TouchRelease::Drag);
    }

    #[test]
    fn test_primary_hands_over() {
        let mut tracker = TouchTracker::new();
        tracker.touch_start(1.0, 1.0, 7);
        let p = tracker.touch_start(50.0, 50.0, 9);
        assert_eq!(p.map(|t| t.id), Some(7));
        tracker.touch_end(7);
        assert_eq!(tracker.primary().map(|t| t.id), Some(9));
        assert_eq!(tracker.touch_end(42), TouchRelease::Ignored);
        assert_eq!(tracker.active(), 1);
    }
}
