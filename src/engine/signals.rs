//! First-order low-pass signals: each frame moves `current` a fixed fraction
//! of the way to `target`.

/// Distance below which a signal snaps onto its target.
const SNAP: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasedSignal {
    pub current: f32,
    pub target: f32,
    /// Fraction of the remaining distance covered per frame, in (0, 1]
    pub factor: f32,
}

impl EasedSignal {
    pub fn new(factor: f32) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            factor: factor.clamp(f32::EPSILON, 1.0),
        }
    }

    /// Non-finite targets are dropped; the last good one stays.
    pub fn set_target(&mut self, target: f32) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Jump straight to `value` (no easing).
    pub fn snap_to(&mut self, value: f32) {
        if value.is_finite() {
            self.current = value;
            self.target = value;
        }
    }

    pub fn step(&mut self) -> f32 {
        let delta = self.target - self.current;
        if delta.abs() < SNAP {
            self.current = self.target;
        } else {
            self.current = delta.mul_add(self.factor, self.current);
        }
        self.current
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
        self.target = 0.0;
    }
}

/// Two eased axes sharing one factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasedVec2 {
    pub x: EasedSignal,
    pub y: EasedSignal,
}

impl EasedVec2 {
    pub fn new(factor: f32) -> Self {
        Self {
            x: EasedSignal::new(factor),
            y: EasedSignal::new(factor),
        }
    }

    pub fn set_target(&mut self, (x, y): (f32, f32)) {
        self.x.set_target(x);
        self.y.set_target(y);
    }

    pub fn step(&mut self) -> (f32, f32) {
        (self.x.step(), self.y.step())
    }

    pub fn current(&self) -> (f32, f32) {
        (self.x.current, self.y.current)
    }

    pub fn is_settled(&self) -> bool {
        self.x.is_settled() && self.y.is_settled()
    }

    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converges_monotonically() {
        let mut s = EasedSignal::new(0.14);
        s.set_target(100.0);
        let mut last = 0.0;
        for _ in 0..200 {
            let v = s.step();
            assert!(v >= last && v <= 100.0);
            last = v;
        }
        assert!(s.is_settled());
        assert_eq!(s.current, 100.0);
    }

    #[test]
    fn test_first_step_is_factor_of_distance() {
        let mut s = EasedSignal::new(0.5);
        s.set_target(10.0);
        assert!((s.step() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_non_finite_targets() {
        let mut s = EasedSignal::new(0.2);
        s.set_target(3.0);
        s.set_target(f32::NAN);
        assert_eq!(s.target, 3.0);
        s.snap_to(f32::INFINITY);
        assert_eq!(s.current, 0.0);
    }

    #[test]
    fn test_vec2_reset() {
        let mut v = EasedVec2::new(0.08);
        v.set_target((1.0, -1.0));
        v.step();
        assert!(!v.is_settled());
        v.reset();
        assert_eq!(v.current(), (0.0, 0.0));
        assert!(v.is_settled());
    }
}
