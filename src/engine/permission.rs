//! Orientation permission: asked at most once, and only after the user
//! has interacted with the page.

use super::host::OrientationSupport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// No sensor; orientation never activates
    Unsupported,
    NotRequested,
    Requesting,
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationPermission {
    state: PermissionState,
}

impl OrientationPermission {
    pub fn new(support: OrientationSupport) -> Self {
        let state = match support {
            OrientationSupport::Unsupported => PermissionState::Unsupported,
            OrientationSupport::Available => PermissionState::Granted,
            OrientationSupport::PermissionRequired => PermissionState::NotRequested,
        };
        Self { state }
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    pub fn is_granted(&self) -> bool {
        self.state == PermissionState::Granted
    }

    /// NotRequested → Requesting. Returns false (and stays put) from any
    /// other state, which is what keeps the prompt to a single attempt.
    pub fn begin(&mut self) -> bool {
        if self.state != PermissionState::NotRequested {
            return false;
        }
        self.state = PermissionState::Requesting;
        true
    }

    /// Requesting → Granted | Denied. Answers that arrive in any other
    /// state are ignored.
    pub fn resolve(&mut self, granted: bool) -> bool {
        if self.state != PermissionState::Requesting {
            return false;
        }
        self.state = if granted {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        };
        true
    }

    /// Requesting → NotRequested, for a prompt whose answer can no longer
    /// be delivered. Returns false from any other state.
    pub fn abandon(&mut self) -> bool {
        if self.state != PermissionState::Requesting {
            return false;
        }
        self.state = PermissionState::NotRequested;
        true
    }

    /// Settled states need no further interaction.
    pub fn is_settled(&self) -> bool {
        !matches!(self.state, PermissionState::NotRequested | PermissionState::Requesting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_states() {
        assert_eq!(
            OrientationPermission::new(OrientationSupport::Unsupported).state(),
            PermissionState::Unsupported
        );
        assert!(OrientationPermission::new(OrientationSupport::Available).is_granted());
        assert_eq!(
            OrientationPermission::new(OrientationSupport::PermissionRequired).state(),
            PermissionState::NotRequested
        );
    }

    #[test]
    fn test_single_attempt() {
        let mut p = OrientationPermission::new(OrientationSupport::PermissionRequired);
        assert!(p.begin());
        assert!(!p.begin());
        assert!(p.resolve(false));
        assert_eq!(p.state(), PermissionState::Denied);
        assert!(!p.begin());
        assert!(!p.resolve(true));
        assert!(!p.is_granted());
    }

    #[test]
    fn test_resolve_without_request_is_ignored() {
        let mut p = OrientationPermission::new(OrientationSupport::PermissionRequired);
        assert!(!p.resolve(true));
        assert_eq!(p.state(), PermissionState::NotRequested);
    }

    #[test]
    fn test_abandoned_request_can_be_asked_again() {
        let mut p = OrientationPermission::new(OrientationSupport::PermissionRequired);
        assert!(!p.abandon());
        assert!(p.begin());
        assert!(!p.is_settled());
        assert!(p.abandon());
        assert_eq!(p.state(), PermissionState::NotRequested);
        assert!(p.begin());
        assert!(p.resolve(true));
        assert!(p.is_settled());
        assert!(!p.abandon());
    }
}
