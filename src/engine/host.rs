//! The environment the engine runs in: a browser window, an egui frame, or
//! a test double. The engine never reaches for globals; everything it reads
//! or schedules goes through [`Host`].

use crate::input::ListenerKind;
use crate::viewport::Viewport;

/// Registration token returned by [`Host::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Token of one requested animation frame. A frame callback carrying any
/// other handle than the engine's pending one is stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationSupport {
    /// No orientation sensor: orientation stays neutral
    Unsupported,
    /// Events flow without asking
    Available,
    /// A permission prompt is needed, and only after a user gesture
    PermissionRequired,
}

/// Immediate answer of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionResponse {
    Granted,
    Denied,
    /// Answer arrives later as `InputEvent::OrientationPermission`
    Pending,
}

pub trait Host {
    fn viewport(&self) -> Viewport;
    /// Full document height in px, `None` when it cannot be measured
    fn page_height(&self) -> Option<f32>;
    fn scroll_y(&self) -> f32;
    fn prefers_reduced_motion(&self) -> bool;
    fn orientation_support(&self) -> OrientationSupport;
    fn request_orientation_permission(&mut self) -> PermissionResponse;
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;
    fn remove_listener(&mut self, id: ListenerId);
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}
