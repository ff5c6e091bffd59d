//! Animation / parallax engine.
//!
//! Lifecycle: `Idle → Initializing → Running → TearingDown → Idle`.
//!
//! Listeners only record targets. All writes happen in [`AnimationEngine::on_frame`],
//! one frame at a time: ease scroll, pointer and orientation toward their
//! targets, then derive every sphere's offsets (and optionally rack focus)
//! from its depth and parallax speed. Layout data is never touched; only
//! [`ShapeStyle`] records are written.

pub mod host;
pub mod permission;
pub mod signals;

use crate::config;
use crate::field::{FieldConfig, FieldGenerator};
use crate::fast_math::clamp01;
use crate::input::touch::{TouchRelease, TouchTracker};
use crate::input::{orientation_target, pointer_target, InputEvent, ListenerKind};
use crate::render::style::{ParticleStyle, ShapeStyle};
use crate::render::MotionMode;
use crate::shape::ShapeSpec;
use crate::viewport::Viewport;

use self::host::{FrameHandle, Host, ListenerId, PermissionResponse};
use self::permission::{OrientationPermission, PermissionState};
use self::signals::{EasedSignal, EasedVec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Initializing,
    Running,
    TearingDown,
}

/// Depth-of-field that follows the reader down the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RackFocus {
    /// Focus plane depth at the top of the page
    pub base: f32,
    /// Added to the plane at the bottom of the page
    pub travel: f32,
    /// Extra blur (px) per unit of distance from the plane
    pub blur_px: f32,
    pub scale_loss: f32,
    pub brightness_loss: f32,
}

impl Default for RackFocus {
    fn default() -> Self {
        Self {
            base: config::FOCUS_BASE,
            travel: config::FOCUS_TRAVEL,
            blur_px: config::FOCUS_BLUR_PX,
            scale_loss: config::FOCUS_SCALE_LOSS,
            brightness_loss: config::FOCUS_BRIGHTNESS_LOSS,
        }
    }
}

impl RackFocus {
    pub fn plane(&self, scroll_fraction: f32) -> f32 {
        clamp01(self.base + self.travel * clamp01(scroll_fraction))
    }
}

/// Engine settings. `motion: None` follows the host's reduced-motion flag.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub field: FieldConfig,
    pub motion: Option<MotionMode>,
    pub rack_focus: Option<RackFocus>,
    pub scroll_ease: f32,
    pub pointer_ease: f32,
    pub orientation_ease: f32,
    /// Max displacement (px) of a depth-0 sphere
    pub pointer_range: f32,
    pub depth_attenuation: f32,
    pub resize_debounce_ms: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            motion: None,
            rack_focus: None,
            scroll_ease: config::SCROLL_EASE,
            pointer_ease: config::POINTER_EASE,
            orientation_ease: config::ORIENTATION_EASE,
            pointer_range: config::POINTER_RANGE_PX,
            depth_attenuation: config::DEPTH_ATTENUATION,
            resize_debounce_ms: config::RESIZE_DEBOUNCE_MS as f64,
        }
    }
}

impl EngineConfig {
    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.field = field;
        self
    }

    /// Force a motion mode regardless of the host preference.
    pub fn with_motion_mode(mut self, mode: MotionMode) -> Self {
        self.motion = Some(mode);
        self
    }

    pub fn with_rack_focus(mut self, focus: RackFocus) -> Self {
        self.rack_focus = Some(focus);
        self
    }

    pub fn with_pointer_range(mut self, px: f32) -> Self {
        self.pointer_range = px;
        self
    }

    pub fn with_resize_debounce_ms(mut self, ms: f64) -> Self {
        self.resize_debounce_ms = ms;
        self
    }
}

/// Resize waiting for its debounce deadline.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingResize {
    viewport: Viewport,
    deadline_ms: f64,
}

pub struct AnimationEngine {
    config: EngineConfig,
    generator: FieldGenerator,
    state: EngineState,
    mode: MotionMode,

    viewport: Viewport,
    page_height: f32,
    shapes: Vec<ShapeSpec>,
    styles: Vec<ShapeStyle>,
    particle_styles: Vec<ParticleStyle>,

    scroll: EasedSignal,
    pointer: EasedVec2,
    orientation: EasedVec2,
    touches: TouchTracker,
    /// Survives remounts so the prompt is shown at most once per engine
    permission: Option<OrientationPermission>,

    listeners: Vec<(ListenerId, ListenerKind)>,
    pending_frame: Option<FrameHandle>,
    pending_resize: Option<PendingResize>,
    started_ms: f64,
    elapsed: f32,
}

impl AnimationEngine {
    pub fn new(config: EngineConfig) -> Self {
        let generator = FieldGenerator::new(config.field.clone());
        Self {
            scroll: EasedSignal::new(config.scroll_ease),
            pointer: EasedVec2::new(config.pointer_ease),
            orientation: EasedVec2::new(config.orientation_ease),
            config,
            generator,
            state: EngineState::Idle,
            mode: MotionMode::default(),
            viewport: Viewport::new(0.0, 0.0),
            page_height: 0.0,
            shapes: Vec::new(),
            styles: Vec::new(),
            particle_styles: Vec::new(),
            touches: TouchTracker::new(),
            permission: None,
            listeners: Vec::new(),
            pending_frame: None,
            pending_resize: None,
            started_ms: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn styles(&self) -> &[ShapeStyle] {
        &self.styles
    }

    pub fn particle_styles(&self) -> &[ParticleStyle] {
        &self.particle_styles
    }

    /// Layout the current styles were built from.
    pub fn shapes(&self) -> &[ShapeSpec] {
        &self.shapes
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Seconds since mount, advanced by frames; timelines sample at this time.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn permission_state(&self) -> PermissionState {
        self.permission
            .map(|p| p.state())
            .unwrap_or(PermissionState::NotRequested)
    }

    /// Build the field, register listeners and start the frame loop.
    pub fn mount(&mut self, host: &mut dyn Host, now_ms: f64) {
        if self.state != EngineState::Idle {
            log::warn!("engine: mount while {:?}, ignored", self.state);
            return;
        }
        self.state = EngineState::Initializing;
        self.mode = self
            .config
            .motion
            .unwrap_or_else(|| MotionMode::from_reduced_flag(host.prefers_reduced_motion()));
        log::debug!("engine: initializing ({:?})", self.mode);

        let support = host.orientation_support();
        let permission = *self
            .permission
            .get_or_insert_with(|| OrientationPermission::new(support));

        self.viewport = host.viewport();
        self.page_height = host.page_height().unwrap_or(0.0);
        self.rebuild();

        self.register(host, ListenerKind::Resize);
        if !self.mode.is_reduced() {
            self.register(host, ListenerKind::Scroll);
            self.register(host, ListenerKind::Pointer);
            self.register(host, ListenerKind::Touch);
            if permission.state() != PermissionState::Unsupported {
                self.register(host, ListenerKind::Orientation);
            }
            if permission.state() == PermissionState::NotRequested {
                self.register(host, ListenerKind::Interaction);
            }
            self.scroll.snap_to(host.scroll_y());
            self.ensure_frame(host);
        }

        self.started_ms = now_ms;
        self.elapsed = 0.0;
        self.state = EngineState::Running;
        log::debug!(
            "engine: running with {} spheres, {} listeners",
            self.styles.len(),
            self.listeners.len()
        );
    }

    /// Record an input. Returns false when the event was ignored.
    pub fn on_event(&mut self, host: &mut dyn Host, event: InputEvent, now_ms: f64) -> bool {
        if self.state != EngineState::Running || !self.listens_to(event.kind()) {
            return false;
        }

        match event {
            InputEvent::Scroll { y } => self.scroll.set_target(y),
            InputEvent::PointerMove { x, y } => self.pointer.set_target(pointer_target(x, y, self.viewport)),
            InputEvent::PointerLeave => self.pointer.set_target((0.0, 0.0)),
            InputEvent::TouchStart { id, x, y } => {
                if let Some(p) = self.touches.touch_start(x, y, id) {
                    self.pointer.set_target(pointer_target(p.x, p.y, self.viewport));
                }
            }
            InputEvent::TouchMove { id, x, y } => {
                if let Some(p) = self.touches.touch_move(x, y, id) {
                    self.pointer.set_target(pointer_target(p.x, p.y, self.viewport));
                }
            }
            InputEvent::TouchEnd { id } => {
                let release = self.touches.touch_end(id);
                match self.touches.primary() {
                    Some(p) => self.pointer.set_target(pointer_target(p.x, p.y, self.viewport)),
                    None => self.pointer.set_target((0.0, 0.0)),
                }
                if let TouchRelease::Tap { .. } = release {
                    self.request_permission(host);
                }
            }
            InputEvent::Orientation { beta, gamma } => {
                if !self.permission.is_some_and(|p| p.is_granted()) {
                    return false;
                }
                self.orientation.set_target(orientation_target(beta, gamma));
            }
            InputEvent::OrientationPermission { granted } => {
                let resolved = self.permission.as_mut().is_some_and(|p| p.resolve(granted));
                if !resolved {
                    return false;
                }
                log::info!("engine: orientation permission {}", if granted { "granted" } else { "denied" });
                self.unregister(host, ListenerKind::Interaction);
                if !granted {
                    self.orientation.reset();
                }
            }
            InputEvent::Resize { width, height } => {
                self.pending_resize = Some(PendingResize {
                    viewport: Viewport::new(width, height),
                    deadline_ms: now_ms + self.config.resize_debounce_ms,
                });
                self.ensure_frame(host);
            }
            InputEvent::UserInteraction => self.request_permission(host),
        }
        true
    }

    /// Run one frame. Returns false for stale handles or a stopped engine.
    pub fn on_frame(&mut self, host: &mut dyn Host, handle: FrameHandle, now_ms: f64) -> bool {
        if self.state != EngineState::Running || self.pending_frame != Some(handle) {
            log::debug!("engine: stale frame {:?} ignored", handle);
            return false;
        }
        self.pending_frame = None;

        if let Some(resize) = self.pending_resize {
            if now_ms >= resize.deadline_ms {
                self.pending_resize = None;
                self.viewport = resize.viewport;
                self.page_height = host.page_height().unwrap_or(0.0);
                self.rebuild();
                log::info!(
                    "engine: regenerated {} spheres for {:.0}x{:.0}",
                    self.styles.len(),
                    self.viewport.width,
                    self.viewport.height
                );
            }
        }

        if self.mode.is_reduced() {
            if self.pending_resize.is_some() {
                self.ensure_frame(host);
            }
            return true;
        }

        self.elapsed = ((now_ms - self.started_ms) / 1000.0).max(0.0) as f32;
        self.apply_motion();
        self.ensure_frame(host);
        true
    }

    /// Remove every listener, cancel the pending frame, drop the field.
    pub fn unmount(&mut self, host: &mut dyn Host) {
        if self.state == EngineState::Idle {
            return;
        }
        self.state = EngineState::TearingDown;
        for (id, _) in self.listeners.drain(..) {
            host.remove_listener(id);
        }
        if let Some(handle) = self.pending_frame.take() {
            host.cancel_frame(handle);
        }
        self.pending_resize = None;
        // an unanswered prompt cannot be delivered once the listeners are gone
        if self.permission.as_mut().is_some_and(|p| p.abandon()) {
            log::debug!("engine: orientation permission request abandoned");
        }
        self.scroll.reset();
        self.pointer.reset();
        self.orientation.reset();
        self.touches.clear();
        self.shapes.clear();
        self.styles.clear();
        self.particle_styles.clear();
        self.elapsed = 0.0;
        self.state = EngineState::Idle;
        log::debug!("engine: torn down");
    }

    fn register(&mut self, host: &mut dyn Host, kind: ListenerKind) {
        let id = host.add_listener(kind);
        self.listeners.push((id, kind));
    }

    fn unregister(&mut self, host: &mut dyn Host, kind: ListenerKind) {
        self.listeners.retain(|&(id, k)| {
            if k == kind {
                host.remove_listener(id);
            }
            k != kind
        });
    }

    fn listens_to(&self, kind: ListenerKind) -> bool {
        self.listeners.iter().any(|(_, k)| *k == kind)
    }

    fn ensure_frame(&mut self, host: &mut dyn Host) {
        if self.pending_frame.is_none() {
            self.pending_frame = Some(host.request_frame());
        }
    }

    fn request_permission(&mut self, host: &mut dyn Host) {
        let Some(permission) = self.permission.as_mut() else {
            return;
        };
        if !permission.begin() {
            return;
        }
        log::debug!("engine: requesting orientation permission");
        match host.request_orientation_permission() {
            PermissionResponse::Granted => {
                permission.resolve(true);
                log::info!("engine: orientation permission granted");
            }
            PermissionResponse::Denied => {
                permission.resolve(false);
                log::info!("engine: orientation permission denied");
            }
            PermissionResponse::Pending => {}
        }
        if permission.is_settled() {
            self.unregister(host, ListenerKind::Interaction);
        }
    }

    /// Regenerate the field for the current viewport and page height.
    fn rebuild(&mut self) {
        let reduced = self.mode.is_reduced();
        self.shapes = self.generator.generate(self.viewport, self.page_height);
        self.styles = self
            .shapes
            .iter()
            .map(|s| ShapeStyle::from_spec(s, reduced))
            .collect();
        self.particle_styles = if self.shapes.is_empty() {
            Vec::new()
        } else {
            self.generator
                .particles()
                .iter()
                .map(|p| ParticleStyle::from_spec(p, reduced))
                .collect()
        };
    }

    fn apply_motion(&mut self) {
        let scroll = self.scroll.step();
        let (px, py) = self.pointer.step();
        let (ox, oy) = self.orientation.step();
        let (dx, dy) = (px + ox, py + oy);

        let range = self.config.pointer_range;
        let k = self.config.depth_attenuation;
        let max_scroll = self.page_height - self.viewport.height;
        let scroll_fraction = if max_scroll > 0.0 { scroll / max_scroll } else { 0.0 };
        let focus = self.config.rack_focus;
        let plane = focus.map(|f| f.plane(scroll_fraction));

        for (spec, style) in self.shapes.iter().zip(self.styles.iter_mut()) {
            let attenuation = 1.0 + spec.depth * k;
            style.translate_x = dx * range / attenuation;
            style.translate_y = dy * range / attenuation - scroll * spec.parallax_speed;

            if let (Some(f), Some(plane)) = (focus, plane) {
                let distance = (spec.depth - plane).abs();
                style.blur = spec.blur + distance * f.blur_px;
                style.scale = 1.0 - distance * f.scale_loss;
                style.brightness = 1.0 - distance * f.brightness_loss;
            }
        }
    }
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for AnimationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationEngine")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("viewport", &self.viewport)
            .field("spheres", &self.styles.len())
            .field("pending_frame", &self.pending_frame)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::host::OrientationSupport;
    use super::*;

    struct MockHost {
        viewport: Viewport,
        page_height: Option<f32>,
        scroll: f32,
        reduced: bool,
        support: OrientationSupport,
        reply: PermissionResponse,
        permission_requests: u32,
        next_id: u64,
        listeners: Vec<(ListenerId, ListenerKind)>,
        frames_requested: u32,
        cancelled: Vec<FrameHandle>,
    }

    impl MockHost {
        fn new() -> Self {
            Self {
                viewport: Viewport::new(1440.0, 900.0),
                page_height: Some(4000.0),
                scroll: 0.0,
                reduced: false,
                support: OrientationSupport::Available,
                reply: PermissionResponse::Pending,
                permission_requests: 0,
                next_id: 0,
                listeners: Vec::new(),
                frames_requested: 0,
                cancelled: Vec::new(),
            }
        }

        fn has_listener(&self, kind: ListenerKind) -> bool {
            self.listeners.iter().any(|(_, k)| *k == kind)
        }
    }

    impl Host for MockHost {
        fn viewport(&self) -> Viewport {
            self.viewport
        }
        fn page_height(&self) -> Option<f32> {
            self.page_height
        }
        fn scroll_y(&self) -> f32 {
            self.scroll
        }
        fn prefers_reduced_motion(&self) -> bool {
            self.reduced
        }
        fn orientation_support(&self) -> OrientationSupport {
            self.support
        }
        fn request_orientation_permission(&mut self) -> PermissionResponse {
            self.permission_requests += 1;
            self.reply
        }
        fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
            self.next_id += 1;
            let id = ListenerId(self.next_id);
            self.listeners.push((id, kind));
            id
        }
        fn remove_listener(&mut self, id: ListenerId) {
            self.listeners.retain(|(l, _)| *l != id);
        }
        fn request_frame(&mut self) -> FrameHandle {
            self.next_id += 1;
            self.frames_requested += 1;
            FrameHandle(self.next_id)
        }
        fn cancel_frame(&mut self, handle: FrameHandle) {
            self.cancelled.push(handle);
        }
    }

    fn mounted(host: &mut MockHost, config: EngineConfig) -> AnimationEngine {
        let mut engine = AnimationEngine::new(config);
        engine.mount(host, 0.0);
        engine
    }

    /// Run `n` frames 16 ms apart starting at `start_ms`.
    fn run_frames(engine: &mut AnimationEngine, host: &mut MockHost, start_ms: f64, n: usize) -> f64 {
        let mut now = start_ms;
        for _ in 0..n {
            now += 16.0;
            let handle = engine.pending_frame().expect("frame loop stopped");
            assert!(engine.on_frame(host, handle, now));
        }
        now
    }

    #[test]
    fn test_mount_starts_loop_and_listeners() {
        let mut host = MockHost::new();
        let engine = mounted(&mut host, EngineConfig::default());
        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(engine.mode(), MotionMode::Full);
        assert_eq!(engine.styles().len(), 24);
        assert_eq!(engine.particle_styles().len(), config::PARTICLE_COUNT);
        assert!(engine.styles().iter().all(|s| s.animation.is_some()));
        assert!(engine.pending_frame().is_some());
        for kind in [ListenerKind::Scroll, ListenerKind::Pointer, ListenerKind::Touch, ListenerKind::Resize] {
            assert!(host.has_listener(kind), "{:?} missing", kind);
        }
    }

    #[test]
    fn test_reduced_motion_is_static() {
        let mut host = MockHost::new();
        host.reduced = true;
        let mut engine = mounted(&mut host, EngineConfig::default());
        assert_eq!(engine.mode(), MotionMode::Reduced);
        assert!(engine.pending_frame().is_none());
        assert_eq!(host.frames_requested, 0);
        assert!(engine.styles().iter().all(|s| s.animation.is_none()));
        assert!(engine.particle_styles().iter().all(|p| p.animation.is_none()));
        assert!(!host.has_listener(ListenerKind::Scroll));
        assert!(!engine.on_event(&mut host, InputEvent::Scroll { y: 500.0 }, 10.0));
        assert!(engine.styles().iter().all(|s| s.translate_y == 0.0));

        // a pending resize keeps frames coming; they must not touch styles
        assert!(engine.on_event(&mut host, InputEvent::Resize { width: 1440.0, height: 900.0 }, 20.0));
        let before = engine.styles().to_vec();
        let end = run_frames(&mut engine, &mut host, 20.0, 2);
        assert!(end < 320.0);
        assert_eq!(engine.styles(), &before[..]);
    }

    #[test]
    fn test_reduced_motion_still_regenerates_on_resize() {
        let mut host = MockHost::new();
        let config = EngineConfig::default().with_motion_mode(MotionMode::Reduced);
        let mut engine = mounted(&mut host, config);
        host.viewport = Viewport::new(390.0, 844.0);
        assert!(engine.on_event(&mut host, InputEvent::Resize { width: 390.0, height: 844.0 }, 0.0));
        let handle = engine.pending_frame().expect("resize needs a frame");
        assert!(engine.on_frame(&mut host, handle, 400.0));
        assert!(engine.pending_frame().is_none());
        assert_eq!(engine.styles()[0].id, "large-m-1");
    }

    #[test]
    fn test_teardown_is_clean() {
        let mut host = MockHost::new();
        let mut engine = mounted(&mut host, EngineConfig::default());
        let handle = engine.pending_frame().expect("frame requested");
        engine.unmount(&mut host);
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(host.listeners.is_empty());
        assert_eq!(host.cancelled, vec![handle]);
        assert!(engine.styles().is_empty());
        assert!(!engine.on_frame(&mut host, handle, 16.0));
        assert!(!engine.on_event(&mut host, InputEvent::Scroll { y: 10.0 }, 16.0));
        // unmount twice is a no-op
        engine.unmount(&mut host);
        assert_eq!(host.cancelled.len(), 1);
    }

    #[test]
    fn test_stale_frame_handle_ignored() {
        let mut host = MockHost::new();
        let mut engine = mounted(&mut host, EngineConfig::default());
        let current = engine.pending_frame().expect("frame requested");
        assert!(!engine.on_frame(&mut host, FrameHandle(current.0 + 1000), 16.0));
        assert_eq!(engine.pending_frame(), Some(current));
        assert!(engine.on_frame(&mut host, current, 16.0));
        assert!(!engine.on_frame(&mut host, current, 32.0));
    }

    #[test]
    fn test_scroll_parallax_is_depth_ordered() {
        let mut host = MockHost::new();
        let mut engine = mounted(&mut host, EngineConfig::default());
        engine.on_event(&mut host, InputEvent::Scroll { y: 1000.0 }, 0.0);
        run_frames(&mut engine, &mut host, 0.0, 200);
        let styles = engine.styles();
        let shapes = engine.shapes();
        for (spec, style) in shapes.iter().zip(styles) {
            assert!((style.translate_y + 1000.0 * spec.parallax_speed).abs() < 0.01);
        }
        let far = styles.iter().find(|s| s.id == "large-1").map(|s| s.translate_y);
        let near = styles.iter().find(|s| s.id == "tiny-1").map(|s| s.translate_y);
        assert!(near.unwrap_or(0.0) < far.unwrap_or(0.0));
        // layout data untouched
        assert!(shapes.iter().all(|s| s.position.y >= -0.22));
    }

    #[test]
    fn test_pointer_offset_attenuated_by_depth() {
        let mut host = MockHost::new();
        let mut engine = mounted(&mut host, EngineConfig::default());
        engine.on_event(&mut host, InputEvent::PointerMove { x: 1440.0, y: 450.0 }, 0.0);
        run_frames(&mut engine, &mut host, 0.0, 300);
        let shapes = engine.shapes();
        let styles = engine.styles();
        let nearest = shapes
            .iter()
            .zip(styles)
            .min_by(|a, b| a.0.depth.total_cmp(&b.0.depth))
            .map(|(_, s)| s.translate_x)
            .unwrap_or(0.0);
        let farthest = shapes
            .iter()
            .zip(styles)
            .max_by(|a, b| a.0.depth.total_cmp(&b.0.depth))
            .map(|(_, s)| s.translate_x)
            .unwrap_or(0.0);
        assert!((nearest - config::POINTER_RANGE_PX).abs() < 0.01);
        assert!(farthest < nearest && farthest > 0.0);
    }

    #[test]
    fn test_permission_requested_at_most_once() {
        let mut host = MockHost::new();
        host.support = OrientationSupport::PermissionRequired;
        let mut engine = mounted(&mut host, EngineConfig::default());
        assert_eq!(engine.permission_state(), PermissionState::NotRequested);
        // orientation before permission is ignored
        assert!(!engine.on_event(&mut host, InputEvent::Orientation { beta: Some(90.0), gamma: Some(45.0) }, 0.0));

        engine.on_event(&mut host, InputEvent::UserInteraction, 0.0);
        engine.on_event(&mut host, InputEvent::UserInteraction, 1.0);
        assert_eq!(host.permission_requests, 1);
        assert_eq!(engine.permission_state(), PermissionState::Requesting);

        assert!(engine.on_event(&mut host, InputEvent::OrientationPermission { granted: true }, 2.0));
        assert_eq!(engine.permission_state(), PermissionState::Granted);
        assert!(engine.on_event(&mut host, InputEvent::Orientation { beta: None, gamma: Some(45.0) }, 3.0));
        run_frames(&mut engine, &mut host, 3.0, 400);
        assert!(engine.styles().iter().all(|s| s.translate_x > 0.0));

        // remount keeps the answer
        engine.unmount(&mut host);
        engine.mount(&mut host, 10_000.0);
        engine.on_event(&mut host, InputEvent::UserInteraction, 10_001.0);
        assert_eq!(host.permission_requests, 1);
    }

    #[test]
    fn test_unanswered_permission_is_asked_again_after_remount() {
        let mut host = MockHost::new();
        host.support = OrientationSupport::PermissionRequired;
        let mut engine = mounted(&mut host, EngineConfig::default());
        engine.on_event(&mut host, InputEvent::UserInteraction, 0.0);
        assert_eq!(engine.permission_state(), PermissionState::Requesting);

        engine.unmount(&mut host);
        assert_eq!(engine.permission_state(), PermissionState::NotRequested);
        // the late answer finds no running engine
        assert!(!engine.on_event(&mut host, InputEvent::OrientationPermission { granted: true }, 5.0));

        engine.mount(&mut host, 100.0);
        assert!(host.has_listener(ListenerKind::Interaction));
        assert!(engine.on_event(&mut host, InputEvent::UserInteraction, 101.0));
        assert_eq!(host.permission_requests, 2);
        assert!(engine.on_event(&mut host, InputEvent::OrientationPermission { granted: true }, 102.0));
        assert!(engine.on_event(&mut host, InputEvent::Orientation { beta: Some(45.0), gamma: Some(30.0) }, 103.0));
    }

    #[test]
    fn test_interaction_listener_dropped_once_permission_settles() {
        let mut host = MockHost::new();
        host.support = OrientationSupport::PermissionRequired;
        let mut engine = mounted(&mut host, EngineConfig::default());
        engine.on_event(&mut host, InputEvent::UserInteraction, 0.0);
        // still waiting for the answer
        assert!(host.has_listener(ListenerKind::Interaction));
        engine.on_event(&mut host, InputEvent::OrientationPermission { granted: false }, 1.0);
        assert!(!host.has_listener(ListenerKind::Interaction));
        assert!(!engine.on_event(&mut host, InputEvent::UserInteraction, 2.0));

        // an immediate answer drops it right away
        let mut other = AnimationEngine::default();
        let mut other_host = MockHost::new();
        other_host.support = OrientationSupport::PermissionRequired;
        other_host.reply = PermissionResponse::Granted;
        other.mount(&mut other_host, 0.0);
        other.on_event(&mut other_host, InputEvent::UserInteraction, 0.0);
        assert_eq!(other.permission_state(), PermissionState::Granted);
        assert!(!other_host.has_listener(ListenerKind::Interaction));
        assert!(other_host.has_listener(ListenerKind::Orientation));
    }

    #[test]
    fn test_denied_permission_keeps_orientation_neutral() {
        let mut host = MockHost::new();
        host.support = OrientationSupport::PermissionRequired;
        host.reply = PermissionResponse::Denied;
        let mut engine = mounted(&mut host, EngineConfig::default());
        engine.on_event(&mut host, InputEvent::TouchStart { id: 1, x: 720.0, y: 450.0 }, 0.0);
        engine.on_event(&mut host, InputEvent::TouchEnd { id: 1 }, 50.0);
        assert_eq!(host.permission_requests, 1);
        assert_eq!(engine.permission_state(), PermissionState::Denied);
        assert!(!engine.on_event(&mut host, InputEvent::Orientation { beta: Some(90.0), gamma: Some(45.0) }, 60.0));
        run_frames(&mut engine, &mut host, 60.0, 50);
        assert!(engine.styles().iter().all(|s| s.translate_x.abs() < 1e-6));
    }

    #[test]
    fn test_unsupported_orientation_never_listens() {
        let mut host = MockHost::new();
        host.support = OrientationSupport::Unsupported;
        let mut engine = mounted(&mut host, EngineConfig::default());
        assert!(!host.has_listener(ListenerKind::Orientation));
        engine.on_event(&mut host, InputEvent::UserInteraction, 0.0);
        assert_eq!(host.permission_requests, 0);
        assert_eq!(engine.permission_state(), PermissionState::Unsupported);
    }

    #[test]
    fn test_resize_is_debounced() {
        let mut host = MockHost::new();
        let mut engine = mounted(&mut host, EngineConfig::default());
        host.viewport = Viewport::new(390.0, 844.0);
        engine.on_event(&mut host, InputEvent::Resize { width: 390.0, height: 844.0 }, 0.0);
        run_frames(&mut engine, &mut host, 0.0, 10); // 160 ms
        assert_eq!(engine.styles()[0].id, "large-1");
        // a second resize restarts the window
        engine.on_event(&mut host, InputEvent::Resize { width: 390.0, height: 844.0 }, 200.0);
        run_frames(&mut engine, &mut host, 200.0, 15); // up to 440 ms
        assert_eq!(engine.styles()[0].id, "large-1");
        run_frames(&mut engine, &mut host, 440.0, 5); // past 500 ms
        assert_eq!(engine.styles()[0].id, "large-m-1");
        assert_eq!(engine.viewport(), Viewport::new(390.0, 844.0));
    }

    #[test]
    fn test_unmeasurable_page_gives_empty_field() {
        let mut host = MockHost::new();
        host.page_height = None;
        let mut engine = mounted(&mut host, EngineConfig::default());
        assert_eq!(engine.state(), EngineState::Running);
        assert!(engine.styles().is_empty());
        assert!(engine.particle_styles().is_empty());
        run_frames(&mut engine, &mut host, 0.0, 3);
        host.page_height = Some(0.0);
        engine.on_event(&mut host, InputEvent::Resize { width: 1200.0, height: 800.0 }, 100.0);
        run_frames(&mut engine, &mut host, 100.0, 30);
        assert!(engine.styles().is_empty());
    }

    #[test]
    fn test_rack_focus_blurs_away_from_plane() {
        let mut host = MockHost::new();
        let config = EngineConfig::default().with_rack_focus(RackFocus::default());
        let mut engine = mounted(&mut host, config);
        run_frames(&mut engine, &mut host, 0.0, 2);
        let plane = RackFocus::default().plane(0.0);
        for (spec, style) in engine.shapes().iter().zip(engine.styles()) {
            let distance = (spec.depth - plane).abs();
            assert!((style.blur - (spec.blur + distance * config::FOCUS_BLUR_PX)).abs() < 1e-4);
            assert!(style.scale <= 1.0 && style.brightness <= 1.0);
        }
    }

    #[test]
    fn test_timelines_advance_with_frames() {
        let mut host = MockHost::new();
        let mut engine = mounted(&mut host, EngineConfig::default());
        let end = run_frames(&mut engine, &mut host, 0.0, 100);
        assert!((engine.elapsed() - (end / 1000.0) as f32).abs() < 1e-4);
    }
}
