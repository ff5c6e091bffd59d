use std::time::Instant;

use eframe::egui;

use galaxy_backdrop::config;
use galaxy_backdrop::engine::host::{FrameHandle, Host, ListenerId, OrientationSupport, PermissionResponse};
use galaxy_backdrop::engine::{AnimationEngine, EngineConfig, EngineState, RackFocus};
use galaxy_backdrop::field::FieldConfig;
use galaxy_backdrop::input::{InputEvent, ListenerKind};
use galaxy_backdrop::layout::depth_field::DepthFieldLayout;
use galaxy_backdrop::render::paint::{BackdropPainter, PageView};
use galaxy_backdrop::viewport::Viewport;

/// The window shows one screen of a page this many screens tall.
const PAGE_SCREENS: f32 = 4.0;

fn env_flag(name: &str) -> bool {
    std::env::var(name).map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

fn engine_config() -> EngineConfig {
    let field = match std::env::var("GALAXY_LAYOUT").as_deref() {
        Ok("scatter") => FieldConfig::default().with_strategy(config::scatter_layout()),
        Ok("depth") => FieldConfig::default().with_strategy(DepthFieldLayout::default()),
        Ok("spiral") | Err(_) => FieldConfig::default(),
        Ok(other) => {
            log::warn!("unknown GALAXY_LAYOUT {:?}, using spiral", other);
            FieldConfig::default()
        }
    };
    let mut config = EngineConfig::default().with_field(field);
    if env_flag("GALAXY_RACK_FOCUS") {
        config = config.with_rack_focus(RackFocus::default());
    }
    config
}

fn main() {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    let reduced_motion = env_flag("GALAXY_REDUCED_MOTION");
    log::info!("starting backdrop demo (reduced motion: {})", reduced_motion);

    eframe::run_native(
        "Galaxy Backdrop",
        options,
        Box::new(move |_cc| Ok(Box::new(BackdropApp::new(engine_config(), reduced_motion)))),
    )
    .expect("Failed to start Galaxy Backdrop");
}

/// Host over an egui window: a simulated page scrolled with the wheel.
struct WindowHost {
    viewport: Viewport,
    scroll_y: f32,
    reduced_motion: bool,
    next_id: u64,
    listeners: Vec<(ListenerId, ListenerKind)>,
    frame: Option<FrameHandle>,
}

impl WindowHost {
    fn new(reduced_motion: bool) -> Self {
        Self {
            viewport: Viewport::new(0.0, 0.0),
            scroll_y: 0.0,
            reduced_motion,
            next_id: 0,
            listeners: Vec::new(),
            frame: None,
        }
    }

    fn page_height_px(&self) -> f32 {
        self.viewport.height * PAGE_SCREENS
    }

    fn scroll_by(&mut self, delta: f32) {
        let max = (self.page_height_px() - self.viewport.height).max(0.0);
        self.scroll_y = (self.scroll_y + delta).clamp(0.0, max);
    }

    fn listening(&self, kind: ListenerKind) -> bool {
        self.listeners.iter().any(|(_, k)| *k == kind)
    }
}

impl Host for WindowHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn page_height(&self) -> Option<f32> {
        (!self.viewport.is_degenerate()).then(|| self.page_height_px())
    }

    fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn orientation_support(&self) -> OrientationSupport {
        OrientationSupport::Unsupported
    }

    fn request_orientation_permission(&mut self) -> PermissionResponse {
        PermissionResponse::Denied
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
        let handle = FrameHandle(self.next_id);
        self.frame = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.frame == Some(handle) {
            self.frame = None;
        }
    }
}

struct BackdropApp {
    engine: AnimationEngine,
    host: WindowHost,
    painter: BackdropPainter,
    started: Instant,
    show_stats: bool,
}

impl BackdropApp {
    fn new(config: EngineConfig, reduced_motion: bool) -> Self {
        Self {
            engine: AnimationEngine::new(config),
            host: WindowHost::new(reduced_motion),
            painter: BackdropPainter::new(),
            started: Instant::now(),
            show_stats: true,
        }
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Translate this frame's egui input into engine events.
    fn pump_input(&mut self, ctx: &egui::Context) {
        let mut events = Vec::new();
        let (screen, scroll_delta, hover) = ctx.input(|i| {
            for event in &i.events {
                match event {
                    egui::Event::Touch { id, phase, pos, .. } => {
                        let id = id.0;
                        events.push(match phase {
                            egui::TouchPhase::Start => InputEvent::TouchStart { id, x: pos.x, y: pos.y },
                            egui::TouchPhase::Move => InputEvent::TouchMove { id, x: pos.x, y: pos.y },
                            egui::TouchPhase::End | egui::TouchPhase::Cancel => InputEvent::TouchEnd { id },
                        });
                    }
                    egui::Event::PointerButton { pressed: true, .. } | egui::Event::Key { pressed: true, .. } => {
                        events.push(InputEvent::UserInteraction);
                    }
                    egui::Event::PointerGone => events.push(InputEvent::PointerLeave),
                    _ => {}
                }
            }
            (i.screen_rect(), i.raw_scroll_delta.y, i.pointer.hover_pos())
        });

        let size = Viewport::new(screen.width(), screen.height());
        if size != self.host.viewport {
            let first = self.host.viewport.is_degenerate();
            self.host.viewport = size;
            self.host.scroll_by(0.0);
            if first {
                let now = self.now_ms();
                self.engine.mount(&mut self.host, now);
            } else {
                events.push(InputEvent::Resize {
                    width: size.width,
                    height: size.height,
                });
            }
        }

        if scroll_delta != 0.0 {
            self.host.scroll_by(-scroll_delta);
            events.push(InputEvent::Scroll { y: self.host.scroll_y });
        }
        if let Some(pos) = hover {
            events.push(InputEvent::PointerMove { x: pos.x, y: pos.y });
        }

        let now = self.now_ms();
        for event in events {
            if self.host.listening(event.kind()) {
                self.engine.on_event(&mut self.host, event, now);
            }
        }
    }

    fn draw_stats(&self, ui: &mut egui::Ui) {
        let text = format!(
            "{:?} | {:?} | {} spheres | {} particles | scroll {:.0}px",
            self.engine.state(),
            self.engine.mode(),
            self.engine.styles().len(),
            self.engine.particle_styles().len(),
            self.host.scroll_y
        );
        ui.label(egui::RichText::new(text).monospace().color(egui::Color32::from_gray(170)));
    }
}

impl eframe::App for BackdropApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_input(ctx);
        if ctx.input(|i| i.key_pressed(egui::Key::S)) {
            self.show_stats = !self.show_stats;
        }

        if let Some(handle) = self.host.frame.take() {
            let now = self.now_ms();
            self.engine.on_frame(&mut self.host, handle, now);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let view = PageView {
                    rect: ui.max_rect(),
                    page_height: self.host.page_height_px(),
                    scroll_y: self.host.scroll_y,
                    time: self.engine.elapsed(),
                };
                self.painter
                    .paint(ui.painter(), &view, self.engine.styles(), self.engine.particle_styles());
                if self.show_stats {
                    self.draw_stats(ui);
                }
            });

        // Reduced motion stops requesting frames once idle; egui then only
        // repaints on input.
        if self.host.frame.is_some() {
            ctx.request_repaint();
        }
    }
}

impl Drop for BackdropApp {
    fn drop(&mut self) {
        if self.engine.state() != EngineState::Idle {
            self.engine.unmount(&mut self.host);
        }
    }
}
