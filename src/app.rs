use std::error::Error;
use std::sync::Arc;

use glam::Vec2;
use instant::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::click::ClickState;
use crate::config::Config;
use crate::cta::CtaPanel;
use crate::neko::atlas::SpriteState;
use crate::neko::events::CompanionObserver;
use crate::neko::{Companion, Pose, TickInput, Viewport};
use crate::overlay::{Hint, Overlay, Readout};
use crate::render::instance::NekoInstance;
use crate::render::GpuState;
use crate::scheduler::{FrameAction, TickScheduler};

/// Initial window size in logical pixels.
const WINDOW_SIZE: LogicalSize<f64> = LogicalSize::new(960.0, 640.0);
/// How often to log frame stats (seconds).
const FPS_LOG_INTERVAL: f64 = 5.0;

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

struct FrameStats {
    fps: f64,
    last_log_time: Instant,
    frame_time_sum: f64,
    frames_since_log: u32,
    ticks_at_last_log: u64,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            fps: 0.0,
            last_log_time: Instant::now(),
            frame_time_sum: 0.0,
            frames_since_log: 0,
            ticks_at_last_log: 0,
        }
    }

    fn record_frame(&mut self, dt: f64, total_ticks: u64) {
        self.frames_since_log += 1;
        self.frame_time_sum += dt;

        let elapsed = self.last_log_time.elapsed().as_secs_f64();
        if elapsed >= FPS_LOG_INTERVAL {
            let avg_ms = (self.frame_time_sum / self.frames_since_log as f64) * 1000.0;
            self.fps = self.frames_since_log as f64 / elapsed;
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | ticks: {} ({} total)",
                self.fps,
                avg_ms,
                total_ticks - self.ticks_at_last_log,
                total_ticks,
            );
            self.last_log_time = Instant::now();
            self.frame_time_sum = 0.0;
            self.frames_since_log = 0;
            self.ticks_at_last_log = total_ticks;
        }
    }
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Routes companion notifications to the host-side collaborators.
/// Sound cues are logged; there is no audio backend.
struct Collaborators<'a> {
    cta: &'a mut CtaPanel,
}

impl CompanionObserver for Collaborators<'_> {
    fn movement_started(&mut self) {
        self.cta.movement_started();
    }

    fn purr_start(&mut self) {
        log::info!("sound: purring");
    }

    fn purr_stop(&mut self) {
        log::info!("sound: purring stopped");
    }

    fn sprite_changed(&mut self, state: SpriteState, frame: u64) {
        log::trace!("sprite {} #{}", state.name(), frame);
    }

    fn click_pulse(&mut self) {
        log::info!("sound: dizzy");
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level application state.
struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    overlay: Option<Overlay>,

    companion: Companion,
    scheduler: TickScheduler,
    rng: fastrand::Rng,
    pose: Pose,

    // Host inputs, all in logical pixels
    pointer: Vec2,
    viewport: Viewport,

    cta: CtaPanel,
    click: ClickState,
    hint: Hint,

    /// False once the window is closing; the scheduler stops for good.
    attached: bool,
    clock: Instant,
    last_frame_time: Option<Instant>,
    frame_stats: FrameStats,
}

impl App {
    fn new(config: &Config) -> Self {
        let companion = Companion::new(config.start);
        let pose = companion.resting_pose();
        Self {
            window: None,
            gpu: None,
            overlay: None,
            companion,
            scheduler: TickScheduler::new(),
            rng: config.rng(),
            pose,
            pointer: Vec2::ZERO,
            viewport: Viewport::new(WINDOW_SIZE.width as f32, WINDOW_SIZE.height as f32),
            cta: CtaPanel::new(),
            click: ClickState::new(),
            hint: Hint::new(),
            attached: true,
            clock: Instant::now(),
            last_frame_time: None,
            frame_stats: FrameStats::new(),
        }
    }

    fn scale(&self) -> f64 {
        self.window.as_ref().map_or(1.0, |w| w.scale_factor())
    }

    fn to_logical(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let p = position.to_logical::<f32>(self.scale());
        Vec2::new(p.x, p.y)
    }

    fn refresh_viewport(&mut self) {
        if let Some(window) = &self.window {
            let size = window.inner_size().to_logical::<f32>(window.scale_factor());
            self.viewport = Viewport::new(size.width, size.height);
        }
    }

    /// One host rendering callback. Runs a tick when the scheduler allows
    /// it. Returns false once the companion has stopped.
    fn on_animation_frame(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let now = self.clock.elapsed();
        match self.scheduler.on_frame(now, self.attached) {
            FrameAction::Stop => {
                event_loop.exit();
                false
            }
            FrameAction::Skip => true,
            FrameAction::Tick => {
                let input = TickInput {
                    pointer: self.pointer,
                    viewport: self.viewport,
                    obstacle: self.cta.obstacle(),
                };
                let mut collaborators = Collaborators { cta: &mut self.cta };
                self.pose = self
                    .companion
                    .tick(&input, &mut self.rng, &mut collaborators);
                true
            }
        }
    }

    fn detach(&mut self, event_loop: &ActiveEventLoop) {
        self.attached = false;
        self.on_animation_frame(event_loop);
    }

    /// Left press that egui did not claim. Panel clicks are handled by the
    /// overlay.
    fn on_click(&mut self) {
        let now = self.clock.elapsed();
        let mut collaborators = Collaborators { cta: &mut self.cta };
        self.click.press(now, &mut collaborators);
    }

    fn on_key(&mut self, key: &Key, event_loop: &ActiveEventLoop) {
        match key {
            Key::Named(NamedKey::F12) => {
                if let Some(overlay) = &mut self.overlay {
                    overlay.debug_visible = !overlay.debug_visible;
                }
            }
            Key::Named(NamedKey::Escape) => {
                log::info!("ESC pressed, exiting");
                self.detach(event_loop);
            }
            _ => {}
        }
    }

    fn render(&mut self) {
        let (Some(window), Some(gpu), Some(overlay)) =
            (&self.window, &mut self.gpu, &mut self.overlay)
        else {
            return;
        };

        gpu.update_instance(&NekoInstance::from_pose(
            &self.pose,
            window.scale_factor() as f32,
        ));

        let Some(ctx) = gpu.begin_frame() else {
            return;
        };
        let mut encoder = ctx.encoder;

        let state = self.companion.state();
        let readout = Readout {
            pose: self.pose,
            idle_ticks: state.idle_ticks,
            idle_animation: state.idle_animation,
            moving: self.companion.edges().is_moving(),
            purring: self.companion.edges().is_purring(),
            ticks: self.scheduler.ticks(),
            fps: self.frame_stats.fps,
            click_pulse: self.click.pulsed,
        };
        let frame = overlay.run_frame(
            window,
            gpu.surface_config.width,
            gpu.surface_config.height,
            &mut self.cta,
            &self.hint,
            &readout,
        );

        gpu.draw_neko(&mut encoder, &ctx.view);
        let cmd_bufs = overlay.prepare(&gpu.device, &gpu.queue, &mut encoder, &frame);
        {
            let mut pass = GpuState::begin_overlay_pass(&mut encoder, &ctx.view);
            overlay.render(&mut pass, &frame);
        }
        gpu.finish_frame(encoder, ctx.output, cmd_bufs);
        overlay.free_textures(&frame);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("Neko")
            .with_inner_size(WINDOW_SIZE);

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let gpu = match GpuState::new(window.clone()) {
            Ok(gpu) => gpu,
            Err(e) => {
                log::error!("failed to initialize GPU: {e}");
                event_loop.exit();
                return;
            }
        };
        log::info!("wgpu + neko pipeline initialized");

        self.overlay = Some(Overlay::new(&window, &gpu));
        self.gpu = Some(gpu);
        self.window = Some(window);
        self.refresh_viewport();

        log::info!(
            "Window ready: {}x{} logical, companion at {}",
            self.viewport.width,
            self.viewport.height,
            self.pose.position
        );

        event_loop.set_control_flow(ControlFlow::Poll);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.scheduler.is_stopped() {
            event_loop.exit();
            return;
        }
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&self.window, &mut self.overlay) {
            (Some(window), Some(overlay)) => overlay.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                log::info!("Window closing, detaching companion");
                self.detach(event_loop);
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.refresh_viewport();
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                self.refresh_viewport();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = self.to_logical(position);
                self.hint.dismiss();
            }
            WindowEvent::Touch(touch) => {
                if matches!(touch.phase, TouchPhase::Started | TouchPhase::Moved) {
                    self.pointer = self.to_logical(touch.location);
                    self.hint.dismiss();
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.hint.dismiss();
                if !consumed {
                    self.on_click();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    self.on_key(&event.logical_key, event_loop);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                if let Some(last) = self.last_frame_time {
                    self.frame_stats
                        .record_frame(now.duration_since(last).as_secs_f64(), self.scheduler.ticks());
                }
                self.last_frame_time = Some(now);

                if self.on_animation_frame(event_loop) {
                    self.render();
                }
                self.click.begin_frame();
            }
            _ => {}
        }
    }
}

/// Create the event loop and run until the companion stops.
pub fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}
