use glam::Vec2;
use winit::window::Window;

use crate::cta::{CtaPanel, Rect};
use crate::neko::idle::IdleAnimation;
use crate::neko::Pose;
use crate::render::GpuState;

/// Offset of the CTA panel from the bottom-right corner, in points.
const CTA_MARGIN: f32 = 24.0;

const HINT_TEXT: &str = "Move the pointer and the cat will follow. F12 shows its state.";

/// Companion numbers shown in the debug readout.
pub struct Readout {
    pub pose: Pose,
    pub idle_ticks: u32,
    pub idle_animation: Option<IdleAnimation>,
    pub moving: bool,
    pub purring: bool,
    pub ticks: u64,
    pub fps: f64,
    /// A click reaction was accepted since the last frame.
    pub click_pulse: bool,
}

/// One-shot instruction label, hidden by the first pointer move or click.
#[derive(Debug)]
pub struct Hint {
    visible: bool,
}

impl Hint {
    pub fn new() -> Self {
        Self { visible: true }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hide the hint. Returns true only for the interaction that hid it.
    pub fn dismiss(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.visible = false;
        log::debug!("hint dismissed");
        true
    }
}

impl Default for Hint {
    fn default() -> Self {
        Self::new()
    }
}

/// What the user did to the CTA panel this frame.
struct CtaInteraction {
    rect: Rect,
    /// Primary click on the panel, in points.
    clicked_at: Option<Vec2>,
    /// Enter or Space while the panel holds keyboard focus.
    key_activated: bool,
}

/// Everything the renderer needs to paint one egui frame.
pub struct OverlayFrame {
    pub primitives: Vec<egui::epaint::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub screen_descriptor: egui_wgpu::ScreenDescriptor,
}

/// egui layer: the CTA panel plus an F12 debug readout.
///
/// egui points map 1:1 to the companion's logical units, so the panel's
/// laid-out rect is usable as an obstacle without conversion.
pub struct Overlay {
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub debug_visible: bool,
}

impl Overlay {
    pub fn new(window: &Window, gpu: &GpuState) -> Self {
        let egui_ctx = egui::Context::default();

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            Some(gpu.device.limits().max_texture_dimension_2d as usize),
        );

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_config.format,
            egui_wgpu::RendererOptions {
                depth_stencil_format: None,
                msaa_samples: 1,
                dithering: true,
                predictable_texture_filtering: false,
            },
        );

        Self {
            egui_ctx,
            egui_state,
            egui_renderer,
            debug_visible: false,
        }
    }

    /// Forward a winit event to egui. Returns true if egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    /// Lay out the hint, the panel and the readout. Updates `cta.rect` and
    /// applies clicks or key presses that landed on the panel.
    pub fn run_frame(
        &mut self,
        window: &Window,
        screen_w: u32,
        screen_h: u32,
        cta: &mut CtaPanel,
        hint: &Hint,
        readout: &Readout,
    ) -> OverlayFrame {
        let raw_input = self.egui_state.take_egui_input(window);

        let cta_visible = cta.is_visible();
        let cta_expanded = cta.is_expanded();
        let hint_visible = hint.is_visible();
        let debug_visible = self.debug_visible;
        let mut interaction = None;

        let ctx = self.egui_ctx.clone();
        let full_output = ctx.run(raw_input, |ctx| {
            if hint_visible {
                draw_hint(ctx);
            }
            if cta_visible {
                interaction = Some(draw_cta(ctx, cta_expanded));
            }
            if debug_visible {
                draw_readout(ctx, readout);
            }
        });

        if let Some(interaction) = interaction {
            cta.rect = interaction.rect;
            if interaction.key_activated {
                cta.activate();
            }
            if let Some(point) = interaction.clicked_at {
                cta.click(point);
            }
        }

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let primitives = self.egui_ctx.tessellate(full_output.shapes, pixels_per_point);

        OverlayFrame {
            primitives,
            textures_delta: full_output.textures_delta,
            screen_descriptor: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [screen_w, screen_h],
                pixels_per_point,
            },
        }
    }

    /// Upload egui textures and buffers. Call before the overlay render pass.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        frame: &OverlayFrame,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &frame.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            device,
            queue,
            encoder,
            &frame.primitives,
            &frame.screen_descriptor,
        )
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'static>, frame: &OverlayFrame) {
        self.egui_renderer
            .render(render_pass, &frame.primitives, &frame.screen_descriptor);
    }

    /// Free textures after present.
    pub fn free_textures(&mut self, frame: &OverlayFrame) {
        for id in &frame.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn draw_hint(ctx: &egui::Context) {
    egui::Area::new(egui::Id::new("hint"))
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, CTA_MARGIN))
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(
                egui::RichText::new(HINT_TEXT)
                    .color(egui::Color32::from_gray(70))
                    .italics(),
            );
        });
}

/// Draw the CTA panel; report the rect it occupies and any activation.
fn draw_cta(ctx: &egui::Context, expanded: bool) -> CtaInteraction {
    let frame = egui::Frame::NONE
        .fill(egui::Color32::from_rgb(255, 248, 231))
        .stroke(egui::Stroke::new(2.0, egui::Color32::from_rgb(60, 50, 40)))
        .corner_radius(8.0)
        .inner_margin(14.0);

    let shown = egui::Area::new(egui::Id::new("cta"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-CTA_MARGIN, -CTA_MARGIN))
        .show(ctx, |ui| {
            frame.show(ui, |ui| {
                ui.style_mut().visuals.override_text_color = Some(egui::Color32::from_gray(40));
                ui.label(egui::RichText::new("You're invited!").strong().size(18.0));
                if expanded {
                    ui.set_width(260.0);
                    ui.add_space(6.0);
                    ui.label("The cat would like you to come along.");
                    ui.label("Bring snacks. Leave the laser pointer at home.");
                } else {
                    ui.label("Click, or Tab here and press Enter");
                }
            })
            .response
            .interact(egui::Sense::click())
        });

    let panel = shown.inner;
    let key_activated = panel.has_focus()
        && ctx.input(|i| i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Space));
    let clicked_at = if panel.clicked_by(egui::PointerButton::Primary) {
        panel.interact_pointer_pos().map(|p| Vec2::new(p.x, p.y))
    } else {
        None
    };

    let r = shown.response.rect;
    CtaInteraction {
        rect: Rect::new(Vec2::new(r.min.x, r.min.y), Vec2::new(r.max.x, r.max.y)),
        clicked_at,
        key_activated,
    }
}

fn draw_readout(ctx: &egui::Context, s: &Readout) {
    let panel_frame = egui::Frame::NONE
        .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 20, 220))
        .corner_radius(6.0)
        .inner_margin(10.0);

    egui::Window::new("Neko")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .frame(panel_frame)
        .show(ctx, |ui| {
            ui.style_mut().visuals.override_text_color = Some(egui::Color32::from_gray(220));
            let mono = |text: String| egui::RichText::new(text).monospace();

            ui.label(mono(format!(
                "pos     {:>7.1} {:>7.1}",
                s.pose.position.x, s.pose.position.y
            )));
            ui.label(mono(format!("sprite  {} #{}", s.pose.sprite.name(), s.pose.frame)));
            let (px, py) = s.pose.offset.pixels();
            ui.label(mono(format!("sheet   {px:>5} {py:>5}")));
            ui.label(mono(format!("idle    {} ticks", s.idle_ticks)));
            let anim = s
                .idle_animation
                .map(|a| a.sprite().name())
                .unwrap_or("-");
            ui.label(mono(format!("anim    {anim}")));
            ui.label(mono(format!("moving  {}", s.moving)));
            ui.label(mono(format!("purring {}", s.purring)));
            if s.click_pulse {
                ui.label(mono("dizzy!".to_string()));
            }
            ui.label(mono(format!("ticks   {} | {:.0} fps", s.ticks, s.fps)));
            ui.add_space(4.0);
            ui.label("F12: Toggle | ESC: Quit");
        });
}
