use eframe::egui::{self, Key, LayerId, Pos2, Vec2};
use egui_plot::{Line, Plot, PlotPoints};
use rand::rngs::ThreadRng;

use crate::config::FieldConfig;
use crate::diagnostics::Diagnostics;
use crate::driver::AnimationDriver;
use crate::particles::ParticleStorage;
use crate::physics::FrameInputs;
use crate::render::{self, PainterCanvas};

/// Options that come from the command line rather than the config file.
#[derive(Clone, Copy, Debug, Default)]
pub struct LaunchOptions {
    pub no_swirl: bool,
    pub diagnostics: bool,
}

// ===================================================================================
// Main Application
// ===================================================================================

/// Full-window particle background.
///
/// Owns the particle set and the animation driver. The window is the drawable
/// surface; pointer position and the swirl toggle are read once per frame.
pub struct ParticleFieldApp {
    // -------------- Config / UI --------------
    config: FieldConfig,
    swirl_enabled: bool,
    show_diagnostics: bool,

    // -------------- Simulation Data --------------
    surface: Option<Vec2>, // size the particle set was built for
    pointer: Option<Pos2>, // last known pointer, surface-local
    particles: ParticleStorage,
    driver: AnimationDriver,
    diagnostics: Diagnostics,
    rng: ThreadRng,
}

impl ParticleFieldApp {
    pub fn new(config: FieldConfig, options: LaunchOptions) -> Self {
        let swirl_enabled = config.swirl_enabled && !options.no_swirl;
        let diagnostics = Diagnostics::new(config.diagnostic_frames);
        Self {
            config,
            swirl_enabled,
            show_diagnostics: options.diagnostics,
            surface: None,
            pointer: None,
            particles: ParticleStorage::default(),
            driver: AnimationDriver::new(),
            diagnostics,
            rng: rand::rng(),
        }
    }

    pub fn particles(&self) -> &ParticleStorage {
        &self.particles
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn surface(&self) -> Option<Vec2> {
        self.surface
    }

    pub fn swirl_enabled(&self) -> bool {
        self.swirl_enabled
    }

    /// Sizes the field to `size` and starts the loop.
    ///
    /// Returns `false` and starts nothing when the surface is unusable
    /// (smaller than one pixel, e.g. a minimised window).
    pub fn mount(&mut self, size: Vec2) -> bool {
        if !surface_usable(size) {
            log::warn!("surface {}x{} is not drawable, animation not started", size.x, size.y);
            return false;
        }
        self.regenerate(size);
        self.driver.start();
        log::info!(
            "particle field mounted at {}x{} with {} particles",
            size.x,
            size.y,
            self.particles.len()
        );
        true
    }

    /// Follows the current surface size. A changed size throws the particle
    /// set away and builds a new one.
    pub fn resize(&mut self, size: Vec2) {
        if self.surface == Some(size) {
            return;
        }
        if self.surface.is_none() {
            if surface_usable(size) {
                self.mount(size);
            }
            return;
        }
        if !surface_usable(size) {
            // keep the old set around until the window comes back
            return;
        }
        self.regenerate(size);
        log::debug!(
            "surface resized to {}x{}, {} particles",
            size.x,
            size.y,
            self.particles.len()
        );
    }

    /// Stops the loop and releases the particle set. Safe to call twice.
    pub fn unmount(&mut self) {
        if self.driver.stop() {
            log::info!("particle field unmounted");
        }
        self.surface = None;
        self.particles = ParticleStorage::default();
    }

    /// Changes the swirl flag. The field is remounted: a fresh particle set
    /// for the current surface, and a running loop is restarted so the next
    /// frame sees the new value.
    pub fn set_swirl(&mut self, enabled: bool) {
        if self.swirl_enabled == enabled {
            return;
        }
        self.swirl_enabled = enabled;
        log::info!("swirl {}", if enabled { "enabled" } else { "disabled" });
        if let Some(size) = self.surface {
            self.regenerate(size);
        }
        if self.driver.is_running() {
            self.driver.restart();
        }
    }

    /// Records the pointer position. `None` (pointer outside the window)
    /// keeps the last known position.
    pub fn track_pointer(&mut self, pointer: Option<Pos2>) {
        if pointer.is_some() {
            self.pointer = pointer;
        }
    }

    pub fn pointer(&self) -> Option<Pos2> {
        self.pointer
    }

    /// Pauses or resumes the loop.
    pub fn toggle_pause(&mut self) {
        if self.driver.is_running() {
            self.driver.stop();
        } else if self.surface.is_some() {
            self.driver.start();
        }
    }

    /// Snapshot of this frame's inputs.
    pub fn frame_inputs(&self) -> FrameInputs {
        FrameInputs {
            surface: self.surface.unwrap_or(Vec2::ZERO),
            pointer: self.pointer,
            swirl_enabled: self.swirl_enabled,
        }
    }

    fn regenerate(&mut self, size: Vec2) {
        self.surface = Some(size);
        self.particles = ParticleStorage::spawn(size, &self.config, &mut self.rng);
        self.diagnostics.clear();
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (swirl, pause, reset, diag) = ctx.input(|i| {
            (
                i.key_pressed(Key::S),
                i.key_pressed(Key::Space),
                i.key_pressed(Key::R),
                i.key_pressed(Key::D),
            )
        });
        if swirl {
            self.set_swirl(!self.swirl_enabled);
        }
        if pause {
            self.toggle_pause();
        }
        if reset {
            if let Some(size) = self.surface {
                self.regenerate(size);
            }
        }
        if diag {
            self.show_diagnostics = !self.show_diagnostics;
        }
    }

    fn controls_window(&mut self, ctx: &egui::Context) {
        egui::Window::new("Particles")
            .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                let mut swirl = self.swirl_enabled;
                if ui.checkbox(&mut swirl, "Swirl (S)").changed() {
                    self.set_swirl(swirl);
                }
                ui.checkbox(&mut self.show_diagnostics, "Diagnostics (D)");

                ui.horizontal(|ui| {
                    let label = if self.driver.is_running() { "Pause" } else { "Resume" };
                    if ui.button(label).clicked() {
                        self.toggle_pause();
                    }
                    if ui.button("Reset").clicked() {
                        if let Some(size) = self.surface {
                            self.regenerate(size);
                        }
                    }
                });
                ui.label(format!("Particle count: {}", self.particles.len()));
            });
    }

    fn diagnostics_panel(&self, ctx: &egui::Context) {
        egui::SidePanel::right("diagnostics_panel")
            .resizable(true)
            .show(ctx, |ui| {
                let average = self.diagnostics.average();
                ui.heading("Diagnostics");
                ui.label(format!(
                    "Loop {} ({:?}), {} frames",
                    self.driver.generation(),
                    self.driver.state(),
                    self.driver.frames()
                ));
                ui.label(format!("Mean speed: {:.3} px/frame", average.mean_speed));
                ui.label(format!("Links: {}", average.links));
                ui.separator();

                ui.label(format!(
                    "Mean speed (last {} frames)",
                    self.diagnostics.window()
                ));
                let plot = Plot::new("speed_history")
                    .width(240.0)
                    .height(200.0)
                    .allow_scroll(false)
                    .allow_drag(true);

                plot.show(ui, |plot_ui| {
                    let points: Vec<[f64; 2]> = self
                        .diagnostics
                        .speed_history()
                        .iter()
                        .enumerate()
                        .map(|(i, &speed)| [i as f64, speed as f64])
                        .collect();
                    if !points.is_empty() {
                        plot_ui.line(Line::new(PlotPoints::from(points)));
                    }
                });
            });
    }
}

impl eframe::App for ParticleFieldApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let rect = ctx.screen_rect();
        self.resize(rect.size());
        self.handle_keys(ctx);

        self.controls_window(ctx);
        if self.show_diagnostics {
            self.diagnostics_panel(ctx);
        }

        if self.surface.is_none() {
            return;
        }

        let hover = ctx.input(|i| i.pointer.hover_pos());
        self.track_pointer(hover.map(|p| (p - rect.min).to_pos2()));
        let inputs = self.frame_inputs();

        let painter = ctx.layer_painter(LayerId::background());
        let mut canvas = PainterCanvas::new(&painter, rect);

        match self.driver.tick(
            &mut self.particles,
            &inputs,
            &self.config,
            &mut self.rng,
            &mut canvas,
        ) {
            Some(stats) => self.diagnostics.push(stats),
            // paused: keep showing the frozen field
            None => {
                render::draw(&mut canvas, &self.particles, &self.config);
            }
        }

        // Request another frame to keep animating (or remain static if stopped).
        if self.driver.frame_pending() {
            ctx.request_repaint();
        }
    }
}

impl Drop for ParticleFieldApp {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn surface_usable(size: Vec2) -> bool {
    size.x.is_finite() && size.y.is_finite() && size.x >= 1.0 && size.y >= 1.0
}
