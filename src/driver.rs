//! Start/stop state machine around the per-frame step.

use rand::Rng;

use crate::config::FieldConfig;
use crate::diagnostics::FrameStats;
use crate::particles::ParticleStorage;
use crate::physics::{self, FrameInputs};
use crate::render::{self, Canvas};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Drives the animation loop. At most one loop instance (generation) is ever
/// active; stopping is idempotent.
#[derive(Debug)]
pub struct AnimationDriver {
    state: LoopState,
    generation: u64,     // id of the current (or last) loop instance
    frame_pending: bool, // a next frame has been requested for this generation
    frames: u64,         // frames run by the current generation
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationDriver {
    /// A stopped driver. Call [`AnimationDriver::start`] on mount.
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            generation: 0,
            frame_pending: false,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Starts a new loop instance. No-op while already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.generation += 1;
        self.frames = 0;
        self.state = LoopState::Running;
        self.frame_pending = true;
        log::debug!("animation loop {} started", self.generation);
        true
    }

    /// Stops the current loop instance and drops its pending frame.
    /// Calling it again has no effect.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = LoopState::Stopped;
        self.frame_pending = false;
        log::debug!(
            "animation loop {} stopped after {} frames",
            self.generation,
            self.frames
        );
        true
    }

    /// Tears the loop down and starts a fresh instance, e.g. after the swirl
    /// flag changed.
    pub fn restart(&mut self) {
        self.stop();
        self.start();
    }

    /// Runs one frame (integrate, collide, draw) if running.
    ///
    /// Returns the frame's stats, or `None` when stopped. After a frame the
    /// driver keeps a pending frame while running; the host must then
    /// schedule the next callback.
    pub fn tick(
        &mut self,
        particles: &mut ParticleStorage,
        inputs: &FrameInputs,
        config: &FieldConfig,
        rng: &mut impl Rng,
        canvas: &mut impl Canvas,
    ) -> Option<FrameStats> {
        if !self.is_running() {
            return None;
        }

        physics::integrate(particles, inputs, config, rng);
        physics::resolve_collisions(particles, config);
        let links = render::draw(canvas, particles, config);

        self.frames += 1;
        self.frame_pending = true;
        Some(FrameStats::measure(particles, links))
    }
}
