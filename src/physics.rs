//! The per-frame physics: Verlet integration with pointer repulsion, the
//! optional swirl field and wall containment, followed by soft pairwise
//! collision resolution.

use eframe::egui::{Pos2, Vec2};
use rand::Rng;

use crate::config::FieldConfig;
use crate::particles::ParticleStorage;

/// Everything the host feeds into one frame, captured once before the step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInputs {
    /// Surface size in pixels.
    pub surface: Vec2,
    /// Pointer in surface-local pixels, `None` while it is outside the surface.
    pub pointer: Option<Pos2>,
    pub swirl_enabled: bool,
}

impl FrameInputs {
    pub fn center(&self) -> Pos2 {
        Pos2::new(self.surface.x / 2.0, self.surface.y / 2.0)
    }
}

/// Surface edge a swirl-teleported particle re-enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.random_range(0..4) {
            0 => Edge::Top,
            1 => Edge::Right,
            2 => Edge::Bottom,
            _ => Edge::Left,
        }
    }
}

/// Advances every particle by one frame.
pub fn integrate(
    particles: &mut ParticleStorage,
    inputs: &FrameInputs,
    config: &FieldConfig,
    rng: &mut impl Rng,
) {
    let center = inputs.center();
    let (width, height) = (inputs.surface.x, inputs.surface.y);

    for i in 0..particles.len() {
        let vx = (particles.x[i] - particles.old_x[i]) * config.friction;
        let vy = (particles.y[i] - particles.old_y[i]) * config.friction;

        particles.old_x[i] = particles.x[i];
        particles.old_y[i] = particles.y[i];

        particles.x[i] += vx;
        particles.y[i] += vy + config.gravity;

        if let Some(pointer) = inputs.pointer {
            let dx = particles.x[i] - pointer.x;
            let dy = particles.y[i] - pointer.y;
            let distance = dx.hypot(dy);
            if distance > 0.0 && distance < config.repel_radius {
                let force = (config.repel_radius - distance) * config.repel_strength;
                particles.x[i] += dx / distance * force;
                particles.y[i] += dy / distance * force;
            }
        }

        if inputs.swirl_enabled {
            let dx = particles.x[i] - center.x;
            let dy = particles.y[i] - center.y;
            let distance = dx.hypot(dy);

            if distance < config.center_threshold {
                teleport(particles, i, Edge::random(rng), inputs.surface, rng);
                // The particle sits on the edge line on purpose; containment
                // takes over on the next step.
                continue;
            } else if distance > 0.0 {
                let pull = (config.pull_range / distance).min(1.0) * config.pull_strength;
                particles.x[i] -= dx * pull;
                particles.y[i] -= dy * pull;

                particles.x[i] += dy * config.swirl_strength / distance;
                particles.y[i] -= dx * config.swirl_strength / distance;
            }
        }

        let r = particles.radius[i];
        if particles.x[i] < r {
            particles.x[i] = r;
            particles.old_x[i] = r + vx * config.bounce;
        } else if particles.x[i] > width - r {
            particles.x[i] = width - r;
            particles.old_x[i] = particles.x[i] + vx * config.bounce;
        }

        if particles.y[i] < r {
            particles.y[i] = r;
            particles.old_y[i] = r + vy * config.bounce;
        } else if particles.y[i] > height - r {
            particles.y[i] = height - r;
            particles.old_y[i] = particles.y[i] + vy * config.bounce;
        }
    }
}

/// Moves particle `i` onto a random point of `edge`, with its previous
/// position one pixel outside so the next step carries it inwards.
pub fn teleport(
    particles: &mut ParticleStorage,
    i: usize,
    edge: Edge,
    surface: Vec2,
    rng: &mut impl Rng,
) {
    let (x, y, old_x, old_y) = match edge {
        Edge::Top => {
            let x = rng.random::<f32>() * surface.x;
            (x, 0.0, x, -1.0)
        }
        Edge::Right => {
            let y = rng.random::<f32>() * surface.y;
            (surface.x, y, surface.x + 1.0, y)
        }
        Edge::Bottom => {
            let x = rng.random::<f32>() * surface.x;
            (x, surface.y, x, surface.y + 1.0)
        }
        Edge::Left => {
            let y = rng.random::<f32>() * surface.y;
            (0.0, y, -1.0, y)
        }
    };
    particles.x[i] = x;
    particles.y[i] = y;
    particles.old_x[i] = old_x;
    particles.old_y[i] = old_y;
}

/// Runs an O(n^2) soft overlap correction over all pairs.
///
/// Each overlapping pair is pushed apart by `collision_stiffness` of the
/// overlap on each side, with equal and opposite corrections. Dense clusters
/// need several frames to separate.
pub fn resolve_collisions(particles: &mut ParticleStorage, config: &FieldConfig) {
    let n = particles.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = particles.x[j] - particles.x[i];
            let dy = particles.y[j] - particles.y[i];
            let distance = dx.hypot(dy);
            let min_distance = particles.radius[i] + particles.radius[j];

            if distance < min_distance {
                // perfect overlap => separate along +x
                let (nx, ny) = if distance > 0.0 {
                    (dx / distance, dy / distance)
                } else {
                    (1.0, 0.0)
                };

                let target_x = particles.x[i] + nx * min_distance;
                let target_y = particles.y[i] + ny * min_distance;

                let ax = (target_x - particles.x[j]) * config.collision_stiffness;
                let ay = (target_y - particles.y[j]) * config.collision_stiffness;

                particles.x[i] -= ax;
                particles.y[i] -= ay;
                particles.x[j] += ax;
                particles.y[j] += ay;
            }
        }
    }
}
