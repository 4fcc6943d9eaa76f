use eframe::egui::{Color32, Vec2};
use rand::Rng;

use crate::config::FieldConfig;

// ===================================================================================
// Particle Storage
// ===================================================================================

/// Stores the particle data in a **Structure of Arrays** (SoA) layout.
///
/// Velocity is never stored: it is the difference between the current and the
/// previous position (Verlet style).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleStorage {
    /// Per-particle x-coordinate in surface pixels.
    pub x: Vec<f32>,
    /// Per-particle y-coordinate in surface pixels.
    pub y: Vec<f32>,
    /// Per-particle x-coordinate one step ago.
    pub old_x: Vec<f32>,
    /// Per-particle y-coordinate one step ago.
    pub old_y: Vec<f32>,
    /// Collision and draw radius, always > 0.
    pub radius: Vec<f32>,
    /// Display colour, fixed at creation.
    pub colors: Vec<Color32>,
}

impl ParticleStorage {
    /// An empty set with room for `n` particles.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            old_x: Vec::with_capacity(n),
            old_y: Vec::with_capacity(n),
            radius: Vec::with_capacity(n),
            colors: Vec::with_capacity(n),
        }
    }

    /// Creates a fresh particle set for a surface of the given size.
    ///
    /// Positions are uniform over the surface, radii uniform in
    /// `[min_radius, max_radius)` and every particle starts at rest.
    pub fn spawn(surface: Vec2, config: &FieldConfig, rng: &mut impl Rng) -> Self {
        let count = particle_count(surface.x, config);
        let mut particles = Self::with_capacity(count);

        for _ in 0..count {
            let radius = rng.random_range(config.min_radius..config.max_radius);
            let x = rng.random::<f32>() * surface.x;
            let y = rng.random::<f32>() * surface.y;
            let hue = rng.random_range(0.0..360.0);
            particles.push(x, y, radius, particle_color(hue));
        }

        particles
    }

    /// Appends a particle at rest.
    pub fn push(&mut self, x: f32, y: f32, radius: f32, color: Color32) {
        self.x.push(x);
        self.y.push(y);
        self.old_x.push(x);
        self.old_y.push(y);
        self.radius.push(radius);
        self.colors.push(color);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Implicit velocity of particle `i` (current minus previous position).
    pub fn velocity(&self, i: usize) -> Vec2 {
        Vec2::new(self.x[i] - self.old_x[i], self.y[i] - self.old_y[i])
    }
}

/// Number of particles for a surface `width` pixels wide:
/// `min(floor(density * width), max_particles)`.
pub fn particle_count(width: f32, config: &FieldConfig) -> usize {
    if !width.is_finite() || width <= 0.0 {
        return 0;
    }
    let scaled = (config.density as f64 * width as f64).floor() as usize;
    scaled.min(config.max_particles)
}

/// Soft translucent pastel: `hsla(hue, 70%, 70%, 0.5)`.
pub fn particle_color(hue: f32) -> Color32 {
    let [r, g, b] = hsl_to_rgb(hue, 0.7, 0.7);
    Color32::from_rgba_unmultiplied(r, g, b, 128)
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [u8; 3] {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue.rem_euclid(360.0) / 60.0;
    let secondary = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, secondary, 0.0),
        1 => (secondary, chroma, 0.0),
        2 => (0.0, chroma, secondary),
        3 => (0.0, secondary, chroma),
        4 => (secondary, 0.0, chroma),
        _ => (chroma, 0.0, secondary),
    };
    let m = lightness - chroma / 2.0;
    let to_byte = |c: f32| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_byte(r), to_byte(g), to_byte(b)]
}
