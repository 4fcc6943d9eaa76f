use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::config::FieldConfig;
use crate::particles::ParticleStorage;

/// Surface background.
pub const BACKGROUND: Color32 = Color32::from_rgb(10, 10, 14);

/// `rgba(150, 150, 150, 0.05)`, premultiplied.
pub const LINK_COLOR: Color32 = Color32::from_rgba_premultiplied(7, 7, 7, 13);

/// Minimal 2D painting surface, in surface-local pixel coordinates.
pub trait Canvas {
    fn clear(&mut self, color: Color32);
    fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32);
    fn circle(&mut self, center: Pos2, radius: f32, color: Color32);
}

/// A connecting line between two nearby particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub width: f32,
}

/// Every pair closer than `link_distance`, with a width that grows linearly
/// from 0 at `link_distance` to `link_width` when the centers coincide.
pub fn links(particles: &ParticleStorage, config: &FieldConfig) -> Vec<Link> {
    let n = particles.len();
    let mut out = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = particles.x[j] - particles.x[i];
            let dy = particles.y[j] - particles.y[i];
            let distance = dx.hypot(dy);
            if distance < config.link_distance {
                out.push(Link {
                    a: i,
                    b: j,
                    width: (1.0 - distance / config.link_distance) * config.link_width,
                });
            }
        }
    }

    out
}

/// Draws one frame: background, links, then particles on top.
/// Returns the number of links drawn.
pub fn draw(canvas: &mut impl Canvas, particles: &ParticleStorage, config: &FieldConfig) -> usize {
    canvas.clear(BACKGROUND);

    let links = links(particles, config);
    for link in &links {
        canvas.line(
            Pos2::new(particles.x[link.a], particles.y[link.a]),
            Pos2::new(particles.x[link.b], particles.y[link.b]),
            link.width,
            LINK_COLOR,
        );
    }

    for i in 0..particles.len() {
        canvas.circle(
            Pos2::new(particles.x[i], particles.y[i]),
            particles.radius[i],
            particles.colors[i],
        );
    }

    links.len()
}

/// Paints onto an egui panel, translating surface coordinates by the panel
/// origin.
pub struct PainterCanvas<'a> {
    painter: &'a Painter,
    rect: Rect,
}

impl<'a> PainterCanvas<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    fn to_screen(&self, p: Pos2) -> Pos2 {
        self.rect.min + p.to_vec2()
    }
}

impl Canvas for PainterCanvas<'_> {
    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.rect, 0.0, color);
    }

    fn line(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            Stroke::new(width, color),
        );
    }

    fn circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.painter.circle_filled(self.to_screen(center), radius, color);
    }
}
