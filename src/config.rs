//! Tunable constants for the particle field.
//!
//! Every field has a default matching the stock look of the background, so a
//! YAML file only needs to name the values it changes:
//!
//! ```yaml
//! swirl_enabled: false
//! friction: 0.98
//! max_particles: 300
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

// ===================================================================================
// Default Constants
// ===================================================================================

pub const DEFAULT_FRICTION: f32 = 0.99;
pub const DEFAULT_GRAVITY: f32 = 0.0;
pub const DEFAULT_DENSITY: f32 = 0.3;
pub const DEFAULT_MAX_PARTICLES: usize = 500;
pub const DEFAULT_MIN_RADIUS: f32 = 1.0;
pub const DEFAULT_MAX_RADIUS: f32 = 4.0;
pub const DEFAULT_REPEL_RADIUS: f32 = 100.0;
pub const DEFAULT_REPEL_STRENGTH: f32 = 0.02;
pub const DEFAULT_SWIRL_STRENGTH: f32 = 0.05;
pub const DEFAULT_PULL_STRENGTH: f32 = 0.0004;
pub const DEFAULT_PULL_RANGE: f32 = 100.0;
pub const DEFAULT_CENTER_THRESHOLD: f32 = 150.0;
pub const DEFAULT_BOUNCE: f32 = -0.5;
pub const DEFAULT_COLLISION_STIFFNESS: f32 = 0.05;
pub const DEFAULT_LINK_DISTANCE: f32 = 150.0;
pub const DEFAULT_LINK_WIDTH: f32 = 0.5;
pub const DEFAULT_DIAGNOSTIC_FRAMES: usize = 300;

// ===================================================================================
// Field Configuration
// ===================================================================================

/// Parameters of the simulation and its rendering.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub swirl_enabled: bool,      // initial state of the swirl toggle
    pub friction: f32,            // velocity damping applied every step
    pub gravity: f32,             // added to y each step, 0 keeps the field weightless
    pub density: f32,             // particles per pixel of surface width
    pub max_particles: usize,     // hard cap on the particle count
    pub min_radius: f32,          // inclusive lower bound of the random radius
    pub max_radius: f32,          // exclusive upper bound of the random radius
    pub repel_radius: f32,        // pointer influence radius in px
    pub repel_strength: f32,      // push per px of penetration into the repel radius
    pub swirl_strength: f32,      // tangential push around the surface center
    pub pull_strength: f32,       // centripetal pull factor
    pub pull_range: f32,          // distance below which the pull stops growing
    pub center_threshold: f32,    // particles closer than this to the center teleport
    pub bounce: f32,              // velocity factor stored on a wall hit
    pub collision_stiffness: f32, // fraction of the overlap corrected per frame
    pub link_distance: f32,       // max distance for a connecting line
    pub link_width: f32,          // width of a line between touching particles
    pub diagnostic_frames: usize, // rolling window of the diagnostics panel
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            swirl_enabled: true,
            friction: DEFAULT_FRICTION,
            gravity: DEFAULT_GRAVITY,
            density: DEFAULT_DENSITY,
            max_particles: DEFAULT_MAX_PARTICLES,
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            repel_radius: DEFAULT_REPEL_RADIUS,
            repel_strength: DEFAULT_REPEL_STRENGTH,
            swirl_strength: DEFAULT_SWIRL_STRENGTH,
            pull_strength: DEFAULT_PULL_STRENGTH,
            pull_range: DEFAULT_PULL_RANGE,
            center_threshold: DEFAULT_CENTER_THRESHOLD,
            bounce: DEFAULT_BOUNCE,
            collision_stiffness: DEFAULT_COLLISION_STIFFNESS,
            link_distance: DEFAULT_LINK_DISTANCE,
            link_width: DEFAULT_LINK_WIDTH,
            diagnostic_frames: DEFAULT_DIAGNOSTIC_FRAMES,
        }
    }
}

impl FieldConfig {
    /// Reads a YAML config file and validates it.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config file {}", path.display()))?;
        let config: FieldConfig = serde_yaml::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a YAML document held in memory.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: FieldConfig = serde_yaml::from_str(text).context("invalid config yaml")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would make the simulation produce non-finite
    /// positions or an empty particle set.
    pub fn validate(&self) -> Result<()> {
        let floats = [
            ("friction", self.friction),
            ("gravity", self.gravity),
            ("density", self.density),
            ("min_radius", self.min_radius),
            ("max_radius", self.max_radius),
            ("repel_radius", self.repel_radius),
            ("repel_strength", self.repel_strength),
            ("swirl_strength", self.swirl_strength),
            ("pull_strength", self.pull_strength),
            ("pull_range", self.pull_range),
            ("center_threshold", self.center_threshold),
            ("bounce", self.bounce),
            ("collision_stiffness", self.collision_stiffness),
            ("link_distance", self.link_distance),
            ("link_width", self.link_width),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            bail!("{name} must be finite, got {value}");
        }

        if !(self.friction > 0.0 && self.friction <= 1.0) {
            bail!("friction must be in (0, 1], got {}", self.friction);
        }
        if self.min_radius <= 0.0 || self.min_radius >= self.max_radius {
            bail!(
                "radius range must satisfy 0 < min_radius < max_radius, got {}..{}",
                self.min_radius,
                self.max_radius
            );
        }
        if self.density < 0.0 {
            bail!("density must not be negative, got {}", self.density);
        }
        if self.max_particles == 0 {
            bail!("max_particles must be > 0");
        }
        for (name, value) in [
            ("repel_radius", self.repel_radius),
            ("pull_range", self.pull_range),
            ("center_threshold", self.center_threshold),
            ("link_distance", self.link_distance),
        ] {
            if value <= 0.0 {
                bail!("{name} must be > 0, got {value}");
            }
        }
        if !(0.0..=1.0).contains(&self.collision_stiffness) {
            bail!(
                "collision_stiffness must be in [0, 1], got {}",
                self.collision_stiffness
            );
        }
        if self.diagnostic_frames == 0 {
            bail!("diagnostic_frames must be > 0");
        }
        Ok(())
    }
}
