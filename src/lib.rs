//! Animated particle background: a Verlet particle field with pointer
//! repulsion, an optional swirl around the surface center, soft collisions and
//! proximity links, hosted in an eframe window.

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod particles;
pub mod physics;
pub mod render;

pub use app::{LaunchOptions, ParticleFieldApp};
pub use config::FieldConfig;
pub use driver::{AnimationDriver, LoopState};
pub use particles::{ParticleStorage, particle_count};
pub use physics::{Edge, FrameInputs, integrate, resolve_collisions};
