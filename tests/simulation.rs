use eframe::egui::{Color32, Pos2, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;

use particle_field::{
    FieldConfig, FrameInputs, ParticleStorage, integrate, particle_count, resolve_collisions,
};

/// Surface used by most tests.
pub fn surface() -> Vec2 {
    Vec2::new(1000.0, 800.0)
}

/// Inputs with no pointer over the surface.
pub fn inputs(swirl_enabled: bool) -> FrameInputs {
    FrameInputs {
        surface: surface(),
        pointer: None,
        swirl_enabled,
    }
}

/// A single particle at rest.
pub fn single(x: f32, y: f32, radius: f32) -> ParticleStorage {
    let mut particles = ParticleStorage::with_capacity(1);
    particles.push(x, y, radius, Color32::WHITE);
    particles
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

fn assert_within_bounds(particles: &ParticleStorage, surface: Vec2) {
    for i in 0..particles.len() {
        let r = particles.radius[i];
        assert!(
            particles.x[i] >= r && particles.x[i] <= surface.x - r,
            "particle {i} x={} out of [{r}, {}]",
            particles.x[i],
            surface.x - r
        );
        assert!(
            particles.y[i] >= r && particles.y[i] <= surface.y - r,
            "particle {i} y={} out of [{r}, {}]",
            particles.y[i],
            surface.y - r
        );
    }
}

// ==================================================================================
// Creation tests
// ==================================================================================

#[test]
fn particle_count_scales_with_width_and_caps() {
    let config = FieldConfig::default();
    for (width, expected) in [
        (10.0, 3),
        (333.0, 99),
        (1000.0, 300),
        (1666.0, 499),
        (1667.0, 500),
        (4000.0, 500),
    ] {
        assert_eq!(particle_count(width, &config), expected, "width {width}");
        let particles = ParticleStorage::spawn(Vec2::new(width, 600.0), &config, &mut rng(1));
        assert_eq!(particles.len(), expected, "spawned for width {width}");
    }
}

#[test]
fn spawned_particles_start_at_rest_inside_the_surface() {
    let config = FieldConfig::default();
    let particles = ParticleStorage::spawn(surface(), &config, &mut rng(2));

    for i in 0..particles.len() {
        assert!((1.0..4.0).contains(&particles.radius[i]));
        assert!((0.0..1000.0).contains(&particles.x[i]));
        assert!((0.0..800.0).contains(&particles.y[i]));
        assert_eq!(particles.velocity(i), Vec2::ZERO);
    }
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn particle_at_rest_stays_at_rest() {
    let config = FieldConfig::default();
    let mut particles = single(400.0, 300.0, 2.0);

    for _ in 0..10 {
        integrate(&mut particles, &inputs(false), &config, &mut rng(3));
    }

    assert_eq!(particles.x[0], 400.0);
    assert_eq!(particles.y[0], 300.0);
    assert_eq!(particles.velocity(0), Vec2::ZERO);
}

#[test]
fn friction_damps_velocity() {
    let config = FieldConfig::default();
    let mut particles = single(400.0, 300.0, 2.0);
    particles.old_x[0] = 398.0;

    integrate(&mut particles, &inputs(false), &config, &mut rng(4));

    assert!((particles.x[0] - 401.98).abs() < 1e-4);
    assert_eq!(particles.old_x[0], 400.0);
}

#[test]
fn pointer_pushes_nearby_particle_away() {
    let config = FieldConfig::default();
    let mut particles = single(500.0, 400.0, 2.0);
    let mut frame = inputs(false);
    frame.pointer = Some(Pos2::new(450.0, 400.0));

    integrate(&mut particles, &frame, &config, &mut rng(5));

    // (100 - 50) * 0.02 = 1px along +x
    assert!((particles.x[0] - 501.0).abs() < 1e-4);
    assert_eq!(particles.y[0], 400.0);
}

#[test]
fn pointer_out_of_range_or_on_top_does_nothing() {
    let config = FieldConfig::default();

    let mut far = single(500.0, 400.0, 2.0);
    let mut frame = inputs(false);
    frame.pointer = Some(Pos2::new(300.0, 400.0));
    integrate(&mut far, &frame, &config, &mut rng(6));
    assert_eq!(far.x[0], 500.0);

    let mut on_top = single(500.0, 400.0, 2.0);
    frame.pointer = Some(Pos2::new(500.0, 400.0));
    integrate(&mut on_top, &frame, &config, &mut rng(6));
    assert_eq!(on_top.x[0], 500.0);
    assert_eq!(on_top.y[0], 400.0);
}

#[test]
fn swirl_orbits_around_the_center() {
    let config = FieldConfig::default();
    let mut particles = single(800.0, 400.0, 2.0);

    integrate(&mut particles, &inputs(true), &config, &mut rng(7));

    // pull toward the center on x, tangential push on y
    assert!(particles.x[0] < 800.0);
    assert!((particles.y[0] - 399.95).abs() < 1e-3);
}

#[test]
fn swirl_teleports_center_particles_onto_an_edge() {
    let config = FieldConfig::default();
    let (w, h) = (surface().x, surface().y);
    let mut edges_seen = [false; 4];

    for seed in 0..64 {
        let mut particles = single(520.0, 390.0, 3.0);
        integrate(&mut particles, &inputs(true), &config, &mut rng(seed));

        let (x, y) = (particles.x[0], particles.y[0]);
        let (old_x, old_y) = (particles.old_x[0], particles.old_y[0]);

        if y == 0.0 {
            edges_seen[0] = true;
            assert_eq!((old_x, old_y), (x, -1.0));
        } else if x == w {
            edges_seen[1] = true;
            assert_eq!((old_x, old_y), (w + 1.0, y));
        } else if y == h {
            edges_seen[2] = true;
            assert_eq!((old_x, old_y), (x, h + 1.0));
        } else if x == 0.0 {
            edges_seen[3] = true;
            assert_eq!((old_x, old_y), (-1.0, y));
        } else {
            panic!("particle not on an edge: ({x}, {y})");
        }
    }

    assert_eq!(edges_seen, [true; 4]);
}

#[test]
fn teleported_particle_moves_inward_next_frame() {
    let config = FieldConfig::default();
    let mut particles = single(500.0, 400.0, 3.0);
    integrate(&mut particles, &inputs(true), &config, &mut rng(11));
    integrate(&mut particles, &inputs(true), &config, &mut rng(12));

    assert_within_bounds(&particles, surface());
}

#[test]
fn wall_hit_clamps_and_stores_damped_velocity() {
    let config = FieldConfig::default();
    let mut particles = single(5.0, 400.0, 2.0);
    particles.old_x[0] = 10.0;

    integrate(&mut particles, &inputs(false), &config, &mut rng(13));

    let vx = -5.0 * 0.99;
    assert_eq!(particles.x[0], 2.0);
    assert!((particles.old_x[0] - (2.0 + vx * -0.5)).abs() < 1e-5);
}

#[test]
fn gravity_is_an_extension_point() {
    let config = FieldConfig {
        gravity: 0.5,
        ..FieldConfig::default()
    };
    let mut particles = single(500.0, 100.0, 2.0);

    integrate(&mut particles, &inputs(false), &config, &mut rng(14));

    assert_eq!(particles.y[0], 100.5);
}

// ==================================================================================
// Collision tests
// ==================================================================================

fn overlapping_pair() -> ParticleStorage {
    let mut particles = ParticleStorage::with_capacity(2);
    particles.push(100.0, 100.0, 5.0, Color32::WHITE);
    particles.push(102.0, 100.0, 5.0, Color32::WHITE);
    particles
}

fn distance(particles: &ParticleStorage) -> f32 {
    (particles.x[1] - particles.x[0]).hypot(particles.y[1] - particles.y[0])
}

#[test]
fn collision_increases_separation() {
    let config = FieldConfig::default();
    let mut particles = overlapping_pair();
    let before = distance(&particles);

    resolve_collisions(&mut particles, &config);

    let after = distance(&particles);
    assert!(after > before, "{after} <= {before}");
    // 5% of the 8px overlap on each side
    assert!((after - 2.8).abs() < 1e-4);
}

#[test]
fn collision_corrections_cancel_out() {
    let config = FieldConfig::default();
    let mut particles = ParticleStorage::with_capacity(2);
    particles.push(200.0, 150.0, 3.0, Color32::WHITE);
    particles.push(201.5, 152.0, 2.5, Color32::WHITE);
    let centroid = (particles.x[0] + particles.x[1], particles.y[0] + particles.y[1]);

    resolve_collisions(&mut particles, &config);

    assert!((particles.x[0] + particles.x[1] - centroid.0).abs() < 1e-4);
    assert!((particles.y[0] + particles.y[1] - centroid.1).abs() < 1e-4);
}

#[test]
fn coincident_particles_separate_with_finite_positions() {
    let config = FieldConfig::default();
    let mut particles = ParticleStorage::with_capacity(2);
    particles.push(50.0, 50.0, 2.0, Color32::WHITE);
    particles.push(50.0, 50.0, 2.0, Color32::WHITE);

    resolve_collisions(&mut particles, &config);

    assert!(particles.x.iter().chain(&particles.y).all(|v| v.is_finite()));
    assert!(distance(&particles) > 0.0);
}

#[test]
fn separated_particles_are_untouched() {
    let config = FieldConfig::default();
    let mut particles = ParticleStorage::with_capacity(2);
    particles.push(10.0, 10.0, 3.0, Color32::WHITE);
    particles.push(20.0, 10.0, 3.0, Color32::WHITE);
    let before = particles.clone();

    resolve_collisions(&mut particles, &config);

    assert_eq!(particles, before);
}

// ==================================================================================
// End-to-end
// ==================================================================================

#[test]
fn thousand_frames_stay_bounded_and_finite() {
    let config = FieldConfig::default();
    let frame = FrameInputs {
        surface: surface(),
        pointer: Some(Pos2::new(-9999.0, -9999.0)),
        swirl_enabled: false,
    };
    let mut rng = rng(42);
    let mut particles = ParticleStorage::spawn(surface(), &config, &mut rng);
    assert_eq!(particles.len(), 300);

    for _ in 0..1000 {
        integrate(&mut particles, &frame, &config, &mut rng);
        assert_within_bounds(&particles, surface());
        resolve_collisions(&mut particles, &config);
    }
    integrate(&mut particles, &frame, &config, &mut rng);
    assert_within_bounds(&particles, surface());

    for values in [&particles.x, &particles.y, &particles.old_x, &particles.old_y] {
        assert!(values.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn swirl_run_stays_finite() {
    let config = FieldConfig::default();
    let frame = FrameInputs {
        surface: surface(),
        pointer: Some(Pos2::new(500.0, 400.0)),
        swirl_enabled: true,
    };
    let mut rng = rng(43);
    let mut particles = ParticleStorage::spawn(surface(), &config, &mut rng);

    for _ in 0..500 {
        integrate(&mut particles, &frame, &config, &mut rng);
        resolve_collisions(&mut particles, &config);
    }

    for values in [&particles.x, &particles.y, &particles.old_x, &particles.old_y] {
        assert!(values.iter().all(|v| v.is_finite()));
    }
}
