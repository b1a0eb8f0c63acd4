//! Host reference of the placement program.
//!
//! `place_slot` performs the same operations, in the same order, as
//! `place_particles` in `shaders/galaxy_placement.wgsl`. It seeds the
//! particle buffer when it is allocated and serves as the oracle for tests.

use std::f32::consts::TAU;
use crate::galaxy::particle::{ComputeParameters, Particle, ParticleKind};
use crate::galaxy::prng::{slot_seed, Lcg};

/// Exponential ease-in: 0 for `x <= 0`, otherwise `2^(10x - 10)`.
pub fn ease_in_exp(x: f32) -> f32 {
    if x <= 0.0 {
        0.0
    } else {
        2.0_f32.powf(10.0 * x - 10.0)
    }
}

/// Ratio between the minor and major axis of the orbit at `radius`.
pub fn eccentricity(params: &ComputeParameters, radius: f32) -> f32 {
    let core = params.core();
    let max_rad = params.max_rad();
    if radius < core {
        1.0 - (radius / core) * params.in_exc_div()
    } else if radius <= max_rad {
        let span = (max_rad - core).max(f32::EPSILON);
        params.in_exc() + (radius - core) / span * (params.out_exc() - params.in_exc())
    } else {
        let t = ((radius - max_rad) / max_rad).min(1.0);
        params.out_exc() + t * params.out_exc_div()
    }
}

/// Linear interpolation kept inside `[a, b]` for `a <= b`.
fn mix(a: f32, b: f32, t: f32) -> f32 {
    (a + (b - a) * t).clamp(a, b)
}

pub fn place_slot(params: &ComputeParameters, slot: u32) -> Particle {
    let mut rng = Lcg::new(slot_seed(params.seed(), slot));
    let radial_bias = rng.next_f32();
    let radial_spread = rng.next_f32();
    let angle_sample = rng.next_f32();
    let height_sample = rng.next_f32();
    let brightness_sample = rng.next_f32();
    let temperature_sample = rng.next_f32();

    let bulge = params.bulge_rad();
    let max_rad = params.max_rad();
    let radius = bulge * ease_in_exp(radial_bias) + (max_rad - bulge) * radial_spread * radial_spread;

    let axis_ratio = eccentricity(params, radius);
    let rotation = params.offset() * radius / max_rad;
    let angle = angle_sample * TAU;

    let local_x = radius * angle.cos();
    let local_z = radius * axis_ratio * angle.sin();
    let (sin_rot, cos_rot) = rotation.sin_cos();

    let height = (2.0 * height_sample - 1.0) * 0.2 * bulge * (1.0 - radius / max_rad);

    let (min_brightness, max_brightness) = match ParticleKind::classify(slot, params.num_stars()) {
        ParticleKind::Star => params.star_brightness(),
        ParticleKind::Dust => params.dust_brightness(),
    };
    let (min_temp, max_temp) = params.temperature();

    Particle {
        position: [
            local_x * cos_rot - local_z * sin_rot,
            height,
            local_x * sin_rot + local_z * cos_rot,
        ],
        rotation,
        angle,
        height,
        angle_vel: params.speed() / (radius + params.core()),
        brightness: mix(min_brightness, max_brightness, brightness_sample),
        temperature: mix(min_temp, max_temp, temperature_sample),
        _padding: [0.0; 3],
    }
}

/// Fills a freshly allocated particle field with the reference placement.
pub fn seed_particles(params: &ComputeParameters, count: usize) -> Vec<Particle> {
    (0..count as u32).map(|slot| place_slot(params, slot)).collect()
}
