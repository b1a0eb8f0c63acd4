use galaxy_render::galaxy::particle::{ComputeParameters, ParticleKind};
use galaxy_render::galaxy::placement::{ease_in_exp, eccentricity, place_slot, seed_particles};
use rand::Rng;

fn params(num_stars: u32) -> ComputeParameters {
    ComputeParameters::builder().num_stars(num_stars).build().unwrap()
}

#[test]
fn ease_in_exp_endpoints() {
    assert_eq!(ease_in_exp(0.0), 0.0);
    assert!((ease_in_exp(1.0) - 1.0).abs() < 1e-6);
    for x in [-0.0, -1e-9, -0.5, -10.0, f32::NEG_INFINITY] {
        assert_eq!(ease_in_exp(x), 0.0, "{x}");
    }
}

#[test]
fn ease_in_exp_is_strictly_increasing() {
    let mut previous = ease_in_exp(0.001);
    for i in 2..1000 {
        let value = ease_in_exp(i as f32 / 1000.0);
        assert!(value > previous, "not increasing at {i}");
        previous = value;
    }
}

#[test]
fn stars_and_dust_use_their_own_ranges() {
    let params = params(800);
    let particles = seed_particles(&params, 1000);
    let (star_min, star_max) = params.star_brightness();
    let (dust_min, dust_max) = params.dust_brightness();

    let mut stars = 0;
    let mut dust = 0;
    for (slot, particle) in particles.iter().enumerate() {
        match ParticleKind::classify(slot as u32, params.num_stars()) {
            ParticleKind::Star => {
                stars += 1;
                assert!((star_min..=star_max).contains(&particle.brightness), "slot {slot}");
            }
            ParticleKind::Dust => {
                dust += 1;
                assert!((dust_min..=dust_max).contains(&particle.brightness), "slot {slot}");
            }
        }
    }
    assert_eq!(stars, 800);
    assert_eq!(dust, 200);
}

#[test]
fn placement_stays_inside_the_disc() {
    let params = params(800);
    let (min_temp, max_temp) = params.temperature();
    for particle in seed_particles(&params, 1000) {
        let [x, y, z] = particle.position;
        let planar = (x * x + z * z).sqrt();
        assert!(planar <= params.max_rad() * 1.001, "radius {planar}");
        assert!(y.abs() <= 0.2 * params.bulge_rad() + 1e-3, "height {y}");
        assert_eq!(y, particle.height);
        assert!((min_temp..=max_temp).contains(&particle.temperature));
        assert!(particle.angle_vel > 0.0);
        assert!((0.0..=std::f32::consts::TAU).contains(&particle.angle));
    }
}

#[test]
fn angular_velocity_falls_with_radius() {
    let params = params(800);
    let mut particles = seed_particles(&params, 1000);
    particles.sort_by(|a, b| {
        let ra = a.position[0].hypot(a.position[2]);
        let rb = b.position[0].hypot(b.position[2]);
        ra.total_cmp(&rb)
    });
    let inner = particles.first().unwrap();
    let outer = particles.last().unwrap();
    assert!(inner.angle_vel > outer.angle_vel);
}

#[test]
fn placement_is_a_function_of_seed_and_slot() {
    let mut rng = rand::rng();
    let seed: u32 = rng.random();
    let a = ComputeParameters::builder().seed(seed).build().unwrap();
    let b = ComputeParameters::builder().seed(seed).build().unwrap();
    for slot in [0, 1, 799, 800, 99_999] {
        assert_eq!(place_slot(&a, slot), place_slot(&b, slot));
    }

    let other = ComputeParameters::builder().seed(seed.wrapping_add(1)).build().unwrap();
    assert_ne!(place_slot(&a, 3), place_slot(&other, 3));
}

#[test]
fn eccentricity_is_continuous_at_the_core() {
    let params = params(800);
    let core = params.core();
    let below = eccentricity(&params, core - 1e-3);
    let above = eccentricity(&params, core);
    assert!((below - above).abs() < 1e-3, "{below} vs {above}");
    assert_eq!(eccentricity(&params, 0.0), 1.0);
}
