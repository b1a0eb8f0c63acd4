use galaxy_render::error::GalaxyError;
use galaxy_render::galaxy::particle::{ComputeParameters, FrameUniforms, Particle, VertexParams};
use rand::Rng;

#[test]
fn gpu_visible_layouts_have_fixed_sizes() {
    assert_eq!(size_of::<Particle>(), 48);
    assert_eq!(size_of::<ComputeParameters>(), 80);
    assert_eq!(size_of::<VertexParams>(), 32);
    assert_eq!(size_of::<FrameUniforms>(), 144);
    // Uniform blocks are read in 16 byte rows.
    assert_eq!(size_of::<ComputeParameters>() % 16, 0);
    assert_eq!(size_of::<VertexParams>() % 16, 0);
}

#[test]
fn eccentricity_complements_are_derived() {
    let mut rng = rand::rng();
    for _ in 0..1000 {
        let inner: f32 = rng.random_range(0.0..=1.0);
        let outer: f32 = rng.random_range(0.0..=1.0);
        let params = ComputeParameters::builder().eccentricity(inner, outer).build().unwrap();

        assert_eq!(params.in_exc(), inner);
        assert_eq!(params.out_exc(), outer);
        assert_eq!(params.in_exc_div(), 1.0 - inner);
        assert_eq!(params.out_exc_div(), 1.0 - outer);
    }
}

#[test]
fn defaults_build() {
    let params = ComputeParameters::builder().build().unwrap();
    assert_eq!(params.num_stars(), 80_000);
    assert_eq!(params.max_rad(), 1000.0);
    assert_eq!(params.star_brightness(), (0.1, 0.5));
    assert_eq!(params.dust_brightness(), (0.001, 0.005));
    assert_eq!(params.temperature(), (4500.0, 6000.0));
}

#[test]
fn eccentricity_outside_unit_interval_is_rejected() {
    for (inner, outer) in [(-0.1, 0.5), (0.5, 1.5), (f32::NAN, 0.5)] {
        let result = ComputeParameters::builder().eccentricity(inner, outer).build();
        assert!(matches!(result, Err(GalaxyError::Config(_))), "{inner} {outer}");
    }
}

#[test]
fn inconsistent_ranges_are_rejected() {
    let inverted = ComputeParameters::builder().temperature(6000.0, 4500.0).build();
    assert!(matches!(inverted, Err(GalaxyError::Config(_))));

    let overlapping = ComputeParameters::builder()
        .star_brightness(0.1, 0.5)
        .dust_brightness(0.05, 0.2)
        .build();
    assert!(matches!(overlapping, Err(GalaxyError::Config(_))));

    let bulge_too_big = ComputeParameters::builder().radii(100.0, 50.0, 200.0).build();
    assert!(matches!(bulge_too_big, Err(GalaxyError::Config(_))));

    let zero_core = ComputeParameters::builder().radii(100.0, 0.0, 50.0).build();
    assert!(matches!(zero_core, Err(GalaxyError::Config(_))));
}

#[test]
fn vertex_params_pad_with_zeros() {
    let params = VertexParams::new(14.5, 22.4, 800, 23.0, 100.0);
    assert_eq!(params.num_stars, 800);
    assert_eq!(params._padding, [0; 3]);
}
