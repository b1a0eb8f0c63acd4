use std::collections::HashMap;
use std::path::PathBuf;
use galaxy_render::config::GalaxyConfig;
use galaxy_render::error::GalaxyError;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_are_consistent() {
    let config = GalaxyConfig::default();
    config.validate().unwrap();
    let params = config.compute_parameters().unwrap();
    assert_eq!(params.num_stars(), config.star_count);
    assert_eq!(config.vertex_params().num_stars, config.star_count);
    assert_eq!(config.placement_shader_path(), PathBuf::from("shaders/galaxy_placement.wgsl"));
    assert_eq!(config.render_shader_path(), PathBuf::from("shaders/galaxy_render.wgsl"));
}

#[test]
fn variables_override_defaults() {
    let config = GalaxyConfig::from_lookup(lookup(&[
        ("GALAXY_PARTICLES", "1000"),
        ("GALAXY_STARS", " 800 "),
        ("GALAXY_SEED", "42"),
        ("GALAXY_SHADER_DIR", "/tmp/shaders"),
    ]))
    .unwrap();

    assert_eq!(config.particle_count, 1000);
    assert_eq!(config.star_count, 800);
    assert_eq!(config.seed, 42);
    assert_eq!(config.compute_parameters().unwrap().seed(), 42);
    assert_eq!(config.placement_shader_path(), PathBuf::from("/tmp/shaders/galaxy_placement.wgsl"));
}

#[test]
fn malformed_values_are_config_errors() {
    let result = GalaxyConfig::from_lookup(lookup(&[("GALAXY_PARTICLES", "lots")]));
    assert!(matches!(result, Err(GalaxyError::Config(_))));
}

#[test]
fn more_stars_than_slots_is_a_capacity_error() {
    let result = GalaxyConfig::from_lookup(lookup(&[("GALAXY_PARTICLES", "100"), ("GALAXY_STARS", "101")]));
    assert!(matches!(result, Err(GalaxyError::Capacity { requested: 101, capacity: 100 })));
}

#[test]
fn empty_field_is_rejected() {
    let config = GalaxyConfig { particle_count: 0, star_count: 0, ..GalaxyConfig::default() };
    assert!(matches!(config.validate(), Err(GalaxyError::Config(_))));
}

#[test]
fn capacity_message_fits_any_buffer() {
    let error = GalaxyError::Capacity { requested: 2, capacity: 1 };
    assert_eq!(error.to_string(), "2 elements requested but the buffer only holds 1");
}
