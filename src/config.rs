use std::path::PathBuf;
use std::str::FromStr;
use glam::Vec3;
use crate::error::{GalaxyError, GalaxyResult};
use crate::galaxy::particle::{ComputeParameters, ComputeParametersBuilder, VertexParams};

pub const SHADER_DIR_VAR: &str = "GALAXY_SHADER_DIR";
pub const PARTICLES_VAR: &str = "GALAXY_PARTICLES";
pub const STARS_VAR: &str = "GALAXY_STARS";
pub const SEED_VAR: &str = "GALAXY_SEED";

pub const PLACEMENT_SHADER_FILE: &str = "galaxy_placement.wgsl";
pub const RENDER_SHADER_FILE: &str = "galaxy_render.wgsl";

/// Runtime configuration of one galaxy run.
#[derive(Debug, Clone)]
pub struct GalaxyConfig {
    pub particle_count: u32,
    pub star_count: u32,
    pub seed: u32,
    pub window_width: u32,
    pub window_height: u32,
    pub window_title: String,
    pub shader_dir: PathBuf,
    /// Shaping values; star count and seed are taken from the fields above.
    pub shaping: ComputeParametersBuilder,
    pub star_scale: f32,
    pub dust_scale: f32,
    pub h2_size: f32,
    pub h2_distance: f32,
    pub sphere_segments: (u32, u32),
    pub camera_position: Vec3,
    pub camera_speed: f32,
    pub camera_sensitivity: f32,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            particle_count: 100_000,
            star_count: 80_000,
            seed: 0,
            window_width: 1920,
            window_height: 1080,
            window_title: "galaxy".to_string(),
            shader_dir: PathBuf::from("shaders"),
            shaping: ComputeParametersBuilder::default(),
            star_scale: 14.5,
            dust_scale: 22.4,
            h2_size: 23.0,
            h2_distance: 100.0,
            sphere_segments: (8, 8),
            camera_position: Vec3::new(0.0, 2000.0, -2000.0),
            camera_speed: 500.0,
            camera_sensitivity: 0.1,
        }
    }
}

impl GalaxyConfig {
    /// Defaults, overridden by the `GALAXY_*` environment variables that are set.
    pub fn from_env() -> GalaxyResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`GalaxyConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> GalaxyResult<Self> {
        let mut config = Self::default();
        if let Some(dir) = lookup(SHADER_DIR_VAR) {
            config.shader_dir = PathBuf::from(dir);
        }
        if let Some(count) = parse_var::<u32>(&lookup, PARTICLES_VAR)? {
            config.particle_count = count;
        }
        if let Some(count) = parse_var::<u32>(&lookup, STARS_VAR)? {
            config.star_count = count;
        }
        if let Some(seed) = parse_var::<u32>(&lookup, SEED_VAR)? {
            config.seed = seed;
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks the particle budget: at least one slot, and no more stars than slots.
    pub fn validate(&self) -> GalaxyResult<()> {
        if self.particle_count == 0 {
            return Err(GalaxyError::Config("particle count must be at least 1".to_string()));
        }
        if self.star_count > self.particle_count {
            return Err(GalaxyError::Capacity {
                requested: self.star_count as usize,
                capacity: self.particle_count as usize,
            });
        }
        Ok(())
    }

    pub fn compute_parameters(&self) -> GalaxyResult<ComputeParameters> {
        self.shaping.clone().num_stars(self.star_count).seed(self.seed).build()
    }

    pub fn vertex_params(&self) -> VertexParams {
        VertexParams::new(self.star_scale, self.dust_scale, self.star_count, self.h2_size, self.h2_distance)
    }

    pub fn placement_shader_path(&self) -> PathBuf {
        self.shader_dir.join(PLACEMENT_SHADER_FILE)
    }

    pub fn render_shader_path(&self) -> PathBuf {
        self.shader_dir.join(RENDER_SHADER_FILE)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> GalaxyResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| GalaxyError::Config(format!("{name}={raw:?}: {e}"))),
    }
}
