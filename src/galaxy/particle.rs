//! CPU side of the particle data contract.
//!
//! Every struct here is uploaded verbatim, so field order and padding must
//! match the WGSL declarations in `shaders/galaxy_placement.wgsl` and
//! `shaders/galaxy_render.wgsl`.

use crate::error::{GalaxyError, GalaxyResult};

/// Binding of the shaping parameters (compute stage).
pub const COMPUTE_PARAMS_BINDING: u32 = 2;
/// Binding of the particle storage buffer (compute and vertex stages).
pub const PARTICLES_BINDING: u32 = 4;
/// Binding of the sprite scale parameters (vertex stage).
pub const VERTEX_PARAMS_BINDING: u32 = 5;

/// One particle slot. 48 bytes, laid out like a std430 struct whose first
/// member is a `vec3<f32>`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Particle {
    pub position: [f32; 3],
    pub rotation: f32,
    pub angle: f32,
    pub height: f32,
    pub angle_vel: f32,
    pub brightness: f32,
    pub temperature: f32,
    pub _padding: [f32; 3],
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    Star,
    Dust,
}

impl ParticleKind {
    pub fn classify(slot: u32, num_stars: u32) -> Self {
        if slot < num_stars {
            ParticleKind::Star
        } else {
            ParticleKind::Dust
        }
    }
}

/// Shaping parameters of one placement run.
///
/// Fields are private so `in_exc_div`/`out_exc_div` can only be derived by
/// [`ComputeParametersBuilder::build`].
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ComputeParameters {
    in_exc: f32,
    out_exc: f32,
    offset: f32,
    max_rad: f32,
    core: f32,
    in_exc_div: f32,
    out_exc_div: f32,
    bulge_rad: f32,
    speed: f32,
    num_stars: u32,
    max_star_brightness: f32,
    min_star_brightness: f32,
    max_dust_brightness: f32,
    min_dust_brightness: f32,
    max_temp: f32,
    min_temp: f32,
    seed: u32,
    _padding: [u32; 3],
}

impl ComputeParameters {
    pub fn builder() -> ComputeParametersBuilder {
        ComputeParametersBuilder::default()
    }

    pub fn in_exc(&self) -> f32 { self.in_exc }
    pub fn out_exc(&self) -> f32 { self.out_exc }
    pub fn in_exc_div(&self) -> f32 { self.in_exc_div }
    pub fn out_exc_div(&self) -> f32 { self.out_exc_div }
    pub fn offset(&self) -> f32 { self.offset }
    pub fn max_rad(&self) -> f32 { self.max_rad }
    pub fn core(&self) -> f32 { self.core }
    pub fn bulge_rad(&self) -> f32 { self.bulge_rad }
    pub fn speed(&self) -> f32 { self.speed }
    pub fn num_stars(&self) -> u32 { self.num_stars }
    pub fn seed(&self) -> u32 { self.seed }

    pub fn star_brightness(&self) -> (f32, f32) {
        (self.min_star_brightness, self.max_star_brightness)
    }

    pub fn dust_brightness(&self) -> (f32, f32) {
        (self.min_dust_brightness, self.max_dust_brightness)
    }

    pub fn temperature(&self) -> (f32, f32) {
        (self.min_temp, self.max_temp)
    }
}

#[derive(Clone, Debug)]
pub struct ComputeParametersBuilder {
    in_exc: f32,
    out_exc: f32,
    offset: f32,
    max_rad: f32,
    core: f32,
    bulge_rad: f32,
    speed: f32,
    num_stars: u32,
    star_brightness: (f32, f32),
    dust_brightness: (f32, f32),
    temperature: (f32, f32),
    seed: u32,
}

impl Default for ComputeParametersBuilder {
    fn default() -> Self {
        Self {
            in_exc: 0.25,
            out_exc: 0.25,
            offset: 5.0,
            max_rad: 1000.0,
            core: 600.0,
            bulge_rad: 500.0,
            speed: 7.0,
            num_stars: 80_000,
            star_brightness: (0.1, 0.5),
            dust_brightness: (0.001, 0.005),
            temperature: (4500.0, 6000.0),
            seed: 0,
        }
    }
}

impl ComputeParametersBuilder {
    pub fn eccentricity(mut self, inner: f32, outer: f32) -> Self {
        self.in_exc = inner;
        self.out_exc = outer;
        self
    }

    pub fn offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    pub fn radii(mut self, max_rad: f32, core: f32, bulge_rad: f32) -> Self {
        self.max_rad = max_rad;
        self.core = core;
        self.bulge_rad = bulge_rad;
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn num_stars(mut self, num_stars: u32) -> Self {
        self.num_stars = num_stars;
        self
    }

    pub fn star_brightness(mut self, min: f32, max: f32) -> Self {
        self.star_brightness = (min, max);
        self
    }

    pub fn dust_brightness(mut self, min: f32, max: f32) -> Self {
        self.dust_brightness = (min, max);
        self
    }

    pub fn temperature(mut self, min: f32, max: f32) -> Self {
        self.temperature = (min, max);
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> GalaxyResult<ComputeParameters> {
        for (name, value) in [("inner eccentricity", self.in_exc), ("outer eccentricity", self.out_exc)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GalaxyError::Config(format!("{name} {value} is outside [0, 1]")));
            }
        }
        for (name, value) in [("max radius", self.max_rad), ("core radius", self.core), ("bulge radius", self.bulge_rad)] {
            if !(value > 0.0) {
                return Err(GalaxyError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if self.bulge_rad > self.max_rad {
            return Err(GalaxyError::Config(format!(
                "bulge radius {} exceeds max radius {}", self.bulge_rad, self.max_rad
            )));
        }
        for (name, (min, max)) in [
            ("star brightness", self.star_brightness),
            ("dust brightness", self.dust_brightness),
            ("temperature", self.temperature),
        ] {
            if !(min <= max) {
                return Err(GalaxyError::Config(format!("{name} range {min}..{max} is inverted")));
            }
        }
        let (star_min, star_max) = self.star_brightness;
        let (dust_min, dust_max) = self.dust_brightness;
        if star_min <= dust_max && dust_min <= star_max {
            return Err(GalaxyError::Config(format!(
                "star brightness {star_min}..{star_max} overlaps dust brightness {dust_min}..{dust_max}"
            )));
        }

        Ok(ComputeParameters {
            in_exc: self.in_exc,
            out_exc: self.out_exc,
            offset: self.offset,
            max_rad: self.max_rad,
            core: self.core,
            in_exc_div: 1.0 - self.in_exc,
            out_exc_div: 1.0 - self.out_exc,
            bulge_rad: self.bulge_rad,
            speed: self.speed,
            num_stars: self.num_stars,
            max_star_brightness: star_max,
            min_star_brightness: star_min,
            max_dust_brightness: dust_max,
            min_dust_brightness: dust_min,
            max_temp: self.temperature.1,
            min_temp: self.temperature.0,
            seed: self.seed,
            _padding: [0; 3],
        })
    }
}

/// Sprite scales read by the vertex stage.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VertexParams {
    pub star_scale: f32,
    pub dust_scale: f32,
    pub num_stars: u32,
    pub h2_size: f32,
    pub h2_distance: f32,
    pub _padding: [u32; 3],
}

impl VertexParams {
    pub fn new(star_scale: f32, dust_scale: f32, num_stars: u32, h2_size: f32, h2_distance: f32) -> Self {
        Self { star_scale, dust_scale, num_stars, h2_size, h2_distance, _padding: [0; 3] }
    }
}

/// Per-frame uniforms of the render program (group 1).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    pub time: f32,
}

impl FrameUniforms {
    pub fn new(view: glam::Mat4, projection: glam::Mat4, camera_position: glam::Vec3, time: f32) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            camera_position: camera_position.to_array(),
            time,
        }
    }
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self::new(glam::Mat4::IDENTITY, glam::Mat4::IDENTITY, glam::Vec3::ZERO, 0.0)
    }
}
