use glam::{Mat4, Vec3};

pub const MAX_FOV_DEGREES: f32 = 45.0;
pub const MIN_FOV_DEGREES: f32 = 1.0;
const PITCH_LIMIT_DEGREES: f32 = 89.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
    /// Re-aims the camera at the galactic core.
    Focus,
}

/// Free-flying camera driven by yaw/pitch angles in degrees.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    speed: f32,
    sensitivity: f32,
}

impl Camera {
    /// Creates a camera at `position` looking at the origin.
    pub fn new(position: Vec3, speed: f32, sensitivity: f32) -> Self {
        let mut camera = Self {
            position,
            yaw: -90.0,
            pitch: 0.0,
            fov: MAX_FOV_DEGREES,
            speed,
            sensitivity,
        };
        camera.look_at(Vec3::ZERO);
        camera
    }

    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() < 1e-12 {
            return;
        }
        let forward = dir.normalize();
        self.yaw = forward.z.atan2(forward.x).to_degrees();
        self.pitch = forward.y.asin().to_degrees().clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
    }

    pub fn front(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();
        Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize()
    }

    fn right(&self) -> Vec3 {
        self.front().cross(Vec3::Y).normalize()
    }

    /// Moves the camera; the distance scales with `delta_time` so speed is frame-rate independent.
    pub fn apply_movement(&mut self, movement: CameraMovement, delta_time: f32) {
        let velocity = self.speed * delta_time;
        match movement {
            CameraMovement::Forward => self.position += self.front() * velocity,
            CameraMovement::Backward => self.position -= self.front() * velocity,
            CameraMovement::Left => self.position -= self.right() * velocity,
            CameraMovement::Right => self.position += self.right() * velocity,
            CameraMovement::Up => self.position += Vec3::Y * velocity,
            CameraMovement::Down => self.position -= Vec3::Y * velocity,
            CameraMovement::Focus => self.look_at(Vec3::ZERO),
        }
    }

    /// `dy` is positive when the pointer moves up.
    pub fn apply_look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
    }

    pub fn apply_zoom(&mut self, dy: f32) {
        self.fov = (self.fov - dy).clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect_ratio, Z_NEAR, Z_FAR)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov
    }

    pub fn pitch_degrees(&self) -> f32 {
        self.pitch
    }
}
