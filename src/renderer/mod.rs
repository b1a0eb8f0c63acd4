pub mod camera;
pub mod surface_manager;
pub mod wgpu_context;
