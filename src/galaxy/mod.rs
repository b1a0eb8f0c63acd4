pub mod particle;
pub mod particle_drawer;
pub mod particle_system;
pub mod placement;
pub mod placement_pass;
pub mod prng;
