pub mod compute_shader;
pub mod frame_clock;
pub mod gpu_buffer;
pub mod input_manager;
pub mod shader_program;
