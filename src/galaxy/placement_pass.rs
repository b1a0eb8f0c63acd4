use std::path::{Path, PathBuf};
use wgpu::{BindGroup, BindGroupLayout, CommandEncoder};
use wgpu_profiler::GpuProfiler;
use crate::error::ShaderError;
use crate::galaxy::particle::{ComputeParameters, Particle, COMPUTE_PARAMS_BINDING, PARTICLES_BINDING};
use crate::renderer::wgpu_context::WgpuContext;
use crate::utils::compute_shader::{workgroups_for, ComputeShader};
use crate::utils::gpu_buffer::GpuBuffer;
use crate::utils::shader_program::{ProgramId, ProgramSlot, ShaderSource};

const ENTRY_POINT: &str = "place_particles";

/// Where placement dispatches are recorded.
///
/// Writes made by `dispatch` may stay invisible to readers of the particle
/// buffer until the following `barrier`.
pub trait PlacementTarget {
    fn dispatch(&mut self, workgroups: u32);
    fn barrier(&mut self);
}

/// How many slots one placement run covers and in which group size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPlan {
    pub particle_count: u32,
    pub workgroup_size: u32,
}

impl DispatchPlan {
    pub fn workgroups(&self) -> u32 {
        workgroups_for(self.particle_count, self.workgroup_size)
    }
}

/// Runs one full placement: every slot is written, then made visible.
///
/// Both the startup placement and every hot reload go through here, so the
/// workgroup count is always derived the same way.
pub fn place_particles<T: PlacementTarget>(target: &mut T, plan: DispatchPlan) {
    let workgroups = plan.workgroups();
    log::info!(
        "Placing {} particles: {} workgroups of {}",
        plan.particle_count, workgroups, plan.workgroup_size
    );
    target.dispatch(workgroups);
    target.barrier();
}

/// Records placement into a command encoder; the barrier is the submission.
struct QueueTarget<'a> {
    wgpu_context: &'a WgpuContext,
    gpu_profiler: &'a mut GpuProfiler,
    shader: &'a ComputeShader,
    bind_group: &'a BindGroup,
    encoder: Option<CommandEncoder>,
}

impl PlacementTarget for QueueTarget<'_> {
    fn dispatch(&mut self, workgroups: u32) {
        let device = self.wgpu_context.get_device();
        let encoder = self.encoder.get_or_insert_with(|| {
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Placement Encoder") })
        });
        let mut scope = self.gpu_profiler.scope("Galaxy placement", encoder);
        self.shader.dispatch(&mut scope, workgroups, self.bind_group);
    }

    fn barrier(&mut self) {
        if let Some(mut encoder) = self.encoder.take() {
            self.gpu_profiler.resolve_queries(&mut encoder);
            // Commands of later submissions start after this one has finished.
            self.wgpu_context.get_queue().submit(std::iter::once(encoder.finish()));
        }
    }
}

/// The placement compute program, its bindings and its source file.
pub struct PlacementPass {
    source_path: PathBuf,
    program: ProgramSlot<ComputeShader>,
    bind_group_layout: BindGroupLayout,
    bind_group: BindGroup,
    particle_count: u32,
}

impl PlacementPass {
    /// Builds the program for the first time. A failure here is returned
    /// as is: there is no earlier program to fall back to.
    pub fn new(
        wgpu_context: &WgpuContext,
        source_path: impl AsRef<Path>,
        compute_params: &GpuBuffer<ComputeParameters>,
        particles: &GpuBuffer<Particle>,
    ) -> Result<Self, ShaderError> {
        let bind_group_layout = Self::create_bind_group_layout(wgpu_context);
        let bind_group = Self::create_bind_group(wgpu_context, &bind_group_layout, compute_params, particles);

        let mut pass = Self {
            source_path: source_path.as_ref().to_path_buf(),
            program: ProgramSlot::new("placement program"),
            bind_group_layout,
            bind_group,
            particle_count: particles.len() as u32,
        };
        pass.rebuild(wgpu_context)?;
        Ok(pass)
    }

    /// Reads the source again and swaps in the new program if it builds.
    pub fn rebuild(&mut self, wgpu_context: &WgpuContext) -> Result<ProgramId, ShaderError> {
        let build = ShaderSource::read(&self.source_path)
            .and_then(|source| ComputeShader::new(wgpu_context, &source, ENTRY_POINT, &self.bind_group_layout))
            .and_then(|shader| self.check_dispatch_limit(wgpu_context, shader));
        self.program.install(build)
    }

    /// A program whose workgroup size would need more workgroups than one
    /// dispatch may carry is rejected like any other failed build.
    fn check_dispatch_limit(&self, wgpu_context: &WgpuContext, shader: ComputeShader) -> Result<ComputeShader, ShaderError> {
        let workgroups = self.plan(&shader).workgroups();
        let limit = wgpu_context.get_device().limits().max_compute_workgroups_per_dimension;
        if workgroups > limit {
            return Err(ShaderError::DispatchLimit {
                label: self.source_path.display().to_string(),
                workgroups,
                limit,
            });
        }
        Ok(shader)
    }

    /// Rebuilds and, only if that worked, places every particle again.
    pub fn reload(&mut self, wgpu_context: &WgpuContext, gpu_profiler: &mut GpuProfiler) -> Result<ProgramId, ShaderError> {
        let id = self.rebuild(wgpu_context)?;
        self.dispatch(wgpu_context, gpu_profiler);
        Ok(id)
    }

    /// Places every particle with the active program and submits the work.
    pub fn dispatch(&self, wgpu_context: &WgpuContext, gpu_profiler: &mut GpuProfiler) {
        let Some(shader) = self.program.active() else {
            log::error!("No {} is active, skipping placement", self.program.label());
            return;
        };
        let plan = self.plan(shader);
        let mut target = QueueTarget {
            wgpu_context,
            gpu_profiler,
            shader,
            bind_group: &self.bind_group,
            encoder: None,
        };
        place_particles(&mut target, plan);
    }

    fn plan(&self, shader: &ComputeShader) -> DispatchPlan {
        DispatchPlan { particle_count: self.particle_count, workgroup_size: shader.workgroup_size() }
    }

    pub fn program_id(&self) -> Option<ProgramId> {
        self.program.active_id()
    }

    pub fn workgroup_size(&self) -> Option<u32> {
        self.program.active().map(ComputeShader::workgroup_size)
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    fn create_bind_group(
        wgpu_context: &WgpuContext,
        layout: &BindGroupLayout,
        compute_params: &GpuBuffer<ComputeParameters>,
        particles: &GpuBuffer<Particle>,
    ) -> BindGroup {
        wgpu_context.get_device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Placement Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: COMPUTE_PARAMS_BINDING,
                    resource: compute_params.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: PARTICLES_BINDING,
                    resource: particles.buffer().as_entire_binding(),
                },
            ],
        })
    }

    fn create_bind_group_layout(wgpu_context: &WgpuContext) -> BindGroupLayout {
        wgpu_context.get_device().create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Placement Bind Group Layout"),
            entries: &[
                // Shaping parameters
                wgpu::BindGroupLayoutEntry {
                    binding: COMPUTE_PARAMS_BINDING,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(size_of::<ComputeParameters>() as u64),
                    },
                    count: None,
                },
                // Particle slots, written by the program
                wgpu::BindGroupLayoutEntry {
                    binding: PARTICLES_BINDING,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(size_of::<Particle>() as u64),
                    },
                    count: None,
                },
            ],
        })
    }
}
