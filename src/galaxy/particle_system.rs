use wgpu_profiler::GpuProfiler;
use crate::config::GalaxyConfig;
use crate::error::{GalaxyError, GalaxyResult};
use crate::galaxy::particle::{ComputeParameters, FrameUniforms, Particle, VertexParams};
use crate::galaxy::particle_drawer::ParticleDrawer;
use crate::galaxy::placement::seed_particles;
use crate::galaxy::placement_pass::PlacementPass;
use crate::geometry::SphereMesh;
use crate::orchestrator::RenderMode;
use crate::renderer::wgpu_context::WgpuContext;
use crate::utils::gpu_buffer::GpuBuffer;

/// Which programs a hot reload managed to rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadOutcome {
    pub placement: bool,
    pub render: bool,
}

impl ReloadOutcome {
    pub fn is_complete(&self) -> bool {
        self.placement && self.render
    }
}

/// The particle field and the two programs working on it.
pub struct Galaxy {
    particles: GpuBuffer<Particle>,
    // Only reached through the bind groups of the two programs.
    _compute_params: GpuBuffer<ComputeParameters>,
    _vertex_params: GpuBuffer<VertexParams>,
    placement: PlacementPass,
    drawer: ParticleDrawer,
}

impl Galaxy {
    /// Allocates the particle field, builds both programs and runs the first
    /// placement. Any program build failure is returned to the caller.
    pub fn new(wgpu_context: &WgpuContext, config: &GalaxyConfig, gpu_profiler: &mut GpuProfiler) -> GalaxyResult<Self> {
        config.validate()?;
        check_device_capacity(wgpu_context, config.particle_count)?;
        let params = config.compute_parameters()?;
        let vertex_params = config.vertex_params();

        // The placement pass overwrites every slot; the host fill keeps the
        // buffer deterministic before (and without) it.
        let particles = GpuBuffer::new(
            wgpu_context,
            "Particle Buffer",
            seed_particles(&params, config.particle_count as usize),
            wgpu::BufferUsages::STORAGE,
        );
        let compute_params = GpuBuffer::new(wgpu_context, "Compute Parameters", vec![params], wgpu::BufferUsages::UNIFORM);
        let vertex_params = GpuBuffer::new(wgpu_context, "Vertex Parameters", vec![vertex_params], wgpu::BufferUsages::UNIFORM);
        log::info!(
            "Allocated {} particle slots ({} stars, {} dust)",
            particles.len(), params.num_stars(), particles.len() as u32 - params.num_stars()
        );

        let placement = PlacementPass::new(wgpu_context, config.placement_shader_path(), &compute_params, &particles)?;
        let (x_segments, y_segments) = config.sphere_segments;
        let sphere = SphereMesh::uv_sphere(x_segments, y_segments);
        let drawer = ParticleDrawer::new(wgpu_context, config.render_shader_path(), &particles, &vertex_params, &sphere)?;

        placement.dispatch(wgpu_context, gpu_profiler);

        Ok(Self {
            particles,
            _compute_params: compute_params,
            _vertex_params: vertex_params,
            placement,
            drawer,
        })
    }

    /// Rebuilds both programs from their files. The placement runs again only
    /// if its program rebuilt; failed programs stay as they were.
    pub fn hot_reload(&mut self, wgpu_context: &WgpuContext, gpu_profiler: &mut GpuProfiler) -> ReloadOutcome {
        let outcome = ReloadOutcome {
            placement: self.placement.reload(wgpu_context, gpu_profiler).is_ok(),
            render: self.drawer.rebuild(wgpu_context).is_ok(),
        };
        if outcome.is_complete() {
            log::info!("Hot reload finished");
        } else {
            log::warn!("Hot reload incomplete: {:?}", outcome);
        }
        outcome
    }

    pub fn update_frame(&mut self, wgpu_context: &WgpuContext, uniforms: FrameUniforms) -> GalaxyResult<()> {
        self.drawer.update_frame(wgpu_context, uniforms)
    }

    pub fn draw(&mut self, render_pass: &mut wgpu::RenderPass, mode: RenderMode) {
        let instance_count = self.particle_count();
        self.drawer.draw(render_pass, mode, instance_count);
    }

    pub fn particle_count(&self) -> u32 {
        self.particles.len() as u32
    }

    pub fn placement(&self) -> &PlacementPass {
        &self.placement
    }

    pub fn drawer(&self) -> &ParticleDrawer {
        &self.drawer
    }

    /// Reads the particle field back from the GPU.
    pub fn download_particles(&mut self, wgpu_context: &WgpuContext) -> Result<Vec<Particle>, wgpu::BufferAsyncError> {
        self.particles.download(wgpu_context).cloned()
    }
}

/// Rejects particle counts whose buffer the device could not allocate or bind.
fn check_device_capacity(wgpu_context: &WgpuContext, particle_count: u32) -> GalaxyResult<()> {
    let limits = wgpu_context.get_device().limits();
    let max_bytes = (limits.max_storage_buffer_binding_size as u64).min(limits.max_buffer_size);
    let capacity = max_bytes / size_of::<Particle>() as u64;
    if particle_count as u64 > capacity {
        return Err(GalaxyError::Capacity {
            requested: particle_count as usize,
            capacity: capacity as usize,
        });
    }
    Ok(())
}
