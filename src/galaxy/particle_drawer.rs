use std::collections::HashSet;
use std::path::{Path, PathBuf};
use wgpu::{BindGroup, BindGroupLayout};
use crate::error::{GalaxyResult, ShaderError};
use crate::galaxy::particle::{FrameUniforms, Particle, VertexParams, PARTICLES_BINDING, VERTEX_PARAMS_BINDING};
use crate::geometry::{SphereMesh, SphereVertex};
use crate::orchestrator::RenderMode;
use crate::renderer::surface_manager::DEPTH_FORMAT;
use crate::renderer::wgpu_context::WgpuContext;
use crate::utils::gpu_buffer::GpuBuffer;
use crate::utils::shader_program::{build_checked, ProgramId, ProgramSlot, ShaderSource};

/// One pipeline per rasterisation mode. Wireframe and point pipelines only
/// exist when the device has the matching polygon-mode feature.
pub struct RenderPipelines {
    filled: wgpu::RenderPipeline,
    wireframe: Option<wgpu::RenderPipeline>,
    point: Option<wgpu::RenderPipeline>,
}

impl RenderPipelines {
    fn get(&self, mode: RenderMode) -> Option<&wgpu::RenderPipeline> {
        match mode {
            RenderMode::Filled => Some(&self.filled),
            RenderMode::Wireframe => self.wireframe.as_ref(),
            RenderMode::Point => self.point.as_ref(),
        }
    }
}

/// Draws every particle slot as an instance of a unit sphere.
pub struct ParticleDrawer {
    source_path: PathBuf,
    program: ProgramSlot<RenderPipelines>,
    particle_bind_group_layout: BindGroupLayout,
    frame_bind_group_layout: BindGroupLayout,
    particle_bind_group: BindGroup,
    frame_bind_group: BindGroup,
    frame_uniforms: GpuBuffer<FrameUniforms>,
    vertices: GpuBuffer<SphereVertex>,
    indices: GpuBuffer<u32>,
    color_format: wgpu::TextureFormat,
    fallback_warned: HashSet<RenderMode>,
}

impl ParticleDrawer {
    pub fn new(
        wgpu_context: &WgpuContext,
        source_path: impl AsRef<Path>,
        particles: &GpuBuffer<Particle>,
        vertex_params: &GpuBuffer<VertexParams>,
        sphere: &SphereMesh,
    ) -> Result<Self, ShaderError> {
        let particle_bind_group_layout = Self::create_particle_bind_group_layout(wgpu_context);
        let frame_bind_group_layout = Self::create_frame_bind_group_layout(wgpu_context);

        let frame_uniforms = GpuBuffer::new(
            wgpu_context,
            "Frame Uniforms",
            vec![FrameUniforms::default()],
            wgpu::BufferUsages::UNIFORM,
        );

        let particle_bind_group = wgpu_context.get_device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Particle Render Bind Group"),
            layout: &particle_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: PARTICLES_BINDING,
                    resource: particles.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: VERTEX_PARAMS_BINDING,
                    resource: vertex_params.buffer().as_entire_binding(),
                },
            ],
        });

        let frame_bind_group = wgpu_context.get_device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniforms.buffer().as_entire_binding(),
            }],
        });

        let vertices = GpuBuffer::new(wgpu_context, "Sphere Vertices", sphere.vertices.clone(), wgpu::BufferUsages::VERTEX);
        let indices = GpuBuffer::new(wgpu_context, "Sphere Indices", sphere.indices.clone(), wgpu::BufferUsages::INDEX);

        let mut drawer = Self {
            source_path: source_path.as_ref().to_path_buf(),
            program: ProgramSlot::new("render program"),
            particle_bind_group_layout,
            frame_bind_group_layout,
            particle_bind_group,
            frame_bind_group,
            frame_uniforms,
            vertices,
            indices,
            color_format: wgpu_context.color_format(),
            fallback_warned: HashSet::new(),
        };
        drawer.rebuild(wgpu_context)?;
        Ok(drawer)
    }

    /// Reads the source again and swaps in the new pipelines if they build.
    pub fn rebuild(&mut self, wgpu_context: &WgpuContext) -> Result<ProgramId, ShaderError> {
        let build = ShaderSource::read(&self.source_path).and_then(|source| self.build_pipelines(wgpu_context, &source));
        self.program.install(build)
    }

    fn build_pipelines(&self, wgpu_context: &WgpuContext, source: &ShaderSource) -> Result<RenderPipelines, ShaderError> {
        let label = source.label();
        build_checked(wgpu_context, &label, |device| {
            let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&label),
                source: wgpu::ShaderSource::Wgsl(source.text.as_str().into()),
            });
            let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Particle Render Pipeline Layout"),
                bind_group_layouts: &[&self.particle_bind_group_layout, &self.frame_bind_group_layout],
                push_constant_ranges: &[],
            });

            let optional = |mode: RenderMode| {
                wgpu_context
                    .supports(mode.required_features())
                    .then(|| self.create_pipeline(device, &module, &layout, mode))
            };

            RenderPipelines {
                filled: self.create_pipeline(device, &module, &layout, RenderMode::Filled),
                wireframe: optional(RenderMode::Wireframe),
                point: optional(RenderMode::Point),
            }
        })
    }

    fn create_pipeline(
        &self,
        device: &wgpu::Device,
        module: &wgpu::ShaderModule,
        layout: &wgpu::PipelineLayout,
        mode: RenderMode,
    ) -> wgpu::RenderPipeline {
        // Additive: overlapping sprites brighten each other.
        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("Particle Render Pipeline ({mode:?})")),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module,
                entry_point: Some("vs_main"),
                buffers: &[SphereVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: Some(wgpu::BlendState { color: additive, alpha: additive }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: Some(wgpu::IndexFormat::Uint32),
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: mode.polygon_mode(),
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    pub fn update_frame(&mut self, wgpu_context: &WgpuContext, uniforms: FrameUniforms) -> GalaxyResult<()> {
        self.frame_uniforms.write(wgpu_context, 0, &[uniforms])
    }

    /// Issues the single instanced draw. Modes without a pipeline fall back
    /// to filled, with one warning per mode.
    pub fn draw(&mut self, render_pass: &mut wgpu::RenderPass, mode: RenderMode, instance_count: u32) {
        let Some(pipelines) = self.program.active() else {
            log::error!("No {} is active, skipping draw", self.program.label());
            return;
        };
        let pipeline = match pipelines.get(mode) {
            Some(pipeline) => pipeline,
            None => {
                if self.fallback_warned.insert(mode) {
                    log::warn!("{mode:?} rendering is not supported by this device, drawing filled instead");
                }
                &pipelines.filled
            }
        };

        render_pass.set_pipeline(pipeline);
        render_pass.set_vertex_buffer(0, self.vertices.buffer().slice(..));
        render_pass.set_index_buffer(self.indices.buffer().slice(..), wgpu::IndexFormat::Uint32);
        render_pass.set_bind_group(0, &self.particle_bind_group, &[]);
        render_pass.set_bind_group(1, &self.frame_bind_group, &[]);
        render_pass.draw_indexed(0..self.index_count(), 0, 0..instance_count);
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn program_id(&self) -> Option<ProgramId> {
        self.program.active_id()
    }

    pub fn supports(&self, mode: RenderMode) -> bool {
        self.program.active().is_some_and(|pipelines| pipelines.get(mode).is_some())
    }

    fn create_particle_bind_group_layout(wgpu_context: &WgpuContext) -> BindGroupLayout {
        wgpu_context.get_device().create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Particle Render Bind Group Layout"),
            entries: &[
                // Particle slots, read per instance
                wgpu::BindGroupLayoutEntry {
                    binding: PARTICLES_BINDING,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(size_of::<Particle>() as u64),
                    },
                    count: None,
                },
                // Sprite scales
                wgpu::BindGroupLayoutEntry {
                    binding: VERTEX_PARAMS_BINDING,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(size_of::<VertexParams>() as u64),
                    },
                    count: None,
                },
            ],
        })
    }

    fn create_frame_bind_group_layout(wgpu_context: &WgpuContext) -> BindGroupLayout {
        wgpu_context.get_device().create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(size_of::<FrameUniforms>() as u64),
                },
                count: None,
            }],
        })
    }
}
