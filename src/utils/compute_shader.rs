use wgpu::{BindGroup, CommandEncoder};
use crate::error::ShaderError;
use crate::renderer::wgpu_context::WgpuContext;
use crate::utils::shader_program::{build_checked, ShaderSource};

/// A compute pipeline together with the workgroup size its source declares.
pub struct ComputeShader {
    pipeline: wgpu::ComputePipeline,
    workgroup_size: u32,
}

impl ComputeShader {
    pub fn new(
        wgpu_context: &WgpuContext,
        source: &ShaderSource,
        entry_point: &str,
        bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, ShaderError> {
        let workgroup_size = source.declared_workgroup_size()?;
        let label = source.label();

        let pipeline = build_checked(wgpu_context, &label, |device| {
            let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&label),
                source: wgpu::ShaderSource::Wgsl(source.text.as_str().into()),
            });

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("Compute Pipeline Layout for {}", entry_point)),
                bind_group_layouts: &[bind_group_layout],
                push_constant_ranges: &[],
            });

            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(&format!("Compute Pipeline for {}", entry_point)),
                layout: Some(&pipeline_layout),
                module: &module,
                entry_point: Some(entry_point),
                compilation_options: wgpu::PipelineCompilationOptions {
                    constants: &[],
                    zero_initialize_workgroup_memory: true,
                },
                cache: None,
            })
        })?;

        Ok(Self { pipeline, workgroup_size })
    }

    pub fn workgroup_size(&self) -> u32 {
        self.workgroup_size
    }

    /// Dispatches the compute shader.
    pub fn dispatch(&self, encoder: &mut CommandEncoder, workgroups: u32, bind_group: &BindGroup) {
        let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Compute Pass"),
            timestamp_writes: None,
        });

        compute_pass.set_pipeline(&self.pipeline);
        compute_pass.set_bind_group(0, bind_group, &[]);
        compute_pass.dispatch_workgroups(workgroups, 1, 1);
    }
}

/// Number of workgroups covering `item_count` items, rounded up.
pub fn workgroups_for(item_count: u32, workgroup_size: u32) -> u32 {
    item_count.div_ceil(workgroup_size.max(1))
}
