use std::sync::Arc;
use wgpu_profiler::{GpuProfiler, GpuProfilerSettings};
use winit::event::{KeyEvent, WindowEvent};
use winit::keyboard::PhysicalKey;
use winit::window::Window;
use crate::config::GalaxyConfig;
use crate::galaxy::particle_system::Galaxy;
use crate::orchestrator::{FrameOrchestrator, FrameUpdate, RenderMode};
use crate::renderer::camera::Camera;
use crate::renderer::wgpu_context::WgpuContext;

// Everything one running galaxy window owns. Dropping it releases the GPU
// resources before the window goes away.
pub struct State {
    galaxy: Galaxy,
    orchestrator: FrameOrchestrator,
    gpu_profiler: GpuProfiler,
    wgpu_context: WgpuContext,
}

impl State {
    pub async fn new(window: Arc<Window>, config: &GalaxyConfig) -> anyhow::Result<Self> {
        let wgpu_context = WgpuContext::new(window).await?;
        let mut gpu_profiler = GpuProfiler::new(wgpu_context.get_device(), GpuProfilerSettings::default())?;

        let galaxy = Galaxy::new(&wgpu_context, config, &mut gpu_profiler)?;

        let camera = Camera::new(config.camera_position, config.camera_speed, config.camera_sensitivity);
        let orchestrator = FrameOrchestrator::new(camera);

        Ok(Self {
            galaxy,
            orchestrator,
            gpu_profiler,
            wgpu_context,
        })
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.orchestrator.request_exit(),
            WindowEvent::Resized(size) => self.wgpu_context.resize(size.width, size.height),
            WindowEvent::Focused(false) => self.orchestrator.handle_focus_lost(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => self.orchestrator.handle_key(*code, *key_state),
            WindowEvent::MouseWheel { delta, .. } => self.orchestrator.handle_scroll(*delta),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    pub fn handle_pointer_motion(&mut self, dx: f64, dy: f64) {
        self.orchestrator.handle_pointer_motion(dx, dy);
    }

    pub fn is_running(&self) -> bool {
        self.orchestrator.is_running()
    }

    pub fn request_redraw(&self) {
        if let Some(surface_manager) = self.wgpu_context.surface_manager() {
            surface_manager.get_window().request_redraw();
        }
    }

    fn redraw(&mut self) {
        if !self.is_running() {
            return;
        }

        let update = self.orchestrator.tick(self.wgpu_context.aspect_ratio());
        if update.reload_requested {
            self.galaxy.hot_reload(&self.wgpu_context, &mut self.gpu_profiler);
        }
        if let Err(e) = self.galaxy.update_frame(&self.wgpu_context, update.uniforms()) {
            log::error!("Unable to upload frame uniforms: {e}");
        }

        match self.render(update.render_mode) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.wgpu_context.window_size();
                self.wgpu_context.resize(size.width, size.height);
            }
            Err(e) => {
                log::error!("Unable to render: {:?}", e);
            }
        }

        self.finish_profiler_frame(&update);
        self.request_redraw();
    }

    fn render(&mut self, render_mode: RenderMode) -> Result<(), wgpu::SurfaceError> {
        let Some(surface_manager) = self.wgpu_context.surface_manager() else {
            return Ok(());
        };
        if !surface_manager.is_surface_configured() {
            return Ok(());
        }
        let Some(depth_view) = surface_manager.depth_view() else {
            return Ok(());
        };

        let output = surface_manager.get_surface().get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.wgpu_context.get_device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut scope = self.gpu_profiler.scope("Galaxy draw", &mut encoder);
            let mut render_pass = scope.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Galaxy Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.galaxy.draw(&mut render_pass, render_mode);
        }
        self.gpu_profiler.resolve_queries(&mut encoder);

        self.wgpu_context.get_queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn finish_profiler_frame(&mut self, update: &FrameUpdate) {
        if let Err(e) = self.gpu_profiler.end_frame() {
            log::warn!("GPU profiler frame was not closed: {e}");
            return;
        }
        let period = self.wgpu_context.get_queue().get_timestamp_period();
        let Some(results) = self.gpu_profiler.process_finished_frame(period) else {
            return;
        };

        #[cfg(feature = "benchmark")]
        {
            log::debug!("Frame: {:.3} ms", update.delta_time * 1000.0);
            for result in &results {
                if let Some(time) = &result.time {
                    log::debug!("{:<20}: {:.4} ms", result.label, (time.end - time.start) * 1000.0);
                }
            }
        }
        #[cfg(not(feature = "benchmark"))]
        let _ = (update, results);
    }
}
