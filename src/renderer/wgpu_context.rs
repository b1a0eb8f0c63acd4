use std::sync::Arc;
use wgpu::Adapter;
use winit::window::Window;

use crate::renderer::surface_manager::SurfaceManager;

pub struct WgpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_manager: Option<SurfaceManager>,
    adapter: Adapter,
}

impl WgpuContext {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        // The instance is a handle to our GPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Galaxy Device"),
                required_features: WgpuContext::get_features(&adapter),
                required_limits: adapter.limits(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_manager = SurfaceManager::new(window, surface, &adapter, &device);

        Ok(Self {
            device,
            queue,
            surface_manager: Some(surface_manager),
            adapter,
        })
    }

    /// Wireframe and point rasterisation plus GPU timestamps, when the adapter has them.
    fn get_features(adapter: &Adapter) -> wgpu::Features {
        let wanted = wgpu::Features::POLYGON_MODE_LINE
            | wgpu::Features::POLYGON_MODE_POINT
            | wgpu::Features::TIMESTAMP_QUERY
            | wgpu::Features::TIMESTAMP_QUERY_INSIDE_ENCODERS;
        let missing = wanted - adapter.features();
        if !missing.is_empty() {
            log::warn!("Adapter lacks optional features {:?}", missing);
        }
        wanted & adapter.features()
    }

    pub async fn new_for_test() -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Test Device"),
                required_features: WgpuContext::get_features(&adapter),
                required_limits: adapter.limits(),
                ..Default::default()
            })
            .await?;

        Ok(Self {
            device,
            queue,
            surface_manager: None,
            adapter,
        })
    }

    pub fn window_size(&self) -> winit::dpi::PhysicalSize<u32> {
        match &self.surface_manager {
            Some(surface_manager) => surface_manager.window_size(),
            None => winit::dpi::PhysicalSize::new(0, 0),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        let size = self.window_size();
        if size.height == 0 {
            1.0
        } else {
            size.width as f32 / size.height as f32
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(surface_manager) = self.surface_manager.as_mut() {
            surface_manager.resize(width, height, &self.device);
        }
    }

    pub fn surface_manager(&self) -> Option<&SurfaceManager> {
        self.surface_manager.as_ref()
    }

    pub fn get_device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn get_queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn get_adapter(&self) -> &Adapter {
        &self.adapter
    }

    pub fn supports(&self, features: wgpu::Features) -> bool {
        self.device.features().contains(features)
    }

    /// Colour format of the render target; the surface format when there is one.
    pub fn color_format(&self) -> wgpu::TextureFormat {
        match &self.surface_manager {
            Some(surface_manager) => surface_manager.get_config().format,
            None => wgpu::TextureFormat::Rgba8UnormSrgb,
        }
    }
}
