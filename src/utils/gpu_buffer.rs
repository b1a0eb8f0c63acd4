use std::mem;
use crate::error::{GalaxyError, GalaxyResult};
use crate::renderer::wgpu_context::WgpuContext;
use wgpu::{util::DeviceExt, Buffer};

/// A fixed-capacity GPU buffer mirrored by a CPU-side `Vec`.
///
/// The capacity is decided at creation; writes past it are rejected rather
/// than reallocating, so bind groups referring to the buffer stay valid.
#[derive(Debug)]
pub struct GpuBuffer<T> {
    data: Vec<T>,
    buffer: wgpu::Buffer,
}

impl<T: bytemuck::Pod> GpuBuffer<T> {
    pub fn new(wgpu_context: &WgpuContext, label: &str, data: Vec<T>, usage: wgpu::BufferUsages) -> Self {
        let usage = usage | wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::COPY_SRC;
        let buffer = wgpu_context.get_device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data),
            usage,
        });

        Self { data, buffer }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Overwrites `values.len()` elements starting at `first` and uploads them.
    pub fn write(&mut self, wgpu_context: &WgpuContext, first: usize, values: &[T]) -> GalaxyResult<()> {
        let end = first + values.len();
        if end > self.data.len() {
            return Err(GalaxyError::Capacity { requested: end, capacity: self.data.len() });
        }
        self.data[first..end].copy_from_slice(values);
        let byte_offset = (first * size_of::<T>()) as u64;
        wgpu_context.get_queue().write_buffer(&self.buffer, byte_offset, bytemuck::cast_slice(values));
        Ok(())
    }

    /// Downloads data from the GPU buffer to the CPU-side `Vec`.
    ///
    /// Only tests read particle memory back; the render loop never does.
    pub fn download(&mut self, wgpu_context: &WgpuContext) -> Result<&Vec<T>, wgpu::BufferAsyncError> {
        let device = wgpu_context.get_device();
        let queue = wgpu_context.get_queue();

        let size = (self.data.len() * mem::size_of::<T>()) as u64;
        if size == 0 {
            return Ok(&self.data);
        }

        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Staging Buffer (Download)"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Download Encoder"),
        });
        encoder.copy_buffer_to_buffer(&self.buffer, 0, &staging_buffer, 0, size);
        queue.submit(Some(encoder.finish()));

        let buffer_slice = staging_buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        // Blocks until the copy and the mapping are done.
        if let Err(e) = device.poll(wgpu::PollType::Wait) {
            log::error!("Device poll failed during download: {e}");
        }

        match receiver.recv() {
            Ok(Ok(())) => {
                let mapped_range = buffer_slice.get_mapped_range();
                let downloaded: &[T] = bytemuck::cast_slice(&mapped_range);
                self.data.clear();
                self.data.extend_from_slice(downloaded);
                drop(mapped_range);
                staging_buffer.unmap();
                Ok(&self.data)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(wgpu::BufferAsyncError),
        }
    }

    pub fn data(&self) -> &Vec<T> {
        &self.data
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }
}
