use wgpu::util::DeviceExt;

use super::primitives;
use super::renderer::Instance;

pub const DEFAULT_INSTANCE_CAPACITY: usize = 16;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: glam::Vec3,
    pub color: glam::Vec3,
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;

        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
    pub const fn new(position: glam::Vec3, color: glam::Vec3) -> Self {
        Self { position, color }
    }
}

/// Vertex data uploaded to the GPU, with an optional index buffer and a
/// growable per-instance buffer.
pub struct Mesh {
    pub label: String,
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub instance_buffer: wgpu::Buffer,
    pub instance_capacity: usize,
    pub instance_count: u32,
}

impl Mesh {
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: Option<&[u16]>) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = indices.map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Index Buffer")),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            })
        });
        let instance_capacity = DEFAULT_INSTANCE_CAPACITY;
        let instance_buffer = create_instance_buffer(device, label, instance_capacity);
        log::debug!(
            "Uploaded mesh {label}: {} vertices, {} indices",
            vertices.len(),
            indices.map_or(0, <[u16]>::len)
        );

        Self {
            label: label.to_string(),
            vertex_buffer,
            vertex_count: vertices.len() as u32,
            index_buffer,
            index_count: indices.map_or(0, |i| i.len() as u32),
            instance_buffer,
            instance_capacity,
            instance_count: 0,
        }
    }

    pub fn new_triangle(device: &wgpu::Device) -> Self {
        Self::new(device, "Triangle", primitives::TRIANGLE_VERTICES, None)
    }

    pub fn new_cube(device: &wgpu::Device) -> Self {
        Self::new(
            device,
            "Cube",
            primitives::CUBE_VERTICES,
            Some(primitives::CUBE_INDICES),
        )
    }

    pub fn new_grid(device: &wgpu::Device, half_extent: u32, spacing: f32) -> Self {
        let vertices = primitives::grid_lines(half_extent, spacing);
        Self::new(device, "Grid", &vertices, None)
    }

    pub fn realloc_instance_buffer(&mut self, device: &wgpu::Device, new_capacity: usize) {
        self.instance_capacity = grown_capacity(self.instance_capacity, new_capacity);
        self.instance_buffer.destroy();
        self.instance_buffer = create_instance_buffer(device, &self.label, self.instance_capacity);
    }

    /// Replaces the instance data drawn by `draw_instanced`.
    pub fn write_instances(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &[Instance]) {
        if instances.len() > self.instance_capacity {
            self.realloc_instance_buffer(device, instances.len());
        }
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        self.instance_count = instances.len() as u32;
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        self.draw_range(render_pass, 0..1);
    }

    pub fn draw_instanced(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        self.draw_range(render_pass, 0..self.instance_count);
    }

    fn draw_range(&self, render_pass: &mut wgpu::RenderPass<'_>, instances: std::ops::Range<u32>) {
        match &self.index_buffer {
            Some(index_buffer) => {
                render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                render_pass.draw_indexed(0..self.index_count, 0, instances);
            }
            None => render_pass.draw(0..self.vertex_count, instances),
        }
    }

    /// Frees the GPU buffers immediately instead of waiting for the drop.
    pub fn destroy(&self) {
        log::trace!("Destroying mesh {}", self.label);
        self.vertex_buffer.destroy();
        if let Some(index_buffer) = &self.index_buffer {
            index_buffer.destroy();
        }
        self.instance_buffer.destroy();
    }
}

fn create_instance_buffer(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("{label} Instance Buffer")),
        size: (capacity * std::mem::size_of::<Instance>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

// Doubles until `required` fits.
fn grown_capacity(current: usize, required: usize) -> usize {
    let mut capacity = current.max(1);
    while capacity < required {
        capacity *= 2;
    }
    capacity
}
