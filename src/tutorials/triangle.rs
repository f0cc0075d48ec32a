use crate::mesh::{Mesh, Vertex};
use crate::renderer::{PipelineDesc, Renderer, SurfaceFrame};
use crate::shader;
use crate::surface::{FrameInfo, Scene};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Material {
    color: glam::Vec4,
}

struct Gpu {
    pipeline: wgpu::RenderPipeline,
    material_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    triangle: Mesh,
}

/// One triangle in a uniform colour.
pub struct TriangleScene {
    color: glam::Vec4,
    gpu: Option<Gpu>,
}

impl Default for TriangleScene {
    fn default() -> Self {
        Self::new()
    }
}

impl TriangleScene {
    pub fn new() -> Self {
        Self {
            color: glam::Vec4::new(0.8, 0.8, 0.1, 1.0),
            gpu: None,
        }
    }
}

impl Scene<Renderer> for TriangleScene {
    fn initialize(&mut self, ctx: &mut Renderer) -> anyhow::Result<()> {
        let module = shader::compile(&ctx.device, &shader::PASS_THROUGH);
        let material_buffer = ctx.create_uniform_buffer("Material Buffer", &Material { color: self.color });
        let (layout, bind_group) = ctx.create_uniform_bind_group("Material Bind Group", &material_buffer);
        let pipeline = ctx.create_pipeline(&PipelineDesc {
            label: "Triangle Pipeline",
            shader: &module,
            buffers: &[Vertex::desc()],
            bind_group_layouts: &[&layout],
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
        });

        self.gpu = Some(Gpu {
            pipeline,
            material_buffer,
            bind_group,
            triangle: Mesh::new_triangle(&ctx.device),
        });
        Ok(())
    }

    fn render(&mut self, ctx: &mut Renderer, frame: &SurfaceFrame, _info: &FrameInfo) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let mut encoder = ctx.create_encoder();
        {
            let mut pass = ctx.begin_pass(&mut encoder, frame, super::clear_color(0.1, 0.1, 0.2));
            pass.set_pipeline(&gpu.pipeline);
            pass.set_bind_group(0, &gpu.bind_group, &[]);
            gpu.triangle.draw(&mut pass);
        }
        ctx.submit(encoder);
    }

    fn release(&mut self, _ctx: &mut Renderer) {
        if let Some(gpu) = self.gpu.take() {
            gpu.triangle.destroy();
            gpu.material_buffer.destroy();
        }
    }
}
