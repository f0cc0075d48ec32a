use crate::camera::{Lens, PanOrbitCamera};
use crate::input::{InputConfig, InputEvent, InputTracker, MouseButton};
use crate::instances::InstanceBuilder;
use crate::mesh::{Mesh, Vertex};
use crate::renderer::{Instance, PipelineDesc, Renderer, SurfaceFrame, Uniforms};
use crate::shader;
use crate::surface::{FrameInfo, Scene};

const CUBE_POSITIONS: [glam::Vec3; 10] = [
    glam::Vec3::new(0.0, 0.0, 0.0),
    glam::Vec3::new(2.0, 5.0, -15.0),
    glam::Vec3::new(-1.5, -2.2, -2.5),
    glam::Vec3::new(-3.8, -2.0, -12.3),
    glam::Vec3::new(2.4, -0.4, -3.5),
    glam::Vec3::new(-1.7, 3.0, -7.5),
    glam::Vec3::new(1.3, -2.0, -2.5),
    glam::Vec3::new(1.5, 2.0, -2.5),
    glam::Vec3::new(1.5, 0.2, -1.5),
    glam::Vec3::new(-1.3, 1.0, -1.5),
];

const ORBIT_RADIUS: f32 = 10.0;

struct Gpu {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    cube: Mesh,
}

/// A field of cubes seen from a camera circling the origin, one degree per frame.
///
/// Dragging with the left button offsets the orbit; the wheel zooms.
pub struct CubesScene {
    input: InputTracker,
    input_received: bool,
    camera: PanOrbitCamera,
    orbit_offset: glam::Vec2,
    gpu: Option<Gpu>,
}

impl CubesScene {
    pub fn new(input: InputConfig) -> Self {
        Self {
            input: InputTracker::new(input),
            input_received: false,
            camera: PanOrbitCamera::new(Lens::new(45.0, 0.1, 100.0), ORBIT_RADIUS),
            orbit_offset: glam::Vec2::ZERO,
            gpu: None,
        }
    }

    pub fn camera(&self) -> &PanOrbitCamera {
        &self.camera
    }

    pub fn instances() -> Vec<Instance> {
        CUBE_POSITIONS
            .iter()
            .enumerate()
            .map(|(i, position)| {
                InstanceBuilder::new()
                    .with_position(*position)
                    .with_rotation(20.0 * i as f32, glam::Vec3::new(1.0, 0.3, 0.5))
                    .build()
            })
            .collect()
    }

    fn check_input(&mut self) -> bool {
        if self.input.has_cursor_moved(MouseButton::Left) || self.input.wheel_delta() != 0 {
            self.input_received = true;
        }
        self.input_received
    }

    fn process_input(&mut self) {
        self.input_received = false;
        if self.input.is_down(MouseButton::Left) {
            let cursor = self.input.cursor_position();
            self.orbit_offset += self.input.reset_cursor_delta(cursor).as_vec2();
        }
        let wheel = self.input.reset_wheel_delta();
        if wheel != 0 {
            self.camera.zoom(wheel as f32);
        }
        self.input.clear_was_pressed_states();
    }

    /// Moves the camera to where it should be for `info`.
    pub fn advance(&mut self, info: &FrameInfo) {
        if self.input_received {
            self.process_input();
        }
        self.camera.angle_yaw = ((info.number % 360) as f32).to_radians();
        self.camera.angle_pitch = 0.0;
        self.camera.orbit(self.orbit_offset);
    }
}

impl Scene<Renderer> for CubesScene {
    fn initialize(&mut self, ctx: &mut Renderer) -> anyhow::Result<()> {
        let module = shader::compile(&ctx.device, &shader::INSTANCED);
        let uniform_buffer =
            ctx.create_uniform_buffer("Uniform Buffer", &Uniforms::from_camera(&self.camera));
        let (layout, bind_group) = ctx.create_uniform_bind_group("Uniforms Bind Group", &uniform_buffer);
        let pipeline = ctx.create_pipeline(&PipelineDesc {
            label: "Cubes Pipeline",
            shader: &module,
            buffers: &[Vertex::desc(), Instance::desc()],
            bind_group_layouts: &[&layout],
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
        });

        let mut cube = Mesh::new_cube(&ctx.device);
        cube.write_instances(&ctx.device, &ctx.queue, &Self::instances());
        self.camera.update_aspect(ctx.size());

        self.gpu = Some(Gpu {
            pipeline,
            uniform_buffer,
            bind_group,
            cube,
        });
        Ok(())
    }

    fn render(&mut self, ctx: &mut Renderer, frame: &SurfaceFrame, info: &FrameInfo) {
        self.advance(info);
        let Some(gpu) = &self.gpu else {
            return;
        };
        ctx.write_uniform(&gpu.uniform_buffer, &Uniforms::from_camera(&self.camera));

        let mut encoder = ctx.create_encoder();
        {
            let mut pass = ctx.begin_pass(&mut encoder, frame, super::clear_color(0.1, 0.1, 0.2));
            pass.set_pipeline(&gpu.pipeline);
            pass.set_bind_group(0, &gpu.bind_group, &[]);
            gpu.cube.draw_instanced(&mut pass);
        }
        ctx.submit(encoder);
    }

    fn resize(&mut self, _ctx: &mut Renderer, width: u32, height: u32) {
        self.camera.update_aspect(glam::UVec2::new(width, height));
    }

    fn release(&mut self, _ctx: &mut Renderer) {
        if let Some(gpu) = self.gpu.take() {
            gpu.cube.destroy();
            gpu.uniform_buffer.destroy();
        }
    }

    fn input(&mut self, event: &InputEvent) -> bool {
        self.input.apply(event) && self.check_input()
    }

    fn is_animated(&self) -> bool {
        true
    }
}
