use crate::camera::{Camera, FlyCamera, Lens};
use crate::input::{InputConfig, InputEvent, InputTracker, Key, MouseButton};
use crate::instances::InstanceBuilder;
use crate::mesh::{Mesh, Vertex};
use crate::renderer::{Instance, PipelineDesc, Renderer, SurfaceFrame, Uniforms};
use crate::shader;
use crate::surface::{FrameInfo, Scene};

const MOVEMENT_KEYS: [Key; 6] = [Key::W, Key::A, Key::S, Key::D, Key::Q, Key::E];
const TRIGGER: MouseButton = MouseButton::Right;

const TRANSLATION_SPEED: f32 = 0.8;
const TRANSLATION_SPEED_SLOW: f32 = 0.1;
const WHEEL_SPEED: f32 = 8.0;
const WHEEL_SPEED_SLOW: f32 = 0.8;
/// Degrees per pixel of cursor movement.
const ROTATION_SPEED: f32 = 0.4;

const GRID_HALF_EXTENT: u32 = 50;
const GRID_SPACING: f32 = 5.0;
const GRID_COLOR: glam::Vec4 = glam::Vec4::new(0.5, 0.5, 0.7, 1.0);
const BACK_COLOR: glam::Vec4 = glam::Vec4::new(0.1, 0.15, 0.3, 1.0);

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct GridUniforms {
    world_to_view: glam::Mat4,
    grid_color: glam::Vec4,
    back_color: glam::Vec4,
    params: glam::Vec4,
}

struct Gpu {
    box_pipeline: wgpu::RenderPipeline,
    box_uniforms: wgpu::Buffer,
    box_bind_group: wgpu::BindGroup,
    grid_pipeline: wgpu::RenderPipeline,
    grid_uniforms: wgpu::Buffer,
    grid_bind_group: wgpu::BindGroup,
    boxes: Mesh,
    grid: Mesh,
}

/// Boxes standing on a ground grid, explored with a fly camera.
///
/// Hold the right mouse button, then W/S/A/D/Q/E to move (Shift slows down)
/// and move the mouse to look around. The wheel moves forward/backward.
pub struct SceneView {
    input: InputTracker,
    input_received: bool,
    camera: FlyCamera,
    gpu: Option<Gpu>,
}

impl SceneView {
    pub fn new(input: InputConfig) -> Self {
        let mut tracker = InputTracker::new(input);
        for key in MOVEMENT_KEYS {
            tracker.add_recognized_key(key);
        }
        tracker.add_recognized_key(Key::Shift);

        let mut camera = FlyCamera::new(Lens::new(45.0, 0.1, 1000.0));
        // back and up, looking slightly down and to the right
        camera.translate(glam::Vec3::new(-50.0, 100.0, 150.0));
        camera.rotate(-30.0, camera.right());
        camera.rotate(-25.0, glam::Vec3::Y);

        Self {
            input: tracker,
            input_received: false,
            camera,
            gpu: None,
        }
    }

    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    pub fn boxes() -> Vec<Instance> {
        let palette = [
            (230, 90, 70),
            (90, 200, 120),
            (80, 140, 230),
            (230, 200, 80),
        ];
        let mut instances = Vec::new();
        for row in 0..5 {
            for col in 0..5 {
                let index = row * 5 + col;
                let height = 4.0 + ((index * 7) % 5) as f32 * 6.0;
                let (r, g, b) = palette[index % palette.len()];
                instances.push(
                    InstanceBuilder::new()
                        .with_position(glam::Vec3::new(
                            (col as f32 - 2.0) * 20.0,
                            height / 2.0,
                            (row as f32 - 2.0) * 20.0,
                        ))
                        .with_scale(glam::Vec3::new(8.0, height, 8.0))
                        .with_color_u8(r, g, b, 255)
                        .build(),
                );
            }
        }
        instances
    }

    fn is_moving(&self) -> bool {
        self.input.is_down(TRIGGER) && MOVEMENT_KEYS.iter().any(|k| self.input.key_down(*k))
    }

    // Decides whether the accumulated input needs a repaint.
    fn check_input(&mut self) -> bool {
        let needs_update = (self.input.is_down(TRIGGER)
            && (self.is_moving() || self.input.has_cursor_moved(TRIGGER)))
            || self.input.wheel_delta() != 0;
        if needs_update {
            self.input_received = true;
        }
        needs_update
    }

    fn process_input(&mut self) {
        self.input_received = false;
        let slow = self.input.key_down(Key::Shift);

        if self.input.is_down(TRIGGER) {
            let mut translation = glam::Vec3::ZERO;
            if self.input.key_down(Key::W) {
                translation += self.camera.forward();
            }
            if self.input.key_down(Key::S) {
                translation -= self.camera.forward();
            }
            if self.input.key_down(Key::A) {
                translation -= self.camera.right();
            }
            if self.input.key_down(Key::D) {
                translation += self.camera.right();
            }
            if self.input.key_down(Key::Q) {
                translation -= self.camera.up();
            }
            if self.input.key_down(Key::E) {
                translation += self.camera.up();
            }
            let speed = if slow { TRANSLATION_SPEED_SLOW } else { TRANSLATION_SPEED };
            if translation != glam::Vec3::ZERO {
                self.camera.translate(speed * translation);
            }

            let cursor = self.input.cursor_position();
            let delta = self.input.reset_cursor_delta(cursor).as_vec2();
            if delta != glam::Vec2::ZERO {
                self.camera.rotate(-ROTATION_SPEED * delta.x, glam::Vec3::Y);
                self.camera.rotate(-ROTATION_SPEED * delta.y, self.camera.right());
            }
        }

        let wheel = self.input.reset_wheel_delta();
        if wheel != 0 {
            let speed = if slow { WHEEL_SPEED_SLOW } else { WHEEL_SPEED };
            self.camera.translate(wheel as f32 * speed * self.camera.forward());
        }

        self.input.clear_was_pressed_states();
    }

    /// Applies pending input to the camera. Called at the start of every frame.
    pub fn advance(&mut self) {
        if self.input_received || self.is_moving() {
            self.process_input();
        }
    }

    fn grid_uniforms(&self) -> GridUniforms {
        GridUniforms {
            world_to_view: self.camera.view_proj(),
            grid_color: GRID_COLOR,
            back_color: BACK_COLOR,
            params: glam::Vec4::new(GRID_HALF_EXTENT as f32 * GRID_SPACING, 0.0, 0.0, 0.0),
        }
    }
}

impl Scene<Renderer> for SceneView {
    fn initialize(&mut self, ctx: &mut Renderer) -> anyhow::Result<()> {
        self.camera.update_aspect(ctx.size());

        let box_module = shader::compile(&ctx.device, &shader::INSTANCED);
        let box_uniforms = ctx.create_uniform_buffer("Box Uniforms", &Uniforms::from_camera(&self.camera));
        let (box_layout, box_bind_group) = ctx.create_uniform_bind_group("Box Bind Group", &box_uniforms);
        let box_pipeline = ctx.create_pipeline(&PipelineDesc {
            label: "Box Pipeline",
            shader: &box_module,
            buffers: &[Vertex::desc(), Instance::desc()],
            bind_group_layouts: &[&box_layout],
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
        });

        let grid_module = shader::compile(&ctx.device, &shader::GRID);
        let grid_uniforms = ctx.create_uniform_buffer("Grid Uniforms", &self.grid_uniforms());
        let (grid_layout, grid_bind_group) = ctx.create_uniform_bind_group("Grid Bind Group", &grid_uniforms);
        let grid_pipeline = ctx.create_pipeline(&PipelineDesc {
            label: "Grid Pipeline",
            shader: &grid_module,
            buffers: &[Vertex::desc()],
            bind_group_layouts: &[&grid_layout],
            topology: wgpu::PrimitiveTopology::LineList,
            cull_mode: None,
        });

        let mut boxes = Mesh::new_cube(&ctx.device);
        boxes.write_instances(&ctx.device, &ctx.queue, &Self::boxes());

        self.gpu = Some(Gpu {
            box_pipeline,
            box_uniforms,
            box_bind_group,
            grid_pipeline,
            grid_uniforms,
            grid_bind_group,
            boxes,
            grid: Mesh::new_grid(&ctx.device, GRID_HALF_EXTENT, GRID_SPACING),
        });
        Ok(())
    }

    fn render(&mut self, ctx: &mut Renderer, frame: &SurfaceFrame, info: &FrameInfo) {
        self.advance();
        let Some(gpu) = &self.gpu else {
            return;
        };
        log::trace!("Rendering frame {} at {}x{}", info.number, info.width, info.height);
        ctx.write_uniform(&gpu.box_uniforms, &Uniforms::from_camera(&self.camera));
        ctx.write_uniform(&gpu.grid_uniforms, &self.grid_uniforms());

        let back = BACK_COLOR.as_dvec4();
        let mut encoder = ctx.create_encoder();
        {
            let mut pass = ctx.begin_pass(&mut encoder, frame, super::clear_color(back.x, back.y, back.z));
            pass.set_pipeline(&gpu.box_pipeline);
            pass.set_bind_group(0, &gpu.box_bind_group, &[]);
            gpu.boxes.draw_instanced(&mut pass);

            pass.set_pipeline(&gpu.grid_pipeline);
            pass.set_bind_group(0, &gpu.grid_bind_group, &[]);
            gpu.grid.draw(&mut pass);
        }
        ctx.submit(encoder);
    }

    fn resize(&mut self, _ctx: &mut Renderer, width: u32, height: u32) {
        self.camera.update_aspect(glam::UVec2::new(width, height));
    }

    fn release(&mut self, _ctx: &mut Renderer) {
        if let Some(gpu) = self.gpu.take() {
            gpu.boxes.destroy();
            gpu.grid.destroy();
            gpu.box_uniforms.destroy();
            gpu.grid_uniforms.destroy();
        }
    }

    fn input(&mut self, event: &InputEvent) -> bool {
        self.input.apply(event) && self.check_input()
    }

    fn is_animated(&self) -> bool {
        self.is_moving()
    }
}
