pub trait Camera {
    fn view_matrix(&self) -> &glam::Mat4;
    fn proj_matrix(&self) -> &glam::Mat4;

    fn view_proj(&self) -> glam::Mat4 {
        *self.proj_matrix() * *self.view_matrix()
    }
}

/// Perspective lens shared by the cameras.
#[derive(Debug, Clone, Copy)]
pub struct Lens {
    pub fovy: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Lens {
    pub fn new(fovy_degrees: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fovy: fovy_degrees.to_radians(),
            z_near,
            z_far,
        }
    }

    pub fn projection(&self, window_size: glam::UVec2) -> glam::Mat4 {
        let aspect = if window_size.x == 0 || window_size.y == 0 {
            1.0
        } else {
            window_size.x as f32 / window_size.y as f32
        };
        glam::Mat4::perspective_rh(self.fovy, aspect, self.z_near, self.z_far)
    }
}

/// Orbits `target` at `distance`, Y up. Yaw 0 looks from +Z.
#[derive(Debug)]
pub struct PanOrbitCamera {
    pub target: glam::Vec3,
    pub distance: f32,
    pub angle_yaw: f32,
    pub angle_pitch: f32,
    pub distance_min: f32,
    pub distance_max: f32,
    pub angle_pitch_min: f32,
    pub angle_pitch_max: f32,
    pub mouse_speed: f32,
    pub zoom_speed: f32,
    lens: Lens,
    view_matrix: glam::Mat4,
    proj_matrix: glam::Mat4,
}

impl Camera for PanOrbitCamera {
    fn view_matrix(&self) -> &glam::Mat4 {
        &self.view_matrix
    }
    fn proj_matrix(&self) -> &glam::Mat4 {
        &self.proj_matrix
    }
}

impl PanOrbitCamera {
    pub fn new(lens: Lens, distance: f32) -> Self {
        use std::f32::consts::FRAC_PI_2;
        let mut cam = Self {
            target: glam::Vec3::ZERO,
            distance,
            angle_yaw: 0.0,
            angle_pitch: 0.0,
            angle_pitch_min: -FRAC_PI_2 + 0.01,
            angle_pitch_max: FRAC_PI_2 - 0.01,
            distance_min: 0.5,
            distance_max: 100.0,
            mouse_speed: 0.005,
            zoom_speed: 0.5,
            lens,
            view_matrix: glam::Mat4::IDENTITY,
            proj_matrix: lens.projection(glam::UVec2::new(16, 9)),
        };
        cam.update();
        cam
    }

    pub fn position(&self) -> glam::Vec3 {
        let cos_p = self.angle_pitch.cos();
        self.target
            + glam::Vec3::new(
                cos_p * self.angle_yaw.sin() * self.distance,
                self.angle_pitch.sin() * self.distance,
                cos_p * self.angle_yaw.cos() * self.distance,
            )
    }

    pub fn update(&mut self) {
        self.distance = self.distance.clamp(self.distance_min, self.distance_max);
        self.angle_pitch = self
            .angle_pitch
            .clamp(self.angle_pitch_min, self.angle_pitch_max);
        self.view_matrix = glam::Mat4::look_at_rh(self.position(), self.target, glam::Vec3::Y);
    }

    pub fn update_aspect(&mut self, window_size: glam::UVec2) {
        self.proj_matrix = self.lens.projection(window_size);
    }

    pub fn orbit(&mut self, mouse_delta: glam::Vec2) {
        log::trace!("Mouse Delta: {mouse_delta}");
        self.angle_yaw -= mouse_delta.x * self.mouse_speed;
        self.angle_pitch += mouse_delta.y * self.mouse_speed;
        self.update();
    }

    pub fn zoom(&mut self, mouse_scroll: f32) {
        log::trace!("Mouse Scroll: {mouse_scroll}");
        if mouse_scroll == 0.0 {
            return;
        }
        self.distance -= mouse_scroll * self.zoom_speed;
        self.update();
    }
}

/// Free-flying camera: a position plus an orientation, Y up.
#[derive(Debug)]
pub struct FlyCamera {
    position: glam::Vec3,
    rotation: glam::Quat,
    lens: Lens,
    view_matrix: glam::Mat4,
    proj_matrix: glam::Mat4,
}

impl Camera for FlyCamera {
    fn view_matrix(&self) -> &glam::Mat4 {
        &self.view_matrix
    }
    fn proj_matrix(&self) -> &glam::Mat4 {
        &self.proj_matrix
    }
}

impl FlyCamera {
    pub fn new(lens: Lens) -> Self {
        let mut cam = Self {
            position: glam::Vec3::ZERO,
            rotation: glam::Quat::IDENTITY,
            lens,
            view_matrix: glam::Mat4::IDENTITY,
            proj_matrix: lens.projection(glam::UVec2::new(16, 9)),
        };
        cam.update();
        cam
    }

    pub fn position(&self) -> glam::Vec3 {
        self.position
    }

    pub fn forward(&self) -> glam::Vec3 {
        self.rotation * glam::Vec3::NEG_Z
    }

    pub fn right(&self) -> glam::Vec3 {
        self.rotation * glam::Vec3::X
    }

    pub fn up(&self) -> glam::Vec3 {
        self.rotation * glam::Vec3::Y
    }

    pub fn translate(&mut self, offset: glam::Vec3) {
        self.position += offset;
        self.update();
    }

    /// Rotates by `degrees` around the world-space `axis`.
    pub fn rotate(&mut self, degrees: f32, axis: glam::Vec3) {
        let Some(axis) = axis.try_normalize() else {
            return;
        };
        self.rotation = (glam::Quat::from_axis_angle(axis, degrees.to_radians()) * self.rotation).normalize();
        self.update();
    }

    pub fn update_aspect(&mut self, window_size: glam::UVec2) {
        self.proj_matrix = self.lens.projection(window_size);
    }

    fn update(&mut self) {
        self.view_matrix = glam::Mat4::from_quat(self.rotation.conjugate())
            * glam::Mat4::from_translation(-self.position);
    }
}
