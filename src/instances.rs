use super::renderer::Instance;

/// Builds the model matrix and colour of one drawn instance.
#[derive(Debug, Clone, Copy)]
pub struct InstanceBuilder {
    pub position: glam::Vec3,
    pub rotation: glam::Quat,
    pub scale: glam::Vec3,
    pub color: glam::Vec4,
}

impl Default for InstanceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceBuilder {
    pub fn new() -> Self {
        Self {
            position: glam::Vec3::ZERO,
            rotation: glam::Quat::IDENTITY,
            scale: glam::Vec3::ONE,
            color: glam::Vec4::ONE,
        }
    }

    pub fn with_position(self, position: glam::Vec3) -> Self {
        Self { position, ..self }
    }

    /// Rotation of `degrees` around `axis`. A zero axis leaves the rotation unchanged.
    pub fn with_rotation(self, degrees: f32, axis: glam::Vec3) -> Self {
        match axis.try_normalize() {
            Some(axis) => Self {
                rotation: glam::Quat::from_axis_angle(axis, degrees.to_radians()),
                ..self
            },
            None => self,
        }
    }

    pub fn with_scale(self, scale: glam::Vec3) -> Self {
        Self { scale, ..self }
    }

    pub fn with_color(self, r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            color: glam::Vec4::new(r, g, b, a),
            ..self
        }
    }

    pub fn with_color_u8(self, r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            color: glam::Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0,
            ..self
        }
    }

    pub fn build(self) -> Instance {
        let InstanceBuilder {
            position,
            rotation,
            scale,
            color,
        } = self;

        Instance {
            model_matrix: glam::Mat4::from_scale_rotation_translation(scale, rotation, position),
            color,
        }
    }
}
