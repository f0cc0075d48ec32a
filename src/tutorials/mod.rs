mod cubes;
mod scene_view;
mod triangle;

pub use cubes::CubesScene;
pub use scene_view::SceneView;
pub use triangle::TriangleScene;

use std::fmt;

use crate::input::InputConfig;
use crate::renderer::Renderer;
use crate::surface::Scene;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Tutorial {
    /// A single triangle in one colour
    Triangle,
    /// Ten rotated cubes seen from a circling camera
    Cubes,
    /// Boxes on a grid with a fly camera (WASD/QE while holding the right button)
    #[default]
    Scene,
}

impl Tutorial {
    pub fn build(self, input: InputConfig) -> Box<dyn Scene<Renderer>> {
        match self {
            Tutorial::Triangle => Box::new(TriangleScene::new()),
            Tutorial::Cubes => Box::new(CubesScene::new(input)),
            Tutorial::Scene => Box::new(SceneView::new(input)),
        }
    }
}

impl fmt::Display for Tutorial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tutorial::Triangle => "triangle",
            Tutorial::Cubes => "cubes",
            Tutorial::Scene => "scene",
        };
        f.write_str(name)
    }
}

fn clear_color(r: f64, g: f64, b: f64) -> wgpu::Color {
    wgpu::Color { r, g, b, a: 1.0 }
}
