pub mod camera;
pub mod cli;
pub mod config;
pub mod input;
pub mod instances;
pub mod logging;
pub mod mesh;
pub mod primitives;
pub mod renderer;
pub mod shader;
pub mod surface;
pub mod tutorials;

#[cfg(feature = "winit")]
pub mod winit_integration;
