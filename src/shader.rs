/// A WGSL program with `vs_main` and `fs_main` entry points.
#[derive(Debug, Clone, Copy)]
pub struct ShaderSource {
    pub label: &'static str,
    pub wgsl: &'static str,
}

pub const PASS_THROUGH: ShaderSource = ShaderSource {
    label: "pass_through",
    wgsl: include_str!("shaders/pass_through.wgsl"),
};

pub const INSTANCED: ShaderSource = ShaderSource {
    label: "instanced",
    wgsl: include_str!("shaders/instanced.wgsl"),
};

pub const GRID: ShaderSource = ShaderSource {
    label: "grid",
    wgsl: include_str!("shaders/grid.wgsl"),
};

/// Runs `f` inside a validation error scope and logs whatever it reports.
pub fn with_validation<T>(device: &wgpu::Device, what: &str, f: impl FnOnce() -> T) -> T {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        log::warn!("{what} errors:\n{error}");
    }
    value
}

pub fn compile(device: &wgpu::Device, source: &ShaderSource) -> wgpu::ShaderModule {
    log::debug!("Compiling shader program {}", source.label);
    with_validation(device, source.label, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(source.label),
            source: wgpu::ShaderSource::Wgsl(source.wgsl.into()),
        })
    })
}
