use crate::input::InputConfig;
use crate::logging::LoggingConfig;

/// Window settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            title: "Surface Tutorials".to_string(),
            width: 640,
            height: 480,
        }
    }
}

/// Everything a tutorial run needs, usually filled from the command line.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub surface: SurfaceConfig,
    pub input: InputConfig,
    pub logging: LoggingConfig,
}
