use clap::Parser;

use crate::config::{AppConfig, SurfaceConfig};
use crate::input::{DEFAULT_WHEEL_UNITS_PER_STEP, InputConfig};
use crate::logging::LoggingConfig;
use crate::tutorials::Tutorial;

#[derive(Parser, Debug)]
#[command(name = "main", about = "wgpu surface tutorials", version)]
pub struct Cli {
    /// Tutorial scene to run
    #[arg(long, value_enum, default_value_t = Tutorial::default())]
    pub tutorial: Tutorial,
    /// Initial window width in pixels
    #[arg(long, default_value_t = 640)]
    pub width: u32,
    /// Initial window height in pixels
    #[arg(long, default_value_t = 480)]
    pub height: u32,
    /// Window title (defaults to one derived from the tutorial)
    #[arg(long)]
    pub title: Option<String>,
    /// Wheel angle units that make up one step
    #[arg(long, default_value_t = DEFAULT_WHEEL_UNITS_PER_STEP)]
    pub wheel_units_per_step: i32,
    /// env_logger filter, overrides RUST_LOG
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            surface: SurfaceConfig {
                title: self
                    .title
                    .clone()
                    .unwrap_or_else(|| format!("{} ({})", SurfaceConfig::default().title, self.tutorial)),
                width: self.width,
                height: self.height,
            },
            input: InputConfig {
                wheel_units_per_step: self.wheel_units_per_step,
            },
            logging: LoggingConfig {
                filter: self.log_filter.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["main"]).unwrap();
        assert_eq!(cli.tutorial, Tutorial::Scene);
        let config = cli.app_config();
        assert_eq!(config.surface.width, 640);
        assert_eq!(config.surface.height, 480);
        assert_eq!(config.surface.title, "Surface Tutorials (scene)");
        assert_eq!(config.input.wheel_units_per_step, DEFAULT_WHEEL_UNITS_PER_STEP);
        assert!(config.logging.filter.is_none());
    }

    #[test]
    fn overrides() {
        let cli = Cli::try_parse_from([
            "main",
            "--tutorial",
            "cubes",
            "--width",
            "1024",
            "--title",
            "Orbit",
            "--wheel-units-per-step",
            "15",
            "--log-filter",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.tutorial, Tutorial::Cubes);
        let config = cli.app_config();
        assert_eq!(config.surface.width, 1024);
        assert_eq!(config.surface.title, "Orbit");
        assert_eq!(config.input.wheel_units_per_step, 15);
        assert_eq!(config.logging.filter.as_deref(), Some("debug"));
    }

    #[test]
    fn unknown_tutorial_is_rejected() {
        assert!(Cli::try_parse_from(["main", "--tutorial", "teapot"]).is_err());
    }
}
