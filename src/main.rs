use std::sync::Arc;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use surface_tutorials::{
    cli::Cli,
    config::AppConfig,
    input::{InputEvent, Key},
    logging::init_logging,
    renderer::Renderer,
    surface::{RenderSurface, Scene},
    tutorials::Tutorial,
    winit_integration::{WinitHost, translate_window_event},
};

type TutorialSurface = RenderSurface<WinitHost, Box<dyn Scene<Renderer>>>;

pub struct App {
    config: AppConfig,
    tutorial: Tutorial,
    surface: Option<TutorialSurface>,
    cursor: glam::IVec2,
}

impl App {
    pub fn new(config: AppConfig, tutorial: Tutorial) -> Self {
        Self {
            config,
            tutorial,
            surface: None,
            cursor: glam::IVec2::ZERO,
        }
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        // scene resources go before the window and device
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }
        let window_attributes = Window::default_attributes()
            .with_title(self.config.surface.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.surface.width,
                self.config.surface.height,
            ));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Unable to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        log::info!("Running tutorial {}", self.tutorial);

        let scene = self.tutorial.build(self.config.input);
        let mut surface = RenderSurface::new(WinitHost::new(window), scene);
        surface.request_redraw();
        self.surface = Some(surface);
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            self.close(event_loop);
            return;
        }
        let Some(surface) = &mut self.surface else {
            return;
        };

        match event {
            WindowEvent::Occluded(occluded) => {
                surface.host_mut().set_occluded(occluded);
                if !occluded {
                    surface.on_exposed();
                }
            }
            WindowEvent::Resized(size) => surface.on_resized(size.width, size.height),
            WindowEvent::RedrawRequested => surface.on_update_request(),
            event => {
                let Some(input) = translate_window_event(&event, self.cursor) else {
                    return;
                };
                match input {
                    InputEvent::CursorMoved(position) => self.cursor = position,
                    InputEvent::KeyDown(Key::Escape) => {
                        self.close(event_loop);
                        return;
                    }
                    _ => {}
                }
                surface.handle_input(&input);
            }
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.app_config();
    init_logging(&config.logging);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, cli.tutorial);
    event_loop.run_app(&mut app)?;

    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    run()
}
