use std::sync::Arc;

use anyhow::Context;
use glam::IVec2;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use crate::input::{DEFAULT_WHEEL_UNITS_PER_STEP, InputEvent, Key, MouseButton, WheelInput};
use crate::renderer::Renderer;
use crate::surface::SurfaceHost;

impl Renderer {
    pub async fn from_winit_window(window: Arc<Window>) -> anyhow::Result<Self> {
        let window_size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;
        log::debug!("Winit surface created.");
        Self::new_with_surface(surface, instance, window_size.width, window_size.height).await
    }
}

/// A winit window as a [`SurfaceHost`].
pub struct WinitHost {
    window: Arc<Window>,
    occluded: bool,
}

impl WinitHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            occluded: false,
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn set_occluded(&mut self, occluded: bool) {
        self.occluded = occluded;
    }
}

impl SurfaceHost for WinitHost {
    type Context = Renderer;

    fn is_exposed(&self) -> bool {
        let size = self.window.inner_size();
        !self.occluded
            && !self.window.is_minimized().unwrap_or(false)
            && size.width > 0
            && size.height > 0
    }

    fn size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn create_context(&mut self) -> anyhow::Result<Renderer> {
        pollster::block_on(Renderer::from_winit_window(self.window.clone()))
    }

    fn schedule_update(&mut self) {
        self.window.request_redraw();
    }
}

/// Translates a winit `WindowEvent` into an `InputEvent`.
///
/// `cursor` is the last known cursor position; winit does not report it with
/// button presses. Returns `None` for events the input tracker has no use for.
pub fn translate_window_event(event: &WindowEvent, cursor: IVec2) -> Option<InputEvent> {
    match event {
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved(IVec2::new(
            position.x.round() as i32,
            position.y.round() as i32,
        ))),

        WindowEvent::MouseInput { state, button, .. } => {
            let button = map_mouse_button(*button);
            Some(match state {
                ElementState::Pressed => InputEvent::ButtonDown {
                    button,
                    position: cursor,
                },
                ElementState::Released => InputEvent::ButtonUp { button },
            })
        }

        WindowEvent::MouseWheel { delta, .. } => Some(InputEvent::Wheel(map_wheel(*delta))),

        WindowEvent::Focused(false) => Some(InputEvent::FocusLost),

        WindowEvent::KeyboardInput { event, .. } => {
            let key = map_key(event.physical_key);
            Some(match event.state {
                ElementState::Pressed => InputEvent::KeyDown(key),
                ElementState::Released => InputEvent::KeyUp(key),
            })
        }

        _ => None,
    }
}

/// Line deltas count notches, reported as the angle a notched wheel would turn.
fn map_wheel(delta: MouseScrollDelta) -> WheelInput {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => {
            WheelInput::angle((y * DEFAULT_WHEEL_UNITS_PER_STEP as f32).round() as i32)
        }
        MouseScrollDelta::PixelDelta(p) => WheelInput::pixels(p.y.round() as i32),
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(n) => MouseButton::Other(n),
    }
}

fn map_key(key: PhysicalKey) -> Key {
    match key {
        PhysicalKey::Code(code) => match code {
            KeyCode::KeyW => Key::W,
            KeyCode::KeyA => Key::A,
            KeyCode::KeyS => Key::S,
            KeyCode::KeyD => Key::D,
            KeyCode::KeyQ => Key::Q,
            KeyCode::KeyE => Key::E,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
            KeyCode::Escape => Key::Escape,
            // the tutorials never look at other keys individually
            _ => Key::Other,
        },
        PhysicalKey::Unidentified(_) => Key::Other,
    }
}
