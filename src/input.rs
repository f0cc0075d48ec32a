use std::collections::HashMap;

use glam::IVec2;

/// Angle-delta units reported for one wheel notch (eighths of a degree, 15° per notch).
pub const DEFAULT_WHEEL_UNITS_PER_STEP: i32 = 8 * 15;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ButtonState {
    #[default]
    NotPressed,
    Held,
    /// Released since the last call to `clear_was_pressed_states`.
    WasPressed,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Keys the tutorials care about. Everything else maps to `Other`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    Shift,
    Escape,
    Other,
}

/// Raw vertical wheel movement as delivered by the platform.
///
/// `pixel` is set by high precision devices (touchpads), `angle` by notched
/// wheels in eighths of a degree. Either may be zero.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct WheelInput {
    pub pixel: i32,
    pub angle: i32,
}

impl WheelInput {
    pub fn pixels(pixel: i32) -> Self {
        Self { pixel, angle: 0 }
    }

    pub fn angle(angle: i32) -> Self {
        Self { pixel: 0, angle }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputEvent {
    ButtonDown { button: MouseButton, position: IVec2 },
    ButtonUp { button: MouseButton },
    KeyDown(Key),
    KeyUp(Key),
    CursorMoved(IVec2),
    Wheel(WheelInput),
    /// The window lost keyboard/mouse focus; releases may never arrive.
    FocusLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    /// Divisor turning angle deltas into wheel steps.
    pub wheel_units_per_step: i32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            wheel_units_per_step: DEFAULT_WHEEL_UNITS_PER_STEP,
        }
    }
}

#[derive(Debug)]
pub struct InputTracker {
    config: InputConfig,
    // Only recognized keys/buttons have an entry.
    keys: HashMap<Key, ButtonState>,
    buttons: HashMap<MouseButton, ButtonState>,
    anchor: IVec2,
    cursor: IVec2,
    wheel_delta: i32,
    // Angle units not yet making up a whole step.
    wheel_remainder: i32,
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

impl InputTracker {
    /// Creates a tracker recognizing the left and right mouse buttons.
    pub fn new(config: InputConfig) -> Self {
        let mut config = config;
        if config.wheel_units_per_step <= 0 {
            log::warn!(
                "Invalid wheel_units_per_step {}, using {}",
                config.wheel_units_per_step,
                DEFAULT_WHEEL_UNITS_PER_STEP
            );
            config.wheel_units_per_step = DEFAULT_WHEEL_UNITS_PER_STEP;
        }
        let buttons = [MouseButton::Left, MouseButton::Right]
            .into_iter()
            .map(|b| (b, ButtonState::NotPressed))
            .collect();
        Self {
            config,
            keys: HashMap::new(),
            buttons,
            anchor: IVec2::ZERO,
            cursor: IVec2::ZERO,
            wheel_delta: 0,
            wheel_remainder: 0,
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn add_recognized_key(&mut self, key: Key) {
        self.keys.entry(key).or_default();
    }

    pub fn add_recognized_button(&mut self, button: MouseButton) {
        self.buttons.entry(button).or_default();
    }

    /// Dispatches a platform event. Returns `true` if any tracked state changed.
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::ButtonDown { button, position } => self.on_button_down(button, position),
            InputEvent::ButtonUp { button } => self.on_button_up(button),
            InputEvent::KeyDown(key) => self.on_key_down(key),
            InputEvent::KeyUp(key) => self.on_key_up(key),
            InputEvent::CursorMoved(position) => {
                self.on_cursor_moved(position);
                true
            }
            InputEvent::Wheel(raw) => self.on_wheel(raw),
            InputEvent::FocusLost => self.release_all(),
        }
    }

    pub fn on_button_down(&mut self, button: MouseButton, position: IVec2) -> bool {
        match self.buttons.get_mut(&button) {
            Some(state) => {
                *state = ButtonState::Held;
                self.anchor = position;
                self.cursor = position;
                true
            }
            None => false,
        }
    }

    pub fn on_button_up(&mut self, button: MouseButton) -> bool {
        match self.buttons.get_mut(&button) {
            Some(state) => {
                *state = ButtonState::WasPressed;
                true
            }
            None => false,
        }
    }

    pub fn is_down(&self, button: MouseButton) -> bool {
        self.buttons.get(&button) == Some(&ButtonState::Held)
    }

    pub fn button_was_pressed(&self, button: MouseButton) -> bool {
        self.buttons.get(&button) == Some(&ButtonState::WasPressed)
    }

    pub fn button_state(&self, button: MouseButton) -> Option<ButtonState> {
        self.buttons.get(&button).copied()
    }

    pub fn on_key_down(&mut self, key: Key) -> bool {
        match self.keys.get_mut(&key) {
            Some(state) => {
                *state = ButtonState::Held;
                true
            }
            None => false,
        }
    }

    pub fn on_key_up(&mut self, key: Key) -> bool {
        match self.keys.get_mut(&key) {
            Some(state) => {
                *state = ButtonState::WasPressed;
                true
            }
            None => false,
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys.get(&key) == Some(&ButtonState::Held)
    }

    pub fn key_was_pressed(&self, key: Key) -> bool {
        self.keys.get(&key) == Some(&ButtonState::WasPressed)
    }

    /// Resets every `WasPressed` key and button to `NotPressed`. `Held` is left alone.
    pub fn clear_was_pressed_states(&mut self) {
        for state in self.keys.values_mut().chain(self.buttons.values_mut()) {
            if *state == ButtonState::WasPressed {
                *state = ButtonState::NotPressed;
            }
        }
    }

    /// Treats every held key and button as released. Returns `true` if any was held.
    pub fn release_all(&mut self) -> bool {
        let mut released = false;
        for state in self.keys.values_mut().chain(self.buttons.values_mut()) {
            if *state == ButtonState::Held {
                *state = ButtonState::WasPressed;
                released = true;
            }
        }
        released
    }

    pub fn on_cursor_moved(&mut self, position: IVec2) {
        self.cursor = position;
    }

    /// Last known cursor position.
    pub fn cursor_position(&self) -> IVec2 {
        self.cursor
    }

    /// Position of the last button press, moved forward by `reset_cursor_delta`.
    pub fn anchor(&self) -> IVec2 {
        self.anchor
    }

    /// True if `button` is held and the cursor has left the anchor.
    pub fn has_cursor_moved(&self, button: MouseButton) -> bool {
        self.is_down(button) && self.cursor != self.anchor
    }

    pub fn reset_cursor_delta(&mut self, current: IVec2) -> IVec2 {
        let delta = current - self.anchor;
        self.anchor = current;
        delta
    }

    /// Accumulates wheel movement. Pixel deltas win over angle deltas.
    ///
    /// Angle deltas smaller than a step are kept until they add up to one.
    pub fn on_wheel(&mut self, raw: WheelInput) -> bool {
        if raw.pixel != 0 {
            self.wheel_delta += raw.pixel;
        } else if raw.angle != 0 {
            let total = self.wheel_remainder + raw.angle;
            self.wheel_delta += total / self.config.wheel_units_per_step;
            self.wheel_remainder = total % self.config.wheel_units_per_step;
        } else {
            return false;
        }
        true
    }

    pub fn wheel_delta(&self) -> i32 {
        self.wheel_delta
    }

    pub fn reset_wheel_delta(&mut self) -> i32 {
        std::mem::take(&mut self.wheel_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> InputTracker {
        let mut input = InputTracker::default();
        input.add_recognized_key(Key::W);
        input.add_recognized_key(Key::Shift);
        input
    }

    #[test]
    fn button_held_until_release() {
        let mut input = tracker();
        assert!(!input.is_down(MouseButton::Left));

        assert!(input.on_button_down(MouseButton::Left, IVec2::new(3, 4)));
        assert!(input.is_down(MouseButton::Left));
        assert_eq!(input.anchor(), IVec2::new(3, 4));

        // Unrelated traffic and clears do not end the hold
        input.on_cursor_moved(IVec2::new(40, 40));
        input.clear_was_pressed_states();
        assert!(input.is_down(MouseButton::Left));
        assert!(!input.is_down(MouseButton::Right));

        assert!(input.on_button_up(MouseButton::Left));
        assert!(!input.is_down(MouseButton::Left));
        assert!(input.button_was_pressed(MouseButton::Left));
    }

    #[test]
    fn was_pressed_cleared_only_explicitly() {
        let mut input = tracker();
        input.on_key_down(Key::W);
        input.on_key_up(Key::W);
        assert!(input.key_was_pressed(Key::W));
        assert!(input.key_was_pressed(Key::W), "querying must not clear the edge");

        input.clear_was_pressed_states();
        assert!(!input.key_was_pressed(Key::W));
        assert_eq!(input.button_state(MouseButton::Left), Some(ButtonState::NotPressed));
    }

    #[test]
    fn unrecognized_inputs_are_ignored() {
        let mut input = tracker();
        assert!(!input.on_key_down(Key::Q));
        assert!(!input.key_down(Key::Q));
        assert!(!input.on_key_up(Key::Q));
        assert!(!input.key_was_pressed(Key::Q));

        assert!(!input.on_button_down(MouseButton::Middle, IVec2::new(7, 7)));
        assert!(!input.is_down(MouseButton::Middle));
        assert_eq!(input.anchor(), IVec2::ZERO, "anchor untouched by ignored press");
        assert_eq!(input.button_state(MouseButton::Middle), None);

        input.add_recognized_button(MouseButton::Middle);
        assert!(input.on_button_down(MouseButton::Middle, IVec2::new(7, 7)));
        assert!(input.is_down(MouseButton::Middle));
    }

    #[test]
    fn cursor_delta_from_drag_anchor() {
        let mut input = tracker();
        input.on_button_down(MouseButton::Left, IVec2::new(10, 10));
        input.on_cursor_moved(IVec2::new(15, 12));
        assert!(input.has_cursor_moved(MouseButton::Left));

        let current = input.cursor_position();
        assert_eq!(input.reset_cursor_delta(current), IVec2::new(5, 2));
        assert_eq!(input.reset_cursor_delta(current), IVec2::ZERO);
        assert!(!input.has_cursor_moved(MouseButton::Left));
    }

    #[test]
    fn wheel_accumulates_until_reset() {
        let mut input = tracker();
        assert!(input.on_wheel(WheelInput::pixels(3)));
        assert!(input.on_wheel(WheelInput::pixels(-1)));
        assert!(input.on_wheel(WheelInput::angle(240)));
        assert_eq!(input.wheel_delta(), 4);

        assert_eq!(input.reset_wheel_delta(), 4);
        assert_eq!(input.reset_wheel_delta(), 0);
        assert_eq!(input.reset_wheel_delta(), 0);
    }

    #[test]
    fn wheel_prefers_pixel_delta() {
        let mut input = tracker();
        input.on_wheel(WheelInput { pixel: 2, angle: 480 });
        assert_eq!(input.reset_wheel_delta(), 2);

        assert!(!input.on_wheel(WheelInput::default()));
        assert_eq!(input.reset_wheel_delta(), 0);
    }

    #[test]
    fn wheel_step_size_is_configurable() {
        let mut input = InputTracker::new(InputConfig {
            wheel_units_per_step: 40,
        });
        input.on_wheel(WheelInput::angle(-120));
        assert_eq!(input.reset_wheel_delta(), -3);

        let fallback = InputTracker::new(InputConfig {
            wheel_units_per_step: 0,
        });
        assert_eq!(
            fallback.config().wheel_units_per_step,
            DEFAULT_WHEEL_UNITS_PER_STEP
        );
    }

    #[test]
    fn partial_wheel_notches_add_up() {
        let mut input = tracker();
        for _ in 0..7 {
            assert!(input.on_wheel(WheelInput::angle(15)));
        }
        assert_eq!(input.wheel_delta(), 0);
        input.on_wheel(WheelInput::angle(15));
        assert_eq!(input.reset_wheel_delta(), 1);

        input.on_wheel(WheelInput::angle(-60));
        input.on_wheel(WheelInput::angle(-90));
        assert_eq!(input.reset_wheel_delta(), -1);
        input.on_wheel(WheelInput::angle(-90));
        assert_eq!(input.reset_wheel_delta(), -1);
    }

    #[test]
    fn focus_loss_releases_held_inputs() {
        let mut input = tracker();
        input.on_button_down(MouseButton::Right, IVec2::ZERO);
        input.on_key_down(Key::W);

        assert!(input.apply(&InputEvent::FocusLost));
        assert!(!input.is_down(MouseButton::Right));
        assert!(!input.key_down(Key::W));
        assert!(input.key_was_pressed(Key::W));
        assert!(input.button_was_pressed(MouseButton::Right));

        input.clear_was_pressed_states();
        assert!(!input.apply(&InputEvent::FocusLost));
    }

    #[test]
    fn apply_dispatches_events() {
        let mut input = tracker();
        let events = [
            InputEvent::ButtonDown {
                button: MouseButton::Right,
                position: IVec2::new(1, 1),
            },
            InputEvent::KeyDown(Key::Shift),
            InputEvent::CursorMoved(IVec2::new(4, 5)),
            InputEvent::Wheel(WheelInput::angle(120)),
        ];
        assert!(events.iter().all(|e| input.apply(e)));
        assert!(input.is_down(MouseButton::Right));
        assert!(input.key_down(Key::Shift));
        assert_eq!(input.cursor_position(), IVec2::new(4, 5));
        assert_eq!(input.wheel_delta(), 1);

        assert!(!input.apply(&InputEvent::KeyDown(Key::Escape)));
        assert!(input.apply(&InputEvent::ButtonUp {
            button: MouseButton::Right
        }));
        assert!(!input.is_down(MouseButton::Right));
    }
}
