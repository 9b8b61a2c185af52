use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, TouchPhase as WinitTouchPhase, WindowEvent};
use winit::keyboard::{Key as WinitKey, NamedKey};

use crate::input::{InputEvent, Key, TouchPhase};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// `scale_factor` is the window's DPI scale; positions and sizes come out in
/// logical pixels. Returns `None` for events the input subsystem ignores
/// (including key releases).
pub fn translate_window_event(scale_factor: f64, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            if event.state != ElementState::Pressed {
                return None;
            }
            Some(InputEvent::KeyDown {
                key: map_logical_key(&event.logical_key),
                repeat: event.repeat,
            })
        }

        WindowEvent::Touch(touch) => {
            let (x, y) = to_logical(scale_factor, touch.location);
            Some(InputEvent::Touch {
                id: touch.id,
                phase: map_touch_phase(touch.phase),
                x,
                y,
            })
        }

        WindowEvent::Resized(size) => {
            let (width, height) = size_to_logical(scale_factor, *size);
            Some(InputEvent::Resized { width, height })
        }

        _ => None,
    }
}

fn to_logical(scale_factor: f64, pos: PhysicalPosition<f64>) -> (f64, f64) {
    let logical = pos.to_logical::<f64>(scale_factor);
    (logical.x, logical.y)
}

pub(crate) fn size_to_logical(scale_factor: f64, size: PhysicalSize<u32>) -> (f64, f64) {
    let logical = size.to_logical::<f64>(scale_factor);
    (logical.width, logical.height)
}

fn map_touch_phase(phase: WinitTouchPhase) -> TouchPhase {
    match phase {
        WinitTouchPhase::Started => TouchPhase::Started,
        WinitTouchPhase::Moved => TouchPhase::Moved,
        WinitTouchPhase::Ended => TouchPhase::Ended,
        WinitTouchPhase::Cancelled => TouchPhase::Cancelled,
    }
}

/// Maps the layout-aware key, so the table matches what the user typed.
fn map_logical_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Named(named) => match named {
            NamedKey::Backspace => Key::Backspace,
            NamedKey::Tab => Key::Tab,
            NamedKey::Enter => Key::Enter,
            NamedKey::Escape => Key::Escape,
            NamedKey::Space => Key::Space,
            NamedKey::ArrowRight => Key::ArrowRight,
            NamedKey::ArrowLeft => Key::ArrowLeft,
            NamedKey::ArrowDown => Key::ArrowDown,
            NamedKey::ArrowUp => Key::ArrowUp,
            _ => Key::Unknown,
        },
        WinitKey::Character(text) => Key::from_name(text.as_str()),
        _ => Key::Unknown,
    }
}
