//! Keyboard stand-in for the remote gesture source.
//!
//! When no vision session is attached, the viewer can be steered from the
//! keyboard. Each key press is translated into the same gesture token a
//! remote producer would send and goes through the same inbox, so keyboard
//! and remote input are indistinguishable to the session.
//!
//! | key | gesture |
//! |-----|---------|
//! | `+` / `=` / PageUp | `zoom_in` |
//! | `-` / PageDown | `zoom_out` |
//! | Left / Right | `move_left` / `move_right` |
//! | Up / Down | `move_up` / `move_down` |
//! | Space | `stop` |
//! | `R` | `rotate` |

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{Key, KeyCode, NamedKey, PhysicalKey};

use crate::gesture::Gesture;

/// Translate a physical key into a gesture.
pub fn gesture_for_key(key: KeyCode) -> Option<Gesture> {
    match key {
        KeyCode::Equal | KeyCode::NumpadAdd | KeyCode::PageUp => Some(Gesture::ZoomIn),
        KeyCode::Minus | KeyCode::NumpadSubtract | KeyCode::PageDown => Some(Gesture::ZoomOut),
        KeyCode::ArrowLeft => Some(Gesture::MoveLeft),
        KeyCode::ArrowRight => Some(Gesture::MoveRight),
        KeyCode::ArrowUp => Some(Gesture::MoveUp),
        KeyCode::ArrowDown => Some(Gesture::MoveDown),
        KeyCode::Space => Some(Gesture::Stop),
        KeyCode::KeyR => Some(Gesture::Rotate),
        _ => None,
    }
}

/// Gesture for a window key event, if it is a fresh press of a mapped key.
///
/// Auto-repeat is ignored so holding a key does not flood the inbox.
pub fn gesture_for_event(event: &KeyEvent) -> Option<Gesture> {
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    if let PhysicalKey::Code(code) = event.physical_key {
        if let Some(gesture) = gesture_for_key(code) {
            return Some(gesture);
        }
    }
    // Layouts where `+` is not on the Equal key still produce the character.
    match &event.logical_key {
        Key::Character(c) if c.as_str() == "+" => Some(Gesture::ZoomIn),
        Key::Character(c) if c.as_str() == "-" => Some(Gesture::ZoomOut),
        Key::Named(NamedKey::Space) => Some(Gesture::Stop),
        _ => None,
    }
}

/// Whether a key event asks to close the viewer.
pub fn is_quit(event: &KeyEvent) -> bool {
    event.state == ElementState::Pressed
        && matches!(event.physical_key, PhysicalKey::Code(KeyCode::Escape | KeyCode::KeyQ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_keys_pan() {
        assert_eq!(gesture_for_key(KeyCode::ArrowLeft), Some(Gesture::MoveLeft));
        assert_eq!(gesture_for_key(KeyCode::ArrowRight), Some(Gesture::MoveRight));
        assert_eq!(gesture_for_key(KeyCode::ArrowUp), Some(Gesture::MoveUp));
        assert_eq!(gesture_for_key(KeyCode::ArrowDown), Some(Gesture::MoveDown));
    }

    #[test]
    fn test_zoom_and_stop_keys() {
        assert_eq!(gesture_for_key(KeyCode::Equal), Some(Gesture::ZoomIn));
        assert_eq!(gesture_for_key(KeyCode::Minus), Some(Gesture::ZoomOut));
        assert_eq!(gesture_for_key(KeyCode::Space), Some(Gesture::Stop));
        assert_eq!(gesture_for_key(KeyCode::KeyR), Some(Gesture::Rotate));
    }

    #[test]
    fn test_unmapped_keys_ignored() {
        assert_eq!(gesture_for_key(KeyCode::KeyA), None);
        assert_eq!(gesture_for_key(KeyCode::Enter), None);
    }
}
