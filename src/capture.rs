//! Key binding capture from evdev keyboards
//!
//! Every keyboard gets a reader thread. The first non-modifier key pressed on
//! any of them is combined with the modifiers held at that moment and reported
//! as a [`KeyCombo`].

use anyhow::{Context, Result};
use evdev::{AttributeSetRef, Device, EventType, InputEventKind, Key};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::constants::{input, paths, permissions};
use crate::macros::{KeyCombo, KeyPress};

/// Find all keyboard devices (anything with a Tab key)
fn find_keyboard_devices() -> Result<Vec<Device>> {
    info!(path = %paths::DEV_INPUT, "Scanning for keyboard devices...");

    let mut devices = Vec::new();
    for entry in std::fs::read_dir(paths::DEV_INPUT)
        .context(format!("Failed to read {} - are you in the '{}' group?", paths::DEV_INPUT, permissions::INPUT_GROUP))?
    {
        let path = entry?.path();
        let Ok(device) = Device::open(&path) else {
            continue;
        };
        if device.supported_keys().is_some_and(|keys| keys.contains(Key::KEY_TAB)) {
            info!(device_path = %path.display(), name = ?device.name(), "Found keyboard device");
            devices.push(device);
        }
    }

    if devices.is_empty() {
        anyhow::bail!(
            "No keyboard device found. Ensure you're in '{}' group:\n\
             {}\n\
             Then log out and back in.",
            permissions::INPUT_GROUP,
            permissions::ADD_TO_INPUT_GROUP
        )
    }
    Ok(devices)
}

/// Block until a key is pressed on any keyboard, or `timeout` passes
pub fn capture_binding(timeout: Duration) -> Result<KeyCombo> {
    let (sender, receiver) = mpsc::channel();
    for device in find_keyboard_devices()? {
        let sender = sender.clone();
        thread::spawn(move || {
            if let Err(e) = read_press(device, sender) {
                error!(error = %e, "Key capture listener error");
            }
        });
    }
    drop(sender);

    match receiver.recv_timeout(timeout) {
        Ok(combo) => {
            info!(binding = %combo, "Captured key binding");
            Ok(combo)
        }
        Err(RecvTimeoutError::Timeout) => anyhow::bail!("No key pressed within {}s", timeout.as_secs()),
        Err(RecvTimeoutError::Disconnected) => anyhow::bail!("All keyboard listeners stopped"),
    }
}

/// Read one device until a bindable key goes down
fn read_press(mut device: Device, sender: Sender<KeyCombo>) -> Result<()> {
    loop {
        let pressed: Vec<Key> = device
            .fetch_events()
            .context("Failed to fetch events")?
            .filter(|event| event.event_type() == EventType::KEY && event.value() == input::KEY_PRESS)
            .filter_map(|event| match event.kind() {
                InputEventKind::Key(key) => Some(key),
                _ => None,
            })
            .filter(|key| !is_modifier(*key))
            .collect();

        let Some(&key) = pressed.first() else {
            continue;
        };
        let Some(name) = key_name(key) else {
            debug!(key = ?key, "Ignoring key without a binding name");
            continue;
        };

        // Modifier state at the time of the press, not from the batch
        let state = device.get_key_state().context("Failed to get keyboard state")?;
        let combo = KeyCombo::from_press(&press_with_modifiers(name, &state));
        // Receiver gone means another keyboard already answered
        let _ = sender.send(combo);
        return Ok(());
    }
}

fn press_with_modifiers(name: &str, held: &AttributeSetRef<Key>) -> KeyPress {
    let any = |keys: [Key; 2]| keys.iter().any(|k| held.contains(*k));
    KeyPress {
        ctrl: any([Key::KEY_LEFTCTRL, Key::KEY_RIGHTCTRL]),
        shift: any([Key::KEY_LEFTSHIFT, Key::KEY_RIGHTSHIFT]),
        alt: any([Key::KEY_LEFTALT, Key::KEY_RIGHTALT]),
        meta: any([Key::KEY_LEFTMETA, Key::KEY_RIGHTMETA]),
        key: name.to_string(),
    }
}

fn is_modifier(key: Key) -> bool {
    matches!(
        key,
        Key::KEY_LEFTCTRL
            | Key::KEY_RIGHTCTRL
            | Key::KEY_LEFTSHIFT
            | Key::KEY_RIGHTSHIFT
            | Key::KEY_LEFTALT
            | Key::KEY_RIGHTALT
            | Key::KEY_LEFTMETA
            | Key::KEY_RIGHTMETA
    )
}

/// Browser-style key names, as stored by the agent
fn key_name(key: Key) -> Option<&'static str> {
    let name = match key {
        Key::KEY_A => "a",
        Key::KEY_B => "b",
        Key::KEY_C => "c",
        Key::KEY_D => "d",
        Key::KEY_E => "e",
        Key::KEY_F => "f",
        Key::KEY_G => "g",
        Key::KEY_H => "h",
        Key::KEY_I => "i",
        Key::KEY_J => "j",
        Key::KEY_K => "k",
        Key::KEY_L => "l",
        Key::KEY_M => "m",
        Key::KEY_N => "n",
        Key::KEY_O => "o",
        Key::KEY_P => "p",
        Key::KEY_Q => "q",
        Key::KEY_R => "r",
        Key::KEY_S => "s",
        Key::KEY_T => "t",
        Key::KEY_U => "u",
        Key::KEY_V => "v",
        Key::KEY_W => "w",
        Key::KEY_X => "x",
        Key::KEY_Y => "y",
        Key::KEY_Z => "z",
        Key::KEY_0 | Key::KEY_KP0 => "0",
        Key::KEY_1 | Key::KEY_KP1 => "1",
        Key::KEY_2 | Key::KEY_KP2 => "2",
        Key::KEY_3 | Key::KEY_KP3 => "3",
        Key::KEY_4 | Key::KEY_KP4 => "4",
        Key::KEY_5 | Key::KEY_KP5 => "5",
        Key::KEY_6 | Key::KEY_KP6 => "6",
        Key::KEY_7 | Key::KEY_KP7 => "7",
        Key::KEY_8 | Key::KEY_KP8 => "8",
        Key::KEY_9 | Key::KEY_KP9 => "9",
        Key::KEY_F1 => "f1",
        Key::KEY_F2 => "f2",
        Key::KEY_F3 => "f3",
        Key::KEY_F4 => "f4",
        Key::KEY_F5 => "f5",
        Key::KEY_F6 => "f6",
        Key::KEY_F7 => "f7",
        Key::KEY_F8 => "f8",
        Key::KEY_F9 => "f9",
        Key::KEY_F10 => "f10",
        Key::KEY_F11 => "f11",
        Key::KEY_F12 => "f12",
        Key::KEY_ESC => "escape",
        Key::KEY_ENTER | Key::KEY_KPENTER => "enter",
        Key::KEY_SPACE => "space",
        Key::KEY_TAB => "tab",
        Key::KEY_BACKSPACE => "backspace",
        Key::KEY_DELETE => "delete",
        Key::KEY_INSERT => "insert",
        Key::KEY_HOME => "home",
        Key::KEY_END => "end",
        Key::KEY_PAGEUP => "pageup",
        Key::KEY_PAGEDOWN => "pagedown",
        Key::KEY_UP => "arrowup",
        Key::KEY_DOWN => "arrowdown",
        Key::KEY_LEFT => "arrowleft",
        Key::KEY_RIGHT => "arrowright",
        Key::KEY_MINUS | Key::KEY_KPMINUS => "-",
        Key::KEY_EQUAL => "=",
        Key::KEY_KPPLUS => "+",
        Key::KEY_COMMA => ",",
        Key::KEY_DOT => ".",
        Key::KEY_SLASH => "/",
        Key::KEY_SEMICOLON => ";",
        Key::KEY_APOSTROPHE => "'",
        Key::KEY_GRAVE => "`",
        Key::KEY_LEFTBRACE => "[",
        Key::KEY_RIGHTBRACE => "]",
        Key::KEY_BACKSLASH => "\\",
        _ => return None,
    };
    Some(name)
}

/// Check if key capture is available (user has input group permissions)
pub fn check_permissions() -> bool {
    std::fs::read_dir(paths::DEV_INPUT).is_ok()
}

/// Print helpful error message if permissions missing
pub fn print_permission_error() {
    error!(path = %paths::DEV_INPUT, "Cannot access input devices");
    error!(group = %permissions::INPUT_GROUP, "Key capture requires group membership");
    error!(command = %permissions::ADD_TO_INPUT_GROUP, "Add user to input group");
    warn!("Then log out and back in");
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::AttributeSet;

    fn held(keys: &[Key]) -> AttributeSet<Key> {
        let mut set = AttributeSet::new();
        for key in keys {
            set.insert(*key);
        }
        set
    }

    #[test]
    fn test_ctrl_shift_a() {
        let press = press_with_modifiers("a", &held(&[Key::KEY_RIGHTSHIFT, Key::KEY_LEFTCTRL, Key::KEY_A]));
        assert_eq!(KeyCombo::from_press(&press).as_str(), "ctrl+shift+a");
    }

    #[test]
    fn test_escape_is_recorded_as_esc() {
        let name = key_name(Key::KEY_ESC).unwrap();
        let combo = KeyCombo::from_press(&press_with_modifiers(name, &held(&[])));
        assert_eq!(combo.as_str(), "esc");

        let combo = KeyCombo::from_press(&press_with_modifiers(name, &held(&[Key::KEY_LEFTALT])));
        assert_eq!(combo.as_str(), "alt+esc");
    }

    #[test]
    fn test_key_names() {
        assert_eq!(key_name(Key::KEY_KP7), Some("7"));
        assert_eq!(key_name(Key::KEY_F10), Some("f10"));
        assert_eq!(key_name(Key::KEY_UP), Some("arrowup"));
        assert_eq!(key_name(Key::KEY_MUTE), None);
    }

    #[test]
    fn test_captured_names_parse_back() {
        for key in [Key::KEY_Q, Key::KEY_SPACE, Key::KEY_KPPLUS, Key::KEY_F1, Key::KEY_ESC] {
            let press = press_with_modifiers(key_name(key).unwrap(), &held(&[Key::KEY_LEFTMETA]));
            let combo = KeyCombo::from_press(&press);
            assert_eq!(combo.as_str().parse::<KeyCombo>().unwrap(), combo);
        }
    }

    #[test]
    fn test_modifiers_are_not_bindable_alone() {
        assert!(is_modifier(Key::KEY_LEFTSHIFT));
        assert!(is_modifier(Key::KEY_RIGHTMETA));
        assert!(!is_modifier(Key::KEY_TAB));
    }
}
