//! Canonical key binding strings
//!
//! Bindings are lowercase, with held modifiers in the fixed order
//! `ctrl+`, `shift+`, `alt+`, `meta+` followed by the base key name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

const MODIFIERS: [&str; 4] = ["ctrl", "shift", "alt", "meta"];

/// A physical key press with its held modifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPress {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
    /// Base key name as reported by the input source
    pub key: String,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    fn held(&self) -> [bool; 4] {
        [self.ctrl, self.shift, self.alt, self.meta]
    }
}

/// Canonical binding; empty means no binding
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyCombo(String);

impl KeyCombo {
    pub fn none() -> Self {
        Self::default()
    }

    /// Record a key press. `escape` is always stored as `esc`, never treated as cancel.
    pub fn from_press(press: &KeyPress) -> Self {
        let mut combo = String::new();
        for (name, held) in MODIFIERS.iter().zip(press.held()) {
            if held {
                combo.push_str(name);
                combo.push('+');
            }
        }
        combo.push_str(&normalize_base(&press.key));
        Self(combo)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn normalize_base(key: &str) -> String {
    match key.to_lowercase().as_str() {
        "escape" => "esc".to_string(),
        " " | "spacebar" => "space".to_string(),
        other => other.to_string(),
    }
}

/// Canonicalizes stored bindings: lowercases and reorders modifiers
impl FromStr for KeyCombo {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        // Browsers report the space bar as a literal " "
        let lowered = match lowered.strip_suffix(' ') {
            Some(head) if head.is_empty() || head.ends_with('+') => format!("{head}space"),
            _ => lowered,
        };
        let lowered = lowered.trim();
        if lowered.is_empty() {
            return Ok(Self::none());
        }

        let mut press = KeyPress::default();
        let mut rest = lowered;
        loop {
            let Some((head, tail)) = rest.split_once('+') else {
                break;
            };
            // "shift++" binds the plus key itself
            if head.is_empty() {
                break;
            }
            let flag = match head {
                "ctrl" => &mut press.ctrl,
                "shift" => &mut press.shift,
                "alt" => &mut press.alt,
                "meta" => &mut press.meta,
                _ => return Err(ValidationError::InvalidKeyCombo(s.to_string())),
            };
            if *flag {
                return Err(ValidationError::InvalidKeyCombo(s.to_string()));
            }
            *flag = true;
            rest = tail;
        }

        if rest.is_empty() || MODIFIERS.contains(&rest) {
            return Err(ValidationError::InvalidKeyCombo(s.to_string()));
        }
        press.key = rest.to_string();
        Ok(Self::from_press(&press))
    }
}

impl TryFrom<String> for KeyCombo {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyCombo> for String {
    fn from(combo: KeyCombo) -> Self {
        combo.0
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
