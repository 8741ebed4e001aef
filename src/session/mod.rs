//! Load → edit → save workflow around the persistence gateway
//!
//! Each editor splits gateway round trips into a synchronous `begin_*` step,
//! which hands back the request tagged with the editor's current [`Epoch`],
//! and a `finish_*` step that applies the response. Opening something else
//! bumps the epoch, so a response that arrives late is dropped instead of
//! clobbering the newer view.

use std::fmt;

mod guard;
mod preset_editor;
mod profile_editor;

pub use guard::{SaveGate, SaveTicket};
pub use preset_editor::PresetEditor;
pub use profile_editor::{LoadRequest, ProfileEditor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Alert,
}

/// Outcome of a load or save, for the front end to display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Alert, message: message.into() }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Success => write!(f, "{}", self.message),
            NoticeLevel::Alert => write!(f, "error: {}", self.message),
        }
    }
}

/// Generation counter of an editor's view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Epoch(u64);

impl Epoch {
    fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// A save in flight: holds the guard until the response is applied or dropped
#[must_use = "a pending save keeps the editor busy until finished"]
#[derive(Debug)]
pub struct PendingSave<K, T> {
    epoch: Epoch,
    key: K,
    body: T,
    _ticket: SaveTicket,
}

impl<K, T> PendingSave<K, T> {
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// What the body is saved under (profile name, preset id)
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn body(&self) -> &T {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_display() {
        assert_eq!(Notice::success("Saved").to_string(), "Saved");
        assert_eq!(Notice::alert("timeout").to_string(), "error: timeout");
        assert!(Notice::success("ok").is_success());
        assert!(!Notice::alert("no").is_success());
    }

    #[test]
    fn test_epoch_bump() {
        let mut epoch = Epoch::default();
        let before = epoch;
        epoch.bump();
        assert!(epoch > before);
    }
}
