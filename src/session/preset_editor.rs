use tracing::{debug, info, warn};

use super::{Epoch, Notice, PendingSave, SaveGate};
use crate::error::{GatewayResult, ValidationError};
use crate::gateway::ProfileStore;
use crate::macros::{ActionSlot, Preset, PresetId, PresetWire};

/// Edit session for one preset's slots
#[derive(Debug)]
pub struct PresetEditor {
    preset: Preset,
    /// Last state known to be persisted
    saved: PresetWire,
    gate: SaveGate,
    epoch: Epoch,
}

impl PresetEditor {
    pub fn new(preset: Preset) -> Self {
        let saved = preset.flatten();
        Self { preset, saved, gate: SaveGate::new(), epoch: Epoch::default() }
    }

    /// Switch to another preset; responses for the previous one are dropped
    pub fn open(&mut self, preset: Preset) {
        self.epoch.bump();
        self.saved = preset.flatten();
        self.preset = preset;
        debug!(preset_id = %self.preset.id, epoch = ?self.epoch, "Opened preset");
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn rename(&mut self, name: &str) {
        self.preset.name = name.trim().to_string();
    }

    pub fn slot_mut(&mut self, index: usize) -> Result<&mut ActionSlot, ValidationError> {
        self.preset.items.slot_mut(index)
    }

    /// Unsaved edits exist
    pub fn is_dirty(&self) -> bool {
        self.preset.flatten() != self.saved
    }

    pub fn is_saving(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn begin_save(&mut self) -> Result<PendingSave<PresetId, PresetWire>, Notice> {
        let ticket = self
            .gate
            .try_acquire()
            .ok_or_else(|| Notice::alert("A save is already in progress"))?;
        Ok(PendingSave {
            epoch: self.epoch,
            key: self.preset.id,
            body: self.preset.flatten(),
            _ticket: ticket,
        })
    }

    /// Apply a save response; `None` when it belongs to a preset no longer open
    pub fn finish_save(
        &mut self,
        pending: PendingSave<PresetId, PresetWire>,
        result: GatewayResult<()>,
    ) -> Option<Notice> {
        if pending.epoch != self.epoch {
            debug!(preset_id = %pending.key, "Discarding stale save response");
            return None;
        }
        match result {
            Ok(()) => {
                self.saved = pending.body;
                Some(Notice::success("Saved"))
            }
            Err(e) => {
                warn!(preset_id = %pending.key, error = %e, "Failed to save preset");
                Some(Notice::alert(format!("Failed to save preset: {e}")))
            }
        }
    }

    pub async fn save(&mut self, store: &impl ProfileStore) -> Notice {
        let pending = match self.begin_save() {
            Ok(pending) => pending,
            Err(busy) => return busy,
        };
        let result = store.save_preset(pending.key, &pending.body).await;
        let notice = self
            .finish_save(pending, result)
            .unwrap_or_else(|| Notice::alert("Preset changed while saving"));
        if notice.is_success() {
            info!(preset_id = %self.preset.id, "Preset edits persisted");
        }
        notice
    }
}
