use tracing::{debug, info, warn};

use super::{Epoch, Notice, PendingSave, PresetEditor, SaveGate};
use crate::error::{GatewayError, GatewayResult, ValidationError};
use crate::gateway::ProfileStore;
use crate::macros::{CreateOutcome, Preset, PresetCatalog, PresetId, PresetWire, Profile, ProfileWire};

/// Load issued by [`ProfileEditor::begin_load`]
#[derive(Debug, Clone)]
pub struct LoadRequest {
    epoch: Epoch,
    /// Empty profile used when nothing is stored
    fallback: Profile,
}

impl LoadRequest {
    pub fn name(&self) -> &str {
        self.fallback.name()
    }
}

/// Edit session for a profile and the presets it can reference
#[derive(Debug)]
pub struct ProfileEditor {
    profile: Profile,
    catalog: PresetCatalog,
    /// Preset shown for editing; never persisted
    focused: Option<PresetId>,
    gate: SaveGate,
    epoch: Epoch,
}

impl ProfileEditor {
    /// Start on an empty profile; `slot_count` sizes every preset
    pub fn new(name: &str, slot_count: usize) -> Result<Self, ValidationError> {
        Ok(Self {
            profile: Profile::new(name)?,
            catalog: PresetCatalog::new(slot_count),
            focused: None,
            gate: SaveGate::new(),
            epoch: Epoch::default(),
        })
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    /// Navigate to a profile; anything still in flight for the old one is dropped
    pub fn begin_load(&mut self, name: &str) -> Result<LoadRequest, ValidationError> {
        let fallback = Profile::new(name)?;
        self.epoch.bump();
        debug!(profile = %fallback.name(), epoch = ?self.epoch, "Loading profile");
        Ok(LoadRequest { epoch: self.epoch, fallback })
    }

    /// Apply fetched data; a missing or unreadable profile falls back to an empty one
    pub fn finish_load(
        &mut self,
        request: LoadRequest,
        profile: GatewayResult<Option<ProfileWire>>,
        presets: GatewayResult<Vec<PresetWire>>,
    ) -> Option<Notice> {
        if request.epoch != self.epoch {
            debug!(profile = %request.name(), "Discarding stale load response");
            return None;
        }

        let mut problems = Vec::new();
        match presets {
            Ok(listed) => self.catalog.load(&listed),
            Err(e) => {
                warn!(error = %e, "Failed to list presets, keeping cached catalog");
                problems.push(format!("presets: {e}"));
            }
        }

        self.profile = match profile {
            Ok(Some(mut wire)) => {
                if wire.name.trim().is_empty() {
                    wire.name = request.name().to_string();
                }
                Profile::from_wire(wire)
            }
            Ok(None) | Err(GatewayError::NotFound(_)) => {
                info!(profile = %request.name(), "Profile not found, starting empty");
                request.fallback.clone()
            }
            Err(e) => {
                warn!(profile = %request.name(), error = %e, "Failed to load profile, starting empty");
                problems.push(format!("profile: {e}"));
                request.fallback.clone()
            }
        };
        self.focused = None;

        if problems.is_empty() {
            Some(Notice::success(format!("Loaded profile {}", request.name())))
        } else {
            Some(Notice::alert(format!("Loaded with defaults ({})", problems.join("; "))))
        }
    }

    pub async fn load(&mut self, store: &impl ProfileStore, name: &str) -> Result<Notice, ValidationError> {
        let request = self.begin_load(name)?;
        let profile = store.get_profile(request.name()).await;
        let presets = store.list_presets().await;
        Ok(self
            .finish_load(request, profile, presets)
            .unwrap_or_else(|| Notice::alert("Profile changed while loading")))
    }

    /// Attach a known preset as active
    pub fn attach(&mut self, preset_id: PresetId) -> Result<(), ValidationError> {
        if self.catalog.get(preset_id).is_none() {
            return Err(ValidationError::UnknownPreset(preset_id.0));
        }
        self.profile.add_preset(preset_id)
    }

    pub fn detach(&mut self, preset_id: PresetId) -> Result<(), ValidationError> {
        self.profile.remove_preset(preset_id)?;
        if self.focused == Some(preset_id) {
            self.focused = None;
        }
        Ok(())
    }

    /// Flip a preset's activation flag, returning the new value
    pub fn toggle(&mut self, preset_id: PresetId) -> Result<bool, ValidationError> {
        self.profile.toggle_preset(preset_id)
    }

    pub fn create_preset(&mut self, name: Option<&str>) -> CreateOutcome {
        self.catalog.create_preset(name)
    }

    pub fn set_focused_preset(&mut self, preset_id: PresetId) -> Result<(), ValidationError> {
        if !self.profile.contains(preset_id) {
            return Err(ValidationError::MissingPresetRef(preset_id.0));
        }
        self.focused = Some(preset_id);
        Ok(())
    }

    pub fn focused_preset(&self) -> Option<&Preset> {
        self.focused.and_then(|id| self.catalog.get(id))
    }

    /// Editor over a copy of the focused preset
    pub fn edit_focused(&self) -> Option<PresetEditor> {
        self.focused_preset().cloned().map(PresetEditor::new)
    }

    pub fn begin_save(&mut self) -> Result<PendingSave<String, ProfileWire>, Notice> {
        let ticket = self
            .gate
            .try_acquire()
            .ok_or_else(|| Notice::alert("A save is already in progress"))?;
        Ok(PendingSave {
            epoch: self.epoch,
            key: self.profile.name().to_string(),
            body: self.profile.to_wire(),
            _ticket: ticket,
        })
    }

    pub fn finish_save(
        &mut self,
        pending: PendingSave<String, ProfileWire>,
        result: GatewayResult<()>,
    ) -> Option<Notice> {
        if pending.epoch != self.epoch {
            debug!(profile = %pending.key, "Discarding stale save response");
            return None;
        }
        match result {
            Ok(()) => Some(Notice::success("Saved")),
            Err(e) => {
                warn!(profile = %pending.key, error = %e, "Failed to save profile");
                Some(Notice::alert(format!("Failed to save profile: {e}")))
            }
        }
    }

    pub async fn save(&mut self, store: &impl ProfileStore) -> Notice {
        let pending = match self.begin_save() {
            Ok(pending) => pending,
            Err(busy) => return busy,
        };
        let result = store.save_profile(&pending.key, &pending.body).await;
        self.finish_save(pending, result)
            .unwrap_or_else(|| Notice::alert("Profile changed while saving"))
    }
}
