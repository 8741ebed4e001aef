//! Profiles: named aggregations of preset references
//!
//! A profile stores preset ids only, so editing a shared preset changes every
//! profile that references it.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::preset::{Preset, PresetCatalog, PresetId};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PresetRef {
    pub preset_id: PresetId,
    pub is_active: bool,
}

/// Accepts `{preset_id, is_active}` and the older `{preset: {id, ...}, is_active}`
impl<'de> Deserialize<'de> for PresetRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct EmbeddedPreset {
            id: PresetId,
        }

        #[derive(Deserialize)]
        struct RawRef {
            preset_id: Option<PresetId>,
            preset: Option<EmbeddedPreset>,
            #[serde(default = "default_active")]
            is_active: bool,
        }

        let raw = RawRef::deserialize(deserializer)?;
        let preset_id = raw
            .preset_id
            .or(raw.preset.map(|p| p.id))
            .ok_or_else(|| serde::de::Error::missing_field("preset_id"))?;
        Ok(PresetRef {
            preset_id,
            is_active: raw.is_active,
        })
    }
}

fn default_active() -> bool {
    true
}

/// Wire shape of a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileWire {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_refs")]
    pub items: Vec<PresetRef>,
}

fn deserialize_refs<'de, D>(deserializer: D) -> Result<Vec<PresetRef>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<Vec<PresetRef>> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    name: String,
    preset_refs: Vec<PresetRef>,
}

impl Profile {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyProfileName);
        }
        Ok(Self {
            name: name.to_string(),
            preset_refs: Vec::new(),
        })
    }

    /// Hydrate a stored profile; a repeated preset id keeps its first entry
    pub fn from_wire(wire: ProfileWire) -> Self {
        let mut preset_refs: Vec<PresetRef> = Vec::with_capacity(wire.items.len());
        for item in wire.items {
            if preset_refs.iter().any(|r| r.preset_id == item.preset_id) {
                warn!(profile = %wire.name, preset_id = %item.preset_id, "Dropping duplicate preset reference");
                continue;
            }
            preset_refs.push(item);
        }
        Self {
            name: wire.name,
            preset_refs,
        }
    }

    pub fn to_wire(&self) -> ProfileWire {
        ProfileWire {
            name: self.name.clone(),
            items: self.preset_refs.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preset_refs(&self) -> &[PresetRef] {
        &self.preset_refs
    }

    /// Attach a preset as active; a preset can be attached once
    pub fn add_preset(&mut self, preset_id: PresetId) -> Result<(), ValidationError> {
        if self.contains(preset_id) {
            return Err(ValidationError::DuplicatePresetRef(preset_id.0));
        }
        self.preset_refs.push(PresetRef {
            preset_id,
            is_active: true,
        });
        Ok(())
    }

    pub fn remove_preset(&mut self, preset_id: PresetId) -> Result<(), ValidationError> {
        let before = self.preset_refs.len();
        self.preset_refs.retain(|r| r.preset_id != preset_id);
        if self.preset_refs.len() == before {
            return Err(ValidationError::MissingPresetRef(preset_id.0));
        }
        Ok(())
    }

    pub fn set_preset_active(&mut self, preset_id: PresetId, is_active: bool) -> Result<(), ValidationError> {
        self.find_mut(preset_id)?.is_active = is_active;
        Ok(())
    }

    /// Flip the activation flag, returning the new value
    pub fn toggle_preset(&mut self, preset_id: PresetId) -> Result<bool, ValidationError> {
        let preset_ref = self.find_mut(preset_id)?;
        preset_ref.is_active = !preset_ref.is_active;
        Ok(preset_ref.is_active)
    }

    pub fn contains(&self, preset_id: PresetId) -> bool {
        self.preset_refs.iter().any(|r| r.preset_id == preset_id)
    }

    pub fn active_presets(&self) -> impl Iterator<Item = PresetId> + '_ {
        self.preset_refs.iter().filter(|r| r.is_active).map(|r| r.preset_id)
    }

    /// Pair every reference with its preset, skipping ids the catalog doesn't know
    pub fn resolve<'a>(&self, catalog: &'a PresetCatalog) -> Vec<(&'a Preset, bool)> {
        self.preset_refs
            .iter()
            .filter_map(|r| match catalog.get(r.preset_id) {
                Some(preset) => Some((preset, r.is_active)),
                None => {
                    warn!(profile = %self.name, preset_id = %r.preset_id, "Profile references unknown preset");
                    None
                }
            })
            .collect()
    }

    fn find_mut(&mut self, preset_id: PresetId) -> Result<&mut PresetRef, ValidationError> {
        self.preset_refs
            .iter_mut()
            .find(|r| r.preset_id == preset_id)
            .ok_or(ValidationError::MissingPresetRef(preset_id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::slot::ActionVerb;
    use serde_json::json;

    #[test]
    fn test_new_profile_requires_name() {
        assert_eq!(Profile::new("   "), Err(ValidationError::EmptyProfileName));
        assert_eq!(Profile::new("  farm  ").unwrap().name(), "farm");
    }

    #[test]
    fn test_add_preset_appends_active_ref() {
        let mut profile = Profile::new("farm").unwrap();
        profile.add_preset(PresetId(1)).unwrap();
        profile.add_preset(PresetId(2)).unwrap();

        assert_eq!(
            profile.preset_refs(),
            &[
                PresetRef { preset_id: PresetId(1), is_active: true },
                PresetRef { preset_id: PresetId(2), is_active: true },
            ]
        );
        assert_eq!(profile.add_preset(PresetId(1)), Err(ValidationError::DuplicatePresetRef(1)));
    }

    #[test]
    fn test_toggle_and_remove() {
        let mut profile = Profile::new("farm").unwrap();
        profile.add_preset(PresetId(1)).unwrap();
        profile.add_preset(PresetId(2)).unwrap();

        assert_eq!(profile.toggle_preset(PresetId(1)), Ok(false));
        assert_eq!(profile.active_presets().collect::<Vec<_>>(), vec![PresetId(2)]);

        profile.set_preset_active(PresetId(1), true).unwrap();
        profile.remove_preset(PresetId(2)).unwrap();
        assert_eq!(profile.active_presets().collect::<Vec<_>>(), vec![PresetId(1)]);

        assert_eq!(profile.remove_preset(PresetId(9)), Err(ValidationError::MissingPresetRef(9)));
        assert!(profile.toggle_preset(PresetId(9)).is_err());
    }

    #[test]
    fn test_shared_preset_edits_propagate() {
        let mut catalog = PresetCatalog::new(10);
        let shared = catalog.create_preset(Some("Buffs")).id();

        let mut a = Profile::new("a").unwrap();
        let mut b = Profile::new("b").unwrap();
        a.add_preset(shared).unwrap();
        b.add_preset(shared).unwrap();
        b.toggle_preset(shared).unwrap();

        catalog.get_mut(shared).unwrap().items.slot_mut(0).unwrap().action = Some(ActionVerb::Assist);

        for profile in [&a, &b] {
            let resolved = profile.resolve(&catalog);
            assert_eq!(resolved.len(), 1);
            assert_eq!(resolved[0].0.items.slots()[0].action, Some(ActionVerb::Assist));
        }
        assert!(a.resolve(&catalog)[0].1);
        assert!(!b.resolve(&catalog)[0].1);
    }

    #[test]
    fn test_resolve_skips_dangling_refs() {
        let catalog = PresetCatalog::new(10);
        let mut profile = Profile::new("farm").unwrap();
        profile.add_preset(PresetId(404)).unwrap();
        assert!(profile.resolve(&catalog).is_empty());
    }

    #[test]
    fn test_wire_accepts_embedded_presets() {
        let wire: ProfileWire = serde_json::from_value(json!({
            "name": "farm",
            "items": [
                {"preset": {"id": 11, "name": "Spam", "items": []}, "is_active": false},
                {"preset_id": "12"}
            ]
        }))
        .unwrap();

        let profile = Profile::from_wire(wire);
        assert_eq!(
            profile.preset_refs(),
            &[
                PresetRef { preset_id: PresetId(11), is_active: false },
                PresetRef { preset_id: PresetId(12), is_active: true },
            ]
        );
        assert_eq!(
            serde_json::to_value(profile.to_wire()).unwrap(),
            json!({
                "name": "farm",
                "items": [
                    {"preset_id": 11, "is_active": false},
                    {"preset_id": 12, "is_active": true}
                ]
            })
        );
    }

    #[test]
    fn test_from_wire_drops_duplicate_refs() {
        let wire: ProfileWire = serde_json::from_value(json!({
            "name": "farm",
            "items": [
                {"preset_id": 5, "is_active": true},
                {"preset_id": 6},
                {"preset_id": 5, "is_active": false}
            ]
        }))
        .unwrap();

        let mut profile = Profile::from_wire(wire);
        assert_eq!(profile.preset_refs().len(), 2);
        assert_eq!(profile.preset_refs()[0], PresetRef { preset_id: PresetId(5), is_active: true });

        assert_eq!(profile.toggle_preset(PresetId(5)), Ok(false));
        assert_eq!(profile.active_presets().collect::<Vec<_>>(), vec![PresetId(6)]);

        let mut catalog = PresetCatalog::new(4);
        catalog.upsert(Preset::blank(PresetId(5), "Spam", 4));
        assert_eq!(profile.resolve(&catalog).len(), 1);
    }

    #[test]
    fn test_wire_null_items() {
        let wire: ProfileWire = serde_json::from_value(json!({"name": "farm", "items": null})).unwrap();
        assert!(wire.items.is_empty());
    }
}
