//! Presets: named, independently persisted macro sets

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::macro_set::MacroSet;
use super::slot::ActionSlotWire;
use crate::constants::macros::DEFAULT_PRESET_NAME;

/// Opaque preset identifier (numbers or numeric strings on the wire)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PresetId(pub u64);

impl<'de> Deserialize<'de> for PresetId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum IntOrText {
            Int(u64),
            Text(String),
        }

        match IntOrText::deserialize(deserializer)? {
            IntOrText::Int(n) => Ok(PresetId(n)),
            IntOrText::Text(s) => s
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid preset id: {s:?}"))),
        }
    }
}

impl FromStr for PresetId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(PresetId)
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out client-side ids from the wall clock (milliseconds)
///
/// Two ids requested within the same millisecond are bumped so they never collide
/// within a session. The server may assign a durable id on first save.
#[derive(Debug, Default)]
pub struct PresetIdGenerator {
    last: u64,
}

impl PresetIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never hand out an id at or below one already in use
    pub fn observe(&mut self, id: PresetId) {
        self.last = self.last.max(id.0);
    }

    pub fn next_id(&mut self) -> PresetId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.last = now.max(self.last + 1);
        PresetId(self.last)
    }
}

/// Wire shape of a preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetWire {
    pub id: PresetId,
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Items", deserialize_with = "deserialize_items")]
    pub items: Vec<ActionSlotWire>,
}

/// `null` reads as no items; an entry that is not a slot object keeps its
/// position as a blank slot
fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<ActionSlotWire>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    let items = raw
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            ActionSlotWire::deserialize(item).unwrap_or_else(|err| {
                warn!(index, error = %err, "Unreadable stored slot, using blank");
                ActionSlotWire::default()
            })
        })
        .collect();
    Ok(items)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub id: PresetId,
    pub name: String,
    pub items: MacroSet,
}

impl Preset {
    pub fn blank(id: PresetId, name: impl Into<String>, capacity: usize) -> Self {
        Self {
            id,
            name: name.into(),
            items: MacroSet::blank(capacity),
        }
    }

    pub fn hydrate(wire: &PresetWire, capacity: usize) -> Self {
        Self {
            id: wire.id,
            name: wire.name.clone(),
            items: MacroSet::hydrate(&wire.items, capacity),
        }
    }

    pub fn flatten(&self) -> PresetWire {
        PresetWire {
            id: self.id,
            name: self.name.clone(),
            items: self.items.flatten(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(PresetId),
    /// A preset with that name already existed; nothing was created
    Existing(PresetId),
}

impl CreateOutcome {
    pub fn id(&self) -> PresetId {
        match self {
            CreateOutcome::Created(id) | CreateOutcome::Existing(id) => *id,
        }
    }
}

/// Client-side list of known presets
#[derive(Debug)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
    capacity: usize,
    ids: PresetIdGenerator,
}

impl PresetCatalog {
    pub fn new(capacity: usize) -> Self {
        Self {
            presets: Vec::new(),
            capacity,
            ids: PresetIdGenerator::new(),
        }
    }

    /// Replace the catalog contents with a freshly listed set
    pub fn load(&mut self, listed: &[PresetWire]) {
        self.presets = listed
            .iter()
            .map(|wire| Preset::hydrate(wire, self.capacity))
            .collect();
        for preset in &self.presets {
            self.ids.observe(preset.id);
        }
        debug!(count = self.presets.len(), "Loaded presets into catalog");
    }

    /// Create a preset unless one with the same name already exists
    pub fn create_preset(&mut self, name: Option<&str>) -> CreateOutcome {
        let name = name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or(DEFAULT_PRESET_NAME);
        if let Some(existing) = self.find_by_name(name) {
            debug!(preset = %name, id = %existing.id, "Preset already exists, reusing");
            return CreateOutcome::Existing(existing.id);
        }

        let id = self.ids.next_id();
        self.presets.push(Preset::blank(id, name, self.capacity));
        info!(preset = %name, id = %id, "Created preset");
        CreateOutcome::Created(id)
    }

    /// Insert or replace a preset by id
    pub fn upsert(&mut self, preset: Preset) {
        self.ids.observe(preset.id);
        match self.presets.iter_mut().find(|p| p.id == preset.id) {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
    }

    pub fn get(&self, id: PresetId) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PresetId) -> Option<&mut Preset> {
        self.presets.iter_mut().find(|p| p.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
