//! Macro data model
//!
//! - **condition**: single-combinator boolean conditions and their flat wire form
//! - **key**: canonical key binding strings
//! - **slot**: one action row and its wire shape
//! - **macro_set**: fixed-capacity slot arrays (hydrate/flatten)
//! - **preset**: named macro sets and the client-side catalog
//! - **profile**: preset references with activation flags

pub mod condition;
pub mod key;
pub mod macro_set;
pub mod preset;
pub mod profile;
pub mod slot;

pub use condition::{Combinator, ConditionRule, ConditionSet, ConditionToken, FieldName, Operator};
pub use key::{KeyCombo, KeyPress};
pub use macro_set::MacroSet;
pub use preset::{CreateOutcome, Preset, PresetCatalog, PresetId, PresetIdGenerator, PresetWire};
pub use profile::{PresetRef, Profile, ProfileWire};
pub use slot::{parse_millis, ActionSlot, ActionSlotWire, ActionVerb};
