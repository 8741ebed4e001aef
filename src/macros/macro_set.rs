//! Fixed-capacity slot arrays (a preset's body)

use tracing::warn;

use super::slot::{ActionSlot, ActionSlotWire};
use crate::error::ValidationError;

/// Exactly `capacity` slots; the index is the slot's identity
#[derive(Debug, Clone, PartialEq)]
pub struct MacroSet {
    slots: Vec<ActionSlot>,
}

impl MacroSet {
    pub fn blank(capacity: usize) -> Self {
        Self {
            slots: vec![ActionSlot::default(); capacity],
        }
    }

    /// Build from stored items, index-aligned
    ///
    /// Missing trailing items become blank slots, items past `capacity` are dropped,
    /// and an item that fails validation is replaced by a blank slot.
    pub fn hydrate(items: &[ActionSlotWire], capacity: usize) -> Self {
        if items.len() > capacity {
            warn!(stored = items.len(), capacity, "Dropping stored slots beyond capacity");
        }

        let slots = (0..capacity)
            .map(|index| match items.get(index) {
                Some(wire) => ActionSlot::from_wire(wire).unwrap_or_else(|err| {
                    warn!(index, error = %err, "Invalid stored slot, using blank");
                    ActionSlot::default()
                }),
                None => ActionSlot::default(),
            })
            .collect();

        Self { slots }
    }

    /// Wire form; always `capacity` entries so positions survive load/edit/save
    pub fn flatten(&self) -> Vec<ActionSlotWire> {
        self.slots.iter().map(ActionSlot::to_wire).collect()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[ActionSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Result<&ActionSlot, ValidationError> {
        self.slots.get(index).ok_or(ValidationError::SlotOutOfRange {
            index,
            capacity: self.slots.len(),
        })
    }

    pub fn slot_mut(&mut self, index: usize) -> Result<&mut ActionSlot, ValidationError> {
        let capacity = self.slots.len();
        self.slots
            .get_mut(index)
            .ok_or(ValidationError::SlotOutOfRange { index, capacity })
    }

    /// Replace one slot in place
    pub fn set_slot(&mut self, index: usize, slot: ActionSlot) -> Result<(), ValidationError> {
        *self.slot_mut(index)? = slot;
        Ok(())
    }

    /// Number of slots carrying any data
    pub fn used(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_blank()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::condition::{Combinator, ConditionRule, FieldName, Operator};
    use crate::macros::slot::ActionVerb;
    use serde_json::json;

    fn stored_item(binding: &str) -> ActionSlotWire {
        ActionSlotWire {
            action: "/press".to_string(),
            binding: binding.to_string(),
            delay_milliseconds: 100,
            period_milliseconds: 5000,
            additional: String::new(),
            conditions: vec![
                ConditionRule::new(FieldName::TargetHp, Operator::GreaterThan, 0.0).to_json(),
                ConditionRule::new(FieldName::MyMp, Operator::GreaterThan, 20.0).to_json(),
            ],
            conditions_combinator: "AND".to_string(),
        }
    }

    #[test]
    fn test_hydrate_short_input_pads_to_capacity() {
        let items = vec![stored_item("1"), stored_item("2"), stored_item("3")];
        let set = MacroSet::hydrate(&items, 20);

        assert_eq!(set.capacity(), 20);
        assert_eq!(set.used(), 3);
        assert!(set.slots()[3..].iter().all(ActionSlot::is_blank));
        assert_eq!(set.slots()[2].binding.as_str(), "3");

        let flat = set.flatten();
        assert_eq!(flat.len(), 20);
        assert_eq!(&flat[..3], &items[..]);
        assert!(flat[3..].iter().all(|item| *item == ActionSlotWire::default()));
    }

    #[test]
    fn test_hydrate_empty_input() {
        let set = MacroSet::hydrate(&[], 10);
        assert_eq!(set, MacroSet::blank(10));
        assert_eq!(set.flatten().len(), 10);
    }

    #[test]
    fn test_round_trip_full_length() {
        let items: Vec<_> = (0..10).map(|i| stored_item(&format!("f{}", i + 1))).collect();
        assert_eq!(MacroSet::hydrate(&items, 10).flatten(), items);
    }

    #[test]
    fn test_hydrate_drops_overflow() {
        let items: Vec<_> = (0..12).map(|i| stored_item(&i.to_string())).collect();
        let set = MacroSet::hydrate(&items, 10);
        assert_eq!(set.capacity(), 10);
        assert_eq!(set.flatten().len(), 10);
    }

    #[test]
    fn test_hydrate_invalid_item_falls_back_to_blank() {
        let mut bad = stored_item("1");
        bad.conditions_combinator = "XOR".to_string();
        let items = vec![stored_item("a"), bad, stored_item("c")];

        let set = MacroSet::hydrate(&items, 5);
        assert_eq!(set.slots()[0].action, Some(ActionVerb::Press));
        assert!(set.slots()[1].is_blank());
        assert_eq!(set.slots()[2].condition.combinator(), Some(Combinator::And));
    }

    #[test]
    fn test_hydrate_unknown_condition_field_blanks_only_that_slot() {
        let mut bad = stored_item("2");
        bad.conditions = vec![json!({"field": "party_member_hp_9", "operator": "<", "value": 50})];
        let items = vec![stored_item("1"), bad, stored_item("3")];

        let set = MacroSet::hydrate(&items, 4);
        assert_eq!(set.used(), 2);
        assert!(set.slots()[1].is_blank());
        assert_eq!(set.slots()[2].binding.as_str(), "3");
        assert_eq!(set.slots()[2].condition.len(), 2);
    }

    #[test]
    fn test_slot_access_out_of_range() {
        let mut set = MacroSet::blank(10);
        assert!(set.slot(9).is_ok());
        assert_eq!(
            set.slot_mut(10).unwrap_err(),
            ValidationError::SlotOutOfRange { index: 10, capacity: 10 }
        );
    }

    #[test]
    fn test_edit_in_place_keeps_positions() {
        let mut set = MacroSet::blank(5);
        let slot = set.slot_mut(3).unwrap();
        slot.action = Some(ActionVerb::Pickup);
        slot.binding = "alt+p".parse().unwrap();

        let flat = set.flatten();
        assert_eq!(flat.len(), 5);
        assert_eq!(flat[3].action, "/pickup");
        assert_eq!(flat[3].binding, "alt+p");
        assert_eq!(flat[2], ActionSlotWire::default());
    }
}
