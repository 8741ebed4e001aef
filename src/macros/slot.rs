//! Action slots: one positional row of a macro set

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::condition::{ConditionRule, ConditionSet};
use super::key::KeyCombo;
use crate::error::ValidationError;

/// Action the agent performs when a slot fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionVerb {
    AssistPartyMember,
    Assist,
    Attack,
    Target,
    TargetNext,
    Delay,
    Press,
    Pickup,
    AiTargetNext,
    Stop,
    Unstuck,
    UseSkill,
}

impl ActionVerb {
    pub const ALL: [ActionVerb; 12] = [
        ActionVerb::AssistPartyMember,
        ActionVerb::Assist,
        ActionVerb::Attack,
        ActionVerb::Target,
        ActionVerb::TargetNext,
        ActionVerb::Delay,
        ActionVerb::Press,
        ActionVerb::Pickup,
        ActionVerb::AiTargetNext,
        ActionVerb::Stop,
        ActionVerb::Unstuck,
        ActionVerb::UseSkill,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionVerb::AssistPartyMember => "/assistpartymember",
            ActionVerb::Assist => "/assist",
            ActionVerb::Attack => "/attack",
            ActionVerb::Target => "/target",
            ActionVerb::TargetNext => "/targetnext",
            ActionVerb::Delay => "/delay",
            ActionVerb::Press => "/press",
            ActionVerb::Pickup => "/pickup",
            ActionVerb::AiTargetNext => "/aitargetnext",
            ActionVerb::Stop => "/stop",
            ActionVerb::Unstuck => "/unstuck",
            ActionVerb::UseSkill => "/useskill",
        }
    }
}

impl FromStr for ActionVerb {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let wanted = wanted.strip_prefix('/').unwrap_or(wanted);
        ActionVerb::ALL
            .into_iter()
            .find(|verb| verb.as_str()[1..].eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownAction(s.to_string()))
    }
}

impl fmt::Display for ActionVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse user-typed delay/period text. Blank means unset (`0`).
pub fn parse_millis(text: &str) -> Result<u64, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidMillis(text.to_string()))
}

/// Wire shape of one slot
///
/// Decoding never rejects a slot on content: conditions stay raw JSON and
/// scalar fields take whatever the store holds. [`ActionSlot::from_wire`]
/// validates. Capitalized aliases accept documents written by the Go server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionSlotWire {
    #[serde(default, alias = "Action", deserialize_with = "deserialize_text")]
    pub action: String,
    #[serde(default, alias = "Binding", deserialize_with = "deserialize_text")]
    pub binding: String,
    #[serde(default, deserialize_with = "deserialize_millis")]
    pub delay_milliseconds: u64,
    #[serde(default, deserialize_with = "deserialize_millis")]
    pub period_milliseconds: u64,
    #[serde(default, alias = "Additional", deserialize_with = "deserialize_text")]
    pub additional: String,
    #[serde(default, alias = "Conditions", deserialize_with = "deserialize_rules")]
    pub conditions: Vec<Value>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub conditions_combinator: String,
}

/// Any JSON number; `null` (a browser's NaN), negatives and junk read as unset
fn deserialize_millis<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMillis {
        Whole(u64),
        Fraction(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let fraction = |n: f64| if n.is_finite() && n >= 0.0 { n.trunc() as u64 } else { 0 };
    Ok(match RawMillis::deserialize(deserializer)? {
        RawMillis::Whole(n) => n,
        RawMillis::Fraction(n) => fraction(n),
        RawMillis::Text(s) => s.trim().parse::<f64>().map(fraction).unwrap_or(0),
        RawMillis::Other(_) => 0,
    })
}

/// Strings as-is, `null` as empty, other scalars in their JSON text form
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// `null` reads as no conditions (Go writes nil slices that way); a lone
/// object is kept so validation can report it
fn deserialize_rules<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    })
}

/// One row of a preset: what to press, when, and under which condition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionSlot {
    pub action: Option<ActionVerb>,
    pub binding: KeyCombo,
    /// Milliseconds, `0` when unset
    pub delay_ms: u64,
    /// Milliseconds, `0` when unset
    pub period_ms: u64,
    pub additional: String,
    pub condition: ConditionSet,
}

impl ActionSlot {
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    pub fn from_wire(wire: &ActionSlotWire) -> Result<Self, ValidationError> {
        let action = match wire.action.trim() {
            "" => None,
            verb => Some(verb.parse()?),
        };
        let rules = wire
            .conditions
            .iter()
            .map(ConditionRule::from_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            action,
            binding: wire.binding.parse()?,
            delay_ms: wire.delay_milliseconds,
            period_ms: wire.period_milliseconds,
            additional: wire.additional.clone(),
            condition: ConditionSet::from_parts(&rules, &wire.conditions_combinator)?,
        })
    }

    pub fn to_wire(&self) -> ActionSlotWire {
        let (conditions, conditions_combinator) = self.condition.to_parts();
        ActionSlotWire {
            action: self.action.map(|verb| verb.as_str().to_string()).unwrap_or_default(),
            binding: self.binding.to_string(),
            delay_milliseconds: self.delay_ms,
            period_milliseconds: self.period_ms,
            additional: self.additional.clone(),
            conditions: conditions.iter().map(ConditionRule::to_json).collect(),
            conditions_combinator,
        }
    }
}
