//! Single-level boolean conditions attached to action slots
//!
//! A [`ConditionSet`] is an ordered list of rules joined by one combinator.
//! On the wire it is a flat array where the combinator token sits between
//! every pair of rules: `[r0, "AND", r1, "AND", r2]`. Nested groups are not
//! representable.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

use crate::constants::macros::PARTY_SIZE;
use crate::error::ValidationError;

/// Stat a rule compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldName {
    TargetHp,
    MyHp,
    MyMp,
    SinceLastSuccessTarget,
    FullTargetHpUnchangedSince,
    /// HP of party member 1..=8
    PartyMemberHp(u8),
}

const PARTY_MEMBER_PREFIX: &str = "party_member_hp_";

impl FieldName {
    pub fn as_str(&self) -> String {
        match self {
            FieldName::TargetHp => "target_hp".to_string(),
            FieldName::MyHp => "my_hp".to_string(),
            FieldName::MyMp => "my_mp".to_string(),
            FieldName::SinceLastSuccessTarget => "since_last_success_target".to_string(),
            FieldName::FullTargetHpUnchangedSince => "full_target_hp_unchanged_since".to_string(),
            FieldName::PartyMemberHp(slot) => format!("{PARTY_MEMBER_PREFIX}{slot}"),
        }
    }
}

impl FromStr for FieldName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "target_hp" => FieldName::TargetHp,
            "my_hp" => FieldName::MyHp,
            "my_mp" => FieldName::MyMp,
            "since_last_success_target" => FieldName::SinceLastSuccessTarget,
            "full_target_hp_unchanged_since" => FieldName::FullTargetHpUnchangedSince,
            other => {
                let slot = other
                    .strip_prefix(PARTY_MEMBER_PREFIX)
                    .and_then(|n| n.parse::<u8>().ok())
                    .filter(|n| (1..=PARTY_SIZE).contains(n))
                    .ok_or_else(|| ValidationError::UnknownField(other.to_string()))?;
                FieldName::PartyMemberHp(slot)
            }
        };
        Ok(field)
    }
}

impl TryFrom<String> for FieldName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldName> for String {
    fn from(field: FieldName) -> Self {
        field.as_str()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "<")]
    LessThan,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::GreaterThan => '>',
            Operator::Equal => '=',
            Operator::LessThan => '<',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '>' => Some(Operator::GreaterThan),
            '=' => Some(Operator::Equal),
            '<' => Some(Operator::LessThan),
            _ => None,
        }
    }
}

impl FromStr for Operator {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next().and_then(Operator::from_symbol), chars.next()) {
            (Some(op), None) => Ok(op),
            _ => Err(ValidationError::UnknownOperator(s.to_string())),
        }
    }
}

/// One comparison, replaced wholesale on edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRule {
    pub field: FieldName,
    pub operator: Operator,
    #[serde(deserialize_with = "deserialize_value", serialize_with = "serialize_value")]
    pub value: f64,
}

impl ConditionRule {
    pub fn new(field: FieldName, operator: Operator, value: f64) -> Self {
        Self { field, operator, value }
    }

    /// Validate one stored rule object (`{"field", "operator", "value"}`)
    pub fn from_json(raw: &Value) -> Result<Self, ValidationError> {
        let text = |key: &str| {
            raw.get(key)
                .and_then(Value::as_str)
                .ok_or_else(|| ValidationError::InvalidRule(raw.to_string()))
        };
        let field = text("field")?.parse()?;
        let operator = text("operator")?.parse()?;
        let value = match raw.get("value") {
            Some(Value::Number(n)) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ValidationError::InvalidValue(n.to_string()))?,
            Some(Value::String(s)) => parse_value(s)?,
            _ => return Err(ValidationError::InvalidRule(raw.to_string())),
        };
        Ok(Self::new(field, operator, value))
    }

    pub fn to_json(&self) -> Value {
        let value = if is_whole(self.value) {
            json!(self.value as i64)
        } else {
            json!(self.value)
        };
        json!({
            "field": self.field.as_str(),
            "operator": self.operator.symbol().to_string(),
            "value": value,
        })
    }
}

/// Finite numbers only; `nan`/`inf` cannot be written back as JSON
fn parse_value(raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidValue(raw.trim().to_string()))
}

fn is_whole(value: f64) -> bool {
    value.fract() == 0.0 && value.abs() < i64::MAX as f64
}

/// Accepts both numbers and numeric strings (query builders emit strings)
fn deserialize_value<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) if n.is_finite() => Ok(n),
        NumberOrText::Number(n) => Err(serde::de::Error::custom(ValidationError::InvalidValue(n.to_string()))),
        NumberOrText::Text(s) => parse_value(&s).map_err(serde::de::Error::custom),
    }
}

/// Writes whole numbers without a decimal point
fn serialize_value<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if is_whole(*value) {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Textual form used on the command line: `target_hp<30`
impl FromStr for ConditionRule {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pos, op) = s
            .char_indices()
            .find_map(|(i, c)| Operator::from_symbol(c).map(|op| (i, op)))
            .ok_or_else(|| ValidationError::InvalidRule(s.to_string()))?;
        let field = s[..pos].trim().parse()?;
        let value = parse_value(&s[pos + 1..])?;
        Ok(Self::new(field, op, value))
    }
}

impl fmt::Display for ConditionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.field, self.operator.symbol(), self.value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combinator {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

impl Combinator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }
}

impl FromStr for Combinator {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Combinator::And),
            "OR" => Ok(Combinator::Or),
            _ => Err(ValidationError::UnknownCombinator(s.to_string())),
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element of the flat wire array: a rule object or a combinator string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionToken {
    Rule(ConditionRule),
    Combinator(String),
}

/// Rules joined by a single combinator
///
/// Invariant: the combinator is present exactly when there are two or more rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSet {
    rules: Vec<ConditionRule>,
    combinator: Option<Combinator>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a set from its flat wire form
    ///
    /// Blank tokens are ignored. More than one distinct combinator is an error.
    /// Two or more rules without any token fall back to `AND`.
    pub fn parse(flat: &[ConditionToken]) -> Result<Self, ValidationError> {
        let mut rules = Vec::new();
        let mut seen: Vec<(Combinator, &str)> = Vec::new();

        for token in flat {
            match token {
                ConditionToken::Rule(rule) => rules.push(rule.clone()),
                ConditionToken::Combinator(raw) if raw.trim().is_empty() => {}
                ConditionToken::Combinator(raw) => {
                    let combinator: Combinator = raw.parse()?;
                    if !seen.iter().any(|(c, _)| *c == combinator) {
                        seen.push((combinator, raw.as_str()));
                    }
                }
            }
        }

        if seen.len() > 1 {
            let tokens = seen.iter().map(|(_, raw)| raw.to_string()).collect();
            return Err(ValidationError::MixedCombinators(tokens));
        }

        let combinator = if rules.len() > 1 {
            Some(seen.first().map(|(c, _)| *c).unwrap_or_default())
        } else {
            None
        };

        Ok(Self { rules, combinator })
    }

    /// Flat wire form: the combinator between every adjacent pair, none trailing
    pub fn serialize(&self) -> Vec<ConditionToken> {
        let mut flat = Vec::with_capacity(self.rules.len() * 2);
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                if let Some(combinator) = self.combinator {
                    flat.push(ConditionToken::Combinator(combinator.as_str().to_string()));
                }
            }
            flat.push(ConditionToken::Rule(rule.clone()));
        }
        flat
    }

    /// Build from the split slot fields (`conditions` + `conditions_combinator`)
    pub fn from_parts(rules: &[ConditionRule], combinator: &str) -> Result<Self, ValidationError> {
        let mut flat = Vec::with_capacity(rules.len() * 2);
        for (i, rule) in rules.iter().enumerate() {
            if i > 0 {
                flat.push(ConditionToken::Combinator(combinator.to_string()));
            }
            flat.push(ConditionToken::Rule(rule.clone()));
        }
        Self::parse(&flat)
    }

    /// Split the flat form back into rule objects and the first combinator token
    pub fn to_parts(&self) -> (Vec<ConditionRule>, String) {
        let mut rules = Vec::with_capacity(self.rules.len());
        let mut combinator = None;
        for token in self.serialize() {
            match token {
                ConditionToken::Rule(rule) => rules.push(rule),
                ConditionToken::Combinator(c) => {
                    combinator.get_or_insert(c);
                }
            }
        }
        (rules, combinator.unwrap_or_default())
    }

    pub fn rules(&self) -> &[ConditionRule] {
        &self.rules
    }

    pub fn combinator(&self) -> Option<Combinator> {
        self.combinator
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append a rule; the second rule brings in `AND` unless one is set later
    pub fn push_rule(&mut self, rule: ConditionRule) {
        self.rules.push(rule);
        if self.rules.len() > 1 && self.combinator.is_none() {
            self.combinator = Some(Combinator::default());
        }
    }

    pub fn set_combinator(&mut self, combinator: Combinator) -> Result<(), ValidationError> {
        if self.rules.len() < 2 {
            return Err(ValidationError::CombinatorWithoutPair);
        }
        self.combinator = Some(combinator);
        Ok(())
    }

    pub fn replace_rule(&mut self, index: usize, rule: ConditionRule) -> Result<(), ValidationError> {
        let len = self.rules.len();
        let slot = self
            .rules
            .get_mut(index)
            .ok_or(ValidationError::RuleOutOfRange { index, len })?;
        *slot = rule;
        Ok(())
    }

    pub fn remove_rule(&mut self, index: usize) -> Result<ConditionRule, ValidationError> {
        if index >= self.rules.len() {
            return Err(ValidationError::RuleOutOfRange {
                index,
                len: self.rules.len(),
            });
        }
        let removed = self.rules.remove(index);
        if self.rules.len() <= 1 {
            self.combinator = None;
        }
        Ok(removed)
    }
}

impl fmt::Display for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                let joiner = self.combinator.unwrap_or_default();
                write!(f, " {joiner} ")?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(field: FieldName, operator: Operator, value: f64) -> ConditionRule {
        ConditionRule::new(field, operator, value)
    }

    fn token(c: &str) -> ConditionToken {
        ConditionToken::Combinator(c.to_string())
    }

    #[test]
    fn test_single_rule_serializes_bare() {
        let mut set = ConditionSet::new();
        set.push_rule(rule(FieldName::TargetHp, Operator::LessThan, 30.0));

        let flat = serde_json::to_value(set.serialize()).unwrap();
        assert_eq!(flat, json!([{"field": "target_hp", "operator": "<", "value": 30}]));
        assert_eq!(set.combinator(), None);
    }

    #[test]
    fn test_adding_second_rule_interleaves_combinator() {
        let mut set = ConditionSet::new();
        set.push_rule(rule(FieldName::TargetHp, Operator::LessThan, 30.0));
        set.push_rule(rule(FieldName::MyMp, Operator::GreaterThan, 10.0));
        set.set_combinator(Combinator::And).unwrap();

        let flat = serde_json::to_value(set.serialize()).unwrap();
        assert_eq!(
            flat,
            json!([
                {"field": "target_hp", "operator": "<", "value": 30},
                "AND",
                {"field": "my_mp", "operator": ">", "value": 10}
            ])
        );
    }

    #[test]
    fn test_serialize_emits_n_minus_one_tokens() {
        let mut set = ConditionSet::new();
        for slot in 1..=4 {
            set.push_rule(rule(FieldName::PartyMemberHp(slot), Operator::LessThan, 50.0));
        }
        set.set_combinator(Combinator::Or).unwrap();

        let flat = set.serialize();
        let tokens: Vec<_> = flat
            .iter()
            .filter_map(|t| match t {
                ConditionToken::Combinator(c) => Some(c.as_str()),
                ConditionToken::Rule(_) => None,
            })
            .collect();
        assert_eq!(flat.len(), 7);
        assert_eq!(tokens, vec!["OR", "OR", "OR"]);
        assert!(matches!(flat.last(), Some(ConditionToken::Rule(_))));
    }

    #[test]
    fn test_parse_serialize_round_trip() {
        let mut set = ConditionSet::new();
        set.push_rule(rule(FieldName::MyHp, Operator::LessThan, 40.0));
        set.push_rule(rule(FieldName::SinceLastSuccessTarget, Operator::GreaterThan, 12.5));
        set.push_rule(rule(FieldName::FullTargetHpUnchangedSince, Operator::Equal, 3.0));
        set.set_combinator(Combinator::Or).unwrap();

        assert_eq!(ConditionSet::parse(&set.serialize()).unwrap(), set);
        assert_eq!(ConditionSet::parse(&ConditionSet::new().serialize()).unwrap(), ConditionSet::new());
    }

    #[test]
    fn test_serialize_parse_round_trip_from_wire() {
        let wire = json!([
            {"field": "my_hp", "operator": "<", "value": 40},
            "OR",
            {"field": "party_member_hp_8", "operator": "<", "value": 25}
        ]);
        let flat: Vec<ConditionToken> = serde_json::from_value(wire.clone()).unwrap();
        let set = ConditionSet::parse(&flat).unwrap();

        assert_eq!(set.combinator(), Some(Combinator::Or));
        assert_eq!(serde_json::to_value(set.serialize()).unwrap(), wire);
    }

    #[test]
    fn test_parse_rejects_mixed_combinators() {
        let flat = vec![
            ConditionToken::Rule(rule(FieldName::MyHp, Operator::LessThan, 1.0)),
            token("AND"),
            ConditionToken::Rule(rule(FieldName::MyMp, Operator::LessThan, 2.0)),
            token("OR"),
            ConditionToken::Rule(rule(FieldName::TargetHp, Operator::LessThan, 3.0)),
        ];
        let err = ConditionSet::parse(&flat).unwrap_err();
        assert_eq!(err, ValidationError::MixedCombinators(vec!["AND".into(), "OR".into()]));
    }

    #[test]
    fn test_parse_rejects_unknown_combinator() {
        let flat = vec![
            ConditionToken::Rule(rule(FieldName::MyHp, Operator::LessThan, 1.0)),
            token("XOR"),
            ConditionToken::Rule(rule(FieldName::MyMp, Operator::LessThan, 2.0)),
        ];
        assert!(matches!(
            ConditionSet::parse(&flat),
            Err(ValidationError::UnknownCombinator(_))
        ));
    }

    #[test]
    fn test_parse_empty_input() {
        let set = ConditionSet::parse(&[]).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.combinator(), None);
    }

    #[test]
    fn test_parse_drops_combinator_for_single_rule() {
        let flat = vec![
            ConditionToken::Rule(rule(FieldName::MyHp, Operator::LessThan, 1.0)),
            token("OR"),
        ];
        let set = ConditionSet::parse(&flat).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.combinator(), None);
    }

    #[test]
    fn test_parse_defaults_missing_combinator_to_and() {
        let flat = vec![
            ConditionToken::Rule(rule(FieldName::MyHp, Operator::LessThan, 1.0)),
            ConditionToken::Rule(rule(FieldName::MyMp, Operator::LessThan, 2.0)),
        ];
        let set = ConditionSet::parse(&flat).unwrap();
        assert_eq!(set.combinator(), Some(Combinator::And));
    }

    #[test]
    fn test_parse_treats_case_variants_as_one_combinator() {
        let flat = vec![
            ConditionToken::Rule(rule(FieldName::MyHp, Operator::LessThan, 1.0)),
            token("and"),
            ConditionToken::Rule(rule(FieldName::MyMp, Operator::LessThan, 2.0)),
            token("AND"),
            ConditionToken::Rule(rule(FieldName::TargetHp, Operator::LessThan, 3.0)),
        ];
        assert_eq!(ConditionSet::parse(&flat).unwrap().combinator(), Some(Combinator::And));
    }

    #[test]
    fn test_remove_rule_clears_combinator() {
        let mut set = ConditionSet::new();
        set.push_rule(rule(FieldName::MyHp, Operator::LessThan, 1.0));
        set.push_rule(rule(FieldName::MyMp, Operator::LessThan, 2.0));
        set.set_combinator(Combinator::Or).unwrap();

        let removed = set.remove_rule(0).unwrap();
        assert_eq!(removed.field, FieldName::MyHp);
        assert_eq!(set.combinator(), None);
        assert_eq!(set.serialize().len(), 1);

        assert_eq!(
            set.remove_rule(5),
            Err(ValidationError::RuleOutOfRange { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_set_combinator_needs_two_rules() {
        let mut set = ConditionSet::new();
        assert_eq!(set.set_combinator(Combinator::Or), Err(ValidationError::CombinatorWithoutPair));
        set.push_rule(rule(FieldName::MyHp, Operator::LessThan, 1.0));
        assert_eq!(set.set_combinator(Combinator::Or), Err(ValidationError::CombinatorWithoutPair));
    }

    #[test]
    fn test_replace_rule() {
        let mut set = ConditionSet::new();
        set.push_rule(rule(FieldName::MyHp, Operator::LessThan, 1.0));
        set.replace_rule(0, rule(FieldName::TargetHp, Operator::Equal, 0.0)).unwrap();
        assert_eq!(set.rules()[0].field, FieldName::TargetHp);
        assert!(set.replace_rule(1, rule(FieldName::MyHp, Operator::LessThan, 1.0)).is_err());
    }

    #[test]
    fn test_value_accepts_numeric_string() {
        let parsed: ConditionRule =
            serde_json::from_value(json!({"field": "my_mp", "operator": ">", "value": "15"})).unwrap();
        assert_eq!(parsed.value, 15.0);

        let bad = serde_json::from_value::<ConditionRule>(
            json!({"field": "my_mp", "operator": ">", "value": "lots"}),
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_field_names() {
        assert_eq!("party_member_hp_3".parse::<FieldName>().unwrap(), FieldName::PartyMemberHp(3));
        assert!("party_member_hp_9".parse::<FieldName>().is_err());
        assert!("party_member_hp_0".parse::<FieldName>().is_err());
        assert!("mana".parse::<FieldName>().is_err());
        assert_eq!(FieldName::FullTargetHpUnchangedSince.to_string(), "full_target_hp_unchanged_since");
    }

    #[test]
    fn test_rule_from_text() {
        let parsed: ConditionRule = "target_hp<30".parse().unwrap();
        assert_eq!(parsed, rule(FieldName::TargetHp, Operator::LessThan, 30.0));

        let spaced: ConditionRule = " my_mp > 12.5 ".parse().unwrap();
        assert_eq!(spaced, rule(FieldName::MyMp, Operator::GreaterThan, 12.5));

        assert!("target_hp".parse::<ConditionRule>().is_err());
        assert!("target_hp<abc".parse::<ConditionRule>().is_err());
        assert_eq!(parsed.to_string(), "target_hp<30");
    }

    #[test]
    fn test_rule_rejects_non_finite_values() {
        for text in ["target_hp<nan", "my_hp>inf", "my_mp=-infinity"] {
            assert!(
                matches!(text.parse::<ConditionRule>(), Err(ValidationError::InvalidValue(_))),
                "{text} should be rejected"
            );
        }

        let stored = json!({"field": "target_hp", "operator": "<", "value": "NaN"});
        assert!(serde_json::from_value::<ConditionRule>(stored.clone()).is_err());
        assert_eq!(
            ConditionRule::from_json(&stored),
            Err(ValidationError::InvalidValue("NaN".into()))
        );
    }

    #[test]
    fn test_rule_from_json() {
        let parsed = ConditionRule::from_json(&json!({"field": "my_hp", "operator": "<", "value": "40"})).unwrap();
        assert_eq!(parsed, rule(FieldName::MyHp, Operator::LessThan, 40.0));
        assert_eq!(parsed.to_json(), json!({"field": "my_hp", "operator": "<", "value": 40}));

        let fractional = rule(FieldName::SinceLastSuccessTarget, Operator::GreaterThan, 2.5);
        assert_eq!(ConditionRule::from_json(&fractional.to_json()).unwrap(), fractional);

        assert_eq!(
            ConditionRule::from_json(&json!({"field": "party_member_hp_9", "operator": "<", "value": 1})),
            Err(ValidationError::UnknownField("party_member_hp_9".into()))
        );
        assert_eq!(
            ConditionRule::from_json(&json!({"field": "my_hp", "operator": "!=", "value": 1})),
            Err(ValidationError::UnknownOperator("!=".into()))
        );
        assert!(matches!(
            ConditionRule::from_json(&json!("AND")),
            Err(ValidationError::InvalidRule(_))
        ));
    }

    #[test]
    fn test_display_joins_rules() {
        let mut set = ConditionSet::new();
        set.push_rule("my_hp<50".parse().unwrap());
        set.push_rule("my_mp>10".parse().unwrap());
        set.set_combinator(Combinator::Or).unwrap();
        assert_eq!(set.to_string(), "my_hp<50 OR my_mp>10");
    }
}
