use std::fmt;
use std::str::FromStr;

use failure::format_err;
use lazy_static::lazy_static;
use regex::Regex;
use serde_derive::{Deserialize, Serialize};

use crate::errors::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogueActType {
    Inform,
    Confirm,
    Deny,
    Request,
    Reqalts,
    Hello,
    Bye,
    Affirm,
    Negate,
    Help,
    Repeat,
    Restart,
    Thankyou,
    Ack,
    Apology,
    Canthearyou,
    Notunderstood,
    Silence,
    Null,
    Other,
}

impl DialogueActType {
    pub fn identifier(&self) -> &'static str {
        match self {
            DialogueActType::Inform => "inform",
            DialogueActType::Confirm => "confirm",
            DialogueActType::Deny => "deny",
            DialogueActType::Request => "request",
            DialogueActType::Reqalts => "reqalts",
            DialogueActType::Hello => "hello",
            DialogueActType::Bye => "bye",
            DialogueActType::Affirm => "affirm",
            DialogueActType::Negate => "negate",
            DialogueActType::Help => "help",
            DialogueActType::Repeat => "repeat",
            DialogueActType::Restart => "restart",
            DialogueActType::Thankyou => "thankyou",
            DialogueActType::Ack => "ack",
            DialogueActType::Apology => "apology",
            DialogueActType::Canthearyou => "canthearyou",
            DialogueActType::Notunderstood => "notunderstood",
            DialogueActType::Silence => "silence",
            DialogueActType::Null => "null",
            DialogueActType::Other => "other",
        }
    }
}

impl FromStr for DialogueActType {
    type Err = SluError;

    fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
        Ok(match s {
            "inform" => DialogueActType::Inform,
            "confirm" => DialogueActType::Confirm,
            "deny" => DialogueActType::Deny,
            "request" => DialogueActType::Request,
            "reqalts" => DialogueActType::Reqalts,
            "hello" => DialogueActType::Hello,
            "bye" => DialogueActType::Bye,
            "affirm" => DialogueActType::Affirm,
            "negate" => DialogueActType::Negate,
            "help" => DialogueActType::Help,
            "repeat" => DialogueActType::Repeat,
            "restart" => DialogueActType::Restart,
            "thankyou" => DialogueActType::Thankyou,
            "ack" => DialogueActType::Ack,
            "apology" => DialogueActType::Apology,
            "canthearyou" => DialogueActType::Canthearyou,
            "notunderstood" => DialogueActType::Notunderstood,
            "silence" => DialogueActType::Silence,
            "null" => DialogueActType::Null,
            "other" => DialogueActType::Other,
            _ => return Err(SluError::InvalidDialogueAct(s.to_string())),
        })
    }
}

impl fmt::Display for DialogueActType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// A single `act(slot="value")` interpretation. A missing slot with a value
/// present means the slot could not be resolved and is left to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DialogueActItem {
    pub act_type: DialogueActType,
    pub slot: Option<String>,
    pub value: Option<String>,
}

impl DialogueActItem {
    pub fn new(act_type: DialogueActType) -> Self {
        Self {
            act_type,
            slot: None,
            value: None,
        }
    }

    pub fn with_slot<S: Into<String>>(act_type: DialogueActType, slot: S) -> Self {
        Self {
            act_type,
            slot: Some(slot.into()),
            value: None,
        }
    }

    pub fn with_slot_value<S: Into<String>, V: Into<String>>(
        act_type: DialogueActType,
        slot: S,
        value: V,
    ) -> Self {
        Self {
            act_type,
            slot: Some(slot.into()),
            value: Some(value.into()),
        }
    }

    pub fn with_value<V: Into<String>>(act_type: DialogueActType, value: V) -> Self {
        Self {
            act_type,
            slot: None,
            value: Some(value.into()),
        }
    }
}

impl fmt::Display for DialogueActItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.act_type)?;
        if let Some(slot) = self.slot.as_ref() {
            write!(f, "{}", slot)?;
        }
        if let Some(value) = self.value.as_ref() {
            write!(f, "=\"{}\"", value)?;
        }
        write!(f, ")")
    }
}

lazy_static! {
    static ref ITEM_REGEX: Regex =
        Regex::new(r#"^([a-z]+)\(([A-Za-z0-9_]*)(?:=(?:"([^"]*)"|([^"()]*)))?\)$"#).unwrap();
}

impl FromStr for DialogueActItem {
    type Err = failure::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let caps = ITEM_REGEX
            .captures(trimmed)
            .ok_or_else(|| SluError::InvalidDialogueAct(trimmed.to_string()))?;
        let act_type = DialogueActType::from_str(&caps[1])?;
        let slot = caps
            .get(2)
            .map(|slot| slot.as_str())
            .filter(|slot| !slot.is_empty())
            .map(|slot| slot.to_string());
        let value = caps
            .get(3)
            .or_else(|| caps.get(4))
            .map(|value| value.as_str().to_string());
        Ok(Self {
            act_type,
            slot,
            value,
        })
    }
}

/// Parses an `&`-separated dialogue act such as `hello()&inform(to_stop="Wall St")`
pub fn parse_dialogue_act(s: &str) -> Result<Vec<DialogueActItem>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(format_err!("Empty dialogue act"));
    }
    trimmed.split('&').map(DialogueActItem::from_str).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueActHypothesis {
    pub weight: f32,
    #[serde(flatten)]
    pub item: DialogueActItem,
}

/// Weighted set of alternative interpretations of one utterance.
///
/// `add` appends without deduplication; `merge` collapses identical items by
/// summing their weights, capped at 1.0, and keeps first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DialogueActConfusionNetwork {
    hypotheses: Vec<DialogueActHypothesis>,
}

impl DialogueActConfusionNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, weight: f32, item: DialogueActItem) {
        self.hypotheses.push(DialogueActHypothesis { weight, item });
    }

    pub fn merge(&mut self) {
        let mut merged: Vec<DialogueActHypothesis> = Vec::with_capacity(self.hypotheses.len());
        for hypothesis in self.hypotheses.drain(..) {
            match merged
                .iter_mut()
                .find(|existing| existing.item == hypothesis.item)
            {
                Some(existing) => existing.weight = (existing.weight + hypothesis.weight).min(1.0),
                None => merged.push(DialogueActHypothesis {
                    weight: hypothesis.weight.min(1.0),
                    item: hypothesis.item,
                }),
            }
        }
        self.hypotheses = merged;
    }

    pub fn len(&self) -> usize {
        self.hypotheses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DialogueActHypothesis> {
        self.hypotheses.iter()
    }

    pub fn items(&self) -> impl Iterator<Item = &DialogueActItem> {
        self.hypotheses.iter().map(|hypothesis| &hypothesis.item)
    }

    pub fn contains(&self, item: &DialogueActItem) -> bool {
        self.items().any(|current| current == item)
    }

    /// Total weight of `item`, or `None` if it was never added
    pub fn weight_of(&self, item: &DialogueActItem) -> Option<f32> {
        self.hypotheses
            .iter()
            .filter(|hypothesis| &hypothesis.item == item)
            .map(|hypothesis| hypothesis.weight)
            .fold(None, |total, weight| Some(total.unwrap_or(0.0) + weight))
    }

    pub fn has_act_type(&self, act_type: DialogueActType) -> bool {
        self.items().any(|item| item.act_type == act_type)
    }
}

impl fmt::Display for DialogueActConfusionNetwork {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for hypothesis in &self.hypotheses {
            writeln!(f, "{:.3} {}", hypothesis.weight, hypothesis.item)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use super::*;
    use crate::testutils::epsilon_eq;

    #[test]
    fn test_display_and_parse_items() {
        // Given
        let items = vec![
            DialogueActItem::new(DialogueActType::Hello),
            DialogueActItem::with_slot(DialogueActType::Request, "from_stop"),
            DialogueActItem::with_slot_value(DialogueActType::Inform, "to_stop", "Wall St"),
            DialogueActItem::with_value(DialogueActType::Inform, "Brooklyn"),
        ];

        // When
        let formatted: Vec<String> = items.iter().map(|item| item.to_string()).collect();

        // Then
        assert_eq!(
            vec![
                "hello()",
                "request(from_stop)",
                "inform(to_stop=\"Wall St\")",
                "inform(=\"Brooklyn\")",
            ],
            formatted
        );
        let parsed: Vec<DialogueActItem> = formatted
            .iter()
            .map(|item| item.parse().unwrap())
            .collect();
        assert_eq!(items, parsed);
    }

    #[test]
    fn test_parse_dialogue_act() {
        // When
        let items = parse_dialogue_act("hello()&inform(task=find_connection)").unwrap();

        // Then
        assert_eq!(
            vec![
                DialogueActItem::new(DialogueActType::Hello),
                DialogueActItem::with_slot_value(
                    DialogueActType::Inform,
                    "task",
                    "find_connection"
                ),
            ],
            items
        );
        assert!(parse_dialogue_act("").is_err());
        assert!(parse_dialogue_act("greet()").is_err());
        assert!(parse_dialogue_act("hello(").is_err());
    }

    #[test]
    fn test_merge_sums_duplicates_and_caps_weights() {
        // Given
        let from_a = DialogueActItem::with_slot_value(DialogueActType::Inform, "from_stop", "A");
        let to_a = DialogueActItem::with_slot_value(DialogueActType::Inform, "to_stop", "A");
        let hello = DialogueActItem::new(DialogueActType::Hello);
        let mut network = DialogueActConfusionNetwork::new();
        network.add(0.501, from_a.clone());
        network.add(0.499, to_a.clone());
        network.add(1.0, hello.clone());
        network.add(0.3, to_a.clone());
        network.add(1.0, hello.clone());

        // When
        network.merge();

        // Then
        assert_eq!(3, network.len());
        let order: Vec<&DialogueActItem> = network.items().collect();
        assert_eq!(vec![&from_a, &to_a, &hello], order);
        assert!(epsilon_eq(0.501, network.weight_of(&from_a).unwrap(), 1e-6));
        assert!(epsilon_eq(0.799, network.weight_of(&to_a).unwrap(), 1e-6));
        assert_eq!(1.0, network.weight_of(&hello).unwrap());
    }

    #[test]
    fn test_merge_empty_network() {
        // Given
        let mut network = DialogueActConfusionNetwork::new();

        // When
        network.merge();

        // Then
        assert!(network.is_empty());
    }

    #[test]
    fn test_serialize_network() {
        // Given
        let mut network = DialogueActConfusionNetwork::new();
        network.add(
            1.0,
            DialogueActItem::with_slot_value(DialogueActType::Inform, "vehicle", "bus"),
        );

        // When
        let json = serde_json::to_value(&network).unwrap();

        // Then
        let expected = serde_json::json!([{
            "weight": 1.0,
            "act_type": "inform",
            "slot": "vehicle",
            "value": "bus"
        }]);
        assert_eq!(expected, json);
    }
}
