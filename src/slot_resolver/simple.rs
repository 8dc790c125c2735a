use super::SlotResolver;
use crate::dialogue_act::{DialogueActConfusionNetwork, DialogueActItem, DialogueActType};
use crate::models::SlotActPhrases;
use crate::phrases::PhraseSet;
use crate::utterance::{tag_value, CategoryName, Utterance};

/// Emits one item per tag of its category. The act type is decided once for
/// the whole utterance.
pub struct CategorySlotResolver {
    category: CategoryName,
    slot: String,
    confirm: PhraseSet,
    deny: PhraseSet,
    /// When one of these phrases is present, no item is emitted
    blockers: PhraseSet,
}

impl CategorySlotResolver {
    pub fn new<C: Into<CategoryName>, S: Into<String>>(
        category: C,
        slot: S,
        confirm: PhraseSet,
        deny: PhraseSet,
        blockers: PhraseSet,
    ) -> Self {
        Self {
            category: category.into(),
            slot: slot.into(),
            confirm,
            deny,
            blockers,
        }
    }

    pub fn date_rel(phrases: &SlotActPhrases) -> Self {
        Self::new(
            "DATE_REL",
            "date_rel",
            phrases.confirm.clone(),
            phrases.deny.clone(),
            PhraseSet::default(),
        )
    }

    pub fn ampm(phrases: &SlotActPhrases) -> Self {
        Self::new(
            "AMPM",
            "ampm",
            phrases.confirm.clone(),
            phrases.deny.clone(),
            phrases.ampm_blockers.clone(),
        )
    }

    pub fn vehicle(phrases: &SlotActPhrases) -> Self {
        Self::new(
            "VEHICLE",
            "vehicle",
            phrases.confirm.clone(),
            phrases.deny.clone(),
            PhraseSet::default(),
        )
    }

    pub fn task(phrases: &SlotActPhrases) -> Self {
        Self::new(
            "TASK",
            "task",
            PhraseSet::default(),
            phrases.task_deny.clone(),
            PhraseSet::default(),
        )
    }
}

impl SlotResolver for CategorySlotResolver {
    fn category(&self) -> &str {
        &self.category
    }

    fn resolve(&self, utterance: &Utterance, network: &mut DialogueActConfusionNetwork) {
        let tokens = utterance.tokens();
        if self.blockers.any_in(tokens) {
            return;
        }
        let act_type = if self.confirm.any_in(tokens) {
            DialogueActType::Confirm
        } else if self.deny.any_in(tokens) {
            DialogueActType::Deny
        } else {
            DialogueActType::Inform
        };
        for value in tokens
            .iter()
            .filter_map(|token| tag_value(token, &self.category))
        {
            network.add(
                1.0,
                DialogueActItem::with_slot_value(act_type, self.slot.as_str(), value),
            );
        }
    }
}
