use log::debug;

use super::SlotResolver;
use crate::dialogue_act::{DialogueActConfusionNetwork, DialogueActItem, DialogueActType};
use crate::models::TimePhrases;
use crate::utterance::{tag_value, Token, Utterance};

const TIME_CATEGORY: &str = "TIME";
const NOW: &str = "now";

/// Resolves absolute and relative times, along with whether they are
/// departure or arrival times
pub struct TimeResolver {
    phrases: TimePhrases,
}

/// State carried from one time mention to the next
#[derive(Debug, Default)]
struct Scan {
    last_position: usize,
    last_subslot: String,
    hypotheses: Vec<DialogueActItem>,
}

impl TimeResolver {
    pub fn new(phrases: TimePhrases) -> Self {
        Self { phrases }
    }

    fn follows_one_of(tokens: &[Token], position: usize, prepositions: &[String]) -> bool {
        position >= 1 && prepositions.contains(&tokens[position - 1])
    }

    /// First matching `(act type, subslot)` of the context table. Positive
    /// phrases are looked for in `context`, negative ones in the whole
    /// utterance.
    fn context_type(&self, tokens: &[Token], context: &[Token]) -> (DialogueActType, String) {
        self.phrases
            .contexts
            .iter()
            .find(|cue| cue.positive.any_in(context) && !cue.negative.any_in(tokens))
            .map(|cue| (cue.act_type, cue.subslot.clone()))
            .unwrap_or((DialogueActType::Inform, String::new()))
    }

    fn resolve_mention(
        &self,
        tokens: &[Token],
        nb_mentions: usize,
        scan: Scan,
        position: usize,
        value: &str,
    ) -> Scan {
        let Scan {
            last_position,
            mut last_subslot,
            mut hypotheses,
        } = scan;
        let context = if nb_mentions > 1 {
            &tokens[last_position..position]
        } else {
            tokens
        };
        let is_absolute = Self::follows_one_of(tokens, position, &self.phrases.absolute_prepositions);
        let is_relative = Self::follows_one_of(tokens, position, &self.phrases.relative_prepositions)
            || (value == NOW && !self.phrases.now_exclusions.any_in(context));

        if is_absolute || is_relative {
            let (act_type, mut subslot) = self.context_type(tokens, context);
            if nb_mentions > 1 && subslot.is_empty() {
                subslot = last_subslot.clone();
            }
            let slot = format!(
                "{}_{}",
                subslot,
                if is_relative { "time_rel" } else { "time" }
            )
            .trim_start_matches('_')
            .to_string();
            debug!("Time '{}' at {} resolved as {}({})", value, position, act_type, slot);
            hypotheses.push(DialogueActItem::with_slot_value(act_type, slot, value));
            last_subslot = subslot;
        } else {
            debug!("Time '{}' at {} has no time context", value, position);
        }

        Scan {
            last_position: position + 1,
            last_subslot,
            hypotheses,
        }
    }
}

impl SlotResolver for TimeResolver {
    fn category(&self) -> &str {
        TIME_CATEGORY
    }

    fn resolve(&self, utterance: &Utterance, network: &mut DialogueActConfusionNetwork) {
        let tokens = utterance.tokens();
        let mentions: Vec<(usize, &str)> = tokens
            .iter()
            .enumerate()
            .filter_map(|(position, token)| {
                tag_value(token, TIME_CATEGORY).map(|value| (position, value))
            })
            .collect();
        let nb_mentions = mentions.len();
        let scan = mentions
            .into_iter()
            .fold(Scan::default(), |scan, (position, value)| {
                self.resolve_mention(tokens, nb_mentions, scan, position, value)
            });
        for item in scan.hypotheses {
            network.add(1.0, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(tokens: Vec<&str>) -> Vec<DialogueActItem> {
        let mut network = DialogueActConfusionNetwork::new();
        TimeResolver::new(TimePhrases::default()).resolve(&Utterance::new(tokens), &mut network);
        network.items().cloned().collect()
    }

    fn item(act_type: DialogueActType, slot: &str, value: &str) -> DialogueActItem {
        DialogueActItem::with_slot_value(act_type, slot, value)
    }

    #[test]
    fn test_absolute_and_relative_times() {
        assert_eq!(
            vec![item(DialogueActType::Inform, "time", "7:30")],
            resolve(vec!["at", "TIME=7:30"])
        );
        assert_eq!(
            vec![item(DialogueActType::Inform, "time_rel", "0:20")],
            resolve(vec!["in", "TIME=0:20"])
        );
        assert!(resolve(vec!["TIME=7:30", "please"]).is_empty());
    }

    #[test]
    fn test_subslot_from_context() {
        assert_eq!(
            vec![item(DialogueActType::Inform, "arrival_time", "9:00")],
            resolve(vec!["i", "want", "to", "arrive", "at", "TIME=9:00"])
        );
        assert_eq!(
            vec![item(DialogueActType::Inform, "departure_time", "9:00")],
            resolve(vec!["it", "should", "be", "leaving", "at", "TIME=9:00"])
        );
        assert_eq!(
            vec![item(DialogueActType::Deny, "departure_time", "9:00")],
            resolve(vec!["i", "am", "not", "leaving", "at", "TIME=9:00"])
        );
    }

    #[test]
    fn test_arrival_cue_anywhere_blocks_departure_inform() {
        // When
        let items = resolve(vec!["leaving", "at", "TIME=9:00", "to", "arrive", "soon"]);

        // Then
        assert_eq!(vec![item(DialogueActType::Inform, "arrival_time", "9:00")], items);
    }

    #[test]
    fn test_subslot_is_carried_forward() {
        // When
        let items = resolve(vec![
            "departure", "at", "TIME=8:00", "or", "maybe", "at", "TIME=9:00",
        ]);

        // Then
        assert_eq!(
            vec![
                item(DialogueActType::Inform, "departure_time", "8:00"),
                item(DialogueActType::Inform, "departure_time", "9:00"),
            ],
            items
        );
    }

    #[test]
    fn test_now_is_relative_unless_excluded() {
        assert_eq!(
            vec![item(DialogueActType::Inform, "time_rel", "now")],
            resolve(vec!["i", "need", "a", "bus", "TIME=now"])
        );
        assert!(resolve(vec!["so", "what", "TIME=now"]).is_empty());
        assert_eq!(
            vec![item(DialogueActType::Inform, "time", "now")],
            resolve(vec!["so", "what", "at", "TIME=now"])
        );
    }

    #[test]
    fn test_confirmed_departure_and_arrival_times() {
        assert_eq!(
            vec![item(DialogueActType::Confirm, "departure_time", "9:00")],
            resolve(vec!["it", "leaves", "at", "TIME=9:00"])
        );
        assert_eq!(
            vec![item(DialogueActType::Confirm, "arrival_time", "9:30")],
            resolve(vec!["it", "arrives", "at", "TIME=9:30"])
        );
        assert_eq!(
            vec![item(DialogueActType::Confirm, "time_rel", "0:10")],
            resolve(vec!["it", "is", "in", "TIME=0:10"])
        );
    }
}
