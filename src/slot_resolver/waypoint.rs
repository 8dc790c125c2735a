use std::ops::Range;

use log::debug;

use super::SlotResolver;
use crate::dialogue_act::{DialogueActConfusionNetwork, DialogueActItem, DialogueActType};
use crate::models::{ActCue, WaypointPhrases};
use crate::phrases::{span_is_closer, PhraseSet};
use crate::utterance::{tag_value, CategoryName, Token, Utterance};

const PRECEDING_WINDOW: usize = 5;
const FOLLOWING_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointType {
    From,
    To,
    Via,
    In,
}

impl WaypointType {
    pub fn identifier(&self) -> &'static str {
        match self {
            WaypointType::From => "from",
            WaypointType::To => "to",
            WaypointType::Via => "via",
            WaypointType::In => "in",
        }
    }
}

/// Outcome of the direction analysis of one waypoint mention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Resolved(WaypointType),
    /// The same context phrase announces both an origin and a destination
    FromOrTo,
    Unresolved,
}

/// Resolves the role (origin, destination, transfer point...) of the stop or
/// city mentions of an abstracted utterance
pub struct WaypointResolver {
    category: CategoryName,
    slot_suffix: String,
    phrases: WaypointPhrases,
    act_cues: Vec<ActCue>,
}

/// State carried from one mention to the next
#[derive(Debug, Default)]
struct Scan {
    last_position: usize,
    hypotheses: Vec<(f32, DialogueActItem)>,
}

impl WaypointResolver {
    pub fn new<C: Into<CategoryName>, S: Into<String>>(
        category: C,
        slot_suffix: S,
        phrases: WaypointPhrases,
        act_cues: Vec<ActCue>,
    ) -> Self {
        Self {
            category: category.into(),
            slot_suffix: slot_suffix.into(),
            phrases,
            act_cues,
        }
    }

    fn typed_phrases(&self) -> impl Iterator<Item = (WaypointType, &PhraseSet)> {
        vec![
            (WaypointType::From, &self.phrases.from),
            (WaypointType::To, &self.phrases.to),
            (WaypointType::Via, &self.phrases.via),
            (WaypointType::In, &self.phrases.in_context),
        ]
        .into_iter()
        .filter(|(_, phrases)| !phrases.is_empty())
    }

    /// The type whose rightmost phrase in `window` is the closest to the
    /// mention
    fn preceding_direction(&self, window: &[Token]) -> Direction {
        let spans: Vec<(WaypointType, Range<usize>)> = self
            .typed_phrases()
            .filter_map(|(waypoint_type, phrases)| {
                phrases.last_span(window).map(|span| (waypoint_type, span))
            })
            .collect();
        let best_span = match spans
            .iter()
            .map(|(_, span)| span)
            .fold(None, |best: Option<&Range<usize>>, span| match best {
                Some(current) if !span_is_closer(span, current) => Some(current),
                _ => Some(span),
            }) {
            Some(span) => span.clone(),
            None => return Direction::Unresolved,
        };
        let best_types: Vec<WaypointType> = spans
            .iter()
            .filter(|(_, span)| *span == best_span)
            .map(|(waypoint_type, _)| *waypoint_type)
            .collect();
        if best_types.contains(&WaypointType::From) && best_types.contains(&WaypointType::To) {
            Direction::FromOrTo
        } else {
            Direction::Resolved(best_types[0])
        }
    }

    fn is_mention(&self, token: &str) -> bool {
        tag_value(token, &self.category).is_some()
    }

    fn direction(&self, tokens: &[Token], last_position: usize, position: usize) -> Direction {
        let preceding = &tokens[last_position.max(position.saturating_sub(PRECEDING_WINDOW))..position];
        let direction = self.preceding_direction(preceding);
        if direction != Direction::Unresolved {
            return direction;
        }

        let following = &tokens[position..(position + FOLLOWING_WINDOW).min(tokens.len())];
        if self.phrases.from.any_in(following) || self.phrases.via.any_in(following) {
            return Direction::Resolved(WaypointType::To);
        }
        if self.phrases.to.any_in(following) {
            return Direction::Resolved(WaypointType::From);
        }

        if position >= 1 && self.is_mention(&tokens[position - 1]) {
            return Direction::Resolved(WaypointType::To);
        }
        if position + 1 < tokens.len() && self.is_mention(&tokens[position + 1]) {
            return Direction::Resolved(WaypointType::From);
        }

        if self.phrases.in_fallback.any_in(preceding) {
            return Direction::Resolved(WaypointType::In);
        }
        Direction::Unresolved
    }

    fn act_type(&self, context: &[Token]) -> DialogueActType {
        self.act_cues
            .iter()
            .find(|cue| cue.positive.any_in(context) && !cue.negative.any_in(context))
            .map(|cue| cue.act_type)
            .unwrap_or(DialogueActType::Inform)
    }

    fn slot(&self, waypoint_type: WaypointType) -> String {
        format!("{}_{}", waypoint_type.identifier(), self.slot_suffix)
    }

    fn resolve_mention(&self, tokens: &[Token], scan: Scan, position: usize, value: &str) -> Scan {
        let Scan {
            last_position,
            mut hypotheses,
        } = scan;
        let act_type = self.act_type(&tokens[last_position..position]);
        let direction = self.direction(tokens, last_position, position);
        debug!(
            "{} mention '{}' at {}: {:?}, {}",
            self.category, value, position, direction, act_type
        );
        match direction {
            Direction::Resolved(waypoint_type) => hypotheses.push((
                1.0,
                DialogueActItem::with_slot_value(act_type, self.slot(waypoint_type), value),
            )),
            Direction::FromOrTo => {
                hypotheses.push((
                    0.501,
                    DialogueActItem::with_slot_value(act_type, self.slot(WaypointType::From), value),
                ));
                hypotheses.push((
                    0.499,
                    DialogueActItem::with_slot_value(act_type, self.slot(WaypointType::To), value),
                ));
            }
            Direction::Unresolved => {
                hypotheses.push((1.0, DialogueActItem::with_value(act_type, value)))
            }
        }
        Scan {
            last_position: position + 1,
            hypotheses,
        }
    }
}

impl SlotResolver for WaypointResolver {
    fn category(&self) -> &str {
        &self.category
    }

    fn resolve(&self, utterance: &Utterance, network: &mut DialogueActConfusionNetwork) {
        let tokens = utterance.tokens();
        let scan = tokens
            .iter()
            .enumerate()
            .filter_map(|(position, token)| {
                tag_value(token, &self.category).map(|value| (position, value))
            })
            .fold(Scan::default(), |scan, (position, value)| {
                self.resolve_mention(tokens, scan, position, value)
            });
        for (weight, item) in scan.hypotheses {
            network.add(weight, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PhraseTables;

    fn stop_resolver() -> WaypointResolver {
        let tables = PhraseTables::default();
        WaypointResolver::new("STOP", "stop", tables.stop, tables.waypoint_acts)
    }

    fn city_resolver() -> WaypointResolver {
        let tables = PhraseTables::default();
        WaypointResolver::new("CITY", "city", tables.city, tables.waypoint_acts)
    }

    fn resolve(resolver: &WaypointResolver, tokens: Vec<&str>) -> Vec<(f32, DialogueActItem)> {
        let mut network = DialogueActConfusionNetwork::new();
        resolver.resolve(&Utterance::new(tokens), &mut network);
        network
            .iter()
            .map(|hypothesis| (hypothesis.weight, hypothesis.item.clone()))
            .collect()
    }

    fn inform(slot: &str, value: &str) -> DialogueActItem {
        DialogueActItem::with_slot_value(DialogueActType::Inform, slot, value)
    }

    #[test]
    fn test_individually_determined_types_are_not_split() {
        // When
        let hypotheses = resolve(&stop_resolver(), vec!["from", "STOP=A", "to", "STOP=B"]);

        // Then
        assert_eq!(
            vec![(1.0, inform("from_stop", "A")), (1.0, inform("to_stop", "B"))],
            hypotheses
        );
    }

    #[test]
    fn test_shared_context_phrase_backs_off_to_both_directions() {
        // Given
        let mut phrases = WaypointPhrases::english_stop();
        phrases.from = PhraseSet::from_static(&["from", "for"]);
        phrases.to = PhraseSet::from_static(&["to", "for"]);
        let resolver = WaypointResolver::new("STOP", "stop", phrases, vec![]);

        // When
        let hypotheses = resolve(&resolver, vec!["a", "ticket", "for", "STOP=A"]);

        // Then
        assert_eq!(
            vec![(0.501, inform("from_stop", "A")), (0.499, inform("to_stop", "A"))],
            hypotheses
        );
    }

    #[test]
    fn test_closest_phrase_wins() {
        // When
        let origin = resolve(&stop_resolver(), vec!["to", "go", "from", "STOP=A"]);
        let destination = resolve(&stop_resolver(), vec!["i", "am", "at", "the", "end", "STOP=A"]);

        // Then
        assert_eq!(vec![(1.0, inform("from_stop", "A"))], origin);
        assert_eq!(vec![(1.0, inform("to_stop", "A"))], destination);
    }

    #[test]
    fn test_longest_phrase_wins_at_same_end() {
        // Given
        let mut phrases = WaypointPhrases::english_stop();
        phrases.from = PhraseSet::from_static(&["station"]);
        phrases.to = PhraseSet::from_static(&["end station"]);
        let resolver = WaypointResolver::new("STOP", "stop", phrases, vec![]);

        // When
        let hypotheses = resolve(&resolver, vec!["end", "station", "STOP=A"]);

        // Then
        assert_eq!(vec![(1.0, inform("to_stop", "A"))], hypotheses);
    }

    #[test]
    fn test_following_context() {
        // When
        let before_origin = resolve(&stop_resolver(), vec!["STOP=A", "from", "STOP=B"]);
        let before_destination = resolve(&stop_resolver(), vec!["STOP=A", "to", "STOP=B"]);

        // Then
        assert_eq!(
            vec![(1.0, inform("to_stop", "A")), (1.0, inform("from_stop", "B"))],
            before_origin
        );
        assert_eq!(
            vec![(1.0, inform("from_stop", "A")), (1.0, inform("to_stop", "B"))],
            before_destination
        );
    }

    #[test]
    fn test_adjacent_mentions_read_as_origin_then_destination() {
        // When
        let hypotheses = resolve(&stop_resolver(), vec!["STOP=A", "STOP=B"]);

        // Then
        assert_eq!(
            vec![(1.0, inform("from_stop", "A")), (1.0, inform("to_stop", "B"))],
            hypotheses
        );
    }

    #[test]
    fn test_unresolved_mention_defers_to_consumer() {
        // When
        let hypotheses = resolve(&stop_resolver(), vec!["i", "like", "STOP=A"]);

        // Then
        assert_eq!(
            vec![(1.0, DialogueActItem::with_value(DialogueActType::Inform, "A"))],
            hypotheses
        );
    }

    #[test]
    fn test_in_city_fallback() {
        // When
        let in_city = resolve(&city_resolver(), vec!["i", "am", "in", "CITY=Brooklyn"]);
        let for_city = resolve(&city_resolver(), vec!["a", "ticket", "for", "CITY=Brooklyn"]);

        // Then
        assert_eq!(vec![(1.0, inform("in_city", "Brooklyn"))], in_city);
        assert_eq!(vec![(1.0, inform("in_city", "Brooklyn"))], for_city);
    }

    #[test]
    fn test_act_type_cues() {
        // When
        let denied = resolve(&stop_resolver(), vec!["not", "from", "STOP=A"]);
        let confirmed = resolve(&stop_resolver(), vec!["it", "departs", "from", "STOP=A"]);
        let negated_desire = resolve(
            &stop_resolver(),
            vec!["i", "do", "not", "want", "not", "the", "STOP=A"],
        );

        // Then
        assert_eq!(
            vec![(
                1.0,
                DialogueActItem::with_slot_value(DialogueActType::Deny, "from_stop", "A")
            )],
            denied
        );
        assert_eq!(
            vec![(
                1.0,
                DialogueActItem::with_slot_value(DialogueActType::Confirm, "from_stop", "A")
            )],
            confirmed
        );
        assert_eq!(DialogueActType::Inform, negated_desire[0].1.act_type);
    }

    #[test]
    fn test_windows_do_not_cross_previous_mention() {
        // When
        let hypotheses = resolve(
            &stop_resolver(),
            vec!["from", "STOP=A", "and", "STOP=B", "please"],
        );

        // Then
        assert_eq!(
            vec![
                (1.0, inform("from_stop", "A")),
                (1.0, DialogueActItem::with_value(DialogueActType::Inform, "B")),
            ],
            hypotheses
        );
    }

    #[test]
    fn test_via_waypoint() {
        // When
        let transfer = resolve(&stop_resolver(), vec!["via", "STOP=A"]);
        let destination_before_transfer =
            resolve(&stop_resolver(), vec!["STOP=A", "via", "STOP=B"]);

        // Then
        assert_eq!(vec![(1.0, inform("via_stop", "A"))], transfer);
        assert_eq!(
            vec![(1.0, inform("to_stop", "A")), (1.0, inform("via_stop", "B"))],
            destination_before_transfer
        );
    }
}
