use log::debug;

use super::cues::*;
use crate::dialogue_act::{DialogueActConfusionNetwork, DialogueActItem, DialogueActType};
use crate::utterance::Utterance;

/// A turn level rule. Rules are independent of each other and evaluated in
/// list order over the original utterance.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaRule {
    /// Emits `item` whenever `cue` matches
    Emit { cue: Cue, item: DialogueActItem },
    /// Emits the item of the first matching cue only
    FirstOf(Vec<(Cue, DialogueActItem)>),
}

impl MetaRule {
    fn emit(cue: Cue, item: DialogueActItem) -> Self {
        MetaRule::Emit { cue, item }
    }

    fn matched_item(&self, tokens: &[String]) -> Option<&DialogueActItem> {
        match self {
            MetaRule::Emit { cue, item } if cue.matches(tokens) => Some(item),
            MetaRule::Emit { .. } => None,
            MetaRule::FirstOf(rules) => rules
                .iter()
                .find(|(cue, _)| cue.matches(tokens))
                .map(|(_, item)| item),
        }
    }
}

pub struct MetaClassifier {
    rules: Vec<MetaRule>,
}

impl MetaClassifier {
    pub fn new(rules: Vec<MetaRule>) -> Self {
        Self { rules }
    }

    /// Adds, with weight 1.0, the item of every matching rule
    pub fn classify(&self, utterance: &Utterance, network: &mut DialogueActConfusionNetwork) {
        for item in self
            .rules
            .iter()
            .filter_map(|rule| rule.matched_item(utterance.tokens()))
        {
            debug!("Meta rule matched: {}", item);
            network.add(1.0, item.clone());
        }
    }

    pub fn english() -> Self {
        Self::new(english_rules())
    }
}

fn act(act_type: DialogueActType) -> DialogueActItem {
    DialogueActItem::new(act_type)
}

fn inform(slot: &str, value: &str) -> DialogueActItem {
    DialogueActItem::with_slot_value(DialogueActType::Inform, slot, value)
}

fn request(slot: &str) -> DialogueActItem {
    DialogueActItem::with_slot(DialogueActType::Request, slot)
}

fn alternative(act_type: DialogueActType, value: &str) -> DialogueActItem {
    DialogueActItem::with_slot_value(act_type, "alternative", value)
}

fn english_rules() -> Vec<MetaRule> {
    use crate::dialogue_act::DialogueActType::*;

    let time_of_arrival_guard = || any_phrase(&["will be", "will arrive", "will stop", "will get to"]);
    let about_alternatives = || any_word("connection alternatives alternative option options found");

    vec![
        MetaRule::emit(
            any_word("hello hi greetings").or(all_words("good day")),
            act(Hello),
        ),
        MetaRule::emit(
            any_word("bye byebye seeya goodbye").or(all_words("good bye")),
            act(Bye),
        ),
        MetaRule::emit(
            any_word("different another").unless(any_word("connection station option")),
            act(Reqalts),
        ),
        MetaRule::emit(
            any_word("repeat again").or(phrase("come again")).unless(any_word(
                "connection station option last offer offered found beginning repeat begin",
            )),
            act(Repeat),
        ),
        MetaRule::emit(
            any_phrase(&[
                "repeat the last sentence",
                "repeat what you've",
                "repeat what you have",
            ]),
            act(Repeat),
        ),
        MetaRule::emit(
            length(1).and(any_word("excuse pardon sorry apology apologise apologies")),
            act(Apology),
        ),
        MetaRule::emit(
            any_word("help hint").unless(any_word("dont want thank you")),
            act(Help),
        ),
        MetaRule::emit(
            any_word("hallo").or(all_words("not hear you")),
            act(Canthearyou),
        ),
        MetaRule::emit(
            any_of(vec![
                all_words("did not understand"),
                all_words("didn't understand"),
                all_words("speek up"),
                all_words("can not hear you"),
                length(1).and(any_word("can't hear you")),
            ]),
            act(Notunderstood),
        ),
        MetaRule::emit(
            any_word("yes yeah sure").unless(any_word("end over option offer surrender")),
            act(Affirm),
        ),
        MetaRule::emit(
            any_of(vec![
                any_word("no not nope nono"),
                phrase("do not want"),
                length(2).and(all_words("not want")),
                length(3).and(all_words("yes do not")),
                all_words("is wrong"),
            ])
            .unless(phrase("not from")),
            act(Negate),
        ),
        MetaRule::emit(any_word("thanks thankyou thank cheers"), act(Thankyou)),
        MetaRule::emit(
            any_word("ok right well correct").unless(any_word("yes")),
            act(Ack),
        ),
        MetaRule::emit(
            any_of(vec![
                any_word("from begin begins").and(any_word("beginning scratch")),
                any_word("reset restart"),
                phrase("new connection").unless(phrase("connection from")),
                phrase("new connection").unless(phrase("from")),
                phrase("new link").unless(any_word("from")),
            ]),
            act(Restart),
        ),
        MetaRule::emit(
            any_phrase(&["want to go", "like to go", "want to get", "would like to get"]),
            inform("task", "find_connection"),
        ),
        MetaRule::emit(
            any_phrase(&["what is the weather", "will be the weather"]),
            inform("task", "weather"),
        ),
        MetaRule::emit(
            any_of(
                [
                    "where does it start",
                    "what is the initial",
                    "where departure",
                    "where departuring",
                    "where departures",
                    "where starts",
                    "where goes from",
                    "where does go from",
                    "where will from",
                ]
                .iter()
                .map(|words| all_words(words))
                .collect(),
            ),
            request("from_stop"),
        ),
        MetaRule::emit(
            any_of(
                [
                    "where does it arrive",
                    "where does it stop",
                    "where stopping",
                    "where arriving",
                    "to what station",
                    "what is target",
                    "where is target",
                    "where destination",
                    "where terminates",
                    "where terminal",
                    "where terminate",
                ]
                .iter()
                .map(|words| all_words(words))
                .collect(),
            ),
            request("to_stop"),
        ),
        MetaRule::emit(
            any_of(vec![
                all_words("when does it go"),
                all_words("when does it leave"),
                all_words("what time"),
                any_word("when time").and(any_word("leave departure go")),
            ])
            .unless(time_of_arrival_guard()),
            request("departure_time"),
        ),
        MetaRule::emit(
            any_of(vec![
                all_words("how long till"),
                all_words("how long until"),
                all_words("how long before"),
            ])
            .unless(time_of_arrival_guard()),
            request("departure_time_rel"),
        ),
        MetaRule::emit(
            any_of(vec![
                all_words("when will").and(any_word("be arrive")),
                all_words("when will i").and(any_word("be arrive")),
                all_words("what time will").and(any_word("be arrive")),
                all_words("time of arrival"),
                any_word("when time").and(any_word("arrival arrive")),
            ]),
            request("arrival_time"),
        ),
        MetaRule::emit(
            any_of(vec![
                all_words("how long till").and(any_word("get arrive")),
                all_words("how long until")
                    .and(any_word("target station terminal destination")),
            ]),
            request("arrival_time_rel"),
        ),
        MetaRule::emit(
            all_words("how long")
                .and(any_phrase(&["does it take", "will it take", "travel"]))
                .unless(any_word("till until")),
            request("duration"),
        ),
        MetaRule::emit(
            any_of(vec![
                all_words("what time is it"),
                all_words("what is the time"),
                all_words("what's the time"),
                all_words("what time do we have"),
            ]),
            request("current_time"),
        ),
        MetaRule::emit(
            all_words("how many")
                .and(any_word(
                    "transfer transfers transfering changing change changes \
                     interchange interchanging interchanges",
                ))
                .unless(any_word("time")),
            request("num_transfers"),
        ),
        MetaRule::emit(
            about_alternatives()
                .and(any_word("arbitrary"))
                .unless(any_word("first second third fourth one two three four")),
            alternative(Inform, "dontcare"),
        ),
        MetaRule::emit(
            about_alternatives()
                .and(any_word("first one"))
                .unless(any_word("second third fourth two three four")),
            alternative(Inform, "1"),
        ),
        MetaRule::emit(
            about_alternatives()
                .and(any_word("second two"))
                .unless(any_word("third fourth next")),
            alternative(Inform, "2"),
        ),
        MetaRule::emit(
            about_alternatives().and(any_word("third three")),
            alternative(Inform, "3"),
        ),
        MetaRule::emit(
            about_alternatives().and(any_word("fourth four")),
            alternative(Inform, "4"),
        ),
        MetaRule::emit(
            about_alternatives()
                .and(any_word("last before latest lattermost bottom repeat again"))
                .unless(all_words("previous")),
            alternative(Inform, "last"),
        ),
        MetaRule::emit(
            about_alternatives().and(any_of(vec![
                any_word("next different following subsequent later"),
                phrase("one more"),
                phrase("the next one"),
            ])),
            alternative(Inform, "next"),
        ),
        MetaRule::FirstOf(vec![
            (
                about_alternatives()
                    .and(any_word("previous precedent"))
                    .and(phrase("not want to know previous")),
                alternative(Deny, "prev"),
            ),
            (
                about_alternatives().and(any_word("previous precedent")),
                alternative(Inform, "prev"),
            ),
        ]),
        MetaRule::emit(
            length(1).and(any_word("next following")),
            alternative(Inform, "next"),
        ),
        MetaRule::emit(
            length(2).and(all_words("and the following").or(all_words("and afterwards"))),
            alternative(Inform, "next"),
        ),
        MetaRule::emit(
            length(1).and(any_word("previous precedent")),
            alternative(Inform, "prev"),
        ),
        MetaRule::emit(any_phrase(&["by day", "of the day"]), inform("ampm", "pm")),
        MetaRule::FirstOf(vec![
            (ends_with(&["from"]), inform("from", "*")),
            (ends_with(&["to", "into"]), inform("to", "*")),
            (
                ends_with(&["from the stop", "from the station", "from stop", "from station"]),
                inform("from_stop", "*"),
            ),
            (
                ends_with(&["to the stop", "to the station", "to stop", "to station"]),
                inform("to_stop", "*"),
            ),
            (ends_with(&["via", "through"]), inform("via", "*")),
        ]),
    ]
}
