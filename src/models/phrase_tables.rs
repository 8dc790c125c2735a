use serde_derive::Deserialize;

use crate::dialogue_act::DialogueActType;
use crate::errors::*;
use crate::phrases::PhraseSet;

/// All the phrase tables used by the slot resolvers. Missing fields fall back
/// to the English defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhraseTables {
    pub stop: WaypointPhrases,
    pub city: WaypointPhrases,
    pub waypoint_acts: Vec<ActCue>,
    pub time: TimePhrases,
    pub slot_acts: SlotActPhrases,
}

impl PhraseTables {
    /// Checks the constraints which deserialization alone does not enforce
    pub fn validate(&self) -> Result<()> {
        for (name, waypoint) in &[("stop", &self.stop), ("city", &self.city)] {
            if waypoint.from.is_empty() || waypoint.to.is_empty() {
                return Err(SluError::InvalidPhraseTable(format!(
                    "{} phrases must define both 'from' and 'to' phrases",
                    name
                ))
                .into());
            }
        }
        if let Some(cue) = self
            .time
            .contexts
            .iter()
            .find(|cue| cue.positive.is_empty())
        {
            return Err(SluError::InvalidPhraseTable(format!(
                "time context '{}' for subslot '{}' has no positive phrase",
                cue.act_type, cue.subslot
            ))
            .into());
        }
        Ok(())
    }
}

impl Default for PhraseTables {
    fn default() -> Self {
        Self {
            stop: WaypointPhrases::english_stop(),
            city: WaypointPhrases::english_city(),
            waypoint_acts: english_waypoint_acts(),
            time: TimePhrases::default(),
            slot_acts: SlotActPhrases::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WaypointPhrases {
    pub from: PhraseSet,
    pub to: PhraseSet,
    pub via: PhraseSet,
    /// Preceding-context phrases of the `in` type
    #[serde(default)]
    pub in_context: PhraseSet,
    /// Phrases tried for the `in` type once every other cue failed
    #[serde(default)]
    pub in_fallback: PhraseSet,
}

impl WaypointPhrases {
    pub fn english_stop() -> Self {
        Self {
            from: PhraseSet::from_static(&[
                "from",
                "at",
                "beginning",
                "start",
                "starting",
                "origin",
                "originated",
                "originating",
                "origination",
                "initial",
            ]),
            to: PhraseSet::from_static(&[
                "to", "into", "end", "ending", "terminal", "final", "target", "output", "exit",
            ]),
            via: PhraseSet::from_static(&["via", "through", "transfer", "interchange"]),
            in_context: PhraseSet::default(),
            in_fallback: PhraseSet::default(),
        }
    }

    pub fn english_city() -> Self {
        Self {
            from: PhraseSet::from_static(&[
                "from",
                "beginning",
                "start",
                "starting",
                "origin",
                "originated",
                "originating",
                "origination",
                "initial",
            ]),
            to: PhraseSet::from_static(&[
                "to", "into", "end", "ending", "terminal", "final", "target", "output", "exit",
            ]),
            via: PhraseSet::from_static(&["via", "through", "transfer", "interchange"]),
            in_context: PhraseSet::from_static(&["for", "after"]),
            in_fallback: PhraseSet::from_static(&["in", "at"]),
        }
    }
}

/// Selects `act_type` when a positive phrase matches and no negative one does
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActCue {
    pub act_type: DialogueActType,
    pub positive: PhraseSet,
    #[serde(default)]
    pub negative: PhraseSet,
}

impl ActCue {
    fn new(act_type: DialogueActType, positive: &[&str], negative: &[&str]) -> Self {
        Self {
            act_type,
            positive: PhraseSet::from_static(positive),
            negative: PhraseSet::from_static(negative),
        }
    }
}

// A bare "not" collides with negation ("i do not want, go from ...") and is
// left out on purpose.
fn english_waypoint_acts() -> Vec<ActCue> {
    vec![
        ActCue::new(
            DialogueActType::Confirm,
            &[
                "it departs",
                "departs from",
                "depart from",
                "leave",
                "leaves",
                "is the starting",
            ],
            &[],
        ),
        ActCue::new(
            DialogueActType::Deny,
            &[
                "not from",
                "not at",
                "not in",
                "not on",
                "not to",
                "not into",
                "and not",
                "not the",
                "rather than",
            ],
            &[
                "not at all",
                "not wish",
                "not this way",
                "no not that",
                "not need help",
                "not want",
            ],
        ),
    ]
}

/// One row of the time context table. An empty `subslot` means the time is
/// neither a departure nor an arrival time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeCue {
    pub act_type: DialogueActType,
    #[serde(default)]
    pub subslot: String,
    pub positive: PhraseSet,
    #[serde(default)]
    pub negative: PhraseSet,
}

impl TimeCue {
    fn new(act_type: DialogueActType, subslot: &str, positive: &[&str], negative: &[&str]) -> Self {
        Self {
            act_type,
            subslot: subslot.to_string(),
            positive: PhraseSet::from_static(positive),
            negative: PhraseSet::from_static(negative),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimePhrases {
    pub absolute_prepositions: Vec<String>,
    pub relative_prepositions: Vec<String>,
    /// Contexts in which a `now` value does not denote a time
    pub now_exclusions: PhraseSet,
    pub contexts: Vec<TimeCue>,
}

impl Default for TimePhrases {
    fn default() -> Self {
        let arrival = &[
            "arrival",
            "arrive",
            "get to",
            "to get",
            "arriving",
            "want to be at",
        ];
        Self {
            absolute_prepositions: ["at", "time", "past", "after", "between", "before", "in"]
                .iter()
                .map(|preposition| preposition.to_string())
                .collect(),
            relative_prepositions: vec!["in".to_string()],
            now_exclusions: PhraseSet::from_static(&[
                "so what",
                "what is the time",
                "can not hear",
                "no longer telling me",
            ]),
            contexts: vec![
                TimeCue::new(
                    DialogueActType::Confirm,
                    "departure",
                    &[
                        "it leaves",
                        "it departures",
                        "it starts",
                        "is starting",
                        "is leaving",
                        "is departuring",
                        "departure point",
                    ],
                    &[],
                ),
                TimeCue::new(
                    DialogueActType::Confirm,
                    "arrival",
                    &[
                        "it arrives",
                        "is arriving",
                        "will arrive",
                        "is coming",
                        "it comes",
                        "will come",
                        "arrival is",
                    ],
                    &[],
                ),
                TimeCue::new(
                    DialogueActType::Confirm,
                    "",
                    &["it is", "you think", "positive"],
                    &[],
                ),
                TimeCue::new(
                    DialogueActType::Deny,
                    "departure",
                    &[
                        "not leaving",
                        "not leave",
                        "not departuring",
                        "not departure",
                        "not starting",
                        "not start",
                        "not want to go from",
                    ],
                    &[],
                ),
                TimeCue::new(
                    DialogueActType::Deny,
                    "arrival",
                    &[
                        "not arriving",
                        "not arrive",
                        "not come",
                        "not comming",
                        "not want to arrive",
                        "not want to come",
                        "not want to go to",
                    ],
                    &[],
                ),
                TimeCue::new(DialogueActType::Deny, "", &["no", "not want", "negative"], &[]),
                TimeCue::new(
                    DialogueActType::Inform,
                    "departure",
                    &[
                        "TASK=find_connection",
                        "departure",
                        "departing",
                        "departs from",
                        "leaving",
                        "leaves",
                        "starts",
                        "starting",
                        "goes",
                        "would go",
                        "will go",
                        "VEHICLE=tram",
                        "want to go",
                        "want to leave",
                    ],
                    arrival,
                ),
                TimeCue::new(DialogueActType::Inform, "arrival", arrival, &[]),
            ],
        }
    }
}

/// Global confirm/deny cues of the single-category resolvers
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SlotActPhrases {
    pub confirm: PhraseSet,
    pub deny: PhraseSet,
    pub task_deny: PhraseSet,
    /// Phrases in which an am/pm mention is not a time-of-day cue
    pub ampm_blockers: PhraseSet,
}

impl Default for SlotActPhrases {
    fn default() -> Self {
        Self {
            confirm: PhraseSet::from_static(&["it does"]),
            deny: PhraseSet::from_static(&["not want"]),
            task_deny: PhraseSet::from_static(&["not want", "don't want", "not looking for"]),
            ampm_blockers: PhraseSet::from_static(&["good night"]),
        }
    }
}
