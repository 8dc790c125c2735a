pub mod number;
pub mod simple;
pub mod time;
pub mod waypoint;

pub use self::number::{collapse_numbers, NUMBER_CATEGORY};
pub use self::simple::CategorySlotResolver;
pub use self::time::TimeResolver;
pub use self::waypoint::{WaypointResolver, WaypointType};

use crate::dialogue_act::DialogueActConfusionNetwork;
use crate::models::PhraseTables;
use crate::utterance::Utterance;

pub trait SlotResolver: Send + Sync {
    /// Category whose tags this resolver interprets
    fn category(&self) -> &str;

    /// Adds the hypotheses for every tag of `category` found in the
    /// abstracted utterance
    fn resolve(&self, utterance: &Utterance, network: &mut DialogueActConfusionNetwork);
}

/// The resolvers of the transit domain, in the order in which they run
pub fn build_slot_resolvers(phrase_tables: &PhraseTables) -> Vec<Box<dyn SlotResolver>> {
    vec![
        Box::new(WaypointResolver::new(
            "STOP",
            "stop",
            phrase_tables.stop.clone(),
            phrase_tables.waypoint_acts.clone(),
        )),
        Box::new(WaypointResolver::new(
            "CITY",
            "city",
            phrase_tables.city.clone(),
            phrase_tables.waypoint_acts.clone(),
        )),
        Box::new(TimeResolver::new(phrase_tables.time.clone())),
        Box::new(CategorySlotResolver::date_rel(&phrase_tables.slot_acts)),
        Box::new(CategorySlotResolver::ampm(&phrase_tables.slot_acts)),
        Box::new(CategorySlotResolver::vehicle(&phrase_tables.slot_acts)),
        Box::new(CategorySlotResolver::task(&phrase_tables.slot_acts)),
    ]
}
