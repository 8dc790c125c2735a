pub mod abstraction;
pub mod classifier;
pub mod corrections;
pub mod dialogue_act;
pub mod errors;
pub mod models;
pub mod phrases;
pub mod resources;
pub mod slot_resolver;
mod slu_engine;
#[cfg(test)]
mod testutils;
pub mod utterance;

pub const MODEL_VERSION: &str = "0.1.0";

pub use crate::abstraction::{abstract_utterance, AbstractedUtterance};
pub use crate::dialogue_act::{
    DialogueActConfusionNetwork, DialogueActHypothesis, DialogueActItem, DialogueActType,
};
pub use crate::errors::*;
pub use crate::models::*;
pub use crate::resources::lexicon::{CategoryLexicon, HashMapCategoryLexicon, LexiconValue};
pub use crate::resources::loading::load_shared_resources;
pub use crate::resources::SharedResources;
pub use crate::slu_engine::TransitSluEngine;
pub use crate::utterance::{Normaliser, Utterance};
