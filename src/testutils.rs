use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{PhraseTables, SluEngineModel};
use crate::resources::lexicon::HashMapCategoryLexicon;
use crate::resources::utt2da::Utt2DaTable;
use crate::resources::SharedResources;
use crate::slu_engine::TransitSluEngine;
use crate::utterance::{Normaliser, Token};

pub fn epsilon_eq(a: f32, b: f32, epsilon: f32) -> bool {
    let diff = a - b;
    diff < epsilon && diff > -epsilon
}

pub fn lexicon_from(entries: &[(&str, &str, &str)]) -> HashMapCategoryLexicon {
    HashMapCategoryLexicon::from_entries(entries.iter().cloned(), &[], &Normaliser::default())
        .unwrap()
}

#[derive(Default)]
pub struct EngineBuilder {
    lexicon: Vec<(String, String, String)>,
    phrase_tables: PhraseTables,
    utt2da: Utt2DaTable,
    normalisation: HashMap<Token, Token>,
}

impl EngineBuilder {
    pub fn lexicon(mut self, entries: &[(&str, &str, &str)]) -> Self {
        self.lexicon = entries
            .iter()
            .map(|(category, value, form)| {
                (category.to_string(), value.to_string(), form.to_string())
            })
            .collect();
        self
    }

    pub fn phrase_tables_json(mut self, json: &str) -> Self {
        self.phrase_tables = serde_json::from_str(json).unwrap();
        self
    }

    pub fn utt2da(mut self, utt2da: Utt2DaTable) -> Self {
        self.utt2da = utt2da;
        self
    }

    pub fn normalisation(mut self, normalisation: HashMap<Token, Token>) -> Self {
        self.normalisation = normalisation;
        self
    }

    pub fn build(self) -> TransitSluEngine {
        let mut model: SluEngineModel = serde_json::from_value(serde_json::json!({
            "model_version": crate::MODEL_VERSION,
            "language_code": "en",
            "lexicon": "lexicon.tsv",
        }))
        .unwrap();
        model.phrase_tables = self.phrase_tables;
        model.normalisation = self.normalisation;
        let normaliser = Normaliser::new(model.normalisation.clone());
        let lexicon = HashMapCategoryLexicon::from_entries(
            self.lexicon
                .iter()
                .map(|(category, value, form)| (category.as_str(), value.as_str(), form.as_str())),
            &model.category_priority,
            &normaliser,
        )
        .unwrap();
        let shared_resources = Arc::new(SharedResources {
            lexicon: Arc::new(lexicon),
            utt2da: self.utt2da,
        });
        TransitSluEngine::new(model, shared_resources).unwrap()
    }
}
