use std::collections::HashMap;

use serde_derive::Deserialize;

use crate::models::PhraseTables;
use crate::utterance::{CategoryName, Token};

#[derive(Debug, Deserialize)]
pub struct ModelVersion {
    pub model_version: String,
}

#[derive(Debug, Deserialize)]
pub struct SluEngineModel {
    pub model_version: String,
    pub language_code: String,
    pub lexicon: String,
    #[serde(default)]
    pub utt2da: Option<String>,
    #[serde(default)]
    pub category_priority: Vec<CategoryName>,
    #[serde(default = "default_corrections")]
    pub corrections: Vec<CorrectionRule>,
    #[serde(default = "default_always_present_categories")]
    pub always_present_categories: Vec<CategoryName>,
    #[serde(default)]
    pub normalisation: HashMap<Token, Token>,
    #[serde(default)]
    pub phrase_tables: PhraseTables,
}

/// Rewrites the first occurrence of `pattern` in an abstracted utterance
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CorrectionRule {
    pub pattern: Vec<Token>,
    pub replacement: Vec<Token>,
}

impl CorrectionRule {
    pub fn new(pattern: &[&str], replacement: &[&str]) -> Self {
        Self {
            pattern: pattern.iter().map(|token| token.to_string()).collect(),
            replacement: replacement.iter().map(|token| token.to_string()).collect(),
        }
    }
}

/// Repairs of common literal/category collisions for the English lexicon
pub fn default_corrections() -> Vec<CorrectionRule> {
    vec![
        CorrectionRule::new(&["STOP=Metro"], &["VEHICLE=subway"]),
        CorrectionRule::new(&["STOP=Station"], &["station"]),
        CorrectionRule::new(&["STOP=Transfer"], &["transfer"]),
        CorrectionRule::new(&["STOP=New", "connection"], &["new", "connection"]),
        CorrectionRule::new(&["STOP=New", "TASK=find_connection"], &["new", "TASK=find_connection"]),
        CorrectionRule::new(&["STOP=Last", "connection"], &["last", "connection"]),
        CorrectionRule::new(&["STOP=Church", "street"], &["STOP=Church St"]),
        CorrectionRule::new(&["in", "STOP=Manhattan"], &["in", "CITY=Manhattan"]),
        CorrectionRule::new(&["in", "STOP=Brooklyn"], &["in", "CITY=Brooklyn"]),
        CorrectionRule::new(&["TIME=now", "what"], &["now", "what"]),
    ]
}

/// Categories whose resolvers run whether or not a tag was produced
pub fn default_always_present_categories() -> Vec<CategoryName> {
    vec!["CITY".to_string(), "VEHICLE".to_string()]
}
