use std::fs;
use std::path::Path;
use std::sync::Arc;

use failure::{bail, ResultExt};
use log::{debug, info};

use crate::abstraction::abstract_utterance;
use crate::classifier::{classify_non_speech, remove_noise, MetaClassifier};
use crate::corrections::CorrectionPass;
use crate::dialogue_act::DialogueActConfusionNetwork;
use crate::errors::*;
use crate::models::{ModelVersion, SluEngineModel};
use crate::resources::loading::load_shared_resources;
use crate::resources::SharedResources;
use crate::slot_resolver::{build_slot_resolvers, collapse_numbers, SlotResolver, NUMBER_CATEGORY};
use crate::utterance::{split_category_tag, Normaliser, Utterance};

const SUPPORTED_LANGUAGE: &str = "en";

/// Rule based spoken language understanding for public transport
/// information. Turns a transcript into a confusion network of dialogue acts.
pub struct TransitSluEngine {
    normaliser: Normaliser,
    shared_resources: Arc<SharedResources>,
    corrections: CorrectionPass,
    meta_classifier: MetaClassifier,
    slot_resolvers: Vec<Box<dyn SlotResolver>>,
}

impl TransitSluEngine {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Loading SLU engine from {:?}", path.as_ref());
        let model = Self::load_model(&path)?;
        let normaliser = Normaliser::new(model.normalisation.clone());
        let shared_resources = load_shared_resources(&path, &model, &normaliser)?;
        Self::new(model, shared_resources)
    }

    fn check_model_version<P: AsRef<Path>>(path: P) -> Result<()> {
        let model_file = fs::File::open(&path)?;
        let model_version: ModelVersion = serde_json::from_reader(model_file)?;
        if model_version.model_version != crate::MODEL_VERSION {
            bail!(SluError::WrongModelVersion(
                model_version.model_version,
                crate::MODEL_VERSION
            ));
        }
        Ok(())
    }

    fn load_model<P: AsRef<Path>>(path: P) -> Result<SluEngineModel> {
        let engine_model_path = path.as_ref().join("slu_engine.json");
        Self::check_model_version(&engine_model_path).with_context(|_| {
            SluError::ModelLoad(engine_model_path.to_string_lossy().to_string())
        })?;
        let model_file = fs::File::open(&engine_model_path)
            .with_context(|_| format!("Could not open slu engine file {:?}", &engine_model_path))?;
        let model = serde_json::from_reader(model_file)
            .with_context(|_| format!("Invalid slu engine file {:?}", &engine_model_path))?;
        Ok(model)
    }

    pub fn new(model: SluEngineModel, shared_resources: Arc<SharedResources>) -> Result<Self> {
        if model.language_code != SUPPORTED_LANGUAGE {
            bail!(
                "Unsupported language '{}', expected '{}'",
                model.language_code,
                SUPPORTED_LANGUAGE
            );
        }
        model.phrase_tables.validate()?;
        info!("Phrase tables validated");
        let corrections = CorrectionPass::new(model.corrections, model.always_present_categories)?;
        let slot_resolvers = build_slot_resolvers(&model.phrase_tables);
        Ok(Self {
            normaliser: Normaliser::new(model.normalisation),
            shared_resources,
            corrections,
            meta_classifier: MetaClassifier::english(),
            slot_resolvers,
        })
    }
}

impl TransitSluEngine {
    /// Normalises `input` and parses it. Never fails: an empty network means
    /// that no interpretation was found.
    pub fn parse(&self, input: &str) -> DialogueActConfusionNetwork {
        let utterance = self.normaliser.normalise(input);
        self.parse_utterance(&utterance)
    }

    pub fn parse_utterance(&self, utterance: &Utterance) -> DialogueActConfusionNetwork {
        let mut network = DialogueActConfusionNetwork::new();

        if let Some(items) = self.shared_resources.utt2da.get(utterance) {
            debug!("Utterance '{}' found in the override table", utterance);
            for item in items {
                network.add(1.0, item.clone());
            }
            network.merge();
            return network;
        }

        let abstracted = abstract_utterance(utterance, &*self.shared_resources.lexicon);
        let mut abstracted = self.corrections.apply(abstracted);
        debug!(
            "Abstracted utterance: '{}', categories: {:?}",
            abstracted.utterance, abstracted.categories
        );

        if let Some(item) = classify_non_speech(utterance) {
            debug!("Non speech event: {}", item);
            network.add(1.0, item);
            return network;
        }

        let utterance = remove_noise(utterance);
        abstracted.utterance = remove_noise(&abstracted.utterance);

        if abstracted.has_category(NUMBER_CATEGORY) {
            abstracted.utterance = collapse_numbers(&abstracted.utterance);
            let has_time = abstracted
                .utterance
                .iter()
                .any(|token| split_category_tag(token).map_or(false, |(category, _)| category == "TIME"));
            if has_time {
                abstracted.categories.insert("TIME".to_string());
            }
        }

        for resolver in &self.slot_resolvers {
            if abstracted.has_category(resolver.category()) {
                debug!("Running {} resolver", resolver.category());
                resolver.resolve(&abstracted.utterance, &mut network);
            }
        }

        self.meta_classifier.classify(&utterance, &mut network);

        network.merge();
        debug!("{} dialogue act items after merge", network.len());
        network
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]

    use std::path::Path;

    use maplit::hashmap;

    use super::*;
    use crate::dialogue_act::{DialogueActItem, DialogueActType};
    use crate::resources::utt2da::Utt2DaTable;
    use crate::testutils::{epsilon_eq, EngineBuilder};

    fn inform(slot: &str, value: &str) -> DialogueActItem {
        DialogueActItem::with_slot_value(DialogueActType::Inform, slot, value)
    }

    fn engine() -> TransitSluEngine {
        EngineBuilder::default()
            .lexicon(&[
                ("STOP", "Brooklyn Bridge", "brooklyn bridge"),
                ("STOP", "Wall St", "wall street"),
                ("CITY", "Manhattan", "manhattan"),
                ("CITY", "Brooklyn", "brooklyn"),
                ("VEHICLE", "bus", "bus"),
                ("NUMBER", "8", "eight"),
                ("NUMBER", "15", "fifteen"),
                ("TIME", "now", "now"),
                ("DATE_REL", "tomorrow", "tomorrow"),
            ])
            .build()
    }

    #[test]
    fn test_end_to_end_without_task_category() {
        // Given
        let utterance = Utterance::new(vec![
            "i", "want", "to", "go", "from", "STOP=Brooklyn", "to", "STOP=Manhattan",
        ]);

        // When
        let network = engine().parse_utterance(&utterance);

        // Then
        assert_eq!(Some(1.0), network.weight_of(&inform("from_stop", "Brooklyn")));
        assert_eq!(Some(1.0), network.weight_of(&inform("to_stop", "Manhattan")));
        assert_eq!(
            Some(1.0),
            network.weight_of(&inform("task", "find_connection"))
        );
    }

    #[test]
    fn test_parse_raw_text() {
        // When
        let network = engine().parse("From Wall Street to Brooklyn Bridge by bus, tomorrow!");

        // Then
        let items: Vec<&DialogueActItem> = network.items().collect();
        assert_eq!(
            vec![
                &inform("from_stop", "Wall St"),
                &inform("to_stop", "Brooklyn Bridge"),
                &inform("date_rel", "tomorrow"),
                &inform("vehicle", "bus"),
            ],
            items
        );
    }

    #[test]
    fn test_non_speech_yields_exactly_one_item() {
        for input in &["", "_noise_", "_silence_", "_other_"] {
            // When
            let network = engine().parse(input);

            // Then
            assert_eq!(1, network.len());
        }
        assert!(engine().parse("_laugh_").has_act_type(DialogueActType::Null));
    }

    #[test]
    fn test_noise_is_ignored_around_speech() {
        // When
        let network = engine().parse("_noise_ hello _laugh_");

        // Then
        assert_eq!(
            vec![&DialogueActItem::new(DialogueActType::Hello)],
            network.items().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_numbers_are_collapsed_into_times() {
        // When
        let network = engine().parse("i want to leave at eight fifteen");

        // Then
        assert!(network.contains(&inform("departure_time", "8:15")));
    }

    #[test]
    fn test_time_subslot_is_carried_forward() {
        // When
        let network = engine().parse_utterance(&Utterance::new(vec![
            "departure", "at", "TIME=8:00", "or", "at", "TIME=9:00",
        ]));

        // Then
        assert!(network.contains(&inform("departure_time", "8:00")));
        assert!(network.contains(&inform("departure_time", "9:00")));
    }

    #[test]
    fn test_ambiguous_waypoint_backs_off_to_both_directions() {
        // Given
        let engine = EngineBuilder::default()
            .lexicon(&[("STOP", "Wall St", "wall street")])
            .phrase_tables_json(
                r#"{"stop": {"from": ["from", "for"], "to": ["to", "for"], "via": ["via"]}}"#,
            )
            .build();

        // When
        let network = engine.parse("a ticket for wall street");

        // Then
        assert!(epsilon_eq(
            0.501,
            network.weight_of(&inform("from_stop", "Wall St")).unwrap(),
            1e-6
        ));
        assert!(epsilon_eq(
            0.499,
            network.weight_of(&inform("to_stop", "Wall St")).unwrap(),
            1e-6
        ));
    }

    #[test]
    fn test_merged_network_has_no_duplicates() {
        // Given
        let utterance = Utterance::new(vec![
            "i",
            "want",
            "to",
            "go",
            "TASK=find_connection",
            "from",
            "STOP=Wall St",
            "from",
            "STOP=Wall St",
        ]);

        // When
        let network = engine().parse_utterance(&utterance);

        // Then
        let items: Vec<&DialogueActItem> = network.items().collect();
        for (index, item) in items.iter().enumerate() {
            assert!(!items[index + 1..].contains(item));
        }
        assert_eq!(
            vec![
                &inform("from_stop", "Wall St"),
                &inform("task", "find_connection"),
            ],
            items
        );
        assert_eq!(Some(1.0), network.weight_of(&inform("from_stop", "Wall St")));
        assert_eq!(
            Some(1.0),
            network.weight_of(&inform("task", "find_connection"))
        );
    }

    #[test]
    fn test_lexicon_forms_follow_configured_normalisation() {
        // Given
        let engine = EngineBuilder::default()
            .lexicon(&[
                ("STOP", "St. George", "st. george"),
                ("STOP", "Wall St", "wall street"),
            ])
            .normalisation(hashmap! { "street".to_string() => "st".to_string() })
            .build();

        // When
        let punctuated = engine.parse("from St. George");
        let substituted = engine.parse("from wall street");

        // Then
        assert!(punctuated.contains(&inform("from_stop", "St. George")));
        assert!(substituted.contains(&inform("from_stop", "Wall St")));
    }

    #[test]
    fn test_override_table_bypasses_rules() {
        // Given
        let utt2da = Utt2DaTable::from_reader(
            "from wall street please\trequest(from_stop)".as_bytes(),
            &Normaliser::default(),
        )
        .unwrap();
        let engine = EngineBuilder::default()
            .lexicon(&[("STOP", "Wall St", "wall street")])
            .utt2da(utt2da)
            .build();

        // When
        let network = engine.parse("From Wall Street, please.");

        // Then
        assert_eq!(
            vec![&DialogueActItem::with_slot(DialogueActType::Request, "from_stop")],
            network.items().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_from_path() {
        // Given
        let engine_dir = Path::new("data").join("tests").join("engine");

        // When
        let engine = TransitSluEngine::from_path(engine_dir);

        // Then
        assert!(engine.is_ok());
        let engine = engine.unwrap();
        let network = engine.parse("I need the Wall Street ferry");
        assert_eq!(
            vec![
                &inform("vehicle", "ferry"),
                &inform("from_stop", "Wall St"),
            ],
            network.items().collect::<Vec<_>>()
        );
        let network = engine.parse("from brooklyn bridge to wall street");
        assert!(network.contains(&inform("from_stop", "Brooklyn Bridge")));
        assert!(network.contains(&inform("to_stop", "Wall St")));
    }

    #[test]
    fn test_from_path_with_wrong_model_version() {
        // Given
        let engine_dir = Path::new("data")
            .join("tests")
            .join("engine_wrong_version");

        // When
        let engine = TransitSluEngine::from_path(engine_dir);

        // Then
        assert!(engine.is_err());
    }
}
