use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

use failure::{format_err, ResultExt};

use crate::dialogue_act::{parse_dialogue_act, DialogueActItem};
use crate::errors::*;
use crate::utterance::{Normaliser, Utterance};

/// Utterances mapped directly to their dialogue act, for inputs the rules
/// cannot handle
#[derive(Debug, Clone, Default)]
pub struct Utt2DaTable {
    entries: HashMap<String, Vec<DialogueActItem>>,
}

impl Utt2DaTable {
    /// Reads `utterance<TAB>dialogue act` lines. Utterances go through
    /// `normaliser` so that they match normalised input.
    pub fn from_reader<R: Read>(reader: R, normaliser: &Normaliser) -> Result<Self> {
        let reader = BufReader::new(reader);
        let mut entries = HashMap::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut columns = line.splitn(2, '\t');
            let (utterance, dialogue_act) = match (columns.next(), columns.next()) {
                (Some(utterance), Some(dialogue_act)) => (utterance, dialogue_act),
                _ => return Err(format_err!("Missing dialogue act at line {}", index + 1)),
            };
            let items = parse_dialogue_act(dialogue_act)
                .with_context(|_| format!("Invalid dialogue act at line {}", index + 1))?;
            entries.insert(normaliser.normalise(utterance).text(), items);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, utterance: &Utterance) -> Option<&[DialogueActItem]> {
        self.entries
            .get(&utterance.text())
            .map(|items| items.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
