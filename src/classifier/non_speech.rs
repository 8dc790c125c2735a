use crate::dialogue_act::{DialogueActItem, DialogueActType};
use crate::utterance::Utterance;

const SILENCE_MARKERS: &[&str] = &["_silence_", "__silence__", "_sil_"];
const NULL_MARKERS: &[&str] = &["_noise_", "_laugh_", "_ehm_hmm_", "_inhale_"];
const OTHER_MARKERS: &[&str] = &["_other_", "__other__"];

/// Markers produced by the recognizer for noises, which carry no meaning once
/// the utterance is known to contain speech
pub const NOISE_MARKERS: &[&str] = NULL_MARKERS;

/// Classifies an utterance made of a single non-speech marker. An empty
/// utterance is silence.
pub fn classify_non_speech(utterance: &Utterance) -> Option<DialogueActItem> {
    if utterance.is_empty() {
        return Some(DialogueActItem::new(DialogueActType::Silence));
    }
    if utterance.len() != 1 {
        return None;
    }
    let token = utterance[0].as_str();
    let act_type = if SILENCE_MARKERS.contains(&token) {
        DialogueActType::Silence
    } else if NULL_MARKERS.contains(&token) {
        DialogueActType::Null
    } else if OTHER_MARKERS.contains(&token) {
        DialogueActType::Other
    } else {
        return None;
    };
    Some(DialogueActItem::new(act_type))
}

/// Drops the noise markers from the utterance
pub fn remove_noise(utterance: &Utterance) -> Utterance {
    NOISE_MARKERS
        .iter()
        .fold(utterance.clone(), |utterance, marker| utterance.remove_all(marker))
}
