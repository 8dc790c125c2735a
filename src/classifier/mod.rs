pub mod cues;
pub mod meta;
pub mod non_speech;

pub use self::cues::Cue;
pub use self::meta::{MetaClassifier, MetaRule};
pub use self::non_speech::{classify_non_speech, remove_noise};
