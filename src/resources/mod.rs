pub mod lexicon;
pub mod loading;
pub mod utt2da;

use std::sync::Arc;

use self::lexicon::CategoryLexicon;
use self::utt2da::Utt2DaTable;

/// Read-only resources shared by all the parses of an engine
pub struct SharedResources {
    pub lexicon: Arc<dyn CategoryLexicon>,
    pub utt2da: Utt2DaTable,
}
