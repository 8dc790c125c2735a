use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use failure::ResultExt;
use log::info;

use crate::errors::*;
use crate::models::SluEngineModel;
use crate::resources::lexicon::HashMapCategoryLexicon;
use crate::resources::utt2da::Utt2DaTable;
use crate::resources::SharedResources;
use crate::utterance::Normaliser;

pub fn load_shared_resources<P: AsRef<Path>>(
    engine_dir: P,
    model: &SluEngineModel,
    normaliser: &Normaliser,
) -> Result<Arc<SharedResources>> {
    let lexicon = load_lexicon(engine_dir.as_ref().join(&model.lexicon), model, normaliser)?;
    let utt2da = match model.utt2da.as_ref() {
        Some(utt2da_file) => load_utt2da(engine_dir.as_ref().join(utt2da_file), normaliser)?,
        None => Utt2DaTable::default(),
    };
    Ok(Arc::new(SharedResources {
        lexicon: Arc::new(lexicon),
        utt2da,
    }))
}

fn load_lexicon<P: AsRef<Path>>(
    path: P,
    model: &SluEngineModel,
    normaliser: &Normaliser,
) -> Result<HashMapCategoryLexicon> {
    let lexicon_file = File::open(path.as_ref())
        .with_context(|_| SluError::ModelLoad(path.as_ref().to_string_lossy().to_string()))?;
    let lexicon = HashMapCategoryLexicon::from_reader(lexicon_file, &model.category_priority, normaliser)
        .with_context(|_| format!("Invalid lexicon file {:?}", path.as_ref()))?;
    info!("Lexicon loaded: {} forms", lexicon.len());
    Ok(lexicon)
}

fn load_utt2da<P: AsRef<Path>>(path: P, normaliser: &Normaliser) -> Result<Utt2DaTable> {
    let utt2da_file = File::open(path.as_ref())
        .with_context(|_| SluError::ModelLoad(path.as_ref().to_string_lossy().to_string()))?;
    let utt2da = Utt2DaTable::from_reader(utt2da_file, normaliser)
        .with_context(|_| format!("Invalid utterance to dialogue act file {:?}", path.as_ref()))?;
    info!("Utterance to dialogue act overrides loaded: {} entries", utt2da.len());
    Ok(utt2da)
}
