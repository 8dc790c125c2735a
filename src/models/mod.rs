mod phrase_tables;
mod slu_engine;

pub use self::phrase_tables::*;
pub use self::slu_engine::*;
