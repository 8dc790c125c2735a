use failure::Fail;

#[derive(Debug, Fail)]
pub enum SluError {
    #[fail(display = "Unable to read file '{}'", _0)]
    ModelLoad(String),
    #[fail(display = "Expected model version {} but found {}", _1, _0)]
    WrongModelVersion(String, &'static str),
    #[fail(display = "Invalid lexicon entry at line {}: {}", _0, _1)]
    InvalidLexiconEntry(usize, String),
    #[fail(display = "Invalid phrase table: {}", _0)]
    InvalidPhraseTable(String),
    #[fail(display = "Invalid dialogue act: '{}'", _0)]
    InvalidDialogueAct(String),
}

pub type Result<T> = ::std::result::Result<T, ::failure::Error>;
