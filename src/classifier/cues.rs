use crate::phrases::PhraseSet;
use crate::utterance::Token;

/// A boolean predicate over the tokens of an utterance
#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    /// At least one of the words is a token of the utterance
    AnyWord(Vec<Token>),
    /// Every word is a token of the utterance, in any order
    AllWords(Vec<Token>),
    /// One of the phrases occurs contiguously
    AnyPhrase(PhraseSet),
    /// The utterance ends with one of the phrases
    EndsWith(PhraseSet),
    /// The utterance has exactly this number of tokens
    Length(usize),
    All(Vec<Cue>),
    Any(Vec<Cue>),
    Not(Box<Cue>),
}

fn split_words(words: &str) -> Vec<Token> {
    words.split_whitespace().map(|word| word.to_string()).collect()
}

pub fn any_word(words: &str) -> Cue {
    Cue::AnyWord(split_words(words))
}

pub fn all_words(words: &str) -> Cue {
    Cue::AllWords(split_words(words))
}

pub fn phrase(phrase: &str) -> Cue {
    Cue::AnyPhrase(PhraseSet::from_static(&[phrase]))
}

pub fn any_phrase(phrases: &[&str]) -> Cue {
    Cue::AnyPhrase(PhraseSet::from_static(phrases))
}

pub fn ends_with(phrases: &[&str]) -> Cue {
    Cue::EndsWith(PhraseSet::from_static(phrases))
}

pub fn length(nb_tokens: usize) -> Cue {
    Cue::Length(nb_tokens)
}

pub fn any_of(cues: Vec<Cue>) -> Cue {
    Cue::Any(cues)
}

impl Cue {
    pub fn and(self, other: Cue) -> Cue {
        match self {
            Cue::All(mut cues) => {
                cues.push(other);
                Cue::All(cues)
            }
            cue => Cue::All(vec![cue, other]),
        }
    }

    pub fn or(self, other: Cue) -> Cue {
        match self {
            Cue::Any(mut cues) => {
                cues.push(other);
                Cue::Any(cues)
            }
            cue => Cue::Any(vec![cue, other]),
        }
    }

    pub fn unless(self, exclusion: Cue) -> Cue {
        self.and(Cue::Not(Box::new(exclusion)))
    }

    pub fn matches<T: AsRef<str>>(&self, tokens: &[T]) -> bool {
        match self {
            Cue::AnyWord(words) => words
                .iter()
                .any(|word| tokens.iter().any(|token| token.as_ref() == word)),
            Cue::AllWords(words) => words
                .iter()
                .all(|word| tokens.iter().any(|token| token.as_ref() == word)),
            Cue::AnyPhrase(phrases) => phrases.any_in(tokens),
            Cue::EndsWith(phrases) => phrases.ends(tokens),
            Cue::Length(nb_tokens) => tokens.len() == *nb_tokens,
            Cue::All(cues) => cues.iter().all(|cue| cue.matches(tokens)),
            Cue::Any(cues) => cues.iter().any(|cue| cue.matches(tokens)),
            Cue::Not(cue) => !cue.matches(tokens),
        }
    }
}
