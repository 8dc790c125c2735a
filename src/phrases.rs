use std::convert::TryFrom;
use std::ops::Range;

use serde_derive::Deserialize;

use crate::errors::SluError;
use crate::utterance::{phrase_positions, split_category_tag, Token};

/// An ordered list of tokenized phrases, matched as contiguous token
/// subsequences.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct PhraseSet {
    phrases: Vec<Vec<Token>>,
}

impl PhraseSet {
    /// Builds a phrase set from literal phrases; panics on an empty phrase, use
    /// `TryFrom` for configuration input
    pub fn from_static(phrases: &[&str]) -> Self {
        Self::try_from(phrases.iter().map(|phrase| phrase.to_string()).collect::<Vec<_>>())
            .unwrap_or_else(|e| panic!("{}", e))
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn any_in<T: AsRef<str>>(&self, tokens: &[T]) -> bool {
        self.phrases
            .iter()
            .any(|phrase| phrase_positions(tokens, phrase).next().is_some())
    }

    /// Span of the first phrase, in list order, found in `tokens`
    pub fn first_span<T: AsRef<str>>(&self, tokens: &[T]) -> Option<Range<usize>> {
        self.phrases.iter().find_map(|phrase| {
            phrase_positions(tokens, phrase)
                .next()
                .map(|start| start..start + phrase.len())
        })
    }

    /// Span of the occurrence ending last in `tokens`; among spans with the
    /// same end, the longer one
    pub fn last_span<T: AsRef<str>>(&self, tokens: &[T]) -> Option<Range<usize>> {
        self.phrases
            .iter()
            .flat_map(|phrase| {
                phrase_positions(tokens, phrase).map(move |start| start..start + phrase.len())
            })
            .fold(None, |best: Option<Range<usize>>, span| {
                if best
                    .as_ref()
                    .map_or(true, |current| span_is_closer(&span, current))
                {
                    Some(span)
                } else {
                    best
                }
            })
    }

    /// Whether `tokens` ends with one of the phrases
    pub fn ends<T: AsRef<str>>(&self, tokens: &[T]) -> bool {
        self.phrases.iter().any(|phrase| {
            phrase.len() <= tokens.len()
                && tokens[tokens.len() - phrase.len()..]
                    .iter()
                    .zip(phrase.iter())
                    .all(|(token, word)| token.as_ref() == word.as_str())
        })
    }
}

/// A span is closer to the end of the window when it ends later, or ends at
/// the same position and starts earlier
pub fn span_is_closer(span: &Range<usize>, other: &Range<usize>) -> bool {
    span.end > other.end || (span.end == other.end && span.start < other.start)
}

impl TryFrom<Vec<String>> for PhraseSet {
    type Error = SluError;

    fn try_from(phrases: Vec<String>) -> Result<Self, Self::Error> {
        let phrases = phrases
            .into_iter()
            .map(|phrase| {
                let tokens: Vec<Token> = phrase
                    .split_whitespace()
                    .map(|token| match split_category_tag(token) {
                        Some(_) => token.to_string(),
                        None => token.to_lowercase(),
                    })
                    .collect();
                if tokens.is_empty() {
                    Err(SluError::InvalidPhraseTable(
                        "phrases must contain at least one token".to_string(),
                    ))
                } else {
                    Ok(tokens)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { phrases })
    }
}
