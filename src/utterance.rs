use std::collections::HashMap;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Index;

use itertools::Itertools;
use serde_derive::Serialize;

pub type Token = String;
pub type CategoryName = String;

/// An ordered sequence of tokens, immutable once built. Category tags are
/// tokens of the form `CATEGORY=value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Utterance {
    tokens: Vec<Token>,
}

impl Utterance {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Token>,
    {
        Self {
            tokens: tokens.into_iter().map(|token| token.into()).collect(),
        }
    }

    /// Splits the text on whitespace without any normalisation
    pub fn from_text(text: &str) -> Self {
        Self::new(text.split_whitespace())
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.tokens.iter().any(|token| token == word)
    }

    /// Position of the first contiguous occurrence of `phrase`
    pub fn find<S: AsRef<str>>(&self, phrase: &[S]) -> Option<usize> {
        find_phrase(&self.tokens, phrase)
    }

    /// Replaces the first occurrence of `pattern` with `replacement`
    pub fn replace<S: AsRef<str>, R: AsRef<str>>(&self, pattern: &[S], replacement: &[R]) -> Self {
        match self.find(pattern) {
            Some(position) => {
                let mut tokens = Vec::with_capacity(self.len() + replacement.len());
                tokens.extend_from_slice(&self.tokens[..position]);
                tokens.extend(replacement.iter().map(|token| token.as_ref().to_string()));
                tokens.extend_from_slice(&self.tokens[position + pattern.len()..]);
                Self { tokens }
            }
            None => self.clone(),
        }
    }

    /// Drops every token equal to `token`
    pub fn remove_all(&self, token: &str) -> Self {
        self.tokens
            .iter()
            .filter(|current| *current != token)
            .cloned()
            .collect()
    }

    pub fn text(&self) -> String {
        self.tokens.iter().join(" ")
    }
}

impl Index<usize> for Utterance {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl FromIterator<Token> for Utterance {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Token>> for Utterance {
    fn from(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

pub fn find_phrase<T: AsRef<str>, S: AsRef<str>>(tokens: &[T], phrase: &[S]) -> Option<usize> {
    phrase_positions(tokens, phrase).next()
}

/// All start positions at which `phrase` occurs contiguously in `tokens`
pub fn phrase_positions<'a, T, S>(
    tokens: &'a [T],
    phrase: &'a [S],
) -> impl Iterator<Item = usize> + 'a
where
    T: AsRef<str> + 'a,
    S: AsRef<str> + 'a,
{
    let nb_starts = if phrase.is_empty() || phrase.len() > tokens.len() {
        0
    } else {
        tokens.len() - phrase.len() + 1
    };
    (0..nb_starts).filter(move |start| {
        tokens[*start..*start + phrase.len()]
            .iter()
            .zip(phrase.iter())
            .all(|(token, word)| token.as_ref() == word.as_ref())
    })
}

pub fn category_tag(category: &str, value: &str) -> Token {
    format!("{}={}", category, value)
}

/// Splits a `CATEGORY=value` token. The category part must be made of
/// uppercase letters, digits and underscores.
pub fn split_category_tag(token: &str) -> Option<(&str, &str)> {
    let separator = token.find('=')?;
    let category = &token[..separator];
    let is_category = !category.is_empty()
        && category.starts_with(|c: char| c.is_ascii_uppercase())
        && category
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    if is_category {
        Some((category, &token[separator + 1..]))
    } else {
        None
    }
}

/// Returns the value of `token` if it is a tag of `category`
pub fn tag_value<'a>(token: &'a str, category: &str) -> Option<&'a str> {
    split_category_tag(token).and_then(|(tag_category, value)| {
        if tag_category == category {
            Some(value)
        } else {
            None
        }
    })
}

fn is_trailing_punctuation(c: char) -> bool {
    match c {
        ',' | '.' | ';' | ':' | '!' | '?' | '"' | ')' => true,
        _ => false,
    }
}

/// Turns raw recognizer output into a normalised utterance
#[derive(Debug, Clone, Default)]
pub struct Normaliser {
    substitutions: HashMap<Token, Token>,
}

impl Normaliser {
    pub fn new(substitutions: HashMap<Token, Token>) -> Self {
        let substitutions = substitutions
            .into_iter()
            .map(|(from, to)| (from.to_lowercase(), to))
            .collect();
        Self { substitutions }
    }

    pub fn normalise(&self, text: &str) -> Utterance {
        text.split_whitespace()
            .filter_map(|raw_token| {
                if let Some((category, value)) = split_category_tag(raw_token) {
                    let value = value.trim_end_matches(is_trailing_punctuation);
                    if !value.is_empty() {
                        return Some(category_tag(category, value));
                    }
                }
                let token = raw_token
                    .to_lowercase()
                    .trim_matches(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .to_string();
                if token.is_empty() {
                    None
                } else {
                    Some(self.substitutions.get(&token).cloned().unwrap_or(token))
                }
            })
            .filter(|token| !token.is_empty())
            .collect()
    }
}
