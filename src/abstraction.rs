use std::collections::BTreeSet;
use std::ops::Range;

use crate::resources::lexicon::CategoryLexicon;
use crate::utterance::{category_tag, split_category_tag, CategoryName, Token, Utterance};

/// A span of the source utterance which has been replaced by a single tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacedSpan {
    /// Token range in the source utterance
    pub source: Range<usize>,
    /// Position of the tag in the abstracted utterance
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbstractedUtterance {
    pub utterance: Utterance,
    pub categories: BTreeSet<CategoryName>,
    /// Lexicon replacements, kept in sync by the correction pass. Noise
    /// removal and number collapsing run later on the utterance alone and
    /// leave the spans as they were after corrections.
    pub replaced_spans: Vec<ReplacedSpan>,
}

impl AbstractedUtterance {
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

/// Replaces lexicon forms with `CATEGORY=value` tags, greedily, longest match
/// first, left to right. Tags already present in `utterance` are kept as is
/// and their categories are recorded.
pub fn abstract_utterance(
    utterance: &Utterance,
    lexicon: &dyn CategoryLexicon,
) -> AbstractedUtterance {
    let tokens = utterance.tokens();
    let max_form_len = lexicon.max_form_len().unwrap_or_else(|| tokens.len());
    let mut abstracted: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut categories = BTreeSet::new();
    let mut replaced_spans = vec![];

    let mut start = 0;
    while start < tokens.len() {
        if let Some((category, _)) = split_category_tag(&tokens[start]) {
            categories.insert(category.to_string());
            abstracted.push(tokens[start].clone());
            start += 1;
            continue;
        }
        // Forms never span an existing tag
        let limit = tokens[start..]
            .iter()
            .position(|token| split_category_tag(token).is_some())
            .map(|offset| start + offset)
            .unwrap_or_else(|| tokens.len())
            .min(start + max_form_len);
        let longest_match = (start + 1..=limit).rev().find_map(|end| {
            lexicon
                .lookup(&tokens[start..end])
                .iter()
                .find(|value| !value.categories.is_empty())
                .map(|value| (end, value))
        });
        match longest_match {
            Some((end, value)) => {
                replaced_spans.push(ReplacedSpan {
                    source: start..end,
                    position: abstracted.len(),
                });
                abstracted.push(category_tag(&value.categories[0], &value.value));
                categories.extend(value.categories.iter().cloned());
                start = end;
            }
            None => {
                abstracted.push(tokens[start].clone());
                start += 1;
            }
        }
    }

    AbstractedUtterance {
        utterance: abstracted.into(),
        categories,
        replaced_spans,
    }
}
