use log::debug;

use crate::abstraction::{AbstractedUtterance, ReplacedSpan};
use crate::errors::*;
use crate::models::CorrectionRule;
use crate::utterance::{split_category_tag, CategoryName};

/// Ordered token sequence rewrites repairing known false positive
/// abstractions
pub struct CorrectionPass {
    rules: Vec<CorrectionRule>,
    always_present_categories: Vec<CategoryName>,
}

impl CorrectionPass {
    pub fn new(
        rules: Vec<CorrectionRule>,
        always_present_categories: Vec<CategoryName>,
    ) -> Result<Self> {
        if let Some(rule) = rules.iter().find(|rule| rule.pattern.is_empty()) {
            return Err(SluError::InvalidPhraseTable(format!(
                "correction rule with replacement {:?} has an empty pattern",
                rule.replacement
            ))
            .into());
        }
        Ok(Self {
            rules,
            always_present_categories,
        })
    }

    /// Applies each rule once, in order, to the first occurrence of its
    /// pattern. Categories of the tags introduced by a rule, and the always
    /// present categories, are added to the category set. Replaced spans whose
    /// tag is rewritten are dropped, the following ones are moved.
    pub fn apply(&self, abstracted: AbstractedUtterance) -> AbstractedUtterance {
        let AbstractedUtterance {
            mut utterance,
            mut categories,
            mut replaced_spans,
        } = abstracted;
        for rule in &self.rules {
            let start = match utterance.find(&rule.pattern) {
                Some(start) => start,
                None => continue,
            };
            debug!("Applying correction {:?} -> {:?}", rule.pattern, rule.replacement);
            utterance = utterance.replace(&rule.pattern, &rule.replacement);
            shift_spans(&mut replaced_spans, start, rule.pattern.len(), rule.replacement.len());
            categories.extend(
                rule.replacement
                    .iter()
                    .filter_map(|token| split_category_tag(token))
                    .map(|(category, _)| category.to_string()),
            );
        }
        categories.extend(self.always_present_categories.iter().cloned());
        AbstractedUtterance {
            utterance,
            categories,
            replaced_spans,
        }
    }
}

/// Updates the tag positions after `removed` tokens at `start` were replaced
/// by `inserted` tokens
fn shift_spans(spans: &mut Vec<ReplacedSpan>, start: usize, removed: usize, inserted: usize) {
    let end = start + removed;
    spans.retain(|span| span.position < start || span.position >= end);
    for span in spans.iter_mut().filter(|span| span.position >= end) {
        span.position = span.position + inserted - removed;
    }
}
