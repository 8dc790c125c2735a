use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Read;

use log::debug;

use crate::errors::*;
use crate::utterance::{CategoryName, Normaliser, Token};

/// One value a form resolves to, with its categories in priority order
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconValue {
    pub value: String,
    pub categories: Vec<CategoryName>,
}

pub trait CategoryLexicon: Send + Sync {
    /// Values matching exactly the token sequence `form`, in priority order.
    /// An unknown form yields an empty slice.
    fn lookup(&self, form: &[Token]) -> &[LexiconValue];

    /// Upper bound on the number of tokens of a form, if known
    fn max_form_len(&self) -> Option<usize> {
        None
    }
}

pub struct HashMapCategoryLexicon {
    forms: HashMap<Vec<Token>, Vec<LexiconValue>>,
    max_form_len: usize,
}

struct LexiconBuilder<'a> {
    normaliser: &'a Normaliser,
    forms: HashMap<Vec<Token>, BTreeMap<String, BTreeSet<CategoryName>>>,
}

impl<'a> LexiconBuilder<'a> {
    fn new(normaliser: &'a Normaliser) -> Self {
        Self {
            normaliser,
            forms: HashMap::new(),
        }
    }

    fn add(&mut self, category: &str, value: &str, form: &str) -> ::std::result::Result<(), String> {
        let category = category.trim().to_uppercase();
        let value = value.trim();
        // Forms go through the same normalisation as the parsed utterances
        let form: Vec<Token> = self.normaliser.normalise(form).tokens().to_vec();
        if category.is_empty()
            || !category
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(format!("invalid category name '{}'", category));
        }
        if value.is_empty() {
            return Err("empty value".to_string());
        }
        if form.is_empty() {
            return Err("empty form".to_string());
        }
        if form.iter().any(|token| token.contains('=')) {
            return Err(format!("form '{}' contains '='", form.join(" ")));
        }
        self.forms
            .entry(form)
            .or_insert_with(BTreeMap::new)
            .entry(value.to_string())
            .or_insert_with(BTreeSet::new)
            .insert(category);
        Ok(())
    }

    fn build(self, category_priority: &[CategoryName]) -> HashMapCategoryLexicon {
        let priority = |category: &CategoryName| {
            category_priority
                .iter()
                .position(|prioritized| prioritized.eq_ignore_ascii_case(category))
                .unwrap_or(::std::usize::MAX)
        };
        let max_form_len = self.forms.keys().map(|form| form.len()).max().unwrap_or(0);
        let forms = self
            .forms
            .into_iter()
            .map(|(form, values)| {
                let values = values
                    .into_iter()
                    .map(|(value, categories)| {
                        let mut categories: Vec<CategoryName> = categories.into_iter().collect();
                        categories.sort_by_key(|category| (priority(category), category.clone()));
                        LexiconValue { value, categories }
                    })
                    .collect();
                (form, values)
            })
            .collect();
        HashMapCategoryLexicon {
            forms,
            max_form_len,
        }
    }
}

impl HashMapCategoryLexicon {
    /// Reads `CATEGORY<TAB>value<TAB>form` rows; lines starting with `#` are
    /// comments. Forms are normalised with `normaliser`.
    pub fn from_reader<R: Read>(
        reader: R,
        category_priority: &[CategoryName],
        normaliser: &Normaliser,
    ) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .comment(Some(b'#'))
            .has_headers(false)
            .from_reader(reader);
        let mut builder = LexiconBuilder::new(normaliser);
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|pos| pos.line() as usize).unwrap_or(0);
            if record.len() == 1 && record[0].trim().is_empty() {
                continue;
            }
            if record.len() != 3 {
                return Err(SluError::InvalidLexiconEntry(
                    line,
                    format!("expected 3 tab separated columns, found {}", record.len()),
                )
                .into());
            }
            builder
                .add(&record[0], &record[1], &record[2])
                .map_err(|reason| SluError::InvalidLexiconEntry(line, reason))?;
        }
        let lexicon = builder.build(category_priority);
        debug!("{} lexicon forms read", lexicon.forms.len());
        Ok(lexicon)
    }

    /// Builds a lexicon from `(category, value, form)` triples
    pub fn from_entries<'a, I>(
        entries: I,
        category_priority: &[CategoryName],
        normaliser: &Normaliser,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        let mut builder = LexiconBuilder::new(normaliser);
        for (index, (category, value, form)) in entries.into_iter().enumerate() {
            builder
                .add(category, value, form)
                .map_err(|reason| SluError::InvalidLexiconEntry(index + 1, reason))?;
        }
        Ok(builder.build(category_priority))
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl CategoryLexicon for HashMapCategoryLexicon {
    fn lookup(&self, form: &[Token]) -> &[LexiconValue] {
        self.forms
            .get(form)
            .map(|values| values.as_slice())
            .unwrap_or(&[])
    }

    fn max_form_len(&self) -> Option<usize> {
        Some(self.max_form_len)
    }
}
