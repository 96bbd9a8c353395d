//! Dictionary-driven canonicalization of categorical columns.
//!
//! A column is routed as a whole: when any of its values is a canonical
//! dictionary key every value is looked up directly, otherwise every value is
//! sent through two-tier spelling correction and keeps its corrected spelling.
//! Single-letter codes (`m`, `f`, `y`, ...) only route a column made up of
//! codes from one domain. Corrections are memoized per raw token for the
//! lifetime of the normalizer.

use std::collections::BTreeSet;

use log::debug;
use serde::Serialize;

use crate::{
    config::PipelineConfig,
    correction::{
        CorrectionCache, EditDistanceDictionary, FuzzyDictionary, SpellingCorrector,
        VocabularyCorrector, levenshtein,
    },
    data::{Cell, Column},
    dictionary::CanonicalDictionary,
    normalize::{
        blood,
        text::{lowercase, squash_whitespace, title_case},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Dictionary,
    Correction,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoricalOutcome {
    pub column: String,
    pub route: Route,
    pub blood_type: bool,
    pub changed: usize,
}

pub struct CategoricalNormalizer {
    dictionary: CanonicalDictionary,
    speller: Box<dyn SpellingCorrector>,
    fuzzy: Box<dyn FuzzyDictionary>,
    cache: CorrectionCache,
    max_edit_distance: usize,
    sentinel: String,
}

impl CategoricalNormalizer {
    pub fn new(
        dictionary: CanonicalDictionary,
        speller: Box<dyn SpellingCorrector>,
        fuzzy: Box<dyn FuzzyDictionary>,
    ) -> Self {
        let defaults = PipelineConfig::default();
        Self {
            dictionary,
            speller,
            fuzzy,
            cache: CorrectionCache::new(),
            max_edit_distance: defaults.max_edit_distance,
            sentinel: defaults.unknown_sentinel,
        }
    }

    /// Built-in dictionary with the in-memory vocabulary and edit-distance correctors.
    pub fn builtin() -> Self {
        Self::with_vocabulary(CanonicalDictionary::builtin(), VocabularyCorrector::builtin())
    }

    /// Both tiers search the same vocabulary, so a correctly spelled word
    /// always finds itself first.
    pub fn with_vocabulary(dictionary: CanonicalDictionary, speller: VocabularyCorrector) -> Self {
        let fuzzy = EditDistanceDictionary::from_vocabulary(&speller);
        Self::new(dictionary, Box::new(speller), Box::new(fuzzy))
    }

    pub fn with_max_edit_distance(mut self, max_edit_distance: usize) -> Self {
        self.max_edit_distance = max_edit_distance;
        self
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    pub fn dictionary(&self) -> &CanonicalDictionary {
        &self.dictionary
    }

    pub fn cache(&self) -> &CorrectionCache {
        &self.cache
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    fn is_sentinel(&self, token: &str) -> bool {
        token.eq_ignore_ascii_case(&self.sentinel)
    }

    /// Dictionary when at least one token is a multi-letter canonical key, or
    /// when every token is a single-letter code of the same domain. Correction
    /// otherwise.
    pub fn route<'t, I>(&self, tokens: I) -> Route
    where
        I: IntoIterator<Item = &'t str>,
    {
        let mut code_domains = BTreeSet::new();
        let mut only_codes = true;
        for token in tokens {
            match self.dictionary.code_domain(token) {
                Some(domain) => {
                    code_domains.insert(domain);
                }
                None if self.dictionary.contains(token) => return Route::Dictionary,
                None => only_codes = false,
            }
        }
        if only_codes && code_domains.len() == 1 {
            Route::Dictionary
        } else {
            Route::Correction
        }
    }

    /// Two-tier correction of a lowercase token, memoized. Returns the token
    /// itself when neither tier offers anything.
    pub fn correct(&self, token: &str) -> String {
        self.cache.get_or_compute(token, || {
            if let Some(fixed) = self.speller.correct(token).filter(|fixed| fixed != token) {
                return fixed;
            }
            self.fuzzy
                .lookup(token, self.max_edit_distance)
                .into_iter()
                .next()
                .filter(|candidate| acceptable_rewrite(token, candidate))
                .unwrap_or_else(|| token.to_string())
        })
    }

    /// Rewrites one categorical column in place. `blood_hint` forces
    /// blood-type assembly regardless of the column's values.
    pub fn normalize_column(&self, column: &mut Column, blood_hint: bool) -> CategoricalOutcome {
        let tokens = column
            .cells
            .iter()
            .map(|cell| match cell {
                Cell::Missing => None,
                other => {
                    let display = other.as_display();
                    let token = lowercase(squash_whitespace(&display).as_ref()).into_owned();
                    (!self.is_sentinel(&token)).then_some(token)
                }
            })
            .collect::<Vec<_>>();

        let route = self.route(tokens.iter().flatten().map(String::as_str));
        let blood_type = blood_hint
            || tokens
                .iter()
                .flatten()
                .any(|token| blood::signals_blood_type(token));

        let mut changed = 0;
        for (cell, token) in column.cells.iter_mut().zip(tokens) {
            let rewritten = match token {
                None => self.sentinel.clone(),
                Some(token) => match route {
                    Route::Dictionary => match self.dictionary.get(&token) {
                        Some(canonical) => self.finish_canonical(canonical, blood_type),
                        None => self.finish_plain(&token, blood_type),
                    },
                    Route::Correction => self.finish_plain(&self.correct(&token), blood_type),
                },
            };
            if cell.as_text() != Some(rewritten.as_str()) {
                changed += 1;
            }
            *cell = Cell::Text(rewritten);
        }

        debug!(
            "Categorical column '{}': {:?} route, blood_type={}, {} cell(s) rewritten",
            column.name, route, blood_type, changed
        );
        CategoricalOutcome {
            column: column.name.clone(),
            route,
            blood_type,
            changed,
        }
    }

    fn finish_canonical(&self, canonical: &str, blood_type: bool) -> String {
        if blood_type {
            blood::normalize_value(canonical)
        } else {
            canonical.to_string()
        }
    }

    fn finish_plain(&self, token: &str, blood_type: bool) -> String {
        if blood_type {
            blood::normalize_value(token)
        } else {
            title_case(token).into_owned()
        }
    }
}

/// A fuzzy candidate may not rewrite more than a third of the longer string.
fn acceptable_rewrite(token: &str, candidate: &str) -> bool {
    let longest = token.chars().count().max(candidate.chars().count());
    levenshtein(token, candidate) * 3 <= longest
}
