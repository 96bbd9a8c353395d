//! Spelling correction services and the correction cache.
//!
//! Correction is two-tier: a [`SpellingCorrector`] that fixes individual
//! words against a general vocabulary, and a [`FuzzyDictionary`] that matches
//! the whole value against canonical tokens within a larger edit distance.
//! Both are traits so callers can plug in their own services; the built-in
//! implementations are plain in-memory word lists. Neither tier knows about
//! the canonical dictionary, so a correction never lands on another domain's
//! value.

use std::{
    collections::HashMap,
    fs,
    path::Path,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::error::{CleanError, CleanResult};

/// Tier 1: general-purpose spell correction.
pub trait SpellingCorrector: Send + Sync {
    /// Returns the corrected text, or `None` when nothing was corrected.
    fn correct(&self, token: &str) -> Option<String>;
}

/// Tier 2: edit-distance lookup against a dictionary of known terms.
pub trait FuzzyDictionary: Send + Sync {
    /// Candidates within `max_edit_distance`, best first. Empty when none qualify.
    fn lookup(&self, token: &str, max_edit_distance: usize) -> Vec<String>;
}

/// Levenshtein distance over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut previous = (0..=b.len()).collect::<Vec<_>>();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Process-lifetime memo of raw token → corrected token.
///
/// Safe to share across threads. The lock is not held while computing, so two
/// callers racing on the same key may both compute; the first insert wins and
/// both return the same value.
#[derive(Debug, Default)]
pub struct CorrectionCache {
    entries: Mutex<HashMap<String, String>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl CorrectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> String
    where
        F: FnOnce() -> String,
    {
        if let Some(found) = self.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return found;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let computed = compute();
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(key.to_string())
            .or_insert(computed)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }
}

/// Common English words used alongside the canonical vocabulary; earlier words rank higher.
const COMMON_WORDS: &[&str] = &[
    "the", "and", "of", "to", "in", "for", "with", "on", "not", "other", "none", "unknown", "yes",
    "no", "good", "bad", "high", "low", "medium", "very", "poor", "fair", "excellent", "average",
    "new", "old", "used", "small", "large", "big", "active", "inactive", "pending", "approved",
    "rejected", "completed", "cancelled", "canceled", "shipped", "delivered", "returned",
    "paid", "unpaid", "open", "closed", "true", "false", "full", "part", "time", "student",
    "employee", "employed", "unemployed", "retired", "self", "business", "private", "public",
    "government", "company", "school", "university", "college", "office", "home", "city",
    "village", "urban", "rural", "north", "south", "east", "west", "central", "food",
    "beverage", "electronics", "clothing", "fashion", "books", "sports", "toys", "beauty",
    "health", "furniture", "grocery", "household", "automotive", "music", "movies", "games",
    "reading", "swimming", "running", "cooking", "travel", "travelling", "painting", "writing",
    "dancing", "singing", "hiking", "cycling", "fishing", "gaming", "photography", "red",
    "blue", "green", "yellow", "black", "white", "orange", "purple", "pink", "brown", "grey",
    "gray", "silver", "gold", "monday", "tuesday", "wednesday", "thursday", "friday",
    "saturday", "sunday", "morning", "afternoon", "evening", "night", "daily", "weekly",
    "monthly", "yearly", "annual", "basic", "standard", "premium", "platinum", "cash",
    "credit", "debit", "card", "transfer", "online", "offline", "store", "mobile", "web",
    "email", "phone", "social", "media", "friend", "family", "referral", "advertisement",
    "manager", "engineer", "teacher", "doctor", "nurse", "lawyer", "farmer", "driver",
    "entrepreneur", "housewife", "staff", "director", "officer", "worker", "labor", "sales",
    "marketing", "finance", "operations", "support", "service", "research", "development",
    "human", "resources", "information", "technology", "legal", "medicine", "general",
    "practice", "surgery", "emergency", "internal", "male", "female", "single", "married",
    "divorced", "separated", "widowed", "elementary", "junior", "senior", "diploma",
    "bachelor", "master", "doctorate", "positive", "negative", "agree", "disagree", "abstain",
    "undecided",
];

/// Tier-1 corrector: per-word correction against a ranked vocabulary.
#[derive(Debug, Clone, Default)]
pub struct VocabularyCorrector {
    words: HashMap<String, u64>,
}

impl VocabularyCorrector {
    /// The built-in English word list.
    pub fn builtin() -> Self {
        let mut corrector = Self::default();
        let total = COMMON_WORDS.len() as u64;
        for (rank, word) in COMMON_WORDS.iter().enumerate() {
            corrector.add_word(word, total - rank as u64);
        }
        corrector
    }

    pub fn add_word(&mut self, word: &str, frequency: u64) {
        let entry = self.words.entry(word.to_string()).or_insert(0);
        *entry = (*entry).max(frequency);
    }

    /// Adds words from a file of `word [frequency]` lines.
    pub fn load_extra(&mut self, path: &Path) -> CleanResult<usize> {
        let raw = fs::read_to_string(path)
            .map_err(|err| CleanError::ResolverUnavailable(format!("{path:?}: {err}")))?;
        let mut added = 0;
        for line in raw.lines() {
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let frequency = parts.next().and_then(|f| f.parse().ok()).unwrap_or(1);
            self.add_word(&word.to_lowercase(), frequency);
            added += 1;
        }
        Ok(added)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    pub fn words(&self) -> impl Iterator<Item = (&str, u64)> {
        self.words.iter().map(|(word, frequency)| (word.as_str(), *frequency))
    }

    fn correct_word(&self, word: &str) -> Option<&str> {
        let length = word.chars().count();
        if length < 3 || self.contains(word) || !word.chars().all(char::is_alphabetic) {
            return None;
        }
        let budget = if length <= 5 { 1 } else { 2 };
        self.words
            .iter()
            .filter(|(candidate, _)| candidate.chars().count().abs_diff(length) <= budget)
            .map(|(candidate, frequency)| (levenshtein(word, candidate), *frequency, candidate))
            .filter(|(distance, _, _)| *distance <= budget)
            .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(a.2.cmp(b.2)))
            .map(|(_, _, candidate)| candidate.as_str())
    }
}

impl SpellingCorrector for VocabularyCorrector {
    fn correct(&self, token: &str) -> Option<String> {
        let mut changed = false;
        let corrected = token
            .split_whitespace()
            .map(|word| match self.correct_word(word) {
                Some(fixed) => {
                    changed = true;
                    fixed
                }
                None => word,
            })
            .collect::<Vec<_>>()
            .join(" ");
        changed.then_some(corrected)
    }
}

/// Tier-2 dictionary: whole-value edit-distance lookup over known terms.
#[derive(Debug, Clone, Default)]
pub struct EditDistanceDictionary {
    terms: HashMap<String, u64>,
}

impl EditDistanceDictionary {
    /// Every vocabulary word with its frequency.
    pub fn from_vocabulary(vocabulary: &VocabularyCorrector) -> Self {
        let mut dictionary = Self::default();
        for (word, frequency) in vocabulary.words() {
            dictionary.insert(word, frequency);
        }
        dictionary
    }

    /// Adds a term, keeping the higher frequency when it is already known.
    pub fn insert(&mut self, term: &str, frequency: u64) {
        let entry = self.terms.entry(term.to_lowercase()).or_insert(0);
        *entry = (*entry).max(frequency);
    }
}

impl FuzzyDictionary for EditDistanceDictionary {
    fn lookup(&self, token: &str, max_edit_distance: usize) -> Vec<String> {
        let length = token.chars().count();
        let mut candidates = self
            .terms
            .iter()
            .filter(|(term, _)| term.chars().count().abs_diff(length) <= max_edit_distance)
            .map(|(term, frequency)| (levenshtein(token, term), *frequency, term))
            .filter(|(distance, _, _)| *distance <= max_edit_distance)
            .collect::<Vec<_>>();
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(a.2.cmp(b.2)));
        candidates
            .into_iter()
            .map(|(_, _, term)| term.clone())
            .collect()
    }
}
