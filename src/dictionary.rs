//! Canonical value dictionaries.
//!
//! Each domain maps lowercase raw tokens to a display value. Domains are merged
//! in [`Domain::MERGE_ORDER`]; a token defined by several domains takes the
//! value of the last one merged. Single-character keys are codes and remember
//! which domain they came from.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::countries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Country,
    Vote,
    Marital,
    Education,
    Gender,
    Blood,
    Medical,
}

impl Domain {
    pub const MERGE_ORDER: [Domain; 7] = [
        Domain::Country,
        Domain::Vote,
        Domain::Marital,
        Domain::Education,
        Domain::Gender,
        Domain::Blood,
        Domain::Medical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Country => "country",
            Domain::Vote => "vote",
            Domain::Marital => "marital",
            Domain::Education => "education",
            Domain::Gender => "gender",
            Domain::Blood => "blood",
            Domain::Medical => "medical",
        }
    }
}

const VOTE: &[(&str, &str)] = &[
    ("yes", "Yes"),
    ("y", "Yes"),
    ("ya", "Yes"),
    ("setuju", "Yes"),
    ("agree", "Yes"),
    ("no", "No"),
    ("n", "No"),
    ("tidak", "No"),
    ("tidak setuju", "No"),
    ("disagree", "No"),
    ("abstain", "Abstain"),
    ("abstained", "Abstain"),
    ("golput", "Abstain"),
    ("undecided", "Undecided"),
    ("ragu-ragu", "Undecided"),
];

const MARITAL: &[(&str, &str)] = &[
    ("single", "Single"),
    ("lajang", "Single"),
    ("belum kawin", "Single"),
    ("belum menikah", "Single"),
    ("never married", "Single"),
    ("married", "Married"),
    ("kawin", "Married"),
    ("menikah", "Married"),
    ("sudah menikah", "Married"),
    ("divorced", "Divorced"),
    ("cerai", "Divorced"),
    ("cerai hidup", "Divorced"),
    ("separated", "Separated"),
    ("pisah", "Separated"),
    ("widowed", "Widowed"),
    ("widow", "Widowed"),
    ("widower", "Widowed"),
    ("cerai mati", "Widowed"),
    ("janda", "Widowed"),
    ("duda", "Widowed"),
];

const EDUCATION: &[(&str, &str)] = &[
    ("sd", "Elementary School"),
    ("elementary", "Elementary School"),
    ("elementary school", "Elementary School"),
    ("primary school", "Elementary School"),
    ("smp", "Junior High School"),
    ("junior high", "Junior High School"),
    ("junior high school", "Junior High School"),
    ("sma", "High School"),
    ("smk", "High School"),
    ("high school", "High School"),
    ("senior high school", "High School"),
    ("d3", "Diploma"),
    ("diploma", "Diploma"),
    ("associate", "Diploma"),
    ("s1", "Bachelor"),
    ("bachelor", "Bachelor"),
    ("bachelors", "Bachelor"),
    ("bachelor's", "Bachelor"),
    ("sarjana", "Bachelor"),
    ("undergraduate", "Bachelor"),
    ("s2", "Master"),
    ("master", "Master"),
    ("masters", "Master"),
    ("master's", "Master"),
    ("magister", "Master"),
    ("s3", "Doctorate"),
    ("phd", "Doctorate"),
    ("ph.d", "Doctorate"),
    ("doctorate", "Doctorate"),
    ("doktor", "Doctorate"),
];

const GENDER: &[(&str, &str)] = &[
    ("m", "Male"),
    ("male", "Male"),
    ("man", "Male"),
    ("men", "Male"),
    ("l", "Male"),
    ("laki-laki", "Male"),
    ("laki laki", "Male"),
    ("pria", "Male"),
    ("cowok", "Male"),
    ("f", "Female"),
    ("female", "Female"),
    ("woman", "Female"),
    ("women", "Female"),
    ("p", "Female"),
    ("perempuan", "Female"),
    ("wanita", "Female"),
    ("cewek", "Female"),
];

const MEDICAL: &[(&str, &str)] = &[
    ("cardiology", "Cardiology"),
    ("kardiologi", "Cardiology"),
    ("jantung", "Cardiology"),
    ("neurology", "Neurology"),
    ("neurologi", "Neurology"),
    ("saraf", "Neurology"),
    ("pediatrics", "Pediatrics"),
    ("pediatric", "Pediatrics"),
    ("pediatri", "Pediatrics"),
    ("anak", "Pediatrics"),
    ("dermatology", "Dermatology"),
    ("dermatologi", "Dermatology"),
    ("kulit", "Dermatology"),
    ("orthopedics", "Orthopedics"),
    ("orthopedic", "Orthopedics"),
    ("ortopedi", "Orthopedics"),
    ("oncology", "Oncology"),
    ("onkologi", "Oncology"),
    ("psychiatry", "Psychiatry"),
    ("psikiatri", "Psychiatry"),
    ("jiwa", "Psychiatry"),
    ("general practice", "General Practice"),
    ("general practitioner", "General Practice"),
    ("umum", "General Practice"),
    ("obstetrics and gynecology", "Obstetrics and Gynecology"),
    ("obgyn", "Obstetrics and Gynecology"),
    ("kandungan", "Obstetrics and Gynecology"),
    ("ophthalmology", "Ophthalmology"),
    ("mata", "Ophthalmology"),
    ("dentistry", "Dentistry"),
    ("gigi", "Dentistry"),
    ("radiology", "Radiology"),
    ("radiologi", "Radiology"),
    ("internal medicine", "Internal Medicine"),
    ("penyakit dalam", "Internal Medicine"),
    ("surgery", "Surgery"),
    ("bedah", "Surgery"),
];

pub const BLOOD_GROUPS: [&str; 4] = ["a", "b", "ab", "o"];

/// Polarity words understood in English and Indonesian.
pub const POLARITY_WORDS: &[(&str, &str)] = &[
    ("positive", "+"),
    ("positif", "+"),
    ("pos", "+"),
    ("+", "+"),
    ("negative", "-"),
    ("negatif", "-"),
    ("neg", "-"),
    ("-", "-"),
];

pub fn polarity_symbol(word: &str) -> Option<&'static str> {
    POLARITY_WORDS
        .iter()
        .find(|(candidate, _)| *candidate == word)
        .map(|(_, symbol)| *symbol)
}

fn blood_entries() -> Vec<(String, String)> {
    let mut entries = POLARITY_WORDS
        .iter()
        .filter(|(word, _)| word.len() > 1)
        .map(|(word, symbol)| (word.to_string(), symbol.to_string()))
        .collect::<Vec<_>>();
    for group in BLOOD_GROUPS {
        let upper = group.to_ascii_uppercase();
        for (word, symbol) in POLARITY_WORDS {
            entries.push((format!("{group} {word}"), format!("{upper}{symbol}")));
        }
        for symbol in ["+", "-"] {
            entries.push((format!("{group}{symbol}"), format!("{upper}{symbol}")));
        }
    }
    entries
}

fn country_entries() -> Vec<(String, String)> {
    countries::builtin()
        .iter()
        .flat_map(|country| {
            std::iter::once(country.name)
                .chain(country.alternatives.iter().copied())
                .map(|name| (name.to_lowercase(), country.name.to_string()))
        })
        .chain(
            countries::COLLOQUIAL_ALIASES
                .iter()
                .map(|(alias, name)| (alias.to_string(), name.to_string())),
        )
        .collect()
}

/// Built-in entries for one domain, in declaration order.
pub fn domain_entries(domain: Domain) -> Vec<(String, String)> {
    let owned = |pairs: &[(&str, &str)]| {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>()
    };
    match domain {
        Domain::Country => country_entries(),
        Domain::Vote => owned(VOTE),
        Domain::Marital => owned(MARITAL),
        Domain::Education => owned(EDUCATION),
        Domain::Gender => owned(GENDER),
        Domain::Blood => blood_entries(),
        Domain::Medical => owned(MEDICAL),
    }
}

#[derive(Debug, Clone, Default)]
pub struct CanonicalDictionary {
    entries: HashMap<String, String>,
    codes: HashMap<String, Domain>,
}

impl CanonicalDictionary {
    pub fn builtin() -> Self {
        Self::with_extensions(&BTreeMap::new())
    }

    /// Merges every domain in [`Domain::MERGE_ORDER`], each domain's
    /// configured extras applied on top of its built-in entries.
    pub fn with_extensions(extra: &BTreeMap<Domain, BTreeMap<String, String>>) -> Self {
        let mut entries = HashMap::new();
        let mut codes = HashMap::new();
        for domain in Domain::MERGE_ORDER {
            let configured = extra
                .get(&domain)
                .into_iter()
                .flatten()
                .map(|(k, v)| (k.clone(), v.clone()));
            for (key, value) in domain_entries(domain).into_iter().chain(configured) {
                let key = key.trim().to_lowercase();
                if key.chars().count() == 1 {
                    codes.insert(key.clone(), domain);
                }
                entries.insert(key, value);
            }
        }
        Self { entries, codes }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    /// The domain of a single-character code such as `m` or `y`.
    pub fn code_domain(&self, token: &str) -> Option<Domain> {
        self.codes.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_lowercase() {
        let dictionary = CanonicalDictionary::builtin();
        assert!(dictionary.keys().all(|k| k == k.to_lowercase()));
        assert_eq!(dictionary.get("perempuan"), Some("Female"));
        assert_eq!(dictionary.get("america"), Some("USA"));
        assert_eq!(dictionary.get("indonesia"), Some("Indonesia"));
    }

    #[test]
    fn blood_dictionary_covers_words_and_composites() {
        let dictionary = CanonicalDictionary::builtin();
        assert_eq!(dictionary.get("positif"), Some("+"));
        assert_eq!(dictionary.get("o negatif"), Some("O-"));
        assert_eq!(dictionary.get("ab+"), Some("AB+"));
        assert_eq!(dictionary.get("a positive"), Some("A+"));
    }

    #[test]
    fn later_domains_win_on_collision() {
        let mut extra = BTreeMap::new();
        extra.insert(
            Domain::Marital,
            BTreeMap::from([("solo".to_string(), "Single".to_string())]),
        );
        extra.insert(
            Domain::Gender,
            BTreeMap::from([("solo".to_string(), "Male".to_string())]),
        );
        let dictionary = CanonicalDictionary::with_extensions(&extra);
        assert_eq!(dictionary.get("solo"), Some("Male"));
    }

    #[test]
    fn configured_keys_are_case_normalized() {
        let extra = BTreeMap::from([(
            Domain::Vote,
            BTreeMap::from([("  Mungkin ".to_string(), "Undecided".to_string())]),
        )]);
        let dictionary = CanonicalDictionary::with_extensions(&extra);
        assert_eq!(dictionary.get("mungkin"), Some("Undecided"));
    }

    #[test]
    fn single_letters_are_codes_of_their_domain() {
        let dictionary = CanonicalDictionary::builtin();
        assert_eq!(dictionary.code_domain("m"), Some(Domain::Gender));
        assert_eq!(dictionary.code_domain("p"), Some(Domain::Gender));
        assert_eq!(dictionary.code_domain("y"), Some(Domain::Vote));
        assert_eq!(dictionary.code_domain("male"), None);
        assert_eq!(dictionary.code_domain("s"), None);
        assert_eq!(dictionary.get("n"), Some("No"));
    }

    #[test]
    fn merge_order_is_fixed() {
        assert_eq!(
            Domain::MERGE_ORDER.map(Domain::as_str),
            ["country", "vote", "marital", "education", "gender", "blood", "medical"]
        );
    }
}
