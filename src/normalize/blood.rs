//! Blood-type detection and composite parsing.

use std::fmt;

use crate::dictionary::polarity_symbol;

const POLARITY_KEYWORDS: &[&str] = &["positive", "negative", "positif", "negatif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BloodGroup {
    A,
    B,
    AB,
    O,
}

impl BloodGroup {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "a" => Some(BloodGroup::A),
            "b" => Some(BloodGroup::B),
            "ab" => Some(BloodGroup::AB),
            "o" => Some(BloodGroup::O),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BloodGroup::A => "A",
            BloodGroup::B => "B",
            BloodGroup::AB => "AB",
            BloodGroup::O => "O",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    fn parse(word: &str) -> Option<Self> {
        match polarity_symbol(word)? {
            "+" => Some(Polarity::Positive),
            _ => Some(Polarity::Negative),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Polarity::Positive => "+",
            Polarity::Negative => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloodType {
    pub group: BloodGroup,
    pub polarity: Polarity,
}

impl BloodType {
    /// Parses `"<group> <polarity word>"` or a single `"<group><+|->"` token.
    pub fn parse(value: &str) -> Option<Self> {
        let lowered = value.trim().to_lowercase();
        let tokens = lowered.split_whitespace().collect::<Vec<_>>();
        match tokens.as_slice() {
            [group, word] => Some(BloodType {
                group: BloodGroup::parse(group)?,
                polarity: Polarity::parse(word)?,
            }),
            [single] => {
                let sign = single.chars().last()?;
                let group = &single[..single.len() - sign.len_utf8()];
                Some(BloodType {
                    group: BloodGroup::parse(group)?,
                    polarity: Polarity::parse(sign.encode_utf8(&mut [0; 4]))?,
                })
            }
            _ => None,
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.group.as_str(), self.polarity.symbol())
    }
}

/// True when a value looks like it carries a blood-type polarity.
pub fn signals_blood_type(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    if lowered.ends_with('+') || lowered.ends_with('-') {
        return true;
    }
    lowered
        .split_whitespace()
        .any(|word| POLARITY_KEYWORDS.contains(&word))
}

/// Canonical `<GROUP><SYMBOL>` for recognised values; a single token already
/// ending in a sign is echoed uppercase; anything else is returned unchanged.
pub fn normalize_value(value: &str) -> String {
    if let Some(parsed) = BloodType::parse(value) {
        return parsed.to_string();
    }
    let trimmed = value.trim();
    if !trimmed.contains(char::is_whitespace) && (trimmed.ends_with('+') || trimmed.ends_with('-'))
    {
        return trimmed.to_uppercase();
    }
    value.to_string()
}
