//! Column-role inference.
//!
//! Name patterns propose roles; cardinality confirms the gated ones
//! (identifier, person name, phone). Columns left without a typed role are
//! categorical when they hold text, and are flagged for removal when they
//! look like free text.

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::{
    cardinality,
    config::PipelineConfig,
    data::{Column, ColumnKind, Table},
    error::{CleanError, CleanResult},
    patterns,
};

/// Semantic role of a column. Variant order is the tie-break precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Identifier,
    PersonName,
    Date,
    Country,
    Phone,
    Product,
    Vote,
    Marital,
    BloodType,
    Medical,
    Categorical,
    Unclassified,
}

impl ColumnRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnRole::Identifier => "identifier",
            ColumnRole::PersonName => "person_name",
            ColumnRole::Date => "date",
            ColumnRole::Country => "country",
            ColumnRole::Phone => "phone",
            ColumnRole::Product => "product",
            ColumnRole::Vote => "vote",
            ColumnRole::Marital => "marital",
            ColumnRole::BloodType => "blood_type",
            ColumnRole::Medical => "medical",
            ColumnRole::Categorical => "categorical",
            ColumnRole::Unclassified => "unclassified",
        }
    }

    /// Roles other than the categorical/unclassified fallbacks.
    pub fn is_typed(self) -> bool {
        !matches!(self, ColumnRole::Categorical | ColumnRole::Unclassified)
    }

    fn accepts(self, kind: ColumnKind) -> bool {
        match self {
            ColumnRole::Identifier | ColumnRole::Date | ColumnRole::Phone => true,
            _ => kind == ColumnKind::Text,
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnAction {
    RemoveIdentifier,
    RemoveNoise,
    Absolute,
    Normalize,
    Untouched,
}

impl ColumnAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnAction::RemoveIdentifier => "remove (identifier)",
            ColumnAction::RemoveNoise => "remove (free text)",
            ColumnAction::Absolute => "absolute value",
            ColumnAction::Normalize => "normalize",
            ColumnAction::Untouched => "untouched",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub distinct: usize,
    pub ratio: f64,
    pub name_matches: Vec<ColumnRole>,
    pub role: ColumnRole,
    pub action: ColumnAction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub identifier_ratio: f64,
    pub name_ratio: f64,
    pub phone_ratio: f64,
    pub noise_ratio: f64,
    pub noise_max_distinct: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for Thresholds {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            identifier_ratio: config.identifier_ratio,
            name_ratio: config.name_ratio,
            phone_ratio: config.phone_ratio,
            noise_ratio: config.noise_ratio,
            noise_max_distinct: config.noise_max_distinct,
        }
    }
}

impl Thresholds {
    fn gate(&self, role: ColumnRole) -> Option<f64> {
        match role {
            ColumnRole::Identifier => Some(self.identifier_ratio),
            ColumnRole::PersonName => Some(self.name_ratio),
            ColumnRole::Phone => Some(self.phone_ratio),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ColumnClassifier {
    thresholds: Thresholds,
}

impl ColumnClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn profile(&self, column: &Column) -> CleanResult<ColumnProfile> {
        let ratio = cardinality::ratio(column)?;
        let distinct = cardinality::distinct_count(column);
        let kind = column.kind();
        let name_matches = patterns::classify_name(&column.name)
            .into_iter()
            .collect::<Vec<_>>();

        let confirmed = if kind == ColumnKind::Empty {
            None
        } else {
            name_matches.iter().copied().find(|role| {
                role.accepts(kind)
                    && self
                        .thresholds
                        .gate(*role)
                        .is_none_or(|threshold| ratio >= threshold)
            })
        };
        let role = confirmed.unwrap_or(match kind {
            ColumnKind::Text => ColumnRole::Categorical,
            _ => ColumnRole::Unclassified,
        });

        let action = match role {
            ColumnRole::Identifier => ColumnAction::RemoveIdentifier,
            ColumnRole::Categorical
                if ratio >= self.thresholds.noise_ratio
                    || distinct > self.thresholds.noise_max_distinct =>
            {
                ColumnAction::RemoveNoise
            }
            ColumnRole::Unclassified if kind == ColumnKind::Numeric => ColumnAction::Absolute,
            ColumnRole::Unclassified => ColumnAction::Untouched,
            _ => ColumnAction::Normalize,
        };

        debug!(
            "Column '{}': kind={} distinct={} ratio={:.3} matches={:?} -> {} ({})",
            column.name,
            kind.as_str(),
            distinct,
            ratio,
            name_matches,
            role,
            action.as_str()
        );

        Ok(ColumnProfile {
            name: column.name.clone(),
            kind,
            distinct,
            ratio,
            name_matches,
            role,
            action,
        })
    }

    /// Profiles every column of a non-empty table.
    pub fn classify(&self, table: &Table) -> CleanResult<Vec<ColumnProfile>> {
        if table.columns().is_empty() {
            return Ok(Vec::new());
        }
        if table.row_count() == 0 {
            return Err(CleanError::EmptyTable);
        }
        table.columns().iter().map(|c| self.profile(c)).collect()
    }

    /// Names of columns confirmed as identifiers.
    pub fn identifier_columns(&self, table: &Table) -> CleanResult<Vec<String>> {
        Ok(self
            .classify(table)?
            .into_iter()
            .filter(|p| p.role == ColumnRole::Identifier)
            .map(|p| p.name)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Cell;

    fn text_column(name: &str, values: &[&str]) -> Column {
        Column::new(name, values.iter().map(|v| Cell::from_raw(v)).collect())
    }

    #[test]
    fn unique_id_column_is_removed() {
        let classifier = ColumnClassifier::default();
        let profile = classifier
            .profile(&text_column("customer_id", &["1", "2", "3", "4"]))
            .unwrap();
        assert_eq!(profile.role, ColumnRole::Identifier);
        assert_eq!(profile.action, ColumnAction::RemoveIdentifier);
    }

    #[test]
    fn low_cardinality_id_falls_through_to_next_role() {
        let classifier = ColumnClassifier::default();
        let profile = classifier
            .profile(&text_column("country_id", &["ID", "ID", "MY", "ID"]))
            .unwrap();
        assert_eq!(
            profile.name_matches,
            vec![ColumnRole::Identifier, ColumnRole::Country]
        );
        assert_eq!(profile.role, ColumnRole::Country);
    }

    #[test]
    fn repeated_names_are_not_person_names() {
        let classifier = ColumnClassifier::default();
        let profile = classifier
            .profile(&text_column(
                "product_name",
                &["soap", "soap", "rice", "soap", "rice"],
            ))
            .unwrap();
        assert_eq!(profile.role, ColumnRole::Product);
        assert_eq!(profile.action, ColumnAction::Normalize);
    }

    #[test]
    fn free_text_is_flagged_as_noise() {
        let classifier = ColumnClassifier::default();
        let profile = classifier
            .profile(&text_column(
                "comments",
                &["great", "slow delivery", "ok", "would buy again"],
            ))
            .unwrap();
        assert_eq!(profile.role, ColumnRole::Categorical);
        assert_eq!(profile.action, ColumnAction::RemoveNoise);
    }

    #[test]
    fn more_than_max_distinct_is_noise() {
        let classifier = ColumnClassifier::new(Thresholds {
            noise_ratio: 1.0,
            noise_max_distinct: 2,
            ..Thresholds::default()
        });
        let profile = classifier
            .profile(&text_column("note", &["a", "b", "c", "a", "b", "c", "a"]))
            .unwrap();
        assert_eq!(profile.action, ColumnAction::RemoveNoise);
    }

    #[test]
    fn typed_roles_are_exempt_from_noise() {
        let classifier = ColumnClassifier::default();
        let profile = classifier
            .profile(&text_column("Name", &["alice", "bob", "carol"]))
            .unwrap();
        assert_eq!(profile.role, ColumnRole::PersonName);
        assert_eq!(profile.action, ColumnAction::Normalize);
    }

    #[test]
    fn numeric_columns_get_absolute_value() {
        let classifier = ColumnClassifier::default();
        let profile = classifier
            .profile(&text_column("amount", &["-1", "2", "2", "-1"]))
            .unwrap();
        assert_eq!(profile.kind, ColumnKind::Numeric);
        assert_eq!(profile.role, ColumnRole::Unclassified);
        assert_eq!(profile.action, ColumnAction::Absolute);
    }

    #[test]
    fn name_only_roles_require_text() {
        let classifier = ColumnClassifier::default();
        let profile = classifier
            .profile(&text_column("vote", &["1", "0", "1", "1"]))
            .unwrap();
        assert_eq!(profile.role, ColumnRole::Unclassified);
    }

    #[test]
    fn empty_table_is_an_error() {
        let table = Table::new(vec![Column::new("a", Vec::new())]).unwrap();
        let classifier = ColumnClassifier::default();
        assert!(matches!(
            classifier.classify(&table),
            Err(CleanError::EmptyTable)
        ));
    }
}
