//! Stage orchestration.
//!
//! Stages run in a fixed order over one table, each on the output of the
//! previous one: identifier removal, row deduplication, classification, date
//! parsing, noise removal, absolute values, countries, phones, person names
//! and finally the categorical normalizer.

use itertools::Itertools;
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    categorical::{CategoricalNormalizer, CategoricalOutcome},
    classify::{ColumnAction, ColumnClassifier, ColumnProfile, ColumnRole, Thresholds},
    config::{DatePolicy, PipelineConfig},
    correction::VocabularyCorrector,
    countries::{CountryDatabase, CountryResolver},
    data::{Cell, Table},
    dictionary::CanonicalDictionary,
    error::{CleanError, CleanResult},
    normalize::{
        self,
        country::CountryNormalizer,
        date::{self, DateOptions},
        phone::{self, PhoneFormat},
    },
};

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize)]
pub struct DateColumnReport {
    pub column: String,
    pub unparsed: usize,
}

/// What each stage did to the table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    pub input_rows: usize,
    pub output_rows: usize,
    pub identifier_columns: Vec<String>,
    pub duplicate_rows: usize,
    pub profiles: Vec<ColumnProfile>,
    pub date_columns: Vec<DateColumnReport>,
    pub date_rows_dropped: usize,
    pub noise_columns: Vec<String>,
    pub absolute_columns: Vec<String>,
    pub country_columns: Vec<String>,
    pub phone_columns: Vec<String>,
    pub name_columns: Vec<String>,
    pub categorical: Vec<CategoricalOutcome>,
}

pub struct Pipeline {
    config: PipelineConfig,
    classifier: ColumnClassifier,
    countries: Box<dyn CountryResolver>,
    categorical: CategoricalNormalizer,
}

impl Pipeline {
    /// Builds the pipeline and its resolvers. Extra vocabulary or country
    /// files that cannot be loaded make the whole run unavailable.
    pub fn new(config: PipelineConfig) -> CleanResult<Self> {
        let dictionary = CanonicalDictionary::with_extensions(&config.dictionary);
        debug!("Canonical dictionary holds {} key(s)", dictionary.len());

        let mut speller = VocabularyCorrector::builtin();
        if let Some(path) = &config.vocabulary_path {
            let added = speller.load_extra(path)?;
            info!("Loaded {added} vocabulary word(s) from {path:?}");
        }

        let mut countries = CountryDatabase::builtin();
        if let Some(path) = &config.countries_path {
            let added = countries.load_extra(path)?;
            info!("Loaded {added} country record(s) from {path:?}");
        }

        let categorical = CategoricalNormalizer::with_vocabulary(dictionary, speller);
        Ok(Self::with_services(config, Box::new(countries), categorical))
    }

    /// Builds a pipeline around caller-supplied resolver services.
    pub fn with_services(
        config: PipelineConfig,
        countries: Box<dyn CountryResolver>,
        categorical: CategoricalNormalizer,
    ) -> Self {
        let categorical = categorical
            .with_max_edit_distance(config.max_edit_distance)
            .with_sentinel(config.unknown_sentinel.clone());
        Self {
            classifier: ColumnClassifier::new(Thresholds::from(&config)),
            config,
            countries,
            categorical,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &ColumnClassifier {
        &self.classifier
    }

    pub fn categorical(&self) -> &CategoricalNormalizer {
        &self.categorical
    }

    /// Profiles as `run` would see them: identifiers judged on the raw table,
    /// every other column after identifier removal and deduplication.
    pub fn plan(&self, table: &Table) -> CleanResult<Vec<ColumnProfile>> {
        let raw = self.classifier.classify(table)?;
        let identifiers = raw
            .iter()
            .filter(|p| p.role == ColumnRole::Identifier)
            .map(|p| p.name.clone())
            .collect::<Vec<_>>();
        let mut working = table.clone();
        working.drop_columns(&identifiers);
        working.dedup_rows();
        let mut remaining = self.classifier.classify(&working)?.into_iter();
        Ok(raw
            .into_iter()
            .map(|profile| {
                if profile.role == ColumnRole::Identifier {
                    profile
                } else {
                    remaining.next().unwrap_or(profile)
                }
            })
            .collect())
    }

    /// Cleans `table` in place. On error the table may be partially rewritten
    /// and must not be emitted.
    pub fn run(&self, table: &mut Table) -> CleanResult<PipelineReport> {
        if table.row_count() == 0 {
            return Err(CleanError::EmptyTable);
        }
        let mut report = PipelineReport {
            input_rows: table.row_count(),
            ..PipelineReport::default()
        };

        report.identifier_columns = self.classifier.identifier_columns(table)?;
        if !report.identifier_columns.is_empty() {
            table.drop_columns(&report.identifier_columns);
            info!(
                "Removed identifier column(s): {}",
                report.identifier_columns.iter().join(", ")
            );
        }

        report.duplicate_rows = table.dedup_rows();
        info!("Removed {} duplicate row(s)", report.duplicate_rows);

        report.profiles = self.classifier.classify(table)?;
        let with_role = |role: ColumnRole| -> Vec<String> {
            report
                .profiles
                .iter()
                .filter(|p| p.role == role && p.action == ColumnAction::Normalize)
                .map(|p| p.name.clone())
                .collect()
        };
        let date_columns = with_role(ColumnRole::Date);
        let country_columns = with_role(ColumnRole::Country);
        let phone_columns = with_role(ColumnRole::Phone);
        let name_columns = with_role(ColumnRole::PersonName);

        self.parse_dates(table, &date_columns, &mut report)?;

        report.noise_columns = self.names_with_action(&report.profiles, ColumnAction::RemoveNoise);
        if !report.noise_columns.is_empty() {
            table.drop_columns(&report.noise_columns);
            info!(
                "Removed free-text column(s): {}",
                report.noise_columns.iter().join(", ")
            );
        }

        report.absolute_columns = self.names_with_action(&report.profiles, ColumnAction::Absolute);
        for name in &report.absolute_columns {
            if let Some(column) = table.column_mut(name) {
                normalize::absolute_column(column);
            }
        }

        let country = CountryNormalizer::new(self.countries.as_ref())
            .with_aliases(self.config.country_aliases.clone());
        for name in &country_columns {
            if let Some(column) = table.column_mut(name) {
                country.normalize_column(column);
            }
        }
        if !country_columns.is_empty() {
            info!(
                "Normalized country column(s): {} ({} distinct value(s))",
                country_columns.iter().join(", "),
                country.cache().len()
            );
        }
        report.country_columns = country_columns;

        let format = PhoneFormat {
            separator: self.config.phone_separator.clone(),
            chunk: self.config.phone_chunk,
        };
        for name in &phone_columns {
            if let Some(column) = table.column_mut(name) {
                phone::normalize_column(column, &format);
            }
        }
        report.phone_columns = phone_columns;

        for name in &name_columns {
            if let Some(column) = table.column_mut(name) {
                normalize::title_case_column(column);
            }
        }
        report.name_columns = name_columns;

        for profile in &report.profiles {
            if !is_categorical(profile) {
                continue;
            }
            if let Some(column) = table.column_mut(&profile.name) {
                let outcome = self
                    .categorical
                    .normalize_column(column, profile.role == ColumnRole::BloodType);
                report.categorical.push(outcome);
            }
        }
        if !report.categorical.is_empty() {
            info!(
                "Normalized {} categorical column(s); correction cache holds {} token(s)",
                report.categorical.len(),
                self.categorical.cache().len()
            );
        }

        if self.config.date_output_format != DEFAULT_DATE_FORMAT {
            self.format_dates(table, &report.date_columns);
        }

        report.output_rows = table.row_count();
        info!(
            "Cleaned table: {} row(s) x {} column(s) (from {} row(s))",
            report.output_rows,
            table.columns().len(),
            report.input_rows
        );
        Ok(report)
    }

    fn names_with_action(&self, profiles: &[ColumnProfile], action: ColumnAction) -> Vec<String> {
        profiles
            .iter()
            .filter(|p| p.action == action)
            .map(|p| p.name.clone())
            .collect()
    }

    fn parse_dates(
        &self,
        table: &mut Table,
        columns: &[String],
        report: &mut PipelineReport,
    ) -> CleanResult<()> {
        let options = DateOptions {
            day_first: self.config.day_first,
        };
        let mut unparsed_rows = vec![false; table.row_count()];
        for name in columns {
            let Some(column) = table.column_mut(name) else {
                continue;
            };
            let raw = column.cells.clone();
            let unparsed = date::normalize_column(column, options);
            for (row, (before, after)) in raw.iter().zip(&column.cells).enumerate() {
                if after.is_missing() {
                    unparsed_rows[row] = true;
                    if let Cell::Text(value) = before {
                        debug!(
                            "{}",
                            CleanError::UnparseableValue {
                                column: name.clone(),
                                value: value.clone(),
                            }
                        );
                    }
                }
            }
            if unparsed > 0 && self.config.on_unparseable_date == DatePolicy::Fail {
                return Err(CleanError::UnparseableDates {
                    column: name.clone(),
                    count: unparsed,
                });
            }
            info!("Parsed date column '{name}' ({unparsed} unparsed row(s))");
            report.date_columns.push(DateColumnReport {
                column: name.clone(),
                unparsed,
            });
        }

        let flagged = unparsed_rows.iter().filter(|flag| **flag).count();
        if flagged == 0 {
            return Ok(());
        }
        match self.config.on_unparseable_date {
            DatePolicy::Drop => {
                let keep = unparsed_rows.iter().map(|flag| !flag).collect::<Vec<_>>();
                table.retain_rows(&keep);
                report.date_rows_dropped = flagged;
                info!("Dropped {flagged} row(s) with unparsed dates");
            }
            DatePolicy::Keep => {
                warn!("Keeping {flagged} row(s) with unparsed dates as empty cells");
            }
            DatePolicy::Fail => {}
        }
        Ok(())
    }

    fn format_dates(&self, table: &mut Table, columns: &[DateColumnReport]) {
        for entry in columns {
            let Some(column) = table.column_mut(&entry.column) else {
                continue;
            };
            for cell in &mut column.cells {
                if let Cell::Date(value) = cell {
                    *cell = Cell::Text(value.format(&self.config.date_output_format).to_string());
                }
            }
        }
    }
}

fn is_categorical(profile: &ColumnProfile) -> bool {
    profile.action == ColumnAction::Normalize
        && matches!(
            profile.role,
            ColumnRole::Product
                | ColumnRole::Vote
                | ColumnRole::Marital
                | ColumnRole::BloodType
                | ColumnRole::Medical
                | ColumnRole::Categorical
        )
}
