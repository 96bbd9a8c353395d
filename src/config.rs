//! Pipeline configuration.
//!
//! Every tunable is resolved before the run starts: defaults, then an optional
//! YAML file, then CLI overrides. Nothing is asked of the operator mid-run.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, ensure};
use chrono::format::{Item, StrftimeItems};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::dictionary::Domain;

/// What to do with rows whose date column could not be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum DatePolicy {
    #[default]
    Drop,
    Keep,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Minimum cardinality ratio for an identifier-named column to be removed.
    pub identifier_ratio: f64,
    pub name_ratio: f64,
    pub phone_ratio: f64,
    /// Untyped text columns at or above this ratio are dropped as free text.
    pub noise_ratio: f64,
    /// Untyped text columns with more distinct values than this are dropped.
    pub noise_max_distinct: usize,
    pub on_unparseable_date: DatePolicy,
    /// Read ambiguous `a/b/yyyy` dates as day/month.
    pub day_first: bool,
    pub date_output_format: String,
    pub phone_separator: String,
    pub phone_chunk: usize,
    pub max_edit_distance: usize,
    pub unknown_sentinel: String,
    /// Extra canonical entries per domain, lowercase token → display value.
    pub dictionary: BTreeMap<Domain, BTreeMap<String, String>>,
    pub country_aliases: BTreeMap<String, String>,
    /// Word list for the spelling corrector: `word [frequency]` per line.
    pub vocabulary_path: Option<PathBuf>,
    /// Extra countries as CSV rows of `name,alpha2,alpha3`.
    pub countries_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            identifier_ratio: 0.7,
            name_ratio: 0.7,
            phone_ratio: 0.7,
            noise_ratio: 0.6,
            noise_max_distinct: 100,
            on_unparseable_date: DatePolicy::Drop,
            day_first: false,
            date_output_format: "%Y-%m-%d".to_string(),
            phone_separator: "-".to_string(),
            phone_chunk: 3,
            max_edit_distance: 4,
            unknown_sentinel: "Unknown".to_string(),
            dictionary: BTreeMap::new(),
            country_aliases: BTreeMap::new(),
            vocabulary_path: None,
            countries_path: None,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("Reading config file {path:?}"))?;
        let mut config: PipelineConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("Parsing config file {path:?}"))?;
        // Relative data paths are resolved against the config file's directory.
        if let Some(base) = path.parent() {
            for data_path in [&mut config.vocabulary_path, &mut config.countries_path]
                .into_iter()
                .flatten()
            {
                if data_path.is_relative() {
                    *data_path = base.join(&*data_path);
                }
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("identifier_ratio", self.identifier_ratio),
            ("name_ratio", self.name_ratio),
            ("phone_ratio", self.phone_ratio),
            ("noise_ratio", self.noise_ratio),
        ] {
            ensure!(
                (0.0..=1.0).contains(&value),
                "{label} must be within [0, 1], got {value}"
            );
        }
        ensure!(self.phone_chunk > 0, "phone_chunk must be greater than zero");
        ensure!(
            !StrftimeItems::new(&self.date_output_format).any(|item| matches!(item, Item::Error)),
            "date_output_format '{}' is not a valid strftime format",
            self.date_output_format
        );
        ensure!(
            !self.unknown_sentinel.trim().is_empty(),
            "unknown_sentinel must not be blank"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn yaml_overrides_only_given_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cleaner.yaml");
        fs::write(
            &path,
            "noise_ratio: 0.9\non_unparseable_date: keep\nvocabulary_path: words.txt\n\
             dictionary:\n  gender:\n    cowok: Male\n",
        )
        .unwrap();
        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.noise_ratio, 0.9);
        assert_eq!(config.on_unparseable_date, DatePolicy::Keep);
        assert_eq!(config.identifier_ratio, 0.7);
        assert_eq!(config.vocabulary_path, Some(dir.path().join("words.txt")));
        assert_eq!(config.dictionary[&Domain::Gender]["cowok"], "Male");
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        let config = PipelineConfig {
            noise_ratio: 1.5,
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cleaner.yaml");
        fs::write(&path, "noise_ratoi: 0.9\n").unwrap();
        assert!(PipelineConfig::load(&path).is_err());
    }

    #[test]
    fn invalid_date_format_is_rejected() {
        let config = PipelineConfig {
            date_output_format: "%Y-%Q".to_string(),
            ..PipelineConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(PipelineConfig::default().validate().is_ok());
    }
}
