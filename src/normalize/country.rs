//! Country column normalization.

use std::collections::HashMap;

use log::{debug, warn};

use crate::{
    correction::CorrectionCache,
    countries::{COLLOQUIAL_ALIASES, CountryResolver},
    data::{Cell, Column},
    normalize::text::{lowercase, squash_whitespace},
};

/// Alias lookup first, then the resolver; results memoized per distinct input.
pub struct CountryNormalizer<'a> {
    resolver: &'a dyn CountryResolver,
    aliases: HashMap<String, String>,
    cache: CorrectionCache,
}

impl<'a> CountryNormalizer<'a> {
    pub fn new(resolver: &'a dyn CountryResolver) -> Self {
        let aliases = COLLOQUIAL_ALIASES
            .iter()
            .map(|(alias, name)| (alias.to_string(), name.to_string()))
            .collect();
        Self {
            resolver,
            aliases,
            cache: CorrectionCache::new(),
        }
    }

    pub fn with_aliases<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (alias, name) in extra {
            self.aliases.insert(alias.trim().to_lowercase(), name);
        }
        self
    }

    /// Canonical name for `raw`; unresolvable values come back unchanged.
    pub fn normalize_value(&self, raw: &str) -> String {
        self.cache.get_or_compute(raw, || {
            let key = lowercase(squash_whitespace(raw).as_ref()).into_owned();
            if let Some(alias) = self.aliases.get(&key) {
                return alias.clone();
            }
            match self.resolver.resolve(&key) {
                Ok(name) => name,
                Err(err) => {
                    warn!("{err}; keeping '{raw}'");
                    raw.to_string()
                }
            }
        })
    }

    pub fn normalize_column(&self, column: &mut Column) {
        for cell in &mut column.cells {
            if let Cell::Text(raw) = cell {
                *raw = self.normalize_value(raw);
            }
        }
        debug!(
            "Country column '{}' normalized ({} distinct input(s) resolved)",
            column.name,
            self.cache.len()
        );
    }

    pub fn cache(&self) -> &CorrectionCache {
        &self.cache
    }
}
