//! Built-in country database and the resolver used by the country normalizer.

use std::{fs::File, io::BufReader, path::Path};

use crate::{
    correction::levenshtein,
    error::{CleanError, CleanResult},
};

/// Resolves arbitrary spellings, codes and alternative names to a canonical country name.
pub trait CountryResolver {
    fn resolve(&self, name: &str) -> CleanResult<String>;
}

#[derive(Debug, Clone, Copy)]
pub struct BuiltinCountry {
    pub name: &'static str,
    pub alpha2: &'static str,
    pub alpha3: &'static str,
    pub alternatives: &'static [&'static str],
}

const fn country(
    name: &'static str,
    alpha2: &'static str,
    alpha3: &'static str,
    alternatives: &'static [&'static str],
) -> BuiltinCountry {
    BuiltinCountry {
        name,
        alpha2,
        alpha3,
        alternatives,
    }
}

/// Informal names checked before the resolver is consulted.
pub const COLLOQUIAL_ALIASES: &[(&str, &str)] = &[
    ("america", "USA"),
    ("usa", "USA"),
    ("us", "USA"),
    ("u.s.", "USA"),
    ("u.s.a.", "USA"),
    ("amerika", "USA"),
    ("amerika serikat", "USA"),
    ("uk", "United Kingdom"),
    ("u.k.", "United Kingdom"),
    ("england", "United Kingdom"),
    ("britain", "United Kingdom"),
    ("inggris", "United Kingdom"),
    ("holland", "Netherlands"),
    ("belanda", "Netherlands"),
    ("korea", "South Korea"),
    ("korea selatan", "South Korea"),
    ("jepang", "Japan"),
    ("cina", "China"),
    ("tiongkok", "China"),
    ("arab saudi", "Saudi Arabia"),
    ("jerman", "Germany"),
    ("perancis", "France"),
    ("prancis", "France"),
];

static BUILTIN: &[BuiltinCountry] = &[
    country("Afghanistan", "AF", "AFG", &[]),
    country("Albania", "AL", "ALB", &[]),
    country("Algeria", "DZ", "DZA", &[]),
    country("Argentina", "AR", "ARG", &[]),
    country("Armenia", "AM", "ARM", &[]),
    country("Australia", "AU", "AUS", &[]),
    country("Austria", "AT", "AUT", &[]),
    country("Azerbaijan", "AZ", "AZE", &[]),
    country("Bahrain", "BH", "BHR", &[]),
    country("Bangladesh", "BD", "BGD", &[]),
    country("Belarus", "BY", "BLR", &[]),
    country("Belgium", "BE", "BEL", &[]),
    country("Bolivia", "BO", "BOL", &[]),
    country("Bosnia and Herzegovina", "BA", "BIH", &["bosnia"]),
    country("Brazil", "BR", "BRA", &["brasil"]),
    country("Brunei", "BN", "BRN", &["brunei darussalam"]),
    country("Bulgaria", "BG", "BGR", &[]),
    country("Cambodia", "KH", "KHM", &["kamboja"]),
    country("Cameroon", "CM", "CMR", &[]),
    country("Canada", "CA", "CAN", &[]),
    country("Chile", "CL", "CHL", &[]),
    country("China", "CN", "CHN", &["people's republic of china", "prc"]),
    country("Colombia", "CO", "COL", &[]),
    country("Costa Rica", "CR", "CRI", &[]),
    country("Croatia", "HR", "HRV", &[]),
    country("Cuba", "CU", "CUB", &[]),
    country("Cyprus", "CY", "CYP", &[]),
    country("Czechia", "CZ", "CZE", &["czech republic"]),
    country("Denmark", "DK", "DNK", &[]),
    country("Dominican Republic", "DO", "DOM", &[]),
    country("Ecuador", "EC", "ECU", &[]),
    country("Egypt", "EG", "EGY", &["mesir"]),
    country("Estonia", "EE", "EST", &[]),
    country("Ethiopia", "ET", "ETH", &[]),
    country("Fiji", "FJ", "FJI", &[]),
    country("Finland", "FI", "FIN", &["finlandia"]),
    country("France", "FR", "FRA", &[]),
    country("Georgia", "GE", "GEO", &[]),
    country("Germany", "DE", "DEU", &["deutschland"]),
    country("Ghana", "GH", "GHA", &[]),
    country("Greece", "GR", "GRC", &["yunani"]),
    country("Guatemala", "GT", "GTM", &[]),
    country("Hong Kong", "HK", "HKG", &[]),
    country("Hungary", "HU", "HUN", &["hongaria"]),
    country("Iceland", "IS", "ISL", &[]),
    country("India", "IN", "IND", &[]),
    country("Indonesia", "ID", "IDN", &["republic of indonesia"]),
    country("Iran", "IR", "IRN", &["islamic republic of iran"]),
    country("Iraq", "IQ", "IRQ", &["irak"]),
    country("Ireland", "IE", "IRL", &["irlandia"]),
    country("Israel", "IL", "ISR", &[]),
    country("Italy", "IT", "ITA", &["italia"]),
    country("Jamaica", "JM", "JAM", &[]),
    country("Japan", "JP", "JPN", &["nippon"]),
    country("Jordan", "JO", "JOR", &["yordania"]),
    country("Kazakhstan", "KZ", "KAZ", &[]),
    country("Kenya", "KE", "KEN", &[]),
    country("Kuwait", "KW", "KWT", &[]),
    country("Laos", "LA", "LAO", &["lao people's democratic republic"]),
    country("Latvia", "LV", "LVA", &[]),
    country("Lebanon", "LB", "LBN", &[]),
    country("Lithuania", "LT", "LTU", &[]),
    country("Luxembourg", "LU", "LUX", &[]),
    country("Malaysia", "MY", "MYS", &[]),
    country("Maldives", "MV", "MDV", &[]),
    country("Mexico", "MX", "MEX", &["meksiko"]),
    country("Mongolia", "MN", "MNG", &[]),
    country("Morocco", "MA", "MAR", &["maroko"]),
    country("Myanmar", "MM", "MMR", &["burma"]),
    country("Nepal", "NP", "NPL", &[]),
    country("Netherlands", "NL", "NLD", &["the netherlands"]),
    country("New Zealand", "NZ", "NZL", &["selandia baru"]),
    country("Nigeria", "NG", "NGA", &[]),
    country("North Korea", "KP", "PRK", &["democratic people's republic of korea"]),
    country("Norway", "NO", "NOR", &["norwegia"]),
    country("Oman", "OM", "OMN", &[]),
    country("Pakistan", "PK", "PAK", &[]),
    country("Palestine", "PS", "PSE", &["palestina"]),
    country("Panama", "PA", "PAN", &[]),
    country("Papua New Guinea", "PG", "PNG", &["papua nugini"]),
    country("Peru", "PE", "PER", &[]),
    country("Philippines", "PH", "PHL", &["filipina"]),
    country("Poland", "PL", "POL", &["polandia"]),
    country("Portugal", "PT", "PRT", &[]),
    country("Qatar", "QA", "QAT", &[]),
    country("Romania", "RO", "ROU", &[]),
    country("Russia", "RU", "RUS", &["russian federation", "rusia"]),
    country("Saudi Arabia", "SA", "SAU", &[]),
    country("Serbia", "RS", "SRB", &[]),
    country("Singapore", "SG", "SGP", &["singapura"]),
    country("Slovakia", "SK", "SVK", &[]),
    country("Slovenia", "SI", "SVN", &[]),
    country("South Africa", "ZA", "ZAF", &["afrika selatan"]),
    country("South Korea", "KR", "KOR", &["republic of korea"]),
    country("Spain", "ES", "ESP", &["spanyol", "espana"]),
    country("Sri Lanka", "LK", "LKA", &[]),
    country("Sweden", "SE", "SWE", &["swedia"]),
    country("Switzerland", "CH", "CHE", &["swiss"]),
    country("Syria", "SY", "SYR", &["suriah"]),
    country("Taiwan", "TW", "TWN", &[]),
    country("Tanzania", "TZ", "TZA", &[]),
    country("Thailand", "TH", "THA", &["siam"]),
    country("Timor-Leste", "TL", "TLS", &["east timor", "timor leste"]),
    country("Tunisia", "TN", "TUN", &[]),
    country("Turkey", "TR", "TUR", &["turkiye", "turki"]),
    country("Uganda", "UG", "UGA", &[]),
    country("Ukraine", "UA", "UKR", &["ukraina"]),
    country("United Arab Emirates", "AE", "ARE", &["uae", "uni emirat arab"]),
    country("United Kingdom", "GB", "GBR", &["great britain"]),
    country("United States", "US", "USA", &["united states of america"]),
    country("Uruguay", "UY", "URY", &[]),
    country("Uzbekistan", "UZ", "UZB", &[]),
    country("Venezuela", "VE", "VEN", &[]),
    country("Vietnam", "VN", "VNM", &["viet nam"]),
    country("Yemen", "YE", "YEM", &["yaman"]),
    country("Zambia", "ZM", "ZMB", &[]),
    country("Zimbabwe", "ZW", "ZWE", &[]),
];

pub fn builtin() -> &'static [BuiltinCountry] {
    BUILTIN
}

#[derive(Debug, Clone)]
struct CountryRecord {
    name: String,
    /// Lowercase name, codes and alternatives.
    keys: Vec<String>,
}

/// In-process country table with exact, prefix and edit-distance matching.
#[derive(Debug, Clone)]
pub struct CountryDatabase {
    records: Vec<CountryRecord>,
}

impl Default for CountryDatabase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CountryDatabase {
    pub fn builtin() -> Self {
        let records = BUILTIN
            .iter()
            .map(|c| {
                let mut keys = vec![
                    c.name.to_lowercase(),
                    c.alpha2.to_lowercase(),
                    c.alpha3.to_lowercase(),
                ];
                keys.extend(c.alternatives.iter().map(|alt| alt.to_lowercase()));
                CountryRecord {
                    name: c.name.to_string(),
                    keys,
                }
            })
            .collect();
        Self { records }
    }

    /// Adds countries from a headerless CSV of `name,alpha2,alpha3[,alternative...]`.
    pub fn load_extra(&mut self, path: &Path) -> CleanResult<usize> {
        let unavailable =
            |err: &dyn std::fmt::Display| CleanError::ResolverUnavailable(format!("{path:?}: {err}"));
        let file = File::open(path).map_err(|err| unavailable(&err))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(BufReader::new(file));
        let mut added = 0;
        for record in reader.records() {
            let record = record.map_err(|err| unavailable(&err))?;
            let Some(name) = record.get(0).map(str::trim).filter(|n| !n.is_empty()) else {
                continue;
            };
            let keys = record
                .iter()
                .map(|field| field.trim().to_lowercase())
                .filter(|field| !field.is_empty())
                .collect();
            self.records.push(CountryRecord {
                name: name.to_string(),
                keys,
            });
            added += 1;
        }
        Ok(added)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CountryResolver for CountryDatabase {
    fn resolve(&self, name: &str) -> CleanResult<String> {
        let key = name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        if key.is_empty() {
            return Err(CleanError::CountryNotFound(name.to_string()));
        }

        if let Some(record) = self.records.iter().find(|r| r.keys.contains(&key)) {
            return Ok(record.name.clone());
        }

        // "republic of indonesia" contains "indonesia"; longest contained name wins.
        let contained = self
            .records
            .iter()
            .filter(|r| {
                let own = &r.keys[0];
                own.len() >= 4
                    && key
                        .split(|c: char| !c.is_alphanumeric())
                        .collect::<Vec<_>>()
                        .windows(own.split(' ').count())
                        .any(|window| window.join(" ") == *own)
            })
            .max_by_key(|r| r.keys[0].len());
        if let Some(record) = contained {
            return Ok(record.name.clone());
        }

        if key.len() >= 4 {
            let mut prefixed = self.records.iter().filter(|r| r.keys[0].starts_with(&key));
            if let (Some(record), None) = (prefixed.next(), prefixed.next()) {
                return Ok(record.name.clone());
            }
        }

        let budget = (key.chars().count() / 4).max(1);
        self.records
            .iter()
            .flat_map(|r| r.keys.iter().map(move |k| (r, k)))
            .filter(|(_, k)| k.len() > 3)
            .map(|(r, k)| (levenshtein(&key, k), r))
            .filter(|(distance, _)| *distance <= budget)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, r)| r.name.clone())
            .ok_or_else(|| CleanError::CountryNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_names_and_codes() {
        let db = CountryDatabase::builtin();
        assert_eq!(db.resolve("Indonesia").unwrap(), "Indonesia");
        assert_eq!(db.resolve("IDN").unwrap(), "Indonesia");
        assert_eq!(db.resolve("jp").unwrap(), "Japan");
        assert_eq!(db.resolve("Viet  Nam").unwrap(), "Vietnam");
    }

    #[test]
    fn resolves_misspellings_and_long_forms() {
        let db = CountryDatabase::builtin();
        assert_eq!(db.resolve("malaysa").unwrap(), "Malaysia");
        assert_eq!(db.resolve("singapure").unwrap(), "Singapore");
        assert_eq!(db.resolve("Kingdom of Thailand").unwrap(), "Thailand");
        assert_eq!(db.resolve("Phillipines").unwrap(), "Philippines");
    }

    #[test]
    fn unknown_names_are_not_found() {
        let db = CountryDatabase::builtin();
        assert!(matches!(
            db.resolve("atlantis"),
            Err(CleanError::CountryNotFound(_))
        ));
        assert!(db.resolve("   ").is_err());
    }

    #[test]
    fn extra_countries_load_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra.csv");
        std::fs::write(&path, "Wakanda,WK,WAK,birnin zana\n").unwrap();
        let mut db = CountryDatabase::builtin();
        assert_eq!(db.load_extra(&path).unwrap(), 1);
        assert_eq!(db.resolve("wak").unwrap(), "Wakanda");
        assert_eq!(db.resolve("Birnin Zana").unwrap(), "Wakanda");
    }

    #[test]
    fn missing_extra_file_is_resolver_unavailable() {
        let mut db = CountryDatabase::builtin();
        let err = db.load_extra(Path::new("/nonexistent/countries.csv")).unwrap_err();
        assert!(matches!(err, CleanError::ResolverUnavailable(_)));
    }
}
