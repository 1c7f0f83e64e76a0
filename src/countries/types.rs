use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Common and official names, plus native-language variants keyed by language code.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CountryName {
    pub common: String,
    pub official: String,
    #[serde(rename = "nativeName", default)]
    pub native_name: BTreeMap<String, NativeName>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NativeName {
    pub official: String,
    pub common: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Currency {
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Flags {
    #[serde(default)]
    pub png: String,
    #[serde(default)]
    pub svg: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// A country as served by the remote API. Never mutated locally.
///
/// Optional collections (capital, currencies, languages, continents) are
/// absent for some territories (e.g. Antarctica has no capital), so they
/// default to empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CountryRecord {
    pub name: CountryName,
    pub cca3: String,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: String,
    #[serde(default)]
    pub currencies: BTreeMap<String, Currency>,
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub continents: Vec<String>,
    #[serde(default)]
    pub flags: Flags,
}

impl CountryRecord {
    /// The country's stable 3-letter code.
    pub fn code(&self) -> &str {
        &self.cca3
    }

    /// Capitals joined for display, or "-" when there are none.
    pub fn capital_label(&self) -> String {
        if self.capital.is_empty() {
            "-".to_string()
        } else {
            self.capital.join(", ")
        }
    }

    pub fn currency_labels(&self) -> Vec<String> {
        self.currencies
            .values()
            .map(|c| {
                if c.symbol.is_empty() {
                    c.name.clone()
                } else {
                    format!("{} ({})", c.name, c.symbol)
                }
            })
            .collect()
    }

    pub fn language_labels(&self) -> Vec<String> {
        self.languages.values().cloned().collect()
    }
}

/// Formats a population with thousands separators: 214326223 → "214,326,223".
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRAZIL: &str = r#"{
        "name": {
            "common": "Brazil",
            "official": "Federative Republic of Brazil",
            "nativeName": {"por": {"official": "República Federativa do Brasil", "common": "Brasil"}}
        },
        "cca3": "BRA",
        "capital": ["Brasília"],
        "region": "Americas",
        "subregion": "South America",
        "currencies": {"BRL": {"name": "Brazilian real", "symbol": "R$"}},
        "languages": {"por": "Portuguese"},
        "population": 212559409,
        "continents": ["South America"],
        "flags": {"png": "https://flagcdn.com/w320/br.png", "svg": "https://flagcdn.com/br.svg", "alt": "A green field"}
    }"#;

    #[test]
    fn test_deserialize_full_record() {
        let record: CountryRecord = serde_json::from_str(BRAZIL).unwrap();
        assert_eq!(record.code(), "BRA");
        assert_eq!(record.name.common, "Brazil");
        assert_eq!(record.name.native_name["por"].common, "Brasil");
        assert_eq!(record.capital_label(), "Brasília");
        assert_eq!(record.currency_labels(), vec!["Brazilian real (R$)"]);
        assert_eq!(record.language_labels(), vec!["Portuguese"]);
        assert_eq!(record.population, 212_559_409);
        assert_eq!(record.flags.alt.as_deref(), Some("A green field"));
    }

    #[test]
    fn test_deserialize_sparse_record() {
        // Antarctica ships without capital, currencies, languages or subregion
        let json = r#"{
            "name": {"common": "Antarctica", "official": "Antarctica"},
            "cca3": "ATA",
            "region": "Antarctic",
            "population": 1000,
            "flags": {"png": "a.png", "svg": "a.svg"}
        }"#;
        let record: CountryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.capital_label(), "-");
        assert!(record.currencies.is_empty());
        assert!(record.languages.is_empty());
        assert!(record.subregion.is_empty());
        assert!(record.flags.alt.is_none());
    }

    #[test]
    fn test_currency_without_symbol() {
        let mut record = CountryRecord::default();
        record.currencies.insert(
            "XXX".into(),
            Currency {
                name: "Token".into(),
                symbol: String::new(),
            },
        );
        assert_eq!(record.currency_labels(), vec!["Token"]);
    }

    #[test]
    fn test_format_population() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1000), "1,000");
        assert_eq!(format_population(212559409), "212,559,409");
    }
}
