//! Destination country catalog.
//!
//! Descriptive metadata for the destinations offered to the user: the
//! official government portal, a flag image path and the Yahoo Finance
//! currency ticker used for the exchange-rate chart. Only the presentation
//! layer reads this; the session manager accepts any country name.

use serde::{Deserialize, Serialize};

/// Country selected when nothing else is configured.
pub const DEFAULT_COUNTRY: &str = "Italy";

/// One destination and its presentation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub government_website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_ticker: Option<String>,
}

impl Country {
    fn builtin(name: &str, website: &str, flag: &str, ticker: &str) -> Self {
        Self {
            name: name.to_string(),
            government_website: website.to_string(),
            flag_image: Some(format!("flags/{flag}.png")),
            currency_ticker: Some(ticker.to_string()),
        }
    }

    /// Quote currency of the ticker, e.g. `SEK` for `EURSEK=X`.
    pub fn quote_currency(&self) -> Option<&str> {
        let pair = self.currency_ticker.as_deref()?.split('=').next()?;
        pair.get(3..6).filter(|code| code.len() == 3)
    }
}

/// Ordered list of recognized destinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCatalog {
    countries: Vec<Country>,
}

impl Default for CountryCatalog {
    fn default() -> Self {
        let countries = vec![
            Country::builtin("United States", "https://www.usa.gov/", "us", "EURUSD=X"),
            Country::builtin("Canada", "https://www.canada.ca/", "ca", "EURCAD=X"),
            Country::builtin("United Kingdom", "https://www.gov.uk/", "gb", "EURGBP=X"),
            Country::builtin("Australia", "https://www.australia.gov.au/", "au", "EURAUD=X"),
            Country::builtin("Germany", "https://www.bundesregierung.de/", "de", "EURUSD=X"),
            Country::builtin("France", "https://www.service-public.fr/", "fr", "EURUSD=X"),
            Country::builtin("Italy", "https://www.governo.it/", "it", "EURUSD=X"),
            Country::builtin("Spain", "https://www.lamoncloa.gob.es/", "es", "EURUSD=X"),
            Country::builtin("Netherlands", "https://www.government.nl/", "nl", "EURUSD=X"),
            Country::builtin("Sweden", "https://www.government.se/", "se", "EURSEK=X"),
            Country::builtin("Norway", "https://www.regjeringen.no/", "no", "EURNOK=X"),
            Country::builtin("Denmark", "https://www.denmark.dk/", "dk", "EURDKK=X"),
            Country::builtin("Finland", "https://valtioneuvosto.fi/en", "fi", "EURUSD=X"),
            Country::builtin("Switzerland", "https://www.admin.ch/", "ch", "EURCHF=X"),
            Country::builtin("Japan", "https://www.japan.go.jp/", "jp", "EURJPY=X"),
            Country::builtin("South Korea", "http://www.korea.net/", "kr", "EURKRW=X"),
            Country::builtin("India", "https://www.india.gov.in/", "in", "EURINR=X"),
            Country::builtin("Brazil", "https://www.gov.br/", "br", "EURBRL=X"),
            Country::builtin("Mexico", "https://www.gob.mx/", "mx", "EURMXN=X"),
            Country::builtin("South Africa", "https://www.gov.za/", "za", "EURZAR=X"),
        ];
        Self { countries }
    }
}

impl CountryCatalog {
    /// Build a catalog from an explicit list (e.g. a config file).
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    /// Look a destination up by name, ignoring case and surrounding whitespace.
    pub fn get(&self, name: &str) -> Option<&Country> {
        let name = name.trim();
        self.countries
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(|c| c.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Country> {
        self.countries.iter()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}
