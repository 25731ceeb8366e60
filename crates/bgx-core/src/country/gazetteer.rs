//! Offline country lookup from place names.

use super::CountryMatch;
use crate::models::config::ExtractionConfig;
use crate::models::guarantee::CountrySource;

/// Country names and common aliases, mapped to the canonical name.
const COUNTRIES: &[(&str, &str)] = &[
    ("India", "India"),
    ("Bharat", "India"),
    ("Bangladesh", "Bangladesh"),
    ("Nepal", "Nepal"),
    ("Bhutan", "Bhutan"),
    ("Sri Lanka", "Sri Lanka"),
    ("Pakistan", "Pakistan"),
    ("Afghanistan", "Afghanistan"),
    ("Maldives", "Maldives"),
    ("Myanmar", "Myanmar"),
    ("China", "China"),
    ("Japan", "Japan"),
    ("South Korea", "South Korea"),
    ("Korea", "South Korea"),
    ("Singapore", "Singapore"),
    ("Malaysia", "Malaysia"),
    ("Indonesia", "Indonesia"),
    ("Thailand", "Thailand"),
    ("Vietnam", "Vietnam"),
    ("Philippines", "Philippines"),
    ("Hong Kong", "Hong Kong"),
    ("Australia", "Australia"),
    ("New Zealand", "New Zealand"),
    ("United Arab Emirates", "United Arab Emirates"),
    ("UAE", "United Arab Emirates"),
    ("U A E", "United Arab Emirates"),
    ("Saudi Arabia", "Saudi Arabia"),
    ("Kingdom of Saudi Arabia", "Saudi Arabia"),
    ("Qatar", "Qatar"),
    ("Oman", "Oman"),
    ("Kuwait", "Kuwait"),
    ("Bahrain", "Bahrain"),
    ("Iran", "Iran"),
    ("Iraq", "Iraq"),
    ("Israel", "Israel"),
    ("Turkey", "Turkey"),
    ("Egypt", "Egypt"),
    ("Kenya", "Kenya"),
    ("Nigeria", "Nigeria"),
    ("South Africa", "South Africa"),
    ("Tanzania", "Tanzania"),
    ("Ethiopia", "Ethiopia"),
    ("Mauritius", "Mauritius"),
    ("United Kingdom", "United Kingdom"),
    ("UK", "United Kingdom"),
    ("U K", "United Kingdom"),
    ("England", "United Kingdom"),
    ("Great Britain", "United Kingdom"),
    ("Ireland", "Ireland"),
    ("France", "France"),
    ("Germany", "Germany"),
    ("Netherlands", "Netherlands"),
    ("Belgium", "Belgium"),
    ("Luxembourg", "Luxembourg"),
    ("Switzerland", "Switzerland"),
    ("Austria", "Austria"),
    ("Italy", "Italy"),
    ("Spain", "Spain"),
    ("Portugal", "Portugal"),
    ("Poland", "Poland"),
    ("Sweden", "Sweden"),
    ("Norway", "Norway"),
    ("Denmark", "Denmark"),
    ("Finland", "Finland"),
    ("Russia", "Russia"),
    ("Ukraine", "Ukraine"),
    ("United States of America", "United States"),
    ("United States", "United States"),
    ("USA", "United States"),
    ("U S A", "United States"),
    ("Canada", "Canada"),
    ("Mexico", "Mexico"),
    ("Brazil", "Brazil"),
    ("Argentina", "Argentina"),
    ("Chile", "Chile"),
];

/// Cities and states mapped to their country.
const PLACES: &[(&str, &str)] = &[
    ("Mumbai", "India"),
    ("Bombay", "India"),
    ("Navi Mumbai", "India"),
    ("Thane", "India"),
    ("Pune", "India"),
    ("Hyderabad", "India"),
    ("Secunderabad", "India"),
    ("Delhi", "India"),
    ("New Delhi", "India"),
    ("Noida", "India"),
    ("Gurgaon", "India"),
    ("Gurugram", "India"),
    ("Goa", "India"),
    ("Chennai", "India"),
    ("Madras", "India"),
    ("Kolkata", "India"),
    ("Calcutta", "India"),
    ("Bangalore", "India"),
    ("Bengaluru", "India"),
    ("Ahmedabad", "India"),
    ("Vadodara", "India"),
    ("Surat", "India"),
    ("Jaipur", "India"),
    ("Lucknow", "India"),
    ("Kochi", "India"),
    ("Guwahati", "India"),
    ("Duliajan", "India"),
    ("Bhubaneswar", "India"),
    ("Visakhapatnam", "India"),
    ("Assam", "India"),
    ("Maharashtra", "India"),
    ("Telangana", "India"),
    ("Karnataka", "India"),
    ("Tamil Nadu", "India"),
    ("Gujarat", "India"),
    ("Kerala", "India"),
    ("West Bengal", "India"),
    ("Uttar Pradesh", "India"),
    ("Rajasthan", "India"),
    ("Odisha", "India"),
    ("Andhra Pradesh", "India"),
    ("Dhaka", "Bangladesh"),
    ("Kathmandu", "Nepal"),
    ("Colombo", "Sri Lanka"),
    ("Dubai", "United Arab Emirates"),
    ("Abu Dhabi", "United Arab Emirates"),
    ("Sharjah", "United Arab Emirates"),
    ("Riyadh", "Saudi Arabia"),
    ("Doha", "Qatar"),
    ("Muscat", "Oman"),
    ("London", "United Kingdom"),
    ("New York", "United States"),
];

struct Entry {
    tokens: Vec<String>,
    country: String,
}

impl Entry {
    fn new(name: &str, country: &str) -> Self {
        Self {
            tokens: tokenize(name),
            country: country.to_string(),
        }
    }
}

/// Lowercased alphanumeric words; punctuation and spaces separate words.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Find the entry whose mention ends furthest right.
///
/// At the same end position the entry with more words wins, so
/// `Abu Dhabi` beats a shorter name ending on `Dhabi`.
fn rightmost<'a>(words: &[String], entries: &'a [Entry]) -> Option<&'a Entry> {
    for end in (1..=words.len()).rev() {
        let prefix = &words[..end];
        let best = entries
            .iter()
            .filter(|e| !e.tokens.is_empty() && prefix.ends_with(&e.tokens))
            .max_by_key(|e| e.tokens.len());
        if best.is_some() {
            return best;
        }
    }
    None
}

/// Country gazetteer.
///
/// Explicit country names are preferred over known cities and states.
pub struct Gazetteer {
    countries: Vec<Entry>,
    places: Vec<Entry>,
}

impl Gazetteer {
    /// Create a gazetteer with the built-in tables.
    pub fn new() -> Self {
        Self {
            countries: COUNTRIES.iter().map(|(n, c)| Entry::new(n, c)).collect(),
            places: PLACES.iter().map(|(n, c)| Entry::new(n, c)).collect(),
        }
    }

    /// Built-in tables plus the configured `extra_places`.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        config
            .extra_places
            .iter()
            .fold(Self::new(), |gazetteer, (place, country)| gazetteer.with_place(place, country))
    }

    /// Add a city or state.
    pub fn with_place(mut self, place: &str, country: &str) -> Self {
        self.places.push(Entry::new(place, country));
        self
    }

    /// Look up the country of an address.
    pub fn lookup(&self, address: &str) -> Option<CountryMatch> {
        let words = tokenize(address);

        if let Some(entry) = rightmost(&words, &self.countries) {
            return Some(CountryMatch {
                country: entry.country.clone(),
                source: CountrySource::CountryName,
            });
        }

        rightmost(&words, &self.places).map(|entry| CountryMatch {
            country: entry.country.clone(),
            source: CountrySource::City,
        })
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn country(address: &str) -> Option<String> {
        Gazetteer::new().lookup(address).map(|m| m.country)
    }

    #[test]
    fn test_explicit_country_name() {
        let found = Gazetteer::new()
            .lookup("Grant House , 2nd Floor , Uppal Hyderabad 500013 India")
            .unwrap();
        assert_eq!(found.country, "India");
        assert_eq!(found.source, CountrySource::CountryName);
    }

    #[test]
    fn test_case_insensitive_and_rightmost_wins() {
        assert_eq!(country("c/o India House, London, united kingdom"), Some("United Kingdom".to_string()));
    }

    #[test]
    fn test_city_fallback() {
        let found = Gazetteer::new()
            .lookup("A207 , Eastern Business District , Bhandup W , Mumbai 400078")
            .unwrap();
        assert_eq!(found.country, "India");
        assert_eq!(found.source, CountrySource::City);
    }

    #[test]
    fn test_multi_word_names() {
        assert_eq!(country("P.O. Box 1234, Abu Dhabi"), Some("United Arab Emirates".to_string()));
        assert_eq!(country("Jebel Ali, Dubai, U.A.E."), Some("United Arab Emirates".to_string()));
        assert_eq!(country("Tamil Nadu 600001"), Some("India".to_string()));
    }

    #[test]
    fn test_word_boundaries() {
        // "Omani" and "Indiana" are not country mentions
        assert_eq!(country("Omani Trading Co, Indiana Street"), None);
    }

    #[test]
    fn test_custom_place() {
        let gazetteer = Gazetteer::new().with_place("Uppal", "India");
        assert_eq!(gazetteer.lookup("Uppal 500039").map(|m| m.country), Some("India".to_string()));
        assert_eq!(Gazetteer::new().lookup("Uppal 500039"), None);
    }

    #[test]
    fn test_places_from_config() {
        let mut config = ExtractionConfig::default();
        config.extra_places.insert("Naharkatia".to_string(), "India".to_string());

        let gazetteer = Gazetteer::from_config(&config);
        let found = gazetteer.lookup("Naharkatia 786610").unwrap();
        assert_eq!(found.country, "India");
        assert_eq!(found.source, CountrySource::City);
        assert_eq!(Gazetteer::new().lookup("Naharkatia 786610"), None);
    }
}
