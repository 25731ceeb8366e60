//! Country resolution from addresses.
//!
//! Guarantees often name the parties' addresses without a `... Country:`
//! label. The gazetteer answers offline from country, city and state names;
//! with the `geocode` feature the OpenCage API can be asked as well.

mod gazetteer;
#[cfg(feature = "geocode")]
mod geocoder;

pub use gazetteer::Gazetteer;
#[cfg(feature = "geocode")]
pub use geocoder::OpenCageGeocoder;

use tracing::debug;

use crate::guarantee::rules::patterns::POSTAL_CODE;
use crate::models::guarantee::{CountrySource, GuaranteeRecord, ResolvedCountries, ResolvedCountry};

/// A country found in an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryMatch {
    pub country: String,
    pub source: CountrySource,
}

/// First 5 or 6 digit word in the address (Indian PIN codes are 6 digits).
pub fn find_postal_code(address: &str) -> Option<&str> {
    POSTAL_CODE
        .captures(address)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn first_resolved(addresses: Option<&Vec<String>>, gazetteer: &Gazetteer) -> Option<ResolvedCountry> {
    addresses?.iter().find_map(|address| {
        gazetteer.lookup(address).map(|m| ResolvedCountry {
            country: m.country,
            source: m.source,
            address: address.clone(),
        })
    })
}

/// Resolve countries for parties whose country label is missing.
///
/// Labelled countries are left alone; the first address that resolves wins.
pub fn resolve_countries(record: &GuaranteeRecord, gazetteer: &Gazetteer) -> ResolvedCountries {
    let mut resolved = ResolvedCountries::default();

    if record.beneficiary_countries.is_none() {
        resolved.beneficiary = first_resolved(record.beneficiary_addresses.as_ref(), gazetteer);
    }
    if record.applicant_countries.is_none() {
        resolved.applicant = first_resolved(record.applicant_addresses.as_ref(), gazetteer);
    }

    debug!(
        "Resolved countries: beneficiary={:?}, applicant={:?}",
        resolved.beneficiary.as_ref().map(|r| &r.country),
        resolved.applicant.as_ref().map(|r| &r.country)
    );

    resolved
}

#[cfg(feature = "geocode")]
async fn first_geocoded(
    addresses: Option<&Vec<String>>,
    geocoder: &OpenCageGeocoder,
) -> Result<Option<ResolvedCountry>, crate::error::GeocodeError> {
    for address in addresses.into_iter().flatten() {
        if let Some(country) = geocoder.resolve(address).await? {
            return Ok(Some(ResolvedCountry {
                country,
                source: CountrySource::Geocoder,
                address: address.clone(),
            }));
        }
    }
    Ok(None)
}

/// Ask the geocoder for parties that neither a label nor the gazetteer resolved.
#[cfg(feature = "geocode")]
pub async fn resolve_countries_online(
    record: &GuaranteeRecord,
    resolved: &mut ResolvedCountries,
    geocoder: &OpenCageGeocoder,
) -> Result<(), crate::error::GeocodeError> {
    if record.beneficiary_countries.is_none() && resolved.beneficiary.is_none() {
        resolved.beneficiary = first_geocoded(record.beneficiary_addresses.as_ref(), geocoder).await?;
    }
    if record.applicant_countries.is_none() && resolved.applicant.is_none() {
        resolved.applicant = first_geocoded(record.applicant_addresses.as_ref(), geocoder).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_postal_code() {
        assert_eq!(find_postal_code("Bhandup W , Mumbai 400078"), Some("400078"));
        assert_eq!(find_postal_code("Zip 10115 Berlin"), Some("10115"));
        assert_eq!(find_postal_code("Plot 12, Phone 9876543210"), None);
        assert_eq!(find_postal_code("no digits"), None);
    }

    #[test]
    fn test_offline_resolution() {
        let gazetteer = Gazetteer::new();
        let found = gazetteer.lookup("8 Shroff Chambers, Girgaon, M.G. Road, Mumbai-400092, India").unwrap();
        assert_eq!(found.country, "India");
        assert_eq!(found.source, CountrySource::CountryName);
        assert!(gazetteer.lookup("Somewhere 12").is_none());
    }

    #[test]
    fn test_resolve_fills_only_missing_labels() {
        let record = GuaranteeRecord {
            beneficiary_countries: Some(vec!["India".to_string()]),
            beneficiary_addresses: Some(vec!["London".to_string()]),
            applicant_addresses: Some(vec![
                "Plot 7 Industrial Area".to_string(),
                "Grant House , Uppal Hyderabad 500013".to_string(),
            ]),
            ..GuaranteeRecord::default()
        };

        let resolved = resolve_countries(&record, &Gazetteer::new());
        assert!(resolved.beneficiary.is_none());

        let applicant = resolved.applicant.unwrap();
        assert_eq!(applicant.country, "India");
        assert_eq!(applicant.source, CountrySource::City);
        assert_eq!(applicant.address, "Grant House , Uppal Hyderabad 500013");
    }
}
