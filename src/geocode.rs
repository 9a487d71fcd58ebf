use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::areas;

pub const ADDRESS_NOT_FOUND: &str = "Address not found.";
pub const ADDRESS_UNAVAILABLE: &str = "Could not fetch address.";

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!("civic-reporter/", env!("CARGO_PKG_VERSION"));

/// Nominatim `/reverse` response, reduced to what the report form uses.
#[derive(Debug, Deserialize)]
pub struct NominatimReverse {
    pub display_name: Option<String>,
    pub address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NominatimAddress {
    pub suburb: Option<String>,
    pub neighbourhood: Option<String>,
    pub city_district: Option<String>,
}

impl NominatimAddress {
    /// Most specific locality name, suburb first.
    pub fn locality(&self) -> Option<&str> {
        self.suburb
            .as_deref()
            .or(self.neighbourhood.as_deref())
            .or(self.city_district.as_deref())
    }
}

/// Outcome of a reverse lookup. Failures are folded into `address` as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressLookup {
    pub address: String,
    /// Gazetteer area the position falls in, when Nominatim names one we know.
    pub area: Option<String>,
}

impl AddressLookup {
    pub fn unavailable() -> Self {
        AddressLookup {
            address: ADDRESS_UNAVAILABLE.to_string(),
            area: None,
        }
    }

    pub fn from_response(response: NominatimReverse) -> Self {
        let Some(display_name) = response.display_name else {
            return AddressLookup {
                address: ADDRESS_NOT_FOUND.to_string(),
                area: None,
            };
        };

        // A reply without an address object is treated like a failed fetch.
        let Some(address) = response.address else {
            return AddressLookup::unavailable();
        };

        let area = address
            .locality()
            .filter(|name| areas::is_known(name))
            .map(str::to_string);

        AddressLookup {
            address: display_name,
            area,
        }
    }

    pub fn is_found(&self) -> bool {
        self.address != ADDRESS_NOT_FOUND && self.address != ADDRESS_UNAVAILABLE
    }
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        GeocoderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct ReverseGeocoder {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ReverseGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ReverseGeocoder {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn reverse_url(&self, lat: f64, lng: f64) -> String {
        format!("{}/reverse?format=json&lat={}&lon={}", self.base_url, lat, lng)
    }

    /// Single best-effort lookup. Never retried and never an error.
    pub fn lookup(&self, lat: f64, lng: f64) -> AddressLookup {
        match self.fetch(lat, lng) {
            Ok(response) => AddressLookup::from_response(response),
            Err(e) => {
                tracing::warn!(lat, lng, error = %e, "reverse geocoding failed");
                AddressLookup::unavailable()
            }
        }
    }

    fn fetch(&self, lat: f64, lng: f64) -> Result<NominatimReverse> {
        let url = self.reverse_url(lat, lng);
        tracing::debug!(%url, "reverse geocoding");

        let response = self
            .client
            .get(&url)
            .send()
            .context("Nominatim request failed")?;
        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Nominatim returned non-success status");
        }
        response
            .json::<NominatimReverse>()
            .context("Failed to parse Nominatim response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> NominatimReverse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_found_with_known_suburb() {
        let lookup = AddressLookup::from_response(parse(
            r#"{"display_name": "Siripuram, Visakhapatnam, Andhra Pradesh, India",
                "address": {"suburb": "Siripuram", "city": "Visakhapatnam"}}"#,
        ));
        assert_eq!(lookup.address, "Siripuram, Visakhapatnam, Andhra Pradesh, India");
        assert_eq!(lookup.area.as_deref(), Some("Siripuram"));
        assert!(lookup.is_found());
    }

    #[test]
    fn test_unknown_locality_leaves_area_empty() {
        let lookup = AddressLookup::from_response(parse(
            r#"{"display_name": "Somewhere", "address": {"suburb": "Elsewhere"}}"#,
        ));
        assert_eq!(lookup.address, "Somewhere");
        assert!(lookup.area.is_none());
    }

    #[test]
    fn test_suburb_takes_precedence() {
        let addr = NominatimAddress {
            suburb: Some("Gajuwaka".to_string()),
            neighbourhood: Some("Allipuram".to_string()),
            city_district: None,
        };
        assert_eq!(addr.locality(), Some("Gajuwaka"));
    }

    #[test]
    fn test_neighbourhood_then_district() {
        let lookup = AddressLookup::from_response(parse(
            r#"{"display_name": "x", "address": {"city_district": "MVP Colony"}}"#,
        ));
        assert_eq!(lookup.area.as_deref(), Some("MVP Colony"));
    }

    #[test]
    fn test_missing_display_name() {
        let lookup = AddressLookup::from_response(parse(r#"{"error": "Unable to geocode"}"#));
        assert_eq!(lookup.address, "Address not found.");
        assert!(!lookup.is_found());
    }

    #[test]
    fn test_missing_address_object() {
        let lookup = AddressLookup::from_response(parse(r#"{"display_name": "Bay of Bengal"}"#));
        assert_eq!(lookup, AddressLookup::unavailable());
        assert_eq!(lookup.address, "Could not fetch address.");
        assert!(!lookup.is_found());
    }

    #[test]
    fn test_address_without_locality_is_found() {
        let lookup = AddressLookup::from_response(parse(
            r#"{"display_name": "NH 16, Andhra Pradesh", "address": {"road": "NH 16"}}"#,
        ));
        assert_eq!(lookup.address, "NH 16, Andhra Pradesh");
        assert!(lookup.area.is_none());
        assert!(lookup.is_found());
    }

    #[test]
    fn test_reverse_url() {
        let geocoder = ReverseGeocoder::new(&GeocoderConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..GeocoderConfig::default()
        })
        .unwrap();
        assert_eq!(
            geocoder.reverse_url(17.72, 83.32),
            "http://localhost:8080/reverse?format=json&lat=17.72&lon=83.32"
        );
    }

    #[test]
    fn test_unreachable_service_falls_back() {
        let geocoder = ReverseGeocoder::new(&GeocoderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(2),
            ..GeocoderConfig::default()
        })
        .unwrap();
        assert_eq!(geocoder.lookup(17.72, 83.32), AddressLookup::unavailable());
    }
}
