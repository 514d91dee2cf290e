//! Location geocoding with a provider cascade
//!
//! Indian six-digit pincodes go to the postal lookup API first (coordinates
//! come from a state-centroid table since the postal API carries none), then
//! Google Maps, then OpenWeatherMap's geocoder. Results are cached for 24
//! hours per normalized query.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use shared::{is_indian_pincode, GeocodedLocation};

use crate::cache::{Clock, SystemClock, TtlCache};
use crate::error::{AppError, SourceError};

/// Approximate centroid per Indian state, used because the postal API
/// returns no coordinates
const STATE_CENTROIDS: [(&str, f64, f64); 10] = [
    ("Maharashtra", 19.7515, 75.7139),
    ("Delhi", 28.7041, 77.1025),
    ("Karnataka", 15.3173, 75.7139),
    ("Tamil Nadu", 11.1271, 78.6569),
    ("Gujarat", 22.2587, 71.1924),
    ("Rajasthan", 27.0238, 74.2179),
    ("Uttar Pradesh", 26.8467, 80.9462),
    ("West Bengal", 22.9868, 87.8550),
    ("Madhya Pradesh", 22.9734, 78.6569),
    ("Bihar", 25.0961, 85.3131),
];

/// Fallback centroid for unlisted states (geographic center of India)
const INDIA_CENTROID: (f64, f64) = (20.5937, 78.9629);

fn state_centroid(state: &str) -> (f64, f64) {
    STATE_CENTROIDS
        .iter()
        .find(|(name, _, _)| *name == state)
        .map(|(_, lat, lon)| (*lat, *lon))
        .unwrap_or(INDIA_CENTROID)
}

/// A geocoding query, at most one field used per request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeQuery {
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub location_name: Option<String>,
}

impl GeocodeQuery {
    fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.address.as_deref().unwrap_or("").to_lowercase(),
            self.postal_code.as_deref().unwrap_or(""),
            self.country.as_deref().unwrap_or("").to_uppercase(),
            self.location_name.as_deref().unwrap_or("").to_lowercase(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct PostalResponse {
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "PostOffice", default)]
    post_offices: Vec<PostOffice>,
}

#[derive(Debug, Deserialize)]
struct PostOffice {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "District")]
    district: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Division")]
    division: Option<String>,
    #[serde(rename = "Region")]
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleGeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleResult>,
}

#[derive(Debug, Deserialize)]
struct GoogleResult {
    formatted_address: String,
    place_id: Option<String>,
    geometry: GoogleGeometry,
}

#[derive(Debug, Deserialize)]
struct GoogleGeometry {
    location: GoogleLatLng,
}

#[derive(Debug, Deserialize)]
struct GoogleLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct OwmDirectResult {
    lat: f64,
    lon: f64,
    name: String,
    state: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmZipResult {
    lat: Option<f64>,
    lon: Option<f64>,
    name: Option<String>,
    country: Option<String>,
}

/// Geocoding service with a 24 h result cache
pub struct GeocodingService {
    client: reqwest::Client,
    google_api_key: String,
    weather_api_key: String,
    postal_endpoint: String,
    cache: TtlCache<String, GeocodedLocation>,
}

impl GeocodingService {
    pub fn new(
        google_api_key: String,
        weather_api_key: String,
        postal_endpoint: String,
        cache_ttl: Duration,
    ) -> Self {
        Self::with_clock(
            google_api_key,
            weather_api_key,
            postal_endpoint,
            cache_ttl,
            Arc::new(SystemClock),
        )
    }

    pub fn with_clock(
        google_api_key: String,
        weather_api_key: String,
        postal_endpoint: String,
        cache_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            google_api_key,
            weather_api_key,
            postal_endpoint,
            cache: TtlCache::with_clock(cache_ttl, clock),
        }
    }

    /// Resolve a query to coordinates through the provider cascade
    pub async fn geocode(&self, query: &GeocodeQuery) -> Result<GeocodedLocation, AppError> {
        if query.address.is_none() && query.postal_code.is_none() && query.location_name.is_none() {
            return Err(AppError::Validation(
                "Provide address, postal_code, or location_name".to_string(),
            ));
        }

        let cache_key = query.cache_key();
        if let Some(cached) = self.cache.get(&cache_key) {
            tracing::debug!("geocode cache hit for {}", cache_key);
            return Ok(cached);
        }

        let result = self
            .resolve(query)
            .await
            .map_err(|e| AppError::GeocodingFailed(e.to_string()))?;

        self.cache.insert(cache_key, result.clone());
        Ok(result)
    }

    async fn resolve(&self, query: &GeocodeQuery) -> Result<GeocodedLocation, SourceError> {
        if let Some(postal_code) = &query.postal_code {
            let country = query.country.as_deref();
            let is_indian = is_indian_pincode(postal_code)
                && country.map_or(true, |c| c.eq_ignore_ascii_case("IN"));

            if is_indian {
                match self.geocode_postal_pincode(postal_code).await {
                    Ok(result) => return Ok(result),
                    Err(e) => {
                        tracing::warn!("postal pincode lookup failed ({}), trying Google", e)
                    }
                }
            }

            let google_query = match country {
                Some(c) => format!("{}, {}", postal_code, c),
                None => postal_code.clone(),
            };
            match self.geocode_google(&google_query).await {
                Ok(result) => Ok(result),
                Err(e) => {
                    tracing::warn!("Google geocoding failed ({}), trying OpenWeatherMap", e);
                    self.geocode_owm_zip(postal_code, country.unwrap_or("IN"))
                        .await
                }
            }
        } else {
            let text = query
                .address
                .as_deref()
                .or(query.location_name.as_deref())
                .unwrap_or_default();
            match self.geocode_google(text).await {
                Ok(result) => Ok(result),
                Err(e) => {
                    tracing::warn!("Google geocoding failed ({}), trying OpenWeatherMap", e);
                    self.geocode_owm_direct(text).await
                }
            }
        }
    }

    async fn geocode_postal_pincode(&self, pincode: &str) -> Result<GeocodedLocation, SourceError> {
        let url = format!("{}/pincode/{}", self.postal_endpoint, pincode);
        let response = self.client.get(&url).send().await?;
        let data: Vec<PostalResponse> = response.json().await?;

        let first = data
            .first()
            .filter(|r| r.status == "Success")
            .ok_or_else(|| SourceError::Malformed("invalid pincode".to_string()))?;
        let office = first
            .post_offices
            .first()
            .ok_or_else(|| SourceError::Malformed("no post office records".to_string()))?;

        let (lat, lon) = state_centroid(&office.state);

        Ok(GeocodedLocation {
            lat,
            lon,
            name: format!("{}, {}, {}", office.name, office.district, office.state),
            details: Some(json!({
                "city": office.name,
                "district": office.district,
                "state": office.state,
                "country": "India",
                "postal_code": pincode,
                "division": office.division,
                "region": office.region,
            })),
        })
    }

    async fn geocode_google(&self, address: &str) -> Result<GeocodedLocation, SourceError> {
        let response = self
            .client
            .get("https://maps.googleapis.com/maps/api/geocode/json")
            .query(&[("address", address), ("key", &self.google_api_key)])
            .send()
            .await?;
        let data: GoogleGeocodeResponse = response.json().await?;

        if data.status != "OK" {
            return Err(SourceError::Unavailable(format!(
                "Google Maps API status {}",
                data.status
            )));
        }
        let result = data
            .results
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::Malformed("no geocoding results".to_string()))?;

        Ok(GeocodedLocation {
            lat: result.geometry.location.lat,
            lon: result.geometry.location.lng,
            name: result.formatted_address.clone(),
            details: Some(json!({
                "formatted_address": result.formatted_address,
                "place_id": result.place_id,
            })),
        })
    }

    async fn geocode_owm_direct(&self, query: &str) -> Result<GeocodedLocation, SourceError> {
        let response = self
            .client
            .get("https://api.openweathermap.org/geo/1.0/direct")
            .query(&[("q", query), ("limit", "1"), ("appid", &self.weather_api_key)])
            .send()
            .await?;
        let data: Vec<OwmDirectResult> = response.json().await?;

        let result = data
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::Malformed("no results found".to_string()))?;

        let name = match &result.state {
            Some(state) => format!(
                "{}, {}, {}",
                result.name,
                state,
                result.country.as_deref().unwrap_or("")
            ),
            None => format!(
                "{}, {}",
                result.name,
                result.country.as_deref().unwrap_or("")
            ),
        };

        Ok(GeocodedLocation {
            lat: result.lat,
            lon: result.lon,
            name,
            details: None,
        })
    }

    async fn geocode_owm_zip(
        &self,
        postal_code: &str,
        country: &str,
    ) -> Result<GeocodedLocation, SourceError> {
        let zip = format!("{},{}", postal_code, country.to_uppercase());
        let response = self
            .client
            .get("https://api.openweathermap.org/geo/1.0/zip")
            .query(&[("zip", zip.as_str()), ("appid", &self.weather_api_key)])
            .send()
            .await?;
        let data: OwmZipResult = response.json().await?;

        match (data.lat, data.lon) {
            (Some(lat), Some(lon)) => Ok(GeocodedLocation {
                lat,
                lon,
                name: format!(
                    "{}, {}",
                    data.name.as_deref().unwrap_or(postal_code),
                    data.country.as_deref().unwrap_or(&country.to_uppercase())
                ),
                details: None,
            }),
            _ => Err(SourceError::Malformed("no results found".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_centroid_lookup() {
        let (lat, lon) = state_centroid("Maharashtra");
        assert_eq!((lat, lon), (19.7515, 75.7139));
        // Unknown states fall back to the national centroid
        assert_eq!(state_centroid("Goa"), INDIA_CENTROID);
    }

    #[test]
    fn test_postal_response_parsing() {
        let raw = r#"[{
            "Status": "Success",
            "PostOffice": [{
                "Name": "Andheri",
                "District": "Mumbai",
                "State": "Maharashtra",
                "Division": "Mumbai West",
                "Region": "Mumbai"
            }]
        }]"#;
        let parsed: Vec<PostalResponse> = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed[0].status, "Success");
        assert_eq!(parsed[0].post_offices[0].state, "Maharashtra");
    }

    #[test]
    fn test_cache_key_is_case_insensitive() {
        let a = GeocodeQuery {
            address: Some("Mumbai".to_string()),
            ..Default::default()
        };
        let b = GeocodeQuery {
            address: Some("mumbai".to_string()),
            ..Default::default()
        };
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let service = GeocodingService::new(
            "k".to_string(),
            "k".to_string(),
            "https://api.postalpincode.in".to_string(),
            Duration::from_secs(86400),
        );
        let result = service.geocode(&GeocodeQuery::default()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
