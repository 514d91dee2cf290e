//! Weather API client for fetching weather data
//!
//! Integrates with OpenWeatherMap for current conditions and the One Call
//! daily/hourly forecast consumed by the live-forecast prediction tier.

use serde::Deserialize;

use crate::error::SourceError;

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

/// Current weather conditions for a location
#[derive(Debug, Clone)]
pub struct CurrentWeather {
    pub location_name: String,
    pub country: Option<String>,
    pub description: Option<String>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub pressure_hpa: Option<f64>,
}

impl CurrentWeather {
    /// Display string, "City, CC" when the country is known
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.location_name, country),
            None => self.location_name.clone(),
        }
    }
}

/// One Call-shaped forecast: daily aggregates plus an hourly breakdown
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub daily: Vec<DailyForecast>,
    #[serde(default)]
    pub hourly: Vec<HourlyForecast>,
}

/// One daily forecast entry. Every field besides the timestamp may be absent
/// and downstream consumers must treat it as fully optional.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyForecast {
    pub dt: i64,
    pub temp: Option<DailyTemp>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub pressure: Option<f64>,
    pub clouds: Option<f64>,
    pub pop: Option<f64>,
    pub rain: Option<Precipitation>,
    pub snow: Option<Precipitation>,
    #[serde(default)]
    pub weather: Vec<WeatherEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyTemp {
    pub day: Option<f64>,
    pub morn: Option<f64>,
    pub eve: Option<f64>,
    pub night: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlyForecast {
    pub dt: i64,
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub pop: Option<f64>,
    pub rain: Option<Precipitation>,
    pub snow: Option<Precipitation>,
    #[serde(default)]
    pub weather: Vec<WeatherEntry>,
}

/// Rain or snow volume, reported under a "1h" key
#[derive(Debug, Clone, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
}

impl Precipitation {
    pub fn volume(&self) -> f64 {
        self.one_hour.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherEntry {
    pub main: String,
    pub description: String,
}

/// OpenWeatherMap response for current weather
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    #[serde(default)]
    weather: Vec<WeatherEntry>,
    main: Option<OwmMain>,
    wind: Option<OwmWind>,
    sys: Option<OwmSys>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
    pressure: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    country: Option<String>,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, "https://api.openweathermap.org".to_string())
    }

    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    /// Fetch current weather conditions by GPS coordinates
    pub async fn get_current_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentWeather, SourceError> {
        let url = format!(
            "{}/data/2.5/weather?lat={}&lon={}&units=metric&appid={}",
            self.base_url, latitude, longitude, self.api_key
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(SourceError::Unavailable(format!(
                "weather API returned {}",
                status
            )));
        }

        let data: OwmCurrentResponse = response.json().await?;
        Ok(Self::convert_current_response(data, latitude, longitude))
    }

    /// Fetch the daily/hourly forecast by GPS coordinates
    pub async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastResponse, SourceError> {
        let url = format!(
            "{}/data/3.0/onecall?lat={}&lon={}&units=metric&exclude=minutely,alerts&appid={}",
            self.base_url, latitude, longitude, self.api_key
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(SourceError::Unavailable(format!(
                "forecast API returned {}",
                status
            )));
        }

        let data: ForecastResponse = response.json().await?;
        Ok(data)
    }

    fn convert_current_response(
        data: OwmCurrentResponse,
        latitude: f64,
        longitude: f64,
    ) -> CurrentWeather {
        let weather = data.weather.first();

        CurrentWeather {
            location_name: data
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("{}, {}", latitude, longitude)),
            country: data.sys.and_then(|s| s.country),
            description: weather.map(|w| w.description.clone()),
            temperature_c: data.main.as_ref().and_then(|m| m.temp),
            humidity_pct: data.main.as_ref().and_then(|m| m.humidity),
            wind_speed_ms: data.wind.and_then(|w| w.speed),
            pressure_hpa: data.main.as_ref().and_then(|m| m.pressure),
        }
    }
}
