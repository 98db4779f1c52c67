// src/services/weather_service.rs
use reqwest::Client;

use crate::errors::WardrobeError;
use crate::models::{CurrentConditions, DailyForecast, WeatherReport};

const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

pub struct WeatherService {
    client: Client,
}

impl WeatherService {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Resolves the city to coordinates, then fetches current conditions and
    /// today's forecast from Open-Meteo.
    pub async fn fetch(&self, city: &str) -> Result<WeatherReport, WardrobeError> {
        let geo: serde_json::Value = self
            .client
            .get(GEOCODING_URL)
            .query(&[("name", city), ("count", "1"), ("language", "fr")])
            .send()
            .await
            .map_err(|e| WardrobeError::Weather(format!("Geocoding request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| WardrobeError::Weather(format!("Invalid geocoding response: {}", e)))?;

        let location = geo["results"]
            .get(0)
            .ok_or_else(|| WardrobeError::Weather(format!("Ville inconnue: {}", city)))?;

        let latitude = location["latitude"]
            .as_f64()
            .ok_or_else(|| WardrobeError::Weather("Missing latitude".to_string()))?;
        let longitude = location["longitude"]
            .as_f64()
            .ok_or_else(|| WardrobeError::Weather("Missing longitude".to_string()))?;

        let weather: serde_json::Value = self
            .client
            .get(FORECAST_URL)
            .query(&[
                ("latitude", latitude.to_string().as_str()),
                ("longitude", longitude.to_string().as_str()),
                (
                    "current",
                    "temperature_2m,relative_humidity_2m,precipitation,weather_code,wind_speed_10m",
                ),
                (
                    "daily",
                    "temperature_2m_max,temperature_2m_min,precipitation_sum,weather_code",
                ),
                ("timezone", "Europe/Paris"),
            ])
            .send()
            .await
            .map_err(|e| WardrobeError::Weather(format!("Forecast request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| WardrobeError::Weather(format!("Invalid forecast response: {}", e)))?;

        let current = &weather["current"];
        let daily = &weather["daily"];
        let weather_code = current["weather_code"].as_u64().unwrap_or(0) as u8;

        Ok(WeatherReport {
            city: location["name"].as_str().unwrap_or(city).to_string(),
            country: location["country"].as_str().unwrap_or("").to_string(),
            description: weather_code_description(weather_code).to_string(),
            current: CurrentConditions {
                temperature: current["temperature_2m"].as_f64().unwrap_or(0.0),
                humidity: current["relative_humidity_2m"].as_f64().unwrap_or(0.0),
                precipitation: current["precipitation"].as_f64().unwrap_or(0.0),
                wind_speed: current["wind_speed_10m"].as_f64().unwrap_or(0.0),
                weather_code,
            },
            daily: DailyForecast {
                max_temp: daily["temperature_2m_max"][0].as_f64().unwrap_or(0.0),
                min_temp: daily["temperature_2m_min"][0].as_f64().unwrap_or(0.0),
                precipitation: daily["precipitation_sum"][0].as_f64().unwrap_or(0.0),
            },
        })
    }
}

/// WMO weather code to French description.
pub fn weather_code_description(code: u8) -> &'static str {
    match code {
        0 => "Ciel dégagé",
        1 => "Principalement dégagé",
        2 => "Partiellement nuageux",
        3 => "Nuageux",
        45 => "Brouillard",
        48 => "Brouillard givrant",
        51 => "Bruine légère",
        53 => "Bruine modérée",
        55 => "Bruine forte",
        61 => "Pluie légère",
        63 => "Pluie modérée",
        65 => "Pluie forte",
        71 => "Neige légère",
        73 => "Neige modérée",
        75 => "Neige forte",
        80 => "Averses légères",
        81 => "Averses modérées",
        82 => "Averses fortes",
        95 => "Orage",
        96 => "Orage avec grêle",
        _ => "Conditions inconnues",
    }
}
