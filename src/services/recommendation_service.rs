// src/services/recommendation_service.rs
use reqwest::Client;
use serde_json::json;

use crate::errors::WardrobeError;
use crate::models::{ClothingItem, DailyRecommendation, WardrobeCategory, WeatherReport};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const RECOMMENDATION_MODEL: &str = "gpt-4o";

pub struct RecommendationService {
    api_key: String,
    client: Client,
}

impl RecommendationService {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: Client::new(),
        }
    }

    /// Asks the chat model for exactly one outfit for today, built from the
    /// user's wardrobe and coherent with the weather.
    pub async fn daily_outfit(
        &self,
        weather: &WeatherReport,
        wardrobe: &[ClothingItem],
        user_needs: Option<&str>,
        recently_recommended: &[String],
    ) -> Result<DailyRecommendation, WardrobeError> {
        if wardrobe.is_empty() {
            return Err(WardrobeError::Validation(
                "la garde-robe est vide, rien à recommander".to_string(),
            ));
        }

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": RECOMMENDATION_MODEL,
                "messages": [
                    {
                        "role": "system",
                        "content": SYSTEM_PROMPT
                    },
                    {
                        "role": "user",
                        "content": user_prompt(weather, wardrobe, user_needs, recently_recommended)
                    }
                ],
                "max_tokens": 800,
                "temperature": 0.7,
                "response_format": { "type": "json_object" }
            }))
            .send()
            .await
            .map_err(|e| WardrobeError::Recommendation(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WardrobeError::Recommendation(format!(
                "OpenAI error: {}",
                error_text
            )));
        }

        let result: serde_json::Value = response.json().await.map_err(|e| {
            WardrobeError::Recommendation(format!("Failed to parse OpenAI response: {}", e))
        })?;

        let content = result["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                WardrobeError::Recommendation("No content in OpenAI response".to_string())
            })?;

        parse_recommendation(content)
    }
}

const SYSTEM_PROMPT: &str = "Tu es un styliste personnel expert qui recommande des tenues basées sur:\n\
1. La météo actuelle et prévue\n\
2. Les vêtements disponibles dans la garde-robe\n\
3. Les besoins spécifiques de l'utilisateur (si fournis)\n\
\n\
Recommande UNE SEULE tenue, composée uniquement d'entrées de la garde-robe fournie.\n\
Réponds UNIQUEMENT avec un JSON valide de la forme:\n\
{\"entry_ids\": [\"...\"], \"title\": \"...\", \"description\": \"...\"}";

fn user_prompt(
    weather: &WeatherReport,
    wardrobe: &[ClothingItem],
    user_needs: Option<&str>,
    recently_recommended: &[String],
) -> String {
    let inventory = wardrobe
        .iter()
        .map(|item| {
            let category = match &item.category {
                WardrobeCategory::Coarse(c) => c.as_str().to_string(),
                WardrobeCategory::Label(l) => l.clone(),
            };
            format!("- {} | {} | {}", item.id, item.name, category)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let needs = user_needs
        .map(|n| format!("\nBESOINS SPÉCIFIQUES: {}\n", n))
        .unwrap_or_default();

    let recent = if recently_recommended.is_empty() {
        "Aucun".to_string()
    } else {
        recently_recommended.join(", ")
    };

    format!(
        "MÉTÉO À {city}:\n\
- {description}\n\
- Température: {temp}°C\n\
- Max/Min aujourd'hui: {max}°C / {min}°C\n\
- Humidité: {humidity}%\n\
- Vent: {wind} km/h\n\
- Précipitations: {precip}mm\n\
{needs}\n\
ENTRÉES RÉCEMMENT RECOMMANDÉES (à éviter): {recent}\n\
\n\
GARDE-ROBE DISPONIBLE (id | nom | catégorie):\n\
{inventory}\n\
\n\
RÈGLES:\n\
1. Choisir uniquement des ids présents dans la garde-robe.\n\
2. Cohérence météo stricte: pas de laine ni manteau au-dessus de 25°C, pas de short en dessous de 10°C.\n\
3. Si pluie annoncée, privilégier les pièces résistantes à l'eau.",
        city = weather.city,
        description = weather.description,
        temp = weather.current.temperature,
        max = weather.daily.max_temp,
        min = weather.daily.min_temp,
        humidity = weather.current.humidity,
        wind = weather.current.wind_speed,
        precip = weather.current.precipitation,
        needs = needs,
        recent = recent,
        inventory = inventory,
    )
}

/// Strict parse of the model's reply, fences stripped. Extra recommendations
/// beyond the first outfit are not accepted: the shape is a single proposal.
pub(crate) fn parse_recommendation(content: &str) -> Result<DailyRecommendation, WardrobeError> {
    let mut json_str = content.trim();
    if let Some(stripped) = json_str.strip_prefix("```json") {
        json_str = stripped;
    } else if let Some(stripped) = json_str.strip_prefix("```") {
        json_str = stripped;
    }
    if let Some(stripped) = json_str.strip_suffix("```") {
        json_str = stripped;
    }

    serde_json::from_str(json_str.trim()).map_err(|e| {
        WardrobeError::Recommendation(format!("Failed to parse recommendation JSON: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CoarseCategory, CurrentConditions, DailyForecast, ItemType};
    use uuid::Uuid;

    fn report() -> WeatherReport {
        WeatherReport {
            city: "Paris".to_string(),
            country: "France".to_string(),
            description: "Pluie légère".to_string(),
            current: CurrentConditions {
                temperature: 12.5,
                humidity: 80.0,
                precipitation: 1.2,
                wind_speed: 20.0,
                weather_code: 61,
            },
            daily: DailyForecast {
                max_temp: 14.0,
                min_temp: 8.0,
                precipitation: 3.0,
            },
        }
    }

    fn item(name: &str) -> ClothingItem {
        ClothingItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: WardrobeCategory::Coarse(CoarseCategory::Top),
            item_type: ItemType::SinglePiece,
            image_url: None,
            colors: None,
            materials: None,
            pattern: None,
            fit: None,
            piece_type: Some("tshirt".to_string()),
            style_tags: None,
            occasion_tags: None,
            seasons: None,
            is_favorite: None,
            wear_count: None,
            created_at: None,
            pieces: None,
        }
    }

    #[test]
    fn parses_recommendation_content() {
        let content = r#"{
            "entry_ids": ["0a6f3c9e-5f04-4d46-9c4e-7f2f4b8a1c22"],
            "title": "Journée pluvieuse",
            "description": "Un look confortable et imperméable."
        }"#;

        let rec = parse_recommendation(content).unwrap();
        assert_eq!(rec.entry_ids.len(), 1);
        assert_eq!(rec.title, "Journée pluvieuse");
    }

    #[test]
    fn rejects_malformed_recommendation() {
        assert!(parse_recommendation("pas du json").is_err());
        assert!(parse_recommendation(r#"{"title": "sans ids"}"#).is_err());
    }

    #[test]
    fn prompt_carries_weather_inventory_and_history() {
        let wardrobe = [item("T-shirt blanc"), item("Jean slim")];
        let prompt = user_prompt(
            &report(),
            &wardrobe,
            Some("réunion importante"),
            &["abc-123".to_string()],
        );

        assert!(prompt.contains("MÉTÉO À Paris"));
        assert!(prompt.contains("Pluie légère"));
        assert!(prompt.contains("T-shirt blanc"));
        assert!(prompt.contains("réunion importante"));
        assert!(prompt.contains("abc-123"));
    }
}
