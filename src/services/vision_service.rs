// src/services/vision_service.rs
use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde_json::json;

use crate::errors::WardrobeError;
use crate::models::{RawAnalysisResult, RequestedItemType};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const VISION_MODEL: &str = "gpt-4o";

pub struct VisionService {
    api_key: String,
    client: Client,
}

impl VisionService {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: Client::new(),
        }
    }

    /// Sends a capture to the vision model and returns the validated analysis.
    ///
    /// The response is parsed into the tagged [`RawAnalysisResult`] union right
    /// here at the boundary; malformed shapes never reach the normalizer.
    pub async fn analyze_image(
        &self,
        image_data: &[u8],
        requested: RequestedItemType,
    ) -> Result<RawAnalysisResult, WardrobeError> {
        let base64_image = general_purpose::STANDARD.encode(image_data);

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": VISION_MODEL,
                "messages": [
                    {
                        "role": "system",
                        "content": analysis_prompt(requested)
                    },
                    {
                        "role": "user",
                        "content": [
                            {
                                "type": "text",
                                "text": "Analyse cette image et retourne UNIQUEMENT le JSON demandé, sans aucun texte supplémentaire."
                            },
                            {
                                "type": "image_url",
                                "image_url": {
                                    "url": format!("data:image/jpeg;base64,{}", base64_image)
                                }
                            }
                        ]
                    }
                ],
                "max_tokens": 1500,
                "temperature": 0.3,
                "response_format": { "type": "json_object" }
            }))
            .send()
            .await
            .map_err(|e| WardrobeError::Vision(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(WardrobeError::Vision(format!("OpenAI error: {}", error_text)));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WardrobeError::Vision(format!("Failed to parse OpenAI response: {}", e)))?;

        let content = result["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| WardrobeError::Vision("No content in OpenAI response".to_string()))?;

        parse_analysis(content)
    }
}

fn analysis_prompt(requested: RequestedItemType) -> String {
    let base = r#"Tu es un expert en mode et style vestimentaire.
Analyse l'image fournie et retourne UNIQUEMENT un objet JSON structuré.

VALEURS NORMALISÉES :
- Colors: white, black, grey, navy, blue, red, burgundy, pink, green, khaki, olive, yellow, orange, purple, brown, beige, cream
- Materials: coton, laine, denim, cuir, synthétique, lin, soie, velours, cachemire, polyester, nylon
- Patterns: uni, rayé, carreaux, fleuri, logo, imprimé, graphique, pois, géométrique
- Fits: slim, regular, loose, oversized, skinny, relaxed, straight, tapered
- Styles: casual, formel, sportif, streetwear, chic, bohème, minimaliste, rock, vintage
- Occasions: travail, soirée, weekend, sport, casual, cérémonie, vacances, quotidien

TYPES DE PIÈCES (valeurs exactes, aucune autre) :
- Hauts: tshirt, shirt, sweater, pullover, hoodie
- Extérieur: jacket, blazer, coat, vest
- Bas: pants, jeans, shorts, skirt
- Robes: dress
- Chaussures: shoes, sneakers, boots, sandals
- Accessoires: bag, belt, hat, scarf, jewelry
"#;

    match requested {
        RequestedItemType::Clothing => format!(
            r#"{base}
CONSIGNE : Concentre-toi sur la pièce de vêtement UNIQUE au centre de l'image.

Retourne ce JSON EXACT :
{{
  "type": "single_piece",
  "category": "piece_unique",
  "pieces": [
    {{
      "type": "[type exact de la pièce]",
      "name": "[nom descriptif, ex: T-shirt blanc basique]",
      "color": "[couleur principale]",
      "material": "[matière]",
      "pattern": "[motif]",
      "fit": "[coupe]",
      "style": "[style]"
    }}
  ]
}}

La liste "pieces" doit contenir EXACTEMENT un élément."#
        ),
        RequestedItemType::Outfit => format!(
            r#"{base}
CONSIGNE : Analyse la tenue COMPLÈTE visible dans l'image, une entrée par vêtement.

Retourne ce JSON EXACT :
{{
  "type": "outfit",
  "category": "[occasion dominante de la tenue, ex: quotidien]",
  "pieces": [
    {{
      "type": "[type exact de la pièce]",
      "name": "[nom descriptif]",
      "color": "[couleur principale]",
      "material": "[matière]",
      "pattern": "[motif]",
      "fit": "[coupe]",
      "style": "[style]"
    }}
  ]
}}

Une entrée par vêtement visible, dans l'ordre haut vers bas."#
        ),
    }
}

/// Strict boundary parse of the model's reply. Strips the markdown fences the
/// model sometimes wraps around the payload, then requires a well-formed
/// tagged union.
pub(crate) fn parse_analysis(content: &str) -> Result<RawAnalysisResult, WardrobeError> {
    let mut json_str = content.trim();
    if let Some(stripped) = json_str.strip_prefix("```json") {
        json_str = stripped;
    } else if let Some(stripped) = json_str.strip_prefix("```") {
        json_str = stripped;
    }
    if let Some(stripped) = json_str.strip_suffix("```") {
        json_str = stripped;
    }
    let json_str = json_str.trim();

    if json_str.is_empty() {
        return Err(WardrobeError::Vision("Empty analysis response".to_string()));
    }

    serde_json::from_str(json_str)
        .map_err(|e| WardrobeError::Vision(format!("Failed to parse analysis JSON: {}", e)))
}
