// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::WardrobeError;

/// Raw classification produced by the vision model, validated at the boundary.
///
/// The `type` tag discriminates the two shapes the model may return; anything
/// that does not parse into one of these variants is rejected before it
/// reaches the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawAnalysisResult {
    SinglePiece { category: String, pieces: Vec<Piece> },
    Outfit { category: String, pieces: Vec<Piece> },
}

impl RawAnalysisResult {
    pub fn category(&self) -> &str {
        match self {
            RawAnalysisResult::SinglePiece { category, .. } => category,
            RawAnalysisResult::Outfit { category, .. } => category,
        }
    }

    pub fn pieces(&self) -> &[Piece] {
        match self {
            RawAnalysisResult::SinglePiece { pieces, .. } => pieces,
            RawAnalysisResult::Outfit { pieces, .. } => pieces,
        }
    }

    pub fn type_label(&self) -> &'static str {
        match self {
            RawAnalysisResult::SinglePiece { .. } => "single_piece",
            RawAnalysisResult::Outfit { .. } => "outfit",
        }
    }
}

/// One garment within an analysis result or outfit.
///
/// `type` is the detailed category string ("tshirt", "jeans", ...). The vision
/// model may attach attributes beyond the known ones; those are retained
/// verbatim in `attributes` so nothing is lost between analysis and storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "type")]
    pub piece_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// What the user asked the camera flow to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestedItemType {
    Clothing,
    Outfit,
}

impl RequestedItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clothing => "clothing",
            Self::Outfit => "outfit",
        }
    }
}

impl std::str::FromStr for RequestedItemType {
    type Err = WardrobeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clothing" => Ok(Self::Clothing),
            "outfit" => Ok(Self::Outfit),
            other => Err(WardrobeError::Validation(format!(
                "unknown item_type: \"{}\" (expected \"clothing\" or \"outfit\")",
                other
            ))),
        }
    }
}

impl std::fmt::Display for RequestedItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snake_case payload sent to and read back from the store.
///
/// `category` and `items` are carried over verbatim from the analysis; the
/// detailed category strings are preserved for later re-classification.
/// `item_type` is present for single pieces and omitted for outfits, matching
/// the existing storage contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageRecord {
    pub category: String,
    pub items: Vec<Piece>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<RequestedItemType>,
}

/// Persistence envelope around a [`StorageRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardrobeEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub record: StorageRecord,
    pub created_at: DateTime<Utc>,
}

/// Whether a wardrobe entry is one garment or an ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    SinglePiece,
    Outfit,
}

/// Coarse categories used by the wardrobe filter UI. Closed set; anything the
/// vision model emits must map into one of these through the dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CoarseCategory {
    Top,
    Bottom,
    Dress,
    Outerwear,
    Shoes,
    Accessories,
}

impl CoarseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "TOP",
            Self::Bottom => "BOTTOM",
            Self::Dress => "DRESS",
            Self::Outerwear => "OUTERWEAR",
            Self::Shoes => "SHOES",
            Self::Accessories => "ACCESSORIES",
        }
    }
}

/// Top-level category of a UI item: a coarse category for single pieces, or
/// the outfit label ("full_outfit") for ensembles, which span several garment
/// types and do not get a single coarse bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WardrobeCategory {
    Coarse(CoarseCategory),
    Label(String),
}

/// UI-facing wardrobe model.
///
/// The wire form is camelCase; legacy snake_case field names are accepted on
/// decode through serde aliases. Responses that must keep old consumers alive
/// go through [`crate::normalizer::to_wire`], which duplicates the
/// historically dual-named fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
    pub id: Uuid,
    pub name: String,
    pub category: WardrobeCategory,
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "image_url")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "piece_type")]
    pub piece_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "style_tags")]
    pub style_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "occasion_tags")]
    pub occasion_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasons: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "is_favorite")]
    pub is_favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "wear_count")]
    pub wear_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pieces: Option<Vec<ClothingItem>>,
}

/// A photo captured by the app, held until the analysis is saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureUpload {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size: usize,
    pub data: Vec<u8>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveClothingRequest {
    pub user_id: Uuid,
    /// Omitted for outfits, per the existing storage contract.
    #[serde(default)]
    pub item_type: Option<RequestedItemType>,
    pub analysis_result: RawAnalysisResult,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WardrobeQuery {
    #[serde(default)]
    pub category: Option<CoarseCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyRecommendationRequest {
    pub user_id: Uuid,
    pub city: String,
    #[serde(default)]
    pub user_needs: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub city: String,
    pub country: String,
    pub description: String,
    pub current: CurrentConditions,
    pub daily: DailyForecast,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub precipitation: f64,
    pub wind_speed: f64,
    pub weather_code: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub max_temp: f64,
    pub min_temp: f64,
    pub precipitation: f64,
}

/// One outfit proposal for the day, built from wardrobe entry ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecommendation {
    pub entry_ids: Vec<Uuid>,
    pub title: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_result_parses_single_piece() {
        let json = r#"{
            "type": "single_piece",
            "category": "piece_unique",
            "pieces": [{"type": "tshirt", "name": "T-shirt blanc basique", "color": "white"}]
        }"#;

        let raw: RawAnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(raw.type_label(), "single_piece");
        assert_eq!(raw.category(), "piece_unique");
        assert_eq!(raw.pieces().len(), 1);
        assert_eq!(raw.pieces()[0].piece_type, "tshirt");
        assert_eq!(raw.pieces()[0].color.as_deref(), Some("white"));
    }

    #[test]
    fn analysis_result_parses_outfit() {
        let json = r#"{
            "type": "outfit",
            "category": "quotidien",
            "pieces": [{"type": "tshirt"}, {"type": "jeans"}, {"type": "sneakers"}]
        }"#;

        let raw: RawAnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(raw.type_label(), "outfit");
        assert_eq!(raw.pieces().len(), 3);
    }

    #[test]
    fn analysis_result_rejects_missing_tag() {
        let json = r#"{"category": "quotidien", "pieces": []}"#;
        assert!(serde_json::from_str::<RawAnalysisResult>(json).is_err());
    }

    #[test]
    fn analysis_result_rejects_unknown_tag() {
        let json = r#"{"type": "collage", "category": "x", "pieces": []}"#;
        assert!(serde_json::from_str::<RawAnalysisResult>(json).is_err());
    }

    #[test]
    fn piece_keeps_free_form_attributes() {
        let json = r#"{"type": "jeans", "fit": "slim", "price_range": "20-50", "brand_estimation": null}"#;
        let piece: Piece = serde_json::from_str(json).unwrap();
        assert_eq!(piece.fit.as_deref(), Some("slim"));
        assert!(piece.attributes.contains_key("price_range"));

        let back = serde_json::to_value(&piece).unwrap();
        assert_eq!(back["price_range"], "20-50");
    }

    #[test]
    fn storage_record_omits_item_type_for_outfits() {
        let record = StorageRecord {
            category: "quotidien".to_string(),
            items: vec![],
            item_type: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("item_type").is_none());

        let record = StorageRecord {
            category: "piece_unique".to_string(),
            items: vec![],
            item_type: Some(RequestedItemType::Clothing),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["item_type"], "clothing");
    }

    #[test]
    fn clothing_item_decodes_legacy_snake_case() {
        let json = r#"{
            "id": "8f8d4a2e-8f27-4f0a-9d1c-0f2a8f0f4c11",
            "name": "Jean slim",
            "category": "BOTTOM",
            "itemType": "SINGLE_PIECE",
            "image_url": "https://cdn.example.com/jean.jpg",
            "style_tags": ["casual"],
            "is_favorite": true,
            "wear_count": 4
        }"#;

        let item: ClothingItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.image_url.as_deref(), Some("https://cdn.example.com/jean.jpg"));
        assert_eq!(item.style_tags.as_deref(), Some(&["casual".to_string()][..]));
        assert_eq!(item.is_favorite, Some(true));
        assert_eq!(item.wear_count, Some(4));
        assert_eq!(item.category, WardrobeCategory::Coarse(CoarseCategory::Bottom));
    }

    #[test]
    fn wardrobe_category_prefers_coarse_over_label() {
        let coarse: WardrobeCategory = serde_json::from_str("\"TOP\"").unwrap();
        assert_eq!(coarse, WardrobeCategory::Coarse(CoarseCategory::Top));

        let label: WardrobeCategory = serde_json::from_str("\"full_outfit\"").unwrap();
        assert_eq!(label, WardrobeCategory::Label("full_outfit".to_string()));
    }

    #[test]
    fn requested_item_type_round_trips_as_str() {
        assert_eq!("clothing".parse::<RequestedItemType>().unwrap(), RequestedItemType::Clothing);
        assert_eq!("outfit".parse::<RequestedItemType>().unwrap(), RequestedItemType::Outfit);
        assert!("look".parse::<RequestedItemType>().is_err());
        assert_eq!(RequestedItemType::Clothing.to_string(), "clothing");
    }
}
