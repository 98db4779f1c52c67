// src/normalizer.rs
//
// Translation between the three representations of a clothing entry: the
// vision model's analysis output, the snake_case storage payload, and the
// camelCase UI model. All functions here are pure; persistence and HTTP stay
// in the services and handlers.
use serde_json::Value;
use uuid::Uuid;

use crate::categories::{self, resolve_display_label, resolve_main_category};
use crate::errors::WardrobeError;
use crate::models::{
    ClothingItem, ItemType, Piece, RawAnalysisResult, RequestedItemType, StorageRecord,
    WardrobeCategory, WardrobeEntry,
};

/// Builds the storage payload for a validated analysis result.
///
/// The requested capture type must agree with what the model returned: a
/// "clothing" request yields exactly one piece, an "outfit" request yields an
/// outfit with at least one piece. `category` and `items` are copied verbatim,
/// keeping the detailed category strings for later re-classification. The
/// `item_type` discriminator is written for single pieces and omitted for
/// outfits, matching the existing storage contract.
pub fn to_storage_record(
    raw: &RawAnalysisResult,
    requested: RequestedItemType,
) -> Result<StorageRecord, WardrobeError> {
    match (requested, raw) {
        (RequestedItemType::Clothing, RawAnalysisResult::SinglePiece { category, pieces }) => {
            if pieces.len() != 1 {
                return Err(WardrobeError::ContractMismatch {
                    requested: requested.to_string(),
                    received: format!("a single_piece analysis with {} pieces", pieces.len()),
                });
            }
            Ok(StorageRecord {
                category: category.clone(),
                items: pieces.clone(),
                item_type: Some(RequestedItemType::Clothing),
            })
        }
        (RequestedItemType::Outfit, RawAnalysisResult::Outfit { category, pieces }) => {
            if pieces.is_empty() {
                return Err(WardrobeError::Validation(
                    "outfit analysis returned no pieces".to_string(),
                ));
            }
            Ok(StorageRecord {
                category: category.clone(),
                items: pieces.clone(),
                item_type: None,
            })
        }
        (requested, raw) => Err(WardrobeError::ContractMismatch {
            requested: requested.to_string(),
            received: format!("a {} analysis", raw.type_label()),
        }),
    }
}

/// Denormalizes a stored entry into the UI model.
///
/// An entry with more than one item is an outfit; its member pieces are mapped
/// recursively and it gets the outfit label instead of a coarse category. Any
/// detailed type missing from the dictionary fails with `UnknownCategory` —
/// a silent default would corrupt the filter counts.
pub fn to_clothing_item(entry: &WardrobeEntry) -> Result<ClothingItem, WardrobeError> {
    let items = &entry.record.items;
    match items.len() {
        0 => Err(WardrobeError::Validation(format!(
            "wardrobe entry {} has no items",
            entry.id
        ))),
        1 => single_piece_item(entry, &items[0]),
        _ => outfit_item(entry, items),
    }
}

fn single_piece_item(entry: &WardrobeEntry, piece: &Piece) -> Result<ClothingItem, WardrobeError> {
    let mut item = piece_fields(entry.id, entry.image_url.clone(), piece)?;
    item.created_at = Some(entry.created_at);
    Ok(item)
}

fn outfit_item(entry: &WardrobeEntry, items: &[Piece]) -> Result<ClothingItem, WardrobeError> {
    let pieces = items
        .iter()
        .enumerate()
        .map(|(position, piece)| {
            // Stable per-position ids, so refetching an entry yields the same
            // member ids every time.
            let piece_id = Uuid::new_v5(&entry.id, format!("piece-{position}").as_bytes());
            piece_fields(piece_id, entry.image_url.clone(), piece)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ClothingItem {
        id: entry.id,
        name: categories::OUTFIT_DISPLAY_NAME.to_string(),
        category: WardrobeCategory::Label(categories::OUTFIT_LABEL.to_string()),
        item_type: ItemType::Outfit,
        image_url: entry.image_url.clone(),
        colors: None,
        materials: None,
        pattern: None,
        fit: None,
        piece_type: None,
        style_tags: None,
        occasion_tags: Some(vec![entry.record.category.clone()]),
        seasons: None,
        is_favorite: None,
        wear_count: None,
        created_at: Some(entry.created_at),
        pieces: Some(pieces),
    })
}

fn piece_fields(
    id: Uuid,
    image_url: Option<String>,
    piece: &Piece,
) -> Result<ClothingItem, WardrobeError> {
    let main = resolve_main_category(&piece.piece_type)?;
    let label = resolve_display_label(&piece.piece_type)?;

    Ok(ClothingItem {
        id,
        name: piece.name.clone().unwrap_or_else(|| label.to_string()),
        category: WardrobeCategory::Coarse(main),
        item_type: ItemType::SinglePiece,
        image_url,
        colors: piece.color.clone().map(|c| vec![c]),
        materials: piece.material.clone().map(|m| vec![m]),
        pattern: piece.pattern.clone(),
        fit: piece.fit.clone(),
        piece_type: Some(piece.piece_type.clone()),
        style_tags: piece.style.clone().map(|s| vec![s]),
        occasion_tags: None,
        seasons: None,
        is_favorite: None,
        wear_count: None,
        created_at: None,
        pieces: None,
    })
}

/// Fields that older persisted records and consumers address in snake_case.
const DUAL_NAMED: &[(&str, &str)] = &[
    ("imageUrl", "image_url"),
    ("pieceType", "piece_type"),
    ("styleTags", "style_tags"),
    ("occasionTags", "occasion_tags"),
    ("isFavorite", "is_favorite"),
    ("wearCount", "wear_count"),
    ("createdAt", "created_at"),
];

/// Encodes a UI item for the wire, duplicating the dual-named fields so both
/// naming conventions resolve to the same value on the consumer side.
pub fn to_wire(item: &ClothingItem) -> Result<Value, WardrobeError> {
    let mut value =
        serde_json::to_value(item).map_err(|e| WardrobeError::Serialization(e.to_string()))?;
    add_snake_case_aliases(&mut value);
    Ok(value)
}

fn add_snake_case_aliases(value: &mut Value) {
    if let Value::Object(map) = value {
        for (camel, snake) in DUAL_NAMED {
            if let Some(v) = map.get(*camel).cloned() {
                map.insert((*snake).to_string(), v);
            }
        }
        if let Some(Value::Array(pieces)) = map.get_mut("pieces") {
            for piece in pieces {
                add_snake_case_aliases(piece);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CoarseCategory;
    use chrono::{TimeZone, Utc};

    fn piece(piece_type: &str) -> Piece {
        Piece {
            piece_type: piece_type.to_string(),
            name: None,
            color: None,
            material: None,
            pattern: None,
            fit: None,
            style: None,
            attributes: serde_json::Map::new(),
        }
    }

    fn entry(record: StorageRecord) -> WardrobeEntry {
        WardrobeEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            image_url: Some("https://cdn.example.com/photo.jpg".to_string()),
            record,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn single_piece_round_trip() {
        let raw = RawAnalysisResult::SinglePiece {
            category: "piece_unique".to_string(),
            pieces: vec![piece("tshirt")],
        };

        let record = to_storage_record(&raw, RequestedItemType::Clothing).unwrap();
        assert_eq!(record.category, "piece_unique");
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].piece_type, "tshirt");
        assert_eq!(record.item_type, Some(RequestedItemType::Clothing));

        let item = to_clothing_item(&entry(record)).unwrap();
        assert_eq!(item.item_type, ItemType::SinglePiece);
        assert_eq!(item.category, WardrobeCategory::Coarse(CoarseCategory::Top));
        assert_eq!(item.name, "T-shirt");
        assert_eq!(item.piece_type.as_deref(), Some("tshirt"));
        assert!(item.pieces.is_none());
    }

    #[test]
    fn outfit_round_trip() {
        let raw = RawAnalysisResult::Outfit {
            category: "quotidien".to_string(),
            pieces: vec![piece("tshirt"), piece("jeans"), piece("shoes")],
        };

        let record = to_storage_record(&raw, RequestedItemType::Outfit).unwrap();
        assert_eq!(record.category, "quotidien");
        assert_eq!(record.items.len(), 3);
        // The discriminator stays off outfit payloads.
        assert_eq!(record.item_type, None);

        let item = to_clothing_item(&entry(record)).unwrap();
        assert_eq!(item.item_type, ItemType::Outfit);
        assert_eq!(
            item.category,
            WardrobeCategory::Label("full_outfit".to_string())
        );
        assert_eq!(item.occasion_tags.as_deref(), Some(&["quotidien".to_string()][..]));

        let pieces = item.pieces.unwrap();
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0].category, WardrobeCategory::Coarse(CoarseCategory::Top));
        assert_eq!(pieces[1].category, WardrobeCategory::Coarse(CoarseCategory::Bottom));
        assert_eq!(pieces[2].category, WardrobeCategory::Coarse(CoarseCategory::Shoes));
        assert_eq!(pieces[1].name, "Jean");
    }

    #[test]
    fn outfit_member_ids_are_stable() {
        let record = StorageRecord {
            category: "quotidien".to_string(),
            items: vec![piece("tshirt"), piece("jeans")],
            item_type: None,
        };
        let entry = entry(record);

        let first = to_clothing_item(&entry).unwrap().pieces.unwrap();
        let second = to_clothing_item(&entry).unwrap().pieces.unwrap();
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(first[1].id, second[1].id);
        assert_ne!(first[0].id, first[1].id);
    }

    #[test]
    fn clothing_request_rejects_outfit_analysis() {
        let raw = RawAnalysisResult::Outfit {
            category: "quotidien".to_string(),
            pieces: vec![piece("tshirt"), piece("jeans")],
        };

        let err = to_storage_record(&raw, RequestedItemType::Clothing).unwrap_err();
        assert!(matches!(err, WardrobeError::ContractMismatch { .. }));
    }

    #[test]
    fn clothing_request_rejects_multiple_pieces() {
        let raw = RawAnalysisResult::SinglePiece {
            category: "piece_unique".to_string(),
            pieces: vec![piece("tshirt"), piece("jeans")],
        };

        let err = to_storage_record(&raw, RequestedItemType::Clothing).unwrap_err();
        assert!(matches!(err, WardrobeError::ContractMismatch { .. }));
    }

    #[test]
    fn outfit_request_rejects_single_piece_analysis() {
        let raw = RawAnalysisResult::SinglePiece {
            category: "piece_unique".to_string(),
            pieces: vec![piece("tshirt")],
        };

        let err = to_storage_record(&raw, RequestedItemType::Outfit).unwrap_err();
        assert!(matches!(err, WardrobeError::ContractMismatch { .. }));
    }

    #[test]
    fn outfit_request_rejects_empty_pieces() {
        let raw = RawAnalysisResult::Outfit {
            category: "quotidien".to_string(),
            pieces: vec![],
        };

        assert!(to_storage_record(&raw, RequestedItemType::Outfit).is_err());
    }

    #[test]
    fn unknown_detailed_type_fails_loudly() {
        let record = StorageRecord {
            category: "piece_unique".to_string(),
            items: vec![piece("poncho")],
            item_type: Some(RequestedItemType::Clothing),
        };

        let err = to_clothing_item(&entry(record)).unwrap_err();
        match err {
            WardrobeError::UnknownCategory(s) => assert_eq!(s, "poncho"),
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
    }

    #[test]
    fn unknown_member_type_fails_inside_outfits_too() {
        let record = StorageRecord {
            category: "quotidien".to_string(),
            items: vec![piece("tshirt"), piece("poncho")],
            item_type: None,
        };

        assert!(matches!(
            to_clothing_item(&entry(record)).unwrap_err(),
            WardrobeError::UnknownCategory(_)
        ));
    }

    #[test]
    fn one_item_record_is_a_single_piece() {
        // An outfit analysis may come back with one garment; stored as-is, it
        // denormalizes to SINGLE_PIECE since itemType follows the item count.
        let record = StorageRecord {
            category: "quotidien".to_string(),
            items: vec![piece("dress")],
            item_type: None,
        };

        let item = to_clothing_item(&entry(record)).unwrap();
        assert_eq!(item.item_type, ItemType::SinglePiece);
        assert_eq!(item.category, WardrobeCategory::Coarse(CoarseCategory::Dress));
    }

    #[test]
    fn empty_record_is_rejected() {
        let record = StorageRecord {
            category: "quotidien".to_string(),
            items: vec![],
            item_type: None,
        };

        assert!(to_clothing_item(&entry(record)).is_err());
    }

    #[test]
    fn wire_encoding_carries_both_naming_conventions() {
        let mut tshirt = piece("tshirt");
        tshirt.style = Some("casual".to_string());
        let record = StorageRecord {
            category: "quotidien".to_string(),
            items: vec![tshirt, piece("jeans")],
            item_type: None,
        };

        let item = to_clothing_item(&entry(record)).unwrap();
        let wire = to_wire(&item).unwrap();

        assert_eq!(wire["imageUrl"], wire["image_url"]);
        assert_eq!(wire["createdAt"], wire["created_at"]);
        assert_eq!(wire["occasionTags"], wire["occasion_tags"]);

        // Member pieces get the duplication as well.
        let first = &wire["pieces"][0];
        assert_eq!(first["pieceType"], first["piece_type"]);
        assert_eq!(first["styleTags"], first["style_tags"]);
        assert_eq!(first["pieceType"], "tshirt");
    }
}
