// src/categories.rs
//
// Dictionary mapping the detailed category strings the vision model may emit
// to their French display label and coarse filter category. The key domain is
// closed: the analysis prompt only allows these piece types, so a miss here
// means either a prompt drift or a dictionary gap, and must surface as an
// error instead of landing in a wrong filter bucket.
use crate::errors::WardrobeError;
use crate::models::CoarseCategory;

/// Top-level category label given to outfit entries in the UI model.
pub const OUTFIT_LABEL: &str = "full_outfit";

/// French display name for outfit entries without an AI-provided name.
pub const OUTFIT_DISPLAY_NAME: &str = "Tenue complète";

fn lookup(detailed: &str) -> Option<(&'static str, CoarseCategory)> {
    use CoarseCategory::*;

    let entry = match detailed {
        // Hauts
        "tshirt" => ("T-shirt", Top),
        "shirt" => ("Chemise", Top),
        "sweater" => ("Pull", Top),
        "pullover" => ("Pull-over", Top),
        "hoodie" => ("Sweat à capuche", Top),

        // Bas
        "pants" => ("Pantalon", Bottom),
        "jeans" => ("Jean", Bottom),
        "shorts" => ("Short", Bottom),
        "skirt" => ("Jupe", Bottom),

        // Vêtements extérieurs
        "jacket" => ("Veste", Outerwear),
        "blazer" => ("Blazer", Outerwear),
        "coat" => ("Manteau", Outerwear),
        "vest" => ("Gilet", Outerwear),

        "dress" => ("Robe", Dress),

        // Chaussures
        "shoes" => ("Chaussures", Shoes),
        "sneakers" => ("Baskets", Shoes),
        "boots" => ("Bottes", Shoes),
        "sandals" => ("Sandales", Shoes),

        // Accessoires
        "bag" => ("Sac", Accessories),
        "belt" => ("Ceinture", Accessories),
        "hat" => ("Chapeau", Accessories),
        "scarf" => ("Écharpe", Accessories),
        "jewelry" => ("Bijoux", Accessories),

        _ => return None,
    };

    Some(entry)
}

/// French display label for a detailed category.
pub fn resolve_display_label(detailed: &str) -> Result<&'static str, WardrobeError> {
    lookup(detailed)
        .map(|(label, _)| label)
        .ok_or_else(|| WardrobeError::UnknownCategory(detailed.to_string()))
}

/// Coarse filter category for a detailed category.
pub fn resolve_main_category(detailed: &str) -> Result<CoarseCategory, WardrobeError> {
    lookup(detailed)
        .map(|(_, main)| main)
        .ok_or_else(|| WardrobeError::UnknownCategory(detailed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_entries_resolve() {
        let cases = [
            ("tshirt", "T-shirt", CoarseCategory::Top),
            ("shirt", "Chemise", CoarseCategory::Top),
            ("sweater", "Pull", CoarseCategory::Top),
            ("pullover", "Pull-over", CoarseCategory::Top),
            ("pants", "Pantalon", CoarseCategory::Bottom),
            ("jeans", "Jean", CoarseCategory::Bottom),
            ("shorts", "Short", CoarseCategory::Bottom),
            ("skirt", "Jupe", CoarseCategory::Bottom),
            ("jacket", "Veste", CoarseCategory::Outerwear),
            ("coat", "Manteau", CoarseCategory::Outerwear),
        ];

        for (detailed, label, main) in cases {
            assert_eq!(resolve_display_label(detailed).unwrap(), label);
            assert_eq!(resolve_main_category(detailed).unwrap(), main);
        }
    }

    #[test]
    fn covers_every_piece_type_the_prompt_allows() {
        let prompt_types = [
            "tshirt", "shirt", "sweater", "pullover", "hoodie", "jacket", "blazer", "coat",
            "vest", "pants", "jeans", "shorts", "skirt", "dress", "shoes", "sneakers", "boots",
            "sandals", "bag", "belt", "hat", "scarf", "jewelry",
        ];

        for detailed in prompt_types {
            assert!(
                resolve_main_category(detailed).is_ok(),
                "missing dictionary entry for {detailed}"
            );
        }
    }

    #[test]
    fn unknown_category_fails_without_default() {
        let err = resolve_display_label("poncho").unwrap_err();
        match err {
            WardrobeError::UnknownCategory(s) => assert_eq!(s, "poncho"),
            other => panic!("expected UnknownCategory, got {other:?}"),
        }

        assert!(resolve_main_category("poncho").is_err());
        // The outfit label is not a garment type and must not resolve either.
        assert!(resolve_main_category(OUTFIT_LABEL).is_err());
    }
}
