// src/handlers.rs
use crate::{AppState, errors::WardrobeError, models::*, normalizer};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::TryStreamExt;
use log::info;
use uuid::Uuid;

/// Multipart analysis endpoint: a `file` part with the photo, plus an
/// optional `item_type` text part. An absent `item_type` means an outfit
/// capture, per the existing contract.
pub async fn analyze_clothing(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, WardrobeError> {
    let mut image_data: Vec<u8> = Vec::new();
    let mut filename = String::from("photo.jpg");
    let mut content_type = String::from("image/jpeg");
    let mut requested = RequestedItemType::Outfit;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| WardrobeError::Validation(e.to_string()))?
    {
        let name = field.name().to_string();

        match name.as_str() {
            "file" => {
                if let Some(f) = field.content_disposition().get_filename() {
                    filename = f.to_string();
                }
                if let Some(ct) = field.content_type() {
                    content_type = ct.to_string();
                }
                while let Some(chunk) = field
                    .try_next()
                    .await
                    .map_err(|e| WardrobeError::Validation(e.to_string()))?
                {
                    image_data.extend_from_slice(&chunk);
                }
            }
            "item_type" => {
                let mut buf = Vec::new();
                while let Some(chunk) = field
                    .try_next()
                    .await
                    .map_err(|e| WardrobeError::Validation(e.to_string()))?
                {
                    buf.extend_from_slice(&chunk);
                }
                let text = String::from_utf8(buf)
                    .map_err(|_| WardrobeError::Validation("item_type must be UTF-8".to_string()))?;
                requested = text.trim().parse()?;
            }
            _ => {
                // Drain unknown parts so the stream can advance.
                while field
                    .try_next()
                    .await
                    .map_err(|e| WardrobeError::Validation(e.to_string()))?
                    .is_some()
                {}
            }
        }
    }

    if image_data.is_empty() {
        return Err(WardrobeError::Validation("No image file provided".to_string()));
    }

    data.image_processor.validate_image(&image_data)?;
    let processed = data.image_processor.prepare_for_analysis(&image_data)?;

    // The original capture is kept for display; the vision model gets the
    // downscaled copy.
    let capture = CaptureUpload {
        id: Uuid::new_v4(),
        filename,
        content_type,
        size: image_data.len(),
        data: image_data,
        uploaded_at: chrono::Utc::now(),
    };
    data.redis_service.store_capture(&capture).await?;

    let analysis = data.vision_service.analyze_image(&processed, requested).await?;

    info!(
        "analyzed capture {} as {} \"{}\" ({} pieces)",
        capture.id,
        analysis.type_label(),
        analysis.category(),
        analysis.pieces().len()
    );

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "image_id": capture.id,
        "item_type": requested,
        "analysis": analysis
    })))
}

pub async fn get_capture(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, WardrobeError> {
    let capture = data.redis_service.get_capture(&path.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .content_type(capture.content_type)
        .body(capture.data))
}

pub async fn save_clothing(
    body: web::Json<SaveClothingRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, WardrobeError> {
    let req = body.into_inner();
    // Omitted discriminator means an outfit save.
    let requested = req.item_type.unwrap_or(RequestedItemType::Outfit);

    let record = normalizer::to_storage_record(&req.analysis_result, requested)?;
    let entry = WardrobeEntry {
        id: Uuid::new_v4(),
        user_id: req.user_id,
        image_url: req.image_url,
        record,
        created_at: chrono::Utc::now(),
    };

    data.redis_service.store_entry(&entry).await?;

    let message = match requested {
        RequestedItemType::Clothing => "Pièce sauvegardée avec succès",
        RequestedItemType::Outfit => "Tenue sauvegardée avec succès",
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "entry_id": entry.id,
        "message": message
    })))
}

pub async fn get_wardrobe(
    path: web::Path<Uuid>,
    query: web::Query<WardrobeQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, WardrobeError> {
    let user_id = path.into_inner();
    let entries = data.redis_service.list_entries(&user_id).await?;

    let mut items = Vec::with_capacity(entries.len());
    for entry in &entries {
        let item = normalizer::to_clothing_item(entry)?;

        if let Some(filter) = query.category {
            // Outfits span several garment types and never match a coarse filter.
            match &item.category {
                WardrobeCategory::Coarse(coarse) if *coarse == filter => {}
                _ => continue,
            }
        }

        items.push(normalizer::to_wire(&item)?);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "items": items,
        "count": items.len()
    })))
}

pub async fn get_wardrobe_entry(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, WardrobeError> {
    let entry_id = path.into_inner();

    let entry = data.redis_service.get_entry(&entry_id).await?;
    let item = normalizer::to_clothing_item(&entry)?;

    Ok(HttpResponse::Ok().json(normalizer::to_wire(&item)?))
}

pub async fn delete_wardrobe_entry(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, WardrobeError> {
    let entry_id = path.into_inner();

    let entry = data.redis_service.get_entry(&entry_id).await?;
    data.redis_service.delete_entry(&entry).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "entry_id": entry_id
    })))
}

pub async fn daily_recommendation(
    body: web::Json<DailyRecommendationRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, WardrobeError> {
    let req = body.into_inner();

    let weather = data.weather_service.fetch(&req.city).await?;

    let entries = data.redis_service.list_entries(&req.user_id).await?;
    let mut wardrobe = Vec::with_capacity(entries.len());
    for entry in &entries {
        wardrobe.push(normalizer::to_clothing_item(entry)?);
    }

    let recent = data.redis_service.recent_recommendations(&req.user_id).await?;

    let recommendation = data
        .recommendation_service
        .daily_outfit(&weather, &wardrobe, req.user_needs.as_deref(), &recent)
        .await?;

    data.redis_service
        .push_recent_recommendation(&req.user_id, &recommendation.entry_ids)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "weather": weather,
        "recommendation": recommendation
    })))
}
