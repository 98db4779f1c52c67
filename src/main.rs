// src/main.rs
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use log::info;
use std::sync::Arc;

mod categories;
mod errors;
mod handlers;
mod models;
mod normalizer;
mod services;

use crate::handlers::{
    analyze_clothing, daily_recommendation, delete_wardrobe_entry, get_capture, get_wardrobe,
    get_wardrobe_entry, save_clothing,
};
use crate::services::{
    ImageProcessor, RecommendationService, RedisService, VisionService, WeatherService,
};

#[derive(Clone)]
pub struct AppState {
    redis_service: Arc<RedisService>,
    vision_service: Arc<VisionService>,
    image_processor: Arc<ImageProcessor>,
    weather_service: Arc<WeatherService>,
    recommendation_service: Arc<RecommendationService>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting vestiaire service...");

    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let openai_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set");

    // Initialize services
    let redis_service = Arc::new(
        RedisService::new(&redis_url)
            .await
            .expect("Failed to connect to Redis"),
    );
    let vision_service = Arc::new(VisionService::new(openai_key.clone()));
    let image_processor = Arc::new(ImageProcessor::new());
    let weather_service = Arc::new(WeatherService::new());
    let recommendation_service = Arc::new(RecommendationService::new(openai_key));

    let app_state = AppState {
        redis_service,
        vision_service,
        image_processor,
        weather_service,
        recommendation_service,
    };

    info!("Starting HTTP server on 0.0.0.0:8080");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .service(
                web::scope("/api/v1")
                    .route("/analyze", web::post().to(analyze_clothing))
                    .route("/captures/{image_id}", web::get().to(get_capture))
                    .route("/wardrobe/save", web::post().to(save_clothing))
                    .route(
                        "/wardrobe/entries/{entry_id}",
                        web::get().to(get_wardrobe_entry),
                    )
                    .route(
                        "/wardrobe/entries/{entry_id}",
                        web::delete().to(delete_wardrobe_entry),
                    )
                    .route("/wardrobe/{user_id}/items", web::get().to(get_wardrobe))
                    .route(
                        "/recommendations/daily",
                        web::post().to(daily_recommendation),
                    ),
            )
            .route("/health", web::get().to(health_check))
    })
    .bind("0.0.0.0:8080")?
    .run()
    .await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "vestiaire",
        "version": "0.1.0"
    }))
}
