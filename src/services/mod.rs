// src/services/mod.rs
pub mod image_processor;
pub mod recommendation_service;
pub mod redis_service;
pub mod vision_service;
pub mod weather_service;

pub use image_processor::ImageProcessor;
pub use recommendation_service::RecommendationService;
pub use redis_service::RedisService;
pub use vision_service::VisionService;
pub use weather_service::WeatherService;
