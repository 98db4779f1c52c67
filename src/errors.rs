// src/errors.rs
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WardrobeError {
    #[error("contract mismatch: requested \"{requested}\" but analysis returned {received}")]
    ContractMismatch { requested: String, received: String },

    #[error("unknown clothing category: \"{0}\"")]
    UnknownCategory(String),

    #[error("Redis error: {0}")]
    Redis(String),

    #[error("Vision service error: {0}")]
    Vision(String),

    #[error("Weather service error: {0}")]
    Weather(String),

    #[error("Recommendation service error: {0}")]
    Recommendation(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ResponseError for WardrobeError {
    fn error_response(&self) -> HttpResponse {
        match self {
            WardrobeError::ContractMismatch { .. } => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "error": "Contract mismatch",
                    "message": self.to_string()
                }))
            }
            WardrobeError::UnknownCategory(_) => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "error": "Unknown category",
                    "message": self.to_string()
                }))
            }
            WardrobeError::Redis(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Database error",
                "message": self.to_string()
            })),
            WardrobeError::Vision(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": "Le service d'analyse n'est pas disponible. Veuillez réessayer plus tard.",
                "message": self.to_string()
            })),
            WardrobeError::Weather(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": "Weather service error",
                "message": self.to_string()
            })),
            WardrobeError::Recommendation(_) => {
                HttpResponse::ServiceUnavailable().json(serde_json::json!({
                    "error": "Recommendation service error",
                    "message": self.to_string()
                }))
            }
            WardrobeError::ImageProcessing(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "Image processing error",
                    "message": self.to_string()
                }))
            }
            WardrobeError::Serialization(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Data processing error",
                    "message": self.to_string()
                }))
            }
            WardrobeError::Validation(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Validation error",
                "message": self.to_string()
            })),
        }
    }
}
