// src/services/redis_service.rs
use redis::{AsyncCommands, Client, aio::Connection};
use uuid::Uuid;

use crate::errors::WardrobeError;
use crate::models::{CaptureUpload, WardrobeEntry};

// Captures are transient: the app either saves the analysis within the
// session or abandons it.
const CAPTURE_TTL_SECS: usize = 86400;

// How many past recommendations are replayed to the model to avoid repeats.
const RECENT_RECOMMENDATION_LIMIT: isize = 10;

pub struct RedisService {
    client: Client,
}

impl RedisService {
    pub async fn new(redis_url: &str) -> Result<Self, WardrobeError> {
        let client = Client::open(redis_url).map_err(|e| WardrobeError::Redis(e.to_string()))?;

        // Test connection
        let mut conn = client
            .get_async_connection()
            .await
            .map_err(|e| WardrobeError::Redis(e.to_string()))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| WardrobeError::Redis(e.to_string()))?;

        Ok(Self { client })
    }

    async fn conn(&self) -> Result<Connection, WardrobeError> {
        self.client
            .get_async_connection()
            .await
            .map_err(|e| WardrobeError::Redis(e.to_string()))
    }

    pub async fn store_capture(&self, capture: &CaptureUpload) -> Result<(), WardrobeError> {
        let mut conn = self.conn().await?;

        let key = format!("capture:{}", capture.id);
        let value = serde_json::to_string(capture)
            .map_err(|e| WardrobeError::Serialization(e.to_string()))?;

        conn.set_ex::<_, _, ()>(&key, value, CAPTURE_TTL_SECS)
            .await
            .map_err(|e| WardrobeError::Redis(e.to_string()))?;

        Ok(())
    }

    pub async fn get_capture(&self, capture_id: &Uuid) -> Result<CaptureUpload, WardrobeError> {
        let mut conn = self.conn().await?;

        let key = format!("capture:{}", capture_id);
        let value: String = conn
            .get(&key)
            .await
            .map_err(|e| WardrobeError::Redis(format!("Capture not found: {}", e)))?;

        serde_json::from_str(&value).map_err(|e| WardrobeError::Serialization(e.to_string()))
    }

    /// Persists a wardrobe entry and indexes it under its owner. Entries are
    /// the system of record, so no TTL.
    pub async fn store_entry(&self, entry: &WardrobeEntry) -> Result<(), WardrobeError> {
        let mut conn = self.conn().await?;

        let key = format!("entry:{}", entry.id);
        let value = serde_json::to_string(entry)
            .map_err(|e| WardrobeError::Serialization(e.to_string()))?;

        conn.set::<_, _, ()>(&key, value)
            .await
            .map_err(|e| WardrobeError::Redis(e.to_string()))?;

        let user_key = format!("user:{}:entries", entry.user_id);
        conn.sadd::<_, _, ()>(&user_key, entry.id.to_string())
            .await
            .map_err(|e| WardrobeError::Redis(e.to_string()))?;

        Ok(())
    }

    pub async fn get_entry(&self, entry_id: &Uuid) -> Result<WardrobeEntry, WardrobeError> {
        let mut conn = self.conn().await?;

        let key = format!("entry:{}", entry_id);
        let value: String = conn
            .get(&key)
            .await
            .map_err(|e| WardrobeError::Redis(format!("Entry not found: {}", e)))?;

        serde_json::from_str(&value).map_err(|e| WardrobeError::Serialization(e.to_string()))
    }

    pub async fn delete_entry(&self, entry: &WardrobeEntry) -> Result<(), WardrobeError> {
        let mut conn = self.conn().await?;

        let key = format!("entry:{}", entry.id);
        conn.del::<_, ()>(&key)
            .await
            .map_err(|e| WardrobeError::Redis(e.to_string()))?;

        let user_key = format!("user:{}:entries", entry.user_id);
        conn.srem::<_, _, ()>(&user_key, entry.id.to_string())
            .await
            .map_err(|e| WardrobeError::Redis(e.to_string()))?;

        Ok(())
    }

    /// All wardrobe entries for a user. Index members whose entry has been
    /// deleted out from under them are skipped.
    pub async fn list_entries(&self, user_id: &Uuid) -> Result<Vec<WardrobeEntry>, WardrobeError> {
        let mut conn = self.conn().await?;

        let user_key = format!("user:{}:entries", user_id);
        let ids: Vec<String> = conn
            .smembers(&user_key)
            .await
            .map_err(|e| WardrobeError::Redis(e.to_string()))?;

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            let key = format!("entry:{}", id);
            let value: Option<String> = conn
                .get(&key)
                .await
                .map_err(|e| WardrobeError::Redis(e.to_string()))?;

            if let Some(value) = value {
                let entry: WardrobeEntry = serde_json::from_str(&value)
                    .map_err(|e| WardrobeError::Serialization(e.to_string()))?;
                entries.push(entry);
            }
        }

        Ok(entries)
    }

    pub async fn recent_recommendations(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<String>, WardrobeError> {
        let mut conn = self.conn().await?;

        let key = format!("user:{}:recent_recommendations", user_id);
        conn.lrange(&key, 0, RECENT_RECOMMENDATION_LIMIT - 1)
            .await
            .map_err(|e| WardrobeError::Redis(e.to_string()))
    }

    pub async fn push_recent_recommendation(
        &self,
        user_id: &Uuid,
        entry_ids: &[Uuid],
    ) -> Result<(), WardrobeError> {
        if entry_ids.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn().await?;

        let key = format!("user:{}:recent_recommendations", user_id);
        let ids: Vec<String> = entry_ids.iter().map(|id| id.to_string()).collect();
        conn.lpush::<_, _, ()>(&key, ids)
            .await
            .map_err(|e| WardrobeError::Redis(e.to_string()))?;
        conn.ltrim::<_, ()>(&key, 0, RECENT_RECOMMENDATION_LIMIT - 1)
            .await
            .map_err(|e| WardrobeError::Redis(e.to_string()))?;

        Ok(())
    }
}
