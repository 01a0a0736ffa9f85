//! Redis-backed session store

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use std::time::Duration;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    session::{SessionData, SessionStore},
};

#[derive(Clone)]
pub struct RedisSessionStore {
    client: Client,
}

fn session_key(id: Uuid) -> String {
    format!("session:{}", id)
}

impl RedisSessionStore {
    /// Open a client and check the server answers PING
    pub async fn new(url: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Session(format!("Failed to create Redis client: {}", e)))?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Session(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Session(format!("Redis connection test failed: {}", e)))?;

        Ok(Self { client })
    }

    async fn connection(&self) -> AppResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Session(format!("Failed to get Redis connection: {}", e)))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: Uuid) -> AppResult<Option<SessionData>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(session_key(id)).await?;

        match raw {
            Some(json) => match serde_json::from_str(&json) {
                Ok(data) => Ok(Some(data)),
                Err(e) => {
                    // Unreadable payloads are treated as a missing session
                    tracing::warn!("Discarding unreadable session {}: {}", id, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn save(&self, id: Uuid, data: &SessionData, ttl: Duration) -> AppResult<()> {
        let json = serde_json::to_string(data)
            .map_err(|e| AppError::Internal(format!("Failed to encode session: {}", e)))?;
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(session_key(id), json, ttl.as_secs().max(1))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_layout() {
        let id = Uuid::nil();
        assert_eq!(
            session_key(id),
            "session:00000000-0000-0000-0000-000000000000"
        );
    }
}
