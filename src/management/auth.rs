use std::path::PathBuf;

use chrono::Utc;

use crate::{config, types::Token};

/// Seconds before nominal expiry at which a token counts as expired.
pub const EXPIRY_MARGIN_SECS: u64 = 240;

#[derive(Debug, Clone)]
pub struct TokenManager {
    token: Token,
    path: Option<PathBuf>,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager {
            token,
            path: Some(Self::token_path()),
        }
    }

    /// A manager that never touches the token cache on disk.
    pub fn in_memory(token: Token) -> Self {
        TokenManager { token, path: None }
    }

    pub async fn load() -> Result<Self, String> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self {
            token,
            path: Some(path),
        })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        is_expired_at(&self.token, now)
    }

    /// Replaces the held token, keeping the old refresh token if the new one has none.
    pub fn replace(&mut self, mut token: Token) {
        if token.refresh_token.is_empty() {
            token.refresh_token = self.token.refresh_token.clone();
        }
        self.token = token;
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}

pub fn is_expired_at(token: &Token, now: u64) -> bool {
    let expires_at = token.obtained_at + token.expires_in;
    now + EXPIRY_MARGIN_SECS >= expires_at
}
