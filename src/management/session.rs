use reqwest::Client;

use crate::{
    config, debug,
    management::TokenManager,
    spotify::{self, SpotifyError},
};

/// Authenticated context passed explicitly to every Spotify call.
///
/// Holds one HTTP client and the cached token for the lifetime of a command.
/// [`SpotifySession::access_token`] refreshes the token when it is about to
/// expire instead of re-authenticating per request.
pub struct SpotifySession {
    http: Client,
    api_url: String,
    token_url: String,
    client_id: String,
    tokens: TokenManager,
}

impl SpotifySession {
    pub fn new(
        tokens: TokenManager,
        api_url: impl Into<String>,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token_url: token_url.into(),
            client_id: client_id.into(),
            tokens,
        }
    }

    /// Builds a session from the cached token and the environment configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::MissingToken`] when no token has been stored
    /// yet and [`SpotifyError::Config`] when the client id is not configured.
    pub async fn from_env() -> Result<Self, SpotifyError> {
        let tokens = TokenManager::load().await.map_err(|e| {
            SpotifyError::MissingToken(format!("{}. Please run sporvid auth", e))
        })?;

        Ok(Self::new(
            tokens,
            config::spotify_apiurl(),
            config::spotify_apitoken_url(),
            config::spotify_client_id()?,
        ))
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub async fn access_token(&mut self) -> Result<String, SpotifyError> {
        if self.tokens.is_expired() {
            debug!("Access token expired, refreshing");
            let refresh = self.tokens.current_token().refresh_token.clone();
            if refresh.is_empty() {
                return Err(SpotifyError::MissingToken(
                    "no refresh token stored, run sporvid auth".to_string(),
                ));
            }

            let token = spotify::auth::refresh_token(
                &self.http,
                &self.token_url,
                &self.client_id,
                &refresh,
            )
            .await?;
            self.tokens.replace(token);
            self.tokens.persist().await.map_err(SpotifyError::TokenRefresh)?;
        }

        Ok(self.tokens.current_token().access_token.clone())
    }
}
