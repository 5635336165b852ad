use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config,
    management::TokenManager,
    server::start_api_server,
    spotify::{SpotifyError, check_status, decode},
    success,
    types::{PkceToken, Token, TokenResponse},
    utils, warning,
};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs the complete OAuth 2.0 PKCE flow and stores the resulting token.
///
/// Generates a verifier/challenge pair, starts the local callback server,
/// opens the authorization page in the browser and waits up to 60 seconds
/// for the callback handler to deposit a token in `shared_state`. The token
/// is then written to the token cache.
///
/// # Errors
///
/// Fails if the client id is not configured, the callback never arrives or
/// the token cannot be persisted.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) -> crate::Res<()> {
    // generate PKCE verifier and challenge
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let client_id = config::spotify_client_id()?;

    // start API server
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = format!(
        "{spotify_auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        spotify_auth_url = &config::spotify_apiauth_url(),
        client_id = &client_id,
        redirect_uri = &config::spotify_redirect_uri(),
        code_challenge = code_challenge,
        scope = &config::spotify_scope().replace(' ', "%20")
    );

    // Store verifier in shared state before redirect
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier: code_verifier.clone(),
            token: None,
        });
    }

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let Some(token) = wait_for_token(shared_state).await else {
        return Err("Authentication failed or timed out.".into());
    };

    TokenManager::new(token)
        .persist()
        .await
        .map_err(|e| format!("Failed to save token to cache: {}", e))?;

    success!("Authentication successful!");
    Ok(())
}

async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref().and_then(|p| p.token.as_ref()) {
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges a refresh token for a new access token.
///
/// Spotify may omit the refresh token from the response; the returned
/// [`Token`] then has an empty `refresh_token` and the caller keeps its old one.
pub async fn refresh_token(
    client: &Client,
    token_url: &str,
    client_id: &str,
    refresh_token: &str,
) -> Result<Token, SpotifyError> {
    let res = client
        .post(token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
        ])
        .send()
        .await?;

    let res = check_status(res).await?;
    let json: TokenResponse = decode(res).await?;
    Ok(into_token(json))
}

/// Exchanges an authorization code and its PKCE verifier for a token.
pub async fn exchange_code_pkce(
    client: &Client,
    token_url: &str,
    client_id: &str,
    redirect_uri: &str,
    code: &str,
    verifier: &str,
) -> Result<Token, SpotifyError> {
    let res = client
        .post(token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri),
        ])
        .send()
        .await?;

    let res = check_status(res).await?;
    let json: TokenResponse = decode(res).await?;
    Ok(into_token(json))
}

fn into_token(res: TokenResponse) -> Token {
    Token {
        access_token: res.access_token,
        refresh_token: res.refresh_token.unwrap_or_default(),
        scope: res.scope,
        expires_in: res.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    }
}
