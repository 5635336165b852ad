use chrono::Utc;
use serde_json::{Value, json};
use sporvid::{
    management::{SpotifySession, TokenManager},
    matching::{ArtistMatcher, ArtistQuery},
    spotify::{
        SpotifyError, playlist,
        search::{self, SelectionPolicy},
    },
    types::Token,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string_contains, header, method, path, query_param},
};

fn token(access: &str, obtained_at: u64) -> Token {
    Token {
        access_token: access.to_string(),
        refresh_token: "refresh-1".to_string(),
        scope: "playlist-modify-private".to_string(),
        expires_in: 3600,
        obtained_at,
    }
}

fn session(server: &MockServer, token: Token) -> SpotifySession {
    SpotifySession::new(
        TokenManager::in_memory(token),
        server.uri(),
        format!("{}/api/token", server.uri()),
        "client-123",
    )
}

fn fresh_session(server: &MockServer) -> SpotifySession {
    session(server, token("valid-token", Utc::now().timestamp() as u64))
}

fn track_json(id: &str, name: &str, artists: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "uri": format!("spotify:track:{}", id),
        "artists": artists
            .iter()
            .enumerate()
            .map(|(i, a)| json!({ "id": format!("{}-{}", id, i), "name": a }))
            .collect::<Vec<_>>(),
        "popularity": 80
    })
}

async fn mount_search(server: &MockServer, items: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("type", "track"))
        .and(query_param("limit", "10"))
        .and(header("authorization", "Bearer valid-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": { "items": items, "total": 2 }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_tracks_sends_song_and_artist() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "bad guy Billie Eilish"))
        .and(query_param("type", "track"))
        .and(header("authorization", "Bearer valid-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": { "items": [track_json("t1", "bad guy", &["Billie Eilish"])] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = fresh_session(&server);
    let tracks = search::search_tracks(&mut session, "Billie Eilish", "bad guy")
        .await
        .unwrap();

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].uri, "spotify:track:t1");
    assert_eq!(tracks[0].artist_names(), "Billie Eilish");
}

#[tokio::test]
async fn test_get_song_uri_prefers_matching_artist() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        vec![
            track_json("cover", "Hotline Bling", &["Someone Else"]),
            track_json("orig", "Hotline Bling", &["Drake"]),
        ],
    )
    .await;

    let mut session = fresh_session(&server);
    let query = ArtistQuery::new("Drake").unwrap();
    let selected = search::get_song_uri(
        &mut session,
        &ArtistMatcher::default(),
        SelectionPolicy::Strict,
        &query,
        "Hotline Bling",
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(selected.uri, "spotify:track:orig");
    assert!(selected.matched);
    assert_eq!(selected.score, Some(1.0));
}

#[tokio::test]
async fn test_get_song_uri_matches_compound_artists() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        vec![
            track_json("lovely", "lovely", &["Billie Eilish", "Khalid"]),
            track_json("other", "lovely", &["Justin Bieber"]),
        ],
    )
    .await;

    let mut session = fresh_session(&server);
    let query = ArtistQuery::new("Billie Eilish").unwrap();
    let selected = search::get_song_uri(
        &mut session,
        &ArtistMatcher::default(),
        SelectionPolicy::Strict,
        &query,
        "lovely",
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(selected.uri, "spotify:track:lovely");
    assert_eq!(selected.artists, "Billie Eilish, Khalid");
}

#[tokio::test]
async fn test_selection_policy_when_nothing_matches() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        vec![
            track_json("a", "Song", &["Justin Bieber"]),
            track_json("b", "Song", &["Taylor Swift"]),
        ],
    )
    .await;

    let mut session = fresh_session(&server);
    let query = ArtistQuery::new("Drake").unwrap();
    let matcher = ArtistMatcher::default();

    let lenient =
        search::get_song_uri(&mut session, &matcher, SelectionPolicy::Lenient, &query, "Song")
            .await
            .unwrap()
            .unwrap();
    assert_eq!(lenient.uri, "spotify:track:a");
    assert!(!lenient.matched);
    assert_eq!(lenient.score, None);

    let strict =
        search::get_song_uri(&mut session, &matcher, SelectionPolicy::Strict, &query, "Song")
            .await
            .unwrap();
    assert_eq!(strict, None);
}

#[tokio::test]
async fn test_no_results_selects_nothing() {
    let server = MockServer::start().await;
    mount_search(&server, vec![]).await;

    let mut session = fresh_session(&server);
    let query = ArtistQuery::new("Drake").unwrap();
    let selected = search::get_song_uri(
        &mut session,
        &ArtistMatcher::default(),
        SelectionPolicy::Lenient,
        &query,
        "Nothing",
    )
    .await
    .unwrap();

    assert_eq!(selected, None);
}

#[tokio::test]
async fn test_search_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "status": 401, "message": "The access token expired" }
        })))
        .mount(&server)
        .await;

    let mut session = fresh_session(&server);
    let err = search::search_tracks(&mut session, "Drake", "Song")
        .await
        .unwrap_err();

    match err {
        SpotifyError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("access token expired"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .and(body_string_contains("client_id=client-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "valid-token",
            "token_type": "Bearer",
            "scope": "playlist-modify-private",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_search(&server, vec![track_json("t", "Song", &["Drake"])]).await;

    let mut session = session(&server, token("stale-token", 0));

    search::search_tracks(&mut session, "Drake", "Song").await.unwrap();
    // second call reuses the refreshed token
    search::search_tracks(&mut session, "Drake", "Song").await.unwrap();

    let current = session.tokens().current_token();
    assert_eq!(current.access_token, "valid-token");
    // response carried no refresh token, the old one is kept
    assert_eq!(current.refresh_token, "refresh-1");
}

#[tokio::test]
async fn test_failed_refresh_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&server)
        .await;

    let mut session = session(&server, token("stale-token", 0));
    let err = search::search_tracks(&mut session, "Drake", "Song")
        .await
        .unwrap_err();

    assert!(matches!(err, SpotifyError::Status { status: 400, .. }));
}

#[tokio::test]
async fn test_create_playlist_is_private() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/user-1/playlists"))
        .and(header("authorization", "Bearer valid-token"))
        .and(body_json(json!({
            "name": "From videos",
            "description": "weekend",
            "public": false,
            "collaborative": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pl-1",
            "name": "From videos",
            "description": "weekend",
            "public": false,
            "collaborative": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = fresh_session(&server);
    let id = playlist::create(&mut session, "user-1", "From videos", "weekend")
        .await
        .unwrap();

    assert_eq!(id, "pl-1");
}

#[tokio::test]
async fn test_add_tracks_in_chunks() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/playlists/pl-1/tracks"))
        .and(header("authorization", "Bearer valid-token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "snapshot_id": "snap"
        })))
        .expect(3)
        .mount(&server)
        .await;

    let uris: Vec<String> = (0..250).map(|i| format!("spotify:track:{}", i)).collect();
    let mut session = fresh_session(&server);
    let snapshots = playlist::add_tracks(&mut session, "pl-1", &uris).await.unwrap();

    assert_eq!(snapshots.len(), 3);

    let requests = server.received_requests().await.unwrap();
    let sizes: Vec<usize> = requests
        .iter()
        .map(|r| {
            let body: Value = serde_json::from_slice(&r.body).unwrap();
            body["uris"].as_array().unwrap().len()
        })
        .collect();
    assert_eq!(sizes, vec![100, 100, 50]);
}

#[tokio::test]
async fn test_add_tracks_failure_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/playlists/missing/tracks"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&server)
        .await;

    let mut session = fresh_session(&server);
    let err = playlist::add_tracks(&mut session, "missing", &["spotify:track:1".to_string()])
        .await
        .unwrap_err();

    assert!(matches!(err, SpotifyError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_track_count() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/playlists/pl-1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 7 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/playlists/pl-2/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let mut session = fresh_session(&server);
    assert_eq!(playlist::track_count(&mut session, "pl-1").await.unwrap(), Some(7));
    assert_eq!(playlist::track_count(&mut session, "pl-2").await.unwrap(), None);
}

#[tokio::test]
async fn test_undecodable_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/playlists/pl-1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": "many" })))
        .mount(&server)
        .await;

    let mut session = fresh_session(&server);
    let err = search::search_tracks(&mut session, "Drake", "Song")
        .await
        .unwrap_err();
    assert!(matches!(err, SpotifyError::InvalidResponse(_)), "got {err:?}");

    let err = playlist::track_count(&mut session, "pl-1").await.unwrap_err();
    assert!(matches!(err, SpotifyError::InvalidResponse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_undecodable_refresh_response_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let mut session = session(&server, token("stale-token", 0));
    let err = session.access_token().await.unwrap_err();
    assert!(matches!(err, SpotifyError::InvalidResponse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_expired_token_without_refresh_token_is_missing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut stale = token("stale-token", 0);
    stale.refresh_token.clear();
    let mut session = session(&server, stale);

    let err = session.access_token().await.unwrap_err();
    assert!(matches!(err, SpotifyError::MissingToken(_)), "got {err:?}");
}
