//! End-to-end token lifecycle scenarios with the real JWT decoder and
//! file-backed storage.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use pretty_assertions::assert_eq;
use std::sync::Arc;

use oauth_token_integration::{
    FileTokenStorage, JwtClaimsDecoder, MockClock, RedirectPayload, TokenConfig,
    TokenConfigOverrides, TokenManager, TokenStorage,
};

const T: i64 = 1_700_000_000;

fn make_jwt(payload: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{payload}.")
}

fn persisted_config() -> TokenConfig {
    TokenConfig {
        persist_to_storage: true,
        ..TokenConfig::default()
    }
}

fn file_manager(
    dir: &std::path::Path,
    now: i64,
) -> (
    TokenManager<JwtClaimsDecoder, FileTokenStorage, Arc<MockClock>>,
    Arc<MockClock>,
) {
    let clock = Arc::new(MockClock::new(now));
    let manager = TokenManager::with_clock(
        persisted_config(),
        JwtClaimsDecoder::new(),
        FileTokenStorage::new(dir),
        Arc::clone(&clock),
    );
    (manager, clock)
}

#[test]
fn derive_validate_and_expire_with_real_decoder() {
    let dir = tempfile::tempdir().unwrap();
    let (manager, clock) = file_manager(dir.path(), T);

    let url = format!(
        "https://app.example.com/callback#id_token={}&token_type=bearer",
        make_jwt(serde_json::json!({
            "iss": "https://issuer.example.com",
            "sub": "user-1",
            "iat": T - 10,
            "exp": T - 10 + 3600,
        }))
    );
    let payload = RedirectPayload::from_url_str(&url).unwrap();

    let state = manager.derive_token(&payload).unwrap().unwrap();
    assert_eq!(state.expires_at, T + 3600);
    assert_eq!(state.token_type, "bearer");
    assert_eq!(state.claims.sub, Some("user-1".to_string()));

    manager.set_token(Some(state)).unwrap();

    let header = manager.get_authorization_header().unwrap();
    assert!(header.starts_with("Bearer ey"));

    // 3600 - (60 + 30) seconds until renewal is due
    assert_eq!(manager.get_token_expiration_time().unwrap(), 3510);

    assert!(manager.is_token_valid().unwrap());
    clock.set(T + 3539);
    assert!(manager.is_token_valid().unwrap());
    clock.set(T + 3541);
    assert!(!manager.is_token_valid().unwrap());
}

#[test]
fn token_persists_across_manager_instances() {
    let dir = tempfile::tempdir().unwrap();

    {
        let (manager, _) = file_manager(dir.path(), T);
        let payload = RedirectPayload::from_pairs([(
            "id_token",
            make_jwt(serde_json::json!({"iat": T, "exp": T + 3600})),
        )]);
        let state = manager.derive_token(&payload).unwrap().unwrap();
        manager.set_token(Some(state)).unwrap();
    }

    // A fresh "session" lazily loads the mirrored state
    let (manager, _) = file_manager(dir.path(), T);
    let loaded = manager.get_token().unwrap().unwrap();
    assert_eq!(loaded.expires_at, T + 3600);
    assert_eq!(loaded.token_type, "Bearer");

    manager.remove_token().unwrap();
    assert!(FileTokenStorage::new(dir.path())
        .get("oauthAccessToken")
        .unwrap()
        .is_none());

    // And the next session finds nothing
    let (manager, _) = file_manager(dir.path(), T);
    assert!(manager.get_token().unwrap().is_none());
    assert_eq!(manager.get_authorization_header().unwrap(), "");
}

#[test]
fn memory_stays_authoritative_after_first_load() {
    let dir = tempfile::tempdir().unwrap();

    {
        let (manager, _) = file_manager(dir.path(), T);
        let payload = RedirectPayload::from_pairs([(
            "id_token",
            make_jwt(serde_json::json!({"iat": T, "exp": T + 3600})),
        )]);
        let state = manager.derive_token(&payload).unwrap().unwrap();
        manager.set_token(Some(state)).unwrap();
    }

    let (manager, _) = file_manager(dir.path(), T);
    assert!(manager.get_token().unwrap().is_some());

    // The durable entry vanishes out-of-band; the slot is unaffected
    std::fs::remove_file(dir.path().join("oauthAccessToken.json")).unwrap();
    assert!(manager.get_token().unwrap().is_some());
    assert!(manager.is_token_valid().unwrap());
}

#[test]
fn unwritable_storage_degrades_to_memory_only() {
    // Root the store at a path occupied by a regular file so the probe fails
    let file = tempfile::NamedTempFile::new().unwrap();
    let storage = FileTokenStorage::new(file.path());
    assert!(!storage.is_available());

    let clock = Arc::new(MockClock::new(T));
    let manager = TokenManager::with_clock(
        persisted_config(),
        JwtClaimsDecoder::new(),
        storage,
        Arc::clone(&clock),
    );

    let payload = RedirectPayload::from_pairs([(
        "id_token",
        make_jwt(serde_json::json!({"iat": T, "exp": T + 3600})),
    )]);
    let state = manager.derive_token(&payload).unwrap().unwrap();

    // Memory-only, but the full lifecycle still works
    manager.set_token(Some(state)).unwrap();
    assert!(manager.is_token_valid().unwrap());
    manager.remove_token().unwrap();
    assert!(manager.get_token().unwrap().is_none());
}

#[test]
fn reconfigured_parameter_names_drive_derivation() {
    let dir = tempfile::tempdir().unwrap();
    let (mut manager, _) = file_manager(dir.path(), T);

    manager.configure(TokenConfigOverrides {
        redirect_params: Some(oauth_token_integration::RedirectParamOverrides {
            id_token: Some("access_token".to_string()),
            token_type: None,
        }),
        ..Default::default()
    });

    let jwt = make_jwt(serde_json::json!({"iat": T, "exp": T + 60}));
    let url = format!("https://app.example.com/cb?access_token={jwt}&token_type=mac");
    let payload = RedirectPayload::from_url_str(&url).unwrap();

    let state = manager.derive_token(&payload).unwrap().unwrap();
    assert_eq!(state.token_type, "mac");
    assert_eq!(
        manager
            .set_token(Some(state))
            .unwrap()
            .unwrap()
            .authorization_header(),
        format!("Mac {jwt}")
    );
}
