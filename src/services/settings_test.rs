use serde_json::json;

use super::*;
use crate::state::test_helpers;

#[tokio::test]
async fn push_creates_then_updates_row() {
    let (state, backend) = test_helpers::test_app_state();
    state.prefs.lock().await.set(PrefKey::AppTheme, "dark");
    assert_eq!(push_preferences(&state).await.unwrap(), 1);
    state.prefs.lock().await.set(PrefKey::EditorTheme, "light");
    assert_eq!(push_preferences(&state).await.unwrap(), 2);

    let rows = backend.rows(Table::UserSettings);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["settings"], json!({ "app-theme": "dark", "editor-theme": "light" }));
}

#[tokio::test]
async fn push_never_sends_session() {
    let (state, backend) = test_helpers::test_app_state();
    state.persist_session().await.unwrap();
    push_preferences(&state).await.unwrap();
    assert!(backend.rows(Table::UserSettings)[0]["settings"].get("auth-session").is_none());
}

#[tokio::test]
async fn pull_applies_known_keys() {
    let (state, backend) = test_helpers::test_app_state();
    let user_id = test_helpers::user_id(&state);
    backend.seed(
        Table::UserSettings,
        json!({
            "user_id": user_id.to_string(),
            "settings": { "app-size": "large", "auth-session": {}, "mystery": 1 },
        }),
    );
    assert_eq!(pull_preferences(&state).await.unwrap(), 1);
    let prefs = state.prefs.lock().await;
    assert_eq!(prefs.get_str(PrefKey::AppSize), Some("large"));
    assert!(prefs.get(PrefKey::AuthSession).is_none());
}

#[tokio::test]
async fn pull_without_row_is_noop() {
    let (state, _) = test_helpers::test_app_state();
    assert_eq!(pull_preferences(&state).await.unwrap(), 0);
}

#[tokio::test]
async fn sync_requires_sign_in() {
    let (state, _) = test_helpers::test_app_state_signed_out();
    assert!(matches!(push_preferences(&state).await, Err(ServiceError::NotSignedIn)));
    assert!(matches!(pull_preferences(&state).await, Err(ServiceError::NotSignedIn)));
}
