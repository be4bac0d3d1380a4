use serde_json::json;

use super::*;
use crate::state::test_helpers;

fn subscription() -> PushSubscription {
    PushSubscription::new("https://push.example.com/abc", "BKey", "auth-secret").unwrap()
}

#[test]
fn endpoint_must_be_https() {
    assert!(matches!(
        PushSubscription::new("http://push.example.com", "k", "a"),
        Err(ValidationError::Invalid(_))
    ));
    assert!(matches!(PushSubscription::new("https://x", "", "a"), Err(ValidationError::Empty { .. })));
}

#[tokio::test]
async fn register_sends_keys_and_user() {
    let (state, backend) = test_helpers::test_app_state();
    register_push_subscription(&state, &subscription()).await.unwrap();
    let calls = backend.calls();
    assert_eq!(calls[0].0, REGISTER_FN);
    assert_eq!(calls[0].1["subscription"]["keys"]["p256dh"], "BKey");
    assert_eq!(calls[0].1["userId"], json!(test_helpers::user_id(&state)));
}

#[tokio::test]
async fn register_requires_sign_in() {
    let (state, backend) = test_helpers::test_app_state_signed_out();
    let err = register_push_subscription(&state, &subscription()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotSignedIn));
    assert!(backend.calls().is_empty());
}
