//! Web-push subscription registration.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::{ServiceError, ValidationError, current_user, required_text};
use crate::state::AppState;

const REGISTER_FN: &str = "register-push-subscription";
const MAX_KEY_LEN: usize = 512;

/// Browser push subscription as reported by the push service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

impl PushSubscription {
    /// # Errors
    ///
    /// The endpoint must be an https URL and both keys must be present.
    pub fn new(endpoint: &str, p256dh: &str, auth: &str) -> Result<Self, ValidationError> {
        let endpoint = required_text("endpoint", endpoint, 2048)?;
        if !endpoint.starts_with("https://") {
            return Err(ValidationError::Invalid("push endpoint must be an https URL".into()));
        }
        Ok(Self {
            endpoint,
            p256dh: required_text("p256dh key", p256dh, MAX_KEY_LEN)?,
            auth: required_text("auth key", auth, MAX_KEY_LEN)?,
        })
    }
}

/// Register a subscription for the current user.
///
/// # Errors
///
/// Fails when signed out or when the function rejects the subscription.
pub async fn register_push_subscription(state: &AppState, subscription: &PushSubscription) -> Result<(), ServiceError> {
    let user_id = current_user(state)?;
    let body = json!({
        "userId": user_id,
        "subscription": {
            "endpoint": subscription.endpoint,
            "keys": { "p256dh": subscription.p256dh, "auth": subscription.auth },
        },
    });
    state.backend.invoke(REGISTER_FN, body).await?;
    info!(%user_id, "push subscription registered");
    Ok(())
}

#[cfg(test)]
#[path = "push_test.rs"]
mod tests;
