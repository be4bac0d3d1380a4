//! Sync user preferences with the `user_settings` table.
//!
//! Only the user-visible keys travel; the stored session never leaves the
//! machine. The remote row is a single JSON object per user.

use serde_json::{Map, Value, json};
use tracing::{debug, info};

use super::{ServiceError, current_user};
use crate::backend::{Filter, Table};
use crate::prefs::PrefKey;
use crate::state::AppState;

/// Upload local preferences. Returns how many keys were sent.
///
/// # Errors
///
/// Fails when signed out or on backend errors.
pub async fn push_preferences(state: &AppState) -> Result<usize, ServiceError> {
    let user_id = current_user(state)?;
    let settings: Map<String, Value> = {
        let prefs = state.prefs.lock().await;
        prefs.user_entries().map(|(k, v)| (k.as_str().to_string(), v.clone())).collect()
    };
    let count = settings.len();
    let filter = Filter::eq("user_id", user_id);
    let updated = state.backend.update(Table::UserSettings, &filter, json!({ "settings": settings })).await?;
    if updated.is_empty() {
        state.backend.insert(Table::UserSettings, json!({ "user_id": user_id, "settings": settings })).await?;
        debug!(%user_id, "settings row created");
    }
    info!(%user_id, keys = count, "preferences pushed");
    Ok(count)
}

/// Replace local user preferences with the stored ones. Unknown keys are
/// skipped. Returns how many keys were applied; 0 when nothing is stored.
///
/// # Errors
///
/// Fails when signed out, on backend errors, or when preferences cannot be saved.
pub async fn pull_preferences(state: &AppState) -> Result<usize, ServiceError> {
    let user_id = current_user(state)?;
    let rows = state.backend.select(Table::UserSettings, &Filter::eq("user_id", user_id)).await?;
    let Some(Value::Object(settings)) = rows.into_iter().next().and_then(|mut row| row.get_mut("settings").map(Value::take))
    else {
        debug!(%user_id, "no stored settings");
        return Ok(0);
    };

    let mut prefs = state.prefs.lock().await;
    let mut applied = 0;
    for (name, value) in settings {
        match name.parse::<PrefKey>() {
            Ok(key) if PrefKey::USER.contains(&key) => {
                prefs.set(key, value);
                applied += 1;
            }
            _ => debug!(key = %name, "skipping unknown setting"),
        }
    }
    prefs.save()?;
    info!(%user_id, keys = applied, "preferences pulled");
    Ok(applied)
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
