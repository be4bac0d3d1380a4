//! Set service: validated create, update and delete of flashcard sets.

use serde_json::json;
use study::card::FlashcardSet;
use tracing::info;
use uuid::Uuid;

use super::{ServiceError, current_user, optional_text, required_text};
use crate::backend::{Filter, Table, decode_row, decode_rows, encode_row};
use crate::state::AppState;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Fields a set edit may change. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

/// Sets owned by the current user, ordered by title.
///
/// # Errors
///
/// Fails on backend or decoding errors.
pub async fn list_sets(state: &AppState) -> Result<Vec<FlashcardSet>, ServiceError> {
    let user_id = current_user(state)?;
    let rows = state.backend.select(Table::FlashcardSets, &Filter::eq("user_id", user_id).order("title")).await?;
    Ok(decode_rows(rows)?)
}

/// Sets shared with an organization.
///
/// # Errors
///
/// Fails on backend or decoding errors.
pub async fn list_organization_sets(state: &AppState, organization_id: Uuid) -> Result<Vec<FlashcardSet>, ServiceError> {
    let rows = state
        .backend
        .select(Table::FlashcardSets, &Filter::eq("organization_id", organization_id).order("title"))
        .await?;
    Ok(decode_rows(rows)?)
}

/// # Errors
///
/// Returns [`ServiceError::NotFound`] when the set is missing or not visible.
pub async fn get_set(state: &AppState, id: Uuid) -> Result<FlashcardSet, ServiceError> {
    let rows = state.backend.select(Table::FlashcardSets, &Filter::id(id)).await?;
    let row = rows.into_iter().next().ok_or_else(|| ServiceError::NotFound { what: "set", id: id.to_string() })?;
    Ok(decode_row(row)?)
}

/// Create a set owned by the current user.
///
/// # Errors
///
/// Validation errors are raised before any request.
pub async fn create_set(
    state: &AppState,
    title: &str,
    description: Option<&str>,
    organization_id: Option<Uuid>,
) -> Result<FlashcardSet, ServiceError> {
    let title = required_text("title", title, MAX_TITLE_LEN)?;
    let description = description
        .map(|d| optional_text("description", d, MAX_DESCRIPTION_LEN))
        .transpose()?
        .filter(|d| !d.is_empty());
    let user_id = current_user(state)?;

    let mut set = FlashcardSet::new(user_id, title);
    set.description = description;
    set.organization_id = organization_id;

    let stored = state.backend.insert(Table::FlashcardSets, encode_row(&set)?).await?;
    let set: FlashcardSet = decode_row(stored)?;
    info!(set_id = %set.id, title = %set.title, "set created");
    Ok(set)
}

/// # Errors
///
/// Validation errors are raised before any request.
pub async fn update_set(state: &AppState, id: Uuid, patch: SetPatch) -> Result<FlashcardSet, ServiceError> {
    let mut fields = serde_json::Map::new();
    if let Some(title) = &patch.title {
        fields.insert("title".into(), json!(required_text("title", title, MAX_TITLE_LEN)?));
    }
    if let Some(description) = &patch.description {
        let description = optional_text("description", description, MAX_DESCRIPTION_LEN)?;
        fields.insert("description".into(), if description.is_empty() { json!(null) } else { json!(description) });
    }
    if let Some(is_public) = patch.is_public {
        fields.insert("is_public".into(), json!(is_public));
    }
    if fields.is_empty() {
        return get_set(state, id).await;
    }
    patch_set(state, id, fields.into()).await
}

/// Turn permanent shuffle on or off for every future session of the set.
///
/// # Errors
///
/// Fails on backend errors or when the set is missing.
pub async fn set_permanent_shuffle(state: &AppState, id: Uuid, enabled: bool) -> Result<FlashcardSet, ServiceError> {
    let set = patch_set(state, id, json!({ "permanent_shuffle": enabled })).await?;
    info!(set_id = %id, enabled, "permanent shuffle changed");
    Ok(set)
}

/// Delete a set and its cards. Cards go first so a failure never strands them.
///
/// # Errors
///
/// Fails on backend errors or when the set is missing.
pub async fn delete_set(state: &AppState, id: Uuid) -> Result<usize, ServiceError> {
    let cards = state.backend.delete(Table::Flashcards, &Filter::eq("set_id", id)).await?;
    let sets = state.backend.delete(Table::FlashcardSets, &Filter::id(id)).await?;
    if sets == 0 {
        return Err(ServiceError::NotFound { what: "set", id: id.to_string() });
    }
    info!(set_id = %id, cards, "set deleted");
    Ok(cards)
}

async fn patch_set(state: &AppState, id: Uuid, patch: serde_json::Value) -> Result<FlashcardSet, ServiceError> {
    let mut patch = patch;
    if let Some(obj) = patch.as_object_mut() {
        obj.insert("updated_at".into(), json!(now_rfc3339()));
    }
    let rows = state.backend.update(Table::FlashcardSets, &Filter::id(id), patch).await?;
    let row = rows.into_iter().next().ok_or_else(|| ServiceError::NotFound { what: "set", id: id.to_string() })?;
    Ok(decode_row(row)?)
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "sets_test.rs"]
mod tests;
