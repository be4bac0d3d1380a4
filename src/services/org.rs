//! Organization service: create organizations, invite members, accept invites.
//!
//! DESIGN
//! ======
//! Membership changes happen remotely. Inviting stores an invite row with a
//! random token and asks the email function to deliver it; a failed email
//! leaves the invite in place so it can be shared by hand. Accepting calls
//! the `accept_organization_invite` procedure, which checks the token and
//! adds the member atomically.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::domain::{email_domain, validate_domain};
use super::{ServiceError, ValidationError, current_user, required_text};
use crate::backend::{Filter, Table, decode_row, decode_rows, encode_row};
use crate::state::AppState;

pub const MAX_ORG_NAME_LEN: usize = 100;
const TOKEN_LEN: usize = 32;
const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const SEND_INVITE_FN: &str = "send-invite-email";
const ACCEPT_INVITE_RPC: &str = "accept_organization_invite";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
    pub owner_id: Uuid,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Member,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    #[default]
    Pending,
    Accepted,
    Revoked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationInvite {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    pub token: String,
    pub invited_by: Uuid,
    #[serde(default)]
    pub status: InviteStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrganization {
    pub organization: Organization,
    /// Domain warnings to show the creator (public provider, deep subdomain).
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentInvite {
    pub invite: OrganizationInvite,
    pub email_sent: bool,
    /// The organization claims a domain and the invitee's address is elsewhere.
    pub outside_domain: bool,
}

// =============================================================================
// VALIDATION
// =============================================================================

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return None;
    }
    if normalized.chars().any(char::is_whitespace) {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub fn generate_invite_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..TOKEN_ALPHABET.len());
            TOKEN_ALPHABET[idx] as char
        })
        .collect()
}

fn check_token(token: &str) -> Result<String, ValidationError> {
    let token = token.trim();
    if token.len() != TOKEN_LEN || !token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)) {
        return Err(ValidationError::Invalid("malformed invite token".into()));
    }
    Ok(token.to_string())
}

// =============================================================================
// ORGANIZATIONS
// =============================================================================

/// Create an organization owned by the current user, optionally claiming a domain.
///
/// # Errors
///
/// Name and domain are validated before any request.
pub async fn create_organization(
    state: &AppState,
    name: &str,
    domain: Option<&str>,
) -> Result<CreatedOrganization, ServiceError> {
    let name = required_text("organization name", name, MAX_ORG_NAME_LEN)?;
    let (domain, warnings) = match domain.filter(|d| !d.trim().is_empty()) {
        Some(raw) => {
            let check = validate_domain(raw)?;
            if !check.is_valid {
                return Err(ValidationError::InvalidDomain(raw.trim().to_string()).into());
            }
            (Some(check.domain), check.warnings)
        }
        None => (None, Vec::new()),
    };
    let owner_id = current_user(state)?;
    let organization = Organization { id: Uuid::new_v4(), name, domain, owner_id, created_at: None };
    let stored = state.backend.insert(Table::Organizations, encode_row(&organization)?).await?;
    let organization: Organization = decode_row(stored)?;
    info!(org_id = %organization.id, name = %organization.name, "organization created");
    Ok(CreatedOrganization { organization, warnings })
}

/// Organizations visible to the current user.
///
/// # Errors
///
/// Fails on backend or decoding errors.
pub async fn list_organizations(state: &AppState) -> Result<Vec<Organization>, ServiceError> {
    let rows = state.backend.select(Table::Organizations, &Filter::all().order("name")).await?;
    Ok(decode_rows(rows)?)
}

/// # Errors
///
/// Returns [`ServiceError::NotFound`] when the organization is missing or not visible.
pub async fn get_organization(state: &AppState, id: Uuid) -> Result<Organization, ServiceError> {
    let rows = state.backend.select(Table::Organizations, &Filter::id(id)).await?;
    let row =
        rows.into_iter().next().ok_or_else(|| ServiceError::NotFound { what: "organization", id: id.to_string() })?;
    Ok(decode_row(row)?)
}

// =============================================================================
// INVITES
// =============================================================================

/// Invite `email` to an organization and send the invite email.
///
/// # Errors
///
/// The address is validated before any request. Email delivery failures do
/// not fail the invite; see [`SentInvite::email_sent`].
pub async fn invite_member(
    state: &AppState,
    organization_id: Uuid,
    email: &str,
    role: Role,
) -> Result<SentInvite, ServiceError> {
    let email = normalize_email(email).ok_or_else(|| ValidationError::InvalidEmail(email.trim().to_string()))?;
    let invited_by = current_user(state)?;
    let organization = get_organization(state, organization_id).await?;
    let outside_domain = organization.domain.as_ref().is_some_and(|d| email_domain(&email).as_ref() != Some(d));

    let invite = OrganizationInvite {
        id: Uuid::new_v4(),
        organization_id,
        email,
        role,
        token: generate_invite_token(),
        invited_by,
        status: InviteStatus::Pending,
    };
    let stored = state.backend.insert(Table::OrganizationInvites, encode_row(&invite)?).await?;
    let invite: OrganizationInvite = decode_row(stored)?;

    let body = json!({
        "email": invite.email,
        "organizationName": organization.name,
        "inviteToken": invite.token,
        "role": invite.role,
    });
    let email_sent = match state.backend.invoke(SEND_INVITE_FN, body).await {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, invite_id = %invite.id, "invite email not sent");
            false
        }
    };
    info!(org_id = %organization_id, invite_id = %invite.id, email_sent, outside_domain, "member invited");
    Ok(SentInvite { invite, email_sent, outside_domain })
}

/// Pending and past invites of an organization.
///
/// # Errors
///
/// Fails on backend or decoding errors.
pub async fn list_invites(state: &AppState, organization_id: Uuid) -> Result<Vec<OrganizationInvite>, ServiceError> {
    let rows = state
        .backend
        .select(Table::OrganizationInvites, &Filter::eq("organization_id", organization_id).order("email"))
        .await?;
    Ok(decode_rows(rows)?)
}

/// # Errors
///
/// Returns [`ServiceError::NotFound`] when no pending invite matched.
pub async fn revoke_invite(state: &AppState, invite_id: Uuid) -> Result<(), ServiceError> {
    let rows = state
        .backend
        .update(Table::OrganizationInvites, &Filter::id(invite_id).and("status", "pending"), json!({ "status": "revoked" }))
        .await?;
    if rows.is_empty() {
        return Err(ServiceError::NotFound { what: "pending invite", id: invite_id.to_string() });
    }
    info!(%invite_id, "invite revoked");
    Ok(())
}

/// Accept an invite for the current user.
///
/// # Errors
///
/// The token is checked for shape before any request; the procedure rejects
/// unknown or used tokens remotely.
pub async fn accept_invite(state: &AppState, token: &str) -> Result<serde_json::Value, ServiceError> {
    let token = check_token(token)?;
    let user_id = current_user(state)?;
    let result = state.backend.rpc(ACCEPT_INVITE_RPC, json!({ "invite_token": token, "user_id": user_id })).await?;
    info!(%user_id, "invite accepted");
    Ok(result)
}

#[cfg(test)]
#[path = "org_test.rs"]
mod tests;
