//! HTTP client for the hosted backend.
//!
//! Tables are served PostgREST-style under `/rest/v1/<table>`, procedures
//! under `/rest/v1/rpc/<name>`, functions under `/functions/v1/<name>` and
//! auth under `/auth/v1/`. Every request carries the anon key as `apikey`
//! and a bearer token: the session's access token when signed in, the anon
//! key otherwise. Pure parsing in `parse_body` for testability.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::RequestBuilder;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::{AuthSession, Backend, BackendError, Filter, Table};
use crate::config::AppConfig;

const REST_PATH: &str = "/rest/v1";
const FUNCTIONS_PATH: &str = "/functions/v1";
const AUTH_PATH: &str = "/auth/v1";

// =============================================================================
// CLIENT
// =============================================================================

pub struct RestBackend {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<AuthSession>>,
}

impl RestBackend {
    /// # Errors
    ///
    /// Returns [`BackendError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: &AppConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.backend_url.clone(),
            anon_key: config.anon_key.clone(),
            session: RwLock::new(None),
        })
    }

    fn bearer(&self) -> String {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or_else(|| self.anon_key.clone(), |s| s.access_token.clone())
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }

    fn table(&self, method: reqwest::Method, table: Table, filter: &Filter) -> RequestBuilder {
        self.request(method, &format!("{REST_PATH}/{}", table.as_str())).query(&filter_query(filter))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, BackendError> {
        let response = request.send().await.map_err(|e| BackendError::Request(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| BackendError::Request(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(BackendError::Response { status, body: text });
        }
        parse_body(&text)
    }

    async fn authenticate(&self, request: RequestBuilder) -> Result<AuthSession, BackendError> {
        let body = self.send(request).await?;
        let session = parse_session(body)?;
        info!(user_id = %session.user.id, "signed in");
        self.restore_session(Some(session.clone()));
        Ok(session)
    }
}

// =============================================================================
// BACKEND
// =============================================================================

#[async_trait::async_trait]
impl Backend for RestBackend {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, BackendError> {
        debug!(table = table.as_str(), ?filter, "select");
        let body = self.send(self.table(reqwest::Method::GET, table, filter)).await?;
        into_rows(body)
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, BackendError> {
        debug!(table = table.as_str(), "insert");
        let request = self
            .table(reqwest::Method::POST, table, &Filter::all())
            .header("Prefer", "return=representation")
            .json(&row);
        into_rows(self.send(request).await?)?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::Parse("insert returned no row".into()))
    }

    async fn update(&self, table: Table, filter: &Filter, patch: Value) -> Result<Vec<Value>, BackendError> {
        debug!(table = table.as_str(), ?filter, "update");
        let request = self
            .table(reqwest::Method::PATCH, table, filter)
            .header("Prefer", "return=representation")
            .json(&patch);
        into_rows(self.send(request).await?)
    }

    async fn delete(&self, table: Table, filter: &Filter) -> Result<usize, BackendError> {
        debug!(table = table.as_str(), ?filter, "delete");
        let request = self.table(reqwest::Method::DELETE, table, filter).header("Prefer", "return=representation");
        Ok(into_rows(self.send(request).await?)?.len())
    }

    async fn rpc(&self, name: &str, args: Value) -> Result<Value, BackendError> {
        debug!(name, "rpc");
        let request = self.request(reqwest::Method::POST, &format!("{REST_PATH}/rpc/{name}")).json(&args);
        self.send(request).await
    }

    async fn invoke(&self, function: &str, body: Value) -> Result<Value, BackendError> {
        debug!(function, "invoke");
        let request = self.request(reqwest::Method::POST, &format!("{FUNCTIONS_PATH}/{function}")).json(&body);
        self.send(request).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let request = self
            .request(reqwest::Method::POST, &format!("{AUTH_PATH}/signup"))
            .json(&json!({ "email": email, "password": password }));
        self.authenticate(request).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        let request = self
            .request(reqwest::Method::POST, &format!("{AUTH_PATH}/token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        self.authenticate(request).await
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        if self.session().is_none() {
            return Ok(());
        }
        self.send(self.request(reqwest::Method::POST, &format!("{AUTH_PATH}/logout"))).await?;
        self.restore_session(None);
        info!("signed out");
        Ok(())
    }

    fn restore_session(&self, session: Option<AuthSession>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn session(&self) -> Option<AuthSession> {
        self.session.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn filter_query(filter: &Filter) -> Vec<(String, String)> {
    let mut query = vec![("select".to_string(), "*".to_string())];
    query.extend(filter.eq.iter().map(|(column, value)| (column.clone(), format!("eq.{value}"))));
    if let Some(column) = &filter.order {
        query.push(("order".to_string(), format!("{column}.asc")));
    }
    query
}

fn parse_body(text: &str) -> Result<Value, BackendError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| BackendError::Parse(e.to_string()))
}

fn into_rows(body: Value) -> Result<Vec<Value>, BackendError> {
    match body {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        other => Err(BackendError::Parse(format!("expected row array, got {other}"))),
    }
}

/// Sign-up without auto-confirm answers with a bare user and no tokens.
fn parse_session(body: Value) -> Result<AuthSession, BackendError> {
    if body.get("access_token").is_none() && body.get("id").is_some() {
        return Err(BackendError::PendingConfirmation);
    }
    serde_json::from_value(body).map_err(|e| BackendError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "rest_test.rs"]
mod tests;
