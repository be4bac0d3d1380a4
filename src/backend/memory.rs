//! In-memory backend for service tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use uuid::Uuid;

use super::{AuthSession, AuthUser, Backend, BackendError, Filter, Table};

#[derive(Default)]
struct Inner {
    tables: HashMap<Table, Vec<Value>>,
    calls: Vec<(String, Value)>,
    responses: HashMap<String, Value>,
    failing: Vec<String>,
    session: Option<AuthSession>,
}

#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend with a signed-in user.
    #[must_use]
    pub fn signed_in() -> Self {
        let backend = Self::new();
        backend.restore_session(Some(AuthSession {
            access_token: "test-token".into(),
            refresh_token: None,
            user: AuthUser { id: Uuid::new_v4(), email: Some("tester@example.com".into()) },
        }));
        backend
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Canned response for an RPC or function name.
    pub fn respond(&self, name: &str, value: Value) {
        self.lock().responses.insert(name.to_string(), value);
    }

    /// Make every call to `name` (RPC, function, or table name) fail with a 500.
    pub fn fail(&self, name: &str) {
        self.lock().failing.push(name.to_string());
    }

    /// RPC and function calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.lock().tables.get(&table).cloned().unwrap_or_default()
    }

    pub fn seed(&self, table: Table, row: Value) {
        self.lock().tables.entry(table).or_default().push(row);
    }

    fn check(&self, name: &str) -> Result<(), BackendError> {
        if self.lock().failing.iter().any(|n| n == name) {
            return Err(BackendError::Response { status: 500, body: format!("{name} unavailable") });
        }
        Ok(())
    }

    fn call(&self, name: &str, body: Value) -> Result<Value, BackendError> {
        self.check(name)?;
        let mut inner = self.lock();
        inner.calls.push((name.to_string(), body));
        Ok(inner.responses.get(name).cloned().unwrap_or(Value::Null))
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    filter.eq.iter().all(|(column, want)| row.get(column).is_some_and(|v| &cell(v) == want))
}

fn compare(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => cell(a).cmp(&cell(b)),
    }
}

#[async_trait::async_trait]
impl Backend for MemoryBackend {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, BackendError> {
        self.check(table.as_str())?;
        let mut rows: Vec<Value> = self.rows(table).into_iter().filter(|r| matches(r, filter)).collect();
        if let Some(column) = &filter.order {
            rows.sort_by(|a, b| compare(&a[column.as_str()], &b[column.as_str()]));
        }
        Ok(rows)
    }

    async fn insert(&self, table: Table, mut row: Value) -> Result<Value, BackendError> {
        self.check(table.as_str())?;
        if let Some(obj) = row.as_object_mut() {
            obj.entry("id").or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        }
        self.seed(table, row.clone());
        Ok(row)
    }

    async fn update(&self, table: Table, filter: &Filter, patch: Value) -> Result<Vec<Value>, BackendError> {
        self.check(table.as_str())?;
        let mut inner = self.lock();
        let mut updated = Vec::new();
        for row in inner.tables.entry(table).or_default().iter_mut().filter(|r| matches(r, filter)) {
            if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
                for (k, v) in fields {
                    target.insert(k.clone(), v.clone());
                }
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: Table, filter: &Filter) -> Result<usize, BackendError> {
        self.check(table.as_str())?;
        let mut inner = self.lock();
        let rows = inner.tables.entry(table).or_default();
        let before = rows.len();
        rows.retain(|r| !matches(r, filter));
        Ok(before - rows.len())
    }

    async fn rpc(&self, name: &str, args: Value) -> Result<Value, BackendError> {
        self.call(name, args)
    }

    async fn invoke(&self, function: &str, body: Value) -> Result<Value, BackendError> {
        self.call(function, body)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, BackendError> {
        self.sign_in(email, password).await
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthSession, BackendError> {
        self.check("auth")?;
        let session = AuthSession {
            access_token: "test-token".into(),
            refresh_token: None,
            user: AuthUser { id: Uuid::new_v4(), email: Some(email.to_string()) },
        };
        self.restore_session(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.restore_session(None);
        Ok(())
    }

    fn restore_session(&self, session: Option<AuthSession>) {
        self.lock().session = session;
    }

    fn session(&self) -> Option<AuthSession> {
        self.lock().session.clone()
    }
}
