use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Deserialize;
use tracing::debug;

use crate::config::DirectoryConfig;
use crate::error::DirectoryError;
use crate::role::Role;
use crate::token::normalize_identity_token;
use crate::user::UserRecord;

/// Columns requested from the `usuarios` table.
const USER_COLUMNS: &str = "id,nombre,apellido,email,rol,rut";

/// Pluggable source of user records.
///
/// Implementations look up the single **active** user whose external id
/// equals the (already normalized) key.
pub trait UserDirectory: Send + Sync + 'static {
    /// Find the active user for `key`; `Ok(None)` when there is no such row.
    fn find_active(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, DirectoryError>> + Send;

    /// Connectivity check used for diagnostics only.
    fn probe(&self) -> impl Future<Output = Result<(), DirectoryError>> + Send {
        std::future::ready(Ok(()))
    }
}

/// Object-safe wrapper for `UserDirectory`.
pub(crate) trait UserDirectoryErased: Send + Sync {
    fn find_active<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<UserRecord>, DirectoryError>> + Send + 'a>>;
    fn probe<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), DirectoryError>> + Send + 'a>>;
}

impl<T: UserDirectory> UserDirectoryErased for T {
    fn find_active<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<UserRecord>, DirectoryError>> + Send + 'a>> {
        Box::pin(UserDirectory::find_active(self, key))
    }

    fn probe<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<(), DirectoryError>> + Send + 'a>> {
        Box::pin(UserDirectory::probe(self))
    }
}

impl<T: UserDirectory> UserDirectory for Arc<T> {
    fn find_active(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, DirectoryError>> + Send {
        T::find_active(self, key)
    }

    fn probe(&self) -> impl Future<Output = Result<(), DirectoryError>> + Send {
        T::probe(self)
    }
}

/// Row identifiers come back as integers or UUID strings depending on the table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RowId {
    Text(String),
    Number(i64),
}

/// The `usuarios` row exactly as the directory returns it.
#[derive(Debug, Deserialize)]
pub struct DirectoryRow {
    id: RowId,
    nombre: String,
    apellido: String,
    email: String,
    rol: String,
    rut: String,
}

impl TryFrom<DirectoryRow> for UserRecord {
    type Error = DirectoryError;

    fn try_from(row: DirectoryRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .rol
            .parse()
            .map_err(|e: crate::role::UnknownRole| DirectoryError::InvalidRow(e.to_string()))?;
        let id = match row.id {
            RowId::Text(id) => id,
            RowId::Number(id) => id.to_string(),
        };
        Ok(UserRecord {
            id,
            name: row.nombre,
            surname: row.apellido,
            email: row.email,
            role,
            external_id: row.rut,
        })
    }
}

/// Decode a weakly-typed directory row into a [`UserRecord`].
pub fn decode_row(value: serde_json::Value) -> Result<UserRecord, DirectoryError> {
    let row: DirectoryRow =
        serde_json::from_value(value).map_err(|e| DirectoryError::InvalidRow(e.to_string()))?;
    UserRecord::try_from(row)
}

/// Directory backed by a PostgREST-style HTTP API.
///
/// Equivalent to
/// `SELECT id, nombre, apellido, email, rol, rut FROM usuarios WHERE rut = $key AND activo = true LIMIT 1`.
pub struct RestUserDirectory {
    client: reqwest::Client,
    config: DirectoryConfig,
}

impl RestUserDirectory {
    pub fn new(config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| DirectoryError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/rest/v1/{resource}", self.config.url.trim_end_matches('/'))
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.config.apikey)
            .bearer_auth(&self.config.apikey)
    }
}

impl UserDirectory for RestUserDirectory {
    fn find_active(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, DirectoryError>> + Send {
        let rut = format!("eq.{key}");
        let request = self.authorized(self.client.get(self.endpoint("usuarios")).query(&[
            ("select", USER_COLUMNS),
            ("rut", rut.as_str()),
            ("activo", "eq.true"),
            ("limit", "1"),
        ]));

        async move {
            let response = request
                .send()
                .await
                .map_err(|e| DirectoryError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(DirectoryError::Status(status.as_u16()));
            }

            let rows: Vec<serde_json::Value> = response
                .json()
                .await
                .map_err(|e| DirectoryError::Decode(e.to_string()))?;
            debug!(rows = rows.len(), "Directory lookup answered");

            rows.into_iter().next().map(decode_row).transpose()
        }
    }

    fn probe(&self) -> impl Future<Output = Result<(), DirectoryError>> + Send {
        let request = self.authorized(self.client.get(self.endpoint("")));
        async move {
            let response = request
                .send()
                .await
                .map_err(|e| DirectoryError::Request(e.to_string()))?;
            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(DirectoryError::Status(status.as_u16()))
            }
        }
    }
}

/// In-memory directory for development and testing.
///
/// Users are keyed by their normalized external id.
pub struct InMemoryUserDirectory {
    users: DashMap<String, (UserRecord, bool)>,
    lookups: AtomicUsize,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Add an active user.
    pub fn with_user(self, user: UserRecord) -> Self {
        self.insert(user, true);
        self
    }

    /// Add a deactivated user; lookups never return it.
    pub fn with_inactive_user(self, user: UserRecord) -> Self {
        self.insert(user, false);
        self
    }

    fn insert(&self, user: UserRecord, active: bool) {
        let key = normalize_identity_token(&user.external_id)
            .unwrap_or_else(|| user.external_id.clone());
        self.users.insert(key, (user, active));
    }

    /// Number of lookups served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn find_active(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<UserRecord>, DirectoryError>> + Send {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let result = self
            .users
            .get(key)
            .filter(|entry| entry.value().1)
            .map(|entry| entry.value().0.clone());
        std::future::ready(Ok(result))
    }
}
